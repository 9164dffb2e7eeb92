//! Nodes of the sanitized output tree.
//!
//! Output nodes are always freshly built from the values the sanitizer
//! accepted; nothing is shared with the input tree.

use std::io;

use markup5ever::serialize::{Serialize, Serializer, TraversalScope};
use markup5ever::{namespace_url, ns, LocalName, QualName};

/// Represents a single attribute (name-value pair).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// An attribute without namespace.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        }
    }

    pub fn local_name(&self) -> &str {
        &self.name.local
    }
}

/// Represents an HTML element of the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QualName,
    pub attributes: Vec<Attribute>,
}

impl Element {
    /// An element in the HTML namespace.
    pub fn new(local_name: &str, attributes: Vec<Attribute>) -> Self {
        Self {
            name: QualName::new(None, ns!(html), LocalName::from(local_name)),
            attributes,
        }
    }

    /// Helper to get the local name as a string slice.
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.local_name() == name)
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

/// A node of the output tree and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub data: NodeData,
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(element: Element, children: Vec<Node>) -> Self {
        Self {
            data: NodeData::Element(element),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            data: NodeData::Text(text.into()),
            children: Vec::new(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(_) => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()> {
        match (&self.data, traversal_scope) {
            (NodeData::Element(element), TraversalScope::IncludeNode) => {
                serializer.start_elem(
                    element.name.clone(),
                    element.attributes.iter().map(|attr| (&attr.name, attr.value.as_str())),
                )?;
                for child in &self.children {
                    child.serialize(serializer, TraversalScope::IncludeNode)?;
                }
                serializer.end_elem(element.name.clone())
            }
            (NodeData::Element(_), TraversalScope::ChildrenOnly(_)) => {
                for child in &self.children {
                    child.serialize(serializer, TraversalScope::IncludeNode)?;
                }
                Ok(())
            }
            (NodeData::Text(text), TraversalScope::IncludeNode) => serializer.write_text(text),
            (NodeData::Text(_), TraversalScope::ChildrenOnly(_)) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_helpers() {
        let element = Element::new("a", vec![Attribute::new("href", "https://example.com")]);
        assert_eq!(element.local_name(), "a");
        assert_eq!(element.attribute("href"), Some("https://example.com"));
        assert_eq!(element.attribute("title"), None);
    }

    #[test]
    fn test_text_content() {
        let node = Node::element(
            Element::new("p", vec![]),
            vec![
                Node::text("a"),
                Node::element(Element::new("b", vec![]), vec![Node::text("b")]),
            ],
        );
        assert_eq!(node.text_content(), "ab");
        assert!(node.as_element().is_some());
        assert!(Node::text("x").as_element().is_none());
    }
}

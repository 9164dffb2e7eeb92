//! Output tree of the HTML sanitizer.
//!
//! The sanitizer never hands back nodes of the parsed input. It builds a new
//! tree out of [`Node`]s and serializes it with html5ever's HTML serializer.

pub mod node;

pub use node::{Attribute, Element, Node, NodeData};

use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use std::io;

/// The top-level nodes of a sanitized fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedFragment {
    pub children: Vec<Node>,
}

impl SanitizedFragment {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Serializes the fragment as HTML.
    pub fn to_html(&self) -> String {
        let opts = SerializeOpts {
            // Text inside <noscript> must be escaped like any other text.
            scripting_enabled: false,
            traversal_scope: TraversalScope::ChildrenOnly(None),
            create_missing_parent: false,
        };

        let mut bytes = Vec::new();
        if let Err(err) = serialize(&mut bytes, self, opts) {
            tracing::warn!("⚠️ Failed to serialize sanitized fragment: {}", err);
            return String::new();
        }
        match String::from_utf8(bytes) {
            Ok(html) => html,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }

    /// Concatenated text of the whole fragment.
    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }
}

impl Serialize for SanitizedFragment {
    fn serialize<S: Serializer>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()> {
        match traversal_scope {
            TraversalScope::IncludeNode | TraversalScope::ChildrenOnly(_) => {
                for child in &self.children {
                    child.serialize(serializer, TraversalScope::IncludeNode)?;
                }
                Ok(())
            }
        }
    }
}

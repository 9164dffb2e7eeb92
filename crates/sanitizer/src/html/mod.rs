//! Inert HTML input for the sanitizer.
//!
//! Untrusted markup is parsed with html5ever into an `RcDom`. Nothing in that
//! tree is ever rendered or loaded; the sanitizer only reads it through the
//! [`InertNode`] trait and builds a fresh output tree.

pub mod builder;
pub mod sanitizer;

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, parse_fragment, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::config::SanitizerConfig;

pub use builder::{CssSanitizerBuilder, HtmlSanitizerBuilder};
pub use sanitizer::{HtmlSanitizer, SafeHtml};

/// Kinds of input node the sanitizer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InertNodeType {
    Element,
    Text,
    /// Comments, doctypes, processing instructions. Dropped silently.
    Other,
}

/// Read access to a node of an inert input tree.
///
/// Accessors return `None` when a value cannot be read. The sanitizer then
/// assumes the most restrictive interpretation: an unreadable type is an
/// element and an unreadable name is `FORM`.
pub trait InertNode: Sized {
    fn node_type(&self) -> Option<InertNodeType>;

    /// Upper case for HTML elements. Elements of other namespaces carry a
    /// prefix (`svg:style`) so they never match a table entry.
    fn node_name(&self) -> Option<String>;

    fn text(&self) -> Option<String>;

    /// Attributes in document order.
    fn attributes(&self) -> Vec<(String, String)>;

    fn children(&self) -> Vec<Self>;
}

impl InertNode for Handle {
    fn node_type(&self) -> Option<InertNodeType> {
        Some(match self.data {
            NodeData::Element { .. } => InertNodeType::Element,
            NodeData::Text { .. } => InertNodeType::Text,
            _ => InertNodeType::Other,
        })
    }

    fn node_name(&self) -> Option<String> {
        match &self.data {
            NodeData::Element { name, .. } => {
                if name.ns == ns!(html) {
                    Some(name.local.to_ascii_uppercase().to_string())
                } else {
                    let prefix = if name.ns == ns!(svg) {
                        "svg"
                    } else if name.ns == ns!(mathml) {
                        "math"
                    } else {
                        "ns"
                    };
                    Some(format!("{}:{}", prefix, name.local))
                }
            }
            _ => None,
        }
    }

    fn text(&self) -> Option<String> {
        match &self.data {
            NodeData::Text { contents } => Some(contents.borrow().to_string()),
            _ => None,
        }
    }

    fn attributes(&self) -> Vec<(String, String)> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    (name, attr.value.to_string())
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn children(&self) -> Vec<Self> {
        if let NodeData::Element { template_contents, .. } = &self.data {
            if let Some(contents) = template_contents.borrow().as_ref() {
                return contents.children.borrow().clone();
            }
        }
        self.children.borrow().clone()
    }
}

/// A parsed `<body>` fragment.
///
/// Owns the whole `RcDom`. Dropping an rcdom document empties the child
/// lists of every node in it, so handles taken from [`nodes`](Self::nodes)
/// are only walkable while the fragment is alive.
pub struct InertFragment {
    dom: RcDom,
}

impl InertFragment {
    /// Top-level nodes of the fragment.
    pub fn nodes(&self) -> Vec<Handle> {
        // Fragment parsing puts everything under a synthetic <html> root.
        self.dom
            .document
            .children
            .borrow()
            .first()
            .map(|root| root.children.borrow().clone())
            .unwrap_or_default()
    }
}

/// Parses `html` as a `<body>` fragment.
///
/// The parser never fetches anything, runs scripts or applies styles.
pub fn parse_inert_fragment(html: &str, config: &SanitizerConfig) -> InertFragment {
    let opts = ParseOpts {
        tree_builder: config.tree_builder_opts(),
        ..Default::default()
    };
    let context = QualName::new(None, ns!(html), local_name!("body"));
    InertFragment {
        dom: parse_fragment(RcDom::default(), opts, context, Vec::new()).one(html),
    }
}

//! Table driven HTML sanitizer.
//!
//! The input is parsed into an inert tree, walked in pre-order and rebuilt
//! from scratch: only elements the table allows survive, and every attribute
//! goes through the action its policy names. A rejected element takes its
//! whole subtree with it.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{parse_inert_fragment, InertNode, InertNodeType};
use crate::config::SanitizerConfig;
use crate::css::StyleSanitizer;
use crate::dom::{Attribute, Element, Node, SanitizedFragment};
use crate::error::{SanitizerError, SanitizerResult};
use crate::table::{AttributePolicyAction, SanitizerTable, FORM_ELEMENT};
use crate::url_policy::{
    parse_srcset, parse_url, restrictively_sanitize_url, serialize_srcset, ResourceUrlPolicy,
    ResourceUrlPolicyHints,
};

/// Markup produced by an [`HtmlSanitizer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SafeHtml> for String {
    fn from(html: SafeHtml) -> Self {
        html.0
    }
}

/// Sanitizes untrusted HTML against a [`SanitizerTable`].
///
/// Cheap to clone; the table is shared.
#[derive(Clone)]
pub struct HtmlSanitizer {
    table: Arc<SanitizerTable>,
    config: SanitizerConfig,
    resource_url_policy: Option<ResourceUrlPolicy>,
    style_element_sanitizer: Option<StyleSanitizer>,
    style_attribute_sanitizer: Option<StyleSanitizer>,
}

impl HtmlSanitizer {
    pub fn new(table: SanitizerTable) -> Self {
        Self {
            table: Arc::new(table),
            config: SanitizerConfig::default(),
            resource_url_policy: None,
            style_element_sanitizer: None,
            style_attribute_sanitizer: None,
        }
    }

    pub fn with_config(mut self, config: SanitizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_resource_url_policy(mut self, policy: ResourceUrlPolicy) -> Self {
        self.resource_url_policy = Some(policy);
        self
    }

    pub fn with_style_element_sanitizer(mut self, sanitizer: StyleSanitizer) -> Self {
        self.style_element_sanitizer = Some(sanitizer);
        self
    }

    pub fn with_style_attribute_sanitizer(mut self, sanitizer: StyleSanitizer) -> Self {
        self.style_attribute_sanitizer = Some(sanitizer);
        self
    }

    pub fn table(&self) -> &SanitizerTable {
        &self.table
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Sanitizes `html`, dropping whatever the table does not allow.
    pub fn sanitize(&self, html: &str) -> SafeHtml {
        SafeHtml(self.sanitize_to_fragment(html).to_html())
    }

    /// Sanitizes `html` and returns the output tree without serializing it.
    pub fn sanitize_to_fragment(&self, html: &str) -> SanitizedFragment {
        let input = parse_inert_fragment(html, &self.config);
        let nodes = input.nodes();
        self.sanitize_nodes(&nodes)
    }

    /// Sanitizes an already parsed inert tree.
    pub fn sanitize_nodes<N: InertNode>(&self, nodes: &[N]) -> SanitizedFragment {
        let mut session = SanitizeSession::new(self);
        SanitizedFragment::new(session.sanitize_children(nodes, None, 0))
    }

    /// Like [`sanitize`](Self::sanitize) but fails when anything had to be
    /// changed. The error lists every change.
    pub fn sanitize_assert_unchanged(&self, html: &str) -> SanitizerResult<SafeHtml> {
        let input = parse_inert_fragment(html, &self.config);
        let nodes = input.nodes();
        let mut session = SanitizeSession::new(self);
        let fragment = SanitizedFragment::new(session.sanitize_children(&nodes, None, 0));
        let output = fragment.to_html();

        if session.changes.is_empty() {
            Ok(SafeHtml(output))
        } else {
            Err(SanitizerError::UnexpectedChange {
                input: html.to_string(),
                output,
                changes: session.changes,
            })
        }
    }
}

impl fmt::Debug for HtmlSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlSanitizer")
            .field("table", &self.table)
            .field("config", &self.config)
            .field("resource_url_policy", &self.resource_url_policy.is_some())
            .field("style_element_sanitizer", &self.style_element_sanitizer.is_some())
            .field("style_attribute_sanitizer", &self.style_attribute_sanitizer.is_some())
            .finish()
    }
}

/// State of one sanitize call.
struct SanitizeSession<'a> {
    sanitizer: &'a HtmlSanitizer,
    changes: Vec<String>,
}

impl<'a> SanitizeSession<'a> {
    fn new(sanitizer: &'a HtmlSanitizer) -> Self {
        Self {
            sanitizer,
            changes: Vec::new(),
        }
    }

    fn record_change(&mut self, change: String) {
        debug!("🧹 {}", change);
        self.changes.push(change);
    }

    fn sanitize_children<N: InertNode>(&mut self, nodes: &[N], parent: Option<&str>, depth: usize) -> Vec<Node> {
        if depth >= self.sanitizer.config.max_depth {
            if !nodes.is_empty() {
                warn!("⚠️ Maximum depth {} reached, dropping subtree", depth);
                self.record_change(format!("Subtree below depth {} was dropped", depth));
            }
            return Vec::new();
        }

        let mut output = Vec::new();
        for node in nodes {
            match node.node_type().unwrap_or(InertNodeType::Element) {
                InertNodeType::Text => {
                    if let Some(text) = self.sanitize_text(node, parent) {
                        output.push(Node::text(text));
                    }
                }
                InertNodeType::Element => {
                    let name = node.node_name().unwrap_or_else(|| FORM_ELEMENT.to_string());
                    if !self.sanitizer.table.is_allowed_element(&name) {
                        self.record_change(format!("Element: {} was dropped", name));
                        continue;
                    }
                    let element = self.sanitize_element(node, &name);
                    let children = self.sanitize_children(&node.children(), Some(&name), depth + 1);
                    output.push(Node::element(element, children));
                }
                InertNodeType::Other => {}
            }
        }
        output
    }

    fn sanitize_text<N: InertNode>(&mut self, node: &N, parent: Option<&str>) -> Option<String> {
        let text = node.text().unwrap_or_default();
        if parent != Some("STYLE") {
            return Some(text);
        }
        let sanitizer = self.sanitizer;
        match &sanitizer.style_element_sanitizer {
            Some(sanitize_css) => Some(sanitize_css(&text)),
            None => {
                self.record_change("STYLE element content was dropped".to_string());
                None
            }
        }
    }

    fn sanitize_element<N: InertNode>(&mut self, node: &N, name: &str) -> Element {
        let sanitizer = self.sanitizer;
        let original = node.attributes();
        let value_of = |attribute: &str| {
            original
                .iter()
                .find(|(name, _)| name == attribute)
                .map(|(_, value)| value.as_str())
        };

        let mut attributes = Vec::new();
        for (attribute, value) in &original {
            let policy = sanitizer.table.attribute_policy(attribute, name);
            if !policy.conditions_met(value_of) {
                self.record_change(format!("Not all conditions satisfied for attribute: {}", attribute));
                continue;
            }

            let kept = match policy.action {
                AttributePolicyAction::Keep => Some(value.clone()),
                AttributePolicyAction::KeepAndSanitizeUrl => {
                    let sanitized = restrictively_sanitize_url(value);
                    if sanitized != *value {
                        self.record_change(format!("Url in attribute {} was modified during sanitization", attribute));
                    }
                    Some(sanitized)
                }
                AttributePolicyAction::KeepAndNormalize => Some(value.to_lowercase()),
                AttributePolicyAction::KeepAndSanitizeStyle => match &sanitizer.style_attribute_sanitizer {
                    Some(sanitize_css) => Some(sanitize_css(value)),
                    None => Some(value.clone()),
                },
                AttributePolicyAction::KeepAndUseResourceUrlPolicy => self.apply_resource_url_policy(name, attribute, value),
                AttributePolicyAction::KeepAndUseResourceUrlPolicyForSrcset => {
                    self.apply_resource_url_policy_to_srcset(name, attribute, value)
                }
                AttributePolicyAction::Drop => {
                    self.record_change(format!("Attribute: {} was dropped", attribute));
                    None
                }
            };

            if let Some(value) = kept {
                attributes.push(Attribute::new(attribute, value));
            }
        }

        Element::new(&name.to_ascii_lowercase(), attributes)
    }

    fn apply_resource_url_policy(&mut self, tag_name: &str, attribute: &str, value: &str) -> Option<String> {
        let sanitizer = self.sanitizer;
        let Some(policy) = &sanitizer.resource_url_policy else {
            return Some(value.to_string());
        };
        let hints = ResourceUrlPolicyHints::HtmlAttribute {
            tag_name,
            attribute_name: attribute,
        };

        let Some(url) = parse_url(value, sanitizer.config.base_url.as_ref()) else {
            self.record_change(format!("Unparseable url in attribute {} was dropped", attribute));
            return None;
        };
        match policy(&url, &hints) {
            None => {
                self.record_change(format!("Url in attribute {} was dropped by the resource URL policy", attribute));
                None
            }
            Some(rewritten) if rewritten == url => Some(value.to_string()),
            Some(rewritten) => {
                self.record_change(format!("Url in attribute {} was modified by the resource URL policy", attribute));
                Some(rewritten.to_string())
            }
        }
    }

    fn apply_resource_url_policy_to_srcset(&mut self, tag_name: &str, attribute: &str, value: &str) -> Option<String> {
        let sanitizer = self.sanitizer;
        let Some(policy) = &sanitizer.resource_url_policy else {
            return Some(value.to_string());
        };
        let hints = ResourceUrlPolicyHints::HtmlAttribute {
            tag_name,
            attribute_name: attribute,
        };
        let base_url = sanitizer.config.base_url.as_ref();

        let mut modified = false;
        let mut candidates = Vec::new();
        for mut candidate in parse_srcset(value) {
            let Some(url) = parse_url(&candidate.url, base_url) else {
                self.record_change(format!("Unparseable url in attribute {} was dropped", attribute));
                modified = true;
                continue;
            };
            match policy(&url, &hints) {
                None => {
                    self.record_change(format!("Url in attribute {} was dropped by the resource URL policy", attribute));
                    modified = true;
                }
                Some(rewritten) if rewritten == url => candidates.push(candidate),
                Some(rewritten) => {
                    self.record_change(format!("Url in attribute {} was modified by the resource URL policy", attribute));
                    modified = true;
                    candidate.url = rewritten.to_string();
                    candidates.push(candidate);
                }
            }
        }

        if candidates.is_empty() {
            if !modified {
                self.record_change(format!("Empty srcset attribute {} was dropped", attribute));
            }
            return None;
        }
        if modified {
            Some(serialize_srcset(&candidates))
        } else {
            Some(value.to_string())
        }
    }
}

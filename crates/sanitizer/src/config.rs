use html5ever::tree_builder::TreeBuilderOpts;
use url::Url;

use crate::error::SanitizerResult;

/// Configuration for the sanitizer
#[derive(Debug, Clone)]
pub struct SanitizerConfig {
    /// Base for relative URLs handed to resource URL policies and CSS `url()`.
    /// Relative URLs do not parse without one.
    pub base_url: Option<Url>,
    /// Maximum element nesting depth; deeper subtrees are dropped.
    pub max_depth: usize,
    /// Parse as if scripting were enabled. Off so `<noscript>` content is
    /// parsed as markup and sanitized like everything else.
    pub scripting_enabled: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            max_depth: 512,
            scripting_enabled: false,
        }
    }
}

impl SanitizerConfig {
    /// Default configuration with `base_url` as the base for relative URLs.
    pub fn with_base_url(base_url: &str) -> SanitizerResult<Self> {
        Ok(Self {
            base_url: Some(Url::parse(base_url)?),
            ..Self::default()
        })
    }

    /// Create tree builder options based on configuration
    pub fn tree_builder_opts(&self) -> TreeBuilderOpts {
        TreeBuilderOpts {
            drop_doctype: true,
            scripting_enabled: self.scripting_enabled,
            iframe_srcdoc: false,
            ..Default::default()
        }
    }
}

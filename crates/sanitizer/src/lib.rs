//! Citadel's HTML and CSS sanitizer
//!
//! Untrusted markup is parsed into an inert tree, filtered against a
//! declarative element/attribute table and rebuilt from scratch. `<style>`
//! contents and `style` attributes go through a token level CSS sanitizer.
//! Sanitizing never loads a resource and never fails on hostile input.

pub mod config;
pub mod css;
pub mod dom;
pub mod error;
pub mod html;
pub mod table;
pub mod url_policy;

/// Re-export common types
pub use config::SanitizerConfig;
pub use css::{CssSanitizer, CssToken, PropertyDiscarder, StyleSanitizer};
pub use dom::SanitizedFragment;
pub use error::{SanitizerError, SanitizerResult};
pub use html::{CssSanitizerBuilder, HtmlSanitizer, HtmlSanitizerBuilder, InertFragment, InertNode, InertNodeType, SafeHtml};
pub use table::{AttributePolicy, AttributePolicyAction, SanitizerTable, DEFAULT_SANITIZER_TABLE};
pub use url_policy::{resource_url_policy, ResourceUrlPolicy, ResourceUrlPolicyHints, INVALID_URL};

lazy_static::lazy_static! {
    static ref DEFAULT_HTML_SANITIZER: HtmlSanitizer = HtmlSanitizer::new(DEFAULT_SANITIZER_TABLE.clone());
}

/// Sanitizes `html` with the default table.
pub fn sanitize_html(html: &str) -> SafeHtml {
    DEFAULT_HTML_SANITIZER.sanitize(html)
}

/// Sanitizes `html` with the default table and fails if anything had to be
/// removed or rewritten.
pub fn sanitize_html_assert_unchanged(html: &str) -> SanitizerResult<SafeHtml> {
    DEFAULT_HTML_SANITIZER.sanitize_assert_unchanged(html)
}

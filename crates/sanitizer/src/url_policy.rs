//! URL handling shared by the HTML and CSS sanitizers.

use std::fmt;
use std::sync::Arc;

use url::{ParseError, Url};

/// Inert URL used in place of a navigation URL with a disallowed scheme.
pub const INVALID_URL: &str = "about:invalid#zClosurez";

/// Schemes a navigation URL may use.
const ALLOWED_SCHEMES: &[&str] = &["data", "http", "https", "mailto", "ftp"];

/// Where a resource URL was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUrlPolicyHints<'a> {
    /// A resource URL attribute such as `<img src>`.
    HtmlAttribute {
        tag_name: &'a str,
        attribute_name: &'a str,
    },
    /// A `url()` inside a `<style>` element.
    StyleElement { property_name: &'a str },
    /// A `url()` inside a `style` attribute.
    StyleAttribute { property_name: &'a str },
}

/// Decides what happens to a resource URL: `None` drops the attribute or CSS
/// value, `Some` keeps the returned (possibly rewritten) URL.
pub type ResourceUrlPolicy =
    Arc<dyn Fn(&Url, &ResourceUrlPolicyHints<'_>) -> Option<Url> + Send + Sync>;

/// Wraps a closure as a [`ResourceUrlPolicy`].
pub fn resource_url_policy<F>(policy: F) -> ResourceUrlPolicy
where
    F: Fn(&Url, &ResourceUrlPolicyHints<'_>) -> Option<Url> + Send + Sync + 'static,
{
    Arc::new(policy)
}

/// Keeps `url` when its scheme is allowed, otherwise returns [`INVALID_URL`].
///
/// A relative value inherits the scheme of the document and is kept. A value
/// that names a scheme but fails to parse is replaced, whatever the scheme.
pub fn restrictively_sanitize_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if ALLOWED_SCHEMES.contains(&parsed.scheme()) => url.to_string(),
        Ok(_) => INVALID_URL.to_string(),
        Err(ParseError::RelativeUrlWithoutBase) => url.to_string(),
        Err(_) if has_explicit_scheme(url) => INVALID_URL.to_string(),
        Err(_) => url.to_string(),
    }
}

/// Whether `url` starts with `scheme:`, read the way URL parsers read it:
/// leading C0 controls and spaces are skipped, tabs and newlines ignored.
fn has_explicit_scheme(url: &str) -> bool {
    let mut chars = url
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'));
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    for c in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {}
            _ => return false,
        }
    }
    false
}

/// Parses `value` relative to `base`. Relative URLs fail without a base.
pub fn parse_url(value: &str, base: Option<&Url>) -> Option<Url> {
    match base {
        Some(base) => base.join(value).ok(),
        None => Url::parse(value).ok(),
    }
}

/// One image candidate of a `srcset` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcsetCandidate {
    pub url: String,
    /// Width or density descriptor such as `2x` or `480w`.
    pub descriptor: Option<String>,
}

impl fmt::Display for SrcsetCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.descriptor {
            Some(descriptor) => write!(f, "{} {}", self.url, descriptor),
            None => write!(f, "{}", self.url),
        }
    }
}

/// Splits a `srcset` value into candidates. Empty candidates are skipped.
pub fn parse_srcset(srcset: &str) -> Vec<SrcsetCandidate> {
    srcset
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            let mut pieces = part.splitn(2, char::is_whitespace);
            let url = pieces.next()?.to_string();
            let descriptor = pieces
                .next()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
            Some(SrcsetCandidate { url, descriptor })
        })
        .collect()
}

pub fn serialize_srcset(candidates: &[SrcsetCandidate]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Sanitizes style sheets and `style` attributes.
//!
//! Structure comes from [`parse_stylesheet`] and [`parse_declaration_list`];
//! selectors and values are re-tokenized and every decision is made on those
//! tokens before they are serialized again.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use url::Url;

use super::allowlist::{DEFAULT_FUNCTION_ALLOWLIST, DEFAULT_PROPERTY_ALLOWLIST};
use super::parser::{parse_declaration_list, parse_stylesheet, CssDeclarationBlock, CssRule, KeyframeRule};
use super::serializer::{escape_ident, serialize_token, serialize_tokens};
use super::token::CssToken;
use super::tokenizer::tokenize_css;
use crate::url_policy::{parse_url, ResourceUrlPolicy, ResourceUrlPolicyHints};

/// Vetoes an allow-listed property when it returns `true`.
pub type PropertyDiscarder = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Turns CSS text into sanitized CSS text. The HTML sanitizer holds one for
/// `<style>` contents and one for `style` attributes.
pub type StyleSanitizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Sanitizes the contents of a `<style>` element.
///
/// Relative `url()`s are rejected since there is no base URL; use
/// [`CssSanitizer::with_base_url`] to resolve them.
pub fn sanitize_style_element(
    css: &str,
    property_allowlist: &HashSet<String>,
    function_allowlist: &HashSet<String>,
    resource_url_policy: Option<&ResourceUrlPolicy>,
    allow_keyframes: bool,
    property_discarders: &[PropertyDiscarder],
) -> String {
    let context = SanitizeContext {
        property_allowlist,
        function_allowlist,
        resource_url_policy,
        property_discarders,
        base_url: None,
        allow_keyframes,
    };
    context.sanitize_style_element(css)
}

/// Sanitizes the value of a `style` attribute.
pub fn sanitize_style_attribute(
    css: &str,
    property_allowlist: &HashSet<String>,
    function_allowlist: &HashSet<String>,
    resource_url_policy: Option<&ResourceUrlPolicy>,
    property_discarders: &[PropertyDiscarder],
) -> String {
    let context = SanitizeContext {
        property_allowlist,
        function_allowlist,
        resource_url_policy,
        property_discarders,
        base_url: None,
        allow_keyframes: false,
    };
    context.sanitize_style_attribute(css)
}

/// Owned CSS sanitization settings, shared by the HTML sanitizer.
#[derive(Clone)]
pub struct CssSanitizer {
    property_allowlist: Arc<HashSet<String>>,
    function_allowlist: Arc<HashSet<String>>,
    resource_url_policy: Option<ResourceUrlPolicy>,
    property_discarders: Vec<PropertyDiscarder>,
    base_url: Option<Url>,
    allow_keyframes: bool,
}

impl CssSanitizer {
    pub fn new(property_allowlist: HashSet<String>, function_allowlist: HashSet<String>) -> Self {
        Self {
            property_allowlist: Arc::new(property_allowlist),
            function_allowlist: Arc::new(function_allowlist),
            resource_url_policy: None,
            property_discarders: Vec::new(),
            base_url: None,
            allow_keyframes: false,
        }
    }

    pub fn with_resource_url_policy(mut self, policy: ResourceUrlPolicy) -> Self {
        self.resource_url_policy = Some(policy);
        self
    }

    pub fn with_property_discarder(mut self, discarder: PropertyDiscarder) -> Self {
        self.property_discarders.push(discarder);
        self
    }

    /// Base against which relative `url()`s are resolved.
    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn allow_keyframes(mut self, allow: bool) -> Self {
        self.allow_keyframes = allow;
        self
    }

    pub fn sanitize_style_element(&self, css: &str) -> String {
        self.context().sanitize_style_element(css)
    }

    pub fn sanitize_style_attribute(&self, css: &str) -> String {
        self.context().sanitize_style_attribute(css)
    }

    /// Wraps a clone of `self` as a `<style>` element sanitizer.
    pub fn style_element_sanitizer(&self) -> StyleSanitizer {
        let sanitizer = self.clone();
        Arc::new(move |css: &str| sanitizer.sanitize_style_element(css))
    }

    /// Wraps a clone of `self` as a `style` attribute sanitizer.
    pub fn style_attribute_sanitizer(&self) -> StyleSanitizer {
        let sanitizer = self.clone();
        Arc::new(move |css: &str| sanitizer.sanitize_style_attribute(css))
    }

    fn context(&self) -> SanitizeContext<'_> {
        SanitizeContext {
            property_allowlist: &self.property_allowlist,
            function_allowlist: &self.function_allowlist,
            resource_url_policy: self.resource_url_policy.as_ref(),
            property_discarders: &self.property_discarders,
            base_url: self.base_url.as_ref(),
            allow_keyframes: self.allow_keyframes,
        }
    }
}

impl Default for CssSanitizer {
    /// Default allow-lists, no resource URL policy, no keyframes.
    fn default() -> Self {
        Self::new(
            DEFAULT_PROPERTY_ALLOWLIST.clone(),
            DEFAULT_FUNCTION_ALLOWLIST.clone(),
        )
    }
}

impl fmt::Debug for CssSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CssSanitizer")
            .field("properties", &self.property_allowlist.len())
            .field("functions", &self.function_allowlist.len())
            .field("resource_url_policy", &self.resource_url_policy.is_some())
            .field("property_discarders", &self.property_discarders.len())
            .field("base_url", &self.base_url)
            .field("allow_keyframes", &self.allow_keyframes)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleOrigin {
    Element,
    Attribute,
}

struct SanitizeContext<'a> {
    property_allowlist: &'a HashSet<String>,
    function_allowlist: &'a HashSet<String>,
    resource_url_policy: Option<&'a ResourceUrlPolicy>,
    property_discarders: &'a [PropertyDiscarder],
    base_url: Option<&'a Url>,
    allow_keyframes: bool,
}

impl SanitizeContext<'_> {
    fn sanitize_style_element(&self, css: &str) -> String {
        let mut output = Vec::new();
        for rule in parse_stylesheet(css) {
            match rule {
                CssRule::Style { selector, style } => match sanitize_selector(&selector) {
                    Some(selector) => {
                        let declarations = self.sanitize_declarations(&style, StyleOrigin::Element);
                        output.push(format!("{} {{ {} }}", selector, declarations));
                    }
                    None => trace!("Dropping style rule with selector {:?}", selector),
                },
                CssRule::Keyframes { name, keyframes } => {
                    if !self.allow_keyframes {
                        trace!("Dropping @keyframes {:?}: keyframes not allowed", name);
                        continue;
                    }
                    match self.sanitize_keyframes(&name, &keyframes) {
                        Some(rule) => output.push(rule),
                        None => trace!("Dropping @keyframes with invalid name {:?}", name),
                    }
                }
                CssRule::Unsupported { name } => trace!("Dropping unsupported at-rule @{}", name),
            }
        }
        output.join("\n")
    }

    fn sanitize_style_attribute(&self, css: &str) -> String {
        self.sanitize_declarations(&parse_declaration_list(css), StyleOrigin::Attribute)
    }

    /// Accepted declarations in property name order.
    fn sanitize_declarations(&self, block: &CssDeclarationBlock, origin: StyleOrigin) -> String {
        let mut output = String::new();
        for (name, declaration) in block.iter() {
            if !self.property_allowlist.contains(name) {
                trace!("Property {} is not allowed", name);
                continue;
            }
            if self.property_discarders.iter().any(|discard| discard(name)) {
                trace!("Property {} was discarded", name);
                continue;
            }
            let Some(value) = self.sanitize_value(name, &declaration.value, origin) else {
                trace!("Value of property {} was rejected", name);
                continue;
            };
            output.push_str(&escape_ident(name));
            output.push_str(": ");
            output.push_str(&value);
            if declaration.important {
                output.push_str(" !important");
            }
            output.push(';');
        }
        output
    }

    fn sanitize_value(&self, property: &str, value: &str, origin: StyleOrigin) -> Option<String> {
        let mut tokens = tokenize_css(value);
        if !is_structurally_safe(&tokens) {
            return None;
        }

        let mut i = 0;
        while i < tokens.len() {
            if let CssToken::Function(name) = &tokens[i] {
                let name = name.to_ascii_lowercase();
                if !self.function_allowlist.contains(&name) {
                    return None;
                }
                if name == "url" {
                    let (index, url) = url_argument(&tokens, i)?;
                    let rewritten = self.sanitize_url(property, &url, origin)?;
                    tokens[index] = CssToken::String(rewritten);
                    i = index;
                }
            }
            i += 1;
        }

        let sanitized = serialize_tokens(&tokens).trim().to_string();
        if sanitized.is_empty() {
            None
        } else {
            Some(sanitized)
        }
    }

    fn sanitize_url(&self, property: &str, url: &str, origin: StyleOrigin) -> Option<String> {
        let parsed = parse_url(url, self.base_url)?;
        let Some(policy) = self.resource_url_policy else {
            return Some(url.to_string());
        };
        let hints = match origin {
            StyleOrigin::Element => ResourceUrlPolicyHints::StyleElement { property_name: property },
            StyleOrigin::Attribute => ResourceUrlPolicyHints::StyleAttribute { property_name: property },
        };
        policy(&parsed, &hints).map(|url| url.to_string())
    }

    fn sanitize_keyframes(&self, name: &str, keyframes: &[KeyframeRule]) -> Option<String> {
        let name = keyframes_name(name)?;
        let frames: Vec<String> = keyframes
            .iter()
            .filter_map(|keyframe| {
                let Some(key_text) = sanitize_key_text(&keyframe.key_text) else {
                    trace!("Dropping keyframe with key {:?}", keyframe.key_text);
                    return None;
                };
                let declarations = self.sanitize_declarations(&keyframe.style, StyleOrigin::Element);
                Some(format!("{} {{ {} }}", key_text, declarations))
            })
            .collect();
        Some(format!("@keyframes {} {{ {} }}", escape_ident(&name), frames.join(" ")))
    }
}

/// Returns the index of the string argument of the `url(` at `function_index`
/// and its value. The argument must be a single string.
fn url_argument(tokens: &[CssToken], function_index: usize) -> Option<(usize, String)> {
    let mut index = function_index + 1;
    while tokens.get(index).is_some_and(CssToken::is_whitespace) {
        index += 1;
    }
    let CssToken::String(value) = tokens.get(index)? else {
        return None;
    };

    let mut close = index + 1;
    while tokens.get(close).is_some_and(CssToken::is_whitespace) {
        close += 1;
    }
    if tokens.get(close) != Some(&CssToken::CloseParen) {
        return None;
    }
    Some((index, value.clone()))
}

/// Rejects selectors that can reach outside a shadow root and anything
/// that could break out of the surrounding rule.
fn sanitize_selector(selector: &str) -> Option<String> {
    let tokens = tokenize_css(selector);
    if !is_structurally_safe(&tokens) {
        return None;
    }

    let escapes_host = tokens.windows(2).any(|pair| match pair {
        [CssToken::Colon, CssToken::Ident(name)] => name.eq_ignore_ascii_case("host"),
        [CssToken::Colon, CssToken::Function(name)] => {
            name.eq_ignore_ascii_case("host") || name.eq_ignore_ascii_case("host-context")
        }
        _ => false,
    });
    if escapes_host {
        return None;
    }

    let serialized = serialize_tokens(&tokens).trim().to_string();
    if serialized.is_empty() {
        None
    } else {
        Some(serialized)
    }
}

/// Blocks must be balanced and `<`, `<!--` and `-->` must not appear, so
/// sanitized CSS can neither close a `<style>` element nor swallow the
/// rules after it.
fn is_structurally_safe(tokens: &[CssToken]) -> bool {
    let mut open: Vec<CssToken> = Vec::new();
    for token in tokens {
        match token {
            CssToken::Delim('<') | CssToken::Cdo | CssToken::Cdc => return false,
            t if t.closes_block() => {
                if open.pop().as_ref() != Some(t) {
                    return false;
                }
            }
            t => {
                if let Some(closer) = t.block_closer() {
                    open.push(closer);
                }
            }
        }
    }
    open.is_empty()
}

/// The name of an `@keyframes` rule: a single identifier or string.
fn keyframes_name(prelude: &str) -> Option<String> {
    let tokens: Vec<CssToken> = tokenize_css(prelude)
        .into_iter()
        .filter(|t| !t.is_whitespace() && !t.is_eof())
        .collect();
    match tokens.as_slice() {
        [CssToken::Ident(name)] | [CssToken::String(name)] if !name.is_empty() => Some(name.clone()),
        _ => None,
    }
}

/// Validates a keyframe selector: a comma separated list of percentages,
/// `from` and `to`.
fn sanitize_key_text(key_text: &str) -> Option<String> {
    let mut keys = Vec::new();
    let mut expect_key = true;
    for token in tokenize_css(key_text) {
        match token {
            CssToken::Whitespace | CssToken::Eof => {}
            CssToken::Comma if !expect_key => expect_key = true,
            CssToken::Percentage(_) if expect_key => {
                keys.push(serialize_token(&token));
                expect_key = false;
            }
            CssToken::Ident(ref name)
                if expect_key
                    && (name.eq_ignore_ascii_case("from") || name.eq_ignore_ascii_case("to")) =>
            {
                keys.push(name.to_ascii_lowercase());
                expect_key = false;
            }
            _ => return None,
        }
    }
    if expect_key {
        return None;
    }
    Some(keys.join(", "))
}

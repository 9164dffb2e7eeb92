//! Builders for [`HtmlSanitizer`].
//!
//! A builder starts from the default table and can only narrow it, apart
//! from the named carve-outs (`data-*`, `style`, `class`, `id`, id
//! references, custom elements). Every step replaces the builder's table
//! with a new one; a table handed out earlier is never touched.

use std::fmt;
use std::sync::Arc;

use super::sanitizer::HtmlSanitizer;
use crate::config::SanitizerConfig;
use crate::css::{discard_animations, discard_transitions, CssSanitizer};
use crate::error::{SanitizerError, SanitizerResult};
use crate::table::{SanitizerTable, DEFAULT_SANITIZER_TABLE};
use crate::url_policy::ResourceUrlPolicy;

/// Builds an [`HtmlSanitizer`] from a narrowed table.
///
/// ```
/// use citadel_sanitizer::HtmlSanitizerBuilder;
///
/// let sanitizer = HtmlSanitizerBuilder::new()
///     .only_allow_elements(["article", "p", "a"])?
///     .allow_class_attributes()
///     .build()?;
/// assert_eq!(sanitizer.sanitize("<p class=x><b>y</b></p>").as_str(), "<p class=\"x\"></p>");
/// # Ok::<(), citadel_sanitizer::SanitizerError>(())
/// ```
pub struct HtmlSanitizerBuilder {
    table: SanitizerTable,
    config: SanitizerConfig,
    resource_url_policy: Option<ResourceUrlPolicy>,
    built: bool,
}

impl fmt::Debug for HtmlSanitizerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlSanitizerBuilder")
            .field("table", &self.table)
            .field("config", &self.config)
            .field("resource_url_policy", &self.resource_url_policy.is_some())
            .field("built", &self.built)
            .finish()
    }
}

impl Default for HtmlSanitizerBuilder {
    fn default() -> Self {
        Self::from_table(DEFAULT_SANITIZER_TABLE.clone())
    }
}

impl HtmlSanitizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `table` instead of the default table.
    pub fn from_table(table: SanitizerTable) -> Self {
        Self {
            table,
            config: SanitizerConfig::default(),
            resource_url_policy: None,
            built: false,
        }
    }

    /// The table as narrowed so far.
    pub fn table(&self) -> &SanitizerTable {
        &self.table
    }

    pub fn only_allow_elements<I, S>(&mut self, elements: I) -> SanitizerResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.table = self.table.only_allow_elements(elements)?;
        Ok(self)
    }

    pub fn only_allow_attributes<I, S>(&mut self, attributes: I) -> SanitizerResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.table = self.table.only_allow_attributes(attributes)?;
        Ok(self)
    }

    pub fn allow_data_attributes<I, S>(&mut self, attributes: I) -> SanitizerResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.table = self.table.allow_data_attributes(attributes)?;
        Ok(self)
    }

    /// Keeps `style` attributes. Their values pass through unchanged; use
    /// [`CssSanitizerBuilder::allow_inline_styles`] to sanitize them.
    pub fn allow_style_attributes(&mut self) -> &mut Self {
        self.table = self.table.allow_style_attributes();
        self
    }

    pub fn allow_class_attributes(&mut self) -> &mut Self {
        self.table = self.table.allow_class_attributes();
        self
    }

    pub fn allow_id_attributes(&mut self) -> &mut Self {
        self.table = self.table.allow_id_attributes();
        self
    }

    pub fn allow_id_reference_attributes(&mut self) -> &mut Self {
        self.table = self.table.allow_id_reference_attributes();
        self
    }

    pub fn allow_custom_element<I, S>(&mut self, element: &str, attributes: I) -> SanitizerResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.table = self.table.allow_custom_element(element, attributes)?;
        Ok(self)
    }

    pub fn with_resource_url_policy(&mut self, policy: ResourceUrlPolicy) -> &mut Self {
        self.resource_url_policy = Some(policy);
        self
    }

    pub fn with_config(&mut self, config: SanitizerConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Builds the sanitizer. A builder can only be built once.
    pub fn build(&mut self) -> SanitizerResult<HtmlSanitizer> {
        self.mark_built()?;
        let mut sanitizer = HtmlSanitizer::new(self.table.clone()).with_config(self.config.clone());
        if let Some(policy) = &self.resource_url_policy {
            sanitizer = sanitizer.with_resource_url_policy(Arc::clone(policy));
        }
        Ok(sanitizer)
    }

    fn mark_built(&mut self) -> SanitizerResult<()> {
        if self.built {
            return Err(SanitizerError::AlreadyBuilt);
        }
        self.built = true;
        Ok(())
    }
}

/// Builds an [`HtmlSanitizer`] that keeps `<style>` elements and sanitizes
/// their contents with the default CSS allow-lists.
///
/// Animations and transitions are removed unless allowed. `@keyframes` rules
/// survive only with animations.
#[derive(Debug, Default)]
pub struct CssSanitizerBuilder {
    html: HtmlSanitizerBuilder,
    animations: bool,
    transitions: bool,
    inline_styles: bool,
}

impl CssSanitizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_animations(&mut self) -> &mut Self {
        self.animations = true;
        self
    }

    pub fn allow_transitions(&mut self) -> &mut Self {
        self.transitions = true;
        self
    }

    /// Also keeps `style` attributes, sanitized like `<style>` contents.
    pub fn allow_inline_styles(&mut self) -> &mut Self {
        self.inline_styles = true;
        self
    }

    /// Used for `url()`s in CSS as well as resource URL attributes.
    pub fn with_resource_url_policy(&mut self, policy: ResourceUrlPolicy) -> &mut Self {
        self.html.with_resource_url_policy(policy);
        self
    }

    pub fn with_config(&mut self, config: SanitizerConfig) -> &mut Self {
        self.html.with_config(config);
        self
    }

    pub fn build(&mut self) -> SanitizerResult<HtmlSanitizer> {
        self.html.mark_built()?;

        let mut table = self
            .html
            .table
            .with_allowed_element("STYLE")
            .allow_class_attributes()
            .allow_id_attributes();
        if self.inline_styles {
            table = table.allow_style_attributes();
        }

        let mut css = CssSanitizer::default()
            .with_base_url(self.html.config.base_url.clone())
            .allow_keyframes(self.animations);
        if !self.animations {
            css = css.with_property_discarder(Arc::new(discard_animations));
        }
        if !self.transitions {
            css = css.with_property_discarder(Arc::new(discard_transitions));
        }
        if let Some(policy) = &self.html.resource_url_policy {
            css = css.with_resource_url_policy(Arc::clone(policy));
        }

        let mut sanitizer = HtmlSanitizer::new(table)
            .with_config(self.html.config.clone())
            .with_style_element_sanitizer(css.style_element_sanitizer());
        if self.inline_styles {
            sanitizer = sanitizer.with_style_attribute_sanitizer(css.style_attribute_sanitizer());
        }
        if let Some(policy) = &self.html.resource_url_policy {
            sanitizer = sanitizer.with_resource_url_policy(Arc::clone(policy));
        }
        Ok(sanitizer)
    }
}

//! Declarative element and attribute policies.
//!
//! Element names are upper case (`A`, `IMG`), attribute names lower case.
//! Tables are values: every narrowing operation returns a new table and the
//! original stays valid, so one table can back any number of sanitizers on
//! any number of threads.

pub mod defaults;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{SanitizerError, SanitizerResult};

pub use defaults::DEFAULT_SANITIZER_TABLE;

/// Never allowed, whatever a table says. Named form controls clobber DOM
/// properties of the form.
pub const FORM_ELEMENT: &str = "FORM";

/// Attributes that refer to other elements by id.
const ID_REFERENCE_ATTRIBUTES: &[&str] = &[
    "aria-activedescendant",
    "aria-controls",
    "aria-labelledby",
    "aria-owns",
    "for",
    "list",
];

/// What happens to an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributePolicyAction {
    Drop,
    Keep,
    /// Navigation URL: disallowed schemes become an inert URL.
    KeepAndSanitizeUrl,
    /// Enumerated value: lower-cased.
    KeepAndNormalize,
    /// Run through the style attribute sanitizer when one is configured.
    KeepAndSanitizeStyle,
    /// Resource URL: handed to the resource URL policy.
    KeepAndUseResourceUrlPolicy,
    /// `srcset`: every candidate URL is handed to the resource URL policy.
    KeepAndUseResourceUrlPolicyForSrcset,
}

/// Value of attribute name → allowed values. A condition on an attribute
/// that is absent or empty is satisfied.
pub type AttributeConditions = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePolicy {
    pub action: AttributePolicyAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<AttributeConditions>,
}

static KEEP_POLICY: AttributePolicy = AttributePolicy::new(AttributePolicyAction::Keep);
static DROP_POLICY: AttributePolicy = AttributePolicy::new(AttributePolicyAction::Drop);

impl AttributePolicy {
    pub const fn new(action: AttributePolicyAction) -> Self {
        Self {
            action,
            conditions: None,
        }
    }

    pub fn with_conditions(action: AttributePolicyAction, conditions: AttributeConditions) -> Self {
        Self {
            action,
            conditions: Some(conditions),
        }
    }

    /// Checks the conditions against the attributes of the input element.
    /// Only a present, non-empty value outside the allowed set fails. Values
    /// are enumerated keywords and compare ASCII case-insensitively.
    pub fn conditions_met<'a, F>(&self, value_of: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let Some(conditions) = &self.conditions else {
            return true;
        };
        conditions.iter().all(|(attribute, allowed)| match value_of(attribute.as_str()) {
            None | Some("") => true,
            Some(value) => allowed.contains(value) || allowed.contains(&value.to_ascii_lowercase()),
        })
    }
}

/// Element and attribute policies consulted by the HTML sanitizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizerTable {
    /// Elements whose attributes are only resolved through global policies.
    #[serde(default)]
    pub allowed_elements: BTreeSet<String>,
    /// Element specific attribute policies. Having an entry allows the element.
    #[serde(default)]
    pub element_policies: BTreeMap<String, BTreeMap<String, AttributePolicy>>,
    /// Attributes kept verbatim on every allowed element.
    #[serde(default)]
    pub allowed_global_attributes: BTreeSet<String>,
    #[serde(default)]
    pub global_attribute_policies: BTreeMap<String, AttributePolicy>,
    /// Attribute name prefixes (such as `aria-`) kept verbatim.
    #[serde(default)]
    pub globally_allowed_attribute_prefixes: BTreeSet<String>,
}

impl SanitizerTable {
    pub fn new(
        allowed_elements: BTreeSet<String>,
        element_policies: BTreeMap<String, BTreeMap<String, AttributePolicy>>,
        allowed_global_attributes: BTreeSet<String>,
        global_attribute_policies: BTreeMap<String, AttributePolicy>,
        globally_allowed_attribute_prefixes: BTreeSet<String>,
    ) -> Self {
        Self {
            allowed_elements,
            element_policies,
            allowed_global_attributes,
            global_attribute_policies,
            globally_allowed_attribute_prefixes,
        }
    }

    /// Loads a table from JSON.
    pub fn from_json(json: &str) -> SanitizerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SanitizerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether elements named `element_name` are kept. `FORM` never is.
    pub fn is_allowed_element(&self, element_name: &str) -> bool {
        let element_name = element_name.to_ascii_uppercase();
        element_name != FORM_ELEMENT
            && (self.allowed_elements.contains(&element_name)
                || self.element_policies.contains_key(&element_name))
    }

    /// Resolves the policy for `attribute_name` on `element_name`.
    ///
    /// Element specific policies win, then the global allow-list, global
    /// policies and global prefixes. Anything else is dropped.
    pub fn attribute_policy(&self, attribute_name: &str, element_name: &str) -> &AttributePolicy {
        let element_name = element_name.to_ascii_uppercase();
        if element_name == FORM_ELEMENT {
            return &DROP_POLICY;
        }
        let attribute_name = attribute_name.to_ascii_lowercase();

        if let Some(policy) = self
            .element_policies
            .get(&element_name)
            .and_then(|policies| policies.get(&attribute_name))
        {
            return policy;
        }
        if self.allowed_global_attributes.contains(&attribute_name) {
            return &KEEP_POLICY;
        }
        if let Some(policy) = self.global_attribute_policies.get(&attribute_name) {
            return policy;
        }
        if self
            .globally_allowed_attribute_prefixes
            .iter()
            .any(|prefix| attribute_name.starts_with(prefix.as_str()))
        {
            return &KEEP_POLICY;
        }
        &DROP_POLICY
    }

    /// Whether any element could keep `attribute_name`.
    fn permits_attribute(&self, attribute_name: &str) -> bool {
        self.allowed_global_attributes.contains(attribute_name)
            || self.global_attribute_policies.contains_key(attribute_name)
            || self
                .element_policies
                .values()
                .any(|policies| policies.contains_key(attribute_name))
            || self
                .globally_allowed_attribute_prefixes
                .iter()
                .any(|prefix| attribute_name.starts_with(prefix.as_str()))
    }

    /// Keeps only `elements`. Every element must already be allowed.
    pub fn only_allow_elements<I, S>(&self, elements: I) -> SanitizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = BTreeSet::new();
        for element in elements {
            let element = element.as_ref().to_ascii_uppercase();
            if !self.is_allowed_element(&element) {
                return Err(SanitizerError::ElementNotAllowed(element));
            }
            allowed.insert(element);
        }

        let mut table = self.clone();
        table.allowed_elements.retain(|name| allowed.contains(name));
        table.element_policies.retain(|name, _| allowed.contains(name));
        Ok(table)
    }

    /// Keeps only `attributes`. Every attribute must already be permitted on
    /// some element. Attributes permitted through a prefix become explicit
    /// global attributes and the prefixes are removed.
    pub fn only_allow_attributes<I, S>(&self, attributes: I) -> SanitizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = BTreeSet::new();
        for attribute in attributes {
            let attribute = attribute.as_ref().to_ascii_lowercase();
            if !self.permits_attribute(&attribute) {
                return Err(SanitizerError::AttributeNotAllowed(attribute));
            }
            allowed.insert(attribute);
        }

        let mut table = self.clone();
        let from_prefixes: Vec<String> = allowed
            .iter()
            .filter(|attribute| {
                !self.allowed_global_attributes.contains(attribute.as_str())
                    && !self.global_attribute_policies.contains_key(attribute.as_str())
                    && self
                        .globally_allowed_attribute_prefixes
                        .iter()
                        .any(|prefix| attribute.starts_with(prefix.as_str()))
            })
            .cloned()
            .collect();

        table.allowed_global_attributes.retain(|name| allowed.contains(name));
        table.allowed_global_attributes.extend(from_prefixes);
        table.global_attribute_policies.retain(|name, _| allowed.contains(name));
        for policies in table.element_policies.values_mut() {
            policies.retain(|name, _| allowed.contains(name));
        }
        table.globally_allowed_attribute_prefixes.clear();
        Ok(table)
    }

    /// Allows `attributes`, which must all start with `data-`.
    pub fn allow_data_attributes<I, S>(&self, attributes: I) -> SanitizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = self.clone();
        for attribute in attributes {
            let attribute = attribute.as_ref().to_ascii_lowercase();
            if !attribute.starts_with("data-") {
                return Err(SanitizerError::InvalidDataAttribute(attribute));
            }
            table.allowed_global_attributes.insert(attribute);
        }
        Ok(table)
    }

    /// Allows `style` attributes; their values go through the style sanitizer.
    pub fn allow_style_attributes(&self) -> Self {
        let mut table = self.clone();
        table.global_attribute_policies.insert(
            "style".to_string(),
            AttributePolicy::new(AttributePolicyAction::KeepAndSanitizeStyle),
        );
        table
    }

    pub fn allow_class_attributes(&self) -> Self {
        self.with_global_attribute("class")
    }

    pub fn allow_id_attributes(&self) -> Self {
        self.with_global_attribute("id")
    }

    /// Allows attributes that refer to other elements by id, such as
    /// `aria-labelledby` and `for`.
    pub fn allow_id_reference_attributes(&self) -> Self {
        let mut table = self.clone();
        table
            .allowed_global_attributes
            .extend(ID_REFERENCE_ATTRIBUTES.iter().map(|a| a.to_string()));
        table
    }

    /// Allows a custom element with the given attributes kept verbatim.
    pub fn allow_custom_element<I, S>(&self, element: &str, attributes: I) -> SanitizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let element = element.to_ascii_uppercase();
        if !element.contains('-') || self.is_allowed_element(&element) {
            return Err(SanitizerError::InvalidCustomElement(element));
        }

        let policies = attributes
            .into_iter()
            .map(|attribute| {
                (
                    attribute.as_ref().to_ascii_lowercase(),
                    AttributePolicy::new(AttributePolicyAction::Keep),
                )
            })
            .collect();
        let mut table = self.clone();
        table.element_policies.insert(element, policies);
        Ok(table)
    }

    /// Allows `element` without element specific policies.
    pub(crate) fn with_allowed_element(&self, element: &str) -> Self {
        let mut table = self.clone();
        table.allowed_elements.insert(element.to_ascii_uppercase());
        table
    }

    fn with_global_attribute(&self, attribute: &str) -> Self {
        let mut table = self.clone();
        table.allowed_global_attributes.insert(attribute.to_string());
        table
    }
}

//! The default sanitizer table.

use std::collections::{BTreeMap, BTreeSet};

use super::{AttributeConditions, AttributePolicy, AttributePolicyAction, SanitizerTable};

const ALLOWED_ELEMENTS: &[&str] = &[
    "ARTICLE", "SECTION", "NAV", "ASIDE", "H1", "H2", "H3", "H4", "H5", "H6", "HEADER", "FOOTER",
    "ADDRESS", "P", "HR", "PRE", "BLOCKQUOTE", "OL", "UL", "LH", "LI", "DL", "DT", "DD", "FIGURE",
    "FIGCAPTION", "MAIN", "DIV", "EM", "STRONG", "SMALL", "S", "CITE", "Q", "DFN", "ABBR", "RUBY",
    "RB", "RT", "RTC", "RP", "DATA", "TIME", "CODE", "VAR", "SAMP", "KBD", "SUB", "SUP", "I", "B",
    "U", "MARK", "BDI", "BDO", "SPAN", "BR", "WBR", "INS", "DEL", "PICTURE", "PARAM", "TRACK",
    "MAP", "TABLE", "CAPTION", "COLGROUP", "COL", "TBODY", "THEAD", "TFOOT", "TR", "TD", "TH",
    "SELECT", "DATALIST", "OPTGROUP", "OPTION", "OUTPUT", "PROGRESS", "METER", "FIELDSET",
    "LEGEND", "DETAILS", "SUMMARY", "MENU", "DIALOG", "SLOT", "CANVAS", "FONT", "CENTER",
    "ACRONYM", "BASEFONT", "BIG", "DIR", "HGROUP", "STRIKE", "TT",
];

const ALLOWED_GLOBAL_ATTRIBUTES: &[&str] = &[
    "align", "alt", "autocapitalize", "autocomplete", "autocorrect", "autofocus", "autoplay",
    "bgcolor", "border", "cellpadding", "cellspacing", "checked", "color", "cols", "colspan",
    "controls", "controlslist", "coords", "crossorigin", "datetime", "disabled", "download",
    "draggable", "enctype", "face", "formenctype", "frameborder", "height", "hidden", "hreflang",
    "inert", "ismap", "itemid", "itemprop", "itemref", "itemscope", "itemtype", "label", "lang",
    "loop", "max", "maxlength", "media", "min", "minlength", "multiple", "muted", "nonce", "open",
    "placeholder", "playsinline", "preload", "rel", "required", "reversed", "role", "rows",
    "rowspan", "selected", "shape", "size", "sizes", "slot", "span", "spellcheck", "start",
    "step", "summary", "title", "translate", "type", "valign", "value", "width", "wrap",
];

const ALLOWED_ATTRIBUTE_PREFIXES: &[&str] = &["aria-"];

/// `rel` values for which `<link href>` is kept.
const LINK_RELS: &[&str] = &[
    "alternate", "author", "bookmark", "canonical", "cite", "help", "icon", "license", "next",
    "prefetch", "dns-prefetch", "prerender", "preconnect", "preload", "prev", "search",
    "subresource",
];

lazy_static::lazy_static! {
    /// Table used when no other table is configured.
    pub static ref DEFAULT_SANITIZER_TABLE: SanitizerTable = default_table();
}

fn strings(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn policy(action: AttributePolicyAction) -> AttributePolicy {
    AttributePolicy::new(action)
}

/// A policy that only applies while the attribute's own value is in `allowed`.
fn self_conditioned(attribute: &str, action: AttributePolicyAction, allowed: &[&str]) -> AttributePolicy {
    let mut conditions = AttributeConditions::new();
    conditions.insert(attribute.to_string(), strings(allowed));
    AttributePolicy::with_conditions(action, conditions)
}

fn default_table() -> SanitizerTable {
    use AttributePolicyAction::*;

    let mut element_policies: BTreeMap<String, BTreeMap<String, AttributePolicy>> = BTreeMap::new();
    let mut element = |name: &str, attributes: Vec<(&str, AttributePolicy)>| {
        element_policies.insert(
            name.to_string(),
            attributes
                .into_iter()
                .map(|(attribute, policy)| (attribute.to_string(), policy))
                .collect(),
        );
    };

    element("A", vec![("href", policy(KeepAndSanitizeUrl))]);
    element("AREA", vec![("href", policy(KeepAndSanitizeUrl))]);
    element("LINK", vec![{
        let mut conditions = AttributeConditions::new();
        conditions.insert("rel".to_string(), strings(LINK_RELS));
        ("href", AttributePolicy::with_conditions(KeepAndUseResourceUrlPolicy, conditions))
    }]);
    element(
        "SOURCE",
        vec![
            ("src", policy(KeepAndUseResourceUrlPolicy)),
            ("srcset", policy(KeepAndUseResourceUrlPolicyForSrcset)),
        ],
    );
    element(
        "IMG",
        vec![
            ("src", policy(KeepAndUseResourceUrlPolicy)),
            ("srcset", policy(KeepAndUseResourceUrlPolicyForSrcset)),
        ],
    );
    element("VIDEO", vec![("src", policy(KeepAndUseResourceUrlPolicy))]);
    element("AUDIO", vec![("src", policy(KeepAndUseResourceUrlPolicy))]);

    let mut global_attribute_policies = BTreeMap::new();
    global_attribute_policies.insert("dir".to_string(), self_conditioned("dir", KeepAndNormalize, &["auto", "ltr", "rtl"]));
    global_attribute_policies.insert("async".to_string(), self_conditioned("async", KeepAndNormalize, &["async"]));
    global_attribute_policies.insert("cite".to_string(), policy(KeepAndSanitizeUrl));
    global_attribute_policies.insert("loading".to_string(), self_conditioned("loading", KeepAndNormalize, &["eager", "lazy"]));
    global_attribute_policies.insert("poster".to_string(), policy(KeepAndSanitizeUrl));
    global_attribute_policies.insert("target".to_string(), self_conditioned("target", KeepAndNormalize, &["_self", "_blank"]));

    SanitizerTable::new(
        strings(ALLOWED_ELEMENTS),
        element_policies,
        strings(ALLOWED_GLOBAL_ATTRIBUTES),
        global_attribute_policies,
        strings(ALLOWED_ATTRIBUTE_PREFIXES),
    )
}

//! Integration tests for the sanitizer builders.

use citadel_sanitizer::{
    resource_url_policy, CssSanitizerBuilder, HtmlSanitizerBuilder, ResourceUrlPolicyHints, SanitizerConfig,
    SanitizerError, DEFAULT_SANITIZER_TABLE,
};
use pretty_assertions::assert_eq;
use url::Url;

#[test]
fn test_build_twice_is_an_error() {
    let mut builder = HtmlSanitizerBuilder::new();
    builder.build().unwrap();
    assert!(matches!(builder.build(), Err(SanitizerError::AlreadyBuilt)));
}

#[test]
fn test_only_allow_elements_is_monotonic() {
    let mut builder = HtmlSanitizerBuilder::new();
    builder.only_allow_elements(["p", "a", "b"]).unwrap();
    builder.only_allow_elements(["p", "a"]).unwrap();
    assert!(matches!(
        builder.only_allow_elements(["p", "b"]),
        Err(SanitizerError::ElementNotAllowed(name)) if name == "B"
    ));
    assert!(matches!(
        HtmlSanitizerBuilder::new().only_allow_elements(["script"]),
        Err(SanitizerError::ElementNotAllowed(_))
    ));
    assert!(matches!(
        HtmlSanitizerBuilder::new().only_allow_elements(["form"]),
        Err(SanitizerError::ElementNotAllowed(_))
    ));

    let sanitizer = builder.build().unwrap();
    assert_eq!(
        sanitizer.sanitize("<p><b>bold</b><a href=\"/x\">link</a><i>i</i></p>").as_str(),
        "<p><a href=\"/x\">link</a></p>"
    );
}

#[test]
fn test_only_allow_attributes_is_monotonic() {
    let mut builder = HtmlSanitizerBuilder::new();
    builder.only_allow_attributes(["title", "href", "aria-label"]).unwrap();
    assert!(matches!(
        builder.only_allow_attributes(["alt"]),
        Err(SanitizerError::AttributeNotAllowed(name)) if name == "alt"
    ));
    assert!(matches!(
        HtmlSanitizerBuilder::new().only_allow_attributes(["onclick"]),
        Err(SanitizerError::AttributeNotAllowed(_))
    ));

    let sanitizer = builder.build().unwrap();
    assert_eq!(
        sanitizer
            .sanitize("<a href=\"/x\" title=\"t\" lang=\"en\" aria-label=\"l\" aria-hidden=\"true\">x</a>")
            .as_str(),
        "<a href=\"/x\" title=\"t\" aria-label=\"l\">x</a>"
    );
}

#[test]
fn test_narrowing_leaves_default_table_untouched() {
    let mut builder = HtmlSanitizerBuilder::new();
    builder.only_allow_elements(["p"]).unwrap().only_allow_attributes(["title"]).unwrap();
    assert!(DEFAULT_SANITIZER_TABLE.is_allowed_element("DIV"));
    assert!(!builder.table().is_allowed_element("DIV"));
}

#[test]
fn test_carve_outs() {
    let mut builder = HtmlSanitizerBuilder::new();
    builder
        .allow_data_attributes(["data-role"])
        .unwrap()
        .allow_class_attributes()
        .allow_id_attributes()
        .allow_id_reference_attributes()
        .allow_style_attributes();
    assert!(matches!(
        builder.allow_data_attributes(["role"]),
        Err(SanitizerError::InvalidDataAttribute(_))
    ));

    let sanitizer = builder.build().unwrap();
    assert_eq!(
        sanitizer
            .sanitize("<div id=\"i\" class=\"c\" data-role=\"r\" data-other=\"o\" aria-labelledby=\"i\" style=\"color: red\">x</div>")
            .as_str(),
        "<div id=\"i\" class=\"c\" data-role=\"r\" aria-labelledby=\"i\" style=\"color: red\">x</div>"
    );
}

#[test]
fn test_custom_element() {
    let mut builder = HtmlSanitizerBuilder::new();
    builder.allow_custom_element("my-card", ["heading"]).unwrap();
    assert!(matches!(
        builder.allow_custom_element("card", ["heading"]),
        Err(SanitizerError::InvalidCustomElement(_))
    ));
    let sanitizer = builder.build().unwrap();
    assert_eq!(
        sanitizer.sanitize("<my-card heading=\"h\" onclick=\"x\" title=\"t\">x</my-card>").as_str(),
        "<my-card heading=\"h\" title=\"t\">x</my-card>"
    );
}

#[test]
fn test_resource_url_policy_from_builder() {
    let policy = resource_url_policy(|url: &Url, hints: &ResourceUrlPolicyHints<'_>| match hints {
        ResourceUrlPolicyHints::HtmlAttribute { tag_name: "IMG", attribute_name: "src" } => {
            (url.scheme() == "https").then(|| url.clone())
        }
        _ => None,
    });
    let mut builder = HtmlSanitizerBuilder::new();
    builder.with_resource_url_policy(policy);
    let sanitizer = builder.build().unwrap();

    assert_eq!(
        sanitizer.sanitize("<img src=\"https://example.com/a.png\">").as_str(),
        "<img src=\"https://example.com/a.png\">"
    );
    assert_eq!(sanitizer.sanitize("<img src=\"http://example.com/a.png\">").as_str(), "<img>");
}

#[test]
fn test_css_builder() {
    let mut builder = CssSanitizerBuilder::new();
    builder.allow_inline_styles().allow_transitions();
    let sanitizer = builder.build().unwrap();
    assert!(matches!(builder.build(), Err(SanitizerError::AlreadyBuilt)));

    assert_eq!(
        sanitizer
            .sanitize("<style>:host { color: red } .a { transition: color 1s; animation: spin 1s }</style>")
            .as_str(),
        "<style>.a { transition: color 1s; }</style>"
    );
    assert_eq!(
        sanitizer.sanitize("<span style=\"color: red; position: fixed\">x</span>").as_str(),
        "<span style=\"color: red;\">x</span>"
    );
}

#[test]
fn test_css_builder_url_policy_and_base() {
    let policy = resource_url_policy(|url: &Url, hints: &ResourceUrlPolicyHints<'_>| match hints {
        ResourceUrlPolicyHints::StyleElement { .. } | ResourceUrlPolicyHints::StyleAttribute { .. } => {
            Url::parse(&format!("https://proxy.example/?u={}", url.path())).ok()
        }
        ResourceUrlPolicyHints::HtmlAttribute { .. } => Some(url.clone()),
    });
    let mut builder = CssSanitizerBuilder::new();
    builder
        .allow_inline_styles()
        .with_resource_url_policy(policy)
        .with_config(SanitizerConfig::with_base_url("https://example.com/").unwrap());
    let sanitizer = builder.build().unwrap();

    assert_eq!(
        sanitizer.sanitize("<p style=\"background-image: url(a.png)\">x</p>").as_str(),
        "<p style=\"background-image: url(&quot;https://proxy.example/?u=/a.png&quot;);\">x</p>"
    );
}

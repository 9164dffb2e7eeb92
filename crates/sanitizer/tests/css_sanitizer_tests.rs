//! Integration tests for style sheet and `style` attribute sanitizing.

use std::collections::HashSet;
use std::sync::Arc;

use citadel_sanitizer::css::{
    discard_transitions, sanitize_style_attribute, sanitize_style_element, DEFAULT_FUNCTION_ALLOWLIST,
    DEFAULT_PROPERTY_ALLOWLIST,
};
use citadel_sanitizer::{resource_url_policy, CssSanitizer, PropertyDiscarder, ResourceUrlPolicyHints};
use pretty_assertions::assert_eq;
use url::Url;

fn sanitize_sheet(css: &str) -> String {
    sanitize_style_element(
        css,
        &DEFAULT_PROPERTY_ALLOWLIST,
        &DEFAULT_FUNCTION_ALLOWLIST,
        None,
        false,
        &[],
    )
}

#[test]
fn test_host_selectors_are_dropped() {
    for selector in [":host", ":host(div)", ":host-context(div)", ":HOST", ":Host(div)", ":HOST-CONTEXT(div)"] {
        let css = format!("{} {{ color: red }}", selector);
        assert_eq!(sanitize_sheet(&css), "", "selector {}", selector);
    }
    assert_eq!(
        sanitize_sheet(":host { color: red } p { color: blue }"),
        "p { color: blue; }"
    );
}

#[test]
fn test_properties_are_sorted() {
    assert_eq!(
        sanitize_sheet("body { color: red; background-color: green }"),
        "body { background-color: green; color: red; }"
    );
    assert_eq!(
        sanitize_style_attribute(
            "color: red; background-color: green",
            &DEFAULT_PROPERTY_ALLOWLIST,
            &DEFAULT_FUNCTION_ALLOWLIST,
            None,
            &[],
        ),
        "background-color: green;color: red;"
    );
}

#[test]
fn test_rules_are_kept_in_order() {
    assert_eq!(
        sanitize_sheet("b { color: red } a { color: blue }"),
        "b { color: red; }\na { color: blue; }"
    );
}

#[test]
fn test_disallowed_properties_are_dropped() {
    assert_eq!(
        sanitize_sheet("div { position: fixed; z-index: 9999; color: red; behavior: url(x.htc) }"),
        "div { color: red; }"
    );
}

#[test]
fn test_null_url_policy_drops_value() {
    let policy = resource_url_policy(|_: &Url, _: &ResourceUrlPolicyHints<'_>| None);
    let out = sanitize_style_element(
        "body { background-image: url(\"https://www.google.com\") }",
        &DEFAULT_PROPERTY_ALLOWLIST,
        &DEFAULT_FUNCTION_ALLOWLIST,
        Some(&policy),
        false,
        &[],
    );
    assert_eq!(out, "body {  }");
}

#[test]
fn test_rewriting_url_policy_is_quoted() {
    let policy = resource_url_policy(|_: &Url, hints: &ResourceUrlPolicyHints<'_>| {
        assert_eq!(
            *hints,
            ResourceUrlPolicyHints::StyleElement { property_name: "background-image" }
        );
        Url::parse("https://www.example.com/proxy?u=1").ok()
    });
    let out = sanitize_style_element(
        "body { background-image: url(\"https://www.google.com\") }",
        &DEFAULT_PROPERTY_ALLOWLIST,
        &DEFAULT_FUNCTION_ALLOWLIST,
        Some(&policy),
        false,
        &[],
    );
    assert_eq!(
        out,
        "body { background-image: url(\"https://www.example.com/proxy?u=1\"); }"
    );
}

#[test]
fn test_keyframes_follow_flag() {
    let css = "@keyframes spin { from { transform: rotate(0deg) } 50%, to { opacity: 0.5 } }";
    assert_eq!(sanitize_sheet(css), "");

    let out = sanitize_style_element(
        css,
        &DEFAULT_PROPERTY_ALLOWLIST,
        &DEFAULT_FUNCTION_ALLOWLIST,
        None,
        true,
        &[],
    );
    assert_eq!(
        out,
        "@keyframes spin { from { transform: rotate(0deg); } 50%, to { opacity: 0.5; } }"
    );
}

#[test]
fn test_unsupported_at_rules_are_dropped() {
    assert_eq!(
        sanitize_sheet("@import url(\"x.css\"); @media print { a { color: red } } p { color: blue }"),
        "p { color: blue; }"
    );
}

#[test]
fn test_discarders_only_veto() {
    let discarders: Vec<PropertyDiscarder> = vec![Arc::new(discard_transitions)];
    let out = sanitize_style_attribute(
        "transition: all 1s; color: red; position: absolute",
        &DEFAULT_PROPERTY_ALLOWLIST,
        &DEFAULT_FUNCTION_ALLOWLIST,
        None,
        &discarders,
    );
    assert_eq!(out, "color: red;");

    let called = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen = Arc::clone(&called);
    let recording: PropertyDiscarder = Arc::new(move |property: &str| {
        if let Ok(mut seen) = seen.lock() {
            seen.push(property.to_string());
        }
        false
    });
    sanitize_style_attribute(
        "position: absolute; color: red",
        &DEFAULT_PROPERTY_ALLOWLIST,
        &DEFAULT_FUNCTION_ALLOWLIST,
        None,
        &[recording],
    );
    assert_eq!(*called.lock().unwrap(), vec!["color".to_string()]);
}

#[test]
fn test_custom_allowlists() {
    let properties: HashSet<String> = ["width"].iter().map(|s| s.to_string()).collect();
    let functions: HashSet<String> = HashSet::new();
    let out = sanitize_style_attribute("width: calc(1px + 2px); color: red", &properties, &functions, None, &[]);
    assert_eq!(out, "");
    let out = sanitize_style_attribute("width: 10px; color: red", &properties, &functions, None, &[]);
    assert_eq!(out, "width: 10px;");
}

#[test]
fn test_css_sanitizer_with_base_url_and_policy() {
    let policy = resource_url_policy(|url: &Url, hints: &ResourceUrlPolicyHints<'_>| {
        assert!(matches!(hints, ResourceUrlPolicyHints::StyleAttribute { .. }));
        (url.host_str() == Some("example.com")).then(|| url.clone())
    });
    let sanitizer = CssSanitizer::default()
        .with_base_url(Url::parse("https://example.com/css/").ok())
        .with_resource_url_policy(policy);

    assert_eq!(
        sanitizer.sanitize_style_attribute("background-image: url(img/a.png)"),
        "background-image: url(\"https://example.com/css/img/a.png\");"
    );
    assert_eq!(
        sanitizer.sanitize_style_attribute("background-image: url(https://evil.example/a.png)"),
        ""
    );
}

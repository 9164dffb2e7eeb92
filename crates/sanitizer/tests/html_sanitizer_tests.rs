//! Integration tests for the HTML sanitizer.

use std::io::ErrorKind;
use std::net::TcpListener;

use citadel_sanitizer::{
    sanitize_html, sanitize_html_assert_unchanged, CssSanitizerBuilder, HtmlSanitizer, SanitizerConfig,
    SanitizerError, SanitizerTable, DEFAULT_SANITIZER_TABLE, INVALID_URL,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_javascript_href_becomes_inert() {
    assert_eq!(
        sanitize_html("<a href=\"javascript:evil()\">x</a>").as_str(),
        "<a href=\"about:invalid#zClosurez\">x</a>"
    );
}

#[test]
fn test_nested_markup_keeps_text() {
    let html = "<article><h1>Title</h1><p>Some <em>nested <b>text</b></em> here</p><ul><li>one</li></ul></article>";
    assert_eq!(sanitize_html(html).as_str(), html);
}

#[test]
fn test_unparseable_javascript_href_becomes_inert() {
    assert_eq!(
        sanitize_html("<a href=\"javascript://a<b/%0aalert(1)\">x</a>").as_str(),
        format!("<a href=\"{}\">x</a>", INVALID_URL)
    );
}

#[test]
fn test_safe_urls_are_kept() {
    for href in ["https://example.com/", "mailto:a@example.com", "/relative", "#top", "ftp://example.com/f"] {
        let html = format!("<a href=\"{}\">x</a>", href);
        assert_eq!(sanitize_html(&html).as_str(), html);
    }
    assert_eq!(
        sanitize_html("<a href=\"vbscript:x\">x</a>").as_str(),
        format!("<a href=\"{}\">x</a>", INVALID_URL)
    );
}

#[test]
fn test_form_is_always_removed() {
    assert_eq!(
        sanitize_html("<p>a</p><form name=\"f\"><input name=\"x\"></form><p>b</p>").as_str(),
        "<p>a</p><p>b</p>"
    );

    // Even a table that lists FORM cannot allow it.
    let json = r#"{"allowedElements": ["FORM", "P"], "allowedGlobalAttributes": ["name"]}"#;
    let table = SanitizerTable::from_json(json).unwrap();
    let sanitizer = HtmlSanitizer::new(table);
    assert_eq!(sanitizer.sanitize("<form name=\"f\">x</form><p name=\"p\">y</p>").as_str(), "<p name=\"p\">y</p>");
}

#[test]
fn test_dangerous_elements_are_removed_with_content() {
    let html = "<div>\
        <script>alert(1)</script>\
        <style>body { display: none }</style>\
        <iframe src=\"https://evil.example\"></iframe>\
        <object data=\"x\"></object>\
        <svg><script>alert(2)</script></svg>\
        <math><mi>x</mi></math>\
        ok</div>";
    assert_eq!(sanitize_html(html).as_str(), "<div>ok</div>");
}

#[test]
fn test_event_handlers_are_removed() {
    assert_eq!(
        sanitize_html("<img src=\"a.png\" onerror=\"alert(1)\" alt=\"pic\">").as_str(),
        "<img src=\"a.png\" alt=\"pic\">"
    );
}

#[test]
fn test_noscript_content_is_sanitized() {
    // `noscript` is not allowed, and its content is markup rather than text.
    assert_eq!(
        sanitize_html("<noscript><p title=\"</noscript><img src=x onerror=alert(1)>\"></p></noscript>").as_str(),
        ""
    );
}

#[test]
fn test_strict_mode_reports_changes() {
    assert_eq!(
        sanitize_html_assert_unchanged("<p title=\"t\">hello <b>world</b></p>")
            .unwrap()
            .as_str(),
        "<p title=\"t\">hello <b>world</b></p>"
    );

    let err = sanitize_html_assert_unchanged("<a href=\"javascript:x\" onclick=\"y\">z</a><script></script>")
        .unwrap_err();
    let SanitizerError::UnexpectedChange { input, output, changes } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(input, "<a href=\"javascript:x\" onclick=\"y\">z</a><script></script>");
    assert_eq!(output, &format!("<a href=\"{}\">z</a>", INVALID_URL));
    assert_eq!(changes.len(), 3);
    assert!(err.to_string().starts_with("Unexpected change to string: "));
}

#[test]
fn test_sanitizing_is_idempotent_for_known_cases() {
    let inputs = [
        "<a href=\"javascript:evil()\">x</a>",
        "<table><td>cell</table>",
        "<b><p>x</b>y</p>",
        "<ul><li>1<li>2</ul>",
        "<p dir=\"RTL\" title='a \"q\" &amp; b'>t &lt; u</p>",
        "<img srcset=\"a.png 1x, b.png 2x\" src=\"c.png\">",
        "<template><b>t</b></template>",
    ];
    for input in inputs {
        let once = sanitize_html(input);
        let twice = sanitize_html(once.as_str());
        assert_eq!(once, twice, "input {}", input);
    }
}

#[test]
fn test_sanitizing_never_loads_resources() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();

    let html = format!(
        "<img src=\"http://127.0.0.1:{port}/a.png\" srcset=\"http://127.0.0.1:{port}/b.png 2x\">\
         <video src=\"http://127.0.0.1:{port}/v\" poster=\"http://127.0.0.1:{port}/p\"></video>\
         <link rel=\"preload\" href=\"http://127.0.0.1:{port}/l\">\
         <style>body {{ background: url(http://127.0.0.1:{port}/s) }}</style>\
         <img src=ftp://attacker.example>"
    );
    let _ = sanitize_html(&html);
    let css_sanitizer = CssSanitizerBuilder::new().allow_inline_styles().build().unwrap();
    let _ = css_sanitizer.sanitize(&html);

    match listener.accept() {
        Err(err) => assert_eq!(err.kind(), ErrorKind::WouldBlock),
        Ok((_, addr)) => panic!("sanitizing opened a connection from {addr}"),
    }
}

#[test]
fn test_depth_limit_from_config() {
    let config = SanitizerConfig {
        max_depth: 3,
        ..SanitizerConfig::default()
    };
    let sanitizer = HtmlSanitizer::new(DEFAULT_SANITIZER_TABLE.clone()).with_config(config);
    let html = format!("{}x{}", "<div>".repeat(5), "</div>".repeat(5));
    assert_eq!(sanitizer.sanitize(&html).as_str(), "<div><div><div></div></div></div>");
}

#[test]
fn test_table_loaded_from_json() {
    let json = r#"{
        "allowedElements": ["P"],
        "elementPolicies": {
            "A": { "href": { "action": "KEEP_AND_SANITIZE_URL" } }
        },
        "globalAttributePolicies": {
            "dir": {
                "action": "KEEP_AND_NORMALIZE",
                "conditions": { "dir": ["ltr", "rtl"] }
            }
        }
    }"#;
    let sanitizer = HtmlSanitizer::new(SanitizerTable::from_json(json).unwrap());
    assert_eq!(
        sanitizer
            .sanitize("<p dir=\"LTR\"><a href=\"javascript:x\" dir=\"up\">a</a><b>b</b></p>")
            .as_str(),
        format!("<p dir=\"ltr\"><a href=\"{}\">a</a></p>", INVALID_URL)
    );
}

/// Well-formed markup over phrasing elements the tree builder never repairs.
fn markup() -> impl Strategy<Value = String> {
    let text = "[a-z <>&\"]{0,8}".prop_map(|t| {
        t.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
    });
    let leaf = prop_oneof![
        text,
        Just("<br>".to_string()),
        Just("<img src=\"javascript:x\" alt=\"a\">".to_string()),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        let tag = prop::sample::select(vec!["span", "em", "code", "script", "custom-el", "a"]);
        let attribute = prop::sample::select(vec![
            "",
            " title=\"t\"",
            " onclick=\"x()\"",
            " href=\"javascript:alert(1)\"",
            " dir=\"RTL\"",
            " style=\"color: red\"",
        ]);
        (tag, attribute, prop::collection::vec(inner, 0..4)).prop_map(|(tag, attribute, children)| {
            let children = if tag == "a" {
                children.iter().map(|c| c.replace("<a", "<span").replace("</a>", "</span>")).collect()
            } else {
                children.concat()
            };
            format!("<{tag}{attribute}>{children}</{tag}>")
        })
    })
}

proptest! {
    #[test]
    fn test_sanitizing_is_idempotent(html in markup()) {
        let once = sanitize_html(&html);
        let twice = sanitize_html(once.as_str());
        prop_assert_eq!(&once, &twice);
        prop_assert!(sanitize_html_assert_unchanged(once.as_str()).is_ok());
    }
}

#![no_main]
//! Fuzzes the HTML sanitizer.
//!
//! Sanitizing must never panic, and sanitizing sanitized output must not
//! change it again.

use citadel_sanitizer::{sanitize_html, CssSanitizerBuilder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Skip excessively large inputs to prevent timeout
    if data.len() > 50_000 {
        return;
    }
    let html = String::from_utf8_lossy(data);

    let once = sanitize_html(&html);
    let twice = sanitize_html(once.as_str());
    assert_eq!(once, twice, "sanitizing is not idempotent for {:?}", html);

    if let Ok(sanitizer) = CssSanitizerBuilder::new().allow_inline_styles().allow_animations().build() {
        let _ = sanitizer.sanitize(&html);
    }
});

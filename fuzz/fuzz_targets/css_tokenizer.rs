#![no_main]
//! Fuzzes the CSS tokenizer against the serializer.
//!
//! Serializing a token sequence and tokenizing the result must give back the
//! same tokens, modulo merged whitespace.

use citadel_sanitizer::css::{normalize_tokens, serialize_tokens, tokenize_css};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(css) = std::str::from_utf8(data) else {
        return;
    };
    // Limit input size to prevent excessive resource usage
    if css.len() > 10_000 {
        return;
    }

    let tokens = tokenize_css(css);
    let serialized = serialize_tokens(&tokens);
    let reparsed = tokenize_css(&serialized);
    assert_eq!(
        normalize_tokens(&tokens),
        normalize_tokens(&reparsed),
        "round trip changed tokens of {:?} (serialized as {:?})",
        css,
        serialized
    );
});

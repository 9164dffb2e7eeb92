//! CSS tokenization, serialization and sanitization.

pub mod allowlist;
pub mod parser;
pub mod sanitizer;
pub mod serializer;
pub mod token;
pub mod tokenizer;

pub use allowlist::{
    discard_animations, discard_transitions, DEFAULT_FUNCTION_ALLOWLIST, DEFAULT_PROPERTY_ALLOWLIST,
};
pub use parser::{parse_declaration_list, parse_stylesheet, CssDeclaration, CssDeclarationBlock, CssRule, KeyframeRule};
pub use sanitizer::{sanitize_style_attribute, sanitize_style_element, CssSanitizer, PropertyDiscarder, StyleSanitizer};
pub use serializer::{escape_ident, escape_name, escape_string, serialize_token, serialize_tokens};
pub use token::{normalize_tokens, CssToken};
pub use tokenizer::{tokenize_css, CssTokenizer};

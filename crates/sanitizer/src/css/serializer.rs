//! Writes tokens back out as CSS.
//!
//! For every token list produced by [`tokenize_css`](super::tokenizer::tokenize_css),
//! tokenizing the serialized output yields the same tokens again, modulo
//! runs of whitespace.

use std::fmt::Write;

use super::token::CssToken;

/// Serializes a token list.
///
/// An ident or function starting with `--` right after a `!` delimiter gets
/// its first hyphen escaped so `<!--` can never be formed. A dimension with
/// the bare unit `e` followed by a `+` number gets its unit escaped so the
/// pair is not read back as one exponent number.
pub fn serialize_tokens(tokens: &[CssToken]) -> String {
    let mut out = String::new();
    let mut previous: Option<&CssToken> = None;

    for (i, token) in tokens.iter().enumerate() {
        let after_bang = matches!(previous, Some(CssToken::Delim('!')));
        let before_plus = tokens.get(i + 1).is_some_and(starts_with_plus);
        match token {
            CssToken::Dimension { repr, unit } if before_plus && unit.eq_ignore_ascii_case("e") => {
                out.push_str(repr);
                for c in unit.chars() {
                    push_hex_escape(&mut out, c);
                }
            }
            CssToken::Ident(name) if after_bang && name.starts_with("--") => {
                out.push_str("\\2d ");
                out.push_str(&escape_name(&name[1..]));
            }
            CssToken::Function(name) if after_bang && name.starts_with("--") => {
                out.push_str("\\2d ");
                out.push_str(&escape_name(&name[1..]));
                out.push('(');
            }
            _ => out.push_str(&serialize_token(token)),
        }
        previous = Some(token);
    }
    out
}

/// Serializes a single token.
pub fn serialize_token(token: &CssToken) -> String {
    match token {
        CssToken::Ident(name) => escape_ident(name),
        CssToken::Function(name) => format!("{}(", escape_ident(name)),
        CssToken::AtKeyword(name) => format!("@{}", escape_ident(name)),
        CssToken::Hash(name) => format!("#{}", escape_name(name)),
        CssToken::String(value) => escape_string(value),
        CssToken::Number(repr) => repr.clone(),
        CssToken::Percentage(repr) => format!("{}%", repr),
        CssToken::Dimension { repr, unit } => format!("{}{}", repr, escape_unit(unit)),
        CssToken::Delim('\\') => "\\\n".to_string(),
        CssToken::Delim(c) => c.to_string(),
        CssToken::Whitespace => " ".to_string(),
        CssToken::Colon => ":".to_string(),
        CssToken::Semicolon => ";".to_string(),
        CssToken::Comma => ",".to_string(),
        CssToken::OpenSquare => "[".to_string(),
        CssToken::CloseSquare => "]".to_string(),
        CssToken::OpenParen => "(".to_string(),
        CssToken::CloseParen => ")".to_string(),
        CssToken::OpenCurly => "{".to_string(),
        CssToken::CloseCurly => "}".to_string(),
        CssToken::Cdo => "<!--".to_string(),
        CssToken::Cdc => "-->".to_string(),
        CssToken::Eof => String::new(),
    }
}

/// Escapes `ident` so it is read back as a single identifier.
pub fn escape_ident(ident: &str) -> String {
    match ident {
        "-" => return "\\-".to_string(),
        // Unescaped, a `>` following `--` would start a CDC token.
        "--" => return "-\\2d ".to_string(),
        _ => {}
    }

    let starts_with_hyphen = ident.starts_with('-');
    let mut out = String::with_capacity(ident.len());
    for (i, c) in ident.chars().enumerate() {
        let ambiguous_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && starts_with_hyphen));
        if ambiguous_digit || !is_plain_name_char(c) {
            push_hex_escape(&mut out, c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Escapes every code point outside ASCII `[A-Za-z0-9_-]`.
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_plain_name_char(c) {
            out.push(c);
        } else {
            push_hex_escape(&mut out, c);
        }
    }
    out
}

/// Double-quotes `value`, escaping control characters and `"'\<>&`.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c.is_control() || matches!(c, '"' | '\'' | '\\' | '<' | '>' | '&') {
            push_hex_escape(&mut out, c);
        } else {
            out.push(c);
        }
    }
    out.push('"');
    out
}

/// Units starting like an exponent (`e5`, `e-5`) would be read back as part
/// of the number, so their leading `e` is escaped.
fn escape_unit(unit: &str) -> String {
    let mut chars = unit.chars();
    let first = chars.next();
    let rest: Vec<char> = chars.take(2).collect();
    let exponent_like = matches!(first, Some('e' | 'E'))
        && match rest.as_slice() {
            [d, ..] if d.is_ascii_digit() => true,
            ['-' | '+', d, ..] if d.is_ascii_digit() => true,
            _ => false,
        };

    if let (true, Some(e)) = (exponent_like, first) {
        let mut out = String::new();
        push_hex_escape(&mut out, e);
        out.push_str(&escape_name(&unit[1..]));
        out
    } else {
        escape_ident(unit)
    }
}

fn starts_with_plus(token: &CssToken) -> bool {
    match token {
        CssToken::Number(repr) | CssToken::Percentage(repr) | CssToken::Dimension { repr, .. } => repr.starts_with('+'),
        _ => false,
    }
}

fn is_plain_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn push_hex_escape(out: &mut String, c: char) {
    let _ = write!(out, "\\{:x} ", c as u32);
}

//! Rule and declaration structure of style sheets, built on `cssparser`.
//!
//! This layer only recovers structure: selector text, property names, raw
//! value text and `!important`. Every sanitization decision is made later on
//! the output of [`tokenize_css`](super::tokenizer::tokenize_css).

use std::collections::BTreeMap;

use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};

/// A single declaration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssDeclaration {
    /// Raw value text, trimmed, without `!important`.
    pub value: String,
    pub important: bool,
}

/// Declarations keyed by property name, iterated in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssDeclarationBlock {
    declarations: BTreeMap<String, CssDeclaration>,
}

impl CssDeclarationBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration with cascade semantics: a later declaration replaces
    /// an earlier one unless only the earlier one is `!important`.
    pub fn set(&mut self, name: &str, value: String, important: bool) {
        let name = if name.starts_with("--") {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };
        if let Some(existing) = self.declarations.get(&name) {
            if existing.important && !important {
                return;
            }
        }
        self.declarations.insert(name, CssDeclaration { value, important });
    }

    pub fn get(&self, name: &str) -> Option<&CssDeclaration> {
        self.declarations.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CssDeclaration)> {
        self.declarations.iter().map(|(name, decl)| (name.as_str(), decl))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// One keyframe of an `@keyframes` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyframeRule {
    pub key_text: String,
    pub style: CssDeclarationBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRule {
    Style {
        selector: String,
        style: CssDeclarationBlock,
    },
    Keyframes {
        /// Raw prelude text after `@keyframes`.
        name: String,
        keyframes: Vec<KeyframeRule>,
    },
    /// Any other at-rule; kept only so callers can log what was dropped.
    Unsupported {
        name: String,
    },
}

type RuleParseResult<'i, T> = Result<T, ParseError<'i, ()>>;

/// Parses a style sheet into its top-level rules. Never fails: malformed
/// rules are skipped.
pub fn parse_stylesheet(css: &str) -> Vec<CssRule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();

    loop {
        parser.skip_whitespace();
        let state = parser.state();
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::CDO | Token::CDC => {}
            Token::AtKeyword(name) => {
                if let Some(rule) = parse_at_rule(&mut parser, &name) {
                    rules.push(rule);
                }
            }
            _ => {
                parser.reset(&state);
                if let Some(rule) = parse_style_rule(&mut parser) {
                    rules.push(rule);
                }
            }
        }
    }

    rules
}

/// Parses the contents of a `style` attribute.
pub fn parse_declaration_list(css: &str) -> CssDeclarationBlock {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_declarations(&mut parser)
}

fn parse_style_rule(parser: &mut Parser<'_, '_>) -> Option<CssRule> {
    let selector = consume_prelude(parser, Delimiter::CurlyBracketBlock);
    let style = consume_declaration_block(parser)?;
    Some(CssRule::Style { selector, style })
}

fn parse_at_rule(parser: &mut Parser<'_, '_>, name: &str) -> Option<CssRule> {
    let prelude = consume_prelude(parser, Delimiter::CurlyBracketBlock | Delimiter::Semicolon);

    if !name.eq_ignore_ascii_case("keyframes") {
        let _ = parser.next();
        return Some(CssRule::Unsupported {
            name: name.to_string(),
        });
    }

    match parser.next() {
        Ok(Token::CurlyBracketBlock) => {}
        _ => {
            return Some(CssRule::Unsupported {
                name: name.to_string(),
            })
        }
    }

    let keyframes = parser
        .parse_nested_block(|p| Ok::<_, ParseError<'_, ()>>(parse_keyframe_list(p)))
        .unwrap_or_default();

    Some(CssRule::Keyframes {
        name: prelude,
        keyframes,
    })
}

fn parse_keyframe_list(parser: &mut Parser<'_, '_>) -> Vec<KeyframeRule> {
    let mut keyframes = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        let key_text = consume_prelude(parser, Delimiter::CurlyBracketBlock);
        match consume_declaration_block(parser) {
            Some(style) => keyframes.push(KeyframeRule { key_text, style }),
            None => break,
        }
    }
    keyframes
}

/// Consumes everything up to `delimiters` and returns the trimmed source text.
fn consume_prelude(parser: &mut Parser<'_, '_>, delimiters: cssparser::Delimiters) -> String {
    let start = parser.position();
    let _ = parser.parse_until_before(delimiters, |p| {
        while p.next().is_ok() {}
        Ok::<_, ParseError<'_, ()>>(())
    });
    parser.slice_from(start).trim().to_string()
}

/// Expects a `{}` block next and parses it as declarations.
fn consume_declaration_block(parser: &mut Parser<'_, '_>) -> Option<CssDeclarationBlock> {
    match parser.next() {
        Ok(Token::CurlyBracketBlock) => {}
        _ => return None,
    }
    let block = parser
        .parse_nested_block(|p| Ok::<_, ParseError<'_, ()>>(parse_declarations(p)))
        .unwrap_or_default();
    Some(block)
}

fn parse_declarations(parser: &mut Parser<'_, '_>) -> CssDeclarationBlock {
    let mut block = CssDeclarationBlock::new();
    loop {
        parser.skip_whitespace();
        let token = match parser.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Semicolon => {}
            Token::Ident(name) => {
                let result = parser.parse_until_after(Delimiter::Semicolon, parse_declaration_value);
                if let Ok((value, important)) = result {
                    block.set(&name, value, important);
                }
            }
            _ => {
                let _ = parser.parse_until_after(Delimiter::Semicolon, |p| {
                    while p.next().is_ok() {}
                    Ok::<_, ParseError<'_, ()>>(())
                });
            }
        }
    }
    block
}

/// Parses `: <value> [!important]` up to the end of the delimited input.
fn parse_declaration_value<'i>(parser: &mut Parser<'i, '_>) -> RuleParseResult<'i, (String, bool)> {
    parser.expect_colon()?;
    parser.skip_whitespace();

    let start = parser.position();
    let mut end = start;
    let mut important = false;

    loop {
        let before = parser.position();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        if token == Token::Delim('!') {
            let state = parser.state();
            let is_important = parser
                .try_parse(|p| p.expect_ident_matching("important"))
                .is_ok()
                && parser.is_exhausted();
            if is_important {
                important = true;
                end = before;
                break;
            }
            parser.reset(&state);
        }

        // Consume nested blocks now so `end` lands after their closing token.
        if matches!(
            token,
            Token::Function(_)
                | Token::ParenthesisBlock
                | Token::SquareBracketBlock
                | Token::CurlyBracketBlock
        ) {
            let _ = parser.parse_nested_block(|p| {
                while p.next_including_whitespace().is_ok() {}
                Ok::<_, ParseError<'_, ()>>(())
            });
        }
        end = parser.position();
    }

    let value = parser.slice(start..end).trim().to_string();
    Ok((value, important))
}

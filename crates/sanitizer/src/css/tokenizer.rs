//! CSS tokenizer following https://www.w3.org/TR/css-syntax-3/#tokenization
//! with the deviations the sanitizer depends on:
//!
//! - a comment run is emitted as one whitespace token so `:ho/**/st` can
//!   never turn into `:host` after re-serialization
//! - `url(...)` always becomes `Function("url")`, `String(..)`, `CloseParen`
//! - bad strings and bad urls become empty strings
//!
//! Every loop either advances the cursor or stops at EOF, so tokenizing is
//! linear in the input length.

use super::token::CssToken;

const REPLACEMENT_CHARACTER: char = '\u{FFFD}';
const MAX_CODE_POINT: u32 = 0x10FFFF;

#[derive(Debug)]
pub struct CssTokenizer {
    input: Vec<char>,
    pos: usize,
    tokens: Vec<CssToken>,
}

impl CssTokenizer {
    pub fn new(css: &str) -> Self {
        Self {
            input: preprocess(css),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Consumes the tokenizer and returns the token list, always ending with `Eof`.
    pub fn tokenize(mut self) -> Vec<CssToken> {
        while self.pos < self.input.len() {
            self.consume_token();
        }
        self.tokens.push(CssToken::Eof);
        self.tokens
    }

    fn emit(&mut self, token: CssToken) {
        if token.is_whitespace() && self.tokens.last().is_some_and(CssToken::is_whitespace) {
            return;
        }
        self.tokens.push(token);
    }

    /// Returns the next code point and advances the cursor.
    fn next_char(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Looks `offset` code points ahead of the cursor without consuming.
    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn reconsume(&mut self) {
        self.pos -= 1;
    }

    /// The code point consumed last, for checks that include it.
    fn current(&self) -> Option<char> {
        self.pos.checked_sub(1).and_then(|i| self.input.get(i).copied())
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-token
    fn consume_token(&mut self) {
        if self.peek(0) == Some('/') && self.peek(1) == Some('*') {
            self.consume_comments();
            self.emit(CssToken::Whitespace);
            return;
        }

        let Some(c) = self.next_char() else {
            return;
        };

        match c {
            c if is_whitespace(c) => {
                while self.peek(0).is_some_and(is_whitespace) {
                    self.next_char();
                }
                self.emit(CssToken::Whitespace);
            }
            '"' | '\'' => {
                let token = self.consume_string(c);
                self.emit(token);
            }
            '#' => {
                if self.peek(0).is_some_and(is_name_char) || is_valid_escape(self.peek(0), self.peek(1)) {
                    let name = self.consume_name();
                    self.emit(CssToken::Hash(name));
                } else {
                    self.emit(CssToken::Delim(c));
                }
            }
            '(' => self.emit(CssToken::OpenParen),
            ')' => self.emit(CssToken::CloseParen),
            ',' => self.emit(CssToken::Comma),
            ':' => self.emit(CssToken::Colon),
            ';' => self.emit(CssToken::Semicolon),
            '[' => self.emit(CssToken::OpenSquare),
            ']' => self.emit(CssToken::CloseSquare),
            '{' => self.emit(CssToken::OpenCurly),
            '}' => self.emit(CssToken::CloseCurly),
            '+' | '.' => {
                if starts_number(Some(c), self.peek(0), self.peek(1)) {
                    self.reconsume();
                    let token = self.consume_numeric();
                    self.emit(token);
                } else {
                    self.emit(CssToken::Delim(c));
                }
            }
            '-' => {
                if starts_number(Some(c), self.peek(0), self.peek(1)) {
                    self.reconsume();
                    let token = self.consume_numeric();
                    self.emit(token);
                } else if self.peek(0) == Some('-') && self.peek(1) == Some('>') {
                    self.pos += 2;
                    self.emit(CssToken::Cdc);
                } else if would_start_ident(Some(c), self.peek(0), self.peek(1)) {
                    self.reconsume();
                    self.consume_ident_like();
                } else {
                    self.emit(CssToken::Delim(c));
                }
            }
            '<' => {
                if self.peek(0) == Some('!') && self.peek(1) == Some('-') && self.peek(2) == Some('-') {
                    self.pos += 3;
                    self.emit(CssToken::Cdo);
                } else {
                    self.emit(CssToken::Delim(c));
                }
            }
            '@' => {
                if would_start_ident(self.peek(0), self.peek(1), self.peek(2)) {
                    let name = self.consume_name();
                    self.emit(CssToken::AtKeyword(name));
                } else {
                    self.emit(CssToken::Delim(c));
                }
            }
            '\\' => {
                if is_valid_escape(Some(c), self.peek(0)) {
                    self.reconsume();
                    self.consume_ident_like();
                } else {
                    self.emit(CssToken::Delim(c));
                }
            }
            c if c.is_ascii_digit() => {
                self.reconsume();
                let token = self.consume_numeric();
                self.emit(token);
            }
            c if is_name_start_char(c) => {
                self.reconsume();
                self.consume_ident_like();
            }
            c => self.emit(CssToken::Delim(c)),
        }
    }

    /// Consumes back-to-back comments. An unterminated comment runs to EOF.
    fn consume_comments(&mut self) {
        while self.peek(0) == Some('/') && self.peek(1) == Some('*') {
            self.pos += 2;
            loop {
                match self.next_char() {
                    Some('*') if self.peek(0) == Some('/') => {
                        self.pos += 1;
                        break;
                    }
                    Some(_) => {}
                    None => return,
                }
            }
        }
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-string-token
    ///
    /// A newline or EOF before the closing quote yields an empty string.
    fn consume_string(&mut self, ending: char) -> CssToken {
        let mut value = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == ending => return CssToken::String(value),
                None => return CssToken::String(String::new()),
                Some('\n') => {
                    self.reconsume();
                    return CssToken::String(String::new());
                }
                Some('\\') => match self.peek(0) {
                    None => {}
                    Some('\n') => {
                        self.next_char();
                    }
                    Some(_) => value.push(self.consume_escape()),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-an-escaped-code-point
    ///
    /// Expects the backslash to be consumed already.
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.next_char() else {
            return REPLACEMENT_CHARACTER;
        };
        if !c.is_ascii_hexdigit() {
            return c;
        }

        let mut hex = String::from(c);
        while hex.len() < 6 && self.peek(0).is_some_and(|c| c.is_ascii_hexdigit()) {
            if let Some(c) = self.next_char() {
                hex.push(c);
            }
        }
        if self.peek(0).is_some_and(is_whitespace) {
            self.next_char();
        }

        match u32::from_str_radix(&hex, 16) {
            Ok(0) => REPLACEMENT_CHARACTER,
            Ok(value) if value > MAX_CODE_POINT => REPLACEMENT_CHARACTER,
            Ok(value) => char::from_u32(value).unwrap_or(REPLACEMENT_CHARACTER),
            Err(_) => REPLACEMENT_CHARACTER,
        }
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-name
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.next_char() {
            if is_name_char(c) {
                name.push(c);
            } else if is_valid_escape(Some(c), self.peek(0)) {
                name.push(self.consume_escape());
            } else {
                self.reconsume();
                break;
            }
        }
        name
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-numeric-token
    fn consume_numeric(&mut self) -> CssToken {
        let repr = self.consume_number();

        if would_start_ident(self.peek(0), self.peek(1), self.peek(2)) {
            let unit = self.consume_name();
            return CssToken::Dimension { repr, unit };
        }
        if self.peek(0) == Some('%') {
            self.next_char();
            return CssToken::Percentage(repr);
        }
        CssToken::Number(repr)
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-number
    ///
    /// Only the source text is kept.
    fn consume_number(&mut self) -> String {
        let mut repr = String::new();

        if let Some(sign @ ('+' | '-')) = self.peek(0) {
            self.next_char();
            repr.push(sign);
        }
        self.consume_digits(&mut repr);

        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
            repr.push('.');
            self.consume_digits(&mut repr);
        }

        if let Some(e @ ('e' | 'E')) = self.peek(0) {
            let signed_exponent = matches!(self.peek(1), Some('+' | '-'))
                && self.peek(2).is_some_and(|c| c.is_ascii_digit());
            if signed_exponent || self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
                self.next_char();
                repr.push(e);
                if signed_exponent {
                    if let Some(sign) = self.next_char() {
                        repr.push(sign);
                    }
                }
                self.consume_digits(&mut repr);
            }
        }

        repr
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(c) = self.peek(0).filter(|c| c.is_ascii_digit()) {
            self.next_char();
            repr.push(c);
        }
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token
    fn consume_ident_like(&mut self) {
        let name = self.consume_name();

        if name.eq_ignore_ascii_case("url") && self.peek(0) == Some('(') {
            self.next_char();
            while self.peek(0).is_some_and(is_whitespace) && self.peek(1).is_some_and(is_whitespace) {
                self.next_char();
            }
            let quoted = |c: Option<char>| matches!(c, Some('"' | '\''));
            let next = self.peek(0);
            if quoted(next) || (next.is_some_and(is_whitespace) && quoted(self.peek(1))) {
                self.emit(CssToken::Function("url".to_string()));
            } else {
                self.consume_url();
            }
            return;
        }

        if self.peek(0) == Some('(') {
            self.next_char();
            self.emit(CssToken::Function(name));
        } else {
            self.emit(CssToken::Ident(name));
        }
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-url-token
    ///
    /// Emits `Function("url")`, `String(value)`, `CloseParen`; the value is
    /// empty when the url is malformed or unterminated.
    fn consume_url(&mut self) {
        let value = self.consume_url_value().unwrap_or_default();
        self.emit(CssToken::Function("url".to_string()));
        self.emit(CssToken::String(value));
        self.emit(CssToken::CloseParen);
    }

    fn consume_url_value(&mut self) -> Option<String> {
        let mut value = String::new();
        while self.peek(0).is_some_and(is_whitespace) {
            self.next_char();
        }

        loop {
            match self.next_char() {
                Some(')') => return Some(value),
                None => return None,
                Some(c) if is_whitespace(c) => {
                    while self.peek(0).is_some_and(is_whitespace) {
                        self.next_char();
                    }
                    return match self.peek(0) {
                        Some(')') => {
                            self.next_char();
                            Some(value)
                        }
                        None => None,
                        Some(_) => {
                            self.consume_bad_url_remnants();
                            None
                        }
                    };
                }
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return None;
                }
                Some(c) if is_non_printable(c) => {
                    self.consume_bad_url_remnants();
                    return None;
                }
                Some('\\') => {
                    if is_valid_escape(self.current(), self.peek(0)) {
                        value.push(self.consume_escape());
                    } else {
                        self.consume_bad_url_remnants();
                        return None;
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.next_char() {
                None | Some(')') => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek(0)) => {
                    self.consume_escape();
                }
                Some(_) => {}
            }
        }
    }
}

/// Tokenizes `css`; the result always ends with [`CssToken::Eof`].
pub fn tokenize_css(css: &str) -> Vec<CssToken> {
    CssTokenizer::new(css).tokenize()
}

/// https://www.w3.org/TR/css-syntax-3/#input-preprocessing
fn preprocess(css: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{000C}' => out.push('\n'),
            '\0' => out.push(REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

pub(crate) fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || c.is_ascii_digit() || c == '-'
}

fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000E}'..='\u{001F}' | '\u{007F}')
}

/// https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape
///
/// A backslash at EOF counts as a valid escape.
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier
fn would_start_ident(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some('-') => {
            second.is_some_and(is_name_start_char)
                || second == Some('-')
                || is_valid_escape(second, third)
        }
        Some('\\') => is_valid_escape(first, second),
        Some(c) => is_name_start_char(c),
        None => false,
    }
}

/// https://www.w3.org/TR/css-syntax-3/#starts-with-a-number
fn starts_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        Some('.') => is_digit(second),
        c => is_digit(c),
    }
}

//! Token vocabulary shared by the CSS tokenizer, serializer and sanitizer.
//!
//! Tokens only carry what is needed to write them back out. Numeric tokens
//! keep their source text instead of a parsed value so `1.50e+3` survives a
//! tokenize/serialize round trip byte for byte.

/// https://www.w3.org/TR/css-syntax-3/#tokenization
///
/// Differences from the CSS Syntax grammar:
/// - there is no url-token; `url(x)` becomes `Function("url")`, `String("x")`, `CloseParen`
/// - there are no bad-string or bad-url tokens; those become an empty `String`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CssToken {
    Ident(String),
    /// Function name without the opening parenthesis.
    Function(String),
    /// At-keyword name without the `@`.
    AtKeyword(String),
    /// Hash value without the `#`.
    Hash(String),
    String(String),
    Number(String),
    /// Numeric text without the `%`.
    Percentage(String),
    Dimension {
        repr: String,
        unit: String,
    },
    Delim(char),
    Whitespace,
    Colon,
    Semicolon,
    Comma,
    OpenSquare,
    CloseSquare,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Cdo,
    Cdc,

    /// Always the last token of a tokenization.
    Eof,
}

impl CssToken {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, CssToken::Whitespace)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, CssToken::Eof)
    }

    /// Whether this token opens a block that a matching token must close.
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            CssToken::Function(_) | CssToken::OpenParen | CssToken::OpenSquare | CssToken::OpenCurly
        )
    }

    /// Whether this token closes a block.
    pub fn closes_block(&self) -> bool {
        matches!(
            self,
            CssToken::CloseParen | CssToken::CloseSquare | CssToken::CloseCurly
        )
    }

    /// The token closing the block this token opens.
    pub fn block_closer(&self) -> Option<CssToken> {
        match self {
            CssToken::Function(_) | CssToken::OpenParen => Some(CssToken::CloseParen),
            CssToken::OpenSquare => Some(CssToken::CloseSquare),
            CssToken::OpenCurly => Some(CssToken::CloseCurly),
            _ => None,
        }
    }
}

/// Removes the trailing EOF and collapses whitespace runs, the shape two
/// tokenizations are compared in.
pub fn normalize_tokens(tokens: &[CssToken]) -> Vec<CssToken> {
    let mut out: Vec<CssToken> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.is_eof() {
            continue;
        }
        if token.is_whitespace() && out.last().is_some_and(CssToken::is_whitespace) {
            continue;
        }
        out.push(token.clone());
    }
    out
}

use std::fmt;

use butha_source::{LexError, Span};
use logos::Logos;

use crate::ast::BinaryOp;

/// Raw scanner output. Keywords are not distinguished here: every identifier-like
/// word is scanned in full first and classified afterwards in [`tokenize`].
#[derive(Debug, Logos, Clone, Copy, PartialEq)]
enum RawToken {
    // literals
    #[regex("[0-9]+")]
    Number,
    #[regex(r#""[^"]*""#)]
    String,
    /// A string missing its closing quote. Always runs to the end of input.
    #[regex(r#""[^"]*"#)]
    UnterminatedString,

    // identifiers and keywords
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,

    // binary operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(",")]
    Comma,

    // misc
    #[regex(r"\s+", logos::skip)]
    #[error]
    Error,
}

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    If,
    Then,
    Else,
    While,
    Do,
    Function,
    Call,
}

const KEYWORDS: [(&str, Keyword); 7] = [
    ("if", Keyword::If),
    ("then", Keyword::Then),
    ("else", Keyword::Else),
    ("while", Keyword::While),
    ("do", Keyword::Do),
    ("function", Keyword::Function),
    ("call", Keyword::Call),
];

impl Keyword {
    /// Looks up a complete word in the keyword table.
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, keyword)| *keyword)
    }

    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, keyword)| *keyword == self)
            .map_or("", |(text, _)| text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Keyword(Keyword),
    Operator(BinaryOp),
    OpenParen,
    CloseParen,
    Comma,
    /// Only one, always the last token of the stream.
    Eof,
    /// An unrecognized character or an unterminated string.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token. Strings keep their quotes.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Byte offset of the first character of the token.
    pub fn position(&self) -> usize {
        self.span.start
    }

    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` and `1` is reserved for accepting any expression.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self.kind {
            /* Additive */
            TokenKind::Operator(BinaryOp::Add) | TokenKind::Operator(BinaryOp::Sub) => Some((8, 9)),
            /* Multiplicative */
            TokenKind::Operator(BinaryOp::Mul) | TokenKind::Operator(BinaryOp::Div) => {
                Some((10, 11))
            }
            _ => None,
        }
    }

    /// Converts an error token into the [`LexError`] it stands for.
    pub fn lex_error(&self) -> Option<LexError> {
        if self.kind != TokenKind::Error {
            return None;
        }
        // `"` always starts a string, so an error token beginning with it is an unterminated one.
        if self.text.starts_with('"') {
            return Some(LexError::UnterminatedString {
                span: self.span.clone(),
            });
        }
        self.text.chars().next().map(|ch| LexError::UnexpectedChar {
            ch,
            span: self.span.clone(),
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Number => write!(f, "NUMBER({})", self.text),
            TokenKind::String => write!(f, "STRING({})", self.text),
            TokenKind::Identifier => write!(f, "IDENT({})", self.text),
            TokenKind::Keyword(keyword) => write!(f, "KEYWORD({})", keyword.as_str()),
            TokenKind::Operator(op) => write!(f, "OP({})", op),
            TokenKind::OpenParen => write!(f, "LPAREN"),
            TokenKind::CloseParen => write!(f, "RPAREN"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Error => write!(f, "ERROR({})", self.text),
        }
    }
}

/// Converts `source` into tokens. Never fails: invalid input becomes [`TokenKind::Error`] tokens
/// and the parser decides what to do with them.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    // End of the last error character emitted, used to merge byte-level scanner errors
    // inside a multi-byte character.
    let mut error_end = 0;

    while let Some(raw) = lexer.next() {
        let span = lexer.span();
        let kind = match raw {
            RawToken::Number => TokenKind::Number,
            RawToken::String => TokenKind::String,
            RawToken::UnterminatedString => TokenKind::Error,
            RawToken::Word => match Keyword::lookup(lexer.slice()) {
                Some(keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Identifier,
            },
            RawToken::Plus => TokenKind::Operator(BinaryOp::Add),
            RawToken::Minus => TokenKind::Operator(BinaryOp::Sub),
            RawToken::Asterisk => TokenKind::Operator(BinaryOp::Mul),
            RawToken::Slash => TokenKind::Operator(BinaryOp::Div),
            RawToken::OpenParen => TokenKind::OpenParen,
            RawToken::CloseParen => TokenKind::CloseParen,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Error => {
                if span.start < error_end {
                    continue;
                }
                // one error token per character
                let rest = match source.get(span.start..) {
                    Some(rest) => rest,
                    None => continue,
                };
                for (offset, ch) in rest.char_indices() {
                    let start = span.start + offset;
                    if start >= span.end {
                        break;
                    }
                    error_end = start + ch.len_utf8();
                    tokens.push(Token::new(TokenKind::Error, ch.to_string(), start..error_end));
                }
                continue;
            }
        };
        tokens.push(Token::new(kind, lexer.slice(), span));
    }

    tokens.push(Token::new(TokenKind::Eof, "", source.len()..source.len()));
    tokens
}

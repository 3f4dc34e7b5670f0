//! Lexer for the block dialect.
//!
//! Produces a flat token vector where every token carries a byte [`Span`];
//! the vector doubles as the token side table the rules read positions from.
//! Whitespace and `#` line comments are skipped, so token spans are the only
//! record of where code sits on a line.

use crate::span::Span;
use thiserror::Error;

/// Kinds of tokens in the block dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or method name.
    Ident,
    /// Integer literal.
    Int,
    /// Double-quoted string literal.
    Str,
    /// `do` keyword opening a block.
    KwDo,
    /// `end` keyword closing a block.
    KwEnd,
    /// `{` opening a brace block.
    LBrace,
    /// `}` closing a brace block.
    RBrace,
    /// `(`.
    LParen,
    /// `)`.
    RParen,
    /// `|` delimiting a block parameter list.
    Pipe,
    /// `,`.
    Comma,
    /// `=` assignment.
    Equals,
    /// `->` lambda arrow.
    Arrow,
}

/// A single token with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Byte range of the token text.
    pub span: Span,
}

/// Index of a token in the token side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub u32);

/// Lexing failure; aborts analysis of the file it occurs in.
#[derive(Debug, Error)]
pub enum LexError {
    /// A character the dialect has no token for.
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Byte offset of the character.
        offset: usize,
    },
    /// A string literal with no closing quote.
    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        offset: usize,
    },
}

/// Tokenizes `src` into the token side table.
///
/// # Errors
///
/// Returns [`LexError`] on the first character the dialect cannot tokenize.
pub fn lex(src: &str) -> Result<Vec<Token>, LexError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'{' => {
                tokens.push(token(TokenKind::LBrace, i, i + 1));
                i += 1;
            }
            b'}' => {
                tokens.push(token(TokenKind::RBrace, i, i + 1));
                i += 1;
            }
            b'(' => {
                tokens.push(token(TokenKind::LParen, i, i + 1));
                i += 1;
            }
            b')' => {
                tokens.push(token(TokenKind::RParen, i, i + 1));
                i += 1;
            }
            b'|' => {
                tokens.push(token(TokenKind::Pipe, i, i + 1));
                i += 1;
            }
            b',' => {
                tokens.push(token(TokenKind::Comma, i, i + 1));
                i += 1;
            }
            b'=' => {
                tokens.push(token(TokenKind::Equals, i, i + 1));
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'>') => {
                tokens.push(token(TokenKind::Arrow, i, i + 2));
                i += 2;
            }
            b'"' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' && bytes[i] != b'\n' {
                    i += 1;
                }
                if bytes.get(i) != Some(&b'"') {
                    return Err(LexError::UnterminatedString { offset: start });
                }
                i += 1;
                tokens.push(token(TokenKind::Str, start, i));
            }
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                tokens.push(token(TokenKind::Int, start, i));
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let kind = match &src[start..i] {
                    "do" => TokenKind::KwDo,
                    "end" => TokenKind::KwEnd,
                    _ => TokenKind::Ident,
                };
                tokens.push(token(kind, start, i));
            }
            _ => {
                let found = src[i..].chars().next().unwrap_or('\u{fffd}');
                return Err(LexError::UnexpectedChar { found, offset: i });
            }
        }
    }

    Ok(tokens)
}

fn token(kind: TokenKind, start: usize, end: usize) -> Token {
    Token {
        kind,
        span: Span::new(start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src)
            .expect("lex failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_do_end_block() {
        assert_eq!(
            kinds("test do foo\nend"),
            vec![
                TokenKind::Ident,
                TokenKind::KwDo,
                TokenKind::Ident,
                TokenKind::KwEnd
            ]
        );
    }

    #[test]
    fn lexes_lambda_and_pipes() {
        assert_eq!(
            kinds("x = -> (y) { |a, b| }"),
            vec![
                TokenKind::Ident,
                TokenKind::Equals,
                TokenKind::Arrow,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Pipe,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::Pipe,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn spans_track_byte_positions() {
        let tokens = lex("test do foo\nend").expect("lex failed");
        assert_eq!(tokens[2].span, Span::new(8, 11));
        assert_eq!(tokens[3].span, Span::new(12, 15));
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("foo # trailing comment\nbar"),
            vec![TokenKind::Ident, TokenKind::Ident]
        );
    }

    #[test]
    fn rejects_unknown_character() {
        assert!(matches!(
            lex("foo @ bar"),
            Err(LexError::UnexpectedChar { found: '@', .. })
        ));
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(matches!(
            lex("log \"oops\nend"),
            Err(LexError::UnterminatedString { .. })
        ));
    }
}

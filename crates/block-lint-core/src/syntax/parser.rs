//! Recursive-descent parser for the block dialect.
//!
//! Produces a [`ParsedFile`]: the [`Program`] structure plus the two
//! read-only side tables position data is joined through: the token vector
//! (indexed by [`TokenId`]) and the node-span table (indexed by [`NodeId`]).
//!
//! The parser is lenient about block closers: either `}` or `end` terminates
//! the innermost open block and is recorded as found, and a block that runs
//! into end-of-file records no closer. Diagnosing a mismatched or missing
//! closer is the block locator's job; one malformed construct must not make
//! the rest of the file unanalyzable.

use crate::span::Span;
use crate::syntax::ast::{
    AssignExpr, BlockNode, BlockParams, Callee, CallExpr, Expr, ExprKind, LambdaParams, NodeId,
    ParamItem, Program,
};
use crate::syntax::lexer::{lex, LexError, Token, TokenId, TokenKind};
use thiserror::Error;

/// A parsed file with its token and node-span side tables.
#[derive(Debug)]
pub struct ParsedFile {
    /// The parsed statement structure.
    pub program: Program,
    tokens: Vec<Token>,
    node_spans: Vec<Span>,
}

impl ParsedFile {
    /// Returns the token behind `id`.
    #[must_use]
    pub fn token(&self, id: TokenId) -> Token {
        self.tokens[id.0 as usize]
    }

    /// Returns the span of the token behind `id`.
    #[must_use]
    pub fn token_span(&self, id: TokenId) -> Span {
        self.token(id).span
    }

    /// Returns the token immediately preceding `id` in the source, if any.
    #[must_use]
    pub fn token_before(&self, id: TokenId) -> Option<Token> {
        let idx = id.0 as usize;
        (idx > 0).then(|| self.tokens[idx - 1])
    }

    /// Returns the span recorded for the node behind `id`.
    #[must_use]
    pub fn node_span(&self, id: NodeId) -> Span {
        self.node_spans[id.0 as usize]
    }
}

/// Parsing failure; aborts analysis of the file it occurs in.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Tokenization failed.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// A token that cannot start or continue the current construct.
    #[error("{message} at bytes {}..{}", .span.start, .span.end)]
    Unexpected {
        /// Where the offending token sits.
        span: Span,
        /// What the parser was looking for.
        message: String,
    },
    /// The input ended inside a construct that cannot recover.
    #[error("unexpected end of input: {message}")]
    UnexpectedEof {
        /// What the parser was looking for.
        message: String,
    },
}

/// Parses `src` into a [`ParsedFile`].
///
/// # Errors
///
/// Returns [`ParseError`] when the file cannot be tokenized or a statement
/// is structurally broken. Mismatched or unterminated block delimiters are
/// *not* parse errors; they are recorded on the block node.
pub fn parse(src: &str) -> Result<ParsedFile, ParseError> {
    let tokens = lex(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        node_spans: Vec::new(),
    };

    let mut stmts = Vec::new();
    while parser.peek().is_some() {
        stmts.push(parser.parse_expr()?);
    }

    Ok(ParsedFile {
        program: Program { stmts },
        tokens: parser.tokens,
        node_spans: parser.node_spans,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    node_spans: Vec<Span>,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_second(&self) -> Option<Token> {
        self.tokens.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> TokenId {
        let id = TokenId(self.pos as u32);
        self.pos += 1;
        id
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<TokenId, ParseError> {
        match self.peek() {
            Some(tok) if tok.kind == kind => Ok(self.bump()),
            Some(tok) => Err(ParseError::Unexpected {
                span: tok.span,
                message: format!("expected {what}"),
            }),
            None => Err(ParseError::UnexpectedEof {
                message: format!("expected {what}"),
            }),
        }
    }

    fn alloc(&mut self, span: Span) -> NodeId {
        let id = NodeId(self.node_spans.len() as u32);
        self.node_spans.push(span);
        id
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if let (Some(name), Some(eq)) = (self.peek(), self.peek_second()) {
            if name.kind == TokenKind::Ident && eq.kind == TokenKind::Equals {
                let name_id = self.bump();
                let eq_id = self.bump();
                let value = self.parse_expr()?;
                let span = name.span.join(self.node_spans[value.id.0 as usize]);
                let id = self.alloc(span);
                return Ok(Expr {
                    id,
                    kind: ExprKind::Assign(AssignExpr {
                        name: name_id,
                        eq: eq_id,
                        value: Box::new(value),
                    }),
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().ok_or_else(|| ParseError::UnexpectedEof {
            message: "expected an expression".to_string(),
        })?;

        match tok.kind {
            TokenKind::Arrow => self.parse_lambda(),
            TokenKind::Ident => self.parse_call_or_ident(),
            TokenKind::Int | TokenKind::Str => {
                let id_tok = self.bump();
                let id = self.alloc(tok.span);
                Ok(Expr {
                    id,
                    kind: ExprKind::Literal(id_tok),
                })
            }
            _ => Err(ParseError::Unexpected {
                span: tok.span,
                message: "expected an expression".to_string(),
            }),
        }
    }

    fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        let arrow_tok = self.peek().ok_or_else(|| ParseError::UnexpectedEof {
            message: "expected `->`".to_string(),
        })?;
        let arrow_span = arrow_tok.span;
        let arrow = self.bump();
        let params = if self.peek().map(|t| t.kind) == Some(TokenKind::LParen) {
            Some(self.parse_lambda_params()?)
        } else {
            None
        };
        let block = self.parse_optional_block()?;

        let mut span = arrow_span;
        if let Some(p) = &params {
            span = span.join(self.tokens[p.rparen.0 as usize].span);
        }
        if let Some(b) = &block {
            span = span.join(self.node_spans[b.id.0 as usize]);
        }
        let id = self.alloc(span);
        Ok(Expr {
            id,
            kind: ExprKind::Call(CallExpr {
                callee: Callee::Lambda { arrow, params },
                args: Vec::new(),
                block,
            }),
        })
    }

    fn parse_lambda_params(&mut self) -> Result<LambdaParams, ParseError> {
        let lparen = self.expect(TokenKind::LParen, "`(`")?;
        let mut names = Vec::new();
        while self.peek().map(|t| t.kind) == Some(TokenKind::Ident) {
            names.push(self.bump());
            if self.peek().map(|t| t.kind) == Some(TokenKind::Comma) {
                self.bump();
            }
        }
        let rparen = self.expect(TokenKind::RParen, "`)` closing the lambda parameter list")?;
        Ok(LambdaParams {
            lparen,
            names,
            rparen,
        })
    }

    fn parse_call_or_ident(&mut self) -> Result<Expr, ParseError> {
        let name_tok = self.peek().ok_or_else(|| ParseError::UnexpectedEof {
            message: "expected an identifier".to_string(),
        })?;
        let name_span = name_tok.span;
        let name = self.bump();

        let mut args = Vec::new();
        let mut pre_block_end = name_span;
        let mut has_parens = false;
        if self.peek().map(|t| t.kind) == Some(TokenKind::LParen) {
            has_parens = true;
            self.bump();
            while let Some(tok) = self.peek() {
                if tok.kind == TokenKind::RParen {
                    break;
                }
                args.push(self.parse_expr()?);
                if self.peek().map(|t| t.kind) == Some(TokenKind::Comma) {
                    self.bump();
                }
            }
            let rparen = self.expect(TokenKind::RParen, "`)` closing the argument list")?;
            pre_block_end = self.tokens[rparen.0 as usize].span;
        }

        let block = self.parse_optional_block()?;

        if !has_parens && block.is_none() {
            let id = self.alloc(name_span);
            return Ok(Expr {
                id,
                kind: ExprKind::Ident(name),
            });
        }

        let mut span = name_span.join(pre_block_end);
        if let Some(b) = &block {
            span = span.join(self.node_spans[b.id.0 as usize]);
        }
        let id = self.alloc(span);
        Ok(Expr {
            id,
            kind: ExprKind::Call(CallExpr {
                callee: Callee::Name(name),
                args,
                block,
            }),
        })
    }

    fn parse_optional_block(&mut self) -> Result<Option<BlockNode>, ParseError> {
        let open_tok = match self.peek() {
            Some(tok) if matches!(tok.kind, TokenKind::LBrace | TokenKind::KwDo) => tok,
            _ => return Ok(None),
        };
        let open_span = open_tok.span;
        let open = self.bump();

        let params = if self.peek().map(|t| t.kind) == Some(TokenKind::Pipe) {
            Some(self.parse_block_params()?)
        } else {
            None
        };

        let mut body = Vec::new();
        let close = loop {
            match self.peek() {
                None => break None,
                Some(tok) if tok.kind == TokenKind::RBrace || tok.kind == TokenKind::KwEnd => {
                    break Some(self.bump());
                }
                Some(_) => body.push(self.parse_expr()?),
            }
        };

        let mut span = open_span;
        if let Some(c) = close {
            span = span.join(self.tokens[c.0 as usize].span);
        } else if let Some(last) = body.last() {
            span = span.join(self.node_spans[last.id.0 as usize]);
        }
        let id = self.alloc(span);
        Ok(Some(BlockNode {
            id,
            open,
            params,
            body,
            close,
        }))
    }

    fn parse_block_params(&mut self) -> Result<BlockParams, ParseError> {
        let open_pipe = self.expect(TokenKind::Pipe, "`|`")?;
        let mut items = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.kind == TokenKind::Pipe {
                break;
            }
            items.push(self.parse_param_item()?);
            if self.peek().map(|t| t.kind) == Some(TokenKind::Comma) {
                self.bump();
            }
        }
        let close_pipe = self.expect(TokenKind::Pipe, "`|` closing the block parameter list")?;
        Ok(BlockParams {
            open_pipe,
            items,
            close_pipe,
        })
    }

    fn parse_param_item(&mut self) -> Result<ParamItem, ParseError> {
        let tok = self.peek().ok_or_else(|| ParseError::UnexpectedEof {
            message: "expected a block parameter".to_string(),
        })?;
        match tok.kind {
            TokenKind::Ident => Ok(ParamItem::Name(self.bump())),
            TokenKind::LParen => {
                let lparen = self.bump();
                let mut items = Vec::new();
                while let Some(inner) = self.peek() {
                    if inner.kind == TokenKind::RParen {
                        break;
                    }
                    items.push(self.parse_param_item()?);
                    if self.peek().map(|t| t.kind) == Some(TokenKind::Comma) {
                        self.bump();
                    }
                }
                let rparen =
                    self.expect(TokenKind::RParen, "`)` closing the destructuring group")?;
                Ok(ParamItem::Group {
                    lparen,
                    items,
                    rparen,
                })
            }
            _ => Err(ParseError::Unexpected {
                span: tok.span,
                message: "expected a block parameter".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_call(parsed: &ParsedFile) -> &CallExpr {
        match &parsed.program.stmts[0].kind {
            ExprKind::Call(call) => call,
            other => panic!("expected a call, got {other:?}"),
        }
    }

    #[test]
    fn parses_do_end_block_with_body() {
        let parsed = parse("test do foo\nend").expect("parse failed");
        let call = first_call(&parsed);
        let block = call.block.as_ref().expect("block missing");
        assert_eq!(block.body.len(), 1);
        assert!(block.close.is_some());
        assert!(block.params.is_none());
    }

    #[test]
    fn parses_block_params_with_destructuring() {
        let parsed = parse("test do |(a, b), c| use(a)\nend").expect("parse failed");
        let call = first_call(&parsed);
        let params = call
            .block
            .as_ref()
            .and_then(|b| b.params.as_ref())
            .expect("params missing");
        assert_eq!(params.items.len(), 2);
        assert!(matches!(params.items[0], ParamItem::Group { .. }));
        assert!(matches!(params.items[1], ParamItem::Name(_)));
    }

    #[test]
    fn parses_lambda_with_pre_block_params() {
        let parsed = parse("x = -> (y) { foo\n}").expect("parse failed");
        let ExprKind::Assign(assign) = &parsed.program.stmts[0].kind else {
            panic!("expected assignment");
        };
        let ExprKind::Call(call) = &assign.value.kind else {
            panic!("expected call on the right-hand side");
        };
        let Callee::Lambda { params, .. } = &call.callee else {
            panic!("expected lambda callee");
        };
        assert_eq!(params.as_ref().map(|p| p.names.len()), Some(1));
        assert!(call.block.is_some());
    }

    #[test]
    fn records_mismatched_closer_without_failing() {
        let parsed = parse("test do foo\n}").expect("parse failed");
        let call = first_call(&parsed);
        let block = call.block.as_ref().expect("block missing");
        let close = block.close.expect("closer missing");
        assert_eq!(parsed.token(close).kind, TokenKind::RBrace);
    }

    #[test]
    fn records_unterminated_block() {
        let parsed = parse("test do foo\nbar").expect("parse failed");
        let call = first_call(&parsed);
        assert!(call.block.as_ref().expect("block missing").close.is_none());
    }

    #[test]
    fn nested_blocks_attach_to_inner_calls() {
        let parsed = parse("outer do\n  inner do\n    leaf\n  end\nend").expect("parse failed");
        let outer = first_call(&parsed);
        let outer_block = outer.block.as_ref().expect("outer block missing");
        let ExprKind::Call(inner) = &outer_block.body[0].kind else {
            panic!("expected inner call");
        };
        assert!(inner.block.is_some());
        assert!(outer_block.close.is_some());
    }

    #[test]
    fn call_args_parse_inside_body() {
        let parsed = parse("test do\n  play_with(x, y)\nend").expect("parse failed");
        let call = first_call(&parsed);
        let block = call.block.as_ref().expect("block missing");
        let ExprKind::Call(body_call) = &block.body[0].kind else {
            panic!("expected call in body");
        };
        assert_eq!(body_call.args.len(), 2);
    }

    #[test]
    fn statement_level_garbage_is_a_parse_error() {
        assert!(matches!(
            parse(", foo"),
            Err(ParseError::Unexpected { .. })
        ));
    }
}

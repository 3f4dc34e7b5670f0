//! Block locator: normalizes a call-with-block node into a [`BlockConstruct`].
//!
//! Brace blocks and `do`/`end` blocks have identical semantics and are
//! unified into one shape here; everything downstream is parametrized by
//! [`DelimiterKind`] and its delimiter lengths. Lambda-literal call forms
//! carry their pre-block parameter list inside the call range, never inside
//! the block's own parameter list.

use block_lint_core::syntax::ast::{CallSite, Callee, ParamItem};
use block_lint_core::syntax::lexer::TokenKind;
use block_lint_core::syntax::parser::ParsedFile;
use block_lint_core::{SourceFile, Span};
use thiserror::Error;

/// Which bracket pair encloses a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    /// `{ ... }`
    Brace,
    /// `do ... end`
    DoEnd,
}

impl DelimiterKind {
    fn from_open(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::LBrace => Some(Self::Brace),
            TokenKind::KwDo => Some(Self::DoEnd),
            _ => None,
        }
    }

    fn matches_close(self, kind: TokenKind) -> bool {
        match self {
            Self::Brace => kind == TokenKind::RBrace,
            Self::DoEnd => kind == TokenKind::KwEnd,
        }
    }

    /// Byte length of the opening delimiter (`{` or `do`).
    #[must_use]
    pub fn open_len(self) -> usize {
        match self {
            Self::Brace => 1,
            Self::DoEnd => 2,
        }
    }
}

/// The shape of one block parameter, for re-rendering onto a single line.
#[derive(Debug, Clone)]
pub enum ParamShape {
    /// A plain name; the span slices its text out of the snapshot.
    Name(Span),
    /// A parenthesized destructuring group, possibly nested.
    Group(Vec<ParamShape>),
}

/// The block's own `|...|` parameter list.
#[derive(Debug, Clone)]
pub struct ParamList {
    /// Full range from the opening pipe through the closing pipe.
    pub span: Span,
    /// Items in source order.
    pub items: Vec<ParamShape>,
}

impl ParamList {
    /// Re-renders the parameter list as a single comma-joined line,
    /// collapsing any internal line breaks, including inside destructuring
    /// groups.
    #[must_use]
    pub fn render(&self, source: &SourceFile) -> String {
        format!("|{}|", render_items(&self.items, source))
    }
}

fn render_items(items: &[ParamShape], source: &SourceFile) -> String {
    items
        .iter()
        .map(|item| match item {
            ParamShape::Name(span) => source.slice(*span).to_string(),
            ParamShape::Group(inner) => format!("({})", render_items(inner, source)),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// A normalized call-with-block construct.
///
/// Derived and read-only: recomputed fresh from the current token/AST
/// snapshot each analysis pass, never mutated, never persisted across
/// passes.
#[derive(Debug)]
pub struct BlockConstruct {
    /// Delimiter dialect of this block.
    pub delimiter: DelimiterKind,
    /// Range of the call expression owning the block, including any
    /// pre-block lambda parameter list, excluding the block itself.
    pub call_span: Span,
    /// Range of the opening delimiter token.
    pub start_span: Span,
    /// The block's own parameter list, if declared.
    pub params: Option<ParamList>,
    /// Range from the first body token through the last token before the
    /// closing delimiter; `None` for an empty body.
    pub body_span: Option<Span>,
    /// Range of the closing delimiter token.
    pub end_span: Span,
}

/// Why a call node did not yield a [`BlockConstruct`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    /// The call carries no attached block; the caller skips the node.
    #[error("call expression has no attached block")]
    NotABlock,
    /// The block is structurally broken; the construct is skipped entirely,
    /// with no offense and no edit. Guessing a repair for malformed input
    /// risks corrupting source.
    #[error("malformed block construct: {reason}")]
    MalformedConstruct {
        /// What is broken.
        reason: &'static str,
    },
}

impl BlockConstruct {
    /// Extracts the normalized construct for a call site.
    ///
    /// # Errors
    ///
    /// [`LocateError::NotABlock`] when the call has no block;
    /// [`LocateError::MalformedConstruct`] on delimiter mismatch or an
    /// unterminated block.
    pub fn locate(site: &CallSite<'_>, parsed: &ParsedFile) -> Result<Self, LocateError> {
        let block = site.call.block.as_ref().ok_or(LocateError::NotABlock)?;

        let open = parsed.token(block.open);
        let delimiter =
            DelimiterKind::from_open(open.kind).ok_or(LocateError::MalformedConstruct {
                reason: "block does not start with a delimiter",
            })?;

        let close = block.close.ok_or(LocateError::MalformedConstruct {
            reason: "unterminated block",
        })?;
        let close_tok = parsed.token(close);
        if !delimiter.matches_close(close_tok.kind) {
            return Err(LocateError::MalformedConstruct {
                reason: "opening and closing delimiters disagree",
            });
        }

        let call_start = match &site.call.callee {
            Callee::Name(name) => parsed.token_span(*name).start,
            Callee::Lambda { arrow, .. } => parsed.token_span(*arrow).start,
        };
        // The call expression ends at the token just before the opening
        // delimiter: the callee itself, a `)` closing call arguments, or a
        // `)` closing a lambda's pre-block parameter list.
        let call_end = parsed
            .token_before(block.open)
            .map_or(call_start, |t| t.span.end);

        let params = block.params.as_ref().map(|p| ParamList {
            span: parsed
                .token_span(p.open_pipe)
                .join(parsed.token_span(p.close_pipe)),
            items: param_shapes(&p.items, parsed),
        });

        let body_span = match (block.body.first(), block.body.last()) {
            (Some(first), Some(last)) => {
                Some(parsed.node_span(first.id).join(parsed.node_span(last.id)))
            }
            _ => None,
        };

        Ok(Self {
            delimiter,
            call_span: Span::new(call_start, call_end),
            start_span: open.span,
            params,
            body_span,
            end_span: close_tok.span,
        })
    }
}

fn param_shapes(items: &[ParamItem], parsed: &ParsedFile) -> Vec<ParamShape> {
    items
        .iter()
        .map(|item| match item {
            ParamItem::Name(tok) => ParamShape::Name(parsed.token_span(*tok)),
            ParamItem::Group { items, .. } => ParamShape::Group(param_shapes(items, parsed)),
        })
        .collect()
}

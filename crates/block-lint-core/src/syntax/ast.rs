//! AST for the block dialect.
//!
//! Nodes reference tokens by [`TokenId`] and carry a [`NodeId`] into the
//! node-span side table built by the parser; neither table is mutated after
//! parsing. Structure lives here, positions live in the tables.

use crate::syntax::lexer::TokenId;

/// Index of a node in the node-span side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A parsed file: a flat statement list.
#[derive(Debug)]
pub struct Program {
    /// Top-level statements in source order.
    pub stmts: Vec<Expr>,
}

/// An expression node.
#[derive(Debug)]
pub struct Expr {
    /// Key into the node-span table.
    pub id: NodeId,
    /// The expression variant.
    pub kind: ExprKind,
}

/// Expression variants.
#[derive(Debug)]
pub enum ExprKind {
    /// A call, possibly with arguments and an attached block.
    Call(CallExpr),
    /// `name = value`.
    Assign(AssignExpr),
    /// A bare identifier reference.
    Ident(TokenId),
    /// An integer or string literal.
    Literal(TokenId),
}

/// `name = value`.
#[derive(Debug)]
pub struct AssignExpr {
    /// The assigned variable name.
    pub name: TokenId,
    /// The `=` token.
    pub eq: TokenId,
    /// Right-hand side.
    pub value: Box<Expr>,
}

/// A call expression with optional arguments and an optional attached block.
#[derive(Debug)]
pub struct CallExpr {
    /// What is being called.
    pub callee: Callee,
    /// Parenthesized call arguments, empty when none were written.
    pub args: Vec<Expr>,
    /// The attached block, if any.
    pub block: Option<BlockNode>,
}

/// The called expression.
#[derive(Debug)]
pub enum Callee {
    /// A named call such as `test`.
    Name(TokenId),
    /// A lambda literal `-> (params)?`.
    ///
    /// The parenthesized list is the *lambda's* parameter list, written
    /// before the block delimiter; it is distinct from the block's own
    /// `|...|` parameters.
    Lambda {
        /// The `->` token.
        arrow: TokenId,
        /// Optional pre-block parameter list.
        params: Option<LambdaParams>,
    },
}

/// Parenthesized parameter list of a lambda literal.
#[derive(Debug)]
pub struct LambdaParams {
    /// The `(` token.
    pub lparen: TokenId,
    /// Parameter name tokens.
    pub names: Vec<TokenId>,
    /// The `)` token.
    pub rparen: TokenId,
}

/// A block attached to a call: `do ... end` or `{ ... }`.
#[derive(Debug)]
pub struct BlockNode {
    /// Key into the node-span table.
    pub id: NodeId,
    /// The opening delimiter token (`do` or `{`).
    pub open: TokenId,
    /// The block's own `|...|` parameter list, if declared.
    pub params: Option<BlockParams>,
    /// Body statements in source order; empty for an empty block.
    pub body: Vec<Expr>,
    /// The closing delimiter token as found in the source.
    ///
    /// `None` when the block ran into end-of-file; the recorded kind may
    /// mismatch `open` (`do ... }`). Both cases are for the block locator to
    /// diagnose, keeping the rest of the file parseable.
    pub close: Option<TokenId>,
}

/// The `|...|` parameter list of a block.
#[derive(Debug)]
pub struct BlockParams {
    /// The opening `|`.
    pub open_pipe: TokenId,
    /// Parameter items in source order.
    pub items: Vec<ParamItem>,
    /// The closing `|`.
    pub close_pipe: TokenId,
}

/// One item of a block parameter list.
#[derive(Debug)]
pub enum ParamItem {
    /// A plain parameter name.
    Name(TokenId),
    /// A parenthesized destructuring group, possibly nested.
    Group {
        /// The `(` token.
        lparen: TokenId,
        /// Items inside the group.
        items: Vec<ParamItem>,
        /// The `)` token.
        rparen: TokenId,
    },
}

/// A call expression found by [`visit_calls`], with its enclosing context.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// Node id of the call expression.
    pub expr_id: NodeId,
    /// The call itself.
    pub call: &'a CallExpr,
    /// Node id of the enclosing assignment when this call is its direct
    /// right-hand side.
    pub assigned_from: Option<NodeId>,
}

/// Visits every call expression in `program`, including calls nested in
/// arguments and block bodies, in source order.
pub fn visit_calls<'a, F>(program: &'a Program, f: &mut F)
where
    F: FnMut(CallSite<'a>),
{
    for stmt in &program.stmts {
        walk_expr(stmt, None, f);
    }
}

fn walk_expr<'a, F>(expr: &'a Expr, assigned_from: Option<NodeId>, f: &mut F)
where
    F: FnMut(CallSite<'a>),
{
    match &expr.kind {
        ExprKind::Assign(assign) => walk_expr(&assign.value, Some(expr.id), f),
        ExprKind::Call(call) => {
            f(CallSite {
                expr_id: expr.id,
                call,
                assigned_from,
            });
            for arg in &call.args {
                walk_expr(arg, None, f);
            }
            if let Some(block) = &call.block {
                for stmt in &block.body {
                    walk_expr(stmt, None, f);
                }
            }
        }
        ExprKind::Ident(_) | ExprKind::Literal(_) => {}
    }
}

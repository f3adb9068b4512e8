use crate::parser::Span;

/// The result of parsing one expression: the arena-allocated token tree and
/// the source it came from.
#[derive(Debug, Clone, Copy)]
pub struct ParsedExpr<'a> {
    pub source: &'a str,
    pub expr: &'a Expr<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr<'a> {
    pub kind: ExprKind<'a>,
    pub span: Span,
}

/// Token tree node. Operators and `if` blocks are already calls: `a + b`
/// is `Call { name: "+", args: [a, b] }`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind<'a> {
    Literal(Literal),
    Ident(&'a str),
    Call {
        name: &'a str,
        args: &'a [&'a Expr<'a>],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    Float(f32),
}

use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::{Expr, ExprKind, Literal, ParsedExpr, Span};
use bumpalo::Bump;
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use smallvec::SmallVec;
use std::cell::Cell;

/// Nesting of brackets and prefix operators accepted by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or, Assoc::Left))            // `||`
        .op(Op::infix(Rule::and, Assoc::Left))           // `&&`
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left)
        )                                               // `==`, `!=`
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left)
        )                                               // `<`, `<=`, `>`, `>=`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                               // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left)
        )                                               // `*`, `/`, `%`
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::not)) // `-`, `!`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

/// Parses `source` into a token tree allocated in `arena`.
pub fn parse<'a>(arena: &'a Bump, source: &'a str) -> Result<ParsedExpr<'a>, ParseError> {
    parse_with_max_depth(arena, source, DEFAULT_MAX_DEPTH)
}

/// Like [`parse`], rejecting sources whose brackets, together with runs of
/// prefix operators, nest deeper than `max_depth`.
pub fn parse_with_max_depth<'a>(
    arena: &'a Bump,
    source: &'a str,
    max_depth: usize,
) -> Result<ParsedExpr<'a>, ParseError> {
    check_nesting(source, max_depth)?;

    let mut pairs = ExpressionParser::parse(Rule::main, source)
        .map_err(|error| ParseError::from_pest(source, error))?;
    let expression = pairs
        .next()
        .and_then(|main| main.into_inner().next())
        .ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::Other {
                    message: "missing expression".to_string(),
                },
                Span::new(0, source.len()),
            )
        })?;

    let builder = TreeBuilder {
        arena,
        max_depth,
        depth: Cell::new(0),
    };
    let expr = builder.build(expression)?;
    tracing::trace!(?expr, "parsed expression");
    Ok(ParsedExpr { source, expr })
}

fn check_nesting(source: &str, max_depth: usize) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for (offset, c) in source.char_indices() {
        match c {
            '(' | '{' => {
                depth += 1;
                if depth > max_depth {
                    return Err(ParseError::new(
                        ParseErrorKind::MaxDepthExceeded { depth, max_depth },
                        Span::new(offset, offset + 1),
                    ));
                }
            }
            ')' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Turns pest pairs into arena nodes, rewriting operators and `if` blocks as
/// calls named after the operator.
struct TreeBuilder<'a> {
    arena: &'a Bump,
    max_depth: usize,
    /// Nesting of the operator sequence being built.
    depth: Cell<usize>,
}

impl<'a> TreeBuilder<'a> {
    fn alloc(&self, kind: ExprKind<'a>, span: Span) -> &'a Expr<'a> {
        self.arena.alloc(Expr { kind, span })
    }

    fn call(&self, name: &'a str, args: &[&'a Expr<'a>], span: Span) -> &'a Expr<'a> {
        let args = self.arena.alloc_slice_copy(args);
        self.alloc(ExprKind::Call { name, args }, span)
    }

    fn build(&self, pair: Pair<'a, Rule>) -> Result<&'a Expr<'a>, ParseError> {
        let span = Span::from(pair.as_span());
        match pair.as_rule() {
            Rule::expression => self.build_operators(pair.into_inner()),

            Rule::integer => {
                let text = pair.as_str();
                let value = text.parse::<i32>().map_err(|_| invalid_number(text, span))?;
                Ok(self.alloc(ExprKind::Literal(Literal::Int(value)), span))
            }

            Rule::float => {
                let text = pair.as_str();
                let value = text.parse::<f32>().map_err(|_| invalid_number(text, span))?;
                Ok(self.alloc(ExprKind::Literal(Literal::Float(value)), span))
            }

            Rule::boolean => {
                let value = pair.as_str() == "true";
                Ok(self.alloc(ExprKind::Literal(Literal::Bool(value)), span))
            }

            Rule::ident => Ok(self.alloc(ExprKind::Ident(pair.as_str()), span)),

            Rule::call => {
                let mut inner = pair.into_inner();
                let name = inner.next().map(|ident| ident.as_str()).unwrap_or_default();
                let args = self.build_all(inner)?;
                Ok(self.call(name, &args, span))
            }

            // Conditions and values alternate, ending with the `else` value,
            // which is the parameter order of the `if` function.
            Rule::if_block => {
                let args = self.build_all(pair.into_inner())?;
                Ok(self.call("if", &args, span))
            }

            rule => Err(ParseError::new(
                ParseErrorKind::Other {
                    message: format!("unhandled rule: {rule:?}"),
                },
                span,
            )),
        }
    }

    fn build_all(
        &self,
        pairs: Pairs<'a, Rule>,
    ) -> Result<SmallVec<[&'a Expr<'a>; 4]>, ParseError> {
        pairs.map(|pair| self.build(pair)).collect()
    }

    fn build_operators(&self, pairs: Pairs<'a, Rule>) -> Result<&'a Expr<'a>, ParseError> {
        // The Pratt parser recurses once per prefix operator, so a long run
        // of them is as deep as the same number of brackets.
        let enclosing = self.depth.get();
        let (mut run, mut longest_run) = (0, 0);
        let mut negated: SmallVec<[(usize, usize); 4]> = SmallVec::new();
        let mut previous: Option<Pair<'a, Rule>> = None;
        for pair in pairs.clone() {
            match pair.as_rule() {
                Rule::neg | Rule::not => {
                    run += 1;
                    longest_run = longest_run.max(run);
                    if enclosing + run > self.max_depth {
                        return Err(ParseError::new(
                            ParseErrorKind::MaxDepthExceeded {
                                depth: enclosing + run,
                                max_depth: self.max_depth,
                            },
                            Span::from(pair.as_span()),
                        ));
                    }
                }
                rule => {
                    if rule == Rule::integer
                        && previous.as_ref().is_some_and(|op| op.as_rule() == Rule::neg)
                    {
                        let neg_start = previous.as_ref().map_or(0, |op| op.as_span().start());
                        negated.push((pair.as_span().start(), neg_start));
                    }
                    run = 0;
                }
            }
            previous = Some(pair);
        }

        self.depth.set(enclosing + longest_run + 1);
        let expr = PRATT_PARSER
            .map_primary(|primary| {
                let start = primary.as_span().start();
                match negated.iter().find(|(integer, _)| *integer == start) {
                    Some(&(_, neg_start)) => self.negative_integer(primary, neg_start),
                    None => self.build(primary),
                }
            })
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                // Already folded into a negative literal.
                if rhs.span.start == op.as_span().start() {
                    return Ok(rhs);
                }
                let span = Span::new(op.as_span().start(), rhs.span.end);
                Ok(self.call(op.as_str(), &[rhs], span))
            })
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (lhs?, rhs?);
                let span = Span::combine(&lhs.span, &rhs.span);
                Ok(self.call(op.as_str(), &[lhs, rhs], span))
            })
            .parse(pairs);
        self.depth.set(enclosing);
        expr
    }

    /// `-` directly before an integer literal is part of the literal, which
    /// makes `-2147483648` representable.
    fn negative_integer(
        &self,
        pair: Pair<'a, Rule>,
        neg_start: usize,
    ) -> Result<&'a Expr<'a>, ParseError> {
        let span = Span::new(neg_start, pair.as_span().end());
        let text = pair.as_str();
        let value = text
            .parse::<i64>()
            .ok()
            .and_then(|value| i32::try_from(-value).ok())
            .ok_or_else(|| invalid_number(text, Span::from(pair.as_span())))?;
        Ok(self.alloc(ExprKind::Literal(Literal::Int(value)), span))
    }
}

fn invalid_number(text: &str, span: Span) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidNumber {
            text: text.to_string(),
        },
        span,
    )
}

//! Builds an [`Expr`] from the `surface.pest` grammar.
//!
//! The grammar only recognizes a flat run of operands and operators; the
//! Pratt parser below applies precedence, lowest first:
//!
//! ```text
//! + -        left-associative
//! * / %      left-associative
//! - +        prefix
//! ** ^       right-associative
//! ```
//!
//! so `-x ** 2` is `-(x ** 2)` and `2 ** -1` is `2 ** (-1)`.
//!
//! Trees are limited to [`MAX_DEPTH`] levels. The limit is enforced before
//! any recursion happens, so hostile input is rejected instead of exhausting
//! the stack in the parser or later in the evaluator.

use std::f64::consts::{E, PI};
use std::str::FromStr;
use std::sync::LazyLock;

use pest::error::{Error as PestError, ErrorVariant, InputLocation};
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

use super::ast::{BinaryFn, BinaryOp, Expr, UnaryFn, Var};
use super::ParseError;

/// Deepest expression tree accepted, counting nested parentheses, calls and
/// operators.
pub const MAX_DEPTH: usize = 256;

/// Most parentheses open at once.
pub const MAX_NESTING: usize = 64;

/// Optional namespace in front of function and constant names.
const MATH_PREFIX: &str = "Math.";

#[derive(Parser)]
#[grammar = "expr/surface.pest"]
struct SurfaceParser;

static PRATT: LazyLock<PrattParser<Rule>> = LazyLock::new(|| {
    PrattParser::new()
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::rem, Assoc::Left))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
        .op(Op::infix(Rule::pow, Assoc::Right))
});

/// Parses a complete expression.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    // The grammar recurses once per parenthesis
    check_nesting(source)?;

    let surface = SurfaceParser::parse(Rule::surface, source)
        .map_err(|err| syntax_error(source, &err))?;
    match surface
        .flat_map(|pair| pair.into_inner())
        .find(|pair| pair.as_rule() == Rule::expr)
    {
        Some(expr) => build_expr(expr, MAX_DEPTH),
        None => Err(ParseError::Empty),
    }
}

fn check_nesting(source: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for (offset, c) in source.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseError::TooDeep { offset });
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn syntax_error(source: &str, err: &PestError<Rule>) -> ParseError {
    let offset = match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    let expected = match &err.variant {
        ErrorVariant::ParsingError { positives, .. } => describe(positives),
        ErrorVariant::CustomError { message } => message.clone(),
    };
    let found = source
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .map_or_else(|| "end of input".to_string(), |c| format!("'{c}'"));
    ParseError::UnexpectedInput {
        found,
        expected,
        offset,
    }
}

/// Human-readable list of what the grammar would have accepted.
fn describe(rules: &[Rule]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for rule in rules {
        let name = match rule {
            Rule::add | Rule::sub | Rule::pow | Rule::mul | Rule::div | Rule::rem => {
                "an operator"
            }
            Rule::close => "')'",
            Rule::EOI => "end of input",
            _ => "a number, variable, function or '('",
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if names.is_empty() {
        "a valid expression".to_string()
    } else {
        names.join(" or ")
    }
}

fn is_operator(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::add | Rule::sub | Rule::pow | Rule::mul | Rule::div | Rule::rem | Rule::neg | Rule::pos
    )
}

fn binary_op(rule: Rule) -> BinaryOp {
    match rule {
        Rule::add => BinaryOp::Add,
        Rule::sub => BinaryOp::Sub,
        Rule::mul => BinaryOp::Mul,
        Rule::div => BinaryOp::Div,
        Rule::rem => BinaryOp::Rem,
        Rule::pow => BinaryOp::Pow,
        rule => unreachable!("{rule:?} is not a binary operator"),
    }
}

/// Builds one `expr` pair. `budget` is the tree depth still available.
///
/// A run of `k` operators yields a subtree at most `k + 1` levels deep, and
/// the Pratt parser recurses at most `k` times on it, so charging the
/// operator count up front bounds both.
fn build_expr(pair: Pair<'_, Rule>, budget: usize) -> Result<Expr, ParseError> {
    let offset = pair.as_span().start();
    let operators = pair
        .clone()
        .into_inner()
        .filter(|p| is_operator(p.as_rule()))
        .count();
    let remaining = budget
        .checked_sub(operators + 1)
        .ok_or(ParseError::TooDeep { offset })?;

    PRATT
        .map_primary(|primary| build_primary(primary, remaining))
        .map_prefix(|op, operand| match op.as_rule() {
            Rule::neg => Ok(Expr::Neg(Box::new(operand?))),
            _ => operand,
        })
        .map_infix(|lhs, op, rhs| {
            Ok(Expr::Binary(
                binary_op(op.as_rule()),
                Box::new(lhs?),
                Box::new(rhs?),
            ))
        })
        .parse(pair.into_inner())
}

fn build_primary(pair: Pair<'_, Rule>, budget: usize) -> Result<Expr, ParseError> {
    let offset = pair.as_span().start();
    match pair.as_rule() {
        Rule::number => {
            let text = pair.as_str();
            text.parse::<f64>()
                .map(Expr::Const)
                .map_err(|_| ParseError::InvalidNumber {
                    text: text.to_string(),
                    offset,
                })
        }
        Rule::name => lookup_name(pair.as_str(), offset),
        Rule::call => build_call(pair, budget),
        Rule::group => match pair.into_inner().find(|p| p.as_rule() == Rule::expr) {
            Some(inner) => build_expr(inner, budget),
            None => unreachable!("group without an inner expression"),
        },
        rule => unreachable!("{rule:?} is not an operand"),
    }
}

fn build_call(pair: Pair<'_, Rule>, budget: usize) -> Result<Expr, ParseError> {
    let offset = pair.as_span().start();
    let mut name = "";
    let mut args = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::name => name = inner.as_str(),
            Rule::expr => args.push(build_expr(inner, budget.saturating_sub(1))?),
            _ => {}
        }
    }

    let bare = name.strip_prefix(MATH_PREFIX).unwrap_or(name);
    let found = args.len();
    let mut args = args.into_iter();

    if let Ok(func) = UnaryFn::from_str(bare) {
        return match (args.next(), args.next()) {
            (Some(a), None) => Ok(Expr::Call(func, Box::new(a))),
            _ => Err(arity(name, 1, found, offset)),
        };
    }
    if let Ok(func) = BinaryFn::from_str(bare) {
        return match (args.next(), args.next(), args.next()) {
            (Some(a), Some(b), None) => Ok(Expr::Call2(func, Box::new(a), Box::new(b))),
            _ => Err(arity(name, 2, found, offset)),
        };
    }
    Err(ParseError::UnknownFunction {
        name: name.to_string(),
        offset,
    })
}

fn arity(name: &str, expected: usize, found: usize, offset: usize) -> ParseError {
    ParseError::WrongArity {
        name: name.to_string(),
        expected,
        found,
        offset,
    }
}

fn lookup_name(name: &str, offset: usize) -> Result<Expr, ParseError> {
    match name {
        "x" => return Ok(Expr::Var(Var::X)),
        "y" => return Ok(Expr::Var(Var::Y)),
        _ => {}
    }
    match name.strip_prefix(MATH_PREFIX).unwrap_or(name) {
        "pi" | "PI" => Ok(Expr::Const(PI)),
        "e" | "E" => Ok(Expr::Const(E)),
        _ => Err(ParseError::UnknownIdentifier {
            name: name.to_string(),
            offset,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(depth: usize) -> String {
        format!("{}x{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn scientific_literals() {
        assert_eq!(parse("1.5e3"), Ok(Expr::Const(1500.0)));
        assert_eq!(parse("2E-1"), Ok(Expr::Const(0.2)));
        assert_eq!(parse(".25"), Ok(Expr::Const(0.25)));
    }

    #[test]
    fn dangling_exponent_is_rejected() {
        assert!(matches!(
            parse("2e"),
            Err(ParseError::UnexpectedInput { .. })
        ));
    }

    #[test]
    fn lone_dot_is_rejected() {
        assert!(matches!(
            parse("."),
            Err(ParseError::UnexpectedInput { offset: 0, .. })
        ));
    }

    #[test]
    fn whitespace_is_ignored() {
        assert_eq!(parse(" x\t+\ny "), parse("x+y"));
    }

    #[test]
    fn moderate_nesting_is_accepted() {
        assert_eq!(parse(&nested(MAX_NESTING)), Ok(Expr::Var(Var::X)));
    }

    #[test]
    fn deep_parentheses_are_rejected() {
        assert_eq!(
            parse(&nested(100_000)),
            Err(ParseError::TooDeep {
                offset: MAX_NESTING
            })
        );
        // Unbalanced input is caught the same way
        assert!(matches!(
            parse(&"(".repeat(100_000)),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn long_operator_chains_are_rejected() {
        let negations = format!("{}x", "-".repeat(100_000));
        assert!(matches!(parse(&negations), Err(ParseError::TooDeep { .. })));

        let powers = format!("x{}", " ** x".repeat(100_000));
        assert!(matches!(parse(&powers), Err(ParseError::TooDeep { .. })));

        let sum = format!("x{}", " + x".repeat(100_000));
        assert!(matches!(parse(&sum), Err(ParseError::TooDeep { .. })));
    }

    #[test]
    fn depth_budget_spans_nested_groups() {
        // Every level costs its four operators plus one
        let levels = |n: usize| format!("{}x{}", "x + x + x + x + (".repeat(n), ")".repeat(n));
        assert!(parse(&levels(40)).is_ok());
        assert!(matches!(parse(&levels(60)), Err(ParseError::TooDeep { .. })));
    }

    #[test]
    fn nested_calls_count_towards_nesting() {
        let calls = |n: usize| format!("{}x{}", "sin(".repeat(n), ")".repeat(n));
        assert!(parse(&calls(MAX_NESTING)).is_ok());
        assert!(matches!(
            parse(&calls(MAX_NESTING + 1)),
            Err(ParseError::TooDeep { .. })
        ));
    }
}

//! Parsing of user-typed surface functions.
//!
//! Text such as `x ** 2 - y ** 2` or `Math.sqrt(x ** 2 + y ** 2)` is turned
//! into an [`Expression`] that can be evaluated at any `(x, y)`. Nothing is
//! evaluated while parsing; the sampler evaluates the expression once per
//! grid point.

mod ast;
mod parser;

pub use ast::{BinaryFn, BinaryOp, Expr, UnaryFn, Var};
pub use parser::{MAX_DEPTH, MAX_NESTING};

use thiserror::Error;

use crate::sampler::SurfaceFunction;

/// Reasons an expression can fail to parse.
///
/// Offsets are byte offsets into the source text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedInput {
        found: String,
        expected: String,
        offset: usize,
    },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("expression nests too deeply at offset {offset}")]
    TooDeep { offset: usize },

    #[error("unknown name '{name}' at offset {offset}; use x, y, pi or e")]
    UnknownIdentifier { name: String, offset: usize },

    #[error("unknown function '{name}' at offset {offset}")]
    UnknownFunction { name: String, offset: usize },

    #[error("function '{name}' at offset {offset} takes {expected} argument(s), got {found}")]
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
        offset: usize,
    },
}

/// A parsed function of `x` and `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// The text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.root.eval(x, y)
    }
}

impl SurfaceFunction for Expression {
    #[inline]
    fn eval(&self, x: f64, y: f64) -> f64 {
        self.root.eval(x, y)
    }
}

/// Parses `source` into a callable function of `x` and `y`.
pub fn parse_function(source: &str) -> Result<Expression, ParseError> {
    let root = parser::parse(source)?;
    Ok(Expression {
        source: source.trim().to_string(),
        root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tree(source: &str) -> String {
        parse_function(source).unwrap().root().to_string()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(tree("1 + 2 * 3"), "(1 + (2 * 3))");
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(tree("x - y - 1"), "((x - y) - 1)");
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(tree("2 ** 3 ** 2"), "(2 ** (3 ** 2))");
        assert_relative_eq!(parse_function("2 ** 3 ** 2").unwrap().eval(0.0, 0.0), 512.0);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(tree("-x ** 2"), "(-(x ** 2))");
        assert_eq!(tree("2 ** -1"), "(2 ** (-1))");
        assert_relative_eq!(parse_function("-x ** 2").unwrap().eval(3.0, 0.0), -9.0);
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(tree("(x + y) * 2"), "((x + y) * 2)");
    }

    #[test]
    fn math_prefix_is_optional() {
        let a = parse_function("Math.sqrt(x ** 2 + y ** 2)").unwrap();
        let b = parse_function("sqrt(x^2 + y^2)").unwrap();
        assert_eq!(a.root(), b.root());
        assert_relative_eq!(a.eval(3.0, 4.0), 5.0);
    }

    #[test]
    fn constants() {
        assert_relative_eq!(
            parse_function("Math.PI").unwrap().eval(0.0, 0.0),
            std::f64::consts::PI
        );
        assert_relative_eq!(parse_function("e").unwrap().eval(0.0, 0.0), std::f64::consts::E);
    }

    #[test]
    fn two_argument_functions() {
        let f = parse_function("max(x, y) + atan2(1, 1)").unwrap();
        assert_relative_eq!(f.eval(1.0, 2.0), 2.0 + std::f64::consts::FRAC_PI_4);
    }

    #[test]
    fn trig_surface() {
        let f = parse_function("sin(x) * cos(y)").unwrap();
        assert_relative_eq!(f.eval(std::f64::consts::FRAC_PI_2, 0.0), 1.0);
    }

    #[test]
    fn remainder() {
        assert_relative_eq!(parse_function("x % 3").unwrap().eval(7.0, 0.0), 1.0);
    }

    #[test]
    fn source_is_kept_trimmed() {
        assert_eq!(parse_function("  x + y ").unwrap().source(), "x + y");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_function("   "), Err(ParseError::Empty));
    }

    #[test]
    fn dangling_operator_is_rejected() {
        assert!(matches!(
            parse_function("x +"),
            Err(ParseError::UnexpectedInput { offset: 3, .. })
        ));
    }

    #[test]
    fn unbalanced_parenthesis_is_rejected() {
        match parse_function("(x + y") {
            Err(ParseError::UnexpectedInput {
                expected, offset, ..
            }) => {
                assert_eq!(offset, 6);
                assert!(expected.contains("')'"), "{expected}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn trailing_input_is_rejected() {
        assert!(matches!(
            parse_function("x y"),
            Err(ParseError::UnexpectedInput { offset: 2, .. })
        ));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            parse_function("x + z"),
            Err(ParseError::UnknownIdentifier {
                name: "z".into(),
                offset: 4
            })
        );
        assert!(matches!(
            parse_function("alert(1)"),
            Err(ParseError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(matches!(
            parse_function("sqrt(x, y)"),
            Err(ParseError::WrongArity {
                expected: 1,
                found: 2,
                ..
            })
        ));
        assert!(matches!(
            parse_function("atan2(x)"),
            Err(ParseError::WrongArity {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn deeply_nested_input_is_an_error() {
        let deep = format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(
            parse_function(&deep),
            Err(ParseError::TooDeep { .. })
        ));
    }

    #[test]
    fn errors_render_for_users() {
        let err = parse_function("x $ y").unwrap_err();
        assert!(
            err.to_string().starts_with("unexpected '$' at offset 2, expected"),
            "{err}"
        );
    }
}

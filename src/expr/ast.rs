//! Expression tree and its evaluator.

use std::fmt;

use strum::{EnumString, IntoStaticStr};

/// One of the two free variables of a surface function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Var {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// Single-argument functions, looked up by their lowercase name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum UnaryFn {
    Sqrt,
    Cbrt,
    Abs,
    Sign,
    Exp,
    #[strum(serialize = "ln", serialize = "log")]
    Ln,
    Log2,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Floor,
    Ceil,
    Round,
    Trunc,
}

impl UnaryFn {
    pub fn apply(self, a: f64) -> f64 {
        match self {
            UnaryFn::Sqrt => a.sqrt(),
            UnaryFn::Cbrt => a.cbrt(),
            UnaryFn::Abs => a.abs(),
            // JavaScript semantics: sign(0) is 0, sign(NaN) is NaN
            UnaryFn::Sign => {
                if a == 0.0 || a.is_nan() {
                    a
                } else {
                    a.signum()
                }
            }
            UnaryFn::Exp => a.exp(),
            UnaryFn::Ln => a.ln(),
            UnaryFn::Log2 => a.log2(),
            UnaryFn::Log10 => a.log10(),
            UnaryFn::Sin => a.sin(),
            UnaryFn::Cos => a.cos(),
            UnaryFn::Tan => a.tan(),
            UnaryFn::Asin => a.asin(),
            UnaryFn::Acos => a.acos(),
            UnaryFn::Atan => a.atan(),
            UnaryFn::Sinh => a.sinh(),
            UnaryFn::Cosh => a.cosh(),
            UnaryFn::Tanh => a.tanh(),
            UnaryFn::Floor => a.floor(),
            UnaryFn::Ceil => a.ceil(),
            // JavaScript rounds halves toward +inf
            UnaryFn::Round => {
                let floor = a.floor();
                if a - floor >= 0.5 {
                    floor + 1.0
                } else {
                    floor
                }
            }
            UnaryFn::Trunc => a.trunc(),
        }
    }
}

/// Two-argument functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryFn {
    Atan2,
    Pow,
    Min,
    Max,
    Hypot,
}

impl BinaryFn {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryFn::Atan2 => a.atan2(b),
            BinaryFn::Pow => a.powf(b),
            // NaN-propagating, unlike f64::min/max
            BinaryFn::Min => {
                if a.is_nan() || b.is_nan() {
                    f64::NAN
                } else {
                    a.min(b)
                }
            }
            BinaryFn::Max => {
                if a.is_nan() || b.is_nan() {
                    f64::NAN
                } else {
                    a.max(b)
                }
            }
            BinaryFn::Hypot => a.hypot(b),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(Var),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(UnaryFn, Box<Expr>),
    Call2(BinaryFn, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluates the tree at `(x, y)`.
    ///
    /// Domain errors are not reported: they surface as `NaN` or infinities
    /// in the result, following IEEE-754 arithmetic.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        match self {
            Expr::Const(value) => *value,
            Expr::Var(Var::X) => x,
            Expr::Var(Var::Y) => y,
            Expr::Neg(a) => -a.eval(x, y),
            Expr::Binary(op, a, b) => {
                let a = a.eval(x, y);
                let b = b.eval(x, y);
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    BinaryOp::Pow => pow(a, b),
                }
            }
            Expr::Call(func, a) => func.apply(a.eval(x, y)),
            Expr::Call2(func, a, b) => func.apply(a.eval(x, y), b.eval(x, y)),
        }
    }
}

/// Power with an integer fast path; `x ** 2` is by far the most common case.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent.abs() <= i32::MAX as f64 {
        base.powi(exponent as i32)
    } else {
        base.powf(exponent)
    }
}

/// Fully parenthesized rendering, so the parse tree can be read back exactly.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{value}"),
            Expr::Var(Var::X) => write!(f, "x"),
            Expr::Var(Var::Y) => write!(f, "y"),
            Expr::Neg(a) => write!(f, "(-{a})"),
            Expr::Binary(op, a, b) => write!(f, "({a} {} {b})", op.symbol()),
            Expr::Call(func, a) => write!(f, "{}({a})", <&'static str>::from(*func)),
            Expr::Call2(func, a, b) => {
                write!(f, "{}({a}, {b})", <&'static str>::from(*func))
            }
        }
    }
}

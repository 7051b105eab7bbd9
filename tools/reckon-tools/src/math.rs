//! Sandboxed arithmetic evaluator.

use crate::Tool;
use meval::{Context, Expr};
use std::f64::consts::{E, PI, TAU};
use thiserror::Error;

/// Maximum allowed length for math expressions to prevent abuse.
const MAX_EXPRESSION_LENGTH: usize = 1000;

/// Largest n for which n! is finite in f64.
const MAX_FACTORIAL: f64 = 170.0;

/// Failure evaluating an expression.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum MathError {
    #[error("expression too long ({0} chars, max {MAX_EXPRESSION_LENGTH})")]
    TooLong(usize),

    #[error("empty expression")]
    Empty,

    #[error("{0}")]
    Eval(String),

    #[error("result is not a number (NaN)")]
    NotANumber,

    #[error("result is infinite (division by zero or overflow)")]
    Infinite,
}

/// Evaluates arithmetic over a fixed whitelist of functions and constants.
///
/// The evaluation context starts empty and only the names registered in
/// [`whitelist`] resolve; any other identifier is an error. There is no
/// path from an expression to anything but `f64` arithmetic.
///
/// Python-style `**` is accepted as exponentiation alongside `^`.
///
/// # Example
///
/// ```
/// use reckon_tools::{MathTool, Tool};
///
/// assert_eq!(MathTool.invoke("2*(3+4)"), "14");
/// assert_eq!(MathTool.invoke("C(5, 2) + s(1234)"), "20");
/// assert!(MathTool.invoke("open(1)").starts_with("ERROR:"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MathTool;

impl MathTool {
    /// Evaluate an expression to a finite number.
    pub fn evaluate(expression: &str) -> Result<f64, MathError> {
        if expression.len() > MAX_EXPRESSION_LENGTH {
            return Err(MathError::TooLong(expression.len()));
        }
        let source = expression.trim().replace("**", "^");
        if source.is_empty() {
            return Err(MathError::Empty);
        }

        let expr: Expr = source
            .parse()
            .map_err(|e: meval::Error| MathError::Eval(e.to_string()))?;
        let context = whitelist();
        let value = expr
            .eval_with_context(&context)
            .map_err(|e| MathError::Eval(e.to_string()))?;

        if value.is_nan() {
            Err(MathError::NotANumber)
        } else if value.is_infinite() {
            Err(MathError::Infinite)
        } else {
            Ok(value)
        }
    }
}

impl Tool for MathTool {
    fn name(&self) -> &str {
        "math"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression. Supports + - * / % ^ (or **), parentheses, \
         constants pi, e, tau and functions such as sqrt, log, exp, sin, cos, floor, ceil, \
         round, abs, min, max, factorial, comb/C/binom, perm, gcd, lcm and s (digit sum)."
    }

    fn invoke(&self, argument: &str) -> String {
        match Self::evaluate(argument) {
            Ok(value) => format_number(value),
            Err(e) => {
                log::debug!("math tool rejected '{}': {}", argument, e);
                format!("ERROR: {}", e)
            }
        }
    }
}

/// Integers print without a fractional part; everything else uses the
/// shortest round-trip representation.
fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// The complete set of names an expression may reference.
fn whitelist() -> Context<'static> {
    let mut ctx = Context::empty();
    ctx.var("pi", PI)
        .var("e", E)
        .var("tau", TAU)
        .func("sqrt", f64::sqrt)
        .func("exp", f64::exp)
        .func("ln", f64::ln)
        .func("log10", f64::log10)
        .func("log2", f64::log2)
        .func("abs", f64::abs)
        .func("fabs", f64::abs)
        .func("sin", f64::sin)
        .func("cos", f64::cos)
        .func("tan", f64::tan)
        .func("asin", f64::asin)
        .func("acos", f64::acos)
        .func("atan", f64::atan)
        .func("sinh", f64::sinh)
        .func("cosh", f64::cosh)
        .func("tanh", f64::tanh)
        .func("floor", f64::floor)
        .func("ceil", f64::ceil)
        .func("trunc", f64::trunc)
        .func("degrees", f64::to_degrees)
        .func("radians", f64::to_radians)
        .func("factorial", factorial)
        .func("s", digit_sum)
        .func2("atan2", f64::atan2)
        .func2("pow", f64::powf)
        .func2("hypot", f64::hypot)
        .func2("fmod", |a, b| a % b)
        .func2("gcd", gcd)
        .func2("lcm", lcm)
        .func2("comb", comb)
        .func2("binom", comb)
        .func2("C", comb)
        .func2("perm", perm)
        .funcn("log", log, 1..)
        .funcn("round", round, 1..)
        .funcn("min", |xs: &[f64]| xs.iter().copied().fold(f64::INFINITY, f64::min), 1..)
        .funcn("max", |xs: &[f64]| xs.iter().copied().fold(f64::NEG_INFINITY, f64::max), 1..);
    ctx
}

fn as_count(x: f64) -> Option<u64> {
    (x.is_finite() && x >= 0.0 && x.fract() == 0.0 && x < 9.0e15).then_some(x as u64)
}

fn factorial(n: f64) -> f64 {
    match as_count(n) {
        Some(_) if n > MAX_FACTORIAL => f64::INFINITY,
        Some(n) => (1..=n).fold(1.0, |acc, i| acc * i as f64),
        None => f64::NAN,
    }
}

/// Binomial coefficient; zero when k > n.
fn comb(n: f64, k: f64) -> f64 {
    let (Some(n), Some(k)) = (as_count(n), as_count(k)) else {
        return f64::NAN;
    };
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    // Each partial product is itself a binomial coefficient, so it stays integral.
    (1..=k).fold(1.0, |acc, i| (acc * (n - k + i) as f64 / i as f64).round())
}

fn perm(n: f64, k: f64) -> f64 {
    let (Some(n), Some(k)) = (as_count(n), as_count(k)) else {
        return f64::NAN;
    };
    if k > n {
        return 0.0;
    }
    (n - k + 1..=n).fold(1.0, |acc, i| acc * i as f64)
}

fn gcd(a: f64, b: f64) -> f64 {
    if !(a.is_finite() && b.is_finite()) || a.fract() != 0.0 || b.fract() != 0.0 {
        return f64::NAN;
    }
    let (mut a, mut b) = (a.abs() as u64, b.abs() as u64);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a as f64
}

fn lcm(a: f64, b: f64) -> f64 {
    let g = gcd(a, b);
    if g.is_nan() {
        return f64::NAN;
    }
    if g == 0.0 {
        return 0.0;
    }
    (a / g * b).abs()
}

/// Sum of the decimal digits of the integer part.
fn digit_sum(n: f64) -> f64 {
    if !n.is_finite() {
        return f64::NAN;
    }
    format!("{:.0}", n.trunc().abs())
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(f64::from)
        .sum()
}

/// `log(x)` is natural log; `log(x, base)` uses the given base.
fn log(args: &[f64]) -> f64 {
    match args {
        [x] => x.ln(),
        [x, base] => x.ln() / base.ln(),
        _ => f64::NAN,
    }
}

/// Round half to even, optionally to `digits` decimal places.
fn round(args: &[f64]) -> f64 {
    match args {
        [x] => x.round_ties_even(),
        [x, digits] if digits.fract() == 0.0 => {
            let scale = 10f64.powi(*digits as i32);
            (x * scale).round_ties_even() / scale
        }
        _ => f64::NAN,
    }
}

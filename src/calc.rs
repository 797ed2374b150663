//! Sandboxed arithmetic evaluator for the `calc` tool.
//!
//! Only numeric literals, `+ - * / % ^` (and `**`), parentheses and a fixed
//! whitelist of constants and math functions are understood. Any other
//! identifier or character is rejected before anything is evaluated.

use std::f64::consts;
use std::fmt;

/// Bound on parser recursion and on the height of the parsed tree.
const MAX_DEPTH: usize = 256;

/// Largest n whose factorial fits in an f64.
const MAX_FACTORIAL: f64 = 170.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("name '{0}' is not allowed")]
    UnknownName(String),

    #[error("'{0}' is a constant, not a function")]
    NotCallable(String),

    #[error("'{0}' is a function and needs arguments")]
    MissingCall(String),

    #[error("{name}() takes {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error in {0}()")]
    Domain(&'static str),

    #[error("math range error in {0}()")]
    Overflow(&'static str),

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "number {n}"),
            Token::Ident(name) => write!(f, "name '{name}'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::Caret => f.write_str("'^'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // exponent: 1e3, 2.5E-4
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(text.clone()))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                i += 2;
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '%' => Token::Percent,
                    '^' => Token::Caret,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    other => return Err(CalcError::UnexpectedChar(other, i)),
                };
                tokens.push(token);
                i += 1;
            }
        }
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Sqrt,
    Abs,
    Exp,
    Ln,
    Log,
    Log10,
    Log2,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Floor,
    Ceil,
    Trunc,
    Round,
    Pow,
    Hypot,
    Min,
    Max,
    Degrees,
    Radians,
    Factorial,
}

const FUNCTIONS: &[(&str, Func)] = &[
    ("sqrt", Func::Sqrt),
    ("abs", Func::Abs),
    ("fabs", Func::Abs),
    ("exp", Func::Exp),
    ("ln", Func::Ln),
    ("log", Func::Log),
    ("log10", Func::Log10),
    ("log2", Func::Log2),
    ("sin", Func::Sin),
    ("cos", Func::Cos),
    ("tan", Func::Tan),
    ("asin", Func::Asin),
    ("acos", Func::Acos),
    ("atan", Func::Atan),
    ("atan2", Func::Atan2),
    ("sinh", Func::Sinh),
    ("cosh", Func::Cosh),
    ("tanh", Func::Tanh),
    ("floor", Func::Floor),
    ("ceil", Func::Ceil),
    ("trunc", Func::Trunc),
    ("round", Func::Round),
    ("pow", Func::Pow),
    ("hypot", Func::Hypot),
    ("min", Func::Min),
    ("max", Func::Max),
    ("degrees", Func::Degrees),
    ("radians", Func::Radians),
    ("factorial", Func::Factorial),
];

const CONSTANTS: &[(&str, f64)] = &[
    ("pi", consts::PI),
    ("e", consts::E),
    ("tau", consts::TAU),
    ("inf", f64::INFINITY),
    ("nan", f64::NAN),
];

impl Func {
    fn lookup(name: &str) -> Option<(&'static str, Func)> {
        FUNCTIONS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(n, f)| (*n, *f))
    }

    fn arity(self) -> (usize, usize, &'static str) {
        match self {
            Func::Log => (1, 2, "1 or 2"),
            Func::Atan2 | Func::Pow | Func::Hypot => (2, 2, "2"),
            Func::Min | Func::Max => (1, usize::MAX, "at least 1"),
            _ => (1, 1, "1"),
        }
    }

    fn apply(self, name: &'static str, args: &[f64]) -> Result<f64, CalcError> {
        let x = args[0];
        let domain = |ok: bool, value: f64| {
            if ok {
                Ok(value)
            } else {
                Err(CalcError::Domain(name))
            }
        };

        match self {
            Func::Sqrt => domain(x >= 0.0 || x.is_nan(), x.sqrt()),
            Func::Abs => Ok(x.abs()),
            Func::Exp => finite(name, args, x.exp()),
            Func::Ln => domain(x > 0.0, x.ln()),
            Func::Log => match args.get(1) {
                None => domain(x > 0.0, x.ln()),
                Some(&base) => domain(
                    x > 0.0 && base > 0.0 && base != 1.0,
                    x.ln() / base.ln(),
                ),
            },
            Func::Log10 => domain(x > 0.0, x.log10()),
            Func::Log2 => domain(x > 0.0, x.log2()),
            Func::Sin => domain(x.is_finite(), x.sin()),
            Func::Cos => domain(x.is_finite(), x.cos()),
            Func::Tan => domain(x.is_finite(), x.tan()),
            Func::Asin => domain((-1.0..=1.0).contains(&x), x.asin()),
            Func::Acos => domain((-1.0..=1.0).contains(&x), x.acos()),
            Func::Atan => Ok(x.atan()),
            Func::Atan2 => Ok(x.atan2(args[1])),
            Func::Sinh => finite(name, args, x.sinh()),
            Func::Cosh => finite(name, args, x.cosh()),
            Func::Tanh => Ok(x.tanh()),
            Func::Floor => Ok(x.floor()),
            Func::Ceil => Ok(x.ceil()),
            Func::Trunc => Ok(x.trunc()),
            Func::Round => Ok(x.round()),
            Func::Pow => power(x, args[1]),
            Func::Hypot => finite(name, args, x.hypot(args[1])),
            Func::Min => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
            Func::Max => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            Func::Degrees => Ok(x.to_degrees()),
            Func::Radians => Ok(x.to_radians()),
            Func::Factorial => {
                if x < 0.0 || x.fract() != 0.0 {
                    return Err(CalcError::Domain(name));
                }
                if x > MAX_FACTORIAL {
                    return Err(CalcError::Overflow(name));
                }
                Ok((1..=x as u64).fold(1.0, |acc, n| acc * n as f64))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(f64),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(&'static str, Func, Vec<Expr>),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), CalcError> {
        match self.next() {
            Some(ref token) if *token == expected => Ok(()),
            Some(token) => Err(CalcError::UnexpectedToken(token.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    // Each operator in a chain deepens the left-nested tree by one, so it
    // counts against MAX_DEPTH like a nested call does.
    fn expression(&mut self) -> Result<Expr, CalcError> {
        let outer = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.enter()?;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = outer;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let outer = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => break,
            };
            self.pos += 1;
            self.enter()?;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = outer;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        self.enter()?;
        let expr = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Expr::Neg(Box::new(self.unary()?))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()?
            }
            _ => self.power()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    // right-associative, and the exponent may carry its own sign: 2^-1
    fn power(&mut self) -> Result<Expr, CalcError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(Expr::Num(n)),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            Some(Token::Ident(name)) => self.identifier(name),
            Some(token) => Err(CalcError::UnexpectedToken(token.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn identifier(&mut self, name: String) -> Result<Expr, CalcError> {
        let lowered = name.to_ascii_lowercase();
        let called = self.peek() == Some(&Token::LParen);

        if let Some(&(_, value)) = CONSTANTS.iter().find(|(n, _)| *n == lowered) {
            if called {
                return Err(CalcError::NotCallable(name));
            }
            return Ok(Expr::Num(value));
        }

        let Some((canonical, func)) = Func::lookup(&lowered) else {
            return Err(CalcError::UnknownName(name));
        };
        if !called {
            return Err(CalcError::MissingCall(name));
        }

        self.pos += 1;
        let mut args = Vec::new();
        if self.peek() != Some(&Token::RParen) {
            loop {
                args.push(self.expression()?);
                if self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                    continue;
                }
                break;
            }
        }
        self.expect(Token::RParen)?;

        let (min, max, expected) = func.arity();
        if args.len() < min || args.len() > max {
            return Err(CalcError::Arity {
                name: canonical,
                expected,
                got: args.len(),
            });
        }

        Ok(Expr::Call(canonical, func, args))
    }
}

/// Reject a NaN or infinite result that came from finite inputs.
fn finite(name: &'static str, inputs: &[f64], value: f64) -> Result<f64, CalcError> {
    if inputs.iter().all(|x| x.is_finite()) {
        if value.is_nan() {
            return Err(CalcError::Domain(name));
        }
        if value.is_infinite() {
            return Err(CalcError::Overflow(name));
        }
    }
    Ok(value)
}

fn power(base: f64, exponent: f64) -> Result<f64, CalcError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    finite("pow", &[base, exponent], base.powf(exponent))
}

fn eval(expr: &Expr) -> Result<f64, CalcError> {
    match expr {
        Expr::Num(n) => Ok(*n),
        Expr::Neg(inner) => Ok(-eval(inner)?),
        Expr::Binary(op, lhs, rhs) => {
            let a = eval(lhs)?;
            let b = eval(rhs)?;
            match op {
                BinOp::Add => Ok(a + b),
                BinOp::Sub => Ok(a - b),
                BinOp::Mul => Ok(a * b),
                BinOp::Div if b == 0.0 => Err(CalcError::DivisionByZero),
                BinOp::Div => Ok(a / b),
                BinOp::Rem if b == 0.0 => Err(CalcError::DivisionByZero),
                // result takes the sign of the divisor
                BinOp::Rem => Ok(a - b * (a / b).floor()),
                BinOp::Pow => power(a, b),
            }
        }
        Expr::Call(name, func, args) => {
            let values = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
            func.apply(*name, &values)
        }
    }
}

/// Parse and evaluate `input`, returning the numeric result.
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser::new(tokens);
    let expr = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(CalcError::UnexpectedToken(token.to_string()));
    }

    eval(&expr)
}

/// Render a result the way a person would type it: `4`, not `4.0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        // avoid printing "-0"
        return format!("{}", value as i64);
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn calc(input: &str) -> String {
        format_number(evaluate(input).unwrap())
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(calc("2+2"), "4");
        assert_eq!(calc("(12+8)*5"), "100");
        assert_eq!(calc("7/2"), "3.5");
        assert_eq!(calc("10 - 4 - 3"), "3");
        assert_eq!(calc("0.1 + 0.2"), "0.30000000000000004");
    }

    #[test]
    fn test_power_precedence() {
        assert_eq!(calc("2^3^2"), "512");
        assert_eq!(calc("2**10"), "1024");
        assert_eq!(calc("-2^2"), "-4");
        assert_eq!(calc("2^-1"), "0.5");
        assert_eq!(calc("3*2^2"), "12");
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        assert_eq!(calc("7 % 3"), "1");
        assert_eq!(calc("-7 % 3"), "2");
        assert_eq!(calc("7 % -3"), "-2");
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(calc("sqrt(16)"), "4");
        assert_eq!(calc("max(1, 9, 3)"), "9");
        assert_eq!(calc("factorial(5)"), "120");
        assert_eq!(calc("log(8, 2)"), "3");
        assert_eq!(calc("floor(pi)"), "3");
        assert_eq!(calc("SQRT(9)"), "3");
        assert_eq!(calc("1e3 + 1"), "1001");
        assert!((evaluate("sin(pi/2)").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_foreign_identifiers() {
        assert_eq!(
            evaluate("import os"),
            Err(CalcError::UnknownName("import".to_string()))
        );
        assert!(matches!(
            evaluate("__import__('os')"),
            Err(CalcError::UnexpectedChar('\'', 11))
        ));
        assert!(matches!(evaluate("open(1)"), Err(CalcError::UnknownName(_))));
        assert!(matches!(
            evaluate("x = 1"),
            Err(CalcError::UnexpectedChar('=', 2))
        ));
        assert!(matches!(evaluate("x + 1"), Err(CalcError::UnknownName(_))));
        assert!(matches!(
            evaluate("2; 3"),
            Err(CalcError::UnexpectedChar(';', _))
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(evaluate(""), Err(CalcError::Empty));
        assert_eq!(evaluate("   "), Err(CalcError::Empty));
        assert_eq!(evaluate("(1 + 2"), Err(CalcError::UnexpectedEnd));
        assert!(matches!(evaluate("1 2"), Err(CalcError::UnexpectedToken(_))));
        assert!(matches!(evaluate("1.2.3"), Err(CalcError::InvalidNumber(_))));
        assert!(matches!(evaluate("sqrt"), Err(CalcError::MissingCall(_))));
        assert!(matches!(evaluate("pi(2)"), Err(CalcError::NotCallable(_))));
        assert!(matches!(
            evaluate("pow(2)"),
            Err(CalcError::Arity { name: "pow", .. })
        ));
    }

    #[test]
    fn test_math_errors() {
        assert_eq!(evaluate("1/0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("5 % 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("0^-1"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("sqrt(-1)"), Err(CalcError::Domain("sqrt")));
        assert_eq!(evaluate("factorial(2.5)"), Err(CalcError::Domain("factorial")));
        assert_eq!(evaluate("factorial(-1)"), Err(CalcError::Domain("factorial")));
        assert_eq!(
            evaluate("1/0").unwrap_err().to_string(),
            "division by zero"
        );
    }

    #[test]
    fn test_non_finite_results_are_errors() {
        assert_eq!(evaluate("pow(-8, 0.5)"), Err(CalcError::Domain("pow")));
        assert_eq!(evaluate("(-8)^0.5"), Err(CalcError::Domain("pow")));
        assert_eq!(evaluate("exp(1000)"), Err(CalcError::Overflow("exp")));
        assert_eq!(evaluate("10^400"), Err(CalcError::Overflow("pow")));
        assert_eq!(evaluate("sinh(1000)"), Err(CalcError::Overflow("sinh")));
        assert_eq!(evaluate("cosh(-1000)"), Err(CalcError::Overflow("cosh")));
        assert_eq!(evaluate("hypot(1e308, 1e308)"), Err(CalcError::Overflow("hypot")));
        assert_eq!(evaluate("factorial(171)"), Err(CalcError::Overflow("factorial")));
        assert_eq!(
            evaluate("exp(1000)").unwrap_err().to_string(),
            "math range error in exp()"
        );

        // non-finite inputs pass through unchanged
        assert_eq!(calc("exp(inf)"), "inf");
        assert_eq!(calc("pow(nan, 2)"), "nan");
        assert_eq!(calc("(-8)^2"), "64");
        assert!(evaluate("factorial(170)").unwrap().is_finite());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let open = "(".repeat(100_000);
        assert_eq!(evaluate(&open), Err(CalcError::TooDeep(MAX_DEPTH)));

        let nested = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate(&nested), Err(CalcError::TooDeep(MAX_DEPTH)));

        let negated = format!("{}1", "-".repeat(100_000));
        assert_eq!(evaluate(&negated), Err(CalcError::TooDeep(MAX_DEPTH)));

        let chained = format!("{}1", "1+".repeat(100_000));
        assert_eq!(evaluate(&chained), Err(CalcError::TooDeep(MAX_DEPTH)));

        let powers = format!("{}1", "1^".repeat(100_000));
        assert_eq!(evaluate(&powers), Err(CalcError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn test_moderate_nesting_still_evaluates() {
        let nested = format!("{}2{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(calc(&nested), "2");
        assert_eq!(calc(&format!("{}1", "1+".repeat(100))), "101");
        assert_eq!(calc("--3"), "3");
        assert_eq!(calc("max(1, (2), ((3)))"), "3");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NAN), "nan");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    proptest! {
        #[test]
        fn prop_integer_addition_matches(a in -100_000i64..100_000, b in -100_000i64..100_000) {
            let expr = format!("{a} + ({b})");
            prop_assert_eq!(calc(&expr), (a + b).to_string());
        }

        #[test]
        fn prop_never_panics(input in "[0-9a-z+*/^%().,_ -]{0,24}") {
            let _ = evaluate(&input);
        }
    }
}

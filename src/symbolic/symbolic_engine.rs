//! # Symbolic Engine Module
//!
//! Core expression tree used by every calculus operation of the crate. It is the "symbolic math
//! engine" collaborator: text is parsed into an [`Expr`], which can be evaluated, differentiated,
//! simplified and printed back either in canonical call syntax (what the engine consumes) or in
//! display notation (what a student reads).
//!
//! ## Main Structures
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - free variables like "x"; `e` and `pi` are named constants
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`, `Neg`
//! - **Functions**: `Call(Func, arg)` - one-argument elementary functions
//!
//! ### `Func` Enum
//! Catalog of the supported elementary functions. The canonical spelling is derived with `strum`
//! (`Func::Log10` prints as `log10`), user aliases (`ln`, `log`, `arcsin`, ...) are resolved by
//! [`Func::from_name`].
//!
//! ## Printing
//!
//! Two notations share one printer with precedence-driven parenthesization:
//! - **Canonical**: `pow(x,2)`, `log10(x)`, `asin(x)` - the `Display` impl
//! - **Display**: `x^2`, `log(x)`, `arcsin(x)` - [`Expr::to_display_string`]
//!
//! Printing and re-parsing a canonical string yields the same string, which is what makes
//! notation normalization idempotent.

use std::fmt;
use std::str::FromStr;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Names that evaluate to mathematical constants unless explicitly bound.
pub const NAMED_CONSTANTS: [(&str, f64); 2] =
    [("e", std::f64::consts::E), ("pi", std::f64::consts::PI)];

/// One-argument elementary functions known to the engine.
///
/// The derived `IntoStaticStr`/`EnumString` use the canonical lowercase spelling; the variant order is
/// the catalog order used by the expression analyzer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sech,
    Csch,
    Coth,
    Ln,
    Log10,
    Log2,
    Exp,
    Sqrt,
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,
    Factorial,
    Gamma,
}

impl Func {
    /// Resolves a lowercase function name, accepting both user and canonical spellings.
    ///
    /// `log` is the base-10 logarithm and `ln` the natural one; `arcsin`/`arccos`/`arctan`
    /// collapse onto `asin`/`acos`/`atan`.
    pub fn from_name(name: &str) -> Option<Func> {
        match name {
            "log" => Some(Func::Log10),
            "arcsin" => Some(Func::Asin),
            "arccos" => Some(Func::Acos),
            "arctan" => Some(Func::Atan),
            other => Func::from_str(other).ok(),
        }
    }

    /// Spelling used by the engine.
    pub fn canonical_name(&self) -> &'static str {
        (*self).into()
    }

    /// Spelling shown to the user.
    pub fn display_name(&self) -> &'static str {
        match self {
            Func::Log10 => "log",
            Func::Asin => "arcsin",
            Func::Acos => "arccos",
            Func::Atan => "arctan",
            other => other.canonical_name(),
        }
    }

    /// true for the logarithm family (ln, log10, log2)
    pub fn is_logarithm(&self) -> bool {
        matches!(self, Func::Ln | Func::Log10 | Func::Log2)
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// Core symbolic expression enum representing a formula as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// assert_eq!(expr.to_string(), "x+2");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Unary minus
    Neg(Box<Expr>),
    /// Elementary function applied to one argument
    Call(Func, Box<Expr>),
}

/// Which spelling the printer produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notation {
    /// engine call syntax: `pow(x,2)`, `log10(x)`, `asin(x)`
    Canonical,
    /// student notation: `x^2`, `log(x)`, `arcsin(x)`
    Display,
}

// binding strength used by the printer
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

/// Formats a number so that the parser reads back the same value.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // folds -0 into 0
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(Notation::Canonical))
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Shorthand for `Expr::Var(name.to_string())`.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// Applies an elementary function to `self`.
    pub fn call(self, func: Func) -> Expr {
        Expr::Call(func, self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Checks if expression is exactly the constant `value`.
    pub fn is_const(&self, value: f64) -> bool {
        matches!(self, Expr::Const(val) if *val == value)
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        self.is_const(0.0)
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            Expr::Neg(expr) | Expr::Call(_, expr) => expr.contains_variable(var_name),
        }
    }

    /// Extracts all unique free variable names (named constants excluded), sorted.
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        match self {
            Expr::Var(name) => {
                if !NAMED_CONSTANTS.iter().any(|(constant, _)| constant == name) {
                    vars.push(name.clone());
                }
            }
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                vars.extend(lhs.all_arguments_are_variables());
                vars.extend(rhs.all_arguments_are_variables());
            }
            Expr::Neg(expr) | Expr::Call(_, expr) => {
                vars.extend(expr.all_arguments_are_variables());
            }
        }
        vars.sort();
        vars.dedup();
        vars
    }

    /// Collects every denominator of the tree in pre-order (outermost division first).
    pub fn denominators(&self) -> Vec<&Expr> {
        let mut found = Vec::new();
        self.visit_preorder(&mut |node| {
            if let Expr::Div(_, rhs) = node {
                found.push(rhs.as_ref());
            }
        });
        found
    }

    /// Collects the argument of every logarithm call in pre-order.
    pub fn logarithm_arguments(&self) -> Vec<&Expr> {
        let mut found = Vec::new();
        self.visit_preorder(&mut |node| {
            if let Expr::Call(func, arg) = node {
                if func.is_logarithm() {
                    found.push(arg.as_ref());
                }
            }
        });
        found
    }

    fn visit_preorder<'a>(&'a self, visit: &mut dyn FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Var(_) | Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.visit_preorder(visit);
                rhs.visit_preorder(visit);
            }
            Expr::Neg(expr) | Expr::Call(_, expr) => expr.visit_preorder(visit),
        }
    }

    //___________________________________PRINTING____________________________________

    /// Renders the expression in student notation (`x^2`, `log(x)`, `arcsin(x)`).
    pub fn to_display_string(&self) -> String {
        self.render(Notation::Display)
    }

    /// Renders the expression in the requested notation.
    pub fn render(&self, notation: Notation) -> String {
        match self {
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => format_number(*val),
            Expr::Add(lhs, rhs) => format!(
                "{}+{}",
                lhs.render_operand(notation, PREC_SUM, false),
                rhs.render_operand(notation, PREC_SUM, true)
            ),
            Expr::Sub(lhs, rhs) => format!(
                "{}-{}",
                lhs.render_operand(notation, PREC_SUM, false),
                rhs.render_operand(notation, PREC_SUM, true)
            ),
            Expr::Mul(lhs, rhs) => format!(
                "{}*{}",
                lhs.render_operand(notation, PREC_PRODUCT, false),
                rhs.render_operand(notation, PREC_PRODUCT, true)
            ),
            Expr::Div(lhs, rhs) => format!(
                "{}/{}",
                lhs.render_operand(notation, PREC_PRODUCT, false),
                rhs.render_operand(notation, PREC_PRODUCT, true)
            ),
            Expr::Pow(base, exp) => match notation {
                Notation::Canonical => {
                    format!("pow({},{})", base.render(notation), exp.render(notation))
                }
                Notation::Display => {
                    let base_str = if base.precedence() <= PREC_POWER {
                        format!("({})", base.render(notation))
                    } else {
                        base.render(notation)
                    };
                    let exp_str = if exp.precedence() < PREC_POWER {
                        format!("({})", exp.render(notation))
                    } else {
                        exp.render(notation)
                    };
                    format!("{}^{}", base_str, exp_str)
                }
            },
            Expr::Neg(expr) => {
                // -x^2 reads as -(x^2), so only looser operands need brackets
                if expr.precedence() <= PREC_UNARY {
                    format!("-({})", expr.render(notation))
                } else {
                    format!("-{}", expr.render(notation))
                }
            }
            Expr::Call(func, arg) => {
                let name = match notation {
                    Notation::Canonical => func.canonical_name(),
                    Notation::Display => func.display_name(),
                };
                format!("{}({})", name, arg.render(notation))
            }
        }
    }

    /// Renders an operand of a left-associative binary operator of strength `parent`.
    fn render_operand(&self, notation: Notation, parent: u8, right_side: bool) -> String {
        let own = self.precedence();
        let needs_brackets = if right_side {
            own <= parent || own == PREC_UNARY
        } else {
            own < parent
        };
        if needs_brackets {
            format!("({})", self.render(notation))
        } else {
            self.render(notation)
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => PREC_SUM,
            Expr::Mul(_, _) | Expr::Div(_, _) => PREC_PRODUCT,
            Expr::Neg(_) => PREC_UNARY,
            Expr::Const(val) if *val < 0.0 => PREC_UNARY,
            // pow(a,b) is a call in canonical form but an infix operator in display form;
            // the printer decides on brackets itself for the display form
            Expr::Pow(_, _) => PREC_POWER,
            Expr::Var(_) | Expr::Const(_) | Expr::Call(_, _) => PREC_ATOM,
        }
    }
}

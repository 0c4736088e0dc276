//! # Symbolic Engine Derivatives Module
//!
//! Extends [`Expr`] with the numerical side of the engine and with analytical differentiation.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var)` - analytical derivative; sum, product, quotient and chain rules, general power
//!   rule and a table entry for every [`Func`]
//!
//! ### Function evaluation
//! - `eval_expression(bindings)` - direct evaluation of the tree with IEEE semantics
//! - `lambdify1D(var)` - closure of one variable built once and reused for sampling loops
//!
//! ### Numerical Analysis
//! - `compare_num1D()` - checks an analytical derivative against central differences (test builds)
//!
//! Division by zero is not an error: it yields ±inf (or NaN for 0/0) exactly like `f64` does, the
//! callers decide how to classify non-finite values. The only evaluation error is a variable
//! with no value.

use crate::symbolic::symbolic_engine::{Expr, Func, NAMED_CONSTANTS};
use crate::symbolic::utils::{factorial, gamma};
#[cfg(test)]
use crate::symbolic::utils::{linspace, norm, numerical_derivative};
use std::collections::HashMap;
use thiserror::Error;

/// Evaluation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("variable '{0}' has no value")]
    UnboundVariable(String),
}

/// Differentiation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiffError {
    #[error("{0} has no derivative in elementary functions")]
    Unsupported(Func),
}

/// A compiled function of one variable.
pub type Lambdified1D = Box<dyn Fn(f64) -> f64 + Send + Sync>;

// sign with sign(0) = 0, f64::signum gives 1 for +0
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        // 0 and NaN pass through
        x * 0.0
    }
}

impl Func {
    /// Applies the function to a number.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Sec => 1.0 / x.cos(),
            Func::Csc => 1.0 / x.sin(),
            Func::Cot => x.cos() / x.sin(),
            Func::Asin => x.asin(),
            Func::Acos => x.acos(),
            Func::Atan => x.atan(),
            Func::Sinh => x.sinh(),
            Func::Cosh => x.cosh(),
            Func::Tanh => x.tanh(),
            Func::Sech => 1.0 / x.cosh(),
            Func::Csch => 1.0 / x.sinh(),
            Func::Coth => x.cosh() / x.sinh(),
            Func::Ln => x.ln(),
            Func::Log10 => x.log10(),
            Func::Log2 => x.log2(),
            Func::Exp => x.exp(),
            Func::Sqrt => x.sqrt(),
            Func::Abs => x.abs(),
            Func::Floor => x.floor(),
            Func::Ceil => x.ceil(),
            Func::Round => x.round(),
            Func::Sign => sign(x),
            Func::Factorial => factorial(x),
            Func::Gamma => gamma(x),
        }
    }
}

fn square(expr: Expr) -> Expr {
    expr.pow(Expr::Const(2.0))
}

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements all standard differentiation rules from calculus:
    /// - Power rule: d/dx(u^c) = c*u^(c-1)*u' for an exponent free of `var`
    /// - Exponential rule: d/dx(c^v) = c^v*ln(c)*v' for a base free of `var`
    /// - General power rule: d/dx(u^v) = u^v*(v'*ln(u)+v*u'/u)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// The result is not simplified, `x^2` gives `2*pow(x,2-1)*1`.
    ///
    /// # Errors
    /// `DiffError::Unsupported` for gamma and factorial.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::var("x").pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x")?.simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Result<Expr, DiffError> {
        let derivative = match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => lhs.diff(var)? + rhs.diff(var)?,
            Expr::Sub(lhs, rhs) => lhs.diff(var)? - rhs.diff(var)?,
            Expr::Mul(lhs, rhs) => {
                lhs.diff(var)? * *rhs.clone() + *lhs.clone() * rhs.diff(var)?
            }
            Expr::Div(lhs, rhs) => {
                (lhs.diff(var)? * *rhs.clone() - *lhs.clone() * rhs.diff(var)?)
                    / square(*rhs.clone())
            }
            Expr::Pow(base, exp) => {
                let (u, v) = (base.as_ref().clone(), exp.as_ref().clone());
                if !v.contains_variable(var) {
                    let du = u.diff(var)?;
                    v.clone() * u.pow(v - Expr::Const(1.0)) * du
                } else if !u.contains_variable(var) {
                    self.clone() * u.call(Func::Ln) * v.diff(var)?
                } else {
                    let (du, dv) = (u.diff(var)?, v.diff(var)?);
                    self.clone() * (dv * u.clone().call(Func::Ln) + v * du / u)
                }
            }
            Expr::Neg(expr) => -expr.diff(var)?,
            Expr::Call(func, arg) => {
                let u = *arg.clone();
                let du = arg.diff(var)?;
                match func {
                    Func::Sin => u.call(Func::Cos) * du,
                    Func::Cos => -u.call(Func::Sin) * du,
                    Func::Tan => du / square(u.call(Func::Cos)),
                    Func::Sec => u.clone().call(Func::Sec) * u.call(Func::Tan) * du,
                    Func::Csc => -(u.clone().call(Func::Csc)) * u.call(Func::Cot) * du,
                    Func::Cot => -du / square(u.call(Func::Sin)),
                    Func::Asin => du / (Expr::Const(1.0) - square(u)).call(Func::Sqrt),
                    Func::Acos => -du / (Expr::Const(1.0) - square(u)).call(Func::Sqrt),
                    Func::Atan => du / (Expr::Const(1.0) + square(u)),
                    Func::Sinh => u.call(Func::Cosh) * du,
                    Func::Cosh => u.call(Func::Sinh) * du,
                    Func::Tanh => du / square(u.call(Func::Cosh)),
                    Func::Sech => -(u.clone().call(Func::Sech)) * u.call(Func::Tanh) * du,
                    Func::Csch => -(u.clone().call(Func::Csch)) * u.call(Func::Coth) * du,
                    Func::Coth => -du / square(u.call(Func::Sinh)),
                    Func::Ln => du / u,
                    Func::Log10 => du / (u * Expr::Const(10.0).call(Func::Ln)),
                    Func::Log2 => du / (u * Expr::Const(2.0).call(Func::Ln)),
                    Func::Exp => u.call(Func::Exp) * du,
                    Func::Sqrt => du / (Expr::Const(2.0) * u.call(Func::Sqrt)),
                    Func::Abs => u.call(Func::Sign) * du,
                    // piecewise constant
                    Func::Floor | Func::Ceil | Func::Round | Func::Sign => Expr::Const(0.0),
                    Func::Factorial | Func::Gamma => return Err(DiffError::Unsupported(*func)),
                }
            }
        };
        Ok(derivative)
    } // end of diff

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates the expression with the given variable values.
    ///
    /// Bindings shadow the named constants `e` and `pi`; any other free variable without a
    /// binding is an error. Non-finite results are returned as they are.
    pub fn eval_expression(&self, bindings: &HashMap<String, f64>) -> Result<f64, EvalError> {
        let value = match self {
            Expr::Var(name) => match bindings.get(name) {
                Some(value) => *value,
                None => NAMED_CONSTANTS
                    .iter()
                    .find(|(constant, _)| constant == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| EvalError::UnboundVariable(name.clone()))?,
            },
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_expression(bindings)? + rhs.eval_expression(bindings)?,
            Expr::Sub(lhs, rhs) => lhs.eval_expression(bindings)? - rhs.eval_expression(bindings)?,
            Expr::Mul(lhs, rhs) => lhs.eval_expression(bindings)? * rhs.eval_expression(bindings)?,
            Expr::Div(lhs, rhs) => lhs.eval_expression(bindings)? / rhs.eval_expression(bindings)?,
            Expr::Pow(base, exp) => base
                .eval_expression(bindings)?
                .powf(exp.eval_expression(bindings)?),
            Expr::Neg(expr) => -expr.eval_expression(bindings)?,
            Expr::Call(func, arg) => func.apply(arg.eval_expression(bindings)?),
        };
        Ok(value)
    } // end of eval_expression

    /// Evaluates a one-variable expression at `x`.
    pub fn eval_at(&self, var: &str, x: f64) -> Result<f64, EvalError> {
        let mut bindings = HashMap::new();
        bindings.insert(var.to_string(), x);
        self.eval_expression(&bindings)
    }

    //___________________________________________________________________________________________________________________
    //                    1D FUNCTION PROCESSING - Single Variable Functions y = f(x)
    // _________________________________________________________________________________________________________________

    /// Turns the expression into a closure of `var`.
    ///
    /// Free variables are checked once here, so the closure itself cannot fail.
    pub fn lambdify1D(&self, var: &str) -> Result<Lambdified1D, EvalError> {
        if let Some(unbound) = self
            .all_arguments_are_variables()
            .into_iter()
            .find(|name| name != var)
        {
            return Err(EvalError::UnboundVariable(unbound));
        }
        Ok(self.compile1D(var))
    }

    fn compile1D(&self, var: &str) -> Lambdified1D {
        match self {
            Expr::Var(name) if name == var => Box::new(|x| x),
            Expr::Var(name) => {
                let value = NAMED_CONSTANTS
                    .iter()
                    .find(|(constant, _)| constant == name)
                    .map(|(_, value)| *value)
                    .unwrap_or(f64::NAN);
                Box::new(move |_| value)
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile1D(var), rhs.compile1D(var));
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile1D(var), rhs.compile1D(var));
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile1D(var), rhs.compile1D(var));
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile1D(var), rhs.compile1D(var));
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => {
                let (base_fn, exp_fn) = (base.compile1D(var), exp.compile1D(var));
                Box::new(move |x| base_fn(x).powf(exp_fn(x)))
            }
            Expr::Neg(expr) => {
                let expr_fn = expr.compile1D(var);
                Box::new(move |x| -expr_fn(x))
            }
            Expr::Call(func, arg) => {
                let func = *func;
                let arg_fn = arg.compile1D(var);
                Box::new(move |x| func.apply(arg_fn(x)))
            }
        }
    }

    /// Validates the analytical derivative against central differences over a grid.
    ///
    /// # Returns
    /// Tuple of (actual_norm, is_within_tolerance)
    #[cfg(test)]
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), String> {
        let derivative = self.diff(var).map_err(|e| e.to_string())?;
        let derivative_fn = derivative.lambdify1D(var).map_err(|e| e.to_string())?;
        let function = self.lambdify1D(var).map_err(|e| e.to_string())?;
        let domain = linspace(start, end, num_values);
        let analytical: Vec<f64> = domain.iter().map(|x| derivative_fn(*x)).collect();
        let step = 1e-4 * (end - start) / (num_values as f64 - 1.0);
        let numerical = numerical_derivative(function, domain, step);
        let norma_val = norm(&analytical, &numerical);
        Ok((norma_val, norma_val < max_norm))
    }
}

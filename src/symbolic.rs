#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use step_calculus::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 + ln(x)").unwrap();
/// // canonical call syntax
/// assert_eq!(parsed_expression.to_string(), "pow(x,2)+ln(x)");
/// // student notation
/// assert_eq!(parsed_expression.to_display_string(), "x^2+ln(x)");
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) evaluates, differentiates and simplifies it
/// 3) turns a symbolic expression into a Rust function
///# Example#
/// ```
/// use step_calculus::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^3").unwrap();
/// // derivative, raw and simplified
/// let df_dx = f.diff("x").unwrap();
/// assert_eq!(df_dx.to_string(), "3*pow(x,3-1)*1");
/// assert_eq!(df_dx.simplify().to_display_string(), "3*x^2");
/// // evaluation
/// assert_eq!(f.eval_at("x", 2.0).unwrap(), 8.0);
/// // closure for repeated evaluation
/// let f_x = f.lambdify1D("x").unwrap();
/// assert_eq!(f_x(3.0), 27.0);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
mod symbolic_engine_tests;
pub mod symbolic_simplify;
/// the seam between the calculus layer and a symbolic engine: text in, text out
/// Example#
/// ```
/// use step_calculus::symbolic::symbolic_traits::{NativeEngine, SymbolicEngine};
/// let engine = NativeEngine::new();
/// let raw = engine.differentiate("pow(x,2)", "x").unwrap();
/// assert_eq!(engine.simplify(&raw).unwrap(), "2*x");
/// assert_eq!(engine.evaluate_at("pow(x,2)", "x", 2.0).unwrap(), 4.0);
/// ```
pub mod symbolic_traits;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions: bracket scanning, grids, gamma function
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;

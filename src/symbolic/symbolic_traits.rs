// SYMBOLIC TRAITS //////////////////////////////////////////////////////////////////
// The calculus layer talks to a symbolic engine only through canonical strings.
// The trait is implemented for the native engine below,
// add other engines here as needed

use crate::symbolic::parse_expr::{ParseError, parse_expression_func};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_engine_derivatives::{DiffError, EvalError};
use std::collections::HashMap;
use thiserror::Error;

/// Failure of a symbolic engine, carrying the canonical text it was given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("cannot parse '{expression}': {source}")]
    Parse {
        expression: String,
        source: ParseError,
    },
    #[error("cannot evaluate '{expression}': {source}")]
    Evaluate {
        expression: String,
        source: EvalError,
    },
    #[error("cannot differentiate '{expression}': {source}")]
    Differentiate {
        expression: String,
        source: DiffError,
    },
}

/// Function of one variable produced by [`SymbolicEngine::lambdify`].
pub type Lambdified<'a> = Box<dyn Fn(f64) -> Result<f64, EngineError> + 'a>;

/// Parse, evaluate, differentiate and simplify over canonical call syntax.
pub trait SymbolicEngine: Send + Sync {
    fn evaluate(
        &self,
        expression: &str,
        bindings: &HashMap<String, f64>,
    ) -> Result<f64, EngineError>;
    fn differentiate(&self, expression: &str, variable: &str) -> Result<String, EngineError>;
    fn simplify(&self, expression: &str) -> Result<String, EngineError>;

    /// Evaluates a one-variable expression at `x`.
    fn evaluate_at(&self, expression: &str, variable: &str, x: f64) -> Result<f64, EngineError> {
        let mut bindings = HashMap::new();
        bindings.insert(variable.to_string(), x);
        self.evaluate(expression, &bindings)
    }

    /// Function of `variable` for repeated evaluation. The default re-evaluates the text on
    /// every call, engines that can compile should override it.
    fn lambdify<'a>(
        &'a self,
        expression: &str,
        variable: &str,
    ) -> Result<Lambdified<'a>, EngineError> {
        let (expression, variable) = (expression.to_string(), variable.to_string());
        Ok(Box::new(move |x| self.evaluate_at(&expression, &variable, x)))
    }
}

///////////////// IMPLEMENTATION OF THE TRAIT FOR THE NATIVE ENGINE /////////////////////////
/// Engine built on [`Expr`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl NativeEngine {
    pub fn new() -> Self {
        NativeEngine
    }

    /// Parses canonical (or display) text into a tree.
    pub fn parse(&self, expression: &str) -> Result<Expr, EngineError> {
        parse_expression_func(expression).map_err(|source| EngineError::Parse {
            expression: expression.to_string(),
            source,
        })
    }
}

impl SymbolicEngine for NativeEngine {
    fn evaluate(
        &self,
        expression: &str,
        bindings: &HashMap<String, f64>,
    ) -> Result<f64, EngineError> {
        self.parse(expression)?
            .eval_expression(bindings)
            .map_err(|source| EngineError::Evaluate {
                expression: expression.to_string(),
                source,
            })
    }

    fn differentiate(&self, expression: &str, variable: &str) -> Result<String, EngineError> {
        let derivative =
            self.parse(expression)?
                .diff(variable)
                .map_err(|source| EngineError::Differentiate {
                    expression: expression.to_string(),
                    source,
                })?;
        Ok(derivative.to_string())
    }

    fn simplify(&self, expression: &str) -> Result<String, EngineError> {
        Ok(self.parse(expression)?.simplify().to_string())
    }

    fn lambdify<'a>(
        &'a self,
        expression: &str,
        variable: &str,
    ) -> Result<Lambdified<'a>, EngineError> {
        let function = self
            .parse(expression)?
            .lambdify1D(variable)
            .map_err(|source| EngineError::Evaluate {
                expression: expression.to_string(),
                source,
            })?;
        Ok(Box::new(move |x| Ok(function(x))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_native_evaluate() {
        let engine = NativeEngine::new();
        let value = engine.evaluate_at("pow(x,2)+1", "x", 3.0).unwrap();
        assert_eq!(value, 10.0);
        let value = engine.evaluate_at("log10(x)", "x", 1000.0).unwrap();
        assert_relative_eq!(value, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_native_evaluate_errors() {
        let engine = NativeEngine::new();
        let err = engine.evaluate_at("sin(x", "x", 1.0).unwrap_err();
        assert!(matches!(err, EngineError::Parse { .. }));
        let err = engine.evaluate_at("x+y", "x", 1.0).unwrap_err();
        assert!(matches!(err, EngineError::Evaluate { .. }));
        assert!(err.to_string().contains("'y'"));
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        let engine = NativeEngine::new();
        assert_eq!(engine.evaluate_at("1/x", "x", 0.0).unwrap(), f64::INFINITY);
        assert!(engine.evaluate_at("x/x", "x", 0.0).unwrap().is_nan());
    }

    #[test]
    fn test_native_differentiate_and_simplify() {
        let engine = NativeEngine::new();
        let raw = engine.differentiate("pow(x,2)", "x").unwrap();
        assert_eq!(raw, "2*pow(x,2-1)*1");
        assert_eq!(engine.simplify(&raw).unwrap(), "2*x");
        let err = engine.differentiate("gamma(x)", "x").unwrap_err();
        assert!(matches!(err, EngineError::Differentiate { .. }));
    }

    #[test]
    fn test_native_lambdify_matches_evaluate() {
        let engine = NativeEngine::new();
        let f = engine.lambdify("sin(x)/x", "x").unwrap();
        for x in [0.5, 1.0, 2.0] {
            assert_relative_eq!(
                f(x).unwrap(),
                engine.evaluate_at("sin(x)/x", "x", x).unwrap(),
                epsilon = 1e-15
            );
        }
        assert!(engine.lambdify("x+y", "x").is_err());
    }

    struct TextEngine;

    impl SymbolicEngine for TextEngine {
        fn evaluate(
            &self,
            expression: &str,
            bindings: &HashMap<String, f64>,
        ) -> Result<f64, EngineError> {
            NativeEngine.evaluate(expression, bindings)
        }
        fn differentiate(&self, expression: &str, variable: &str) -> Result<String, EngineError> {
            NativeEngine.differentiate(expression, variable)
        }
        fn simplify(&self, expression: &str) -> Result<String, EngineError> {
            NativeEngine.simplify(expression)
        }
    }

    #[test]
    fn test_default_lambdify_reevaluates() {
        let engine = TextEngine;
        let f = engine.lambdify("pow(x,3)", "x").unwrap();
        assert_eq!(f(2.0).unwrap(), 8.0);
        assert!(engine.lambdify("x+y", "x").unwrap()(1.0).is_err());
    }
}

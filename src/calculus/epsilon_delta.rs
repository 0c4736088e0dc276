//! # Epsilon-delta search
//!
//! Numerical exploration of the definition of a limit: for a given epsilon, look for a delta such
//! that every probe within delta of the point lands within epsilon of the limit value.
//!
//! The search is heuristic. It starts from a small delta and shrinks it geometrically; if no
//! candidate is accepted it falls back to a floor value, reported as [`DeltaSearch::Floor`] so
//! that callers can tell a found delta from a best-effort one.
//!
//! All functions take the canonical text of the expression.

use crate::calculus::errors::CalculusError;
use crate::calculus::types::{
    DeltaSearch, EpsilonDeltaResult, LimitPoint, ProbeSample, VerificationReport,
};
use crate::symbolic::symbolic_traits::{EngineError, SymbolicEngine};
use log::{debug, info, warn};

/// Half-width of the two-sided probe used for removable singularities.
const REMOVABLE_STEP: f64 = 1e-7;
/// How close the two one-sided values must be to call the singularity removable.
const REMOVABLE_AGREEMENT: f64 = 1e-4;

/// Tunables of the delta search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaSearchConfig {
    pub initial_delta: f64,
    pub shrink_factor: f64,
    pub max_iterations: usize,
    /// value reported when no candidate is accepted
    pub floor: f64,
}

impl Default for DeltaSearchConfig {
    fn default() -> Self {
        DeltaSearchConfig {
            initial_delta: 0.001,
            shrink_factor: 0.9,
            max_iterations: 1000,
            floor: 1e-6,
        }
    }
}

impl DeltaSearchConfig {
    pub fn validate(&self) -> Result<(), CalculusError> {
        if !(self.initial_delta.is_finite() && self.initial_delta > 0.0) {
            return Err(CalculusError::InvalidArgument(format!(
                "initial delta must be positive, got {}",
                self.initial_delta
            )));
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(CalculusError::InvalidArgument(format!(
                "shrink factor must lie in (0, 1), got {}",
                self.shrink_factor
            )));
        }
        if self.max_iterations == 0 {
            return Err(CalculusError::InvalidArgument(
                "max iterations must be at least 1".to_string(),
            ));
        }
        if !(self.floor.is_finite() && self.floor > 0.0) {
            return Err(CalculusError::InvalidArgument(format!(
                "delta floor must be positive, got {}",
                self.floor
            )));
        }
        Ok(())
    }
}

/// Candidate deltas in the order they are tried: `initial_delta * shrink_factor^k`.
///
/// # Examples
/// ```
/// use step_calculus::calculus::epsilon_delta::{delta_candidates, DeltaSearchConfig};
/// let first: Vec<f64> = delta_candidates(&DeltaSearchConfig::default()).take(2).collect();
/// assert_eq!(first[0], 0.001);
/// assert!(first[1] < first[0]);
/// ```
pub fn delta_candidates(config: &DeltaSearchConfig) -> impl Iterator<Item = f64> + use<> {
    let (initial, shrink) = (config.initial_delta, config.shrink_factor);
    (0..config.max_iterations).scan(initial, move |delta, _| {
        let current = *delta;
        *delta *= shrink;
        Some(current)
    })
}

/// The four abscissas checked for a given delta, in ascending order.
pub fn probe_points(a: f64, delta: f64) -> [f64; 4] {
    [a - delta, a - delta / 2.0, a + delta / 2.0, a + delta]
}

fn probe(
    f: &dyn Fn(f64) -> Result<f64, EngineError>,
    x: f64,
    limit_value: f64,
    epsilon: f64,
) -> ProbeSample {
    match f(x) {
        Ok(fx) if fx.is_finite() => {
            let deviation = (fx - limit_value).abs();
            ProbeSample {
                x,
                fx: Some(fx),
                deviation: Some(deviation),
                within_tolerance: deviation < epsilon,
            }
        }
        _ => ProbeSample {
            x,
            fx: None,
            deviation: None,
            within_tolerance: false,
        },
    }
}

fn check_epsilon(expr: &str, epsilon: f64) -> Result<(), CalculusError> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(CalculusError::epsilon_delta(
            expr,
            format!("epsilon must be a positive number, got {}", epsilon),
        ))
    }
}

/// Value the function approaches at `point`.
///
/// Finite points whose direct evaluation is not finite get one more chance: if f(a-1e-7) and
/// f(a+1e-7) are both finite and agree within 1e-4, their mean is taken (removable singularity).
pub fn limit_value(
    engine: &dyn SymbolicEngine,
    expr: &str,
    variable: &str,
    point: LimitPoint,
) -> Result<f64, CalculusError> {
    let a = point.value();
    let evaluate = |x: f64| {
        engine
            .evaluate_at(expr, variable, x)
            .map_err(|e| CalculusError::epsilon_delta(expr, e))
    };
    let value = evaluate(a)?;
    if value.is_finite() {
        return Ok(value);
    }
    if let LimitPoint::Finite(a) = point {
        let left = evaluate(a - REMOVABLE_STEP)?;
        let right = evaluate(a + REMOVABLE_STEP)?;
        if left.is_finite() && right.is_finite() && (left - right).abs() < REMOVABLE_AGREEMENT {
            let approximation = (left + right) / 2.0;
            debug!(
                "{} is undefined at {}, removable singularity gives {}",
                expr, a, approximation
            );
            return Ok(approximation);
        }
    }
    Err(CalculusError::epsilon_delta(
        expr,
        format!("the function has no finite limit value at {}", point),
    ))
}

/// Largest candidate delta for which all four probes land within `epsilon` of `limit_value`.
pub fn find_delta(
    engine: &dyn SymbolicEngine,
    expr: &str,
    variable: &str,
    point: LimitPoint,
    limit_value: f64,
    epsilon: f64,
    config: &DeltaSearchConfig,
) -> Result<DeltaSearch, CalculusError> {
    check_epsilon(expr, epsilon)?;
    config.validate()?;
    let f = engine
        .lambdify(expr, variable)
        .map_err(|e| CalculusError::epsilon_delta(expr, e))?;
    let a = point.value();
    for (index, delta) in delta_candidates(config).enumerate() {
        let accepted = probe_points(a, delta)
            .iter()
            .all(|&x| probe(&*f, x, limit_value, epsilon).within_tolerance);
        if accepted {
            info!("delta {} accepted after {} iteration(s)", delta, index + 1);
            return Ok(DeltaSearch::Accepted {
                delta,
                iterations: index + 1,
            });
        }
    }
    warn!(
        "no delta accepted for {} after {} iterations, using the floor {}",
        expr, config.max_iterations, config.floor
    );
    Ok(DeltaSearch::Floor {
        delta: config.floor,
    })
}

/// Re-checks the four probes of `delta`. A probe that cannot be evaluated counts as failed.
pub fn verify(
    engine: &dyn SymbolicEngine,
    expr: &str,
    variable: &str,
    point: LimitPoint,
    limit_value: f64,
    delta: f64,
    epsilon: f64,
) -> VerificationReport {
    let f = |x: f64| engine.evaluate_at(expr, variable, x);
    let samples = probe_points(point.value(), delta)
        .iter()
        .map(|&x| probe(&f, x, limit_value, epsilon))
        .collect();
    VerificationReport::from_samples(samples)
}

/// Limit value, delta search and verification in one go.
pub fn epsilon_delta(
    engine: &dyn SymbolicEngine,
    expr: &str,
    variable: &str,
    point: LimitPoint,
    epsilon: f64,
    config: &DeltaSearchConfig,
) -> Result<EpsilonDeltaResult, CalculusError> {
    check_epsilon(expr, epsilon)?;
    let limit = limit_value(engine, expr, variable, point)?;
    let delta = find_delta(engine, expr, variable, point, limit, epsilon, config)?;
    let verification = verify(engine, expr, variable, point, limit, delta.delta(), epsilon);
    Ok(EpsilonDeltaResult {
        limit_value: limit,
        epsilon,
        delta,
        verification,
    })
}

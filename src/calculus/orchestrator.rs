//! Step-by-step derivative, limit and epsilon-delta explanations.
//!
//! Every function here normalizes the input, asks the analyzer which rules apply, delegates the
//! actual work to the engine and records what happened as numbered steps. Expressions shown in
//! steps are in display notation except the "Normalized form" step, which shows the canonical
//! text the engine received.

use crate::calculus::analyzer::{analyze, Analysis, AnalysisMode};
use crate::calculus::epsilon_delta::{epsilon_delta, DeltaSearchConfig};
use crate::calculus::errors::CalculusError;
use crate::calculus::notation::{denormalize, normalize};
use crate::calculus::types::{
    ComputationResult, DeltaSearch, EpsilonDeltaResult, LimitPoint, StepRecorder,
};
use crate::symbolic::symbolic_engine::format_number;
use crate::symbolic::symbolic_traits::SymbolicEngine;
use itertools::Itertools;
use log::info;

/// Magnitude above which a limit is reported as infinite.
pub const INFINITY_THRESHOLD: f64 = 1e9;

/// What to compute for a [`CalculusRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Derivative,
    Limit { point: LimitPoint },
    EpsilonDelta { point: LimitPoint, epsilon: f64 },
}

/// One self-contained request: the raw user text, the variable and the operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculusRequest {
    pub input: String,
    pub variable: String,
    pub operation: Operation,
}

impl CalculusRequest {
    pub fn new(input: &str, variable: &str, operation: Operation) -> Self {
        CalculusRequest {
            input: input.to_string(),
            variable: variable.to_lowercase(),
            operation,
        }
    }
}

fn record_preamble(steps: &mut StepRecorder, canonical: &str, analysis: &Analysis) {
    steps.record("Original function", denormalize(canonical), None);
    steps.record(
        "Normalized form",
        canonical,
        Some("Notation understood by the symbolic engine".to_string()),
    );
    if !analysis.components.is_empty() {
        steps.record(
            "Components",
            analysis.components.iter().map(|c| denormalize(c)).join(", "),
            Some("Terms handled one by one, since the operation is linear".to_string()),
        );
    }
}

fn rules_step(analysis: &Analysis) -> Option<(String, String)> {
    if analysis.rules.is_empty() {
        return None;
    }
    Some((
        analysis.rules.iter().map(|rule| rule.tag).join(", "),
        analysis.rules.iter().map(|rule| rule.explanation).join("; "),
    ))
}

/// Derivative with respect to `variable`, with the steps that explain it.
///
/// # Examples
/// ```
/// use step_calculus::calculus::orchestrator::differentiate;
/// use step_calculus::symbolic::symbolic_traits::NativeEngine;
/// let result = differentiate(&NativeEngine::new(), "x^2", "x").unwrap();
/// assert_eq!(result.final_value, "2*x");
/// ```
pub fn differentiate(
    engine: &dyn SymbolicEngine,
    input: &str,
    variable: &str,
) -> Result<ComputationResult, CalculusError> {
    info!("derivative of '{}' with respect to {}", input, variable);
    let canonical = normalize(input);
    let analysis = analyze(&canonical, AnalysisMode::Derivative);

    let mut steps = StepRecorder::new();
    record_preamble(&mut steps, &canonical, &analysis);
    if let Some((tags, explanations)) = rules_step(&analysis) {
        steps.record("Applicable rules", tags, Some(explanations));
    }

    let raw = engine
        .differentiate(&canonical, variable)
        .map_err(|e| CalculusError::derivative(input, e))?;
    steps.record(
        "Derivative calculated",
        denormalize(&raw),
        Some(format!("Rules applied term by term with respect to {}", variable)),
    );
    let simplified = engine
        .simplify(&raw)
        .map_err(|e| CalculusError::derivative(input, e))?;
    if simplified != raw {
        steps.record(
            "Simplified derivative",
            denormalize(&simplified),
            Some("Constants folded and identities removed".to_string()),
        );
    }
    let final_value = denormalize(&simplified);
    steps.record("Final result", final_value.clone(), None);
    Ok(steps.finish(final_value))
}

/// Text of a limit value: a plain number, or a signed `Infinity` above 1e9 in magnitude.
pub fn classify_limit_value(value: f64) -> Option<String> {
    if value.is_nan() {
        None
    } else if value.is_infinite() || value.abs() > INFINITY_THRESHOLD {
        let sign = if value > 0.0 { "" } else { "-" };
        Some(format!("{}Infinity", sign))
    } else {
        Some(format_number(value))
    }
}

/// Limit as `variable` approaches `point`, a number or ±infinity.
pub fn evaluate_limit(
    engine: &dyn SymbolicEngine,
    input: &str,
    variable: &str,
    point: &str,
) -> Result<ComputationResult, CalculusError> {
    let point: LimitPoint = point.parse()?;
    evaluate_limit_at(engine, input, variable, point)
}

/// Same as [`evaluate_limit`] with an already parsed point.
pub fn evaluate_limit_at(
    engine: &dyn SymbolicEngine,
    input: &str,
    variable: &str,
    point: LimitPoint,
) -> Result<ComputationResult, CalculusError> {
    info!("limit of '{}' as {} → {}", input, variable, point);
    let canonical = normalize(input);
    let analysis = analyze(&canonical, AnalysisMode::Limit(point));

    let mut steps = StepRecorder::new();
    record_preamble(&mut steps, &canonical, &analysis);
    if let Some((tags, explanations)) = rules_step(&analysis) {
        steps.record("Special cases", tags, Some(explanations));
    }

    let x = point.value();
    let value = engine
        .evaluate_at(&canonical, variable, x)
        .map_err(|e| CalculusError::limit(input, e))?;
    let final_value = classify_limit_value(value).ok_or_else(|| {
        CalculusError::limit(input, format!("the function has no defined value at {}", point))
    })?;
    let explanation = if point.is_infinite() {
        format!("Infinity approximated by evaluating at {}", format_number(x))
    } else {
        "Direct substitution".to_string()
    };
    steps.record(
        &format!("Evaluate limit as {} → {}", variable, point),
        format!("f({}) = {}", format_number(x), final_value),
        Some(explanation),
    );
    steps.record("Final result", final_value.clone(), None);
    Ok(steps.finish(final_value))
}

fn describe_search(search: &DeltaSearch) -> (String, String) {
    match search {
        DeltaSearch::Accepted { delta, iterations } => (
            format!("δ = {}", format_number(*delta)),
            format!(
                "Accepted after {} geometrically shrinking candidate(s)",
                iterations
            ),
        ),
        DeltaSearch::Floor { delta } => (
            format!("δ = {}", format_number(*delta)),
            "No candidate kept every probe within ε, falling back to the smallest delta"
                .to_string(),
        ),
    }
}

/// Epsilon-delta search plus its explanation.
///
/// The final value of the explanation is the delta that was found (or the floor value).
pub fn explain_epsilon_delta(
    engine: &dyn SymbolicEngine,
    input: &str,
    variable: &str,
    point: LimitPoint,
    epsilon: f64,
    config: &DeltaSearchConfig,
) -> Result<(EpsilonDeltaResult, ComputationResult), CalculusError> {
    info!(
        "epsilon-delta for '{}' as {} → {} with ε = {}",
        input, variable, point, epsilon
    );
    let canonical = normalize(input);
    let result = epsilon_delta(engine, &canonical, variable, point, epsilon, config)?;

    let mut steps = StepRecorder::new();
    steps.record(
        "Definition",
        format!(
            "∀ε > 0 ∃δ > 0: 0 < |{v} - {a}| < δ ⇒ |f({v}) - L| < ε",
            v = variable,
            a = point
        ),
        Some(format!("Display function: {}", denormalize(&canonical))),
    );
    steps.record(
        "Limit value",
        format!("L = {}", format_number(result.limit_value)),
        Some(format!("Searching δ for ε = {}", format_number(epsilon))),
    );
    let (delta_text, delta_explanation) = describe_search(&result.delta);
    steps.record("Delta search", delta_text, Some(delta_explanation));
    for (i, probe) in result.verification.sample_points.iter().enumerate() {
        let (expression, verdict) = match (probe.fx, probe.deviation) {
            (Some(fx), Some(deviation)) => (
                format!(
                    "f({}) = {}, |f(x) - L| = {}",
                    format_number(probe.x),
                    format_number(fx),
                    format_number(deviation)
                ),
                if probe.within_tolerance {
                    "within ε"
                } else {
                    "outside ε"
                },
            ),
            _ => (
                format!("f({}) is undefined", format_number(probe.x)),
                "undefined",
            ),
        };
        steps.record(
            &format!("Verification probe {}", i + 1),
            expression,
            Some(verdict.to_string()),
        );
    }
    let verdict = if result.verification.all_passed() && result.delta.is_accepted() {
        "Every probe lies within ε of the limit"
    } else {
        "The delta could not be confirmed at every probe"
    };
    steps.record(
        "Verdict",
        format!(
            "{}/{} probes within ε",
            result.verification.pass_count, result.verification.total_count
        ),
        Some(verdict.to_string()),
    );
    let computation = steps.finish(format_number(result.delta.delta()));
    Ok((result, computation))
}

/// Runs one request against the engine. No state survives the call.
pub fn run_request(
    engine: &dyn SymbolicEngine,
    request: &CalculusRequest,
    config: &DeltaSearchConfig,
) -> Result<ComputationResult, CalculusError> {
    match request.operation {
        Operation::Derivative => differentiate(engine, &request.input, &request.variable),
        Operation::Limit { point } => {
            evaluate_limit_at(engine, &request.input, &request.variable, point)
        }
        Operation::EpsilonDelta { point, epsilon } => explain_epsilon_delta(
            engine,
            &request.input,
            &request.variable,
            point,
            epsilon,
            config,
        )
        .map(|(_, computation)| computation),
    }
}

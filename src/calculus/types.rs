//! Value types shared by the calculus operations. Everything here lives for one request.

use crate::calculus::errors::CalculusError;
use crate::symbolic::symbolic_engine::format_number;
use std::fmt;
use std::str::FromStr;
use strum_macros::Display;

/// Magnitude used in place of an infinite approach point.
pub const INFINITY_PROXY: f64 = 1e10;

/// One labelled line of a step-by-step explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 1-based position, dense within one result
    pub order: usize,
    pub label: String,
    pub expression: String,
    pub explanation: Option<String>,
}

/// Final value plus the steps that led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputationResult {
    pub final_value: String,
    pub steps: Vec<Step>,
}

impl ComputationResult {
    /// First step with the given label.
    pub fn step(&self, label: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.label == label)
    }
}

/// Collects steps and numbers them as they arrive.
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<Step>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: &str, expression: impl Into<String>, explanation: Option<String>) {
        self.steps.push(Step {
            order: self.steps.len() + 1,
            label: label.to_string(),
            expression: expression.into(),
            explanation,
        });
    }

    pub fn finish(self, final_value: impl Into<String>) -> ComputationResult {
        ComputationResult {
            final_value: final_value.into(),
            steps: self.steps,
        }
    }
}

/// Where the variable goes in a limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitPoint {
    Finite(f64),
    PositiveInfinity,
    NegativeInfinity,
}

impl LimitPoint {
    /// Abscissa actually evaluated: the point itself, or ±1e10 for the infinities.
    pub fn value(&self) -> f64 {
        match self {
            LimitPoint::Finite(a) => *a,
            LimitPoint::PositiveInfinity => INFINITY_PROXY,
            LimitPoint::NegativeInfinity => -INFINITY_PROXY,
        }
    }

    pub fn is_infinite(&self) -> bool {
        !matches!(self, LimitPoint::Finite(_))
    }
}

impl FromStr for LimitPoint {
    type Err = CalculusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        match text.as_str() {
            "infinity" | "+infinity" | "inf" | "+inf" | "∞" | "+∞" => Ok(LimitPoint::PositiveInfinity),
            "-infinity" | "-inf" | "-∞" => Ok(LimitPoint::NegativeInfinity),
            other => match other.parse::<f64>() {
                Ok(a) if a.is_finite() => Ok(LimitPoint::Finite(a)),
                _ => Err(CalculusError::InvalidArgument(format!(
                    "'{}' is neither a number nor ±infinity",
                    s.trim()
                ))),
            },
        }
    }
}

impl fmt::Display for LimitPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LimitPoint::Finite(a) => write!(f, "{}", format_number(*a)),
            LimitPoint::PositiveInfinity => write!(f, "∞"),
            LimitPoint::NegativeInfinity => write!(f, "-∞"),
        }
    }
}

/// Outcome of the delta search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaSearch {
    /// every probe at this delta landed within epsilon
    Accepted { delta: f64, iterations: usize },
    /// nothing was accepted, the floor value is a best-effort answer
    Floor { delta: f64 },
}

impl DeltaSearch {
    pub fn delta(&self) -> f64 {
        match self {
            DeltaSearch::Accepted { delta, .. } | DeltaSearch::Floor { delta } => *delta,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, DeltaSearch::Accepted { .. })
    }
}

/// One probe of the verification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    pub x: f64,
    /// None when f(x) is undefined
    pub fx: Option<f64>,
    /// |f(x) - L|, None when f(x) is undefined
    pub deviation: Option<f64>,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    pub sample_points: Vec<ProbeSample>,
    pub pass_count: usize,
    pub total_count: usize,
}

impl VerificationReport {
    pub fn from_samples(sample_points: Vec<ProbeSample>) -> Self {
        let pass_count = sample_points.iter().filter(|p| p.within_tolerance).count();
        let total_count = sample_points.len();
        VerificationReport {
            sample_points,
            pass_count,
            total_count,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.pass_count == self.total_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonDeltaResult {
    pub limit_value: f64,
    pub epsilon: f64,
    pub delta: DeltaSearch,
    pub verification: VerificationReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiscontinuityKind {
    #[strum(serialize = "vertical asymptote")]
    VerticalAsymptote,
    #[strum(serialize = "log domain")]
    LogDomainViolation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discontinuity {
    pub kind: DiscontinuityKind,
    pub location: f64,
}

/// (x, f(x)) pairs ready for a chart; non-finite samples are left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotSample {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl PlotSample {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

//! Step-by-step single-variable calculus on top of a [`SymbolicEngine`].
//!
//! Every operation takes the text a student typed, normalizes it and hands the canonical form to
//! the engine. [`Calculus`] bundles an engine with [`settings::CalculusSettings`] for callers
//! that do not want to pass defaults around.
//!
//! # Example
//! ```
//! use step_calculus::calculus::Calculus;
//! let calculus = Calculus::default();
//! let derivative = calculus.differentiate("x^3").unwrap();
//! assert_eq!(derivative.final_value, "3*x^2");
//! for step in &derivative.steps {
//!     println!("{}. {}: {}", step.order, step.label, step.expression);
//! }
//! ```

use crate::calculus::discontinuities::scan;
use crate::calculus::errors::CalculusError;
use crate::calculus::notation::normalize;
use crate::calculus::orchestrator::{
    CalculusRequest, differentiate, evaluate_limit_at, explain_epsilon_delta, run_request,
};
use crate::calculus::plot_sampler::sample;
use crate::calculus::settings::CalculusSettings;
use crate::calculus::types::{
    ComputationResult, Discontinuity, EpsilonDeltaResult, LimitPoint, PlotSample,
};
use crate::symbolic::symbolic_traits::{NativeEngine, SymbolicEngine};

/// which rules and special cases apply to an expression, used for explanations only
pub mod analyzer;
/// coarse probe-based search for vertical asymptotes and log-domain violations
pub mod discontinuities;
/// epsilon-delta search and verification
pub mod epsilon_delta;
pub mod errors;
/// user notation <-> canonical call syntax
pub mod notation;
/// derivative, limit and epsilon-delta explanations, request objects
pub mod orchestrator;
/// uniform sampling of a function for charts
pub mod plot_sampler;
/// defaults and the settings document
pub mod settings;
pub mod types;
/// built-in epsilon-delta exercises
pub mod worked_examples;


/// An engine plus the defaults used when the caller does not give a value.
pub struct Calculus {
    engine: Box<dyn SymbolicEngine>,
    settings: CalculusSettings,
}

impl Default for Calculus {
    fn default() -> Self {
        Calculus::new(Box::new(NativeEngine::new()), CalculusSettings::default())
    }
}

impl Calculus {
    /// The variable is lowercased like every input expression.
    pub fn new(engine: Box<dyn SymbolicEngine>, mut settings: CalculusSettings) -> Self {
        settings.variable = settings.variable.to_lowercase();
        Calculus { engine, settings }
    }

    pub fn with_settings(settings: CalculusSettings) -> Self {
        Calculus::new(Box::new(NativeEngine::new()), settings)
    }

    pub fn settings(&self) -> &CalculusSettings {
        &self.settings
    }

    pub fn engine(&self) -> &dyn SymbolicEngine {
        self.engine.as_ref()
    }

    pub fn differentiate(&self, input: &str) -> Result<ComputationResult, CalculusError> {
        differentiate(self.engine(), input, &self.settings.variable)
    }

    /// Limit at `point`, or at the default point when `None`.
    pub fn limit(
        &self,
        input: &str,
        point: Option<LimitPoint>,
    ) -> Result<ComputationResult, CalculusError> {
        let point = point.unwrap_or(self.settings.limit_point);
        evaluate_limit_at(self.engine(), input, &self.settings.variable, point)
    }

    pub fn epsilon_delta(
        &self,
        input: &str,
        point: Option<LimitPoint>,
        epsilon: Option<f64>,
    ) -> Result<(EpsilonDeltaResult, ComputationResult), CalculusError> {
        explain_epsilon_delta(
            self.engine(),
            input,
            &self.settings.variable,
            point.unwrap_or(self.settings.limit_point),
            epsilon.unwrap_or(self.settings.epsilon),
            &self.settings.delta_search,
        )
    }

    pub fn discontinuities(&self, input: &str) -> Vec<Discontinuity> {
        scan(
            self.engine(),
            &normalize(input),
            &self.settings.variable,
            &self.settings.scan,
        )
    }

    /// Sample over the default plot window.
    pub fn plot_sample(&self, input: &str) -> Result<PlotSample, CalculusError> {
        let plot = &self.settings.plot;
        self.plot_sample_in(input, plot.x_min, plot.x_max, plot.samples)
    }

    pub fn plot_sample_in(
        &self,
        input: &str,
        x_min: f64,
        x_max: f64,
        count: usize,
    ) -> Result<PlotSample, CalculusError> {
        sample(
            self.engine(),
            &normalize(input),
            &self.settings.variable,
            x_min,
            x_max,
            count,
        )
    }

    /// Plain value of the function at `x`; engine failures keep their parse/evaluate kind.
    pub fn evaluate_at(&self, input: &str, x: f64) -> Result<f64, CalculusError> {
        Ok(self
            .engine
            .evaluate_at(&normalize(input), &self.settings.variable, x)?)
    }

    pub fn run(&self, request: &CalculusRequest) -> Result<ComputationResult, CalculusError> {
        run_request(self.engine(), request, &self.settings.delta_search)
    }
}

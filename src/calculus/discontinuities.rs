//! Coarse search for points where the function is not defined.
//!
//! Each denominator and each logarithm argument is evaluated on its own over a fixed set of
//! probe abscissas; values close to zero are reported. Points between probes are not found.

use crate::calculus::types::{Discontinuity, DiscontinuityKind};
use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_traits::SymbolicEngine;
use itertools::Itertools;
use log::{debug, warn};

pub const DEFAULT_PROBES: [f64; 9] = [-10.0, -5.0, -2.0, -1.0, 0.0, 1.0, 2.0, 5.0, 10.0];

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub probes: Vec<f64>,
    /// |g(x)| below this counts as zero
    pub tolerance: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            probes: DEFAULT_PROBES.to_vec(),
            tolerance: 0.001,
        }
    }
}

fn near_zero_probes(
    engine: &dyn SymbolicEngine,
    parts: &[&Expr],
    variable: &str,
    kind: DiscontinuityKind,
    config: &ScanConfig,
) -> Vec<Discontinuity> {
    let mut found = Vec::new();
    for part in parts {
        let text = part.to_string();
        for &x in &config.probes {
            match engine.evaluate_at(&text, variable, x) {
                Ok(value) if value.abs() < config.tolerance => found.push(Discontinuity {
                    kind,
                    location: x,
                }),
                Ok(_) => {}
                Err(e) => debug!("probe {} of '{}' skipped: {}", x, text, e),
            }
        }
    }
    found
}

/// Vertical asymptotes first, then log-domain violations, each (kind, location) once.
///
/// # Examples
/// ```
/// use step_calculus::calculus::discontinuities::{scan, ScanConfig};
/// use step_calculus::symbolic::symbolic_traits::NativeEngine;
/// let found = scan(&NativeEngine::new(), "1/x", "x", &ScanConfig::default());
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].location, 0.0);
/// ```
pub fn scan(
    engine: &dyn SymbolicEngine,
    expr: &str,
    variable: &str,
    config: &ScanConfig,
) -> Vec<Discontinuity> {
    let tree = match parse_expression_func(expr) {
        Ok(tree) => tree,
        Err(e) => {
            warn!("cannot scan '{}' for discontinuities: {}", expr, e);
            return Vec::new();
        }
    };
    let asymptotes = near_zero_probes(
        engine,
        &tree.denominators(),
        variable,
        DiscontinuityKind::VerticalAsymptote,
        config,
    );
    let log_domain = near_zero_probes(
        engine,
        &tree.logarithm_arguments(),
        variable,
        DiscontinuityKind::LogDomainViolation,
        config,
    );
    asymptotes
        .into_iter()
        .chain(log_domain)
        .unique_by(|d| (d.kind, d.location.to_bits()))
        .collect()
}

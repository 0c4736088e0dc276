use crate::calculus::errors::CalculusError;
use crate::calculus::types::PlotSample;
use crate::symbolic::symbolic_traits::SymbolicEngine;
use crate::symbolic::utils::linspace;
use log::debug;

/// Upper bound on the number of abscissas of one plot.
pub const MAX_SAMPLES: usize = 1000;

/// Evaluates the expression on `count` evenly spaced points of `[x_min, x_max]`.
///
/// Points where the value is not finite, or where evaluation fails after the first one, are left
/// out. A failure at the very first point means the expression itself is unusable and is returned
/// as an error.
pub fn sample(
    engine: &dyn SymbolicEngine,
    expr: &str,
    variable: &str,
    x_min: f64,
    x_max: f64,
    count: usize,
) -> Result<PlotSample, CalculusError> {
    if !(x_min.is_finite() && x_max.is_finite() && x_min < x_max) {
        return Err(CalculusError::plot(
            expr,
            format!("the range [{}, {}] is empty", x_min, x_max),
        ));
    }
    if !(2..=MAX_SAMPLES).contains(&count) {
        return Err(CalculusError::plot(
            expr,
            format!("sample count must lie in 2..={}, got {}", MAX_SAMPLES, count),
        ));
    }
    let f = engine
        .lambdify(expr, variable)
        .map_err(|e| CalculusError::plot(expr, e))?;

    let mut plot = PlotSample::default();
    for (i, x) in linspace(x_min, x_max, count).into_iter().enumerate() {
        match f(x) {
            Ok(y) if y.is_finite() => {
                plot.xs.push(x);
                plot.ys.push(y);
            }
            Ok(_) => {}
            Err(e) if i == 0 => return Err(CalculusError::plot(expr, e)),
            Err(e) => debug!("sample at {} skipped: {}", x, e),
        }
    }
    debug!("{} of {} samples of '{}' kept", plot.len(), count, expr);
    Ok(plot)
}

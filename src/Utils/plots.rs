use crate::calculus::errors::CalculusError;
use crate::calculus::types::{Discontinuity, PlotSample};
use plotters::prelude::*;
use std::path::Path;

fn render_error(e: impl std::fmt::Display) -> CalculusError {
    CalculusError::Render(e.to_string())
}

/// y-range with a 5% margin; a flat curve gets a unit margin.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let margin = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - margin, max + margin)
}

/// Draws the sampled curve into a PNG at `path`, with a red vertical marker at each
/// discontinuity inside the plotted range.
pub fn render_plot_png(
    sample: &PlotSample,
    discontinuities: &[Discontinuity],
    path: &Path,
    title: &str,
) -> Result<(), CalculusError> {
    if sample.is_empty() {
        return Err(CalculusError::Render(format!(
            "nothing to draw for '{}', every sample was undefined",
            title
        )));
    }
    let (x_min, x_max) = padded_range(&sample.xs);
    let (y_min, y_max) = padded_range(&sample.ys);

    let root_area = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption(title, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_error)?;

    chart.configure_mesh().draw().map_err(render_error)?;

    chart
        .draw_series(LineSeries::new(sample.points(), &BLUE))
        .map_err(render_error)?
        .label(title.to_string())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    for d in discontinuities
        .iter()
        .filter(|d| d.location >= x_min && d.location <= x_max)
    {
        chart
            .draw_series(LineSeries::new(
                vec![(d.location, y_min), (d.location, y_max)],
                RED.stroke_width(1),
            ))
            .map_err(render_error)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_error)?;
    root_area.present().map_err(render_error)?;
    log::info!("plot saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(&[0.0, 10.0]), (-0.5, 10.5));
        assert_eq!(padded_range(&[2.0, 2.0]), (1.0, 3.0));
    }

    #[test]
    fn test_empty_sample_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_plot_png(
            &PlotSample::default(),
            &[],
            &dir.path().join("empty.png"),
            "nothing",
        );
        assert!(matches!(result, Err(CalculusError::Render(_))));
    }
}

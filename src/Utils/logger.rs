use crate::calculus::errors::CalculusError;
use crate::calculus::types::{Discontinuity, PlotSample};
use csv::Writer;
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// Terminal logging, plus a copy of every record in `log_file` when one is given.
///
/// Installing a second global logger is not an error: the first one stays active.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<(), CalculusError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => log::debug!("logging initialized at level {}", level),
        Err(_) => log::debug!("a logger is already installed"),
    }
    Ok(())
}

/// Writes the sample as two columns, `x` and `f(x)` (named after the variable).
pub fn save_plot_sample_to_csv(
    sample: &PlotSample,
    variable: &str,
    path: &Path,
) -> Result<(), CalculusError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record([variable.to_string(), format!("f({})", variable)])?;
    for (x, y) in sample.points() {
        writer.write_record([x.to_string(), y.to_string()])?;
    }
    writer.flush()?;
    log::info!("{} samples saved to {}", sample.len(), path.display());
    Ok(())
}

pub fn save_discontinuities_to_csv(
    discontinuities: &[Discontinuity],
    path: &Path,
) -> Result<(), CalculusError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["kind", "location"])?;
    for d in discontinuities {
        writer.write_record([d.kind.to_string(), d.location.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculus::types::DiscontinuityKind;

    #[test]
    fn test_save_plot_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        let sample = PlotSample {
            xs: vec![-1.0, 0.5],
            ys: vec![1.0, 0.25],
        };
        save_plot_sample_to_csv(&sample, "t", &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "t,f(t)\n-1,1\n0.5,0.25\n");
    }

    #[test]
    fn test_save_discontinuities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.csv");
        let found = [Discontinuity {
            kind: DiscontinuityKind::VerticalAsymptote,
            location: 0.0,
        }];
        save_discontinuities_to_csv(&found, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "kind,location\nvertical asymptote,0\n");
    }

    #[test]
    fn test_unwritable_path() {
        let result = save_plot_sample_to_csv(
            &PlotSample::default(),
            "x",
            Path::new("/no/such/dir/sample.csv"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_init_logging_twice() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        assert!(init_logging(LevelFilter::Warn, Some(&log_path)).is_ok());
        assert!(init_logging(LevelFilter::Warn, None).is_ok());
        assert!(log_path.exists());
    }
}

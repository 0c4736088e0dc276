//! Caller defaults, optionally read from a settings document (see [`crate::Utils::task_parser`]).
//!
//! ```text
//! general
//!   variable: x
//! plot
//!   x_min: -10
//!   x_max: 10
//!   samples: 1000
//! limit
//!   point: 0
//! epsilon_delta
//!   epsilon: 0.1
//!   initial_delta: 0.001
//!   shrink_factor: 0.9
//!   max_iterations: 1000
//!   floor: 1e-6
//! scan
//!   probes: -10, -5, -2, -1, 0, 1, 2, 5, 10
//!   tolerance: 0.001
//! ```
//! Every key is optional and unknown keys are ignored.

use crate::Utils::task_parser::{DocumentMap, Value, parse_document, parse_document_file};
use crate::calculus::discontinuities::ScanConfig;
use crate::calculus::epsilon_delta::DeltaSearchConfig;
use crate::calculus::errors::CalculusError;
use crate::calculus::plot_sampler::MAX_SAMPLES;
use crate::calculus::types::LimitPoint;
use log::info;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub x_min: f64,
    pub x_max: f64,
    pub samples: usize,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            x_min: -10.0,
            x_max: 10.0,
            samples: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculusSettings {
    pub variable: String,
    pub plot: PlotSettings,
    pub limit_point: LimitPoint,
    pub epsilon: f64,
    pub delta_search: DeltaSearchConfig,
    pub scan: ScanConfig,
}

impl Default for CalculusSettings {
    fn default() -> Self {
        CalculusSettings {
            variable: "x".to_string(),
            plot: PlotSettings::default(),
            limit_point: LimitPoint::Finite(0.0),
            epsilon: 0.1,
            delta_search: DeltaSearchConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

struct Reader<'a> {
    document: &'a DocumentMap,
}

impl<'a> Reader<'a> {
    fn values(&self, section: &str, key: &str) -> Option<&'a Vec<Value>> {
        self.document.get(section).and_then(|s| s.get(key))
    }

    fn single(&self, section: &str, key: &str) -> Result<Option<&'a Value>, CalculusError> {
        match self.values(section, key) {
            None => Ok(None),
            Some(values) if values.len() == 1 => Ok(values.first()),
            Some(values) => Err(CalculusError::Settings(format!(
                "{}.{} expects one value, found {}",
                section,
                key,
                values.len()
            ))),
        }
    }

    fn number(&self, section: &str, key: &str, target: &mut f64) -> Result<(), CalculusError> {
        if let Some(value) = self.single(section, key)? {
            *target = value
                .as_f64()
                .ok_or_else(|| malformed(section, key, value, "a number"))?;
        }
        Ok(())
    }

    fn count(&self, section: &str, key: &str, target: &mut usize) -> Result<(), CalculusError> {
        if let Some(value) = self.single(section, key)? {
            *target = value
                .as_integer()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| malformed(section, key, value, "a non-negative integer"))?;
        }
        Ok(())
    }

    fn text(&self, section: &str, key: &str, target: &mut String) -> Result<(), CalculusError> {
        if let Some(value) = self.single(section, key)? {
            *target = value
                .as_string()
                .cloned()
                .ok_or_else(|| malformed(section, key, value, "a name"))?;
        }
        Ok(())
    }

    fn point(&self, section: &str, key: &str, target: &mut LimitPoint) -> Result<(), CalculusError> {
        if let Some(value) = self.single(section, key)? {
            // f64 parsing already turned "inf" into a float
            *target = value
                .to_string()
                .parse()
                .map_err(|_| malformed(section, key, value, "a number or ±infinity"))?;
        }
        Ok(())
    }

    fn numbers(&self, section: &str, key: &str, target: &mut Vec<f64>) -> Result<(), CalculusError> {
        if let Some(values) = self.values(section, key) {
            *target = values
                .iter()
                .map(|value| {
                    value
                        .as_f64()
                        .ok_or_else(|| malformed(section, key, value, "a list of numbers"))
                })
                .collect::<Result<Vec<f64>, CalculusError>>()?;
        }
        Ok(())
    }
}

fn malformed(section: &str, key: &str, value: &Value, expected: &str) -> CalculusError {
    CalculusError::Settings(format!(
        "{}.{} = '{}' is not {}",
        section, key, value, expected
    ))
}

impl CalculusSettings {
    /// Defaults overridden by whatever the document sets.
    pub fn from_document(text: &str) -> Result<Self, CalculusError> {
        let document =
            parse_document(text).map_err(|e| CalculusError::Settings(e.to_string()))?;
        Self::from_map(&document)
    }

    pub fn from_file(path: &Path) -> Result<Self, CalculusError> {
        info!("reading settings from {}", path.display());
        let document = parse_document_file(path)
            .map_err(|e| CalculusError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_map(&document)
    }

    fn from_map(document: &DocumentMap) -> Result<Self, CalculusError> {
        let reader = Reader { document };
        let mut settings = CalculusSettings::default();
        reader.text("general", "variable", &mut settings.variable)?;
        // expressions are lowercased before they reach the engine
        settings.variable = settings.variable.to_lowercase();
        reader.number("plot", "x_min", &mut settings.plot.x_min)?;
        reader.number("plot", "x_max", &mut settings.plot.x_max)?;
        reader.count("plot", "samples", &mut settings.plot.samples)?;
        reader.point("limit", "point", &mut settings.limit_point)?;
        reader.number("epsilon_delta", "epsilon", &mut settings.epsilon)?;
        let search = &mut settings.delta_search;
        reader.number("epsilon_delta", "initial_delta", &mut search.initial_delta)?;
        reader.number("epsilon_delta", "shrink_factor", &mut search.shrink_factor)?;
        reader.count("epsilon_delta", "max_iterations", &mut search.max_iterations)?;
        reader.number("epsilon_delta", "floor", &mut search.floor)?;
        reader.numbers("scan", "probes", &mut settings.scan.probes)?;
        reader.number("scan", "tolerance", &mut settings.scan.tolerance)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CalculusError> {
        let is_identifier = self
            .variable
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
            && self
                .variable
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !is_identifier {
            return Err(CalculusError::Settings(format!(
                "'{}' is not a lowercase variable name",
                self.variable
            )));
        }
        if !(self.plot.x_min.is_finite() && self.plot.x_max.is_finite())
            || self.plot.x_min >= self.plot.x_max
        {
            return Err(CalculusError::Settings(format!(
                "plot range [{}, {}] is empty",
                self.plot.x_min, self.plot.x_max
            )));
        }
        if !(2..=MAX_SAMPLES).contains(&self.plot.samples) {
            return Err(CalculusError::Settings(format!(
                "plot samples must lie in 2..={}",
                MAX_SAMPLES
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(CalculusError::Settings("epsilon must be positive".to_string()));
        }
        self.delta_search
            .validate()
            .map_err(|e| CalculusError::Settings(e.to_string()))?;
        if self.scan.probes.is_empty() || !(self.scan.tolerance > 0.0) {
            return Err(CalculusError::Settings(
                "scan needs at least one probe and a positive tolerance".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = CalculusSettings::default();
        assert_eq!(settings.variable, "x");
        assert_eq!(settings.plot, PlotSettings::default());
        assert_eq!(settings.limit_point, LimitPoint::Finite(0.0));
        assert_eq!(settings.epsilon, 0.1);
        assert_eq!(settings.scan.probes.len(), 9);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let text = "
            # classroom defaults
            general
              variable: t
            plot
              x_min: -1
              x_max: 3.5
              samples: 50
            limit
              point: -infinity
            epsilon_delta
              epsilon: 0.01
              shrink_factor: 0.5
            scan
              probes: 0, 0.5
            unrelated
              anything: 42
        ";
        let settings = CalculusSettings::from_document(text).unwrap();
        assert_eq!(settings.variable, "t");
        assert_eq!(settings.plot.x_min, -1.0);
        assert_eq!(settings.plot.x_max, 3.5);
        assert_eq!(settings.plot.samples, 50);
        assert_eq!(settings.limit_point, LimitPoint::NegativeInfinity);
        assert_eq!(settings.epsilon, 0.01);
        assert_eq!(settings.delta_search.shrink_factor, 0.5);
        assert_eq!(settings.delta_search.initial_delta, 0.001);
        assert_eq!(settings.scan.probes, vec![0.0, 0.5]);
        assert_eq!(settings.scan.tolerance, 0.001);
    }

    #[test]
    fn test_variable_is_lowercased() {
        let settings = CalculusSettings::from_document("general variable: T").unwrap();
        assert_eq!(settings.variable, "t");

        let mut settings = CalculusSettings::default();
        settings.variable = "X".to_string();
        assert!(matches!(settings.validate(), Err(CalculusError::Settings(_))));
    }

    #[test]
    fn test_malformed_values() {
        for text in [
            "plot x_min: left",
            "plot samples: 2.5",
            "plot samples: -3",
            "plot x_min: 1, 2",
            "limit point: somewhere",
            "general variable: 42",
            "scan probes: 1, two",
        ] {
            assert!(
                matches!(
                    CalculusSettings::from_document(text),
                    Err(CalculusError::Settings(_))
                ),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_invalid_combinations() {
        for text in [
            "plot x_min: 5 x_max: -5",
            "plot samples: 1",
            "epsilon_delta epsilon: 0",
            "epsilon_delta shrink_factor: 1.5",
            "scan tolerance: 0",
        ] {
            assert!(CalculusSettings::from_document(text).is_err(), "{}", text);
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limit\n  point: 2\nepsilon_delta\n  epsilon: 0.2").unwrap();
        let settings = CalculusSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.limit_point, LimitPoint::Finite(2.0));
        assert_eq!(settings.epsilon, 0.2);

        let missing = CalculusSettings::from_file(Path::new("/no/such/settings.txt"));
        assert!(matches!(missing, Err(CalculusError::Settings(_))));
    }
}

/*
Pretty printing of results as tables: explanation steps, verification probes, discontinuities.
*/
use crate::calculus::types::{ComputationResult, Discontinuity, VerificationReport};
use crate::symbolic::symbolic_engine::format_number;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, PartialEq, Tabled)]
pub struct StepRow {
    #[tabled(rename = "#")]
    order: usize,
    step: String,
    expression: String,
    note: String,
}

#[derive(Debug, PartialEq, Tabled)]
pub struct ProbeRow {
    x: String,
    #[tabled(rename = "f(x)")]
    fx: String,
    #[tabled(rename = "|f(x) - L|")]
    deviation: String,
    #[tabled(rename = "within ε")]
    within: &'static str,
}

#[derive(Debug, PartialEq, Tabled)]
pub struct DiscontinuityRow {
    kind: String,
    location: String,
}

fn or_dash(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| "-".to_string())
}

pub fn step_rows(result: &ComputationResult) -> Vec<StepRow> {
    result
        .steps
        .iter()
        .map(|step| StepRow {
            order: step.order,
            step: step.label.clone(),
            expression: step.expression.clone(),
            note: step.explanation.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn probe_rows(report: &VerificationReport) -> Vec<ProbeRow> {
    report
        .sample_points
        .iter()
        .map(|probe| ProbeRow {
            x: format_number(probe.x),
            fx: or_dash(probe.fx),
            deviation: or_dash(probe.deviation),
            within: if probe.within_tolerance { "yes" } else { "no" },
        })
        .collect()
}

fn styled<T: Tabled>(rows: &[T]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern_rounded());
    table.to_string()
}

pub fn steps_table(result: &ComputationResult) -> String {
    styled(&step_rows(result))
}

pub fn verification_table(report: &VerificationReport) -> String {
    styled(&probe_rows(report))
}

pub fn discontinuity_table(discontinuities: &[Discontinuity]) -> String {
    let rows: Vec<DiscontinuityRow> = discontinuities
        .iter()
        .map(|d| DiscontinuityRow {
            kind: d.kind.to_string(),
            location: format_number(d.location),
        })
        .collect();
    styled(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculus::types::{DiscontinuityKind, ProbeSample, StepRecorder};

    #[test]
    fn test_step_rows() {
        let mut steps = StepRecorder::new();
        steps.record("Original function", "x^2", None);
        steps.record("Final result", "2*x", Some("done".to_string()));
        let result = steps.finish("2*x");
        let rows = step_rows(&result);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].order, 2);
        assert_eq!(rows[0].note, "");
        let table = steps_table(&result);
        assert!(table.contains("Original function"));
        assert!(table.contains("2*x"));
    }

    #[test]
    fn test_probe_rows() {
        let report = VerificationReport::from_samples(vec![
            ProbeSample {
                x: 1.5,
                fx: Some(2.25),
                deviation: Some(0.25),
                within_tolerance: true,
            },
            ProbeSample {
                x: -0.5,
                fx: None,
                deviation: None,
                within_tolerance: false,
            },
        ]);
        let rows = probe_rows(&report);
        assert_eq!(rows[0].fx, "2.25");
        assert_eq!(rows[0].within, "yes");
        assert_eq!(rows[1].deviation, "-");
        assert_eq!(rows[1].within, "no");
        assert!(verification_table(&report).contains("within ε"));
    }

    #[test]
    fn test_discontinuity_table() {
        let table = discontinuity_table(&[Discontinuity {
            kind: DiscontinuityKind::LogDomainViolation,
            location: -1.0,
        }]);
        assert!(table.contains("log domain"));
        assert!(table.contains("-1"));
    }
}

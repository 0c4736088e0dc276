//! Built-in epsilon-delta exercises with a hand-written proof sketch each.

use crate::calculus::types::LimitPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkedExample {
    /// 1-based, stable
    pub id: usize,
    pub title: &'static str,
    /// in user notation
    pub function: &'static str,
    pub point: LimitPoint,
    pub epsilon: f64,
    pub description: &'static str,
    pub proof_steps: Vec<&'static str>,
    pub explanation: &'static str,
}

/// The five classic exercises, in presentation order.
pub fn worked_examples() -> Vec<WorkedExample> {
    vec![
        WorkedExample {
            id: 1,
            title: "Limit of x^2 as x → 2",
            function: "x^2",
            point: LimitPoint::Finite(2.0),
            epsilon: 0.1,
            description: "Prove that lim(x→2) x^2 = 4 using the epsilon-delta definition",
            proof_steps: vec![
                "Factor the difference: |x^2 - 4| = |x - 2|·|x + 2|",
                "For |x - 2| < δ we have |x + 2| < 4 + δ",
                "So it suffices that δ(4 + δ) < 0.1",
                "δ ≈ 0.025 satisfies the inequality",
            ],
            explanation: "Bounding the factor |x + 2| near the point turns the quadratic into a linear condition on δ.",
        },
        WorkedExample {
            id: 2,
            title: "Limit of sin(x)/x as x → 0",
            function: "sin(x)/x",
            point: LimitPoint::Finite(0.0),
            epsilon: 0.01,
            description: "Prove that lim(x→0) sin(x)/x = 1 using the epsilon-delta definition",
            proof_steps: vec![
                "Taylor expansion: sin(x) ≈ x - x^3/6, so sin(x)/x ≈ 1 - x^2/6",
                "We need |x^2/6| < 0.01",
                "That holds for |x| < √0.06 ≈ 0.245",
                "Take δ = 0.24",
            ],
            explanation: "The function is undefined at 0 but the singularity is removable; the Taylor series gives the error term.",
        },
        WorkedExample {
            id: 3,
            title: "Limit of 1/x as x → 1",
            function: "1/x",
            point: LimitPoint::Finite(1.0),
            epsilon: 0.05,
            description: "Prove that lim(x→1) 1/x = 1 using the epsilon-delta definition",
            proof_steps: vec![
                "Rewrite the difference: |1/x - 1| = |x - 1|/|x|",
                "Requiring δ < 0.5 keeps |x| > 0.5",
                "Then |1/x - 1| < 2δ",
                "2δ < 0.05 gives δ < 0.025",
            ],
            explanation: "Keeping x away from the pole at 0 bounds the denominator from below.",
        },
        WorkedExample {
            id: 4,
            title: "Limit of sqrt(x) as x → 4",
            function: "sqrt(x)",
            point: LimitPoint::Finite(4.0),
            epsilon: 0.1,
            description: "Prove that lim(x→4) √x = 2 using the epsilon-delta definition",
            proof_steps: vec![
                "Multiply by the conjugate: |√x - 2| = |x - 4|/(√x + 2)",
                "So |√x - 2| < δ/(√x + 2)",
                "Since √x + 2 > 2, the bound is δ/2",
                "δ/2 < 0.1 gives δ < 0.2",
            ],
            explanation: "The conjugate moves the root into the denominator, where it can only help.",
        },
        WorkedExample {
            id: 5,
            title: "Limit of e^x as x → 0",
            function: "e^x",
            point: LimitPoint::Finite(0.0),
            epsilon: 0.01,
            description: "Prove that lim(x→0) e^x = 1 using the epsilon-delta definition",
            proof_steps: vec![
                "Taylor expansion: e^x ≈ 1 + x + x^2/2",
                "Near 0 the dominant term of |e^x - 1| is |x|",
                "Take δ < 0.01",
                "Check: e^0.01 ≈ 1.01005, within the tolerance up to the quadratic term",
            ],
            explanation: "For small x the exponential behaves like its tangent line 1 + x.",
        },
    ]
}

pub fn find_example(id: usize) -> Option<WorkedExample> {
    worked_examples().into_iter().find(|example| example.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculus::epsilon_delta::{epsilon_delta, DeltaSearchConfig};
    use crate::calculus::notation::normalize;
    use crate::symbolic::symbolic_traits::NativeEngine;

    #[test]
    fn test_catalog() {
        let examples = worked_examples();
        assert_eq!(examples.len(), 5);
        assert!(examples.iter().enumerate().all(|(i, e)| e.id == i + 1));
        assert!(examples.iter().all(|e| !e.proof_steps.is_empty() && e.epsilon > 0.0));
        assert_eq!(find_example(3).map(|e| e.function), Some("1/x"));
        assert!(find_example(0).is_none());
        assert!(find_example(6).is_none());
    }

    #[test]
    fn test_every_example_has_an_accepted_delta() {
        let engine = NativeEngine::new();
        for example in worked_examples() {
            let result = epsilon_delta(
                &engine,
                &normalize(example.function),
                "x",
                example.point,
                example.epsilon,
                &DeltaSearchConfig::default(),
            )
            .unwrap();
            assert!(result.delta.is_accepted(), "{}", example.title);
            assert!(result.verification.all_passed(), "{}", example.title);
        }
    }
}

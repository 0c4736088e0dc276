use std::f64::consts::PI;

/// true when every '(' has a matching ')' and no ')' comes first
pub fn has_balanced_brackets(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Byte positions of `target_char` that are not enclosed by any bracket pair.
pub fn find_char_positions_outside_brackets(input: &str, target_char: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == target_char && depth == 0 => positions.push(i),
            _ => {}
        }
    }
    positions
}

/// Deepest bracket nesting in the string, "sin(cos(x))" gives 2.
pub fn max_bracket_depth(s: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max_depth
}

/// `num_values` evenly spaced points over [start, end], both ends included.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values == 0 {
        return Vec::new();
    }
    if num_values == 1 {
        return vec![start];
    }
    let n = (num_values - 1) as f64;
    (0..num_values)
        .map(|i| start + (end - start) * (i as f64) / n)
        .collect()
}

/*
    let f = |x: f64| x * x;
    let h = 0.001;
    let derivatives = numerical_derivative(f, vec![0.0, 1.0, 2.0], h);
*/
#[cfg(test)]
pub fn numerical_derivative<F>(f: F, x_values: Vec<f64>, h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let mut derivatives = Vec::with_capacity(x_values.len());

    for &x in &x_values {
        let f_x_plus_h = f(x + h);
        let f_x_minus_h = f(x - h);
        let derivative = (f_x_plus_h - f_x_minus_h) / (2.0 * h);
        derivatives.push(derivative);
    }

    derivatives
}

// compute norm of two vectors
#[cfg(test)]
pub fn norm(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len());
    (1.0 / x.len() as f64)
        * x.iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
}

// Lanczos approximation, g = 7, n = 9
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Gamma function for real arguments; poles at 0, -1, -2, ... give NaN.
pub fn gamma(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 && x.fract() == 0.0 {
        return f64::NAN;
    }
    if x < 0.5 {
        // reflection formula
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let mut a = LANCZOS_COEFFICIENTS[0];
    let t = x + LANCZOS_G + 0.5;
    for (i, coefficient) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        a += coefficient / (x + i as f64);
    }
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
}

/// n! extended to real n through gamma(n + 1).
pub fn factorial(x: f64) -> f64 {
    let value = gamma(x + 1.0);
    // integers get exact integer results so 5! prints as 120
    if x >= 0.0 && x.fract() == 0.0 && value.is_finite() {
        value.round()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_includes_both_ends() {
        let xs = linspace(-10.0, 10.0, 21);
        assert_eq!(xs.len(), 21);
        assert_eq!(xs[0], -10.0);
        assert_eq!(xs[20], 10.0);
        assert_eq!(xs[10], 0.0);
    }

    #[test]
    fn test_brackets() {
        assert!(has_balanced_brackets("sin(cos(x))"));
        assert!(!has_balanced_brackets("(x+1"));
        assert!(!has_balanced_brackets(")x("));
        assert_eq!(max_bracket_depth("sin(cos(x))"), 2);
        assert_eq!(max_bracket_depth("x+1"), 0);
        assert_eq!(find_char_positions_outside_brackets("a+(b+c)+d", '+'), vec![1, 7]);
    }

    #[test]
    fn test_gamma_and_factorial() {
        assert_relative_eq!(gamma(5.0), 24.0, epsilon = 1e-9);
        assert_relative_eq!(gamma(0.5), PI.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(gamma(-0.5), -2.0 * PI.sqrt(), epsilon = 1e-10);
        assert!(gamma(0.0).is_nan());
        assert!(gamma(-3.0).is_nan());
        assert_eq!(factorial(5.0), 120.0);
        assert_eq!(factorial(0.0), 1.0);
    }

    #[test]
    fn test_numerical_derivative_of_square() {
        let d = numerical_derivative(|x| x * x, vec![1.0, 2.0], 1e-4);
        assert_relative_eq!(d[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(d[1], 4.0, epsilon = 1e-6);
        assert_relative_eq!(norm(&d, &[2.0, 4.0]), 0.0, epsilon = 1e-6);
    }
}

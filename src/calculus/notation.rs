//! # Notation
//!
//! Translation between what a student types and the canonical call syntax of the engine.
//!
//! | typed          | canonical     | shown back     |
//! |----------------|---------------|----------------|
//! | `ln(x)`        | `ln(x)`       | `ln(x)`        |
//! | `log(x)`       | `log10(x)`    | `log(x)`       |
//! | `arcsin(x)`    | `asin(x)`     | `arcsin(x)`    |
//! | `x^2`          | `pow(x,2)`    | `x^2`          |
//!
//! Both directions go through the expression tree, so operands of `^` may be nested to any depth
//! and function names are matched as whole identifiers. Text the parser rejects still gets a
//! best-effort rewrite by the regex chain below, so `normalize` never fails; the engine reports
//! the problem later.

use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::utils::has_balanced_brackets;
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// user alias -> canonical name, matched as whole identifiers followed by '('
const ALIASES: [(&str, &str); 4] = [
    ("log", "log10"),
    ("arcsin", "asin"),
    ("arccos", "acos"),
    ("arctan", "atan"),
];

static ALIAS_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ALIASES
        .iter()
        .map(|(alias, canonical)| {
            let pattern = Regex::new(&format!(r"\b{}\(", alias)).expect("alias pattern is valid");
            (pattern, *canonical)
        })
        .collect()
});

static DISPLAY_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ALIASES
        .iter()
        .map(|(alias, canonical)| {
            let pattern =
                Regex::new(&format!(r"\b{}\(", canonical)).expect("canonical pattern is valid");
            (pattern, *alias)
        })
        .collect()
});

// the four one-level forms: a^b, (a)^b, a^(b), (a)^(b)
static POWER_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"([a-z0-9.]+)\^([a-z0-9.]+)",
        r"\(([^()]+)\)\^([a-z0-9.]+)",
        r"([a-z0-9.]+)\^\(([^()]+)\)",
        r"\(([^()]+)\)\^\(([^()]+)\)",
    ]
    .map(|pattern| Regex::new(pattern).expect("power pattern is valid"))
});

static POW_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pow\(([^,()]+),([^()]+)\)").expect("pow pattern is valid"));

/// Rewrites user notation into canonical call syntax. Total and idempotent.
///
/// # Examples
/// ```
/// use step_calculus::calculus::notation::normalize;
/// assert_eq!(normalize("X^2 + Log(x)"), "pow(x,2)+log10(x)");
/// assert_eq!(normalize("(x+1)^(y+1)"), "pow(x+1,y+1)");
/// ```
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();
    match parse_expression_func(&lowered) {
        Ok(expr) => expr.to_string(),
        Err(e) => {
            if has_balanced_brackets(&lowered) {
                debug!("normalizing '{}' with the fallback rewrite: {}", input, e);
            } else {
                debug!("'{}' has unbalanced brackets, fallback rewrite only", input);
            }
            rewrite_fallback(&lowered)
        }
    }
}

/// Rewrites canonical call syntax back into user notation.
///
/// `ln(` stays `ln(`, `log10(` becomes `log(`, `asin(` becomes `arcsin(` and `pow(a,b)` becomes `a^b`.
pub fn denormalize(text: &str) -> String {
    match parse_expression_func(text) {
        Ok(expr) => expr.to_display_string(),
        Err(_) => display_fallback(text),
    }
}

/// Regex rewrite for text that does not parse: aliases first, then one level of `^`.
pub fn rewrite_fallback(lowered: &str) -> String {
    let mut text = lowered.to_string();
    for (pattern, canonical) in ALIAS_PATTERNS.iter() {
        text = pattern
            .replace_all(&text, format!("{}(", canonical).as_str())
            .into_owned();
    }
    for pattern in POWER_PATTERNS.iter() {
        text = pattern.replace_all(&text, "pow(${1},${2})").into_owned();
    }
    text
}

fn display_fallback(text: &str) -> String {
    let text = POW_CALL
        .replace_all(text, |caps: &Captures| {
            format!("{}^{}", bracket_compound(&caps[1]), bracket_compound(&caps[2]))
        })
        .into_owned();
    DISPLAY_PATTERNS
        .iter()
        .fold(text, |text, (pattern, alias)| {
            pattern
                .replace_all(&text, format!("{}(", alias).as_str())
                .into_owned()
        })
}

fn bracket_compound(operand: &str) -> String {
    if operand.chars().all(|c| c.is_alphanumeric() || c == '.') {
        operand.to_string()
    } else {
        format!("({})", operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPRESENTATIVE: [&str; 12] = [
        "x^2",
        "(x+1)^2",
        "x^(y+1)",
        "(x+1)^(y+1)",
        "ln(x)",
        "log(x)",
        "LN(X)+Log(X)",
        "arcsin(x)+arccos(x)+arctan(x)",
        "sin(x^2)^3",
        "sqrt(abs(x))/factorial(x)",
        "sin(x",
        "x^2 + ) garbage",
    ];

    #[test]
    fn test_normalize_is_idempotent() {
        for input in REPRESENTATIVE {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {}", input);
        }
    }

    #[test]
    fn test_power_conversion() {
        assert_eq!(normalize("x^2"), "pow(x,2)");
        assert_eq!(normalize("(x+1)^2"), "pow(x+1,2)");
        assert_eq!(normalize("x^(y+1)"), "pow(x,y+1)");
        assert_eq!(normalize("(x+1)^(y+1)"), "pow(x+1,y+1)");
        // nesting deeper than one level
        assert_eq!(normalize("((x+1)*(x-1))^2"), "pow((x+1)*(x-1),2)");
        assert_eq!(normalize("x^y^2"), "pow(x,pow(y,2))");
    }

    #[test]
    fn test_missing_multiplication_signs() {
        assert_eq!(normalize("x^3 + 2x^2 - 5x + 1"), "pow(x,3)+2*pow(x,2)-5*x+1");
        assert_eq!(denormalize(&normalize("x^3 + 2x^2 - 5x + 1")), "x^3+2*x^2-5*x+1");
        assert_eq!(normalize("2sin(x)"), "2*sin(x)");
    }

    #[test]
    fn test_logarithms_do_not_collide() {
        assert_eq!(normalize("ln(x)"), "ln(x)");
        assert_eq!(normalize("log(x)"), "log10(x)");
        assert_eq!(normalize("log10(x)"), "log10(x)");
        assert_eq!(normalize("log2(x)+ln(x)"), "log2(x)+ln(x)");
    }

    #[test]
    fn test_inverse_trig_aliases() {
        assert_eq!(normalize("arcsin(x)"), "asin(x)");
        assert_eq!(normalize("ARCTAN(x)"), "atan(x)");
        assert_eq!(normalize("sinh(x)+arccos(x)"), "sinh(x)+acos(x)");
    }

    #[test]
    fn test_round_trip_keeps_display_notation() {
        for input in ["arcsin(x)", "log(x)", "ln(x)", "x^2", "(x+1)^(y+1)", "arctan(1/x)"] {
            assert_eq!(denormalize(&normalize(input)), input);
        }
    }

    #[test]
    fn test_fallback_for_unparseable_text() {
        // unbalanced: the regex chain still rewrites what it can
        assert_eq!(normalize("log(x^2"), "log10(pow(x,2)");
        assert_eq!(normalize("(x+1)^2+sin("), "pow(x+1,2)+sin(");
        assert_eq!(denormalize("log10(pow(x,2)"), "log(x^2");
        assert_eq!(denormalize("pow(x+1,2)+sin("), "(x+1)^2+sin(");
    }

    #[test]
    fn test_fallback_alias_rewrite_respects_identifiers() {
        assert_eq!(rewrite_fallback("log(x)+log10(x)+ln(x)+("), "log10(x)+log10(x)+ln(x)+(");
        assert_eq!(rewrite_fallback("catalog(x"), "catalog(x");
    }
}

//! Pattern detection over a normalized expression, used only to pick explanatory text.
//! Nothing here changes a computed value.

use crate::calculus::types::LimitPoint;
use crate::symbolic::utils::{find_char_positions_outside_brackets, max_bracket_depth};
use std::collections::HashSet;

/// Which explanation catalog to use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalysisMode {
    Derivative,
    Limit(LimitPoint),
}

/// A rule (or special case) that applies to the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub tag: &'static str,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analysis {
    /// top-level terms, empty when the expression has a single term
    pub components: Vec<String>,
    /// rules in catalog order
    pub rules: Vec<Rule>,
}

enum Cue {
    /// a call of this function name
    Call(&'static str),
    /// this operator character anywhere
    Operator(char),
    /// brackets nested more than one level deep
    Nesting,
}

const DERIVATIVE_CATALOG: [(&str, Cue, &str); 25] = [
    ("sin", Cue::Call("sin"), "Sine rule: d/dx[sin(u)] = cos(u)·u'"),
    ("cos", Cue::Call("cos"), "Cosine rule: d/dx[cos(u)] = -sin(u)·u'"),
    ("tan", Cue::Call("tan"), "Tangent rule: d/dx[tan(u)] = sec²(u)·u'"),
    ("sec", Cue::Call("sec"), "Secant rule: d/dx[sec(u)] = sec(u)·tan(u)·u'"),
    ("csc", Cue::Call("csc"), "Cosecant rule: d/dx[csc(u)] = -csc(u)·cot(u)·u'"),
    ("cot", Cue::Call("cot"), "Cotangent rule: d/dx[cot(u)] = -csc²(u)·u'"),
    ("asin", Cue::Call("asin"), "Arcsine rule: d/dx[arcsin(u)] = u'/√(1-u²)"),
    ("acos", Cue::Call("acos"), "Arccosine rule: d/dx[arccos(u)] = -u'/√(1-u²)"),
    ("atan", Cue::Call("atan"), "Arctangent rule: d/dx[arctan(u)] = u'/(1+u²)"),
    ("sinh", Cue::Call("sinh"), "Hyperbolic sine rule: d/dx[sinh(u)] = cosh(u)·u'"),
    ("cosh", Cue::Call("cosh"), "Hyperbolic cosine rule: d/dx[cosh(u)] = sinh(u)·u'"),
    ("tanh", Cue::Call("tanh"), "Hyperbolic tangent rule: d/dx[tanh(u)] = sech²(u)·u'"),
    ("sech", Cue::Call("sech"), "Hyperbolic secant rule: d/dx[sech(u)] = -sech(u)·tanh(u)·u'"),
    ("csch", Cue::Call("csch"), "Hyperbolic cosecant rule: d/dx[csch(u)] = -csch(u)·coth(u)·u'"),
    ("coth", Cue::Call("coth"), "Hyperbolic cotangent rule: d/dx[coth(u)] = -csch²(u)·u'"),
    ("ln", Cue::Call("ln"), "Natural logarithm rule: d/dx[ln(u)] = u'/u"),
    ("log10", Cue::Call("log10"), "Base-10 logarithm rule: d/dx[log(u)] = u'/(u·ln(10))"),
    ("log2", Cue::Call("log2"), "Base-2 logarithm rule: d/dx[log2(u)] = u'/(u·ln(2))"),
    ("exp", Cue::Call("exp"), "Exponential rule: d/dx[exp(u)] = exp(u)·u'"),
    ("pow", Cue::Call("pow"), "Power rule: d/dx[x^n] = n·x^(n-1)"),
    ("sqrt", Cue::Call("sqrt"), "Square root rule: d/dx[√u] = u'/(2√u)"),
    ("abs", Cue::Call("abs"), "Absolute value rule: d/dx[|u|] = sign(u)·u'"),
    ("product", Cue::Operator('*'), "Product rule: d/dx[u·v] = u'·v + u·v'"),
    ("quotient", Cue::Operator('/'), "Quotient rule: d/dx[u/v] = (u'·v - u·v')/v²"),
    ("chain", Cue::Nesting, "Chain rule: d/dx[f(g(x))] = f'(g(x))·g'(x)"),
];

/// Names of every function called in the text, matched as whole identifiers followed by '('.
pub fn called_functions(text: &str) -> HashSet<&str> {
    let mut names = HashSet::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_alphabetic() || bytes[i] == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            if bytes.get(i) == Some(&b'(') {
                names.insert(&text[start..i]);
            }
        } else {
            i += 1;
        }
    }
    names
}

fn cue_matches(cue: &Cue, text: &str, calls: &HashSet<&str>) -> bool {
    match cue {
        Cue::Call(name) => calls.contains(name),
        Cue::Operator(op) => text.contains(*op),
        Cue::Nesting => max_bracket_depth(text) > 1,
    }
}

fn limit_rules(text: &str, calls: &HashSet<&str>, point: LimitPoint) -> Vec<Rule> {
    let mut rules = Vec::new();
    if text.contains('/') {
        rules.push(Rule {
            tag: "division",
            explanation: "Possible division by zero",
        });
    }
    if point.is_infinite() {
        if ["ln", "log10", "log2"].iter().any(|name| calls.contains(name)) {
            rules.push(Rule {
                tag: "log-infinity",
                explanation: "Logarithm at infinity grows without bound, but slowly",
            });
        }
        if calls.contains("sin") || calls.contains("cos") {
            rules.push(Rule {
                tag: "trig-infinity",
                explanation: "Trigonometric functions at infinity oscillate and have no limit alone",
            });
        }
    }
    if calls.contains("pow") {
        rules.push(Rule {
            tag: "polynomial",
            explanation: "Polynomial behavior: the highest power dominates",
        });
    }
    if max_bracket_depth(text) > 1 {
        rules.push(Rule {
            tag: "composite",
            explanation: "Composite function: evaluate the inner function first",
        });
    }
    rules
}

/// Splits on '+' and '-' at bracket depth 0 when the previous character is alphanumeric or ')'.
///
/// A leading sign and signs right after an operator or '(' do not split. Returns an empty list
/// when there is only one term.
pub fn split_components(text: &str) -> Vec<String> {
    let mut cuts: Vec<usize> = find_char_positions_outside_brackets(text, '+')
        .into_iter()
        .chain(find_char_positions_outside_brackets(text, '-'))
        .filter(|&i| {
            text[..i]
                .trim_end()
                .chars()
                .next_back()
                .is_some_and(|p| p.is_ascii_alphanumeric() || p == ')')
        })
        .collect();
    cuts.sort_unstable();
    let mut parts = Vec::new();
    let mut start = 0;
    for cut in cuts {
        parts.push(text[start..cut].trim().to_string());
        start = cut + 1;
    }
    parts.push(text[start..].trim().to_string());
    parts.retain(|part| !part.is_empty());
    if parts.len() > 1 { parts } else { Vec::new() }
}

/// Finds components and applicable rules of a normalized expression. Never fails.
pub fn analyze(expr: &str, mode: AnalysisMode) -> Analysis {
    let calls = called_functions(expr);
    let rules = match mode {
        AnalysisMode::Derivative => DERIVATIVE_CATALOG
            .iter()
            .filter(|(_, cue, _)| cue_matches(cue, expr, &calls))
            .map(|(tag, _, explanation)| Rule {
                tag: *tag,
                explanation: *explanation,
            })
            .collect(),
        AnalysisMode::Limit(point) => limit_rules(expr, &calls, point),
    };
    Analysis {
        components: split_components(expr),
        rules,
    }
}

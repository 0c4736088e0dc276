/// parse a settings document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4"
/// into sections of key -> list of values. Lines starting with //, #, % or ; are comments.
///
/// ```text
/// plot
///   x_min: -5
///   x_max: 5
/// scan
///   probes: -1, 0, 1
/// ```
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

pub type SectionMap = HashMap<String, Vec<Value>>;
pub type DocumentMap = HashMap<String, SectionMap>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("failed to parse entire document, remaining: '{0}'")]
    Trailing(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Floats and integers both count as numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
        }
    }
}

// word characters without spaces, not starting with a digit
fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

pub(crate) fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, title) = identifier(input)?;
    Ok((input.trim_start(), title))
}

pub(crate) fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    let raw = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';'));
    let mut value_parser = map(raw, |s: &str| {
        // integers first so that "3" does not become 3.0
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else {
            Value::String(s.to_string())
        }
    });
    value_parser.parse(input)
}

pub(crate) fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let separator_comma = delimited(space0, tag(","), space0);
    separated_list0(separator_comma, parse_value).parse(input)
}

pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    separated_pair(parse_key, colon_separator, parse_value_list).parse(input)
}

pub(crate) fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(terminated(parse_key_value_pair, multispace0)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

/// Drops comment lines (starting with //, #, %, or ;) and blank lines.
pub(crate) fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !(trimmed.is_empty()
                || trimmed.starts_with("//")
                || trimmed.starts_with('#')
                || trimmed.starts_with('%')
                || trimmed.starts_with(';'))
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the whole document. Sections that appear twice are merged, later keys win.
pub fn parse_document(input: &str) -> Result<DocumentMap, DocumentError> {
    let filtered = filter_comments(input);
    let mut parser = many0(delimited(multispace0, parse_section, multispace0));
    let (remaining, sections) = parser
        .parse(filtered.as_str())
        .map_err(|e| DocumentError::Syntax(format!("{:?}", e)))?;
    if !remaining.trim().is_empty() {
        return Err(DocumentError::Trailing(remaining.trim().to_string()));
    }
    let mut document = DocumentMap::new();
    for (title, section) in sections {
        document.entry(title).or_default().extend(section);
    }
    Ok(document)
}

pub fn parse_document_file(path: &Path) -> Result<DocumentMap, DocumentError> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

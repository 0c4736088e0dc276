//! a module turns a String expression into a symbolic expression
//!# Example
//! ```
//! use step_calculus::symbolic::parse_expr::parse_expression_func;
//! let parsed = parse_expression_func("x^2 + log(x)").unwrap();
//! assert_eq!(parsed.to_string(), "pow(x,2)+log10(x)");
//! ```
use crate::symbolic::symbolic_engine::{Expr, Func};
use thiserror::Error;
//                  grammar, loosest binding first
//                |_________________________________________|
//                | sum     := product (('+'|'-') product)*  |
//                | product := unary (('*'|'/')? unary)*     |
//                | unary   := ('+'|'-') unary | power       |
//                | power   := primary ('^' unary)?          |
//                | primary := number | name | name(args)    |
//                |            | '(' sum ')'                 |
//                |_________________________________________|
//  '^' is right associative and binds tighter than unary minus: -x^2 = -(x^2), 2^-1 = 2^(-1)
//  a missing '*' is allowed after a number or ')': 2x^2 = 2*(x^2), 3sin(x), (x+1)(x-1)

/// Failure to read a formula; `position` is a byte offset into the input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LeftBracket,
    RightBracket,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
            }
            '+' | '-' | '*' | '/' | '^' | '(' | ')' | ',' => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '^' => Token::Caret,
                    '(' => Token::LeftBracket,
                    ')' => Token::RightBracket,
                    _ => Token::Comma,
                };
                tokens.push((token, pos));
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                    i += 1;
                }
                // exponent part only when digits follow, so "2e" stays a number and a name
                if i < chars.len() && (chars[i].1 == 'e' || chars[i].1 == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j].1 == '+' || chars[j].1 == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].1.is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].1.is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let end = chars.get(i).map(|(p, _)| *p).unwrap_or(input.len());
                let text = &input[pos..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::new(format!("invalid number '{}'", text), pos))?;
                tokens.push((Token::Number(value), chars[start].0));
            }
            c if c.is_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                    i += 1;
                }
                let end = chars.get(i).map(|(p, _)| *p).unwrap_or(input.len());
                tokens.push((Token::Name(input[pos..end].to_string()), pos));
            }
            other => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", other),
                    pos,
                ));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, offset)| *offset)
            .unwrap_or(self.input_len)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ParseError> {
        let offset = self.offset();
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(_) => Err(ParseError::new(format!("expected {}", what), offset)),
            None => Err(ParseError::new(
                format!("expected {} but input ended", what),
                offset,
            )),
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next();
                    let right = self.parse_product()?;
                    left = Expr::Add(left.boxed(), right.boxed());
                }
                Some(Token::Minus) => {
                    self.next();
                    let right = self.parse_product()?;
                    left = Expr::Sub(left.boxed(), right.boxed());
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    let right = self.parse_unary()?;
                    left = Expr::Mul(left.boxed(), right.boxed());
                }
                Some(Token::Slash) => {
                    self.next();
                    let right = self.parse_unary()?;
                    left = Expr::Div(left.boxed(), right.boxed());
                }
                _ if self.implicit_product() => {
                    let right = self.parse_unary()?;
                    left = Expr::Mul(left.boxed(), right.boxed());
                }
                _ => return Ok(left),
            }
        }
    }

    fn implicit_product(&self) -> bool {
        let previous = self
            .pos
            .checked_sub(1)
            .and_then(|p| self.tokens.get(p))
            .map(|(token, _)| token);
        matches!(
            (previous, self.peek()),
            (
                Some(Token::Number(_)),
                Some(Token::Name(_) | Token::LeftBracket)
            ) | (
                Some(Token::RightBracket),
                Some(Token::Name(_) | Token::Number(_) | Token::LeftBracket)
            )
        )
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                Ok(Expr::Neg(self.parse_unary()?.boxed()))
            }
            Some(Token::Plus) => {
                self.next();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.next();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let offset = self.offset();
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Const(value)),
            Some(Token::Name(name)) => {
                if let Some(Token::LeftBracket) = self.peek() {
                    self.next();
                    let args = self.parse_arguments()?;
                    self.expect(Token::RightBracket, "')'")?;
                    build_call(&name, args, offset)
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LeftBracket) => {
                let inner = self.parse_sum()?;
                self.expect(Token::RightBracket, "')'")?;
                Ok(inner)
            }
            Some(Token::RightBracket) => Err(ParseError::new("unbalanced ')'", offset)),
            Some(_) => Err(ParseError::new("expected a number, name or '('", offset)),
            None => Err(ParseError::new("unexpected end of input", offset)),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if let Some(Token::RightBracket) = self.peek() {
            return Ok(args);
        }
        loop {
            args.push(self.parse_sum()?);
            match self.peek() {
                Some(Token::Comma) => {
                    self.next();
                }
                _ => return Ok(args),
            }
        }
    }
}

fn build_call(name: &str, mut args: Vec<Expr>, offset: usize) -> Result<Expr, ParseError> {
    if name == "pow" {
        if args.len() != 2 {
            return Err(ParseError::new("pow expects 2 arguments", offset));
        }
        let exponent = args.pop().ok_or_else(|| ParseError::new("missing exponent", offset))?;
        let base = args.pop().ok_or_else(|| ParseError::new("missing base", offset))?;
        return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
    }
    let func = Func::from_name(name)
        .ok_or_else(|| ParseError::new(format!("unknown function '{}'", name), offset))?;
    if args.len() != 1 {
        return Err(ParseError::new(
            format!("{} expects 1 argument, got {}", name, args.len()),
            offset,
        ));
    }
    let arg = args.pop().ok_or_else(|| ParseError::new("missing argument", offset))?;
    Ok(Expr::Call(func, arg.boxed()))
}

/// Parses a formula written in either user notation (`x^2`, `ln(x)`, `arcsin(x)`) or canonical
/// call syntax (`pow(x,2)`, `log10(x)`, `asin(x)`) into an expression tree.
pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new("empty expression", 0));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        input_len: input.len(),
    };
    let expr = parser.parse_sum()?;
    if parser.pos < parser.tokens.len() {
        let offset = parser.offset();
        return match parser.peek() {
            Some(Token::RightBracket) => Err(ParseError::new("unbalanced ')'", offset)),
            _ => Err(ParseError::new("unexpected token", offset)),
        };
    }
    Ok(expr)
}

impl Expr {
    /// EXPRESSION PARSING FROM STRINGS

    /// Parses a mathematical expression from string representation.
    ///
    /// # Supported Syntax
    /// - Variables: x, y, var_name; named constants e, pi
    /// - Constants: 3.14, 2.5, 1e-6
    /// - Operators: +, -, *, /, ^ and pow(a,b)
    /// - Functions: every [`Func`] by canonical or user name
    /// - Parentheses for grouping
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input)
    }
}

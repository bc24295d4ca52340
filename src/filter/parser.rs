//! SCIM filter and PATCH path parser (RFC 7644 §3.4.2.2, §3.5.2).
//!
//! A recursive descent parser over the filter grammar:
//!
//! ```text
//! filter     = or
//! or         = and *("or" and)
//! and        = unary *("and" unary)
//! unary      = "not" "(" filter ")" / primary
//! primary    = "(" filter ")" / attrPath "[" filter "]" / attrPath "pr" / attrPath compareOp compValue
//! attrPath   = [URI ":"] ATTRNAME *("." subAttr)
//! compValue  = "false" / "null" / "true" / number / string
//! ```
//!
//! PATCH paths use the same attribute and filter productions:
//! `PATH = attrPath / valuePath ["." subAttr]`.

use super::{AttributePath, CompareOp, Filter, MAX_NESTING_DEPTH, PathElement};
use crate::error::{ScimError, ScimResult};
use serde_json::Value;

/// Parse a standalone SCIM filter. Failures are reported as `invalidFilter`.
pub fn parse_filter(input: &str) -> ScimResult<Filter> {
    let mut parser = Parser::new(input, Mode::Filter);
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(parser.fail("filter is empty"));
    }
    let filter = parser.parse_or()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.fail(&format!(
            "unexpected input at position {}: '{}'",
            parser.pos,
            parser.rest()
        )));
    }
    Ok(filter)
}

/// Parse a PATCH operation path. Failures are reported as `invalidPath`.
pub fn parse_path(input: &str) -> ScimResult<AttributePath> {
    let mut parser = Parser::new(input, Mode::Path);
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(parser.fail("path is empty"));
    }
    let path = parser.parse_patch_path()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.fail(&format!("unexpected input '{}'", parser.rest())));
    }
    Ok(path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Filter,
    Path,
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
    mode: Mode,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, mode: Mode) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
            mode,
            depth: 0,
        }
    }

    /// Open a `(`, `not (` or `[` group.
    fn enter(&mut self) -> ScimResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.fail("filter nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn fail(&self, message: &str) -> ScimError {
        match self.mode {
            Mode::Filter => ScimError::invalid_filter(format!("{} in '{}'", message, self.input)),
            Mode::Path => ScimError::invalid_path(self.input, message),
        }
    }

    fn parse_or(&mut self) -> ScimResult<Filter> {
        let mut children = vec![self.parse_and()?];
        loop {
            self.skip_whitespace();
            if self.try_consume_keyword("or") {
                children.push(self.parse_and()?);
            } else {
                break;
            }
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Filter::Or(children)
        })
    }

    fn parse_and(&mut self) -> ScimResult<Filter> {
        let mut children = vec![self.parse_unary()?];
        loop {
            self.skip_whitespace();
            if self.try_consume_keyword("and") {
                children.push(self.parse_unary()?);
            } else {
                break;
            }
        }
        Ok(if children.len() == 1 {
            children.remove(0)
        } else {
            Filter::And(children)
        })
    }

    fn parse_unary(&mut self) -> ScimResult<Filter> {
        self.skip_whitespace();
        let checkpoint = self.pos;
        if self.try_consume_keyword("not") {
            self.skip_whitespace();
            if self.try_consume_char('(') {
                self.enter()?;
                let inner = self.parse_or()?;
                self.skip_whitespace();
                if !self.try_consume_char(')') {
                    return Err(self.fail("expected ')' to close 'not' expression"));
                }
                self.leave();
                return Ok(Filter::Not(Box::new(inner)));
            }
            // An attribute that happens to be called "not"
            self.pos = checkpoint;
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ScimResult<Filter> {
        self.skip_whitespace();
        if self.try_consume_char('(') {
            self.enter()?;
            let inner = self.parse_or()?;
            self.skip_whitespace();
            if !self.try_consume_char(')') {
                return Err(self.fail("expected ')' to close grouped expression"));
            }
            self.leave();
            return Ok(inner);
        }
        self.parse_attribute_expression()
    }

    fn parse_attribute_expression(&mut self) -> ScimResult<Filter> {
        let path = self.parse_attribute_path()?;

        if self.try_consume_char('[') {
            self.enter()?;
            let inner = self.parse_or()?;
            self.skip_whitespace();
            if !self.try_consume_char(']') {
                return Err(self.fail("expected ']' to close value filter"));
            }
            self.leave();
            return Ok(Filter::Complex {
                path,
                filter: Box::new(inner),
            });
        }

        if !self.skip_whitespace() {
            return Err(self.fail(&format!("expected operator after '{}'", path)));
        }
        let operator = self.parse_word();
        if operator.is_empty() {
            return Err(self.fail(&format!("expected operator after '{}'", path)));
        }

        let operator = operator.to_ascii_lowercase();
        if operator == "pr" {
            return Ok(Filter::Present(path));
        }

        if !self.skip_whitespace() {
            return Err(self.fail(&format!("expected value after '{}'", operator)));
        }
        let value = self.parse_value()?;

        match operator.as_str() {
            "eq" => Ok(Filter::Compare {
                op: CompareOp::Eq,
                path,
                value,
            }),
            "ne" => Ok(Filter::Compare {
                op: CompareOp::Ne,
                path,
                value,
            }),
            "gt" => Ok(Filter::Compare {
                op: CompareOp::Gt,
                path,
                value,
            }),
            "ge" => Ok(Filter::Compare {
                op: CompareOp::Ge,
                path,
                value,
            }),
            "lt" => Ok(Filter::Compare {
                op: CompareOp::Lt,
                path,
                value,
            }),
            "le" => Ok(Filter::Compare {
                op: CompareOp::Le,
                path,
                value,
            }),
            "sw" => Ok(Filter::StartsWith { path, value }),
            "ew" => Ok(Filter::EndsWith { path, value }),
            "co" => Ok(Filter::Contains { path, value }),
            other => Err(self.fail(&format!("unknown operator '{}'", other))),
        }
    }

    fn parse_patch_path(&mut self) -> ScimResult<AttributePath> {
        let path = self.parse_attribute_path()?;
        if !self.try_consume_char('[') {
            return Ok(path);
        }

        if path.len() != 1 {
            return Err(self.fail("a value filter may only follow a top-level attribute"));
        }
        self.enter()?;
        let filter = self.parse_or()?;
        self.skip_whitespace();
        if !self.try_consume_char(']') {
            return Err(self.fail("expected ']' to close value filter"));
        }
        self.leave();

        let schema = path.schema().map(str::to_string);
        let mut elements = vec![PathElement::new(path.normalized(), Some(filter))];
        if self.try_consume_char('.') {
            let name = self.parse_attribute_token();
            if !is_attribute_name(&name) {
                return Err(self.fail("expected sub-attribute name after ']'"));
            }
            elements.push(PathElement::new(name, None));
        }
        Ok(AttributePath::from_parts(schema, elements))
    }

    fn parse_attribute_path(&mut self) -> ScimResult<AttributePath> {
        self.skip_whitespace();
        let token = self.parse_attribute_token();
        if token.is_empty() {
            return Err(self.fail("expected attribute name"));
        }

        let (schema, attribute) = if token.to_ascii_lowercase().starts_with("urn:") {
            match token.rsplit_once(':') {
                Some((urn, attribute)) => (Some(urn.to_string()), attribute.to_string()),
                None => (None, token),
            }
        } else {
            (None, token)
        };

        let mut elements = Vec::new();
        for segment in attribute.split('.') {
            if !is_attribute_name(segment) {
                return Err(self.fail(&format!("invalid attribute name '{}'", attribute)));
            }
            elements.push(PathElement::new(segment, None));
        }
        Ok(AttributePath::from_parts(schema, elements))
    }

    fn parse_attribute_token(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$' | ':' | '.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_word(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_value(&mut self) -> ScimResult<Value> {
        if self.try_consume_char('"') {
            let start = self.pos;
            loop {
                match self.peek() {
                    None => return Err(self.fail("unterminated string literal")),
                    Some('\\') => self.pos += 2,
                    Some('"') => break,
                    Some(_) => self.pos += 1,
                }
            }
            let raw: String = self.chars[start..self.pos.min(self.chars.len())]
                .iter()
                .collect();
            self.pos += 1;
            return serde_json::from_str::<Value>(&format!("\"{}\"", raw))
                .map_err(|e| self.fail(&format!("invalid string literal: {}", e)));
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        match token.to_ascii_lowercase().as_str() {
            "" => Err(self.fail("expected value")),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            _ => match serde_json::from_str::<Value>(&token) {
                Ok(number @ Value::Number(_)) => Ok(number),
                _ => Err(self.fail(&format!("invalid literal '{}'", token))),
            },
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn rest(&self) -> String {
        self.chars[self.pos.min(self.chars.len())..].iter().collect()
    }

    /// Returns whether any whitespace was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn try_consume_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn try_consume_keyword(&mut self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        if end > self.chars.len() {
            return false;
        }
        let candidate: String = self.chars[self.pos..end].iter().collect();
        if !candidate.eq_ignore_ascii_case(keyword) {
            return false;
        }
        let boundary = self
            .chars
            .get(end)
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$' | '.' | ':')));
        if boundary {
            self.pos = end;
        }
        boundary
    }
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

//! Route pattern parser.
//!
//! # Grammar
//! ```text
//! /            segment separator
//! :name        variable, name = [A-Za-z_][A-Za-z0-9_]*
//! ( ... )      optional group, must not be empty
//! *            wildcard
//! \c           literal c, for c in : ( ) *   (any other '\' is literal)
//! anything     literal text, adjacent characters merged
//! ```
//!
//! # Design Decisions
//! - Single left-to-right scan, recursion only for optional groups
//! - Only lexical/structural errors are reported here; semantic checks
//!   (duplicate names, wildcard after variable) belong to `validation.rs`

use crate::routing::error::PatternError;
use crate::routing::node::{
    is_escapable, PatternNode, ESCAPE, OPTIONAL_END, OPTIONAL_START, SEGMENT_SEPARATOR, VARIABLE_START,
    WILDCARD,
};

/// Parse a route pattern into its syntax tree.
pub fn parse(pattern: &str) -> Result<PatternNode, PatternError> {
    let mut parser = Parser { input: pattern, pos: 0 };
    let nodes = parser.parse_nodes(None)?;
    Ok(PatternNode::concat(nodes))
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Parse until end of input, or until the `)` closing the group opened at `open`.
    fn parse_nodes(&mut self, open: Option<usize>) -> Result<Vec<PatternNode>, PatternError> {
        let mut nodes = Vec::new();
        let mut literal = String::new();

        while let Some(c) = self.peek() {
            let position = self.pos;
            match c {
                SEGMENT_SEPARATOR => {
                    self.bump();
                    flush_literal(&mut literal, &mut nodes);
                    nodes.push(PatternNode::SegmentSeparator);
                }
                WILDCARD => {
                    self.bump();
                    flush_literal(&mut literal, &mut nodes);
                    nodes.push(PatternNode::Wildcard);
                }
                VARIABLE_START => {
                    self.bump();
                    flush_literal(&mut literal, &mut nodes);
                    let name = self.parse_variable_name(position)?;
                    nodes.push(PatternNode::Variable(name));
                }
                OPTIONAL_START => {
                    self.bump();
                    flush_literal(&mut literal, &mut nodes);
                    let children = self.parse_nodes(Some(position))?;
                    if children.is_empty() {
                        return Err(PatternError::EmptyOptional { position });
                    }
                    nodes.push(PatternNode::optional(PatternNode::concat(children)));
                }
                OPTIONAL_END => {
                    if open.is_none() {
                        return Err(PatternError::UnexpectedOptionalEnd { position });
                    }
                    self.bump();
                    flush_literal(&mut literal, &mut nodes);
                    return Ok(nodes);
                }
                ESCAPE => {
                    self.bump();
                    match self.peek() {
                        Some(next) if is_escapable(next) => {
                            self.bump();
                            literal.push(next);
                        }
                        _ => literal.push(ESCAPE),
                    }
                }
                other => {
                    self.bump();
                    literal.push(other);
                }
            }
        }

        if let Some(position) = open {
            return Err(PatternError::MissingOptionalEnd { position });
        }

        flush_literal(&mut literal, &mut nodes);
        Ok(nodes)
    }

    fn parse_variable_name(&mut self, position: usize) -> Result<String, PatternError> {
        let start = self.pos;
        match self.peek() {
            Some(c) if is_name_start(c) => {
                self.bump();
            }
            _ => return Err(PatternError::InvalidVariableName { position }),
        }

        while let Some(c) = self.peek() {
            if !is_name_char(c) {
                break;
            }
            self.bump();
        }

        Ok(self.input[start..self.pos].to_string())
    }
}

fn flush_literal(literal: &mut String, nodes: &mut Vec<PatternNode>) {
    if !literal.is_empty() {
        nodes.push(PatternNode::Match(std::mem::take(literal)));
    }
}

pub(crate) fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

//! Expression compilation.
//!
//! An expression is literal text with `$name` references. A reference is
//! looked up by longest match in both the system variables and the matched
//! route's variables; the longer name wins, and a system variable wins a tie.
//! A reference that resolves to nothing stays in the output as written.

use std::collections::HashMap;

use crate::expression::trie::{is_variable_char, is_variable_start, VariableTrie};
use crate::expression::variables::{system_trie, RequestContext, SystemVariable};

const VARIABLE_START: char = '$';

/// One step of a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Literal(String),
    System(SystemVariable),
    /// A variable extracted from the request path by the route pattern.
    Route(String),
}

/// A compiled expression: an ordered list of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedExpression {
    instructions: Vec<Instruction>,
}

impl ParsedExpression {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// True when the expression has no variable references.
    pub fn is_constant(&self) -> bool {
        self.instructions.iter().all(|i| matches!(i, Instruction::Literal(_)))
    }

    /// Produce the final string for one request.
    pub fn evaluate(&self, ctx: &dyn RequestContext, route_variables: &HashMap<String, String>) -> String {
        match self.instructions.as_slice() {
            [] => String::new(),
            [Instruction::Literal(value)] => value.clone(),
            instructions => {
                let mut out = String::new();
                for instruction in instructions {
                    match instruction {
                        Instruction::Literal(value) => out.push_str(value),
                        Instruction::System(variable) => variable.write_value(ctx, &mut out),
                        Instruction::Route(name) => {
                            if let Some(value) = route_variables.get(name) {
                                out.push_str(value);
                            }
                        }
                    }
                }
                out
            }
        }
    }
}

/// Compile `text` against the system variables and `route_variables`.
pub fn parse_expression(text: &str, route_variables: &VariableTrie<String>) -> ParsedExpression {
    let mut instructions = Vec::new();
    let mut literal = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(index) = rest.find(VARIABLE_START) {
        literal.push_str(&rest[..index]);
        let after = &rest[index + VARIABLE_START.len_utf8()..];

        if !after.chars().next().is_some_and(is_variable_start) {
            literal.push(VARIABLE_START);
            rest = after;
            continue;
        }

        let run_len = after.find(|c: char| !is_variable_char(c)).unwrap_or(after.len());
        let run = &after[..run_len];

        let system = system_trie()
            .try_get_best_match(run)
            .map(|(variable, len)| (Instruction::System(*variable), len));
        let route = route_variables
            .try_get_best_match(run)
            .map(|(name, len)| (Instruction::Route(name.clone()), len));

        // Longest name wins across both sets; system variables win a tie.
        let resolved = match (system, route) {
            (Some(system), Some(route)) if route.1 > system.1 => Some(route),
            (Some(system), _) => Some(system),
            (None, route) => route,
        };

        match resolved {
            Some((instruction, len)) => {
                flush_literal(&mut literal, &mut instructions);
                instructions.push(instruction);
                rest = &after[len..];
            }
            None => {
                literal.push(VARIABLE_START);
                literal.push_str(run);
                rest = &after[run_len..];
            }
        }
    }

    literal.push_str(rest);
    flush_literal(&mut literal, &mut instructions);
    ParsedExpression { instructions }
}

fn flush_literal(literal: &mut String, instructions: &mut Vec<Instruction>) {
    if !literal.is_empty() {
        instructions.push(Instruction::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::variables::RequestInfo;

    fn route_trie(names: &[&str]) -> VariableTrie<String> {
        let mut trie = VariableTrie::new();
        for name in names {
            trie.add_value(name, name.to_string()).unwrap();
        }
        trie
    }

    fn literal(value: &str) -> Instruction {
        Instruction::Literal(value.to_string())
    }

    #[test]
    fn test_plain_text() {
        let parsed = parse_expression("no variables here", &VariableTrie::new());
        assert_eq!(parsed.instructions(), [literal("no variables here")]);
        assert!(parsed.is_constant());
        assert!(parse_expression("", &VariableTrie::new()).instructions().is_empty());
    }

    #[test]
    fn test_system_variables() {
        let parsed = parse_expression("$host/$request_path", &VariableTrie::new());
        assert_eq!(
            parsed.instructions(),
            [
                Instruction::System(SystemVariable::Host),
                literal("/"),
                Instruction::System(SystemVariable::RequestPath),
            ]
        );
    }

    #[test]
    fn test_longest_match_without_delimiter() {
        let parsed = parse_expression("$request_path_base$request_pathX", &VariableTrie::new());
        assert_eq!(
            parsed.instructions(),
            [
                Instruction::System(SystemVariable::RequestPathBase),
                Instruction::System(SystemVariable::RequestPath),
                literal("X"),
            ]
        );

        let parsed = parse_expression("$hostname", &VariableTrie::new());
        assert_eq!(parsed.instructions(), [Instruction::System(SystemVariable::Host), literal("name")]);
    }

    #[test]
    fn test_route_variables() {
        let trie = route_trie(&["id", "version"]);
        let parsed = parse_expression("v$version/items/$id", &trie);
        assert_eq!(
            parsed.instructions(),
            [
                literal("v"),
                Instruction::Route("version".into()),
                literal("/items/"),
                Instruction::Route("id".into()),
            ]
        );
    }

    #[test]
    fn test_route_variable_extending_system_name() {
        let trie = route_trie(&["hostname", "host_id"]);
        let parsed = parse_expression("$hostname/$host_id/$host/$hostx", &trie);
        assert_eq!(
            parsed.instructions(),
            [
                Instruction::Route("hostname".into()),
                literal("/"),
                Instruction::Route("host_id".into()),
                literal("/"),
                Instruction::System(SystemVariable::Host),
                literal("/"),
                Instruction::System(SystemVariable::Host),
                literal("x"),
            ]
        );
    }

    #[test]
    fn test_unresolved_references_stay_literal() {
        let parsed = parse_expression("price=$undefined_var", &VariableTrie::new());
        assert_eq!(parsed.instructions(), [literal("price=$undefined_var")]);

        let parsed = parse_expression("$ 5 costs $$ or $9", &VariableTrie::new());
        assert_eq!(parsed.instructions(), [literal("$ 5 costs $$ or $9")]);

        let parsed = parse_expression("trailing $", &VariableTrie::new());
        assert_eq!(parsed.instructions(), [literal("trailing $")]);
    }

    #[test]
    fn test_adjacent_literals_coalesced() {
        let parsed = parse_expression("a$nope-b$-c", &VariableTrie::new());
        assert_eq!(parsed.instructions(), [literal("a$nope-b$-c")]);
    }

    #[test]
    fn test_evaluate() {
        let trie = route_trie(&["id"]);
        let parsed = parse_expression("$host/$request_path?id=$id", &trie);
        let info = RequestInfo {
            host: Some("example.com".into()),
            path: Some("/a/b".into()),
            ..Default::default()
        };
        let variables = HashMap::from([("id".to_string(), "42".to_string())]);

        assert_eq!(parsed.evaluate(&info, &variables), "example.com//a/b?id=42");
        assert_eq!(ParsedExpression::default().evaluate(&info, &variables), "");
    }
}

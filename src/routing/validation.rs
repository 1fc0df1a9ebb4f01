//! Semantic checks over a parsed route pattern.
//!
//! # Responsibilities
//! - Reject patterns that parse but cannot be matched unambiguously
//! - Report the first violation found
//!
//! # Design Decisions
//! - Each check is a stateless validator; state lives in a per-call visitor
//! - Validators run in a fixed order after parsing, before compilation

use std::collections::HashSet;

use crate::expression::variables::is_system_variable;
use crate::routing::error::PatternError;
use crate::routing::node::{walk, PatternNode, PatternVisitor};

/// A single structural check over a parsed pattern.
pub trait PatternValidator: Send + Sync {
    fn validate(&self, pattern: &PatternNode) -> Result<(), PatternError>;
}

/// Every variable name is declared at most once.
#[derive(Debug, Default)]
pub struct UniqueVariableNames;

/// No variable shadows a system variable.
#[derive(Debug, Default)]
pub struct NoReservedVariableNames;

/// A wildcard never immediately follows a variable in traversal order.
#[derive(Debug, Default)]
pub struct NoWildcardAfterVariable;

static VALIDATORS: &[&dyn PatternValidator] =
    &[&UniqueVariableNames, &NoReservedVariableNames, &NoWildcardAfterVariable];

/// Run the validator chain.
pub fn validate(pattern: &PatternNode) -> Result<(), PatternError> {
    for validator in VALIDATORS {
        validator.validate(pattern)?;
    }
    Ok(())
}

impl PatternValidator for UniqueVariableNames {
    fn validate(&self, pattern: &PatternNode) -> Result<(), PatternError> {
        struct Seen(HashSet<String>);

        impl PatternVisitor for Seen {
            type Error = PatternError;

            fn visit_variable(&mut self, name: &str) -> Result<(), PatternError> {
                if !self.0.insert(name.to_string()) {
                    return Err(PatternError::DuplicateVariable { name: name.to_string() });
                }
                Ok(())
            }
        }

        walk(pattern, &mut Seen(HashSet::new()))
    }
}

impl PatternValidator for NoReservedVariableNames {
    fn validate(&self, pattern: &PatternNode) -> Result<(), PatternError> {
        struct Reserved;

        impl PatternVisitor for Reserved {
            type Error = PatternError;

            fn visit_variable(&mut self, name: &str) -> Result<(), PatternError> {
                if is_system_variable(name) {
                    return Err(PatternError::ReservedVariable { name: name.to_string() });
                }
                Ok(())
            }
        }

        walk(pattern, &mut Reserved)
    }
}

impl PatternValidator for NoWildcardAfterVariable {
    fn validate(&self, pattern: &PatternNode) -> Result<(), PatternError> {
        #[derive(Default)]
        struct LastLeaf {
            was_variable: bool,
        }

        impl PatternVisitor for LastLeaf {
            type Error = PatternError;

            fn visit_match(&mut self, _value: &str) -> Result<(), PatternError> {
                self.was_variable = false;
                Ok(())
            }

            fn visit_segment_separator(&mut self) -> Result<(), PatternError> {
                self.was_variable = false;
                Ok(())
            }

            fn visit_variable(&mut self, _name: &str) -> Result<(), PatternError> {
                self.was_variable = true;
                Ok(())
            }

            fn visit_wildcard(&mut self) -> Result<(), PatternError> {
                if self.was_variable {
                    return Err(PatternError::WildcardAfterVariable);
                }
                Ok(())
            }
        }

        walk(pattern, &mut LastLeaf::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::parser::parse;

    fn check(pattern: &str) -> Result<(), PatternError> {
        validate(&parse(pattern).expect("pattern should parse"))
    }

    #[test]
    fn test_valid_patterns() {
        assert!(check("/api/v:version/product/:id/").is_ok());
        assert!(check("/api(/v:version)/product(/:id)").is_ok());
        assert!(check("/files/*/:name").is_ok());
        assert!(check(":a/*").is_ok());
        assert!(check("").is_ok());
    }

    #[test]
    fn test_duplicate_variable() {
        assert_eq!(
            check("/category/:id/product/:id"),
            Err(PatternError::DuplicateVariable { name: "id".into() })
        );
        assert!(check("/category/:id/product/:id")
            .unwrap_err()
            .to_string()
            .contains("variable name already used"));
    }

    #[test]
    fn test_reserved_variable() {
        assert_eq!(
            check("/users/:host"),
            Err(PatternError::ReservedVariable { name: "host".into() })
        );
        assert!(check("/users/:hostname").is_ok());
    }

    #[test]
    fn test_wildcard_after_variable() {
        assert_eq!(check(":a*"), Err(PatternError::WildcardAfterVariable));
        assert_eq!(check("/x/:a(*)"), Err(PatternError::WildcardAfterVariable));
        assert_eq!(check("/x(/:a)*"), Err(PatternError::WildcardAfterVariable));
        assert!(check("/x/:a-*").is_ok());
    }

    #[test]
    fn test_validators_run_in_order() {
        // Both duplicate and wildcard violations; the duplicate check runs first.
        assert_eq!(
            check("/:id/:id*"),
            Err(PatternError::DuplicateVariable { name: "id".into() })
        );
    }
}

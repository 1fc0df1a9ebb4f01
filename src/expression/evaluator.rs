//! Expression evaluation with per-route compilation cache.

use std::collections::HashMap;
use std::sync::Arc;

use crate::expression::cache::ExpressionCache;
use crate::expression::parser::{parse_expression, ParsedExpression};
use crate::expression::trie::{TrieError, VariableTrie};
use crate::expression::variables::RequestContext;

/// Evaluates expressions for one route.
///
/// Compilation depends on the route's declared variable names, so each
/// compiled route owns its evaluator and cache. Both are dropped with the
/// route table snapshot that created them.
#[derive(Debug)]
pub struct ExpressionEvaluator {
    route_variables: VariableTrie<String>,
    cache: ExpressionCache,
}

impl ExpressionEvaluator {
    /// Evaluator for a route declaring `variable_names`.
    pub fn new(variable_names: &[String], cache_limit: usize) -> Result<Self, TrieError> {
        let mut route_variables = VariableTrie::new();
        for name in variable_names {
            route_variables.add_value(name, name.clone())?;
        }

        Ok(Self {
            route_variables,
            cache: ExpressionCache::new(cache_limit),
        })
    }

    /// Evaluator that only knows system variables.
    pub fn system_only(cache_limit: usize) -> Self {
        Self {
            route_variables: VariableTrie::new(),
            cache: ExpressionCache::new(cache_limit),
        }
    }

    /// Compiled form of `text`, from the cache when possible.
    pub fn parse(&self, text: &str) -> Arc<ParsedExpression> {
        self.cache
            .get_or_insert_with(text, |text| parse_expression(text, &self.route_variables))
    }

    /// Evaluate `text` for one request. Never fails; unknown references are echoed.
    pub fn evaluate(
        &self,
        ctx: &dyn RequestContext,
        route_variables: &HashMap<String, String>,
        text: &str,
    ) -> String {
        if text.is_empty() {
            return String::new();
        }
        self.parse(text).evaluate(ctx, route_variables)
    }

    pub fn cache(&self) -> &ExpressionCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::variables::RequestInfo;

    #[test]
    fn test_evaluate_scenarios() {
        let evaluator = ExpressionEvaluator::system_only(64);
        let info = RequestInfo {
            host: Some("example.com".into()),
            path: Some("/a/b".into()),
            ..Default::default()
        };
        let none = HashMap::new();

        assert_eq!(evaluator.evaluate(&info, &none, "$host$request_path"), "example.com/a/b");
        assert_eq!(evaluator.evaluate(&info, &none, "price=$undefined_var"), "price=$undefined_var");
        assert_eq!(evaluator.evaluate(&info, &none, ""), "");
        assert_eq!(evaluator.cache().len(), 2);
    }

    #[test]
    fn test_route_variables_scoped_to_route() {
        let names = vec!["id".to_string()];
        let with_id = ExpressionEvaluator::new(&names, 64).unwrap();
        let without = ExpressionEvaluator::system_only(64);
        let info = RequestInfo::default();
        let variables = HashMap::from([("id".to_string(), "7".to_string())]);

        assert_eq!(with_id.evaluate(&info, &variables, "item-$id"), "item-7");
        assert_eq!(without.evaluate(&info, &variables, "item-$id"), "item-$id");
    }

    #[test]
    fn test_invalid_route_variable_name() {
        let names = vec!["bad-name".to_string()];
        assert!(ExpressionEvaluator::new(&names, 64).is_err());
    }
}

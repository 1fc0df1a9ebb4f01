//! Route lookup.
//!
//! # Responsibilities
//! - Compile configured routes into an immutable snapshot
//! - Resolve a request path to the first matching route
//! - Swap snapshots atomically on reload
//!
//! # Design Decisions
//! - Immutable snapshots behind `ArcSwap`: resolution never locks and always
//!   sees one complete route list
//! - O(n) scan in registration order, first match wins
//! - A bad route is logged and skipped; a bad configuration keeps the
//!   current snapshot live
//! - Explicit NoMatch rather than silent default

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;

use crate::config::schema::{GatewayConfig, RouteConfig, SystemConfig};
use crate::config::validation::{validate_config, validate_route};
use crate::expression::evaluator::ExpressionEvaluator;
use crate::expression::variables::RequestContext;
use crate::observability::metrics;
use crate::routing::error::{ConfigError, PatternError, RouteError};
use crate::routing::matcher::PatternMatcher;
use crate::routing::{parser, validation};

/// A route whose pattern has been parsed, validated and compiled.
#[derive(Debug)]
pub struct CompiledRoute {
    pattern: String,
    matcher: PatternMatcher,
    settings: RouteConfig,
    evaluator: ExpressionEvaluator,
}

impl CompiledRoute {
    /// Parse, validate and compile `settings.pattern`.
    pub fn compile(settings: RouteConfig, system: &SystemConfig) -> Result<Self, PatternError> {
        let pattern = normalize_route(&settings.pattern);
        let node = parser::parse(settings.pattern.trim())?;
        validation::validate(&node)?;
        let matcher = PatternMatcher::compile(&node)?;
        let evaluator = ExpressionEvaluator::new(matcher.variable_names(), system.expression_cache_limit)
            .map_err(|e| PatternError::Compile(e.to_string()))?;

        Ok(Self {
            pattern,
            matcher,
            settings,
            evaluator,
        })
    }

    /// The normalized pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn variable_names(&self) -> &[String] {
        self.matcher.variable_names()
    }

    pub fn settings(&self) -> &RouteConfig {
        &self.settings
    }

    pub fn evaluator(&self) -> &ExpressionEvaluator {
        &self.evaluator
    }
}

/// The outcome of a successful resolution, owned by one request.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub route: Arc<CompiledRoute>,
    /// Unmatched remainder of the path, forwarded upstream.
    pub path_suffix: String,
    /// Variables extracted from the path, keyed by declared name.
    pub variables: HashMap<String, String>,
}

impl ResolvedRoute {
    pub fn settings(&self) -> &RouteConfig {
        self.route.settings()
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Evaluate an expression against this route's variables.
    pub fn evaluate(&self, ctx: &dyn RequestContext, expression: &str) -> String {
        self.route.evaluator().evaluate(ctx, &self.variables, expression)
    }
}

/// A route excluded from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRejection {
    pub index: usize,
    pub error: RouteError,
}

/// Summary of a snapshot build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub installed: usize,
    pub rejected: Vec<RouteRejection>,
}

/// One immutable generation of the route table.
#[derive(Debug, Default)]
pub struct RouteSnapshot {
    routes: Vec<Arc<CompiledRoute>>,
    system: SystemConfig,
}

impl RouteSnapshot {
    /// Compile every route of `config`.
    pub fn build(config: &GatewayConfig) -> Result<(Self, LoadReport), ConfigError> {
        if let Err(errors) = validate_config(config) {
            let global: Vec<_> = errors.into_iter().filter(|e| e.is_global()).collect();
            if !global.is_empty() {
                return Err(ConfigError::Rejected(global));
            }
        }

        let mut routes = Vec::with_capacity(config.routes.len());
        let mut report = LoadReport::default();
        let mut seen = HashSet::new();

        for (index, route) in config.routes.iter().enumerate() {
            let compiled = match validate_route(route).into_iter().next() {
                Some(error) => Err(RouteError::Settings(error)),
                None => CompiledRoute::compile(route.clone(), &config.system).map_err(|source| {
                    RouteError::Pattern {
                        pattern: route.pattern.clone(),
                        source,
                    }
                }),
            };

            match compiled {
                Ok(compiled) => {
                    if !seen.insert(compiled.pattern().to_ascii_lowercase()) {
                        tracing::warn!(
                            pattern = %route.pattern,
                            "Route is shadowed by an earlier route with the same pattern"
                        );
                    }
                    routes.push(Arc::new(compiled));
                }
                Err(error) => {
                    tracing::warn!(index, pattern = %route.pattern, error = %error, "Route rejected");
                    metrics::record_route_rejected();
                    report.rejected.push(RouteRejection { index, error });
                }
            }
        }

        report.installed = routes.len();
        Ok((
            Self {
                routes,
                system: config.system.clone(),
            },
            report,
        ))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Arc<CompiledRoute>] {
        &self.routes
    }

    /// First route matching `path`.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let started = Instant::now();
        self.resolve_timed(path, || started.elapsed())
    }

    /// `resolve` with the time spent so far read from `elapsed`.
    fn resolve_timed(&self, path: &str, elapsed: impl Fn() -> Duration) -> Option<ResolvedRoute> {
        if path.len() > self.system.max_path_length {
            tracing::debug!(length = path.len(), max = self.system.max_path_length, "Path too long to route");
            metrics::record_resolution("too_long");
            return None;
        }

        let budget = Duration::from_millis(self.system.match_budget_ms);

        for route in &self.routes {
            if let Some(matched) = route.matcher.matches(path) {
                metrics::record_resolution("matched");
                return Some(ResolvedRoute {
                    route: route.clone(),
                    path_suffix: matched.suffix,
                    variables: matched.variables,
                });
            }

            if elapsed() > budget {
                tracing::warn!(path = %path, budget_ms = self.system.match_budget_ms, "Route matching budget exceeded");
                metrics::record_resolution("budget_exceeded");
                return None;
            }
        }

        tracing::debug!(path = %path, "No route matched");
        metrics::record_resolution("miss");
        None
    }
}

/// The live route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    current: ArcSwap<RouteSnapshot>,
}

impl RouteTable {
    /// An empty table.
    pub fn new(system: SystemConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(RouteSnapshot {
                routes: Vec::new(),
                system,
            }),
        }
    }

    /// Build a table from `config`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let table = Self::new(config.system.clone());
        table.reload(config)?;
        Ok(table)
    }

    /// Replace the live snapshot with one built from `config`.
    ///
    /// On error the current snapshot stays live.
    pub fn reload(&self, config: &GatewayConfig) -> Result<LoadReport, ConfigError> {
        let (snapshot, report) = match RouteSnapshot::build(config) {
            Ok(built) => built,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load routes. Keeping current configuration.");
                return Err(e);
            }
        };

        self.current.store(Arc::new(snapshot));
        metrics::record_routes_installed(report.installed);
        tracing::info!(
            installed = report.installed,
            rejected = report.rejected.len(),
            "Route table loaded"
        );
        Ok(report)
    }

    /// The current snapshot. Holding it keeps that generation alive.
    pub fn snapshot(&self) -> Arc<RouteSnapshot> {
        self.current.load_full()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Resolve `path` against the current snapshot.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        self.current.load().resolve(path)
    }
}

/// Canonical form of a route: trimmed, with a leading and trailing `/`.
pub fn normalize_route(route: &str) -> String {
    let route = route.trim();
    let mut normalized = String::with_capacity(route.len() + 2);
    if !route.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(route);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

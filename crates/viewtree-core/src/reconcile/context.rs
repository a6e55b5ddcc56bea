use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use viewtree_core_types::BuildCorrelation;

use crate::config::EngineConfig;
use crate::spi::{
    AttributeBinder, ComponentHooks, DefaultAttributeBinder, ExpressionEvaluator, NodeFactory,
    NoopHooks, StandardNodeFactory, VariableEvaluator,
};
use crate::validation::{ConstraintRegistry, StandardConstraintRegistry};

/// The pluggable parts of a build
pub struct Collaborators {
    pub factory: Box<dyn NodeFactory>,
    pub binder: Box<dyn AttributeBinder>,
    pub evaluator: Box<dyn ExpressionEvaluator>,
    pub registry: Box<dyn ConstraintRegistry>,
    pub hooks: Box<dyn ComponentHooks>,
}

impl Collaborators {
    /// Default implementations, registry built from `config`
    pub fn standard(config: &EngineConfig) -> Self {
        Self {
            factory: Box::new(StandardNodeFactory::new()),
            binder: Box::new(DefaultAttributeBinder),
            evaluator: Box::new(VariableEvaluator),
            registry: Box::new(StandardConstraintRegistry::from_config(config)),
            hooks: Box::new(NoopHooks),
        }
    }

    pub fn with_factory(mut self, factory: impl NodeFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    pub fn with_binder(mut self, binder: impl AttributeBinder + 'static) -> Self {
        self.binder = Box::new(binder);
        self
    }

    pub fn with_evaluator(mut self, evaluator: impl ExpressionEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn with_registry(mut self, registry: impl ConstraintRegistry + 'static) -> Self {
        self.registry = Box::new(registry);
        self
    }

    pub fn with_hooks(mut self, hooks: impl ComponentHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }
}

/// Counters collected during one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub created: usize,
    pub reused: usize,
    pub removed: usize,
}

/// Tag and component being built when a pass failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSite {
    pub tag_id: String,
    pub component_id: Option<String>,
}

/// Per-pass state threaded through every call of the driver
pub struct BuildContext<'c> {
    pub correlation: BuildCorrelation,
    pub config: &'c EngineConfig,
    pub collaborators: &'c Collaborators,
    pub stats: BuildStats,
    applications: HashMap<String, u32>,
    failure: Option<FailureSite>,
}

impl<'c> BuildContext<'c> {
    pub fn new(config: &'c EngineConfig, collaborators: &'c Collaborators) -> Self {
        Self {
            correlation: BuildCorrelation::new(),
            config,
            collaborators,
            stats: BuildStats::default(),
            applications: HashMap::new(),
            failure: None,
        }
    }

    pub fn with_correlation(mut self, correlation: BuildCorrelation) -> Self {
        self.correlation = correlation;
        self
    }

    /// Tag-id for the next application of a template tag in this pass
    ///
    /// The first application uses the tag-id as is; the n-th repeat gets
    /// `{tag_id}_{n}`, so a tag applied several times in one pass still
    /// yields distinct, pass-stable ids.
    pub fn next_tag_id(&mut self, tag_id: &str) -> String {
        let count = self.applications.entry(tag_id.to_string()).or_insert(0);
        let resolved = match *count {
            0 => tag_id.to_string(),
            n => format!("{}_{}", tag_id, n),
        };
        *count += 1;
        resolved
    }

    /// Remember where the pass failed; the innermost site wins
    pub fn record_failure(&mut self, tag_id: &str, component_id: Option<String>) {
        if self.failure.is_none() {
            self.failure = Some(FailureSite {
                tag_id: tag_id.to_string(),
                component_id,
            });
        }
    }

    pub fn failure(&self) -> Option<&FailureSite> {
        self.failure.as_ref()
    }
}

/// Outcome of one `build_view` pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub build_id: String,
    pub trace_id: Option<String>,
    pub view_id: String,
    pub pass: u64,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub created: usize,
    pub reused: usize,
    pub removed: usize,
}

//! Template-to-tree reconciliation
//!
//! `build_view` runs one pass of a template against a view. Every pass
//! reuses the components created by earlier passes, so their state
//! survives, and prunes the ones the template no longer produces.

pub mod attached;
pub mod context;
pub mod driver;
pub mod facet;
pub mod identity;
pub mod prune;
pub mod scope;

pub use context::{BuildContext, BuildReport, BuildStats, Collaborators, FailureSite};
pub use driver::{populate_children, reconcile};
pub use facet::{detach_from_parent, place_in_facet};
pub use identity::find_child_by_tag_id;
pub use prune::{clear_pending, mark_pending, sweep};
pub use scope::{BuildScope, PendingBehavior};

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;
use viewtree_core_types::BuildCorrelation;

use crate::config::EngineConfig;
use crate::errors::{EngineError, ExError, Result};
use crate::model::{ComponentTree, Template, View};
use crate::{log_op_end, log_op_error, log_op_start};

/// Run one build pass of `template` against `view`
///
/// The view root is treated as a reused node: its engine-created children
/// are marked before the pass and swept after it. The view's variables are
/// visible to every expression of the pass.
///
/// # Errors
///
/// The first error raised anywhere in the pass. The tree keeps whatever
/// was applied before it; the next successful pass repairs it.
pub fn build_view(
    view: &mut View,
    template: &Template,
    collaborators: &Collaborators,
    config: &EngineConfig,
) -> Result<BuildReport> {
    build_view_with_correlation(view, template, collaborators, config, BuildCorrelation::new())
}

/// `build_view` with caller-supplied correlation ids
///
/// # Errors
///
/// Same as `build_view`. The error event logged for a failed pass carries
/// the build and trace ids and the tag and component that failed.
pub fn build_view_with_correlation(
    view: &mut View,
    template: &Template,
    collaborators: &Collaborators,
    config: &EngineConfig,
    correlation: BuildCorrelation,
) -> Result<BuildReport> {
    let started_at = Utc::now();
    let start = Instant::now();
    let pass = view.begin_pass();
    let mut ctx = BuildContext::new(config, collaborators).with_correlation(correlation);
    let build_id = ctx.correlation.build_id.to_string();

    log_op_start!(
        "build_view",
        build_id = %build_id,
        view_id = view.view_id(),
        pass = pass
    );

    let variables = view.variables().clone();
    let result = run_pass(view.tree_mut(), &mut ctx, template, variables);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => {
            let stats = ctx.stats;
            log_op_end!(
                "build_view",
                duration_ms = duration_ms,
                build_id = %build_id,
                created = stats.created,
                reused = stats.reused,
                removed = stats.removed
            );
            Ok(BuildReport {
                build_id,
                trace_id: ctx.correlation.trace_id.map(|t| t.to_string()),
                view_id: view.view_id().to_string(),
                pass,
                started_at,
                duration_ms,
                created: stats.created,
                reused: stats.reused,
                removed: stats.removed,
            })
        }
        Err(err) => {
            log_op_error!("build_view", failure_context(&ctx, &err), duration_ms = duration_ms);
            Err(err)
        }
    }
}

/// Structured form of a pass failure, with correlation ids and the tag and
/// component being built
fn failure_context(ctx: &BuildContext<'_>, err: &EngineError) -> ExError {
    let mut ex = ExError::from(err.clone())
        .with_op("build_view")
        .with_build_id(ctx.correlation.build_id.clone());
    if let Some(trace_id) = &ctx.correlation.trace_id {
        ex = ex.with_trace_id(trace_id.clone());
    }
    if let Some(site) = ctx.failure() {
        ex = ex.with_tag_id(site.tag_id.clone());
        if let Some(component_id) = &site.component_id {
            ex = ex.with_component_id(component_id.clone());
        }
    }
    ex
}

fn run_pass(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    template: &Template,
    variables: BTreeMap<String, Value>,
) -> Result<()> {
    let root = tree.root();
    let outer = BuildScope::root();
    let scope = outer.with_variables(variables);

    mark_pending(tree, root)?;
    populate_children(tree, ctx, &scope, &template.nodes, root)?;
    ctx.stats.removed += sweep(tree, root)?;

    if ctx.config.partial_state_saving {
        tree.get_mut(root)?.initial_state_marked = true;
    }
    Ok(())
}

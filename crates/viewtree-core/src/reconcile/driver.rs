//! Reconciliation driver
//!
//! Walks the template top-down. For every component tag it either reuses
//! the live child created by that tag on an earlier pass or creates a new
//! one, repopulates it, prunes what the pass did not revisit and attaches
//! it to its parent.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::attached::{apply_behavior_tag, apply_validator_tag, apply_wrapping_behaviors};
use super::context::BuildContext;
use super::facet::{detach_from_parent, place_in_facet};
use super::identity::find_child_by_tag_id;
use super::prune::{clear_pending, mark_pending, sweep};
use super::scope::BuildScope;
use crate::errors::{EngineError, Result};
use crate::model::{ComponentTag, ComponentTree, NodeKey, TemplateNode};
use crate::validation::add_default_validators;

/// Apply one component tag under `parent`
///
/// Returns the key of the live component, which is the same key on every
/// pass as long as the tag keeps its structural position.
///
/// # Errors
///
/// `MissingParent` when `parent` is not a live node; otherwise whatever a
/// collaborator or a nested tag fails with. Scopes derived for the
/// subtree are released before the error propagates. Mutations already
/// applied stay applied; a component created by this call and not yet
/// attached is dropped, one adopted from a binding is left detached. The
/// failing tag and component are recorded on `ctx`.
pub fn reconcile(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    scope: &BuildScope<'_>,
    tag: &ComponentTag,
    parent: NodeKey,
) -> Result<NodeKey> {
    if !tree.contains(parent) {
        return Err(EngineError::MissingParent {
            tag: tag.tag.clone(),
        });
    }

    let facet_name = scope.current_facet().map(str::to_string);
    let tag_id = ctx.next_tag_id(tag.tag_id()?);

    let (key, reused, bound) = match find_child_by_tag_id(tree, parent, &tag_id) {
        Some(key) => {
            clear_pending(tree, key)?;
            mark_pending(tree, key)?;
            ctx.stats.reused += 1;
            debug!(tag_id = %tag_id, build_id = %ctx.correlation.build_id, node = %key, "component reused");
            (key, true, false)
        }
        None => match create_component(tree, ctx, scope, tag, &tag_id, parent) {
            Ok((key, bound)) => (key, false, bound),
            Err(err) => {
                ctx.record_failure(&tag_id, None);
                return Err(err);
            }
        },
    };

    let built = build_component(tree, ctx, scope, tag, key, parent, reused, facet_name.as_deref());
    if let Err(err) = built {
        let component_id = tree.get(key).ok().and_then(|c| c.id.clone());
        ctx.record_failure(&tag_id, component_id);
        if !reused && !bound {
            tree.remove_subtree(key);
        }
        return Err(err);
    }
    Ok(key)
}

#[allow(clippy::too_many_arguments)]
fn build_component(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    scope: &BuildScope<'_>,
    tag: &ComponentTag,
    key: NodeKey,
    parent: NodeKey,
    reused: bool,
    facet_name: Option<&str>,
) -> Result<()> {
    {
        let component_scope = scope.with_component(key, !reused);
        if tree.get(key)?.as_id_vendor().is_some() {
            let vendor_scope = component_scope.with_id_vendor(key);
            populate_children(tree, ctx, &vendor_scope, &tag.children, key)?;
        } else {
            populate_children(tree, ctx, &component_scope, &tag.children, key)?;
        }
    }

    if reused {
        let removed = sweep(tree, key)?;
        if removed > 0 {
            debug!(node = %key, removed, "stale components removed");
        }
        ctx.stats.removed += removed;
    }

    apply_wrapping_behaviors(tree, scope, key)?;
    let deps = ctx.collaborators;
    add_default_validators(tree, key, scope, deps.registry.as_ref(), ctx.config)?;
    deps.hooks.on_component_populated(tree, key, parent)?;

    if reused {
        detach_from_parent(tree, key)?;
    }
    match facet_name {
        Some(name) => place_in_facet(tree, parent, name, key)?,
        None => tree.append_child(parent, key)?,
    }

    if ctx.config.partial_state_saving {
        tree.get_mut(key)?.initial_state_marked = true;
    }
    Ok(())
}

/// Create the component for `tag`, or adopt the one published under its
/// `binding` expression
///
/// Returns the key and whether the component was adopted from a binding.
fn create_component(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    scope: &BuildScope<'_>,
    tag: &ComponentTag,
    tag_id: &str,
    parent: NodeKey,
) -> Result<(NodeKey, bool)> {
    let deps = ctx.collaborators;
    let binding = binding_expression(tag)?;
    let bound = binding
        .as_deref()
        .and_then(|expression| tree.bound(expression))
        .filter(|key| !is_ancestor_or_self(tree, *key, parent));

    let key = match bound {
        Some(key) => {
            detach_from_parent(tree, key)?;
            key
        }
        None => {
            let kind = deps.factory.create_node(&tag.component_type)?;
            tree.insert(tag.component_type.clone(), kind)
        }
    };

    if let Err(err) = init_component(tree, ctx, scope, tag, tag_id, key, parent, binding) {
        if bound.is_none() {
            tree.remove_subtree(key);
        }
        return Err(err);
    }

    ctx.stats.created += 1;
    debug!(
        tag_id = %tag_id,
        build_id = %ctx.correlation.build_id,
        node = %key,
        component_type = %tag.component_type,
        bound = bound.is_some(),
        "component created"
    );
    Ok((key, bound.is_some()))
}

fn is_ancestor_or_self(tree: &ComponentTree, candidate: NodeKey, key: NodeKey) -> bool {
    std::iter::successors(Some(key), |k| tree.get(*k).ok().and_then(|c| c.parent))
        .any(|k| k == candidate)
}

fn binding_expression(tag: &ComponentTag) -> Result<Option<String>> {
    let Some(raw) = tag.binding() else {
        return Ok(None);
    };
    match raw.expression() {
        Some(expression) => Ok(Some(expression.to_string())),
        None => Err(EngineError::AttributeBinding {
            tag: tag.tag.clone(),
            attribute: "binding".to_string(),
            reason: format!("expected an expression, got {}", raw.0),
        }),
    }
}

#[allow(clippy::too_many_arguments)]
fn init_component(
    tree: &mut ComponentTree,
    ctx: &BuildContext<'_>,
    scope: &BuildScope<'_>,
    tag: &ComponentTag,
    tag_id: &str,
    key: NodeKey,
    parent: NodeKey,
    binding: Option<String>,
) -> Result<()> {
    let deps = ctx.collaborators;
    {
        let component = tree.get_mut(key)?;
        deps.binder
            .apply_attributes(component, tag, deps.evaluator.as_ref(), scope)?;
        component.created_by = Some(tag_id.to_string());
        component.renderer_type = tag.renderer_type.clone();
        if ctx.config.is_development() {
            component.view_location = tag.location.clone();
        }
    }

    let explicit = match &tag.id {
        Some(raw) => match deps.evaluator.resolve(raw, scope)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s),
            other => {
                return Err(EngineError::AttributeBinding {
                    tag: tag.tag.clone(),
                    attribute: "id".to_string(),
                    reason: format!("expected a string, got {}", other),
                })
            }
        },
        None => None,
    };
    let id = match explicit {
        Some(id) => id,
        None => scope.generate_unique_id(tree, Some(tag_id))?,
    };
    tree.get_mut(key)?.id = Some(id);

    if let Some(expression) = binding {
        tree.bind(expression, key)?;
    }

    deps.hooks.on_component_created(tree, key, parent)
}

/// Apply a sequence of sibling template nodes under `parent`, in order
///
/// A `Param` node defines a variable visible to the siblings after it.
///
/// # Errors
///
/// The first error raised by a node; later siblings are not applied.
pub fn populate_children(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    scope: &BuildScope<'_>,
    nodes: &[TemplateNode],
    parent: NodeKey,
) -> Result<()> {
    let mut variables: BTreeMap<String, Value> = BTreeMap::new();
    for node in nodes {
        if variables.is_empty() {
            if let TemplateNode::Param { name, value } = node {
                let resolved = ctx.collaborators.evaluator.resolve(value, scope)?;
                variables.insert(name.clone(), resolved);
            } else {
                apply_node(tree, ctx, scope, node, parent)?;
            }
            continue;
        }

        let local = scope.with_variables(variables.clone());
        if let TemplateNode::Param { name, value } = node {
            let resolved = ctx.collaborators.evaluator.resolve(value, &local)?;
            variables.insert(name.clone(), resolved);
        } else {
            apply_node(tree, ctx, &local, node, parent)?;
        }
    }
    Ok(())
}

fn apply_node(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    scope: &BuildScope<'_>,
    node: &TemplateNode,
    parent: NodeKey,
) -> Result<()> {
    match node {
        TemplateNode::Component(tag) => reconcile(tree, ctx, scope, tag, parent).map(|_| ()),
        TemplateNode::Facet { name, children } => {
            let facet_scope = scope.with_facet(name.clone());
            populate_children(tree, ctx, &facet_scope, children, parent)
        }
        TemplateNode::Validator(tag) => apply_validator_tag(tree, ctx, scope, tag, parent),
        TemplateNode::Behavior(tag) => apply_behavior_tag(tree, ctx, scope, tag, parent),
        TemplateNode::If { test, children } => {
            let value = ctx.collaborators.evaluator.resolve(test, scope)?;
            if is_truthy(&value) {
                populate_children(tree, ctx, scope, children, parent)
            } else {
                Ok(())
            }
        }
        TemplateNode::Param { .. } => Ok(()),
    }
}

/// `null`, `false`, `0`, `""` and `"false"` are false; everything else
/// is true
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

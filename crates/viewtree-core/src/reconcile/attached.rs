//! Validator and behavior tags
//!
//! Both come in two shapes. Without children they configure the enclosing
//! component directly. With children they open a region whose settings
//! apply to every component built inside it.

use super::context::BuildContext;
use super::driver::populate_children;
use super::scope::{BuildScope, PendingBehavior};
use crate::errors::{EngineError, Result};
use crate::model::validator::DEFAULT_VALIDATION_GROUP;
use crate::model::{BehaviorTag, ComponentTree, NodeKey, ValidatorTag};

/// Apply a validator tag under `parent`
///
/// Without children the tag configures `parent` on the pass that created
/// it; later passes leave the attached validators alone. With children it
/// opens an exclusion or validation-group region for them.
///
/// # Errors
///
/// `IncompatibleParent` if a childless tag sits under a non-editable
/// component; registry failures; errors from the enclosed children.
pub fn apply_validator_tag(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    scope: &BuildScope<'_>,
    tag: &ValidatorTag,
    parent: NodeKey,
) -> Result<()> {
    if !tag.children.is_empty() {
        if tag.disabled {
            let region = scope.with_excluded_validators(vec![tag.validator_id.clone()]);
            return populate_children(tree, ctx, &region, &tag.children, parent);
        }
        if let Some(groups) = tag.validation_groups.as_deref().filter(|g| !g.trim().is_empty()) {
            let region = scope.with_validation_groups(groups);
            return populate_children(tree, ctx, &region, &tag.children, parent);
        }
        return populate_children(tree, ctx, scope, &tag.children, parent);
    }

    let registry = ctx.collaborators.registry.as_ref();
    let editable = tree
        .get_mut(parent)?
        .as_editable_mut()
        .ok_or_else(|| EngineError::IncompatibleParent {
            tag: format!("validator {}", tag.validator_id),
            capability: "Editable".to_string(),
        })?;

    if !scope.is_new_component(parent) {
        return Ok(());
    }

    if tag.disabled {
        editable.exclude_validator(&tag.validator_id);
        return Ok(());
    }

    let mut validator = registry.create_validator(&tag.validator_id)?;
    if tag.validation_groups.is_some() {
        validator.validation_groups = tag.validation_groups.clone();
    }
    if validator.is_bean_validator() && validator.has_empty_validation_groups() {
        let group = scope
            .first_validation_group()
            .unwrap_or(DEFAULT_VALIDATION_GROUP);
        validator.validation_groups = Some(group.to_string());
    }

    let validators = editable.validators_mut();
    match validators
        .iter_mut()
        .find(|v| v.implementation == validator.implementation)
    {
        Some(existing) => *existing = validator,
        None => validators.push(validator),
    }
    Ok(())
}

/// Apply an `f:ajax` tag under `parent`
///
/// Without children the behavior is attached to `parent`, replacing the one
/// from the same tag. With children it is handed to every holder built
/// inside.
///
/// # Errors
///
/// `IncompatibleParent` if a childless tag sits under a component that
/// holds no behaviors; errors from the enclosed children.
pub fn apply_behavior_tag(
    tree: &mut ComponentTree,
    ctx: &mut BuildContext<'_>,
    scope: &BuildScope<'_>,
    tag: &BehaviorTag,
    parent: NodeKey,
) -> Result<()> {
    let pending = PendingBehavior {
        source_tag_id: tag.tag_id()?.to_string(),
        event: tag.event.clone(),
        execute: tag.execute.clone(),
        render: tag.render.clone(),
        disabled: tag.disabled,
    };

    if !tag.children.is_empty() {
        let region = scope.with_behaviors(vec![pending]);
        return populate_children(tree, ctx, &region, &tag.children, parent);
    }

    let holder = tree
        .get_mut(parent)?
        .as_behavior_holder_mut()
        .ok_or_else(|| EngineError::IncompatibleParent {
            tag: "f:ajax".to_string(),
            capability: "BehaviorHolder".to_string(),
        })?;
    let behavior = pending.for_holder(holder.default_event());
    holder.attach_behavior(behavior);
    Ok(())
}

/// Give `key` the behaviors of every enclosing behavior region
///
/// Composite components are skipped; their inner holders receive the
/// behaviors instead.
///
/// # Errors
///
/// `NodeNotFound` if `key` is not a live node.
pub fn apply_wrapping_behaviors(tree: &mut ComponentTree, scope: &BuildScope<'_>, key: NodeKey) -> Result<()> {
    let pending = scope.behaviors();
    if pending.is_empty() {
        return Ok(());
    }
    let component = tree.get_mut(key)?;
    if component.is_composite() {
        return Ok(());
    }
    if let Some(holder) = component.as_behavior_holder_mut() {
        for behavior in pending {
            let resolved = behavior.for_holder(holder.default_event());
            holder.attach_behavior(resolved);
        }
    }
    Ok(())
}

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::model::validator::{BEAN_VALIDATOR_ID, DEFAULT_VALIDATION_GROUP};
use crate::model::{ComponentTree, Editable, NodeKey};
use crate::reconcile::BuildScope;
use crate::validation::ConstraintRegistry;

/// Whether the default validator `validator_id` may be attached to
/// `editable` in `scope`
///
/// Excluded when the component's own exclusion list or an enclosing
/// region names it. The bean validator additionally needs bean validation
/// to be available and the disable switch not set.
pub fn should_add_default_validator(
    validator_id: &str,
    editable: &dyn Editable,
    scope: &BuildScope<'_>,
    config: &EngineConfig,
) -> bool {
    if editable
        .excluded_validator_ids()
        .iter()
        .any(|id| id == validator_id)
    {
        return false;
    }
    if scope.is_validator_excluded(validator_id) {
        return false;
    }
    if validator_id == BEAN_VALIDATOR_ID
        && (!config.bean_validation_available || config.is_default_bean_validator_disabled())
    {
        return false;
    }
    true
}

/// Attach the registry's default validators to the editable component
/// `key`
///
/// A validator whose implementation is already attached is reused in place
/// rather than duplicated. Bean validators without groups inherit the
/// nearest enclosing group, or the default group. Returns the number of
/// newly attached validators; a component without the editable capability
/// gets none.
///
/// # Errors
///
/// Returns `ConstraintInstantiation` when the registry cannot build a
/// validator.
pub fn add_default_validators(
    tree: &mut ComponentTree,
    key: NodeKey,
    scope: &BuildScope<'_>,
    registry: &dyn ConstraintRegistry,
    config: &EngineConfig,
) -> Result<usize> {
    let Some(editable) = tree.get_mut(key)?.as_editable_mut() else {
        return Ok(0);
    };

    let mut added = 0;
    for (validator_id, implementation) in registry.default_validators() {
        if !should_add_default_validator(&validator_id, &*editable, scope, config) {
            continue;
        }

        let existing = editable
            .validators()
            .iter()
            .position(|v| v.implementation == implementation);
        let mut validator = match existing {
            Some(index) => editable.validators()[index].clone(),
            None => registry.create_validator(&validator_id)?,
        };

        if validator.is_bean_validator() && validator.has_empty_validation_groups() {
            let group = scope
                .first_validation_group()
                .unwrap_or(DEFAULT_VALIDATION_GROUP);
            validator.validation_groups = Some(group.to_string());
        }

        match existing {
            Some(index) => editable.validators_mut()[index] = validator,
            None => {
                editable.validators_mut().push(validator);
                added += 1;
            }
        }
    }
    Ok(added)
}

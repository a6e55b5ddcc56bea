use serde_json::Value;

use crate::errors::{EngineError, Result};
use crate::model::template::{AttrValue, ComponentTag};
use crate::model::Component;

/// Read access to the variables visible at a point of the build
pub trait Variables {
    fn variable(&self, name: &str) -> Option<&Value>;
}

/// Resolves `#{...}` expressions to values
pub trait ExpressionEvaluator {
    /// # Errors
    ///
    /// Returns `ExpressionEvaluation` for expressions it cannot handle.
    fn evaluate(&self, expression: &str, vars: &dyn Variables) -> Result<Value>;

    /// Evaluate an attribute value: expressions are resolved, literals
    /// returned as-is
    fn resolve(&self, value: &AttrValue, vars: &dyn Variables) -> Result<Value> {
        match value.expression() {
            Some(expression) => self.evaluate(expression, vars),
            None => Ok(value.0.clone()),
        }
    }
}

/// Minimal evaluator: `#{name}` and `#{name.path.to.field}` against the
/// build's variables
///
/// Unknown variables resolve to `null`, like an unresolved EL identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableEvaluator;

impl ExpressionEvaluator for VariableEvaluator {
    fn evaluate(&self, expression: &str, vars: &dyn Variables) -> Result<Value> {
        let fail = |reason: &str| EngineError::ExpressionEvaluation {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        let body = expression
            .strip_prefix("#{")
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| fail("not an expression"))?
            .trim();

        let mut segments = body.split('.');
        let head = segments.next().unwrap_or_default();
        if !is_identifier(head) {
            return Err(fail("only variable paths are supported"));
        }

        let mut current = match vars.variable(head) {
            Some(value) => value,
            None => return Ok(Value::Null),
        };
        for segment in segments {
            if !is_identifier(segment) {
                return Err(fail("only variable paths are supported"));
            }
            current = match current.get(segment) {
                Some(value) => value,
                None => return Ok(Value::Null),
            };
        }
        Ok(current.clone())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Applies the attributes of a tag to a freshly created component
pub trait AttributeBinder {
    /// # Errors
    ///
    /// Returns `AttributeBinding` (or the evaluator's error) when an
    /// attribute cannot be applied. Attributes applied before the failure
    /// stay applied.
    fn apply_attributes(
        &self,
        component: &mut Component,
        tag: &ComponentTag,
        evaluator: &dyn ExpressionEvaluator,
        vars: &dyn Variables,
    ) -> Result<()>;
}

/// Binder wiring well-known attributes to capabilities
///
/// `value` goes to value holders, `required` to editables, `layout` to
/// containers. `id` and `binding` are consumed by the driver when the
/// component is created. Everything else lands in the attribute map.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAttributeBinder;

impl AttributeBinder for DefaultAttributeBinder {
    fn apply_attributes(
        &self,
        component: &mut Component,
        tag: &ComponentTag,
        evaluator: &dyn ExpressionEvaluator,
        vars: &dyn Variables,
    ) -> Result<()> {
        for (name, raw) in &tag.attributes {
            let value = evaluator.resolve(raw, vars)?;
            match name.as_str() {
                "id" | "binding" => {}
                "value" if component.as_value_holding().is_some() => {
                    if let Some(holder) = component.as_value_holding_mut() {
                        holder.set_value(value);
                    }
                }
                "required" if component.as_editable().is_some() => {
                    let required = as_bool(&value).ok_or_else(|| EngineError::AttributeBinding {
                        tag: tag.tag.clone(),
                        attribute: name.clone(),
                        reason: format!("expected a boolean, got {}", value),
                    })?;
                    if let Some(editable) = component.as_editable_mut() {
                        editable.set_required(required);
                    }
                }
                "layout" => {
                    if let crate::model::ComponentKind::Panel(state) = &mut component.kind {
                        state.layout = value.as_str().map(str::to_string);
                    } else {
                        component.attributes.insert(name.clone(), value);
                    }
                }
                _ => {
                    component.attributes.insert(name.clone(), value);
                }
            }
        }
        Ok(())
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

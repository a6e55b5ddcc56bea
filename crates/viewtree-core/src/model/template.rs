//! Parsed template description
//!
//! Templates are immutable during a build. They arrive as JSON documents
//! and are compiled once: compilation assigns every component and behavior
//! tag its structural tag-id and rejects duplicates.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::errors::{EngineError, Result};

/// Attribute value as written in the template
///
/// Strings of the form `#{...}` are expressions; everything else is a
/// literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrValue(pub Value);

impl AttrValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// The expression text, if this value is an expression
    pub fn expression(&self) -> Option<&str> {
        match &self.0 {
            Value::String(s) if s.starts_with("#{") && s.ends_with('}') => Some(s),
            _ => None,
        }
    }
}

/// A tag producing a live component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTag {
    /// Tag name as written (`h:inputText`)
    pub tag: String,
    pub component_type: String,
    #[serde(default)]
    pub renderer_type: Option<String>,
    /// Structural id, assigned by `Template::compile` when absent
    #[serde(default)]
    pub tag_id: Option<String>,
    /// Static `id` attribute
    #[serde(default)]
    pub id: Option<AttrValue>,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    /// Source location (`file:line:col`)
    #[serde(default)]
    pub location: Option<String>,
}

impl ComponentTag {
    pub fn new(tag: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            component_type: component_type.into(),
            renderer_type: None,
            tag_id: None,
            id: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            location: None,
        }
    }

    pub fn with_tag_id(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_id = Some(tag_id.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(AttrValue(id.into()));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), AttrValue(value.into()));
        self
    }

    pub fn with_child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    /// The `binding` expression, if the tag binds its component
    pub fn binding(&self) -> Option<&AttrValue> {
        self.attributes.get("binding")
    }

    /// The compiled tag-id
    ///
    /// # Errors
    ///
    /// Returns `UncompiledTemplate` if the template was never compiled.
    pub fn tag_id(&self) -> Result<&str> {
        self.tag_id
            .as_deref()
            .ok_or_else(|| EngineError::UncompiledTemplate {
                tag: self.tag.clone(),
            })
    }
}

/// Validator tag (`f:validateBean`, `f:validateLength`, ...)
///
/// Without children it configures its parent component; with children it
/// scopes the enclosed subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorTag {
    pub validator_id: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub validation_groups: Option<String>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

/// Client behavior tag (`f:ajax`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTag {
    #[serde(default)]
    pub tag_id: Option<String>,
    /// Client event; the holder's default event when absent
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub execute: Option<String>,
    #[serde(default)]
    pub render: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

impl BehaviorTag {
    /// # Errors
    ///
    /// Returns `UncompiledTemplate` if the template was never compiled.
    pub fn tag_id(&self) -> Result<&str> {
        self.tag_id
            .as_deref()
            .ok_or_else(|| EngineError::UncompiledTemplate {
                tag: "f:ajax".to_string(),
            })
    }
}

/// One node of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TemplateNode {
    Component(ComponentTag),
    /// Places its direct component children into the named facet of the
    /// enclosing component
    Facet {
        name: String,
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
    Validator(ValidatorTag),
    Behavior(BehaviorTag),
    /// Defines a variable for the following siblings
    Param { name: String, value: AttrValue },
    /// Applies its children only when `test` evaluates truthy on the
    /// current pass
    ///
    /// The children are compiled like any other nodes, so they keep their
    /// tag-ids whichever way the test goes.
    If {
        test: AttrValue,
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
}

impl From<ComponentTag> for TemplateNode {
    fn from(tag: ComponentTag) -> Self {
        TemplateNode::Component(tag)
    }
}

impl TemplateNode {
    pub fn facet(name: impl Into<String>, children: Vec<TemplateNode>) -> Self {
        TemplateNode::Facet {
            name: name.into(),
            children,
        }
    }

    pub fn when(test: impl Into<Value>, children: Vec<TemplateNode>) -> Self {
        TemplateNode::If {
            test: AttrValue(test.into()),
            children,
        }
    }
}

/// A compiled template for one view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub view_id: String,
    #[serde(default)]
    pub nodes: Vec<TemplateNode>,
}

impl Template {
    /// Build and compile a template from nodes
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTagId` if two tags end up with the same tag-id.
    pub fn new(view_id: impl Into<String>, nodes: Vec<TemplateNode>) -> Result<Self> {
        Self {
            view_id: view_id.into(),
            nodes,
        }
        .compile()
    }

    /// Parse and compile a template from a JSON value
    ///
    /// # Errors
    ///
    /// Returns `InvalidTemplate` if the value does not describe a template,
    /// `DuplicateTagId` if compilation fails.
    pub fn from_value(value: Value) -> Result<Self> {
        let template: Template =
            serde_json::from_value(value).map_err(|e| EngineError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        template.compile()
    }

    /// Parse and compile a template from JSON text
    ///
    /// # Errors
    ///
    /// Returns `InvalidTemplate` if the text does not describe a template,
    /// `DuplicateTagId` if compilation fails.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let template: Template =
            serde_json::from_str(text).map_err(|e| EngineError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        template.compile()
    }

    /// Read, parse and compile a template file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read; otherwise as `from_json_str`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Assign structural tag-ids in pre-order (`t1`, `t2`, ...)
    ///
    /// Tags that already carry a tag-id keep it but still consume a number,
    /// so adding an explicit id never shifts the ids of later tags.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTagId` if two tags end up with the same tag-id.
    pub fn compile(mut self) -> Result<Self> {
        let mut counter = 0u32;
        let mut seen = HashSet::new();
        assign_tag_ids(&mut self.nodes, &mut counter, &mut seen)?;
        Ok(self)
    }

    /// Iterate over all component tags, pre-order
    pub fn component_tags(&self) -> Vec<&ComponentTag> {
        let mut out = Vec::new();
        collect_component_tags(&self.nodes, &mut out);
        out
    }
}

fn assign_tag_ids(
    nodes: &mut [TemplateNode],
    counter: &mut u32,
    seen: &mut HashSet<String>,
) -> Result<()> {
    for node in nodes {
        let (slot, children) = match node {
            TemplateNode::Component(tag) => (Some(&mut tag.tag_id), &mut tag.children),
            TemplateNode::Behavior(tag) => (Some(&mut tag.tag_id), &mut tag.children),
            TemplateNode::Facet { children, .. } => (None, children),
            TemplateNode::Validator(tag) => (None, &mut tag.children),
            TemplateNode::If { children, .. } => (None, children),
            TemplateNode::Param { .. } => continue,
        };
        if let Some(slot) = slot {
            *counter += 1;
            let tag_id = slot.get_or_insert_with(|| format!("t{}", counter)).clone();
            if !seen.insert(tag_id.clone()) {
                return Err(EngineError::DuplicateTagId { tag_id });
            }
        }
        assign_tag_ids(children, counter, seen)?;
    }
    Ok(())
}

fn collect_component_tags<'a>(nodes: &'a [TemplateNode], out: &mut Vec<&'a ComponentTag>) {
    for node in nodes {
        match node {
            TemplateNode::Component(tag) => {
                out.push(tag);
                collect_component_tags(&tag.children, out);
            }
            TemplateNode::Facet { children, .. } => collect_component_tags(children, out),
            TemplateNode::Validator(tag) => collect_component_tags(&tag.children, out),
            TemplateNode::Behavior(tag) => collect_component_tags(&tag.children, out),
            TemplateNode::If { children, .. } => collect_component_tags(children, out),
            TemplateNode::Param { .. } => {}
        }
    }
}

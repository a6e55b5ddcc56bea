use viewtree_core::model::component::{
    FORM_TYPE, INPUT_TEXT_TYPE, OUTPUT_TEXT_TYPE, PANEL_GROUP_TYPE,
};
use viewtree_core::model::{ComponentTag, NodeKey, Template, TemplateNode, View};
use viewtree_core::{build_view, BuildReport, Collaborators, EngineConfig};

/// Component tag without children
#[allow(dead_code)]
pub fn tag(name: &str, component_type: &str) -> ComponentTag {
    ComponentTag::new(name, component_type)
}

#[allow(dead_code)]
pub fn form(id: &str, children: Vec<TemplateNode>) -> TemplateNode {
    let mut form = tag("h:form", FORM_TYPE).with_id(id);
    form.children = children;
    form.into()
}

#[allow(dead_code)]
pub fn panel(children: Vec<TemplateNode>) -> TemplateNode {
    let mut panel = tag("h:panelGroup", PANEL_GROUP_TYPE);
    panel.children = children;
    panel.into()
}

#[allow(dead_code)]
pub fn input() -> ComponentTag {
    tag("h:inputText", INPUT_TEXT_TYPE)
}

#[allow(dead_code)]
pub fn output(value: &str) -> ComponentTag {
    tag("h:outputText", OUTPUT_TEXT_TYPE).with_attribute("value", value)
}

/// Compile a template for the test view
#[allow(dead_code)]
pub fn template(nodes: Vec<TemplateNode>) -> Template {
    Template::new("/test.xhtml", nodes).unwrap()
}

/// Engine wiring with the default collaborators
#[allow(dead_code)]
pub struct Engine {
    pub config: EngineConfig,
    pub collaborators: Collaborators,
}

#[allow(dead_code)]
impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let collaborators = Collaborators::standard(&config);
        Self {
            config,
            collaborators,
        }
    }

    pub fn with_collaborators(config: EngineConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    pub fn build(&self, view: &mut View, template: &Template) -> BuildReport {
        build_view(view, template, &self.collaborators, &self.config).unwrap()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Live component created by the tag with `tag_id`
#[allow(dead_code)]
pub fn by_tag(view: &View, tag_id: &str) -> Option<NodeKey> {
    let tree = view.tree();
    tree.descendants(tree.root())
        .into_iter()
        .find(|k| tree.get(*k).unwrap().created_by.as_deref() == Some(tag_id))
}

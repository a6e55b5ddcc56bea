mod common;

use common::{by_tag, template, Engine};
use proptest::prelude::*;
use viewtree_core::compute_tree_digest;
use viewtree_core::model::component::{
    FORM_TYPE, INPUT_TEXT_TYPE, OUTPUT_TEXT_TYPE, PANEL_GROUP_TYPE,
};
use viewtree_core::model::{ComponentTag, TemplateNode, View};

/// Arbitrary template shapes: forms, panels, facets and leaves
fn node_strategy() -> impl Strategy<Value = TemplateNode> {
    let leaf = prop_oneof![
        Just(TemplateNode::from(ComponentTag::new("h:inputText", INPUT_TEXT_TYPE))),
        Just(TemplateNode::from(
            ComponentTag::new("h:outputText", OUTPUT_TEXT_TYPE).with_attribute("value", "x")
        )),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|children| {
                let mut panel = ComponentTag::new("h:panelGroup", PANEL_GROUP_TYPE);
                panel.children = children;
                TemplateNode::from(panel)
            }),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|children| {
                let mut form = ComponentTag::new("h:form", FORM_TYPE);
                form.children = children;
                TemplateNode::from(form)
            }),
            (prop::collection::vec(inner, 1..3), prop::sample::select(vec!["header", "footer"]))
                .prop_map(|(children, name)| {
                    let mut panel = ComponentTag::new("h:panelGroup", PANEL_GROUP_TYPE);
                    panel.children = vec![TemplateNode::facet(name, children)];
                    TemplateNode::from(panel)
                }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_rebuild_keeps_ids_and_identity(nodes in prop::collection::vec(node_strategy(), 1..4)) {
        let engine = Engine::default();
        let tpl = template(nodes);
        let mut view = View::new("/test.xhtml");

        engine.build(&mut view, &tpl);
        let digest = compute_tree_digest(view.tree()).unwrap();
        let snapshot: Vec<_> = tpl
            .component_tags()
            .iter()
            .map(|t| {
                let tag_id = t.tag_id().unwrap();
                let key = by_tag(&view, tag_id).unwrap();
                (key, view.tree().client_id(key).unwrap())
            })
            .collect();

        let report = engine.build(&mut view, &tpl);
        prop_assert_eq!(report.created, 0);
        prop_assert_eq!(report.removed, 0);
        prop_assert_eq!(compute_tree_digest(view.tree()).unwrap(), digest);
        for (tag, (key, client_id)) in tpl.component_tags().iter().zip(snapshot) {
            let again = by_tag(&view, tag.tag_id().unwrap()).unwrap();
            prop_assert_eq!(again, key);
            prop_assert_eq!(view.tree().client_id(again).unwrap(), client_id);
        }
    }
}

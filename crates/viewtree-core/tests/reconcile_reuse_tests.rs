mod common;

use common::{by_tag, form, input, output, panel, template, Engine};
use serde_json::json;
use viewtree_core::compute_tree_digest;
use viewtree_core::model::{ComponentTag, Editable, View};
use viewtree_core::reconcile::{reconcile, BuildContext, BuildScope};

#[test]
fn test_form_input_scenario_keeps_identity_and_id() {
    let engine = Engine::default();
    let tpl = template(vec![form("form", vec![input().into()])]);
    let mut view = View::new("/test.xhtml");

    engine.build(&mut view, &tpl);
    let first = by_tag(&view, "t2").unwrap();
    assert_eq!(view.tree().get(first).unwrap().id.as_deref(), Some("j_idt2"));
    assert_eq!(view.tree().client_id(first).unwrap(), "form:j_idt2");

    engine.build(&mut view, &tpl);
    let second = by_tag(&view, "t2").unwrap();
    assert_eq!(first, second);
    assert_eq!(view.tree().client_id(second).unwrap(), "form:j_idt2");
}

#[test]
fn test_second_pass_is_idempotent() {
    let engine = Engine::default();
    let tpl = template(vec![
        form(
            "form",
            vec![
                input().with_attribute("required", true).into(),
                panel(vec![output("a").into(), output("b").into()]),
            ],
        ),
        output("footer").into(),
    ]);
    let mut view = View::new("/test.xhtml");

    let first = engine.build(&mut view, &tpl);
    let digest_one = compute_tree_digest(view.tree()).unwrap();
    let second = engine.build(&mut view, &tpl);
    let digest_two = compute_tree_digest(view.tree()).unwrap();

    assert_eq!(digest_one, digest_two);
    assert_eq!(first.created, 6);
    assert_eq!(first.reused, 0);
    assert_eq!(second.created, 0);
    assert_eq!(second.reused, 6);
    assert_eq!(second.removed, 0);
    assert_eq!(second.pass, 2);
}

#[test]
fn test_component_state_survives_rebuild() {
    let engine = Engine::default();
    let tpl = template(vec![form("form", vec![input().into()])]);
    let mut view = View::new("/test.xhtml");
    engine.build(&mut view, &tpl);

    let key = by_tag(&view, "t2").unwrap();
    view.tree_mut()
        .get_mut(key)
        .unwrap()
        .as_editable_mut()
        .unwrap()
        .set_submitted_value(Some(json!("typed by user")));

    engine.build(&mut view, &tpl);
    let editable = view.tree().get(key).unwrap();
    assert_eq!(
        editable.as_editable().unwrap().submitted_value(),
        Some(&json!("typed by user"))
    );
}

#[test]
fn test_children_follow_template_order_after_reuse() {
    let engine = Engine::default();
    let mut view = View::new("/test.xhtml");
    let a = output("a").with_tag_id("a");
    let b = output("b").with_tag_id("b");

    engine.build(&mut view, &template(vec![a.clone().into(), b.clone().into()]));
    let (ka, kb) = (by_tag(&view, "a").unwrap(), by_tag(&view, "b").unwrap());

    engine.build(&mut view, &template(vec![b.into(), a.into()]));
    let root = view.root();
    assert_eq!(view.tree().children(root), &[kb, ka]);
}

#[test]
fn test_repeated_application_in_one_pass_gets_distinct_ids() {
    let engine = Engine::default();
    let mut view = View::new("/test.xhtml");
    let tag = output("row").with_tag_id("row");
    let root = view.root();

    let run = |view: &mut View| {
        let mut ctx = BuildContext::new(&engine.config, &engine.collaborators);
        let scope = BuildScope::root();
        let first = reconcile(view.tree_mut(), &mut ctx, &scope, &tag, root).unwrap();
        let second = reconcile(view.tree_mut(), &mut ctx, &scope, &tag, root).unwrap();
        (first, second)
    };

    let (a1, b1) = run(&mut view);
    assert_ne!(a1, b1);
    assert_eq!(view.tree().get(b1).unwrap().id.as_deref(), Some("j_idrow_1"));

    let (a2, b2) = run(&mut view);
    assert_eq!((a1, b1), (a2, b2));
    assert_eq!(view.tree().children(root).len(), 2);
}

#[test]
fn test_explicit_id_wins_and_expressions_resolve() {
    let engine = Engine::default();
    let mut view = View::new("/test.xhtml");
    let tpl = template(vec![
        viewtree_core::TemplateNode::Param {
            name: "suffix".to_string(),
            value: viewtree_core::model::AttrValue::literal("name"),
        },
        ComponentTag::new("h:inputText", "jakarta.faces.HtmlInputText")
            .with_id("#{suffix}")
            .into(),
    ]);

    engine.build(&mut view, &tpl);
    let key = view.tree().find_by_id("name").unwrap();
    assert_eq!(view.tree().get(key).unwrap().created_by.as_deref(), Some("t1"));
}

#[test]
fn test_initial_state_marked_when_partial_state_saving() {
    let engine = Engine::default();
    let mut view = View::new("/test.xhtml");
    engine.build(&mut view, &template(vec![output("x").into()]));
    let key = by_tag(&view, "t1").unwrap();
    assert!(view.tree().get(key).unwrap().initial_state_marked);
    assert!(view.tree().get(view.root()).unwrap().initial_state_marked);

    let engine = Engine::new(viewtree_core::EngineConfig {
        partial_state_saving: false,
        ..Default::default()
    });
    let mut view = View::new("/test.xhtml");
    engine.build(&mut view, &template(vec![output("x").into()]));
    let key = by_tag(&view, "t1").unwrap();
    assert!(!view.tree().get(key).unwrap().initial_state_marked);
}

#[test]
fn test_view_location_recorded_in_development_only() {
    let mut located = output("x");
    located.location = Some("/test.xhtml:3:5".to_string());
    let tpl = template(vec![located.into()]);

    let dev = Engine::new(
        viewtree_core::EngineConfig::default()
            .with_project_stage(viewtree_core::ProjectStage::Development),
    );
    let mut view = View::new("/test.xhtml");
    dev.build(&mut view, &tpl);
    let key = by_tag(&view, "t1").unwrap();
    assert_eq!(
        view.tree().get(key).unwrap().view_location.as_deref(),
        Some("/test.xhtml:3:5")
    );

    let prod = Engine::default();
    let mut view = View::new("/test.xhtml");
    prod.build(&mut view, &tpl);
    let key = by_tag(&view, "t1").unwrap();
    assert_eq!(view.tree().get(key).unwrap().view_location, None);
}

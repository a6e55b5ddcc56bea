mod common;

use common::{form, input, output, template, Engine};
use viewtree_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use viewtree_core::core_types::{BuildCorrelation, TraceId};
use viewtree_core::errors::EngineError;
use viewtree_core::logging_facility::test_capture::init_test_capture;
use viewtree_core::model::{ComponentTag, TemplateNode, ValidatorTag, View};
use viewtree_core::{build_view_with_correlation, log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_and_end_macros() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_end_unique_1";

    log_op_start!(op_name, view_id = "/a.xhtml");
    log_op_end!(op_name, duration_ms = 42);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 1);

    let end = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .expect("end event");
    assert_eq!(end.field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_carries_stable_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_2";

    let err = EngineError::MissingParent {
        tag: "h:form".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 5);

    let event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(event.field("err_code"), Some("ERR_INVALID_TREE_STATE"));
    assert_eq!(event.field("err_kind"), Some("InvalidTreeState"));
}

#[test]
fn test_build_view_emits_start_and_end_for_its_build() {
    let capture = init_test_capture();
    let engine = Engine::default();
    let mut view = View::new("/logged.xhtml");
    let correlation = BuildCorrelation::new();
    let build_id = correlation.build_id.to_string();

    build_view_with_correlation(
        &mut view,
        &template(vec![form("form", vec![input().into()])]),
        &engine.collaborators,
        &engine.config,
        correlation,
    )
    .unwrap();

    let events = capture.events_for_build(&build_id);
    let boundary: Vec<&str> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some("build_view"))
        .filter_map(|e| e.event.as_deref())
        .collect();
    assert_eq!(boundary, vec![EVENT_START, EVENT_END]);

    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .unwrap();
    assert_eq!(end.field("created"), Some("2"));
    assert_eq!(end.field("reused"), Some("0"));

    let created: Vec<&str> = events
        .iter()
        .filter(|e| e.message.as_deref() == Some("component created"))
        .filter_map(|e| e.tag_id.as_deref())
        .collect();
    assert_eq!(created, vec!["t1", "t2"]);
}

#[test]
fn test_failed_build_emits_error_event() {
    let capture = init_test_capture();
    let engine = Engine::default();
    let mut view = View::new("/failing.xhtml");
    let correlation = BuildCorrelation::new();
    let build_id = correlation.build_id.to_string();

    let result = build_view_with_correlation(
        &mut view,
        &template(vec![ComponentTag::new("acme:chart", "com.acme.Chart").into()]),
        &engine.collaborators,
        &engine.config,
        correlation,
    );
    assert!(result.is_err());

    let events = capture.events_for_build(&build_id);
    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.field("err_code"), Some("ERR_COMPONENT_CREATION"));
    assert!(events
        .iter()
        .all(|e| e.event.as_deref() != Some(EVENT_END)));
}

#[test]
fn test_error_event_names_the_failing_tag_and_correlation() {
    let capture = init_test_capture();
    let engine = Engine::default();
    let mut view = View::new("/failing.xhtml");
    let trace_id = TraceId::new();
    let correlation = BuildCorrelation::new().with_trace_id(trace_id.clone());
    let build_id = correlation.build_id.to_string();

    let misplaced = output("x").with_child(TemplateNode::Validator(ValidatorTag {
        validator_id: "jakarta.faces.Length".to_string(),
        disabled: false,
        validation_groups: None,
        children: vec![],
    }));
    let result = build_view_with_correlation(
        &mut view,
        &template(vec![form("form", vec![misplaced.into()])]),
        &engine.collaborators,
        &engine.config,
        correlation,
    );
    assert!(matches!(result, Err(EngineError::IncompatibleParent { .. })));

    let events = capture.events_for_build(&build_id);
    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.field("err_code"), Some("ERR_INVALID_TEMPLATE"));
    assert_eq!(error.field("trace_id"), Some(trace_id.as_str()));
    assert_eq!(error.tag_id.as_deref(), Some("t2"));
    assert_eq!(error.field("component_id"), Some("j_idt2"));
}

//! End-to-end form scenarios
//!
//! Each test mounts a form, drives it through host events and checks the
//! callbacks and held error state the host would observe.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;

use crate::prelude::*;
use crate::events::{EventResponse, SubmitTrigger};
use crate::form::SubmitPhase;

/// Records every outbound callback invocation
#[derive(Default)]
struct Recorder {
    submitted: RefCell<Vec<(ValueTree, SubmitTrigger)>>,
    errors: RefCell<Vec<ErrorTree>>,
    field_changes: RefCell<Vec<(String, String)>>,
    form_changes: RefCell<Vec<ValueTree>>,
}

impl Recorder {
    fn attach(self: &Rc<Self>, config: FormConfig) -> FormConfig {
        let on_submit = Rc::clone(self);
        let on_error = Rc::clone(self);
        let on_field = Rc::clone(self);
        let on_form = Rc::clone(self);
        config
            .on_submit_with_trigger(move |data, trigger| {
                on_submit.submitted.borrow_mut().push((data.clone(), trigger));
            })
            .on_error(move |errors| on_error.errors.borrow_mut().push(errors.clone()))
            .on_field_change(move |name, value| {
                on_field
                    .field_changes
                    .borrow_mut()
                    .push((name.to_string(), value.to_string()));
            })
            .on_form_change(move |data| on_form.form_changes.borrow_mut().push(data.clone()))
    }

    fn submit_count(&self) -> usize {
        self.submitted.borrow().len()
    }

    fn error_count(&self) -> usize {
        self.errors.borrow().len()
    }
}

fn signup_rules() -> RuleTree {
    RuleTree::new()
        .field("email", ValidationRule::new().required())
        .at("userinfo.name", ValidationRule::new().required().min_length(10))
        .unwrap()
}

/// Form with `userinfo.name` and `email` inputs
fn signup_form(recorder: &Rc<Recorder>) -> Form {
    let form = Form::new(recorder.attach(FormConfig::new().validation_rules(signup_rules())));
    form.add_text_field("userinfo.name").unwrap();
    form.add_text_field("email").unwrap();
    form
}

// =============================================================================
// Submission
// =============================================================================

#[test]
fn test_invalid_submit_reports_nested_errors() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    form.handle_event(FormEvent::input("userinfo.name", "John")).unwrap();
    form.handle_event(FormEvent::input("email", "john@example.com")).unwrap();
    let response = form.handle_event(FormEvent::Submit).unwrap();

    assert!(response.is_default_prevented());
    assert_eq!(recorder.submit_count(), 0);
    assert_eq!(recorder.error_count(), 1);
    assert_eq!(
        recorder.errors.borrow()[0].to_json(),
        json!({ "userinfo": { "name": "Must be at least 10 characters" } })
    );
    assert_eq!(form.errors(), recorder.errors.borrow()[0]);
}

#[test]
fn test_valid_submit_clears_errors_and_delivers_data() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    form.handle_event(FormEvent::Submit).unwrap();
    assert!(form.errors().has_error("email"));

    form.handle_event(FormEvent::input("userinfo.name", "John Smithson"))
        .unwrap();
    form.handle_event(FormEvent::input("email", "john@example.com")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    assert!(form.errors().is_empty());
    assert_eq!(recorder.submit_count(), 1);
    // Only the first, invalid submission reached on_error
    assert_eq!(recorder.error_count(), 1);
    let (data, trigger) = recorder.submitted.borrow()[0].clone();
    assert_eq!(trigger, SubmitTrigger::Event);
    assert_eq!(
        data.to_json(),
        json!({
            "userinfo": { "name": "John Smithson" },
            "email": "john@example.com",
        })
    );
}

#[test]
fn test_each_field_reports_its_first_failure_only() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    form.handle_event(FormEvent::Submit).unwrap();

    let errors = form.errors().flatten();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("email"), Some("This field is required"));
    assert_eq!(errors.get("userinfo.name"), Some("This field is required"));
}

#[test]
fn test_custom_messages_override_defaults() {
    let form = Form::new(
        FormConfig::new()
            .validation_rules(signup_rules())
            .custom_error_messages(
                MessageTree::new()
                    .at("userinfo.name", RuleMessages::new().min_length("Use your full name"))
                    .unwrap(),
            ),
    );
    form.add_text_field("userinfo.name").unwrap();
    form.add_text_field("email").unwrap();

    form.handle_event(FormEvent::input("userinfo.name", "Jo")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    let errors = form.errors();
    assert_eq!(errors.message("userinfo.name"), Some("Use your full name"));
    assert_eq!(errors.message("email"), Some("This field is required"));
}

#[test]
fn test_clearing_empty_errors_does_not_notify() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);
    let notifications = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notifications);
    form.subscribe_errors(move |_| counter.set(counter.get() + 1));

    form.handle_event(FormEvent::input("userinfo.name", "John Smithson"))
        .unwrap();
    form.handle_event(FormEvent::input("email", "john@example.com")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(recorder.submit_count(), 2);
    assert_eq!(notifications.get(), 0);
}

#[test]
fn test_error_subscribers_see_replace_and_clear() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = form.subscribe_errors(move |errors| sink.borrow_mut().push(errors.len()));

    form.handle_event(FormEvent::Submit).unwrap();
    form.handle_event(FormEvent::input("userinfo.name", "John Smithson"))
        .unwrap();
    form.handle_event(FormEvent::input("email", "john@example.com")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(*seen.borrow(), vec![2, 0]);

    assert!(form.unsubscribe_errors(subscription));
    form.reset();
    form.handle_event(FormEvent::Submit).unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_submit_data_bypasses_inputs() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    let data = ValueTree::from_json(json!({
        "userinfo": { "name": "Katherine Johnson" },
        "email": "kj@nasa.gov",
    }));
    let outcome = form.submit_data(data.clone());

    assert_eq!(outcome, SubmitOutcome::Valid(data.clone()));
    assert_eq!(
        recorder.submitted.borrow()[0],
        (data, SubmitTrigger::Data)
    );
    // Inputs were not touched
    assert_eq!(form.field_value("email").as_deref(), Some(""));
}

#[test]
fn test_submit_data_invalid_outcome() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    let outcome = form.submit_data(ValueTree::from_json(json!({
        "userinfo": { "name": "" },
        "email": "a@b.co",
    })));

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected invalid outcome");
    };
    assert_eq!(errors.message("userinfo.name"), Some("This field is required"));
    assert!(!errors.has_error("email"));
    assert_eq!(recorder.error_count(), 1);
    assert_eq!(form.phase(), SubmitPhase::Idle);
}

#[test]
fn test_missing_parent_object_skips_nested_rules() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    let data = ValueTree::new().with("email", "a@b.co");
    let outcome = form.submit_data(data.clone());

    assert_eq!(outcome, SubmitOutcome::Valid(data));
    assert_eq!(recorder.submit_count(), 1);
    assert_eq!(recorder.error_count(), 0);
    assert!(form.errors().is_empty());
}

// =============================================================================
// Enter key
// =============================================================================

#[test]
fn test_enter_submits_by_default() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    let response = form.handle_event(FormEvent::key(Key::Enter)).unwrap();

    assert_eq!(response, EventResponse::PreventDefault);
    assert_eq!(recorder.error_count(), 1);
}

#[test]
fn test_enter_trigger_reported() {
    let recorder = Rc::new(Recorder::default());
    let form = Form::new(recorder.attach(FormConfig::new()));
    form.add_text_field("q").unwrap();

    form.handle_event(FormEvent::key(Key::Enter)).unwrap();

    assert_eq!(recorder.submitted.borrow()[0].1, SubmitTrigger::EnterKey);
}

#[test]
fn test_enter_disabled() {
    let recorder = Rc::new(Recorder::default());
    let form = Form::new(
        recorder.attach(
            FormConfig::new()
                .validation_rules(signup_rules())
                .on_enter_submit(false),
        ),
    );
    form.add_text_field("email").unwrap();

    let response = form.handle_event(FormEvent::key(Key::Enter)).unwrap();

    assert_eq!(response, EventResponse::Ignored);
    assert_eq!(recorder.error_count(), 0);
    assert_eq!(recorder.submit_count(), 0);
    assert!(form.errors().is_empty());
}

// =============================================================================
// Change callbacks
// =============================================================================

#[test]
fn test_change_callbacks_fire_without_validation() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    form.handle_event(FormEvent::input("userinfo.name", "J")).unwrap();

    assert_eq!(
        *recorder.field_changes.borrow(),
        vec![("userinfo.name".to_string(), "J".to_string())]
    );
    assert_eq!(
        recorder.form_changes.borrow()[0].to_json(),
        json!({ "userinfo": { "name": "J" }, "email": "" })
    );
    // Typing never validates
    assert!(form.errors().is_empty());
    assert_eq!(recorder.error_count(), 0);
}

#[test]
fn test_input_does_not_clear_held_errors() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    form.handle_event(FormEvent::Submit).unwrap();
    form.handle_event(FormEvent::input("email", "john@example.com")).unwrap();

    assert!(form.errors().has_error("email"));
}

#[test]
fn test_checkbox_change_reports_submitted_value() {
    let recorder = Rc::new(Recorder::default());
    let form = Form::new(recorder.attach(FormConfig::new()));
    form.add_checkbox("terms").unwrap();

    form.handle_event(FormEvent::check("terms", true)).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(
        recorder.field_changes.borrow()[0],
        ("terms".to_string(), "on".to_string())
    );
    assert_eq!(recorder.submitted.borrow()[0].0.to_json(), json!({ "terms": "on" }));
}

#[test]
fn test_required_checkbox() {
    let form = Form::new(
        FormConfig::new()
            .validation_rules(RuleTree::new().field("terms", ValidationRule::new().required())),
    );
    form.add_checkbox("terms").unwrap();

    form.handle_event(FormEvent::Submit).unwrap();
    assert_eq!(form.errors().message("terms"), Some("This field is required"));

    form.handle_event(FormEvent::check("terms", true)).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();
    assert!(form.errors().is_empty());
}

#[test]
fn test_disabled_field_not_submitted() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    form.handle_event(FormEvent::input("userinfo.name", "John Smithson"))
        .unwrap();
    form.handle_event(FormEvent::input("email", "john@example.com")).unwrap();
    form.set_disabled("email", true).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(recorder.submit_count(), 0);
    assert_eq!(form.errors().message("email"), Some("This field is required"));
}

// =============================================================================
// Reset & handle
// =============================================================================

#[test]
fn test_reset_clears_errors_and_restores_inputs() {
    let recorder = Rc::new(Recorder::default());
    let form = Form::new(recorder.attach(
        FormConfig::new()
            .validation_rules(signup_rules())
            .default_values(ValueTree::from_json(json!({ "userinfo": { "name": "John" } }))),
    ));
    form.add_text_field("userinfo.name").unwrap();
    form.add_text_field("email").unwrap();
    assert_eq!(form.field_value("userinfo.name").as_deref(), Some("John"));

    form.handle_event(FormEvent::input("userinfo.name", "Jo")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();
    assert!(!form.errors().is_empty());

    assert!(form.handle().reset_form());

    assert!(form.errors().is_empty());
    assert_eq!(form.field_value("userinfo.name").as_deref(), Some("John"));
    assert_eq!(recorder.submit_count(), 0);
    assert_eq!(recorder.error_count(), 1);
}

#[test]
fn test_reset_restores_inputs_before_notifying() {
    let form = Rc::new(Form::new(
        FormConfig::new()
            .validation_rules(signup_rules())
            .default_values(ValueTree::from_json(json!({ "userinfo": { "name": "John" } }))),
    ));
    form.add_text_field("userinfo.name").unwrap();
    form.add_text_field("email").unwrap();

    form.handle_event(FormEvent::input("userinfo.name", "Jo")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let (sink, observed) = (Rc::clone(&seen), Rc::downgrade(&form));
    form.subscribe_errors(move |errors| {
        let name = observed
            .upgrade()
            .and_then(|form| form.field_value("userinfo.name"));
        sink.borrow_mut().push((errors.len(), name));
    });

    form.reset();

    assert_eq!(*seen.borrow(), vec![(0, Some("John".to_string()))]);
}

#[test]
fn test_handle_submit_matches_submit_event() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);
    let handle = form.handle();

    form.handle_event(FormEvent::input("userinfo.name", "John Smithson"))
        .unwrap();
    form.handle_event(FormEvent::input("email", "john@example.com")).unwrap();

    assert!(handle.submit());

    assert_eq!(recorder.submit_count(), 1);
    assert_eq!(recorder.submitted.borrow()[0].1, SubmitTrigger::Event);
}

#[test]
fn test_handle_submit_runs_validation() {
    let recorder = Rc::new(Recorder::default());
    let form = signup_form(&recorder);

    assert!(form.handle().submit());

    assert_eq!(recorder.submit_count(), 0);
    assert_eq!(recorder.error_count(), 1);
}

#[test]
fn test_callback_may_reset_through_handle() {
    let form_slot: Rc<RefCell<Option<FormHandle>>> = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&form_slot);
    let form = Form::new(
        FormConfig::new()
            .validation_rules(signup_rules())
            .on_error(move |_| {
                if let Some(handle) = slot.borrow().as_ref() {
                    handle.reset_form();
                }
            }),
    );
    form.add_text_field("userinfo.name").unwrap();
    form.add_text_field("email").unwrap();
    *form_slot.borrow_mut() = Some(form.handle());

    form.handle_event(FormEvent::input("email", "x")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    // The error callback cleared what the submission had just stored
    assert!(form.errors().is_empty());
    assert_eq!(form.field_value("email").as_deref(), Some(""));
    assert_eq!(form.phase(), SubmitPhase::Idle);
}

#[test]
fn test_callback_may_read_form_state() {
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let handle_slot: Rc<RefCell<Option<FormHandle>>> = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&handle_slot);
    let form = Form::new(FormConfig::new().on_submit(move |_| {
        *sink.borrow_mut() = slot.borrow().as_ref().map(FormHandle::is_mounted);
    }));
    *handle_slot.borrow_mut() = Some(form.handle());

    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(*seen.borrow(), Some(true));
}

// =============================================================================
// Schema mode
// =============================================================================

fn email_schema(data: &ValueTree) -> Result<(), SchemaIssues> {
    let mut issues = SchemaIssues::new();
    match data.get("email").and_then(FormValue::as_text) {
        Some(email) if email.contains('@') => {}
        _ => issues.push(SchemaIssue::new(["email"], "Invalid email")),
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[test]
fn test_schema_errors_reach_on_error() {
    let recorder = Rc::new(Recorder::default());
    let form = Form::new(recorder.attach(FormConfig::new().validation_schema(email_schema)));
    form.add_text_field("email").unwrap();

    form.handle_event(FormEvent::input("email", "bad")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(recorder.submit_count(), 0);
    assert_eq!(
        recorder.errors.borrow()[0].to_json(),
        json!({ "email": "Invalid email" })
    );

    form.handle_event(FormEvent::input("email", "a@b.co")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();
    assert_eq!(recorder.submit_count(), 1);
    assert!(form.errors().is_empty());
}

#[test]
fn test_schema_ignores_rules() {
    let recorder = Rc::new(Recorder::default());
    let form = Form::new(
        recorder.attach(
            FormConfig::new()
                .validation_schema(email_schema)
                .validation_rules(signup_rules()),
        ),
    );
    form.add_text_field("email").unwrap();

    form.handle_event(FormEvent::input("email", "a@b.co")).unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(recorder.submit_count(), 1);
}

// =============================================================================
// Rendering & configuration
// =============================================================================

#[test]
fn test_render_props() {
    let form = Form::new(
        FormConfig::new()
            .validation_rules(signup_rules())
            .default_values(ValueTree::new().with("email", "me@example.com")),
    );
    form.add_text_field("userinfo.name").unwrap();
    form.add_text_field("email").unwrap();

    form.handle_event(FormEvent::Submit).unwrap();

    let (message, default_email) = form.render(|props| {
        (
            props.errors.message("userinfo.name").map(str::to_string),
            props
                .default_values
                .get("email")
                .and_then(FormValue::as_text)
                .map(str::to_string),
        )
    });
    assert_eq!(message.as_deref(), Some("This field is required"));
    assert_eq!(default_email.as_deref(), Some("me@example.com"));
}

#[test]
fn test_form_from_toml_spec() {
    let spec = crate::FormSpec::from_toml(
        r#"
        [validation_rules.userinfo.name]
        required = true
        min_length = 10

        [default_values.userinfo]
        name = "John"
        "#,
    )
    .unwrap();
    let form = Form::new(FormConfig::from_spec(spec).unwrap());
    form.add_text_field("userinfo.name").unwrap();

    form.handle_event(FormEvent::Submit).unwrap();

    assert_eq!(
        form.errors().message("userinfo.name"),
        Some("Must be at least 10 characters")
    );
}

#[test]
fn test_same_name_inputs_submit_last_value() {
    let recorder = Rc::new(Recorder::default());
    let form = Form::new(recorder.attach(FormConfig::new()));
    form.add_field(Field::checkbox("plan", false).unwrap().checkbox_value("basic"));
    form.add_field(Field::checkbox("plan", true).unwrap().checkbox_value("pro"));

    form.handle_event(FormEvent::check_value("plan", "basic", true))
        .unwrap();
    form.handle_event(FormEvent::Submit).unwrap();
    form.handle_event(FormEvent::check_value("plan", "pro", false))
        .unwrap();
    form.handle_event(FormEvent::Submit).unwrap();

    let submitted = recorder.submitted.borrow();
    assert_eq!(submitted[0].0.to_json(), json!({ "plan": "pro" }));
    assert_eq!(submitted[1].0.to_json(), json!({ "plan": "basic" }));
    assert_eq!(
        recorder.field_changes.borrow()[0],
        ("plan".to_string(), "basic".to_string())
    );
}

#[test]
fn test_radio_group_from_default_values() {
    let form = Form::new(
        FormConfig::new()
            .validation_rules(RuleTree::new().field("size", ValidationRule::new().required()))
            .default_values(ValueTree::new().with("size", "m")),
    );
    for size in ["s", "m", "l"] {
        form.add_radio("size", size).unwrap();
    }
    assert_eq!(form.values().to_json(), json!({ "size": "m" }));

    form.handle_event(FormEvent::check_value("size", "l", true))
        .unwrap();
    assert_eq!(form.values().to_json(), json!({ "size": "l" }));

    form.handle_event(FormEvent::check_value("size", "l", false))
        .unwrap();
    form.handle_event(FormEvent::Submit).unwrap();
    assert_eq!(form.errors().message("size"), Some("This field is required"));

    form.reset();
    assert_eq!(form.values().to_json(), json!({ "size": "m" }));
}

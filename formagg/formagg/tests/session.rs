use formagg::{
    Form, FormError,
    core::Value,
    engine::{PersistedSubmission, RegistryError},
};
use serde_json::json;

fn chain_form() -> Form {
    Form::from_json_str(
        r#"{"fields": [
            {"id": "a", "title": "A", "type": "number"},
            {"id": "b", "title": "B", "type": "number"},
            {"id": "comment", "title": "Comment", "type": "textfield"},
            {"id": "x", "title": "X", "type": "summation", "sources": ["a", "b"]},
            {"id": "y", "title": "Y", "type": "summation", "sources": ["x", "a"]},
            {"id": "words", "title": "Words", "type": "summation", "sources": ["a", "b", "comment", "missing_value"]},
            {"id": "missing_value", "title": "Never filled", "type": "number"}
        ]}"#,
    )
    .expect("schema should deploy")
}

#[test]
fn new_session_starts_with_zero_totals() {
    let session = chain_form().start_session();
    assert_eq!(session.get("x"), Some(&Value::Int(0)));
    assert_eq!(session.get("y"), Some(&Value::Int(0)));
    assert_eq!(session.get("a"), None);
}

#[test]
fn edits_propagate_through_chained_totals() -> Result<(), FormError> {
    let mut session = chain_form().start_session();
    session.set("a", 2)?;
    session.set("b", 3)?;
    assert_eq!(session.get("x"), Some(&Value::Int(5)));
    assert_eq!(session.get("y"), Some(&Value::Int(7)));

    let updated = session.set("a", 10)?;
    assert_eq!(updated, ["x", "y", "words"]);
    assert_eq!(session.get("x"), Some(&Value::Int(13)));
    assert_eq!(session.get("y"), Some(&Value::Int(23)));
    Ok(())
}

#[test]
fn non_numeric_and_missing_sources_count_as_zero() -> Result<(), FormError> {
    let mut session = chain_form().start_session();
    session.set("a", 3)?;
    session.set("b", 5)?;
    session.set("comment", "abc")?;
    assert_eq!(session.get("words"), Some(&Value::Int(8)));
    Ok(())
}

#[test]
fn clearing_an_input_recomputes() -> Result<(), FormError> {
    let mut session = chain_form().start_session();
    session.set("a", 4)?;
    session.set("b", 1)?;
    session.clear("b")?;
    assert_eq!(session.get("b"), Some(&Value::Null));
    assert_eq!(session.get("x"), Some(&Value::Int(4)));

    let stored = session.submit();
    assert_eq!(stored.get("b"), Some(&json!(null)));
    assert_eq!(stored.get("x"), Some(&json!(4)));
    Ok(())
}

#[test]
fn overflowing_change_is_undone() -> Result<(), FormError> {
    let form = chain_form();
    let mut session = form.start_session();
    session.set("b", "1e308")?;
    assert_eq!(session.get("x"), Some(&Value::Float(1e308)));
    assert_eq!(session.get("y"), Some(&Value::Float(1e308)));

    let err = session.set("a", "1e308").unwrap_err();
    assert!(matches!(
        &err,
        FormError::NonFiniteTotal { field, changed } if field == "x" && changed == "a"
    ));
    assert_eq!(session.get("a"), None);
    assert_eq!(session.get("x"), Some(&Value::Float(1e308)));
    assert_eq!(session.get("y"), Some(&Value::Float(1e308)));

    session.set("a", 5)?;
    assert!(matches!(
        session.set("a", "1e308"),
        Err(FormError::NonFiniteTotal { .. })
    ));
    assert_eq!(session.get("a"), Some(&Value::Int(5)));

    let stored = session.submit();
    assert!(form.accept(&stored).is_accepted());
    Ok(())
}

#[test]
fn number_field_rejects_non_finite_input() {
    let mut session = chain_form().start_session();
    assert!(matches!(session.set("a", f64::INFINITY), Err(FormError::Element(_))));
    assert!(matches!(session.set("a", f64::NAN), Err(FormError::Element(_))));
    assert!(matches!(session.set("a", "inf"), Err(FormError::Element(_))));
    assert_eq!(session.get("a"), None);
}

#[test]
fn fractional_values_survive_storage_as_text() -> Result<(), FormError> {
    let form = chain_form();
    let mut session = form.start_session();
    session.set("a", 1175.4621790330661)?;
    session.set("b", 54.65)?;
    session.set("comment", "0.1")?;
    let computed = session.values();

    let text = session.submit().to_json_string().expect("serializable");
    let stored = PersistedSubmission::from_json_str(&text).expect("parseable");
    assert!(form.accept(&stored).is_accepted());

    let reopened = form.reopen(&stored).expect("stored submission is valid");
    for id in ["a", "b", "x", "y", "words"] {
        assert_eq!(reopened.get(id), computed.get(id), "field {id}");
    }
    Ok(())
}

#[test]
fn totals_cannot_be_set() {
    let mut session = chain_form().start_session();
    let err = session.set("x", 100).unwrap_err();
    assert!(matches!(
        err,
        FormError::Registry(RegistryError::ReadOnlyField { field }) if field == "x"
    ));
    assert_eq!(session.get("x"), Some(&Value::Int(0)));
}

#[test]
fn number_field_rejects_non_numeric_text() {
    let mut session = chain_form().start_session();
    assert!(matches!(session.set("a", "abc"), Err(FormError::Element(_))));
    assert!(session.set("a", "12").is_ok());
    assert_eq!(session.get("x"), Some(&Value::Int(12)));
}

#[test]
fn render_exposes_value_and_class_hints() -> Result<(), FormError> {
    let mut session = chain_form().start_session();
    session.set("a", 7)?;

    let total = session.render("x")?;
    assert_eq!(total.id, "x");
    assert_eq!(total.title, "X");
    assert_eq!(total.value, Value::Int(7));
    assert!(total.has_class("form-element--type-summation"));
    assert!(total.has_class("form-element--readonly"));

    let input = session.render("a")?;
    assert!(input.has_class("form-element--type-number"));
    assert!(!input.has_class("form-element--computed"));

    let all = session.form().render_all(&session)?;
    assert_eq!(all.len(), 7);
    assert_eq!(all[0].id, "a");
    Ok(())
}

#[test]
fn submitted_session_is_accepted_and_can_be_reopened() -> Result<(), FormError> {
    let form = chain_form();
    let mut session = form.start_session();
    session.set("a", 2)?;
    session.set("b", 3)?;
    let stored = session.submit();
    assert_eq!(stored.get("y"), Some(&json!(7)));
    assert!(form.accept(&stored).is_accepted());

    let mut reopened = form.reopen(&stored).expect("stored submission is valid");
    assert_eq!(reopened.get("y"), Some(&Value::Int(7)));
    reopened.set("b", 0)?;
    let restored = reopened.submit();
    assert_eq!(restored.get("x"), Some(&json!(2)));
    assert_eq!(restored.get("y"), Some(&json!(4)));
    Ok(())
}

#[test]
fn reopening_a_tampered_submission_is_refused() {
    let form = chain_form();
    let mut stored = form.start_session().submit();
    stored.insert("y", json!(1000));
    assert!(form.reopen(&stored).is_err());
}

#[test]
fn empty_submission_round_trips() {
    let form = chain_form();
    let stored = form.start_session().submit();
    let text = stored.to_json_string().expect("serializable");
    let reparsed = PersistedSubmission::from_json_str(&text).expect("parseable");
    assert!(form.accept(&reparsed).is_accepted());
}

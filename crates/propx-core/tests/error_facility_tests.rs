#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{LAYOUT_DOM, PANEL, PLOT, SPACER};
use propx_core::errors::{PropxError, PxError, PxErrorKind};
use propx_core::model::ModelRef;
use propx_core::Value;
use std::error::Error;

#[test]
fn test_invalid_value_verifiable_by_kind() {
    let spacer = common::spacer();
    let err: PxError = spacer.set("width", "wide").unwrap_err().into();

    assert_eq!(err.kind(), PxErrorKind::InvalidValue);
    assert_eq!(err.code(), "ERR_INVALID_VALUE");
    assert_eq!(err.model_class(), Some("Spacer"));
    assert_eq!(err.property(), Some("width"));
    assert!(err
        .message()
        .starts_with("expected a value of type Nullable(NonNegative(Int)), got \"wide\" of type str"));
}

#[test]
fn test_validation_error_is_the_source() {
    let err = ModelRef::new(&SPACER, [("visible", Value::Int(1))]).unwrap_err();
    let source = err.source().expect("validation source");
    assert_eq!(
        source.to_string(),
        "expected a value of type Bool, got 1 of type int"
    );
    assert!(err.to_string().starts_with("Spacer.visible: expected a value of type Bool"));
}

#[test]
fn test_unset_distinct_from_unknown() {
    let panel = ModelRef::with_defaults(&PANEL).unwrap();

    let unset: PxError = panel.get("child").unwrap_err().into();
    assert_eq!(unset.kind(), PxErrorKind::UnsetValue);
    assert_eq!(unset.property(), Some("child"));

    let unknown: PxError = panel.get("children").unwrap_err().into();
    assert_eq!(unknown.kind(), PxErrorKind::UnknownProperty);
    assert_eq!(unknown.code(), "ERR_UNKNOWN_PROPERTY");
    assert_ne!(unset.kind(), unknown.kind());
}

#[test]
fn test_readonly_structured_fields() {
    let plot = ModelRef::with_defaults(&PLOT).unwrap();
    let err: PxError = plot.set("inner_width", 10).unwrap_err().into();

    assert_eq!(err.kind(), PxErrorKind::Readonly);
    assert_eq!(err.code(), "ERR_READONLY");
    assert_eq!(err.property(), Some("inner_width"));
}

#[test]
fn test_abstract_model_code() {
    let err: PxError = ModelRef::with_defaults(&LAYOUT_DOM).unwrap_err().into();
    assert_eq!(err.kind(), PxErrorKind::AbstractModel);
    assert_eq!(err.model_class(), Some("LayoutDOM"));
    assert_eq!(err.code(), "ERR_ABSTRACT_MODEL");
}

#[test]
fn test_listener_failure_code() {
    let spacer = common::spacer();
    spacer.on_change(|_, _, _| Err(PxError::new(PxErrorKind::Internal).with_message("closed")));

    let err: PxError = spacer.set("height", 3).unwrap_err().into();
    assert_eq!(err.kind(), PxErrorKind::Listener);
    assert_eq!(err.code(), "ERR_LISTENER");
    assert_eq!(err.property(), Some("height"));
}

#[test]
fn test_serde_errors_convert() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: PropxError = json_err.into();
    assert!(matches!(err, PropxError::Serialization { .. }));

    let px: PxError = err.into();
    assert_eq!(px.code(), "ERR_SERIALIZATION");
}

#[test]
fn test_display_with_op_context() {
    let err = PxError::from(PropxError::Internal {
        message: "lock poisoned".to_string(),
    })
    .with_op("serialize_graph");
    assert_eq!(
        err.to_string(),
        "[ERR_INTERNAL] in operation 'serialize_graph': lock poisoned"
    );
    assert_eq!(err.op(), Some("serialize_graph"));
}

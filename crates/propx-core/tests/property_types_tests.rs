#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{BOX, LAYOUT_DOM, SPACER};
use propx_core::errors::PropxError;
use propx_core::model::ModelRef;
use propx_core::property::{props, validate, without_property_validation};
use chrono::{DateTime, NaiveDate, TimeDelta};
use propx_core::Value;

fn validation_detail(err: PropxError) -> String {
    match err {
        PropxError::Validation { error, .. } => error.to_string(),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

// ===== accepts coercions =====

#[test]
fn test_margin_broadcasts_single_int() {
    let spacer = ModelRef::new(&SPACER, [("margin", Value::Int(5))]).unwrap();
    assert_eq!(spacer.get("margin").unwrap(), Value::from((5, 5, 5, 5)));
}

#[test]
fn test_margin_expands_vertical_horizontal_pair() {
    let spacer = common::spacer();
    spacer.set("margin", (1, 2)).unwrap();
    assert_eq!(spacer.get("margin").unwrap(), Value::from((1, 2, 1, 2)));
}

#[test]
fn test_margin_keeps_full_tuple_and_null() {
    let spacer = common::spacer();
    assert_eq!(spacer.get("margin").unwrap(), Value::from((0, 0, 0, 0)));

    spacer.set("margin", (1, 2, 3, 4)).unwrap();
    assert_eq!(spacer.get("margin").unwrap(), Value::from((1, 2, 3, 4)));

    spacer.set("margin", Value::Null).unwrap();
    assert!(spacer.get("margin").unwrap().is_null());
}

#[test]
fn test_margin_rejects_three_items_with_primary_type() {
    let spacer = common::spacer();
    let err = spacer.set("margin", (1, 2, 3)).unwrap_err();
    let message = validation_detail(err);
    assert!(
        message.starts_with("expected a value of type Nullable(Tuple(Int, Int, Int, Int))"),
        "{message}"
    );
    assert_eq!(spacer.get("margin").unwrap(), Value::from((0, 0, 0, 0)));
}

#[test]
fn test_margin_rejects_text() {
    let spacer = common::spacer();
    assert!(matches!(
        spacer.set("margin", "a"),
        Err(PropxError::Validation { ref property, .. }) if property == "margin"
    ));
}

#[test]
fn test_accepts_applies_inside_containers() {
    let lenient_float = props::float().accepts(props::string(), |v| {
        v.as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .map_or(v.clone(), Value::Float)
    });
    let ty = props::list(lenient_float);

    let prepared = ty
        .prepare_value(Value::list([Value::from("1.5"), Value::Int(2)]))
        .unwrap();
    assert_eq!(prepared, Value::list([Value::Float(1.5), Value::Int(2)]));
    assert!(ty.prepare_value(Value::list([Value::from("wide")])).is_err());
}

// ===== unions and nullability =====

#[test]
fn test_either_accepts_each_candidate_in_order() {
    let spacer = common::spacer();
    assert_eq!(spacer.get("width_policy").unwrap(), Value::from("auto"));

    spacer.set("width_policy", "fixed").unwrap();
    assert_eq!(spacer.get("width_policy").unwrap(), Value::from("fixed"));

    let err = spacer.set("width_policy", "wide").unwrap_err();
    assert!(validation_detail(err).contains("Either(Auto, Enum('fixed', 'fit', 'min', 'max'))"));
}

#[test]
fn test_either_default_is_first_candidate() {
    let spacer = common::spacer();
    assert!(spacer.get("aspect_ratio").unwrap().is_null());
    spacer.set("aspect_ratio", 1.5).unwrap();
    spacer.set("aspect_ratio", "auto").unwrap();
    assert!(spacer.set("aspect_ratio", "square").is_err());
}

#[test]
fn test_nullable_admits_null_only_when_declared() {
    assert!(props::nullable(props::int()).is_valid(&Value::Null));
    assert!(!props::int().is_valid(&Value::Null));
    assert!(props::nullable(props::int()).is_nullable());
    assert!(!props::string().is_nullable());
}

#[test]
fn test_non_nullable_excludes_null_and_has_no_default() {
    let ty = props::non_nullable(props::either(vec![props::int(), props::null()]));
    assert!(ty.is_valid(&Value::Int(3)));
    assert!(!ty.is_valid(&Value::Null));
    assert_eq!(ty.literal_default(), None);
    assert_eq!(ty.describe(), "NonNullable(Either(Int, Null))");
}

#[test]
fn test_nothing_accepts_no_value() {
    let ty = props::nothing();
    for value in [Value::Null, Value::Int(0), Value::from(""), Value::list(Vec::<Value>::new())] {
        assert!(ty.prepare_value(value).is_err());
    }
    assert_eq!(ty.literal_default(), None);
}

// ===== primitives and refinements =====

#[test]
fn test_numeric_kinds() {
    assert!(props::float().is_valid(&Value::Int(1)));
    assert!(!props::int().is_valid(&Value::Float(1.0)));
    assert!(!props::int().is_valid(&Value::Bool(true)));
    assert!(props::complex().is_valid(&Value::Complex { re: 1.0, im: -2.0 }));
}

#[test]
fn test_refinements_bound_values() {
    let byte = props::byte();
    assert!(byte.is_valid(&Value::Int(0)));
    assert!(byte.is_valid(&Value::Int(255)));
    assert!(!byte.is_valid(&Value::Int(256)));
    assert!(!byte.is_valid(&Value::Int(-1)));

    let spacer = common::spacer();
    assert!(spacer.set("width", -1).is_err());
    spacer.set("width", 0).unwrap();

    assert!(!props::positive(props::int()).is_valid(&Value::Int(0)));
    assert!(!props::non_empty(props::string()).is_valid(&Value::from("")));
    assert!(props::non_empty(props::list(props::int())).is_valid(&Value::list([1])));
}

#[test]
fn test_temporal_wire_forms_become_native() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    assert_eq!(
        props::date().prepare_value(Value::from("2024-03-01")).unwrap(),
        Value::Date(day)
    );
    assert!(props::date().prepare_value(Value::from("2024-13-01")).is_err());

    let epoch = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
    assert_eq!(
        props::datetime().prepare_value(Value::Int(0)).unwrap(),
        Value::Datetime(epoch)
    );
    assert!(props::datetime().prepare_value(Value::Float(f64::NAN)).is_err());

    assert_eq!(
        props::nullable(props::timedelta()).prepare_value(Value::Float(1.5)).unwrap(),
        Value::TimeDelta(TimeDelta::microseconds(1500))
    );
    assert!(props::timedelta().prepare_value(Value::from("1.5")).is_err());
}

#[test]
fn test_min_max_bounds_require_min_below_max() {
    let ty = props::min_max_bounds(false);
    assert_eq!(ty.literal_default(), Some(Value::from("auto")));
    assert!(ty.is_valid(&Value::from((0.0, 1.0))));
    assert!(ty.is_valid(&Value::list([Value::Null, Value::Float(5.0)])));
    assert!(!ty.is_valid(&Value::list([Value::Null, Value::Null])));
    assert!(!ty.is_valid(&Value::from("none")));

    let err = ty.validate(&Value::from((5.0, 1.0))).unwrap_err();
    assert!(err.to_string().contains("maximum smaller than minimum"), "{err}");
    assert!(ty.prepare_value(Value::from((2, 2))).is_err());
}

#[test]
fn test_min_max_bounds_with_datetimes() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();

    let ty = props::min_max_bounds(true);
    assert!(ty.is_valid(&Value::from((start, end))));
    assert!(ty.is_valid(&Value::list([Value::Datetime(start), Value::Null])));
    assert!(!ty.is_valid(&Value::from((end, start))));
    assert!(!props::min_max_bounds(false).is_valid(&Value::from((start, end))));
}

#[test]
fn test_dash_pattern_forms_become_lengths() {
    let ty = props::dash_pattern();
    assert_eq!(ty.literal_default(), Some(Value::list(Vec::<Value>::new())));
    assert_eq!(ty.prepare_value(Value::from("dashed")).unwrap(), Value::list([6]));
    assert_eq!(ty.prepare_value(Value::from("dotdash")).unwrap(), Value::list([2, 4, 6, 4]));
    assert_eq!(ty.prepare_value(Value::from("4 2")).unwrap(), Value::list([4, 2]));
    assert_eq!(ty.prepare_value(Value::from("")).unwrap(), Value::list(Vec::<Value>::new()));
    assert_eq!(ty.prepare_value(Value::list([3, 1])).unwrap(), Value::list([3, 1]));

    for bad in [Value::from("dashes"), Value::from("4 x"), Value::list([1.5]), Value::Int(4)] {
        assert!(ty.prepare_value(bad).is_err());
    }
}

#[test]
fn test_factors_nest_up_to_three_levels() {
    let factor = props::factor();
    assert!(factor.is_valid(&Value::from("apples")));
    assert!(factor.is_valid(&Value::from(("2024", "Q1"))));
    assert!(factor.is_valid(&Value::from(("2024", "Q1", "Jan"))));
    assert!(!factor.is_valid(&Value::from("")));
    assert!(!factor.is_valid(&Value::list(["a", "b", "c", "d"])));

    let factors = props::factor_seq();
    assert!(factors.is_valid(&Value::list(["apples", "pears"])));
    assert!(factors.is_valid(&Value::list([("2024", "Q1"), ("2024", "Q2")])));
    assert!(!factors.is_valid(&Value::list([Value::from("apples"), Value::from(("2024", "Q1"))])));
}

#[test]
fn test_enumeration_rejects_unknown_member() {
    let ty = props::enumeration(common::LOCATION);
    assert!(ty.is_valid(&Value::from("left")));
    assert!(!ty.is_valid(&Value::from("top")));
}

#[test]
fn test_color_forms() {
    let spacer = common::spacer();
    for color in [
        Value::from("red"),
        Value::from("#ff0000"),
        Value::from("#f00a"),
        Value::from((255, 0, 0)),
        Value::from((255, 0, 0, 0.5)),
    ] {
        spacer.set("background", color.clone()).unwrap();
        assert_eq!(spacer.get("background").unwrap(), color);
    }
    assert!(spacer.set("background", "notacolor").is_err());
    assert!(spacer.set("background", (256, 0, 0)).is_err());
    assert!(spacer.set("background", (0, 0, 0, 1.5)).is_err());
}

// ===== containers =====

#[test]
fn test_seq_reports_failing_item() {
    let err = props::list(props::int())
        .validate(&Value::list([Value::Int(1), Value::from("two")]))
        .unwrap_err();
    assert_eq!(err.detail.as_deref().map(|d| d.starts_with("item 1:")), Some(true));
}

#[test]
fn test_struct_rejects_unexpected_and_missing_keys() {
    let ty = props::structure(vec![
        props::struct_field("start", props::int()),
        props::optional_field("label", props::string()),
    ]);

    assert!(ty.is_valid(&Value::dict([("start", Value::Int(1))])));
    assert!(ty.is_valid(&Value::dict([
        ("start", Value::Int(1)),
        ("label", Value::from("a")),
    ])));

    let err = ty
        .validate(&Value::dict([("start", Value::Int(1)), ("bogus", Value::Int(2))]))
        .unwrap_err();
    assert_eq!(err.detail.as_deref(), Some("unexpected key 'bogus'"));

    let err = ty.validate(&Value::dict([("label", Value::from("a"))])).unwrap_err();
    assert_eq!(err.detail.as_deref(), Some("missing key 'start'"));
}

#[test]
fn test_option_struct_rejects_bogus_key() {
    let spacer = common::spacer();
    let table = spacer.class().properties().unwrap();
    let policy = table.get("width_policy").unwrap().property_type().clone();
    let ty = props::structure(vec![
        props::optional_field("policy", policy),
        props::optional_field("align", props::enumeration(common::ALIGN)),
    ]);
    let options = Value::dict([("policy", Value::from("fit")), ("align", Value::from("end"))]);
    assert!(ty.is_valid(&options));

    let bogus = Value::dict([("policy", Value::from("fit")), ("bogus", Value::Int(1))]);
    assert!(!ty.is_valid(&bogus));
    assert!(ty.prepare_value(bogus).is_err());
}

#[test]
fn test_restricted_dict_rejects_disallowed_key() {
    let ty = props::restricted_dict(props::string(), props::any(), ["id"]);
    assert!(ty.is_valid(&Value::dict([("name", Value::from("a"))])));
    let err = ty.validate(&Value::dict([("id", Value::Int(1))])).unwrap_err();
    assert_eq!(err.detail.as_deref(), Some("disallowed key 'id'"));
}

#[test]
fn test_dict_values_are_checked() {
    let spacer = common::spacer();
    spacer
        .set("styles", Value::dict([("color", Value::from("red")), ("border", Value::Null)]))
        .unwrap();
    assert!(spacer
        .set("styles", Value::dict([("color", Value::Int(1))]))
        .is_err());
}

// ===== references =====

#[test]
fn test_instance_accepts_subclasses_only() {
    let spacer = Value::from(common::spacer());
    assert!(props::instance(&LAYOUT_DOM).is_valid(&spacer));
    assert!(!props::instance(&BOX).is_valid(&spacer));
    assert!(!props::instance(&LAYOUT_DOM).is_valid(&Value::from("Spacer")));
}

// ===== validation toggle =====

#[test]
fn test_disabled_validation_stores_value_unchanged() {
    let spacer = common::spacer();
    without_property_validation(|| spacer.set("width", "wide")).unwrap();
    assert_eq!(spacer.get("width").unwrap(), Value::from("wide"));
    assert!(spacer.set("width", "wide").is_err());
}

#[test]
fn test_validation_guard_is_scoped() {
    let spacer = common::spacer();
    {
        let _off = validate(false);
        spacer.set("height", -5).unwrap();
    }
    assert_eq!(spacer.get("height").unwrap(), Value::Int(-5));
    assert!(spacer.set("height", -6).is_err());
}

#[test]
fn test_descriptions() {
    let spacer = common::spacer();
    let table = spacer.class().properties().unwrap();
    assert_eq!(
        table.get("width").unwrap().property_type().describe(),
        "Nullable(NonNegative(Int))"
    );
    assert_eq!(
        table.get("styles").unwrap().property_type().describe(),
        "Dict(String, Nullable(String))"
    );
    assert_eq!(
        table.get("margin").unwrap().property_type().help_text(),
        None
    );
}

//! Constructors for property types
//!
//! ```
//! use propx_core::property::props;
//!
//! let margin = props::nullable(props::tuple(vec![props::int(); 4]))
//!     .with_default((0, 0, 0, 0))
//!     .help("Space around the component, in pixels");
//! assert_eq!(margin.describe(), "Nullable(Tuple(Int, Int, Int, Int))");
//! ```

use super::dataspec::{DataSpecKind, Shorthand, ANGLE_UNITS, DISTANCE_UNITS, SIZE_UNITS};
use super::kind::{Kind, StructField};
use super::property_type::PropertyType;
use crate::errors::{PropxError, Result};
use crate::model::ModelClass;
use crate::value::Value;
use regex::Regex;
use std::sync::LazyLock;

pub const MARKER_TYPES: &[&str] = &[
    "asterisk", "circle", "circle_cross", "circle_dot", "circle_x", "circle_y", "cross",
    "dash", "diamond", "diamond_cross", "diamond_dot", "dot", "hex", "hex_dot",
    "inverted_triangle", "plus", "square", "square_cross", "square_dot", "square_pin",
    "square_x", "star", "star_dot", "triangle", "triangle_dot", "triangle_pin", "x", "y",
];

pub const LINE_CAPS: &[&str] = &["butt", "round", "square"];
pub const LINE_JOINS: &[&str] = &["miter", "round", "bevel"];
pub const TEXT_ALIGNS: &[&str] = &["left", "right", "center"];
pub const TEXT_BASELINES: &[&str] =
    &["top", "middle", "bottom", "alphabetic", "hanging", "ideographic"];
pub const FONT_STYLES: &[&str] = &["normal", "italic", "bold", "bold italic"];

/// Hatch pattern names followed by their one-character abbreviations
pub const HATCH_PATTERNS: &[&str] = &[
    "blank", "dot", "ring", "horizontal_line", "vertical_line", "cross", "horizontal_dash",
    "vertical_dash", "spiral", "right_diagonal_line", "left_diagonal_line", "diagonal_cross",
    "right_diagonal_dash", "left_diagonal_dash", "horizontal_wave", "vertical_wave",
    "criss_cross", " ", ".", "o", "-", "|", "+", "\"", ":", "@", "/", "\\", "x", ",", "`", "v",
    ">", "*",
];

static FONT_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9]+(\.[0-9]+)?(%|em|ex|ch|ic|rem|vw|vh|vi|vb|vmin|vmax|cm|mm|q|in|pc|pt|px)$")
        .expect("valid font size regex")
});

// ===== Primitives =====

pub fn any() -> PropertyType {
    Kind::Any.into()
}

pub fn auto() -> PropertyType {
    Kind::Auto.into()
}

pub fn null() -> PropertyType {
    Kind::Null.into()
}

pub fn bool() -> PropertyType {
    Kind::Bool.into()
}

pub fn int() -> PropertyType {
    Kind::Int.into()
}

pub fn float() -> PropertyType {
    Kind::Float.into()
}

pub fn complex() -> PropertyType {
    Kind::Complex.into()
}

pub fn bytes() -> PropertyType {
    Kind::Bytes.into()
}

pub fn string() -> PropertyType {
    Kind::String.into()
}

pub fn date() -> PropertyType {
    Kind::Date.into()
}

pub fn datetime() -> PropertyType {
    Kind::Datetime.into()
}

pub fn timedelta() -> PropertyType {
    Kind::TimeDelta.into()
}

pub fn json() -> PropertyType {
    Kind::Json.into()
}

pub fn color() -> PropertyType {
    Kind::Color.into()
}

// ===== Refinements =====

pub fn non_negative(base: PropertyType) -> PropertyType {
    Kind::NonNegative(Box::new(base)).into()
}

pub fn positive(base: PropertyType) -> PropertyType {
    Kind::Positive(Box::new(base)).into()
}

/// Inclusive bounds
pub fn interval(base: PropertyType, start: f64, end: f64) -> PropertyType {
    Kind::Interval {
        base: Box::new(base),
        start,
        end,
    }
    .into()
}

pub fn percent() -> PropertyType {
    interval(float(), 0.0, 1.0)
}

pub fn byte() -> PropertyType {
    interval(int(), 0.0, 255.0)
}

pub fn size() -> PropertyType {
    non_negative(float())
}

pub fn alpha() -> PropertyType {
    percent().with_default(1.0).help("Opacity, from 0.0 (transparent) to 1.0 (opaque)")
}

pub fn angle() -> PropertyType {
    float()
}

/// String limited to the given literals; the first one is the default
pub fn enumeration<I, S>(members: I) -> PropertyType
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Kind::Enum(members.into_iter().map(Into::into).collect()).into()
}

/// String matching `pattern` from its first character
///
/// # Errors
///
/// Returns `InvalidDeclaration` when the pattern does not compile.
pub fn regex(pattern: &str) -> Result<PropertyType> {
    let re = Regex::new(pattern).map_err(|e| PropxError::InvalidDeclaration {
        class: "Regex".to_string(),
        property: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Kind::Regex(re).into())
}

/// CSS font size such as `12pt` or `1.5em`
pub fn font_size() -> PropertyType {
    Kind::Regex(FONT_SIZE.clone()).into()
}

pub fn non_empty(base: PropertyType) -> PropertyType {
    Kind::NonEmpty(Box::new(base)).into()
}

/// Line dash: a named pattern, `"4 2"` style lengths or a list of lengths
///
/// Names and length strings are stored as the list of lengths.
pub fn dash_pattern() -> PropertyType {
    Kind::DashPattern.into()
}

/// `auto` or `(min, max)` bounds, either side may be null
///
/// With `accept_datetime` the pair may also be datetimes. A pair whose min
/// is not below its max is rejected.
pub fn min_max_bounds(accept_datetime: bool) -> PropertyType {
    let mut candidates = vec![auto()];
    let mut sides = vec![float()];
    if accept_datetime {
        sides.push(datetime());
    }
    for side in sides {
        candidates.push(tuple(vec![side.clone(), side.clone()]));
        candidates.push(tuple(vec![nullable(side.clone()), side.clone()]));
        candidates.push(tuple(vec![side.clone(), nullable(side)]));
    }
    Kind::MinMaxBounds(Box::new(either(candidates))).into()
}

/// Categorical coordinate: a factor name or a 2 or 3 level tuple of names
pub fn factor() -> PropertyType {
    let name = non_empty(string());
    either(vec![
        name.clone(),
        tuple(vec![name.clone(), name.clone()]),
        tuple(vec![name.clone(), name.clone(), name]),
    ])
}

/// Sequence of factors sharing one nesting level
pub fn factor_seq() -> PropertyType {
    let name = non_empty(string());
    either(vec![
        seq(name.clone()),
        seq(tuple(vec![name.clone(), name.clone()])),
        seq(tuple(vec![name.clone(), name.clone(), name])),
    ])
}

// ===== Containers =====

pub fn tuple(items: Vec<PropertyType>) -> PropertyType {
    Kind::Tuple(items).into()
}

pub fn seq(item: PropertyType) -> PropertyType {
    Kind::Seq(Box::new(item)).into()
}

pub fn list(item: PropertyType) -> PropertyType {
    seq(item)
}

pub fn set(item: PropertyType) -> PropertyType {
    Kind::Set(Box::new(item)).into()
}

pub fn dict(key: PropertyType, value: PropertyType) -> PropertyType {
    Kind::Dict {
        key: Box::new(key),
        value: Box::new(value),
    }
    .into()
}

pub fn restricted_dict<I, S>(key: PropertyType, value: PropertyType, disallow: I) -> PropertyType
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Kind::RestrictedDict {
        key: Box::new(key),
        value: Box::new(value),
        disallow: disallow.into_iter().map(Into::into).collect(),
    }
    .into()
}

/// Mapping with a fixed set of named fields
pub fn structure(fields: Vec<StructField>) -> PropertyType {
    Kind::Struct(fields).into()
}

pub fn struct_field(name: &str, ty: PropertyType) -> StructField {
    StructField {
        name: name.to_string(),
        ty,
        optional: false,
    }
}

pub fn optional_field(name: &str, ty: PropertyType) -> StructField {
    StructField {
        name: name.to_string(),
        ty,
        optional: true,
    }
}

// ===== Unions and references =====

/// First matching candidate wins
pub fn either(candidates: Vec<PropertyType>) -> PropertyType {
    Kind::Either(candidates).into()
}

pub fn nullable(inner: PropertyType) -> PropertyType {
    Kind::Nullable(Box::new(inner)).into()
}

/// `inner` without null and without a default; the value must be given
pub fn non_nullable(inner: PropertyType) -> PropertyType {
    Kind::NonNullable(Box::new(inner)).into()
}

/// Accepts no value
pub fn nothing() -> PropertyType {
    Kind::Nothing.into()
}

/// Reference to a model of `class` or one of its subclasses
pub fn instance(class: &'static ModelClass) -> PropertyType {
    Kind::Instance(class).into()
}

// ===== Data specs =====

fn spec(name: &'static str, value_type: PropertyType, shorthand: Shorthand) -> DataSpecKind {
    DataSpecKind::new(name, value_type, shorthand)
}

pub fn number_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "NumberSpec",
        float(),
        Shorthand::LiteralFirst,
    )))
    .with_default(default)
}

pub fn int_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec("IntSpec", int(), Shorthand::LiteralFirst)))
        .with_default(default)
}

/// Angle spec; adds a `<name>_units` property (rad, deg, grad, turn)
pub fn angle_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(
        spec("AngleSpec", angle(), Shorthand::LiteralFirst).with_units(ANGLE_UNITS),
    ))
    .with_default(default)
}

/// Distance spec; adds a `<name>_units` property (data, screen)
pub fn distance_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(
        spec("DistanceSpec", float(), Shorthand::LiteralFirst).with_units(DISTANCE_UNITS),
    ))
    .with_default(default)
}

/// Size spec; adds a `<name>_units` property (screen, data)
pub fn size_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(
        spec("SizeSpec", size(), Shorthand::LiteralFirst).with_units(SIZE_UNITS),
    ))
    .with_default(default)
}

pub fn alpha_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "AlphaSpec",
        percent(),
        Shorthand::LiteralFirst,
    )))
    .with_default(default)
}

pub fn color_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "ColorSpec",
        nullable(color()),
        Shorthand::LiteralFirst,
    )))
    .with_default(default)
}

/// String spec: bare strings are field names, literals need `{value: ..}`
pub fn string_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "StringSpec",
        string(),
        Shorthand::FieldFirst,
    )))
    .with_default(default)
}

pub fn null_string_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "NullStringSpec",
        nullable(string()),
        Shorthand::FieldFirst,
    )))
    .with_default(default)
}

pub fn font_size_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "FontSizeSpec",
        font_size(),
        Shorthand::LiteralFirst,
    )))
    .with_default(default)
}

/// Nullable distance spec; adds a `<name>_units` property (data, screen)
pub fn null_distance_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(
        spec("NullDistanceSpec", nullable(float()), Shorthand::LiteralFirst)
            .with_units(DISTANCE_UNITS),
    ))
    .with_default(default)
}

/// Dash pattern spec; named patterns are literals, other strings are fields
pub fn dash_pattern_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "DashPatternSpec",
        dash_pattern(),
        Shorthand::LiteralFirst,
    )))
    .with_default(default)
}

fn enum_spec(name: &'static str, members: &[&str], default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        name,
        enumeration(members.iter().copied()),
        Shorthand::LiteralFirst,
    )))
    .with_default(default)
}

pub fn marker_spec(default: impl Into<Value>) -> PropertyType {
    enum_spec("MarkerSpec", MARKER_TYPES, default)
}

pub fn line_cap_spec(default: impl Into<Value>) -> PropertyType {
    enum_spec("LineCapSpec", LINE_CAPS, default)
}

pub fn line_join_spec(default: impl Into<Value>) -> PropertyType {
    enum_spec("LineJoinSpec", LINE_JOINS, default)
}

pub fn text_align_spec(default: impl Into<Value>) -> PropertyType {
    enum_spec("TextAlignSpec", TEXT_ALIGNS, default)
}

pub fn text_baseline_spec(default: impl Into<Value>) -> PropertyType {
    enum_spec("TextBaselineSpec", TEXT_BASELINES, default)
}

pub fn font_style_spec(default: impl Into<Value>) -> PropertyType {
    enum_spec("FontStyleSpec", FONT_STYLES, default)
}

/// Hatch pattern spec; null means no hatching
pub fn hatch_pattern_spec(default: impl Into<Value>) -> PropertyType {
    PropertyType::new(Kind::DataSpec(spec(
        "HatchPatternSpec",
        nullable(enumeration(HATCH_PATTERNS.iter().copied())),
        Shorthand::LiteralFirst,
    )))
    .with_default(default)
}

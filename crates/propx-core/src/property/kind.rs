//! The closed algebra of property kinds
//!
//! Every kind knows how to describe itself, strictly check a value and
//! coerce a value through the `accepts` rules of its children.

use super::color;
use super::dataspec::DataSpecKind;
use super::property_type::PropertyType;
use super::temporal;
use crate::errors::ValidationError;
use crate::model::ModelClass;
use crate::value::Value;
use chrono::TimeDelta;
use regex::Regex;
use std::sync::LazyLock;

/// Named line dash patterns and their on/off lengths in pixels
pub const DASH_PATTERNS: &[(&str, &[i64])] = &[
    ("solid", &[]),
    ("dashed", &[6]),
    ("dotted", &[2, 4]),
    ("dotdash", &[2, 4, 6, 4]),
    ("dashdot", &[6, 4, 2, 4]),
];

static DASH_LENGTHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(\s+\d+)*)?$").expect("valid dash pattern regex"));

fn dash_lengths(value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::String(s) => match DASH_PATTERNS.iter().find(|(name, _)| *name == s.as_str()) {
            Some((_, lengths)) => Some(lengths.to_vec()),
            None if DASH_LENGTHS.is_match(s) => {
                s.split_whitespace().map(|n| n.parse().ok()).collect()
            }
            None => None,
        },
        Value::List(items) => items.iter().map(Value::as_i64).collect(),
        _ => None,
    }
}

/// Position on a common millisecond axis, for ordering bounds
fn axis_ms(value: &Value) -> Option<f64> {
    match value {
        Value::Int(_) | Value::Float(_) => value.as_f64(),
        Value::Datetime(dt) => Some(temporal::datetime_to_ms(dt)),
        Value::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| temporal::datetime_to_ms(&dt)),
        Value::TimeDelta(td) => Some(temporal::timedelta_to_ms(td)),
        _ => None,
    }
}

/// Named field of a struct kind
#[derive(Clone, Debug)]
pub struct StructField {
    pub name: String,
    pub ty: PropertyType,
    pub optional: bool,
}

#[derive(Clone)]
pub enum Kind {
    Any,
    Auto,
    Null,
    Bool,
    Int,
    Float,
    Complex,
    Bytes,
    String,
    Date,
    Datetime,
    TimeDelta,
    Json,
    Color,
    NonNegative(Box<PropertyType>),
    Positive(Box<PropertyType>),
    Interval {
        base: Box<PropertyType>,
        start: f64,
        end: f64,
    },
    Enum(Vec<String>),
    Regex(Regex),
    NonEmpty(Box<PropertyType>),
    Tuple(Vec<PropertyType>),
    Seq(Box<PropertyType>),
    Set(Box<PropertyType>),
    Dict {
        key: Box<PropertyType>,
        value: Box<PropertyType>,
    },
    RestrictedDict {
        key: Box<PropertyType>,
        value: Box<PropertyType>,
        disallow: Vec<String>,
    },
    Struct(Vec<StructField>),
    Either(Vec<PropertyType>),
    Nullable(Box<PropertyType>),
    /// Inner type with null excluded and no default
    NonNullable(Box<PropertyType>),
    /// Accepts no value at all
    Nothing,
    /// `auto` or a `(min, max)` pair where a given min is below a given max
    MinMaxBounds(Box<PropertyType>),
    /// Named pattern, space separated lengths or a list of lengths
    DashPattern,
    Instance(&'static ModelClass),
    DataSpec(DataSpecKind),
}

fn join(types: &[PropertyType]) -> String {
    types
        .iter()
        .map(PropertyType::describe)
        .collect::<Vec<_>>()
        .join(", ")
}

fn item_detail(index: usize, err: &ValidationError) -> String {
    format!("item {}: {}", index, err)
}

impl Kind {
    /// Type description used in validation messages
    pub fn describe(&self) -> String {
        match self {
            Kind::Any => "Any".into(),
            Kind::Auto => "Auto".into(),
            Kind::Null => "Null".into(),
            Kind::Bool => "Bool".into(),
            Kind::Int => "Int".into(),
            Kind::Float => "Float".into(),
            Kind::Complex => "Complex".into(),
            Kind::Bytes => "Bytes".into(),
            Kind::String => "String".into(),
            Kind::Date => "Date".into(),
            Kind::Datetime => "Datetime".into(),
            Kind::TimeDelta => "TimeDelta".into(),
            Kind::Json => "JSON".into(),
            Kind::Color => "Color".into(),
            Kind::NonNegative(base) => format!("NonNegative({})", base.describe()),
            Kind::Positive(base) => format!("Positive({})", base.describe()),
            Kind::Interval { base, start, end } => {
                format!("Interval({}, {}, {})", base.describe(), start, end)
            }
            Kind::Enum(members) => {
                let quoted: Vec<String> = members.iter().map(|m| format!("'{}'", m)).collect();
                format!("Enum({})", quoted.join(", "))
            }
            Kind::Regex(re) => format!("Regex('{}')", re.as_str()),
            Kind::NonEmpty(base) => format!("NonEmpty({})", base.describe()),
            Kind::Tuple(items) => format!("Tuple({})", join(items)),
            Kind::Seq(item) => format!("Seq({})", item.describe()),
            Kind::Set(item) => format!("Set({})", item.describe()),
            Kind::Dict { key, value } => format!("Dict({}, {})", key.describe(), value.describe()),
            Kind::RestrictedDict {
                key,
                value,
                disallow,
            } => format!(
                "RestrictedDict({}, {}, disallow=[{}])",
                key.describe(),
                value.describe(),
                disallow.join(", ")
            ),
            Kind::Struct(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|f| {
                        if f.optional {
                            format!("{}=Optional({})", f.name, f.ty.describe())
                        } else {
                            format!("{}={}", f.name, f.ty.describe())
                        }
                    })
                    .collect();
                format!("Struct({})", parts.join(", "))
            }
            Kind::Either(candidates) => format!("Either({})", join(candidates)),
            Kind::Nullable(inner) => format!("Nullable({})", inner.describe()),
            Kind::NonNullable(inner) => format!("NonNullable({})", inner.describe()),
            Kind::Nothing => "Nothing".into(),
            Kind::MinMaxBounds(_) => "MinMaxBounds".into(),
            Kind::DashPattern => "DashPattern".into(),
            Kind::Instance(class) => format!("Instance({})", class.name()),
            Kind::DataSpec(spec) => spec.describe(),
        }
    }

    fn mismatch(&self, value: &Value) -> ValidationError {
        ValidationError::new(self.describe(), value)
    }

    /// Strict validation, no coercion
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `value` does not satisfy the kind.
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let ok = match (self, value) {
            (Kind::Any, _) => true,
            (Kind::Auto, Value::String(s)) => s == "auto",
            (Kind::Null, Value::Null) => true,
            (Kind::Bool, Value::Bool(_)) => true,
            (Kind::Int, Value::Int(_)) => true,
            (Kind::Float, Value::Int(_) | Value::Float(_)) => true,
            (Kind::Complex, Value::Int(_) | Value::Float(_) | Value::Complex { .. }) => true,
            (Kind::Bytes, Value::Bytes(_)) => true,
            (Kind::String, Value::String(_)) => true,
            (Kind::Date, Value::Date(_)) => true,
            (Kind::Date, v) => temporal::date_from_wire(v).is_some(),
            (Kind::Datetime, Value::Datetime(_) | Value::Date(_)) => true,
            (Kind::Datetime, v) => temporal::datetime_from_wire(v).is_some(),
            (Kind::TimeDelta, Value::TimeDelta(_)) => true,
            (Kind::TimeDelta, v) => temporal::timedelta_from_wire(v).is_some(),
            (Kind::DashPattern, v) => dash_lengths(v).is_some(),
            (Kind::Json, v) => v.is_json_compatible(),
            (Kind::Color, v) => color::is_color(v),
            (Kind::Enum(members), Value::String(s)) => members.iter().any(|m| m == s),
            (Kind::Regex(re), Value::String(s)) => re.find(s).is_some_and(|m| m.start() == 0),
            (Kind::Instance(class), Value::Model(model)) => model.class().is_subclass_of(class),

            (Kind::NonNegative(base), v) => {
                base.validate(v).map_err(|e| self.mismatch(v).with_detail(e.to_string()))?;
                v.as_f64().is_some_and(|x| x >= 0.0)
            }
            (Kind::Positive(base), v) => {
                base.validate(v).map_err(|e| self.mismatch(v).with_detail(e.to_string()))?;
                v.as_f64().is_some_and(|x| x > 0.0)
            }
            (Kind::Interval { base, start, end }, v) => {
                base.validate(v).map_err(|e| self.mismatch(v).with_detail(e.to_string()))?;
                v.as_f64().is_some_and(|x| *start <= x && x <= *end)
            }
            (Kind::NonEmpty(base), v) => {
                base.validate(v).map_err(|e| self.mismatch(v).with_detail(e.to_string()))?;
                v.len().is_some_and(|n| n > 0)
            }

            (Kind::Tuple(types), Value::List(items)) => {
                if types.len() != items.len() {
                    return Err(self.mismatch(value).with_detail(format!(
                        "expected {} items, got {}",
                        types.len(),
                        items.len()
                    )));
                }
                for (i, (ty, item)) in types.iter().zip(items).enumerate() {
                    ty.validate(item)
                        .map_err(|e| self.mismatch(value).with_detail(item_detail(i, &e)))?;
                }
                true
            }
            (Kind::Seq(ty), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    ty.validate(item)
                        .map_err(|e| self.mismatch(value).with_detail(item_detail(i, &e)))?;
                }
                true
            }
            (Kind::Set(ty), Value::Set(members)) => {
                for (i, member) in members.iter().enumerate() {
                    ty.validate(member)
                        .map_err(|e| self.mismatch(value).with_detail(item_detail(i, &e)))?;
                    if members[..i].contains(member) {
                        return Err(self
                            .mismatch(value)
                            .with_detail(format!("duplicate member {}", member)));
                    }
                }
                true
            }
            (Kind::Dict { key, value: val }, Value::Dict(pairs)) => {
                self.check_pairs(key, val, pairs, value)?;
                true
            }
            (
                Kind::RestrictedDict {
                    key,
                    value: val,
                    disallow,
                },
                Value::Dict(pairs),
            ) => {
                self.check_pairs(key, val, pairs, value)?;
                self.check_disallowed(pairs, disallow, value)?;
                true
            }
            (Kind::Struct(fields), Value::Dict(pairs)) => {
                self.check_struct_keys(fields, pairs, value)?;
                for (k, v) in pairs {
                    if let Some(field) = fields.iter().find(|f| k.as_str() == Some(f.name.as_str())) {
                        field.ty.validate(v).map_err(|e| {
                            self.mismatch(value)
                                .with_detail(format!("field '{}': {}", field.name, e))
                        })?;
                    }
                }
                true
            }
            (Kind::Either(candidates), v) => candidates.iter().any(|c| c.is_valid(v)),
            (Kind::Nullable(inner), v) => v.is_null() || inner.is_valid(v),
            (Kind::NonNullable(_), Value::Null) => false,
            (Kind::NonNullable(inner), v) => {
                inner.validate(v).map_err(|e| self.mismatch(v).with_detail(e.to_string()))?;
                true
            }
            (Kind::MinMaxBounds(inner), v) => {
                inner.validate(v).map_err(|e| self.mismatch(v).with_detail(e.to_string()))?;
                self.check_bounds_order(v)?;
                true
            }
            (Kind::DataSpec(spec), v) => return spec.check(v),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(self.mismatch(value))
        }
    }

    fn check_bounds_order(&self, value: &Value) -> Result<(), ValidationError> {
        let Some([lo, hi]) = value.as_items() else {
            return Ok(());
        };
        if let (Some(lo), Some(hi)) = (axis_ms(lo), axis_ms(hi)) {
            if lo >= hi {
                return Err(self
                    .mismatch(value)
                    .with_detail("invalid bounds: maximum smaller than minimum"));
            }
        }
        Ok(())
    }

    fn check_pairs(
        &self,
        key: &PropertyType,
        val: &PropertyType,
        pairs: &[(Value, Value)],
        whole: &Value,
    ) -> Result<(), ValidationError> {
        for (k, v) in pairs {
            key.validate(k)
                .map_err(|e| self.mismatch(whole).with_detail(format!("key {}: {}", k, e)))?;
            val.validate(v).map_err(|e| {
                self.mismatch(whole)
                    .with_detail(format!("value for key {}: {}", k, e))
            })?;
        }
        Ok(())
    }

    fn check_disallowed(
        &self,
        pairs: &[(Value, Value)],
        disallow: &[String],
        whole: &Value,
    ) -> Result<(), ValidationError> {
        for (k, _) in pairs {
            if let Some(name) = k.as_str().filter(|name| disallow.iter().any(|d| d == name)) {
                return Err(self
                    .mismatch(whole)
                    .with_detail(format!("disallowed key '{}'", name)));
            }
        }
        Ok(())
    }

    fn check_struct_keys(
        &self,
        fields: &[StructField],
        pairs: &[(Value, Value)],
        whole: &Value,
    ) -> Result<(), ValidationError> {
        for (k, _) in pairs {
            let known = k
                .as_str()
                .is_some_and(|name| fields.iter().any(|f| f.name == name));
            if !known {
                let key = k.as_str().map_or_else(|| k.to_string(), str::to_string);
                return Err(self
                    .mismatch(whole)
                    .with_detail(format!("unexpected key '{}'", key)));
            }
        }
        for field in fields.iter().filter(|f| !f.optional) {
            if !pairs.iter().any(|(k, _)| k.as_str() == Some(field.name.as_str())) {
                return Err(self
                    .mismatch(whole)
                    .with_detail(format!("missing key '{}'", field.name)));
            }
        }
        Ok(())
    }

    /// Coerce a value that failed [`Kind::check`] through nested `accepts` rules
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when no nested coercion applies.
    pub fn coerce(&self, value: Value) -> Result<Value, ValidationError> {
        match (self, value) {
            (Kind::NonNegative(base) | Kind::Positive(base) | Kind::NonEmpty(base), v)
            | (Kind::Interval { base, .. }, v) => {
                let prepared = base
                    .prepare_value(v.clone())
                    .map_err(|e| self.mismatch(&v).with_detail(e.to_string()))?;
                self.check(&prepared)?;
                Ok(prepared)
            }
            (Kind::Tuple(types), Value::List(items)) if types.len() == items.len() => {
                let whole = Value::List(items.clone());
                let mut out = Vec::with_capacity(items.len());
                for (i, (ty, item)) in types.iter().zip(items).enumerate() {
                    out.push(
                        ty.prepare_value(item)
                            .map_err(|e| self.mismatch(&whole).with_detail(item_detail(i, &e)))?,
                    );
                }
                Ok(Value::List(out))
            }
            (Kind::Seq(ty), Value::List(items)) => {
                let whole = Value::List(items.clone());
                let out = prepare_items(ty, items)
                    .map_err(|(i, e)| self.mismatch(&whole).with_detail(item_detail(i, &e)))?;
                Ok(Value::List(out))
            }
            (Kind::Set(ty), Value::Set(members)) => {
                let whole = Value::Set(members.clone());
                let out = prepare_items(ty, members)
                    .map_err(|(i, e)| self.mismatch(&whole).with_detail(item_detail(i, &e)))?;
                Ok(Value::set(out))
            }
            (Kind::Dict { key, value: val }, Value::Dict(pairs)) => {
                let whole = Value::Dict(pairs.clone());
                self.prepare_pairs(key, val, pairs, &whole)
            }
            (
                Kind::RestrictedDict {
                    key,
                    value: val,
                    disallow,
                },
                Value::Dict(pairs),
            ) => {
                let whole = Value::Dict(pairs.clone());
                self.check_disallowed(&pairs, disallow, &whole)?;
                self.prepare_pairs(key, val, pairs, &whole)
            }
            (Kind::Struct(fields), Value::Dict(pairs)) => {
                let whole = Value::Dict(pairs.clone());
                self.check_struct_keys(fields, &pairs, &whole)?;
                let mut out = Vec::with_capacity(pairs.len());
                for (k, v) in pairs {
                    let prepared = match fields.iter().find(|f| k.as_str() == Some(f.name.as_str())) {
                        Some(field) => field.ty.prepare_value(v).map_err(|e| {
                            self.mismatch(&whole)
                                .with_detail(format!("field '{}': {}", field.name, e))
                        })?,
                        None => v,
                    };
                    out.push((k, prepared));
                }
                Ok(Value::Dict(out))
            }
            (Kind::Either(candidates), v) => candidates
                .iter()
                .find_map(|c| c.prepare_value(v.clone()).ok())
                .ok_or_else(|| self.mismatch(&v)),
            (Kind::Nullable(inner), v) => {
                if v.is_null() {
                    return Ok(v);
                }
                inner
                    .prepare_value(v.clone())
                    .map_err(|e| self.mismatch(&v).with_detail(e.to_string()))
            }
            (Kind::NonNullable(inner), v) if !v.is_null() => inner
                .prepare_value(v.clone())
                .map_err(|e| self.mismatch(&v).with_detail(e.to_string())),
            (Kind::MinMaxBounds(inner), v) => {
                let prepared = inner
                    .prepare_value(v.clone())
                    .map_err(|e| self.mismatch(&v).with_detail(e.to_string()))?;
                self.check_bounds_order(&prepared)?;
                Ok(prepared)
            }
            (Kind::DataSpec(spec), v) => spec.coerce(v),
            (_, v) => {
                self.check(&v)?;
                Ok(v)
            }
        }
    }

    /// The stored form of a value that passed [`Kind::check`]
    ///
    /// Wire forms of temporal values become native values and dash patterns
    /// become length lists; anything else is returned as is.
    pub fn canonical(&self, value: Value) -> Value {
        match (self, value) {
            (Kind::Date, v @ Value::String(_)) => {
                temporal::date_from_wire(&v).map_or(v, Value::Date)
            }
            (Kind::Datetime, v @ (Value::Int(_) | Value::Float(_))) => {
                temporal::datetime_from_wire(&v).map_or(v, Value::Datetime)
            }
            (Kind::TimeDelta, v @ (Value::Int(_) | Value::Float(_))) => {
                temporal::timedelta_from_wire(&v).map_or(v, Value::TimeDelta)
            }
            (Kind::DashPattern, v) => match dash_lengths(&v) {
                Some(lengths) => Value::list(lengths),
                None => v,
            },
            (
                Kind::Nullable(inner)
                | Kind::NonNullable(inner)
                | Kind::NonNegative(inner)
                | Kind::Positive(inner)
                | Kind::NonEmpty(inner)
                | Kind::MinMaxBounds(inner),
                v,
            )
            | (Kind::Interval { base: inner, .. }, v) => inner.canonical(v),
            (Kind::Either(candidates), v) => match candidates.iter().find(|c| c.is_valid(&v)) {
                Some(candidate) => candidate.canonical(v),
                None => v,
            },
            (Kind::Tuple(types), Value::List(items)) if types.len() == items.len() => Value::List(
                types.iter().zip(items).map(|(ty, item)| ty.canonical(item)).collect(),
            ),
            (Kind::Seq(ty), Value::List(items)) => {
                Value::List(items.into_iter().map(|item| ty.canonical(item)).collect())
            }
            (Kind::Set(ty), Value::Set(members)) => {
                Value::set(members.into_iter().map(|member| ty.canonical(member)))
            }
            (
                Kind::Dict { key, value: val } | Kind::RestrictedDict { key, value: val, .. },
                Value::Dict(pairs),
            ) => Value::dict(
                pairs
                    .into_iter()
                    .map(|(k, v)| (key.canonical(k), val.canonical(v))),
            ),
            (Kind::Struct(fields), Value::Dict(pairs)) => Value::Dict(
                pairs
                    .into_iter()
                    .map(|(k, v)| {
                        let field = fields.iter().find(|f| k.as_str() == Some(f.name.as_str()));
                        match field {
                            Some(field) => {
                                let v = field.ty.canonical(v);
                                (k, v)
                            }
                            None => (k, v),
                        }
                    })
                    .collect(),
            ),
            (Kind::DataSpec(spec), v) => spec.canonical(v),
            (_, v) => v,
        }
    }

    fn prepare_pairs(
        &self,
        key: &PropertyType,
        val: &PropertyType,
        pairs: Vec<(Value, Value)>,
        whole: &Value,
    ) -> Result<Value, ValidationError> {
        let mut out = Vec::with_capacity(pairs.len());
        for (k, v) in pairs {
            let shown = k.to_string();
            let k = key
                .prepare_value(k)
                .map_err(|e| self.mismatch(whole).with_detail(format!("key {}: {}", shown, e)))?;
            let v = val.prepare_value(v).map_err(|e| {
                self.mismatch(whole)
                    .with_detail(format!("value for key {}: {}", shown, e))
            })?;
            out.push((k, v));
        }
        Ok(Value::dict(out))
    }

    /// Default used when a declaration does not provide one
    ///
    /// `None` means the property starts unset.
    pub fn intrinsic_default(&self) -> Option<Value> {
        match self {
            Kind::Any | Kind::Null | Kind::Json | Kind::Nullable(_) => Some(Value::Null),
            Kind::Auto | Kind::MinMaxBounds(_) => Some(Value::from("auto")),
            Kind::DashPattern => Some(Value::List(Vec::new())),
            Kind::Bool => Some(Value::Bool(false)),
            Kind::Int => Some(Value::Int(0)),
            Kind::Float => Some(Value::Float(0.0)),
            Kind::Complex => Some(Value::Complex { re: 0.0, im: 0.0 }),
            Kind::Bytes => Some(Value::Bytes(Vec::new())),
            Kind::String => Some(Value::String(String::new())),
            Kind::TimeDelta => Some(Value::TimeDelta(TimeDelta::zero())),
            Kind::Enum(members) => members.first().map(|m| Value::String(m.clone())),
            Kind::Seq(_) => Some(Value::List(Vec::new())),
            Kind::Set(_) => Some(Value::Set(Vec::new())),
            Kind::Dict { .. } | Kind::RestrictedDict { .. } => Some(Value::Dict(Vec::new())),
            Kind::Either(candidates) => candidates.first().and_then(PropertyType::literal_default),
            Kind::NonNegative(base)
            | Kind::Positive(base)
            | Kind::NonEmpty(base)
            | Kind::Interval { base, .. } => base
                .literal_default()
                .filter(|default| self.check(default).is_ok()),
            Kind::Regex(_) => Some(Value::String(String::new()))
                .filter(|default| self.check(default).is_ok()),
            Kind::Date
            | Kind::Datetime
            | Kind::Color
            | Kind::Tuple(_)
            | Kind::Struct(_)
            | Kind::Instance(_)
            | Kind::NonNullable(_)
            | Kind::Nothing
            | Kind::DataSpec(_) => None,
        }
    }
}

fn prepare_items(
    ty: &PropertyType,
    items: Vec<Value>,
) -> Result<Vec<Value>, (usize, ValidationError)> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| ty.prepare_value(item).map_err(|e| (i, e)))
        .collect()
}

impl std::fmt::Debug for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

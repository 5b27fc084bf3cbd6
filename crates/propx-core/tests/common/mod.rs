use propx_core::model::{ClassBuilder, ModelClass, ModelRef};
use propx_core::property::dataspec;
use propx_core::property::props;
use propx_core::rules::codes;
use propx_core::{Result, Value};
use std::collections::HashSet;

pub const SIZING_POLICY: [&str; 4] = ["fixed", "fit", "min", "max"];
pub const SIZING_MODE: [&str; 7] = [
    "stretch_width",
    "stretch_height",
    "stretch_both",
    "scale_width",
    "scale_height",
    "scale_both",
    "fixed",
];
pub const ALIGN: [&str; 3] = ["start", "center", "end"];
pub const LOCATION: [&str; 4] = ["above", "below", "left", "right"];

// ===== Layout models =====

fn declare_layout_dom(b: &mut ClassBuilder) -> Result<()> {
    let margin = props::nullable(props::tuple(vec![props::int(); 4]))
        .with_default((0, 0, 0, 0))
        .accepts(props::tuple(vec![props::int(); 2]), expand_margin)
        .accepts(props::int(), |v| Value::list(vec![v; 4]));

    b.property("disabled", props::bool())
        .property("visible", props::bool().with_default(true))
        .property("width", props::nullable(props::non_negative(props::int())))
        .property("height", props::nullable(props::non_negative(props::int())))
        .property("min_width", props::nullable(props::non_negative(props::int())))
        .property("min_height", props::nullable(props::non_negative(props::int())))
        .property("max_width", props::nullable(props::non_negative(props::int())))
        .property("max_height", props::nullable(props::non_negative(props::int())))
        .property("margin", margin)
        .property(
            "width_policy",
            props::either(vec![props::auto(), props::enumeration(SIZING_POLICY)]),
        )
        .property(
            "height_policy",
            props::either(vec![props::auto(), props::enumeration(SIZING_POLICY)]),
        )
        .property(
            "aspect_ratio",
            props::either(vec![props::null(), props::auto(), props::float()]),
        )
        .property("sizing_mode", props::nullable(props::enumeration(SIZING_MODE)))
        .property(
            "align",
            props::either(vec![
                props::auto(),
                props::enumeration(ALIGN),
                props::tuple(vec![props::enumeration(ALIGN), props::enumeration(ALIGN)]),
            ]),
        )
        .property("background", props::nullable(props::color()))
        .property("css_classes", props::list(props::string()))
        .property(
            "styles",
            props::dict(props::string(), props::nullable(props::string())),
        )
        .property("tags", props::list(props::any()))
        .check("fixed_sizing_mode", codes::FIXED_SIZING_MODE, check_fixed_sizing_mode)
        .check("fixed_width_policy", codes::FIXED_WIDTH_POLICY, check_fixed_width_policy)
        .check("fixed_height_policy", codes::FIXED_HEIGHT_POLICY, check_fixed_height_policy)
        .check("min_preferred_max_width", codes::MIN_PREFERRED_MAX_WIDTH, check_width_bounds)
        .check("min_preferred_max_height", codes::MIN_PREFERRED_MAX_HEIGHT, check_height_bounds);
    Ok(())
}

/// `(vertical, horizontal)` becomes `(v, h, v, h)`
fn expand_margin(value: Value) -> Value {
    let expanded = match value.as_items() {
        Some([vertical, horizontal]) => Some(Value::list([
            vertical.clone(),
            horizontal.clone(),
            vertical.clone(),
            horizontal.clone(),
        ])),
        _ => None,
    };
    expanded.unwrap_or(value)
}

fn check_fixed_sizing_mode(model: &ModelRef) -> Result<Option<String>> {
    if model.get("sizing_mode")? == Value::from("fixed")
        && (model.get("width")?.is_null() || model.get("height")?.is_null())
    {
        return Ok(Some(model.to_string()));
    }
    Ok(None)
}

fn check_fixed_policy(model: &ModelRef, policy: &str, size: &str) -> Result<Option<String>> {
    if model.get(policy)? == Value::from("fixed") && model.get(size)?.is_null() {
        return Ok(Some(model.to_string()));
    }
    Ok(None)
}

fn check_fixed_width_policy(model: &ModelRef) -> Result<Option<String>> {
    check_fixed_policy(model, "width_policy", "width")
}

fn check_fixed_height_policy(model: &ModelRef) -> Result<Option<String>> {
    check_fixed_policy(model, "height_policy", "height")
}

fn check_bounds(model: &ModelRef, min: &str, preferred: &str, max: &str) -> Result<Option<String>> {
    let min = model.get(min)?.as_i64();
    let preferred = model.get(preferred)?.as_i64();
    let max = model.get(max)?.as_i64();
    let ordered = |a: Option<i64>, b: Option<i64>| match (a, b) {
        (Some(a), Some(b)) => a <= b,
        _ => true,
    };
    if ordered(min, preferred) && ordered(preferred, max) && ordered(min, max) {
        return Ok(None);
    }
    Ok(Some(model.to_string()))
}

fn check_width_bounds(model: &ModelRef) -> Result<Option<String>> {
    check_bounds(model, "min_width", "width", "max_width")
}

fn check_height_bounds(model: &ModelRef) -> Result<Option<String>> {
    check_bounds(model, "min_height", "height", "max_height")
}

fn first_repeated(children: &[ModelRef]) -> Option<&ModelRef> {
    let mut seen = HashSet::new();
    children.iter().find(|child| !seen.insert(child.id().clone()))
}

fn child_models(value: &Value) -> Vec<ModelRef> {
    value
        .as_items()
        .unwrap_or_default()
        .iter()
        .filter_map(|item| match item {
            Value::Model(model) => Some(model.clone()),
            Value::List(cell) => cell.first().and_then(Value::as_model).cloned(),
            _ => None,
        })
        .collect()
}

fn check_empty_layout(model: &ModelRef) -> Result<Option<String>> {
    if child_models(&model.get("children")?).is_empty() {
        return Ok(Some(model.to_string()));
    }
    Ok(None)
}

fn check_repeated_children(model: &ModelRef) -> Result<Option<String>> {
    let children = child_models(&model.get("children")?);
    Ok(first_repeated(&children).map(|_| model.to_string()))
}

fn declare_box(b: &mut ClassBuilder) -> Result<()> {
    b.property("children", props::list(props::instance(&LAYOUT_DOM)))
        .property("spacing", props::int())
        .check("empty_layout", codes::EMPTY_LAYOUT, check_empty_layout)
        .check("repeated_layout_child", codes::REPEATED_LAYOUT_CHILD, check_repeated_children);
    Ok(())
}

fn declare_row(_: &mut ClassBuilder) -> Result<()> {
    Ok(())
}

fn declare_column(_: &mut ClassBuilder) -> Result<()> {
    Ok(())
}

fn declare_grid_box(b: &mut ClassBuilder) -> Result<()> {
    let cell = props::tuple(vec![props::instance(&LAYOUT_DOM), props::int(), props::int()]);
    b.property("children", props::list(cell))
        .property("spacing", props::int())
        .check("repeated_layout_child", codes::REPEATED_LAYOUT_CHILD, check_repeated_children);
    Ok(())
}

fn declare_spacer(_: &mut ClassBuilder) -> Result<()> {
    Ok(())
}

fn declare_fixed_spacer(b: &mut ClassBuilder) -> Result<()> {
    b.override_default("width", 10)
        .override_default("height", 10)
        .override_default("sizing_mode", "fixed");
    Ok(())
}

#[allow(dead_code)]
pub static LAYOUT_DOM: ModelClass = ModelClass::abstract_class("LayoutDOM", None, declare_layout_dom);
#[allow(dead_code)]
pub static BOX: ModelClass = ModelClass::abstract_class("Box", Some(&LAYOUT_DOM), declare_box);
#[allow(dead_code)]
pub static ROW: ModelClass = ModelClass::new("Row", Some(&BOX), declare_row);
#[allow(dead_code)]
pub static COLUMN: ModelClass = ModelClass::new("Column", Some(&BOX), declare_column);
#[allow(dead_code)]
pub static GRID_BOX: ModelClass = ModelClass::new("GridBox", Some(&LAYOUT_DOM), declare_grid_box);
#[allow(dead_code)]
pub static SPACER: ModelClass = ModelClass::new("Spacer", Some(&LAYOUT_DOM), declare_spacer);
#[allow(dead_code)]
pub static FIXED_SPACER: ModelClass =
    ModelClass::new("FixedSpacer", Some(&SPACER), declare_fixed_spacer);

// ===== Tabs =====

fn declare_panel(b: &mut ClassBuilder) -> Result<()> {
    b.property("title", props::string())
        .property("child", props::instance(&LAYOUT_DOM))
        .property("closable", props::bool());
    Ok(())
}

/// `(title, child)` pairs become panels
fn tab_to_panel(value: Value) -> Value {
    let panels: Option<Vec<Value>> = value.as_items().and_then(|items| {
        items
            .iter()
            .map(|item| match item.as_items() {
                Some([title, child]) => ModelRef::new(
                    &PANEL,
                    [("title", title.clone()), ("child", child.clone())],
                )
                .ok()
                .map(Value::Model),
                _ => None,
            })
            .collect()
    });
    panels.map_or(value, Value::List)
}

fn declare_tabs(b: &mut ClassBuilder) -> Result<()> {
    let tabs = props::list(props::instance(&PANEL)).accepts(
        props::list(props::tuple(vec![props::string(), props::instance(&LAYOUT_DOM)])),
        tab_to_panel,
    );
    b.property("tabs", tabs)
        .property("tabs_location", props::enumeration(LOCATION))
        .property("active", props::int());
    Ok(())
}

#[allow(dead_code)]
pub static PANEL: ModelClass = ModelClass::new("TabPanel", None, declare_panel);
#[allow(dead_code)]
pub static TABS: ModelClass = ModelClass::new("Tabs", Some(&LAYOUT_DOM), declare_tabs);

// ===== Property bundles =====

fn declare_line_props(b: &mut ClassBuilder) -> Result<()> {
    b.property("line_color", props::color_spec("black"))
        .property("line_width", props::number_spec(1.0))
        .property("line_alpha", props::alpha_spec(1.0));
    Ok(())
}

fn declare_card(b: &mut ClassBuilder) -> Result<()> {
    b.include(&LINE_PROPS, "border")
        .property("child", props::nullable(props::instance(&LAYOUT_DOM)));
    Ok(())
}

#[allow(dead_code)]
pub static LINE_PROPS: ModelClass = ModelClass::abstract_class("LineProps", None, declare_line_props);
#[allow(dead_code)]
pub static CARD: ModelClass = ModelClass::new("Card", Some(&LAYOUT_DOM), declare_card);

// ===== Glyphs and plots =====

fn declare_wedge(b: &mut ClassBuilder) -> Result<()> {
    b.property("x", props::number_spec(dataspec::field("x")))
        .property("y", props::number_spec(dataspec::field("y")))
        .property("radius", props::distance_spec(dataspec::field("radius")))
        .property("start_angle", props::angle_spec(0.0))
        .property("fill_color", props::color_spec("gray"))
        .property("fill_alpha", props::alpha_spec(1.0))
        .property("label", props::string_spec(Value::Null).required())
        .property("marker", props::marker_spec("circle"))
        .property("text_font_size", props::font_size_spec("16px"));
    Ok(())
}

fn declare_data_source(b: &mut ClassBuilder) -> Result<()> {
    b.property("data", props::dict(props::string(), props::seq(props::any())))
        .property("name", props::nullable(props::string()));
    Ok(())
}

fn declare_plot(b: &mut ClassBuilder) -> Result<()> {
    b.property("title", props::string())
        .property("inner_width", props::int().readonly())
        .property("inner_height", props::int().readonly())
        .property("scratch", props::any().not_serialized())
        .property(
            "source",
            props::instance(&DATA_SOURCE).with_instance_default(&DATA_SOURCE),
        )
        .property("renderers", props::list(props::instance(&WEDGE)));
    Ok(())
}

#[allow(dead_code)]
pub static WEDGE: ModelClass = ModelClass::new("Wedge", None, declare_wedge);
#[allow(dead_code)]
pub static DATA_SOURCE: ModelClass = ModelClass::new("ColumnDataSource", None, declare_data_source);
#[allow(dead_code)]
pub static PLOT: ModelClass = ModelClass::new("Plot", Some(&LAYOUT_DOM), declare_plot);

// ===== Helpers =====

/// A row holding `children`
#[allow(dead_code)]
pub fn row(children: &[&ModelRef]) -> ModelRef {
    let children = Value::list(children.iter().map(|c| Value::from(*c)));
    ModelRef::new(&ROW, [("children", children)]).unwrap()
}

/// A column holding `children`
#[allow(dead_code)]
pub fn column(children: &[&ModelRef]) -> ModelRef {
    let children = Value::list(children.iter().map(|c| Value::from(*c)));
    ModelRef::new(&COLUMN, [("children", children)]).unwrap()
}

/// A default spacer
#[allow(dead_code)]
pub fn spacer() -> ModelRef {
    ModelRef::with_defaults(&SPACER).unwrap()
}

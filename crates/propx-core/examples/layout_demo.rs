//! Layout Model Demonstration
//!
//! This example declares a tiny layout vocabulary on top of the property
//! system and walks through its lifecycle.
//!
//! Key concepts illustrated:
//! 1. Declaring classes with defaults, accepts coercions and checks
//! 2. Type-checked assignment and change notification
//! 3. Integrity validation over a model graph
//! 4. Serialization into the id-referenced wire document

use propx_core::logging_facility::{init, Profile};
use propx_core::model::{ClassBuilder, ModelClass, ModelRef};
use propx_core::property::props;
use propx_core::rules::{codes, Validator};
use propx_core::{serialize_graph, Result, Value};
use std::collections::HashSet;

fn declare_widget(b: &mut ClassBuilder) -> Result<()> {
    let margin = props::tuple(vec![props::int(); 4])
        .with_default((0, 0, 0, 0))
        .accepts(props::int(), |v| Value::list(vec![v; 4]))
        .help("Space around the widget: top, right, bottom, left");

    b.property("label", props::string())
        .property("width", props::nullable(props::non_negative(props::int())))
        .property("margin", margin)
        .property("background", props::nullable(props::color()));
    Ok(())
}

fn repeated_child(model: &ModelRef) -> Result<Option<String>> {
    let children = model.get("children")?;
    let mut seen = HashSet::new();
    let repeated = children
        .as_items()
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_model)
        .any(|child| !seen.insert(child.id().clone()));
    Ok(repeated.then(|| model.to_string()))
}

fn declare_stack(b: &mut ClassBuilder) -> Result<()> {
    b.property("children", props::list(props::instance(&WIDGET)))
        .check("repeated_child", codes::REPEATED_LAYOUT_CHILD, repeated_child);
    Ok(())
}

static WIDGET: ModelClass = ModelClass::new("Widget", None, declare_widget);
static STACK: ModelClass = ModelClass::new("Stack", Some(&WIDGET), declare_stack);

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);
    println!("=== propx Layout Demo ===\n");

    // ===== Part 1: Construction and assignment =====
    println!("## Part 1: Construction\n");

    let ok = ModelRef::new(&WIDGET, [("label", Value::from("OK"))])?;
    let cancel = ModelRef::new(&WIDGET, [("label", Value::from("Cancel"))])?;
    println!("Created {} and {}", ok, cancel);

    ok.set("margin", 8)?;
    println!("margin = 8 is stored as {}", ok.get("margin")?);

    match ok.set("width", -10) {
        Ok(()) => println!("unexpected: negative width accepted"),
        Err(err) => println!("rejected: {}", err),
    }

    // ===== Part 2: Change notification =====
    println!("\n## Part 2: Change Notification\n");

    cancel.on_change(|name, old, new| {
        let old = old.map_or_else(|| "<unset>".to_string(), Value::to_string);
        println!("  {} changed: {} -> {}", name, old, new);
        Ok(())
    });
    cancel.set("background", "firebrick")?;
    cancel.set("background", "firebrick")?;
    println!("second identical write notified nobody");

    // ===== Part 3: Validation =====
    println!("\n## Part 3: Validation\n");

    let stack = ModelRef::new(
        &STACK,
        [("children", Value::list([&ok, &cancel, &ok]))],
    )?;
    let issues = Validator::default().check(&[stack.clone()]);
    for issue in &issues.errors {
        println!("error: {}", issue);
    }

    stack.set("children", Value::list([&ok, &cancel]))?;
    let issues = Validator::default().check(&[stack.clone()]);
    println!("after fixing the layout: {} issue(s)", issues.len());

    // ===== Part 4: Serialization =====
    println!("\n## Part 4: Serialization\n");

    let graph = serialize_graph(&[stack], false)?;
    println!("{}", serde_json::to_string_pretty(&graph.to_json()?)?);

    Ok(())
}

//! Model classes and property table resolution
//!
//! A [`ModelClass`] is a static declaration: a name, an optional parent and a
//! declaration function that registers properties and checks on a
//! [`ClassBuilder`]. The resolved property table is computed on first use
//! and shared by every instance.
//!
//! ```
//! use propx_core::model::{ClassBuilder, ModelClass, ModelRef};
//! use propx_core::property::props;
//! use propx_core::{Result, Value};
//!
//! fn declare_button(b: &mut ClassBuilder) -> Result<()> {
//!     b.property("label", props::string().with_default("Button"))
//!         .property("disabled", props::bool());
//!     Ok(())
//! }
//!
//! static BUTTON: ModelClass = ModelClass::new("Button", None, declare_button);
//!
//! let button = ModelRef::with_defaults(&BUTTON).unwrap();
//! assert_eq!(button.get("label").unwrap(), Value::from("Button"));
//! ```

use super::descriptor::{PropertyDescriptor, PropertyTable};
use crate::errors::{PropxError, Result};
use crate::property::{DefaultValue, PropertyType};
use crate::rules::{CheckDef, CheckFn, IssueCode};
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Registers a class's own properties and checks
pub type DeclareFn = fn(&mut ClassBuilder) -> Result<()>;

pub struct ModelClass {
    name: &'static str,
    parent: Option<&'static ModelClass>,
    declare: DeclareFn,
    is_abstract: bool,
    resolved: OnceLock<Result<ResolvedClass>>,
}

#[derive(Clone)]
struct ResolvedClass {
    table: PropertyTable,
    checks: Vec<CheckDef>,
}

impl ModelClass {
    pub const fn new(
        name: &'static str,
        parent: Option<&'static ModelClass>,
        declare: DeclareFn,
    ) -> Self {
        Self {
            name,
            parent,
            declare,
            is_abstract: false,
            resolved: OnceLock::new(),
        }
    }

    /// A class that cannot be instantiated: a base class or a property bundle
    pub const fn abstract_class(
        name: &'static str,
        parent: Option<&'static ModelClass>,
        declare: DeclareFn,
    ) -> Self {
        Self {
            name,
            parent,
            declare,
            is_abstract: true,
            resolved: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static ModelClass> {
        self.parent
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Whether this class is `other` or derives from it
    pub fn is_subclass_of(&self, other: &ModelClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.parent;
        }
        false
    }

    /// Class names from this class up to the root
    pub fn lineage(&self) -> Vec<&'static str> {
        let mut names = vec![self.name];
        let mut current = self.parent;
        while let Some(class) = current {
            names.push(class.name);
            current = class.parent;
        }
        names
    }

    /// The resolved property table, inherited entries included
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeclaration` when this class or an ancestor is
    /// declared inconsistently.
    pub fn properties(&self) -> Result<&PropertyTable> {
        self.resolved().map(|r| &r.table)
    }

    /// Integrity checks registered on this class and its ancestors
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeclaration` when the class fails to resolve.
    pub fn checks(&self) -> Result<&[CheckDef]> {
        self.resolved().map(|r| r.checks.as_slice())
    }

    fn resolved(&self) -> Result<&ResolvedClass> {
        match self.resolved.get_or_init(|| self.resolve()) {
            Ok(resolved) => Ok(resolved),
            Err(err) => Err(err.clone()),
        }
    }

    fn declaration_error(&self, property: &str, reason: impl Into<String>) -> PropxError {
        PropxError::InvalidDeclaration {
            class: self.name.to_string(),
            property: property.to_string(),
            reason: reason.into(),
        }
    }

    fn resolve(&self) -> Result<ResolvedClass> {
        let start = Instant::now();
        log_op_start!("resolve_class", model_class = self.name);

        match self.merge_declarations() {
            Ok(resolved) => {
                log_op_end!(
                    "resolve_class",
                    since = start,
                    model_class = self.name,
                    property_count = resolved.table.len(),
                    check_count = resolved.checks.len()
                );
                Ok(resolved)
            }
            Err(err) => {
                log_op_error!("resolve_class", err.clone(), since = start, model_class = self.name);
                Err(err)
            }
        }
    }

    /// Parent table first, then this class's declarations in order
    fn merge_declarations(&self) -> Result<ResolvedClass> {
        let (mut table, mut checks) = match self.parent {
            Some(parent) => {
                let inherited = parent.resolved()?;
                (inherited.table.clone(), inherited.checks.clone())
            }
            None => (PropertyTable::default(), Vec::new()),
        };

        let mut builder = ClassBuilder::default();
        (self.declare)(&mut builder)?;

        let mut own = HashSet::new();
        for declaration in builder.declarations {
            match declaration {
                Declaration::Property { name, ty } => {
                    if !own.insert(name.clone()) {
                        return Err(self.declaration_error(&name, "declared twice"));
                    }
                    let units = ty.dataspec().and_then(|spec| spec.units().copied());
                    table.insert(PropertyDescriptor::new(&name, ty, self.name));
                    if let Some(units) = units {
                        let units_name = format!("{}_units", name);
                        if !own.insert(units_name.clone()) {
                            return Err(self.declaration_error(&units_name, "declared twice"));
                        }
                        table.insert(PropertyDescriptor::new(
                            &units_name,
                            units.property_type(),
                            self.name,
                        ));
                    }
                }
                Declaration::Override { name, default } => {
                    let Some(existing) = table.get(&name) else {
                        return Err(
                            self.declaration_error(&name, "override of an undeclared property")
                        );
                    };
                    let ty = existing.property_type().clone().with_default_value(default);
                    let owner = existing.owner();
                    table.insert(PropertyDescriptor::new(&name, ty, owner));
                }
                Declaration::Alias { name, target } => {
                    if table.contains(&name) {
                        return Err(self.declaration_error(&name, "alias shadows a property"));
                    }
                    if !own.insert(name.clone()) {
                        return Err(self.declaration_error(&name, "declared twice"));
                    }
                    if !table.contains(&target) {
                        return Err(self.declaration_error(
                            &name,
                            format!("alias of undeclared property '{}'", target),
                        ));
                    }
                    table.insert_alias(&name, &target);
                }
                Declaration::Include { bundle, prefix } => {
                    for included in bundle.properties()?.iter() {
                        let name = format!("{}_{}", prefix, included.name());
                        if !own.insert(name.clone()) {
                            return Err(self.declaration_error(&name, "declared twice"));
                        }
                        table.insert(PropertyDescriptor::new(
                            &name,
                            included.property_type().clone(),
                            self.name,
                        ));
                    }
                }
            }
        }

        for check in builder.checks {
            match checks.iter_mut().find(|c| c.name == check.name) {
                Some(slot) => *slot = check,
                None => checks.push(check),
            }
        }

        for descriptor in table.iter() {
            let ty = descriptor.property_type();
            if let Some(default) = ty.literal_default() {
                ty.validate(&default).map_err(|e| {
                    self.declaration_error(descriptor.name(), format!("invalid default: {}", e))
                })?;
            }
        }

        Ok(ResolvedClass { table, checks })
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.name)
            .field("parent", &self.parent.map(|p| p.name))
            .field("abstract", &self.is_abstract)
            .finish()
    }
}

enum Declaration {
    Property {
        name: String,
        ty: PropertyType,
    },
    Override {
        name: String,
        default: DefaultValue,
    },
    Alias {
        name: String,
        target: String,
    },
    Include {
        bundle: &'static ModelClass,
        prefix: String,
    },
}

/// Collects one class's own declarations
#[derive(Default)]
pub struct ClassBuilder {
    declarations: Vec<Declaration>,
    checks: Vec<CheckDef>,
}

impl ClassBuilder {
    /// Declare a property; it replaces an inherited one of the same name
    pub fn property(&mut self, name: &str, ty: PropertyType) -> &mut Self {
        self.declarations.push(Declaration::Property {
            name: name.to_string(),
            ty,
        });
        self
    }

    /// Replace the default of an inherited property, keeping its type
    pub fn override_default(&mut self, name: &str, default: impl Into<Value>) -> &mut Self {
        self.declarations.push(Declaration::Override {
            name: name.to_string(),
            default: DefaultValue::Value(default.into()),
        });
        self
    }

    /// Replace the default of an inherited property with a per-instance factory
    pub fn override_default_factory<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        self.declarations.push(Declaration::Override {
            name: name.to_string(),
            default: DefaultValue::Factory(Arc::new(factory)),
        });
        self
    }

    /// Make `name` another name for the property `target`
    ///
    /// Reads, writes and constructor keywords through `name` go to `target`;
    /// change events and serialization use `target`.
    pub fn alias(&mut self, name: &str, target: &str) -> &mut Self {
        self.declarations.push(Declaration::Alias {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Copy every property of `bundle` in as `<prefix>_<name>`
    pub fn include(&mut self, bundle: &'static ModelClass, prefix: &str) -> &mut Self {
        self.declarations.push(Declaration::Include {
            bundle,
            prefix: prefix.to_string(),
        });
        self
    }

    /// Register an integrity check; it replaces an inherited check of the same name
    pub fn check(&mut self, name: &'static str, code: IssueCode, run: CheckFn) -> &mut Self {
        self.checks.push(CheckDef { name, code, run });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::props;
    use crate::rules::codes;

    fn declare_base(b: &mut ClassBuilder) -> Result<()> {
        b.property("width", props::nullable(props::int()))
            .property("visible", props::bool().with_default(true))
            .check("no_width", codes::EXT_WARNING, |_| Ok(None));
        Ok(())
    }

    fn declare_derived(b: &mut ClassBuilder) -> Result<()> {
        b.override_default("width", 100)
            .property("visible", props::either(vec![props::bool(), props::auto()]))
            .property("label", props::string())
            .check("no_width", codes::EXT_ERROR, |_| Ok(None));
        Ok(())
    }

    fn declare_twice(b: &mut ClassBuilder) -> Result<()> {
        b.property("label", props::string())
            .property("label", props::int());
        Ok(())
    }

    fn declare_bad_override(b: &mut ClassBuilder) -> Result<()> {
        b.override_default("missing", 1);
        Ok(())
    }

    fn declare_aliased(b: &mut ClassBuilder) -> Result<()> {
        b.property("label", props::string()).alias("text", "label");
        Ok(())
    }

    fn declare_bad_alias(b: &mut ClassBuilder) -> Result<()> {
        b.alias("size", "width");
        b.alias("height", "missing");
        Ok(())
    }

    fn declare_shadowing_alias(b: &mut ClassBuilder) -> Result<()> {
        b.alias("visible", "width");
        Ok(())
    }

    fn declare_bad_default(b: &mut ClassBuilder) -> Result<()> {
        b.property("count", props::int().with_default("many"));
        Ok(())
    }

    static BASE: ModelClass = ModelClass::abstract_class("Base", None, declare_base);
    static DERIVED: ModelClass = ModelClass::new("Derived", Some(&BASE), declare_derived);
    static TWICE: ModelClass = ModelClass::new("Twice", None, declare_twice);
    static BAD_OVERRIDE: ModelClass =
        ModelClass::new("BadOverride", Some(&BASE), declare_bad_override);
    static BAD_DEFAULT: ModelClass = ModelClass::new("BadDefault", None, declare_bad_default);
    static ALIASED: ModelClass = ModelClass::new("Aliased", Some(&BASE), declare_aliased);
    static BAD_ALIAS: ModelClass = ModelClass::new("BadAlias", Some(&BASE), declare_bad_alias);
    static SHADOWING_ALIAS: ModelClass =
        ModelClass::new("ShadowingAlias", Some(&BASE), declare_shadowing_alias);

    #[test]
    fn test_child_replaces_parent_in_place() {
        let table = DERIVED.properties().unwrap();
        assert_eq!(table.names(), vec!["width", "visible", "label"]);
        let visible = table.get("visible").unwrap();
        assert_eq!(visible.owner(), "Derived");
        assert_eq!(visible.property_type().describe(), "Either(Bool, Auto)");
    }

    #[test]
    fn test_override_replaces_only_default() {
        let width = DERIVED.properties().unwrap().get("width").unwrap();
        assert_eq!(width.property_type().describe(), "Nullable(Int)");
        assert_eq!(width.property_type().literal_default(), Some(Value::Int(100)));
        assert_eq!(width.owner(), "Base");
    }

    #[test]
    fn test_checks_override_by_name() {
        let checks = DERIVED.checks().unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].code, codes::EXT_ERROR);
    }

    #[test]
    fn test_subclass_relation() {
        assert!(DERIVED.is_subclass_of(&BASE));
        assert!(DERIVED.is_subclass_of(&DERIVED));
        assert!(!BASE.is_subclass_of(&DERIVED));
        assert_eq!(DERIVED.lineage(), vec!["Derived", "Base"]);
    }

    #[test]
    fn test_declaration_errors() {
        assert!(matches!(
            TWICE.properties(),
            Err(PropxError::InvalidDeclaration { ref property, .. }) if property == "label"
        ));
        assert!(matches!(
            BAD_OVERRIDE.properties(),
            Err(PropxError::InvalidDeclaration { ref property, .. }) if property == "missing"
        ));
        assert!(matches!(
            BAD_DEFAULT.properties(),
            Err(PropxError::InvalidDeclaration { ref reason, .. }) if reason.starts_with("invalid default")
        ));
    }

    #[test]
    fn test_alias_is_not_a_table_entry() {
        let table = ALIASED.properties().unwrap();
        assert_eq!(table.names(), vec!["width", "visible", "label"]);
        assert_eq!(table.alias_target("text"), Some("label"));
        assert_eq!(table.get("text").unwrap().name(), "label");
    }

    #[test]
    fn test_alias_declaration_errors() {
        assert!(matches!(
            BAD_ALIAS.properties(),
            Err(PropxError::InvalidDeclaration { ref property, ref reason, .. })
                if property == "height" && reason.contains("'missing'")
        ));
        assert!(matches!(
            SHADOWING_ALIAS.properties(),
            Err(PropxError::InvalidDeclaration { ref reason, .. }) if reason == "alias shadows a property"
        ));
    }
}

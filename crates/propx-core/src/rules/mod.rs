pub mod checks;
pub mod graph;
pub mod issues;
pub mod validation;

pub use checks::{CheckDef, CheckFn};
pub use graph::collect_models;
pub use issues::{codes, Issue, IssueCode, Severity, ValidationIssues};
pub use validation::{
    check_integrity, process_validation_issues, ValidationLevel, Validator, ValidatorConfig,
};

//! Diagnostic codes and collected issues

use crate::model::ModelRef;
use propx_core_types::ModelId;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn prefix(self) -> char {
        match self {
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }
}

/// A registered diagnostic: numeric code, symbolic name and description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueCode {
    pub code: u16,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

impl IssueCode {
    pub const fn error(code: u16, name: &'static str, description: &'static str) -> Self {
        Self {
            code,
            name,
            description,
            severity: Severity::Error,
        }
    }

    pub const fn warning(code: u16, name: &'static str, description: &'static str) -> Self {
        Self {
            code,
            name,
            description,
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.severity.prefix(), self.code, self.name)
    }
}

/// Known diagnostic codes
pub mod codes {
    use super::IssueCode;

    pub const MIN_PREFERRED_MAX_WIDTH: IssueCode = IssueCode::error(
        1022,
        "MIN_PREFERRED_MAX_WIDTH",
        "Expected min_width <= width <= max_width",
    );
    pub const MIN_PREFERRED_MAX_HEIGHT: IssueCode = IssueCode::error(
        1023,
        "MIN_PREFERRED_MAX_HEIGHT",
        "Expected min_height <= height <= max_height",
    );
    pub const REPEATED_LAYOUT_CHILD: IssueCode = IssueCode::error(
        1027,
        "REPEATED_LAYOUT_CHILD",
        "The same model can't be used multiple times in a layout",
    );
    pub const EXT_ERROR: IssueCode =
        IssueCode::error(9999, "EXT", "Custom extension reports error");

    pub const EMPTY_LAYOUT: IssueCode =
        IssueCode::warning(1002, "EMPTY_LAYOUT", "Layout has no children");
    pub const FIXED_SIZING_MODE: IssueCode = IssueCode::warning(
        1005,
        "FIXED_SIZING_MODE",
        "'fixed' sizing mode requires width and height to be set",
    );
    pub const FIXED_WIDTH_POLICY: IssueCode = IssueCode::warning(
        1006,
        "FIXED_WIDTH_POLICY",
        "'fixed' width policy requires width to be set",
    );
    pub const FIXED_HEIGHT_POLICY: IssueCode = IssueCode::warning(
        1007,
        "FIXED_HEIGHT_POLICY",
        "'fixed' height policy requires height to be set",
    );
    pub const EXT_WARNING: IssueCode =
        IssueCode::warning(9999, "EXT", "Custom extension reports warning");
}

/// One finding of an integrity check on one model
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub code: IssueCode,
    pub model_id: ModelId,
    /// `Class(id='...')` of the originating model
    pub model: String,
    pub extra: String,
}

impl Issue {
    pub fn new(code: IssueCode, model: &ModelRef, extra: impl Into<String>) -> Self {
        Self {
            code,
            model_id: model.id().clone(),
            model: model.to_string(),
            extra: extra.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.code, self.code.description, self.extra)
    }
}

/// Issues collected over a model graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationIssues {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationIssues {
    pub fn push(&mut self, issue: Issue) {
        match issue.severity() {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Payloads aggregated per `(severity, code)`, in discovery order
    pub fn by_code(&self) -> BTreeMap<(Severity, u16), Vec<&str>> {
        let mut grouped: BTreeMap<(Severity, u16), Vec<&str>> = BTreeMap::new();
        for issue in self.errors.iter().chain(&self.warnings) {
            grouped
                .entry((issue.severity(), issue.code.code))
                .or_default()
                .push(&issue.extra);
        }
        grouped
    }

    /// Issues carrying `code`
    pub fn with_code(&self, code: IssueCode) -> Vec<&Issue> {
        self.errors
            .iter()
            .chain(&self.warnings)
            .filter(|issue| issue.code == code)
            .collect()
    }
}

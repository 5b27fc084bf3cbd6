use super::graph::collect_models;
use super::issues::{Issue, Severity, ValidationIssues};
use crate::core_types::schema;
use crate::model::ModelRef;
use crate::{log_op_end, log_op_start};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Instant;

/// Which integrity checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    None,
    Errors,
    #[default]
    All,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatorConfig {
    pub level: ValidationLevel,
    /// Warning codes that are not reported
    pub silenced: HashSet<u16>,
}

impl ValidatorConfig {
    pub fn new(level: ValidationLevel) -> Self {
        Self {
            level,
            silenced: HashSet::new(),
        }
    }

    pub fn silence(mut self, code: u16) -> Self {
        self.silenced.insert(code);
        self
    }

    fn runs(&self, severity: Severity, code: u16) -> bool {
        match (self.level, severity) {
            (ValidationLevel::None, _) => false,
            (_, Severity::Error) => true,
            (ValidationLevel::Errors, Severity::Warning) => false,
            (ValidationLevel::All, Severity::Warning) => !self.silenced.contains(&code),
        }
    }
}

/// Run the registered checks of every model in `models`
///
/// A check that fails (returns `Err`) contributes no issue; the run
/// continues with the next check.
pub fn check_integrity(models: &[ModelRef], config: &ValidatorConfig) -> ValidationIssues {
    let mut issues = ValidationIssues::default();
    if config.level == ValidationLevel::None {
        return issues;
    }

    for model in models {
        let checks = match model.class().checks() {
            Ok(checks) => checks,
            Err(err) => {
                tracing::debug!(
                    component = module_path!(),
                    op = "check_integrity",
                    model_class = model.class().name(),
                    error = %err,
                    "skipping model whose class failed to resolve"
                );
                continue;
            }
        };
        for check in checks {
            if !config.runs(check.code.severity, check.code.code) {
                continue;
            }
            match (check.run)(model) {
                Ok(Some(extra)) => issues.push(Issue::new(check.code, model, extra)),
                Ok(None) => {}
                Err(err) => tracing::debug!(
                    component = module_path!(),
                    op = "check_integrity",
                    model_id = %model.id(),
                    check = check.name,
                    error = %err,
                    "check failed; no issue recorded"
                ),
            }
        }
    }
    issues
}

/// Log every issue: errors at ERROR, warnings at WARN
pub fn process_validation_issues(issues: &ValidationIssues) {
    for issue in &issues.errors {
        tracing::error!(
            component = module_path!(),
            op = "check_integrity",
            event = schema::EVENT_ISSUE,
            issue.code = issue.code.code,
            issue.name = issue.code.name,
            issue.extra = %issue.extra,
            model_id = %issue.model_id,
            "{}",
            issue
        );
    }
    for issue in &issues.warnings {
        tracing::warn!(
            component = module_path!(),
            op = "check_integrity",
            event = schema::EVENT_ISSUE,
            issue.code = issue.code.code,
            issue.name = issue.code.name,
            issue.extra = %issue.extra,
            model_id = %issue.model_id,
            "{}",
            issue
        );
    }
}

/// Runs integrity checks over model graphs
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Check every model reachable from `roots`, log and return the issues
    pub fn check(&self, roots: &[ModelRef]) -> ValidationIssues {
        let start = Instant::now();
        log_op_start!("check_integrity", root_count = roots.len());

        let models = collect_models(roots);
        let issues = check_integrity(&models, &self.config);
        process_validation_issues(&issues);

        log_op_end!(
            "check_integrity",
            since = start,
            model_count = models.len(),
            error_count = issues.errors.len(),
            warning_count = issues.warnings.len()
        );
        issues
    }
}

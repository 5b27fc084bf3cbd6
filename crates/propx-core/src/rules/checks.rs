use super::issues::IssueCode;
use crate::errors::Result;
use crate::model::ModelRef;

/// An integrity check: `Ok(Some(payload))` reports an issue, `Ok(None)` none
///
/// An `Err` (e.g. reading an unset property) counts as no issue.
pub type CheckFn = fn(&ModelRef) -> Result<Option<String>>;

/// A check registered on a model class
#[derive(Clone, Copy)]
pub struct CheckDef {
    pub name: &'static str,
    pub code: IssueCode,
    pub run: CheckFn,
}

impl std::fmt::Debug for CheckDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDef")
            .field("name", &self.name)
            .field("code", &self.code.to_string())
            .finish()
    }
}

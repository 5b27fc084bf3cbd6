//! Runtime settings
//!
//! Loaded through the `config` crate from `PROPX_`-prefixed environment
//! variables or from a TOML document:
//!
//! | key | env | values |
//! |---|---|---|
//! | `validation_level` | `PROPX_VALIDATION_LEVEL` | `none`, `errors`, `all` |
//! | `property_validation` | `PROPX_PROPERTY_VALIDATION` | `true`, `false` |
//! | `silenced_warnings` | `PROPX_SILENCED_WARNINGS` | comma separated codes |
//! | `log_profile` | `PROPX_LOG_PROFILE` | `development`, `production`, `test` |

use crate::errors::Result;
use crate::logging_facility::{self, Profile};
use crate::property::set_property_validation;
use crate::rules::{ValidationLevel, ValidatorConfig};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;

const ENV_PREFIX: &str = "PROPX";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub validation_level: ValidationLevel,
    pub property_validation: bool,
    pub silenced_warnings: Vec<u16>,
    pub log_profile: Profile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            validation_level: ValidationLevel::All,
            property_validation: true,
            silenced_warnings: Vec::new(),
            log_profile: Profile::Development,
        }
    }
}

fn environment(source: Option<HashMap<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("silenced_warnings")
        .source(source)
}

impl Settings {
    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns `Config` when a variable does not parse.
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .add_source(environment(None))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Load from environment-style variables (`PROPX_VALIDATION_LEVEL=...`)
    ///
    /// # Errors
    ///
    /// Returns `Config` when a variable does not parse.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let settings = Config::builder()
            .add_source(environment(Some(source)))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Load from a TOML document
    ///
    /// # Errors
    ///
    /// Returns `Config` when the document does not parse.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Install the process-wide property validation default
    pub fn apply(&self) {
        set_property_validation(self.property_validation);
        tracing::debug!(
            component = module_path!(),
            op = "apply_settings",
            property_validation = self.property_validation,
            validation_level = ?self.validation_level,
            "applied settings"
        );
    }

    /// Initialize logging with the configured profile
    pub fn init_logging(&self) {
        logging_facility::init(self.log_profile);
    }

    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            level: self.validation_level,
            silenced: self.silenced_warnings.iter().copied().collect(),
        }
    }
}

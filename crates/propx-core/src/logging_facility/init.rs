//! Subscriber installation

use serde::Deserialize;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output style of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human readable lines, `propx_core=debug`
    #[default]
    Development,
    /// One JSON object per event, `propx_core=info`
    Production,
    /// Bare registry; tests install the capture layer instead
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is not set
    fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "propx_core=debug",
            Profile::Production | Profile::Test => "propx_core=info",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has an effect. If another subscriber
/// is already installed (the test capture, say) it is left in place.
///
/// ```
/// use propx_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// init(Profile::Development); // no effect
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(profile.filter())
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(profile.filter())
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
        if installed.is_ok() {
            tracing::debug!(component = module_path!(), profile = ?profile, "logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init(Profile::Test);
        init(Profile::Development);
    }

    #[test]
    fn test_profile_names() {
        let profile: Profile = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(profile, Profile::Production);
        assert_eq!(Profile::default(), Profile::Development);
        assert_eq!(Profile::Development.default_directive(), "propx_core=debug");
    }
}

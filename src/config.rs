use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable consulted by [`RuntimeConfig::from_env`].
pub const CHECKED_MODE_ENV: &str = "PROTO_FIELD_STORE_CHECKED";

/// Policy for out-of-range element reads.
///
/// `Checked` reports them as [`FieldError::IndexOutOfRange`]; `Unchecked`
/// returns a fallback (the type's zero value, or the unrecognized sentinel
/// for enum reads). Argument and key errors are reported in both modes.
///
/// [`FieldError::IndexOutOfRange`]: crate::error::FieldError::IndexOutOfRange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    Checked,
    Unchecked,
}

impl AccessMode {
    #[inline]
    pub fn is_checked(self) -> bool {
        self == AccessMode::Checked
    }
}

impl Default for AccessMode {
    /// Debug builds check, release builds don't.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            AccessMode::Checked
        } else {
            AccessMode::Unchecked
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub access_mode: AccessMode,
}

impl RuntimeConfig {
    /// Resolve the access mode from [`CHECKED_MODE_ENV`], falling back to the
    /// build default when it is unset or unparseable.
    pub fn from_env() -> Self {
        let raw = std::env::var(CHECKED_MODE_ENV).ok();
        let config = Self::from_env_value(raw.as_deref());
        debug!(access_mode = ?config.access_mode, "resolved field store config");
        config
    }

    pub(crate) fn from_env_value(raw: Option<&str>) -> Self {
        let access_mode = match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => AccessMode::Checked,
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => AccessMode::Unchecked,
            Some(v) => {
                debug!(var = CHECKED_MODE_ENV, value = %v, "ignoring unrecognized access mode value");
                AccessMode::default()
            }
            None => AccessMode::default(),
        };
        RuntimeConfig { access_mode }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

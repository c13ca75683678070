use enlace_error::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the navigation treats a `requires_data` section whose dataset is empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiresDataPolicy {
    /// Visibility is decided by permissions alone.
    #[default]
    Show,
    /// Keep the entry but flag it disabled.
    Disable,
    /// Drop the entry, and its category if nothing else survives.
    Hide,
}

impl fmt::Display for RequiresDataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match self {
            RequiresDataPolicy::Show => "show",
            RequiresDataPolicy::Disable => "disable",
            RequiresDataPolicy::Hide => "hide",
        };
        write!(f, "{}", policy)
    }
}

impl FromStr for RequiresDataPolicy {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "show" => Ok(RequiresDataPolicy::Show),
            "disable" => Ok(RequiresDataPolicy::Disable),
            "hide" => Ok(RequiresDataPolicy::Hide),
            _ => Err(SettingsError::InvalidValue {
                key: "requires_data_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

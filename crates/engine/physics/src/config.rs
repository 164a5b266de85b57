//! Physics configuration
//!
//! Every config struct in this crate deserializes from TOML with all fields
//! optional; missing fields take their defaults.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Downward acceleration applied to airborne bodies, in units/s²
pub const GRAVITY: f64 = -80.0;

/// World-wide simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration for airborne bodies (negative is down)
    pub gravity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: GRAVITY }
    }
}

/// Parse a config from TOML text
pub fn from_toml_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(toml::from_str(text)?)
}

/// Load a config from a TOML file
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let text = std::fs::read_to_string(path.as_ref())?;
    from_toml_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhysicsError;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PhysicsConfig = from_toml_str("").unwrap();
        assert_eq!(config, PhysicsConfig::default());
        assert_eq!(config.gravity, GRAVITY);
    }

    #[test]
    fn test_gravity_override() {
        let config: PhysicsConfig = from_toml_str("gravity = -9.8").unwrap();
        assert_eq!(config.gravity, -9.8);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = from_toml_str::<PhysicsConfig>("gravity = \"down\"").unwrap_err();
        assert!(matches!(err, PhysicsError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_toml::<PhysicsConfig>("/nonexistent/meshwalk.toml").unwrap_err();
        assert!(matches!(err, PhysicsError::Io(_)));
    }
}

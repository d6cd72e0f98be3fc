//! Configuration loaded from environment variables or TOML.

use std::env;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::security::{DEFAULT_SESSION_COMPONENT, SessionPaths};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("session component alias must not be empty")]
    EmptySessionComponent,

    #[error("session component alias '{0}' must not contain '.'")]
    DottedSessionComponent(String),

    #[error("{var} must be a boolean (true/false/1/0), got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("invalid menu access TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Menu access configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    /// Alias of the session component on pages and layouts (default: session).
    pub session_component: String,

    /// Also write `viewBag.isHidden = true` when hiding in Phase B
    /// (default: true).
    pub mirror_view_bag: bool,

    /// Write `viewBag.isHidden = "1"` on the item passed to the resolve hook,
    /// for hosts that still render from that object (default: false).
    pub legacy_item_flag: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            session_component: DEFAULT_SESSION_COMPONENT.to_string(),
            mirror_view_bag: true,
            legacy_item_flag: false,
        }
    }
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// - `MENU_ACCESS_SESSION_COMPONENT` (default: session)
    /// - `MENU_ACCESS_MIRROR_VIEW_BAG` (default: true)
    /// - `MENU_ACCESS_LEGACY_ITEM_FLAG` (default: false)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let session_component = env::var("MENU_ACCESS_SESSION_COMPONENT")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.session_component);

        let mirror_view_bag = bool_var("MENU_ACCESS_MIRROR_VIEW_BAG", defaults.mirror_view_bag)
            .context("MENU_ACCESS_MIRROR_VIEW_BAG is invalid")?;

        let legacy_item_flag = bool_var("MENU_ACCESS_LEGACY_ITEM_FLAG", defaults.legacy_item_flag)
            .context("MENU_ACCESS_LEGACY_ITEM_FLAG is invalid")?;

        let config = Self {
            session_component,
            mirror_view_bag,
            legacy_item_flag,
        };
        config
            .validate()
            .context("MENU_ACCESS_SESSION_COMPONENT is invalid")?;
        Ok(config)
    }

    /// Parse configuration from a TOML document. Missing keys take defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants not expressible in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_component.trim().is_empty() {
            return Err(ConfigError::EmptySessionComponent);
        }
        if self.session_component.contains('.') {
            return Err(ConfigError::DottedSessionComponent(
                self.session_component.clone(),
            ));
        }
        Ok(())
    }

    /// Settings paths for the configured session component.
    pub fn session_paths(&self) -> SessionPaths {
        SessionPaths::for_component(&self.session_component)
    }
}

fn bool_var(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_bool(var, &value),
        Err(_) => Ok(default),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AccessConfig::default();
        assert_eq!(config.session_component, "session");
        assert!(config.mirror_view_bag);
        assert!(!config.legacy_item_flag);
        assert_eq!(
            config.session_paths().allowed_groups,
            "components.session.allowedUserGroups"
        );
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let config = AccessConfig::from_toml_str(
            r#"
session_component = "account"
legacy_item_flag = true
"#,
        )
        .unwrap();

        assert_eq!(config.session_component, "account");
        assert!(config.mirror_view_bag);
        assert!(config.legacy_item_flag);
        assert_eq!(config.session_paths().security, "components.account.security");
    }

    #[test]
    fn toml_rejects_bad_input() {
        assert!(matches!(
            AccessConfig::from_toml_str("session_component = \"\""),
            Err(ConfigError::EmptySessionComponent)
        ));
        assert!(matches!(
            AccessConfig::from_toml_str("session_component = \"   \""),
            Err(ConfigError::EmptySessionComponent)
        ));
        assert!(matches!(
            AccessConfig::from_toml_str("session_component = \"a.b\""),
            Err(ConfigError::DottedSessionComponent(_))
        ));
        assert!(matches!(
            AccessConfig::from_toml_str("unknown = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn parse_bool_values() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", " 1 ").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        let err = parse_bool("X", "maybe").unwrap_err();
        assert_eq!(
            err.to_string(),
            "X must be a boolean (true/false/1/0), got 'maybe'"
        );
    }

    // Single test so no other test observes these variables half-set.
    #[test]
    fn from_env_reads_overrides_and_reports_context() {
        const VARS: [&str; 3] = [
            "MENU_ACCESS_SESSION_COMPONENT",
            "MENU_ACCESS_MIRROR_VIEW_BAG",
            "MENU_ACCESS_LEGACY_ITEM_FLAG",
        ];

        // SAFETY: no other test in this crate reads or writes these variables
        unsafe {
            std::env::set_var(VARS[0], " account ");
            std::env::set_var(VARS[1], "false");
            std::env::set_var(VARS[2], "1");
        }
        let config = AccessConfig::from_env().unwrap();
        assert_eq!(config.session_component, "account");
        assert!(!config.mirror_view_bag);
        assert!(config.legacy_item_flag);

        unsafe { std::env::set_var(VARS[1], "maybe") };
        let err = format!("{:#}", AccessConfig::from_env().unwrap_err());
        assert!(err.contains("MENU_ACCESS_MIRROR_VIEW_BAG is invalid"), "{err}");
        assert!(err.contains("must be a boolean"), "{err}");

        unsafe {
            std::env::remove_var(VARS[1]);
            std::env::set_var(VARS[0], "   ");
        }
        let err = format!("{:#}", AccessConfig::from_env().unwrap_err());
        assert!(err.contains("MENU_ACCESS_SESSION_COMPONENT is invalid"), "{err}");
        assert!(err.contains("must not be empty"), "{err}");

        unsafe {
            for var in VARS {
                std::env::remove_var(var);
            }
        }
        assert_eq!(AccessConfig::from_env().unwrap(), AccessConfig::default());
    }
}

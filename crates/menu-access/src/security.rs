//! Session component security settings, page first then layout.

use std::collections::BTreeSet;
use std::fmt;

use crate::target::{Layout, Page};

/// Default alias of the session component on pages and layouts.
pub const DEFAULT_SESSION_COMPONENT: &str = "session";

/// Who a page is meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityMode {
    /// Signed-in visitors only.
    User,
    /// Anonymous visitors only.
    Guest,
    /// Any other value (`all`, typos); never restricts.
    Other(String),
}

impl From<&str> for SecurityMode {
    fn from(value: &str) -> Self {
        match value {
            "user" => Self::User,
            "guest" => Self::Guest,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Guest => f.write_str("guest"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Settings paths read from pages and layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    pub security: String,
    pub allowed_groups: String,
}

impl SessionPaths {
    /// Paths for a session component registered under `alias`.
    pub fn for_component(alias: &str) -> Self {
        Self {
            security: format!("components.{alias}.security"),
            allowed_groups: format!("components.{alias}.allowedUserGroups"),
        }
    }
}

impl Default for SessionPaths {
    fn default() -> Self {
        Self::for_component(DEFAULT_SESSION_COMPONENT)
    }
}

/// Effective restriction for one menu item. `None` on an axis means
/// unrestricted on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecuritySettings {
    pub mode: Option<SecurityMode>,
    pub allowed_groups: Option<BTreeSet<String>>,
}

impl SecuritySettings {
    pub fn is_unrestricted(&self) -> bool {
        self.mode.is_none() && self.allowed_groups.is_none()
    }
}

/// Extract the effective security settings.
///
/// Each property is resolved on its own: the page wins when it carries a
/// non-empty value, otherwise the layout is consulted. The mode and the
/// groups may therefore come from different sources.
pub fn extract_security(
    page: Option<&Page>,
    layout: Option<&Layout>,
    paths: &SessionPaths,
) -> SecuritySettings {
    let page_settings = page.map(|p| &p.settings);
    let layout_settings = layout.map(|l| &l.settings);

    let mode = page_settings
        .and_then(|s| s.non_empty_str(&paths.security))
        .or_else(|| layout_settings.and_then(|s| s.non_empty_str(&paths.security)))
        .map(SecurityMode::from);

    let allowed_groups = page_settings
        .and_then(|s| s.non_empty_set(&paths.allowed_groups))
        .or_else(|| layout_settings.and_then(|s| s.non_empty_set(&paths.allowed_groups)));

    SecuritySettings {
        mode,
        allowed_groups,
    }
}

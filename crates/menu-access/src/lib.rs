//! Menu item visibility driven by session security settings.
//!
//! A menu item pointing at a CMS page or static page inherits the session
//! component settings of that page, falling back to the page's layout. The
//! visitor's authentication state and group codes then decide whether the
//! item is shown.
//!
//! Resolution runs in two phases per pass:
//! - Phase A: the host resolves each non-`url` item and calls
//!   [`PassContext::on_resolve_item`], which records a positional decision.
//! - Phase B: the host hands over the generated tree and
//!   [`PassContext::on_references_generated`] applies the recorded decisions
//!   by walking the tree in the same order.

pub mod config;
pub mod decision;
pub mod hooks;
pub mod item;
pub mod security;
pub mod settings;
pub mod target;
pub mod visitor;
pub mod walker;

pub use config::{AccessConfig, ConfigError};
pub use decision::{Decision, HideReason, decide, decide_hidden};
pub use hooks::{MenuAccess, PassContext, REFERENCES_GENERATED_EVENT, RESOLVE_ITEM_EVENT};
pub use item::{ItemType, MenuItem};
pub use security::{SecurityMode, SecuritySettings, SessionPaths, extract_security};
pub use settings::{Settings, SettingsError};
pub use target::{Layout, Page, PageKind, ResolvedTarget, Theme, ThemeStore, resolve_target};
pub use visitor::{Identity, VisitorCache, VisitorContext};
pub use walker::{ApplySummary, VisibilityIndex, apply_visibility};

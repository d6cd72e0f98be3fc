//! Hide/show decision for a single menu item.

use std::fmt;

use crate::security::{SecurityMode, SecuritySettings};
use crate::visitor::VisitorContext;

/// A rule that hid an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// `security = user` and the visitor is anonymous.
    RequiresUser,
    /// `security = guest` and the visitor is signed in.
    RequiresGuest,
    /// Allowed groups are set and the visitor is anonymous.
    GroupsRequireLogin,
    /// Allowed groups are set and the visitor is in none of them.
    NoSharedGroup,
}

impl fmt::Display for HideReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RequiresUser => "requires_user",
            Self::RequiresGuest => "requires_guest",
            Self::GroupsRequireLogin => "groups_require_login",
            Self::NoSharedGroup => "no_shared_group",
        })
    }
}

/// Outcome of evaluating every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decision {
    /// All rules that fired, in evaluation order.
    pub reasons: Vec<HideReason>,
}

impl Decision {
    pub fn hidden(&self) -> bool {
        !self.reasons.is_empty()
    }
}

/// Evaluate all rules and keep the ones that fired.
pub fn decide(settings: &SecuritySettings, visitor: &VisitorContext) -> Decision {
    let mut reasons = Vec::new();

    match settings.mode {
        Some(SecurityMode::User) if !visitor.authenticated => {
            reasons.push(HideReason::RequiresUser);
        }
        Some(SecurityMode::Guest) if visitor.authenticated => {
            reasons.push(HideReason::RequiresGuest);
        }
        _ => {}
    }

    if let Some(groups) = settings.allowed_groups.as_ref().filter(|g| !g.is_empty()) {
        if !visitor.authenticated {
            reasons.push(HideReason::GroupsRequireLogin);
        } else if !visitor.shares_group_with(groups) {
            reasons.push(HideReason::NoSharedGroup);
        }
    }

    Decision { reasons }
}

/// Whether the item should be hidden from `visitor`.
pub fn decide_hidden(settings: &SecuritySettings, visitor: &VisitorContext) -> bool {
    decide(settings, visitor).hidden()
}

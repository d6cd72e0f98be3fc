//! The current visitor, resolved once per pass.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use tracing::debug;

/// Authentication collaborator supplied by the host.
pub trait Identity {
    /// Whether a user is signed in.
    fn is_authenticated(&self) -> bool;

    /// Group codes of the signed-in user. Not consulted for guests.
    fn current_user_group_codes(&self) -> BTreeSet<String>;
}

impl<T: Identity + ?Sized> Identity for &T {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn current_user_group_codes(&self) -> BTreeSet<String> {
        (**self).current_user_group_codes()
    }
}

/// Authentication state and group codes for the current visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorContext {
    /// Whether the visitor is signed in.
    pub authenticated: bool,
    /// Group codes; always empty for anonymous visitors.
    pub group_codes: BTreeSet<String>,
}

impl VisitorContext {
    /// Context for an anonymous visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a signed-in visitor.
    pub fn authenticated<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authenticated: true,
            group_codes: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Query the identity collaborator.
    pub fn from_identity<I: Identity + ?Sized>(identity: &I) -> Self {
        if identity.is_authenticated() {
            Self {
                authenticated: true,
                group_codes: identity.current_user_group_codes(),
            }
        } else {
            Self::anonymous()
        }
    }

    /// Whether any of `groups` is one of the visitor's groups.
    pub fn shares_group_with(&self, groups: &BTreeSet<String>) -> bool {
        !self.group_codes.is_disjoint(groups)
    }
}

/// Memoized visitor for one pass.
#[derive(Debug, Default)]
pub struct VisitorCache {
    cell: OnceCell<VisitorContext>,
}

impl VisitorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the visitor, querying `identity` only on the first call.
    pub fn resolve<I: Identity + ?Sized>(&self, identity: &I) -> &VisitorContext {
        self.cell.get_or_init(|| {
            let ctx = VisitorContext::from_identity(identity);
            debug!(
                authenticated = ctx.authenticated,
                groups = ctx.group_codes.len(),
                "resolved menu visitor"
            );
            ctx
        })
    }

    /// The cached visitor, if already resolved.
    pub fn get(&self) -> Option<&VisitorContext> {
        self.cell.get()
    }
}

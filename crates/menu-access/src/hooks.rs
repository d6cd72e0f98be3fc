//! Entry points bound to the host menu events.
//!
//! The host fires [`RESOLVE_ITEM_EVENT`] for every non-`url` item while it
//! generates menu references, then [`REFERENCES_GENERATED_EVENT`] once with
//! the generated tree. A [`PassContext`] carries the visitor cache and the
//! visibility index from the first event to the second and is consumed by it.

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::AccessConfig;
use crate::decision::decide;
use crate::item::{IS_HIDDEN_KEY, MenuItem};
use crate::security::{SessionPaths, extract_security};
use crate::target::{Theme, ThemeStore, resolve_target};
use crate::visitor::{Identity, VisitorCache};
use crate::walker::{ApplySummary, VisibilityIndex, apply_visibility};

/// Fired per resolvable item during reference generation.
pub const RESOLVE_ITEM_EVENT: &str = "pages.menuitem.resolveItem";

/// Fired once per pass with the full generated tree.
pub const REFERENCES_GENERATED_EVENT: &str = "pages.menu.referencesGenerated";

/// Menu visibility filter bound to a theme store and identity.
#[derive(Debug, Clone)]
pub struct MenuAccess<S, I> {
    store: S,
    identity: I,
    config: AccessConfig,
    paths: SessionPaths,
}

impl<S: ThemeStore, I: Identity> MenuAccess<S, I> {
    /// Create a filter with default configuration.
    pub fn new(store: S, identity: I) -> Self {
        Self::with_config(store, identity, AccessConfig::default())
    }

    /// Create a filter with explicit configuration.
    pub fn with_config(store: S, identity: I, config: AccessConfig) -> Self {
        let paths = config.session_paths();
        Self {
            store,
            identity,
            config,
            paths,
        }
    }

    /// Start a resolution pass with a fresh visitor cache and index.
    pub fn begin_pass(&self) -> PassContext<'_, S, I> {
        PassContext {
            access: self,
            visitor: VisitorCache::new(),
            index: VisibilityIndex::new(),
        }
    }

    /// Run both phases over `tree` in one call.
    ///
    /// Phase A visits a copy of the tree in depth-first pre-order, the order
    /// the host resolves items in; Phase B then applies to `tree` itself.
    pub fn filter_menu(
        &self,
        tree: Vec<MenuItem>,
        current_url: &str,
        theme: &Theme,
    ) -> Vec<MenuItem> {
        let mut pass = self.begin_pass();
        let mut resolving = tree.clone();
        resolve_all(&mut pass, &mut resolving, current_url, theme);
        pass.on_references_generated(tree)
    }
}

fn resolve_all<S: ThemeStore, I: Identity>(
    pass: &mut PassContext<'_, S, I>,
    items: &mut [MenuItem],
    current_url: &str,
    theme: &Theme,
) {
    for item in items {
        if item.item_type.is_resolvable() {
            pass.on_resolve_item(item, current_url, theme);
        }
        resolve_all(pass, &mut item.children, current_url, theme);
    }
}

/// State for one resolution pass.
#[derive(Debug)]
pub struct PassContext<'a, S, I> {
    access: &'a MenuAccess<S, I>,
    visitor: VisitorCache,
    index: VisibilityIndex,
}

impl<S: ThemeStore, I: Identity> PassContext<'_, S, I> {
    /// Phase A: record the decision for one item.
    ///
    /// `url` items are ignored and take no slot. Every other item takes the
    /// next slot even when its target cannot be resolved.
    pub fn on_resolve_item(&mut self, item: &mut MenuItem, current_url: &str, theme: &Theme) {
        if !item.item_type.is_resolvable() {
            return;
        }

        let visitor = self.visitor.resolve(&self.access.identity);
        let slot = self.index.next_slot();

        let Some(target) = resolve_target(&self.access.store, theme, item) else {
            trace!(slot, item_type = %item.item_type, "no target for menu item");
            return;
        };

        let settings = extract_security(
            target.page.as_ref(),
            target.layout.as_ref(),
            &self.access.paths,
        );
        if settings.is_unrestricted() {
            return;
        }
        let decision = decide(&settings, visitor);
        if !decision.hidden() {
            return;
        }

        debug!(
            slot,
            item_type = %item.item_type,
            reference = item.reference.as_deref().unwrap_or_default(),
            current_url = %current_url,
            reasons = ?decision.reasons,
            "hiding menu item"
        );
        self.index.record(slot);

        if self.access.config.legacy_item_flag {
            item.view_bag.insert(IS_HIDDEN_KEY.to_string(), Value::String("1".to_string()));
        }
    }

    /// Phase B: apply recorded decisions to the generated tree.
    ///
    /// Consumes the pass; the index is discarded afterwards.
    pub fn on_references_generated(self, mut items: Vec<MenuItem>) -> Vec<MenuItem> {
        self.apply(&mut items);
        items
    }

    /// Phase B against a borrowed tree.
    pub fn apply(self, items: &mut [MenuItem]) -> ApplySummary {
        apply_visibility(items, &self.index, self.access.config.mirror_view_bag)
    }

    /// Decisions recorded so far.
    pub fn index(&self) -> &VisibilityIndex {
        &self.index
    }
}

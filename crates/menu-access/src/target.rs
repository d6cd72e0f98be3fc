//! Pages, layouts and the theme store that loads them.

use tracing::trace;

use crate::item::MenuItem;
use crate::settings::Settings;

/// Host theme the menu is rendered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Theme {
    /// Theme directory code.
    pub code: String,
}

impl Theme {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Which page loader a resolvable item uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Theme CMS page.
    Cms,
    /// Static page from the pages plugin.
    Static,
}

impl PageKind {
    /// Settings path naming the page's layout.
    pub fn layout_key_path(self) -> &'static str {
        match self {
            Self::Cms => "layout",
            Self::Static => "components.viewBag.layout",
        }
    }
}

/// A loaded page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    pub settings: Settings,
}

/// A loaded layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub settings: Settings,
}

/// Page plus the layout it renders into, when either resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub page: Option<Page>,
    pub layout: Option<Layout>,
}

/// Cached page and layout lookups supplied by the host.
pub trait ThemeStore {
    /// Load a page by reference, `None` when unknown.
    fn load_cached_page(&self, theme: &Theme, kind: PageKind, reference: &str) -> Option<Page>;

    /// Load a layout by key, `None` when unknown.
    fn load_cached_layout(&self, theme: &Theme, key: &str) -> Option<Layout>;
}

impl<T: ThemeStore + ?Sized> ThemeStore for &T {
    fn load_cached_page(&self, theme: &Theme, kind: PageKind, reference: &str) -> Option<Page> {
        (**self).load_cached_page(theme, kind, reference)
    }

    fn load_cached_layout(&self, theme: &Theme, key: &str) -> Option<Layout> {
        (**self).load_cached_layout(theme, key)
    }
}

/// Resolve the page and layout behind a menu item.
///
/// Returns `None` when the item type has no page loader, carries no
/// reference, or the page is unknown.
pub fn resolve_target<S: ThemeStore + ?Sized>(
    store: &S,
    theme: &Theme,
    item: &MenuItem,
) -> Option<ResolvedTarget> {
    let kind = item.item_type.page_kind()?;
    let reference = item.reference.as_deref().filter(|r| !r.is_empty())?;

    let Some(page) = store.load_cached_page(theme, kind, reference) else {
        trace!(
            theme = %theme.code,
            item_type = %item.item_type,
            reference = %reference,
            "menu item target not found"
        );
        return None;
    };

    let layout = page
        .settings
        .non_empty_str(kind.layout_key_path())
        .and_then(|key| store.load_cached_layout(theme, key));

    Some(ResolvedTarget {
        page: Some(page),
        layout,
    })
}

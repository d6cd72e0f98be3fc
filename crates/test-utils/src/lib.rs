//! menu-access test utilities.
//!
//! Helpers for integration testing: page and layout builders, an in-memory
//! theme store, test visitors, and a fake host that fires both menu events
//! the way the pages plugin does.

use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};

use menu_access::{
    Identity, Layout, MenuItem, Page, PageKind, PassContext, Settings, Theme, ThemeStore,
};
use serde_json::{Value as JsonValue, json};

/// Create a CMS page fixture.
pub fn cms_page(reference: &str) -> TestPage {
    TestPage::new(PageKind::Cms, reference)
}

/// Create a static page fixture.
pub fn static_page(reference: &str) -> TestPage {
    TestPage::new(PageKind::Static, reference)
}

/// A page fixture builder.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub kind: PageKind,
    pub reference: String,
    pub settings: JsonValue,
}

impl TestPage {
    fn new(kind: PageKind, reference: &str) -> Self {
        Self {
            kind,
            reference: reference.to_string(),
            settings: json!({}),
        }
    }

    /// Render into the given layout, using the key the page kind reads.
    pub fn with_layout(self, layout: &str) -> Self {
        let path = self.kind.layout_key_path();
        self.with_path(path, json!(layout))
    }

    /// Set the session component `security` value.
    pub fn with_security(self, mode: &str) -> Self {
        self.with_path("components.session.security", json!(mode))
    }

    /// Set the session component `allowedUserGroups` value.
    pub fn with_groups(self, groups: &[&str]) -> Self {
        self.with_path("components.session.allowedUserGroups", json!(groups))
    }

    /// Set an arbitrary dotted path.
    pub fn with_path(mut self, path: &str, value: JsonValue) -> Self {
        set_path(&mut self.settings, path, value);
        self
    }

    pub fn build(&self) -> Page {
        Page {
            kind: self.kind,
            settings: Settings::new(self.settings.clone()),
        }
    }
}

/// Create a layout fixture.
pub fn layout(key: &str) -> TestLayout {
    TestLayout {
        key: key.to_string(),
        settings: json!({}),
    }
}

/// A layout fixture builder.
#[derive(Debug, Clone)]
pub struct TestLayout {
    pub key: String,
    pub settings: JsonValue,
}

impl TestLayout {
    pub fn with_security(mut self, mode: &str) -> Self {
        set_path(&mut self.settings, "components.session.security", json!(mode));
        self
    }

    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        set_path(
            &mut self.settings,
            "components.session.allowedUserGroups",
            json!(groups),
        );
        self
    }

    pub fn build(&self) -> Layout {
        Layout {
            settings: Settings::new(self.settings.clone()),
        }
    }
}

fn set_path(root: &mut JsonValue, path: &str, value: JsonValue) {
    let keys: Vec<&str> = path.split('.').collect();
    insert_at(root, &keys, value);
}

fn insert_at(node: &mut JsonValue, keys: &[&str], value: JsonValue) {
    let Some((first, rest)) = keys.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = json!({});
    }
    if let Some(map) = node.as_object_mut() {
        let child = map.entry(first.to_string()).or_insert(JsonValue::Null);
        insert_at(child, rest, value);
    }
}

/// Theme store backed by hash maps. Counts lookups.
#[derive(Debug, Default)]
pub struct InMemoryThemeStore {
    pages: HashMap<(PageKind, String), Page>,
    layouts: HashMap<String, Layout>,
    page_lookups: Cell<usize>,
}

impl InMemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: TestPage) -> Self {
        self.pages
            .insert((page.kind, page.reference.clone()), page.build());
        self
    }

    /// Add a page from YAML front matter.
    ///
    /// # Panics
    ///
    /// Panics if the YAML is not a mapping.
    #[allow(clippy::expect_used)]
    pub fn with_page_yaml(mut self, kind: PageKind, reference: &str, yaml: &str) -> Self {
        let settings = Settings::from_yaml_str(yaml).expect("page settings YAML must be a mapping");
        self.pages.insert((kind, reference.to_string()), Page { kind, settings });
        self
    }

    pub fn with_layout(mut self, layout: TestLayout) -> Self {
        self.layouts.insert(layout.key.clone(), layout.build());
        self
    }

    /// Number of page lookups served.
    pub fn page_lookups(&self) -> usize {
        self.page_lookups.get()
    }
}

impl ThemeStore for InMemoryThemeStore {
    fn load_cached_page(&self, _theme: &Theme, kind: PageKind, reference: &str) -> Option<Page> {
        self.page_lookups.set(self.page_lookups.get() + 1);
        self.pages.get(&(kind, reference.to_string())).cloned()
    }

    fn load_cached_layout(&self, _theme: &Theme, key: &str) -> Option<Layout> {
        self.layouts.get(key).cloned()
    }
}

/// Create a signed-in test visitor in the given groups.
pub fn test_user(groups: &[&str]) -> TestUser {
    TestUser {
        authenticated: true,
        groups: groups.iter().map(|s| s.to_string()).collect(),
        lookups: Cell::new(0),
    }
}

/// Create an anonymous test visitor.
pub fn anonymous_user() -> TestUser {
    TestUser {
        authenticated: false,
        groups: BTreeSet::new(),
        lookups: Cell::new(0),
    }
}

/// A test visitor implementing [`Identity`].
#[derive(Debug, Clone)]
pub struct TestUser {
    pub authenticated: bool,
    pub groups: BTreeSet<String>,
    lookups: Cell<usize>,
}

impl TestUser {
    /// Add a group.
    pub fn with_group(mut self, group: &str) -> Self {
        self.groups.insert(group.to_string());
        self
    }

    /// Times the authentication state was queried.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl Identity for TestUser {
    fn is_authenticated(&self) -> bool {
        self.lookups.set(self.lookups.get() + 1);
        self.authenticated
    }

    fn current_user_group_codes(&self) -> BTreeSet<String> {
        self.groups.clone()
    }
}

/// Stand-in for the host menu system.
///
/// Mirrors reference generation: every non-`url` item is handed to the
/// resolve hook in depth-first pre-order, then a freshly built copy of the
/// tree goes to the references-generated hook.
#[derive(Debug, Clone)]
pub struct FakeMenuHost {
    pub theme: Theme,
    pub current_url: String,
}

impl FakeMenuHost {
    pub fn new(theme: &str, current_url: &str) -> Self {
        Self {
            theme: Theme::new(theme),
            current_url: current_url.to_string(),
        }
    }

    /// Run one pass over `definition` and return the generated tree.
    pub fn generate<S: ThemeStore, I: Identity>(
        &self,
        mut pass: PassContext<'_, S, I>,
        definition: &[MenuItem],
    ) -> Vec<MenuItem> {
        let mut source = definition.to_vec();
        self.resolve(&mut pass, &mut source);
        pass.on_references_generated(definition.to_vec())
    }

    fn resolve<S: ThemeStore, I: Identity>(
        &self,
        pass: &mut PassContext<'_, S, I>,
        items: &mut [MenuItem],
    ) {
        for item in items {
            if item.item_type.is_resolvable() {
                pass.on_resolve_item(item, &self.current_url, &self.theme);
            }
            self.resolve(pass, &mut item.children);
        }
    }
}

/// Install a test tracing subscriber honouring `RUST_LOG`. Safe to call more
/// than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Assertion helpers for menu trees.
pub mod assert {
    use menu_access::MenuItem;

    /// Titles of every hidden item, in pre-order.
    pub fn hidden_titles(items: &[MenuItem]) -> Vec<String> {
        let mut titles = Vec::new();
        collect(items, &mut titles);
        titles
    }

    fn collect(items: &[MenuItem], titles: &mut Vec<String>) {
        for item in items {
            if item.hidden {
                titles.push(item.title.clone());
            }
            collect(&item.children, titles);
        }
    }

    /// Assert exactly the named items are hidden.
    pub fn hidden_exactly(items: &[MenuItem], expected: &[&str]) {
        let actual = hidden_titles(items);
        assert_eq!(
            actual, expected,
            "hidden menu items mismatch\nactual: {actual:?}\nexpected: {expected:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_builder_sets_nested_paths() {
        let page = cms_page("account")
            .with_layout("default")
            .with_security("user")
            .with_groups(&["admin"]);

        assert_eq!(page.settings["layout"], "default");
        assert_eq!(page.settings["components"]["session"]["security"], "user");
        assert_eq!(
            page.settings["components"]["session"]["allowedUserGroups"][0],
            "admin"
        );
    }

    #[test]
    fn static_page_layout_goes_in_view_bag() {
        let page = static_page("about").with_layout("static");
        assert_eq!(page.settings["components"]["viewBag"]["layout"], "static");
        assert!(page.settings.get("layout").is_none());
    }

    #[test]
    fn store_counts_lookups() {
        let store = InMemoryThemeStore::new().with_page(cms_page("a"));
        let theme = Theme::new("demo");
        assert!(store.load_cached_page(&theme, PageKind::Cms, "a").is_some());
        assert!(store.load_cached_page(&theme, PageKind::Static, "a").is_none());
        assert_eq!(store.page_lookups(), 2);
    }

    #[test]
    fn test_user_builder() {
        let user = test_user(&["admin"]).with_group("editor");
        assert!(user.is_authenticated());
        assert_eq!(user.current_user_group_codes().len(), 2);
        assert_eq!(user.lookups(), 1);
        assert!(!anonymous_user().is_authenticated());
    }

    #[test]
    fn hidden_titles_walks_children() {
        let mut tree = vec![
            MenuItem::cms_page("A", "a").with_children(vec![MenuItem::cms_page("B", "b")]),
        ];
        tree[0].children[0].hidden = true;
        assert::hidden_exactly(&tree, &["B"]);
    }
}

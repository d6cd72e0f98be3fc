//! Property-based tests for menu visibility.
//!
//! These tests use proptest to verify invariants around:
//! - `url` items never being hidden
//! - Phase A and Phase B agreeing on slot numbering
//! - Every hide matching the per-item decision
//! - Idempotence across passes

use menu_access::{
    ItemType, MenuAccess, MenuItem, PassContext, SessionPaths, Theme, VisitorContext,
    decide_hidden, extract_security, resolve_target,
};
use menu_access_test_utils::{
    FakeMenuHost, InMemoryThemeStore, TestUser, anonymous_user, cms_page, layout, static_page,
    test_user,
};
use proptest::prelude::*;

const REFERENCES: &[&str] = &["home", "account", "login", "admin", "missing"];
const GROUPS: &[&str] = &["admin", "editor", "member"];

// ============================================================================
// Strategies
// ============================================================================

fn arb_item_type() -> impl Strategy<Value = ItemType> {
    prop_oneof![
        3 => Just(ItemType::Url),
        3 => Just(ItemType::CmsPage),
        3 => Just(ItemType::StaticPage),
        1 => Just(ItemType::Other("blog-category".to_string())),
    ]
}

fn arb_leaf() -> impl Strategy<Value = MenuItem> {
    (arb_item_type(), prop::sample::select(REFERENCES), "[A-Z][a-z]{1,6}").prop_map(
        |(item_type, reference, title)| {
            if item_type == ItemType::Url {
                MenuItem::url(title, "/somewhere")
            } else {
                MenuItem::new(item_type, title).with_reference(reference)
            }
        },
    )
}

fn arb_item() -> impl Strategy<Value = MenuItem> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        (arb_leaf(), prop::collection::vec(inner, 0..4))
            .prop_map(|(item, children)| item.with_children(children))
    })
}

fn arb_tree() -> impl Strategy<Value = Vec<MenuItem>> {
    prop::collection::vec(arb_item(), 0..6)
}

fn arb_visitor() -> impl Strategy<Value = TestUser> {
    prop_oneof![
        Just(anonymous_user()),
        prop::sample::subsequence(GROUPS, 0..=GROUPS.len()).prop_map(|groups| test_user(&groups)),
    ]
}

/// A fixed theme exercising every inheritance path.
fn store() -> InMemoryThemeStore {
    InMemoryThemeStore::new()
        .with_layout(layout("members").with_security("user"))
        .with_layout(layout("staff").with_groups(&["admin", "editor"]))
        .with_page(cms_page("home"))
        .with_page(static_page("home").with_layout("members"))
        .with_page(cms_page("account").with_layout("members"))
        .with_page(static_page("account").with_layout("staff").with_security("guest"))
        .with_page(cms_page("login").with_security("guest"))
        .with_page(static_page("login").with_groups(&["member"]))
        .with_page(cms_page("admin").with_layout("staff"))
        .with_page(static_page("admin").with_groups(&["admin"]).with_layout("members"))
}

// ============================================================================
// Helpers
// ============================================================================

fn flatten(items: &[MenuItem]) -> Vec<&MenuItem> {
    let mut out = Vec::new();
    for item in items {
        out.push(item);
        out.extend(flatten(&item.children));
    }
    out
}

fn expected_hidden(store: &InMemoryThemeStore, user: &TestUser, item: &MenuItem) -> bool {
    let visitor = VisitorContext::from_identity(user);
    let Some(target) = resolve_target(store, &Theme::new("demo"), item) else {
        return false;
    };
    let settings = extract_security(
        target.page.as_ref(),
        target.layout.as_ref(),
        &SessionPaths::default(),
    );
    decide_hidden(&settings, &visitor)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn url_items_are_never_hidden(tree in arb_tree(), user in arb_visitor()) {
        let store = store();
        let access = MenuAccess::new(&store, &user);
        let filtered = FakeMenuHost::new("demo", "/").generate(access.begin_pass(), &tree);

        for item in flatten(&filtered) {
            if item.item_type == ItemType::Url {
                prop_assert!(!item.hidden);
            }
        }
    }

    #[test]
    fn phases_agree_on_slot_count(tree in arb_tree(), user in arb_visitor()) {
        let store = store();
        let access = MenuAccess::new(&store, &user);
        let theme = Theme::new("demo");

        let mut pass = access.begin_pass();
        let mut source = tree.clone();
        resolve_pre_order(&mut pass, &mut source, &theme);
        let recorded = pass.index().slots();

        let mut generated = tree.clone();
        let summary = pass.apply(&mut generated);

        let resolvable = flatten(&tree)
            .iter()
            .filter(|item| item.item_type.is_resolvable())
            .count();
        prop_assert_eq!(recorded, resolvable);
        prop_assert_eq!(summary.slots, resolvable);
        prop_assert_eq!(summary.visited, flatten(&tree).len());
    }

    #[test]
    fn hides_match_per_item_decisions(tree in arb_tree(), user in arb_visitor()) {
        let store = store();
        let access = MenuAccess::new(&store, &user);
        let filtered = FakeMenuHost::new("demo", "/").generate(access.begin_pass(), &tree);

        for (original, result) in flatten(&tree).into_iter().zip(flatten(&filtered)) {
            prop_assert_eq!(result.hidden, expected_hidden(&store, &user, original));
        }
    }

    #[test]
    fn passes_are_idempotent(tree in arb_tree(), user in arb_visitor()) {
        let store = store();
        let access = MenuAccess::new(&store, &user);
        let host = FakeMenuHost::new("demo", "/");

        let first = host.generate(access.begin_pass(), &tree);
        let second = host.generate(access.begin_pass(), &tree);
        prop_assert_eq!(&first, &second);

        let again = host.generate(access.begin_pass(), &first);
        prop_assert_eq!(&first, &again);
    }
}

/// Drive Phase A by hand, handing `url` items over too.
fn resolve_pre_order(
    pass: &mut PassContext<'_, &InMemoryThemeStore, &TestUser>,
    items: &mut [MenuItem],
    theme: &Theme,
) {
    for item in items {
        pass.on_resolve_item(item, "/", theme);
        resolve_pre_order(pass, &mut item.children, theme);
    }
}

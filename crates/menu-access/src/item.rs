//! Menu item tree as generated by the host menu system.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::target::PageKind;

/// View bag key the host renderer checks to skip an item.
pub const IS_HIDDEN_KEY: &str = "isHidden";

/// Kind of target a menu item points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// Plain link; never resolved.
    Url,
    /// Theme CMS page, referenced by file name.
    CmsPage,
    /// Static page, referenced by file name.
    StaticPage,
    /// Any other host item type (blog categories, generated lists, ...).
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url => "url",
            Self::CmsPage => "cms-page",
            Self::StaticPage => "static-page",
            Self::Other(name) => name,
        }
    }

    /// Whether the host resolves this item, and therefore whether it takes a
    /// slot in the visibility index.
    pub fn is_resolvable(&self) -> bool {
        !matches!(self, Self::Url)
    }

    /// Page loader for this item type, if it targets a page at all.
    pub fn page_kind(&self) -> Option<PageKind> {
        match self {
            Self::CmsPage => Some(PageKind::Cms),
            Self::StaticPage => Some(PageKind::Static),
            Self::Url | Self::Other(_) => None,
        }
    }
}

impl From<&str> for ItemType {
    fn from(value: &str) -> Self {
        match value {
            "url" => Self::Url,
            "cms-page" => Self::CmsPage,
            "static-page" => Self::StaticPage,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// A node in a menu tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Target kind.
    #[serde(rename = "type")]
    pub item_type: ItemType,

    /// Target key (page file name); meaningless for `url` items.
    #[serde(default)]
    pub reference: Option<String>,

    /// Link destination for `url` items, or the resolved URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Nested items, in display order.
    #[serde(default, alias = "items")]
    pub children: Vec<MenuItem>,

    /// Free-form view data passed through to the renderer.
    #[serde(default)]
    pub view_bag: Map<String, Value>,

    /// Output flag. Only ever switched on.
    #[serde(default)]
    pub hidden: bool,
}

impl MenuItem {
    /// New leaf item of the given type.
    pub fn new(item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            item_type,
            reference: None,
            url: None,
            children: Vec::new(),
            view_bag: Map::new(),
            hidden: false,
        }
    }

    /// A `url` item.
    pub fn url(title: impl Into<String>, url: impl Into<String>) -> Self {
        let mut item = Self::new(ItemType::Url, title);
        item.url = Some(url.into());
        item
    }

    /// A `cms-page` item referencing `reference`.
    pub fn cms_page(title: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(ItemType::CmsPage, title).with_reference(reference)
    }

    /// A `static-page` item referencing `reference`.
    pub fn static_page(title: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(ItemType::StaticPage, title).with_reference(reference)
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    /// Switch the hidden flag on, optionally mirroring it into the view bag.
    pub fn mark_hidden(&mut self, mirror_view_bag: bool) {
        self.hidden = true;
        if mirror_view_bag {
            self.view_bag.insert(IS_HIDDEN_KEY.to_string(), Value::Bool(true));
        }
    }
}

//! Bookmark tree nodes and flattened index entries.

use serde::{Deserialize, Serialize};

/// A node of the external bookmark tree.
///
/// Mirrors the shape the browser's bookmark API returns. A node with a `url`
/// is a bookmark; anything else is a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        let children = children
            .into_iter()
            .map(|mut child| {
                child.parent_id = Some(id.to_string());
                child
            })
            .collect();
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            parent_id: None,
            children: Some(children),
        }
    }

    pub fn bookmark(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            parent_id: None,
            children: None,
        }
    }

    pub fn is_bookmark(&self) -> bool {
        self.url.is_some()
    }

    pub fn children(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// A leaf bookmark in the flat index, with its computed location path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub path: String,
    pub parent_id: String,
}

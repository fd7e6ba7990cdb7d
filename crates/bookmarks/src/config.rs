//! Index configuration.
//!
//! Everything the index needs to know about the host bookmark store's
//! conventions lives here instead of being hardcoded at the call sites.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BookmarkError, Result};

pub const DEFAULT_RESERVED_ROOT_IDS: [&str; 3] = ["0", "1", "2"];
pub const DEFAULT_PATH_LABEL: &str = "书签栏";
pub const DEFAULT_PATH_SEPARATOR: &str = " / ";
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Prompt shown to the user before a bookmark is removed.
pub const DELETE_CONFIRM_PROMPT: &str = "确定要删除这个书签吗？";

/// Top-level folder ids that never contribute a segment to a location path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservedRoots(BTreeSet<String>);

impl ReservedRoots {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReservedRoots {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVED_ROOT_IDS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub reserved_root_ids: ReservedRoots,
    pub default_path_label: String,
    pub path_separator: String,
    pub event_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            reserved_root_ids: ReservedRoots::default(),
            default_path_label: DEFAULT_PATH_LABEL.to_string(),
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl IndexConfig {
    /// Parses a JSON config. Missing fields fall back to their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|error| BookmarkError::Serialization(format!("invalid config: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BookmarkError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_path_label.trim().is_empty() {
            return Err(BookmarkError::Config(
                "default_path_label must not be empty".to_string(),
            ));
        }
        if self.path_separator.is_empty() {
            return Err(BookmarkError::Config(
                "path_separator must not be empty".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(BookmarkError::Config(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

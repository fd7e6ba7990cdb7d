use std::path::PathBuf;

/// Failure reported by the external bookmark store.
///
/// The store only hands back a message, so that is all this carries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookmarkError {
    #[error("加载书签失败: {0}")]
    Load(#[source] StoreError),

    #[error("书签名称不能为空")]
    EmptyTitle,

    #[error("保存失败: {source}")]
    Save {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("删除失败: {source}")]
    Delete {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("书签不存在: {0}")]
    NotFound(String),

    #[error("书签 {0} 没有正在进行的编辑")]
    NoActiveEdit(String),

    #[error("书签 {0} 正在处理中，请稍后再试")]
    Busy(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BookmarkError {
    /// Id of the bookmark the error refers to, when there is one.
    pub fn bookmark_id(&self) -> Option<&str> {
        match self {
            Self::Save { id, .. } | Self::Delete { id, .. } => Some(id.as_str()),
            Self::NotFound(id) | Self::NoActiveEdit(id) | Self::Busy(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BookmarkError>;

/// Result type returned by [`crate::store::BookmarkStore`] implementations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

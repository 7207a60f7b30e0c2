//! Allocation filesystem types

use serde::{Deserialize, Serialize};

/// One entry of an allocation directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocFileInfo {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "IsDir", default)]
    pub is_dir: bool,
    #[serde(rename = "Size", default)]
    pub size: i64,
    #[serde(rename = "FileMode", default)]
    pub file_mode: String,
    #[serde(rename = "ModTime", default)]
    pub mod_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl AllocFileInfo {
    /// Builds a plain file entry with no metadata
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            size: 0,
            file_mode: String::new(),
            mod_time: None,
        }
    }
}

//! Run archive configuration from TOML (`[archive]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where run namespaces are created
///
/// ```toml
/// [archive]
/// base_dir = "data/backups"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArchiveConfig {
    pub base_dir: PathBuf,
}

impl Default for FileArchiveConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("data/backups"),
        }
    }
}

//! Shared scanner defaults.
//!
//! These defaults are consumed by both the refresh runtime and configuration
//! tooling, so the canonical values live here.

use serde::{Deserialize, Serialize};

/// Folder names (compared case-insensitively) that hold special features.
pub const DEFAULT_SPECIAL_FEATURE_FOLDERS: &[&str] = &["extras", "specials"];

/// File extensions treated as video assets.
pub const DEFAULT_VIDEO_FILE_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "webm", "flv", "wmv", "mpg", "mpeg", "m4v",
    "3gp", "ts",
];

pub fn default_special_feature_folders_vec() -> Vec<String> {
    DEFAULT_SPECIAL_FEATURE_FOLDERS
        .iter()
        .map(|name| (*name).to_string())
        .collect()
}

pub fn default_video_file_extensions_vec() -> Vec<String> {
    DEFAULT_VIDEO_FILE_EXTENSIONS
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}

/// Tuning for the special-feature scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialFeatureSettings {
    /// Subdirectory names of a movie folder whose files are special
    /// features.
    pub folder_names: Vec<String>,
}

impl Default for SpecialFeatureSettings {
    fn default() -> Self {
        Self {
            folder_names: default_special_feature_folders_vec(),
        }
    }
}

impl SpecialFeatureSettings {
    pub fn is_special_feature_folder(&self, name: &str) -> bool {
        self.folder_names
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }
}

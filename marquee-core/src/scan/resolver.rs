use std::path::{Path, PathBuf};

use async_trait::async_trait;
use marquee_model::{ItemId, Video};

use crate::error::Result;
use crate::ports::PathResolver;
use crate::scan::settings::default_video_file_extensions_vec;

/// Resolves any file with a known video extension into a [`Video`] whose id
/// is derived from its path. Everything else is dropped.
#[derive(Debug, Clone)]
pub struct VideoPathResolver {
    extensions: Vec<String>,
}

impl Default for VideoPathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoPathResolver {
    pub fn new() -> Self {
        Self::with_extensions(default_video_file_extensions_vec())
    }

    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_video_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl PathResolver for VideoPathResolver {
    async fn resolve_paths(
        &self,
        paths: &[PathBuf],
        parent: Option<ItemId>,
    ) -> Result<Vec<Video>> {
        Ok(paths
            .iter()
            .filter(|path| self.is_video_path(path))
            .map(|path| {
                let mut video = Video::from_path(path.clone());
                video.item.parent_id = parent;
                video
            })
            .collect())
    }
}

//! Discovery of a movie's special features.
//!
//! Special features are the files sitting directly inside an `extras` or
//! `specials` subdirectory of the movie folder. Deeper files are ignored.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use marquee_model::Video;
use tracing::debug;

use crate::error::Result;
use crate::ports::{ItemRepository, PathResolver};
use crate::scan::fs::{FileSystem, FsEntry};
use crate::scan::settings::SpecialFeatureSettings;

/// Finds and resolves the special features below a movie folder.
#[derive(Clone)]
pub struct SpecialFeatureScanner {
    fs: Arc<dyn FileSystem>,
    resolver: Arc<dyn PathResolver>,
    repository: Arc<dyn ItemRepository>,
    settings: SpecialFeatureSettings,
}

impl std::fmt::Debug for SpecialFeatureScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialFeatureScanner")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SpecialFeatureScanner {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        resolver: Arc<dyn PathResolver>,
        repository: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            fs,
            resolver,
            repository,
            settings: SpecialFeatureSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SpecialFeatureSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &SpecialFeatureSettings {
        &self.settings
    }

    /// Resolve the special features found among `children`, the immediate
    /// entries of the movie folder.
    ///
    /// Persisted items replace freshly resolved ones with the same id. The
    /// result is sorted by path and holds each id at most once.
    pub async fn load_special_features(
        &self,
        children: &[FsEntry],
    ) -> Result<Vec<Video>> {
        let candidates = self.candidate_paths(children).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let resolved = self.resolver.resolve_paths(&candidates, None).await?;
        debug!(
            target: "scan::special_features",
            candidates = candidates.len(),
            resolved = resolved.len(),
            "resolved special feature candidates"
        );

        let mut items = Vec::with_capacity(resolved.len());
        for video in resolved {
            // Prefer the stored instance so already-loaded state survives
            match self.repository.get_item_by_id(video.id()).await? {
                Some(stored) => items.push(stored),
                None => items.push(video),
            }
        }

        // Component-wise and case-sensitive: "EXTRAS/" sorts before
        // "extras/". Stored id lists depend on this order.
        items.sort_by(|a, b| a.path().cmp(b.path()));

        let mut seen = HashSet::with_capacity(items.len());
        items.retain(|item| seen.insert(item.id()));

        Ok(items)
    }

    /// Files exactly one level inside every matching subdirectory.
    async fn candidate_paths(
        &self,
        children: &[FsEntry],
    ) -> Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();

        for folder in children.iter().filter(|entry| entry.is_dir) {
            let Some(name) = folder.name() else {
                continue;
            };
            if !self.settings.is_special_feature_folder(&name) {
                continue;
            }

            let entries = self.fs.read_dir(&folder.path).await?;
            candidates.extend(
                entries
                    .into_iter()
                    .filter(|entry| !entry.is_dir)
                    .map(|entry| entry.path),
            );
        }

        Ok(candidates)
    }
}

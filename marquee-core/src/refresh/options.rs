use std::sync::atomic::{AtomicBool, Ordering};

/// How aggressively a refresh re-reads metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataRefreshMode {
    /// Only check that existing metadata is still valid.
    ValidationOnly,
    /// Fill in what is missing.
    #[default]
    Default,
    /// Re-fetch everything.
    FullRefresh,
}

/// Options shared by every step of one refresh pipeline run.
///
/// The same value is handed to the parent item and to every child refresh
/// it cascades into. `force_save` is a one-way latch: any step may raise it,
/// none may clear it.
#[derive(Debug, Default)]
pub struct MetadataRefreshOptions {
    pub metadata_refresh_mode: MetadataRefreshMode,
    pub replace_all_metadata: bool,
    force_save: AtomicBool,
}

impl MetadataRefreshOptions {
    pub fn new(metadata_refresh_mode: MetadataRefreshMode) -> Self {
        Self {
            metadata_refresh_mode,
            ..Self::default()
        }
    }

    pub fn with_replace_all_metadata(mut self, replace: bool) -> Self {
        self.replace_all_metadata = replace;
        self
    }

    /// Persist the item at the end of the run even if no field changed.
    pub fn request_force_save(&self) {
        self.force_save.store(true, Ordering::Release);
    }

    pub fn force_save(&self) -> bool {
        self.force_save.load(Ordering::Acquire)
    }
}

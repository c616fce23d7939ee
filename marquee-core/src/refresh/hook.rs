use std::sync::Arc;

use marquee_model::Movie;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Result;
use crate::ports::{ItemPreRefresh, NoopPreRefresh};
use crate::refresh::options::MetadataRefreshOptions;
use crate::refresh::reconcile::{Reconciliation, SpecialFeatureReconciler};
use crate::scan::fs::FsEntry;

/// What the movie pre-refresh hook did with special features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshHookOutcome {
    /// The movie is virtual, has no parent or sits in a mixed folder.
    Skipped,
    Reconciled { changed: bool },
    Cancelled,
}

impl RefreshHookOutcome {
    /// Whether the movie must be saved even without other field changes.
    pub fn requires_save(&self) -> bool {
        matches!(self, RefreshHookOutcome::Reconciled { changed: true })
    }
}

/// Movie-specific work that runs before providers populate metadata.
#[derive(Clone)]
pub struct MovieRefreshHook {
    base: Arc<dyn ItemPreRefresh>,
    reconciler: SpecialFeatureReconciler,
}

impl std::fmt::Debug for MovieRefreshHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieRefreshHook")
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

impl MovieRefreshHook {
    pub fn new(reconciler: SpecialFeatureReconciler) -> Self {
        Self {
            base: Arc::new(NoopPreRefresh),
            reconciler,
        }
    }

    /// Run `base` before the movie-specific steps.
    pub fn with_base(mut self, base: Arc<dyn ItemPreRefresh>) -> Self {
        self.base = base;
        self
    }

    /// Runs the generic pre-refresh step, then reconciles special features
    /// when the movie is part of the parent/child tree.
    ///
    /// A change raises `force_save` on `options`; the flag is never cleared
    /// here.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(movie_id = %movie.id())
    )]
    pub async fn before_refresh_metadata(
        &self,
        movie: &mut Movie,
        children: &[FsEntry],
        options: &MetadataRefreshOptions,
        cancel: &CancellationToken,
    ) -> Result<RefreshHookOutcome> {
        self.base
            .before_refresh(&mut movie.item, options, cancel)
            .await?;

        // Must have a parent to have special features
        if !movie.supports_special_features() {
            debug!(
                target: "refresh::hook",
                location = ?movie.item.location_type,
                has_parent = movie.item.parent_id.is_some(),
                mixed_folder = movie.item.is_in_mixed_folder,
                "skipping special features"
            );
            return Ok(RefreshHookOutcome::Skipped);
        }

        let outcome = match self
            .reconciler
            .reconcile(movie, children, options, cancel)
            .await?
        {
            Reconciliation::Committed { changed } => {
                RefreshHookOutcome::Reconciled { changed }
            }
            Reconciliation::Cancelled => RefreshHookOutcome::Cancelled,
        };

        if outcome.requires_save() {
            options.request_force_save();
        }

        Ok(outcome)
    }
}

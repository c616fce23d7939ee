//! Seams to the collaborators that live outside this crate.
//!
//! The reconciliation flow only depends on these traits. Bundled adapters
//! (`VideoPathResolver`, `InMemoryItemRepository`, `NoopPreRefresh`) cover the
//! simple cases and tests; the library server plugs in its own.

use std::path::PathBuf;

use async_trait::async_trait;
use marquee_model::{BaseItem, ItemId, Video};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::refresh::options::MetadataRefreshOptions;

/// Turns filesystem paths into typed library items.
#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Resolve `paths` into videos. Paths that do not describe a video are
    /// dropped; the result may be shorter than the input.
    async fn resolve_paths(
        &self,
        paths: &[PathBuf],
        parent: Option<ItemId>,
    ) -> Result<Vec<Video>>;
}

/// Read access to persisted library items.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// `Ok(None)` when the item has never been saved.
    async fn get_item_by_id(&self, id: ItemId) -> Result<Option<Video>>;
}

/// Full metadata refresh of a single item.
#[async_trait]
pub trait ItemRefresher: Send + Sync {
    async fn refresh_item(
        &self,
        item: &Video,
        options: &MetadataRefreshOptions,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// The generic pre-refresh step every item runs before type-specific work.
#[async_trait]
pub trait ItemPreRefresh: Send + Sync {
    async fn before_refresh(
        &self,
        item: &mut BaseItem,
        options: &MetadataRefreshOptions,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// Pre-refresh step that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPreRefresh;

#[async_trait]
impl ItemPreRefresh for NoopPreRefresh {
    async fn before_refresh(
        &self,
        _item: &mut BaseItem,
        _options: &MetadataRefreshOptions,
        _cancel: &CancellationToken,
    ) -> Result<()> {
        Ok(())
    }
}

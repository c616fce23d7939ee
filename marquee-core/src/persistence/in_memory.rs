use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use marquee_model::{ItemId, Video};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::ports::ItemRepository;

/// Process-local item store keyed by id.
#[derive(Clone, Debug, Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<HashMap<ItemId, Video>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `item`.
    pub async fn save(&self, item: Video) {
        self.items.write().await.insert(item.id(), item);
    }

    pub async fn remove(&self, id: ItemId) -> Option<Video> {
        self.items.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn get_item_by_id(&self, id: ItemId) -> Result<Option<Video>> {
        let guard = self.items.read().await;
        Ok(guard.get(&id).cloned())
    }
}

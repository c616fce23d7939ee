use crate::error::{ModelError, Result};
use std::path::Path;
use uuid::Uuid;

/// Namespace used to derive stable item ids from filesystem paths.
const ITEM_PATH_NAMESPACE: Uuid =
    Uuid::from_u128(0x6d61_7271_7565_4e53_8000_0000_6974_656d);

/// Strongly typed ID for library items (movies, videos, folders).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub Uuid);

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemId {
    pub fn new() -> Self {
        ItemId(Uuid::now_v7())
    }

    /// Derive the identity of an item from its kind and resolved path.
    ///
    /// The path is lowercased first, so the same file always maps to the
    /// same id regardless of how the casing was reported by the scan.
    pub fn from_path(kind: &str, path: &Path) -> Self {
        let key = format!(
            "{}{}",
            kind,
            path.to_string_lossy().to_lowercase()
        );
        ItemId(Uuid::new_v5(&ITEM_PATH_NAMESPACE, key.as_bytes()))
    }

    pub fn parse_str(id: &str) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(ModelError::InvalidId(
                "Item ID cannot be empty".to_string(),
            ));
        }
        Uuid::parse_str(id.trim())
            .map(ItemId)
            .map_err(|e| ModelError::InvalidId(format!("{id}: {e}")))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for ItemId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ItemId {
    fn from(value: Uuid) -> Self {
        ItemId(value)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

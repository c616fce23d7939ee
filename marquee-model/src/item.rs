use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::ids::ItemId;
use crate::provider::ProviderIds;

/// Where an item's content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocationType {
    /// Backed by a file or folder on disk.
    #[default]
    FileSystem,
    /// Known only from metadata (e.g. a missing or upcoming title).
    Virtual,
}

/// Fields every library item carries, composed into the concrete item types.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseItem {
    pub id: ItemId,
    pub name: String,
    pub path: PathBuf,
    pub location_type: LocationType,
    /// Containing folder. `None` means the item is not part of the
    /// parent/child tree.
    pub parent_id: Option<ItemId>,
    /// The containing folder holds several unrelated titles.
    pub is_in_mixed_folder: bool,
    pub provider_ids: ProviderIds,
    pub production_year: Option<i32>,
    pub premiere_date: Option<DateTime<Utc>>,
}

impl BaseItem {
    pub fn new(id: ItemId, name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            id,
            name: name.into(),
            path,
            location_type: LocationType::FileSystem,
            parent_id: None,
            is_in_mixed_folder: false,
            provider_ids: ProviderIds::new(),
            production_year: None,
            premiere_date: None,
        }
    }

    pub fn is_file_system_backed(&self) -> bool {
        self.location_type == LocationType::FileSystem
    }

    /// Production year, falling back to the premiere date's year.
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;

        self.production_year
            .or_else(|| self.premiere_date.map(|date| date.year()))
    }
}

/// A playable video item. Special features resolve to this type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Video {
    pub item: BaseItem,
}

impl Video {
    /// Identity kind used when deriving ids from paths.
    pub const KIND: &'static str = "video";

    /// Build a video whose id is derived from `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = ItemId::from_path(Self::KIND, &path);
        Self {
            item: BaseItem::new(id, name, path),
        }
    }

    pub fn id(&self) -> ItemId {
        self.item.id
    }

    pub fn path(&self) -> &Path {
        &self.item.path
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }
}

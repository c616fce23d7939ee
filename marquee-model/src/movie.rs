//! Movie entity and the data derived from it for provider lookups.

use std::path::PathBuf;

use url::Url;

use crate::ids::ItemId;
use crate::item::BaseItem;
use crate::provider::{MetadataProvider, ProviderIds};
use crate::user::UserConfiguration;

/// Providers consulted, in order, when choosing a user data key.
pub const USER_DATA_KEY_PROVIDERS: [MetadataProvider; 2] =
    [MetadataProvider::Tmdb, MetadataProvider::Imdb];

/// A trailer hosted outside the library.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaUrl {
    pub url: Url,
    pub name: Option<String>,
}

/// A movie in the library.
///
/// Child items (special features, trailers, theme media) are owned by the
/// item repository; the movie only stores their ids. `special_feature_ids`
/// is rewritten as a whole by special-feature reconciliation and is kept in
/// path order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movie {
    pub item: BaseItem,
    pub special_feature_ids: Vec<ItemId>,
    pub soundtrack_ids: Vec<ItemId>,
    pub theme_song_ids: Vec<ItemId>,
    pub theme_video_ids: Vec<ItemId>,
    pub local_trailer_ids: Vec<ItemId>,
    pub remote_trailers: Vec<MediaUrl>,
    pub tags: Vec<String>,
    pub taglines: Vec<String>,
    pub keywords: Vec<String>,
    pub preferred_metadata_language: Option<String>,
    pub preferred_metadata_country_code: Option<String>,
    pub award_summary: Option<String>,
    pub metascore: Option<f32>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub critic_rating: Option<f32>,
    pub critic_rating_summary: Option<String>,
    pub tmdb_collection_name: Option<String>,
}

impl Movie {
    /// Identity kind used when deriving ids from paths.
    pub const KIND: &'static str = "movie";

    pub fn new(item: BaseItem) -> Self {
        Self {
            item,
            special_feature_ids: Vec::new(),
            soundtrack_ids: Vec::new(),
            theme_song_ids: Vec::new(),
            theme_video_ids: Vec::new(),
            local_trailer_ids: Vec::new(),
            remote_trailers: Vec::new(),
            tags: Vec::new(),
            taglines: Vec::new(),
            keywords: Vec::new(),
            preferred_metadata_language: None,
            preferred_metadata_country_code: None,
            award_summary: None,
            metascore: None,
            budget: None,
            revenue: None,
            critic_rating: None,
            critic_rating_summary: None,
            tmdb_collection_name: None,
        }
    }

    /// Build a file-backed movie whose id is derived from `path`.
    pub fn from_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = ItemId::from_path(Self::KIND, &path);
        Self::new(BaseItem::new(id, name, path))
    }

    pub fn id(&self) -> ItemId {
        self.item.id
    }

    /// Stable key for per-user data (watch state, ratings).
    ///
    /// Prefers the TMDB id, then the IMDb id, then the item id.
    pub fn user_data_key(&self) -> String {
        USER_DATA_KEY_PROVIDERS
            .iter()
            .find_map(|provider| self.item.provider_ids.get(*provider))
            .map(str::to_owned)
            .unwrap_or_else(|| self.item.id.to_string())
    }

    /// Whether unrated movies are hidden for a user with `config`.
    pub fn block_unrated(&self, config: &UserConfiguration) -> bool {
        config.block_unrated_movies
    }

    /// Special features only apply to movies that live in their own folder
    /// inside the parent/child tree.
    pub fn supports_special_features(&self) -> bool {
        self.item.is_file_system_backed()
            && self.item.parent_id.is_some()
            && !self.item.is_in_mixed_folder
    }

    pub fn lookup_info(&self) -> MovieLookupInfo {
        MovieLookupInfo {
            name: self.item.name.clone(),
            year: self.item.year(),
            provider_ids: self.item.provider_ids.clone(),
            metadata_language: self.preferred_metadata_language.clone(),
            metadata_country_code: self.preferred_metadata_country_code.clone(),
        }
    }
}

/// Search hints handed to metadata providers when identifying a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieLookupInfo {
    pub name: String,
    pub year: Option<i32>,
    pub provider_ids: ProviderIds,
    pub metadata_language: Option<String>,
    pub metadata_country_code: Option<String>,
}

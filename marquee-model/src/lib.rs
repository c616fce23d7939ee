//! Core data model definitions shared across Marquee crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod item;
pub mod movie;
pub mod provider;
pub mod user;

pub use error::{ModelError, Result as ModelResult};
pub use ids::ItemId;
pub use item::{BaseItem, LocationType, Video};
pub use movie::{MediaUrl, Movie, MovieLookupInfo, USER_DATA_KEY_PROVIDERS};
pub use provider::{MetadataProvider, ProviderIds};
pub use user::UserConfiguration;

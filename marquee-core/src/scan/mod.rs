//! Filesystem access and special-feature discovery.

pub mod fs;
pub mod resolver;
pub mod settings;
pub mod special_features;

pub use fs::{FileSystem, FsEntry, InMemoryFs, RealFs};
pub use resolver::VideoPathResolver;
pub use settings::SpecialFeatureSettings;
pub use special_features::SpecialFeatureScanner;

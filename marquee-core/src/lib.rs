//! # Marquee Core
//!
//! Keeps a movie's special features (bonus videos in `extras` / `specials`
//! folders) in sync with its stored child ids, and cascades metadata
//! refresh into those children as part of the outer refresh pipeline.
//!
//! ## Architecture
//!
//! - [`scan`]: filesystem access and special-feature discovery
//! - [`refresh`]: the movie pre-refresh hook and the reconciliation it runs
//! - [`ports`]: traits for the resolver, repository and per-item refresh
//! - [`persistence`]: bundled in-memory repository
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use marquee_core::ports::ItemRefresher;
//! use marquee_core::persistence::InMemoryItemRepository;
//! use marquee_core::refresh::{
//!     MetadataRefreshOptions, MovieRefreshHook, SpecialFeatureReconciler,
//! };
//! use marquee_core::scan::{
//!     FileSystem, RealFs, SpecialFeatureScanner, VideoPathResolver,
//! };
//! use marquee_model::Movie;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn refresh(
//!     movie: &mut Movie,
//!     refresher: Arc<dyn ItemRefresher>,
//! ) -> marquee_core::error::Result<bool> {
//!     let fs = Arc::new(RealFs::new());
//!     let folder = movie.item.path.parent().unwrap_or(Path::new("/"));
//!     let children = fs.read_dir(folder).await?;
//!
//!     let scanner = SpecialFeatureScanner::new(
//!         fs,
//!         Arc::new(VideoPathResolver::new()),
//!         Arc::new(InMemoryItemRepository::new()),
//!     );
//!     let hook = MovieRefreshHook::new(SpecialFeatureReconciler::new(
//!         scanner, refresher,
//!     ));
//!
//!     let options = MetadataRefreshOptions::default();
//!     hook.before_refresh_metadata(
//!         movie,
//!         &children,
//!         &options,
//!         &CancellationToken::new(),
//!     )
//!     .await?;
//!     Ok(options.force_save())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Error types and error handling utilities
pub mod error;

/// Bundled item repository adapters
pub mod persistence;

/// Traits for collaborators outside this crate
pub mod ports;

/// Movie pre-refresh hook and special-feature reconciliation
pub mod refresh;

/// Filesystem listing and special-feature discovery
pub mod scan;

pub use error::{MediaError, Result};
pub use marquee_model as model;

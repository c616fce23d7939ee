//! Movie refresh steps: the pre-refresh hook and special-feature
//! reconciliation it drives.

pub mod hook;
pub mod options;
pub mod reconcile;

pub use hook::{MovieRefreshHook, RefreshHookOutcome};
pub use options::{MetadataRefreshMode, MetadataRefreshOptions};
pub use reconcile::{Reconciliation, SpecialFeatureReconciler};

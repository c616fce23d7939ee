use std::sync::Arc;

use futures::future::try_join_all;
use marquee_model::{ItemId, Movie, Video};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{MediaError, Result};
use crate::ports::ItemRefresher;
use crate::refresh::options::MetadataRefreshOptions;
use crate::scan::fs::FsEntry;
use crate::scan::special_features::SpecialFeatureScanner;

/// Result of one reconciliation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Every child refreshed and the new id list was stored.
    Committed { changed: bool },
    /// Cancelled before the commit; the stored ids are untouched.
    Cancelled,
}

impl Reconciliation {
    pub fn changed(&self) -> bool {
        matches!(self, Reconciliation::Committed { changed: true })
    }
}

/// Keeps `Movie::special_feature_ids` in step with the special features on
/// disk and refreshes every one of them.
///
/// Callers must not reconcile the same movie twice concurrently; the `&mut`
/// receiver on [`SpecialFeatureReconciler::reconcile`] makes that hard to do
/// by accident. Different movies can be reconciled in parallel.
#[derive(Clone)]
pub struct SpecialFeatureReconciler {
    scanner: SpecialFeatureScanner,
    refresher: Arc<dyn ItemRefresher>,
}

impl std::fmt::Debug for SpecialFeatureReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialFeatureReconciler")
            .field("scanner", &self.scanner)
            .finish_non_exhaustive()
    }
}

impl SpecialFeatureReconciler {
    pub fn new(
        scanner: SpecialFeatureScanner,
        refresher: Arc<dyn ItemRefresher>,
    ) -> Self {
        Self { scanner, refresher }
    }

    pub fn scanner(&self) -> &SpecialFeatureScanner {
        &self.scanner
    }

    /// Scan, diff, refresh all children, then commit.
    ///
    /// `changed` compares the stored and scanned id lists element by element,
    /// so a reordering counts as a change. The scanned list is stored only
    /// once every child refresh has succeeded, and is stored even when
    /// nothing changed. Any child failure aborts the cycle without touching
    /// the stored ids. The token is watched during the scan and during the
    /// join; either way the outcome is [`Reconciliation::Cancelled`].
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(movie_id = %movie.id())
    )]
    pub async fn reconcile(
        &self,
        movie: &mut Movie,
        children: &[FsEntry],
        options: &MetadataRefreshOptions,
        cancel: &CancellationToken,
    ) -> Result<Reconciliation> {
        let new_items = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(
                    target: "refresh::special_features",
                    "special feature scan cancelled; keeping stored ids"
                );
                return Ok(Reconciliation::Cancelled);
            }
            scanned = self.scanner.load_special_features(children) => scanned?,
        };
        let new_item_ids: Vec<ItemId> =
            new_items.iter().map(Video::id).collect();

        let changed = movie.special_feature_ids != new_item_ids;
        debug!(
            target: "refresh::special_features",
            stored = movie.special_feature_ids.len(),
            scanned = new_item_ids.len(),
            changed,
            "compared special feature ids"
        );

        let refreshes = new_items.iter().map(|item| async move {
            self.refresher
                .refresh_item(item, options, cancel)
                .await
                .map_err(|err| match err {
                    MediaError::Cancelled(_)
                    | MediaError::RefreshFailed { .. } => err,
                    other => MediaError::RefreshFailed {
                        id: item.id(),
                        reason: other.to_string(),
                    },
                })
        });

        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(
                    target: "refresh::special_features",
                    "special feature refresh cancelled; keeping stored ids"
                );
                return Ok(Reconciliation::Cancelled);
            }
            joined = try_join_all(refreshes) => joined,
        };

        match joined {
            Ok(_) => {}
            Err(err) if err.is_cancelled() => {
                info!(
                    target: "refresh::special_features",
                    error = %err,
                    "special feature refresh cancelled; keeping stored ids"
                );
                return Ok(Reconciliation::Cancelled);
            }
            Err(err) => {
                warn!(
                    target: "refresh::special_features",
                    error = %err,
                    "special feature refresh failed; keeping stored ids"
                );
                return Err(err);
            }
        }

        movie.special_feature_ids = new_item_ids;

        if changed {
            info!(
                target: "refresh::special_features",
                count = movie.special_feature_ids.len(),
                "special features changed"
            );
        }

        Ok(Reconciliation::Committed { changed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryItemRepository;
    use crate::ports::{ItemRepository, PathResolver};
    use crate::scan::fs::{FileSystem, InMemoryFs};
    use crate::scan::resolver::VideoPathResolver;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const MOVIE_DIR: &str = "/movies/Alien (1979)";

    #[derive(Default)]
    struct RecordingRefresher {
        refreshed: Mutex<Vec<PathBuf>>,
        fail_on: HashSet<PathBuf>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl RecordingRefresher {
        fn failing_on(path: &str) -> Self {
            Self {
                fail_on: HashSet::from([PathBuf::from(path)]),
                ..Self::default()
            }
        }

        fn refreshed(&self) -> Vec<PathBuf> {
            let mut paths = self.refreshed.lock().unwrap().clone();
            paths.sort();
            paths
        }
    }

    #[async_trait]
    impl ItemRefresher for RecordingRefresher {
        async fn refresh_item(
            &self,
            item: &Video,
            _options: &MetadataRefreshOptions,
            _cancel: &CancellationToken,
        ) -> Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on.contains(item.path()) {
                return Err(MediaError::Io(std::io::Error::other(
                    "provider timeout",
                )));
            }
            self.refreshed.lock().unwrap().push(item.path().to_path_buf());
            Ok(())
        }
    }

    /// Never finishes unless cancelled.
    struct StallingRefresher;

    #[async_trait]
    impl ItemRefresher for StallingRefresher {
        async fn refresh_item(
            &self,
            _item: &Video,
            _options: &MetadataRefreshOptions,
            _cancel: &CancellationToken,
        ) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    /// Reports cancellation through its own result.
    struct CancelledRefresher;

    #[async_trait]
    impl ItemRefresher for CancelledRefresher {
        async fn refresh_item(
            &self,
            item: &Video,
            _options: &MetadataRefreshOptions,
            _cancel: &CancellationToken,
        ) -> Result<()> {
            Err(MediaError::Cancelled(item.name().to_string()))
        }
    }

    struct BrokenResolver;

    #[async_trait]
    impl PathResolver for BrokenResolver {
        async fn resolve_paths(
            &self,
            paths: &[PathBuf],
            _parent: Option<ItemId>,
        ) -> Result<Vec<Video>> {
            Err(MediaError::Resolution {
                path: paths[0].clone(),
                reason: "unsupported container".into(),
            })
        }
    }

    /// Resolves nothing until the test is over.
    struct StallingResolver;

    #[async_trait]
    impl PathResolver for StallingResolver {
        async fn resolve_paths(
            &self,
            _paths: &[PathBuf],
            _parent: Option<ItemId>,
        ) -> Result<Vec<Video>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    struct OfflineRepository;

    #[async_trait]
    impl ItemRepository for OfflineRepository {
        async fn get_item_by_id(&self, _id: ItemId) -> Result<Option<Video>> {
            Err(MediaError::Io(std::io::Error::other("database offline")))
        }
    }

    fn movie() -> Movie {
        let mut movie =
            Movie::from_path("Alien", format!("{MOVIE_DIR}/Alien.mkv"));
        movie.item.parent_id = Some(ItemId::new());
        movie
    }

    fn reconciler(
        fs: InMemoryFs,
        refresher: Arc<dyn ItemRefresher>,
    ) -> SpecialFeatureReconciler {
        let scanner = SpecialFeatureScanner::new(
            Arc::new(fs),
            Arc::new(VideoPathResolver::new()),
            Arc::new(InMemoryItemRepository::new()),
        );
        SpecialFeatureReconciler::new(scanner, refresher)
    }

    async fn children(fs: &InMemoryFs) -> Vec<FsEntry> {
        fs.read_dir(Path::new(MOVIE_DIR)).await.unwrap()
    }

    fn id_of(path: &str) -> ItemId {
        Video::from_path(path).id()
    }

    fn three_extras() -> InMemoryFs {
        let mut fs = InMemoryFs::new();
        fs.add_file(format!("{MOVIE_DIR}/Alien.mkv"));
        fs.add_file(format!("{MOVIE_DIR}/extras/a.mkv"));
        fs.add_file(format!("{MOVIE_DIR}/extras/b.mkv"));
        fs.add_file(format!("{MOVIE_DIR}/extras/c.mkv"));
        fs
    }

    #[tokio::test]
    async fn first_scan_reports_change_and_commits() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let refresher = Arc::new(RecordingRefresher::default());
        let reconciler = reconciler(fs, refresher.clone());
        let mut movie = movie();

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciliation::Committed { changed: true });
        assert_eq!(
            movie.special_feature_ids,
            vec![
                id_of("/movies/Alien (1979)/extras/a.mkv"),
                id_of("/movies/Alien (1979)/extras/b.mkv"),
                id_of("/movies/Alien (1979)/extras/c.mkv"),
            ]
        );
        assert_eq!(refresher.refreshed().len(), 3);
    }

    #[tokio::test]
    async fn second_scan_without_changes_is_unchanged() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let reconciler =
            reconciler(fs, Arc::new(RecordingRefresher::default()));
        let mut movie = movie();
        let options = MetadataRefreshOptions::default();
        let cancel = CancellationToken::new();

        reconciler
            .reconcile(&mut movie, &entries, &options, &cancel)
            .await
            .unwrap();
        let first = movie.special_feature_ids.clone();

        let outcome = reconciler
            .reconcile(&mut movie, &entries, &options, &cancel)
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Committed { changed: false });
        assert_eq!(movie.special_feature_ids, first);
    }

    #[tokio::test]
    async fn reordered_ids_count_as_changed() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let reconciler =
            reconciler(fs, Arc::new(RecordingRefresher::default()));
        let mut movie = movie();
        movie.special_feature_ids = vec![
            id_of("/movies/Alien (1979)/extras/c.mkv"),
            id_of("/movies/Alien (1979)/extras/b.mkv"),
            id_of("/movies/Alien (1979)/extras/a.mkv"),
        ];

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(outcome.changed());
        assert_eq!(
            movie.special_feature_ids[0],
            id_of("/movies/Alien (1979)/extras/a.mkv")
        );
    }

    #[tokio::test]
    async fn empty_scan_over_empty_state_is_unchanged() {
        let mut fs = InMemoryFs::new();
        fs.add_file(format!("{MOVIE_DIR}/Alien.mkv"));
        let entries = children(&fs).await;
        let reconciler =
            reconciler(fs, Arc::new(RecordingRefresher::default()));
        let mut movie = movie();

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Committed { changed: false });
        assert!(movie.special_feature_ids.is_empty());
    }

    #[tokio::test]
    async fn empty_scan_over_stored_ids_clears_them() {
        let mut fs = InMemoryFs::new();
        fs.add_file(format!("{MOVIE_DIR}/Alien.mkv"));
        let entries = children(&fs).await;
        let reconciler =
            reconciler(fs, Arc::new(RecordingRefresher::default()));
        let mut movie = movie();
        movie.special_feature_ids = vec![ItemId::new()];

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Committed { changed: true });
        assert!(movie.special_feature_ids.is_empty());
    }

    #[tokio::test]
    async fn one_failed_child_keeps_previous_ids() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let refresher = Arc::new(RecordingRefresher::failing_on(
            "/movies/Alien (1979)/extras/b.mkv",
        ));
        let reconciler = reconciler(fs, refresher);
        let mut movie = movie();
        let before = vec![ItemId::new(), ItemId::new()];
        movie.special_feature_ids = before.clone();

        let err = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            MediaError::RefreshFailed { id, reason } => {
                assert_eq!(id, id_of("/movies/Alien (1979)/extras/b.mkv"));
                assert!(reason.contains("provider timeout"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(movie.special_feature_ids, before);
    }

    #[tokio::test]
    async fn child_refreshes_run_concurrently() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let refresher = Arc::new(RecordingRefresher::default());
        let reconciler = reconciler(fs, refresher.clone());
        let mut movie = movie();

        reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(refresher.max_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancelled_token_skips_everything() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let refresher = Arc::new(RecordingRefresher::default());
        let reconciler = reconciler(fs, refresher.clone());
        let mut movie = movie();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Cancelled);
        assert!(movie.special_feature_ids.is_empty());
        assert!(refresher.refreshed().is_empty());
    }

    #[tokio::test]
    async fn cancellation_during_join_skips_commit() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let reconciler = reconciler(fs, Arc::new(StallingRefresher));
        let mut movie = movie();
        let before = vec![ItemId::new()];
        movie.special_feature_ids = before.clone();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Cancelled);
        assert_eq!(movie.special_feature_ids, before);
    }

    #[tokio::test]
    async fn child_reporting_cancellation_is_not_an_error() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let reconciler = reconciler(fs, Arc::new(CancelledRefresher));
        let mut movie = movie();

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Cancelled);
        assert!(movie.special_feature_ids.is_empty());
    }

    fn reconciler_with(
        fs: InMemoryFs,
        resolver: Arc<dyn PathResolver>,
        repository: Arc<dyn ItemRepository>,
        refresher: Arc<RecordingRefresher>,
    ) -> SpecialFeatureReconciler {
        let scanner =
            SpecialFeatureScanner::new(Arc::new(fs), resolver, repository);
        SpecialFeatureReconciler::new(scanner, refresher)
    }

    #[tokio::test]
    async fn resolver_failure_keeps_previous_ids() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let refresher = Arc::new(RecordingRefresher::default());
        let reconciler = reconciler_with(
            fs,
            Arc::new(BrokenResolver),
            Arc::new(InMemoryItemRepository::new()),
            refresher.clone(),
        );
        let mut movie = movie();
        let before = vec![id_of("/movies/Alien (1979)/extras/a.mkv")];
        movie.special_feature_ids = before.clone();

        let err = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            MediaError::Resolution { path, reason } => {
                assert_eq!(
                    path,
                    PathBuf::from("/movies/Alien (1979)/extras/a.mkv")
                );
                assert_eq!(reason, "unsupported container");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(movie.special_feature_ids, before);
        assert!(refresher.refreshed().is_empty());
    }

    #[tokio::test]
    async fn repository_failure_keeps_previous_ids() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let refresher = Arc::new(RecordingRefresher::default());
        let reconciler = reconciler_with(
            fs,
            Arc::new(VideoPathResolver::new()),
            Arc::new(OfflineRepository),
            refresher.clone(),
        );
        let mut movie = movie();
        let before = vec![id_of("/movies/Alien (1979)/extras/a.mkv")];
        movie.special_feature_ids = before.clone();

        let err = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::Io(_)), "{err:?}");
        assert!(err.to_string().contains("database offline"));
        assert_eq!(movie.special_feature_ids, before);
        assert!(refresher.refreshed().is_empty());
    }

    #[tokio::test]
    async fn cancellation_during_scan_skips_refresh_and_commit() {
        let fs = three_extras();
        let entries = children(&fs).await;
        let refresher = Arc::new(RecordingRefresher::default());
        let reconciler = reconciler_with(
            fs,
            Arc::new(StallingResolver),
            Arc::new(InMemoryItemRepository::new()),
            refresher.clone(),
        );
        let mut movie = movie();
        let before = vec![ItemId::new()];
        movie.special_feature_ids = before.clone();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = reconciler
            .reconcile(
                &mut movie,
                &entries,
                &MetadataRefreshOptions::default(),
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Cancelled);
        assert_eq!(movie.special_feature_ids, before);
        assert!(refresher.refreshed().is_empty());
    }
}

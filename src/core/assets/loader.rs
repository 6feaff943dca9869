//=========================================================================
// Asset Loader
//=========================================================================
//
// Parallel fan-out / fan-in over an asset table.
//
// Architecture:
// ```text
//   AssetTable ──jobs (bounded)──> [worker 0..N] ──fetch + decode──┐
//                                                                  │
//   AssetRegistry <──outstanding == 0── collector <──done──────────┘
// ```
//
// Every descriptor produces exactly one result on the done channel. The
// collector counts outstanding results down to zero; the first failure
// raises the abort flag and ends the batch. Workers run in a thread scope,
// so none outlives the call that produced the registry.
//
// Only fetches are retried. Decoding is deterministic.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, TryRecvError};
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::decode::{decode, LoadedAsset};
use super::descriptor::{AssetDescriptor, AssetTable};
use super::error::LoadError;
use super::registry::AssetRegistry;
use super::source::{AssetSource, FsSource};

//=== RetryPolicy =========================================================

/// Bounded retry for fetch failures.
///
/// Attempt `n` (1-based) that fails waits `backoff * n` before the next.
///
/// Default: 3 attempts, 50 ms backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

//=== AssetLoader =========================================================

const DEFAULT_WORKERS: usize = 4;

/// Loads an [`AssetTable`] into an [`AssetRegistry`], all or nothing.
///
/// Each call is independent: no caching across calls, and every call
/// yields a fresh registry.
///
/// # Examples
///
/// ```ignore
/// let table = AssetTable::from_pairs([("font", "f.font"), ("tex", "f.png")])?;
/// let registry = AssetLoader::new("assets").with_workers(2).load(&table)?;
/// assert!(registry.font("font").is_some());
/// ```
#[derive(Clone)]
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    workers: usize,
    retry: RetryPolicy,
}

impl AssetLoader {
    //--- Construction -----------------------------------------------------

    /// Loader reading from the filesystem under `base`.
    pub fn new(base: impl Into<std::path::PathBuf>) -> Self {
        Self::with_source(FsSource::new(base))
    }

    /// Loader reading from an arbitrary source.
    pub fn with_source(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            workers: DEFAULT_WORKERS,
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the worker pool size.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        assert!(workers > 0, "Worker count must be positive");
        self.workers = workers;
        self
    }

    /// Sets the fetch retry policy.
    ///
    /// # Panics
    ///
    /// Panics if `policy.max_attempts == 0`.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        assert!(policy.max_attempts > 0, "Retry policy needs at least one attempt");
        self.retry = policy;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    //--- Loading ----------------------------------------------------------

    /// Loads every descriptor in `table` and blocks until the batch
    /// completes or fails.
    ///
    /// # Errors
    ///
    /// The first [`LoadError`] reported by any worker. Remaining jobs are
    /// abandoned and no partial registry is returned.
    pub fn load(&self, table: &AssetTable) -> Result<AssetRegistry, LoadError> {
        let total = table.len();
        if total == 0 {
            info!(target: "assets", "Asset table is empty, nothing to load");
            return Ok(AssetRegistry::default());
        }

        let workers = self.workers.min(total);
        info!(target: "assets", "Loading {} assets on {} workers", total, workers);

        //--- Fan-out -------------------------------------------------------
        let (job_tx, job_rx) = bounded::<&AssetDescriptor>(total);
        for descriptor in table.iter() {
            if job_tx.send(descriptor).is_err() {
                break;
            }
        }
        drop(job_tx);

        let (done_tx, done_rx) = unbounded::<(String, Result<LoadedAsset, LoadError>)>();
        let abort = AtomicBool::new(false);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let jobs = job_rx.clone();
                    let done = done_tx.clone();
                    let abort = &abort;

                    scope.spawn(move || {
                        for descriptor in jobs.iter() {
                            if abort.load(Ordering::Relaxed) {
                                break;
                            }
                            let result = self.resolve(descriptor, abort);
                            if done.send((descriptor.name().to_string(), result)).is_err() {
                                break;
                            }
                        }
                        trace!(target: "assets", "Loader worker {} finished", worker);
                    })
                })
                .collect();
            drop(done_tx);

            //--- Fan-in ----------------------------------------------------
            let outcome = Self::collect(&done_rx, total, &abort);

            for handle in handles {
                if handle.join().is_err() {
                    error!(target: "assets", "Loader worker panicked");
                }
            }

            outcome
        })
    }

    /// Loads `table` and hands the registry to `on_ready`.
    ///
    /// `on_ready` runs exactly once on success and never on failure.
    pub fn load_then<F, R>(&self, table: &AssetTable, on_ready: F) -> Result<R, LoadError>
    where
        F: FnOnce(AssetRegistry) -> R,
    {
        let registry = self.load(table)?;
        Ok(on_ready(registry))
    }

    /// Runs the batch on a background thread.
    ///
    /// Poll the returned handle from a non-blocking host loop.
    pub fn spawn(&self, table: AssetTable) -> LoadHandle {
        let loader = self.clone();
        let (tx, rx) = bounded(1);

        let spawned = thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                let _ = tx.send(loader.load(&table));
            });

        if let Err(e) = spawned {
            error!(target: "assets", "Failed to spawn asset loader thread: {}", e);
        }

        LoadHandle { receiver: rx }
    }

    //--- Internal Helpers -------------------------------------------------

    fn collect(
        done: &Receiver<(String, Result<LoadedAsset, LoadError>)>,
        total: usize,
        abort: &AtomicBool,
    ) -> Result<AssetRegistry, LoadError> {
        let mut registry = AssetRegistry::with_capacity(total);
        let mut outstanding = total;

        while outstanding > 0 {
            match done.recv() {
                Ok((name, Ok(asset))) => {
                    outstanding -= 1;
                    debug!(
                        target: "assets",
                        "Loaded `{}` ({:?}), {} outstanding",
                        name,
                        asset.kind(),
                        outstanding
                    );
                    registry.insert(name, asset);
                }
                Ok((_, Err(err))) => {
                    abort.store(true, Ordering::Relaxed);
                    error!(target: "assets", "Asset loading failed: {}", err);
                    return Err(err);
                }
                Err(_) => {
                    error!(
                        target: "assets",
                        "Loader workers exited with {} asset(s) unresolved",
                        outstanding
                    );
                    return Err(LoadError::Incomplete { missing: outstanding });
                }
            }
        }

        info!(target: "assets", "All {} assets loaded", total);
        Ok(registry)
    }

    fn resolve(
        &self,
        descriptor: &AssetDescriptor,
        abort: &AtomicBool,
    ) -> Result<LoadedAsset, LoadError> {
        let bytes = self.fetch_with_retry(descriptor, abort)?;

        decode(descriptor.format(), bytes).map_err(|source| LoadError::Decode {
            name: descriptor.name().to_string(),
            format: descriptor.format(),
            source,
        })
    }

    fn fetch_with_retry(
        &self,
        descriptor: &AssetDescriptor,
        abort: &AtomicBool,
    ) -> Result<Vec<u8>, LoadError> {
        let mut attempt = 1;

        loop {
            match self.source.fetch(descriptor.path()) {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < self.retry.max_attempts && !abort.load(Ordering::Relaxed) => {
                    warn!(
                        target: "assets",
                        "Fetch of `{}` failed (attempt {}/{}): {}",
                        descriptor.name(),
                        attempt,
                        self.retry.max_attempts,
                        e
                    );
                    thread::sleep(self.retry.delay(attempt));
                    attempt += 1;
                }
                Err(source) => {
                    return Err(LoadError::Fetch {
                        name: descriptor.name().to_string(),
                        path: descriptor.path().to_path_buf(),
                        attempts: attempt,
                        source,
                    });
                }
            }
        }
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("workers", &self.workers)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

//=== LoadHandle ==========================================================

/// Outcome of polling a background load.
#[derive(Debug)]
pub enum LoadStatus {
    Pending,
    Ready(AssetRegistry),
    Failed(LoadError),
}

/// Handle to a batch running on a background thread.
///
/// The result is delivered once. Polling after a terminal status reports
/// [`LoadError::LoaderLost`].
#[derive(Debug)]
pub struct LoadHandle {
    receiver: Receiver<Result<AssetRegistry, LoadError>>,
}

impl LoadHandle {
    /// Non-blocking check for the batch result.
    pub fn poll(&self) -> LoadStatus {
        match self.receiver.try_recv() {
            Ok(Ok(registry)) => LoadStatus::Ready(registry),
            Ok(Err(err)) => LoadStatus::Failed(err),
            Err(TryRecvError::Empty) => LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => LoadStatus::Failed(LoadError::LoaderLost),
        }
    }

    /// Blocks until the batch finishes.
    pub fn wait(self) -> Result<AssetRegistry, LoadError> {
        self.receiver.recv().map_err(|_| LoadError::LoaderLost)?
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use crate::core::assets::decode::ImageTexture;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    //--- Test Sources -----------------------------------------------------

    /// In-memory source that counts fetches and can fail a path a fixed
    /// number of times before succeeding.
    #[derive(Default)]
    struct MemorySource {
        files: HashMap<PathBuf, Vec<u8>>,
        failures: Mutex<HashMap<PathBuf, u32>>,
        fetches: Mutex<HashMap<PathBuf, u32>>,
    }

    impl MemorySource {
        fn with(mut self, path: &str, bytes: Vec<u8>) -> Self {
            self.files.insert(PathBuf::from(path), bytes);
            self
        }

        fn failing(self, path: &str, times: u32) -> Self {
            self.failures.lock().unwrap().insert(PathBuf::from(path), times);
            self
        }
    }

    impl AssetSource for Arc<MemorySource> {
        fn fetch(&self, relative: &Path) -> io::Result<Vec<u8>> {
            *self
                .fetches
                .lock()
                .unwrap()
                .entry(relative.to_path_buf())
                .or_insert(0) += 1;

            if let Some(left) = self.failures.lock().unwrap().get_mut(relative) {
                if *left > 0 {
                    *left -= 1;
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "flaky"));
                }
            }

            self.files
                .get(relative)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such asset"))
        }
    }

    fn fetches(source: &MemorySource, path: &str) -> u32 {
        source
            .fetches
            .lock()
            .unwrap()
            .get(Path::new(path))
            .copied()
            .unwrap_or(0)
    }

    struct PanickingSource;

    impl AssetSource for PanickingSource {
        fn fetch(&self, _relative: &Path) -> io::Result<Vec<u8>> {
            panic!("source exploded");
        }
    }

    //--- Fixtures ---------------------------------------------------------

    const FONT: &[u8] = br#"{ "chars": [ { "id": 65, "xadvance": 10 } ] }"#;

    fn png() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])))
            .write_to(&mut io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn quick_retry(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts: attempts,
            backoff: Duration::ZERO,
        }
    }

    //=====================================================================
    // Completion
    //=====================================================================

    #[test]
    fn font_and_texture_resolve_into_exact_key_set() {
        let source = Arc::new(MemorySource::default().with("f.font", FONT.to_vec()).with("f.png", png()));
        let table = AssetTable::from_pairs([("font", "f.font"), ("tex", "f.png")]).unwrap();

        let mut calls = 0;
        let keys = AssetLoader::with_source(source)
            .load_then(&table, |registry| {
                calls += 1;
                assert!(registry.font("font").is_some());
                assert_eq!(
                    registry.image("tex").map(|t: &ImageTexture| (t.width, t.height)),
                    Some((2, 2))
                );
                let mut keys: Vec<String> = registry.names().map(String::from).collect();
                keys.sort();
                keys
            })
            .unwrap();

        assert_eq!(keys, vec!["font".to_string(), "tex".to_string()]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn completion_fires_once_after_every_descriptor_resolved() {
        let mut source = MemorySource::default();
        let mut pairs = Vec::new();
        for i in 0..12 {
            let path = format!("tex{}.png", i);
            source = source.with(&path, png());
            pairs.push((format!("tex{}", i), path));
        }
        let source = Arc::new(source);
        let table = AssetTable::from_pairs(pairs).unwrap();

        let calls = AtomicUsize::new(0);
        let resolved = AssetLoader::with_source(source.clone())
            .with_workers(3)
            .load_then(&table, |registry| {
                calls.fetch_add(1, Ordering::SeqCst);
                registry.len()
            })
            .unwrap();

        assert_eq!(resolved, 12, "Callback must observe all N resolutions");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for i in 0..12 {
            assert_eq!(fetches(&source, &format!("tex{}.png", i)), 1, "Each descriptor loads once");
        }
    }

    #[test]
    fn empty_table_completes_with_empty_registry() {
        let loader = AssetLoader::with_source(Arc::new(MemorySource::default()));
        let mut calls = 0;

        loader
            .load_then(&AssetTable::new(), |registry| {
                calls += 1;
                assert!(registry.is_empty());
            })
            .unwrap();

        assert_eq!(calls, 1);
    }

    #[test]
    fn repeated_loads_produce_fresh_registries() {
        let source = Arc::new(MemorySource::default().with("f.png", png()));
        let table = AssetTable::from_pairs([("tex", "f.png")]).unwrap();
        let loader = AssetLoader::with_source(source.clone());

        let first = loader.load(&table).unwrap();
        let second = loader.load(&table).unwrap();

        assert!(!Arc::ptr_eq(&first.get("tex").unwrap(), &second.get("tex").unwrap()));
        assert_eq!(fetches(&source, "f.png"), 2, "No cross-call caching");
    }

    //=====================================================================
    // Failure
    //=====================================================================

    #[test]
    fn one_missing_asset_fails_batch_without_callback() {
        let source = Arc::new(MemorySource::default().with("f.font", FONT.to_vec()));
        let table = AssetTable::from_pairs([("font", "f.font"), ("tex", "missing.png")]).unwrap();

        let mut called = false;
        let err = AssetLoader::with_source(source)
            .with_retry(quick_retry(2))
            .load_then(&table, |_| called = true)
            .unwrap_err();

        assert!(!called, "Completion must never fire after a failure");
        match err {
            LoadError::Fetch { name, attempts, .. } => {
                assert_eq!(name, "tex");
                assert_eq!(attempts, 2);
            }
            other => panic!("Expected Fetch error, got {:?}", other),
        }
    }

    #[test]
    fn decode_failure_is_not_retried() {
        let source = Arc::new(MemorySource::default().with("bad.png", b"not a png".to_vec()));
        let table = AssetTable::from_pairs([("tex", "bad.png")]).unwrap();

        let err = AssetLoader::with_source(source.clone())
            .with_retry(quick_retry(5))
            .load(&table)
            .unwrap_err();

        assert!(matches!(err, LoadError::Decode { ref name, .. } if name == "tex"));
        assert_eq!(fetches(&source, "bad.png"), 1);
    }

    #[test]
    fn transient_fetch_failure_recovers_within_policy() {
        let source = Arc::new(MemorySource::default().with("f.png", png()).failing("f.png", 2));
        let table = AssetTable::from_pairs([("tex", "f.png")]).unwrap();

        let registry = AssetLoader::with_source(source.clone())
            .with_retry(quick_retry(3))
            .load(&table)
            .unwrap();

        assert!(registry.contains("tex"));
        assert_eq!(fetches(&source, "f.png"), 3);
    }

    #[test]
    fn retry_budget_is_bounded() {
        let source = Arc::new(MemorySource::default().with("f.png", png()).failing("f.png", 5));
        let table = AssetTable::from_pairs([("tex", "f.png")]).unwrap();

        let err = AssetLoader::with_source(source.clone())
            .with_retry(quick_retry(3))
            .load(&table)
            .unwrap_err();

        assert!(matches!(err, LoadError::Fetch { attempts: 3, .. }));
        assert_eq!(fetches(&source, "f.png"), 3);
    }

    #[test]
    fn vanished_workers_report_incomplete() {
        let table = AssetTable::from_pairs([("a", "a.png"), ("b", "b.png")]).unwrap();

        let err = AssetLoader::with_source(PanickingSource)
            .with_workers(1)
            .load(&table)
            .unwrap_err();

        assert!(matches!(err, LoadError::Incomplete { missing: 2 }));
    }

    //=====================================================================
    // Configuration
    //=====================================================================

    #[test]
    fn default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay(2), Duration::from_millis(100));
    }

    #[test]
    #[should_panic(expected = "Worker count must be positive")]
    fn zero_workers_panics() {
        AssetLoader::new("assets").with_workers(0);
    }

    #[test]
    #[should_panic(expected = "at least one attempt")]
    fn zero_attempts_panics() {
        AssetLoader::new("assets").with_retry(quick_retry(0));
    }

    //=====================================================================
    // Background Loading
    //=====================================================================

    #[test]
    fn spawned_load_becomes_ready() {
        let source = Arc::new(MemorySource::default().with("f.font", FONT.to_vec()));
        let table = AssetTable::from_pairs([("font", "f.font")]).unwrap();
        let handle = AssetLoader::with_source(source).spawn(table);

        let mut status = handle.poll();
        for _ in 0..500 {
            if !matches!(status, LoadStatus::Pending) {
                break;
            }
            thread::sleep(Duration::from_millis(5));
            status = handle.poll();
        }

        match status {
            LoadStatus::Ready(registry) => assert!(registry.contains("font")),
            other => panic!("Expected Ready, got {:?}", other),
        }
    }

    #[test]
    fn spawned_load_reports_failure() {
        let table = AssetTable::from_pairs([("tex", "gone.png")]).unwrap();
        let handle = AssetLoader::with_source(Arc::new(MemorySource::default()))
            .with_retry(RetryPolicy::none())
            .spawn(table);

        assert!(matches!(handle.wait(), Err(LoadError::Fetch { .. })));
    }

    //=====================================================================
    // Filesystem
    //=====================================================================

    #[test]
    fn loads_from_directory_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.font"), FONT).unwrap();
        std::fs::write(dir.path().join("f.png"), png()).unwrap();

        let table = AssetTable::from_pairs([("font", "f.font"), ("tex", "f.png")]).unwrap();
        let registry = AssetLoader::new(dir.path()).load(&table).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.font("font").unwrap().glyph(65).unwrap().xadvance, 10.0);
    }
}

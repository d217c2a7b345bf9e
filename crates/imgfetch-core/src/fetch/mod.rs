//! Batched image fetch engine.
//!
//! Fetchable locations are cut into contiguous batches of `batch_size`.
//! Batches run one after another; items within a batch run concurrently on
//! the blocking pool, so at most `batch_size` connections are open at once.
//! A failing item is recorded and never affects its siblings. No retries.

mod outcome;
mod transport;

pub use outcome::{FetchOutcome, FetchSummary};
pub use transport::{CurlTransport, Transport};

use crate::config::IngestConfig;
use crate::error::{FetchError, IngestError};
use crate::naming::{local_filename, Stamper};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FetchEngine {
    transport: Arc<dyn Transport>,
    download_dir: PathBuf,
    batch_size: usize,
}

impl FetchEngine {
    pub fn new(transport: Arc<dyn Transport>, download_dir: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            transport,
            download_dir: download_dir.into(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, cfg: &IngestConfig) -> Self {
        Self::new(transport, cfg.download_dir.clone(), cfg.batch_size)
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Fetches every location once. Per-item failures end up in
    /// `FetchSummary::failed`; only a download directory that cannot be
    /// created fails the whole call.
    pub async fn fetch_all(&self, locations: Vec<String>) -> Result<FetchSummary, IngestError> {
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .with_context(|| format!("create download dir {}", self.download_dir.display()))?;

        let mut summary = FetchSummary::default();
        if locations.is_empty() {
            return Ok(summary);
        }

        let mut stamper = Stamper::new();
        let batches = locations.len().div_ceil(self.batch_size);
        for (n, batch) in locations.chunks(self.batch_size).enumerate() {
            tracing::debug!(batch = n + 1, of = batches, size = batch.len(), "fetching batch");
            for outcome in self.run_batch(batch, &mut stamper).await {
                summary.record(outcome);
            }
        }

        tracing::info!(
            saved = summary.successful.len(),
            failed = summary.failed.len(),
            dir = %self.download_dir.display(),
            "fetch finished"
        );
        Ok(summary)
    }

    /// Runs one batch to completion. Outcomes are index-aligned with `batch`.
    async fn run_batch(&self, batch: &[String], stamper: &mut Stamper) -> Vec<FetchOutcome> {
        let handles: Vec<_> = batch
            .iter()
            .map(|location| {
                let location = location.clone();
                let dest = local_filename(&location, &stamper.next_stamp())
                    .map(|name| self.download_dir.join(name));
                let transport = Arc::clone(&self.transport);
                tokio::task::spawn_blocking(move || fetch_one(transport.as_ref(), location, dest))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, location) in handles.into_iter().zip(batch) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => FetchOutcome::Failure {
                    location: location.clone(),
                    error: FetchError::TaskPanicked(e.to_string()),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

fn fetch_one(
    transport: &dyn Transport,
    location: String,
    dest: Result<PathBuf, FetchError>,
) -> FetchOutcome {
    let path = match dest {
        Ok(path) => path,
        Err(error) => return FetchOutcome::Failure { location, error },
    };
    match transport.fetch_to(&location, &path) {
        Ok(bytes) => FetchOutcome::Success {
            location,
            path,
            bytes,
        },
        Err(error) => FetchOutcome::Failure { location, error },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Writes the location into the file; fails for locations containing "bad",
    /// panics for "boom". Tracks peak concurrency and, per call, the logical
    /// clock ticks at which it started and finished.
    #[derive(Default)]
    struct StubTransport {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        clock: AtomicUsize,
        spans: Mutex<Vec<(String, usize, usize)>>,
    }

    impl Transport for StubTransport {
        fn fetch_to(&self, location: &str, dest: &Path) -> Result<u64, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let started = self.clock.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(5));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let finished = self.clock.fetch_add(1, Ordering::SeqCst);
            self.spans
                .lock()
                .unwrap()
                .push((location.to_string(), started, finished));
            if location.contains("boom") {
                panic!("stub panic");
            }
            if location.contains("bad") {
                return Err(FetchError::Http(404));
            }
            std::fs::write(dest, location.as_bytes())?;
            Ok(location.len() as u64)
        }
    }

    fn urls(names: &[&str]) -> Vec<String> {
        names
            .iter()
            .map(|n| format!("http://example.com/{n}"))
            .collect()
    }

    #[tokio::test]
    async fn failures_are_isolated_and_order_kept() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::default());
        let engine = FetchEngine::new(stub.clone(), dir.path().join("downloads"), 2);

        let input = urls(&["a.jpg", "bad1.jpg", "b.jpg", "boom.jpg", "c.jpg"]);
        let summary = engine.fetch_all(input).await.unwrap();

        assert_eq!(summary.successful, urls(&["a.jpg", "b.jpg", "c.jpg"]));
        assert_eq!(summary.failed, urls(&["bad1.jpg", "boom.jpg"]));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 5);
        for path in &summary.saved {
            assert!(path.starts_with(dir.path().join("downloads")));
            assert!(path.exists());
        }
    }

    #[tokio::test]
    async fn peak_concurrency_bounded_by_batch_size() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::default());
        let engine = FetchEngine::new(stub.clone(), dir.path(), 3);

        let names: Vec<String> = (0..10).map(|i| format!("img{i}.png")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let summary = engine.fetch_all(urls(&names)).await.unwrap();

        assert_eq!(summary.successful.len(), 10);
        assert!(stub.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn batches_do_not_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::default());
        let engine = FetchEngine::new(stub.clone(), dir.path(), 3);

        let input: Vec<String> = (0..8)
            .map(|i| format!("http://example.com/img{i}.jpg"))
            .collect();
        let summary = engine.fetch_all(input.clone()).await.unwrap();
        assert_eq!(summary.successful, input);

        let spans = stub.spans.lock().unwrap().clone();
        assert_eq!(spans.len(), 8);
        let batch_of = |loc: &str| input.iter().position(|l| l == loc).unwrap() / 3;
        for (loc_a, _, finished) in &spans {
            for (loc_b, started, _) in &spans {
                if batch_of(loc_b) > batch_of(loc_a) {
                    assert!(
                        finished < started,
                        "{loc_b} started before {loc_a} from an earlier batch finished"
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn same_source_name_gets_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::default());
        let engine = FetchEngine::new(stub.clone(), dir.path(), 50);

        let input = vec![
            "http://a.example.com/img1.jpg".to_string(),
            "http://b.example.com/img1.jpg".to_string(),
        ];
        let summary = engine.fetch_all(input).await.unwrap();
        assert_eq!(summary.successful.len(), 2);
        let distinct: HashSet<_> = summary.saved.iter().collect();
        assert_eq!(distinct.len(), 2);
        for p in &summary.saved {
            let name = p.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with("img1.jpg_"), "{name}");
        }
    }

    #[tokio::test]
    async fn invalid_location_fails_without_transport_call() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::default());
        let engine = FetchEngine::new(stub.clone(), dir.path(), 50);

        let summary = engine
            .fetch_all(vec!["img1.jpg".to_string()])
            .await
            .unwrap();
        assert_eq!(summary.failed, ["img1.jpg"]);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_list_has_no_duplicates_for_unique_input() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::default());
        let engine = FetchEngine::new(stub, dir.path(), 4);

        let names: Vec<String> = (0..9).map(|i| format!("bad{i}.jpg")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let summary = engine.fetch_all(urls(&names)).await.unwrap();

        let distinct: HashSet<_> = summary.failed.iter().collect();
        assert_eq!(distinct.len(), summary.failed.len());
        assert_eq!(summary.failed.len(), 9);
    }

    #[tokio::test]
    async fn empty_input_creates_dir_and_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/downloads");
        let engine = FetchEngine::new(Arc::new(StubTransport::default()), &target, 50);
        let summary = engine.fetch_all(Vec::new()).await.unwrap();
        assert_eq!(summary, FetchSummary::default());
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn uncreatable_dir_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let engine = FetchEngine::new(Arc::new(StubTransport::default()), file.join("sub"), 50);
        let err = engine.fetch_all(urls(&["a.jpg"])).await.unwrap_err();
        assert!(matches!(err, IngestError::Internal(_)));
    }
}

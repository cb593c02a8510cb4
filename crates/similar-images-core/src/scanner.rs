//! Scan pipeline: one discoverer feeding a pool of fingerprinting workers
//! through a bounded channel, all sharing one similarity index.

use crossbeam::channel::{self, select, Receiver};
use indicatif::ProgressBar;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::deduplication::{LogReporter, Reporter, SimilarityIndex};
use crate::discovery::discover;
use crate::error::Result;
use crate::group::TaskGroup;
use crate::processing::{fingerprint_file, DctHasher, PerceptualHasher};
use crate::types::Record;

/// Counts from a completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    pub discovered: usize,
    pub fingerprinted: usize,
    pub exact_duplicates: usize,
    pub close_matches: usize,
    pub elapsed: Duration,
}

impl ScanSummary {
    pub fn findings(&self) -> usize {
        self.exact_duplicates + self.close_matches
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} images fingerprinted ({} discovered), {} possible duplicates, {} close matches in {:.2?}",
            self.fingerprinted,
            self.discovered,
            self.exact_duplicates,
            self.close_matches,
            self.elapsed
        )
    }
}

#[derive(Default)]
struct Counters {
    discovered: AtomicUsize,
    fingerprinted: AtomicUsize,
    exact_duplicates: AtomicUsize,
    close_matches: AtomicUsize,
}

/// Main entry point for a similarity scan
pub struct ImageScanner {
    config: Config,
    hasher: Arc<dyn PerceptualHasher>,
    reporter: Arc<dyn Reporter>,
    progress: Option<ProgressBar>,
}

impl ImageScanner {
    /// Create a scanner using the DCT hasher and reporting through the logger
    pub fn new(config: Config) -> Self {
        Self {
            config,
            hasher: Arc::new(DctHasher::new()),
            reporter: Arc::new(LogReporter),
            progress: None,
        }
    }

    /// Substitute the fingerprint function
    pub fn with_hasher(mut self, hasher: Arc<dyn PerceptualHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Send findings somewhere other than the logger
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Tick `progress` once per fingerprinted file
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan `root` and report similar images.
    ///
    /// Fails fast: the first traversal, decode or fingerprint error cancels
    /// every task and is returned. Findings already reported stay reported.
    pub fn run<P: AsRef<Path>>(&self, root: P) -> Result<ScanSummary> {
        self.config.validate()?;

        let root = root.as_ref();
        let start = Instant::now();
        let workers = self.config.worker_count();
        info!("Scanning {} with {} workers", root.display(), workers);

        let index = SimilarityIndex::new(self.config.threshold, self.reporter.clone());
        let group = TaskGroup::new();
        let counters = Counters::default();
        let (tx, rx) = channel::bounded::<PathBuf>(self.config.channel_capacity);

        thread::scope(|s| {
            let group = &group;
            let index = &index;
            let counters = &counters;

            s.spawn(move || {
                group.run(|| {
                    let emitted = discover(root, &self.config.extensions, group, tx)?;
                    counters.discovered.store(emitted, Ordering::Relaxed);
                    Ok(())
                })
            });

            for _ in 0..workers {
                let rx = rx.clone();
                s.spawn(move || group.run(|| self.work(rx, group, index, counters)));
            }
            drop(rx);
        });

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
        group.into_result()?;

        let summary = ScanSummary {
            discovered: counters.discovered.load(Ordering::Relaxed),
            fingerprinted: counters.fingerprinted.load(Ordering::Relaxed),
            exact_duplicates: counters.exact_duplicates.load(Ordering::Relaxed),
            close_matches: counters.close_matches.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };
        debug!("{}", summary);
        Ok(summary)
    }

    /// Worker loop: fingerprint paths until the channel closes or the group is cancelled
    fn work(
        &self,
        paths: Receiver<PathBuf>,
        group: &TaskGroup,
        index: &SimilarityIndex,
        counters: &Counters,
    ) -> Result<()> {
        loop {
            let path = select! {
                recv(paths) -> msg => match msg {
                    Ok(path) => path,
                    Err(_) => return Ok(()),
                },
                recv(group.done()) -> _ => return Ok(()),
            };
            if group.is_cancelled() {
                return Ok(());
            }

            let fingerprint = fingerprint_file(&path, self.hasher.as_ref()).map_err(|e| {
                debug!("Worker stopping: {}", e);
                e
            })?;
            counters.fingerprinted.fetch_add(1, Ordering::Relaxed);
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }

            // Nothing is reported once another task has failed
            if group.is_cancelled() {
                return Ok(());
            }
            for finding in index.insert(Record::new(fingerprint, path)) {
                let counter = if finding.is_exact() {
                    &counters.exact_duplicates
                } else {
                    &counters.close_matches
                };
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

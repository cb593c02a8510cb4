//! Similarity index.
//!
//! Records are kept ordered by fingerprint value. Each insertion is compared
//! only with its immediate neighbours in that order: at most two distance
//! computations plus `O(log n)` lookup and insert, instead of a comparison
//! against every earlier record.
//!
//! Hamming distance is not monotonic in numeric order, so two close
//! fingerprints that are not adjacent in sort order go unreported. The index
//! is a fast heuristic, not an exhaustive search.

use log::trace;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::report::Reporter;
use crate::processing::{DistanceMetric, Hamming};
use crate::types::{Finding, PHash, Record};

pub struct SimilarityIndex<M: DistanceMetric = Hamming> {
    threshold: u32,
    metric: M,
    reporter: Arc<dyn Reporter>,
    records: Mutex<BTreeMap<PHash, PathBuf>>,
}

impl SimilarityIndex<Hamming> {
    /// Index comparing fingerprints by Hamming distance
    pub fn new(threshold: u32, reporter: Arc<dyn Reporter>) -> Self {
        Self::with_metric(threshold, Hamming, reporter)
    }
}

impl<M: DistanceMetric> SimilarityIndex<M> {
    pub fn with_metric(threshold: u32, metric: M, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            threshold,
            metric,
            reporter,
            records: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Insert a record, reporting any duplicate or close match with its
    /// sorted-order neighbours. Returns what was reported.
    ///
    /// An exact duplicate of an indexed fingerprint is reported and not stored;
    /// later copies keep matching the first file seen.
    pub fn insert(&self, record: Record) -> Vec<Finding> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let Record { fingerprint, path } = record;
        let mut findings = Vec::with_capacity(2);

        // Smallest indexed fingerprint >= the new one
        let successor = records.range(fingerprint..).next();

        if let Some((&next, other)) = successor {
            if next == fingerprint {
                findings.push(Finding::ExactDuplicate {
                    path,
                    other: other.clone(),
                    fingerprint,
                });
                self.publish(&findings);
                return findings;
            }
            self.compare(&mut findings, &path, fingerprint, next, other);
        }

        if let Some((&prev, other)) = records.range(..fingerprint).next_back() {
            self.compare(&mut findings, &path, fingerprint, prev, other);
        }

        trace!("Indexed {:x} for {}", fingerprint, path.display());
        records.insert(fingerprint, path);
        self.publish(&findings);
        findings
    }

    fn compare(
        &self,
        findings: &mut Vec<Finding>,
        path: &Path,
        fingerprint: PHash,
        neighbour: PHash,
        other: &Path,
    ) {
        let distance = self.metric.distance(fingerprint, neighbour);
        if distance <= self.threshold {
            findings.push(Finding::CloseMatch {
                path: path.to_path_buf(),
                other: other.to_path_buf(),
                fingerprint,
                distance,
            });
        }
    }

    fn publish(&self, findings: &[Finding]) {
        for finding in findings {
            self.reporter.report(finding);
        }
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the indexed records in ascending fingerprint order
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(&fingerprint, path)| Record::new(fingerprint, path.clone()))
            .collect()
    }
}

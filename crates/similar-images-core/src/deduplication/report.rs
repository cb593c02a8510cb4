use log::info;
use std::sync::{Mutex, PoisonError};

use crate::types::Finding;

/// Receives findings as the index produces them.
///
/// Called while the index lock is held, so implementations must be quick
/// and must not fail the scan.
pub trait Reporter: Send + Sync {
    fn report(&self, finding: &Finding);
}

/// Writes each finding as one line through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, finding: &Finding) {
        info!("{}", finding);
    }
}

/// Keeps findings in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    findings: Mutex<Vec<Finding>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, in report order
    pub fn findings(&self) -> Vec<Finding> {
        self.findings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, finding: &Finding) {
        self.findings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(finding.clone());
    }
}

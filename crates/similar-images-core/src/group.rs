//! Task group with first-error cancellation.
//!
//! Every pipeline task shares one [`TaskGroup`]. The first task to fail records
//! its error and cancels the group; tasks blocked on a channel wake up through
//! the [`TaskGroup::done`] receiver, which becomes ready once cancelled.

use crossbeam::channel::{self, Receiver, Sender};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};

pub struct TaskGroup {
    cancelled: AtomicBool,
    // Never sent on; dropping it disconnects `done_rx`
    done_tx: Mutex<Option<Sender<()>>>,
    done_rx: Receiver<()>,
    first_error: Mutex<Option<Error>>,
}

impl TaskGroup {
    pub fn new() -> Self {
        let (done_tx, done_rx) = channel::bounded(0);
        Self {
            cancelled: AtomicBool::new(false),
            done_tx: Mutex::new(Some(done_tx)),
            done_rx,
            first_error: Mutex::new(None),
        }
    }

    /// Signal every task to stop
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.done_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Becomes ready (disconnected) once the group is cancelled
    pub fn done(&self) -> &Receiver<()> {
        &self.done_rx
    }

    /// Record a task failure. Only the first error is kept.
    pub fn fail(&self, err: Error) {
        {
            let mut slot = self
                .first_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if slot.is_none() {
                *slot = Some(err);
            } else {
                debug!("Suppressed error after cancellation: {}", err);
            }
        }
        self.cancel();
    }

    /// Run a task, routing its failure into the group
    pub fn run<F>(&self, task: F)
    where
        F: FnOnce() -> Result<()>,
    {
        if let Err(e) = task() {
            self.fail(e);
        }
    }

    /// The first recorded error, if any
    pub fn into_result(self) -> Result<()> {
        match self
            .first_error
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
        {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for TaskGroup {
    fn default() -> Self {
        Self::new()
    }
}

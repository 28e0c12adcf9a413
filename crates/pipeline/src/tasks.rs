use std::sync::Arc;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info};
use modscan_engine::{Clock, DisplayRecord, RecencyWindow, Stream, classify};
use modscan_fs::{CancelToken, FileSystem, TreeWalker, VisitEvent, WalkOutcome};
use modscan_runtime::POLL_INTERVAL;

use crate::{
    config::SearchConfig,
    coordinator::SearchOutcome,
    state::{Phase, PipelineState},
};

/// Output side of a search, shared by both threads.
#[derive(Clone)]
pub(crate) struct Outputs {
    pub(crate) status: Sender<DisplayRecord>,
    pub(crate) info: Sender<DisplayRecord>,
}

impl Outputs {
    pub(crate) fn emit(&self, record: DisplayRecord) {
        // The coordinator owns both receivers, so sends only fail while it
        // is being dropped.
        let _ = match record.category().stream() {
            Stream::Status => self.status.send(record),
            Stream::Info => self.info.send(record),
        };
    }
}

/// Runs the tree walk and feeds the event queue.
pub(crate) struct Producer {
    pub(crate) fs: Arc<dyn FileSystem>,
    pub(crate) config: Arc<SearchConfig>,
    pub(crate) cancel: CancelToken,
    pub(crate) phase: Arc<Phase>,
    pub(crate) events: Sender<VisitEvent>,
    pub(crate) outputs: Outputs,
}

impl Producer {
    /// Walk to completion, abort or cancellation. Dropping `self` on return
    /// closes the event queue, which is how the consumer learns the walk is
    /// over.
    pub(crate) fn run(self) -> SearchOutcome {
        let walker = TreeWalker::new(self.fs.as_ref(), self.config.matcher(), &self.cancel);

        let result = walker.walk(self.config.root(), |event| {
            let _ = self.events.send(event);
        });

        let outcome = match result {
            Ok(WalkOutcome::Completed(stats)) => {
                info!(
                    "[pipeline] walk of {:?} finished: {} dirs, {} files, {} inaccessible",
                    self.config.root(),
                    stats.directories,
                    stats.files,
                    stats.inaccessible
                );
                SearchOutcome::Completed(stats)
            }
            Ok(WalkOutcome::Cancelled) => {
                debug!("[pipeline] walk cancelled");
                return SearchOutcome::Cancelled;
            }
            Err(err) => {
                error!("[pipeline] walk aborted: {err}");
                self.outputs.emit(DisplayRecord::diagnostic(err.to_string()));
                SearchOutcome::Aborted(err)
            }
        };

        // Draining is set before the event queue closes.
        self.phase
            .advance(PipelineState::Running, PipelineState::Draining);

        outcome
    }
}

/// Classifies events until the queue is closed and drained, or until
/// cancelled.
pub(crate) struct Consumer {
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) window: RecencyWindow,
    pub(crate) cancel: CancelToken,
    pub(crate) phase: Arc<Phase>,
    pub(crate) events: Receiver<VisitEvent>,
    pub(crate) outputs: Outputs,
}

impl Consumer {
    pub(crate) fn run(self) {
        let mut classified = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                debug!("[pipeline] classifier cancelled after {classified} events");
                return;
            }

            match self.events.recv_timeout(POLL_INTERVAL) {
                Ok(event) => {
                    self.translate(&event);
                    classified += 1;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        // A cancelled walk also closes the queue; that is not a finish.
        if self.cancel.is_cancelled() {
            debug!("[pipeline] classifier stopped on cancelled walk after {classified} events");
            return;
        }

        debug!("[pipeline] classifier drained {classified} events");
        self.outputs.emit(DisplayRecord::finished());
        self.phase.advance(PipelineState::Draining, PipelineState::Idle);
    }

    fn translate(&self, event: &VisitEvent) {
        match classify(event, self.clock.now(), self.window) {
            Ok(record) => self.outputs.emit(record),
            Err(err) => {
                error!("[pipeline] malformed visit event: {err}");
                self.outputs
                    .emit(DisplayRecord::diagnostic(format!("Could not classify: {err}")));
            }
        }
    }
}

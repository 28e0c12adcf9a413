use std::{io, sync::Arc, thread::JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, info, warn};
use modscan_engine::{Clock, DisplayRecord, SystemClock, legend};
use modscan_fs::{CancelToken, FileSystem, StdFileSystem, VisitEvent, WalkError, WalkStats};
use modscan_runtime::{FILE_WALK_THREAD, TRANSLATE_THREAD};
use thiserror::Error;

use crate::{
    config::SearchConfig,
    state::{Phase, PipelineState},
    tasks::{Consumer, Outputs, Producer},
    threads::ThreadNamer,
};

/// How the walk of one search ended.
#[derive(Debug)]
pub enum SearchOutcome {
    Completed(WalkStats),
    /// The walk stopped on an I/O failure. Events produced before it were
    /// still classified.
    Aborted(WalkError),
    Cancelled,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("a search is already in progress")]
    Busy,

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{name} thread panicked")]
    Panicked { name: &'static str },
}

/// One running search: its cancel token, lifecycle and the two threads.
pub struct PipelineHandle {
    cancel: CancelToken,
    phase: Arc<Phase>,
    /// Second receiver on the event queue, used to discard what is left
    /// after a cancel.
    pending: Receiver<VisitEvent>,
    producer: Option<JoinHandle<SearchOutcome>>,
    consumer: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Ask both threads to stop. Does not wait and does not clear queues;
    /// use [`Pipeline::cancel`] for a full reset.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Once the token is tripped the search reads `Cancelled` until both
    /// threads have exited, then `Idle`.
    pub fn state(&self) -> PipelineState {
        if !self.cancel.is_cancelled() {
            return self.phase.load();
        }

        if self.threads_finished() {
            PipelineState::Idle
        } else {
            PipelineState::Cancelled
        }
    }

    fn threads_finished(&self) -> bool {
        self.producer.as_ref().is_none_or(JoinHandle::is_finished)
            && self.consumer.as_ref().is_none_or(JoinHandle::is_finished)
    }

    fn join(&mut self) -> Result<SearchOutcome, PipelineError> {
        let outcome = match self.producer.take() {
            Some(h) => h.join().map_err(|_| PipelineError::Panicked {
                name: FILE_WALK_THREAD,
            })?,
            None => SearchOutcome::Cancelled,
        };

        if let Some(h) = self.consumer.take() {
            h.join().map_err(|_| PipelineError::Panicked {
                name: TRANSLATE_THREAD,
            })?;
        }

        Ok(outcome)
    }
}

/// Coordinates the walker and classifier threads of one search at a time.
///
/// The status and info streams live as long as the pipeline, so a
/// presentation layer can keep polling them across searches.
pub struct Pipeline {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    status_tx: Sender<DisplayRecord>,
    status_rx: Receiver<DisplayRecord>,
    info_tx: Sender<DisplayRecord>,
    info_rx: Receiver<DisplayRecord>,
    walk_threads: ThreadNamer,
    translate_threads: ThreadNamer,
    active: Option<PipelineHandle>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_services(Arc::new(StdFileSystem), Arc::new(SystemClock))
    }

    pub fn with_services(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>) -> Self {
        let (status_tx, status_rx) = channel::unbounded();
        let (info_tx, info_rx) = channel::unbounded();

        Self {
            fs,
            clock,
            status_tx,
            status_rx,
            info_tx,
            info_rx,
            walk_threads: ThreadNamer::new(FILE_WALK_THREAD),
            translate_threads: ThreadNamer::new(TRANSLATE_THREAD),
            active: None,
        }
    }

    /// Directories, classified files and the terminal `Finished` record.
    pub fn status(&self) -> &Receiver<DisplayRecord> {
        &self.status_rx
    }

    /// Legend, diagnostics and walk errors.
    pub fn info(&self) -> &Receiver<DisplayRecord> {
        &self.info_rx
    }

    pub fn state(&self) -> PipelineState {
        self.active
            .as_ref()
            .map_or(PipelineState::Idle, PipelineHandle::state)
    }

    pub fn handle(&self) -> Option<&PipelineHandle> {
        self.active.as_ref()
    }

    /// Events walked but not yet classified.
    pub fn pending_events(&self) -> usize {
        self.active.as_ref().map_or(0, |h| h.pending.len())
    }

    /// Spawn the walker and classifier for `config` and return at once.
    pub fn start(&mut self, config: SearchConfig) -> Result<&PipelineHandle, PipelineError> {
        if self.state() != PipelineState::Idle {
            return Err(PipelineError::Busy);
        }
        self.reap();

        info!(
            "[pipeline] searching {:?} for {} modified since {}",
            config.root(),
            config.matcher().pattern(),
            config.window()
        );

        let outputs = Outputs {
            status: self.status_tx.clone(),
            info: self.info_tx.clone(),
        };

        if config.legend() {
            for record in legend() {
                let _ = self.info_tx.send(record);
            }
        }

        let config = Arc::new(config);
        let cancel = CancelToken::new();
        let phase = Arc::new(Phase::new(PipelineState::Running));
        let (events_tx, events_rx) = channel::unbounded::<VisitEvent>();

        let consumer = Consumer {
            clock: Arc::clone(&self.clock),
            window: config.window(),
            cancel: cancel.clone(),
            phase: Arc::clone(&phase),
            events: events_rx.clone(),
            outputs: outputs.clone(),
        };

        let consumer = self
            .translate_threads
            .spawn(move || consumer.run())
            .map_err(|source| PipelineError::Spawn {
                name: TRANSLATE_THREAD,
                source,
            })?;

        let producer = Producer {
            fs: Arc::clone(&self.fs),
            config,
            cancel: cancel.clone(),
            phase: Arc::clone(&phase),
            events: events_tx,
            outputs,
        };

        let producer = match self.walk_threads.spawn(move || producer.run()) {
            Ok(h) => h,
            Err(source) => {
                // Nothing will feed the classifier; stop it.
                cancel.cancel();
                let _ = consumer.join();
                return Err(PipelineError::Spawn {
                    name: FILE_WALK_THREAD,
                    source,
                });
            }
        };

        Ok(&*self.active.insert(PipelineHandle {
            cancel,
            phase,
            pending: events_rx,
            producer: Some(producer),
            consumer: Some(consumer),
        }))
    }

    /// Block until the active search has drained, and return how its walk
    /// ended. `Ok(None)` when no search was started.
    pub fn wait(&mut self) -> Result<Option<SearchOutcome>, PipelineError> {
        match self.active.take() {
            Some(mut handle) => handle.join().map(Some),
            None => Ok(None),
        }
    }

    /// Stop the active search, discard everything it queued and return to
    /// `Idle`. No terminal record is emitted.
    pub fn cancel(&mut self) {
        let Some(mut handle) = self.active.take() else {
            return;
        };

        handle.phase.store(PipelineState::Cancelled);
        handle.cancel.cancel();

        if let Err(e) = handle.join() {
            warn!("[pipeline] {e} during cancel");
        }

        self.discard_queued(&handle);
        handle.phase.store(PipelineState::Idle);
    }

    /// Join the threads of a search that already reached `Idle`. Output of
    /// a search cancelled through its handle is discarded.
    fn reap(&mut self) {
        let Some(mut handle) = self.active.take() else {
            return;
        };

        if let Err(e) = handle.join() {
            warn!("[pipeline] previous search ended badly: {e}");
        }

        if handle.cancel.is_cancelled() {
            self.discard_queued(&handle);
        }
    }

    fn discard_queued(&self, handle: &PipelineHandle) {
        let events = handle.pending.try_iter().count();
        let records = self.status_rx.try_iter().count() + self.info_rx.try_iter().count();
        debug!("[pipeline] cancelled; discarded {events} events and {records} records");
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;

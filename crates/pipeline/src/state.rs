use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a search: `Idle -> Running -> (Draining | Cancelled) -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PipelineState {
    /// No active search; a new one may start.
    Idle = 0,
    /// Walker and classifier both active.
    Running = 1,
    /// Walk is over; the classifier is emptying the event queue.
    Draining = 2,
    /// Teardown requested; both threads are stopping.
    Cancelled = 3,
}

impl PipelineState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => PipelineState::Running,
            2 => PipelineState::Draining,
            3 => PipelineState::Cancelled,
            _ => PipelineState::Idle,
        }
    }
}

/// Lifecycle state shared between the coordinator and its two threads.
#[derive(Debug)]
pub(crate) struct Phase(AtomicU8);

impl Phase {
    pub(crate) fn new(state: PipelineState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    #[inline]
    pub(crate) fn load(&self) -> PipelineState {
        PipelineState::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn store(&self, state: PipelineState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move from `from` to `to`. Fails, leaving the state untouched, when
    /// another party already moved it elsewhere (typically to `Cancelled`).
    pub(crate) fn advance(&self, from: PipelineState, to: PipelineState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

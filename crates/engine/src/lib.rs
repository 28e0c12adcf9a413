mod classify;
mod display;
mod recency;

pub use classify::{ClassificationError, classify};
pub use display::{Category, DisplayRecord, FINISHED_TEXT, Stream, legend};
pub use recency::{Clock, FixedClock, RecencyWindow, SystemClock, UnknownWindow};

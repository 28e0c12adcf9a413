mod config;
mod coordinator;
mod state;
mod tasks;
mod threads;

pub use config::{ConfigurationError, SearchConfig, configure};
pub use coordinator::{Pipeline, PipelineError, PipelineHandle, SearchOutcome};
pub use state::PipelineState;
pub use threads::ThreadNamer;

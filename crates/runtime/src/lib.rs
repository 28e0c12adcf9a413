mod config;
pub mod logging;

pub use config::{
    DEFAULT_EXTENSIONS, FILE_WALK_THREAD, POLL_INTERVAL, PROGRAM_LOG_LEVEL, PROGRAM_NAME,
    TRANSLATE_THREAD, default_scan_root,
};

pub use logging::init;

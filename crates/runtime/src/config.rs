use std::{path::PathBuf, time::Duration};

pub const PROGRAM_NAME: &str = "modscan";
pub const PROGRAM_LOG_LEVEL: &str = "MODSCAN_LOG_LEVEL";

/// Extensions searched when the user does not supply any.
pub const DEFAULT_EXTENSIONS: &str = "*.java *.xml *.conf *.script";

/// Name prefix of the thread running the directory walk.
pub const FILE_WALK_THREAD: &str = "file-walk";
/// Name prefix of the thread turning visit events into display records.
pub const TRANSLATE_THREAD: &str = "translate-file-info";

/// How long the classifier waits on an empty queue before re-checking
/// for cancellation.
pub const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Default root for the program to start scanning: the user's home
/// directory, or the current directory when no home can be determined.
pub fn default_scan_root() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

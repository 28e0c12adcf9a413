mod cancel;
mod pattern;
mod provider;
mod record;
mod walker;

pub use cancel::CancelToken;
pub use pattern::{PatternError, PatternMatcher, normalize_token, split_tokens};
pub use provider::{FileSystem, StdFileSystem};
pub use record::{EntryKind, FileAttributes, VisitEvent};
pub use walker::{TreeWalker, WalkError, WalkOutcome, WalkStats};

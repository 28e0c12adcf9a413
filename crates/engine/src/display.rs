use serde::Serialize;

/// Text of the record closing the status stream of a completed search.
pub const FINISHED_TEXT: &str = "Finished";

/// Output stream a record belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    /// Directories and classified files, plus the terminal marker.
    Status,
    /// Diagnostics and informational messages.
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Directory,
    Modified,
    Unmodified,
    Diagnostic,
    /// Terminal marker; never produced for a visited entry.
    Finished,
}

impl Category {
    #[inline]
    pub fn stream(self) -> Stream {
        match self {
            Category::Diagnostic => Stream::Info,
            Category::Directory
            | Category::Modified
            | Category::Unmodified
            | Category::Finished => Stream::Status,
        }
    }
}

/// A classified, renderable result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    text: String,
    category: Category,
}

impl DisplayRecord {
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    pub fn diagnostic(text: impl Into<String>) -> Self {
        Self::new(text, Category::Diagnostic)
    }

    pub fn finished() -> Self {
        Self::new(FINISHED_TEXT, Category::Finished)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.category == Category::Finished
    }
}

/// Explanatory lines shown on the info stream when a search starts.
pub fn legend() -> [DisplayRecord; 3] {
    [
        DisplayRecord::new(
            "Directories in white have been searched.",
            Category::Directory,
        ),
        DisplayRecord::new("Files in red have been modified.", Category::Modified),
        DisplayRecord::new("Files in green have not been modified", Category::Unmodified),
    ]
}

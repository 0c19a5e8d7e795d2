//! Data models for Bookshelf

pub mod book;
pub mod borrow;
pub mod metadata;

// Re-export commonly used types
pub use book::{Book, BookQuery, CreateBook, UpdateBook};
pub use borrow::{BorrowKey, BorrowRecord, IssueBook, ReIssueBook};
pub use metadata::{BookMetadata, LookupOutcome, LookupStatus};

/// Trimmed copy of a required text field
pub(crate) fn text(value: &str) -> String {
    value.trim().to_string()
}

/// Trimmed optional text, with blank values stored as NULL
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

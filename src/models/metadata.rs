//! Book metadata lookup results (form pre-fill)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a metadata lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Found,
    NotFound,
    InvalidIsbn,
    Unavailable,
    Disabled,
}

/// Suggested values for a new-book form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookMetadata {
    pub book_id: String,
    pub name: String,
    pub author: String,
    pub edition: String,
    pub cover_url: Option<String>,
    pub quantity: i64,
}

/// Lookup response: always informational, never a failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LookupOutcome {
    pub status: LookupStatus,
    pub message: String,
    pub metadata: Option<BookMetadata>,
}

impl LookupOutcome {
    pub fn found(metadata: BookMetadata) -> Self {
        let message = match metadata.cover_url {
            Some(_) => format!("Details fetched for '{}'.", metadata.name),
            None => format!(
                "Details fetched for '{}'. No cover image available.",
                metadata.name
            ),
        };
        Self {
            status: LookupStatus::Found,
            message,
            metadata: Some(metadata),
        }
    }

    pub fn without_metadata(status: LookupStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            metadata: None,
        }
    }
}

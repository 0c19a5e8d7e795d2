//! Book metadata lookup used to pre-fill the new-book form
//!
//! Backed by the Open Library books API. A lookup never fails: network and
//! decoding problems are reported through [`LookupOutcome::status`] so the
//! catalog keeps working when the service is unreachable.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::MetadataConfig,
    models::metadata::{BookMetadata, LookupOutcome, LookupStatus},
};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("The request to Open Library timed out")]
    Timeout,
    #[error("Could not fetch data from Open Library: {0}")]
    Transport(String),
    #[error("Received an invalid response from Open Library: {0}")]
    Decode(String),
}

/// Book entry of the Open Library `jscmd=data` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenLibraryBook {
    pub title: Option<String>,
    pub authors: Vec<NamedEntry>,
    pub publishers: Vec<NamedEntry>,
    pub publish_date: Option<String>,
    pub cover: Option<CoverLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NamedEntry {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoverLinks {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

/// Source of bibliographic records keyed by ISBN
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Record for an ISBN, `None` when the source does not know it
    async fn fetch(&self, isbn: &str) -> Result<Option<OpenLibraryBook>, MetadataError>;
}

/// HTTP client for openlibrary.org
pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(config: &MetadataConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("bookshelf-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MetadataSource for OpenLibraryClient {
    async fn fetch(&self, isbn: &str) -> Result<Option<OpenLibraryBook>, MetadataError> {
        let key = format!("ISBN:{}", isbn);
        tracing::debug!(isbn, "Querying Open Library");

        let response = self
            .http
            .get(format!("{}/api/books", self.base_url))
            .query(&[("bibkeys", key.as_str()), ("format", "json"), ("jscmd", "data")])
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(transport_error)?;

        let body: HashMap<String, serde_json::Value> = response
            .json()
            .await
            .map_err(|e| MetadataError::Decode(e.to_string()))?;

        parse_entry(body, &key)
    }
}

fn transport_error(e: reqwest::Error) -> MetadataError {
    if e.is_timeout() {
        MetadataError::Timeout
    } else {
        MetadataError::Transport(e.to_string())
    }
}

/// Pull one bibkey out of a response; an absent or empty entry means unknown
fn parse_entry(
    mut body: HashMap<String, serde_json::Value>,
    key: &str,
) -> Result<Option<OpenLibraryBook>, MetadataError> {
    match body.remove(key) {
        Some(value) if value.as_object().is_some_and(|o| !o.is_empty()) => {
            serde_json::from_value(value)
                .map(Some)
                .map_err(|e| MetadataError::Decode(e.to_string()))
        }
        _ => Ok(None),
    }
}

/// 10 or 13 characters, digits once hyphens are removed
pub fn is_valid_isbn(isbn: &str) -> bool {
    let len = isbn.chars().count();
    if len != 10 && len != 13 {
        return false;
    }
    let digits = isbn.replace('-', "");
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn join_names(entries: &[NamedEntry]) -> String {
    entries
        .iter()
        .filter_map(|e| e.name.as_deref())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_placeholder(value: String) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value
    }
}

/// Form suggestions built from an Open Library record
pub fn to_metadata(isbn: &str, book: OpenLibraryBook) -> BookMetadata {
    let publishers = join_names(&book.publishers);
    let publish_date = book.publish_date.unwrap_or_default();
    let edition = format!("{}, {}", publishers, publish_date)
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string();

    let cover_url = book
        .cover
        .and_then(|c| c.medium.or(c.large).or(c.small));

    BookMetadata {
        book_id: isbn.to_string(),
        // A title the record carries is kept as is, even when empty
        name: book.title.unwrap_or_else(|| "N/A".to_string()),
        author: or_placeholder(join_names(&book.authors)),
        edition: or_placeholder(edition),
        cover_url,
        quantity: 1,
    }
}

#[derive(Clone)]
pub struct MetadataService {
    source: Option<Arc<dyn MetadataSource>>,
}

impl MetadataService {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self { source: Some(source) }
    }

    pub fn disabled() -> Self {
        Self { source: None }
    }

    /// Open Library backed service, or a disabled one when configured off
    pub fn from_config(config: &MetadataConfig) -> reqwest::Result<Self> {
        if !config.enabled {
            tracing::info!("Book metadata lookup disabled");
            return Ok(Self::disabled());
        }
        Ok(Self::new(Arc::new(OpenLibraryClient::new(config)?)))
    }

    /// Look up pre-fill details for an ISBN
    pub async fn lookup(&self, isbn: &str) -> LookupOutcome {
        let isbn = isbn.trim();

        if !is_valid_isbn(isbn) {
            return LookupOutcome::without_metadata(
                LookupStatus::InvalidIsbn,
                "Please enter a valid 10 or 13 digit ISBN.",
            );
        }

        let Some(source) = &self.source else {
            return LookupOutcome::without_metadata(
                LookupStatus::Disabled,
                "Book metadata lookup is disabled.",
            );
        };

        match source.fetch(isbn).await {
            Ok(Some(book)) => LookupOutcome::found(to_metadata(isbn, book)),
            Ok(None) => LookupOutcome::without_metadata(
                LookupStatus::NotFound,
                format!("No book details found for ISBN: {} on Open Library.", isbn),
            ),
            Err(e) => {
                tracing::warn!(isbn, error = %e, "Book metadata lookup failed");
                LookupOutcome::without_metadata(LookupStatus::Unavailable, e.to_string())
            }
        }
    }
}

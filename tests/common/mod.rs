//! Shared helpers for integration tests: an in-memory store and in-process requests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bookshelf_server::{
    api,
    config::{AppConfig, DatabaseConfig},
    models::{book::CreateBook, borrow::IssueBook},
    repository::{self, Repository},
    services::{metadata::MetadataService, Services},
    AppState,
};

/// Migrated repository for a database URL
pub async fn repository_at(url: &str) -> Repository {
    let config = DatabaseConfig {
        url: url.to_string(),
        ..DatabaseConfig::default()
    };
    let repository = Repository::new(repository::connect(&config).await.unwrap());
    repository.migrate().await.unwrap();
    repository
}

/// Repository and services sharing a fresh in-memory database
pub async fn store() -> (Repository, Services) {
    let repository = repository_at("sqlite::memory:").await;
    let services = Services::new(repository.clone(), MetadataService::disabled());
    (repository, services)
}

/// Services over a fresh, migrated in-memory database
pub async fn services() -> Services {
    store().await.1
}

/// Services over a database file with the default multi-connection pool.
/// The directory must outlive the services.
pub async fn file_services(dir: &tempfile::TempDir) -> Services {
    let url = format!("sqlite://{}", dir.path().join("bookshelf.db").display());
    Services::new(repository_at(&url).await, MetadataService::disabled())
}

/// Full router over the given services
pub fn app(services: Services) -> Router {
    api::router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    })
}

/// Send one request through the router; an empty body reads as `Null`
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_book(book_id: &str, name: &str, quantity: i64) -> CreateBook {
    CreateBook {
        book_id: book_id.to_string(),
        name: name.to_string(),
        author: Some("Unknown".to_string()),
        edition: None,
        price: Some(250.0),
        quantity: Some(quantity),
    }
}

/// Two-week loan starting 2024-03-01
pub fn issue(book_id: &str, student_roll: &str) -> IssueBook {
    IssueBook {
        book_id: book_id.to_string(),
        student_roll: student_roll.to_string(),
        student_name: format!("Student {}", student_roll),
        course: Some("BSc".to_string()),
        subject: Some("Physics".to_string()),
        issue_date: date(2024, 3, 1),
        return_date: date(2024, 3, 15),
    }
}

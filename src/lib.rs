//! Bookshelf Library Management Server
//!
//! Keeps a library's book catalog and active borrow records consistent:
//! stock checks, per-student borrow limits and the paired record/stock
//! updates of issuing and returning books, behind a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

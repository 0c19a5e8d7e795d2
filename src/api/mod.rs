//! API handlers for Bookshelf REST endpoints

pub mod books;
pub mod borrows;
pub mod health;
pub mod metadata;
pub mod openapi;

use axum::{
    extract::FromRequest,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections surface as `InvalidInput`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/holders", get(books::list_holders))
        // Metadata pre-fill
        .route("/metadata/isbn/:isbn", get(metadata::lookup_isbn))
        // Circulation
        .route("/borrows", get(borrows::list_borrows).post(borrows::issue_book))
        .route("/borrows/return", post(borrows::return_book))
        .route("/borrows/reissue", post(borrows::reissue_book))
        .route("/students/:roll/borrows", get(borrows::list_student_borrows))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

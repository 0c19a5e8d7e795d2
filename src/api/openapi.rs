//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, health, metadata};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.3.0",
        description = "Library inventory and circulation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_holders,
        // Metadata
        metadata::lookup_isbn,
        // Borrows
        borrows::list_borrows,
        borrows::list_student_borrows,
        borrows::issue_book,
        borrows::return_book,
        borrows::reissue_book,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Borrows
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::IssueBook,
            crate::models::borrow::BorrowKey,
            crate::models::borrow::ReIssueBook,
            borrows::ReturnResponse,
            // Metadata
            crate::models::metadata::LookupOutcome,
            crate::models::metadata::LookupStatus,
            crate::models::metadata::BookMetadata,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "borrows", description = "Issuing and returning books"),
        (name = "metadata", description = "Book details pre-fill")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

//! Book metadata pre-fill endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{models::metadata::LookupOutcome, AppState};

/// Look up title, author, edition and cover for an ISBN.
///
/// Always answers 200; the `status` field says whether anything was found.
#[utoipa::path(
    get,
    path = "/metadata/isbn/{isbn}",
    tag = "metadata",
    params(
        ("isbn" = String, Path, description = "10 or 13 digit ISBN")
    ),
    responses(
        (status = 200, description = "Lookup outcome", body = LookupOutcome)
    )
)]
pub async fn lookup_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Json<LookupOutcome> {
    Json(state.services.metadata.lookup(&isbn).await)
}

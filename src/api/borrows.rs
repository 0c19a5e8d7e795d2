//! Circulation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrow::{BorrowKey, BorrowRecord, IssueBook, ReIssueBook},
    AppState,
};

use super::ApiJson;

/// Return response with the closed record
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// The record that was closed
    pub record: BorrowRecord,
}

/// List every active borrow record
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    responses(
        (status = 200, description = "Active records by student roll and issue date", body = Vec<BorrowRecord>)
    )
)]
pub async fn list_borrows(State(state): State<AppState>) -> AppResult<Json<Vec<BorrowRecord>>> {
    let records = state.services.query.all_records().await?;
    Ok(Json(records))
}

/// Active borrow records of one student
#[utoipa::path(
    get,
    path = "/students/{roll}/borrows",
    tag = "borrows",
    params(
        ("roll" = String, Path, description = "Student roll number")
    ),
    responses(
        (status = 200, description = "Student's active records (possibly empty)", body = Vec<BorrowRecord>)
    )
)]
pub async fn list_student_borrows(
    State(state): State<AppState>,
    Path(roll): Path<String>,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let records = state.services.query.student_records(&roll).await?;
    Ok(Json(records))
}

/// Issue a book to a student
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    request_body = IssueBook,
    responses(
        (status = 201, description = "Book issued", body = BorrowRecord),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Student already holds this book", body = crate::error::ErrorResponse),
        (status = 422, description = "Out of stock or borrow limit reached", body = crate::error::ErrorResponse)
    )
)]
pub async fn issue_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<IssueBook>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let record = state.services.circulation.issue_book(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/return",
    tag = "borrows",
    request_body = BorrowKey,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "No active record", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    ApiJson(key): ApiJson<BorrowKey>,
) -> AppResult<Json<ReturnResponse>> {
    let record = state
        .services
        .circulation
        .return_book(&key.book_id, &key.student_roll)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        record,
    }))
}

/// Extend the return date of a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/reissue",
    tag = "borrows",
    request_body = ReIssueBook,
    responses(
        (status = 200, description = "Return date updated", body = BorrowRecord),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "No active record", body = crate::error::ErrorResponse)
    )
)]
pub async fn reissue_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReIssueBook>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state.services.circulation.reissue_book(request).await?;
    Ok(Json(record))
}

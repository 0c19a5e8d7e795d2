//! Circulation service: issuing, returning and re-issuing books
//!
//! Every operation that changes state runs in one transaction. Business
//! rules are checked inside that transaction before anything is written,
//! and any failure drops the transaction, which rolls it back.

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowKey, BorrowRecord, IssueBook, ReIssueBook},
    repository::Repository,
};

/// Maximum number of books a student may hold at once
pub const MAX_BORROW_LIMIT: i64 = 3;

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Issue one copy of a book to a student
    pub async fn issue_book(&self, request: IssueBook) -> AppResult<BorrowRecord> {
        let request = request.normalized();
        request.validate()?;
        if request.return_date < request.issue_date {
            return Err(AppError::InvalidInput(
                "Return date cannot be before the issue date".to_string(),
            ));
        }

        let mut tx = self.repository.begin().await?;

        let book = self
            .repository
            .books
            .find(&mut *tx, &request.book_id)
            .await?
            .ok_or_else(|| {
                AppError::BookNotFound(format!(
                    "Book ID '{}' does not exist in the library",
                    request.book_id
                ))
            })?;

        if book.quantity < 1 {
            tracing::warn!(book_id = %book.book_id, "Issue refused: out of stock");
            return Err(AppError::OutOfStock(format!(
                "Book '{}' (ID: {}) is out of stock",
                book.name, book.book_id
            )));
        }

        let held = self
            .repository
            .borrows
            .count_for_student(&mut *tx, &request.student_roll)
            .await?;
        if held >= MAX_BORROW_LIMIT {
            tracing::warn!(student_roll = %request.student_roll, held, "Issue refused: borrow limit reached");
            return Err(AppError::BorrowLimitExceeded(format!(
                "Student (Roll: {}) already has {} books",
                request.student_roll, MAX_BORROW_LIMIT
            )));
        }

        if self
            .repository
            .borrows
            .find(&mut *tx, &request.book_id, &request.student_roll)
            .await?
            .is_some()
        {
            tracing::warn!(
                book_id = %request.book_id,
                student_roll = %request.student_roll,
                "Issue refused: already borrowed"
            );
            return Err(AppError::AlreadyBorrowed(format!(
                "Student (Roll: {}) already has this book (ID: {})",
                request.student_roll, request.book_id
            )));
        }

        let record = BorrowRecord {
            book_id: book.book_id,
            book_name: book.name,
            student_roll: request.student_roll,
            student_name: request.student_name,
            course: request.course,
            subject: request.subject,
            issue_date: request.issue_date,
            return_date: request.return_date,
        };

        self.repository.borrows.insert(&mut *tx, &record).await?;

        // A concurrent issue may have taken the last copy since the check above.
        if !self
            .repository
            .books
            .decrement_stock(&mut *tx, &record.book_id)
            .await?
        {
            return Err(AppError::OutOfStock(format!(
                "Book '{}' (ID: {}) is out of stock",
                record.book_name, record.book_id
            )));
        }

        tx.commit().await?;

        tracing::info!(
            book_id = %record.book_id,
            student_roll = %record.student_roll,
            return_date = %record.return_date,
            "Book issued"
        );
        Ok(record)
    }

    /// Take a book back from a student; returns the closed record
    pub async fn return_book(&self, book_id: &str, student_roll: &str) -> AppResult<BorrowRecord> {
        let key = BorrowKey::new(book_id, student_roll);
        key.validate()?;

        let mut tx = self.repository.begin().await?;

        let record = self
            .repository
            .borrows
            .find(&mut *tx, &key.book_id, &key.student_roll)
            .await?
            .ok_or_else(|| record_not_found(&key))?;

        let deleted = self
            .repository
            .borrows
            .delete(&mut *tx, &key.book_id, &key.student_roll)
            .await?;
        if deleted == 0 {
            return Err(record_not_found(&key));
        }

        if !self
            .repository
            .books
            .increment_stock(&mut *tx, &key.book_id)
            .await?
        {
            let book = self.repository.books.find(&mut *tx, &key.book_id).await?;
            return Err(match book {
                Some(book) => {
                    tracing::warn!(book_id = %book.book_id, quantity = book.quantity, "Return refused: stock count at maximum");
                    AppError::InvalidInput(format!(
                        "Book '{}' (ID: {}) cannot take back another copy: stock count is at its maximum",
                        book.name, book.book_id
                    ))
                }
                None => AppError::BookNotFound(format!(
                    "Book ID '{}' does not exist in the library",
                    key.book_id
                )),
            });
        }

        tx.commit().await?;

        tracing::info!(book_id = %key.book_id, student_roll = %key.student_roll, "Book returned");
        Ok(record)
    }

    /// Move the due date of an active record; stock is untouched
    pub async fn reissue_book(&self, request: ReIssueBook) -> AppResult<BorrowRecord> {
        let request = request.normalized();
        request.validate()?;

        let key = BorrowKey::new(&request.book_id, &request.student_roll);

        let mut tx = self.repository.begin().await?;

        let mut record = self
            .repository
            .borrows
            .find(&mut *tx, &key.book_id, &key.student_roll)
            .await?
            .ok_or_else(|| record_not_found(&key))?;

        if request.return_date < record.issue_date {
            return Err(AppError::InvalidInput(format!(
                "New return date cannot be before the issue date ({})",
                record.issue_date
            )));
        }

        let updated = self
            .repository
            .borrows
            .update_return_date(&mut *tx, &key.book_id, &key.student_roll, request.return_date)
            .await?;
        if updated == 0 {
            return Err(record_not_found(&key));
        }

        tx.commit().await?;

        record.return_date = request.return_date;
        tracing::info!(
            book_id = %key.book_id,
            student_roll = %key.student_roll,
            return_date = %record.return_date,
            "Book re-issued"
        );
        Ok(record)
    }

    /// Active records held by one student
    pub async fn list_active_records_for_student(&self, student_roll: &str) -> AppResult<Vec<BorrowRecord>> {
        self.repository.borrows.list_for_student(student_roll.trim()).await
    }

    /// Every active record, by student roll then issue date
    pub async fn list_all_active_records(&self) -> AppResult<Vec<BorrowRecord>> {
        self.repository.borrows.list_all().await
    }

    /// Active records referencing one book
    pub async fn list_active_records_for_book(&self, book_id: &str) -> AppResult<Vec<BorrowRecord>> {
        self.repository.borrows.list_for_book(book_id.trim()).await
    }
}

fn record_not_found(key: &BorrowKey) -> AppError {
    AppError::RecordNotFound(format!(
        "No active borrow record for book '{}' and student '{}'",
        key.book_id, key.student_roll
    ))
}

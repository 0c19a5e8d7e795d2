//! Borrow record model and circulation requests

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{optional_text, text};

/// Active borrow record from `borrow_record`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub book_id: String,
    /// Book name as it was when the copy was issued
    pub book_name: String,
    #[sqlx(rename = "stu_roll")]
    pub student_roll: String,
    #[sqlx(rename = "stu_name")]
    pub student_name: String,
    pub course: Option<String>,
    pub subject: Option<String>,
    pub issue_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// Issue book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct IssueBook {
    #[validate(length(min = 1, message = "Book ID is required"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "Student roll is required"))]
    pub student_roll: String,
    #[validate(length(min = 1, message = "Student name is required"))]
    pub student_name: String,
    pub course: Option<String>,
    pub subject: Option<String>,
    pub issue_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// Identifies one active borrow record
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BorrowKey {
    #[validate(length(min = 1, message = "Book ID is required"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "Student roll is required"))]
    pub student_roll: String,
}

/// Re-issue (extend) request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReIssueBook {
    #[validate(length(min = 1, message = "Book ID is required"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "Student roll is required"))]
    pub student_roll: String,
    pub return_date: NaiveDate,
}

impl IssueBook {
    pub fn normalized(self) -> Self {
        Self {
            book_id: text(&self.book_id),
            student_roll: text(&self.student_roll),
            student_name: text(&self.student_name),
            course: optional_text(self.course),
            subject: optional_text(self.subject),
            issue_date: self.issue_date,
            return_date: self.return_date,
        }
    }
}

impl BorrowKey {
    pub fn new(book_id: &str, student_roll: &str) -> Self {
        Self {
            book_id: text(book_id),
            student_roll: text(student_roll),
        }
    }
}

impl ReIssueBook {
    pub fn normalized(self) -> Self {
        Self {
            book_id: text(&self.book_id),
            student_roll: text(&self.student_roll),
            return_date: self.return_date,
        }
    }
}

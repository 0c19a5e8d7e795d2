//! Borrow records repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{error::AppResult, models::borrow::BorrowRecord};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Sqlite>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Active records for a student, oldest issue first
    pub async fn list_for_student(&self, student_roll: &str) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_record WHERE stu_roll = ? ORDER BY issue_date, rowid",
        )
        .bind(student_roll)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Active records for a book
    pub async fn list_for_book(&self, book_id: &str) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_record WHERE book_id = ? ORDER BY stu_roll, issue_date, rowid",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Every active record, by student then issue date (insertion order breaks ties)
    pub async fn list_all(&self) -> AppResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_record ORDER BY stu_roll, issue_date, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Number of active records held by a student
    pub async fn count_for_student(&self, conn: &mut SqliteConnection, student_roll: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrow_record WHERE stu_roll = ?")
            .bind(student_roll)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Number of active records referencing a book
    pub async fn count_for_book(&self, conn: &mut SqliteConnection, book_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrow_record WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// The active record for a (book, student) pair
    pub async fn find(
        &self,
        conn: &mut SqliteConnection,
        book_id: &str,
        student_roll: &str,
    ) -> AppResult<Option<BorrowRecord>> {
        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_record WHERE book_id = ? AND stu_roll = ? LIMIT 1",
        )
        .bind(book_id)
        .bind(student_roll)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(record)
    }

    /// Insert a new active record
    pub async fn insert(&self, conn: &mut SqliteConnection, record: &BorrowRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO borrow_record
                (book_id, book_name, stu_roll, stu_name, course, subject, issue_date, return_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.book_id)
        .bind(&record.book_name)
        .bind(&record.student_roll)
        .bind(&record.student_name)
        .bind(&record.course)
        .bind(&record.subject)
        .bind(record.issue_date)
        .bind(record.return_date)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Delete the record for a (book, student) pair; returns rows removed
    pub async fn delete(&self, conn: &mut SqliteConnection, book_id: &str, student_roll: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM borrow_record WHERE book_id = ? AND stu_roll = ?")
            .bind(book_id)
            .bind(student_roll)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Move the due date of an active record; returns rows changed
    pub async fn update_return_date(
        &self,
        conn: &mut SqliteConnection,
        book_id: &str,
        student_roll: &str,
        return_date: NaiveDate,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE borrow_record SET return_date = ? WHERE book_id = ? AND stu_roll = ?",
        )
        .bind(return_date)
        .bind(book_id)
        .bind(student_roll)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }
}

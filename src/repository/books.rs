//! Book catalog repository for database operations

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by identifier
    pub async fn get_by_id(&self, book_id: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM book_list WHERE book_id = ?")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id '{}' not found", book_id)))
    }

    /// All books ordered by name
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM book_list ORDER BY book_name, book_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Books whose lower-cased name matches a lower-cased `LIKE` pattern
    /// (escape character `\`)
    pub async fn search_by_name(&self, pattern: &str) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM book_list
            WHERE name_search LIKE ? ESCAPE '\'
            ORDER BY book_name, book_id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Look a book up inside an open transaction
    pub async fn find(&self, conn: &mut SqliteConnection, book_id: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM book_list WHERE book_id = ?")
            .bind(book_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(book)
    }

    /// Insert a new book
    pub async fn insert(&self, conn: &mut SqliteConnection, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO book_list (book_id, book_name, name_search, author, edition, price, qty)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.book_id)
        .bind(&book.name)
        .bind(book.name.to_lowercase())
        .bind(&book.author)
        .bind(&book.edition)
        .bind(book.price)
        .bind(book.quantity)
        .execute(&mut *conn)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::DuplicateKey(format!("Book ID '{}' already exists", book.book_id))
            }
            _ => AppError::from(e),
        })?;
        Ok(())
    }

    /// Overwrite every field of a book; returns the number of matched rows
    pub async fn update(&self, conn: &mut SqliteConnection, book: &Book) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE book_list
            SET book_name = ?, name_search = ?, author = ?, edition = ?, price = ?, qty = ?
            WHERE book_id = ?
            "#,
        )
        .bind(&book.name)
        .bind(book.name.to_lowercase())
        .bind(&book.author)
        .bind(&book.edition)
        .bind(book.price)
        .bind(book.quantity)
        .bind(&book.book_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a book unless a borrow record still references it
    pub async fn delete_unreferenced(&self, conn: &mut SqliteConnection, book_id: &str) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM book_list
            WHERE book_id = ?
              AND NOT EXISTS (SELECT 1 FROM borrow_record WHERE book_id = ?)
            "#,
        )
        .bind(book_id)
        .bind(book_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Take one copy out of stock; false when none is left
    pub async fn decrement_stock(&self, conn: &mut SqliteConnection, book_id: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE book_list SET qty = qty - 1 WHERE book_id = ? AND qty > 0")
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Put one copy back in stock; false when the book row is gone or its
    /// count cannot grow
    pub async fn increment_stock(&self, conn: &mut SqliteConnection, book_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE book_list SET qty = qty + 1 WHERE book_id = ? AND qty < 9223372036854775807",
        )
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
    services::query::like_pattern,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a book by identifier
    pub async fn get_book(&self, book_id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id.trim()).await
    }

    /// All books ordered by name
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Books whose name contains `term`, ignoring case (Unicode aware)
    pub async fn search_books_by_name(&self, term: &str) -> AppResult<Vec<Book>> {
        let pattern = like_pattern(&term.to_lowercase());
        self.repository.books.search_by_name(&pattern).await
    }

    /// Add a new book; the identifier must be unused
    pub async fn add_book(&self, input: CreateBook) -> AppResult<Book> {
        let book = input.into_book()?;

        let mut tx = self.repository.begin().await?;

        if self.repository.books.find(&mut *tx, &book.book_id).await?.is_some() {
            tracing::warn!(book_id = %book.book_id, "Rejected duplicate book id");
            return Err(AppError::DuplicateKey(format!(
                "Book ID '{}' already exists. Please use a unique ID.",
                book.book_id
            )));
        }

        self.repository.books.insert(&mut *tx, &book).await?;
        tx.commit().await?;

        tracing::info!(book_id = %book.book_id, quantity = book.quantity, "Book added");
        Ok(book)
    }

    /// Replace the details of an existing book.
    ///
    /// Rewriting a book with identical values succeeds; only a missing
    /// identifier is an error.
    pub async fn update_book(&self, book_id: &str, input: UpdateBook) -> AppResult<Book> {
        let book = input.into_book(book_id)?;
        if book.book_id.is_empty() {
            return Err(AppError::InvalidInput("Book ID is required".to_string()));
        }

        let mut tx = self.repository.begin().await?;

        let matched = self.repository.books.update(&mut *tx, &book).await?;
        if matched == 0 {
            return Err(AppError::NotFound(format!(
                "Book with id '{}' not found",
                book.book_id
            )));
        }

        tx.commit().await?;

        tracing::info!(book_id = %book.book_id, quantity = book.quantity, "Book updated");
        Ok(book)
    }

    /// Delete a book that nobody currently holds
    pub async fn delete_book(&self, book_id: &str) -> AppResult<()> {
        let book_id = book_id.trim();

        let mut tx = self.repository.begin().await?;

        if self.repository.books.find(&mut *tx, book_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Book with id '{}' not found", book_id)));
        }

        let deleted = self.repository.books.delete_unreferenced(&mut *tx, book_id).await?;
        if deleted == 0 {
            let holders = self.repository.borrows.count_for_book(&mut *tx, book_id).await?;
            tracing::warn!(book_id, holders, "Refused to delete a borrowed book");
            return Err(AppError::InUse(format!(
                "Cannot delete book '{}': it is currently borrowed by {} student(s)",
                book_id, holders
            )));
        }

        tx.commit().await?;

        tracing::info!(book_id, "Book deleted");
        Ok(())
    }
}

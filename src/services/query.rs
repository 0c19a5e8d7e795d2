//! Read-only listing and search over the catalog and borrow records

use crate::{
    error::AppResult,
    models::{book::Book, borrow::BorrowRecord},
    services::{catalog::CatalogService, circulation::CirculationService},
};

/// Build a `LIKE` pattern matching `term` anywhere, with `%`, `_` and `\`
/// in the term taken literally (escape character `\`).
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct QueryService {
    catalog: CatalogService,
    circulation: CirculationService,
}

impl QueryService {
    pub fn new(catalog: CatalogService, circulation: CirculationService) -> Self {
        Self { catalog, circulation }
    }

    /// Catalog listing, narrowed to names containing `term` when one is given
    pub async fn books(&self, term: Option<&str>) -> AppResult<Vec<Book>> {
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => self.catalog.search_books_by_name(term).await,
            None => self.catalog.list_books().await,
        }
    }

    pub async fn book(&self, book_id: &str) -> AppResult<Book> {
        self.catalog.get_book(book_id).await
    }

    /// Students currently holding a book
    pub async fn book_holders(&self, book_id: &str) -> AppResult<Vec<BorrowRecord>> {
        // Distinguish an unknown book from one nobody holds
        self.catalog.get_book(book_id).await?;
        self.circulation.list_active_records_for_book(book_id).await
    }

    pub async fn student_records(&self, student_roll: &str) -> AppResult<Vec<BorrowRecord>> {
        self.circulation.list_active_records_for_student(student_roll).await
    }

    pub async fn all_records(&self) -> AppResult<Vec<BorrowRecord>> {
        self.circulation.list_all_active_records().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("  The Hobbit "), "%The Hobbit%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn test_like_pattern_blank_matches_everything() {
        assert_eq!(like_pattern(""), "%%");
    }
}

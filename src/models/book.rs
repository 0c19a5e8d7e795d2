//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{optional_text, text};

/// Book row from `book_list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Externally assigned identifier (ISBN or accession number)
    pub book_id: String,
    #[sqlx(rename = "book_name")]
    pub name: String,
    pub author: Option<String>,
    /// Free-form "publisher, year"
    pub edition: Option<String>,
    pub price: f64,
    /// Copies currently available for issue
    #[sqlx(rename = "qty")]
    pub quantity: i64,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Book ID is required"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "Book name is required"))]
    pub name: String,
    pub author: Option<String>,
    pub edition: Option<String>,
    /// Defaults to 0 when omitted
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(
        required(message = "Quantity is required"),
        range(min = 0, message = "Quantity must be a whole number (0 or greater)")
    )]
    pub quantity: Option<i64>,
}

/// Update book request (the identifier comes from the path)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Book name is required"))]
    pub name: String,
    pub author: Option<String>,
    pub edition: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(
        required(message = "Quantity is required"),
        range(min = 0, message = "Quantity must be a whole number (0 or greater)")
    )]
    pub quantity: Option<i64>,
}

/// Catalog listing query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub q: Option<String>,
}

impl CreateBook {
    /// Trim all fields and blank optionals to `None`
    pub fn normalized(self) -> Self {
        Self {
            book_id: text(&self.book_id),
            name: text(&self.name),
            author: optional_text(self.author),
            edition: optional_text(self.edition),
            price: self.price,
            quantity: self.quantity,
        }
    }

    /// Validated book row ready for insertion
    pub fn into_book(self) -> crate::error::AppResult<Book> {
        let input = self.normalized();
        input.validate()?;
        Ok(Book {
            book_id: input.book_id,
            name: input.name,
            author: input.author,
            edition: input.edition,
            price: input.price.unwrap_or(0.0),
            quantity: input.quantity.unwrap_or_default(),
        })
    }
}

impl UpdateBook {
    pub fn normalized(self) -> Self {
        Self {
            name: text(&self.name),
            author: optional_text(self.author),
            edition: optional_text(self.edition),
            price: self.price,
            quantity: self.quantity,
        }
    }

    /// Validated replacement row for `book_id`
    pub fn into_book(self, book_id: &str) -> crate::error::AppResult<Book> {
        let input = self.normalized();
        input.validate()?;
        Ok(Book {
            book_id: text(book_id),
            name: input.name,
            author: input.author,
            edition: input.edition,
            price: input.price.unwrap_or(0.0),
            quantity: input.quantity.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn create(quantity: Option<i64>, price: Option<f64>) -> CreateBook {
        CreateBook {
            book_id: " 9780140449136 ".to_string(),
            name: " The Odyssey ".to_string(),
            author: Some("Homer".to_string()),
            edition: Some("  ".to_string()),
            price,
            quantity,
        }
    }

    #[test]
    fn test_into_book_trims_and_defaults_price() {
        let book = create(Some(2), None).into_book().unwrap();
        assert_eq!(book.book_id, "9780140449136");
        assert_eq!(book.name, "The Odyssey");
        assert_eq!(book.edition, None);
        assert_eq!(book.price, 0.0);
        assert_eq!(book.quantity, 2);
    }

    #[test]
    fn test_missing_quantity_rejected() {
        assert!(matches!(
            create(None, Some(10.0)).into_book(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(matches!(
            create(Some(-1), None).into_book(),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            create(Some(1), Some(-0.5)).into_book(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_blank_name_rejected_on_update() {
        let update = UpdateBook {
            name: "   ".to_string(),
            author: None,
            edition: None,
            price: None,
            quantity: Some(1),
        };
        match update.into_book("B1") {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "Book name is required"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

//! Catalog records: books, categories, and reader comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BookId, CategoryId, CommentId, ModerationStatus, Price, UserId};

/// Placeholder shown when a book has no title.
pub const UNKNOWN_TITLE: &str = "Unknown Book";
/// Placeholder shown when a book has no author.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Placeholder shown when a book has no price.
pub const UNKNOWN_PRICE: &str = "N/A";

/// A book as returned by the catalog endpoints.
///
/// Everything except the ID is optional on the wire; a book that was
/// deleted upstream can also leave a cart entry with an old snapshot, so
/// display code goes through the `display_*` helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price; `None` when the API has no price for the book.
    #[serde(default)]
    pub price: Option<Price>,
    /// Absolute cover image URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Book {
    /// A book with only an ID and title, used by tests and fixtures.
    #[must_use]
    pub fn new(id: BookId, title: impl Into<String>, price: Option<Price>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            author: None,
            description: None,
            price,
            image: None,
            category: None,
        }
    }

    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    #[must_use]
    pub fn display_author(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }

    #[must_use]
    pub fn display_price(&self) -> String {
        self.price
            .map_or_else(|| UNKNOWN_PRICE.to_string(), |p| p.to_string())
    }
}

/// A catalog category and the users allowed to moderate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub moderators: Vec<UserId>,
}

/// A reader comment on a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub username: String,
    pub content: String,
    #[serde(default)]
    pub approved: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_from_api_json() {
        let json = r#"{
            "id": 4,
            "title": "Lalka",
            "author": "Bolesław Prus",
            "description": null,
            "price": "39.90",
            "image": "http://127.0.0.1:8000/media/lalka.jpg",
            "category": {"id": 1, "name": "Klasyka", "moderators": [2, 3]}
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, BookId::new(4));
        assert_eq!(book.price, Some(Price::from_cents(3990)));
        assert_eq!(book.category.unwrap().moderators, vec![UserId::new(2), UserId::new(3)]);
    }

    #[test]
    fn test_book_placeholders() {
        let book: Book = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert_eq!(book.display_title(), UNKNOWN_TITLE);
        assert_eq!(book.display_author(), UNKNOWN_AUTHOR);
        assert_eq!(book.display_price(), UNKNOWN_PRICE);
    }

    #[test]
    fn test_book_with_non_numeric_price_is_rejected() {
        let result = serde_json::from_str::<Book>(r#"{"id": 1, "price": "free"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_comment_pending_when_approved_is_null() {
        let json = r#"{
            "id": 1,
            "username": "ala",
            "content": "Świetna!",
            "approved": null,
            "created_at": "2024-11-02T10:15:00Z"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.approved, ModerationStatus::Pending);
    }
}

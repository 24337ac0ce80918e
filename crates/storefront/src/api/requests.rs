//! Request bodies and query parameters sent to the bookstore API.

use bookstore_core::{
    BookId, CategoryId, Email, ImageId, OrderLine, OrderStatus, ThemeId,
};
use serde::Serialize;
use url::Url;

/// Filters for the book listing.
///
/// The service ignores `ids`; [`BookstoreClient::books`] filters the
/// response itself when ids are given.
///
/// [`BookstoreClient::books`]: super::BookstoreClient::books
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub category: Option<CategoryId>,
    pub ids: Vec<BookId>,
    pub query: Option<String>,
}

impl BookQuery {
    /// Query restricted to the given ids.
    #[must_use]
    pub fn by_ids(ids: &[BookId]) -> Self {
        Self {
            ids: ids.to_vec(),
            ..Self::default()
        }
    }

    /// Full-text search over title, author and description.
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            query: Some(text.into()),
            ..Self::default()
        }
    }

    /// Append the non-empty filters to `url` as query parameters.
    pub(crate) fn apply(&self, url: &mut Url) {
        let ids = self
            .ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let query = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty());

        if self.category.is_none() && ids.is_empty() && query.is_none() {
            return;
        }

        let mut pairs = url.query_pairs_mut();
        if let Some(category) = self.category {
            pairs.append_pair("category", &category.to_string());
        }
        if !ids.is_empty() {
            pairs.append_pair("ids", &ids);
        }
        if let Some(query) = query {
            pairs.append_pair("query", query);
        }
    }
}

/// Order submission payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub shipping_address: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageRequest {
    pub image_id: ImageId,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageOrderUpdate {
    pub image_id: ImageId,
    pub new_order: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSlider<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewComment<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ThemeSelection {
    pub theme_id: ThemeId,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:8000/api/books/").unwrap()
    }

    #[test]
    fn test_empty_query_adds_nothing() {
        let mut url = base();
        BookQuery::default().apply(&mut url);
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/books/");
    }

    #[test]
    fn test_query_parameters() {
        let mut url = base();
        BookQuery {
            category: Some(CategoryId::new(3)),
            ids: vec![BookId::new(1), BookId::new(2)],
            query: Some("  dune ".to_string()),
        }
        .apply(&mut url);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/books/?category=3&ids=1%2C2&query=dune"
        );
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let mut url = base();
        BookQuery::search("   ").apply(&mut url);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_new_order_wire_format() {
        let order = NewOrder {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            email: Email::parse("jan@example.com").unwrap(),
            shipping_address: "Main St 1".to_string(),
            city: "Warsaw".to_string(),
            postal_code: "00-001".to_string(),
            phone_number: "123456789".to_string(),
            items: vec![OrderLine {
                book: BookId::new(1),
                quantity: 2,
            }],
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["email"], "jan@example.com");
        assert_eq!(json["items"][0]["book"], 1);
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_status_update_wire_format() {
        let body = StatusUpdate {
            status: OrderStatus::Shipped,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"shipped"}"#
        );
    }
}

//! Orders placed through checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BookId, OrderId, OrderStatus, Price};

/// A line submitted with a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub book: BookId,
    pub quantity: u32,
}

/// A placed order as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Owner; only staff listings span several users.
    #[serde(default)]
    pub username: Option<String>,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_price: Price,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// One priced line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub book_title: String,
    pub quantity: u32,
    pub total_price: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_from_api_json() {
        let json = r#"{
            "id": 12,
            "username": "ala",
            "shipping_address": "ul. Długa 1",
            "status": "shipped",
            "created_at": "2024-11-02T10:15:00.123456+01:00",
            "updated_at": "2024-11-03T08:00:00Z",
            "total_price": "25.50",
            "items": [
                {"book_title": "Lalka", "quantity": 2, "total_price": "20.00"},
                {"book_title": "Quo Vadis", "quantity": 1, "total_price": "5.50"}
            ]
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total_price, Price::from_cents(2550));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.created_at.to_rfc3339(), "2024-11-02T09:15:00.123456+00:00");
    }

    #[test]
    fn test_order_line_wire_shape() {
        let line = OrderLine {
            book: BookId::new(3),
            quantity: 2,
        };
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"book":3,"quantity":2}"#
        );
    }
}

//! Client-side shopping cart.
//!
//! The cart is an ordered list of `{book, quantity}` entries with at most
//! one entry per book. It is owned by the client until checkout; the
//! storefront crate persists it as a single JSON document, overwritten on
//! every change. Insertion order is display order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Book;
use crate::order::OrderLine;
use crate::types::{BookId, Price};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Snapshot of the book taken when it was added or last refreshed.
    pub book: Book,
    pub quantity: u32,
}

impl CartEntry {
    /// Quantity times unit price, or `None` when the book has no price or
    /// the amount does not fit a decimal.
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.book.price.and_then(|price| price.times(self.quantity))
    }
}

/// The shopping cart.
///
/// Serializes as a bare JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, book_id: BookId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.book.id == book_id)
    }

    #[must_use]
    pub fn contains(&self, book_id: BookId) -> bool {
        self.get(book_id).is_some()
    }

    /// Add one copy of `book`.
    ///
    /// If the book is already in the cart its quantity goes up by one and
    /// the existing snapshot is kept; otherwise a new entry with quantity 1
    /// is appended. Returns the entry's new quantity.
    pub fn add(&mut self, book: Book) -> u32 {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.book.id == book.id) {
            entry.quantity = entry.quantity.saturating_add(1);
            return entry.quantity;
        }

        self.entries.push(CartEntry { book, quantity: 1 });
        1
    }

    /// Overwrite the quantity of the entry for `book_id`.
    ///
    /// No floor is enforced: a quantity of zero is stored as given and the
    /// caller decides whether that is acceptable. Returns `false` if the
    /// book is not in the cart.
    pub fn set_quantity(&mut self, book_id: BookId, quantity: u32) -> bool {
        match self.entries.iter_mut().find(|e| e.book.id == book_id) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `book_id`, returning it if it was present.
    pub fn remove(&mut self, book_id: BookId) -> Option<CartEntry> {
        let index = self.entries.iter().position(|e| e.book.id == book_id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of quantity × unit price over all entries, rounded to cents.
    ///
    /// Returns `None` if any entry's book has no price or the sum
    /// overflows; a partial total would be wrong rather than merely
    /// incomplete.
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.entries
            .iter()
            .try_fold(Price::ZERO, |acc, entry| acc.checked_add(entry.line_total()?))
            .map(Price::round_to_cents)
    }

    /// Number of copies across all entries.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// IDs of every book in the cart, in cart order.
    #[must_use]
    pub fn book_ids(&self) -> Vec<BookId> {
        self.entries.iter().map(|e| e.book.id).collect()
    }

    /// Replace each entry's snapshot with the matching record from `catalog`.
    ///
    /// Entries whose book is missing from `catalog` keep their old
    /// snapshot; their IDs are returned so the caller can flag them.
    pub fn reconcile(&mut self, catalog: &[Book]) -> Vec<BookId> {
        let fresh: HashMap<BookId, &Book> = catalog.iter().map(|b| (b.id, b)).collect();
        let mut stale = Vec::new();

        for entry in &mut self.entries {
            match fresh.get(&entry.book.id) {
                Some(book) => entry.book = (*book).clone(),
                None => stale.push(entry.book.id),
            }
        }

        stale
    }

    /// Order lines for checkout, in cart order.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.entries
            .iter()
            .map(|e| OrderLine {
                book: e.book.id,
                quantity: e.quantity,
            })
            .collect()
    }
}

impl FromIterator<CartEntry> for Cart {
    fn from_iter<I: IntoIterator<Item = CartEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

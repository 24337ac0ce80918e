//! The persisted shopping cart.
//!
//! Every mutation loads the stored cart, applies the change and writes the
//! whole document back. An in-process mutex serialises these
//! read-modify-write cycles; writers in other processes are last-write-wins.

use bookstore_core::{Book, BookId, Cart};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::api::CatalogApi;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::storage::CartStorage;

/// Result of refreshing the cart against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRefresh {
    pub cart: Cart,
    /// Books the catalog no longer returns; their entries keep the old snapshot.
    pub stale: Vec<BookId>,
}

/// Cart operations over a [`CartStorage`].
#[derive(Debug)]
pub struct CartService<S> {
    pub(super) storage: S,
    pub(super) lock: Mutex<()>,
}

impl<S: CartStorage> CartService<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Current contents of the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the stored cart cannot be read.
    pub async fn cart(&self) -> Result<Cart> {
        Ok(self.storage.load().await?)
    }

    /// Add one copy of `book`, merging with an existing entry for the same id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the cart cannot be read or saved.
    #[instrument(skip(self, book), fields(book_id = %book.id))]
    pub async fn add_item(&self, book: Book) -> Result<Cart> {
        let book_id = book.id.to_string();
        let cart = self
            .update(|cart| {
                cart.add(book);
                Ok(())
            })
            .await?;

        add_breadcrumb("cart", "Added book", Some(&[("book_id", &book_id)]));
        Ok(cart)
    }

    /// Overwrite the quantity of a book already in the cart.
    ///
    /// Any quantity is accepted, including zero.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the book is not in the cart, or
    /// `AppError::Storage` if the cart cannot be read or saved.
    #[instrument(skip(self))]
    pub async fn set_quantity(&self, book_id: BookId, quantity: u32) -> Result<Cart> {
        self.update(|cart| {
            if cart.set_quantity(book_id, quantity) {
                Ok(())
            } else {
                Err(not_in_cart(book_id))
            }
        })
        .await
    }

    /// Remove a book from the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the book is not in the cart, or
    /// `AppError::Storage` if the cart cannot be read or saved.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, book_id: BookId) -> Result<Cart> {
        self.update(|cart| {
            cart.remove(book_id)
                .map(|_| ())
                .ok_or_else(|| not_in_cart(book_id))
        })
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the stored cart cannot be removed.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.storage.clear().await?;
        Ok(())
    }

    /// Replace entry snapshots with the catalog's current records.
    ///
    /// Books the catalog no longer returns keep their old snapshot and are
    /// reported in [`CartRefresh::stale`]. The catalog is queried without
    /// holding the cart lock, so entries added meanwhile simply keep their
    /// own snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the catalog request fails (the stored cart
    /// is left untouched), or `AppError::Storage` on read/write failure.
    #[instrument(skip(self, catalog))]
    pub async fn refresh<C: CatalogApi>(&self, catalog: &C) -> Result<CartRefresh> {
        let ids = self.cart().await?.book_ids();
        if ids.is_empty() {
            return Ok(CartRefresh {
                cart: Cart::new(),
                stale: Vec::new(),
            });
        }

        let books = catalog.books_by_ids(&ids).await?;

        let _guard = self.lock.lock().await;
        let mut cart = self.storage.load().await?;
        let stale = cart.reconcile(&books);
        self.storage.save(&cart).await?;

        if stale.is_empty() {
            info!(entries = cart.len(), "Cart refreshed");
        } else {
            warn!(entries = cart.len(), stale = ?stale, "Cart references books missing from the catalog");
        }

        Ok(CartRefresh { cart, stale })
    }

    /// Load, apply `change` and save under the cart lock.
    ///
    /// Nothing is saved if `change` fails.
    async fn update<F>(&self, change: F) -> Result<Cart>
    where
        F: FnOnce(&mut Cart) -> Result<()>,
    {
        let _guard = self.lock.lock().await;
        let mut cart = self.storage.load().await?;
        change(&mut cart)?;
        self.storage.save(&cart).await?;
        Ok(cart)
    }
}

fn not_in_cart(book_id: BookId) -> AppError {
    AppError::NotFound(format!("Book {book_id} is not in the cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::storage::MemoryCartStorage;
    use bookstore_core::Price;

    fn book(id: i64, price: &str) -> Book {
        Book::new(
            BookId::new(id),
            format!("Book {id}"),
            Some(Price::parse(price).unwrap()),
        )
    }

    fn service() -> CartService<MemoryCartStorage> {
        CartService::new(MemoryCartStorage::new())
    }

    struct FixedCatalog(Vec<Book>);

    impl CatalogApi for FixedCatalog {
        async fn books_by_ids(&self, ids: &[BookId]) -> std::result::Result<Vec<Book>, ApiError> {
            Ok(self
                .0
                .iter()
                .filter(|b| ids.contains(&b.id))
                .cloned()
                .collect())
        }
    }

    struct DownCatalog;

    impl CatalogApi for DownCatalog {
        async fn books_by_ids(&self, _ids: &[BookId]) -> std::result::Result<Vec<Book>, ApiError> {
            Err(ApiError::Status {
                status: 503,
                message: "maintenance".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_add_item_persists_and_merges() {
        let service = service();
        service.add_item(book(1, "10.00")).await.unwrap();
        service.add_item(book(1, "10.00")).await.unwrap();
        service.add_item(book(2, "5.50")).await.unwrap();

        let cart = service.cart().await.unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(BookId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.total(), Some(Price::parse("25.50").unwrap()));
    }

    #[tokio::test]
    async fn test_set_quantity_updates_total() {
        let service = service();
        service.add_item(book(1, "10.00")).await.unwrap();
        service.add_item(book(1, "10.00")).await.unwrap();
        service.add_item(book(2, "5.50")).await.unwrap();

        let cart = service.set_quantity(BookId::new(1), 3).await.unwrap();
        assert_eq!(cart.total(), Some(Price::parse("35.50").unwrap()));
        assert_eq!(service.cart().await.unwrap(), cart);
    }

    #[tokio::test]
    async fn test_unknown_book_is_not_found_and_not_saved() {
        let service = service();
        service.add_item(book(1, "10.00")).await.unwrap();

        assert!(matches!(
            service.set_quantity(BookId::new(9), 2).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.remove_item(BookId::new(9)).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.cart().await.unwrap().total_quantity(), 1);
    }

    #[tokio::test]
    async fn test_remove_item_excludes_from_total() {
        let service = service();
        service.add_item(book(1, "10.00")).await.unwrap();
        service.add_item(book(2, "5.50")).await.unwrap();

        let cart = service.remove_item(BookId::new(1)).await.unwrap();
        assert!(cart.get(BookId::new(1)).is_none());
        assert_eq!(cart.total(), Some(Price::parse("5.50").unwrap()));
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let service = std::sync::Arc::new(service());
        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let service = std::sync::Arc::clone(&service);
                tokio::spawn(async move { service.add_item(book(i % 4, "1.00")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let cart = service.cart().await.unwrap();
        assert_eq!(cart.len(), 4);
        assert_eq!(cart.total_quantity(), 20);
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshots_and_reports_stale() {
        let service = service();
        service.add_item(book(1, "10.00")).await.unwrap();
        service.add_item(book(2, "5.50")).await.unwrap();

        let catalog = FixedCatalog(vec![book(1, "12.00")]);
        let refresh = service.refresh(&catalog).await.unwrap();

        assert_eq!(refresh.stale, vec![BookId::new(2)]);
        assert_eq!(
            refresh.cart.get(BookId::new(1)).unwrap().book.price,
            Some(Price::parse("12.00").unwrap())
        );
        // Stale entry keeps its snapshot
        assert_eq!(
            refresh.cart.get(BookId::new(2)).unwrap().book.price,
            Some(Price::parse("5.50").unwrap())
        );
        assert_eq!(service.cart().await.unwrap(), refresh.cart);
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_cart() {
        let service = service();
        service.add_item(book(1, "10.00")).await.unwrap();

        let result = service.refresh(&DownCatalog).await;
        assert!(matches!(result, Err(AppError::Api(_))));
        assert_eq!(service.cart().await.unwrap().total_quantity(), 1);
    }

    #[tokio::test]
    async fn test_refresh_empty_cart_skips_catalog() {
        let refresh = service().refresh(&DownCatalog).await.unwrap();
        assert!(refresh.cart.is_empty());
        assert!(refresh.stale.is_empty());
    }
}

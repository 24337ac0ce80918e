//! Integration tests for the bookstore client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookstore-integration-tests
//! ```
//!
//! The tests run the storefront services against [`FakeBookstore`], an
//! in-memory stand-in for the REST API that implements the same traits as
//! `BookstoreClient`. No network or running service is needed.
//!
//! # Test Categories
//!
//! - `cart_checkout` - Cart persistence, refresh and order submission
//! - `slider_admin` - Slider membership, positions and default selection
//! - `action_guard` - Double submission and cancellation of slider edits

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bookstore_core::{
    Book, BookId, GalleryImage, ImageId, Order, OrderId, OrderItem, OrderStatus, Price, Slider,
    SliderId,
};
use bookstore_storefront::api::{ApiError, CatalogApi, NewOrder, OrderApi, SliderApi};

/// In-memory bookstore API.
///
/// Operations named in [`FakeBookstore::fail`] return HTTP 500. Position
/// updates wait on [`FakeBookstore::gate`], so a test can hold one in flight.
#[derive(Debug, Default)]
pub struct FakeBookstore {
    state: Mutex<FakeState>,
    failing: Mutex<HashSet<&'static str>>,
    /// Held by a test to stall `update_image_position`.
    pub gate: tokio::sync::Mutex<()>,
}

#[derive(Debug, Default)]
struct FakeState {
    books: BTreeMap<BookId, Book>,
    sliders: BTreeMap<SliderId, Slider>,
    images: BTreeMap<ImageId, GalleryImage>,
    orders: Vec<NewOrder>,
    calls: Vec<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(what: &str) -> ApiError {
    ApiError::NotFound(format!("{what} not found."))
}

fn out_of_range() -> ApiError {
    ApiError::Status {
        status: 400,
        message: "Order total is out of range.".to_string(),
    }
}

impl FakeBookstore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A priced book with a generated title.
    ///
    /// # Panics
    ///
    /// Panics if `price` is not a decimal.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn book(id: i64, price: &str) -> Book {
        Book::new(
            BookId::new(id),
            format!("Book {id}"),
            Some(Price::parse(price).unwrap()),
        )
    }

    /// A gallery image with a generated title and URL.
    #[must_use]
    pub fn image(id: i64) -> GalleryImage {
        GalleryImage {
            id: ImageId::new(id),
            title: format!("Image {id}"),
            description: None,
            image: format!("/media/gallery/{id}.jpg"),
            position: None,
        }
    }

    pub fn insert_book(&self, book: Book) {
        lock(&self.state).books.insert(book.id, book);
    }

    pub fn remove_book(&self, id: BookId) {
        lock(&self.state).books.remove(&id);
    }

    pub fn insert_image(&self, image: GalleryImage) {
        lock(&self.state).images.insert(image.id, image);
    }

    /// Add a slider whose members are the given (already inserted) images.
    pub fn insert_slider(&self, id: i64, title: &str, images: &[i64], is_default: bool) {
        let mut state = lock(&self.state);
        let members = images
            .iter()
            .filter_map(|i| state.images.get(&ImageId::new(*i)).cloned())
            .collect();
        state.sliders.insert(
            SliderId::new(id),
            Slider {
                id: SliderId::new(id),
                title: Some(title.to_string()),
                is_default,
                images: members,
            },
        );
    }

    /// Make `operation` fail with HTTP 500 until [`recover`](Self::recover).
    pub fn fail(&self, operation: &'static str) {
        lock(&self.failing).insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        lock(&self.failing).remove(operation);
    }

    /// Mutating calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.state).calls.clone()
    }

    /// Orders received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<NewOrder> {
        lock(&self.state).orders.clone()
    }

    /// Server-side view of a slider.
    #[must_use]
    pub fn slider_snapshot(&self, id: i64) -> Option<Slider> {
        lock(&self.state).sliders.get(&SliderId::new(id)).cloned()
    }

    fn check(&self, operation: &'static str) -> Result<(), ApiError> {
        if lock(&self.failing).contains(operation) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("{operation} failed"),
            });
        }
        Ok(())
    }

    fn record(&self, call: String) {
        lock(&self.state).calls.push(call);
    }
}

impl CatalogApi for FakeBookstore {
    async fn books_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, ApiError> {
        self.check("books")?;
        let state = lock(&self.state);
        Ok(ids
            .iter()
            .filter_map(|id| state.books.get(id).cloned())
            .collect())
    }
}

impl OrderApi for FakeBookstore {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.check("create_order")?;
        let mut state = lock(&self.state);

        let mut items = Vec::with_capacity(order.items.len());
        for line in &order.items {
            let book = state.books.get(&line.book).ok_or_else(|| not_found("Book"))?;
            let price = book.price.unwrap_or(Price::ZERO);
            items.push(OrderItem {
                book_title: book.display_title().to_string(),
                quantity: line.quantity,
                total_price: price.times(line.quantity).ok_or_else(out_of_range)?,
            });
        }

        state.orders.push(order.clone());
        let id = i64::try_from(state.orders.len()).unwrap_or(i64::MAX);
        let now = chrono::Utc::now();

        Ok(Order {
            id: OrderId::new(id),
            username: None,
            shipping_address: order.shipping_address.clone(),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            total_price: items
                .iter()
                .try_fold(Price::ZERO, |acc, i| acc.checked_add(i.total_price))
                .ok_or_else(out_of_range)?,
            items,
        })
    }
}

impl SliderApi for FakeBookstore {
    async fn list_sliders(&self) -> Result<Vec<Slider>, ApiError> {
        self.check("list_sliders")?;
        Ok(lock(&self.state).sliders.values().cloned().collect())
    }

    async fn get_slider(&self, id: SliderId) -> Result<Slider, ApiError> {
        self.check("get_slider")?;
        lock(&self.state)
            .sliders
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("Slider"))
    }

    async fn create_slider(&self, title: &str) -> Result<Slider, ApiError> {
        self.check("create_slider")?;
        self.record(format!("create {title}"));

        let mut state = lock(&self.state);
        let next = state.sliders.keys().next_back().map_or(1, |id| id.as_i64() + 1);
        let slider = Slider {
            id: SliderId::new(next),
            title: Some(title.to_string()),
            is_default: false,
            images: Vec::new(),
        };
        state.sliders.insert(slider.id, slider.clone());
        Ok(slider)
    }

    async fn delete_slider(&self, id: SliderId) -> Result<(), ApiError> {
        self.check("delete_slider")?;
        self.record(format!("delete {id}"));
        lock(&self.state)
            .sliders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Slider"))
    }

    async fn add_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError> {
        self.check("add_slider_image")?;
        self.record(format!("add {id} {image}"));

        let mut state = lock(&self.state);
        let image = state.images.get(&image).cloned().ok_or_else(|| not_found("Image"))?;
        let slider = state.sliders.get_mut(&id).ok_or_else(|| not_found("Slider"))?;
        // Adding an existing member is a no-op, as with a many-to-many add
        if !slider.is_member(image.id) {
            slider.images.push(image);
        }
        Ok(())
    }

    async fn remove_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError> {
        self.check("remove_slider_image")?;
        self.record(format!("remove {id} {image}"));

        let mut state = lock(&self.state);
        let slider = state.sliders.get_mut(&id).ok_or_else(|| not_found("Slider"))?;
        slider.images.retain(|i| i.id != image);
        Ok(())
    }

    async fn update_image_position(
        &self,
        id: SliderId,
        image: ImageId,
        position: i64,
    ) -> Result<(), ApiError> {
        let _gate = self.gate.lock().await;
        self.check("update_image_position")?;
        self.record(format!("position {id} {image} {position}"));

        let mut state = lock(&self.state);
        let slider = state.sliders.get_mut(&id).ok_or_else(|| not_found("Slider"))?;
        let member = slider
            .images
            .iter_mut()
            .find(|i| i.id == image)
            .ok_or_else(|| not_found("Image"))?;
        member.position = Some(position);
        Ok(())
    }

    async fn set_default_slider(&self, id: SliderId) -> Result<(), ApiError> {
        self.check("set_default_slider")?;
        self.record(format!("default {id}"));

        let mut state = lock(&self.state);
        if !state.sliders.contains_key(&id) {
            return Err(not_found("Slider"));
        }
        for slider in state.sliders.values_mut() {
            slider.is_default = slider.id == id;
        }
        Ok(())
    }

    async fn list_images(&self) -> Result<Vec<GalleryImage>, ApiError> {
        self.check("list_images")?;
        Ok(lock(&self.state).images.values().cloned().collect())
    }
}

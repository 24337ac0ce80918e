//! Bookstore REST API client.
//!
//! # Architecture
//!
//! - [`BookstoreClient`] wraps a shared `reqwest::Client` and attaches the
//!   bearer token to every request
//! - Responses are parsed into the `bookstore_core` records at this boundary;
//!   a body that does not match fails with [`ApiError::Malformed`]
//! - Each operation is one HTTP call. There is no batching, no retry, and no
//!   response caching
//!
//! The cart, checkout and slider services only need a few operations, so
//! those are expressed as traits ([`CatalogApi`], [`OrderApi`],
//! [`SliderApi`]) that tests can implement with in-memory fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstore_storefront::api::{BookstoreClient, SliderApi};
//!
//! let client = BookstoreClient::new(&config.api)?;
//! let slider = client.get_slider(SliderId::new(1)).await?;
//! client.add_slider_image(slider.id, ImageId::new(7)).await?;
//! ```

mod client;
pub mod requests;

pub use client::BookstoreClient;
pub use requests::{BookQuery, NewOrder};

use bookstore_core::{Book, BookId, GalleryImage, ImageId, Order, Slider, SliderId};
use thiserror::Error;

/// Errors that can occur when talking to the bookstore API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("Malformed response from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or insufficient credentials (HTTP 401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the failure happened before the service answered.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Catalog lookups needed to refresh cart snapshots.
pub trait CatalogApi {
    /// Fetch the current records for `ids`.
    ///
    /// Books that no longer exist are simply absent from the result.
    async fn books_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, ApiError>;
}

/// Order submission.
pub trait OrderApi {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError>;
}

/// Slider (image carousel) administration.
///
/// Every mutation is a single independent call; nothing is transactional.
pub trait SliderApi {
    async fn list_sliders(&self) -> Result<Vec<Slider>, ApiError>;

    async fn get_slider(&self, id: SliderId) -> Result<Slider, ApiError>;

    async fn create_slider(&self, title: &str) -> Result<Slider, ApiError>;

    async fn delete_slider(&self, id: SliderId) -> Result<(), ApiError>;

    async fn add_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError>;

    async fn remove_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError>;

    /// Set the position hint of `image` within slider `id`.
    async fn update_image_position(
        &self,
        id: SliderId,
        image: ImageId,
        position: i64,
    ) -> Result<(), ApiError>;

    async fn set_default_slider(&self, id: SliderId) -> Result<(), ApiError>;

    /// All uploaded gallery images, members or not.
    async fn list_images(&self) -> Result<Vec<GalleryImage>, ApiError>;
}

// =============================================================================
// Shared References
// =============================================================================

impl<T: CatalogApi> CatalogApi for &T {
    async fn books_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, ApiError> {
        (**self).books_by_ids(ids).await
    }
}

impl<T: OrderApi> OrderApi for &T {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        (**self).create_order(order).await
    }
}

impl<T: SliderApi> SliderApi for &T {
    async fn list_sliders(&self) -> Result<Vec<Slider>, ApiError> {
        (**self).list_sliders().await
    }

    async fn get_slider(&self, id: SliderId) -> Result<Slider, ApiError> {
        (**self).get_slider(id).await
    }

    async fn create_slider(&self, title: &str) -> Result<Slider, ApiError> {
        (**self).create_slider(title).await
    }

    async fn delete_slider(&self, id: SliderId) -> Result<(), ApiError> {
        (**self).delete_slider(id).await
    }

    async fn add_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError> {
        (**self).add_slider_image(id, image).await
    }

    async fn remove_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError> {
        (**self).remove_slider_image(id, image).await
    }

    async fn update_image_position(
        &self,
        id: SliderId,
        image: ImageId,
        position: i64,
    ) -> Result<(), ApiError> {
        (**self).update_image_position(id, image, position).await
    }

    async fn set_default_slider(&self, id: SliderId) -> Result<(), ApiError> {
        (**self).set_default_slider(id).await
    }

    async fn list_images(&self) -> Result<Vec<GalleryImage>, ApiError> {
        (**self).list_images().await
    }
}

use std::sync::Arc;

use bookstore_core::{
    Book, BookId, Category, Comment, CommentId, GalleryImage, ImageId, Order, OrderId,
    OrderStatus, Slider, SliderId, Theme, ThemeId, UserEvent, UserProfile, UserStatus,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::requests::{
    BookQuery, CreateSlider, ImageOrderUpdate, ImageRequest, NewComment, NewOrder, StatusUpdate,
    ThemeSelection,
};
use super::{ApiError, CatalogApi, OrderApi, SliderApi};
use crate::config::ApiConfig;

/// Client for the bookstore REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct BookstoreClient {
    inner: Arc<BookstoreClientInner>,
}

struct BookstoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for BookstoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookstoreClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl BookstoreClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(BookstoreClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List books, optionally filtered.
    ///
    /// When `query.ids` is non-empty only those books are returned, in the
    /// order the service lists them.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn books(&self, query: &BookQuery) -> Result<Vec<Book>, ApiError> {
        let mut url = self.endpoint("books/")?;
        query.apply(&mut url);

        let books: Vec<Book> = self.fetch(self.request(reqwest::Method::GET, url), "books/").await?;
        if query.ids.is_empty() {
            return Ok(books);
        }
        Ok(books
            .into_iter()
            .filter(|book| query.ids.contains(&book.id))
            .collect())
    }

    /// Fetch a single book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the book does not exist.
    #[instrument(skip(self))]
    pub async fn book(&self, id: BookId) -> Result<Book, ApiError> {
        self.get(&format!("books/{id}/")).await
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("categories/").await
    }

    // =========================================================================
    // Comments & Moderation
    // =========================================================================

    /// Comments on a book, visible to the current user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn comments(&self, book: BookId) -> Result<Vec<Comment>, ApiError> {
        self.get(&format!("books/{book}/comments/")).await
    }

    /// Post a comment; it starts out pending moderation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` without a token.
    #[instrument(skip(self, content))]
    pub async fn post_comment(&self, book: BookId, content: &str) -> Result<Comment, ApiError> {
        self.post(&format!("books/{book}/comments/"), &NewComment { content })
            .await
    }

    /// Approve a pending comment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the user moderates the book's category.
    #[instrument(skip(self))]
    pub async fn approve_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.post_empty(&format!("comments/{id}/approve/")).await
    }

    /// Reject a pending comment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the user moderates the book's category.
    #[instrument(skip(self))]
    pub async fn reject_comment(&self, id: CommentId) -> Result<(), ApiError> {
        self.post_empty(&format!("comments/{id}/reject/")).await
    }

    /// Approve a book submitted to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the user moderates the book's category.
    #[instrument(skip(self))]
    pub async fn approve_book(&self, id: BookId) -> Result<(), ApiError> {
        self.post_empty(&format!("books/{id}/approve/")).await
    }

    /// Reject a book submitted to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the user moderates the book's category.
    #[instrument(skip(self))]
    pub async fn reject_book(&self, id: BookId) -> Result<(), ApiError> {
        self.post_empty(&format!("books/{id}/reject/")).await
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Roles of the current user; anonymous callers get no roles.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn user_status(&self) -> Result<UserStatus, ApiError> {
        self.get("user_status/").await
    }

    /// Profile of the current user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` without a token.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get("profile/").await
    }

    /// Notifications for the current user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` without a token.
    #[instrument(skip(self))]
    pub async fn events(&self) -> Result<Vec<UserEvent>, ApiError> {
        self.get("events/").await
    }

    // =========================================================================
    // Themes
    // =========================================================================

    /// All available color themes.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn themes(&self) -> Result<Vec<Theme>, ApiError> {
        self.get("themes/").await
    }

    /// The site-wide default theme.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no theme exists.
    #[instrument(skip(self))]
    pub async fn default_theme(&self) -> Result<Theme, ApiError> {
        self.get("theme/default/").await
    }

    /// The theme currently selected by an administrator.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if none has been selected.
    #[instrument(skip(self))]
    pub async fn selected_theme(&self) -> Result<Theme, ApiError> {
        self.get("themes/select/").await
    }

    /// Select the site theme.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the theme does not exist.
    #[instrument(skip(self))]
    pub async fn select_theme(&self, id: ThemeId) -> Result<(), ApiError> {
        self.send_unit(
            reqwest::Method::POST,
            "themes/select/",
            Some(&ThemeSelection { theme_id: id }),
        )
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Orders visible to the current user; staff see every order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` without a token.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("orders/").await
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist or is not visible.
    #[instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&format!("orders/{id}/")).await
    }

    /// Change an order's fulfilment status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the user is staff.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        self.send_unit(
            reqwest::Method::POST,
            &format!("orders/{id}/update-status/"),
            Some(&StatusUpdate { status }),
        )
        .await
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    /// Resolve a path relative to the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.fetch(self.request(reqwest::Method::GET, url), path).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.fetch(self.request(reqwest::Method::POST, url).json(body), path)
            .await
    }

    async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send_unit::<()>(reqwest::Method::POST, path, None).await
    }

    /// Send a request whose response body is ignored on success.
    async fn send_unit<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let mut builder = self.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            debug!(path, status = status.as_u16(), "Request succeeded");
            return Ok(());
        }
        Err(Self::parse_error(response, path).await)
    }

    /// Send a request and parse the JSON body of a successful response.
    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(Self::parse_error(response, path).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Malformed {
            endpoint: path.to_string(),
            source,
        })
    }

    /// Map an unsuccessful response to an error.
    async fn parse_error(response: reqwest::Response, path: &str) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| path.to_string());

        match status {
            401 | 403 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Status { status, message },
        }
    }
}

/// Extract a human-readable message from an error body.
///
/// Understands `{"error": ..}`, `{"detail": ..}`, `{"message": ..}` and
/// field validation maps such as `{"email": ["Enter a valid email."]}`.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    let object = value.as_object()?;
    for key in ["error", "detail", "message"] {
        if let Some(message) = object.get(key).and_then(serde_json::Value::as_str) {
            return Some(message.to_string());
        }
    }

    object.iter().find_map(|(field, value)| {
        let first = match value {
            serde_json::Value::Array(items) => items.first()?.as_str()?,
            serde_json::Value::String(s) => s.as_str(),
            _ => return None,
        };
        Some(format!("{field}: {first}"))
    })
}

// =============================================================================
// Service Traits
// =============================================================================

impl CatalogApi for BookstoreClient {
    async fn books_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.books(&BookQuery::by_ids(ids)).await
    }
}

impl OrderApi for BookstoreClient {
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.post("order/", order).await
    }
}

impl SliderApi for BookstoreClient {
    #[instrument(skip(self))]
    async fn list_sliders(&self) -> Result<Vec<Slider>, ApiError> {
        self.get("sliders/").await
    }

    #[instrument(skip(self))]
    async fn get_slider(&self, id: SliderId) -> Result<Slider, ApiError> {
        self.get(&format!("sliders/{id}/")).await
    }

    #[instrument(skip(self))]
    async fn create_slider(&self, title: &str) -> Result<Slider, ApiError> {
        self.post("sliders/", &CreateSlider { title }).await
    }

    #[instrument(skip(self))]
    async fn delete_slider(&self, id: SliderId) -> Result<(), ApiError> {
        self.send_unit::<()>(reqwest::Method::DELETE, &format!("sliders/{id}/"), None)
            .await
    }

    #[instrument(skip(self))]
    async fn add_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError> {
        self.send_unit(
            reqwest::Method::POST,
            &format!("sliders/{id}/add_image/"),
            Some(&ImageRequest { image_id: image }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove_slider_image(&self, id: SliderId, image: ImageId) -> Result<(), ApiError> {
        self.send_unit(
            reqwest::Method::POST,
            &format!("sliders/{id}/"),
            Some(&ImageRequest { image_id: image }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn update_image_position(
        &self,
        id: SliderId,
        image: ImageId,
        position: i64,
    ) -> Result<(), ApiError> {
        self.send_unit(
            reqwest::Method::PATCH,
            &format!("sliders/{id}/update_order/"),
            Some(&ImageOrderUpdate {
                image_id: image,
                new_order: position,
            }),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn set_default_slider(&self, id: SliderId) -> Result<(), ApiError> {
        self.post_empty(&format!("sliders/{id}/set_default/")).await
    }

    #[instrument(skip(self))]
    async fn list_images(&self) -> Result<Vec<GalleryImage>, ApiError> {
        self.get("images/").await
    }
}

//! Application state shared across commands.

use std::sync::Arc;

use crate::api::{ApiError, BookstoreClient};
use crate::config::StorefrontConfig;
use crate::services::{ActionGuard, CartService, SliderEditor};
use crate::storage::FileCartStorage;

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// API client, the persisted cart and the action guard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client: BookstoreClient,
    cart: CartService<FileCartStorage>,
    actions: ActionGuard,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let client = BookstoreClient::new(&config.api)?;
        let cart = CartService::new(FileCartStorage::new(config.cart_path()));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                cart,
                actions: ActionGuard::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the bookstore API client.
    #[must_use]
    pub fn client(&self) -> &BookstoreClient {
        &self.inner.client
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &CartService<FileCartStorage> {
        &self.inner.cart
    }

    /// Get a reference to the single-flight action guard.
    #[must_use]
    pub fn actions(&self) -> &ActionGuard {
        &self.inner.actions
    }

    /// Slider editor sharing this state's client and action guard.
    #[must_use]
    pub fn slider_editor(&self) -> SliderEditor<BookstoreClient> {
        SliderEditor::new(self.inner.client.clone(), self.inner.actions.clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

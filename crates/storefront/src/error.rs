//! Unified error handling with Sentry integration.
//!
//! Every storefront operation returns `Result<T, AppError>`. Front ends call
//! [`AppError::report`] once when an operation fails and show the caller
//! [`AppError::user_message`]; internal details never reach the user.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bookstore API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Reading or writing the persisted cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Caller input was rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced local resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The same action is already running.
    #[error("Already in progress: {0}")]
    Busy(String),

    /// The action was cancelled before it finished.
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl AppError {
    /// Whether this error indicates a failure on our side or upstream, as
    /// opposed to a problem with the caller's request.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Api(err) => matches!(
                err,
                ApiError::Http(_)
                    | ApiError::Malformed { .. }
                    | ApiError::Url(_)
                    | ApiError::Status { .. }
            ),
            Self::Storage(_) | Self::Config(_) => true,
            Self::Validation(_) | Self::NotFound(_) | Self::Busy(_) | Self::Cancelled(_) => false,
        }
    }

    /// Short text suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => match err {
                ApiError::Http(_) => "Could not reach the bookstore. Please try again.".to_string(),
                ApiError::Malformed { .. } | ApiError::Url(_) => {
                    "The bookstore sent an unexpected response.".to_string()
                }
                ApiError::NotFound(_) => "The requested item was not found.".to_string(),
                ApiError::Unauthorized(_) => {
                    "You are not allowed to do that. Check your API token.".to_string()
                }
                ApiError::Status { status, .. } if *status < 500 => {
                    "The bookstore rejected the request.".to_string()
                }
                ApiError::Status { .. } => "The bookstore is having trouble right now.".to_string(),
            },
            Self::Storage(_) => "Could not read or save your cart.".to_string(),
            Self::Config(err) => err.to_string(),
            Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Busy(_) => "That action is already in progress.".to_string(),
            Self::Cancelled(_) => "The action was cancelled.".to_string(),
        }
    }

    /// Log the error and capture internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
        } else {
            tracing::warn!(error = %self, "Operation rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added book", Some(&[("book_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

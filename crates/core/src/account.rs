//! User-facing account records: profile, themes, and notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ThemeId, UserId};

/// The signed-in user's profile.
///
/// Address fields are used to prefill checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_moderator: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Role flags of the signed-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_moderator: bool,
}

impl UserStatus {
    /// Admins and moderators see all orders and can moderate.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.is_admin || self.is_moderator
    }
}

/// A colour theme. Colours are opaque CSS values.
///
/// The default-theme endpoint omits `id` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub id: Option<ThemeId>,
    #[serde(default)]
    pub name: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
}

/// A notification about something that happened to the user's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvent {
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

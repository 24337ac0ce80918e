//! Slider administration: membership, positions and the default slider.
//!
//! Each edit is one independent API call. Nothing is batched or rolled
//! back; after a membership change the slider is fetched again, and if that
//! fetch fails the caller keeps its previous view.

use bookstore_core::slider::mark_default;
use bookstore_core::{GalleryImage, ImageId, Slider, SliderId};
use tracing::{info, instrument, warn};

use super::actions::{ActionGuard, ActionKey};
use crate::api::SliderApi;
use crate::error::{AppError, Result, add_breadcrumb};

/// What a membership toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Added,
    Removed,
}

/// Outcome of [`SliderEditor::toggle_membership`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub action: MembershipAction,
    /// The slider as fetched after the change; `None` if that fetch failed.
    pub refreshed: Option<Slider>,
}

/// Slider editing operations, each guarded against double submission.
#[derive(Debug, Clone)]
pub struct SliderEditor<A> {
    api: A,
    actions: ActionGuard,
}

impl<A: SliderApi> SliderEditor<A> {
    #[must_use]
    pub const fn new(api: A, actions: ActionGuard) -> Self {
        Self { api, actions }
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails.
    pub async fn sliders(&self) -> Result<Vec<Slider>> {
        Ok(self.api.list_sliders().await?)
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the slider does not exist.
    pub async fn slider(&self, id: SliderId) -> Result<Slider> {
        Ok(self.api.get_slider(id).await?)
    }

    /// Every uploaded image, for picking slider members.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails.
    pub async fn images(&self) -> Result<Vec<GalleryImage>> {
        Ok(self.api.list_images().await?)
    }

    /// Create an empty slider.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `title` is blank, or
    /// `AppError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn create(&self, title: &str) -> Result<Slider> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Slider title is required".to_string()));
        }

        let slider = self.api.create_slider(title).await?;
        info!(slider_id = %slider.id, "Slider created");
        Ok(slider)
    }

    /// Delete a slider.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` if the slider is already being edited, or
    /// `AppError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SliderId) -> Result<()> {
        self.actions
            .run(ActionKey::new("slider", id.as_i64()), async {
                self.api.delete_slider(id).await?;
                info!(slider_id = %id, "Slider deleted");
                Ok(())
            })
            .await
    }

    /// Add `image` to the slider if it is not a member, otherwise remove it.
    ///
    /// Membership is decided from `slider` as the caller last saw it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` if the same image is already being toggled,
    /// or `AppError::Api` if the add/remove request fails. A failed refresh
    /// is not an error; see [`MembershipChange::refreshed`].
    #[instrument(skip(self, slider), fields(slider_id = %slider.id))]
    pub async fn toggle_membership(
        &self,
        slider: &Slider,
        image: ImageId,
    ) -> Result<MembershipChange> {
        let id = slider.id;
        let key = ActionKey::scoped("slider-image", id.as_i64(), image.as_i64());

        self.actions
            .run(key, async {
                let action = if slider.is_member(image) {
                    self.api.remove_slider_image(id, image).await?;
                    MembershipAction::Removed
                } else {
                    self.api.add_slider_image(id, image).await?;
                    MembershipAction::Added
                };
                add_breadcrumb(
                    "slider",
                    "Toggled image",
                    Some(&[("slider_id", &id.to_string()), ("image_id", &image.to_string())]),
                );

                let refreshed = match self.api.get_slider(id).await {
                    Ok(slider) => Some(slider),
                    Err(e) => {
                        warn!(error = %e, "Failed to refresh slider after membership change");
                        None
                    }
                };

                Ok(MembershipChange { action, refreshed })
            })
            .await
    }

    /// Set the position hint of `image` within a slider.
    ///
    /// Positions are not checked for range or uniqueness; the last write wins.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` if the same image is already being updated,
    /// or `AppError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn set_position(&self, id: SliderId, image: ImageId, position: i64) -> Result<()> {
        let key = ActionKey::scoped("slider-image", id.as_i64(), image.as_i64());
        self.actions
            .run(key, async {
                Ok(self.api.update_image_position(id, image, position).await?)
            })
            .await
    }

    /// Make slider `id` the default and update `sliders` to match.
    ///
    /// `sliders` is only touched after the service accepts the change.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Busy` if a default change for `id` is in flight,
    /// or `AppError::Api` if the request fails.
    #[instrument(skip(self, sliders))]
    pub async fn select_default(&self, sliders: &mut [Slider], id: SliderId) -> Result<()> {
        self.actions
            .run(ActionKey::new("slider-default", id.as_i64()), async {
                Ok(self.api.set_default_slider(id).await?)
            })
            .await?;

        if !mark_default(sliders, id) {
            warn!(slider_id = %id, "Default slider is not in the local list");
        }
        info!(slider_id = %id, "Default slider selected");
        Ok(())
    }
}

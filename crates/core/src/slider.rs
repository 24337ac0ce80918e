//! Image carousels ("sliders") shown on the storefront home page.
//!
//! A slider is a named, ordered collection of gallery images. Membership is
//! changed one image at a time and positions are assigned one image at a
//! time; the API guarantees neither contiguous nor unique positions.

use serde::{Deserialize, Serialize};

use crate::types::{ImageId, SliderId};

/// An uploaded gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: ImageId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Image URL; relative to the API host for unauthenticated listings.
    pub image: String,
    /// Advisory position within a slider.
    #[serde(default, rename = "slider_order", skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

/// A carousel and its member images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slider {
    pub id: SliderId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub images: Vec<GalleryImage>,
}

impl Slider {
    /// Whether `image_id` is part of this slider.
    #[must_use]
    pub fn is_member(&self, image_id: ImageId) -> bool {
        self.images.iter().any(|image| image.id == image_id)
    }

    /// Title for display, falling back to the ID.
    #[must_use]
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Slider #{}", self.id))
    }

    /// Member images sorted by position hint.
    ///
    /// Images without a hint go last; ties keep the API's order.
    #[must_use]
    pub fn ordered_images(&self) -> Vec<&GalleryImage> {
        let mut images: Vec<&GalleryImage> = self.images.iter().collect();
        images.sort_by_key(|image| (image.position.is_none(), image.position));
        images
    }
}

/// Mark `id` as the default slider and clear the flag on every other one.
///
/// Returns `false`, leaving `sliders` untouched, if no slider has that ID.
pub fn mark_default(sliders: &mut [Slider], id: SliderId) -> bool {
    if !sliders.iter().any(|s| s.id == id) {
        return false;
    }

    for slider in sliders {
        slider.is_default = slider.id == id;
    }
    true
}

/// The default slider, if any is flagged.
#[must_use]
pub fn default_slider(sliders: &[Slider]) -> Option<&Slider> {
    sliders.iter().find(|s| s.is_default)
}

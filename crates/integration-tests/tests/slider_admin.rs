//! Integration tests for slider administration.
//!
//! Each test seeds the in-memory bookstore with images and sliders and
//! drives it through `SliderEditor`.

#![allow(clippy::unwrap_used)]

use bookstore_core::slider::default_slider;
use bookstore_core::{ImageId, SliderId};
use bookstore_integration_tests::FakeBookstore;
use bookstore_storefront::AppError;
use bookstore_storefront::services::{ActionGuard, MembershipAction, SliderEditor};

fn seeded() -> FakeBookstore {
    let api = FakeBookstore::new();
    for id in 1..=4 {
        api.insert_image(FakeBookstore::image(id));
    }
    api.insert_slider(1, "Homepage", &[1, 2], true);
    api.insert_slider(2, "Sale", &[], false);
    api
}

fn editor(api: &FakeBookstore) -> SliderEditor<&FakeBookstore> {
    SliderEditor::new(api, ActionGuard::new())
}

// =============================================================================
// Membership
// =============================================================================

#[tokio::test]
async fn test_toggle_adds_image_exactly_once() {
    let api = seeded();
    let editor = editor(&api);
    let slider = editor.slider(SliderId::new(1)).await.unwrap();

    let change = editor
        .toggle_membership(&slider, ImageId::new(3))
        .await
        .unwrap();

    assert_eq!(change.action, MembershipAction::Added);
    let refreshed = change.refreshed.unwrap();
    let ids: Vec<_> = refreshed.images.iter().map(|i| i.id.as_i64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_toggle_twice_restores_membership() {
    let api = seeded();
    let editor = editor(&api);
    let slider = editor.slider(SliderId::new(1)).await.unwrap();

    let added = editor
        .toggle_membership(&slider, ImageId::new(4))
        .await
        .unwrap()
        .refreshed
        .unwrap();
    assert!(added.is_member(ImageId::new(4)));

    let removed = editor
        .toggle_membership(&added, ImageId::new(4))
        .await
        .unwrap();
    assert_eq!(removed.action, MembershipAction::Removed);
    assert!(!removed.refreshed.unwrap().is_member(ImageId::new(4)));

    assert_eq!(api.calls(), vec!["add 1 4", "remove 1 4"]);
}

#[tokio::test]
async fn test_failed_add_is_reported_and_nothing_changes() {
    let api = seeded();
    api.fail("add_slider_image");
    let editor = editor(&api);
    let slider = editor.slider(SliderId::new(1)).await.unwrap();

    let err = editor
        .toggle_membership(&slider, ImageId::new(3))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Api(_)));
    assert!(!api.slider_snapshot(1).unwrap().is_member(ImageId::new(3)));
}

#[tokio::test]
async fn test_failed_refresh_still_applies_change() {
    let api = seeded();
    let editor = editor(&api);
    let slider = editor.slider(SliderId::new(1)).await.unwrap();

    api.fail("get_slider");
    let change = editor
        .toggle_membership(&slider, ImageId::new(3))
        .await
        .unwrap();

    assert_eq!(change.action, MembershipAction::Added);
    assert!(change.refreshed.is_none());
    assert!(api.slider_snapshot(1).unwrap().is_member(ImageId::new(3)));
}

// =============================================================================
// Positions
// =============================================================================

#[tokio::test]
async fn test_positions_are_point_updates_last_write_wins() {
    let api = seeded();
    let editor = editor(&api);
    let id = SliderId::new(1);

    editor.set_position(id, ImageId::new(2), 0).await.unwrap();
    editor.set_position(id, ImageId::new(1), 0).await.unwrap();
    editor.set_position(id, ImageId::new(2), 5).await.unwrap();

    let slider = editor.slider(id).await.unwrap();
    let order: Vec<_> = slider
        .ordered_images()
        .iter()
        .map(|i| (i.id.as_i64(), i.position))
        .collect();
    assert_eq!(order, vec![(1, Some(0)), (2, Some(5))]);
    assert_eq!(api.calls().len(), 3);
}

#[tokio::test]
async fn test_duplicate_positions_are_accepted() {
    let api = seeded();
    let editor = editor(&api);
    let id = SliderId::new(1);

    editor.set_position(id, ImageId::new(1), 3).await.unwrap();
    editor.set_position(id, ImageId::new(2), 3).await.unwrap();

    let slider = editor.slider(id).await.unwrap();
    assert!(slider.images.iter().all(|i| i.position == Some(3)));
}

// =============================================================================
// Default Slider & Lifecycle
// =============================================================================

#[tokio::test]
async fn test_select_default_moves_flag() {
    let api = seeded();
    let editor = editor(&api);
    let mut sliders = editor.sliders().await.unwrap();

    editor
        .select_default(&mut sliders, SliderId::new(2))
        .await
        .unwrap();

    assert_eq!(default_slider(&sliders).unwrap().id, SliderId::new(2));
    assert_eq!(sliders.iter().filter(|s| s.is_default).count(), 1);

    // Server agrees
    let remote = editor.sliders().await.unwrap();
    assert_eq!(default_slider(&remote).unwrap().id, SliderId::new(2));
}

#[tokio::test]
async fn test_failed_default_selection_keeps_local_flags() {
    let api = seeded();
    api.fail("set_default_slider");
    let editor = editor(&api);
    let mut sliders = editor.sliders().await.unwrap();

    let result = editor.select_default(&mut sliders, SliderId::new(2)).await;

    assert!(result.is_err());
    assert_eq!(default_slider(&sliders).unwrap().id, SliderId::new(1));
}

#[tokio::test]
async fn test_create_and_delete() {
    let api = seeded();
    let editor = editor(&api);

    let created = editor.create("Summer").await.unwrap();
    assert_eq!(created.id, SliderId::new(3));
    assert!(created.images.is_empty());

    editor.delete(created.id).await.unwrap();
    assert!(api.slider_snapshot(3).is_none());

    let err = editor.slider(created.id).await.unwrap_err();
    assert_eq!(err.user_message(), "The requested item was not found.");
}

#[tokio::test]
async fn test_images_lists_all_uploads() {
    let api = seeded();
    let images = editor(&api).images().await.unwrap();
    assert_eq!(images.len(), 4);
}

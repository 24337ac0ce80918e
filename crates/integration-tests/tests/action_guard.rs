//! Integration tests for single-flight slider edits.
//!
//! A position update is held in flight by locking the fake's gate; the
//! tests then submit competing actions from the same task via `join!`.

#![allow(clippy::unwrap_used)]

use bookstore_core::{ImageId, SliderId};
use bookstore_integration_tests::FakeBookstore;
use bookstore_storefront::AppError;
use bookstore_storefront::services::{ActionGuard, ActionKey, SliderEditor};

const SLIDER: SliderId = SliderId::new(1);
const IMAGE: ImageId = ImageId::new(2);

fn seeded() -> FakeBookstore {
    let api = FakeBookstore::new();
    for id in 1..=3 {
        api.insert_image(FakeBookstore::image(id));
    }
    api.insert_slider(1, "Homepage", &[1, 2], true);
    api
}

fn position_key() -> ActionKey {
    ActionKey::scoped("slider-image", SLIDER.as_i64(), IMAGE.as_i64())
}

async fn wait_in_flight(guard: &ActionGuard, key: ActionKey) {
    while !guard.is_in_flight(key) {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_double_submission_is_rejected() {
    let api = seeded();
    let guard = ActionGuard::new();
    let editor = SliderEditor::new(&api, guard.clone());

    let gate = api.gate.lock().await;
    let first = editor.set_position(SLIDER, IMAGE, 7);
    let second = async {
        wait_in_flight(&guard, position_key()).await;
        let result = editor.set_position(SLIDER, IMAGE, 9).await;
        drop(gate);
        result
    };

    let (first, second) = tokio::join!(first, second);

    first.unwrap();
    assert!(matches!(second, Err(AppError::Busy(_))));
    assert_eq!(api.calls(), vec!["position 1 2 7"]);
    assert!(!guard.is_in_flight(position_key()));
}

#[tokio::test]
async fn test_other_keys_proceed_while_one_is_in_flight() {
    let api = seeded();
    let guard = ActionGuard::new();
    let editor = SliderEditor::new(&api, guard.clone());
    let slider = editor.slider(SLIDER).await.unwrap();

    let gate = api.gate.lock().await;
    let first = editor.set_position(SLIDER, IMAGE, 1);
    let second = async {
        wait_in_flight(&guard, position_key()).await;
        let result = editor.toggle_membership(&slider, ImageId::new(3)).await;
        drop(gate);
        result
    };

    let (first, second) = tokio::join!(first, second);

    first.unwrap();
    assert!(second.unwrap().refreshed.unwrap().is_member(ImageId::new(3)));
}

#[tokio::test]
async fn test_cancelled_action_frees_its_key() {
    let api = seeded();
    let guard = ActionGuard::new();
    let editor = SliderEditor::new(&api, guard.clone());

    let gate = api.gate.lock().await;
    let first = editor.set_position(SLIDER, IMAGE, 4);
    let canceller = async {
        wait_in_flight(&guard, position_key()).await;
        assert!(guard.cancel(position_key()));
    };

    let (first, ()) = tokio::join!(first, canceller);
    drop(gate);

    assert!(matches!(first, Err(AppError::Cancelled(_))));
    assert!(api.calls().is_empty());
    assert!(!guard.is_in_flight(position_key()));

    // The key can be used again
    editor.set_position(SLIDER, IMAGE, 4).await.unwrap();
    assert_eq!(api.calls(), vec!["position 1 2 4"]);
}

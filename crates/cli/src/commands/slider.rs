//! Slider administration commands.

#![allow(clippy::print_stdout)]

use bookstore_core::slider::default_slider;
use bookstore_core::{GalleryImage, ImageId, Slider, SliderId};
use bookstore_storefront::services::MembershipAction;
use bookstore_storefront::{AppState, Result};

fn print_image_line(image: &GalleryImage) {
    let position = image
        .position
        .map_or_else(|| "-".to_string(), |p| p.to_string());
    println!("{:>5}  [{position:>3}]  {}  {}", image.id, image.title, image.image);
}

fn print_slider(slider: &Slider) {
    let marker = if slider.is_default { " (default)" } else { "" };
    println!("#{} {}{marker}", slider.id, slider.display_title());
    for image in slider.ordered_images() {
        print_image_line(image);
    }
}

pub async fn list(state: &AppState) -> Result<()> {
    let sliders = state.slider_editor().sliders().await?;
    if sliders.is_empty() {
        println!("No sliders.");
        return Ok(());
    }

    for slider in &sliders {
        let marker = if slider.is_default { "*" } else { " " };
        println!(
            "{marker} {:>4}  {}  ({} images)",
            slider.id,
            slider.display_title(),
            slider.images.len()
        );
    }
    if default_slider(&sliders).is_none() {
        println!("No default slider is set.");
    }
    Ok(())
}

pub async fn show(state: &AppState, id: SliderId) -> Result<()> {
    print_slider(&state.slider_editor().slider(id).await?);
    Ok(())
}

pub async fn list_images(state: &AppState) -> Result<()> {
    for image in state.slider_editor().images().await? {
        print_image_line(&image);
    }
    Ok(())
}

pub async fn create(state: &AppState, title: &str) -> Result<()> {
    let slider = state.slider_editor().create(title).await?;
    println!("Created slider #{} {}.", slider.id, slider.display_title());
    Ok(())
}

pub async fn delete(state: &AppState, id: SliderId) -> Result<()> {
    state.slider_editor().delete(id).await?;
    println!("Deleted slider #{id}.");
    Ok(())
}

pub async fn toggle(state: &AppState, id: SliderId, image: ImageId) -> Result<()> {
    let editor = state.slider_editor();
    let slider = editor.slider(id).await?;
    let change = editor.toggle_membership(&slider, image).await?;

    match change.action {
        MembershipAction::Added => println!("Added image {image} to slider #{id}."),
        MembershipAction::Removed => println!("Removed image {image} from slider #{id}."),
    }
    match change.refreshed {
        Some(slider) => print_slider(&slider),
        None => println!("Could not reload the slider; run `bookstore slider show {id}`."),
    }
    Ok(())
}

pub async fn set_position(
    state: &AppState,
    id: SliderId,
    image: ImageId,
    position: i64,
) -> Result<()> {
    state.slider_editor().set_position(id, image, position).await?;
    println!("Image {image} in slider #{id} moved to position {position}.");
    Ok(())
}

pub async fn select_default(state: &AppState, id: SliderId) -> Result<()> {
    let editor = state.slider_editor();
    let mut sliders = editor.sliders().await?;
    editor.select_default(&mut sliders, id).await?;

    if let Some(slider) = default_slider(&sliders) {
        println!("Slider #{} {} is now the default.", slider.id, slider.display_title());
    }
    Ok(())
}

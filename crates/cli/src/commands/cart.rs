//! Cart and checkout commands.

#![allow(clippy::print_stdout)]

use bookstore_core::{BookId, Cart};
use bookstore_storefront::services::CheckoutForm;
use bookstore_storefront::{AppState, Result};
use tracing::debug;

use super::money;
use crate::CheckoutArgs;

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for entry in cart.entries() {
        println!(
            "{:>5}  {} x{}  {}",
            entry.book.id,
            entry.book.display_title(),
            entry.quantity,
            money(entry.line_total())
        );
    }
    println!("Total: {}", money(cart.total()));
}

pub async fn show(state: &AppState) -> Result<()> {
    print_cart(&state.cart().cart().await?);
    Ok(())
}

pub async fn add(state: &AppState, id: BookId) -> Result<()> {
    let book = state.client().book(id).await?;
    let title = book.display_title().to_string();

    let cart = state.cart().add_item(book).await?;
    let quantity = cart.get(id).map_or(0, |e| e.quantity);
    println!("Added \"{title}\" (now {quantity} in cart).");
    Ok(())
}

pub async fn set_quantity(state: &AppState, id: BookId, quantity: u32) -> Result<()> {
    print_cart(&state.cart().set_quantity(id, quantity).await?);
    Ok(())
}

pub async fn remove(state: &AppState, id: BookId) -> Result<()> {
    print_cart(&state.cart().remove_item(id).await?);
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<()> {
    state.cart().clear().await?;
    println!("Cart cleared.");
    Ok(())
}

pub async fn refresh(state: &AppState) -> Result<()> {
    let refresh = state.cart().refresh(state.client()).await?;
    print_cart(&refresh.cart);
    for id in refresh.stale {
        println!("Book {id} is no longer available.");
    }
    Ok(())
}

pub async fn checkout(state: &AppState, args: CheckoutArgs) -> Result<()> {
    let mut form = match state.client().profile().await {
        Ok(profile) => CheckoutForm::from_profile(&profile),
        Err(e) => {
            debug!(error = %e, "Profile unavailable, starting with a blank form");
            CheckoutForm::default()
        }
    };
    apply_args(&mut form, args);

    let order = state.cart().place_order(state.client(), &form).await?;
    println!(
        "Order #{} placed ({}), total {}.",
        order.id,
        order.status,
        money(Some(order.total_price))
    );
    Ok(())
}

/// Override profile values with those given on the command line.
fn apply_args(form: &mut CheckoutForm, args: CheckoutArgs) {
    let overrides = [
        (&mut form.first_name, args.first_name),
        (&mut form.last_name, args.last_name),
        (&mut form.email, args.email),
        (&mut form.shipping_address, args.address),
        (&mut form.city, args.city),
        (&mut form.postal_code, args.postal_code),
        (&mut form.phone_number, args.phone),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }
}

//! Order history commands.

#![allow(clippy::print_stdout)]

use bookstore_core::{Order, OrderId, OrderStatus};
use bookstore_storefront::{AppState, Result};

use super::money;

fn print_order_line(order: &Order) {
    println!(
        "#{:<5} {}  {:<10} {}{}",
        order.id,
        order.created_at.format("%Y-%m-%d"),
        order.status.as_str(),
        money(Some(order.total_price)),
        order
            .username
            .as_deref()
            .map(|u| format!("  ({u})"))
            .unwrap_or_default()
    );
}

pub async fn list(state: &AppState) -> Result<()> {
    let orders = state.client().orders().await?;
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    for order in &orders {
        print_order_line(order);
    }
    Ok(())
}

pub async fn show(state: &AppState, id: OrderId) -> Result<()> {
    let order = state.client().order(id).await?;

    print_order_line(&order);
    println!("  Ship to: {}", order.shipping_address);
    println!("  Updated: {}", order.updated_at.format("%Y-%m-%d %H:%M"));
    for item in &order.items {
        println!(
            "  {} x{}  {}",
            item.book_title,
            item.quantity,
            money(Some(item.total_price))
        );
    }
    Ok(())
}

pub async fn update_status(state: &AppState, id: OrderId, status: OrderStatus) -> Result<()> {
    state.client().update_order_status(id, status).await?;
    println!("Order #{id} is now {status}.");
    Ok(())
}

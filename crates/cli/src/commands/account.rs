//! Profile, notification and theme commands.

#![allow(clippy::print_stdout)]

use bookstore_core::{Theme, ThemeId};
use bookstore_storefront::{AppState, Result};

fn print_theme(theme: &Theme) {
    let label = match (theme.id, theme.name.as_deref()) {
        (Some(id), Some(name)) => format!("{id:>3}  {name}"),
        (Some(id), None) => format!("{id:>3}  (unnamed)"),
        (None, Some(name)) => name.to_string(),
        (None, None) => "(default)".to_string(),
    };
    println!(
        "{label}  primary {}  secondary {}  accent {}",
        theme.primary_color, theme.secondary_color, theme.accent_color
    );
}

pub async fn profile(state: &AppState) -> Result<()> {
    let profile = state.client().profile().await?;
    let status = state.client().user_status().await?;

    println!("{}", profile.username);
    let fields = [
        ("First name", &profile.first_name),
        ("Last name", &profile.last_name),
        ("Email", &profile.email),
        ("Address", &profile.address),
        ("City", &profile.city),
        ("Postal code", &profile.postal_code),
        ("Phone", &profile.phone_number),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label:<12} {value}");
        }
    }

    let mut roles = Vec::new();
    if status.is_admin {
        roles.push("admin");
    }
    if status.is_moderator {
        roles.push("moderator");
    }
    if !roles.is_empty() {
        println!("  {:<12} {}", "Roles", roles.join(", "));
    }
    Ok(())
}

pub async fn events(state: &AppState) -> Result<()> {
    let events = state.client().events().await?;
    if events.is_empty() {
        println!("No notifications.");
        return Ok(());
    }
    for event in events {
        println!(
            "{}  [{}] {}",
            event.created_at.format("%Y-%m-%d %H:%M"),
            event.action,
            event.description
        );
    }
    Ok(())
}

pub async fn list_themes(state: &AppState) -> Result<()> {
    for theme in state.client().themes().await? {
        print_theme(&theme);
    }
    Ok(())
}

pub async fn default_theme(state: &AppState) -> Result<()> {
    print_theme(&state.client().default_theme().await?);
    Ok(())
}

pub async fn selected_theme(state: &AppState) -> Result<()> {
    print_theme(&state.client().selected_theme().await?);
    Ok(())
}

pub async fn select_theme(state: &AppState, id: ThemeId) -> Result<()> {
    state.client().select_theme(id).await?;
    println!("Theme {id} selected.");
    Ok(())
}

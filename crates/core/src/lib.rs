//! Bookstore Core - Shared types and client-side domain logic.
//!
//! This crate provides the types used across all bookstore components:
//! - `storefront` - API client, cart persistence and admin services
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no storage. The cart and slider rules live here so they can be
//! tested without a running API service.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`catalog`] - Books, categories, and comments
//! - [`cart`] - The client-side cart and its merge/total rules
//! - [`slider`] - Image carousels and their membership rules
//! - [`order`] - Orders and order submission lines
//! - [`account`] - User profile, themes, and notifications

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod slider;
pub mod types;

pub use account::{Theme, UserEvent, UserProfile, UserStatus};
pub use cart::{Cart, CartEntry};
pub use catalog::{Book, Category, Comment};
pub use order::{Order, OrderItem, OrderLine};
pub use slider::{GalleryImage, Slider};
pub use types::*;

//! Bookstore Storefront library.
//!
//! Typed client and orchestration layer over the bookstore REST API:
//! catalog browsing, the persisted client-side cart, checkout, order
//! history, account pages, comment moderation and slider administration.
//!
//! # Architecture
//!
//! - [`api`] - `reqwest` client for the REST service plus the traits the
//!   services are generic over
//! - [`storage`] - Persistence for the cart document
//! - [`services`] - Cart, checkout, slider editing and the single-flight
//!   action guard
//! - [`state`] - Shared handles wired from [`config`]
//!
//! Everything except the cart lives in the remote service; nothing here
//! caches API responses.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{AppError, Result};
pub use state::AppState;

//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - The persisted cart: add, set quantity, remove, refresh
//! - `checkout` - Form validation and order submission
//! - `slider` - Slider membership, positions and default selection
//! - `actions` - Single-flight guard for mutating actions

pub mod actions;
pub mod cart;
pub mod checkout;
pub mod slider;

pub use actions::{ActionGuard, ActionKey};
pub use cart::{CartRefresh, CartService};
pub use checkout::CheckoutForm;
pub use slider::{MembershipAction, MembershipChange, SliderEditor};

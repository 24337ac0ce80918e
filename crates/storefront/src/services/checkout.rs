//! Checkout: turn the cart and a contact form into an order.

use bookstore_core::{Cart, Email, Order, UserProfile};
use tracing::{info, instrument};

use super::cart::CartService;
use crate::api::{NewOrder, OrderApi};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::storage::CartStorage;

/// Contact and shipping details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub shipping_address: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
}

impl CheckoutForm {
    /// Form prefilled from the user's profile; absent fields start blank.
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            first_name: field(&profile.first_name),
            last_name: field(&profile.last_name),
            email: field(&profile.email),
            shipping_address: field(&profile.address),
            city: field(&profile.city),
            postal_code: field(&profile.postal_code),
            phone_number: field(&profile.phone_number),
        }
    }

    /// Build the order payload for `cart`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first blank field, if the
    /// email is malformed, if the cart is empty, or if an entry has a
    /// quantity of zero.
    pub fn to_order(&self, cart: &Cart) -> Result<NewOrder> {
        let fields = [
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Email", &self.email),
            ("Shipping address", &self.shipping_address),
            ("City", &self.city),
            ("Postal code", &self.postal_code),
            ("Phone number", &self.phone_number),
        ];
        if let Some((label, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::Validation(format!("{label} is required")));
        }

        let email = Email::parse(&self.email)
            .map_err(|e| AppError::Validation(format!("Invalid email: {e}")))?;

        if cart.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_string()));
        }
        if let Some(entry) = cart.entries().iter().find(|e| e.quantity == 0) {
            return Err(AppError::Validation(format!(
                "Quantity of \"{}\" must be at least 1",
                entry.book.display_title()
            )));
        }

        Ok(NewOrder {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            shipping_address: self.shipping_address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            items: cart.order_lines(),
        })
    }
}

impl<S: CartStorage> CartService<S> {
    /// Submit the cart as an order.
    ///
    /// The cart lock is held for the whole submission, so the cart cannot
    /// change between validation and clearing. The stored cart is cleared
    /// only after the service accepts the order; on any failure it is kept.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the form or cart is invalid (no
    /// request is sent), `AppError::Api` if the service rejects the order,
    /// or `AppError::Storage` if the cart cannot be read.
    #[instrument(skip(self, api, form))]
    pub async fn place_order<O: OrderApi>(&self, api: &O, form: &CheckoutForm) -> Result<Order> {
        let _guard = self.lock.lock().await;

        let cart = self.storage.load().await?;
        let new_order = form.to_order(&cart)?;
        let order = api.create_order(&new_order).await?;

        // The order exists upstream; a leftover cart is only an annoyance
        if let Err(e) = self.storage.clear().await {
            AppError::from(e).report();
        }

        info!(
            order_id = %order.id,
            total = %order.total_price,
            items = new_order.items.len(),
            "Order placed"
        );
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", &order.id.to_string())]),
        );

        Ok(order)
    }
}

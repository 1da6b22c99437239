//! Order hand-off
//!
//! Checkout never takes payment. It renders the order as a plain-text
//! message and wraps it in a messaging deep link for the shop to confirm.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::aggregates::cart::{CartEngine, OrderSummary};
use crate::domain::value_objects::{format_naira, ContactError, ContactNumber, CustomerDetails, CustomerField};

pub const DEEP_LINK_BASE: &str = "https://wa.me";
const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Render the order message. Callers must have checked that the customer
/// fields are complete and the order has at least one line.
pub fn format_order_message(store_name: &str, customer: &CustomerDetails, summary: &OrderSummary, placed_at: NaiveDateTime) -> String {
    let mut m = String::new();
    let _ = writeln!(m, "*NEW ORDER FROM {}*", store_name.to_uppercase());
    let _ = writeln!(m, "{RULE}\n");
    let _ = writeln!(m, "*Customer Details:*");
    let _ = writeln!(m, "Name: {}", customer.name);
    let _ = writeln!(m, "Phone: {}", customer.phone);
    let _ = writeln!(m, "Address: {}\n", customer.address);
    let _ = writeln!(m, "*Order Items:*");
    for line in &summary.line_items {
        let _ = writeln!(m, "• {}", line.name);
        let _ = writeln!(
            m,
            "  Qty: {} × ₦{} = ₦{}",
            line.quantity,
            format_naira(line.unit_price),
            format_naira(line.line_total())
        );
    }
    let _ = writeln!(m, "\n{RULE}");
    let _ = writeln!(m, "*Order Summary:*");
    let _ = writeln!(m, "Subtotal: ₦{}", format_naira(summary.subtotal));
    // Label is fixed at 10% while the computed tax is zero.
    let _ = writeln!(m, "Tax (10%): ₦{}", format_naira(summary.tax));
    let _ = writeln!(m, "*Total: ₦{}*", format_naira(summary.total));
    let _ = writeln!(m, "{RULE}");
    let _ = write!(m, "\n⏰ Order Date: {}", placed_at.format("%-m/%-d/%Y, %-I:%M:%S %p"));
    m
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutLink {
    pub message: String,
    pub url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Please enter your {0}")]
    MissingCustomerField(CustomerField),

    #[error("Please add items to your order")]
    EmptyOrder,

    #[error("Contact number not configured: {0}")]
    ContactNotConfigured(#[from] ContactError),
}

/// Checkout settings for one shop.
#[derive(Clone, Debug)]
pub struct Checkout {
    store_name: String,
    contact_number: String,
}

impl Checkout {
    pub fn new(store_name: impl Into<String>, contact_number: impl Into<String>) -> Self {
        Self { store_name: store_name.into(), contact_number: contact_number.into() }
    }

    /// Validate the cart and build the deep link. Does not touch the cart.
    pub fn prepare(&self, cart: &CartEngine, placed_at: NaiveDateTime) -> Result<CheckoutLink, CheckoutError> {
        let customer = cart.customer().trimmed();
        if let Some(field) = customer.missing_field() {
            return Err(CheckoutError::MissingCustomerField(field));
        }
        let summary = cart.summary();
        if summary.is_empty() { return Err(CheckoutError::EmptyOrder); }
        let contact = ContactNumber::new(self.contact_number.as_str())?;

        let message = format_order_message(&self.store_name, &customer, &summary, placed_at);
        let url = format!("{DEEP_LINK_BASE}/{}?text={}", contact, urlencoding::encode(&message));
        Ok(CheckoutLink { message, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Product;
    use chrono::NaiveDate;

    fn placed_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap().and_hms_opt(14, 5, 30).unwrap()
    }

    fn cart() -> CartEngine {
        let mut cart = CartEngine::new(vec![
            Product { id: 1, name: "Rug".into(), description: "Wool".into(), price: 1000, image: "rug.jpg".into() },
            Product { id: 2, name: "Lamp".into(), description: "Brass".into(), price: 2500, image: "lamp.jpg".into() },
        ]);
        cart.increase(1);
        cart.increase(1);
        cart.increase(2);
        cart.set_customer(CustomerDetails::new(" Ada ", "08012345678", "12 Admiralty Way"));
        cart
    }

    #[test]
    fn test_message_layout() {
        let cart = cart();
        let message = format_order_message("Luxe Home", &cart.customer().trimmed(), &cart.summary(), placed_at());
        let expected = "*NEW ORDER FROM LUXE HOME*\n\
            ━━━━━━━━━━━━━━━━━━━━\n\n\
            *Customer Details:*\n\
            Name: Ada\n\
            Phone: 08012345678\n\
            Address: 12 Admiralty Way\n\n\
            *Order Items:*\n\
            • Rug\n  Qty: 2 × ₦1,000 = ₦2,000\n\
            • Lamp\n  Qty: 1 × ₦2,500 = ₦2,500\n\
            \n━━━━━━━━━━━━━━━━━━━━\n\
            *Order Summary:*\n\
            Subtotal: ₦4,500\n\
            Tax (10%): ₦0\n\
            *Total: ₦4,500*\n\
            ━━━━━━━━━━━━━━━━━━━━\n\
            \n⏰ Order Date: 3/9/2025, 2:05:30 PM";
        assert_eq!(message, expected);
    }

    #[test]
    fn test_prepare_builds_deep_link() {
        let link = Checkout::new("Luxe Home", "09057539937").prepare(&cart(), placed_at()).unwrap();
        assert!(link.url.starts_with("https://wa.me/09057539937?text=%2ANEW%20ORDER"));
        assert!(!link.url.contains('\n'));
        assert_eq!(urlencoding::decode(link.url.split("text=").nth(1).unwrap()).unwrap(), link.message);
    }

    #[test]
    fn test_prepare_validation_order() {
        let checkout = Checkout::new("Shop", "09057539937");
        let mut partial = cart();
        partial.set_customer(CustomerDetails::new("Ada", "  ", ""));
        assert_eq!(checkout.prepare(&partial, placed_at()), Err(CheckoutError::MissingCustomerField(CustomerField::Phone)));

        let mut empty = CartEngine::new(vec![]);
        empty.set_customer(CustomerDetails::new("Ada", "080", "Ikeja"));
        assert_eq!(checkout.prepare(&empty, placed_at()), Err(CheckoutError::EmptyOrder));

        let short = Checkout::new("Shop", "0905");
        assert_eq!(short.prepare(&cart(), placed_at()), Err(CheckoutError::ContactNotConfigured(ContactError::TooShort)));
    }
}

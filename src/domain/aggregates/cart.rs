//! Cart Aggregate
//!
//! The cart holds the fetched catalog with a per-product order quantity and
//! the customer's contact fields. Totals are derived on every call to
//! [`CartEngine::summary`]; nothing derived is stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::events::CartEvent;
use crate::domain::value_objects::{CustomerDetails, Quantity};
use crate::Product;

#[derive(Clone, Debug)]
struct CartEntry {
    product: Product,
    quantity: Quantity,
}

/// A product with quantity > 0 in the current order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: u64,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
}

impl CartLine {
    pub fn line_total(&self) -> u64 { self.unit_price.saturating_mul(u64::from(self.quantity)) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderSummary {
    pub line_items: Vec<CartLine>,
    pub subtotal: u64,
    pub tax: u64,
    pub total: u64,
}

impl OrderSummary {
    pub fn is_empty(&self) -> bool { self.line_items.is_empty() }
}

/// Serializable snapshot of the order, as mirrored into the local cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderState {
    #[serde(default)]
    pub line_items: BTreeMap<u64, u32>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_address: String,
}

impl OrderState {
    pub fn customer(&self) -> CustomerDetails {
        CustomerDetails::new(&self.customer_name, &self.customer_phone, &self.customer_address)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CartEngine {
    entries: Vec<CartEntry>,
    customer: CustomerDetails,
}

impl CartEngine {
    pub fn new(products: Vec<Product>) -> Self {
        let mut cart = Self::default();
        cart.replace_catalog(products);
        cart
    }

    /// Swap in a freshly loaded catalog; every quantity starts at zero.
    pub fn replace_catalog(&mut self, products: Vec<Product>) {
        self.entries = products.into_iter().map(|product| CartEntry { product, quantity: Quantity::ZERO }).collect();
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> { self.entries.iter().map(|e| &e.product) }
    pub fn customer(&self) -> &CustomerDetails { &self.customer }
    pub fn set_customer(&mut self, customer: CustomerDetails) { self.customer = customer; }

    pub fn quantity(&self, product_id: u64) -> u32 {
        self.entries.iter().find(|e| e.product.id == product_id).map_or(0, |e| e.quantity.value())
    }

    /// Apply one event; returns whether any state changed.
    /// Events naming a product outside the catalog are ignored.
    pub fn apply(&mut self, event: CartEvent) -> bool {
        match event {
            CartEvent::Increase(id) => self.update_quantity(id, Quantity::increment),
            CartEvent::Decrease(id) => self.update_quantity(id, Quantity::decrement),
            CartEvent::Remove(id) => self.update_quantity(id, |_| Quantity::ZERO),
            CartEvent::Clear => {
                let changed = !self.customer.is_empty() || self.entries.iter().any(|e| !e.quantity.is_zero());
                self.entries.iter_mut().for_each(|e| e.quantity = Quantity::ZERO);
                self.customer = CustomerDetails::default();
                changed
            }
        }
    }

    pub fn increase(&mut self, product_id: u64) -> bool { self.apply(CartEvent::Increase(product_id)) }
    pub fn decrease(&mut self, product_id: u64) -> bool { self.apply(CartEvent::Decrease(product_id)) }
    pub fn remove(&mut self, product_id: u64) -> bool { self.apply(CartEvent::Remove(product_id)) }
    pub fn clear(&mut self) -> bool { self.apply(CartEvent::Clear) }

    fn update_quantity(&mut self, product_id: u64, f: impl FnOnce(Quantity) -> Quantity) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.product.id == product_id) else {
            tracing::debug!(product_id, "cart event for unknown product ignored");
            return false;
        };
        let next = f(entry.quantity);
        let changed = next != entry.quantity;
        entry.quantity = next;
        changed
    }

    pub fn summary(&self) -> OrderSummary {
        let line_items: Vec<CartLine> = self.entries.iter()
            .filter(|e| !e.quantity.is_zero())
            .map(|e| CartLine { product_id: e.product.id, name: e.product.name.clone(), quantity: e.quantity.value(), unit_price: e.product.price })
            .collect();
        let subtotal = line_items.iter().fold(0u64, |acc, l| acc.saturating_add(l.line_total()));
        // Tax collection is switched off; the order message still prints a "Tax (10%)" label.
        let tax = 0;
        OrderSummary { line_items, subtotal, tax, total: subtotal + tax }
    }

    pub fn order_state(&self) -> OrderState {
        OrderState {
            line_items: self.entries.iter()
                .filter(|e| !e.quantity.is_zero())
                .map(|e| (e.product.id, e.quantity.value()))
                .collect(),
            customer_name: self.customer.name.clone(),
            customer_phone: self.customer.phone.clone(),
            customer_address: self.customer.address.clone(),
        }
    }

    /// Overlay a cached order onto the current catalog. Products missing from
    /// the cache go to zero; cached ids missing from the catalog are dropped.
    /// Returns how many cached lines were applied.
    pub fn restore(&mut self, state: &OrderState) -> usize {
        let mut applied = 0;
        for entry in &mut self.entries {
            entry.quantity = match state.line_items.get(&entry.product.id) {
                Some(&qty) => { applied += 1; Quantity::new(qty) }
                None => Quantity::ZERO,
            };
        }
        let dropped = state.line_items.len().saturating_sub(applied);
        if dropped > 0 {
            tracing::debug!(dropped, "cached order lines not in catalog were dropped");
        }
        self.customer = state.customer();
        applied
    }
}

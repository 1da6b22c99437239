//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum length of a usable messaging contact number.
pub const MIN_CONTACT_LEN: usize = 10;

/// Contact number the order message is delivered to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactNumber(String);

impl ContactNumber {
    pub fn new(value: impl Into<String>) -> Result<Self, ContactError> {
        let value = value.into().trim().to_string();
        if value.is_empty() { return Err(ContactError::Missing); }
        if value.chars().count() < MIN_CONTACT_LEN { return Err(ContactError::TooShort); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ContactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ContactError { Missing, TooShort }
impl std::error::Error for ContactError {}
impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Missing => write!(f, "contact number missing"), Self::TooShort => write!(f, "contact number too short") }
    }
}

/// Order quantity; decrement floors at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn increment(self) -> Self { Self(self.0.saturating_add(1)) }
    pub fn decrement(self) -> Self { Self(self.0.saturating_sub(1)) }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}

/// Customer contact fields captured at checkout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl CustomerDetails {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, address: impl Into<String>) -> Self {
        Self { name: name.into(), phone: phone.into(), address: address.into() }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.phone.trim(), self.address.trim())
    }

    /// First missing field, checked in name, phone, address order.
    pub fn missing_field(&self) -> Option<CustomerField> {
        if self.name.trim().is_empty() { return Some(CustomerField::Name); }
        if self.phone.trim().is_empty() { return Some(CustomerField::Phone); }
        if self.address.trim().is_empty() { return Some(CustomerField::Address); }
        None
    }

    pub fn is_complete(&self) -> bool { self.missing_field().is_none() }
    pub fn is_empty(&self) -> bool { self.name.is_empty() && self.phone.is_empty() && self.address.is_empty() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField { Name, Phone, Address }

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Name => write!(f, "name"), Self::Phone => write!(f, "phone number"), Self::Address => write!(f, "delivery address") }
    }
}

/// Naira amount with thousands grouping, e.g. `4500` -> `4,500`.
pub fn format_naira(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push(','); }
        out.push(ch);
    }
    out
}

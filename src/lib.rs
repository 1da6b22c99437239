//! OpenSASE Storefront
//!
//! Small self-hosted shop: a JSON-file catalog behind a REST API, and a
//! cart engine that turns a customer's selection into a messaging deep link.
//!
//! ## Features
//! - Product and blog catalog with admin CRUD
//! - Cart quantities, totals and order message formatting
//! - Write-through local cache with offline catalog fallback

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod store;

// =============================================================================
// Core Types
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<BlogLink>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogLink {
    pub title: String,
    pub url: String,
}

/// The whole persisted catalog. Ids are unique within each collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub blogs: Vec<BlogPost>,
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

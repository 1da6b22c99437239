//! Local cache of cart state and the last fetched catalog.
//!
//! Storage is a flat string key/value store, like browser local storage.
//! Entries that no longer parse are treated as absent.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::domain::aggregates::OrderState;
use crate::{BlogPost, Product};

pub const ORDER_KEY: &str = "order";
pub const PRODUCTS_KEY: &str = "products";
pub const BLOGS_KEY: &str = "blogs";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait CacheStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }
}

impl CacheStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> { self.entries.get(key).cloned() }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per entry under a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    fn path(&self, key: &str) -> PathBuf { self.dir.join(format!("{key}.json")) }
}

impl CacheStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> { std::fs::read_to_string(self.path(key)).ok() }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct LocalCache<S> {
    storage: S,
}

impl<S: CacheStorage> LocalCache<S> {
    pub fn new(storage: S) -> Self { Self { storage } }

    pub fn storage(&self) -> &S { &self.storage }
    pub fn into_storage(self) -> S { self.storage }

    pub fn save_order(&mut self, state: &OrderState) -> Result<(), CacheError> {
        self.write(ORDER_KEY, state)
    }

    pub fn restore_order(&self) -> Option<OrderState> {
        self.read(ORDER_KEY)
    }

    /// Snapshot of the last successfully fetched products.
    pub fn save_products(&mut self, products: &[Product]) -> Result<(), CacheError> {
        self.write(PRODUCTS_KEY, products)
    }

    pub fn save_blogs(&mut self, blogs: &[BlogPost]) -> Result<(), CacheError> {
        self.write(BLOGS_KEY, blogs)
    }

    pub fn cached_products(&self) -> Option<Vec<Product>> { self.read(PRODUCTS_KEY) }
    pub fn cached_blogs(&self) -> Option<Vec<BlogPost>> { self.read(BLOGS_KEY) }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        self.storage.set(key, &json)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| tracing::warn!(key, error = %e, "ignoring unreadable cache entry"))
            .ok()
    }
}

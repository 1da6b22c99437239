//! Storefront session: one cart, fed by the catalog API and mirrored into a
//! local cache after every change.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::config::{CacheFallback, ClientConfig};
use crate::domain::aggregates::{CartEngine, Checkout, CheckoutError, CheckoutLink, OrderSummary};
use crate::domain::events::CartEvent;
use crate::domain::value_objects::CustomerDetails;
use crate::BlogPost;

pub mod cache;
pub mod http;

pub use cache::{CacheError, CacheStorage, FileStorage, LocalCache, MemoryStorage};
pub use http::{encode_image, BlogForm, CatalogClient, ProductForm};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API base must be an absolute http(s) URL: {0}")]
    InvalidApiBase(String),

    #[error("Image must be less than 5MB (got {size} bytes)")]
    ImageTooLarge { size: u64 },
}

/// Where a collection came from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Network,
    Cache,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartReport {
    pub products: CatalogOrigin,
    pub blogs: CatalogOrigin,
    /// Cached order lines that matched the loaded catalog.
    pub restored_lines: usize,
}

pub struct Storefront<S> {
    config: ClientConfig,
    client: CatalogClient,
    cart: CartEngine,
    blogs: Vec<BlogPost>,
    cache: LocalCache<S>,
    checkout: Checkout,
}

impl<S: CacheStorage> Storefront<S> {
    pub fn new(config: ClientConfig, storage: S) -> Result<Self, ClientError> {
        let client = CatalogClient::new(config.api_base.clone())?;
        let checkout = Checkout::new(config.store_name.clone(), config.contact_number.clone());
        Ok(Self { config, client, cart: CartEngine::default(), blogs: vec![], cache: LocalCache::new(storage), checkout })
    }

    pub fn cart(&self) -> &CartEngine { &self.cart }
    pub fn blogs(&self) -> &[BlogPost] { &self.blogs }
    pub fn summary(&self) -> OrderSummary { self.cart.summary() }
    pub fn client(&self) -> &CatalogClient { &self.client }
    pub fn cache(&self) -> &LocalCache<S> { &self.cache }
    pub fn into_storage(self) -> S { self.cache.into_storage() }

    /// Load products and blogs, then overlay the cached order.
    pub async fn start(&mut self) -> StartReport {
        let (products, products_origin) = match self.client.fetch_products().await {
            Ok(products) => {
                if self.fallback_enabled() {
                    if let Err(e) = self.cache.save_products(&products) {
                        tracing::warn!(error = %e, "failed to cache products");
                    }
                }
                (products, CatalogOrigin::Network)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load products");
                self.fallback(self.cache.cached_products())
            }
        };
        let (blogs, blogs_origin) = match self.client.fetch_blogs().await {
            Ok(blogs) => {
                if self.fallback_enabled() {
                    if let Err(e) = self.cache.save_blogs(&blogs) {
                        tracing::warn!(error = %e, "failed to cache blogs");
                    }
                }
                (blogs, CatalogOrigin::Network)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load blogs");
                self.fallback(self.cache.cached_blogs())
            }
        };

        self.cart.replace_catalog(products);
        self.blogs = blogs;
        let restored_lines = match self.cache.restore_order() {
            Some(state) => self.cart.restore(&state),
            None => 0,
        };
        tracing::info!(?products_origin, ?blogs_origin, restored_lines, "storefront started");
        StartReport { products: products_origin, blogs: blogs_origin, restored_lines }
    }

    fn fallback_enabled(&self) -> bool {
        self.config.cache_fallback == CacheFallback::Enabled
    }

    fn fallback<T>(&self, cached: Option<Vec<T>>) -> (Vec<T>, CatalogOrigin) {
        match cached {
            Some(items) if self.fallback_enabled() => {
                tracing::info!("loaded from cache");
                (items, CatalogOrigin::Cache)
            }
            _ => (vec![], CatalogOrigin::Empty),
        }
    }

    /// Apply a cart event and write the order through to the cache.
    pub fn dispatch(&mut self, event: CartEvent) -> bool {
        let changed = self.cart.apply(event);
        self.persist();
        changed
    }

    pub fn increase(&mut self, product_id: u64) -> bool { self.dispatch(CartEvent::Increase(product_id)) }
    pub fn decrease(&mut self, product_id: u64) -> bool { self.dispatch(CartEvent::Decrease(product_id)) }
    pub fn remove(&mut self, product_id: u64) -> bool { self.dispatch(CartEvent::Remove(product_id)) }
    pub fn clear(&mut self) -> bool { self.dispatch(CartEvent::Clear) }

    pub fn set_customer(&mut self, customer: CustomerDetails) {
        self.cart.set_customer(customer);
        self.persist();
    }

    /// Build the deep link for the current order and clear the cart.
    /// On failure the cart is left as it was.
    pub fn checkout(&mut self, placed_at: NaiveDateTime) -> Result<CheckoutLink, CheckoutError> {
        let link = self.checkout.prepare(&self.cart, placed_at)?;
        self.clear();
        tracing::info!("order handed off");
        Ok(link)
    }

    fn persist(&mut self) {
        if let Err(e) = self.cache.save_order(&self.cart.order_state()) {
            tracing::warn!(error = %e, "failed to write order to local cache");
        }
    }
}

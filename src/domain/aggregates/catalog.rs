//! Catalog collection operations
//!
//! Ids are assigned as `max(existing) + 1`. Nothing here locks: two writers
//! that load the same document will hand out the same id.

use crate::{BlogLink, BlogPost, Product};

pub trait Entity {
    fn id(&self) -> u64;
}

impl Entity for Product {
    fn id(&self) -> u64 { self.id }
}

impl Entity for BlogPost {
    fn id(&self) -> u64 { self.id }
}

/// Next free id for a collection; `1` when empty.
pub fn next_id<T: Entity>(items: &[T]) -> u64 {
    items.iter().map(Entity::id).max().unwrap_or(0) + 1
}

pub fn insert<T: Entity>(items: &mut Vec<T>, entity: T) -> &T {
    items.push(entity);
    &items[items.len() - 1]
}

pub fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: u64) -> bool {
    let before = items.len();
    items.retain(|i| i.id() != id);
    items.len() < before
}

pub fn update_by_id<T: Entity>(items: &mut [T], id: u64, patch: impl FnOnce(&mut T)) -> Option<&T> {
    let item = items.iter_mut().find(|i| i.id() == id)?;
    patch(item);
    Some(item)
}

/// Replacement fields for a product; the image is kept unless a new one is given.
#[derive(Clone, Debug)]
pub struct ProductPatch {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub image: Option<String>,
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) {
        product.name = self.name;
        product.description = self.description;
        product.price = self.price;
        if let Some(image) = self.image { product.image = image; }
    }
}

/// Replacement fields for a blog post; optional fields are kept when absent.
#[derive(Clone, Debug, Default)]
pub struct BlogPatch {
    pub title: String,
    pub excerpt: String,
    pub date: Option<String>,
    pub image: Option<String>,
    pub content: Option<String>,
    pub links: Option<Vec<BlogLink>>,
}

impl BlogPatch {
    pub fn apply(self, post: &mut BlogPost) {
        post.title = self.title;
        post.excerpt = self.excerpt;
        if let Some(date) = self.date { post.date = date; }
        if let Some(image) = self.image { post.image = image; }
        if self.content.is_some() { post.content = self.content; }
        if self.links.is_some() { post.links = self.links; }
    }
}

//! Blog post endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use super::{AdminBody, ApiError, AppState, DeleteResponse};
use crate::domain::aggregates::catalog::{self, BlogPatch};
use crate::{BlogLink, BlogPost};

/// Date stamp used when a post is created without one, e.g. `Oct 17, 2026`.
pub const BLOG_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub excerpt: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub links: Option<Vec<BlogLink>>,
}

impl BlogRequest {
    fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|i| !i.is_empty())
    }

    fn file_name(&self) -> &str {
        self.file_name.as_deref().filter(|f| !f.is_empty()).unwrap_or("image.jpg")
    }

    fn date(&self) -> Option<String> {
        self.date.clone().filter(|d| !d.trim().is_empty())
    }
}

fn today() -> String {
    chrono::Local::now().format(BLOG_DATE_FORMAT).to_string()
}

pub async fn list(State(s): State<AppState>) -> Json<Vec<BlogPost>> {
    Json(s.catalog().load().await.blogs)
}

pub async fn create(State(s): State<AppState>, body: AdminBody) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    let r: BlogRequest = body.parse()?;
    r.validate()?;
    let image = r.image().ok_or_else(|| ApiError::Validation("Missing required fields: image".into()))?;

    let saved = s.images().save_encoded(image, r.file_name()).await.map_err(ApiError::storage("Failed to save image"))?;

    let mut doc = s.catalog().load().await;
    let post = BlogPost {
        id: catalog::next_id(&doc.blogs),
        date: r.date().unwrap_or_else(today),
        title: r.title,
        excerpt: r.excerpt,
        image: saved,
        content: r.content,
        links: r.links,
    };
    catalog::insert(&mut doc.blogs, post.clone());
    s.catalog().save(&doc).await.map_err(ApiError::storage("Failed to save blog"))?;

    tracing::info!(blog_id = post.id, title = %post.title, "blog created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(State(s): State<AppState>, Path(id): Path<u64>, body: AdminBody) -> Result<Json<BlogPost>, ApiError> {
    let r: BlogRequest = body.parse()?;
    r.validate()?;

    let mut doc = s.catalog().load().await;
    if !doc.blogs.iter().any(|b| b.id == id) {
        return Err(ApiError::NotFound("Blog"));
    }

    let image = match r.image() {
        Some(data) => Some(s.images().save_encoded(data, r.file_name()).await.map_err(ApiError::storage("Failed to save image"))?),
        None => None,
    };
    let patch = BlogPatch { date: r.date(), title: r.title, excerpt: r.excerpt, image, content: r.content, links: r.links };
    let updated = catalog::update_by_id(&mut doc.blogs, id, |b| patch.apply(b))
        .cloned()
        .ok_or(ApiError::NotFound("Blog"))?;
    s.catalog().save(&doc).await.map_err(ApiError::storage("Failed to update blog"))?;

    tracing::info!(blog_id = id, "blog updated");
    Ok(Json(updated))
}

pub async fn delete(State(s): State<AppState>, Path(id): Path<u64>, _admin: AdminBody) -> Result<Json<DeleteResponse>, ApiError> {
    let mut doc = s.catalog().load().await;
    if !catalog::remove_by_id(&mut doc.blogs, id) {
        return Err(ApiError::NotFound("Blog"));
    }
    s.catalog().save(&doc).await.map_err(ApiError::storage("Failed to delete blog"))?;

    tracing::info!(blog_id = id, "blog deleted");
    Ok(Json(DeleteResponse { success: true, message: "Blog deleted".into() }))
}

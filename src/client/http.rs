//! HTTP client for the catalog API, including the admin calls.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Host;

use super::ClientError;
use crate::{BlogLink, BlogPost, Product};

/// Largest image the admin panel will upload.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogForm {
    pub title: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<BlogLink>>,
}

#[derive(Serialize)]
struct WithPassword<'a, T: Serialize> {
    #[serde(flatten)]
    body: &'a T,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    client: Client,
    api_base: String,
}

impl CatalogClient {
    /// `api_base` must be absolute, e.g. `http://localhost:3000/api`.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ClientError> {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        let url = match Url::parse(&api_base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => return Err(ClientError::InvalidApiBase(api_base)),
        };
        let mut builder = Client::builder();
        if is_loopback(&url) {
            builder = builder.no_proxy();
        }
        Ok(Self { client: builder.build()?, api_base })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}/{path}", self.api_base))
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>, ClientError> {
        send(self.request(Method::GET, "products")).await
    }

    pub async fn fetch_blogs(&self) -> Result<Vec<BlogPost>, ClientError> {
        send(self.request(Method::GET, "blogs")).await
    }

    pub async fn create_product(&self, form: &ProductForm, password: &str) -> Result<Product, ClientError> {
        send(self.request(Method::POST, "products").json(&WithPassword { body: form, password })).await
    }

    pub async fn update_product(&self, id: u64, form: &ProductForm, password: &str) -> Result<Product, ClientError> {
        send(self.request(Method::PUT, &format!("products/{id}")).json(&WithPassword { body: form, password })).await
    }

    pub async fn delete_product(&self, id: u64, password: &str) -> Result<(), ClientError> {
        self.delete(&format!("products/{id}"), password).await
    }

    pub async fn create_blog(&self, form: &BlogForm, password: &str) -> Result<BlogPost, ClientError> {
        send(self.request(Method::POST, "blogs").json(&WithPassword { body: form, password })).await
    }

    pub async fn update_blog(&self, id: u64, form: &BlogForm, password: &str) -> Result<BlogPost, ClientError> {
        send(self.request(Method::PUT, &format!("blogs/{id}")).json(&WithPassword { body: form, password })).await
    }

    pub async fn delete_blog(&self, id: u64, password: &str) -> Result<(), ClientError> {
        self.delete(&format!("blogs/{id}"), password).await
    }

    async fn delete(&self, path: &str, password: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = send(self.request(Method::DELETE, path).json(&serde_json::json!({ "password": password }))).await?;
        Ok(())
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(d)) => d.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string(), |b| b.error);
        return Err(ClientError::Api { status: status.as_u16(), message });
    }
    Ok(response.json::<T>().await?)
}

/// Read an image file into a data URI, returning it with the file name.
pub async fn encode_image(path: impl AsRef<Path>) -> Result<(String, String), ClientError> {
    let path = path.as_ref();
    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(ClientError::ImageTooLarge { size });
    }
    let bytes = tokio::fs::read(path).await?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    };
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("image.jpg").to_string();
    Ok((format!("data:{mime};base64,{}", STANDARD.encode(bytes)), file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encode_image_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chair.PNG");
        tokio::fs::write(&path, b"hello").await.unwrap();
        let (uri, name) = encode_image(&path).await.unwrap();
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
        assert_eq!(name, "chair.PNG");
    }

    #[tokio::test]
    async fn test_encode_image_rejects_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_IMAGE_BYTES + 1).unwrap();
        assert!(matches!(encode_image(&path).await, Err(ClientError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_is_loopback() {
        let loopback = |s: &str| is_loopback(&Url::parse(s).unwrap());
        assert!(loopback("http://127.0.0.1:3000/api"));
        assert!(loopback("http://localhost/api"));
        assert!(loopback("http://[::1]:3000/api"));
        assert!(!loopback("https://shop.example.com/api"));
    }

    #[test]
    fn test_relative_api_base_is_rejected() {
        for base in ["/api", "api", "", "ftp://files.example.com/api"] {
            assert!(matches!(CatalogClient::new(base), Err(ClientError::InvalidApiBase(_))), "{base}");
        }
        assert!(CatalogClient::new("http://localhost:3000/api/").is_ok());
    }

    #[test]
    fn test_password_is_flattened_into_body() {
        let form = ProductForm { name: "Rug".into(), description: "Wool".into(), price: 1000, image: None, file_name: None };
        let json = serde_json::to_value(WithPassword { body: &form, password: "pw" }).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Rug", "description": "Wool", "price": 1000, "password": "pw"}));
    }
}

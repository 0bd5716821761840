//! Shared fixtures for Kilnworks integration tests.
//!
//! Tests exercise the importer and the storefront against `wiremock`
//! servers standing in for the three external surfaces: the paginated
//! product feed, the host serving source images, and the content store.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Cursor;
use std::path::PathBuf;

use secrecy::SecretString;
use serde_json::{Value, json};

use kilnworks_importer::{ContentStoreConfig, ImporterConfig};
use kilnworks_storefront::config::{ContentReadConfig, StorefrontConfig};

/// Dataset name used by every test.
pub const DATASET: &str = "test";

/// Build an importer configuration pointing at mock servers.
#[must_use]
pub fn importer_config(feed_url: &str, content_api: &str, page_size: u32) -> ImporterConfig {
    ImporterConfig {
        feed_url: feed_url.to_string(),
        page_size,
        request_timeout_secs: 5,
        content_store: ContentStoreConfig {
            api_url: content_api.to_string(),
            dataset: DATASET.to_string(),
            write_token: SecretString::from("test-write-token"),
        },
    }
}

/// Build a storefront configuration pointing at a mock content store.
#[must_use]
pub fn storefront_config(content_api: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        content: ContentReadConfig {
            api_url: content_api.to_string(),
            dataset: DATASET.to_string(),
            timeout_secs: 5,
        },
        cart_storage_path: PathBuf::from("cart.json"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A complete feed record in the feed's wire format.
#[must_use]
pub fn feed_record(id: &str, name: &str, image_url: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "image": image_url,
        "price": 85.0,
        "description": "Hand-thrown stoneware",
        "features": ["Stoneware", "Food safe"],
        "dimensions": { "width": "15cm", "height": "38cm", "depth": "15cm" },
        "category": { "name": "Ceramics", "slug": "ceramics" },
        "tags": ["new"]
    })
}

/// A feed page of `count` sequentially numbered records starting at
/// `start`, with image URLs under `image_base`.
#[must_use]
pub fn feed_page(start: usize, count: usize, image_base: &str) -> Value {
    let records: Vec<Value> = (start..start + count)
        .map(|n| {
            feed_record(
                &format!("prod-{n}"),
                &format!("Product {n}"),
                &format!("{image_base}/images/prod-{n}.png"),
            )
        })
        .collect();
    Value::Array(records)
}

/// A product document in the content store's wire format, as the query
/// endpoint returns it.
#[must_use]
pub fn product_document_json(id: &str, name: &str) -> Value {
    json!({
        "_type": "product",
        "_id": id,
        "name": name,
        "description": "Hand-thrown stoneware",
        "price": 85.0,
        "image": { "_type": "image", "asset": { "_type": "reference", "_ref": "image-1" } },
        "features": ["Stoneware"],
        "dimensions": { "width": "15cm", "height": "38cm", "depth": "15cm" },
        "category": { "_type": "reference", "_ref": "category-ceramics" },
        "tags": ["new"]
    })
}

/// Encode a solid-color PNG of the given size for image fixtures.
///
/// # Panics
///
/// Panics if PNG encoding fails, which cannot happen for valid dimensions.
#[must_use]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let pixels = image::RgbImage::from_pixel(width, height, image::Rgb([182, 124, 96]));
    let mut buffer = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("PNG encoding of a fixture image should succeed");
    buffer.into_inner()
}

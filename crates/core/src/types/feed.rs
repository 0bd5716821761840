//! Records as served by the external product feed.
//!
//! The feed returns JSON arrays of product records at
//! `GET <base>?offset=<n>&limit=<n>`. Field names follow the feed's wire
//! format exactly (notably the `_id` key).

use serde::{Deserialize, Serialize};

/// A product record from the external feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedProduct {
    /// Stable identifier assigned by the feed. Reused as the content-store
    /// document id so that re-imports replace rather than duplicate.
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Source URL of the product image.
    pub image: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub category: CategorySpec,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Product dimensions. The feed serves these as display strings
/// (e.g. `"110cm"`), and they are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub depth: String,
}

/// Category name and slug as given by the feed.
///
/// The slug is the unique key for category documents in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_product_deserializes_wire_format() {
        let json = serde_json::json!({
            "_id": "prod-1",
            "name": "Dune Vase",
            "image": "https://cdn.example.com/images/dune-vase.jpg",
            "price": 85.0,
            "description": "A timeless vase",
            "features": ["Hand-thrown", "Stoneware"],
            "dimensions": { "width": "15cm", "height": "38cm", "depth": "15cm" },
            "category": { "name": "Ceramics", "slug": "ceramics" },
            "tags": ["vase", "new"]
        });

        let product: FeedProduct =
            serde_json::from_value(json).expect("wire format should deserialize");
        assert_eq!(product.id, "prod-1");
        assert_eq!(product.category.slug, "ceramics");
        assert_eq!(product.dimensions.height, "38cm");
        assert_eq!(product.features.len(), 2);
    }

    #[test]
    fn test_feed_product_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "_id": "prod-2",
            "name": "Bare Bowl",
            "image": "https://cdn.example.com/images/bowl.png",
            "price": 24.5,
            "category": { "name": "Tableware", "slug": "tableware" }
        });

        let product: FeedProduct =
            serde_json::from_value(json).expect("optional fields should default");
        assert!(product.description.is_empty());
        assert!(product.features.is_empty());
        assert!(product.tags.is_empty());
        assert_eq!(product.dimensions, Dimensions::default());
    }
}

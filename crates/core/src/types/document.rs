//! Content-store document shapes.
//!
//! The content store is a schema-validated document database addressed over
//! HTTP. Documents carry a `_type` discriminator and an `_id`; references
//! between documents are `{"_type": "reference", "_ref": "<id>"}` objects.

use serde::{Deserialize, Serialize};

use crate::types::feed::Dimensions;

/// A reference to another document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_ref")]
    pub id: String,
}

impl Reference {
    /// Build a reference to the document with the given id.
    #[must_use]
    pub fn to(id: impl Into<String>) -> Self {
        Self {
            kind: "reference".to_string(),
            id: id.into(),
        }
    }
}

/// An image field: a reference to an uploaded image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageField {
    #[serde(rename = "_type")]
    pub kind: String,
    pub asset: Reference,
}

impl ImageField {
    /// Build an image field pointing at an uploaded asset document.
    #[must_use]
    pub fn from_asset(asset_id: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            asset: Reference::to(asset_id),
        }
    }
}

/// A slug wrapper as stored by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(rename = "_type")]
    pub kind: String,
    pub current: String,
}

impl Slug {
    #[must_use]
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            kind: "slug".to_string(),
            current: current.into(),
        }
    }
}

/// A product document as written by the importer and read by the storefront.
///
/// Keyed by the feed's original `_id` so that repeated imports replace the
/// same document instead of creating duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub image: ImageField,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub category: Reference,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A category document, created lazily on first reference and keyed by its
/// unique slug. Never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDocument {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub slug: Slug,
}

impl CategoryDocument {
    /// Build a new category document for creation (no id yet; the content
    /// store assigns one).
    #[must_use]
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            kind: "category".to_string(),
            id: None,
            name: name.into(),
            slug: Slug::new(slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_serializes_with_wire_keys() {
        let reference = Reference::to("category-abc");
        let json = serde_json::to_value(&reference).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"_type": "reference", "_ref": "category-abc"})
        );
    }

    #[test]
    fn test_image_field_wraps_asset_reference() {
        let image = ImageField::from_asset("image-123");
        let json = serde_json::to_value(&image).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "_type": "image",
                "asset": {"_type": "reference", "_ref": "image-123"}
            })
        );
    }

    #[test]
    fn test_new_category_omits_id() {
        let category = CategoryDocument::new("Ceramics", "ceramics");
        let json = serde_json::to_value(&category).expect("serialize");
        assert!(json.get("_id").is_none(), "unsaved category has no _id");
        assert_eq!(json["slug"]["current"], "ceramics");
    }

    #[test]
    fn test_product_document_round_trips() {
        let document = ProductDocument {
            kind: "product".to_string(),
            id: "prod-1".to_string(),
            name: "Dune Vase".to_string(),
            description: "A timeless vase".to_string(),
            price: 85.0,
            image: ImageField::from_asset("image-1"),
            features: vec!["Hand-thrown".to_string()],
            dimensions: Dimensions::default(),
            category: Reference::to("category-1"),
            tags: vec!["vase".to_string()],
        };

        let json = serde_json::to_value(&document).expect("serialize");
        assert_eq!(json["_id"], "prod-1");
        assert_eq!(json["_type"], "product");

        let back: ProductDocument = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, document);
    }
}

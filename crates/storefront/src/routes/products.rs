//! Product route handlers.
//!
//! Reads go straight to the content store client (moka-cached); the
//! storefront holds no catalog state of its own.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use kilnworks_core::{Dimensions, ProductDocument};

use crate::error::Result;
use crate::state::AppState;

/// Product display data.
#[derive(Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    /// Asset reference of the hosted image. URL construction happens in the
    /// rendering layer.
    pub image: String,
    pub features: Vec<String>,
    pub dimensions: Dimensions,
    pub category: String,
    pub tags: Vec<String>,
}

impl From<ProductDocument> for ProductView {
    fn from(document: ProductDocument) -> Self {
        Self {
            id: document.id,
            name: document.name,
            description: document.description,
            price: format!("${:.2}", document.price),
            image: document.image.asset.id,
            features: document.features,
            dimensions: document.dimensions,
            category: document.category.id,
            tags: document.tags,
        }
    }
}

/// Display the product listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let products = state.content().list_products().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// Display a product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let product = state.content().get_product(&id).await?;
    Ok(Json(ProductView::from(product)))
}

//! Per-product processing: image re-hosting, category resolution, document
//! assembly.
//!
//! Each product is processed in isolation and yields a tagged outcome so
//! the batch loop can tell recoverable skips apart from fatal errors:
//!
//! - `Ok(Staged(document))` - ready to stage into the transaction
//! - `Ok(Skipped { .. })` - image failure; drop this product, keep going
//! - `Err(ImportError)` - fatal; abort the whole run

use kilnworks_core::{FeedProduct, ImageField, ProductDocument};

use crate::content::ContentClient;
use crate::error::ImportError;
use crate::image::{self, ImageError};
use crate::{category, ProductOutcome};

/// Process one feed record into a stageable document.
///
/// Image re-hosting happens first; its failures convert to a `Skipped`
/// outcome. Category resolution runs after a successful upload and its
/// failures propagate as fatal [`ImportError::Category`].
///
/// # Errors
///
/// Returns [`ImportError::Category`] when the category lookup or create
/// fails.
pub async fn process_product(
    http: &reqwest::Client,
    content: &ContentClient,
    product: &FeedProduct,
) -> Result<ProductOutcome, ImportError> {
    let asset_id = match image::rehost_image(http, content, &product.image).await {
        Ok(id) => id,
        Err(reason) => return Ok(skip(product, reason)),
    };

    let category_ref = category::resolve(content, &product.category)
        .await
        .map_err(|source| ImportError::Category {
            slug: product.category.slug.clone(),
            source,
        })?;

    Ok(ProductOutcome::Staged(ProductDocument {
        kind: "product".to_string(),
        id: product.id.clone(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price,
        image: ImageField::from_asset(asset_id),
        features: product.features.clone(),
        dimensions: product.dimensions.clone(),
        category: category_ref,
        tags: product.tags.clone(),
    }))
}

fn skip(product: &FeedProduct, reason: ImageError) -> ProductOutcome {
    ProductOutcome::Skipped {
        name: product.name.clone(),
        reason,
    }
}

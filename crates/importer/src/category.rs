//! Category resolution: look up a category document by slug, creating it
//! on first reference.
//!
//! Processing is strictly sequential, so the first product carrying a given
//! slug creates the category and every later product finds it - there is no
//! concurrent-creation race to guard against. Every occurrence queries the
//! store; creation happens immediately (it is not staged into the product
//! transaction).
//!
//! Unlike image failures, any error here is fatal to the run.

use tracing::{debug, instrument};

use kilnworks_core::{CategoryDocument, CategorySpec, Reference};

use crate::content::{ContentClient, ContentStoreError};

#[derive(Debug, serde::Deserialize)]
struct ExistingCategory {
    #[serde(rename = "_id")]
    id: String,
}

/// Resolve a category spec to a reference, creating the document if no
/// category with that slug exists yet.
///
/// # Errors
///
/// Returns [`ContentStoreError`] on any lookup or create failure; callers
/// treat this as fatal to the run.
#[instrument(skip(content), fields(slug = %category.slug))]
pub async fn resolve(
    content: &ContentClient,
    category: &CategorySpec,
) -> Result<Reference, ContentStoreError> {
    let slug = serde_json::Value::String(category.slug.clone());
    let existing: Option<ExistingCategory> = content
        .query_first(
            r#"*[_type == "category" && slug.current == $slug][0]"#,
            &[("slug", &slug)],
        )
        .await?;

    if let Some(found) = existing {
        debug!(category_id = %found.id, "Reusing existing category");
        return Ok(Reference::to(found.id));
    }

    let document = CategoryDocument::new(category.name.as_str(), category.slug.as_str());
    let created_id = content.create(&document).await?;
    debug!(category_id = %created_id, "Created category");
    Ok(Reference::to(created_id))
}

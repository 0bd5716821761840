//! The shopping cart store.
//!
//! Holds the authoritative in-memory list of line items for the current
//! browsing session and persists it to a durable local slot on every
//! mutation. The store is owned by the composition root ([`crate::state`])
//! and injected into route handlers - no ambient global state.
//!
//! # Invariants
//!
//! - `id` is unique within the cart: adding an item whose id already exists
//!   accumulates quantity on the existing entry; the incoming item's other
//!   fields are discarded (the original snapshot wins, including its price).
//! - Insertion order is preserved; removal deletes the whole entry.
//! - `subtotal` and `item_count` are recomputed on every call, never cached.
//! - Mutations never fail visibly: malformed quantities are normalized and
//!   storage write failures are logged and swallowed.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One entry in the cart: a product id with display fields snapshotted at
/// add-time and an aggregated quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price snapshot at add-time; not re-fetched.
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

/// The durable local slot the cart persists to. One fixed key, string
/// payloads.
pub trait CartStorage: Send {
    /// Read the persisted payload, if any.
    fn load(&self) -> Option<String>;
    /// Overwrite the persisted payload. Must not fail visibly.
    fn store(&self, payload: &str);
}

/// Cart slot backed by a file on disk.
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn store(&self, payload: &str) {
        if let Err(e) = fs::write(&self.path, payload) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist cart");
        }
    }
}

/// In-memory cart slot for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryCartStorage {
    slot: std::sync::Mutex<Option<String>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn store(&self, payload: &str) {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(payload.to_string());
    }
}

/// The cart store: ordered line items plus the durable slot they persist to.
pub struct CartStore {
    items: Vec<CartLineItem>,
    storage: Box<dyn CartStorage>,
}

impl CartStore {
    /// Create a cart hydrated from durable storage.
    ///
    /// An absent or malformed payload initializes an empty cart; hydration
    /// never fails.
    #[must_use]
    pub fn load(storage: Box<dyn CartStorage>) -> Self {
        let items = storage
            .load()
            .map(|payload| match serde_json::from_str(&payload) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "Discarding malformed cart payload");
                    Vec::new()
                }
            })
            .unwrap_or_default();

        Self { items, storage }
    }

    /// Add an item to the cart.
    ///
    /// A non-positive quantity is normalized to 1. When an entry with the
    /// same id exists, only its quantity grows; the incoming item's other
    /// fields are discarded. Otherwise the item is appended, preserving
    /// insertion order. The updated list is persisted synchronously.
    pub fn add_item(&mut self, mut item: CartLineItem) {
        if item.quantity == 0 {
            item.quantity = 1;
        }

        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }

        self.persist();
    }

    /// Remove the entry with the given id, if present. A missing id is a
    /// no-op, not an error. The updated list is persisted synchronously.
    pub fn remove_item(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// The current ordered list of line items.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Sum of `price * quantity` over the current list. Recomputed on every
    /// call so it can never go stale after a mutation.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    fn persist(&self) {
        match serde_json::to_string(&self.items) {
            Ok(payload) => self.storage.store(&payload),
            Err(e) => warn!(error = %e, "Failed to serialize cart"),
        }
    }
}

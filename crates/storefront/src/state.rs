//! Application state shared across handlers.

use std::sync::{Arc, Mutex};

use crate::cart::{CartStorage, CartStore};
use crate::config::StorefrontConfig;
use crate::content::ContentClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the content store client, and the session cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: ContentClient,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The cart storage is injected by the composition root (`main` passes
    /// the file-backed slot; tests pass an in-memory one), keeping the cart
    /// an explicit dependency rather than ambient global state.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store client cannot be constructed.
    pub fn new(
        config: StorefrontConfig,
        cart_storage: Box<dyn CartStorage>,
    ) -> Result<Self, reqwest::Error> {
        let content = ContentClient::new(&config.content)?;
        let cart = Mutex::new(CartStore::load(cart_storage));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                cart,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the content store client.
    #[must_use]
    pub fn content(&self) -> &ContentClient {
        &self.inner.content
    }

    /// Get a reference to the session cart.
    ///
    /// The cart has a single writer (the UI event context); the mutex only
    /// satisfies the server's shared-state requirements.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartStore> {
        &self.inner.cart
    }
}

//! Cart route handlers.
//!
//! Mutations respond with an `HX-Trigger: cart-updated` header so dynamic
//! page elements (the header badge, the cart drawer) can refresh without a
//! full reload. Cart mutations never fail visibly: malformed quantities are
//! normalized, unknown ids are no-ops.

use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};
use std::sync::PoisonError;
use tracing::instrument;

use crate::cart::{CartLineItem, CartStore};
use crate::state::AppState;

/// Cart item display data.
#[derive(Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

/// Cart count badge data.
#[derive(Clone, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

/// Format an amount as a price string.
fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: format_price(item.price),
            line_price: format_price(item.price * f64::from(item.quantity)),
        }
    }
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: format_price(cart.subtotal()),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data. Quantity is accepted as a signed value and
/// normalized, never rejected.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub quantity: Option<i64>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Display the cart with its recomputed subtotal.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().lock().unwrap_or_else(PoisonError::into_inner);
    Json(CartView::from(&*cart))
}

/// Add an item to the cart.
///
/// Merges by product id (quantity accumulates, the original snapshot's
/// fields win) and persists synchronously. Returns the new cart count with
/// a trigger header - the user-visible confirmation signal.
#[instrument(skip(state, form), fields(product = %form.id))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> impl IntoResponse {
    let quantity = form
        .quantity
        .and_then(|raw| u32::try_from(raw).ok())
        .unwrap_or(0)
        .max(1);

    let item = CartLineItem {
        id: form.id,
        name: form.name,
        description: form.description,
        price: form.price.max(0.0),
        image: form.image,
        quantity,
    };

    let count = {
        let mut cart = state.cart().lock().unwrap_or_else(PoisonError::into_inner);
        cart.add_item(item);
        cart.item_count()
    };

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(CartCountView { count }),
    )
}

/// Remove an item from the cart. A missing id is a no-op.
#[instrument(skip(state), fields(product = %form.id))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> impl IntoResponse {
    let view = {
        let mut cart = state.cart().lock().unwrap_or_else(PoisonError::into_inner);
        cart.remove_item(&form.id);
        CartView::from(&*cart)
    };

    (AppendHeaders([("HX-Trigger", "cart-updated")]), Json(view))
}

/// Get the cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountView> {
    let count = state
        .cart()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .item_count();
    Json(CartCountView { count })
}

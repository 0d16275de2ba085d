//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Plain form posts (no `HX-Request` header) are answered with a redirect so
//! the storefront also works without JavaScript.
//!
//! Button presses are mapped to store operations through [`CartAction`]; the
//! store itself knows nothing about HTTP.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Deserializer};
use tracing::instrument;
use warung_core::{Cart, CartStore, Change, LineItem, LineItemId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Event name sent in `HX-Trigger` after every cart change.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Returns true if there is nothing in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.unit_price.to_string(),
            line_price: item.subtotal().to_string(),
        }
    }
}

// =============================================================================
// Event Dispatch
// =============================================================================

/// A cart button, as posted by the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartAction {
    /// The `+` button.
    Inc,
    /// The `-` button.
    Dec,
    /// The quantity input.
    Set,
    /// The remove button.
    Remove,
}

impl CartAction {
    /// Run the store operation this action stands for.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if `Set` arrives without a quantity, or the
    /// store's error if the change could not be persisted.
    pub fn dispatch(
        self,
        store: &mut CartStore,
        id: LineItemId,
        quantity: Option<i64>,
    ) -> Result<Change> {
        let change = match self {
            Self::Inc => store.increment(id)?,
            Self::Dec => store.decrement(id)?,
            Self::Remove => store.remove(id)?,
            Self::Set => {
                let quantity = quantity
                    .ok_or_else(|| AppError::BadRequest("quantity is required".to_string()))?;
                store.set_quantity(id, quantity)?
            }
        };
        Ok(change)
    }
}

/// Deserialize an empty form field as None.
fn empty_string_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub handle: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub action: CartAction,
    pub id: LineItemId,
    /// Cleared number inputs post `quantity=`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub quantity: Option<i64>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub store_name: String,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
    pub revision: u64,
}

/// Returns true if the request was made by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

fn cart_items_response(cart: CartView) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartShowTemplate> {
    let cart = CartView::from(state.cart()?.cart());

    Ok(CartShowTemplate {
        store_name: state.config().store_name.clone(),
        cart,
    })
}

/// Add one unit of a menu item (HTMX).
///
/// Returns the cart count badge with an HTMX trigger so other cart widgets
/// refresh themselves.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let item = state
        .catalog()
        .get(&form.handle)
        .ok_or_else(|| AppError::NotFound(format!("menu item {}", form.handle)))?;

    let count = {
        let mut store = state.cart()?;
        store.add(&item.name, item.price)?;
        store.cart().item_count()
    };
    add_breadcrumb("cart", "Added item", Some(&[("handle", &form.handle)]));

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/").into_response());
    }

    Ok((
        AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
        CartCountTemplate {
            count,
            revision: state.cart_revision(),
        },
    )
        .into_response())
}

/// Apply a cart button press (HTMX).
#[instrument(skip(state, headers))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let cart = {
        let mut store = state.cart()?;
        let change = form.action.dispatch(&mut store, form.id, form.quantity)?;
        if !change.is_applied() {
            tracing::debug!(id = %form.id, "cart update for unknown line ignored");
        }
        CartView::from(store.cart())
    };

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    Ok(cart_items_response(cart))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, headers))]
pub async fn clear(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let cart = {
        let mut store = state.cart()?;
        store.clear()?;
        CartView::from(store.cart())
    };
    add_breadcrumb("cart", "Cleared cart", None);

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    Ok(cart_items_response(cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<CartCountTemplate> {
    let count = state.cart()?.cart().item_count();
    Ok(CartCountTemplate {
        count,
        revision: state.cart_revision(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderValue;
    use warung_core::Price;
    use warung_core::cart::{MemoryStorage, SequentialIds};

    use super::*;

    fn store() -> CartStore {
        let mut store = CartStore::new(Arc::new(MemoryStorage::new()))
            .with_id_source(SequentialIds::default());
        store.add("Burger", Price::new(25_000)).unwrap();
        store
    }

    #[test]
    fn test_dispatch_table() {
        let mut store = store();
        let id = store.items()[0].id;

        CartAction::Inc.dispatch(&mut store, id, None).unwrap();
        assert_eq!(store.items()[0].quantity, 2);

        CartAction::Set.dispatch(&mut store, id, Some(7)).unwrap();
        assert_eq!(store.items()[0].quantity, 7);

        CartAction::Dec.dispatch(&mut store, id, None).unwrap();
        assert_eq!(store.items()[0].quantity, 6);

        CartAction::Remove.dispatch(&mut store, id, None).unwrap();
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_set_requires_quantity() {
        let mut store = store();
        let id = store.items()[0].id;
        assert!(matches!(
            CartAction::Set.dispatch(&mut store, id, None),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_action_parses_from_form_value() {
        let form: UpdateCartForm =
            serde_json::from_str(r#"{"action": "dec", "id": 3, "quantity": null}"#).unwrap();
        assert_eq!(form.action, CartAction::Dec);
        assert_eq!(form.id, LineItemId::new(3));
    }

    #[test]
    fn test_blank_quantity_is_none() {
        let form: UpdateCartForm =
            serde_json::from_str(r#"{"action": "set", "id": 3, "quantity": ""}"#).unwrap();
        assert_eq!(form.quantity, None);

        let form: UpdateCartForm =
            serde_json::from_str(r#"{"action": "set", "id": 3, "quantity": " 4 "}"#).unwrap();
        assert_eq!(form.quantity, Some(4));

        let form: UpdateCartForm = serde_json::from_str(r#"{"action": "inc", "id": 3}"#).unwrap();
        assert_eq!(form.quantity, None);

        assert!(
            serde_json::from_str::<UpdateCartForm>(
                r#"{"action": "set", "id": 3, "quantity": "banyak"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let store = store();
        let view = CartView::from(store.cart());
        assert_eq!(view.total, "IDR 25.000");
        assert_eq!(view.items[0].line_price, "IDR 25.000");
        assert_eq!(view.item_count, 1);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}

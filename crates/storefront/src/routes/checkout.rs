//! Checkout route handlers.
//!
//! Checkout is a single form: customer details plus the cash handed over.
//! Placing the order freezes the cart into a [`Bill`] that stays on screen
//! (and printable) until it is closed. Closing applies the configured
//! [`warung_core::ClosePolicy`] to the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;
use warung_core::{Bill, BillLine, Customer, Price};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub amount_paid: String,
}

/// Bill line display data for templates.
#[derive(Clone)]
pub struct BillLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub subtotal: String,
}

impl From<&BillLine> for BillLineView {
    fn from(line: &BillLine) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price.to_string(),
            subtotal: line.subtotal.to_string(),
        }
    }
}

/// Bill display data for templates.
#[derive(Clone)]
pub struct BillView {
    pub lines: Vec<BillLineView>,
    pub total: String,
    pub amount_paid: String,
    pub change: String,
    pub shortfall: String,
    pub paid_in_full: bool,
    pub customer_name: String,
    pub customer_phone: String,
    pub notes: Option<String>,
    pub placed_at: String,
}

impl From<&Bill> for BillView {
    fn from(bill: &Bill) -> Self {
        Self {
            lines: bill.lines.iter().map(BillLineView::from).collect(),
            total: bill.total.to_string(),
            amount_paid: bill.amount_paid.to_string(),
            change: bill.change().to_string(),
            shortfall: bill.shortfall().to_string(),
            paid_in_full: bill.is_paid_in_full(),
            customer_name: bill.customer.name().to_string(),
            customer_phone: bill.customer.phone().to_string(),
            notes: bill.customer.notes().map(ToString::to_string),
            placed_at: bill.placed_at.format("%d/%m/%Y %H:%M").to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout form template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub store_name: String,
    pub cart: CartView,
    pub form: CheckoutForm,
    pub error: Option<String>,
}

/// Bill summary template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/bill.html")]
pub struct BillTemplate {
    pub store_name: String,
    pub bill: BillView,
}

/// Printable receipt template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/print.html")]
pub struct PrintTemplate {
    pub store_name: String,
    pub bill: BillView,
}

/// Parse the amount-paid field. An empty field means nothing was paid yet.
fn parse_amount(input: &str) -> Option<Price> {
    if input.trim().is_empty() {
        return Some(Price::ZERO);
    }
    input.parse().ok()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout form.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CheckoutTemplate> {
    let cart = CartView::from(state.cart()?.cart());

    Ok(CheckoutTemplate {
        store_name: state.config().store_name.clone(),
        cart,
        form: CheckoutForm::default(),
        error: None,
    })
}

/// Place the order.
///
/// Invalid details re-render the form with a 422 so the customer can fix
/// them without retyping everything.
#[instrument(skip(state, form))]
pub async fn place(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let store_name = state.config().store_name.clone();
    let (cart, result) = {
        let store = state.cart()?;
        let customer = Customer::new(&form.name, &form.phone, &form.notes)
            .map_err(|e| e.to_string());
        let amount = parse_amount(&form.amount_paid)
            .ok_or_else(|| "amount paid must be a whole number".to_string());
        let result = match (customer, amount) {
            (Ok(customer), Ok(amount)) => {
                Ok(Bill::place(store.cart(), customer, amount, Utc::now())?)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        (CartView::from(store.cart()), result)
    };

    let bill = match result {
        Ok(bill) => bill,
        Err(error) => {
            tracing::debug!(%error, "checkout form rejected");
            let page = CheckoutTemplate {
                store_name,
                cart,
                form,
                error: Some(error),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    tracing::info!(
        lines = bill.lines.len(),
        total = %bill.total,
        paid_in_full = bill.is_paid_in_full(),
        "order placed"
    );
    add_breadcrumb("checkout", "Placed order", None);

    let view = BillView::from(&bill);
    *state.last_bill()? = Some(bill);

    Ok(BillTemplate {
        store_name,
        bill: view,
    }
    .into_response())
}

/// Printable receipt for the bill on screen.
#[instrument(skip(state))]
pub async fn print(State(state): State<AppState>) -> Result<PrintTemplate> {
    let bill = state
        .last_bill()?
        .as_ref()
        .map(BillView::from)
        .ok_or_else(|| AppError::NotFound("no open bill".to_string()))?;

    Ok(PrintTemplate {
        store_name: state.config().store_name.clone(),
        bill,
    })
}

/// Close the bill and return to the menu.
#[instrument(skip(state))]
pub async fn close(State(state): State<AppState>) -> Result<Redirect> {
    let had_bill = state.last_bill()?.take().is_some();
    if !had_bill {
        tracing::debug!("no open bill to close");
        return Ok(Redirect::to("/"));
    }

    let policy = state.config().close_policy;
    policy.apply(&mut *state.cart()?)?;

    tracing::info!(?policy, "bill closed");
    add_breadcrumb("checkout", "Closed bill", None);

    Ok(Redirect::to("/"))
}

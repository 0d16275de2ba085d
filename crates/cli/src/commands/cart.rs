//! `warung cart ...`: inspect and edit the persisted cart.
//!
//! Each command opens the cart file, applies one change, and prints the
//! resulting cart. A running storefront picks the change up on its next
//! sync tick.

use std::io::Write;

use warung_core::{Cart, CartStore, Catalog, Change, LineItemId};

use super::CommandError;

/// A change to one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit {
    Increment(LineItemId),
    Decrement(LineItemId),
    Set(LineItemId, i64),
    Remove(LineItemId),
}

impl LineEdit {
    const fn id(self) -> LineItemId {
        match self {
            Self::Increment(id) | Self::Decrement(id) | Self::Set(id, _) | Self::Remove(id) => id,
        }
    }
}

/// Write a cart as a table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_cart(cart: &Cart, out: &mut impl Write) -> std::io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Cart is empty.");
    }

    for item in cart {
        writeln!(
            out,
            "  #{:<14} {:>3} x {:<20} {:>14}",
            item.id.to_string(),
            item.quantity,
            item.name,
            item.subtotal().to_string(),
        )?;
    }
    let noun = if cart.item_count() == 1 { "item" } else { "items" };
    writeln!(out, "Total ({} {noun}): {}", cart.item_count(), cart.total())
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show(store: &CartStore, out: &mut impl Write) -> Result<(), CommandError> {
    write_cart(store.cart(), out)?;
    Ok(())
}

/// Add one unit of the menu item with `handle`.
///
/// # Errors
///
/// Returns an error if the handle is unknown, the cart cannot be saved, or
/// writing to `out` fails.
pub fn add(
    store: &mut CartStore,
    catalog: &Catalog,
    handle: &str,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let item = catalog
        .get(handle)
        .ok_or_else(|| CommandError::UnknownItem(handle.to_string()))?;

    let change = store.add(&item.name, item.price)?;
    tracing::info!(?change, handle, "added to cart");

    write_cart(store.cart(), out)?;
    Ok(())
}

/// Apply a line edit.
///
/// # Errors
///
/// Returns `UnknownLine` if no line has the given id (the cart is left
/// untouched), or an error if the cart cannot be saved.
pub fn edit(
    store: &mut CartStore,
    edit: LineEdit,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let change = match edit {
        LineEdit::Increment(id) => store.increment(id)?,
        LineEdit::Decrement(id) => store.decrement(id)?,
        LineEdit::Set(id, quantity) => store.set_quantity(id, quantity)?,
        LineEdit::Remove(id) => store.remove(id)?,
    };
    if let Change::NotFound(id) = change {
        return Err(CommandError::UnknownLine(id));
    }
    tracing::info!(?change, id = %edit.id(), "cart line updated");

    write_cart(store.cart(), out)?;
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart file cannot be removed or writing to `out`
/// fails.
pub fn clear(store: &mut CartStore, out: &mut impl Write) -> Result<(), CommandError> {
    store.clear()?;
    tracing::info!("cart cleared");
    write_cart(store.cart(), out)?;
    Ok(())
}

//! `warung checkout`: place the order and print a receipt.

use std::io::Write;

use chrono::Utc;
use warung_core::{Bill, CartStore, ClosePolicy, Customer, Price};

use super::CommandError;

/// Customer details and payment, as given on the command line.
#[derive(Debug, Clone)]
pub struct CheckoutArgs {
    pub name: String,
    pub phone: String,
    pub notes: String,
    pub paid: Price,
    pub policy: ClosePolicy,
}

/// Write a bill as a plain-text receipt.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_receipt(bill: &Bill, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", bill.placed_at.format("%d/%m/%Y %H:%M"))?;
    writeln!(out, "{} ({})", bill.customer.name(), bill.customer.phone())?;
    if let Some(notes) = bill.customer.notes() {
        writeln!(out, "Notes: {notes}")?;
    }
    writeln!(out, "{}", "-".repeat(40))?;
    for line in &bill.lines {
        let label = format!("{} x {}", line.quantity, line.name);
        writeln!(out, "{label:<26}{:>14}", line.subtotal.to_string())?;
    }
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "{:<26}{:>14}", "Total", bill.total.to_string())?;
    writeln!(out, "{:<26}{:>14}", "Paid", bill.amount_paid.to_string())?;
    if bill.is_paid_in_full() {
        writeln!(out, "{:<26}{:>14}", "Change", bill.change().to_string())
    } else {
        writeln!(out, "{:<26}{:>14}", "Still owed", bill.shortfall().to_string())
    }
}

/// Place an order for the current cart, print the receipt, then close the
/// bill according to `args.policy`.
///
/// # Errors
///
/// Returns an error if the customer details are invalid, the cart is empty,
/// or the cart cannot be cleared.
pub fn place(
    store: &mut CartStore,
    args: CheckoutArgs,
    out: &mut impl Write,
) -> Result<Bill, CommandError> {
    let customer = Customer::new(&args.name, &args.phone, &args.notes)
        .map_err(warung_core::CheckoutError::from)?;
    let bill = Bill::place(store.cart(), customer, args.paid, Utc::now())?;
    tracing::info!(
        lines = bill.lines.len(),
        total = %bill.total,
        paid_in_full = bill.is_paid_in_full(),
        "order placed"
    );

    write_receipt(&bill, out)?;

    args.policy.apply(store)?;
    tracing::debug!(policy = ?args.policy, "bill closed");
    Ok(bill)
}

//! `warung menu`: list what can be ordered.

use std::io::Write;

use warung_core::Catalog;

use super::CommandError;

/// Print the menu grouped by category.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn list(catalog: &Catalog, out: &mut impl Write) -> Result<(), CommandError> {
    let width = catalog
        .items()
        .iter()
        .map(|item| item.handle.len())
        .max()
        .unwrap_or_default();

    for (index, (category, items)) in catalog.by_category().into_iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{category}")?;
        for item in items {
            writeln!(out, "  {:<width$}  {}  {}", item.handle, item.name, item.price)?;
        }
    }
    Ok(())
}

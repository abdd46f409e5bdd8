//! Cart commands.

use std::io::Write;

use pocketshop_core::{Price, ProductId};
use pocketshop_storefront::{Result, Storefront};
use pocketshop_storefront::models::cart::LineKey;

use super::product;

/// Add one unit of a catalog product.
///
/// Options the product does not offer are logged and kept as entered.
///
/// # Errors
///
/// Returns an error if the product is unknown or the cart cannot be saved.
pub fn add(
    shop: &mut Storefront,
    id: ProductId,
    color: Option<&str>,
    size: Option<&str>,
) -> Result<()> {
    let product = product(shop, id)?;
    if color.is_some_and(|c| !product.offers_color(c)) {
        tracing::warn!(%id, ?color, "Product does not list this color");
    }
    if size.is_some_and(|s| !product.offers_size(s)) {
        tracing::warn!(%id, ?size, "Product does not list this size");
    }
    shop.cart_mut().add_line(&product, color, size)?;
    Ok(())
}

/// Remove a product from the cart: one variant if an option is given,
/// otherwise every variant.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn remove(
    shop: &mut Storefront,
    id: ProductId,
    color: Option<&str>,
    size: Option<&str>,
) -> Result<()> {
    let removed = if color.is_some() || size.is_some() {
        usize::from(shop.cart_mut().remove_variant(&LineKey::new(id, color, size))?)
    } else {
        shop.cart_mut().remove_line(id)?
    };
    if removed == 0 {
        tracing::warn!(%id, "Nothing to remove");
    }
    Ok(())
}

/// Overwrite a product's quantity.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn set(
    shop: &mut Storefront,
    id: ProductId,
    quantity: i64,
    color: Option<&str>,
    size: Option<&str>,
) -> Result<()> {
    let changed = if color.is_some() || size.is_some() {
        usize::from(
            shop.cart_mut()
                .set_variant_quantity(&LineKey::new(id, color, size), quantity)?,
        )
    } else {
        shop.cart_mut().set_quantity(id, quantity)?
    };
    if changed == 0 {
        tracing::warn!(%id, "Product is not in the cart");
    }
    Ok(())
}

/// Print the cart with totals, previewing `coupon` if given.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn show(
    shop: &mut Storefront,
    coupon: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    if shop.cart().is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    for line in shop.cart().lines() {
        let variant = line
            .variant_label()
            .map(|label| format!(" ({label})"))
            .unwrap_or_default();
        writeln!(
            out,
            "{:>3} x {}{} @ {} = {}",
            line.quantity,
            line.name,
            variant,
            line.price,
            line.line_total()
        )?;
    }

    let count = shop.cart().count();
    let summary = shop.checkout().quote(coupon);
    writeln!(out)?;
    writeln!(out, "Items:    {count}")?;
    writeln!(out, "Subtotal: {}", summary.subtotal)?;
    if summary.discount > Price::ZERO {
        writeln!(out, "Discount: -{}", summary.discount)?;
    }
    if summary.shipping == Price::ZERO {
        writeln!(out, "Shipping: FREE")?;
    } else {
        writeln!(out, "Shipping: {}", summary.shipping)?;
    }
    writeln!(out, "Total:    {}", summary.total)?;
    Ok(())
}

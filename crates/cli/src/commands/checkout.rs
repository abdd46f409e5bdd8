//! Checkout and order history commands.

use std::io::Write;

use pocketshop_storefront::{Result, Storefront};
use pocketshop_storefront::models::order::ShippingAddress;

/// Place an order for the cart.
///
/// # Errors
///
/// Returns an error if checkout is rejected or a write fails.
pub async fn place(
    shop: &mut Storefront,
    address: ShippingAddress,
    coupon: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let delay = shop.config().checkout.payment_delay;
    if !delay.is_zero() {
        writeln!(out, "Processing payment...")?;
        out.flush()?;
    }

    let receipt = shop.checkout().place_order(address, coupon).await?;

    writeln!(out, "Order {}", receipt.order.id)?;
    writeln!(out, "  Items:    {}", receipt.order.item_count())?;
    writeln!(out, "  Subtotal: {}", receipt.summary.subtotal)?;
    writeln!(out, "  Discount: {}", receipt.summary.discount)?;
    writeln!(out, "  Shipping: {}", receipt.summary.shipping)?;
    writeln!(out, "  Total:    {}", receipt.order.total)?;
    Ok(())
}

/// Print the signed-in account's orders.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the history cannot be read.
pub fn history(shop: &mut Storefront, out: &mut impl Write) -> Result<()> {
    let orders = shop.checkout().order_history()?;
    if orders.is_empty() {
        writeln!(out, "No orders yet")?;
        return Ok(());
    }
    for order in orders {
        writeln!(
            out,
            "{}  {}  {:<10}  {:>3} items  {}",
            order.date.format("%Y-%m-%d %H:%M"),
            order.id,
            order.status.to_string(),
            order.item_count(),
            order.total
        )?;
    }
    Ok(())
}

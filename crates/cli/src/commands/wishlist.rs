//! Wishlist commands.

use std::io::Write;

use pocketshop_core::ProductId;
use pocketshop_storefront::{Result, Storefront};
use pocketshop_storefront::models::wishlist::WishlistItem;

use super::product;

/// Save a catalog product.
///
/// # Errors
///
/// Returns an error if the product is unknown or the wishlist cannot be saved.
pub fn add(shop: &mut Storefront, id: ProductId) -> Result<()> {
    let item = WishlistItem::from(&product(shop, id)?);
    shop.wishlist_mut().add(item)?;
    Ok(())
}

/// Save or forget a catalog product.
///
/// # Errors
///
/// Returns an error if the product is unknown or the wishlist cannot be saved.
pub fn toggle(shop: &mut Storefront, id: ProductId) -> Result<()> {
    let item = WishlistItem::from(&product(shop, id)?);
    shop.wishlist_mut().toggle(item)?;
    Ok(())
}

/// Print saved products.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn show(shop: &Storefront, out: &mut impl Write) -> Result<()> {
    let wishlist = shop.wishlist();
    if wishlist.count() == 0 {
        writeln!(out, "Your wishlist is empty")?;
        return Ok(());
    }
    for item in wishlist.items() {
        writeln!(
            out,
            "{:>4}  {:<38} {:<12} {:>9}",
            item.id.to_string(),
            item.name,
            item.category.as_str(),
            item.price.to_string()
        )?;
    }
    Ok(())
}

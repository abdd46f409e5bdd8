//! Account commands.

use std::io::Write;

use pocketshop_storefront::models::account::ProfileUpdate;
use pocketshop_storefront::{AppError, Result, Storefront};

/// Print the signed-in account.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn whoami(shop: &Storefront, out: &mut impl Write) -> Result<()> {
    match shop.accounts().current() {
        Some(account) => {
            writeln!(out, "{} <{}>", account.name, account.email)?;
            writeln!(out, "Loyalty points: {}", account.loyalty_points)?;
            writeln!(
                out,
                "Member since:   {}",
                account.created_at.format("%Y-%m-%d")
            )?;
        }
        None => writeln!(out, "Not signed in")?,
    }
    Ok(())
}

/// Change the signed-in account's display name.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a blank name, `AppError::Unauthorized`
/// without a session, or an error if the update cannot be saved.
pub fn rename(shop: &mut Storefront, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name cannot be blank".to_string()));
    }
    shop.accounts_mut()
        .update_profile(&ProfileUpdate::name(name))?
        .ok_or_else(|| AppError::Unauthorized("Please login first".to_string()))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pocketshop_storefront::config::StorefrontConfig;
    use pocketshop_storefront::events::Notifier;
    use pocketshop_storefront::storage::MemoryStore;

    use super::*;

    fn shop() -> Storefront {
        Storefront::open(
            StorefrontConfig::default(),
            Arc::new(MemoryStore::new()),
            Notifier::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_rename_rejects_blank_name() {
        let err = rename(&mut shop(), "   ").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.user_message(), "Name cannot be blank");
    }

    #[test]
    fn test_rename_requires_session() {
        let err = rename(&mut shop(), "Ada").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_whoami_without_session() {
        let mut out = Vec::new();
        whoami(&shop(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Not signed in\n");
    }
}

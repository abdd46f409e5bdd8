//! Cart store.
//!
//! Holds the cart lines in memory and writes the full cart through to the
//! `cart` key on every mutation. Totals are derived on read.

use std::sync::Arc;

use tracing::instrument;

use pocketshop_core::{Price, ProductId};

use crate::events::{CartEvent, Notifier};
use crate::models::cart::{CartItemInput, CartLine, LineKey};
use crate::models::product::Product;
use crate::storage::{self, KeyValueStore, StorageError, keys};

/// Whether an add created a line or bumped an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    QuantityUpdated { quantity: u32 },
}

/// The shopping cart.
pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
    notifier: Notifier,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the persisted cart cannot be read or decoded.
    pub fn load(store: Arc<dyn KeyValueStore>, notifier: Notifier) -> Result<Self, StorageError> {
        let mut lines: Vec<CartLine> = storage::load_collection(store.as_ref(), keys::CART)?;
        let before = lines.len();
        lines.retain(|line| line.quantity > 0);
        if lines.len() != before {
            tracing::warn!(dropped = before - lines.len(), "Dropped zero-quantity cart lines");
        }
        let stored = lines.len();
        let lines = merge_lines(lines);
        if lines.len() != stored {
            tracing::warn!(merged = stored - lines.len(), "Merged cart lines sharing a key");
        }
        tracing::debug!(lines = lines.len(), "Loaded cart");
        Ok(Self {
            store,
            notifier,
            lines,
        })
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `Σ price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// `Σ quantity` over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add one unit of `product` with the given options.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    pub fn add_line(
        &mut self,
        product: &Product,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<AddOutcome, StorageError> {
        self.add_item(CartItemInput::from_product(product, color, size))
    }

    /// Add one unit of a pre-built item snapshot.
    ///
    /// An existing line with the same (id, color, size) gains one unit;
    /// otherwise a new line with quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub fn add_item(&mut self, item: CartItemInput) -> Result<AddOutcome, StorageError> {
        let key = item.key();
        let product_id = item.id;

        let outcome = if let Some(line) = self.lines.iter_mut().find(|l| l.matches(&key)) {
            line.quantity = line.quantity.saturating_add(1);
            AddOutcome::QuantityUpdated {
                quantity: line.quantity,
            }
        } else {
            self.lines.push(CartLine::from_input(item));
            AddOutcome::Added
        };

        self.persist()?;
        match outcome {
            AddOutcome::Added => self.notifier.emit(CartEvent::Added { product_id }),
            AddOutcome::QuantityUpdated { quantity } => {
                self.notifier.emit(CartEvent::QuantityUpdated {
                    product_id,
                    quantity,
                });
            }
        }
        Ok(outcome)
    }

    /// Remove every line for `id`, whatever its options.
    ///
    /// Returns the number of lines removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove_line(&mut self, id: ProductId) -> Result<usize, StorageError> {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        let removed = before - self.lines.len();

        self.persist()?;
        if removed > 0 {
            self.notifier.emit(CartEvent::Removed { product_id: id });
        }
        Ok(removed)
    }

    /// Remove the single line with exactly this identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove_variant(&mut self, key: &LineKey) -> Result<bool, StorageError> {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(key));
        let removed = before != self.lines.len();

        self.persist()?;
        if removed {
            self.notifier.emit(CartEvent::Removed { product_id: key.id });
        }
        Ok(removed)
    }

    /// Set the quantity of every line for `id`.
    ///
    /// A quantity of zero or less removes the lines instead. Returns the
    /// number of lines touched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> Result<usize, StorageError> {
        let Some(quantity) = positive_quantity(quantity) else {
            return self.remove_line(id);
        };

        let mut touched = 0;
        for line in self.lines.iter_mut().filter(|line| line.id == id) {
            line.quantity = quantity;
            touched += 1;
        }

        self.persist()?;
        Ok(touched)
    }

    /// Set the quantity of the line with exactly this identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn set_variant_quantity(
        &mut self,
        key: &LineKey,
        quantity: i64,
    ) -> Result<bool, StorageError> {
        let Some(quantity) = positive_quantity(quantity) else {
            return self.remove_variant(key);
        };

        let Some(line) = self.lines.iter_mut().find(|line| line.matches(key)) else {
            return Ok(false);
        };
        line.quantity = quantity;

        self.persist()?;
        Ok(true)
    }

    /// Empty the cart and erase its persisted record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the persisted cart cannot be removed.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.lines.clear();
        self.store.remove(keys::CART)?;
        self.notifier.emit(CartEvent::Cleared);
        Ok(())
    }

    fn persist(&self) -> Result<(), StorageError> {
        storage::save_json(self.store.as_ref(), keys::CART, &self.lines)
    }
}

/// `Some(q)` for quantities of one or more, saturating at `u32::MAX`.
fn positive_quantity(quantity: i64) -> Option<u32> {
    if quantity <= 0 {
        return None;
    }
    Some(u32::try_from(quantity).unwrap_or(u32::MAX))
}

/// Normalize loaded lines and fold together any that share a key. The first
/// line keeps its snapshot; quantities are summed.
fn merge_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for mut line in lines {
        line.normalize_options();
        let key = line.key();
        match merged.iter_mut().find(|existing| existing.matches(&key)) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

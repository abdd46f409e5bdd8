//! Store notifications.
//!
//! Stores never talk to a UI. Each mutation emits a typed [`StoreEvent`]
//! through a [`Notifier`], and whoever renders toasts (or logs, or records
//! for assertions) subscribes an [`Observer`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use pocketshop_core::{OrderId, Price, ProductId};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Cart notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was created.
    Added { product_id: ProductId },
    /// An existing line's quantity changed.
    QuantityUpdated { product_id: ProductId, quantity: u32 },
    /// One or more lines were removed.
    Removed { product_id: ProductId },
    /// The cart was emptied.
    Cleared,
}

/// Wishlist notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistEvent {
    Added { product_id: ProductId },
    AlreadyPresent { product_id: ProductId },
    Removed { product_id: ProductId },
}

/// Account notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    Registered { email: String },
    RegistrationFailed { reason: String },
    LoggedIn { email: String },
    LoginFailed,
    LoggedOut,
    ProfileUpdated,
}

/// Checkout notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    CouponApplied { code: String, discount: Price },
    CouponRejected { code: String },
    /// Checkout was attempted without an active session.
    LoginRequired,
    OrderPlaced {
        order_id: OrderId,
        total: Price,
        points_earned: u64,
    },
}

/// Any notification a store can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Cart(CartEvent),
    Wishlist(WishlistEvent),
    Account(AccountEvent),
    Checkout(CheckoutEvent),
}

impl StoreEvent {
    /// Presentation severity for this event.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Wishlist(WishlistEvent::AlreadyPresent { .. }) => Severity::Info,
            Self::Account(AccountEvent::RegistrationFailed { .. } | AccountEvent::LoginFailed)
            | Self::Checkout(CheckoutEvent::CouponRejected { .. } | CheckoutEvent::LoginRequired) => {
                Severity::Error
            }
            _ => Severity::Success,
        }
    }

    /// Short user-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Cart(event) => match event {
                CartEvent::Added { .. } => "Added to cart".to_string(),
                CartEvent::QuantityUpdated { .. } => "Quantity updated in cart".to_string(),
                CartEvent::Removed { .. } => "Removed from cart".to_string(),
                CartEvent::Cleared => "Cart cleared".to_string(),
            },
            Self::Wishlist(event) => match event {
                WishlistEvent::Added { .. } => "Added to wishlist".to_string(),
                WishlistEvent::AlreadyPresent { .. } => "Already in wishlist".to_string(),
                WishlistEvent::Removed { .. } => "Removed from wishlist".to_string(),
            },
            Self::Account(event) => match event {
                AccountEvent::Registered { email } => format!("Account created for {email}"),
                AccountEvent::RegistrationFailed { reason } => {
                    format!("Registration failed: {reason}")
                }
                AccountEvent::LoggedIn { email } => format!("Welcome back, {email}"),
                AccountEvent::LoginFailed => "Invalid credentials".to_string(),
                AccountEvent::LoggedOut => "Logged out".to_string(),
                AccountEvent::ProfileUpdated => "Profile updated".to_string(),
            },
            Self::Checkout(event) => match event {
                CheckoutEvent::CouponApplied { discount, .. } => {
                    format!("Coupon applied! You save {discount}")
                }
                CheckoutEvent::CouponRejected { .. } => "Invalid coupon code".to_string(),
                CheckoutEvent::LoginRequired => "Please login to complete checkout".to_string(),
                CheckoutEvent::OrderPlaced { points_earned, .. } => {
                    format!("Order placed! You earned {points_earned} loyalty points!")
                }
            },
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<CartEvent> for StoreEvent {
    fn from(event: CartEvent) -> Self {
        Self::Cart(event)
    }
}

impl From<WishlistEvent> for StoreEvent {
    fn from(event: WishlistEvent) -> Self {
        Self::Wishlist(event)
    }
}

impl From<AccountEvent> for StoreEvent {
    fn from(event: AccountEvent) -> Self {
        Self::Account(event)
    }
}

impl From<CheckoutEvent> for StoreEvent {
    fn from(event: CheckoutEvent) -> Self {
        Self::Checkout(event)
    }
}

/// Receives store events.
pub trait Observer: Send + Sync {
    fn notify(&self, event: &StoreEvent);
}

/// Fans events out to subscribed observers.
///
/// Cheap to clone; clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct Notifier {
    observers: Arc<Mutex<Vec<Arc<dyn Observer>>>>,
}

impl Notifier {
    /// Create a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for all subsequent events.
    pub fn subscribe(&self, observer: Arc<dyn Observer>) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Deliver an event to every observer, in subscription order.
    pub fn emit(&self, event: impl Into<StoreEvent>) {
        let event = event.into();
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            observer.notify(&event);
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Notifier").field("observers", &count).finish()
    }
}

/// Logs every event through `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, event: &StoreEvent) {
        tracing::debug!(?event, severity = ?event.severity(), "{}", event.message());
    }
}

/// Keeps every event it sees, for tests and for callers that render a
/// batch of notifications after a command completes.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all recorded events.
    pub fn drain(&self) -> Vec<StoreEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, event: &StoreEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

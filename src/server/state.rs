//! Shared state for request handlers.

use std::sync::Arc;

use crate::auth::oauth::Installer;
use crate::discounts::DiscountStore;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The installation handshake.
    pub installer: Arc<Installer>,
    /// Discount storage.
    pub discounts: Arc<dyn DiscountStore>,
}

impl AppState {
    /// Creates handler state from its parts.
    #[must_use]
    pub fn new(installer: Arc<Installer>, discounts: Arc<dyn DiscountStore>) -> Self {
        Self {
            installer,
            discounts,
        }
    }
}

// Verify AppState is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppState>();
};

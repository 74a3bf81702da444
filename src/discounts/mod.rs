//! Discount records and their storage.
//!
//! Discounts are plain data; no eligibility or checkout logic lives here.
//! Storage sits behind the [`DiscountStore`] trait so the in-memory
//! [`InMemoryDiscountStore`] can be replaced with a database without
//! touching the HTTP layer.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "id": 1,
//!   "code": "SUMMER10",
//!   "amount": 10.0,
//!   "type": "percentage",
//!   "startDate": "2024-06-01T00:00:00Z",
//!   "endDate": "2024-08-31T23:59:59Z"
//! }
//! ```

mod store;

pub use store::{DiscountStore, InMemoryDiscountStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a discount's `amount` is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `amount` is a percentage in `(0, 100]`.
    Percentage,
    /// `amount` is a fixed currency amount.
    FixedAmount,
}

/// A stored discount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Store-assigned identifier.
    pub id: u64,
    /// Code customers enter at checkout.
    pub code: String,
    /// Percentage or currency amount, depending on `kind`.
    pub amount: f64,
    /// How `amount` is applied.
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    /// First moment the discount is valid.
    pub start_date: DateTime<Utc>,
    /// Last moment the discount is valid.
    pub end_date: DateTime<Utc>,
}

/// Request body for creating a discount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiscount {
    /// Code customers enter at checkout.
    pub code: String,
    /// Percentage or currency amount, depending on `kind`.
    pub amount: f64,
    /// How `amount` is applied.
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    /// First moment the discount is valid.
    pub start_date: DateTime<Utc>,
    /// Last moment the discount is valid.
    pub end_date: DateTime<Utc>,
}

impl NewDiscount {
    /// Checks the request before it reaches a store.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::Invalid`] if the code is blank, the amount
    /// is not positive, a percentage exceeds 100, or the date range is
    /// inverted.
    pub fn validate(&self) -> Result<(), DiscountError> {
        let invalid = |reason: &str| -> Result<(), DiscountError> {
            Err(DiscountError::Invalid {
                reason: reason.to_string(),
            })
        };

        if self.code.trim().is_empty() {
            return invalid("code must not be empty");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return invalid("amount must be a positive number");
        }
        if self.kind == DiscountKind::Percentage && self.amount > 100.0 {
            return invalid("percentage amount must not exceed 100");
        }
        if self.start_date > self.end_date {
            return invalid("startDate must not be after endDate");
        }
        Ok(())
    }

    /// Attaches a store-assigned id.
    #[must_use]
    pub fn into_discount(self, id: u64) -> Discount {
        Discount {
            id,
            code: self.code,
            amount: self.amount,
            kind: self.kind,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Errors from discount operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// The request failed validation.
    #[error("Invalid discount: {reason}")]
    Invalid {
        /// What was wrong with the request.
        reason: String,
    },

    /// The backing store failed.
    #[error("Discount storage error: {0}")]
    Storage(String),
}

// Verify discount types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Discount>();
    assert_send_sync::<NewDiscount>();
    assert_send_sync::<DiscountError>();
};

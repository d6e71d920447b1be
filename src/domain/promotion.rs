use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-boxed percentage discount identified by a unique code.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Promotion {
    pub id: Uuid,
    pub code: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub discount: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    /// `end_date` must be strictly after `start_date`.
    pub fn has_valid_time_range(&self) -> bool {
        self.end_date > self.start_date
    }

    pub fn has_valid_discount(&self) -> bool {
        self.discount >= Decimal::ZERO && self.discount <= Decimal::ONE_HUNDRED
    }

    /// Active flag set, valid range, and `at` within `[start_date, end_date)`.
    pub fn is_currently_active(&self, at: DateTime<Utc>) -> bool {
        self.is_active && self.has_valid_time_range() && at >= self.start_date && at < self.end_date
    }

    /// Percentage discount over a pre-discount total.
    pub fn discount_amount(&self, total: Decimal) -> Decimal {
        total * self.discount / Decimal::ONE_HUNDRED
    }
}

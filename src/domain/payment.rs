use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
    Refunded,
}

impl PaymentStatus {
    /// Fixed transition table. `pending` is the initial state; `failed`,
    /// `cancelled` and `refunded` are terminal.
    pub fn can_transition_to(self, to: PaymentStatus) -> bool {
        matches!(
            (self, to),
            (
                PaymentStatus::Pending,
                PaymentStatus::Paid | PaymentStatus::Failed | PaymentStatus::Cancelled
            ) | (PaymentStatus::Paid, PaymentStatus::Refunded)
        )
    }

    /// A payment may only be removed before money has moved.
    pub fn is_deletable(self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Failed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

/// Money owed for a set of room bookings.
///
/// `total_price` is derived, never set directly: it is recomputed through
/// [`calculate_total_price`] whenever `total`, `tax` or `discount` change.
/// The promotion discount is snapshotted at creation time and is not
/// recomputed if the promotion later changes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub status: PaymentStatus,
    pub total: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub description: String,
    pub customer_id: Uuid,
    pub promotion_id: Option<Uuid>,
    pub room_booking_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn recalculate_total_price(&mut self) {
        self.total_price = calculate_total_price(self.total, self.tax, self.discount);
    }
}

/// `total + tax - discount`, clamped to zero.
pub fn calculate_total_price(total: Decimal, tax: Decimal, discount: Decimal) -> Decimal {
    (total + tax - discount).max(Decimal::ZERO)
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Timeout,
}

impl TransactionStatus {
    /// `pending` is the only non-terminal state; it moves to exactly one
    /// terminal outcome.
    pub fn can_transition_to(self, to: TransactionStatus) -> bool {
        matches!(
            (self, to),
            (
                TransactionStatus::Pending,
                TransactionStatus::Success | TransactionStatus::Failed | TransactionStatus::Timeout
            )
        )
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    pub fn is_deletable(self) -> bool {
        matches!(self, TransactionStatus::Pending | TransactionStatus::Failed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Payment,
    Refund,
    PartialRefund,
}

/// A discrete settlement attempt against exactly one payment.
///
/// `processed_at` is stamped as part of the same update that moves the
/// transaction into a terminal state, never as a separate write.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub r#type: TransactionType,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub currency: String,
    pub payment_gateway: String,
    pub external_id: String,
    pub gateway_response: serde_json::Map<String, serde_json::Value>,
    pub failure_reason: String,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn mark_processed(&mut self, at: DateTime<Utc>) {
        self.processed_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_reaches_every_terminal() {
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Success));
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Failed));
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Timeout));
        assert!(!TransactionStatus::Pending.can_transition_to(TransactionStatus::Pending));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in [
            TransactionStatus::Success,
            TransactionStatus::Failed,
            TransactionStatus::Timeout,
        ] {
            assert!(from.is_terminal());
            for to in [
                TransactionStatus::Pending,
                TransactionStatus::Success,
                TransactionStatus::Failed,
                TransactionStatus::Timeout,
            ] {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
            }
        }
        assert!(!TransactionStatus::Pending.is_terminal());
    }

    #[test]
    fn test_deletable_statuses() {
        assert!(TransactionStatus::Pending.is_deletable());
        assert!(TransactionStatus::Failed.is_deletable());
        assert!(!TransactionStatus::Success.is_deletable());
        assert!(!TransactionStatus::Timeout.is_deletable());
    }

    #[test]
    fn test_type_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionType::PartialRefund).unwrap();
        assert_eq!(json, "\"partial_refund\"");
    }
}

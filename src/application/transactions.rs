use crate::domain::payment::PaymentStatus;
use crate::domain::ports::{PaymentStoreRef, TransactionStoreRef};
use crate::domain::query::{Page, PageQuery, TransactionFilter};
use crate::domain::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::error::{PaymentError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct CreateTransactionRequest {
    pub payment_id: Uuid,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub payment_gateway: String,
    #[serde(default)]
    pub external_id: String,
}

/// Patch-style update: absent fields are left untouched.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateTransactionRequest {
    pub status: Option<TransactionStatus>,
    pub external_id: Option<String>,
    pub gateway_response: Option<serde_json::Map<String, serde_json::Value>>,
    pub failure_reason: Option<String>,
}

/// Transaction lifecycle plus the settlement propagation that derives the
/// owning payment's status from transaction outcomes.
pub struct TransactionService {
    transaction_store: TransactionStoreRef,
    payment_store: PaymentStoreRef,
}

impl TransactionService {
    pub fn new(transaction_store: TransactionStoreRef, payment_store: PaymentStoreRef) -> Self {
        Self {
            transaction_store,
            payment_store,
        }
    }

    pub async fn get_transaction(&self, id: Uuid) -> Result<Transaction> {
        self.transaction_store
            .find(id)
            .await?
            .ok_or(PaymentError::NotFound("transaction"))
    }

    pub async fn get_transactions_by_payment(&self, payment_id: Uuid) -> Result<Vec<Transaction>> {
        self.transaction_store.find_by_payment(payment_id).await
    }

    pub async fn get_transactions_paginated(
        &self,
        query: &PageQuery,
        filter: &TransactionFilter,
    ) -> Result<Page<Transaction>> {
        let (transactions, total) = self.transaction_store.find_paginated(query, filter).await?;
        Ok(Page::new(transactions, total, query))
    }

    pub async fn create_transaction(&self, req: CreateTransactionRequest) -> Result<Transaction> {
        let payment = self
            .payment_store
            .find(req.payment_id)
            .await?
            .ok_or(PaymentError::NotFound("payment"))?;

        if req.amount < Decimal::ZERO {
            return Err(PaymentError::InvalidArgument(
                "amount must be non-negative".to_string(),
            ));
        }
        // Charges must settle the full outstanding price; refunds may be partial.
        if req.r#type == TransactionType::Payment && req.amount != payment.total_price {
            return Err(PaymentError::InvalidArgument(
                "transaction amount must match payment total price".to_string(),
            ));
        }

        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::nil(),
            payment_id: req.payment_id,
            r#type: req.r#type,
            status: TransactionStatus::Pending,
            amount: req.amount,
            currency: req.currency,
            payment_gateway: req.payment_gateway,
            external_id: req.external_id,
            gateway_response: serde_json::Map::new(),
            failure_reason: String::new(),
            processed_at: None,
            created_at: now,
            updated_at: now,
        };

        let transaction = self.transaction_store.insert(transaction).await?;
        tracing::debug!(transaction_id = %transaction.id, payment_id = %transaction.payment_id, "transaction created");
        Ok(transaction)
    }

    /// Applies a patch to an existing transaction. A status change is
    /// validated against the transition table; entering a terminal state
    /// stamps `processed_at` within the same write. After a committed status
    /// change the owning payment's status is recomputed as a best-effort
    /// post-commit step.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        req: UpdateTransactionRequest,
    ) -> Result<Transaction> {
        let mut transaction = self.get_transaction(id).await?;

        let mut status_changed = false;
        if let Some(status) = req.status {
            if !transaction.status.can_transition_to(status) {
                return Err(PaymentError::InvalidTransition {
                    from: transaction.status.to_string(),
                    to: status.to_string(),
                });
            }
            transaction.status = status;
            status_changed = true;
            if status.is_terminal() {
                transaction.mark_processed(Utc::now());
            }
        }
        if let Some(external_id) = req.external_id {
            transaction.external_id = external_id;
        }
        if let Some(gateway_response) = req.gateway_response {
            transaction.gateway_response = gateway_response;
        }
        if let Some(failure_reason) = req.failure_reason {
            transaction.failure_reason = failure_reason;
        }
        transaction.updated_at = Utc::now();

        self.transaction_store
            .update(id, transaction.clone())
            .await?;

        // The transaction update has already committed; propagation failures
        // are reported, never surfaced to this request.
        if status_changed {
            self.propagate_settlement(&transaction).await;
        }

        Ok(transaction)
    }

    /// Deletion is permitted only while `pending` or `failed`.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<()> {
        let transaction = self.get_transaction(id).await?;
        if !transaction.status.is_deletable() {
            return Err(PaymentError::Conflict(
                "cannot delete a processed transaction".to_string(),
            ));
        }
        self.transaction_store.delete(id).await
    }

    async fn propagate_settlement(&self, transaction: &Transaction) {
        if let Err(err) = self.apply_settlement(transaction).await {
            tracing::warn!(
                transaction_id = %transaction.id,
                payment_id = %transaction.payment_id,
                error = %err,
                "settlement propagation failed"
            );
        }
    }

    async fn apply_settlement(&self, transaction: &Transaction) -> Result<()> {
        let mut payment = self
            .payment_store
            .find(transaction.payment_id)
            .await?
            .ok_or(PaymentError::NotFound("payment"))?;

        let Some(target) = settlement_target(transaction.status, transaction.r#type) else {
            return Ok(());
        };
        if payment.status == target {
            return Ok(());
        }
        if !payment.status.can_transition_to(target) {
            // Best-effort side effect: an unreachable target (payment already
            // settled by a racing transaction) is skipped, not an error.
            tracing::debug!(
                payment_id = %payment.id,
                from = %payment.status,
                to = %target,
                "settlement skipped, transition not allowed"
            );
            return Ok(());
        }

        payment.status = target;
        payment.updated_at = Utc::now();
        self.payment_store.update(payment.id, payment).await
    }
}

/// Maps a transaction outcome to the payment status it implies, if any.
pub fn settlement_target(
    status: TransactionStatus,
    r#type: TransactionType,
) -> Option<PaymentStatus> {
    match (status, r#type) {
        (TransactionStatus::Success, TransactionType::Payment) => Some(PaymentStatus::Paid),
        (TransactionStatus::Success, TransactionType::Refund | TransactionType::PartialRefund) => {
            Some(PaymentStatus::Refunded)
        }
        (
            TransactionStatus::Failed | TransactionStatus::Timeout,
            TransactionType::Payment,
        ) => Some(PaymentStatus::Failed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_target_table() {
        assert_eq!(
            settlement_target(TransactionStatus::Success, TransactionType::Payment),
            Some(PaymentStatus::Paid)
        );
        assert_eq!(
            settlement_target(TransactionStatus::Success, TransactionType::Refund),
            Some(PaymentStatus::Refunded)
        );
        assert_eq!(
            settlement_target(TransactionStatus::Success, TransactionType::PartialRefund),
            Some(PaymentStatus::Refunded)
        );
        assert_eq!(
            settlement_target(TransactionStatus::Failed, TransactionType::Payment),
            Some(PaymentStatus::Failed)
        );
        assert_eq!(
            settlement_target(TransactionStatus::Timeout, TransactionType::Payment),
            Some(PaymentStatus::Failed)
        );
    }

    #[test]
    fn test_settlement_target_no_change() {
        assert_eq!(
            settlement_target(TransactionStatus::Failed, TransactionType::Refund),
            None
        );
        assert_eq!(
            settlement_target(TransactionStatus::Timeout, TransactionType::PartialRefund),
            None
        );
        assert_eq!(
            settlement_target(TransactionStatus::Pending, TransactionType::Payment),
            None
        );
    }
}

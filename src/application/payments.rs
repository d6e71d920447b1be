use crate::domain::payment::{Payment, PaymentStatus, calculate_total_price};
use crate::domain::ports::{PaymentStoreRef, PromotionStoreRef};
use crate::domain::query::{Page, PageQuery, PaymentFilter};
use crate::error::{PaymentError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct CreatePaymentRequest {
    pub total: Decimal,
    pub tax: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub customer_id: Uuid,
    #[serde(default)]
    pub room_booking_ids: Vec<Uuid>,
    #[serde(default)]
    pub description: String,
    pub promotion_id: Option<Uuid>,
}

/// Patch-style update: absent fields are left untouched.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdatePaymentRequest {
    pub status: Option<PaymentStatus>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
    pub total: Option<Decimal>,
    pub tax: Option<Decimal>,
}

/// Payment lifecycle operations: creation with promotion gating, validated
/// status transitions, and the guarded delete.
pub struct PaymentService {
    payment_store: PaymentStoreRef,
    promotion_store: PromotionStoreRef,
}

impl PaymentService {
    pub fn new(payment_store: PaymentStoreRef, promotion_store: PromotionStoreRef) -> Self {
        Self {
            payment_store,
            promotion_store,
        }
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<Payment> {
        self.payment_store
            .find(id)
            .await?
            .ok_or(PaymentError::NotFound("payment"))
    }

    pub async fn get_payments_by_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>> {
        self.payment_store.find_by_customer(customer_id).await
    }

    pub async fn get_payments_paginated(
        &self,
        query: &PageQuery,
        filter: &PaymentFilter,
    ) -> Result<Page<Payment>> {
        let (payments, total) = self.payment_store.find_paginated(query, filter).await?;
        Ok(Page::new(payments, total, query))
    }

    pub async fn create_payment(&self, req: CreatePaymentRequest) -> Result<Payment> {
        if req.total < Decimal::ZERO || req.tax < Decimal::ZERO {
            return Err(PaymentError::InvalidArgument(
                "total and tax must be non-negative".to_string(),
            ));
        }
        if req.currency.len() != 3 || !req.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PaymentError::InvalidArgument(
                "currency must be a 3-letter code".to_string(),
            ));
        }

        let now = Utc::now();
        let mut payment = Payment {
            id: Uuid::nil(),
            status: PaymentStatus::Pending,
            total: req.total,
            tax: req.tax,
            discount: Decimal::ZERO,
            total_price: Decimal::ZERO,
            currency: req.currency,
            payment_method: req.payment_method,
            description: req.description,
            customer_id: req.customer_id,
            promotion_id: None,
            room_booking_ids: req.room_booking_ids,
            created_at: now,
            updated_at: now,
        };

        if let Some(promotion_id) = req.promotion_id {
            payment.discount = self.apply_promotion(req.total, promotion_id).await?;
            payment.promotion_id = Some(promotion_id);
        }
        payment.recalculate_total_price();

        let payment = self.payment_store.insert(payment).await?;
        tracing::debug!(payment_id = %payment.id, status = %payment.status, "payment created");
        Ok(payment)
    }

    /// Gates discount application at payment creation.
    ///
    /// The returned amount is snapshotted onto the payment by the caller;
    /// it is not recomputed if the promotion later changes. Read-only.
    pub async fn apply_promotion(&self, total: Decimal, promotion_id: Uuid) -> Result<Decimal> {
        let promotion = self
            .promotion_store
            .find(promotion_id)
            .await?
            .ok_or(PaymentError::NotFound("promotion"))?;

        if !promotion.is_currently_active(Utc::now()) {
            return Err(PaymentError::InvalidArgument(
                "promotion is not active".to_string(),
            ));
        }

        Ok(promotion.discount_amount(total))
    }

    /// Applies a patch to an existing payment. A rejected status transition
    /// fails the whole request: no other field is applied.
    pub async fn update_payment(&self, id: Uuid, req: UpdatePaymentRequest) -> Result<Payment> {
        let mut payment = self.get_payment(id).await?;

        if let Some(status) = req.status {
            if !payment.status.can_transition_to(status) {
                return Err(PaymentError::InvalidTransition {
                    from: payment.status.to_string(),
                    to: status.to_string(),
                });
            }
            payment.status = status;
        }
        if let Some(payment_method) = req.payment_method {
            payment.payment_method = payment_method;
        }
        if let Some(description) = req.description {
            payment.description = description;
        }
        if req.total.is_some() || req.tax.is_some() {
            let total = req.total.unwrap_or(payment.total);
            let tax = req.tax.unwrap_or(payment.tax);
            if total < Decimal::ZERO || tax < Decimal::ZERO {
                return Err(PaymentError::InvalidArgument(
                    "total and tax must be non-negative".to_string(),
                ));
            }
            payment.total = total;
            payment.tax = tax;
            payment.total_price = calculate_total_price(total, tax, payment.discount);
        }
        payment.updated_at = Utc::now();

        self.payment_store.update(id, payment.clone()).await?;
        Ok(payment)
    }

    /// Deletion is permitted only while `pending` or `failed`; completed
    /// payments are never physically removed.
    pub async fn delete_payment(&self, id: Uuid) -> Result<()> {
        let payment = self.get_payment(id).await?;
        if !payment.status.is_deletable() {
            return Err(PaymentError::Conflict(
                "cannot delete a completed payment".to_string(),
            ));
        }
        self.payment_store.delete(id).await
    }
}

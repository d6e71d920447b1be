use crate::domain::payment::Payment;
use crate::domain::promotion::Promotion;
use crate::domain::query::{PageQuery, PaymentFilter, PromotionFilter, TransactionFilter};
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence port for payments.
///
/// `insert` assigns the id and timestamps and returns the stored aggregate.
/// `update` and `delete` fail with `NotFound` when no document matches,
/// distinctly from a generic `Dependency` failure.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Payment>>;
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>>;
    async fn find_paginated(
        &self,
        query: &PageQuery,
        filter: &PaymentFilter,
    ) -> Result<(Vec<Payment>, u64)>;
    async fn insert(&self, payment: Payment) -> Result<Payment>;
    async fn update(&self, id: Uuid, payment: Payment) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait PromotionStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Promotion>>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>>;
    async fn find_paginated(
        &self,
        query: &PageQuery,
        filter: &PromotionFilter,
    ) -> Result<(Vec<Promotion>, u64)>;
    async fn insert(&self, promotion: Promotion) -> Result<Promotion>;
    async fn update(&self, id: Uuid, promotion: Promotion) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Transaction>>;
    async fn find_by_payment(&self, payment_id: Uuid) -> Result<Vec<Transaction>>;
    async fn find_paginated(
        &self,
        query: &PageQuery,
        filter: &TransactionFilter,
    ) -> Result<(Vec<Transaction>, u64)>;
    async fn insert(&self, transaction: Transaction) -> Result<Transaction>;
    async fn update(&self, id: Uuid, transaction: Transaction) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub type PaymentStoreRef = Arc<dyn PaymentStore>;
pub type PromotionStoreRef = Arc<dyn PromotionStore>;
pub type TransactionStoreRef = Arc<dyn TransactionStore>;

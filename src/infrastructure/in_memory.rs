use crate::domain::payment::Payment;
use crate::domain::ports::{PaymentStore, PromotionStore, TransactionStore};
use crate::domain::promotion::Promotion;
use crate::domain::query::{
    PageQuery, PaymentFilter, PromotionFilter, SortDirection, TransactionFilter,
};
use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    if let Some(min) = min
        && value < min
    {
        return false;
    }
    if let Some(max) = max
        && value > max
    {
        return false;
    }
    true
}

fn search_term(query: &PageQuery) -> Option<&str> {
    query.search.as_deref().filter(|s| !s.is_empty())
}

fn paginate<T>(mut items: Vec<T>, query: &PageQuery) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let offset = query.offset().min(items.len());
    items.drain(..offset);
    items.truncate(query.limit());
    (items, total)
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// A thread-safe in-memory payment store.
///
/// Implements the full port contract including the filter, sort and
/// pagination semantics a document-store backend would provide. Suited for
/// tests and in-process embedding.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<Uuid, Payment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(payment: &Payment, search: Option<&str>, filter: &PaymentFilter) -> bool {
        if let Some(s) = search
            && !contains_ci(&payment.description, s)
            && !contains_ci(&payment.payment_method, s)
        {
            return false;
        }
        if let Some(status) = filter.status
            && payment.status != status
        {
            return false;
        }
        if let Some(customer_id) = filter.customer_id
            && payment.customer_id != customer_id
        {
            return false;
        }
        if let Some(method) = &filter.payment_method
            && !contains_ci(&payment.payment_method, method)
        {
            return false;
        }
        if let Some(currency) = &filter.currency
            && payment.currency != *currency
        {
            return false;
        }
        within(payment.total_price, filter.min_amount, filter.max_amount)
            && within(payment.created_at, filter.date_from, filter.date_to)
    }

    fn compare(a: &Payment, b: &Payment, sort_by: &str) -> Ordering {
        match sort_by {
            "updated_at" => a.updated_at.cmp(&b.updated_at),
            "total" => a.total.cmp(&b.total),
            "tax" => a.tax.cmp(&b.tax),
            "discount" => a.discount.cmp(&b.discount),
            "total_price" | "amount" => a.total_price.cmp(&b.total_price),
            "currency" => a.currency.cmp(&b.currency),
            "payment_method" => a.payment_method.cmp(&b.payment_method),
            _ => a.created_at.cmp(&b.created_at),
        }
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn find(&self, id: Uuid) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn find_paginated(
        &self,
        query: &PageQuery,
        filter: &PaymentFilter,
    ) -> Result<(Vec<Payment>, u64)> {
        let payments = self.payments.read().await;
        let mut matched: Vec<Payment> = payments
            .values()
            .filter(|p| Self::matches(p, search_term(query), filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| directed(Self::compare(a, b, &query.sort_by), query.sort_direction));
        Ok(paginate(matched, query))
    }

    async fn insert(&self, mut payment: Payment) -> Result<Payment> {
        payment.id = Uuid::new_v4();
        payment.created_at = Utc::now();
        payment.updated_at = payment.created_at;
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn update(&self, id: Uuid, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        match payments.get_mut(&id) {
            Some(existing) => {
                *existing = payment;
                Ok(())
            }
            None => Err(PaymentError::NotFound("payment")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments
            .remove(&id)
            .map(|_| ())
            .ok_or(PaymentError::NotFound("payment"))
    }
}

/// A thread-safe in-memory promotion store.
#[derive(Default, Clone)]
pub struct InMemoryPromotionStore {
    promotions: Arc<RwLock<HashMap<Uuid, Promotion>>>,
}

impl InMemoryPromotionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(promotion: &Promotion, search: Option<&str>, filter: &PromotionFilter) -> bool {
        if let Some(s) = search
            && !contains_ci(&promotion.code, s)
            && !contains_ci(&promotion.description, s)
        {
            return false;
        }
        if let Some(code) = &filter.code
            && !contains_ci(&promotion.code, code)
        {
            return false;
        }
        if let Some(is_active) = filter.is_active
            && promotion.is_active != is_active
        {
            return false;
        }
        within(promotion.discount, filter.min_discount, filter.max_discount)
            && within(promotion.start_date, filter.date_from, filter.date_to)
    }

    fn compare(a: &Promotion, b: &Promotion, sort_by: &str) -> Ordering {
        match sort_by {
            "updated_at" => a.updated_at.cmp(&b.updated_at),
            "start_date" => a.start_date.cmp(&b.start_date),
            "end_date" => a.end_date.cmp(&b.end_date),
            "discount" => a.discount.cmp(&b.discount),
            "code" => a.code.cmp(&b.code),
            _ => a.created_at.cmp(&b.created_at),
        }
    }
}

#[async_trait]
impl PromotionStore for InMemoryPromotionStore {
    async fn find(&self, id: Uuid) -> Result<Option<Promotion>> {
        let promotions = self.promotions.read().await;
        Ok(promotions.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>> {
        let promotions = self.promotions.read().await;
        Ok(promotions.values().find(|p| p.code == code).cloned())
    }

    async fn find_paginated(
        &self,
        query: &PageQuery,
        filter: &PromotionFilter,
    ) -> Result<(Vec<Promotion>, u64)> {
        let promotions = self.promotions.read().await;
        let mut matched: Vec<Promotion> = promotions
            .values()
            .filter(|p| Self::matches(p, search_term(query), filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| directed(Self::compare(a, b, &query.sort_by), query.sort_direction));
        Ok(paginate(matched, query))
    }

    async fn insert(&self, mut promotion: Promotion) -> Result<Promotion> {
        promotion.id = Uuid::new_v4();
        promotion.created_at = Utc::now();
        promotion.updated_at = promotion.created_at;
        let mut promotions = self.promotions.write().await;
        promotions.insert(promotion.id, promotion.clone());
        Ok(promotion)
    }

    async fn update(&self, id: Uuid, promotion: Promotion) -> Result<()> {
        let mut promotions = self.promotions.write().await;
        match promotions.get_mut(&id) {
            Some(existing) => {
                *existing = promotion;
                Ok(())
            }
            None => Err(PaymentError::NotFound("promotion")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut promotions = self.promotions.write().await;
        promotions
            .remove(&id)
            .map(|_| ())
            .ok_or(PaymentError::NotFound("promotion"))
    }
}

/// A thread-safe in-memory transaction store.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<Uuid, Transaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(tx: &Transaction, search: Option<&str>, filter: &TransactionFilter) -> bool {
        if let Some(s) = search
            && !contains_ci(&tx.external_id, s)
            && !contains_ci(&tx.payment_gateway, s)
            && !contains_ci(&tx.failure_reason, s)
        {
            return false;
        }
        if let Some(payment_id) = filter.payment_id
            && tx.payment_id != payment_id
        {
            return false;
        }
        if let Some(status) = filter.status
            && tx.status != status
        {
            return false;
        }
        if let Some(r#type) = filter.r#type
            && tx.r#type != r#type
        {
            return false;
        }
        if let Some(gateway) = &filter.payment_gateway
            && !contains_ci(&tx.payment_gateway, gateway)
        {
            return false;
        }
        if let Some(currency) = &filter.currency
            && tx.currency != *currency
        {
            return false;
        }
        within(tx.amount, filter.min_amount, filter.max_amount)
            && within(tx.created_at, filter.date_from, filter.date_to)
    }

    fn compare(a: &Transaction, b: &Transaction, sort_by: &str) -> Ordering {
        match sort_by {
            "updated_at" => a.updated_at.cmp(&b.updated_at),
            "amount" => a.amount.cmp(&b.amount),
            "currency" => a.currency.cmp(&b.currency),
            "payment_gateway" => a.payment_gateway.cmp(&b.payment_gateway),
            "external_id" => a.external_id.cmp(&b.external_id),
            _ => a.created_at.cmp(&b.created_at),
        }
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find(&self, id: Uuid) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&id).cloned())
    }

    async fn find_by_payment(&self, payment_id: Uuid) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .filter(|t| t.payment_id == payment_id)
            .cloned()
            .collect())
    }

    async fn find_paginated(
        &self,
        query: &PageQuery,
        filter: &TransactionFilter,
    ) -> Result<(Vec<Transaction>, u64)> {
        let transactions = self.transactions.read().await;
        let mut matched: Vec<Transaction> = transactions
            .values()
            .filter(|t| Self::matches(t, search_term(query), filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| directed(Self::compare(a, b, &query.sort_by), query.sort_direction));
        Ok(paginate(matched, query))
    }

    async fn insert(&self, mut transaction: Transaction) -> Result<Transaction> {
        transaction.id = Uuid::new_v4();
        transaction.created_at = Utc::now();
        transaction.updated_at = transaction.created_at;
        let mut transactions = self.transactions.write().await;
        transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn update(&self, id: Uuid, transaction: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(&id) {
            Some(existing) => {
                *existing = transaction;
                Ok(())
            }
            None => Err(PaymentError::NotFound("transaction")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions
            .remove(&id)
            .map(|_| ())
            .ok_or(PaymentError::NotFound("transaction"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn payment(total_price: Decimal, method: &str) -> Payment {
        Payment {
            id: Uuid::nil(),
            status: PaymentStatus::Pending,
            total: total_price,
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total_price,
            currency: "USD".to_string(),
            payment_method: method.to_string(),
            description: String::new(),
            customer_id: Uuid::new_v4(),
            promotion_id: None,
            room_booking_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_identity() {
        let store = InMemoryPaymentStore::new();
        let stored = store.insert(payment(dec!(10.0), "card")).await.unwrap();
        assert_ne!(stored.id, Uuid::nil());

        let found = store.find(stored.id).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(store.find(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryPaymentStore::new();
        let result = store.update(Uuid::new_v4(), payment(dec!(1.0), "card")).await;
        assert!(matches!(result, Err(PaymentError::NotFound("payment"))));

        let result = store.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(PaymentError::NotFound("payment"))));
    }

    #[tokio::test]
    async fn test_paginated_filter_and_sort() {
        let store = InMemoryPaymentStore::new();
        store.insert(payment(dec!(50.0), "card")).await.unwrap();
        store.insert(payment(dec!(150.0), "card")).await.unwrap();
        store.insert(payment(dec!(250.0), "bank_transfer")).await.unwrap();

        let filter = PaymentFilter {
            min_amount: Some(dec!(100.0)),
            ..Default::default()
        };
        let query = PageQuery::default().with_sort("total_price", SortDirection::Asc);
        let (items, total) = store.find_paginated(&query, &filter).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(items[0].total_price, dec!(150.0));
        assert_eq!(items[1].total_price, dec!(250.0));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let store = InMemoryPaymentStore::new();
        store.insert(payment(dec!(10.0), "CreditCard")).await.unwrap();
        store.insert(payment(dec!(20.0), "bank_transfer")).await.unwrap();

        let query = PageQuery::default().with_search("credit");
        let (items, total) = store
            .find_paginated(&query, &PaymentFilter::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].payment_method, "CreditCard");
    }

    #[tokio::test]
    async fn test_page_slicing() {
        let store = InMemoryPaymentStore::new();
        for i in 1..=25 {
            store
                .insert(payment(Decimal::from(i), "card"))
                .await
                .unwrap();
        }

        let query = PageQuery::new(3, 10).with_sort("total_price", SortDirection::Asc);
        let (items, total) = store
            .find_paginated(&query, &PaymentFilter::default())
            .await
            .unwrap();
        assert_eq!(total, 25);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].total_price, Decimal::from(21));
    }

    #[tokio::test]
    async fn test_promotion_find_by_code() {
        let store = InMemoryPromotionStore::new();
        let promo = Promotion {
            id: Uuid::nil(),
            code: "SAVE20".to_string(),
            description: String::new(),
            start_date: Utc::now(),
            end_date: Utc::now() + chrono::Duration::days(1),
            discount: dec!(20),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert(promo).await.unwrap();

        assert!(store.find_by_code("SAVE20").await.unwrap().is_some());
        assert!(store.find_by_code("save20").await.unwrap().is_none());
        assert!(store.find_by_code("OTHER").await.unwrap().is_none());
    }
}

#![allow(dead_code)]

use booking_payments::application::payments::{CreatePaymentRequest, PaymentService};
use booking_payments::application::promotions::{CreatePromotionRequest, PromotionService};
use booking_payments::application::transactions::{CreateTransactionRequest, TransactionService};
use booking_payments::domain::ports::{PaymentStoreRef, PromotionStoreRef, TransactionStoreRef};
use booking_payments::domain::transaction::TransactionType;
use booking_payments::infrastructure::in_memory::{
    InMemoryPaymentStore, InMemoryPromotionStore, InMemoryTransactionStore,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub struct TestContext {
    pub payments: PaymentService,
    pub promotions: PromotionService,
    pub transactions: TransactionService,
    pub payment_store: PaymentStoreRef,
}

pub fn setup() -> TestContext {
    let payment_store: PaymentStoreRef = Arc::new(InMemoryPaymentStore::new());
    let promotion_store: PromotionStoreRef = Arc::new(InMemoryPromotionStore::new());
    let transaction_store: TransactionStoreRef = Arc::new(InMemoryTransactionStore::new());

    TestContext {
        payments: PaymentService::new(payment_store.clone(), promotion_store.clone()),
        promotions: PromotionService::new(promotion_store),
        transactions: TransactionService::new(transaction_store, payment_store.clone()),
        payment_store,
    }
}

pub fn payment_request(total: Decimal, tax: Decimal) -> CreatePaymentRequest {
    CreatePaymentRequest {
        total,
        tax,
        currency: "USD".to_string(),
        payment_method: "credit_card".to_string(),
        customer_id: Uuid::new_v4(),
        room_booking_ids: vec![Uuid::new_v4()],
        description: "room booking".to_string(),
        promotion_id: None,
    }
}

/// A promotion valid from yesterday to tomorrow.
pub fn current_promotion_request(code: &str, discount: Decimal) -> CreatePromotionRequest {
    let now = Utc::now();
    CreatePromotionRequest {
        code: code.to_string(),
        description: String::new(),
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(1),
        discount,
        is_active: true,
    }
}

pub fn charge_request(payment_id: Uuid, amount: Decimal) -> CreateTransactionRequest {
    CreateTransactionRequest {
        payment_id,
        r#type: TransactionType::Payment,
        amount,
        currency: "USD".to_string(),
        payment_gateway: "stripe".to_string(),
        external_id: "ext-1".to_string(),
    }
}

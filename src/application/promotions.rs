use crate::domain::ports::PromotionStoreRef;
use crate::domain::promotion::Promotion;
use crate::domain::query::{Page, PageQuery, PromotionFilter};
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct CreatePromotionRequest {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub discount: Decimal,
    pub is_active: bool,
}

/// Patch-style update: absent fields are left untouched.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdatePromotionRequest {
    pub code: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub discount: Option<Decimal>,
    pub is_active: Option<bool>,
}

pub struct PromotionService {
    promotion_store: PromotionStoreRef,
}

impl PromotionService {
    pub fn new(promotion_store: PromotionStoreRef) -> Self {
        Self { promotion_store }
    }

    pub async fn get_promotion(&self, id: Uuid) -> Result<Promotion> {
        self.promotion_store
            .find(id)
            .await?
            .ok_or(PaymentError::NotFound("promotion"))
    }

    pub async fn get_promotions_paginated(
        &self,
        query: &PageQuery,
        filter: &PromotionFilter,
    ) -> Result<Page<Promotion>> {
        let (promotions, total) = self.promotion_store.find_paginated(query, filter).await?;
        Ok(Page::new(promotions, total, query))
    }

    pub async fn create_promotion(&self, req: CreatePromotionRequest) -> Result<Promotion> {
        let now = Utc::now();
        let promotion = Promotion {
            id: Uuid::nil(),
            code: req.code,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            discount: req.discount,
            is_active: req.is_active,
            created_at: now,
            updated_at: now,
        };
        self.validate(&promotion)?;

        // Uniqueness is find-then-insert; a racing writer between the check
        // and the insert can still slip through (see DESIGN.md).
        if self
            .promotion_store
            .find_by_code(&promotion.code)
            .await?
            .is_some()
        {
            return Err(PaymentError::Conflict(
                "promotion code already exists".to_string(),
            ));
        }

        let promotion = self.promotion_store.insert(promotion).await?;
        tracing::debug!(promotion_id = %promotion.id, code = %promotion.code, "promotion created");
        Ok(promotion)
    }

    pub async fn update_promotion(
        &self,
        id: Uuid,
        req: UpdatePromotionRequest,
    ) -> Result<Promotion> {
        let mut promotion = self.get_promotion(id).await?;

        if let Some(code) = req.code {
            if code != promotion.code
                && self.promotion_store.find_by_code(&code).await?.is_some()
            {
                return Err(PaymentError::Conflict(
                    "promotion code already exists".to_string(),
                ));
            }
            promotion.code = code;
        }
        if let Some(description) = req.description {
            promotion.description = description;
        }
        if let Some(start_date) = req.start_date {
            promotion.start_date = start_date;
        }
        if let Some(end_date) = req.end_date {
            promotion.end_date = end_date;
        }
        if let Some(discount) = req.discount {
            promotion.discount = discount;
        }
        if let Some(is_active) = req.is_active {
            promotion.is_active = is_active;
        }
        self.validate(&promotion)?;
        promotion.updated_at = Utc::now();

        self.promotion_store.update(id, promotion.clone()).await?;
        Ok(promotion)
    }

    pub async fn delete_promotion(&self, id: Uuid) -> Result<()> {
        self.get_promotion(id).await?;
        self.promotion_store.delete(id).await
    }

    fn validate(&self, promotion: &Promotion) -> Result<()> {
        if !promotion.has_valid_time_range() {
            return Err(PaymentError::InvalidArgument(
                "end date must be after start date".to_string(),
            ));
        }
        if !promotion.has_valid_discount() {
            return Err(PaymentError::InvalidArgument(
                "discount must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

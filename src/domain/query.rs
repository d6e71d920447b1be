use crate::domain::payment::PaymentStatus;
use crate::domain::transaction::{TransactionStatus, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Pagination, search and sort parameters shared by every paginated find.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PageQuery {
    /// 1-based page number.
    pub page_number: u32,
    pub page_size: u32,
    /// Free-text search over each entity's designated string fields.
    pub search: Option<String>,
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            sort_by: "created_at".to_string(),
            sort_direction: SortDirection::Desc,
        }
    }
}

impl PageQuery {
    /// Clamps the page number to at least 1 and the page size to
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = sort_by.into();
        self.sort_direction = direction;
        self
    }

    pub fn offset(&self) -> usize {
        // A page number of 0 can arrive via deserialization, bypassing `new`.
        self.page_number.saturating_sub(1) as usize * self.page_size as usize
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, query: &PageQuery) -> Self {
        let total_pages = (total as f64 / query.page_size as f64).ceil() as u32;
        Self {
            items,
            total,
            page_number: query.page_number,
            page_size: query.page_size,
            total_pages,
            has_next: query.page_number < total_pages,
            has_previous: query.page_number > 1,
        }
    }
}

/// Exact-match, substring and range filters for payment finds.
/// Amount bounds apply to `total_price`; date bounds to `created_at`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub customer_id: Option<Uuid>,
    pub payment_method: Option<String>,
    pub currency: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// Amount bounds apply to `amount`; date bounds to `created_at`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TransactionFilter {
    pub payment_id: Option<Uuid>,
    pub status: Option<TransactionStatus>,
    pub r#type: Option<TransactionType>,
    pub payment_gateway: Option<String>,
    pub currency: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// Discount bounds apply to the percentage; date bounds to `start_date`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PromotionFilter {
    pub code: Option<String>,
    pub is_active: Option<bool>,
    pub min_discount: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

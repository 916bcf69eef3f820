//! Sorting and pagination of ship listings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Ship;
use crate::error::{FleetError, Result};

/// Default page index.
pub const DEFAULT_PAGE_NUMBER: u32 = 0;
/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Sort key for ship listings. Sorting is always ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipOrder {
    /// By identifier.
    #[default]
    Id,
    /// By speed.
    Speed,
    /// By production date.
    Date,
    /// By rating.
    Rating,
}

impl ShipOrder {
    /// Compare two ships by this order's key.
    pub fn compare(self, left: &Ship, right: &Ship) -> Ordering {
        match self {
            Self::Id => left.id.cmp(&right.id),
            Self::Speed => left.speed.total_cmp(&right.speed),
            Self::Date => left.prod_date.cmp(&right.prod_date),
            Self::Rating => left.rating.total_cmp(&right.rating),
        }
    }
}

/// A zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
    order: ShipOrder,
}

impl PageRequest {
    /// Build a page request; the page size must be at least one.
    pub fn new(page_number: u32, page_size: u32, order: ShipOrder) -> Result<Self> {
        if page_size == 0 {
            return Err(FleetError::invalid("page size must be at least 1"));
        }
        Ok(Self {
            page_number,
            page_size,
            order,
        })
    }

    /// Zero-based page index.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Maximum number of items on the page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Sort key.
    pub fn order(&self) -> ShipOrder {
        self.order
    }

    /// Number of items preceding the page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            order: ShipOrder::default(),
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Zero-based page index.
    pub page_number: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total number of matching items across all pages.
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Build a page from its content and the request that produced it.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page_number: request.page_number(),
            page_size: request.page_size(),
            total_elements,
        }
    }
}

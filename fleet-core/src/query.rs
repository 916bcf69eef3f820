//! Listing parameters as they travel in a query string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::ShipType;
use crate::error::{FleetError, Result};
use crate::filter::{
    ShipFilter, filter_by_crew_size, filter_by_date, filter_by_name, filter_by_planet,
    filter_by_rating, filter_by_ship_type, filter_by_speed, filter_by_usage,
};
use crate::paging::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, PageRequest, ShipOrder};

/// Optional filter, sort and paging parameters for ship listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipQuery {
    /// Substring of the ship name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Substring of the planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Exact ship type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Earliest production date, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    /// Latest production date, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
    /// Used flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Minimum speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    /// Maximum speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Minimum crew size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_crew_size: Option<i32>,
    /// Minimum rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Maximum rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
    /// Sort key, `ID` by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ShipOrder>,
    /// Zero-based page index, 0 by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Page size, 3 by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ShipQuery {
    /// Combine every filter dimension into one conjunctive filter.
    pub fn filter(&self) -> Result<ShipFilter> {
        let after = self.after.map(timestamp_from_millis).transpose()?;
        let before = self.before.map(timestamp_from_millis).transpose()?;
        let min_speed = finite_bound("minSpeed", self.min_speed)?;
        let max_speed = finite_bound("maxSpeed", self.max_speed)?;
        let min_rating = finite_bound("minRating", self.min_rating)?;
        let max_rating = finite_bound("maxRating", self.max_rating)?;
        Ok([
            filter_by_name(self.name.as_deref()),
            filter_by_planet(self.planet.as_deref()),
            filter_by_ship_type(self.ship_type),
            filter_by_date(after, before),
            filter_by_usage(self.is_used),
            filter_by_speed(min_speed, max_speed),
            filter_by_crew_size(self.min_crew_size, self.max_crew_size),
            filter_by_rating(min_rating, max_rating),
        ]
        .into_iter()
        .collect())
    }

    /// Page request with defaults applied.
    pub fn page_request(&self) -> Result<PageRequest> {
        PageRequest::new(
            self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.order.unwrap_or_default(),
        )
    }
}

fn finite_bound(name: &str, bound: Option<f64>) -> Result<Option<f64>> {
    match bound {
        Some(value) if !value.is_finite() => Err(FleetError::invalid(format!(
            "{name} must be a finite number"
        ))),
        bound => Ok(bound),
    }
}

/// Convert epoch milliseconds into a UTC timestamp.
pub fn timestamp_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| FleetError::invalid(format!("timestamp out of range: {millis}")))
}

//! Filter predicates over ship records.
//!
//! Each `filter_by_*` function turns one optional query dimension into a
//! [`ShipPredicate`]. Absent inputs produce [`ShipPredicate::Any`]. Callers
//! combine predicates into a conjunctive [`ShipFilter`], which storage
//! backends either evaluate in memory or translate into their query language.

use chrono::{DateTime, TimeDelta, Timelike, Utc};

use crate::domain::{Ship, ShipType};

/// A one- or two-sided inclusive range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interval<T> {
    /// `value >= min`.
    AtLeast(T),
    /// `value <= max`.
    AtMost(T),
    /// `min <= value <= max`.
    Between(T, T),
}

impl<T: PartialOrd> Interval<T> {
    /// Build an interval from optional bounds; `None` when both are absent.
    pub fn from_bounds(min: Option<T>, max: Option<T>) -> Option<Self> {
        match (min, max) {
            (None, None) => None,
            (Some(min), None) => Some(Self::AtLeast(min)),
            (None, Some(max)) => Some(Self::AtMost(max)),
            (Some(min), Some(max)) => Some(Self::Between(min, max)),
        }
    }

    /// Whether `value` lies inside the interval.
    pub fn contains(&self, value: &T) -> bool {
        match self {
            Self::AtLeast(min) => value >= min,
            Self::AtMost(max) => value <= max,
            Self::Between(min, max) => value >= min && value <= max,
        }
    }
}

/// A single matching condition on one ship column.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipPredicate {
    /// Matches every ship.
    Any,
    /// Case-sensitive substring match on the name.
    NameContains(String),
    /// Case-sensitive substring match on the planet.
    PlanetContains(String),
    /// Exact ship type.
    ShipTypeIs(ShipType),
    /// Exact used flag.
    UsedIs(bool),
    /// Production date range.
    ProdDate(Interval<DateTime<Utc>>),
    /// Speed range.
    Speed(Interval<f64>),
    /// Crew size range.
    CrewSize(Interval<i32>),
    /// Rating range.
    Rating(Interval<f64>),
}

impl ShipPredicate {
    /// Evaluate the predicate against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Self::Any => true,
            Self::NameContains(needle) => ship.name.contains(needle.as_str()),
            Self::PlanetContains(needle) => ship.planet.contains(needle.as_str()),
            Self::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            Self::UsedIs(used) => ship.used == *used,
            Self::ProdDate(range) => range.contains(&ship.prod_date),
            Self::Speed(range) => range.contains(&ship.speed),
            Self::CrewSize(range) => range.contains(&ship.crew_size),
            Self::Rating(range) => range.contains(&ship.rating),
        }
    }
}

/// Conjunction of ship predicates. An empty filter matches every ship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipFilter {
    predicates: Vec<ShipPredicate>,
}

impl ShipFilter {
    /// A filter that matches every ship.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a predicate to the conjunction.
    pub fn and(mut self, predicate: ShipPredicate) -> Self {
        if predicate != ShipPredicate::Any {
            self.predicates.push(predicate);
        }
        self
    }

    /// The constraining predicates, in insertion order.
    pub fn predicates(&self) -> &[ShipPredicate] {
        &self.predicates
    }

    /// Whether every predicate matches the ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(ship))
    }
}

impl FromIterator<ShipPredicate> for ShipFilter {
    fn from_iter<I: IntoIterator<Item = ShipPredicate>>(iter: I) -> Self {
        iter.into_iter().fold(Self::all(), Self::and)
    }
}

/// Ships whose name contains `name`.
pub fn filter_by_name(name: Option<&str>) -> ShipPredicate {
    name.map_or(ShipPredicate::Any, |name| {
        ShipPredicate::NameContains(name.to_string())
    })
}

/// Ships whose planet contains `planet`.
pub fn filter_by_planet(planet: Option<&str>) -> ShipPredicate {
    planet.map_or(ShipPredicate::Any, |planet| {
        ShipPredicate::PlanetContains(planet.to_string())
    })
}

/// Ships of the given type.
pub fn filter_by_ship_type(ship_type: Option<ShipType>) -> ShipPredicate {
    ship_type.map_or(ShipPredicate::Any, ShipPredicate::ShipTypeIs)
}

/// Ships whose used flag equals `used`.
pub fn filter_by_usage(used: Option<bool>) -> ShipPredicate {
    used.map_or(ShipPredicate::Any, ShipPredicate::UsedIs)
}

/// Ships produced within `[after, before]`.
///
/// When both bounds are given the upper bound is replaced by
/// [`adjusted_upper_bound`].
pub fn filter_by_date(
    after: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
) -> ShipPredicate {
    let before = match (after, before) {
        (Some(_), Some(before)) => Some(adjusted_upper_bound(before)),
        (_, before) => before,
    };
    Interval::from_bounds(after, before).map_or(ShipPredicate::Any, ShipPredicate::ProdDate)
}

/// Ships whose speed lies within `[min, max]`.
pub fn filter_by_speed(min: Option<f64>, max: Option<f64>) -> ShipPredicate {
    Interval::from_bounds(min, max).map_or(ShipPredicate::Any, ShipPredicate::Speed)
}

/// Ships whose crew size lies within `[min, max]`.
pub fn filter_by_crew_size(min: Option<i32>, max: Option<i32>) -> ShipPredicate {
    Interval::from_bounds(min, max).map_or(ShipPredicate::Any, ShipPredicate::CrewSize)
}

/// Ships whose rating lies within `[min, max]`.
pub fn filter_by_rating(min: Option<f64>, max: Option<f64>) -> ShipPredicate {
    Interval::from_bounds(min, max).map_or(ShipPredicate::Any, ShipPredicate::Rating)
}

/// Upper bound used by a two-sided date range.
///
/// Clears the hour of the half-day together with minutes, seconds and
/// sub-seconds, then steps back one second. A morning instant therefore maps
/// to 23:59:59 of the previous day and an afternoon instant to 11:59:59 of
/// the same day.
pub fn adjusted_upper_bound(before: DateTime<Utc>) -> DateTime<Utc> {
    let time = before.time();
    let elapsed = TimeDelta::seconds(i64::from(
        (time.hour() % 12) * 3600 + time.minute() * 60 + time.second(),
    )) + TimeDelta::nanoseconds(i64::from(time.nanosecond()));
    before
        .checked_sub_signed(elapsed + TimeDelta::seconds(1))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

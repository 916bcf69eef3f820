//! Domain entities for the fleet registry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FleetError;

/// Storage-assigned ship identifier.
pub type ShipId = i64;

/// Closed set of ship classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipType {
    /// Cargo and passenger transport.
    Transport,
    /// Armed vessel.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// All ship types, in declaration order.
    pub const ALL: [ShipType; 3] = [Self::Transport, Self::Military, Self::Merchant];

    /// Wire and storage name of the ship type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "TRANSPORT",
            Self::Military => "MILITARY",
            Self::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = FleetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| FleetError::invalid(format!("unknown ship type: {value}")))
    }
}

/// A stored ship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Storage-assigned identifier.
    pub id: ShipId,
    /// Ship name, 1 to 50 characters.
    pub name: String,
    /// Home planet, 1 to 50 characters.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production date; the year lies in 2800..=3019.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had a previous owner.
    #[serde(rename = "isUsed", alias = "used")]
    pub used: bool,
    /// Cruise speed in [0.01, 0.99].
    pub speed: f64,
    /// Crew size in [1, 9999].
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl Ship {
    /// Calendar year of the production date.
    pub fn prod_year(&self) -> i32 {
        self.prod_date.year()
    }
}

/// A validated ship that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production date.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub used: bool,
    /// Cruise speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Attach a storage-assigned identifier.
    pub fn with_id(self, id: ShipId) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Caller-supplied ship fields for create and partial edit.
///
/// Absent fields are required on create and left untouched on edit. The
/// rating is never accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipDraft {
    /// Ship name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Home planet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production date as epoch milliseconds on the wire.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Used flag; defaults to `false` on create.
    #[serde(
        default,
        rename = "isUsed",
        alias = "used",
        skip_serializing_if = "Option::is_none"
    )]
    pub used: Option<bool>,
    /// Cruise speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Crew size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::{Ship, ShipDraft, ShipType};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ship_type_parses_case_insensitively() {
        assert_eq!("military".parse::<ShipType>(), Ok(ShipType::Military));
        assert_eq!(" MERCHANT ".parse::<ShipType>(), Ok(ShipType::Merchant));
        assert!("shuttle".parse::<ShipType>().is_err());
    }

    #[test]
    fn ship_serializes_with_wire_names() {
        let ship = Ship {
            id: 7,
            name: "Orion III".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Merchant,
            prod_date: Utc.with_ymd_and_hms(2995, 1, 1, 0, 0, 0).unwrap(),
            used: true,
            speed: 0.82,
            crew_size: 617,
            rating: 1.31,
        };
        let value = serde_json::to_value(&ship).expect("serialize ship");

        assert_eq!(value["shipType"], "MERCHANT");
        assert_eq!(value["isUsed"], true);
        assert_eq!(value["crewSize"], 617);
        assert_eq!(
            value["prodDate"],
            ship.prod_date.timestamp_millis(),
            "prodDate travels as epoch millis"
        );
    }

    #[test]
    fn draft_accepts_partial_payloads() {
        let draft: ShipDraft =
            serde_json::from_str(r#"{"name":"Daedalus","used":false,"prodDate":null}"#)
                .expect("parse draft");

        assert_eq!(draft.name.as_deref(), Some("Daedalus"));
        assert_eq!(draft.used, Some(false));
        assert_eq!(draft.prod_date, None);
        assert_eq!(draft.speed, None);
    }

    #[test]
    fn draft_ignores_caller_supplied_rating() {
        let draft: ShipDraft =
            serde_json::from_str(r#"{"speed":0.5,"rating":99.0,"id":3}"#).expect("parse draft");

        assert_eq!(draft.speed, Some(0.5));
        assert_eq!(draft, ShipDraft {
            speed: Some(0.5),
            ..ShipDraft::default()
        });
    }
}

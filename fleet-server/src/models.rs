//! Database models for the fleet registry server.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use fleet_core::{FleetError, NewShip, Ship, ShipId};

use crate::schema::ships;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = ships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// Ship database record.
pub struct ShipRow {
    /// Ship identifier.
    pub id: ShipId,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type name.
    pub ship_type: String,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Cruise speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl TryFrom<ShipRow> for Ship {
    type Error = FleetError;

    fn try_from(row: ShipRow) -> Result<Self, Self::Error> {
        let ship_type = row.ship_type.parse().map_err(|_| {
            FleetError::Storage(format!(
                "ship {} has unknown type {}",
                row.id, row.ship_type
            ))
        })?;
        Ok(Ship {
            id: row.id,
            name: row.name,
            planet: row.planet,
            ship_type,
            prod_date: row.prod_date,
            used: row.is_used,
            speed: row.speed,
            crew_size: row.crew_size,
            rating: row.rating,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ships)]
/// Insertable and updatable ship columns.
pub struct ShipChanges {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type name.
    pub ship_type: String,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Cruise speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl From<NewShip> for ShipChanges {
    fn from(ship: NewShip) -> Self {
        Self {
            name: ship.name,
            planet: ship.planet,
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<Ship> for ShipChanges {
    fn from(ship: Ship) -> Self {
        Self {
            name: ship.name,
            planet: ship.planet,
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

//! Ship lifecycle orchestration.

use chrono::Datelike;
use log::{debug, info};

use crate::domain::{NewShip, Ship, ShipDraft, ShipId};
use crate::error::{FleetError, Result};
use crate::filter::ShipFilter;
use crate::paging::{Page, PageRequest};
use crate::rating::compute_rating;
use crate::repository::ShipRepository;
use crate::validator::{ValidationMode, validate};

/// Validates, rates and persists ships through an injected repository.
#[derive(Debug, Clone)]
pub struct ShipService<R> {
    repository: R,
}

impl<R: ShipRepository> ShipService<R> {
    /// Create a service on top of `repository`.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Validate and store a new ship.
    pub fn create(&self, draft: ShipDraft) -> Result<Ship> {
        validate(&draft, ValidationMode::Create).inspect_err(log_rejection)?;
        let ship = new_ship(draft)?;
        let stored = self.repository.insert(ship)?;
        info!("created ship {} ({})", stored.id, stored.name);
        Ok(stored)
    }

    /// Fetch a ship by identifier.
    pub fn get(&self, id: ShipId) -> Result<Ship> {
        self.repository
            .find_by_id(id)?
            .ok_or(FleetError::NotFound(id))
    }

    /// Overwrite the supplied fields of a stored ship and re-rate it.
    pub fn edit(&self, id: ShipId, draft: ShipDraft) -> Result<Ship> {
        validate(&draft, ValidationMode::Edit).inspect_err(log_rejection)?;
        let mut ship = self.get(id)?;
        merge(&mut ship, draft);
        ship.rating = compute_rating(ship.speed, ship.used, ship.prod_year());
        let stored = self.repository.update(ship)?;
        info!("edited ship {}", stored.id);
        Ok(stored)
    }

    /// Remove a stored ship.
    pub fn delete(&self, id: ShipId) -> Result<()> {
        if !self.repository.exists_by_id(id)? {
            return Err(FleetError::NotFound(id));
        }
        self.repository.delete_by_id(id)?;
        info!("deleted ship {id}");
        Ok(())
    }

    /// Every ship matching the filter.
    pub fn list(&self, filter: &ShipFilter) -> Result<Vec<Ship>> {
        self.repository.find_all(filter)
    }

    /// One sorted page of ships matching the filter.
    pub fn list_page(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Page<Ship>> {
        self.repository.find_page(filter, page)
    }

    /// Number of ships matching the filter.
    pub fn count(&self, filter: &ShipFilter) -> Result<u64> {
        self.repository.count(filter)
    }
}

/// Parse a raw identifier.
///
/// `None`, the empty string and the literal `"0"` are rejected, as is anything
/// that is not a 64-bit integer.
pub fn parse_id(raw: Option<&str>) -> Result<ShipId> {
    let raw = match raw {
        None | Some("") | Some("0") => return Err(FleetError::invalid("Incorrect ID")),
        Some(raw) => raw,
    };
    raw.parse::<ShipId>()
        .map_err(|_| FleetError::invalid(format!("ID is not a number: {raw}")))
}

fn new_ship(draft: ShipDraft) -> Result<NewShip> {
    let (
        Some(name),
        Some(planet),
        Some(ship_type),
        Some(prod_date),
        Some(speed),
        Some(crew_size),
    ) = (
        draft.name,
        draft.planet,
        draft.ship_type,
        draft.prod_date,
        draft.speed,
        draft.crew_size,
    )
    else {
        return Err(FleetError::invalid("Params are bad"));
    };
    let used = draft.used.unwrap_or(false);
    let mut ship = NewShip {
        name,
        planet,
        ship_type,
        prod_date,
        used,
        speed,
        crew_size,
        rating: 0.0,
    };
    ship.rating = compute_rating(speed, used, ship.prod_date.year());
    Ok(ship)
}

fn merge(ship: &mut Ship, draft: ShipDraft) {
    if let Some(name) = draft.name {
        ship.name = name;
    }
    if let Some(planet) = draft.planet {
        ship.planet = planet;
    }
    if let Some(ship_type) = draft.ship_type {
        ship.ship_type = ship_type;
    }
    if let Some(prod_date) = draft.prod_date {
        ship.prod_date = prod_date;
    }
    if let Some(speed) = draft.speed {
        ship.speed = speed;
    }
    if let Some(used) = draft.used {
        ship.used = used;
    }
    if let Some(crew_size) = draft.crew_size {
        ship.crew_size = crew_size;
    }
}

fn log_rejection(err: &FleetError) {
    debug!("rejected ship draft: {err}");
}

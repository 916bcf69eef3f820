//! Storage abstraction for ship records.

use std::sync::Arc;

use crate::domain::{NewShip, Ship, ShipId};
use crate::error::Result;
use crate::filter::ShipFilter;
use crate::paging::{Page, PageRequest};

/// Blocking access to persisted ships.
#[cfg_attr(test, mockall::automock)]
pub trait ShipRepository {
    /// Whether a ship is stored under `id`.
    fn exists_by_id(&self, id: ShipId) -> Result<bool>;
    /// Fetch a ship by identifier.
    fn find_by_id(&self, id: ShipId) -> Result<Option<Ship>>;
    /// Store a new ship and return it with its assigned identifier.
    fn insert(&self, ship: NewShip) -> Result<Ship>;
    /// Overwrite an existing ship and return the stored record.
    fn update(&self, ship: Ship) -> Result<Ship>;
    /// Remove a ship.
    fn delete_by_id(&self, id: ShipId) -> Result<()>;
    /// Every ship matching the filter, ordered by identifier.
    fn find_all(&self, filter: &ShipFilter) -> Result<Vec<Ship>>;
    /// One sorted page of ships matching the filter.
    fn find_page(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Page<Ship>>;
    /// Number of ships matching the filter.
    fn count(&self, filter: &ShipFilter) -> Result<u64>;
}

impl<R: ShipRepository + ?Sized> ShipRepository for Arc<R> {
    fn exists_by_id(&self, id: ShipId) -> Result<bool> {
        (**self).exists_by_id(id)
    }

    fn find_by_id(&self, id: ShipId) -> Result<Option<Ship>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn update(&self, ship: Ship) -> Result<Ship> {
        (**self).update(ship)
    }

    fn delete_by_id(&self, id: ShipId) -> Result<()> {
        (**self).delete_by_id(id)
    }

    fn find_all(&self, filter: &ShipFilter) -> Result<Vec<Ship>> {
        (**self).find_all(filter)
    }

    fn find_page(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Page<Ship>> {
        (**self).find_page(filter, page)
    }

    fn count(&self, filter: &ShipFilter) -> Result<u64> {
        (**self).count(filter)
    }
}

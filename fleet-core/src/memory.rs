//! In-process ship repository.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{NewShip, Ship, ShipId};
use crate::error::{FleetError, Result};
use crate::filter::ShipFilter;
use crate::paging::{Page, PageRequest};
use crate::repository::ShipRepository;

#[derive(Debug, Default)]
struct Store {
    last_id: ShipId,
    ships: BTreeMap<ShipId, Ship>,
}

/// Ship repository backed by a mutex-guarded map.
///
/// Identifiers are assigned sequentially from 1 and never reused.
#[derive(Debug, Default)]
pub struct InMemoryShipRepository {
    store: Mutex<Store>,
}

impl InMemoryShipRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| FleetError::Storage("ship store unavailable".to_string()))
    }

    fn matching(&self, filter: &ShipFilter) -> Result<Vec<Ship>> {
        let store = self.lock()?;
        Ok(store
            .ships
            .values()
            .filter(|ship| filter.matches(ship))
            .cloned()
            .collect())
    }
}

impl ShipRepository for InMemoryShipRepository {
    fn exists_by_id(&self, id: ShipId) -> Result<bool> {
        Ok(self.lock()?.ships.contains_key(&id))
    }

    fn find_by_id(&self, id: ShipId) -> Result<Option<Ship>> {
        Ok(self.lock()?.ships.get(&id).cloned())
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut store = self.lock()?;
        store.last_id += 1;
        let ship = ship.with_id(store.last_id);
        store.ships.insert(ship.id, ship.clone());
        Ok(ship)
    }

    fn update(&self, ship: Ship) -> Result<Ship> {
        let mut store = self.lock()?;
        match store.ships.get_mut(&ship.id) {
            Some(stored) => {
                *stored = ship.clone();
                Ok(ship)
            }
            None => Err(FleetError::NotFound(ship.id)),
        }
    }

    fn delete_by_id(&self, id: ShipId) -> Result<()> {
        self.lock()?.ships.remove(&id);
        Ok(())
    }

    fn find_all(&self, filter: &ShipFilter) -> Result<Vec<Ship>> {
        self.matching(filter)
    }

    fn find_page(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Page<Ship>> {
        let mut ships = self.matching(filter)?;
        let total = ships.len() as u64;
        let order = page.order();
        ships.sort_by(|left, right| order.compare(left, right));
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = ships
            .into_iter()
            .skip(offset)
            .take(page.page_size() as usize)
            .collect();
        Ok(Page::new(content, page, total))
    }

    fn count(&self, filter: &ShipFilter) -> Result<u64> {
        let store = self.lock()?;
        Ok(store
            .ships
            .values()
            .filter(|ship| filter.matches(ship))
            .count() as u64)
    }
}

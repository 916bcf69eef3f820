//! PostgreSQL ship repository.

use diesel::dsl::{exists, sql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use fleet_core::{
    FleetError, Interval, NewShip, Page, PageRequest, Result, Ship, ShipFilter, ShipId,
    ShipOrder, ShipPredicate, ShipRepository,
};

use crate::db::DbPool;
use crate::models::{ShipChanges, ShipRow};
use crate::schema::ships;

/// A boolean SQL condition over the `ships` table.
type ShipCondition = Box<dyn BoxableExpression<ships::table, Pg, SqlType = Bool>>;

/// Ship repository backed by a diesel connection pool.
#[derive(Clone)]
pub struct PgShipRepository {
    pool: DbPool,
}

impl PgShipRepository {
    /// Create a repository using connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>>
    {
        self.pool.get().map_err(FleetError::storage)
    }
}

impl ShipRepository for PgShipRepository {
    fn exists_by_id(&self, id: ShipId) -> Result<bool> {
        let mut conn = self.conn()?;
        diesel::select(exists(ships::table.find(id)))
            .get_result::<bool>(&mut conn)
            .map_err(FleetError::storage)
    }

    fn find_by_id(&self, id: ShipId) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRow::as_select())
            .first::<ShipRow>(&mut conn)
            .optional()
            .map_err(FleetError::storage)?
            .map(Ship::try_from)
            .transpose()
    }

    fn insert(&self, ship: NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let changes = ShipChanges::from(ship);
        let row = diesel::insert_into(ships::table)
            .values(&changes)
            .returning(ShipRow::as_returning())
            .get_result::<ShipRow>(&mut conn)
            .map_err(FleetError::storage)?;
        Ship::try_from(row)
    }

    fn update(&self, ship: Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        let id = ship.id;
        let changes = ShipChanges::from(ship);
        diesel::update(ships::table.find(id))
            .set(&changes)
            .returning(ShipRow::as_returning())
            .get_result::<ShipRow>(&mut conn)
            .optional()
            .map_err(FleetError::storage)?
            .ok_or(FleetError::NotFound(id))
            .and_then(Ship::try_from)
    }

    fn delete_by_id(&self, id: ShipId) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(FleetError::storage)?;
        Ok(())
    }

    fn find_all(&self, filter: &ShipFilter) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .filter(filter_condition(filter))
            .order(ships::id.asc())
            .select(ShipRow::as_select())
            .load::<ShipRow>(&mut conn)
            .map_err(FleetError::storage)?
            .into_iter()
            .map(Ship::try_from)
            .collect()
    }

    fn find_page(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Page<Ship>> {
        let limit = i64::from(page.page_size());
        let offset = i64::try_from(page.offset())
            .map_err(|_| FleetError::invalid("page number out of range"))?;
        let mut conn = self.conn()?;

        let total: i64 = ships::table
            .filter(filter_condition(filter))
            .count()
            .get_result(&mut conn)
            .map_err(FleetError::storage)?;

        let query = ships::table
            .filter(filter_condition(filter))
            .select(ShipRow::as_select())
            .into_boxed();
        let query = match page.order() {
            ShipOrder::Id => query.order(ships::id.asc()),
            ShipOrder::Speed => query.order((ships::speed.asc(), ships::id.asc())),
            ShipOrder::Date => query.order((ships::prod_date.asc(), ships::id.asc())),
            ShipOrder::Rating => query.order((ships::rating.asc(), ships::id.asc())),
        };
        let content = query
            .limit(limit)
            .offset(offset)
            .load::<ShipRow>(&mut conn)
            .map_err(FleetError::storage)?
            .into_iter()
            .map(Ship::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(content, page, total.max(0) as u64))
    }

    fn count(&self, filter: &ShipFilter) -> Result<u64> {
        let mut conn = self.conn()?;
        let total: i64 = ships::table
            .filter(filter_condition(filter))
            .count()
            .get_result(&mut conn)
            .map_err(FleetError::storage)?;
        Ok(total.max(0) as u64)
    }
}

/// Translate a conjunctive filter into one SQL condition.
pub fn filter_condition(filter: &ShipFilter) -> ShipCondition {
    filter
        .predicates()
        .iter()
        .map(predicate_condition)
        .reduce(|left, right| -> ShipCondition { Box::new(left.and(right)) })
        .unwrap_or_else(always)
}

macro_rules! interval_condition {
    ($column:expr, $range:expr) => {
        match $range {
            Interval::AtLeast(min) => Box::new($column.ge(min)) as ShipCondition,
            Interval::AtMost(max) => Box::new($column.le(max)),
            Interval::Between(min, max) => Box::new($column.between(min, max)),
        }
    };
}

fn predicate_condition(predicate: &ShipPredicate) -> ShipCondition {
    match predicate {
        ShipPredicate::Any => always(),
        ShipPredicate::NameContains(needle) => Box::new(ships::name.like(contains_pattern(needle))),
        ShipPredicate::PlanetContains(needle) => {
            Box::new(ships::planet.like(contains_pattern(needle)))
        }
        ShipPredicate::ShipTypeIs(ship_type) => Box::new(ships::ship_type.eq(ship_type.as_str())),
        ShipPredicate::UsedIs(used) => Box::new(ships::is_used.eq(*used)),
        ShipPredicate::ProdDate(range) => interval_condition!(ships::prod_date, *range),
        ShipPredicate::Speed(range) => interval_condition!(ships::speed, *range),
        ShipPredicate::CrewSize(range) => interval_condition!(ships::crew_size, *range),
        ShipPredicate::Rating(range) => interval_condition!(ships::rating, *range),
    }
}

fn always() -> ShipCondition {
    Box::new(sql::<Bool>("TRUE"))
}

/// `LIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#![deny(missing_docs)]
//! Fleet registry core library.
//!
//! Ship validation, rating, filter predicates and the service that ties them
//! to a pluggable repository. Storage and transport live in the server and
//! CLI crates.

pub mod domain;
pub mod error;
pub mod filter;
pub mod memory;
pub mod paging;
pub mod query;
pub mod rating;
pub mod repository;
pub mod service;
pub mod validator;

pub use domain::{NewShip, Ship, ShipDraft, ShipId, ShipType};
pub use error::{FleetError, Result};
pub use filter::{
    Interval, ShipFilter, ShipPredicate, adjusted_upper_bound, filter_by_crew_size,
    filter_by_date, filter_by_name, filter_by_planet, filter_by_rating, filter_by_ship_type,
    filter_by_speed, filter_by_usage,
};
pub use memory::InMemoryShipRepository;
pub use paging::{Page, PageRequest, ShipOrder};
pub use query::{ShipQuery, timestamp_from_millis};
pub use rating::compute_rating;
pub use repository::ShipRepository;
pub use service::{ShipService, parse_id};
pub use validator::{ValidationMode, validate};

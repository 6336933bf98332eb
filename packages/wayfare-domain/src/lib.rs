pub mod flight;
pub mod hash;
pub mod identity;
pub mod pricing;
pub mod reference;
pub mod sort;
pub mod stay;
pub mod time_serde;

pub use flight::{Flight, FlightOffer, ServiceClass};
pub use hash::{ContentHash, pick, stable_hash};
pub use identity::Identity;
pub use reference::{Airline, Airplane, Airport, Stay};
pub use sort::{FlightSortKey, SortDirection, StaySortKey};
pub use stay::{ServiceLevel, StayOffer};

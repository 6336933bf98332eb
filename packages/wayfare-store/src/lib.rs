mod error;
pub mod models;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin};

use uuid::Uuid;

use crate::models::{FlightRecord, OfferClass, OfferRecord, SeenUpdate};
use wayfare_domain::{ContentHash, Flight, FlightOffer, StayOffer};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Version carried by an entity that has never been persisted. Durable rows
/// start one above it and increment on every versioned update.
pub const INITIAL_VERSION: i64 = 0;

/// Storage contract consumed by the search engine.
///
/// Each `create_*` call is atomic: either every value in the batch is
/// durable afterwards or none is, and a duplicate content hash anywhere in
/// the batch fails the whole call with a conflict. Assigned ids are returned
/// in input order.
pub trait OfferStore
where
	Self: Send + Sync,
{
	fn find_flights_by_hash<'a>(
		&'a self,
		hashes: &'a [ContentHash],
	) -> BoxFuture<'a, Result<Vec<FlightRecord>>>;

	fn create_flights<'a>(&'a self, flights: &'a [Flight]) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	fn find_flight_offers_by_hash<'a>(
		&'a self,
		user_id: &'a str,
		hashes: &'a [ContentHash],
	) -> BoxFuture<'a, Result<Vec<OfferRecord>>>;

	fn create_flight_offers<'a>(
		&'a self,
		offers: &'a [FlightOffer],
	) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	fn find_stay_offers_by_hash<'a>(
		&'a self,
		user_id: &'a str,
		hashes: &'a [ContentHash],
	) -> BoxFuture<'a, Result<Vec<OfferRecord>>>;

	fn create_stay_offers<'a>(
		&'a self,
		offers: &'a [StayOffer],
	) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	/// Applies a version-checked update; the stored version must equal
	/// `update.expected_version` or the call fails with a conflict. Returns
	/// the new version.
	fn update_offer_versioned(
		&self,
		class: OfferClass,
		update: SeenUpdate,
	) -> BoxFuture<'_, Result<i64>>;

	fn reload_offer<'a>(
		&'a self,
		class: OfferClass,
		user_id: &'a str,
		id: Uuid,
	) -> BoxFuture<'a, Result<OfferRecord>>;
}

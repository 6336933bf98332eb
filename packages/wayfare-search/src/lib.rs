mod pipeline;
mod reconcile;
pub mod retry;
pub mod search_flights;
pub mod search_stays;
mod variants;

use std::sync::Arc;

use wayfare_config::Config;
use wayfare_domain::{Airline, Airplane, Airport, SortDirection, Stay};
use wayfare_store::{BoxFuture, OfferStore};

pub use retry::with_version_retry;
pub use search_flights::{
	FlightFilter, FlightNarrowing, FlightSearchRequest, FlightSearchResponse, TopOffer, TripType,
};
pub use search_stays::{StayFilter, StayNarrowing, StaySearchRequest, StaySearchResponse};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Reference data required for generation is empty or unresolvable. The
	/// search fails rather than returning an empty-but-successful page.
	#[error("Required reference data is not available: {what}.")]
	DataUnavailable { what: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("An offer on the page references a flight that was not reconciled.")]
	UnreconciledFlight,
	#[error(transparent)]
	Store(#[from] wayfare_store::Error),
}

/// Read-mostly reference data, cached by the supplying layer.
pub trait ReferenceSource<T>
where
	Self: Send + Sync,
{
	fn list_all(&self) -> BoxFuture<'_, wayfare_store::Result<Vec<T>>>;

	fn list_near<'a>(
		&'a self,
		city: &'a str,
		limit: u32,
	) -> BoxFuture<'a, wayfare_store::Result<Vec<T>>>;
}

#[derive(Clone)]
pub struct ReferenceData {
	pub airports: Arc<dyn ReferenceSource<Airport>>,
	pub airlines: Arc<dyn ReferenceSource<Airline>>,
	pub airplanes: Arc<dyn ReferenceSource<Airplane>>,
	pub stays: Arc<dyn ReferenceSource<Stay>>,
}
impl ReferenceData {
	pub fn new(
		airports: Arc<dyn ReferenceSource<Airport>>,
		airlines: Arc<dyn ReferenceSource<Airline>>,
		airplanes: Arc<dyn ReferenceSource<Airplane>>,
		stays: Arc<dyn ReferenceSource<Stay>>,
	) -> Self {
		Self { airports, airlines, airplanes, stays }
	}
}

/// The offer search engine. Stateless between requests; every search call
/// builds its own candidate set, so concurrent searches share nothing but
/// the store.
pub struct OfferEngine {
	pub cfg: Config,
	pub store: Arc<dyn OfferStore>,
	pub reference: ReferenceData,
}
impl OfferEngine {
	pub fn new(cfg: Config, store: Arc<dyn OfferStore>, reference: ReferenceData) -> Self {
		Self { cfg, store, reference }
	}
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct SortSpec<K> {
	pub key: K,
	#[serde(default)]
	pub descending: bool,
}
impl<K> SortSpec<K> {
	pub fn direction(&self) -> SortDirection {
		if self.descending { SortDirection::Descending } else { SortDirection::Ascending }
	}
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PageRequest {
	pub skip: u32,
	pub take: Option<u32>,
}

pub(crate) fn required<T>(items: Vec<T>, what: &str) -> Result<Vec<T>> {
	if items.is_empty() {
		return Err(Error::DataUnavailable { what: what.to_string() });
	}

	Ok(items)
}

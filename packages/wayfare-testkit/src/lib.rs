use std::{
	collections::HashSet,
	sync::{Mutex, MutexGuard},
};

use time::OffsetDateTime;
use uuid::Uuid;

use wayfare_domain::{ContentHash, Flight, FlightOffer, StayOffer};
use wayfare_store::{
	BoxFuture, Error, OfferStore, Result,
	models::{FlightRecord, OfferClass, OfferRecord, SeenUpdate},
};

#[derive(Clone, Debug)]
struct StoredOffer {
	id: Uuid,
	content_hash: ContentHash,
	version: i64,
	seen_count: i64,
	last_seen_at: Option<OffsetDateTime>,
}
impl StoredOffer {
	fn record(&self, favourite: bool) -> OfferRecord {
		OfferRecord {
			id: self.id,
			content_hash: self.content_hash,
			version: self.version,
			favourite,
			seen_count: self.seen_count,
			last_seen_at: self.last_seen_at,
		}
	}
}

#[derive(Debug, Default)]
struct State {
	flights: Vec<FlightRecord>,
	flight_offers: Vec<StoredOffer>,
	stay_offers: Vec<StoredOffer>,
	favourites: HashSet<(String, Uuid)>,
	create_conflicts: u32,
	update_conflicts: u32,
	create_calls: u32,
	update_calls: u32,
}
impl State {
	fn offers(&self, class: OfferClass) -> &Vec<StoredOffer> {
		match class {
			OfferClass::Flight => &self.flight_offers,
			OfferClass::Stay => &self.stay_offers,
		}
	}

	fn offers_mut(&mut self, class: OfferClass) -> &mut Vec<StoredOffer> {
		match class {
			OfferClass::Flight => &mut self.flight_offers,
			OfferClass::Stay => &mut self.stay_offers,
		}
	}

	fn is_favourite(&self, user_id: &str, id: Uuid) -> bool {
		self.favourites.iter().any(|(user, offer)| user == user_id && *offer == id)
	}
}

/// In-memory [`OfferStore`] with optimistic versioning, a unique index on
/// content hashes, and injectable write conflicts. Batches behave like one
/// transaction per call: a failed batch inserts nothing.
#[derive(Debug, Default)]
pub struct MemStore {
	state: Mutex<State>,
}
impl MemStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn flight_count(&self) -> usize {
		self.lock().flights.len()
	}

	pub fn offer_count(&self, class: OfferClass) -> usize {
		self.lock().offers(class).len()
	}

	pub fn offer_record(&self, class: OfferClass, user_id: &str, id: Uuid) -> Option<OfferRecord> {
		let state = self.lock();

		state
			.offers(class)
			.iter()
			.find(|offer| offer.id == id)
			.map(|offer| offer.record(state.is_favourite(user_id, id)))
	}

	pub fn mark_favourite(&self, user_id: &str, id: Uuid) {
		self.lock().favourites.insert((user_id.to_string(), id));
	}

	/// Forces the next `count` batch creations to fail with a conflict
	/// without inserting anything.
	pub fn inject_create_conflicts(&self, count: u32) {
		self.lock().create_conflicts = count;
	}

	/// Forces the next `count` versioned updates to fail with a conflict.
	pub fn inject_update_conflicts(&self, count: u32) {
		self.lock().update_conflicts = count;
	}

	pub fn create_calls(&self) -> u32 {
		self.lock().create_calls
	}

	pub fn update_calls(&self) -> u32 {
		self.lock().update_calls
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn create_offers(&self, class: OfferClass, hashes: Vec<ContentHash>) -> Result<Vec<Uuid>> {
		let mut state = self.lock();

		state.create_calls += 1;

		if state.create_conflicts > 0 {
			state.create_conflicts -= 1;

			return Err(Error::Conflict { entity: class.as_str(), key: "injected".to_string() });
		}

		check_unique(&hashes, state.offers(class).iter().map(|offer| offer.content_hash), class.as_str())?;

		let ids: Vec<Uuid> = hashes.iter().map(|_| Uuid::new_v4()).collect();

		for (hash, id) in hashes.into_iter().zip(&ids) {
			state.offers_mut(class).push(StoredOffer {
				id: *id,
				content_hash: hash,
				version: 1,
				seen_count: 0,
				last_seen_at: None,
			});
		}

		Ok(ids)
	}

	fn find_offers(
		&self,
		class: OfferClass,
		user_id: &str,
		hashes: &[ContentHash],
	) -> Vec<OfferRecord> {
		let state = self.lock();

		state
			.offers(class)
			.iter()
			.filter(|offer| hashes.contains(&offer.content_hash))
			.map(|offer| offer.record(state.is_favourite(user_id, offer.id)))
			.collect()
	}
}

impl OfferStore for MemStore {
	fn find_flights_by_hash<'a>(
		&'a self,
		hashes: &'a [ContentHash],
	) -> BoxFuture<'a, Result<Vec<FlightRecord>>> {
		Box::pin(async move {
			let state = self.lock();

			Ok(state
				.flights
				.iter()
				.filter(|row| hashes.contains(&row.content_hash))
				.copied()
				.collect())
		})
	}

	fn create_flights<'a>(&'a self, flights: &'a [Flight]) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(async move {
			let mut state = self.lock();

			state.create_calls += 1;

			if state.create_conflicts > 0 {
				state.create_conflicts -= 1;

				return Err(Error::Conflict { entity: "flight", key: "injected".to_string() });
			}

			let hashes: Vec<ContentHash> = flights.iter().map(Flight::content_hash).collect();

			check_unique(&hashes, state.flights.iter().map(|row| row.content_hash), "flight")?;

			let ids: Vec<Uuid> = flights.iter().map(|_| Uuid::new_v4()).collect();

			for (hash, id) in hashes.into_iter().zip(&ids) {
				state.flights.push(FlightRecord { id: *id, content_hash: hash, version: 1 });
			}

			Ok(ids)
		})
	}

	fn find_flight_offers_by_hash<'a>(
		&'a self,
		user_id: &'a str,
		hashes: &'a [ContentHash],
	) -> BoxFuture<'a, Result<Vec<OfferRecord>>> {
		Box::pin(async move { Ok(self.find_offers(OfferClass::Flight, user_id, hashes)) })
	}

	fn create_flight_offers<'a>(
		&'a self,
		offers: &'a [FlightOffer],
	) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(async move {
			self.create_offers(
				OfferClass::Flight,
				offers.iter().map(FlightOffer::content_hash).collect(),
			)
		})
	}

	fn find_stay_offers_by_hash<'a>(
		&'a self,
		user_id: &'a str,
		hashes: &'a [ContentHash],
	) -> BoxFuture<'a, Result<Vec<OfferRecord>>> {
		Box::pin(async move { Ok(self.find_offers(OfferClass::Stay, user_id, hashes)) })
	}

	fn create_stay_offers<'a>(
		&'a self,
		offers: &'a [StayOffer],
	) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(async move {
			self.create_offers(
				OfferClass::Stay,
				offers.iter().map(StayOffer::content_hash).collect(),
			)
		})
	}

	fn update_offer_versioned(
		&self,
		class: OfferClass,
		update: SeenUpdate,
	) -> BoxFuture<'_, Result<i64>> {
		Box::pin(async move {
			let mut state = self.lock();

			state.update_calls += 1;

			if state.update_conflicts > 0 {
				state.update_conflicts -= 1;

				return Err(Error::Conflict {
					entity: class.as_str(),
					key: update.id.to_string(),
				});
			}

			let Some(offer) = state.offers_mut(class).iter_mut().find(|offer| offer.id == update.id)
			else {
				return Err(Error::NotFound { entity: class.as_str(), id: update.id });
			};

			if offer.version != update.expected_version {
				return Err(Error::Conflict { entity: class.as_str(), key: update.id.to_string() });
			}

			offer.version += 1;
			offer.seen_count = update.seen_count;
			offer.last_seen_at = Some(update.last_seen_at);

			Ok(offer.version)
		})
	}

	fn reload_offer<'a>(
		&'a self,
		class: OfferClass,
		user_id: &'a str,
		id: Uuid,
	) -> BoxFuture<'a, Result<OfferRecord>> {
		Box::pin(async move {
			let state = self.lock();
			let Some(offer) = state.offers(class).iter().find(|offer| offer.id == id) else {
				return Err(Error::NotFound { entity: class.as_str(), id });
			};

			Ok(offer.record(state.is_favourite(user_id, id)))
		})
	}
}

/// Uniqueness check before any insert, so a failed batch leaves no rows.
fn check_unique(
	batch: &[ContentHash],
	existing: impl Iterator<Item = ContentHash>,
	entity: &'static str,
) -> Result<()> {
	let mut seen: HashSet<ContentHash> = existing.collect();

	for hash in batch {
		if !seen.insert(*hash) {
			return Err(Error::Conflict { entity, key: hash.to_string() });
		}
	}

	Ok(())
}

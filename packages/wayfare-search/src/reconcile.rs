use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{Error, Result, retry::with_version_retry};
use wayfare_config::Config;
use wayfare_domain::{ContentHash, Flight, FlightOffer, Identity, StayOffer};
use wayfare_store::{
	OfferStore,
	models::{OfferClass, OfferRecord, SeenUpdate},
};

/// Promotes a page of transient flight offers to durable rows. The flights
/// referenced by the page are reconciled strictly before the offers, so an
/// offer row is only ever created against persisted flight identities.
pub(crate) async fn flight_page(
	store: &dyn OfferStore,
	cfg: &Config,
	user_id: &str,
	offers: &mut [FlightOffer],
	record_seen: bool,
	now: OffsetDateTime,
) -> Result<()> {
	if offers.is_empty() {
		return Ok(());
	}

	let flight_ids = ensure_flights(store, cfg, offers).await?;

	for offer in offers.iter_mut() {
		assign_flight_identity(&mut offer.depart, &flight_ids)?;

		if let Some(leg) = offer.return_flight.as_mut() {
			assign_flight_identity(leg, &flight_ids)?;
		}
	}

	let matched = ensure_offers(
		store,
		cfg,
		OfferClass::Flight,
		user_id,
		&mut FlightOfferPage(offers),
	)
	.await?;

	if record_seen {
		record_offers_seen(store, cfg, OfferClass::Flight, user_id, matched, now).await?;
	}

	Ok(())
}

/// Stay pages carry no sub-entities; the offers reconcile directly.
pub(crate) async fn stay_page(
	store: &dyn OfferStore,
	cfg: &Config,
	user_id: &str,
	offers: &mut [StayOffer],
	record_seen: bool,
	now: OffsetDateTime,
) -> Result<()> {
	if offers.is_empty() {
		return Ok(());
	}

	let matched =
		ensure_offers(store, cfg, OfferClass::Stay, user_id, &mut StayOfferPage(offers)).await?;

	if record_seen {
		record_offers_seen(store, cfg, OfferClass::Stay, user_id, matched, now).await?;
	}

	Ok(())
}

fn assign_flight_identity(flight: &mut Flight, ids: &HashMap<ContentHash, Uuid>) -> Result<()> {
	let id = ids.get(&flight.content_hash()).copied().ok_or(Error::UnreconciledFlight)?;

	flight.identity = Identity::Persisted(id);

	Ok(())
}

/// Reconciles the distinct flights on the page, in first-appearance order.
/// A creation conflict means a concurrent searcher persisted the same
/// content hash between lookup and create; the batch is re-read by hash
/// rather than re-created.
async fn ensure_flights(
	store: &dyn OfferStore,
	cfg: &Config,
	offers: &[FlightOffer],
) -> Result<HashMap<ContentHash, Uuid>> {
	let mut distinct: Vec<Flight> = Vec::new();
	let mut seen = HashSet::new();

	for offer in offers {
		for leg in [Some(&offer.depart), offer.return_flight.as_ref()].into_iter().flatten() {
			if seen.insert(leg.content_hash()) {
				distinct.push(leg.clone());
			}
		}
	}

	let hashes: Vec<ContentHash> = distinct.iter().map(Flight::content_hash).collect();
	let mut ids: HashMap<ContentHash, Uuid> = HashMap::new();
	let mut attempt = 0;

	loop {
		for row in store.find_flights_by_hash(&hashes).await? {
			ids.insert(row.content_hash, row.id);
		}

		let missing: Vec<Flight> = distinct
			.iter()
			.filter(|flight| !ids.contains_key(&flight.content_hash()))
			.cloned()
			.collect();

		if missing.is_empty() {
			debug!(reused = distinct.len(), "Every flight on the page was already durable.");

			return Ok(ids);
		}

		match store.create_flights(&missing).await {
			Ok(created) => {
				for (flight, id) in missing.iter().zip(created) {
					ids.insert(flight.content_hash(), id);
				}

				debug!(
					reused = distinct.len() - missing.len(),
					created = missing.len(),
					"Reconciled page flights."
				);

				return Ok(ids);
			},
			Err(err) if err.is_conflict() && attempt < cfg.store.write_retry_limit => {
				attempt += 1;

				warn!(
					attempt,
					"Flight batch creation hit a concurrent duplicate; re-reading by content hash."
				);
			},
			Err(err) => return Err(err.into()),
		}
	}
}

/// Page access shared by the two offer classes, so the reconcile loop is
/// written once.
trait OfferPage {
	fn hashes(&self) -> Vec<ContentHash>;

	fn adopt(&mut self, records: &HashMap<ContentHash, OfferRecord>) -> Vec<OfferRecord>;

	fn assign_created(&mut self, ids: HashMap<ContentHash, Uuid>);

	fn create_missing<'a>(
		&self,
		store: &'a dyn OfferStore,
		missing: &[ContentHash],
	) -> wayfare_store::BoxFuture<'a, wayfare_store::Result<Vec<Uuid>>>;
}

struct FlightOfferPage<'a>(&'a mut [FlightOffer]);
impl OfferPage for FlightOfferPage<'_> {
	fn hashes(&self) -> Vec<ContentHash> {
		self.0.iter().map(FlightOffer::content_hash).collect()
	}

	fn adopt(&mut self, records: &HashMap<ContentHash, OfferRecord>) -> Vec<OfferRecord> {
		let mut matched = Vec::new();

		for offer in self.0.iter_mut() {
			if let Some(record) = records.get(&offer.content_hash()) {
				offer.identity = Identity::Persisted(record.id);
				offer.favourite = record.favourite;

				matched.push(*record);
			}
		}

		matched
	}

	fn assign_created(&mut self, mut ids: HashMap<ContentHash, Uuid>) {
		for offer in self.0.iter_mut() {
			if let Some(id) = ids.remove(&offer.content_hash()) {
				offer.identity = Identity::Persisted(id);
			}
		}
	}

	fn create_missing<'a>(
		&self,
		store: &'a dyn OfferStore,
		missing: &[ContentHash],
	) -> wayfare_store::BoxFuture<'a, wayfare_store::Result<Vec<Uuid>>> {
		let batch: Vec<FlightOffer> = self
			.0
			.iter()
			.filter(|offer| missing.contains(&offer.content_hash()))
			.cloned()
			.collect();

		Box::pin(async move { store.create_flight_offers(&batch).await })
	}
}

struct StayOfferPage<'a>(&'a mut [StayOffer]);
impl OfferPage for StayOfferPage<'_> {
	fn hashes(&self) -> Vec<ContentHash> {
		self.0.iter().map(StayOffer::content_hash).collect()
	}

	fn adopt(&mut self, records: &HashMap<ContentHash, OfferRecord>) -> Vec<OfferRecord> {
		let mut matched = Vec::new();

		for offer in self.0.iter_mut() {
			if let Some(record) = records.get(&offer.content_hash()) {
				offer.identity = Identity::Persisted(record.id);
				offer.favourite = record.favourite;

				matched.push(*record);
			}
		}

		matched
	}

	fn assign_created(&mut self, mut ids: HashMap<ContentHash, Uuid>) {
		for offer in self.0.iter_mut() {
			if let Some(id) = ids.remove(&offer.content_hash()) {
				offer.identity = Identity::Persisted(id);
			}
		}
	}

	fn create_missing<'a>(
		&self,
		store: &'a dyn OfferStore,
		missing: &[ContentHash],
	) -> wayfare_store::BoxFuture<'a, wayfare_store::Result<Vec<Uuid>>> {
		let batch: Vec<StayOffer> = self
			.0
			.iter()
			.filter(|offer| missing.contains(&offer.content_hash()))
			.cloned()
			.collect();

		Box::pin(async move { store.create_stay_offers(&batch).await })
	}
}

/// Lookup, identity copy-back, and atomic creation of the remainder, with
/// the same bounded conflict re-resolution as the flight stage. Returns the
/// matched rows so seen recording runs once, after the page is stable.
async fn ensure_offers(
	store: &dyn OfferStore,
	cfg: &Config,
	class: OfferClass,
	user_id: &str,
	page: &mut dyn OfferPage,
) -> Result<Vec<OfferRecord>> {
	let hashes = page.hashes();
	let mut attempt = 0;

	loop {
		let mut records: HashMap<ContentHash, OfferRecord> = HashMap::new();

		let found = match class {
			OfferClass::Flight => store.find_flight_offers_by_hash(user_id, &hashes).await?,
			OfferClass::Stay => store.find_stay_offers_by_hash(user_id, &hashes).await?,
		};

		for record in found {
			records.insert(record.content_hash, record);
		}

		let matched = page.adopt(&records);
		let missing: Vec<ContentHash> =
			hashes.iter().filter(|hash| !records.contains_key(hash)).copied().collect();

		if missing.is_empty() {
			debug!(class = class.as_str(), matched = matched.len(), "Reconciled offer page.");

			return Ok(matched);
		}

		match page.create_missing(store, &missing).await {
			Ok(created) => {
				page.assign_created(missing.into_iter().zip(created).collect());

				debug!(
					class = class.as_str(),
					matched = matched.len(),
					created = hashes.len() - matched.len(),
					"Reconciled offer page."
				);

				return Ok(matched);
			},
			Err(err) if err.is_conflict() && attempt < cfg.store.write_retry_limit => {
				attempt += 1;

				warn!(
					class = class.as_str(),
					attempt,
					"Offer batch creation hit a concurrent duplicate; re-reading by content hash."
				);
			},
			Err(err) => return Err(err.into()),
		}
	}
}

/// Bumps the seen counter on every reused row through the version-checked
/// write path; a concurrent bump is absorbed by re-reading the row.
async fn record_offers_seen(
	store: &dyn OfferStore,
	cfg: &Config,
	class: OfferClass,
	user_id: &str,
	matched: Vec<OfferRecord>,
	now: OffsetDateTime,
) -> Result<()> {
	for record in matched {
		with_version_retry(
			cfg.store.write_retry_limit,
			record,
			|record| record.version,
			|record| {
				store.update_offer_versioned(
					class,
					SeenUpdate {
						id: record.id,
						expected_version: record.version,
						seen_count: record.seen_count + 1,
						last_seen_at: now,
					},
				)
			},
			|record| {
				Box::pin(async move { store.reload_offer(class, user_id, record.id).await })
			},
		)
		.await?;
	}

	Ok(())
}

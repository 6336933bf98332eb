use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
	Error, OfferEngine, PageRequest, Result, SortSpec,
	pipeline::{self, Ranked},
	reconcile, required, variants,
};
use wayfare_config::Config;
use wayfare_domain::{
	Airline, Airplane, Airport, Flight, FlightOffer, FlightSortKey, Identity, ServiceClass,
	SortDirection, pick, pricing, sort, stable_hash,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
	OneWay,
	Return,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightFilter {
	/// Airport codes; an unset side is enumerated from reference data.
	pub origin: Option<String>,
	pub destination: Option<String>,
	#[serde(default, with = "wayfare_domain::time_serde::date_option")]
	pub depart_date: Option<Date>,
	#[serde(default, with = "wayfare_domain::time_serde::date_option")]
	pub return_date: Option<Date>,
	#[serde(default)]
	pub flexible_dates: bool,
	pub trip: TripType,
	pub passengers: u32,
	pub class: ServiceClass,
	#[serde(default)]
	pub price_min_minor: Option<i64>,
	#[serde(default)]
	pub price_max_minor: Option<i64>,
	#[serde(default)]
	pub ratings: Vec<u8>,
	#[serde(default)]
	pub airlines: Vec<Uuid>,
	#[serde(default)]
	pub depart_hour_from: Option<u8>,
	#[serde(default)]
	pub depart_hour_to: Option<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightSearchRequest {
	pub user_id: String,
	pub filter: FlightFilter,
	#[serde(default)]
	pub primary_sort: Option<SortSpec<FlightSortKey>>,
	#[serde(default)]
	pub secondary_sort: Option<SortSpec<FlightSortKey>>,
	#[serde(default)]
	pub page: PageRequest,
	#[serde(default)]
	pub want_narrowing: bool,
	#[serde(default)]
	pub want_top_stats: bool,
	#[serde(default)]
	pub record_seen: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightNarrowing {
	pub price_min_minor: i64,
	pub price_max_minor: i64,
	pub airlines: Vec<Airline>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopOffer {
	pub factor: FlightSortKey,
	pub direction: SortDirection,
	pub offer: FlightOffer,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightSearchResponse {
	pub items: Vec<FlightOffer>,
	pub total: usize,
	pub narrowing: Option<FlightNarrowing>,
	pub top_stats: Option<Vec<TopOffer>>,
}

const TRACKED_FACTORS: [(FlightSortKey, SortDirection); 5] = [
	(FlightSortKey::Price, SortDirection::Ascending),
	(FlightSortKey::Score, SortDirection::Descending),
	(FlightSortKey::Duration, SortDirection::Ascending),
	(FlightSortKey::Rating, SortDirection::Descending),
	(FlightSortKey::TimeToDeparture, SortDirection::Ascending),
];

impl OfferEngine {
	/// Runs a full flight search: deterministic candidate generation, the
	/// sort/filter/pagination pipeline, then reconciliation of the returned
	/// page against the store.
	pub async fn search_flight_offers(
		&self,
		req: FlightSearchRequest,
		now: OffsetDateTime,
	) -> Result<FlightSearchResponse> {
		validate(&req)?;

		let airports = required(self.reference.airports.list_all().await?, "airports")?;
		let airlines = required(self.reference.airlines.list_all().await?, "airline companies")?;
		let airplanes = required(self.reference.airplanes.list_all().await?, "airplanes")?;
		let routes = expand_routes(
			&self.cfg,
			&airports,
			req.filter.origin.as_deref(),
			req.filter.destination.as_deref(),
		)?;
		let trips = expand_trips(&self.cfg, &req.filter, now.date());
		let mut seen = HashSet::new();
		let candidates: Vec<FlightOffer> = FlightCandidates::new(
			&self.cfg,
			&airlines,
			&airplanes,
			&routes,
			&trips,
			req.filter.class,
			req.filter.passengers,
		)
		.filter(|offer| seen.insert(offer.content_hash()))
		.take(self.cfg.search.candidate_cap as usize)
		.collect();

		debug!(
			candidates = candidates.len(),
			routes = routes.len(),
			trips = trips.len(),
			"Generated flight candidates."
		);

		let (primary, secondary) =
			resolve_sorts(&self.cfg, req.primary_sort, req.secondary_sort);
		let mut ranked = pipeline::rank(
			candidates,
			|offer| sort::flight_factor(offer, primary.key, now),
			|offer| sort::flight_factor(offer, secondary.key, now),
		);

		pipeline::stable_sort(&mut ranked, primary.direction(), secondary.direction());

		// Narrowing and top stats reflect the unfiltered set; the filter
		// below must not shrink the advertised ranges.
		let narrowing = req.want_narrowing.then(|| narrow(&ranked));
		let top_stats = req.want_top_stats.then(|| top_stats(&ranked, now));

		ranked.retain(|ranked| filter_matches(&req.filter, &ranked.offer));

		let skip = req.page.skip as usize;
		let take = req.page.take.unwrap_or(self.cfg.search.default_page_size) as usize;
		let (page, total) = pipeline::paginate(ranked, skip, take);
		let mut items: Vec<FlightOffer> = page.into_iter().map(|ranked| ranked.offer).collect();

		reconcile::flight_page(
			self.store.as_ref(),
			&self.cfg,
			&req.user_id,
			&mut items,
			req.record_seen.unwrap_or(true),
			now,
		)
		.await?;

		Ok(FlightSearchResponse { items, total, narrowing, top_stats })
	}
}

fn validate(req: &FlightSearchRequest) -> Result<()> {
	if req.user_id.trim().is_empty() {
		return Err(Error::InvalidRequest { message: "user_id is required.".to_string() });
	}
	if req.filter.passengers == 0 {
		return Err(Error::InvalidRequest {
			message: "passengers must be at least one.".to_string(),
		});
	}
	if let (Some(min), Some(max)) = (req.filter.price_min_minor, req.filter.price_max_minor)
		&& min > max
	{
		return Err(Error::InvalidRequest {
			message: "price_min_minor must not exceed price_max_minor.".to_string(),
		});
	}
	if req.filter.ratings.iter().any(|rating| !(1..=5).contains(rating)) {
		return Err(Error::InvalidRequest {
			message: "ratings must be between one and five.".to_string(),
		});
	}
	if [req.filter.depart_hour_from, req.filter.depart_hour_to]
		.into_iter()
		.flatten()
		.any(|hour| hour > 23)
	{
		return Err(Error::InvalidRequest {
			message: "departure hours must be between 0 and 23.".to_string(),
		});
	}
	if let (Some(from), Some(to)) = (req.filter.depart_hour_from, req.filter.depart_hour_to)
		&& from > to
	{
		return Err(Error::InvalidRequest {
			message: "depart_hour_from must not exceed depart_hour_to.".to_string(),
		});
	}

	Ok(())
}

fn expand_routes(
	cfg: &Config,
	airports: &[Airport],
	origin: Option<&str>,
	destination: Option<&str>,
) -> Result<Vec<(Airport, Airport)>> {
	let max_pairs = cfg.search.max_route_pairs as usize;
	let resolve = |code: &str| {
		airports
			.iter()
			.find(|airport| airport.code.eq_ignore_ascii_case(code))
			.cloned()
			.ok_or_else(|| Error::DataUnavailable { what: format!("airport {code}") })
	};

	match (origin, destination) {
		(Some(origin), Some(destination)) => {
			let origin = resolve(origin)?;
			let destination = resolve(destination)?;

			if origin.id == destination.id {
				return Err(Error::InvalidRequest {
					message: "origin and destination must differ.".to_string(),
				});
			}

			Ok(vec![(origin, destination)])
		},
		(Some(origin), None) => Ok(pair_with_all(airports, resolve(origin)?, max_pairs, true)),
		(None, Some(destination)) => {
			Ok(pair_with_all(airports, resolve(destination)?, max_pairs, false))
		},
		(None, None) => Ok(all_pairs(airports, max_pairs)),
	}
}

/// Pairs a fixed endpoint with the rest of the pool, walking it with a prime
/// stride from a position seeded by the endpoint's code.
fn pair_with_all(
	airports: &[Airport],
	fixed: Airport,
	max_pairs: usize,
	fixed_is_origin: bool,
) -> Vec<(Airport, Airport)> {
	let len = airports.len();
	let stride = variants::coprime_stride(len);
	let start = pick(stable_hash(&fixed.code), len);

	(0..len)
		.map(|i| &airports[(start + i * stride) % len])
		.filter(|candidate| candidate.id != fixed.id)
		.take(max_pairs)
		.map(|candidate| {
			if fixed_is_origin {
				(fixed.clone(), candidate.clone())
			} else {
				(candidate.clone(), fixed.clone())
			}
		})
		.collect()
}

fn all_pairs(airports: &[Airport], max_pairs: usize) -> Vec<(Airport, Airport)> {
	let len = airports.len();
	let stride = variants::coprime_stride(len);

	(0..len)
		.map(|i| (&airports[i], &airports[(i * stride + 1) % len]))
		.filter(|(origin, destination)| origin.id != destination.id)
		.take(max_pairs)
		.map(|(origin, destination)| (origin.clone(), destination.clone()))
		.collect()
}

#[derive(Clone, Copy, Debug)]
struct TripPlan {
	depart_date: Date,
	return_date: Option<Date>,
}

fn expand_trips(cfg: &Config, filter: &FlightFilter, today: Date) -> Vec<TripPlan> {
	let window = cfg.search.flexible_window_days;
	let depart_anchor = filter.depart_date.or(filter.return_date).unwrap_or(today);
	let departs =
		variants::single_or_window(filter.depart_date, depart_anchor, filter.flexible_dates, window);

	match filter.trip {
		TripType::OneWay => departs
			.into_iter()
			.map(|depart_date| TripPlan { depart_date, return_date: None })
			.collect(),
		TripType::Return => {
			let return_anchor = filter
				.return_date
				.unwrap_or(depart_anchor + Duration::days(i64::from(cfg.search.default_trip_days)));
			let returns = variants::single_or_window(
				filter.return_date,
				return_anchor,
				filter.flexible_dates,
				window,
			);

			variants::return_date_pairs(departs, returns)
				.into_iter()
				.map(|(depart_date, return_date)| TripPlan {
					depart_date,
					return_date: Some(return_date),
				})
				.collect()
		},
	}
}

/// Lazily yields candidate offers cell by cell over the (trip, route) grid;
/// the caller deduplicates and truncates at the candidate cap, so a
/// pathological filter never materialises the full product.
struct FlightCandidates<'a> {
	cfg: &'a Config,
	airlines: &'a [Airline],
	airplanes: &'a [Airplane],
	routes: &'a [(Airport, Airport)],
	trips: &'a [TripPlan],
	class: ServiceClass,
	passengers: u32,
	trip_idx: usize,
	route_idx: usize,
	pending: VecDeque<FlightOffer>,
}
impl<'a> FlightCandidates<'a> {
	fn new(
		cfg: &'a Config,
		airlines: &'a [Airline],
		airplanes: &'a [Airplane],
		routes: &'a [(Airport, Airport)],
		trips: &'a [TripPlan],
		class: ServiceClass,
		passengers: u32,
	) -> Self {
		Self {
			cfg,
			airlines,
			airplanes,
			routes,
			trips,
			class,
			passengers,
			trip_idx: 0,
			route_idx: 0,
			pending: VecDeque::new(),
		}
	}

	fn fill(&mut self, trip: TripPlan, origin: &Airport, destination: &Airport) {
		let departs = leg_variants(
			self.cfg,
			self.airlines,
			self.airplanes,
			LegRequest { origin, destination, date: trip.depart_date, leg_index: 0, variant_offset: 0 },
		);
		let Some(return_date) = trip.return_date else {
			for depart in departs {
				self.pending.push_back(assemble(
					&self.cfg.pricing,
					depart,
					None,
					self.class,
					self.passengers,
				));
			}

			return;
		};
		// The return list starts one slot later than the depart list, so a
		// pair can never reuse the exact slot it departed in.
		let returns = leg_variants(
			self.cfg,
			self.airlines,
			self.airplanes,
			LegRequest {
				origin: destination,
				destination: origin,
				date: return_date,
				leg_index: 1,
				variant_offset: 1,
			},
		);

		for (i, j) in variants::stride_pairs(
			departs.len(),
			returns.len(),
			self.cfg.search.max_trip_pairs as usize,
		) {
			let depart = departs[i].clone();
			let return_flight = returns[j].clone();

			if return_flight.departs_at <= depart.arrives_at {
				continue;
			}

			self.pending.push_back(assemble(
				&self.cfg.pricing,
				depart,
				Some(return_flight),
				self.class,
				self.passengers,
			));
		}
	}
}
impl Iterator for FlightCandidates<'_> {
	type Item = FlightOffer;

	fn next(&mut self) -> Option<FlightOffer> {
		loop {
			if let Some(offer) = self.pending.pop_front() {
				return Some(offer);
			}
			if self.trip_idx >= self.trips.len() {
				return None;
			}
			if self.route_idx >= self.routes.len() {
				self.trip_idx += 1;
				self.route_idx = 0;

				continue;
			}

			let trip = self.trips[self.trip_idx];
			let (origin, destination) = self.routes[self.route_idx].clone();

			self.route_idx += 1;
			self.fill(trip, &origin, &destination);
		}
	}
}

struct LegRequest<'a> {
	origin: &'a Airport,
	destination: &'a Airport,
	date: Date,
	leg_index: u8,
	variant_offset: u32,
}

/// Time variants for one leg. The attribute seeds hash the date, the airport
/// names, and the leg index; consecutive variants step the seeds so each
/// variant lands in its own take-off slot.
fn leg_variants(
	cfg: &Config,
	airlines: &[Airline],
	airplanes: &[Airplane],
	leg: LegRequest<'_>,
) -> Vec<Flight> {
	let LegRequest { origin, destination, date, leg_index, variant_offset } = leg;
	let slots = u64::from(cfg.search.slots_per_day);
	let slot_minutes = (24 * 60) / i64::from(cfg.search.slots_per_day);
	let leg_key = format!("{date}:{}:{}:{leg_index}", origin.name, destination.name);
	let airline_seed = stable_hash(format!("{leg_key}:airline"));
	let airplane_seed = stable_hash(format!("{leg_key}:airplane"));
	let slot_seed = stable_hash(format!("{leg_key}:slot"));
	let duration_seed = stable_hash(format!("{leg_key}:duration"));
	let distance_km = origin.distance_km(destination);
	let midnight = date.midnight().assume_utc();

	(variant_offset..variant_offset + cfg.search.variants_per_leg)
		.map(|variant| {
			let step = u64::from(variant);
			let airline = airlines[pick(airline_seed.wrapping_add(step), airlines.len())].clone();
			let airplane =
				airplanes[pick(airplane_seed.wrapping_add(step), airplanes.len())].clone();
			let slot = (slot_seed.wrapping_add(step) % slots) as i64;
			let departs_at = midnight + Duration::minutes(slot * slot_minutes);
			let duration_minutes =
				flight_duration_minutes(cfg, distance_km, duration_seed.wrapping_add(step));
			let arrives_at = departs_at + Duration::minutes(duration_minutes);

			Flight {
				identity: Identity::Transient,
				airline,
				airplane,
				origin: origin.clone(),
				destination: destination.clone(),
				departs_at,
				arrives_at,
				distance_km,
			}
		})
		.collect()
}

fn flight_duration_minutes(cfg: &Config, distance_km: f64, seed: u64) -> i64 {
	let cruise = (distance_km / cfg.search.cruise_kmh * 60.0) as i64;
	let jitter = (seed % (cfg.search.duration_jitter_minutes as u64 + 1)) as i64;

	cfg.search.min_leg_minutes + cruise + jitter
}

fn assemble(
	cfg: &wayfare_config::Pricing,
	depart: Flight,
	return_flight: Option<Flight>,
	class: ServiceClass,
	passengers: u32,
) -> FlightOffer {
	let legs_price = leg_price(cfg, &depart, class)
		+ return_flight.as_ref().map(|leg| leg_price(cfg, leg, class)).unwrap_or(0);
	let total_price_minor = legs_price * i64::from(passengers);

	FlightOffer {
		identity: Identity::Transient,
		depart,
		return_flight,
		class,
		passengers,
		favourite: false,
		total_price_minor,
	}
}

fn leg_price(cfg: &wayfare_config::Pricing, leg: &Flight, class: ServiceClass) -> i64 {
	pricing::flight_leg_price(
		cfg,
		&leg.airline.name,
		&leg.origin.name,
		&leg.airplane.model,
		leg.distance_km,
		leg.duration_minutes(),
		class,
	)
}

fn resolve_sorts(
	cfg: &Config,
	primary: Option<SortSpec<FlightSortKey>>,
	secondary: Option<SortSpec<FlightSortKey>>,
) -> (SortSpec<FlightSortKey>, SortSpec<FlightSortKey>) {
	let defaults = &cfg.search.flight_defaults;
	let primary = primary.unwrap_or(SortSpec {
		key: FlightSortKey::parse(&defaults.primary_sort).unwrap_or(FlightSortKey::Price),
		descending: defaults.primary_descending,
	});
	let secondary = secondary.unwrap_or(SortSpec {
		key: FlightSortKey::parse(&defaults.secondary_sort).unwrap_or(FlightSortKey::Duration),
		descending: defaults.secondary_descending,
	});

	(primary, secondary)
}

fn narrow(ranked: &[Ranked<FlightOffer>]) -> FlightNarrowing {
	let (price_min_minor, price_max_minor) =
		pipeline::price_bounds(ranked, |offer| offer.total_price_minor).unwrap_or((0, 0));
	let mut airlines: Vec<Airline> = Vec::new();

	for ranked in ranked {
		let airline = &ranked.offer.depart.airline;

		if !airlines.iter().any(|known| known.id == airline.id) {
			airlines.push(airline.clone());
		}
	}

	airlines.sort_by(|a, b| a.name.cmp(&b.name));

	FlightNarrowing { price_min_minor, price_max_minor, airlines }
}

/// The extremal candidate per tracked factor, scanned over the unfiltered
/// set. Ties keep the earliest candidate in sort order.
fn top_stats(ranked: &[Ranked<FlightOffer>], now: OffsetDateTime) -> Vec<TopOffer> {
	TRACKED_FACTORS
		.iter()
		.filter_map(|&(factor, direction)| {
			ranked
				.iter()
				.map(|ranked| &ranked.offer)
				.fold(None::<(&FlightOffer, f64)>, |best, offer| {
					let value = sort::flight_factor(offer, factor, now);

					match best {
						None => Some((offer, value)),
						Some((_, best_value)) if beats(value, best_value, direction) => {
							Some((offer, value))
						},
						best => best,
					}
				})
				.map(|(offer, _)| TopOffer { factor, direction, offer: offer.clone() })
		})
		.collect()
}

fn beats(candidate: f64, best: f64, direction: SortDirection) -> bool {
	match direction {
		SortDirection::Ascending => candidate < best,
		SortDirection::Descending => candidate > best,
	}
}

fn filter_matches(filter: &FlightFilter, offer: &FlightOffer) -> bool {
	if let Some(min) = filter.price_min_minor
		&& offer.total_price_minor < min
	{
		return false;
	}
	if let Some(max) = filter.price_max_minor
		&& offer.total_price_minor > max
	{
		return false;
	}
	if !pipeline::rating_matches(&filter.ratings, offer.rating()) {
		return false;
	}
	if !filter.airlines.is_empty() && !filter.airlines.contains(&offer.depart.airline.id) {
		return false;
	}

	let hour = offer.depart.departs_at.hour();

	if let Some(from) = filter.depart_hour_from
		&& hour < from
	{
		return false;
	}
	if let Some(to) = filter.depart_hour_to
		&& hour > to
	{
		return false;
	}

	true
}

#![allow(dead_code)]

use std::sync::Arc;

use time::OffsetDateTime;
use time::macros::{date, datetime};
use uuid::Uuid;

use wayfare_config::Config;
use wayfare_domain::{Airline, Airplane, Airport, ServiceClass, Stay, stable_hash};
use wayfare_search::{
	FlightFilter, FlightSearchRequest, OfferEngine, PageRequest, ReferenceData, ReferenceSource,
	StayFilter, StaySearchRequest, TripType,
};
use wayfare_store::BoxFuture;
use wayfare_testkit::MemStore;

pub struct FixedSource<T>(pub Vec<T>);

impl ReferenceSource<Airport> for FixedSource<Airport> {
	fn list_all(&self) -> BoxFuture<'_, wayfare_store::Result<Vec<Airport>>> {
		let items = self.0.clone();

		Box::pin(async move { Ok(items) })
	}

	fn list_near<'a>(
		&'a self,
		city: &'a str,
		limit: u32,
	) -> BoxFuture<'a, wayfare_store::Result<Vec<Airport>>> {
		let items = self
			.0
			.iter()
			.filter(|airport| airport.city.eq_ignore_ascii_case(city))
			.take(limit as usize)
			.cloned()
			.collect();

		Box::pin(async move { Ok(items) })
	}
}

impl ReferenceSource<Airline> for FixedSource<Airline> {
	fn list_all(&self) -> BoxFuture<'_, wayfare_store::Result<Vec<Airline>>> {
		let items = self.0.clone();

		Box::pin(async move { Ok(items) })
	}

	fn list_near<'a>(
		&'a self,
		_city: &'a str,
		limit: u32,
	) -> BoxFuture<'a, wayfare_store::Result<Vec<Airline>>> {
		let items = self.0.iter().take(limit as usize).cloned().collect();

		Box::pin(async move { Ok(items) })
	}
}

impl ReferenceSource<Airplane> for FixedSource<Airplane> {
	fn list_all(&self) -> BoxFuture<'_, wayfare_store::Result<Vec<Airplane>>> {
		let items = self.0.clone();

		Box::pin(async move { Ok(items) })
	}

	fn list_near<'a>(
		&'a self,
		_city: &'a str,
		limit: u32,
	) -> BoxFuture<'a, wayfare_store::Result<Vec<Airplane>>> {
		let items = self.0.iter().take(limit as usize).cloned().collect();

		Box::pin(async move { Ok(items) })
	}
}

impl ReferenceSource<Stay> for FixedSource<Stay> {
	fn list_all(&self) -> BoxFuture<'_, wayfare_store::Result<Vec<Stay>>> {
		let items = self.0.clone();

		Box::pin(async move { Ok(items) })
	}

	fn list_near<'a>(
		&'a self,
		city: &'a str,
		limit: u32,
	) -> BoxFuture<'a, wayfare_store::Result<Vec<Stay>>> {
		let items = self
			.0
			.iter()
			.filter(|stay| stay.city.eq_ignore_ascii_case(city))
			.take(limit as usize)
			.cloned()
			.collect();

		Box::pin(async move { Ok(items) })
	}
}

/// Fixture ids derive from the entity name, so two fixture sets built from
/// the same data are interchangeable and content hashes compare across runs.
fn fixed_id(name: &str) -> Uuid {
	Uuid::from_u128(u128::from(stable_hash(name)))
}

pub fn airport(code: &str, city: &str, latitude: f64, longitude: f64) -> Airport {
	Airport {
		id: fixed_id(code),
		code: code.to_string(),
		name: format!("{code} International"),
		city: city.to_string(),
		latitude,
		longitude,
	}
}

pub fn airline(name: &str, rating: u8) -> Airline {
	Airline { id: fixed_id(name), name: name.to_string(), rating }
}

pub fn airplane(model: &str) -> Airplane {
	Airplane { id: fixed_id(model), model: model.to_string() }
}

pub fn stay(name: &str, city: &str, rating: u8) -> Stay {
	Stay { id: fixed_id(name), name: name.to_string(), city: city.to_string(), rating }
}

pub fn default_airports() -> Vec<Airport> {
	vec![
		airport("NYC", "New York", 40.64, -73.78),
		airport("LAX", "Los Angeles", 33.94, -118.41),
		airport("SFO", "San Francisco", 37.62, -122.38),
	]
}

pub fn default_stays() -> Vec<Stay> {
	vec![
		stay("Harbour View Hotel", "Los Angeles", 5),
		stay("Midtown Suites", "New York", 4),
		stay("Cedar Lodge", "San Francisco", 3),
	]
}

pub fn reference(
	airports: Vec<Airport>,
	airlines: Vec<Airline>,
	airplanes: Vec<Airplane>,
	stays: Vec<Stay>,
) -> ReferenceData {
	ReferenceData::new(
		Arc::new(FixedSource(airports)),
		Arc::new(FixedSource(airlines)),
		Arc::new(FixedSource(airplanes)),
		Arc::new(FixedSource(stays)),
	)
}

pub fn default_reference() -> ReferenceData {
	reference(
		default_airports(),
		vec![airline("Aurora Air", 4), airline("Pacific Crest", 5)],
		vec![airplane("A320neo"), airplane("787-9")],
		default_stays(),
	)
}

pub fn engine(store: Arc<MemStore>, reference: ReferenceData) -> OfferEngine {
	OfferEngine::new(Config::default(), store, reference)
}

pub fn now() -> OffsetDateTime {
	datetime!(2024-05-20 08:00 UTC)
}

pub fn one_way_filter() -> FlightFilter {
	FlightFilter {
		origin: Some("NYC".to_string()),
		destination: Some("LAX".to_string()),
		depart_date: Some(date!(2024-06-01)),
		return_date: None,
		flexible_dates: false,
		trip: TripType::OneWay,
		passengers: 1,
		class: ServiceClass::Economy,
		price_min_minor: None,
		price_max_minor: None,
		ratings: Vec::new(),
		airlines: Vec::new(),
		depart_hour_from: None,
		depart_hour_to: None,
	}
}

pub fn flight_request() -> FlightSearchRequest {
	FlightSearchRequest {
		user_id: "user-1".to_string(),
		filter: one_way_filter(),
		primary_sort: None,
		secondary_sort: None,
		page: PageRequest { skip: 0, take: Some(200) },
		want_narrowing: false,
		want_top_stats: false,
		record_seen: None,
	}
}

pub fn stay_filter() -> StayFilter {
	StayFilter {
		city: None,
		check_in: Some(date!(2024-06-01)),
		check_out: Some(date!(2024-06-03)),
		flexible_dates: false,
		guests: 2,
		rooms: 1,
		price_min_minor: None,
		price_max_minor: None,
		ratings: Vec::new(),
	}
}

pub fn stay_request() -> StaySearchRequest {
	StaySearchRequest {
		user_id: "user-1".to_string(),
		filter: stay_filter(),
		sort: None,
		page: PageRequest { skip: 0, take: Some(200) },
		want_narrowing: false,
		record_seen: None,
	}
}

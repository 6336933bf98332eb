use time::OffsetDateTime;

use crate::{flight::FlightOffer, stay::StayOffer};

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
	Ascending,
	Descending,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightSortKey {
	Price,
	Duration,
	TimeToDeparture,
	Rating,
	Score,
}
impl FlightSortKey {
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"price" => Some(Self::Price),
			"duration" => Some(Self::Duration),
			"time_to_departure" => Some(Self::TimeToDeparture),
			"rating" => Some(Self::Rating),
			"score" => Some(Self::Score),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaySortKey {
	Price,
	Rating,
	Score,
}
impl StaySortKey {
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"price" => Some(Self::Price),
			"rating" => Some(Self::Rating),
			"score" => Some(Self::Score),
			_ => None,
		}
	}
}

/// Derived sort factor of a flight offer; computed on demand, never
/// persisted.
pub fn flight_factor(offer: &FlightOffer, key: FlightSortKey, now: OffsetDateTime) -> f64 {
	match key {
		FlightSortKey::Price => offer.total_price_minor as f64,
		FlightSortKey::Duration => offer.duration_minutes() as f64,
		FlightSortKey::TimeToDeparture => (offer.depart.departs_at - now).whole_minutes() as f64,
		FlightSortKey::Rating => f64::from(offer.rating()),
		FlightSortKey::Score => flight_score(offer),
	}
}

pub fn stay_factor(offer: &StayOffer, key: StaySortKey) -> f64 {
	match key {
		StaySortKey::Price => offer.total_price_minor as f64,
		StaySortKey::Rating => f64::from(offer.stay.rating),
		StaySortKey::Score => stay_score(offer),
	}
}

/// Composite highlight score: rating-weighted, price- and duration-penalised.
fn flight_score(offer: &FlightOffer) -> f64 {
	f64::from(offer.rating()) * 2.0
		- offer.total_price_minor as f64 / 10_000.0
		- offer.duration_minutes() as f64 / 600.0
}

fn stay_score(offer: &StayOffer) -> f64 {
	f64::from(offer.stay.rating) * 2.0 - offer.total_price_minor as f64 / 10_000.0
}

use time::OffsetDateTime;

use crate::{
	hash::{ContentHash, stable_hash},
	identity::Identity,
	reference::{Airline, Airplane, Airport},
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceClass {
	Economy,
	Comfort,
	Business,
}
impl ServiceClass {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Economy => "economy",
			Self::Comfort => "comfort",
			Self::Business => "business",
		}
	}
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Flight {
	pub identity: Identity,
	pub airline: Airline,
	pub airplane: Airplane,
	pub origin: Airport,
	pub destination: Airport,
	#[serde(with = "crate::time_serde")]
	pub departs_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub arrives_at: OffsetDateTime,
	pub distance_km: f64,
}
impl Flight {
	pub fn duration_minutes(&self) -> i64 {
		(self.arrives_at - self.departs_at).whole_minutes()
	}

	/// Fingerprint of the flight's semantic fields: airports, minute-rounded
	/// times, airline and airplane. Identity and price never feed the hash.
	pub fn content_hash(&self) -> ContentHash {
		let key = format!(
			"flight:{}:{}:{}:{}:{}:{}",
			self.origin.id,
			self.destination.id,
			minute_bucket(self.departs_at),
			minute_bucket(self.arrives_at),
			self.airline.id,
			self.airplane.id,
		);

		ContentHash(stable_hash(key))
	}
}

fn minute_bucket(at: OffsetDateTime) -> i64 {
	at.unix_timestamp().div_euclid(60)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlightOffer {
	pub identity: Identity,
	pub depart: Flight,
	#[serde(rename = "return")]
	pub return_flight: Option<Flight>,
	pub class: ServiceClass,
	pub passengers: u32,
	pub favourite: bool,
	pub total_price_minor: i64,
}
impl FlightOffer {
	pub fn duration_minutes(&self) -> i64 {
		self.depart.duration_minutes()
			+ self.return_flight.as_ref().map(Flight::duration_minutes).unwrap_or(0)
	}

	/// Lowest airline rating across the legs.
	pub fn rating(&self) -> u8 {
		let depart = self.depart.airline.rating;

		self.return_flight.as_ref().map(|leg| leg.airline.rating.min(depart)).unwrap_or(depart)
	}

	pub fn content_hash(&self) -> ContentHash {
		let return_hash =
			self.return_flight.as_ref().map(|leg| leg.content_hash().0).unwrap_or(0);
		let key = format!(
			"flight-offer:{:016x}:{:016x}:{}:{}",
			self.depart.content_hash().0,
			return_hash,
			self.class.as_str(),
			self.passengers,
		);

		ContentHash(stable_hash(key))
	}
}

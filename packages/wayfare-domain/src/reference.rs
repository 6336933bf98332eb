use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Airport {
	pub id: Uuid,
	pub code: String,
	pub name: String,
	pub city: String,
	pub latitude: f64,
	pub longitude: f64,
}
impl Airport {
	/// Great-circle distance to `other` in kilometres.
	pub fn distance_km(&self, other: &Airport) -> f64 {
		const EARTH_RADIUS_KM: f64 = 6_371.0;

		let lat_a = self.latitude.to_radians();
		let lat_b = other.latitude.to_radians();
		let d_lat = (other.latitude - self.latitude).to_radians();
		let d_lon = (other.longitude - self.longitude).to_radians();
		let h = (d_lat / 2.0).sin().powi(2)
			+ lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

		2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Airline {
	pub id: Uuid,
	pub name: String,
	pub rating: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Airplane {
	pub id: Uuid,
	pub model: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stay {
	pub id: Uuid,
	pub name: String,
	pub city: String,
	pub rating: u8,
}

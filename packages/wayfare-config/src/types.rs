use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub search: Search,
	pub pricing: Pricing,
	pub store: Store,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Days added on each side of the anchor date when dates are flexible or
	/// unspecified.
	pub flexible_window_days: u16,
	pub variants_per_leg: u32,
	pub slots_per_day: u32,
	pub max_route_pairs: u32,
	pub max_trip_pairs: u32,
	/// Hard cap on generated candidates per search call.
	pub candidate_cap: u32,
	pub near_limit: u32,
	/// Trip length assumed when only one of the paired dates is given.
	pub default_trip_days: u16,
	pub default_page_size: u32,
	pub cruise_kmh: f64,
	pub min_leg_minutes: i64,
	pub duration_jitter_minutes: i64,
	pub flight_defaults: FlightSortDefaults,
	pub stay_defaults: StaySortDefaults,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			flexible_window_days: 2,
			variants_per_leg: 3,
			slots_per_day: 6,
			max_route_pairs: 8,
			max_trip_pairs: 12,
			candidate_cap: 500,
			near_limit: 12,
			default_trip_days: 2,
			default_page_size: 20,
			cruise_kmh: 820.0,
			min_leg_minutes: 35,
			duration_jitter_minutes: 45,
			flight_defaults: FlightSortDefaults::default(),
			stay_defaults: StaySortDefaults::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FlightSortDefaults {
	pub primary_sort: String,
	pub primary_descending: bool,
	pub secondary_sort: String,
	pub secondary_descending: bool,
}
impl Default for FlightSortDefaults {
	fn default() -> Self {
		Self {
			primary_sort: "price".to_string(),
			primary_descending: false,
			secondary_sort: "duration".to_string(),
			secondary_descending: false,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StaySortDefaults {
	pub sort: String,
	pub descending: bool,
}
impl Default for StaySortDefaults {
	fn default() -> Self {
		Self { sort: "price".to_string(), descending: false }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pricing {
	/// Prices are rounded to the nearest multiple of this amount; zero
	/// disables rounding.
	pub granularity_minor: i64,
	pub economy_base_minor: i64,
	pub comfort_base_minor: i64,
	pub business_base_minor: i64,
	pub stay_base_minor: i64,
	pub view_step_minor: i64,
	pub airline_weight_minor: i64,
	pub airport_weight_minor: i64,
	pub airplane_weight_minor: i64,
	pub city_weight_minor: i64,
	pub stay_weight_minor: i64,
	pub distance_coeff: f64,
	pub duration_coeff: f64,
}
impl Default for Pricing {
	fn default() -> Self {
		Self {
			granularity_minor: 100,
			economy_base_minor: 9_000,
			comfort_base_minor: 14_000,
			business_base_minor: 21_000,
			stay_base_minor: 12_000,
			view_step_minor: 2_500,
			airline_weight_minor: 800,
			airport_weight_minor: 600,
			airplane_weight_minor: 400,
			city_weight_minor: 900,
			stay_weight_minor: 700,
			distance_coeff: 3.5,
			duration_coeff: 12.0,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Store {
	/// Retries allowed after the first attempt of a version-checked write.
	pub write_retry_limit: u32,
}
impl Default for Store {
	fn default() -> Self {
		Self { write_retry_limit: 3 }
	}
}

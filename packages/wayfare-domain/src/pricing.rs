use wayfare_config::Pricing;

use crate::{flight::ServiceClass, hash::stable_hash, stay::ServiceLevel};

/// Price of a single flight leg in minor units. Referentially transparent:
/// the same inputs always price the same, which keeps an offer's price fixed
/// between generation and persistence within one request.
pub fn flight_leg_price(
	cfg: &Pricing,
	airline_name: &str,
	origin_airport_name: &str,
	airplane_model: &str,
	distance_km: f64,
	duration_minutes: i64,
	class: ServiceClass,
) -> i64 {
	let base = match class {
		ServiceClass::Economy => cfg.economy_base_minor,
		ServiceClass::Comfort => cfg.comfort_base_minor,
		ServiceClass::Business => cfg.business_base_minor,
	};
	let named = name_adjustment(airline_name, cfg.airline_weight_minor)
		+ name_adjustment(origin_airport_name, cfg.airport_weight_minor)
		+ name_adjustment(airplane_model, cfg.airplane_weight_minor);
	let travelled = (distance_km * cfg.distance_coeff) as i64
		+ (duration_minutes as f64 * cfg.duration_coeff) as i64;

	round_to_granularity(base + named + travelled, cfg.granularity_minor)
}

/// Nightly rate for one room in minor units.
pub fn stay_night_price(cfg: &Pricing, city: &str, stay_name: &str, level: ServiceLevel) -> i64 {
	let base = cfg.stay_base_minor + i64::from(level.tier()) * cfg.view_step_minor;
	let named = name_adjustment(city, cfg.city_weight_minor)
		+ name_adjustment(stay_name, cfg.stay_weight_minor);

	round_to_granularity(base + named, cfg.granularity_minor)
}

/// Rounds to the nearest multiple of `granularity`, half up. Zero disables
/// rounding.
pub fn round_to_granularity(amount_minor: i64, granularity: i64) -> i64 {
	if granularity <= 0 {
		return amount_minor;
	}

	(amount_minor + granularity / 2) / granularity * granularity
}

fn name_adjustment(name: &str, weight_minor: i64) -> i64 {
	(stable_hash(name) % 5) as i64 * weight_minor
}

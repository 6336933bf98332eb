mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, FlightSortDefaults, Pricing, Search, StaySortDefaults, Store};

use std::{fs, path::Path};

const FLIGHT_SORT_KEYS: [&str; 5] = ["price", "duration", "time_to_departure", "rating", "score"];
const STAY_SORT_KEYS: [&str; 3] = ["price", "rating", "score"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.search.flexible_window_days > 14 {
		return Err(Error::Validation {
			message: "search.flexible_window_days must be 14 or less.".to_string(),
		});
	}
	if cfg.search.variants_per_leg == 0 {
		return Err(Error::Validation {
			message: "search.variants_per_leg must be greater than zero.".to_string(),
		});
	}
	if !(1..=24).contains(&cfg.search.slots_per_day) {
		return Err(Error::Validation {
			message: "search.slots_per_day must be between 1 and 24.".to_string(),
		});
	}
	if cfg.search.variants_per_leg > cfg.search.slots_per_day {
		return Err(Error::Validation {
			message: "search.variants_per_leg must not exceed search.slots_per_day; every leg \
			          variant occupies its own take-off slot."
				.to_string(),
		});
	}

	for (label, value) in [
		("search.max_route_pairs", cfg.search.max_route_pairs),
		("search.max_trip_pairs", cfg.search.max_trip_pairs),
		("search.candidate_cap", cfg.search.candidate_cap),
		("search.near_limit", cfg.search.near_limit),
		("search.default_page_size", cfg.search.default_page_size),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.search.default_trip_days == 0 {
		return Err(Error::Validation {
			message: "search.default_trip_days must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.cruise_kmh.is_finite() || cfg.search.cruise_kmh <= 0.0 {
		return Err(Error::Validation {
			message: "search.cruise_kmh must be a positive finite number.".to_string(),
		});
	}
	if cfg.search.min_leg_minutes < 0 {
		return Err(Error::Validation {
			message: "search.min_leg_minutes must be zero or greater.".to_string(),
		});
	}
	if cfg.search.duration_jitter_minutes < 0 {
		return Err(Error::Validation {
			message: "search.duration_jitter_minutes must be zero or greater.".to_string(),
		});
	}
	if !FLIGHT_SORT_KEYS.contains(&cfg.search.flight_defaults.primary_sort.as_str()) {
		return Err(Error::Validation {
			message: "search.flight_defaults.primary_sort must be one of price, duration, \
			          time_to_departure, rating, or score."
				.to_string(),
		});
	}
	if !FLIGHT_SORT_KEYS.contains(&cfg.search.flight_defaults.secondary_sort.as_str()) {
		return Err(Error::Validation {
			message: "search.flight_defaults.secondary_sort must be one of price, duration, \
			          time_to_departure, rating, or score."
				.to_string(),
		});
	}
	if !STAY_SORT_KEYS.contains(&cfg.search.stay_defaults.sort.as_str()) {
		return Err(Error::Validation {
			message: "search.stay_defaults.sort must be one of price, rating, or score."
				.to_string(),
		});
	}

	if cfg.pricing.granularity_minor < 0 {
		return Err(Error::Validation {
			message: "pricing.granularity_minor must be zero or greater.".to_string(),
		});
	}
	if cfg.pricing.economy_base_minor <= 0 {
		return Err(Error::Validation {
			message: "pricing.economy_base_minor must be greater than zero.".to_string(),
		});
	}
	if cfg.pricing.comfort_base_minor <= cfg.pricing.economy_base_minor {
		return Err(Error::Validation {
			message: "pricing.comfort_base_minor must exceed pricing.economy_base_minor."
				.to_string(),
		});
	}
	if cfg.pricing.business_base_minor <= cfg.pricing.comfort_base_minor {
		return Err(Error::Validation {
			message: "pricing.business_base_minor must exceed pricing.comfort_base_minor."
				.to_string(),
		});
	}
	if cfg.pricing.stay_base_minor <= 0 {
		return Err(Error::Validation {
			message: "pricing.stay_base_minor must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("pricing.view_step_minor", cfg.pricing.view_step_minor),
		("pricing.airline_weight_minor", cfg.pricing.airline_weight_minor),
		("pricing.airport_weight_minor", cfg.pricing.airport_weight_minor),
		("pricing.airplane_weight_minor", cfg.pricing.airplane_weight_minor),
		("pricing.city_weight_minor", cfg.pricing.city_weight_minor),
		("pricing.stay_weight_minor", cfg.pricing.stay_weight_minor),
	] {
		if value < 0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	for (label, value) in [
		("pricing.distance_coeff", cfg.pricing.distance_coeff),
		("pricing.duration_coeff", cfg.pricing.duration_coeff),
	] {
		if !value.is_finite() || value < 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be a non-negative finite number."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for sort in [
		&mut cfg.search.flight_defaults.primary_sort,
		&mut cfg.search.flight_defaults.secondary_sort,
		&mut cfg.search.stay_defaults.sort,
	] {
		*sort = sort.trim().to_ascii_lowercase();
	}
}

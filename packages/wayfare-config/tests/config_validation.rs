use std::{env, fs};

use wayfare_config::{Config, Error, validate};

fn assert_rejected(cfg: &Config) {
	assert!(matches!(validate(cfg), Err(Error::Validation { .. })));
}

#[test]
fn default_config_is_valid() {
	assert!(validate(&Config::default()).is_ok());
}

#[test]
fn empty_toml_falls_back_to_defaults() {
	let cfg: Config = toml::from_str("").expect("empty config");

	assert!(validate(&cfg).is_ok());
	assert_eq!(cfg.search.variants_per_leg, 3);
	assert_eq!(cfg.store.write_retry_limit, 3);
}

#[test]
fn toml_overrides_apply() {
	let cfg: Config = toml::from_str(
		"\
[search]
flexible_window_days = 1
candidate_cap = 64

[search.flight_defaults]
primary_sort = \"score\"
primary_descending = true

[pricing]
granularity_minor = 0

[store]
write_retry_limit = 5
",
	)
	.expect("override config");

	assert!(validate(&cfg).is_ok());
	assert_eq!(cfg.search.flexible_window_days, 1);
	assert_eq!(cfg.search.candidate_cap, 64);
	assert_eq!(cfg.search.flight_defaults.primary_sort, "score");
	assert!(cfg.search.flight_defaults.primary_descending);
	assert_eq!(cfg.pricing.granularity_minor, 0);
	assert_eq!(cfg.store.write_retry_limit, 5);
}

#[test]
fn rejects_zero_variants_per_leg() {
	let mut cfg = Config::default();

	cfg.search.variants_per_leg = 0;

	assert_rejected(&cfg);
}

#[test]
fn rejects_more_variants_than_slots() {
	let mut cfg = Config::default();

	cfg.search.variants_per_leg = 7;
	cfg.search.slots_per_day = 6;

	assert_rejected(&cfg);
}

#[test]
fn rejects_out_of_range_slots() {
	for slots in [0, 25] {
		let mut cfg = Config::default();

		cfg.search.slots_per_day = slots;

		assert_rejected(&cfg);
	}
}

#[test]
fn rejects_oversized_flexible_window() {
	let mut cfg = Config::default();

	cfg.search.flexible_window_days = 15;

	assert_rejected(&cfg);
}

#[test]
fn rejects_zero_caps() {
	for mutate in [
		(|cfg: &mut Config| cfg.search.max_route_pairs = 0) as fn(&mut Config),
		|cfg| cfg.search.max_trip_pairs = 0,
		|cfg| cfg.search.candidate_cap = 0,
		|cfg| cfg.search.near_limit = 0,
		|cfg| cfg.search.default_page_size = 0,
		|cfg| cfg.search.default_trip_days = 0,
	] {
		let mut cfg = Config::default();

		mutate(&mut cfg);

		assert_rejected(&cfg);
	}
}

#[test]
fn rejects_unordered_class_bases() {
	let mut cfg = Config::default();

	cfg.pricing.comfort_base_minor = cfg.pricing.economy_base_minor;

	assert_rejected(&cfg);

	let mut cfg = Config::default();

	cfg.pricing.business_base_minor = cfg.pricing.comfort_base_minor;

	assert_rejected(&cfg);
}

#[test]
fn rejects_negative_granularity() {
	let mut cfg = Config::default();

	cfg.pricing.granularity_minor = -1;

	assert_rejected(&cfg);
}

#[test]
fn rejects_non_finite_coefficients() {
	let mut cfg = Config::default();

	cfg.pricing.distance_coeff = f64::NAN;

	assert_rejected(&cfg);

	let mut cfg = Config::default();

	cfg.search.cruise_kmh = 0.0;

	assert_rejected(&cfg);
}

#[test]
fn rejects_unknown_sort_keys() {
	let mut cfg = Config::default();

	cfg.search.flight_defaults.primary_sort = "altitude".to_string();

	assert_rejected(&cfg);

	let mut cfg = Config::default();

	cfg.search.stay_defaults.sort = "altitude".to_string();

	assert_rejected(&cfg);
}

#[test]
fn load_normalizes_sort_names() {
	let path = env::temp_dir().join("wayfare-config-normalize.toml");

	fs::write(
		&path,
		"\
[search.flight_defaults]
primary_sort = \" PRICE \"
",
	)
	.expect("write config");

	let cfg = wayfare_config::load(&path).expect("load config");

	assert_eq!(cfg.search.flight_defaults.primary_sort, "price");

	let _ = fs::remove_file(&path);
}

#[test]
fn load_reports_missing_file() {
	let path = env::temp_dir().join("wayfare-config-missing.toml");
	let result = wayfare_config::load(&path);

	assert!(matches!(result, Err(Error::ReadConfig { .. })));
}

#[test]
fn load_reports_invalid_toml() {
	let path = env::temp_dir().join("wayfare-config-invalid.toml");

	fs::write(&path, "[search\n").expect("write config");

	let result = wayfare_config::load(&path);

	assert!(matches!(result, Err(Error::ParseConfig { .. })));

	let _ = fs::remove_file(&path);
}

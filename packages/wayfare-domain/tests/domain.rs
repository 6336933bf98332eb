use time::macros::{date, datetime};
use uuid::Uuid;

use wayfare_config::Pricing;
use wayfare_domain::{
	Airline, Airplane, Airport, ContentHash, Flight, FlightOffer, Identity, ServiceClass,
	ServiceLevel, Stay, StayOffer, pick, pricing, stable_hash,
};

fn airline() -> Airline {
	Airline { id: Uuid::from_u128(1), name: "Aurora Air".to_string(), rating: 4 }
}

fn airplane() -> Airplane {
	Airplane { id: Uuid::from_u128(2), model: "A320neo".to_string() }
}

fn airport(id: u128, code: &str, city: &str, latitude: f64, longitude: f64) -> Airport {
	Airport {
		id: Uuid::from_u128(id),
		code: code.to_string(),
		name: format!("{code} International"),
		city: city.to_string(),
		latitude,
		longitude,
	}
}

fn flight() -> Flight {
	Flight {
		identity: Identity::Transient,
		airline: airline(),
		airplane: airplane(),
		origin: airport(10, "NYC", "New York", 40.64, -73.78),
		destination: airport(11, "LAX", "Los Angeles", 33.94, -118.41),
		departs_at: datetime!(2024-06-01 09:00 UTC),
		arrives_at: datetime!(2024-06-01 15:10 UTC),
		distance_km: 3_970.0,
	}
}

fn offer() -> FlightOffer {
	FlightOffer {
		identity: Identity::Transient,
		depart: flight(),
		return_flight: None,
		class: ServiceClass::Economy,
		passengers: 2,
		favourite: false,
		total_price_minor: 24_000,
	}
}

fn stay_offer() -> StayOffer {
	StayOffer {
		identity: Identity::Transient,
		stay: Stay {
			id: Uuid::from_u128(20),
			name: "Harbour View Hotel".to_string(),
			city: "Los Angeles".to_string(),
			rating: 5,
		},
		service_level: ServiceLevel::Base,
		check_in: date!(2024-06-01),
		check_out: date!(2024-06-04),
		guests: 2,
		rooms: 1,
		favourite: false,
		total_price_minor: 36_000,
	}
}

#[test]
fn stable_hash_is_deterministic() {
	assert_eq!(stable_hash("Aurora Air"), stable_hash("Aurora Air"));
	assert_ne!(stable_hash("Aurora Air"), stable_hash("Pacific Crest"));
}

#[test]
fn pick_stays_within_bounds() {
	for seed in [0, 1, u64::MAX] {
		assert!(pick(seed, 7) < 7);
	}
}

#[test]
fn flight_hash_ignores_identity() {
	let transient = flight();
	let mut persisted = flight();

	persisted.identity = Identity::Persisted(Uuid::from_u128(99));

	assert_eq!(transient.content_hash(), persisted.content_hash());
}

#[test]
fn flight_hash_rounds_times_to_the_minute() {
	let base = flight();
	let mut shifted = flight();

	shifted.departs_at += time::Duration::seconds(20);

	assert_eq!(base.content_hash(), shifted.content_hash());

	shifted.departs_at += time::Duration::seconds(50);

	assert_ne!(base.content_hash(), shifted.content_hash());
}

#[test]
fn flight_hash_tracks_airline() {
	let base = flight();
	let mut other = flight();

	other.airline.id = Uuid::from_u128(77);

	assert_ne!(base.content_hash(), other.content_hash());
}

#[test]
fn offer_hash_ignores_price_and_favourite() {
	let base = offer();
	let mut changed = offer();

	changed.favourite = true;
	changed.total_price_minor = 1;

	assert_eq!(base.content_hash(), changed.content_hash());
}

#[test]
fn offer_hash_tracks_passengers_and_class() {
	let base = offer();
	let mut more_passengers = offer();
	let mut business = offer();

	more_passengers.passengers = 3;
	business.class = ServiceClass::Business;

	assert_ne!(base.content_hash(), more_passengers.content_hash());
	assert_ne!(base.content_hash(), business.content_hash());
}

#[test]
fn stay_offer_hash_tracks_rooms_and_dates() {
	let base = stay_offer();
	let mut more_rooms = stay_offer();
	let mut later = stay_offer();

	more_rooms.rooms = 2;
	later.check_out = date!(2024-06-05);

	assert_ne!(base.content_hash(), more_rooms.content_hash());
	assert_ne!(base.content_hash(), later.content_hash());
	assert_eq!(base.nights(), 3);
}

#[test]
fn rounding_respects_granularity() {
	assert_eq!(pricing::round_to_granularity(149, 100), 100);
	assert_eq!(pricing::round_to_granularity(150, 100), 200);
	assert_eq!(pricing::round_to_granularity(200, 100), 200);
	assert_eq!(pricing::round_to_granularity(149, 0), 149);
}

#[test]
fn leg_price_orders_service_classes() {
	let cfg = Pricing::default();
	let price = |class| {
		pricing::flight_leg_price(&cfg, "Aurora Air", "NYC International", "A320neo", 3_970.0, 370, class)
	};

	assert!(price(ServiceClass::Economy) < price(ServiceClass::Comfort));
	assert!(price(ServiceClass::Comfort) < price(ServiceClass::Business));
}

#[test]
fn leg_price_is_referentially_transparent() {
	let cfg = Pricing::default();
	let one = pricing::flight_leg_price(&cfg, "Aurora Air", "NYC", "A320neo", 1_000.0, 120, ServiceClass::Economy);
	let two = pricing::flight_leg_price(&cfg, "Aurora Air", "NYC", "A320neo", 1_000.0, 120, ServiceClass::Economy);

	assert_eq!(one, two);
}

#[test]
fn stay_price_rises_with_service_level() {
	let cfg = Pricing::default();
	let price =
		|level| pricing::stay_night_price(&cfg, "Los Angeles", "Harbour View Hotel", level);

	assert!(price(ServiceLevel::Base) < price(ServiceLevel::CityView));
	assert!(price(ServiceLevel::CityView) < price(ServiceLevel::OceanView));
}

#[test]
fn service_level_covers_every_seed() {
	assert_eq!(ServiceLevel::from_seed(0), ServiceLevel::Base);
	assert_eq!(ServiceLevel::from_seed(1), ServiceLevel::CityView);
	assert_eq!(ServiceLevel::from_seed(2), ServiceLevel::OceanView);
	assert_eq!(ServiceLevel::from_seed(5), ServiceLevel::OceanView);
}

#[test]
fn identity_reports_persistence() {
	let id = Uuid::from_u128(3);

	assert!(!Identity::Transient.is_persisted());
	assert_eq!(Identity::Transient.persisted(), None);
	assert_eq!(Identity::Persisted(id).persisted(), Some(id));
}

#[test]
fn flight_serde_round_trips() {
	let original = flight();
	let json = serde_json::to_string(&original).expect("serialize flight");
	let decoded: Flight = serde_json::from_str(&json).expect("deserialize flight");

	assert_eq!(original.content_hash(), decoded.content_hash());
	assert_eq!(original.departs_at, decoded.departs_at);
	assert_eq!(original.arrives_at, decoded.arrives_at);
}

#[test]
fn content_hash_displays_as_hex() {
	assert_eq!(format!("{}", ContentHash(0xff)).len(), 16);
}

#[test]
fn distance_is_symmetric() {
	let nyc = airport(10, "NYC", "New York", 40.64, -73.78);
	let lax = airport(11, "LAX", "Los Angeles", 33.94, -118.41);
	let there = nyc.distance_km(&lax);
	let back = lax.distance_km(&nyc);

	assert!((there - back).abs() < 1e-6);
	assert!((3_000.0..5_000.0).contains(&there));
}

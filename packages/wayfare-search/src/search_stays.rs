use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::{
	Error, OfferEngine, PageRequest, Result, SortSpec,
	pipeline::{self, Ranked},
	reconcile, required, variants,
};
use wayfare_config::Config;
use wayfare_domain::{
	Identity, ServiceLevel, SortDirection, Stay, StayOffer, StaySortKey, pricing, sort,
	stable_hash,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StayFilter {
	/// City slug; unset means every known stay is a candidate.
	pub city: Option<String>,
	#[serde(default, with = "wayfare_domain::time_serde::date_option")]
	pub check_in: Option<Date>,
	#[serde(default, with = "wayfare_domain::time_serde::date_option")]
	pub check_out: Option<Date>,
	#[serde(default)]
	pub flexible_dates: bool,
	pub guests: u32,
	pub rooms: u32,
	#[serde(default)]
	pub price_min_minor: Option<i64>,
	#[serde(default)]
	pub price_max_minor: Option<i64>,
	#[serde(default)]
	pub ratings: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaySearchRequest {
	pub user_id: String,
	pub filter: StayFilter,
	#[serde(default)]
	pub sort: Option<SortSpec<StaySortKey>>,
	#[serde(default)]
	pub page: PageRequest,
	#[serde(default)]
	pub want_narrowing: bool,
	#[serde(default)]
	pub record_seen: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StayNarrowing {
	pub price_min_minor: i64,
	pub price_max_minor: i64,
	pub service_levels: Vec<ServiceLevel>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaySearchResponse {
	pub items: Vec<StayOffer>,
	pub total: usize,
	pub narrowing: Option<StayNarrowing>,
}

impl OfferEngine {
	/// Runs a full stay search through the same pipeline as flights: one
	/// candidate per (dates, stay) combination, single-key sort, optional
	/// narrowing, pagination, then reconciliation of the page.
	pub async fn search_stay_offers(
		&self,
		req: StaySearchRequest,
		now: OffsetDateTime,
	) -> Result<StaySearchResponse> {
		validate(&req)?;

		let stays = match req.filter.city.as_deref() {
			Some(city) => required(
				self.reference.stays.list_near(city, self.cfg.search.near_limit).await?,
				"stays",
			)?,
			None => required(self.reference.stays.list_all().await?, "stays")?,
		};
		let dates = variants::stay_date_pairs(
			req.filter.check_in,
			req.filter.check_out,
			req.filter.flexible_dates,
			self.cfg.search.flexible_window_days,
			self.cfg.search.default_trip_days,
			now.date(),
		);
		let pricing_cfg = &self.cfg.pricing;
		let (guests, rooms) = (req.filter.guests, req.filter.rooms);
		let mut seen = HashSet::new();
		let candidates: Vec<StayOffer> = dates
			.iter()
			.flat_map(|&(check_in, check_out)| {
				stays
					.iter()
					.map(move |stay| build_offer(pricing_cfg, stay, check_in, check_out, guests, rooms))
			})
			.filter(|offer| seen.insert(offer.content_hash()))
			.take(self.cfg.search.candidate_cap as usize)
			.collect();

		debug!(
			candidates = candidates.len(),
			stays = stays.len(),
			dates = dates.len(),
			"Generated stay candidates."
		);

		let sort_spec = resolve_sort(&self.cfg, req.sort);
		let mut ranked = pipeline::rank(
			candidates,
			|offer| sort::stay_factor(offer, sort_spec.key),
			|_| 0.0,
		);

		pipeline::stable_sort(&mut ranked, sort_spec.direction(), SortDirection::Ascending);

		// Computed before the filter so the advertised ranges are true.
		let narrowing = req.want_narrowing.then(|| narrow(&ranked));

		ranked.retain(|ranked| filter_matches(&req.filter, &ranked.offer));

		let skip = req.page.skip as usize;
		let take = req.page.take.unwrap_or(self.cfg.search.default_page_size) as usize;
		let (page, total) = pipeline::paginate(ranked, skip, take);
		let mut items: Vec<StayOffer> = page.into_iter().map(|ranked| ranked.offer).collect();

		reconcile::stay_page(
			self.store.as_ref(),
			&self.cfg,
			&req.user_id,
			&mut items,
			req.record_seen.unwrap_or(true),
			now,
		)
		.await?;

		Ok(StaySearchResponse { items, total, narrowing })
	}
}

fn validate(req: &StaySearchRequest) -> Result<()> {
	if req.user_id.trim().is_empty() {
		return Err(Error::InvalidRequest { message: "user_id is required.".to_string() });
	}
	if req.filter.guests == 0 {
		return Err(Error::InvalidRequest { message: "guests must be at least one.".to_string() });
	}
	if req.filter.rooms == 0 {
		return Err(Error::InvalidRequest { message: "rooms must be at least one.".to_string() });
	}
	if let (Some(check_in), Some(check_out)) = (req.filter.check_in, req.filter.check_out)
		&& check_out <= check_in
	{
		return Err(Error::InvalidRequest {
			message: "check_out must be after check_in.".to_string(),
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

	Ok(())
}

fn build_offer(
	cfg: &wayfare_config::Pricing,
	stay: &Stay,
	check_in: Date,
	check_out: Date,
	guests: u32,
	rooms: u32,
) -> StayOffer {
	let service_level = ServiceLevel::from_seed(stable_hash(format!("{}:level", stay.name)));
	let nights = (check_out - check_in).whole_days();
	let total_price_minor = pricing::stay_night_price(cfg, &stay.city, &stay.name, service_level)
		* nights
		* i64::from(rooms);

	StayOffer {
		identity: Identity::Transient,
		stay: stay.clone(),
		service_level,
		check_in,
		check_out,
		guests,
		rooms,
		favourite: false,
		total_price_minor,
	}
}

fn resolve_sort(cfg: &Config, sort: Option<SortSpec<StaySortKey>>) -> SortSpec<StaySortKey> {
	let defaults = &cfg.search.stay_defaults;

	sort.unwrap_or(SortSpec {
		key: StaySortKey::parse(&defaults.sort).unwrap_or(StaySortKey::Price),
		descending: defaults.descending,
	})
}

fn narrow(ranked: &[Ranked<StayOffer>]) -> StayNarrowing {
	let (price_min_minor, price_max_minor) =
		pipeline::price_bounds(ranked, |offer| offer.total_price_minor).unwrap_or((0, 0));
	let mut service_levels: Vec<ServiceLevel> = Vec::new();

	for ranked in ranked {
		if !service_levels.contains(&ranked.offer.service_level) {
			service_levels.push(ranked.offer.service_level);
		}
	}

	service_levels.sort();

	StayNarrowing { price_min_minor, price_max_minor, service_levels }
}

fn filter_matches(filter: &StayFilter, offer: &StayOffer) -> bool {
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

	pipeline::rating_matches(&filter.ratings, offer.stay.rating)
}

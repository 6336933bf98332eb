use time::Date;

use crate::{
	hash::{ContentHash, stable_hash},
	identity::Identity,
	reference::Stay,
};

#[derive(
	Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
	Base,
	CityView,
	OceanView,
}
impl ServiceLevel {
	pub fn tier(self) -> u8 {
		match self {
			Self::Base => 0,
			Self::CityView => 1,
			Self::OceanView => 2,
		}
	}

	pub fn from_seed(seed: u64) -> Self {
		match seed % 3 {
			0 => Self::Base,
			1 => Self::CityView,
			_ => Self::OceanView,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Base => "base",
			Self::CityView => "city_view",
			Self::OceanView => "ocean_view",
		}
	}
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StayOffer {
	pub identity: Identity,
	pub stay: Stay,
	pub service_level: ServiceLevel,
	#[serde(with = "crate::time_serde::date")]
	pub check_in: Date,
	#[serde(with = "crate::time_serde::date")]
	pub check_out: Date,
	pub guests: u32,
	pub rooms: u32,
	pub favourite: bool,
	pub total_price_minor: i64,
}
impl StayOffer {
	pub fn nights(&self) -> i64 {
		(self.check_out - self.check_in).whole_days()
	}

	/// Fingerprint of the offer's semantic fields. The favourite flag and the
	/// price are store- or pricing-owned and never feed the hash.
	pub fn content_hash(&self) -> ContentHash {
		let key = format!(
			"stay-offer:{}:{}:{}:{}:{}",
			self.stay.id, self.check_in, self.check_out, self.guests, self.rooms,
		);

		ContentHash(stable_hash(key))
	}
}

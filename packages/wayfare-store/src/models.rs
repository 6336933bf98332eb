use time::OffsetDateTime;
use uuid::Uuid;

use wayfare_domain::ContentHash;

#[derive(Clone, Copy, Debug)]
pub struct FlightRecord {
	pub id: Uuid,
	pub content_hash: ContentHash,
	pub version: i64,
}

#[derive(Clone, Copy, Debug)]
pub struct OfferRecord {
	pub id: Uuid,
	pub content_hash: ContentHash,
	pub version: i64,
	/// Resolved for the user the lookup was made for.
	pub favourite: bool,
	pub seen_count: i64,
	pub last_seen_at: Option<OffsetDateTime>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OfferClass {
	Flight,
	Stay,
}
impl OfferClass {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Flight => "flight offer",
			Self::Stay => "stay offer",
		}
	}
}

/// Version-checked update of the store-owned counters on an offer row.
#[derive(Clone, Copy, Debug)]
pub struct SeenUpdate {
	pub id: Uuid,
	pub expected_version: i64,
	pub seen_count: i64,
	pub last_seen_at: OffsetDateTime,
}

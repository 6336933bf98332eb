use serde::{Deserialize, Deserializer, Serializer};
use time::Date;

use super::date::FORMAT;

pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match value {
		Some(value) => {
			let formatted = value.format(&FORMAT).map_err(serde::ser::Error::custom)?;

			serializer.serialize_some(&formatted)
		},
		None => serializer.serialize_none(),
	}
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;

	raw.map(|raw| Date::parse(&raw, &FORMAT).map_err(serde::de::Error::custom)).transpose()
}

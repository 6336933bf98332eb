use uuid::Uuid;

/// Persistence state of a generated entity. Everything leaves the variant
/// generator as [`Identity::Transient`]; reconciliation swaps the identity
/// in place once the entity is backed by a durable row.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "id")]
pub enum Identity {
	Transient,
	Persisted(Uuid),
}
impl Identity {
	pub fn persisted(&self) -> Option<Uuid> {
		match self {
			Self::Transient => None,
			Self::Persisted(id) => Some(*id),
		}
	}

	pub fn is_persisted(&self) -> bool {
		matches!(self, Self::Persisted(_))
	}
}

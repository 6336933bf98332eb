use uuid::Uuid;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A uniqueness or optimistic-version violation. Whether it is worth
	/// retrying depends on the writer's view of the entity, not on the store.
	#[error("Write conflict on {entity} {key}.")]
	Conflict { entity: &'static str, key: String },
	#[error("{entity} {id} was not found.")]
	NotFound { entity: &'static str, id: Uuid },
	#[error("Storage backend failure: {message}")]
	Backend { message: String },
}
impl Error {
	pub fn is_conflict(&self) -> bool {
		matches!(self, Self::Conflict { .. })
	}
}

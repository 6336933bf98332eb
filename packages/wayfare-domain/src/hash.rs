use std::fmt::{Display, Formatter};

/// Stable fingerprint of arbitrary bytes: the first eight bytes of the
/// BLAKE3 digest, little-endian. The same function drives pseudo-random
/// selection and durable content identity, so the algorithm is fixed for the
/// lifetime of the store; changing it would orphan every persisted hash.
pub fn stable_hash(input: impl AsRef<[u8]>) -> u64 {
	let digest = blake3::hash(input.as_ref());
	let bytes = digest.as_bytes();

	u64::from_le_bytes([
		bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
	])
}

/// Selects an index from a pool of `len` candidates. `len` must be non-zero;
/// callers check reference data for emptiness before selecting.
pub fn pick(seed: u64, len: usize) -> usize {
	(seed % len as u64) as usize
}

/// Content identity of a generated entity, derived from its semantic fields
/// only. Two values with equal hashes are the same entity regardless of
/// in-memory or persisted identity.
#[derive(
	Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub struct ContentHash(pub u64);
impl Display for ContentHash {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:016x}", self.0)
	}
}

use std::future::Future;

use tracing::warn;

use crate::{Error, Result};
use wayfare_store::INITIAL_VERSION;

/// Wraps a single version-checked write against an entity carrying an
/// optimistic version.
///
/// A conflict on an entity still at [`INITIAL_VERSION`] is a genuine
/// duplicate — two first-time creations of the same content — and is
/// rethrown immediately; re-resolving by content hash is the caller's job.
/// A conflict on a persisted version is a concurrent update: `on_collision`
/// refreshes the state (typically by re-reading the row) and the write is
/// retried, at most `retry_limit` times after the first attempt. Exhausting
/// the limit surfaces the last storage error unchanged.
pub async fn with_version_retry<S, T, Op, OpFut, OnCollision, CollisionFut>(
	retry_limit: u32,
	mut state: S,
	version: impl Fn(&S) -> i64,
	mut op: Op,
	mut on_collision: OnCollision,
) -> Result<T>
where
	S: Clone,
	Op: FnMut(S) -> OpFut,
	OpFut: Future<Output = wayfare_store::Result<T>>,
	OnCollision: FnMut(S) -> CollisionFut,
	CollisionFut: Future<Output = wayfare_store::Result<S>>,
{
	let mut retries = 0;

	loop {
		let err = match op(state.clone()).await {
			Ok(value) => return Ok(value),
			Err(err) if err.is_conflict() => err,
			Err(err) => return Err(Error::Store(err)),
		};

		if version(&state) == INITIAL_VERSION || retries == retry_limit {
			return Err(Error::Store(err));
		}

		retries += 1;

		warn!(retries, retry_limit, "Optimistic write conflict; re-reading latest state.");

		state = on_collision(state).await.map_err(Error::Store)?;
	}
}

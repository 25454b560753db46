//! Thread-safe in-memory [`StateStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	state::{StateFuture, StateStore, TapState},
};

/// In-process checkpoint store backing tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<TapState>>);
impl MemoryStore {
	/// Returns a copy of the most recently persisted snapshot.
	pub fn snapshot(&self) -> TapState {
		self.0.read().clone()
	}
}
impl StateStore for MemoryStore {
	fn load(&self) -> StateFuture<'_, TapState> {
		let inner = self.0.clone();

		Box::pin(async move { Ok(inner.read().clone()) })
	}

	fn persist<'a>(&'a self, state: &'a TapState) -> StateFuture<'a, ()> {
		let inner = self.0.clone();
		let state = state.clone();

		Box::pin(async move {
			*inner.write() = state;

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::stream::{CURSOR_FIELD, Stream};

	#[tokio::test]
	async fn persist_replaces_the_whole_snapshot() {
		let store = MemoryStore::default();
		let mut state = TapState::default();

		state.set_bookmark(Stream::Logs, CURSOR_FIELD, "2019-11-22T18");
		store.persist(&state).await.expect("Memory persist should succeed.");

		assert_eq!(store.snapshot(), state);
		assert_eq!(
			store.load().await.expect("Memory load should succeed."),
			state,
		);
	}
}

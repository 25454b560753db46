//! Checkpoint state, cursor resolution, and persistence contracts.
//!
//! The checkpoint is a mapping from stream name to cursor fields. It is loaded
//! once per run, threaded by value through each stream sync, and written back
//! through a [`StateStore`] immediately after each per-stream advance so a
//! crash mid-run only loses progress for in-flight or not-yet-processed
//! streams.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	config::TapConfig,
	stream::{CURSOR_FIELD, Granularity, Stream},
};

/// Boxed future returned by [`StateStore`] methods.
pub type StateFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StateError>> + 'a + Send>>;

/// Persistence contract for checkpoint snapshots.
pub trait StateStore
where
	Self: Send + Sync,
{
	/// Loads the checkpoint snapshot recorded by the previous run.
	fn load(&self) -> StateFuture<'_, TapState>;

	/// Persists the full checkpoint mapping after a stream advance.
	fn persist<'a>(&'a self, state: &'a TapState) -> StateFuture<'a, ()>;
}

/// Error type produced by [`StateStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StateError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Bookmark mapping from stream name to cursor fields.
///
/// Serialized transparently, so the on-disk form is exactly the state blob,
/// e.g. `{"logs":{"since":"2019-11-22T18"}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TapState(BTreeMap<String, BTreeMap<String, String>>);
impl TapState {
	/// Returns the bookmark value for `(stream, field)`, if present.
	pub fn bookmark(&self, stream: Stream, field: &str) -> Option<&str> {
		self.0.get(stream.as_str()).and_then(|fields| fields.get(field)).map(String::as_str)
	}

	/// Records a bookmark value, replacing any prior cursor for the stream.
	pub fn set_bookmark(&mut self, stream: Stream, field: &str, value: impl Into<String>) {
		self.0.entry(stream.as_str().to_owned()).or_default().insert(field.to_owned(), value.into());
	}

	/// Returns the number of streams with a recorded bookmark.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// True when no stream has a recorded bookmark.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Resolves a stream's resume cursor.
///
/// The recorded bookmark wins; otherwise the configured start value for the
/// stream's granularity applies. Pure with respect to wall-clock time:
/// identical state and config always yield the same cursor.
pub fn resolve_cursor<'a>(state: &'a TapState, config: &'a TapConfig, stream: Stream) -> &'a str {
	state.bookmark(stream, CURSOR_FIELD).unwrap_or_else(|| match stream.granularity() {
		Granularity::Hourly => config.start_hour.as_ref(),
		Granularity::Monthly => config.start_month.as_ref(),
	})
}

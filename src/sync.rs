//! Stream-sync orchestration: declare, fetch, emit, checkpoint.
//!
//! Each stream runs through the same cycle per run: `PENDING → FETCHING →
//! (EMITTING → CHECKPOINTED) | ABANDONED`. The schema is declared before the
//! fetch, records are emitted in page order, and the bookmark advances to the
//! current UTC hour only once every record of a non-null page has been handed
//! to the sink. An abandoned fetch leaves the bookmark untouched so the next
//! run retries the identical window. Emission is at-least-once: a crash after
//! partial emission but before the checkpoint write replays the window.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	config::TapConfig,
	cursor::HourStamp,
	error::ConfigError,
	http::UsageClient,
	obs::{self, SyncOutcome, SyncSpan},
	schema::{SchemaSet, StreamSchema},
	sink::RecordSink,
	state::{StateStore, TapState},
	stream::{CURSOR_FIELD, Granularity, KEY_FIELDS, Stream},
};

/// Orchestrates per-stream syncs against the usage API.
///
/// The syncer owns the HTTP client, the checkpoint store, and the emission
/// sink so individual stream syncs can focus on the fetch/emit/advance cycle.
/// Checkpoint state is threaded by value: callers pass the loaded snapshot in
/// and receive the (possibly advanced) snapshot back.
pub struct Syncer {
	/// Rate-limited client used for every upstream fetch.
	pub client: UsageClient,
	/// Checkpoint store written after each successful stream advance.
	pub store: Arc<dyn StateStore>,
	/// Schema/record emission sink.
	pub sink: Arc<dyn RecordSink>,
	/// Run configuration carrying the fallback start cursors.
	pub config: TapConfig,
}
impl Syncer {
	/// Creates a syncer from its collaborators.
	pub fn new(
		client: UsageClient,
		store: Arc<dyn StateStore>,
		sink: Arc<dyn RecordSink>,
		config: TapConfig,
	) -> Self {
		Self { client, store, sink, config }
	}

	/// Syncs a single stream and returns the (possibly advanced) checkpoint.
	///
	/// A null page (fetch failure or an exhausted rate limit) is not an
	/// error: the stream simply yields no data this run. Sink and store
	/// failures do propagate, since a broken output channel or checkpoint
	/// store must stop the run.
	pub async fn sync_stream(
		&self,
		mut state: TapState,
		stream: Stream,
		schema: &StreamSchema,
	) -> Result<TapState> {
		let span = SyncSpan::new(stream, "sync_stream");

		obs::record_stream_outcome(stream, SyncOutcome::Attempt);

		span.instrument(async move {
			self.sink.declare_schema(stream, schema, KEY_FIELDS)?;

			let page = match stream.granularity() {
				Granularity::Hourly =>
					self.client.hourly_usage(&state, &self.config, stream).await,
				Granularity::Monthly => self.client.monthly_usage(&state, &self.config).await,
			};
			let Some(page) = page else {
				obs::record_stream_outcome(stream, SyncOutcome::Abandoned);

				return Ok(state);
			};

			match page.get("usage").and_then(Value::as_array) {
				Some(records) => {
					for record in records {
						self.sink.emit_record(stream, record)?;
					}

					tracing::info!(
						stream = stream.as_str(),
						records = records.len(),
						"Stream synced."
					);
				},
				None => tracing::warn!(
					stream = stream.as_str(),
					"Usage page is missing its `usage` list; nothing to emit."
				),
			}

			state.set_bookmark(stream, CURSOR_FIELD, HourStamp::now_utc());
			self.store.persist(&state).await?;
			obs::record_stream_outcome(stream, SyncOutcome::Success);

			Ok(state)
		})
		.await
	}

	/// Syncs every known stream in declaration order, threading the checkpoint
	/// through each and persisting after every advance.
	pub async fn sync_all(&self, mut state: TapState, schemas: &SchemaSet) -> Result<TapState> {
		for stream in Stream::ALL {
			let schema = schemas.get(stream).ok_or(ConfigError::MissingSchema { stream })?;

			state = self.sync_stream(state, stream, schema).await?;
		}

		Ok(state)
	}
}

// self
use crate::{_prelude::*, stream::Stream};

/// A span builder used by stream syncs.
#[derive(Clone, Debug)]
pub struct SyncSpan {
	span: tracing::Span,
}
impl SyncSpan {
	/// Creates a new span tagged with the provided stream + stage.
	pub fn new(stream: Stream, stage: &'static str) -> Self {
		Self { span: tracing::info_span!("usage_tap.sync", stream = stream.as_str(), stage) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> tracing::instrument::Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = SyncSpan::new(Stream::Logs, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}

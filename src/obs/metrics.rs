// self
use crate::{obs::SyncOutcome, stream::Stream};

/// Records a stream outcome via the global metrics recorder (when enabled).
pub fn record_stream_outcome(stream: Stream, outcome: SyncOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"usage_tap_stream_total",
			"stream" => stream.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stream, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_stream_outcome_noop_without_metrics() {
		record_stream_outcome(Stream::TraceSearch, SyncOutcome::Abandoned);
	}
}

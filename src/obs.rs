//! Observability helpers for stream syncs.
//!
//! Spans are always emitted: `usage_tap.sync`, tagged with the `stream` and
//! `stage` fields. Enable the `metrics` feature to additionally increment the
//! `usage_tap_stream_total` counter for every attempt/success/abandonment,
//! labeled by `stream` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each stream sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncOutcome {
	/// Entry to a stream sync.
	Attempt,
	/// Records emitted (possibly zero) and the checkpoint advanced.
	Success,
	/// Fetch failed or exhausted its attempts; checkpoint left untouched.
	Abandoned,
}
impl SyncOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SyncOutcome::Attempt => "attempt",
			SyncOutcome::Success => "success",
			SyncOutcome::Abandoned => "abandoned",
		}
	}
}
impl Display for SyncOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

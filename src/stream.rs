//! The closed set of usage streams extracted from the upstream API.

// self
use crate::_prelude::*;

/// Cursor field recorded in the checkpoint for every stream.
pub const CURSOR_FIELD: &str = "since";
/// Key fields declared alongside every stream schema.
pub const KEY_FIELDS: &[&str] = &["hour"];

/// Usage categories served by the metered API.
///
/// The set is closed: adding a stream means adding a variant here together
/// with its path segment and granularity, so dispatch stays exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stream {
	/// Hourly log ingestion and indexing volumes.
	Logs,
	/// Hourly custom metric timeseries counts.
	CustomUsage,
	/// Hourly Fargate task counts.
	Fargate,
	/// Hourly host and container counts.
	HostsAndContainers,
	/// Hourly synthetic check call counts.
	Synthetics,
	/// Monthly top average custom metrics.
	TopAverageMetrics,
	/// Hourly indexed trace search events.
	TraceSearch,
}
impl Stream {
	/// Every known stream, in sync order.
	pub const ALL: [Stream; 7] = [
		Stream::Logs,
		Stream::CustomUsage,
		Stream::Fargate,
		Stream::HostsAndContainers,
		Stream::Synthetics,
		Stream::TopAverageMetrics,
		Stream::TraceSearch,
	];

	/// Returns the stable stream name used for records, bookmarks, and labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stream::Logs => "logs",
			Stream::CustomUsage => "custom_usage",
			Stream::Fargate => "fargate",
			Stream::HostsAndContainers => "hosts_and_containers",
			Stream::Synthetics => "synthetics",
			Stream::TopAverageMetrics => "top_average_metrics",
			Stream::TraceSearch => "trace_search",
		}
	}

	/// Returns the upstream path segment the stream is fetched from.
	pub const fn path(self) -> &'static str {
		match self {
			Stream::Logs => "logs",
			Stream::CustomUsage => "timeseries",
			Stream::Fargate => "fargate",
			Stream::HostsAndContainers => "hosts",
			Stream::Synthetics => "synthetic",
			Stream::TopAverageMetrics => "top_avg_metrics",
			Stream::TraceSearch => "traces",
		}
	}

	/// Returns the time granularity the stream reports at.
	pub const fn granularity(self) -> Granularity {
		match self {
			Stream::TopAverageMetrics => Granularity::Monthly,
			_ => Granularity::Hourly,
		}
	}
}
impl Display for Stream {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Reporting granularity of a stream's usage windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
	/// Hour-bucketed usage queried with a start/end hour range.
	Hourly,
	/// Month-bucketed usage queried with a single month parameter.
	Monthly,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn names_and_paths_stay_stable() {
		let table = [
			(Stream::Logs, "logs", "logs"),
			(Stream::CustomUsage, "custom_usage", "timeseries"),
			(Stream::Fargate, "fargate", "fargate"),
			(Stream::HostsAndContainers, "hosts_and_containers", "hosts"),
			(Stream::Synthetics, "synthetics", "synthetic"),
			(Stream::TopAverageMetrics, "top_average_metrics", "top_avg_metrics"),
			(Stream::TraceSearch, "trace_search", "traces"),
		];

		for (stream, name, path) in table {
			assert_eq!(stream.as_str(), name);
			assert_eq!(stream.path(), path);
		}
	}

	#[test]
	fn only_top_average_metrics_is_monthly() {
		for stream in Stream::ALL {
			let expected = if stream == Stream::TopAverageMetrics {
				Granularity::Monthly
			} else {
				Granularity::Hourly
			};

			assert_eq!(stream.granularity(), expected);
		}
	}

	#[test]
	fn all_covers_each_stream_exactly_once() {
		let mut names: Vec<_> = Stream::ALL.iter().map(|stream| stream.as_str()).collect();

		names.sort_unstable();
		names.dedup();

		assert_eq!(names.len(), Stream::ALL.len());
	}
}

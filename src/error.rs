//! Crate-level error types shared across the client, stores, and sink.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Checkpoint-storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::state::StateError,
	),
	/// Emission-sink failure.
	#[error("{0}")]
	Sink(
		#[from]
		#[source]
		crate::sink::SinkError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream returned an unusable response.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL is invalid or cannot be joined with a stream path.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required file could not be read.
	#[error("Failed to read `{path}`.")]
	Read {
		/// Path of the unreadable file.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// A configuration or schema document failed to parse.
	#[error("Failed to parse `{path}`.")]
	Parse {
		/// Path of the malformed document.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// No schema document was loaded for a stream.
	#[error("No schema document for the `{stream}` stream.")]
	MissingSchema {
		/// Stream lacking a schema.
		stream: crate::stream::Stream,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Unusable upstream responses (non-success statuses, malformed bodies).
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Endpoint answered with a non-success status other than 429.
	#[error("Usage endpoint `{path}` returned HTTP {status}.")]
	Status {
		/// Requested path segment.
		path: String,
		/// HTTP status code.
		status: u16,
	},
	/// Endpoint returned malformed JSON.
	#[error("Usage endpoint `{path}` returned malformed JSON.")]
	BodyParse {
		/// Requested path segment.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the malformed response.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the usage endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		Self::network(e)
	}
}

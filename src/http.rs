//! Rate-limit-aware HTTP client for the usage endpoints.
//!
//! [`UsageClient`] owns one shared reqwest client (connection reuse across
//! every call, `Accept: application/json` set once) and exposes the two query
//! shapes the upstream serves: an hourly range (`start_hr`/`end_hr`) used by
//! six streams and a single-month query used by the top-average-metrics
//! stream. Rate-limited responses are retried with a bounded, buffered
//! backoff; every other failure is scoped to the calling stream.

// crates.io
use reqwest::{
	StatusCode,
	header::{ACCEPT, HeaderMap, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	config::TapConfig,
	cursor::HourStamp,
	error::{ConfigError, TransportError, UpstreamError},
	state::{TapState, resolve_cursor},
	stream::Stream,
};

/// Default production endpoint for the usage API.
pub const DEFAULT_BASE_URL: &str = "https://api.datadoghq.com/api/v1/usage/";
/// Hard cap of request attempts per logical call, rate-limit retries included.
pub const MAX_ATTEMPTS: u32 = 3;

// `X-RateLimit-Reset` on the wire; header names normalize to lowercase.
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";
const DEFAULT_RESET_HINT: Duration = Duration::seconds(60);
const RETRY_BUFFER: Duration = Duration::seconds(60);

/// Shared client issuing authenticated GET requests with bounded rate-limit retries.
#[derive(Clone, Debug)]
pub struct UsageClient {
	http: ReqwestClient,
	base_url: Url,
	credentials: Credentials,
}
impl UsageClient {
	/// Builds a client against the production endpoint.
	pub fn new(credentials: Credentials) -> Result<Self, ConfigError> {
		Self::with_base_url(credentials, DEFAULT_BASE_URL)
	}

	/// Builds a client against a caller-provided endpoint (tests, alternate sites).
	pub fn with_base_url(
		credentials: Credentials,
		base_url: impl AsRef<str>,
	) -> Result<Self, ConfigError> {
		let raw = base_url.as_ref();
		// Trailing slash so stream paths join under the base instead of replacing
		// its last segment.
		let normalized = if raw.ends_with('/') { raw.to_owned() } else { format!("{raw}/") };
		let base_url = Url::parse(&normalized)
			.map_err(|e| ConfigError::InvalidBaseUrl { url: raw.to_owned(), source: e })?;
		let headers = {
			let mut map = HeaderMap::new();

			map.insert(ACCEPT, HeaderValue::from_static("application/json"));

			map
		};
		let http = ReqwestClient::builder().default_headers(headers).build()?;

		Ok(Self { http, base_url, credentials })
	}

	/// Issues one logical GET against `base + path` with the merged parameters.
	///
	/// HTTP 429 responses are retried after sleeping the buffered reset hint,
	/// up to [`MAX_ATTEMPTS`] total attempts; exhausting them abandons the call
	/// and yields `Ok(None)` rather than an error, since the caller treats a
	/// persistent rate limit as "no data this run". Any other non-success
	/// status is an error for the caller to scope.
	pub async fn fetch(
		&self,
		path: &str,
		params: &[(&str, &str)],
	) -> Result<Option<serde_json::Value>> {
		let url = self.base_url.join(path).map_err(|e| ConfigError::InvalidBaseUrl {
			url: format!("{}{path}", self.base_url),
			source: e,
		})?;

		for attempt in 1..=MAX_ATTEMPTS {
			let response = self
				.http
				.get(url.clone())
				.query(params)
				.query(&self.credentials.query_params())
				.send()
				.await
				.map_err(TransportError::from)?;
			let status = response.status();

			if status == StatusCode::TOO_MANY_REQUESTS {
				if attempt == MAX_ATTEMPTS {
					break;
				}

				let delay = backoff_delay(parse_reset_hint(response.headers()));

				tracing::warn!(
					path,
					attempt,
					delay_secs = delay.whole_seconds(),
					"Rate limited; backing off before retrying."
				);
				tokio::time::sleep(delay.unsigned_abs()).await;

				continue;
			}
			if !status.is_success() {
				return Err(UpstreamError::Status {
					path: path.to_owned(),
					status: status.as_u16(),
				}
				.into());
			}

			let bytes = response.bytes().await.map_err(TransportError::from)?;
			let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
			let body = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
				UpstreamError::BodyParse {
					path: path.to_owned(),
					source: e,
					status: status.as_u16(),
				}
			})?;

			return Ok(Some(body));
		}

		tracing::warn!(
			path,
			attempts = MAX_ATTEMPTS,
			"Rate limit persisted through every attempt; abandoning the call."
		);

		Ok(None)
	}

	/// Fetches one page of hourly usage for `stream`.
	///
	/// The range runs from the resolved resume cursor to the current UTC hour.
	/// Fail-soft: any error is logged and mapped to `None`, so one stream's
	/// failure never stops the remaining streams.
	pub async fn hourly_usage(
		&self,
		state: &TapState,
		config: &TapConfig,
		stream: Stream,
	) -> Option<serde_json::Value> {
		let start_hr = resolve_cursor(state, config, stream);
		let end_hr = HourStamp::now_utc();

		match self
			.fetch(stream.path(), &[("start_hr", start_hr), ("end_hr", end_hr.as_ref())])
			.await
		{
			Ok(page) => page,
			Err(e) => {
				tracing::warn!(
					stream = stream.as_str(),
					error = %e,
					"Hourly usage fetch failed; stream yields no data this run."
				);

				None
			},
		}
	}

	/// Fetches the monthly top-average-metrics page.
	///
	/// Same fail-soft contract as [`hourly_usage`](Self::hourly_usage); the
	/// query serializer percent-encodes the month cursor.
	pub async fn monthly_usage(
		&self,
		state: &TapState,
		config: &TapConfig,
	) -> Option<serde_json::Value> {
		const STREAM: Stream = Stream::TopAverageMetrics;

		let month = resolve_cursor(state, config, STREAM);

		match self.fetch(STREAM.path(), &[("month", month)]).await {
			Ok(page) => page,
			Err(e) => {
				tracing::warn!(
					stream = STREAM.as_str(),
					error = %e,
					"Monthly usage fetch failed; stream yields no data this run."
				);

				None
			},
		}
	}
}

/// Computes the retry delay for a rate-limited response.
///
/// The reset hint is clamped to zero (upstream occasionally reports negative
/// resets) and defaults to 60 seconds when absent or malformed; a 60-second
/// buffer is always added on top, so the wait is never below one minute.
pub fn backoff_delay(hint: Option<Duration>) -> Duration {
	hint.map_or(DEFAULT_RESET_HINT, |value| value.max(Duration::ZERO)) + RETRY_BUFFER
}

fn parse_reset_hint(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RATE_LIMIT_RESET)?;
	let raw = value.to_str().ok()?.trim();

	raw.parse::<i64>().ok().map(Duration::seconds)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn headers_with_reset(value: &'static str) -> HeaderMap {
		let mut headers = HeaderMap::new();

		headers.insert(RATE_LIMIT_RESET, HeaderValue::from_static(value));

		headers
	}

	#[test]
	fn backoff_delay_is_buffered_and_never_below_a_minute() {
		assert_eq!(backoff_delay(None), Duration::seconds(120));
		assert_eq!(backoff_delay(Some(Duration::seconds(15))), Duration::seconds(75));
		assert_eq!(backoff_delay(Some(Duration::seconds(-30))), Duration::seconds(60));
		assert!(backoff_delay(Some(Duration::seconds(-30))).is_positive());
	}

	#[test]
	fn reset_hint_parses_integer_seconds_only() {
		assert_eq!(parse_reset_hint(&headers_with_reset("30")), Some(Duration::seconds(30)));
		assert_eq!(parse_reset_hint(&headers_with_reset("-30")), Some(Duration::seconds(-30)));
		assert_eq!(parse_reset_hint(&headers_with_reset("soon")), None);
		assert_eq!(parse_reset_hint(&HeaderMap::new()), None);
	}

	#[test]
	fn base_url_gains_a_trailing_slash() {
		let client = UsageClient::with_base_url(test_credentials(), "https://example.com/usage")
			.expect("Client should build for a slash-less base URL.");

		assert_eq!(client.base_url.as_str(), "https://example.com/usage/");

		assert!(UsageClient::with_base_url(test_credentials(), "not a url").is_err());
	}
}

//! Incremental Datadog usage-metrics extractor - checkpointed streams, rate-limit-aware
//! fetching, and schema-tagged record output in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod cursor;
pub mod error;
pub mod http;
pub mod obs;
pub mod schema;
pub mod sink;
pub mod state;
pub mod stream;
pub mod sync;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience fixtures and helpers for tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ApiSecret, Credentials},
		config::TapConfig,
		cursor::{HourStamp, MonthStamp},
		schema::StreamSchema,
		sink::{RecordSink, SinkError},
		stream::Stream,
	};

	/// Events captured by [`RecordingSink`], in emission order.
	#[derive(Clone, Debug, PartialEq)]
	pub enum SinkEvent {
		/// A schema declaration.
		Schema {
			/// Stream the schema was declared for.
			stream: Stream,
			/// Key fields declared alongside the schema.
			key_fields: Vec<String>,
		},
		/// A record emission.
		Record {
			/// Stream the record was tagged with.
			stream: Stream,
			/// The emitted record, unmodified.
			record: serde_json::Value,
		},
	}

	/// Sink that captures every declaration and record for assertions.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingSink(Arc<Mutex<Vec<SinkEvent>>>);
	impl RecordingSink {
		/// Returns the captured events in emission order.
		pub fn events(&self) -> Vec<SinkEvent> {
			self.0.lock().clone()
		}
	}
	impl RecordSink for RecordingSink {
		fn declare_schema(
			&self,
			stream: Stream,
			_schema: &StreamSchema,
			key_fields: &[&str],
		) -> Result<(), SinkError> {
			self.0.lock().push(SinkEvent::Schema {
				stream,
				key_fields: key_fields.iter().map(|field| (*field).to_owned()).collect(),
			});

			Ok(())
		}

		fn emit_record(&self, stream: Stream, record: &serde_json::Value) -> Result<(), SinkError> {
			self.0.lock().push(SinkEvent::Record { stream, record: record.clone() });

			Ok(())
		}
	}

	/// Builds the credential pair fixture shared across tests.
	pub fn test_credentials() -> Credentials {
		Credentials::new(ApiSecret::new("111"), ApiSecret::new("222"))
	}

	/// Builds the configuration fixture shared across tests.
	pub fn test_config() -> TapConfig {
		TapConfig {
			api_key: ApiSecret::new("111"),
			application_key: ApiSecret::new("222"),
			start_hour: HourStamp::new("2019-08-07T12")
				.expect("Start-hour fixture should be valid."),
			start_month: MonthStamp::new("2019-07").expect("Start-month fixture should be valid."),
		}
	}

	/// Builds a minimal pass-through schema document fixture.
	pub fn test_schema() -> StreamSchema {
		StreamSchema::new(serde_json::json!({ "type": ["null", "object"], "properties": {} }))
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
use {clap as _, color_eyre as _, tracing_subscriber as _};

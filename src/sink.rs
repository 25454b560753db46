//! Record and schema emission contracts plus the built-in line-oriented sink.

// std
use std::io::{self, Stdout, Write};
// self
use crate::{_prelude::*, schema::StreamSchema, stream::Stream};

/// Emission contract for schema declarations and usage records.
///
/// Implementations own the wire format; the sync layer only guarantees call
/// order (one schema declaration per stream sync, before any of its records).
pub trait RecordSink
where
	Self: Send + Sync,
{
	/// Declares a stream's schema ahead of its records.
	fn declare_schema(
		&self,
		stream: Stream,
		schema: &StreamSchema,
		key_fields: &[&str],
	) -> Result<(), SinkError>;

	/// Emits one usage record tagged with its stream name.
	fn emit_record(&self, stream: Stream, record: &serde_json::Value) -> Result<(), SinkError>;
}

/// Error type produced by [`RecordSink`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SinkError {
	/// Serialization failures while encoding a message.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Output-channel failure while writing a message.
	#[error("Write failure: {message}.")]
	Write {
		/// Human-readable error payload.
		message: String,
	},
}

/// Line-oriented sink writing one schema/record JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
	writer: Mutex<W>,
}
impl JsonLinesSink<Stdout> {
	/// Builds a sink over the process's standard output.
	pub fn stdout() -> Self {
		Self::new(io::stdout())
	}
}
impl<W> JsonLinesSink<W>
where
	W: Send + Write,
{
	/// Wraps an arbitrary writer.
	pub fn new(writer: W) -> Self {
		Self { writer: Mutex::new(writer) }
	}

	/// Consumes the sink and returns the underlying writer.
	pub fn into_inner(self) -> W {
		self.writer.into_inner()
	}

	fn write_line(&self, message: &serde_json::Value) -> Result<(), SinkError> {
		let mut encoded = serde_json::to_vec(message)
			.map_err(|e| SinkError::Serialization { message: e.to_string() })?;

		encoded.push(b'\n');

		let mut guard = self.writer.lock();

		guard
			.write_all(&encoded)
			.and_then(|()| guard.flush())
			.map_err(|e| SinkError::Write { message: e.to_string() })
	}
}
impl<W> RecordSink for JsonLinesSink<W>
where
	W: Send + Write,
{
	fn declare_schema(
		&self,
		stream: Stream,
		schema: &StreamSchema,
		key_fields: &[&str],
	) -> Result<(), SinkError> {
		self.write_line(&serde_json::json!({
			"type": "SCHEMA",
			"stream": stream.as_str(),
			"schema": schema.document(),
			"key_properties": key_fields,
		}))
	}

	fn emit_record(&self, stream: Stream, record: &serde_json::Value) -> Result<(), SinkError> {
		self.write_line(&serde_json::json!({
			"type": "RECORD",
			"stream": stream.as_str(),
			"record": record,
		}))
	}
}

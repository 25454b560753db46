//! Stream schema documents loaded from static files and passed through to the sink.

// std
use std::{fs, path::Path};
// self
use crate::{_prelude::*, error::ConfigError, stream::Stream};

/// Opaque JSON Schema document declared ahead of a stream's records.
///
/// The extraction core never interprets the document; it only forwards the
/// field definitions to the emission sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamSchema(serde_json::Value);
impl StreamSchema {
	/// Wraps a schema document.
	pub fn new(document: serde_json::Value) -> Self {
		Self(document)
	}

	/// Returns the raw document.
	pub fn document(&self) -> &serde_json::Value {
		&self.0
	}
}

/// The full set of per-stream schema documents for one run.
#[derive(Clone, Debug, Default)]
pub struct SchemaSet(BTreeMap<Stream, StreamSchema>);
impl SchemaSet {
	/// Loads `<stream name>.json` for every known stream from `dir`.
	///
	/// A missing or malformed document is a configuration error: running
	/// without a stream's schema would silently drop that stream.
	pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let dir = dir.as_ref();
		let mut schemas = BTreeMap::new();

		for stream in Stream::ALL {
			let path = dir.join(format!("{stream}.json"));
			let bytes = fs::read(&path)
				.map_err(|e| ConfigError::Read { path: path.display().to_string(), source: e })?;
			let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
			let document = serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|e| ConfigError::Parse { path: path.display().to_string(), source: e })?;

			schemas.insert(stream, StreamSchema::new(document));
		}

		Ok(Self(schemas))
	}

	/// Inserts or replaces the schema for a stream.
	pub fn insert(&mut self, stream: Stream, schema: StreamSchema) {
		self.0.insert(stream, schema);
	}

	/// Returns the schema for a stream, when loaded.
	pub fn get(&self, stream: Stream) -> Option<&StreamSchema> {
		self.0.get(&stream)
	}
}

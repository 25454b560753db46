//! Run configuration loaded from a JSON document at startup.

// std
use std::{fs, path::Path};
// self
use crate::{
	_prelude::*,
	auth::{ApiSecret, Credentials},
	cursor::{HourStamp, MonthStamp},
	error::ConfigError,
};

/// Collaborator-supplied run configuration.
///
/// Every field is required. A missing start value would leave a stream with no
/// safe resume window, so it surfaces as a path-qualified parse error at
/// startup instead of a runtime default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapConfig {
	/// API key attached to every request.
	pub api_key: ApiSecret,
	/// Application key attached to every request.
	pub application_key: ApiSecret,
	/// Fallback start hour for hourly streams with no bookmark.
	pub start_hour: HourStamp,
	/// Fallback start month for the monthly stream with no bookmark.
	pub start_month: MonthStamp,
}
impl TapConfig {
	/// Reads and validates a configuration document.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let bytes = fs::read(path)
			.map_err(|e| ConfigError::Read { path: path.display().to_string(), source: e })?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|e| ConfigError::Parse { path: path.display().to_string(), source: e })
	}

	/// Returns the credential pair carried by this configuration.
	pub fn credentials(&self) -> Credentials {
		Credentials::new(self.api_key.clone(), self.application_key.clone())
	}
}

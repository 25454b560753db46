//! Credential types attached to every upstream usage request.

// self
use crate::_prelude::*;

/// Redacted API secret wrapper keeping credential material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSecret(String);
impl ApiSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for ApiSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ApiSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiSecret").field(&"<redacted>").finish()
	}
}
impl Display for ApiSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Opaque credential pair sent with every usage request.
///
/// Immutable once constructed. Both keys travel as query-string fields, so
/// they must never appear in spans or error messages; [`ApiSecret`] enforces
/// the redaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// API key identifying the account.
	pub api_key: ApiSecret,
	/// Application key authorizing usage reads.
	pub application_key: ApiSecret,
}
impl Credentials {
	/// Creates a new credential pair.
	pub fn new(api_key: ApiSecret, application_key: ApiSecret) -> Self {
		Self { api_key, application_key }
	}

	/// Query-string auth fields injected into every outbound call.
	pub(crate) fn query_params(&self) -> [(&'static str, &str); 2] {
		[("api_key", self.api_key.expose()), ("application_key", self.application_key.expose())]
	}
}

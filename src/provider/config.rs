//! Provider block configuration with environment-variable fallback.

// self
use crate::{
	_prelude::*,
	auth::{KeySecret, ProviderCredentials},
	error::ConfigError,
};

/// Environment variable consulted when `issuer_id` is not declared.
pub const ISSUER_ID_ENV: &str = "APP_STORE_CONNECT_ISSUER_ID";
/// Environment variable consulted when `key_id` is not declared.
pub const KEY_ID_ENV: &str = "APP_STORE_CONNECT_KEY_ID";
/// Environment variable consulted when `private_key` is not declared.
pub const PRIVATE_KEY_ENV: &str = "APP_STORE_CONNECT_PRIVATE_KEY";

/// Declared `appstoreconnect` provider block.
///
/// Every field is optional at parse time; [`ProviderConfig::credentials`] enforces presence
/// after fallbacks have been applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
	/// Issuer ID of the API key.
	#[serde(default)]
	pub issuer_id: Option<String>,
	/// Key ID of the API key.
	#[serde(default)]
	pub key_id: Option<String>,
	/// PEM-encoded private key.
	#[serde(default)]
	pub private_key: Option<KeySecret>,
}
impl ProviderConfig {
	/// Parses the engine's JSON rendering of the provider block.
	pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Malformed { source })
	}

	/// Sets the issuer ID.
	pub fn issuer_id(mut self, value: impl Into<String>) -> Self {
		self.issuer_id = Some(value.into());

		self
	}

	/// Sets the key ID.
	pub fn key_id(mut self, value: impl Into<String>) -> Self {
		self.key_id = Some(value.into());

		self
	}

	/// Sets the PEM-encoded private key.
	pub fn private_key(mut self, value: impl Into<String>) -> Self {
		self.private_key = Some(KeySecret::new(value));

		self
	}

	/// Fills undeclared fields from the process environment.
	pub fn with_env_fallback(self) -> Self {
		self.with_fallback(|name| std::env::var(name).ok())
	}

	/// Fills undeclared fields through `lookup`, keyed by the `*_ENV` variable names.
	///
	/// Declared values always win, even when blank.
	pub fn with_fallback<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		if self.issuer_id.is_none() {
			self.issuer_id = lookup(ISSUER_ID_ENV);
		}
		if self.key_id.is_none() {
			self.key_id = lookup(KEY_ID_ENV);
		}
		if self.private_key.is_none() {
			self.private_key = lookup(PRIVATE_KEY_ENV).map(KeySecret::new);
		}

		self
	}

	/// Validates presence of every credential component.
	pub fn credentials(&self) -> Result<ProviderCredentials, ConfigError> {
		let issuer_id = self
			.issuer_id
			.clone()
			.ok_or(ConfigError::MissingAttribute { attribute: "issuer_id" })?;
		let key_id =
			self.key_id.clone().ok_or(ConfigError::MissingAttribute { attribute: "key_id" })?;
		let private_key = self
			.private_key
			.as_ref()
			.ok_or(ConfigError::MissingAttribute { attribute: "private_key" })?;

		ProviderCredentials::new(issuer_id, key_id, private_key.expose())
	}
}

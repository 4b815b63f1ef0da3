//! App Store Connect API key credentials.

// self
use crate::{_prelude::*, error::ConfigError};

/// Redacted private key wrapper keeping key material out of logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct KeySecret(String);
impl KeySecret {
	/// Wraps PEM-encoded key material.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the PEM text. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for KeySecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("KeySecret").field(&"<redacted>").finish()
	}
}
impl Display for KeySecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Issuer, key, and private key of an App Store Connect API key.
///
/// Built once per provider invocation and never persisted to resource state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderCredentials {
	/// Issuer ID shown next to the key in App Store Connect.
	pub issuer_id: String,
	/// Key ID of the API key.
	pub key_id: String,
	/// PEM-encoded (PKCS#8) P-256 private key downloaded as the `.p8` file.
	pub private_key: KeySecret,
}
impl ProviderCredentials {
	/// Validates that every component is present and non-blank.
	pub fn new(
		issuer_id: impl Into<String>,
		key_id: impl Into<String>,
		private_key: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let issuer_id = non_blank("issuer_id", issuer_id.into())?;
		let key_id = non_blank("key_id", key_id.into())?;
		let private_key = KeySecret::new(non_blank("private_key", private_key.into())?);

		Ok(Self { issuer_id, key_id, private_key })
	}
}

fn non_blank(attribute: &'static str, value: String) -> Result<String, ConfigError> {
	if value.trim().is_empty() {
		return Err(ConfigError::MissingAttribute { attribute });
	}

	Ok(value)
}

//! Provider-level error types shared across the controller, client, and configuration.

// self
use crate::{_prelude::*, api::ApiError, resource::Operation};

/// Provider-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provider error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Declared configuration violates a static invariant.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// A re-fetch required while planning failed; no mutation was attempted.
	#[error("Unable to fetch state of user {id}: {source}")]
	Fetch {
		/// Remote identifier that was being fetched.
		id: String,
		/// Client failure behind the fetch.
		#[source]
		source: ApiError,
	},
	/// A remote create/read/update/delete call failed.
	#[error(transparent)]
	Client(#[from] ClientError),
	/// Operation the remote system does not support for this resource type.
	#[error("The {resource_type} resource does not support the {operation} operation.")]
	UnsupportedOperation {
		/// Resource type name.
		resource_type: &'static str,
		/// Rejected operation.
		operation: Operation,
	},
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Declared configuration failed validation; surfaced before any remote call.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Invalid configuration for `{attribute}`: {message}.")]
pub struct ValidationError {
	/// Attribute path the failure is attached to.
	pub attribute: &'static str,
	/// Operator-facing explanation.
	pub message: String,
}
impl ValidationError {
	/// Builds a validation error for the provided attribute.
	pub fn new(attribute: &'static str, message: impl Into<String>) -> Self {
		Self { attribute, message: message.into() }
	}
}

/// Remote call failure annotated with the attempted operation and resource identifier.
#[derive(Debug, ThisError)]
pub struct ClientError {
	/// Operation that was attempted.
	pub operation: Operation,
	/// Remote identifier, when one was known.
	pub id: Option<String>,
	/// Underlying client failure.
	#[source]
	pub source: ApiError,
}
impl ClientError {
	/// Wraps an [`ApiError`] raised while performing `operation`.
	pub fn new(operation: Operation, id: Option<&str>, source: ApiError) -> Self {
		Self { operation, id: id.map(ToOwned::to_owned), source }
	}

	/// Operator-facing message that includes the underlying service or transport text.
	pub fn message(&self) -> String {
		self.source.to_string()
	}
}
impl Display for ClientError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.id {
			Some(id) =>
				write!(f, "Unable to {} user {id}, got error: {}", self.operation, self.source),
			None => write!(f, "Unable to {} user, got error: {}", self.operation, self.source),
		}
	}
}

/// Configuration and construction failures raised by the provider.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required provider attribute was absent or blank.
	#[error("Provider attribute `{attribute}` must be set.")]
	MissingAttribute {
		/// Attribute name.
		attribute: &'static str,
	},
	/// The private key could not be parsed as a PEM-encoded EC key.
	#[error("The App Store Connect private key is invalid.")]
	InvalidPrivateKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The API base URL cannot be parsed or joined.
	#[error("The App Store Connect base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider configuration payload could not be decoded.
	#[error("Provider configuration is malformed.")]
	Malformed {
		/// Structured decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

//! Remote API contract consumed by resource controllers.
//!
//! [`UserApi`] is the controller's only dependency on App Store Connect. The crate ships
//! [`AppStoreClient`] (reqwest + ES256 request signing, behind the `reqwest` feature) and
//! [`MemoryUserApi`] (an in-process stand-in for tests and demos). Implementations must be
//! `Send + Sync` so a single handle can be shared by every resource instance.

#[cfg(feature = "reqwest")] pub mod client;
pub mod document;
pub mod memory;

#[cfg(feature = "reqwest")] pub use client::AppStoreClient;
pub use memory::{ApiCall, ApiCallKind, MemoryUserApi};

// self
use crate::{_prelude::*, auth::TokenError, error::BoxError, user::UserRole};

/// Production endpoint of the App Store Connect API.
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com/";

/// Boxed future returned by [`UserApi`] operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + 'a + Send>>;

/// User management operations exposed by the remote service.
pub trait UserApi
where
	Self: Send + Sync,
{
	/// Invites a new user and returns the record the service stored.
	fn create_user<'a>(&'a self, user: &'a User) -> ApiFuture<'a, User>;

	/// Fetches a user (accepted or still pending) by identifier.
	fn get_user<'a>(&'a self, id: &'a str) -> ApiFuture<'a, User>;

	/// Applies the mutable fields of `user` to the record identified by `id`.
	fn modify_user<'a>(&'a self, id: &'a str, user: &'a User) -> ApiFuture<'a, User>;

	/// Removes the user (or revokes the pending invitation) identified by `id`.
	fn delete_user<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()>;
}

/// User record exchanged with the remote service.
///
/// `id` is empty on outbound create payloads; the service assigns it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Service-assigned identifier.
	pub id: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Sign-in name; the invitation email for pending users.
	pub username: String,
	/// Granted roles.
	pub roles: BTreeSet<UserRole>,
	/// Whether every app in the team is visible to the user.
	pub all_apps_visible: bool,
	/// Identifiers of the apps the user may see.
	pub visible_app_ids: BTreeSet<String>,
	/// Whether the user may create provisioning profiles.
	pub provisioning_allowed: bool,
	/// False while the user is still an outstanding invitation.
	pub has_accepted_invite: bool,
}

/// Failures raised by [`UserApi`] implementations.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// The service reported that the addressed record does not exist.
	#[error("No resource exists at {path}.")]
	NotFound {
		/// Request path that returned 404.
		path: String,
	},
	/// The identifier cannot address a single record (empty, `.` or `..`).
	#[error("`{id}` is not a valid App Store Connect identifier.")]
	InvalidId {
		/// Rejected identifier.
		id: String,
	},
	/// The service answered with a non-success status.
	#[error("App Store Connect returned status {status}: {message}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Error details extracted from the response body.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// The request never produced a response (DNS, TCP, TLS, timeouts).
	#[error("Network error occurred while calling App Store Connect: {source}")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// A success response could not be decoded.
	#[error("App Store Connect returned a malformed document: {source}")]
	Decode {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A request body could not be encoded.
	#[error("Request body could not be encoded: {source}")]
	Encode {
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// The request could not be signed.
	#[error(transparent)]
	Token(#[from] TokenError),
}
impl ApiError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Returns true when the service explicitly reported the record as missing.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ApiError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

//! Provider metadata and configuration.
//!
//! [`Provider`] describes the `appstoreconnect` provider to the engine. Configuring it turns a
//! [`ProviderConfig`] into a [`ConfiguredProvider`] that owns exactly one shared [`UserApi`]
//! handle and passes it explicitly to every resource controller it constructs.

pub mod config;

pub use config::*;

// self
#[cfg(feature = "reqwest")] use crate::{api::AppStoreClient, error::ConfigError};
use crate::{
	_prelude::*,
	api::UserApi,
	schema::{PROVIDER_SCHEMA, PROVIDER_TYPE_NAME, ResourceSchema, USER_SCHEMA},
	user::UserResource,
};

/// Version reported to the engine.
pub const PROVIDER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Unconfigured provider: metadata plus connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provider {
	version: String,
	base_url: Option<Url>,
}
impl Provider {
	/// Creates a provider reporting `version`.
	pub fn new(version: impl Into<String>) -> Self {
		Self { version: version.into(), base_url: None }
	}

	/// Points API calls at `base_url` instead of the production endpoint.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Provider type name, the prefix of every resource type.
	pub fn type_name(&self) -> &'static str {
		PROVIDER_TYPE_NAME
	}

	/// Version string reported to the engine.
	pub fn version(&self) -> &str {
		&self.version
	}

	/// Overridden API base URL, if any.
	pub fn base_url(&self) -> Option<&Url> {
		self.base_url.as_ref()
	}

	/// Provider block schema.
	pub fn schema(&self) -> &'static ResourceSchema {
		&PROVIDER_SCHEMA
	}

	/// Schemas of every resource type this provider manages.
	pub fn resource_schemas(&self) -> [&'static ResourceSchema; 1] {
		[&USER_SCHEMA]
	}

	/// Validates credentials and builds the shared App Store Connect client.
	#[cfg(feature = "reqwest")]
	pub fn configure(&self, config: &ProviderConfig) -> Result<ConfiguredProvider, ConfigError> {
		let credentials = config.credentials()?;
		let client = match &self.base_url {
			Some(base_url) => AppStoreClient::with_base_url(&credentials, base_url.clone())?,
			None => AppStoreClient::new(&credentials)?,
		};

		#[cfg(feature = "tracing")]
		tracing::debug!(key_id = %credentials.key_id, "configured App Store Connect client");

		Ok(ConfiguredProvider::new(Arc::new(client)))
	}

	/// Wires an already constructed [`UserApi`], such as an in-memory fake.
	pub fn configure_with(&self, api: Arc<dyn UserApi>) -> ConfiguredProvider {
		ConfiguredProvider::new(api)
	}
}
impl Default for Provider {
	fn default() -> Self {
		Self::new(PROVIDER_VERSION)
	}
}

/// Provider after configuration; hands its API handle to each controller it builds.
#[derive(Clone)]
pub struct ConfiguredProvider {
	api: Arc<dyn UserApi>,
}
impl ConfiguredProvider {
	/// Wraps the shared API handle.
	pub fn new(api: Arc<dyn UserApi>) -> Self {
		Self { api }
	}

	/// The shared API handle.
	pub fn api(&self) -> &Arc<dyn UserApi> {
		&self.api
	}

	/// Constructs an `appstoreconnect_user` controller bound to the shared handle.
	pub fn user_resource(&self) -> UserResource {
		UserResource::new(self.api.clone())
	}
}
impl Debug for ConfiguredProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ConfiguredProvider").finish_non_exhaustive()
	}
}

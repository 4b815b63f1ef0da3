//! Declarative App Store Connect user management: validate declared users, plan
//! replacement-aware changes, and reconcile them against the App Store Connect API.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod obs;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod user;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::{MemoryUserApi, UserApi},
		auth::ProviderCredentials,
		resource::Attr,
		user::{UserConfig, UserResource},
	};

	/// PKCS#8 P-256 key used to sign test tokens. Never valid against the real service.
	pub const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_key.p8");
	/// Public half of [`TEST_PRIVATE_KEY`], used to verify signed test tokens.
	pub const TEST_PUBLIC_KEY: &str = include_str!("../tests/fixtures/test_key.pub.pem");

	/// Builds credentials backed by [`TEST_PRIVATE_KEY`].
	pub fn test_credentials() -> ProviderCredentials {
		ProviderCredentials::new("test-issuer", "TESTKEY123", TEST_PRIVATE_KEY)
			.expect("Test credentials should be valid.")
	}

	/// Declared configuration for the "John Smith" fixture user.
	pub fn john_smith(email: &str, role: &str) -> UserConfig {
		UserConfig {
			first_name: Attr::Known("John".into()),
			last_name: Attr::Known("Smith".into()),
			email: Attr::Known(email.into()),
			roles: Attr::Known([role.to_owned()].into_iter().collect()),
			all_apps_visible: Attr::Known(false),
			visible_apps: Attr::Known(Default::default()),
			provisioning_allowed: Attr::Known(false),
		}
	}

	/// Constructs a controller wired to a fresh in-memory API.
	pub fn memory_user_resource() -> (UserResource, Arc<MemoryUserApi>) {
		let api = Arc::new(MemoryUserApi::default());
		let shared: Arc<dyn UserApi> = api.clone();

		(UserResource::new(shared), api)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};

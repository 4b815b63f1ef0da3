//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::{collections::BTreeSet, sync::Arc};
// self
use appstoreconnect_provider::{
	api::{MemoryUserApi, UserApi},
	auth::ProviderCredentials,
	resource::Attr,
	user::{UserConfig, UserResource},
};

/// PKCS#8 P-256 key used to sign test tokens.
pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_key.p8");
/// Public half of [`TEST_PRIVATE_KEY`].
pub const TEST_PUBLIC_KEY: &str = include_str!("../fixtures/test_key.pub.pem");
/// App used by the visibility fixtures.
pub const APP_ID: &str = "1598625719";

pub fn test_credentials() -> ProviderCredentials {
	ProviderCredentials::new("test-issuer", "TESTKEY123", TEST_PRIVATE_KEY)
		.expect("Test credentials should be valid.")
}

pub fn john_smith(email: &str, role: &str) -> UserConfig {
	UserConfig {
		first_name: Attr::Known("John".into()),
		last_name: Attr::Known("Smith".into()),
		email: Attr::Known(email.into()),
		roles: Attr::Known(strings(&[role])),
		all_apps_visible: Attr::Known(false),
		visible_apps: Attr::Known(BTreeSet::new()),
		provisioning_allowed: Attr::Known(false),
	}
}

pub fn strings(values: &[&str]) -> BTreeSet<String> {
	values.iter().map(|value| (*value).to_owned()).collect()
}

pub fn memory_user_resource() -> (Arc<UserResource>, Arc<MemoryUserApi>) {
	let api = Arc::new(MemoryUserApi::default());
	let shared: Arc<dyn UserApi> = api.clone();

	(Arc::new(UserResource::new(shared)), api)
}

//! Demonstrates declaring an App Store Connect user, planning it, and applying the plan against
//! a mocked API. Point `Provider::with_base_url` elsewhere (or drop it) to talk to the real
//! service with keys from the `APP_STORE_CONNECT_*` environment variables.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use appstoreconnect_provider::{
	lifecycle::ResourceInstance,
	provider::{Provider, ProviderConfig},
	resource::Attr,
	url::Url,
	user::UserConfig,
};

const DEMO_PRIVATE_KEY: &str = include_str!("../tests/fixtures/test_key.p8");

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let invite_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/userInvitations");
			then.status(201).header("content-type", "application/json").body(
				r#"{"data":{"type":"userInvitations","id":"demo-invite","attributes":{
					"email":"jane@example.com","firstName":"Jane","lastName":"Doe",
					"roles":["DEVELOPER"],"allAppsVisible":true,"provisioningAllowed":false}}}"#,
			);
		})
		.await;
	let config = ProviderConfig::default()
		.issuer_id("demo-issuer")
		.key_id("DEMOKEY123")
		.private_key(DEMO_PRIVATE_KEY)
		.with_env_fallback();
	let configured = Provider::default()
		.with_base_url(Url::parse(&format!("http://{}/", server.address()))?)
		.configure(&config)?;
	let user = UserConfig {
		first_name: Attr::Known("Jane".into()),
		last_name: Attr::Known("Doe".into()),
		email: Attr::Known("jane@example.com".into()),
		roles: Attr::Known(["DEVELOPER".to_owned()].into_iter().collect()),
		all_apps_visible: Attr::Known(true),
		visible_apps: Attr::Null,
		provisioning_allowed: Attr::Known(false),
	};
	let mut instance = ResourceInstance::new(Arc::new(configured.user_resource()));
	let change = instance.plan(&user).await?;

	println!("Planned {:?} touching {:?}.", change.action, change.changed);

	if let Some(state) = instance.apply(&user).await? {
		println!(
			"Invited {} as {} (accepted: {}).",
			state.email, state.id, state.has_accepted_invite
		);
	}
	for warning in instance.take_warnings() {
		println!("Warning: {warning}.");
	}

	invite_mock.assert_async().await;

	Ok(())
}

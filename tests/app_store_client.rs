mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use appstoreconnect_provider::{
	api::{ApiError, AppStoreClient, User, UserApi},
	error::{ClientError, Error},
	lifecycle::ResourceInstance,
	provider::{Provider, ProviderConfig},
	resource::{Operation, Resource},
	url::Url,
	user::UserRole,
};
use common::*;

// The mock server also speaks TLS with a self-signed certificate; talk plain HTTP to it.
fn mock_base_url(server: &MockServer) -> Url {
	Url::parse(&format!("http://{}/", server.address())).expect("Mock server URL should parse.")
}

fn client(server: &MockServer) -> AppStoreClient {
	AppStoreClient::with_base_url(&test_credentials(), mock_base_url(server))
		.expect("Client should build against the mock server.")
}

fn user_document(id: &str, roles: &[&str]) -> Value {
	json!({
		"data": {
			"type": "users",
			"id": id,
			"attributes": {
				"username": "x@y.com",
				"firstName": "John",
				"lastName": "Smith",
				"roles": roles,
				"allAppsVisible": false,
				"provisioningAllowed": false
			},
			"relationships": { "visibleApps": { "data": [{ "type": "apps", "id": APP_ID }] } }
		}
	})
}

fn invitation_document(id: &str) -> Value {
	json!({
		"data": {
			"type": "userInvitations",
			"id": id,
			"attributes": {
				"email": "x@y.com",
				"firstName": "John",
				"lastName": "Smith",
				"roles": ["MARKETING"],
				"allAppsVisible": false,
				"provisioningAllowed": false
			},
			"relationships": { "visibleApps": { "data": [] } }
		}
	})
}

#[tokio::test]
async fn get_user_reads_accepted_users_with_bearer_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/users/u-1")
				.query_param("include", "visibleApps")
				.header_exists("authorization");
			then.status(200)
				.header("content-type", "application/json")
				.body(user_document("u-1", &["DEVELOPER"]).to_string());
		})
		.await;
	let user = client(&server).get_user("u-1").await.expect("Accepted users should load.");

	mock.assert_async().await;

	assert!(user.has_accepted_invite);
	assert_eq!(user.roles, [UserRole::Developer].into_iter().collect());
	assert_eq!(user.visible_app_ids, strings(&[APP_ID]));
}

#[tokio::test]
async fn get_user_falls_back_to_pending_invitations() {
	let server = MockServer::start_async().await;
	let users = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/users/inv-1");
			then.status(404).header("content-type", "application/json").body(
				json!({ "errors": [{ "status": "404", "code": "NOT_FOUND" }] }).to_string(),
			);
		})
		.await;
	let invitations = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/userInvitations/inv-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(invitation_document("inv-1").to_string());
		})
		.await;
	let user = client(&server).get_user("inv-1").await.expect("Pending users should load.");

	users.assert_async().await;
	invitations.assert_async().await;

	assert!(!user.has_accepted_invite);
	assert_eq!(user.username, "x@y.com");
}

#[tokio::test]
async fn get_user_reports_not_found_when_both_lookups_miss() {
	let server = MockServer::start_async().await;
	let missing = server
		.mock_async(|when, then| {
			when.method(GET);
			then.status(404);
		})
		.await;
	let err = client(&server).get_user("gone").await.expect_err("Missing users should 404.");

	missing.assert_calls_async(2).await;

	assert!(err.is_not_found());
}

#[tokio::test]
async fn create_posts_an_invitation() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/userInvitations")
				.header("content-type", "application/json")
				.header_exists("authorization");
			then.status(201)
				.header("content-type", "application/json")
				.body(invitation_document("inv-2").to_string());
		})
		.await;
	let user = User {
		first_name: "John".into(),
		last_name: "Smith".into(),
		username: "x@y.com".into(),
		roles: [UserRole::Marketing].into_iter().collect(),
		..Default::default()
	};
	let created = client(&server).create_user(&user).await.expect("Invitations should succeed.");

	mock.assert_async().await;

	assert_eq!(created.id, "inv-2");
	assert!(!created.has_accepted_invite);
}

#[tokio::test]
async fn create_survives_a_failed_follow_up_read() {
	let server = MockServer::start_async().await;
	let mut unlinked = invitation_document("inv-5");

	unlinked["data"]
		.as_object_mut()
		.expect("Fixture data should be an object.")
		.remove("relationships");

	let post = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/userInvitations");
			then.status(201)
				.header("content-type", "application/json")
				.body(unlinked.to_string());
		})
		.await;
	let get = server
		.mock_async(|when, then| {
			when.method(GET);
			then.status(503);
		})
		.await;
	let user = User {
		username: "x@y.com".into(),
		roles: [UserRole::Marketing].into_iter().collect(),
		visible_app_ids: strings(&[APP_ID]),
		..Default::default()
	};
	let created = client(&server)
		.create_user(&user)
		.await
		.expect("A stored invitation should be reported even if the re-read fails.");

	post.assert_async().await;
	get.assert_calls_async(1).await;

	assert_eq!(created.id, "inv-5");
	assert_eq!(created.visible_app_ids, strings(&[APP_ID]));
	assert!(!created.has_accepted_invite);
}

#[tokio::test]
async fn identifiers_cannot_escape_the_users_collection() {
	let server = MockServer::start_async().await;
	let escaped = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/apps/123");
			then.status(204);
		})
		.await;
	let err = client(&server)
		.delete_user("../apps/123")
		.await
		.expect_err("No user or invitation carries that identifier.");

	escaped.assert_calls_async(0).await;

	assert!(err.is_not_found());

	let err = client(&server).delete_user("..").await.expect_err("Dot segments are rejected.");

	assert!(matches!(err, ApiError::InvalidId { .. }));
}

#[tokio::test]
async fn modify_refetches_when_linkage_is_missing() {
	let server = MockServer::start_async().await;
	let mut unlinked = user_document("u-3", &["DEVELOPER"]);

	unlinked["data"]
		.as_object_mut()
		.expect("Fixture data should be an object.")
		.remove("relationships");

	let patch = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/v1/users/u-3");
			then.status(200)
				.header("content-type", "application/json")
				.body(unlinked.to_string());
		})
		.await;
	let get = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/users/u-3").query_param("include", "visibleApps");
			then.status(200)
				.header("content-type", "application/json")
				.body(user_document("u-3", &["DEVELOPER"]).to_string());
		})
		.await;
	let user = User {
		roles: [UserRole::Developer].into_iter().collect(),
		visible_app_ids: strings(&[APP_ID]),
		..Default::default()
	};
	let modified =
		client(&server).modify_user("u-3", &user).await.expect("Modify should succeed.");

	patch.assert_async().await;
	get.assert_async().await;

	assert_eq!(modified.visible_app_ids, strings(&[APP_ID]));
}

#[tokio::test]
async fn delete_falls_back_to_revoking_the_invitation() {
	let server = MockServer::start_async().await;
	let users = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/users/inv-4");
			then.status(404);
		})
		.await;
	let invitations = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/userInvitations/inv-4");
			then.status(204);
		})
		.await;

	client(&server)
		.delete_user("inv-4")
		.await
		.expect("Revoking the invitation should succeed.");

	users.assert_async().await;
	invitations.assert_async().await;
}

#[tokio::test]
async fn error_documents_surface_service_messages() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/userInvitations");
			then.status(409)
				.header("content-type", "application/json")
				.header("retry-after", "30")
				.body(
					json!({
						"errors": [{
							"status": "409",
							"code": "ENTITY_ERROR.ATTRIBUTE.INVALID",
							"detail": "x@y.com is already a member of this team"
						}]
					})
					.to_string(),
				);
		})
		.await;
	let err = client(&server)
		.create_user(&User { username: "x@y.com".into(), ..Default::default() })
		.await
		.expect_err("Conflicts should surface.");

	match err {
		ApiError::Status { status, message, retry_after } => {
			assert_eq!(status, 409);
			assert_eq!(
				message,
				"ENTITY_ERROR.ATTRIBUTE.INVALID: x@y.com is already a member of this team"
			);
			assert_eq!(retry_after, Some(time::Duration::seconds(30)));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn transport_failures_leave_no_state_behind() {
	// Nothing listens on the TCP port reserved for tcpmux.
	let base_url = Url::parse("http://127.0.0.1:1/").expect("Fixture URL should parse.");
	let config = ProviderConfig::default()
		.issuer_id("test-issuer")
		.key_id("TESTKEY123")
		.private_key(TEST_PRIVATE_KEY);
	let configured = Provider::default()
		.with_base_url(base_url)
		.configure(&config)
		.expect("Provider should configure with valid credentials.");
	let mut instance = ResourceInstance::new(std::sync::Arc::new(configured.user_resource()));
	let err = instance
		.apply(&john_smith("x@y.com", "MARKETING"))
		.await
		.expect_err("Unreachable endpoints should fail the create.");

	assert!(matches!(
		&err,
		Error::Client(ClientError {
			operation: Operation::Create,
			source: ApiError::Transport { .. },
			..
		})
	));
	assert!(instance.state().is_none());
}

#[tokio::test]
async fn controller_maps_http_not_found_to_missing_state() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET);
			then.status(404);
		})
		.await;
	let configured = Provider::default()
		.with_base_url(mock_base_url(&server))
		.configure(
			&ProviderConfig::default()
				.issuer_id("test-issuer")
				.key_id("TESTKEY123")
				.private_key(TEST_PRIVATE_KEY),
		)
		.expect("Provider should configure with valid credentials.");
	let resource = configured.user_resource();

	assert_eq!(resource.read("gone").await.expect("Not-found is not an error."), None);
}

//! JSON:API documents exchanged with App Store Connect.
//!
//! Accepted users live under the `users` resource type; pending users are
//! `userInvitations` until the invitee accepts. Both carry the visible-app list as a
//! `visibleApps` relationship instead of an attribute.

// self
use crate::{
	_prelude::*,
	api::{ApiError, User},
	user::UserRole,
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Resource type of accepted users.
pub const USERS: &str = "users";
/// Resource type of pending invitations.
pub const USER_INVITATIONS: &str = "userInvitations";
/// Resource type referenced by the `visibleApps` relationship.
pub const APPS: &str = "apps";

/// Decoded user plus whether the response carried visible-app linkage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedUser {
	/// User assembled from the document.
	pub user: User,
	/// False when the document omitted `relationships.visibleApps.data`.
	pub visible_apps_linked: bool,
}

#[derive(Deserialize)]
struct Document<A> {
	data: ResourceObject<A>,
}

#[derive(Deserialize)]
struct ResourceObject<A> {
	id: String,
	attributes: A,
	#[serde(default)]
	relationships: Option<Relationships>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Relationships {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	visible_apps: Option<ToMany>,
}

#[derive(Deserialize, Serialize)]
struct ToMany {
	#[serde(default)]
	data: Option<Vec<Linkage>>,
}

#[derive(Deserialize, Serialize)]
struct Linkage {
	#[serde(rename = "type")]
	kind: String,
	id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserAttributes {
	#[serde(default)]
	username: Option<String>,
	#[serde(default)]
	first_name: Option<String>,
	#[serde(default)]
	last_name: Option<String>,
	#[serde(default)]
	roles: BTreeSet<UserRole>,
	#[serde(default)]
	all_apps_visible: bool,
	#[serde(default)]
	provisioning_allowed: bool,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvitationAttributes {
	#[serde(default)]
	email: String,
	#[serde(default)]
	first_name: String,
	#[serde(default)]
	last_name: String,
	#[serde(default)]
	roles: BTreeSet<UserRole>,
	#[serde(default)]
	all_apps_visible: bool,
	#[serde(default)]
	provisioning_allowed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserUpdateAttributes<'a> {
	roles: &'a BTreeSet<UserRole>,
	all_apps_visible: bool,
	provisioning_allowed: bool,
}

#[derive(Serialize)]
struct OutboundDocument<T> {
	data: T,
}

#[derive(Serialize)]
struct OutboundResource<'a, A> {
	#[serde(rename = "type")]
	kind: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	id: Option<&'a str>,
	attributes: A,
	#[serde(skip_serializing_if = "Option::is_none")]
	relationships: Option<Relationships>,
}

#[derive(Deserialize)]
struct ErrorDocument {
	#[serde(default)]
	errors: Vec<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
	#[serde(default)]
	code: Option<String>,
	#[serde(default)]
	title: Option<String>,
	#[serde(default)]
	detail: Option<String>,
}

/// Decodes a `users` document; the user has accepted their invitation.
pub fn decode_user(body: &[u8]) -> Result<DecodedUser, ApiError> {
	let doc: Document<UserAttributes> = decode(body)?;
	let (visible_app_ids, visible_apps_linked) = linked_apps(doc.data.relationships);
	let attrs = doc.data.attributes;
	let user = User {
		id: doc.data.id,
		first_name: attrs.first_name.unwrap_or_default(),
		last_name: attrs.last_name.unwrap_or_default(),
		username: attrs.username.unwrap_or_default(),
		roles: attrs.roles,
		all_apps_visible: attrs.all_apps_visible,
		visible_app_ids,
		provisioning_allowed: attrs.provisioning_allowed,
		has_accepted_invite: true,
	};

	Ok(DecodedUser { user, visible_apps_linked })
}

/// Decodes a `userInvitations` document into a pending user.
pub fn decode_invitation(body: &[u8]) -> Result<DecodedUser, ApiError> {
	let doc: Document<InvitationAttributes> = decode(body)?;
	let (visible_app_ids, visible_apps_linked) = linked_apps(doc.data.relationships);
	let attrs = doc.data.attributes;
	let user = User {
		id: doc.data.id,
		first_name: attrs.first_name,
		last_name: attrs.last_name,
		username: attrs.email,
		roles: attrs.roles,
		all_apps_visible: attrs.all_apps_visible,
		visible_app_ids,
		provisioning_allowed: attrs.provisioning_allowed,
		has_accepted_invite: false,
	};

	Ok(DecodedUser { user, visible_apps_linked })
}

/// Encodes the invitation request that creates `user`.
pub fn encode_invitation(user: &User) -> Result<Vec<u8>, ApiError> {
	let attributes = InvitationAttributes {
		email: user.username.clone(),
		first_name: user.first_name.clone(),
		last_name: user.last_name.clone(),
		roles: user.roles.clone(),
		all_apps_visible: user.all_apps_visible,
		provisioning_allowed: user.provisioning_allowed,
	};
	// The service rejects an explicit app list next to `allAppsVisible`.
	let relationships = (!user.visible_app_ids.is_empty()).then(|| app_relationships(user));

	encode(&OutboundDocument {
		data: OutboundResource { kind: USER_INVITATIONS, id: None, attributes, relationships },
	})
}

/// Encodes the update request that applies the mutable fields of `user` to `id`.
pub fn encode_user_update(id: &str, user: &User) -> Result<Vec<u8>, ApiError> {
	let attributes = UserUpdateAttributes {
		roles: &user.roles,
		all_apps_visible: user.all_apps_visible,
		provisioning_allowed: user.provisioning_allowed,
	};
	let relationships = (!user.all_apps_visible).then(|| app_relationships(user));

	encode(&OutboundDocument {
		data: OutboundResource { kind: USERS, id: Some(id), attributes, relationships },
	})
}

/// Extracts an operator-facing message from an error response body.
///
/// Falls back to a truncated preview of the raw body when it is not a JSON:API error
/// document.
pub fn error_message(body: &[u8]) -> String {
	let parsed = serde_json::from_slice::<ErrorDocument>(body)
		.ok()
		.filter(|doc| !doc.errors.is_empty());

	match parsed {
		Some(doc) => doc.errors.iter().map(describe).collect::<Vec<_>>().join("; "),
		None => truncate_preview(String::from_utf8_lossy(body).into_owned()),
	}
}

fn describe(err: &ErrorObject) -> String {
	let text = err.detail.as_deref().or(err.title.as_deref()).unwrap_or("no details provided");

	match &err.code {
		Some(code) => format!("{code}: {text}"),
		None => text.to_owned(),
	}
}

fn app_relationships(user: &User) -> Relationships {
	let data = user
		.visible_app_ids
		.iter()
		.map(|id| Linkage { kind: APPS.into(), id: id.clone() })
		.collect();

	Relationships { visible_apps: Some(ToMany { data: Some(data) }) }
}

fn linked_apps(relationships: Option<Relationships>) -> (BTreeSet<String>, bool) {
	match relationships.and_then(|rel| rel.visible_apps).and_then(|many| many.data) {
		Some(data) =>
			(data.into_iter().filter(|link| link.kind == APPS).map(|link| link.id).collect(), true),
		None => (BTreeSet::new(), false),
	}
}

fn decode<T>(body: &[u8]) -> Result<T, ApiError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| ApiError::Decode { source })
}

fn encode<T>(value: &T) -> Result<Vec<u8>, ApiError>
where
	T: Serialize,
{
	serde_json::to_vec(value).map_err(|source| ApiError::Encode { source })
}

fn truncate_preview(mut body: String) -> String {
	if body.len() > BODY_PREVIEW_LIMIT {
		let mut cut = BODY_PREVIEW_LIMIT;

		while !body.is_char_boundary(cut) {
			cut -= 1;
		}

		body.truncate(cut);
	}

	body
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::{Value, json};
	// self
	use super::*;

	fn sample_user() -> User {
		User {
			id: String::new(),
			first_name: "John".into(),
			last_name: "Smith".into(),
			username: "john@example.com".into(),
			roles: [UserRole::Marketing].into_iter().collect(),
			all_apps_visible: false,
			visible_app_ids: ["1598625719".to_owned()].into_iter().collect(),
			provisioning_allowed: true,
			has_accepted_invite: false,
		}
	}

	#[test]
	fn decodes_accepted_user_with_visible_apps() {
		let body = json!({
			"data": {
				"type": "users",
				"id": "u-1",
				"attributes": {
					"username": "john@example.com",
					"firstName": "John",
					"lastName": "Smith",
					"roles": ["DEVELOPER", "MARKETING"],
					"allAppsVisible": false,
					"provisioningAllowed": true
				},
				"relationships": {
					"visibleApps": { "data": [{ "type": "apps", "id": "1598625719" }] }
				}
			}
		});
		let decoded = decode_user(body.to_string().as_bytes())
			.expect("User document fixture should decode.");

		assert!(decoded.visible_apps_linked);
		assert!(decoded.user.has_accepted_invite);
		assert_eq!(decoded.user.id, "u-1");
		assert_eq!(decoded.user.username, "john@example.com");
		assert!(decoded.user.roles.contains(&UserRole::Developer));
		assert!(decoded.user.visible_app_ids.contains("1598625719"));
	}

	#[test]
	fn decodes_invitation_as_pending_user() {
		let body = json!({
			"data": {
				"type": "userInvitations",
				"id": "inv-1",
				"attributes": {
					"email": "john@example.com",
					"firstName": "John",
					"lastName": "Smith",
					"roles": ["MARKETING"],
					"allAppsVisible": true,
					"provisioningAllowed": false,
					"expirationDate": "2026-11-16T00:00:00Z"
				}
			}
		});
		let decoded = decode_invitation(body.to_string().as_bytes())
			.expect("Invitation document fixture should decode.");

		assert!(!decoded.user.has_accepted_invite);
		assert!(!decoded.visible_apps_linked);
		assert_eq!(decoded.user.username, "john@example.com");
		assert!(decoded.user.all_apps_visible);
	}

	#[test]
	fn decode_failure_reports_json_path() {
		let body = br#"{"data":{"id":"u-1","attributes":{"roles":"ADMIN"}}}"#;
		let err = decode_user(body).expect_err("A scalar roles value should fail to decode.");
		let ApiError::Decode { source } = err else {
			panic!("Expected a decode error.");
		};

		assert_eq!(source.path().to_string(), "data.attributes.roles");
	}

	#[test]
	fn invitation_payload_carries_apps_only_when_listed() {
		let mut user = sample_user();
		let payload: Value = serde_json::from_slice(
			&encode_invitation(&user).expect("Invitation payload should encode."),
		)
		.expect("Encoded payload should be JSON.");

		assert_eq!(payload["data"]["type"], USER_INVITATIONS);
		assert_eq!(payload["data"]["attributes"]["email"], "john@example.com");
		assert_eq!(payload["data"]["attributes"]["roles"], json!(["MARKETING"]));
		assert_eq!(payload["data"]["relationships"]["visibleApps"]["data"][0]["id"], "1598625719");
		assert!(payload["data"].get("id").is_none());

		user.visible_app_ids.clear();
		user.all_apps_visible = true;

		let payload: Value = serde_json::from_slice(
			&encode_invitation(&user).expect("Invitation payload should encode."),
		)
		.expect("Encoded payload should be JSON.");

		assert!(payload["data"].get("relationships").is_none());
	}

	#[test]
	fn update_payload_targets_user_id() {
		let user = sample_user();
		let payload: Value = serde_json::from_slice(
			&encode_user_update("u-7", &user).expect("Update payload should encode."),
		)
		.expect("Encoded payload should be JSON.");

		assert_eq!(payload["data"]["type"], USERS);
		assert_eq!(payload["data"]["id"], "u-7");
		assert_eq!(payload["data"]["attributes"]["provisioningAllowed"], true);
		assert!(payload["data"]["attributes"].get("firstName").is_none());
	}

	#[test]
	fn error_message_joins_details_or_previews_raw_body() {
		let body = json!({
			"errors": [
				{
					"status": "409",
					"code": "ENTITY_ERROR",
					"title": "Conflict",
					"detail": "Already invited"
				},
				{ "status": "409", "title": "Second problem" }
			]
		});

		assert_eq!(
			error_message(body.to_string().as_bytes()),
			"ENTITY_ERROR: Already invited; Second problem"
		);
		assert_eq!(error_message(b"upstream unavailable"), "upstream unavailable");
		assert_eq!(error_message("x".repeat(400).as_bytes()).len(), BODY_PREVIEW_LIMIT);
	}
}

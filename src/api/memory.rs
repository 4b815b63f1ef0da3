//! Thread-safe in-memory [`UserApi`] implementation for local development and tests.
//!
//! Mirrors the service rules the controller depends on: new users start as pending
//! invitations, pending users reject modification, and missing records answer with
//! [`ApiError::NotFound`]. Every call is journaled so tests can assert on remote traffic.

// self
use crate::{
	_prelude::*,
	api::{ApiError, ApiFuture, User, UserApi},
};

/// Kind of remote call recorded by [`MemoryUserApi`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiCallKind {
	/// [`UserApi::create_user`].
	Create,
	/// [`UserApi::get_user`].
	Get,
	/// [`UserApi::modify_user`].
	Modify,
	/// [`UserApi::delete_user`].
	Delete,
}

/// Remote call observed by [`MemoryUserApi`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
	/// Invitation for the given username.
	Create(String),
	/// Fetch of the given identifier.
	Get(String),
	/// Modification of the given identifier.
	Modify(String),
	/// Removal of the given identifier.
	Delete(String),
}
impl ApiCall {
	/// Returns the call's kind without its argument.
	pub fn kind(&self) -> ApiCallKind {
		match self {
			Self::Create(_) => ApiCallKind::Create,
			Self::Get(_) => ApiCallKind::Get,
			Self::Modify(_) => ApiCallKind::Modify,
			Self::Delete(_) => ApiCallKind::Delete,
		}
	}
}

#[derive(Debug, Default)]
struct MemoryState {
	users: BTreeMap<String, User>,
	calls: Vec<ApiCall>,
	failures: BTreeMap<ApiCallKind, (u16, String)>,
	next_id: u64,
}
impl MemoryState {
	fn record(&mut self, call: ApiCall) -> Result<(), ApiError> {
		let kind = call.kind();

		self.calls.push(call);

		match self.failures.remove(&kind) {
			Some((status, message)) => Err(ApiError::Status { status, message, retry_after: None }),
			None => Ok(()),
		}
	}

	fn create_now(&mut self, user: &User) -> Result<User, ApiError> {
		self.record(ApiCall::Create(user.username.clone()))?;

		if self.users.values().any(|existing| existing.username == user.username) {
			return Err(ApiError::Status {
				status: 409,
				message: format!(
					"ENTITY_ERROR.ATTRIBUTE.INVALID.DUPLICATE: {} is already a member of the team",
					user.username
				),
				retry_after: None,
			});
		}

		self.next_id += 1;

		let stored = User {
			id: format!("user-{:04}", self.next_id),
			has_accepted_invite: false,
			..user.clone()
		};

		self.users.insert(stored.id.clone(), stored.clone());

		Ok(stored)
	}

	fn get_now(&mut self, id: &str) -> Result<User, ApiError> {
		self.record(ApiCall::Get(id.to_owned()))?;

		self.users.get(id).cloned().ok_or_else(|| not_found(id))
	}

	fn modify_now(&mut self, id: &str, user: &User) -> Result<User, ApiError> {
		self.record(ApiCall::Modify(id.to_owned()))?;

		let stored = self.users.get_mut(id).ok_or_else(|| not_found(id))?;

		if !stored.has_accepted_invite {
			return Err(ApiError::Status {
				status: 409,
				message: format!("STATE_ERROR: user {id} has not accepted their invitation"),
				retry_after: None,
			});
		}

		stored.roles = user.roles.clone();
		stored.all_apps_visible = user.all_apps_visible;
		stored.visible_app_ids =
			if user.all_apps_visible { BTreeSet::new() } else { user.visible_app_ids.clone() };
		stored.provisioning_allowed = user.provisioning_allowed;

		Ok(stored.clone())
	}

	fn delete_now(&mut self, id: &str) -> Result<(), ApiError> {
		self.record(ApiCall::Delete(id.to_owned()))?;

		self.users.remove(id).map(|_| ()).ok_or_else(|| not_found(id))
	}
}

/// Thread-safe fake of the App Store Connect user endpoints.
#[derive(Debug, Default)]
pub struct MemoryUserApi(Mutex<MemoryState>);
impl MemoryUserApi {
	/// Seeds a record directly, bypassing the call journal. Returns the previous record.
	pub fn insert(&self, user: User) -> Option<User> {
		self.0.lock().users.insert(user.id.clone(), user)
	}

	/// Returns the stored record without journaling a call.
	pub fn user(&self, id: &str) -> Option<User> {
		self.0.lock().users.get(id).cloned()
	}

	/// Marks the invitation behind `id` as accepted (or pending again).
	///
	/// Returns false when no such user exists.
	pub fn set_invite_accepted(&self, id: &str, accepted: bool) -> bool {
		match self.0.lock().users.get_mut(id) {
			Some(user) => {
				user.has_accepted_invite = accepted;

				true
			},
			None => false,
		}
	}

	/// Removes a record out of band, as if someone deleted it in App Store Connect.
	pub fn remove(&self, id: &str) -> Option<User> {
		self.0.lock().users.remove(id)
	}

	/// Makes the next call of `kind` fail with the given status and message.
	pub fn fail_next(&self, kind: ApiCallKind, status: u16, message: impl Into<String>) {
		self.0.lock().failures.insert(kind, (status, message.into()));
	}

	/// Every call journaled so far, oldest first.
	pub fn calls(&self) -> Vec<ApiCall> {
		self.0.lock().calls.clone()
	}

	/// Number of journaled calls of `kind`.
	pub fn call_count(&self, kind: ApiCallKind) -> usize {
		self.0.lock().calls.iter().filter(|call| call.kind() == kind).count()
	}

	/// Clears the call journal.
	pub fn clear_calls(&self) {
		self.0.lock().calls.clear();
	}
}
impl UserApi for MemoryUserApi {
	fn create_user<'a>(&'a self, user: &'a User) -> ApiFuture<'a, User> {
		Box::pin(async move { self.0.lock().create_now(user) })
	}

	fn get_user<'a>(&'a self, id: &'a str) -> ApiFuture<'a, User> {
		Box::pin(async move { self.0.lock().get_now(id) })
	}

	fn modify_user<'a>(&'a self, id: &'a str, user: &'a User) -> ApiFuture<'a, User> {
		Box::pin(async move { self.0.lock().modify_now(id, user) })
	}

	fn delete_user<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(async move { self.0.lock().delete_now(id) })
	}
}

fn not_found(id: &str) -> ApiError {
	ApiError::NotFound { path: format!("/v1/users/{id}") }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::user::UserRole;

	fn invitee(email: &str) -> User {
		User {
			first_name: "John".into(),
			last_name: "Smith".into(),
			username: email.into(),
			roles: [UserRole::Marketing].into_iter().collect(),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn created_users_start_as_pending_invitations() {
		let api = MemoryUserApi::default();
		let created = api
			.create_user(&invitee("john@example.com"))
			.await
			.expect("Creating a fresh invitee should succeed.");

		assert!(!created.id.is_empty());
		assert!(!created.has_accepted_invite);
		assert_eq!(api.calls(), [ApiCall::Create("john@example.com".into())]);
	}

	#[tokio::test]
	async fn pending_users_reject_modification() {
		let api = MemoryUserApi::default();
		let created =
			api.create_user(&invitee("john@example.com")).await.expect("Create should succeed.");
		let err = api
			.modify_user(&created.id, &created)
			.await
			.expect_err("Pending invitations should not be modifiable.");

		assert!(matches!(err, ApiError::Status { status: 409, .. }));
		assert!(api.set_invite_accepted(&created.id, true));

		let modified = api
			.modify_user(&created.id, &User { provisioning_allowed: true, ..created.clone() })
			.await
			.expect("Accepted users should be modifiable.");

		assert!(modified.provisioning_allowed);
	}

	#[tokio::test]
	async fn duplicate_usernames_conflict() {
		let api = MemoryUserApi::default();

		api.create_user(&invitee("john@example.com")).await.expect("First invite should succeed.");

		let err = api
			.create_user(&invitee("john@example.com"))
			.await
			.expect_err("Second invite for the same email should conflict.");

		assert!(err.to_string().contains("DUPLICATE"));
	}

	#[tokio::test]
	async fn injected_failures_fire_once() {
		let api = MemoryUserApi::default();

		api.fail_next(ApiCallKind::Get, 500, "upstream unavailable");

		let first = api.get_user("user-0001").await.expect_err("Injected failure should fire.");
		let second = api.get_user("user-0001").await.expect_err("Missing user should 404.");

		assert!(matches!(first, ApiError::Status { status: 500, .. }));
		assert!(second.is_not_found());
		assert_eq!(api.call_count(ApiCallKind::Get), 2);
	}

	#[tokio::test]
	async fn delete_reports_missing_users() {
		let api = MemoryUserApi::default();
		let created =
			api.create_user(&invitee("john@example.com")).await.expect("Create should succeed.");

		api.delete_user(&created.id).await.expect("Deleting an existing user should succeed.");

		assert!(api.user(&created.id).is_none());
		assert!(
			api.delete_user(&created.id)
				.await
				.expect_err("Second delete should report the user missing.")
				.is_not_found()
		);
	}
}

//! reqwest-backed [`UserApi`] talking to the App Store Connect REST API.
//!
//! Accepted users are addressed under `/v1/users`, pending users under
//! `/v1/userInvitations`. Callers only ever hold one identifier, so reads and deletes try
//! the user endpoint first and fall back to the invitation endpoint on 404.

// crates.io
use reqwest::{
	Method,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	api::{
		ApiError, ApiFuture, DEFAULT_BASE_URL, User, UserApi,
		document::{self, DecodedUser, USER_INVITATIONS, USERS},
	},
	auth::{ProviderCredentials, TokenSigner},
	error::ConfigError,
	http::{ReqwestHttpClient, ResponseMetadata},
};

const JSON_API: &str = "application/json";
const INCLUDE_VISIBLE_APPS: (&str, &str) = ("include", "visibleApps");

/// App Store Connect client that signs every request with the provider's API key.
#[derive(Debug)]
pub struct AppStoreClient {
	http: ReqwestHttpClient,
	base_url: Url,
	signer: TokenSigner,
}
impl AppStoreClient {
	/// Builds a client for the production endpoint.
	pub fn new(credentials: &ProviderCredentials) -> Result<Self, ConfigError> {
		let base_url = Url::parse(DEFAULT_BASE_URL)
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Self::with_base_url(credentials, base_url)
	}

	/// Builds a client for a custom endpoint (mock servers, proxies).
	pub fn with_base_url(
		credentials: &ProviderCredentials,
		mut base_url: Url,
	) -> Result<Self, ConfigError> {
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl {
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		Ok(Self {
			http: ReqwestHttpClient::default(),
			base_url,
			signer: TokenSigner::new(credentials)?,
		})
	}

	/// Swaps the HTTP client, e.g. to share a connection pool or tune timeouts.
	pub fn with_http_client(mut self, http: ReqwestHttpClient) -> Self {
		self.http = http;

		self
	}

	/// Base URL every request path is joined onto.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	// Identifiers are pushed as single percent-encoded segments so they cannot leave the
	// collection they address.
	fn endpoint(&self, collection: &str, id: Option<&str>) -> Result<Url, ApiError> {
		if let Some(id @ ("" | "." | "..")) = id {
			return Err(ApiError::InvalidId { id: id.to_owned() });
		}

		let mut url = self.base_url.clone();

		// Opaque base URLs are rejected by the constructors.
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().extend(["v1", collection]);

			if let Some(id) = id {
				segments.push(id);
			}
		}

		Ok(url)
	}

	async fn send(
		&self,
		method: Method,
		mut url: Url,
		query: Option<(&str, &str)>,
		body: Option<Vec<u8>>,
	) -> Result<Vec<u8>, ApiError> {
		if let Some((key, value)) = query {
			url.query_pairs_mut().append_pair(key, value);
		}

		let token = self.signer.bearer()?;
		let mut request =
			self.http.request(method, url.clone()).bearer_auth(token).header(ACCEPT, JSON_API);

		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, JSON_API).body(body);
		}

		let response = request.send().await?;
		let meta = ResponseMetadata::from_response(&response);
		let status = response.status();
		let bytes = response.bytes().await?;

		if status.is_success() {
			return Ok(bytes.to_vec());
		}
		if status == reqwest::StatusCode::NOT_FOUND {
			return Err(ApiError::NotFound { path: url.path().to_owned() });
		}

		Err(ApiError::Status {
			status: status.as_u16(),
			message: document::error_message(&bytes),
			retry_after: meta.retry_after,
		})
	}

	async fn fetch(&self, id: &str) -> Result<User, ApiError> {
		let url = self.endpoint(USERS, Some(id))?;

		match self.send(Method::GET, url, Some(INCLUDE_VISIBLE_APPS), None).await {
			Ok(body) => Ok(document::decode_user(&body)?.user),
			Err(e) if e.is_not_found() => {
				let url = self.endpoint(USER_INVITATIONS, Some(id))?;
				let body = self.send(Method::GET, url, Some(INCLUDE_VISIBLE_APPS), None).await?;

				Ok(document::decode_invitation(&body)?.user)
			},
			Err(e) => Err(e),
		}
	}

	// Write responses may omit relationship linkage; re-read so state reflects the service.
	// The write already happened, so a failed re-read falls back to the requested apps.
	async fn complete(&self, decoded: DecodedUser, requested: &User) -> User {
		let DecodedUser { mut user, visible_apps_linked } = decoded;

		if visible_apps_linked || user.all_apps_visible {
			return user;
		}

		match self.fetch(&user.id).await {
			Ok(fetched) => fetched,
			Err(e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(
					id = %user.id,
					error = %e,
					"re-reading a written user failed, keeping the requested visible apps"
				);
				#[cfg(not(feature = "tracing"))]
				let _ = e;

				user.visible_app_ids = requested.visible_app_ids.clone();

				user
			},
		}
	}

	async fn create(&self, user: &User) -> Result<User, ApiError> {
		let body = document::encode_invitation(user)?;
		let url = self.endpoint(USER_INVITATIONS, None)?;
		let response = self.send(Method::POST, url, None, Some(body)).await?;

		Ok(self.complete(document::decode_invitation(&response)?, user).await)
	}

	async fn modify(&self, id: &str, user: &User) -> Result<User, ApiError> {
		let body = document::encode_user_update(id, user)?;
		let url = self.endpoint(USERS, Some(id))?;
		let response = self.send(Method::PATCH, url, None, Some(body)).await?;

		Ok(self.complete(document::decode_user(&response)?, user).await)
	}

	async fn remove(&self, id: &str) -> Result<(), ApiError> {
		let url = self.endpoint(USERS, Some(id))?;

		match self.send(Method::DELETE, url, None, None).await {
			Ok(_) => Ok(()),
			Err(e) if e.is_not_found() => {
				let url = self.endpoint(USER_INVITATIONS, Some(id))?;

				self.send(Method::DELETE, url, None, None).await.map(|_| ())
			},
			Err(e) => Err(e),
		}
	}
}
impl UserApi for AppStoreClient {
	fn create_user<'a>(&'a self, user: &'a User) -> ApiFuture<'a, User> {
		Box::pin(self.create(user))
	}

	fn get_user<'a>(&'a self, id: &'a str) -> ApiFuture<'a, User> {
		Box::pin(self.fetch(id))
	}

	fn modify_user<'a>(&'a self, id: &'a str, user: &'a User) -> ApiFuture<'a, User> {
		Box::pin(self.modify(id, user))
	}

	fn delete_user<'a>(&'a self, id: &'a str) -> ApiFuture<'a, ()> {
		Box::pin(self.remove(id))
	}
}

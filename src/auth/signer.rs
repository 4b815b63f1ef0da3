//! ES256 bearer tokens for App Store Connect requests.
//!
//! Tokens carry the key ID in the `kid` header, the issuer ID as `iss`, and the
//! `appstoreconnect-v1` audience. App Store Connect rejects tokens that live longer than
//! 20 minutes, so the signer mints tokens with exactly that lifetime and reuses one until
//! it is within a minute of expiring.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{_prelude::*, auth::ProviderCredentials, error::ConfigError};

/// Audience every App Store Connect token must name.
pub const AUDIENCE: &str = "appstoreconnect-v1";
/// Lifetime of freshly signed tokens.
pub const TOKEN_LIFETIME: Duration = Duration::minutes(20);

const REFRESH_WINDOW: Duration = Duration::seconds(60);

/// Claims carried by App Store Connect bearer tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Issuer ID.
	pub iss: String,
	/// Issued-at, seconds since the Unix epoch.
	pub iat: i64,
	/// Expiry, seconds since the Unix epoch.
	pub exp: i64,
	/// Audience; always [`AUDIENCE`].
	pub aud: String,
}

/// Failures raised while minting a bearer token.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// The JWT could not be signed.
	#[error("Unable to sign the App Store Connect API token: {source}")]
	Signing {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

#[derive(Clone)]
struct SignedToken {
	token: String,
	expires_at: OffsetDateTime,
}

/// Mints and caches bearer tokens for one API key.
pub struct TokenSigner {
	issuer_id: String,
	key_id: String,
	key: EncodingKey,
	cached: Mutex<Option<SignedToken>>,
}
impl TokenSigner {
	/// Parses the private key and prepares a signer for `credentials`.
	pub fn new(credentials: &ProviderCredentials) -> Result<Self, ConfigError> {
		let key = EncodingKey::from_ec_pem(credentials.private_key.expose().as_bytes())
			.map_err(|source| ConfigError::InvalidPrivateKey { source })?;

		Ok(Self {
			issuer_id: credentials.issuer_id.clone(),
			key_id: credentials.key_id.clone(),
			key,
			cached: Mutex::new(None),
		})
	}

	/// Returns a token valid for at least another minute.
	pub fn bearer(&self) -> Result<String, TokenError> {
		self.bearer_at(OffsetDateTime::now_utc())
	}

	/// Same as [`TokenSigner::bearer`] with an explicit clock reading.
	pub fn bearer_at(&self, now: OffsetDateTime) -> Result<String, TokenError> {
		let mut cached = self.cached.lock();

		if let Some(current) =
			cached.as_ref().filter(|token| token.expires_at - now > REFRESH_WINDOW)
		{
			return Ok(current.token.clone());
		}

		let fresh = self.sign(now)?;
		let token = fresh.token.clone();

		*cached = Some(fresh);

		Ok(token)
	}

	fn sign(&self, now: OffsetDateTime) -> Result<SignedToken, TokenError> {
		let expires_at = now + TOKEN_LIFETIME;
		let claims = Claims {
			iss: self.issuer_id.clone(),
			iat: now.unix_timestamp(),
			exp: expires_at.unix_timestamp(),
			aud: AUDIENCE.into(),
		};
		let mut header = Header::new(Algorithm::ES256);

		header.kid = Some(self.key_id.clone());

		let token = jsonwebtoken::encode(&header, &claims, &self.key)
			.map_err(|source| TokenError::Signing { source })?;

		Ok(SignedToken { token, expires_at })
	}
}
impl Debug for TokenSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenSigner")
			.field("issuer_id", &self.issuer_id)
			.field("key_id", &self.key_id)
			.finish_non_exhaustive()
	}
}

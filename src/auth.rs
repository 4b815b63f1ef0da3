//! API key credentials and the ES256 bearer tokens derived from them.

pub mod credentials;
pub mod signer;

pub use credentials::*;
pub use signer::*;

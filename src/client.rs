//! Contracts for the wrapped service client and classification of its errors.
//!
//! The layer never reinterprets the client's configuration: every setter on
//! [`AutoRefreshClient`](crate::AutoRefreshClient) forwards to the matching [`ServiceClient`]
//! method unchanged. The only write the layer performs on its own is
//! [`ServiceClient::reset_access_key_token`] after each successful fetch.

pub mod error;

pub use error::*;

// self
use crate::{_prelude::*, auth::Credential};

/// Signature scheme the wrapped client uses to sign requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthVersion {
	/// Legacy HMAC-SHA1 request signatures.
	#[default]
	V1,
	/// Region-scoped V4 signatures; the client must also be given a region.
	V4,
}
impl AuthVersion {
	/// Returns a stable label suitable for logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthVersion::V1 => "v1",
			AuthVersion::V4 => "v4",
		}
	}
}
impl Display for AuthVersion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Authenticated remote service client wrapped by the refresh layer.
///
/// Implementations own their credential slot and must synchronize it internally; the layer
/// pushes new credentials without holding any lock of its own.
pub trait ServiceClient
where
	Self: Send + Sync,
{
	/// Replaces the credential used to sign subsequent requests.
	///
	/// Called exactly once per successful fetch. The method cannot fail the fetch, so any
	/// internal problem must be handled by the implementation.
	fn reset_access_key_token(&self, credential: &Credential);

	/// Overrides the user agent sent with every request.
	fn set_user_agent(&self, user_agent: &str);

	/// Overrides the client's own transport retry timeout.
	fn set_retry_timeout(&self, timeout: Duration);

	/// Selects the request signature scheme.
	fn set_auth_version(&self, version: AuthVersion);

	/// Sets the region used by region-scoped signatures.
	fn set_region(&self, region: &str);
}
impl<T> ServiceClient for Arc<T>
where
	T: ?Sized + ServiceClient,
{
	fn reset_access_key_token(&self, credential: &Credential) {
		(**self).reset_access_key_token(credential)
	}

	fn set_user_agent(&self, user_agent: &str) {
		(**self).set_user_agent(user_agent)
	}

	fn set_retry_timeout(&self, timeout: Duration) {
		(**self).set_retry_timeout(timeout)
	}

	fn set_auth_version(&self, version: AuthVersion) {
		(**self).set_auth_version(version)
	}

	fn set_region(&self, region: &str) {
		(**self).set_region(region)
	}
}

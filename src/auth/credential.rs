//! Short-lived access credential issued by a [`CredentialSource`](crate::source::CredentialSource).

// self
use crate::{_prelude::*, auth::secret::Secret};

/// Access identity used by the wrapped client to sign requests.
///
/// The layer only inspects [`Credential::expires_at`]; the remaining fields are handed to the
/// client verbatim through
/// [`ServiceClient::reset_access_key_token`](crate::client::ServiceClient::reset_access_key_token).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	/// Public access key identifier. Safe to log.
	pub access_key_id: String,
	/// Access key secret; callers must avoid logging it.
	pub access_key_secret: Secret,
	/// Session token bound to the access key; callers must avoid logging it.
	pub security_token: Secret,
	/// Instant after which the remote side rejects the credential.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Creates a credential from its raw parts.
	pub fn new(
		access_key_id: impl Into<String>,
		access_key_secret: impl Into<String>,
		security_token: impl Into<String>,
		expires_at: OffsetDateTime,
	) -> Self {
		Self {
			access_key_id: access_key_id.into(),
			access_key_secret: Secret::new(access_key_secret),
			security_token: Secret::new(security_token),
			expires_at,
		}
	}
}

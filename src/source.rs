//! Credential-issuing contract consumed by the fetcher.

// self
use crate::{_prelude::*, auth::Credential};

/// Boxed future returned by [`CredentialSource::fetch_credential`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Credential, BoxError>> + 'a + Send>>;

/// Issues fresh credentials (typically an STS `AssumeRole` call).
///
/// The source is invoked only by the fetcher, never concurrently more often than the debounce
/// window allows. It is expected to enforce its own network timeouts.
pub trait CredentialSource
where
	Self: Send + Sync,
{
	/// Requests a new credential.
	fn fetch_credential(&self) -> CredentialFuture<'_>;
}
impl<F, Fut, E> CredentialSource for F
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<Credential, E>>,
	E: Into<BoxError>,
{
	fn fetch_credential(&self) -> CredentialFuture<'_> {
		let fut = self();

		Box::pin(async move { fut.await.map_err(Into::into) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn closures_act_as_sources() {
		let expires_at = OffsetDateTime::UNIX_EPOCH + Duration::hours(1);
		let source = move || async move {
			Ok::<_, std::io::Error>(Credential::new("STS.id", "secret", "token", expires_at))
		};
		let credential =
			source.fetch_credential().await.expect("Closure source should issue a credential.");

		assert_eq!(credential.access_key_id, "STS.id");
		assert_eq!(credential.expires_at, expires_at);

		let failing = || async { Err::<Credential, _>(std::io::Error::other("denied")) };
		let err = failing.fetch_credential().await.expect_err("Failing source should error.");

		assert_eq!(err.to_string(), "denied");
	}
}

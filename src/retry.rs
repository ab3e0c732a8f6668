//! Retry-on-credential-rejection decorator applied uniformly to every remote operation.

// self
use crate::{
	_prelude::*,
	client::{ClassifyError, ServiceClient},
	obs::{RefreshTrigger, trace_event},
	refresh::CredentialFetcher,
	source::CredentialSource,
};

/// Bookkeeping for one decorated call.
#[derive(Debug, Default)]
pub struct InvokeReport {
	/// Number of times the operation ran.
	pub attempts: u32,
	/// Number of reactive refreshes requested (successful or not).
	pub refreshes: u32,
	/// Refresh failure that ended the retry loop, if any.
	///
	/// When set, the operation's own error is still what the caller receives.
	pub refresh_error: Option<Error>,
}

/// Runs operations and, when they fail because the credential was rejected, refreshes the
/// credential synchronously and runs them again.
///
/// Only [`ErrorClass::AuthInvalid`](crate::client::ErrorClass::AuthInvalid) failures are retried.
/// Every other error, and every outcome after the last attempt, is handed back unchanged. If the
/// refresh itself fails (including the debounce throttle) the loop stops and the operation's
/// error is returned, never the refresh error.
pub struct RetryingInvoker<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	fetcher: Arc<CredentialFetcher<C, S>>,
	max_try_times: u32,
}
impl<C, S> RetryingInvoker<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	/// Creates an invoker that runs each operation at most `max_try_times` times (at least once).
	pub fn new(fetcher: Arc<CredentialFetcher<C, S>>, max_try_times: u32) -> Self {
		Self { fetcher, max_try_times: max_try_times.max(1) }
	}

	/// Upper bound on how many times an operation runs.
	pub fn max_try_times(&self) -> u32 {
		self.max_try_times
	}

	/// Runs `op` until it succeeds, fails for a reason other than the credential, the refresh
	/// fails, or the attempt budget is spent.
	pub async fn invoke<T, E, F, Fut>(&self, op: F) -> Result<T, E>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: ClassifyError,
	{
		self.invoke_with_report(op).await.0
	}

	/// Same as [`RetryingInvoker::invoke`], also returning the call's [`InvokeReport`].
	pub async fn invoke_with_report<T, E, F, Fut>(&self, mut op: F) -> (Result<T, E>, InvokeReport)
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: ClassifyError,
	{
		let mut report = InvokeReport::default();

		loop {
			report.attempts += 1;

			let err = match op().await {
				Ok(value) => return (Ok(value), report),
				Err(err) => err,
			};

			if !err.is_auth_invalid() {
				return (Err(err), report);
			}

			report.refreshes += 1;

			if let Err(refresh_err) = self.fetcher.fetch_for(RefreshTrigger::Reactive).await {
				trace_event!(
					warn,
					attempt = report.attempts,
					error = %refresh_err,
					"Credential refresh failed after an authorization error; giving up."
				);

				report.refresh_error = Some(refresh_err);

				return (Err(err), report);
			}
			if report.attempts >= self.max_try_times {
				return (Err(err), report);
			}

			trace_event!(
				debug,
				attempt = report.attempts,
				"Credential refreshed after an authorization error; retrying."
			);
		}
	}
}
impl<C, S> Clone for RetryingInvoker<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	fn clone(&self) -> Self {
		Self { fetcher: self.fetcher.clone(), max_try_times: self.max_try_times }
	}
}
impl<C, S> Debug for RetryingInvoker<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RetryingInvoker").field("max_try_times", &self.max_try_times).finish()
	}
}

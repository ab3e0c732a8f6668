//! Client facade tying the fetcher, scheduler, and retry decorator to one wrapped client.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	client::{AuthVersion, ClassifyError, ServiceClient},
	clock::{Clock, SystemClock},
	obs::RefreshTrigger,
	policy::RefreshPolicy,
	refresh::{CredentialFetcher, CredentialSnapshot, FetchMetrics, RefreshScheduler},
	retry::{InvokeReport, RetryingInvoker},
	source::CredentialSource,
};

/// Wraps a [`ServiceClient`] so its credential stays fresh without caller involvement.
///
/// A background [`RefreshScheduler`] renews the credential ahead of expiry, and every call made
/// through [`AutoRefreshClient::invoke`] is retried after a synchronous refresh when the remote
/// side rejects the credential. Configuration setters forward to the wrapped client unchanged.
pub struct AutoRefreshClient<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	client: Arc<C>,
	fetcher: Arc<CredentialFetcher<C, S>>,
	invoker: RetryingInvoker<C, S>,
	scheduler: RefreshScheduler,
}
impl<C, S> AutoRefreshClient<C, S>
where
	C: 'static + ?Sized + ServiceClient,
	S: 'static + ?Sized + CredentialSource,
{
	/// Starts configuring a client around `client` and `source`.
	pub fn builder(client: Arc<C>, source: Arc<S>) -> AutoRefreshClientBuilder<C, S> {
		AutoRefreshClientBuilder::new(client, source)
	}

	/// Runs `op` against the wrapped client, refreshing and retrying on credential rejection.
	///
	/// The caller receives the operation's own result or error; refresh mechanics only add
	/// latency on the retry path.
	pub async fn invoke<'a, T, E, F, Fut>(&'a self, mut op: F) -> Result<T, E>
	where
		F: FnMut(&'a C) -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: ClassifyError,
	{
		let client = self.client.as_ref();

		self.invoker.invoke(|| op(client)).await
	}

	/// Same as [`AutoRefreshClient::invoke`], also returning the call's [`InvokeReport`].
	pub async fn invoke_with_report<'a, T, E, F, Fut>(
		&'a self,
		mut op: F,
	) -> (Result<T, E>, InvokeReport)
	where
		F: FnMut(&'a C) -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: ClassifyError,
	{
		let client = self.client.as_ref();

		self.invoker.invoke_with_report(|| op(client)).await
	}

	/// Forces a refresh attempt, subject to the debounce window and backoff.
	pub async fn refresh(&self) -> Result<()> {
		self.fetcher.fetch().await
	}

	/// Forwards to [`ServiceClient::set_user_agent`].
	pub fn set_user_agent(&self, user_agent: &str) {
		self.client.set_user_agent(user_agent);
	}

	/// Forwards to [`ServiceClient::set_retry_timeout`].
	pub fn set_retry_timeout(&self, timeout: Duration) {
		self.client.set_retry_timeout(timeout);
	}

	/// Forwards to [`ServiceClient::set_auth_version`].
	pub fn set_auth_version(&self, version: AuthVersion) {
		self.client.set_auth_version(version);
	}

	/// Forwards to [`ServiceClient::set_region`].
	pub fn set_region(&self, region: &str) {
		self.client.set_region(region);
	}

	/// Forwards a caller-supplied credential to the wrapped client.
	///
	/// The refresh bookkeeping is not touched; the scheduler keeps renewing on its own timeline.
	pub fn reset_access_key_token(&self, credential: &Credential) {
		self.client.reset_access_key_token(credential);
	}

	/// Asks the scheduler to stop after its current cycle. Calls already in flight still
	/// complete and [`AutoRefreshClient::invoke`] keeps working.
	pub fn close(&self) {
		self.scheduler.close();
	}

	/// Returns `true` once [`AutoRefreshClient::close`] has been called.
	pub fn is_closed(&self) -> bool {
		self.scheduler.is_closed()
	}

	/// Cancels the scheduler and waits for the background task to finish.
	pub async fn shutdown(&self) {
		self.scheduler.shutdown().await;
	}

	/// Token the scheduler listens on; cancelling it stops the background task.
	pub fn shutdown_token(&self) -> CancellationToken {
		self.scheduler.token().clone()
	}

	/// Returns `true` once the background task has terminated.
	pub fn is_scheduler_finished(&self) -> bool {
		self.scheduler.is_finished()
	}

	/// Copies the refresh state for diagnostics.
	pub fn snapshot(&self) -> CredentialSnapshot {
		self.fetcher.snapshot()
	}

	/// Fetch counters.
	pub fn metrics(&self) -> &Arc<FetchMetrics> {
		self.fetcher.metrics()
	}

	/// Policy the client was built with.
	pub fn policy(&self) -> &RefreshPolicy {
		self.fetcher.policy()
	}

	/// The wrapped client.
	pub fn client(&self) -> &Arc<C> {
		&self.client
	}
}
impl<C, S> Debug for AutoRefreshClient<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AutoRefreshClient")
			.field("fetcher", &self.fetcher)
			.field("invoker", &self.invoker)
			.field("scheduler", &self.scheduler)
			.finish()
	}
}

/// Builder for [`AutoRefreshClient`] values.
pub struct AutoRefreshClientBuilder<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	client: Arc<C>,
	source: Arc<S>,
	policy: RefreshPolicy,
	shutdown: Option<CancellationToken>,
	clock: Option<Arc<dyn Clock>>,
}
impl<C, S> AutoRefreshClientBuilder<C, S>
where
	C: 'static + ?Sized + ServiceClient,
	S: 'static + ?Sized + CredentialSource,
{
	/// Creates a builder with the default [`RefreshPolicy`] and the system clock.
	pub fn new(client: Arc<C>, source: Arc<S>) -> Self {
		Self { client, source, policy: RefreshPolicy::default(), shutdown: None, clock: None }
	}

	/// Overrides the refresh policy.
	pub fn policy(mut self, policy: RefreshPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Stops the scheduler whenever the host cancels `token`.
	pub fn shutdown_token(mut self, token: CancellationToken) -> Self {
		self.shutdown = Some(token);

		self
	}

	/// Overrides the wall clock used to measure time-to-expiry.
	pub fn clock(mut self, clock: impl 'static + Clock) -> Self {
		self.clock = Some(Arc::new(clock));

		self
	}

	/// Validates the policy, fetches the first credential, and starts the scheduler.
	///
	/// Fails with the fetch error when the first credential cannot be issued; no background
	/// task is left running in that case. Must be called within a tokio runtime.
	pub async fn spawn(self) -> Result<AutoRefreshClient<C, S>> {
		let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
		let fetcher =
			Arc::new(CredentialFetcher::new(self.client.clone(), self.source, self.policy, clock)?);

		fetcher.fetch_for(RefreshTrigger::Initial).await?;

		let shutdown = self.shutdown.unwrap_or_default();
		let scheduler = RefreshScheduler::spawn(fetcher.clone(), &shutdown);
		let invoker = RetryingInvoker::new(fetcher.clone(), self.policy.max_try_times);

		Ok(AutoRefreshClient { client: self.client, fetcher, invoker, scheduler })
	}
}
impl<C, S> Debug for AutoRefreshClientBuilder<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AutoRefreshClientBuilder")
			.field("policy", &self.policy)
			.field("shutdown_set", &self.shutdown.is_some())
			.field("clock_set", &self.clock.is_some())
			.finish()
	}
}

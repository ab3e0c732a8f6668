//! Debounced, backoff-protected credential fetch.

// crates.io
use tokio::time::Instant;
// self
use crate::{
	_prelude::*,
	client::ServiceClient,
	clock::Clock,
	error::ConfigError,
	obs::{self, FetchOutcome, RefreshSpan, RefreshTrigger, trace_event},
	policy::RefreshPolicy,
	refresh::{CredentialSnapshot, CredentialState, FetchMetrics, to_std},
	source::CredentialSource,
};

/// Performs single refresh attempts against a [`CredentialSource`] and pushes issued
/// credentials into the wrapped [`ServiceClient`].
///
/// Each attempt:
///
/// 1. fails fast with [`Error::HighFrequency`] when the previous attempt is younger than
///    [`RefreshPolicy::min_fetch_interval`], leaving the state untouched;
/// 2. sleeps the current failure backoff (zero after a success);
/// 3. calls the source outside the state lock;
/// 4. on success resets the failure bookkeeping, advances the expiry, and calls
///    [`ServiceClient::reset_access_key_token`] exactly once;
/// 5. on failure bumps the failure count and grows the backoff.
pub struct CredentialFetcher<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	client: Arc<C>,
	source: Arc<S>,
	state: Mutex<CredentialState>,
	policy: RefreshPolicy,
	clock: Arc<dyn Clock>,
	metrics: Arc<FetchMetrics>,
}
impl<C, S> CredentialFetcher<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	/// Creates a fetcher with a fresh, already-expired state.
	///
	/// Fails with [`Error::Config`] when `policy` does not pass [`RefreshPolicy::validate`].
	pub fn new(
		client: Arc<C>,
		source: Arc<S>,
		policy: RefreshPolicy,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		policy.validate().map_err(ConfigError::from)?;

		Ok(Self {
			client,
			source,
			state: Mutex::new(CredentialState::new()),
			policy,
			clock,
			metrics: Default::default(),
		})
	}

	/// Runs one refresh attempt on behalf of the host.
	pub async fn fetch(&self) -> Result<()> {
		self.fetch_for(RefreshTrigger::Manual).await
	}

	/// Runs one refresh attempt, labeling logs and metrics with `trigger`.
	pub async fn fetch_for(&self, trigger: RefreshTrigger) -> Result<()> {
		let span = RefreshSpan::new(trigger);

		span.instrument(async move {
			let min_interval = self.policy.min_fetch_interval;
			let admitted = self.state.lock().begin_attempt(Instant::now(), min_interval);
			let Some(backoff) = admitted else {
				self.metrics.record_throttled();
				obs::record_fetch_outcome(trigger, FetchOutcome::Throttled);
				trace_event!(
					debug,
					%min_interval,
					"Credential fetch skipped inside the debounce window."
				);

				return Err(Error::HighFrequency { min_interval });
			};

			self.metrics.record_attempt();
			obs::record_fetch_outcome(trigger, FetchOutcome::Attempt);

			if backoff.is_positive() {
				trace_event!(debug, %backoff, "Backing off before the next credential fetch.");
				tokio::time::sleep(to_std(backoff)).await;
			}

			match self.source.fetch_credential().await {
				Ok(credential) => {
					self.state.lock().record_success(credential.expires_at);
					self.client.reset_access_key_token(&credential);
					self.metrics.record_success();
					obs::record_fetch_outcome(trigger, FetchOutcome::Success);
					trace_event!(
						info,
						access_key_id = %credential.access_key_id,
						expires_at = %credential.expires_at,
						"Credential refreshed."
					);

					Ok(())
				},
				Err(source) => {
					self.state
						.lock()
						.record_failure(self.policy.backoff_min, self.policy.backoff_max);
					self.metrics.record_failure();
					obs::record_fetch_outcome(trigger, FetchOutcome::Failure);
					trace_event!(
						warn,
						error = %source,
						failures = self.state.lock().consecutive_failures(),
						"Credential fetch failed."
					);

					Err(Error::Fetch { source })
				},
			}
		})
		.await
	}

	/// Remaining lifetime of the current credential according to the fetcher's clock.
	pub fn time_to_expiry(&self) -> Duration {
		let expires_at = self.state.lock().expires_at();

		expires_at - self.clock.now()
	}

	/// Copies the current state for diagnostics.
	pub fn snapshot(&self) -> CredentialSnapshot {
		self.state.lock().snapshot()
	}

	/// Policy the fetcher was built with.
	pub fn policy(&self) -> &RefreshPolicy {
		&self.policy
	}

	/// Counters for every attempt made by this fetcher.
	pub fn metrics(&self) -> &Arc<FetchMetrics> {
		&self.metrics
	}

	/// The wrapped client.
	pub fn client(&self) -> &Arc<C> {
		&self.client
	}
}
impl<C, S> Debug for CredentialFetcher<C, S>
where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialFetcher")
			.field("state", &*self.state.lock())
			.field("policy", &self.policy)
			.finish()
	}
}

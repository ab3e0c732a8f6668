//! Background task that renews the credential ahead of expiry.

// crates.io
use tokio::task::JoinHandle;
use tokio_util::sync::DropGuard;
// self
use crate::{
	_prelude::*,
	client::ServiceClient,
	obs::{RefreshTrigger, trace_event},
	refresh::{CredentialFetcher, to_std},
	source::CredentialSource,
};

/// Sleep used once the credential has less than a minute left (or already expired).
pub const SHORT_LIVED_INTERVAL: Duration = Duration::seconds(30);

/// Maps the remaining credential lifetime to the time the scheduler sleeps before refreshing.
///
/// | remaining      | sleep            |
/// |----------------|------------------|
/// | < 1 minute     | 30 seconds       |
/// | < 10 minutes   | 70% of remaining |
/// | < 1 hour       | 60% of remaining |
/// | otherwise      | 50% of remaining |
pub fn refresh_interval(time_to_expiry: Duration) -> Duration {
	if time_to_expiry < Duration::MINUTE {
		SHORT_LIVED_INTERVAL
	} else if time_to_expiry < Duration::minutes(10) {
		time_to_expiry / 10 * 7
	} else if time_to_expiry < Duration::HOUR {
		time_to_expiry / 10 * 6
	} else {
		time_to_expiry / 10 * 5
	}
}

/// Handle to the single background refresh task.
///
/// The task stops when its cancellation token fires (host shutdown,
/// [`RefreshScheduler::shutdown`], or the handle being dropped) or when it observes the closed
/// flag after a fetch cycle. It never stops because a fetch failed.
#[derive(Debug)]
pub struct RefreshScheduler {
	token: CancellationToken,
	closed: Arc<AtomicBool>,
	handle: Mutex<Option<JoinHandle<()>>>,
	_drop_guard: DropGuard,
}
impl RefreshScheduler {
	/// Spawns the refresh loop on the current tokio runtime.
	///
	/// The loop listens on a child of `shutdown`, so cancelling the host token stops it while
	/// stopping the scheduler leaves the host token untouched.
	pub fn spawn<C, S>(fetcher: Arc<CredentialFetcher<C, S>>, shutdown: &CancellationToken) -> Self
	where
		C: 'static + ?Sized + ServiceClient,
		S: 'static + ?Sized + CredentialSource,
	{
		let token = shutdown.child_token();
		let closed = Arc::new(AtomicBool::new(false));
		let handle = tokio::spawn(run(fetcher, token.clone(), closed.clone()));

		Self {
			_drop_guard: token.clone().drop_guard(),
			token,
			closed,
			handle: Mutex::new(Some(handle)),
		}
	}

	/// Sets the terminal flag; the loop exits after its current sleep/fetch cycle.
	pub fn close(&self) {
		self.closed.store(true, Ordering::Release);
	}

	/// Returns `true` once [`RefreshScheduler::close`] has been called.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	/// Token the loop listens on.
	pub fn token(&self) -> &CancellationToken {
		&self.token
	}

	/// Returns `true` once the background task has terminated.
	pub fn is_finished(&self) -> bool {
		self.handle.lock().as_ref().is_none_or(JoinHandle::is_finished)
	}

	/// Signals the loop to stop and waits for the task to terminate.
	///
	/// Only the first call joins the task; later calls return immediately.
	pub async fn shutdown(&self) {
		self.token.cancel();

		let Some(handle) = self.handle.lock().take() else {
			return;
		};

		if let Err(err) = handle.await {
			if err.is_panic() {
				trace_event!(error, "Credential refresh task panicked.");
			} else if err.is_cancelled() {
				trace_event!(info, "Credential refresh task was cancelled.");
			}
		}
	}
}

async fn run<C, S>(
	fetcher: Arc<CredentialFetcher<C, S>>,
	token: CancellationToken,
	closed: Arc<AtomicBool>,
) where
	C: ?Sized + ServiceClient,
	S: ?Sized + CredentialSource,
{
	loop {
		let time_to_expiry = fetcher.time_to_expiry();
		let interval = refresh_interval(time_to_expiry);

		trace_event!(
			debug,
			%time_to_expiry,
			%interval,
			"Next scheduled credential fetch computed."
		);

		tokio::select! {
			biased;

			_ = token.cancelled() => {
				trace_event!(info, "Shutdown requested; credential refresh task exiting.");

				return;
			},
			_ = tokio::time::sleep(to_std(interval)) => {},
		}

		// Failures are logged by the fetcher; the next cycle or a reactive refresh retries.
		if fetcher.fetch_for(RefreshTrigger::Scheduled).await.is_err() {
			trace_event!(debug, "Scheduled credential fetch did not renew the credential.");
		}

		if closed.load(Ordering::Acquire) {
			trace_event!(info, "Client closed; credential refresh task exiting.");

			return;
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn interval_tiers_follow_remaining_lifetime() {
		assert_eq!(refresh_interval(Duration::seconds(30)), Duration::seconds(30));
		assert_eq!(refresh_interval(Duration::seconds(-120)), Duration::seconds(30));
		assert_eq!(refresh_interval(Duration::seconds(59)), Duration::seconds(30));
		assert_eq!(refresh_interval(Duration::minutes(5)), Duration::seconds(210));
		assert_eq!(refresh_interval(Duration::minutes(30)), Duration::minutes(18));
		assert_eq!(refresh_interval(Duration::hours(2)), Duration::hours(1));
	}

	#[test]
	fn interval_tier_boundaries() {
		assert_eq!(refresh_interval(Duration::MINUTE), Duration::seconds(42));
		assert_eq!(refresh_interval(Duration::minutes(10)), Duration::minutes(6));
		assert_eq!(refresh_interval(Duration::HOUR), Duration::minutes(30));
	}
}

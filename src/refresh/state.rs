//! Shared credential bookkeeping guarded by a single mutex.

// crates.io
use tokio::time::Instant;
// self
use crate::_prelude::*;

/// Mutable record of the current credential's expiry and refresh history.
///
/// Only [`CredentialFetcher`](crate::refresh::CredentialFetcher) mutates the state, and only for
/// the short critical sections around a fetch: never across the sleep or the source call.
#[derive(Debug)]
pub struct CredentialState {
	expires_at: OffsetDateTime,
	last_fetch_at: Option<Instant>,
	consecutive_failures: u32,
	current_backoff: Duration,
}
impl CredentialState {
	/// Creates a state whose credential is already expired and that has never fetched.
	pub fn new() -> Self {
		Self {
			expires_at: OffsetDateTime::UNIX_EPOCH,
			last_fetch_at: None,
			consecutive_failures: 0,
			current_backoff: Duration::ZERO,
		}
	}

	/// Expiry of the most recently issued credential.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Number of failed fetches since the last success.
	pub fn consecutive_failures(&self) -> u32 {
		self.consecutive_failures
	}

	/// Delay applied before the next non-debounced fetch.
	pub fn current_backoff(&self) -> Duration {
		self.current_backoff
	}

	/// Monotonic instant of the last fetch that passed the debounce check.
	pub fn last_fetch_at(&self) -> Option<Instant> {
		self.last_fetch_at
	}

	/// Copies the state for diagnostics.
	pub fn snapshot(&self) -> CredentialSnapshot {
		CredentialSnapshot {
			expires_at: self.expires_at,
			last_fetch_at: self.last_fetch_at,
			consecutive_failures: self.consecutive_failures,
			current_backoff: self.current_backoff,
		}
	}

	/// Runs the debounce check at `now`.
	///
	/// Returns `None` without touching the state when the previous attempt is younger than
	/// `min_interval`. Otherwise records `now` as the latest attempt and returns the delay to
	/// wait before calling the source.
	pub fn begin_attempt(&mut self, now: Instant, min_interval: Duration) -> Option<Duration> {
		if let Some(last) = self.last_fetch_at {
			let elapsed = Duration::try_from(now.saturating_duration_since(last))
				.unwrap_or(Duration::MAX);

			if elapsed < min_interval {
				return None;
			}
		}

		self.last_fetch_at = Some(now);

		Some(self.current_backoff)
	}

	/// Records an issued credential. The expiry never moves backwards.
	pub fn record_success(&mut self, expires_at: OffsetDateTime) {
		self.consecutive_failures = 0;
		self.current_backoff = Duration::ZERO;
		self.expires_at = self.expires_at.max(expires_at);
	}

	/// Records a failed source call and grows the backoff within `[min, max]`.
	pub fn record_failure(&mut self, min: Duration, max: Duration) {
		self.consecutive_failures = self.consecutive_failures.saturating_add(1);
		self.current_backoff = next_backoff(self.current_backoff, min, max);
	}
}
impl Default for CredentialState {
	fn default() -> Self {
		Self::new()
	}
}

/// Read-only copy of [`CredentialState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialSnapshot {
	/// Expiry of the most recently issued credential.
	pub expires_at: OffsetDateTime,
	/// Monotonic instant of the last fetch that passed the debounce check.
	pub last_fetch_at: Option<Instant>,
	/// Number of failed fetches since the last success.
	pub consecutive_failures: u32,
	/// Delay applied before the next non-debounced fetch.
	pub current_backoff: Duration,
}

/// Doubles `current` and clamps the result to `[min, max]`.
pub fn next_backoff(current: Duration, min: Duration, max: Duration) -> Duration {
	current.saturating_mul(2).clamp(min, max)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	const MIN: Duration = Duration::seconds(1);
	const MAX: Duration = Duration::seconds(60);

	#[test]
	fn backoff_doubles_within_bounds_and_resets_on_success() {
		let mut state = CredentialState::new();
		let mut previous = state.current_backoff();

		for _ in 0..10 {
			state.record_failure(MIN, MAX);

			assert_eq!(state.current_backoff(), previous.saturating_mul(2).clamp(MIN, MAX));
			assert!(state.consecutive_failures() > 0 && !state.current_backoff().is_zero());

			previous = state.current_backoff();
		}

		assert_eq!(state.consecutive_failures(), 10);
		assert_eq!(state.current_backoff(), MAX);

		state.record_success(macros::datetime!(2025-11-10 12:00 UTC));

		assert_eq!(state.consecutive_failures(), 0);
		assert!(state.current_backoff().is_zero());
	}

	#[test]
	fn backoff_sequence_starts_at_min() {
		let sequence = (0..8)
			.scan(Duration::ZERO, |backoff, _| {
				*backoff = next_backoff(*backoff, MIN, MAX);

				Some(backoff.whole_seconds())
			})
			.collect::<Vec<_>>();

		assert_eq!(sequence, [1, 2, 4, 8, 16, 32, 60, 60]);
	}

	#[test]
	fn success_never_moves_expiry_backwards() {
		let later = macros::datetime!(2025-11-10 13:00 UTC);
		let earlier = macros::datetime!(2025-11-10 12:00 UTC);
		let mut state = CredentialState::new();

		assert_eq!(state.expires_at(), OffsetDateTime::UNIX_EPOCH);

		state.record_success(later);
		state.record_success(earlier);

		assert_eq!(state.expires_at(), later);
	}

	#[tokio::test(start_paused = true)]
	async fn debounce_rejects_without_side_effects() {
		let window = Duration::seconds(1);
		let mut state = CredentialState::new();
		let first = Instant::now();

		assert_eq!(state.begin_attempt(first, window), Some(Duration::ZERO));

		state.record_failure(MIN, MAX);

		let before = state.snapshot();

		tokio::time::advance(StdDuration::from_millis(500)).await;

		assert_eq!(state.begin_attempt(Instant::now(), window), None);
		assert_eq!(state.snapshot(), before);

		tokio::time::advance(StdDuration::from_millis(500)).await;

		let now = Instant::now();

		assert_eq!(state.begin_attempt(now, window), Some(MIN));
		assert_eq!(state.last_fetch_at(), Some(now));
	}
}

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for fetch attempts.
#[derive(Debug, Default)]
pub struct FetchMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	throttled: AtomicU64,
}
impl FetchMetrics {
	/// Returns the number of fetches that passed the debounce check.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of credentials issued.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed source calls.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of fetches rejected by the debounce window.
	pub fn throttled(&self) -> u64 {
		self.throttled.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_throttled(&self) {
		self.throttled.fetch_add(1, Ordering::Relaxed);
	}
}

//! Wall-clock sources used to measure time-to-expiry.

// crates.io
use tokio::time::Instant;
// self
use crate::_prelude::*;

/// Source of the current wall-clock instant.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// The operating system clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Wall clock derived from the tokio runtime clock.
///
/// Reads the system time once at construction and advances with [`tokio::time::Instant`]
/// afterwards, so it is immune to wall-clock jumps and follows a paused test runtime.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeClock {
	origin: OffsetDateTime,
	anchor: Instant,
}
impl RuntimeClock {
	/// Anchors a new clock at the current system time.
	pub fn new() -> Self {
		Self::starting_at(OffsetDateTime::now_utc())
	}

	/// Anchors a new clock at `origin`.
	pub fn starting_at(origin: OffsetDateTime) -> Self {
		Self { origin, anchor: Instant::now() }
	}
}
impl Default for RuntimeClock {
	fn default() -> Self {
		Self::new()
	}
}
impl Clock for RuntimeClock {
	fn now(&self) -> OffsetDateTime {
		let elapsed = Duration::try_from(self.anchor.elapsed()).unwrap_or(Duration::MAX);

		self.origin.saturating_add(elapsed)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn runtime_clock_follows_paused_time() {
		let origin = macros::datetime!(2025-11-10 12:00 UTC);
		let clock = RuntimeClock::starting_at(origin);

		assert_eq!(clock.now(), origin);

		tokio::time::advance(StdDuration::from_secs(90)).await;

		assert_eq!(clock.now(), origin + Duration::seconds(90));
	}
}

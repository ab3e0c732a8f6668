//! Optional observability helpers for the refresh layer.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `sts_autorefresh.refresh` with
//!   the `trigger` field, plus events for scheduler intervals and fetch outcomes.
//! - Enable `metrics` to increment the `sts_autorefresh_fetch_total` counter for every
//!   attempt/success/failure/throttle, labeled by `trigger` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Emits a `tracing` event at the given level when the `tracing` feature is enabled.
macro_rules! trace_event {
	($level:ident, $($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		::tracing::$level!($($arg)+);
	}};
}
pub(crate) use trace_event;

/// What caused a fetch attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshTrigger {
	/// The fetch performed while the client is being constructed.
	Initial,
	/// The background scheduler woke up.
	Scheduled,
	/// An operation failed with a credential rejection.
	Reactive,
	/// The host called [`CredentialFetcher::fetch`](crate::refresh::CredentialFetcher::fetch).
	Manual,
}
impl RefreshTrigger {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshTrigger::Initial => "initial",
			RefreshTrigger::Scheduled => "scheduled",
			RefreshTrigger::Reactive => "reactive",
			RefreshTrigger::Manual => "manual",
		}
	}
}
impl Display for RefreshTrigger {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
	/// The debounce check passed and the source is about to be called.
	Attempt,
	/// The source issued a credential.
	Success,
	/// The source failed.
	Failure,
	/// The debounce window rejected the request.
	Throttled,
}
impl FetchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchOutcome::Attempt => "attempt",
			FetchOutcome::Success => "success",
			FetchOutcome::Failure => "failure",
			FetchOutcome::Throttled => "throttled",
		}
	}
}
impl Display for FetchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

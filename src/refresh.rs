//! Credential refresh core: shared state, the debounced fetcher, and the background scheduler.
//!
//! [`CredentialFetcher`] is the only writer of [`CredentialState`]. It is driven from two
//! directions: [`RefreshScheduler`] wakes up ahead of expiry on an adaptive timer, and the
//! [`RetryingInvoker`](crate::retry::RetryingInvoker) calls it reactively whenever an operation
//! is rejected with a credential error. The debounce window bounds how often the credential
//! source is reached regardless of how many callers ask.

mod metrics;

pub mod fetcher;
pub mod scheduler;
pub mod state;

pub use fetcher::*;
pub use metrics::FetchMetrics;
pub use scheduler::*;
pub use state::*;

// self
use crate::_prelude::*;

/// Converts a signed duration into a sleepable one, mapping negative values to zero.
pub(crate) fn to_std(duration: Duration) -> StdDuration {
	StdDuration::try_from(duration).unwrap_or(StdDuration::ZERO)
}

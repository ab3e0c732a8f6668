//! Layer-level error types shared by the fetcher, scheduler, and client facade.

// self
use crate::{_prelude::*, policy::PolicyError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Type-erased error produced by external collaborators.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by the refresh layer.
///
/// Operation errors produced by the wrapped client never appear here; they are handed back to
/// the caller untouched.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// A fetch was requested before the debounce window elapsed; no attempt was made.
	#[error("Credential fetch frequency is too high; the minimum interval is {min_interval}.")]
	HighFrequency {
		/// Debounce window that rejected the request.
		min_interval: Duration,
	},
	/// The credential source failed to issue a credential.
	#[error("Credential source failed to issue a credential.")]
	Fetch {
		/// Failure reported by the credential source.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a credential source failure.
	pub fn fetch(src: impl Into<BoxError>) -> Self {
		Self::Fetch { source: src.into() }
	}

	/// Returns `true` when the error is the debounce throttle rather than a real failure.
	pub fn is_high_frequency(&self) -> bool {
		matches!(self, Self::HighFrequency { .. })
	}
}

/// Configuration failures raised while assembling the layer.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Refresh policy failed validation.
	#[error("Refresh policy is invalid.")]
	Policy(#[from] PolicyError),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn fetch_error_exposes_source() {
		let err = Error::fetch("issuer unreachable");

		assert!(!err.is_high_frequency());
		assert_eq!(err.to_string(), "Credential source failed to issue a credential.");

		let source =
			StdError::source(&err).expect("Fetch errors should expose the issuer failure.");

		assert_eq!(source.to_string(), "issuer unreachable");
	}

	#[test]
	fn policy_error_converts_through_config() {
		let err: Error = ConfigError::from(PolicyError::ZeroMaxTryTimes).into();

		assert!(matches!(err, Error::Config(ConfigError::Policy(PolicyError::ZeroMaxTryTimes))));
	}

	#[test]
	fn high_frequency_reports_window() {
		let err = Error::HighFrequency { min_interval: Duration::seconds(1) };

		assert!(err.is_high_frequency());
		assert!(err.to_string().contains("1s"));
	}
}

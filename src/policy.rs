//! Retry, debounce, and backoff limits fixed for the lifetime of a client.

// self
use crate::_prelude::*;

/// Errors raised while validating a [`RefreshPolicy`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum PolicyError {
	/// Operations must run at least once.
	#[error("The max_try_times value must be at least 1.")]
	ZeroMaxTryTimes,
	/// The debounce window cannot be negative.
	#[error("The min_fetch_interval value must not be negative.")]
	NegativeFetchInterval,
	/// The lower backoff bound must be positive.
	#[error("The backoff_min value must be positive.")]
	NonPositiveBackoffMin,
	/// The backoff bounds are inverted.
	#[error("The backoff_min value ({min}) exceeds backoff_max ({max}).")]
	InvertedBackoff {
		/// Configured lower bound.
		min: Duration,
		/// Configured upper bound.
		max: Duration,
	},
}

/// Limits applied by the fetcher and the retry decorator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPolicy {
	/// Upper bound on how many times an operation runs, first attempt included.
	pub max_try_times: u32,
	/// Minimum spacing between two real fetch attempts.
	pub min_fetch_interval: Duration,
	/// Lower clamp for the failure backoff.
	pub backoff_min: Duration,
	/// Upper clamp for the failure backoff.
	pub backoff_max: Duration,
}
impl RefreshPolicy {
	/// Default retry bound.
	pub const DEFAULT_MAX_TRY_TIMES: u32 = 3;
	/// Default debounce window.
	pub const DEFAULT_MIN_FETCH_INTERVAL: Duration = Duration::seconds(1);
	/// Default lower backoff clamp.
	pub const DEFAULT_BACKOFF_MIN: Duration = Duration::seconds(1);
	/// Default upper backoff clamp.
	pub const DEFAULT_BACKOFF_MAX: Duration = Duration::seconds(60);

	/// Returns a builder seeded with the defaults.
	pub fn builder() -> RefreshPolicyBuilder {
		RefreshPolicyBuilder::default()
	}

	/// Validates the policy invariants.
	pub fn validate(&self) -> Result<(), PolicyError> {
		if self.max_try_times == 0 {
			return Err(PolicyError::ZeroMaxTryTimes);
		}
		if self.min_fetch_interval.is_negative() {
			return Err(PolicyError::NegativeFetchInterval);
		}
		if !self.backoff_min.is_positive() {
			return Err(PolicyError::NonPositiveBackoffMin);
		}
		if self.backoff_min > self.backoff_max {
			return Err(PolicyError::InvertedBackoff {
				min: self.backoff_min,
				max: self.backoff_max,
			});
		}

		Ok(())
	}
}
impl Default for RefreshPolicy {
	fn default() -> Self {
		Self {
			max_try_times: Self::DEFAULT_MAX_TRY_TIMES,
			min_fetch_interval: Self::DEFAULT_MIN_FETCH_INTERVAL,
			backoff_min: Self::DEFAULT_BACKOFF_MIN,
			backoff_max: Self::DEFAULT_BACKOFF_MAX,
		}
	}
}

/// Builder for [`RefreshPolicy`] values.
#[derive(Debug, Default)]
pub struct RefreshPolicyBuilder {
	policy: RefreshPolicy,
}
impl RefreshPolicyBuilder {
	/// Sets the retry bound.
	pub fn max_try_times(mut self, times: u32) -> Self {
		self.policy.max_try_times = times;

		self
	}

	/// Sets the debounce window.
	pub fn min_fetch_interval(mut self, interval: Duration) -> Self {
		self.policy.min_fetch_interval = interval;

		self
	}

	/// Sets both backoff clamps.
	pub fn backoff(mut self, min: Duration, max: Duration) -> Self {
		self.policy.backoff_min = min;
		self.policy.backoff_max = max;

		self
	}

	/// Consumes the builder and validates the resulting policy.
	pub fn build(self) -> Result<RefreshPolicy, PolicyError> {
		self.policy.validate()?;

		Ok(self.policy)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let policy = RefreshPolicy::builder().build().expect("Default policy should validate.");

		assert_eq!(policy, RefreshPolicy::default());
		assert_eq!(policy.max_try_times, 3);
		assert_eq!(policy.min_fetch_interval, Duration::seconds(1));
		assert_eq!(policy.backoff_min, Duration::seconds(1));
		assert_eq!(policy.backoff_max, Duration::seconds(60));
	}

	#[test]
	fn builder_rejects_invalid_limits() {
		assert_eq!(
			RefreshPolicy::builder().max_try_times(0).build(),
			Err(PolicyError::ZeroMaxTryTimes)
		);
		assert_eq!(
			RefreshPolicy::builder().min_fetch_interval(Duration::seconds(-1)).build(),
			Err(PolicyError::NegativeFetchInterval)
		);
		assert_eq!(
			RefreshPolicy::builder().backoff(Duration::ZERO, Duration::seconds(1)).build(),
			Err(PolicyError::NonPositiveBackoffMin)
		);
		assert!(matches!(
			RefreshPolicy::builder().backoff(Duration::seconds(5), Duration::seconds(1)).build(),
			Err(PolicyError::InvertedBackoff { .. })
		));
	}

	#[test]
	fn zero_debounce_window_is_allowed() {
		let policy = RefreshPolicy::builder()
			.min_fetch_interval(Duration::ZERO)
			.build()
			.expect("A zero debounce window should validate.");

		assert!(policy.min_fetch_interval.is_zero());
	}

	#[test]
	fn policy_can_be_deserialized() {
		let payload = serde_json::to_string(&RefreshPolicy::default())
			.expect("RefreshPolicy should serialize to JSON.");
		let decoded: RefreshPolicy =
			serde_json::from_str(&payload).expect("Serialized policy should deserialize.");

		assert_eq!(decoded, RefreshPolicy::default());
	}
}

// self
use crate::obs::{FetchOutcome, RefreshTrigger};

/// Records a fetch outcome via the global metrics recorder (when enabled).
pub fn record_fetch_outcome(trigger: RefreshTrigger, outcome: FetchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sts_autorefresh_fetch_total",
			"trigger" => trigger.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (trigger, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_fetch_outcome_noop_without_metrics() {
		record_fetch_outcome(RefreshTrigger::Scheduled, FetchOutcome::Throttled);
	}
}

// self
use crate::{_prelude::*, obs::RefreshTrigger};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRefresh<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRefresh<F> = F;

/// A span builder used around fetch attempts.
#[derive(Clone, Debug)]
pub struct RefreshSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RefreshSpan {
	/// Creates a new span tagged with the provided trigger.
	pub fn new(trigger: RefreshTrigger) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("sts_autorefresh.refresh", trigger = trigger.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = trigger;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRefresh<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RefreshSpan::new(RefreshTrigger::Reactive);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}

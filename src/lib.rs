//! Keep short-lived STS credentials fresh behind any service client: a background refresh
//! scheduler, a debounced and backoff-protected fetch routine, and a retry decorator that
//! transparently re-runs operations rejected because the credential expired mid-flight.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod clock;
pub mod error;
pub mod layer;
pub mod obs;
pub mod policy;
pub mod refresh;
pub mod retry;
pub mod source;

pub use layer::{AutoRefreshClient, AutoRefreshClientBuilder};

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::{
			Arc,
			atomic::{AtomicBool, Ordering},
		},
		time::Duration as StdDuration,
	};

	pub use parking_lot::Mutex;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;

	pub use crate::error::{BoxError, Error, Result};
}

pub use tokio_util;
#[cfg(test)] use {color_eyre as _, serde_json as _, tracing_subscriber as _};

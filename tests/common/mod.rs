//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::{
		Arc,
		atomic::{AtomicU32, Ordering},
	},
};
// crates.io
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime, macros};
// self
use sts_autorefresh::{
	auth::Credential,
	client::{AuthVersion, ServiceClient},
	clock::{Clock, RuntimeClock},
	error::BoxError,
	policy::RefreshPolicy,
	source::{CredentialFuture, CredentialSource},
};

/// Wall-clock origin for every paused-time test.
pub const ORIGIN: OffsetDateTime = macros::datetime!(2025-11-10 12:00 UTC);

/// Policy without a debounce window so tests control every fetch explicitly.
pub fn eager_policy() -> RefreshPolicy {
	RefreshPolicy::builder()
		.min_fetch_interval(Duration::ZERO)
		.build()
		.expect("Eager test policy should validate.")
}

/// Service client that records every call made through the [`ServiceClient`] contract.
#[derive(Debug, Default)]
pub struct RecordingClient {
	pub credentials: Mutex<Vec<Credential>>,
	pub user_agent: Mutex<Option<String>>,
	pub retry_timeout: Mutex<Option<Duration>>,
	pub auth_version: Mutex<Option<AuthVersion>>,
	pub region: Mutex<Option<String>>,
}
impl RecordingClient {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn reset_count(&self) -> usize {
		self.credentials.lock().len()
	}

	pub fn last_access_key_id(&self) -> Option<String> {
		self.credentials.lock().last().map(|credential| credential.access_key_id.clone())
	}
}
impl ServiceClient for RecordingClient {
	fn reset_access_key_token(&self, credential: &Credential) {
		self.credentials.lock().push(credential.clone());
	}

	fn set_user_agent(&self, user_agent: &str) {
		*self.user_agent.lock() = Some(user_agent.to_owned());
	}

	fn set_retry_timeout(&self, timeout: Duration) {
		*self.retry_timeout.lock() = Some(timeout);
	}

	fn set_auth_version(&self, version: AuthVersion) {
		*self.auth_version.lock() = Some(version);
	}

	fn set_region(&self, region: &str) {
		*self.region.lock() = Some(region.to_owned());
	}
}

/// Credential source that replays a script of outcomes, then keeps issuing credentials.
///
/// Issued credentials expire `ttl` after the clock's current instant and carry the call number
/// in their access key identifier (`STS.1`, `STS.2`, ...).
#[derive(Debug)]
pub struct ScriptedSource {
	clock: RuntimeClock,
	ttl: Mutex<Duration>,
	script: Mutex<VecDeque<bool>>,
	fail_forever: bool,
	calls: AtomicU32,
}
impl ScriptedSource {
	pub fn new(clock: RuntimeClock, ttl: Duration) -> Arc<Self> {
		Arc::new(Self::build(clock, ttl, [], false))
	}

	pub fn with_script(
		clock: RuntimeClock,
		ttl: Duration,
		script: impl IntoIterator<Item = bool>,
	) -> Arc<Self> {
		Arc::new(Self::build(clock, ttl, script, false))
	}

	pub fn failing(clock: RuntimeClock) -> Arc<Self> {
		Arc::new(Self::build(clock, Duration::HOUR, [], true))
	}

	fn build(
		clock: RuntimeClock,
		ttl: Duration,
		script: impl IntoIterator<Item = bool>,
		fail_forever: bool,
	) -> Self {
		Self {
			clock,
			ttl: Mutex::new(ttl),
			script: Mutex::new(script.into_iter().collect()),
			fail_forever,
			calls: AtomicU32::new(0),
		}
	}

	pub fn calls(&self) -> u32 {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn set_ttl(&self, ttl: Duration) {
		*self.ttl.lock() = ttl;
	}
}
impl CredentialSource for ScriptedSource {
	fn fetch_credential(&self) -> CredentialFuture<'_> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
		let succeed = !self.fail_forever && self.script.lock().pop_front().unwrap_or(true);
		let expires_at = self.clock.now() + *self.ttl.lock();

		Box::pin(async move {
			if succeed {
				Ok(Credential::new(format!("STS.{call}"), "secret", "token", expires_at))
			} else {
				Err(BoxError::from(format!("issuer unavailable on call {call}")))
			}
		})
	}
}

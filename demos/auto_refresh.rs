//! Demonstrates wrapping a service client so its STS credential renews in the background and
//! expired-credential rejections are retried transparently.
//!
//! 1. Implement [`ServiceClient`] for the client being wrapped.
//! 2. Provide a [`CredentialSource`]; any `Fn() -> impl Future<Output = Result<Credential, _>>`
//!    closure qualifies.
//! 3. Build an [`AutoRefreshClient`] and route every remote call through
//!    [`AutoRefreshClient::invoke`].
//!
//! Run with `RUST_LOG=sts_autorefresh=debug` to watch the refresh cycle.

// std
use std::sync::{
	Arc,
	atomic::{AtomicU32, Ordering},
};
// crates.io
use color_eyre::Result;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use tracing_subscriber::EnvFilter;
// self
use sts_autorefresh::{
	AutoRefreshClient,
	auth::Credential,
	client::{AuthVersion, ServiceClient, ServiceError},
	error::BoxError,
	policy::RefreshPolicy,
};

/// Log service client that only accepts the most recently issued access key.
#[derive(Debug, Default)]
struct LogClient {
	access_key_id: Mutex<Option<String>>,
	accepted: Mutex<Option<String>>,
}
impl LogClient {
	async fn put_logs(&self, project: &str) -> Result<usize, ServiceError> {
		let current = self.access_key_id.lock().clone();
		let accepted = self.accepted.lock().clone();

		if current.is_none() || current != accepted {
			return Err(ServiceError::new(401, "Unauthorized", "The security token has expired."));
		}

		println!("Shipped logs to {project} with {}.", current.unwrap_or_default());

		Ok(42)
	}

	/// Simulates the remote side revoking every key issued so far.
	fn rotate_remote_key(&self, next: &str) {
		*self.accepted.lock() = Some(next.to_owned());
	}
}
impl ServiceClient for LogClient {
	fn reset_access_key_token(&self, credential: &Credential) {
		*self.access_key_id.lock() = Some(credential.access_key_id.clone());
	}

	fn set_user_agent(&self, _: &str) {}

	fn set_retry_timeout(&self, _: Duration) {}

	fn set_auth_version(&self, _: AuthVersion) {}

	fn set_region(&self, _: &str) {}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

	let issued = Arc::new(AtomicU32::new(0));
	let client = Arc::new(LogClient::default());
	let source = {
		let issued = issued.clone();
		let client = client.clone();

		move || {
			let serial = issued.fetch_add(1, Ordering::SeqCst) + 1;
			let access_key_id = format!("STS.demo-{serial}");

			// The issuer registers the new key with the service before handing it out.
			client.rotate_remote_key(&access_key_id);

			async move {
				Ok::<_, BoxError>(Credential::new(
					access_key_id,
					"demo-secret",
					"demo-security-token",
					OffsetDateTime::now_utc() + Duration::minutes(15),
				))
			}
		}
	};
	let policy = RefreshPolicy::builder().min_fetch_interval(Duration::ZERO).build()?;
	let auto = AutoRefreshClient::builder(client.clone(), Arc::new(source))
		.policy(policy)
		.spawn()
		.await?;

	auto.set_user_agent("sts-autorefresh-demo/0.1");

	let written = auto.invoke(|client| client.put_logs("demo-project")).await?;

	println!("First call wrote {written} entries.");

	// Revoke the key behind the client's back; the next call refreshes and retries once.
	client.rotate_remote_key("STS.revoked");

	let (result, report) =
		auto.invoke_with_report(|client| client.put_logs("demo-project")).await;

	println!(
		"Second call returned {:?} after {} attempt(s) and {} refresh(es).",
		result.map_err(|e| e.to_string()),
		report.attempts,
		report.refreshes
	);
	println!("Credentials issued: {}.", issued.load(Ordering::SeqCst));

	auto.shutdown().await;

	Ok(())
}

//! Classification of operation errors into credential rejections and everything else.

// self
use crate::_prelude::*;

/// Coarse classification applied to every failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
	/// The remote side rejected the credential; refresh and retry.
	AuthInvalid,
	/// Any other failure; returned to the caller as-is.
	Operation,
}

/// Implemented by operation error types so the retry decorator can tell credential
/// rejections apart from ordinary failures.
pub trait ClassifyError {
	/// Classifies the error.
	fn classify(&self) -> ErrorClass;

	/// Shorthand for `self.classify() == ErrorClass::AuthInvalid`.
	fn is_auth_invalid(&self) -> bool {
		matches!(self.classify(), ErrorClass::AuthInvalid)
	}
}
impl<E> ClassifyError for Box<E>
where
	E: ?Sized + ClassifyError,
{
	fn classify(&self) -> ErrorClass {
		(**self).classify()
	}
}

/// Error body returned by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("{code} (HTTP {http_code}): {message}")]
pub struct ServiceError {
	/// HTTP status code of the failed response.
	pub http_code: u16,
	/// Service-specific error code.
	pub code: String,
	/// Human-readable message.
	pub message: String,
	/// Request identifier echoed by the service, when present.
	pub request_id: Option<String>,
}
impl ServiceError {
	/// HTTP status the service uses for rejected or expired credentials.
	pub const UNAUTHORIZED: u16 = 401;

	/// Creates a new service error without a request identifier.
	pub fn new(http_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { http_code, code: code.into(), message: message.into(), request_id: None }
	}

	/// Attaches the request identifier echoed by the service.
	pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
		self.request_id = Some(request_id.into());

		self
	}
}
impl ClassifyError for ServiceError {
	fn classify(&self) -> ErrorClass {
		if self.http_code == Self::UNAUTHORIZED {
			ErrorClass::AuthInvalid
		} else {
			ErrorClass::Operation
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unauthorized_status_is_auth_invalid() {
		let expired = ServiceError::new(401, "SecurityTokenExpired", "token expired");
		let missing = ServiceError::new(404, "ProjectNotExist", "project does not exist")
			.with_request_id("5F0E2A");

		assert_eq!(expired.classify(), ErrorClass::AuthInvalid);
		assert!(expired.is_auth_invalid());
		assert_eq!(missing.classify(), ErrorClass::Operation);
		assert_eq!(missing.request_id.as_deref(), Some("5F0E2A"));
	}

	#[test]
	fn boxed_errors_delegate_classification() {
		let boxed = Box::new(ServiceError::new(401, "Unauthorized", "denied"));

		assert!(boxed.is_auth_invalid());
		assert_eq!(boxed.to_string(), "Unauthorized (HTTP 401): denied");
	}
}

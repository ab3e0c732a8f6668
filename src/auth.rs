//! Credential models issued by the credential source and pushed into the wrapped client.

pub mod credential;
pub mod secret;

pub use credential::*;
pub use secret::*;

//! API key allow-list for the gateway.
//!
//! The key store is the only mutable state shared across requests. The
//! core pipeline never touches it; only the auth middleware and the key
//! issuance route do.

pub mod keys;

pub use keys::KeyStore;

//! Shared types for the POS order core
//!
//! Data models, the result envelope, error kinds, and the auth context
//! passed in from the outer API layer. Everything here is plain data:
//! serde-serializable, no business logic beyond small invariant helpers.

pub mod auth;
pub mod envelope;
pub mod models;

// Re-exports
pub use auth::{AuthContext, AuthState};
pub use envelope::{Envelope, ErrorKind, ResponseType};
pub use serde::{Deserialize, Serialize};

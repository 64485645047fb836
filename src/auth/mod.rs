//! Sign-in state for PariVaani clients.
//!
//! ## Design
//! - Credentials and tokens are owned by the BaaS auth service
//! - Views never query auth directly; they receive an [`AuthSnapshot`]
//! - Changes are broadcast over a `tokio::sync::watch` channel

pub mod session;

pub use session::{AuthSnapshot, AuthState, SessionHandle};

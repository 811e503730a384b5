//! Session management module.
//!
//! This module provides types for managing gateway sessions: session
//! identification, the authentication state machine, the verified identity
//! attached on authentication, the concurrent session store, and the
//! background sweeper that expires idle sessions.

mod id;
mod identity;
mod state;
mod store;
mod sweeper;

pub use id::SessionId;
pub use identity::{Credential, Identity, Principal};
pub use state::SessionStatus;
pub use store::{Session, SessionStore, UNKNOWN_CLIENT};
pub use sweeper::spawn_sweeper;

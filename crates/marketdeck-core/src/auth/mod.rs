//! Session storage and navigation seams for the API client.
//!
//! This module provides:
//! - `SessionStore`: where the single live session token is kept
//!   (`MemorySessionStore`, `FileSessionStore`, `KeyringSessionStore`)
//! - `Navigator`: how the client sends the user back to the login entry
//!   point once the session has expired
//!
//! Both are injected into `ApiClient` so tests can substitute doubles.

pub mod keychain;
pub mod navigator;
pub mod session;

pub use keychain::KeyringSessionStore;
pub use navigator::{Navigator, NoopNavigator, LOGIN_ROUTE};
pub use session::{FileSessionStore, MemorySessionStore, SessionData, SessionStore};

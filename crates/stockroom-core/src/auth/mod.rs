//! Authentication module for managing session credentials.
//!
//! This module provides:
//! - `CredentialStore`: injectable key-value storage for the token pair,
//!   with keyring, file and in-memory backends
//! - `SessionEvent`: lifecycle notifications published by the API client
//!
//! The access token lives under `token` and the refresh token under
//! `refreshToken`. Both are written together and cleared together.

pub mod credentials;
pub mod session;

pub use credentials::{
    CredentialStore, Credentials, FileCredentialStore, KeyringCredentialStore,
    MemoryCredentialStore, REFRESH_TOKEN_KEY, TOKEN_KEY,
};
pub use session::{SessionEvent, SessionEvents, TerminationReason};

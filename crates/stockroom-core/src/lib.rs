//! Core library for the stockroom inventory console.
//!
//! This crate provides:
//! - `api`: the session-aware `ApiClient` with bearer injection and
//!   one-shot refresh-and-retry on authentication failure
//! - `auth`: credential stores and session lifecycle events
//! - `models`: wire types for every inventory resource
//! - `config`: persisted client configuration
//! - `utils`: pagination and display formatting helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiRequest};
pub use auth::{CredentialStore, SessionEvent, TerminationReason};
pub use config::Config;

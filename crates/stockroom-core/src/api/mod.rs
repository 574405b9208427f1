//! REST API client module for the inventory backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! inventory API: categories, stores, products, stock movements,
//! quotations, purchases, akuns, users, dashboard and reports.
//!
//! Every call carries the stored access token as a bearer token. An
//! expired access token is renewed once through the refresh endpoint
//! and the original call is replayed transparently.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod request;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
pub use request::{ApiRequest, Attempt};

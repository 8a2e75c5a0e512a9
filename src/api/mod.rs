//! REST API access
//!
//! `ApiClient` owns the HTTP connection pool and request signing;
//! `ResourceClient` maps the four CRUD operations of one entity onto its
//! endpoints.

pub mod client;
pub mod errors;
pub mod resource;

pub use client::{ApiClient, BearerTokenSigner, RequestSigner, StaticTokenSigner};
pub use errors::ApiError;
pub use resource::{Resource, ResourceClient};

//! Networking for the remote admin API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` owns the HTTP transport and the request-authorization hook,
//! `api` the identity endpoints, and `types` the shared wire schema.

pub mod api;
pub mod client;
pub mod types;

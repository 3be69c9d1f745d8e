//! Client-side session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` is the in-memory session, `token_store` the durable credential
//! slots that outlive the process.

pub mod auth;
pub mod token_store;

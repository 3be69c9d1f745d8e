//! Client-side session core and record services for the bounty desk API.
//!
//! `session` owns authentication state, `routes` gates navigation on it, and
//! `services` wrap the bounty, tip and summary endpoints. `app` wires them
//! together over a single bearer-authorized HTTP client.

pub mod app;
pub mod config;
pub mod net;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

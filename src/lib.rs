//! Authgate server library.
//!
//! Exposes the building blocks (config, state, error handling, the auth
//! module and router assembly) so integration tests and the binary
//! entrypoint can both access them.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;

//! Vacance Admin library.
//!
//! The JSON API behind the travel-content dashboard, as a library so the binary,
//! the CLI and the integration tests share one implementation.
//!
//! # Security
//!
//! Every `/api` route except login requires a session. Handlers then ask the
//! permission guard about the menu and action they touch; nothing is enforced by
//! the client alone.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

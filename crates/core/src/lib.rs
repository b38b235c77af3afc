//! Vacance Core - Shared types library.
//!
//! This crate provides the types and pure logic used across all Vacance Admin components:
//! - `admin` - JSON API server for the content dashboard
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database access,
//! no HTTP clients. Anything that decides *who may do what* or *which library object a page
//! links to* lives here so it can be tested with plain fixtures.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, statuses and prices
//! - [`rbac`] - Permission matrix, menu registry, authorization guard, super-role rule
//! - [`library`] - Content-library types and the 0/1/many reference resolution

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod library;
pub mod rbac;
pub mod types;

pub use types::*;

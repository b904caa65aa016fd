//! Campaign Dashboard Core - Shared domain types.
//!
//! This crate provides the validated types used across the dashboard
//! components:
//! - `dashboard` - Web server (auth, suggestions, pages)
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Anything that needs a network or a clock lives in
//! the `dashboard` crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for usernames and emails, and the
//!   campaign suggestion contract

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

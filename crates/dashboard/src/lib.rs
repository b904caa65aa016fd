//! Campaign dashboard library.
//!
//! Accounts with Argon2 password hashes, stateless signed session cookies, and
//! an endpoint that asks a generative-text model for an ad-campaign suggestion
//! and normalizes its free-text JSON reply.
//!
//! The crate is a library so the router can be driven in tests without a
//! database or network; the binary in `main.rs` wires the production pieces.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod gemini;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `auth` - Signup, password login and session tokens
//! - `suggestion` - Prompt, provider call and output normalization for
//!   campaign suggestions

pub mod auth;
pub mod suggestion;

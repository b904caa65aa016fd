//! Core types for the campaign dashboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod suggestion;
pub mod username;

pub use email::{Email, EmailError};
pub use suggestion::CampaignSuggestion;
pub use username::{Username, UsernameError};

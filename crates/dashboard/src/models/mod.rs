//! Domain models for the dashboard.

pub mod user;

pub use user::{NewUser, User};

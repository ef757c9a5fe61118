//! HTTP handlers.

pub mod analyses;
pub mod health;

pub use health::{health, ready};

//! External service integrations.

pub mod http;
pub mod picker;

//! Utility modules.

pub mod web;

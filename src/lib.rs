//! Open Directory Catalog Library
//!
//! Crawls open directory indexes and groups the media files found there by
//! episode, with resolution variants and subtitles attached.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Error, Result};

//! Core business logic modules.

pub mod aggregator;
pub mod canonical;
pub mod catalog;
pub mod crawler;
pub mod links;
pub mod parser;

//! # ctrack Common Library
//!
//! Shared code for the curriculum tracker services:
//! - Error and result types
//! - Configuration loading and root folder resolution
//! - Database initialization and row models

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};

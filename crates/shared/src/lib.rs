//! Shared configuration and response codes for yourtext.
//!
//! This crate provides what the API layer, the core relay and the server
//! binary all need to agree on:
//! - Layered application configuration
//! - Application-level response codes carried in every JSON envelope

pub mod config;
pub mod error;

pub use config::{AppConfig, LogFormat, ServerConfig, StorageConfig, StorageProvider};
pub use error::ResponseCode;

//! Core logic for yourtext.
//!
//! This crate contains the addressing and storage flow with ZERO web
//! dependencies. The api crate maps its results onto HTTP.
//!
//! # Modules
//!
//! - `address` - Date-prefixed random storage keys
//! - `bootstrap` - First-run bucket provisioning
//! - `relay` - Upload and download flows
//! - `storage` - Object store capability and backends

pub mod address;
pub mod bootstrap;
pub mod relay;
pub mod storage;

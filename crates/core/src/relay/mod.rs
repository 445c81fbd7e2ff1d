//! Text relay: the upload and download flows.
//!
//! This module provides the storage flow behind both endpoints:
//! - Upload validation, addressing and write
//! - Retrieval URL construction
//! - Key lookup, metadata fetch and streamed download

mod error;
mod service;
mod types;

pub use error::RelayError;
pub use service::TextRelay;
pub use types::{Download, RelayConfig, TEXT_CONTENT_TYPE, UploadReceipt};

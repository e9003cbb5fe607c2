//! Crowdin-facing clients.
//!
//! - `metadata`: width constraints per string, read from the string metadata endpoint
//! - `api`: Crowdin REST v2 calls made on behalf of an organization
//! - `fields`: field precedence rules for constraint metadata

mod api;
pub mod fields;
mod metadata;

pub use api::CrowdinApi;
pub use metadata::{ProjectStrings, StringMetadataClient};

use thiserror::Error;

/// Why a per-string metadata lookup produced no answer.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("metadata endpoint returned status {status}")]
    Status { status: u16 },

    #[error("invalid metadata payload: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum CrowdinError {
    #[error("String not found: {string_id}")]
    StringNotFound { string_id: u64 },

    #[error("Crowdin API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Crowdin API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid Crowdin API response: {0}")]
    Decode(String),
}

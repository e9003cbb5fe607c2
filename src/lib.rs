//! Crowdin app that checks rendered translation width against per-string limits.

pub mod auth;
pub mod config;
pub mod crowdin;
pub mod directory;
pub mod error;
pub mod lookup;
pub mod manifest;
pub mod measurement;
pub mod qa;
pub mod server;

//! Shared configuration for Trellis.
//!
//! This crate provides the configuration types used by the database
//! layer and the binaries.

pub mod config;

pub use config::AppConfig;

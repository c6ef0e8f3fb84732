//! Infrastructure layer.
//!
//! Provides technical concerns that support the adapter without containing
//! exchange logic.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading, validation and logging setup

pub mod config;

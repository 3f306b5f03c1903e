//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod sanitize;
pub mod status;
pub mod sync;
pub mod validate;

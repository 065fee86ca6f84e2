//! CLI command implementations.

pub mod common;
pub mod repetition;
pub mod teleport;
pub mod version;

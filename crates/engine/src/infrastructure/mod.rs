//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod chat;
pub mod config;
pub mod dice_roller;
pub mod json_source;
pub mod labels;
pub mod ports;
pub mod random;

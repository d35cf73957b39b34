//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Deterministic short code generation and alias validation
//! - [`db_error`] - Helpers for classifying database errors

pub mod code_generator;
pub mod db_error;

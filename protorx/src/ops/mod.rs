//! Core operations.
//!
//! This module contains the business logic behind the command line,
//! separated from argument parsing and output rendering.

pub mod generate;

pub use generate::{GenerateOptions, generate};

//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod analyze;
pub mod grid;
pub mod maps;
pub mod range;
pub mod run;

//! CLI command implementations.

pub mod cards;
pub mod logs;

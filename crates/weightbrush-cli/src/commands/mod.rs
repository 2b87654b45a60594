//! CLI command implementations.

pub mod apply;
pub mod check;
pub mod common;
pub mod mirror;
pub mod settings;
pub mod smooth;

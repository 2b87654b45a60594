//! Weightbrush Mirror - left/right driver correspondence from naming tokens
//!
//! Rigs name bilateral drivers by convention (`arm_L_01` / `arm_R_01`,
//! `Left_hand` / `Right_hand`). This crate turns a pair of token lists into
//! a [`weightbrush_core::MirrorMap`] over a driver name list.
//!
//! # Core Abstractions
//!
//! - [`MirrorResolver`] - Compiled token pairs, resolves name lists
//! - [`resolve_mirror`] - One-call resolution
//! - [`MirrorError`] - Token count and pattern errors
//!
//! # Token Syntax
//!
//! Tokens are whitespace separated; the i-th left token pairs with the i-th
//! right token. `*` marks an open end: `*_L_*` matches anywhere, `L_*` only
//! at the start of a name, `*_l` only at the end. A leading or trailing `.`
//! also leaves that end open.
//!
//! # Example
//!
//! ```rust
//! use weightbrush_mirror::resolve_mirror;
//!
//! let names = ["spine", "leg_L_hip", "leg_R_hip"];
//! let map = resolve_mirror(&names, "*_L_*", "*_R_*").unwrap();
//! assert_eq!(map.pairs(), vec![(1, 2)]);
//! ```

mod error;
pub mod pattern;
mod resolver;

pub use error::MirrorError;
pub use resolver::{DEFAULT_LEFT, DEFAULT_RIGHT, MirrorResolver, resolve_mirror};

//! Weightbrush Core - weight-matrix edit engine for skin and deformer weights
//!
//! This crate turns a weight matrix (elements × drivers), a set of locks and a
//! selection into a new matrix whose rows still sum to their budget. It knows
//! nothing about any host application: hosts gather a matrix, call the engine,
//! and commit the result.
//!
//! # Core Abstractions
//!
//! ## Data
//!
//! - [`WeightMatrix`] - Row-major `f64` matrix with cached row sums
//! - [`LockState`] - Row and column lock flags
//! - [`SelectionRegion`] / [`Chunk`] - Rectangular selection, hidden columns, soft weights
//! - [`SoftOrder`] - Soft-selection row permutation and its inverse
//! - [`MirrorMap`] / [`IndexMap`] - Driver mirror table and dense/sparse index tables
//!
//! ## Editing
//!
//! - [`EditOperation`] - Absolute, Add, AddPercent, Average, Smooth, Prune, Normalize, ReassignLocally
//! - [`RedistributionEngine`] - The shared redistribution procedure
//! - [`redistribute`] / [`smooth`] - One-call entry points
//! - [`EditMasks`] - Selected/remaining masks and row budgets
//! - [`AdjacencyGraph`] - Neighbor lists for smoothing
//!
//! ## Host Integration
//!
//! - [`Driver`] / [`DriverSet`] - Capability interface over host weight channels
//! - [`EditSession`] - Matrix snapshot, locks, tables and undo/redo history
//! - [`paste_nearest`] / [`local_split`] - Rest-position tools
//! - [`check_invariants`] / [`max_drift`] - Result validation
//!
//! # no_std Support
//!
//! The crate is `no_std` + `alloc` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! weightbrush-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to get `debug` events from the engine and session.
//!
//! # Example
//!
//! ```rust
//! use weightbrush_core::{Chunk, EditOperation, LockState, SelectionRegion, WeightMatrix, redistribute};
//!
//! let m = WeightMatrix::from_rows(vec![vec![0.5, 0.5, 0.0]]).unwrap();
//! let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 2, 2));
//! let out = redistribute(&m, &LockState::unlocked(1, 3), &sel, EditOperation::Absolute(0.4)).unwrap();
//! assert!((out.get(0, 0) - 0.3).abs() < 1e-12);
//! assert!((out.row_sum(0) - 1.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod adjacency;
pub mod driver;
pub mod engine;
pub mod error;
pub mod lock;
pub mod masks;
pub mod matrix;
pub mod mirror_map;
pub mod operation;
pub mod selection;
pub mod session;
pub mod spatial;
pub mod validate;

pub use adjacency::{AdjacencyGraph, PaddedNeighbors};
pub use driver::{ChannelDriver, Driver, DriverKind, DriverSet};
pub use engine::{RESCALE_EPSILON, RedistributionEngine, redistribute, smooth};
pub use error::EditError;
pub use lock::LockState;
pub use masks::{EditMasks, MaskMode};
pub use matrix::WeightMatrix;
pub use mirror_map::{IndexMap, MirrorMap};
pub use operation::{EditOperation, MassPolicy, SmoothParams};
pub use selection::{Chunk, SelectionRegion, SoftOrder};
pub use session::{DEFAULT_UNDO_LIMIT, EditSession};
pub use spatial::{LocalSplit, Point, RestPositions, distance, local_split, nearest, paste_nearest};
pub use validate::{
    DEFAULT_TOLERANCE, InvariantViolation, check_invariants, max_drift, row_drift,
};

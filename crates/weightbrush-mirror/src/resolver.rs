//! Builds a [`MirrorMap`] from driver names.

use std::collections::HashMap;

use weightbrush_core::{IndexMap, MirrorMap};

use crate::error::MirrorError;
use crate::pattern::{TokenPair, compile_pairs};

/// Default left-side token list.
pub const DEFAULT_LEFT: &str = "*_L_*";
/// Default right-side token list.
pub const DEFAULT_RIGHT: &str = "*_R_*";

/// Left/right naming convention compiled once, applied to any driver list.
///
/// # Example
///
/// ```rust
/// use weightbrush_mirror::MirrorResolver;
///
/// let resolver = MirrorResolver::new("*_L_* *_l", "*_R_* *_r").unwrap();
/// let map = resolver.resolve(&["spine", "arm_L_01", "arm_R_01", "toe_l", "toe_r"]);
/// assert_eq!(map.mirror(1), 2);
/// assert_eq!(map.mirror(3), 4);
/// assert_eq!(map.mirror(0), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MirrorResolver {
    pairs: Vec<TokenPair>,
}

impl MirrorResolver {
    /// Compiles whitespace separated token lists.
    ///
    /// # Errors
    ///
    /// [`MirrorError::TokenCountMismatch`] when the lists differ in length,
    /// [`MirrorError::InvalidPattern`] when a token is not a valid pattern.
    pub fn new(left: &str, right: &str) -> Result<Self, MirrorError> {
        Ok(Self {
            pairs: compile_pairs(left, right)?,
        })
    }

    /// Number of token pairs.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Counterpart of each driver, in input order.
    ///
    /// For every driver not yet paired, token pairs are tried in order, each
    /// forward then backward. The first rewritten name that differs from the
    /// original and belongs to another, still unpaired driver wins. Drivers with no match mirror to
    /// themselves. Repeated names resolve to their first occurrence.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> MirrorMap {
        let mut lookup: HashMap<&str, usize> = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            lookup.entry(name.as_ref()).or_insert(i);
        }

        let mut map = MirrorMap::identity(names.len());
        for (driver, name) in names.iter().enumerate() {
            if map.is_paired(driver) {
                continue;
            }
            let name = name.as_ref();
            let found = self
                .pairs
                .iter()
                .flat_map(|pair| pair.candidates(name))
                .filter(|candidate| candidate != name)
                .filter_map(|candidate| lookup.get(candidate.as_str()).copied())
                .find(|&other| other != driver && !map.is_paired(other));

            if let Some(other) = found {
                map.pair(driver, other);
                tracing::debug!(
                    left = name,
                    right = names[other].as_ref(),
                    "mirror: paired drivers"
                );
            }
        }

        tracing::debug!(
            drivers = names.len(),
            pairs = map.pairs().len(),
            "mirror: resolved table"
        );
        map
    }

    /// Host-indexed table: `table[sparse]` is the sparse index of the mirror,
    /// `None` for logical slots without a driver.
    pub fn resolve_sparse<S: AsRef<str>>(&self, names: &[S], index: &IndexMap) -> Vec<Option<usize>> {
        self.resolve(names).to_sparse(index)
    }
}

/// One-call resolution: compile the tokens and resolve `names`.
///
/// # Errors
///
/// See [`MirrorResolver::new`].
pub fn resolve_mirror<S: AsRef<str>>(
    names: &[S],
    left: &str,
    right: &str,
) -> Result<MirrorMap, MirrorError> {
    Ok(MirrorResolver::new(left, right)?.resolve(names))
}

//! Element adjacency for smoothing.
//!
//! Neighbor lists are stored sorted and deduplicated per element. The padded
//! table used by the smoothing kernel is built lazily on first access and
//! dropped whenever a list changes.

use core::cell::OnceCell;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::EditError;

/// Fixed-width neighbor table.
///
/// Row `e` occupies `indices[e * width..(e + 1) * width]`. Slots past the
/// element's degree hold `e` itself and are flagged invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedNeighbors {
    /// Slots per element (the maximum degree).
    pub width: usize,
    /// Neighbor indices, padded with the element's own index.
    pub indices: Vec<usize>,
    /// `true` for real neighbors, `false` for padding.
    pub valid: Vec<bool>,
}

impl PaddedNeighbors {
    /// Slots of one element as `(index, valid)` pairs.
    pub fn slots(&self, element: usize) -> impl Iterator<Item = (usize, bool)> + '_ {
        let start = element * self.width;
        self.indices[start..start + self.width]
            .iter()
            .copied()
            .zip(self.valid[start..start + self.width].iter().copied())
    }
}

/// Static per-element neighbor lists.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<usize>>,
    padded: OnceCell<PaddedNeighbors>,
}

impl AdjacencyGraph {
    /// Builds a graph from raw lists.
    ///
    /// Self references and duplicates are dropped.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] if a neighbor index is not an element.
    pub fn new(lists: Vec<Vec<usize>>) -> Result<Self, EditError> {
        let count = lists.len();
        let mut neighbors = Vec::with_capacity(count);
        for (element, list) in lists.into_iter().enumerate() {
            neighbors.push(clean_list(element, list, count)?);
        }
        Ok(Self {
            neighbors,
            padded: OnceCell::new(),
        })
    }

    /// Graph with `count` isolated elements.
    pub fn isolated(count: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); count],
            padded: OnceCell::new(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` for a graph without elements.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of `element`, ascending. Empty for out-of-range elements.
    pub fn neighbors(&self, element: usize) -> &[usize] {
        self.neighbors.get(element).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of neighbors of `element`.
    pub fn degree(&self, element: usize) -> usize {
        self.neighbors(element).len()
    }

    /// Largest degree over all elements.
    pub fn max_neighbors(&self) -> usize {
        self.neighbors.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Replaces the list of one element and drops the padded table.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] if `element` or a neighbor is out of range.
    pub fn set_neighbors(&mut self, element: usize, list: Vec<usize>) -> Result<(), EditError> {
        let count = self.neighbors.len();
        if element >= count {
            return Err(EditError::shape("adjacency element", count, element));
        }
        self.neighbors[element] = clean_list(element, list, count)?;
        self.padded.take();
        Ok(())
    }

    /// Padded neighbor table, built on first use.
    pub fn padded(&self) -> &PaddedNeighbors {
        self.padded.get_or_init(|| {
            let width = self.max_neighbors();
            let mut indices = Vec::with_capacity(self.len() * width);
            let mut valid = Vec::with_capacity(self.len() * width);
            for (element, list) in self.neighbors.iter().enumerate() {
                for slot in 0..width {
                    match list.get(slot) {
                        Some(&n) => {
                            indices.push(n);
                            valid.push(true);
                        }
                        None => {
                            indices.push(element);
                            valid.push(false);
                        }
                    }
                }
            }
            PaddedNeighbors {
                width,
                indices,
                valid,
            }
        })
    }

    /// Expands every list to the elements reachable within `depth` hops.
    ///
    /// `depth <= 1` returns an unchanged copy.
    pub fn with_depth(&self, depth: usize) -> Self {
        if depth <= 1 {
            return Self {
                neighbors: self.neighbors.clone(),
                padded: OnceCell::new(),
            };
        }
        let count = self.len();
        let mut expanded = Vec::with_capacity(count);
        let mut seen = vec![usize::MAX; count];
        for element in 0..count {
            seen[element] = element;
            let mut ring = vec![element];
            let mut reached = Vec::new();
            for _ in 0..depth {
                let mut next = Vec::new();
                for &e in &ring {
                    for &n in self.neighbors(e) {
                        if seen[n] != element {
                            seen[n] = element;
                            next.push(n);
                        }
                    }
                }
                if next.is_empty() {
                    break;
                }
                reached.extend_from_slice(&next);
                ring = next;
            }
            reached.sort_unstable();
            expanded.push(reached);
        }
        Self {
            neighbors: expanded,
            padded: OnceCell::new(),
        }
    }
}

impl PartialEq for AdjacencyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.neighbors == other.neighbors
    }
}

fn clean_list(element: usize, mut list: Vec<usize>, count: usize) -> Result<Vec<usize>, EditError> {
    if let Some(&bad) = list.iter().find(|&&n| n >= count) {
        return Err(EditError::shape("adjacency neighbor", count, bad));
    }
    list.retain(|&n| n != element);
    list.sort_unstable();
    list.dedup();
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> AdjacencyGraph {
        let lists = (0..n)
            .map(|i| {
                let mut l = Vec::new();
                if i > 0 {
                    l.push(i - 1);
                }
                if i + 1 < n {
                    l.push(i + 1);
                }
                l
            })
            .collect();
        AdjacencyGraph::new(lists).unwrap()
    }

    #[test]
    fn new_cleans_lists() {
        let g = AdjacencyGraph::new(vec![vec![1, 1, 0, 2], vec![0], vec![]]).unwrap();
        assert_eq!(g.neighbors(0), &[1, 2]);
        assert_eq!(g.degree(2), 0);
        assert_eq!(g.max_neighbors(), 2);
        assert!(g.neighbors(7).is_empty());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(matches!(
            AdjacencyGraph::new(vec![vec![3], vec![]]),
            Err(EditError::ShapeMismatch { found: 3, .. })
        ));
    }

    #[test]
    fn padded_table_pads_with_self() {
        let g = chain(3);
        let padded = g.padded();
        assert_eq!(padded.width, 2);
        assert_eq!(padded.indices, vec![1, 0, 0, 2, 1, 2]);
        assert_eq!(padded.valid, vec![true, false, true, true, true, false]);
        assert_eq!(padded.slots(2).collect::<Vec<_>>(), vec![(1, true), (2, false)]);
    }

    #[test]
    fn set_neighbors_invalidates_padding() {
        let mut g = chain(3);
        assert_eq!(g.padded().width, 2);
        g.set_neighbors(0, vec![1, 2]).unwrap();
        g.set_neighbors(1, vec![0, 2]).unwrap();
        g.set_neighbors(2, vec![]).unwrap();
        assert_eq!(g.padded().width, 2);
        assert_eq!(g.padded().valid[4..6], [false, false]);
        assert!(g.set_neighbors(5, vec![]).is_err());
    }

    #[test]
    fn with_depth_expands_rings() {
        let g = chain(5).with_depth(2);
        assert_eq!(g.neighbors(0), &[1, 2]);
        assert_eq!(g.neighbors(2), &[0, 1, 3, 4]);
        assert_eq!(chain(5).with_depth(1), chain(5));
    }
}

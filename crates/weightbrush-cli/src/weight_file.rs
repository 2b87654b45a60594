//! JSON weight file: drivers, per-element weights and optional mesh data.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use weightbrush_core::{
    AdjacencyGraph, ChannelDriver, Driver, DriverKind, DriverSet, IndexMap, LockState, Point,
    RestPositions, WeightMatrix,
};

/// Weight file format.
///
/// ```json
/// {
///   "drivers": [
///     { "name": "spine" },
///     { "name": "arm_L_01", "locked": true },
///     { "name": "smile", "kind": "blend_shape" }
///   ],
///   "weights": [[1.0, 0.0, 0.2], [0.5, 0.5, 0.0]],
///   "locked_rows": [1],
///   "adjacency": [[1], [0]],
///   "positions": { "elements": [[0, 0, 0], [1, 0, 0]], "drivers": [[0, 0, 0], [1, 0, 0], [2, 0, 0]] },
///   "soft_weights": [1.0, 0.5],
///   "sparse_indices": [0, 1, 3]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightFile {
    /// Matrix columns.
    pub drivers: Vec<DriverEntry>,

    /// Matrix rows, one per element.
    pub weights: Vec<Vec<f64>>,

    /// Elements that must not change.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locked_rows: Vec<usize>,

    /// Neighbor lists per element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacency: Option<Vec<Vec<usize>>>,

    /// Rest positions for reassign and paste.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Positions>,

    /// Soft-selection strength per element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_weights: Option<Vec<f64>>,

    /// Host index of each driver when the host numbering has holes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_indices: Option<Vec<usize>>,
}

/// One driver column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverEntry {
    /// Display name.
    pub name: String,

    /// What the values represent.
    #[serde(default)]
    pub kind: KindTag,

    /// Column lock.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
}

/// Serialized driver kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    /// Skin influence.
    #[default]
    Skin,
    /// Blend-shape channel.
    BlendShape,
    /// Generic attribute.
    Attribute,
}

impl From<KindTag> for DriverKind {
    fn from(tag: KindTag) -> Self {
        match tag {
            KindTag::Skin => DriverKind::SkinInfluence,
            KindTag::BlendShape => DriverKind::BlendShapeChannel,
            KindTag::Attribute => DriverKind::Attribute,
        }
    }
}

/// Element and driver rest positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Positions {
    /// One point per element.
    pub elements: Vec<Point>,
    /// One point per driver.
    pub drivers: Vec<Point>,
}

impl WeightFile {
    /// Load and shape-check a weight file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read weight file '{}'", path.display()))?;
        let file: WeightFile = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse weight file '{}'", path.display()))?;
        file.check()?;
        Ok(file)
    }

    /// Write the file as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write weight file '{}'", path.display()))
    }

    fn check(&self) -> anyhow::Result<()> {
        let cols = self.drivers.len();
        if let Some((i, row)) = self.weights.iter().enumerate().find(|(_, r)| r.len() != cols) {
            bail!("row {i} has {} values, expected {cols}", row.len());
        }
        if let Some(&bad) = self.locked_rows.iter().find(|&&r| r >= self.weights.len()) {
            bail!("locked row {bad} out of range");
        }
        Ok(())
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.weights.len()
    }

    /// Driver names in column order.
    pub fn names(&self) -> Vec<String> {
        self.drivers.iter().map(|d| d.name.clone()).collect()
    }

    /// Build an in-memory driver set, one channel per column.
    pub fn driver_set(&self) -> DriverSet {
        let drivers = self
            .drivers
            .iter()
            .enumerate()
            .map(|(col, entry)| {
                let values = self.weights.iter().map(|row| row[col]).collect();
                ChannelDriver::new(entry.name.clone(), entry.kind.into(), values).locked(entry.locked)
            })
            .collect();
        DriverSet::new(drivers)
    }

    /// Copy driver values back into the weight rows.
    pub fn store(&mut self, set: &DriverSet) {
        for (col, driver) in set.drivers().iter().enumerate() {
            for (row, weights) in self.weights.iter_mut().enumerate() {
                weights[col] = driver.get(row);
            }
        }
    }

    /// Column locks from the drivers plus the file's row locks.
    pub fn locks(&self, set: &DriverSet) -> LockState {
        let mut locks = set.lock_state(self.element_count());
        locks.set_rows_locked(&self.locked_rows, true);
        locks
    }

    /// Neighbor graph, if the file has one.
    pub fn adjacency(&self) -> anyhow::Result<Option<AdjacencyGraph>> {
        self.adjacency
            .clone()
            .map(AdjacencyGraph::new)
            .transpose()
            .context("invalid adjacency")
    }

    /// Rest positions, if the file has them.
    pub fn rest_positions(&self) -> Option<RestPositions> {
        self.positions
            .as_ref()
            .map(|p| RestPositions::new(p.elements.clone(), p.drivers.clone()))
    }

    /// Dense/sparse driver tables, if the file has sparse indices.
    pub fn index_map(&self) -> anyhow::Result<Option<IndexMap>> {
        self.sparse_indices
            .clone()
            .map(IndexMap::from_sparse)
            .transpose()
            .context("invalid sparse indices")
    }

    /// Current weights as a matrix.
    pub fn matrix(&self) -> anyhow::Result<WeightMatrix> {
        Ok(WeightMatrix::from_rows(self.weights.clone())?)
    }
}

//! Bounded persistent feature model.
//!
//! The model is a fixed-capacity ring buffer of [`ModelEntry`] values plus
//! a k-d tree over entry positions for nearest-neighbor queries. Once the
//! buffer is full, each insert overwrites the entry written longest ago,
//! independent of feature quality.
//!
//! The spatial index is rebuilt eagerly after every batch commit and
//! lazily before the first query following a raw mutation. With bounded
//! model sizes a full rebuild is cheap and avoids the correctness risks
//! of incremental k-d tree maintenance.

pub mod persistence;

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Vector3;

use crate::core::types::{FeatureObservation, ModelEntry};
use crate::error::{OdomError, Result};

/// Read-only copy of the model contents for external rendering.
#[derive(Debug, Clone)]
pub struct ModelSnapshot {
    /// Entry positions in the fixed frame.
    pub means: Vec<[f32; 3]>,
    /// Row-major 3×3 covariances, present when requested.
    pub covariances: Option<Vec<[f32; 9]>>,
}

/// Fixed-capacity feature store with ring-buffer eviction.
pub struct FeatureModel {
    capacity: usize,
    entries: Vec<ModelEntry>,
    /// Next overwrite position once the buffer is full.
    write_idx: usize,
    tree: KdTree<f32, 3>,
    index_dirty: bool,
}

impl FeatureModel {
    /// Create an empty model with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "model capacity must be positive");
        Self {
            capacity,
            entries: Vec::new(),
            write_idx: 0,
            tree: KdTree::new(),
            index_dirty: false,
        }
    }

    /// Current logical size.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the model holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current ring-buffer write cursor.
    #[inline]
    pub fn write_idx(&self) -> usize {
        self.write_idx
    }

    /// All entries in storage order.
    #[inline]
    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    /// Entry at a given storage index.
    #[inline]
    pub fn entry(&self, idx: usize) -> &ModelEntry {
        &self.entries[idx]
    }

    /// Overwrite the entry at a given storage index.
    pub fn set_entry(&mut self, idx: usize, entry: ModelEntry) {
        self.entries[idx] = entry;
        self.index_dirty = true;
    }

    /// Bootstrap the model from the first frame's observations.
    ///
    /// Clears any existing contents; each observation becomes one entry.
    /// The write cursor resets to 0, so the first eviction after the
    /// buffer fills lands on the oldest entry.
    pub fn initialize(&mut self, observations: &[FeatureObservation]) -> Result<()> {
        if observations.is_empty() {
            return Err(OdomError::InsufficientData);
        }
        self.entries.clear();
        self.write_idx = 0;
        for obs in observations {
            self.push_entry(ModelEntry::from(obs));
        }
        self.rebuild_index();
        Ok(())
    }

    /// Insert an entry, evicting the oldest one when at capacity.
    ///
    /// Always succeeds; the evicted entry's history is discarded.
    pub fn insert(&mut self, entry: ModelEntry) {
        self.push_entry(entry);
        self.index_dirty = true;
    }

    fn push_entry(&mut self, entry: ModelEntry) {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
        } else {
            self.entries[self.write_idx] = entry;
            self.write_idx = (self.write_idx + 1) % self.capacity;
        }
    }

    /// Apply one frame's mutations as a single batch.
    ///
    /// Fusion results replace existing entries in place, then unmatched
    /// observations are inserted with ring eviction. The index is rebuilt
    /// once at the end, so no query ever observes a half-updated store.
    pub fn commit(&mut self, fusions: Vec<(usize, ModelEntry)>, inserts: Vec<ModelEntry>) {
        for (idx, entry) in fusions {
            self.entries[idx] = entry;
        }
        for entry in inserts {
            self.push_entry(entry);
        }
        self.rebuild_index();
    }

    /// Nearest entry to `point` by Euclidean distance.
    ///
    /// Returns `(storage index, squared distance)`, or `None` on an empty
    /// model.
    pub fn query_nearest(&mut self, point: &Vector3<f32>) -> Option<(usize, f32)> {
        if self.entries.is_empty() {
            return None;
        }
        self.ensure_index();
        let nearest = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[point.x, point.y, point.z]);
        Some((nearest.item as usize, nearest.distance))
    }

    /// Up to `k` nearest entries to `point`, ascending by distance.
    ///
    /// Returns fewer than `k` pairs when the model is smaller than `k`.
    pub fn query_k_nearest(&mut self, point: &Vector3<f32>, k: usize) -> Vec<(usize, f32)> {
        if self.entries.is_empty() || k == 0 {
            return Vec::new();
        }
        self.ensure_index();
        self.tree
            .nearest_n::<SquaredEuclidean>(&[point.x, point.y, point.z], k)
            .into_iter()
            .map(|n| (n.item as usize, n.distance))
            .collect()
    }

    /// Read-only copy of the model for visualization.
    pub fn snapshot(&self, include_covariances: bool) -> ModelSnapshot {
        let means = self
            .entries
            .iter()
            .map(|e| [e.mean.x, e.mean.y, e.mean.z])
            .collect();
        let covariances = include_covariances.then(|| {
            self.entries
                .iter()
                .map(|e| {
                    let c = &e.covariance;
                    [
                        c[(0, 0)],
                        c[(0, 1)],
                        c[(0, 2)],
                        c[(1, 0)],
                        c[(1, 1)],
                        c[(1, 2)],
                        c[(2, 0)],
                        c[(2, 1)],
                        c[(2, 2)],
                    ]
                })
                .collect()
        });
        ModelSnapshot { means, covariances }
    }

    /// Reconstruct a model from persisted state. Rebuilds the index.
    pub(crate) fn from_raw(capacity: usize, entries: Vec<ModelEntry>, write_idx: usize) -> Self {
        let mut model = Self {
            capacity,
            entries,
            write_idx,
            tree: KdTree::new(),
            index_dirty: false,
        };
        model.rebuild_index();
        model
    }

    fn ensure_index(&mut self) {
        if self.index_dirty {
            self.rebuild_index();
        }
    }

    fn rebuild_index(&mut self) {
        let mut tree: KdTree<f32, 3> = KdTree::new();
        for (i, entry) in self.entries.iter().enumerate() {
            tree.add(&[entry.mean.x, entry.mean.y, entry.mean.z], i as u64);
        }
        self.tree = tree;
        self.index_dirty = false;
    }
}

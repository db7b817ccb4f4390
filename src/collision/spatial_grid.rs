// Uniform hash grid for the body-body broad phase.

use std::collections::HashMap;

use crate::common::EngineLimits;
use crate::math::vec2::Vec2;

/// Unbounded uniform grid. Bodies are bucketed by the cell containing their
/// centre; only bodies sharing a cell are paired, so neighbours straddling
/// a cell border can be missed.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    inv_cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Panics if `cell_size` is not strictly positive.
    pub fn new(cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "Cell size must be positive");
        SpatialGrid {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Changes the cell size, emptying the grid if it differs.
    pub fn set_cell_size(&mut self, cell_size: f64) {
        assert!(cell_size > 0.0, "Cell size must be positive");
        if cell_size != self.cell_size {
            self.cell_size = cell_size;
            self.inv_cell_size = 1.0 / cell_size;
            self.cells.clear();
        }
    }

    /// Converts world coordinates to cell indices: floor(position / cell_size).
    #[inline]
    fn get_cell_indices(&self, point: Vec2) -> (i64, i64) {
        let col = (point.x * self.inv_cell_size).floor() as i64;
        let row = (point.y * self.inv_cell_size).floor() as i64;
        (col, row)
    }

    /// Empties every cell, keeping allocations for reuse.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, body_index: usize, position: Vec2) {
        let key = self.get_cell_indices(position);
        self.cells.entry(key).or_default().push(body_index);
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|bucket| !bucket.is_empty()).count()
    }

    /// All same-cell pairs as `(lower, higher)` indices, sorted so the
    /// resolution order does not depend on hash iteration order.
    pub fn query_potential_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for bucket in self.cells.values() {
            for i in 0..bucket.len() {
                for j in (i + 1)..bucket.len() {
                    let (a, b) = (bucket[i], bucket[j]);
                    pairs.push((a.min(b), a.max(b)));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}

/// Strategy for producing candidate body pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BroadPhase {
    /// Every pair, O(n^2).
    BruteForce,
    /// Same-cell pairs of a uniform grid.
    Grid { cell_size: f64 },
}

impl BroadPhase {
    /// Brute force up to `grid_population` bodies, the grid above it.
    pub fn select(population: usize, limits: &EngineLimits) -> Self {
        if population > limits.grid_population {
            BroadPhase::Grid {
                cell_size: limits.grid_cell_size,
            }
        } else {
            BroadPhase::BruteForce
        }
    }

    /// Candidate pairs of indices into `positions`, ordered lexicographically.
    pub fn candidate_pairs(&self, positions: &[Vec2], grid: &mut SpatialGrid) -> Vec<(usize, usize)> {
        match *self {
            BroadPhase::BruteForce => {
                let n = positions.len();
                (0..n)
                    .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
                    .collect()
            }
            BroadPhase::Grid { cell_size } => {
                grid.set_cell_size(cell_size);
                grid.clear();
                for (index, position) in positions.iter().enumerate() {
                    grid.insert(index, *position);
                }
                grid.query_potential_pairs()
            }
        }
    }
}

//! Cost model - the summed multi-criterion pairing matrix
//!
//! Level 3 - Steps
//!
//! Each criterion produces an N×N matrix over the group's entries; the cost
//! of pairing entry `i` with entry `j` is the element-wise sum. The diagonal
//! is always zero. Values need not be symmetric: the colour table and the
//! opponent history are read from the perspective of the row player.

use std::fmt;

use ladder_core::{LadderError, Player, Result};

use crate::config::CostWeights;

/// Square matrix of non-negative pairing costs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<u32>,
}

impl CostMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build from rows; every row must have as many entries as there are rows
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self> {
        let size = rows.len();
        let mut matrix = Self::zeros(size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(LadderError::DimensionMismatch {
                    left: size,
                    right: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                matrix.set(i, j, value);
            }
        }
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.size + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: u32) {
        self.cells[i * self.size + j] = value;
    }

    /// Cost of a pairing in both directions
    pub fn pair_cost(&self, i: usize, j: usize) -> u32 {
        self.get(i, j) + self.get(j, i)
    }

    /// Element-wise sum; both matrices must have the same dimension
    pub fn add(&self, other: &CostMatrix) -> Result<CostMatrix> {
        if self.size != other.size {
            return Err(LadderError::DimensionMismatch {
                left: self.size,
                right: other.size,
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(a, b)| a + b)
            .collect();
        Ok(CostMatrix {
            size: self.size,
            cells,
        })
    }

    /// Matrix with rows and columns reordered: `result[i][j] = self[order[i]][order[j]]`
    pub fn permuted(&self, order: &[usize]) -> CostMatrix {
        let mut result = CostMatrix::zeros(order.len());
        for (i, &oi) in order.iter().enumerate() {
            for (j, &oj) in order.iter().enumerate() {
                result.set(i, j, self.get(oi, oj));
            }
        }
        result
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size.max(1)).take(self.size)
    }
}

impl fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(u32::to_string).collect();
            writeln!(f, "{};", line.join(";"))?;
        }
        Ok(())
    }
}

/// Discrete colour preference category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorBucket {
    StrongBlack,
    MildBlack,
    Neutral,
    MildWhite,
    StrongWhite,
}

impl ColorBucket {
    /// Truncate toward zero and clamp to -2..=2
    pub fn from_preference(preference: f64) -> Self {
        match preference.trunc().clamp(-2.0, 2.0) as i32 {
            -2 => ColorBucket::StrongBlack,
            -1 => ColorBucket::MildBlack,
            0 => ColorBucket::Neutral,
            1 => ColorBucket::MildWhite,
            _ => ColorBucket::StrongWhite,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Sum of all four criteria for `entries` playing in group `level`
///
/// `series` selects the promotion criterion: 1 pushes promoted players
/// toward regular members, 2 pulls them toward each other.
pub fn build_cost_matrix(
    entries: &[Player],
    level: u32,
    series: u32,
    weights: &CostWeights,
) -> Result<CostMatrix> {
    let recency = recency_matrix(entries, weights);
    let seed_gap = seed_gap_matrix(entries.len(), weights);
    let color = color_matrix(entries, weights);
    let promotion = promotion_matrix(entries, level, series, weights);

    tracing::trace!("recency matrix\n{}", recency);
    tracing::trace!("seed gap matrix\n{}", seed_gap);
    tracing::trace!("color matrix\n{}", color);
    tracing::trace!("promotion matrix\n{}", promotion);

    recency.add(&seed_gap)?.add(&color)?.add(&promotion)
}

/// Penalty for meeting an opponent again within the remembered rounds
pub fn recency_matrix(entries: &[Player], weights: &CostWeights) -> CostMatrix {
    let n = entries.len();
    let mut matrix = CostMatrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let weight: u32 = entries[i]
                .opponent_distances(&entries[j])
                .iter()
                .map(|&d| {
                    if d > 0 && d < weights.recent_window {
                        weights.recent_opponent
                    } else if d >= weights.recent_window && d < weights.older_window {
                        weights.older_opponent
                    } else {
                        0
                    }
                })
                .sum();
            matrix.set(i, j, weight);
        }
    }
    matrix
}

/// Penalty by distance between positions in the ranking
pub fn seed_gap_matrix(size: usize, weights: &CostWeights) -> CostMatrix {
    let mut matrix = CostMatrix::zeros(size);
    for i in 0..size {
        for j in 0..size {
            let gap = i.abs_diff(j);
            let value = weights
                .seed_gap
                .get(gap)
                .copied()
                .unwrap_or(weights.seed_gap_max);
            matrix.set(i, j, value);
        }
    }
    matrix
}

/// Penalty for pairing players whose colour needs collide
pub fn color_matrix(entries: &[Player], weights: &CostWeights) -> CostMatrix {
    let n = entries.len();
    let buckets: Vec<ColorBucket> = entries
        .iter()
        .map(|p| ColorBucket::from_preference(p.color_preference))
        .collect();
    let mut matrix = CostMatrix::zeros(n);
    for i in 0..n {
        for j in 0..n {
            if i != j {
                matrix.set(i, j, weights.color[buckets[i].index()][buckets[j].index()]);
            }
        }
    }
    matrix
}

/// Preference for or against promoted players meeting each other
pub fn promotion_matrix(
    entries: &[Player],
    level: u32,
    series: u32,
    weights: &CostWeights,
) -> CostMatrix {
    let n = entries.len();
    let mut matrix = CostMatrix::zeros(n);
    let (displaced_pair, mixed) = match series {
        1 => (weights.first_series_displaced_pair, weights.first_series_mixed),
        2 => (weights.second_series_displaced_pair, weights.second_series_mixed),
        _ => return matrix,
    };
    for i in 0..n {
        let di = entries[i].is_displaced_in(level);
        for j in 0..n {
            if i == j {
                continue;
            }
            let dj = entries[j].is_displaced_in(level);
            let value = match (di, dj) {
                (true, true) => displaced_pair,
                (false, false) => weights.settled_pair,
                _ => mixed,
            };
            matrix.set(i, j, value);
        }
    }
    matrix
}

/// Mark pairs that must not be scheduled, in both directions
pub fn forbid_pairs(matrix: &mut CostMatrix, pairs: &[(usize, usize)], weight: u32) {
    for &(i, j) in pairs {
        matrix.set(i, j, weight);
        matrix.set(j, i, weight);
    }
}

//! Ordering search - minimise the cost along the tri-diagonal band
//!
//! Level 3 - Steps
//!
//! Players are laid out in an order; consecutive positions `(2k, 2k+1)`
//! become matches. The search looks for an order whose permuted cost matrix
//! is cheap on the main diagonal and its two neighbours. It is a bounded
//! local search: a swap descent from the identity, followed by kicked
//! restarts drawn from a seeded generator, so results are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::builder::Pairing;
use crate::cost::CostMatrix;

/// Result of the ordering search
#[derive(Clone, Debug, PartialEq)]
pub struct Triagonal {
    /// Entry index for every position
    pub order: Vec<usize>,
    /// Cost matrix permuted by `order`
    pub matrix: CostMatrix,
    /// Band cost of `order`
    pub cost: u32,
    /// Middle position of the trio, odd sizes only
    pub trio: Option<usize>,
}

impl Triagonal {
    /// Convert the order into the pairs and trio that will be scheduled
    pub fn pairing(&self) -> Pairing {
        let n = self.order.len();
        let mut pairs = Vec::with_capacity(n / 2);
        match self.trio {
            None => {
                for k in (0..n.saturating_sub(1)).step_by(2) {
                    pairs.push((self.order[k], self.order[k + 1]));
                }
                Pairing { pairs, trio: None }
            }
            Some(t) => {
                for k in (0..t - 1).step_by(2) {
                    pairs.push((self.order[k], self.order[k + 1]));
                }
                for k in (t + 2..n).step_by(2) {
                    pairs.push((self.order[k], self.order[k + 1]));
                }
                let trio = [self.order[t - 1], self.order[t], self.order[t + 1]];
                Pairing {
                    pairs,
                    trio: Some(trio),
                }
            }
        }
    }
}

/// Search an order with low band cost
pub fn minimize_triagonal(matrix: &CostMatrix, iterations: usize, seed: u64) -> Triagonal {
    let n = matrix.size();
    let mut best: Vec<usize> = (0..n).collect();
    let mut best_cost = band_cost(matrix, &best);

    if n > 2 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for iteration in 0..iterations {
            let mut candidate = best.clone();
            if iteration > 0 {
                kick(&mut candidate, &mut rng);
            }
            let cost = descend(matrix, &mut candidate);
            if cost < best_cost {
                tracing::trace!("iteration {}: band cost {} -> {}", iteration, best_cost, cost);
                best = candidate;
                best_cost = cost;
            }
        }
    }

    let trio = trio_location(matrix, &best);
    Triagonal {
        matrix: matrix.permuted(&best),
        order: best,
        cost: best_cost,
        trio,
    }
}

/// Sum of the permuted matrix over the main diagonal and its neighbours
pub fn band_cost(matrix: &CostMatrix, order: &[usize]) -> u32 {
    let n = order.len();
    let mut sum = 0;
    for i in 0..n {
        for j in i.saturating_sub(1)..(i + 2).min(n) {
            sum += matrix.get(order[i], order[j]);
        }
    }
    sum
}

/// Middle position of the cheapest trio for odd sizes
///
/// Candidate positions are odd so that pairs before and after the trio stay
/// aligned on even positions. Ties go to the lowest position.
pub fn trio_location(matrix: &CostMatrix, order: &[usize]) -> Option<usize> {
    let n = order.len();
    if n < 3 || n % 2 == 0 {
        return None;
    }
    let mut best: Option<(usize, u32)> = None;
    for t in (1..n - 1).step_by(2) {
        let (a, b, c) = (order[t - 1], order[t], order[t + 1]);
        let mut cost = matrix.pair_cost(a, b) + matrix.pair_cost(b, c) + matrix.pair_cost(a, c);
        for k in (0..t - 1).step_by(2) {
            cost += matrix.pair_cost(order[k], order[k + 1]);
        }
        for k in (t + 2..n).step_by(2) {
            cost += matrix.pair_cost(order[k], order[k + 1]);
        }
        if best.map_or(true, |(_, c)| cost < c) {
            best = Some((t, cost));
        }
    }
    best.map(|(t, _)| t)
}

/// First-improvement swap descent; returns the final band cost
fn descend(matrix: &CostMatrix, order: &mut [usize]) -> u32 {
    let n = order.len();
    let mut cost = band_cost(matrix, order);
    loop {
        let mut improved = false;
        for i in 0..n {
            for j in (i + 1)..n {
                order.swap(i, j);
                let candidate = band_cost(matrix, order);
                if candidate < cost {
                    cost = candidate;
                    improved = true;
                } else {
                    order.swap(i, j);
                }
            }
        }
        if !improved {
            return cost;
        }
    }
}

/// Random double swap to leave the current local minimum
fn kick<R: Rng>(order: &mut [usize], rng: &mut R) {
    let n = order.len();
    for _ in 0..2 {
        let i = rng.gen_range(0..n);
        let j = rng.gen_range(0..n);
        order.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostWeights;
    use crate::cost::{build_cost_matrix, seed_gap_matrix};
    use ladder_core::Player;

    fn plain_entries(n: u32) -> Vec<Player> {
        (1..=n)
            .map(|i| Player::new(i, &format!("P{}", i), &format!("P{}", i), 1))
            .collect()
    }

    fn is_permutation(order: &[usize]) -> bool {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        sorted == (0..order.len()).collect::<Vec<_>>()
    }

    #[test]
    fn test_identity_is_kept_when_minimal() {
        let matrix = build_cost_matrix(&plain_entries(6), 1, 1, &CostWeights::default()).unwrap();
        let result = minimize_triagonal(&matrix, 10, 7);
        assert_eq!(result.order, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(result.trio, None);
        assert_eq!(result.pairing().pairs, vec![(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn test_band_cost() {
        let matrix = CostMatrix::from_rows(&[vec![0, 1, 9], vec![2, 0, 3], vec![9, 4, 0]]).unwrap();
        assert_eq!(band_cost(&matrix, &[0, 1, 2]), 1 + 2 + 3 + 4);
        assert_eq!(band_cost(&matrix, &[1, 0, 2]), 2 + 1 + 9 + 9);
    }

    #[test]
    fn test_descent_moves_expensive_neighbours_apart() {
        // 0 and 1 must not sit next to each other
        let mut rows = vec![vec![1u32; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 0;
        }
        rows[0][1] = 500;
        rows[1][0] = 500;
        let matrix = CostMatrix::from_rows(&rows).unwrap();
        let result = minimize_triagonal(&matrix, 10, 1);
        assert!(is_permutation(&result.order));
        let pos0 = result.order.iter().position(|&e| e == 0).unwrap();
        let pos1 = result.order.iter().position(|&e| e == 1).unwrap();
        assert!(pos0.abs_diff(pos1) > 1);
        assert_eq!(result.cost, 6);
    }

    #[test]
    fn test_odd_size_has_trio() {
        for n in [3u32, 7, 9, 11] {
            let matrix =
                build_cost_matrix(&plain_entries(n), 1, 1, &CostWeights::default()).unwrap();
            let result = minimize_triagonal(&matrix, 10, 3);
            let t = result.trio.expect("odd group needs a trio");
            assert_eq!(t % 2, 1);
            assert!(t + 1 < n as usize);
            let pairing = result.pairing();
            assert_eq!(pairing.pairs.len(), (n as usize - 3) / 2);
            assert!(pairing.is_complete(n as usize));
        }
    }

    #[test]
    fn test_even_size_has_no_trio() {
        for n in [2u32, 4, 8, 12] {
            let matrix =
                build_cost_matrix(&plain_entries(n), 1, 1, &CostWeights::default()).unwrap();
            let result = minimize_triagonal(&matrix, 10, 3);
            assert_eq!(result.trio, None);
            assert_eq!(result.pairing().pairs.len(), n as usize / 2);
        }
    }

    #[test]
    fn test_reproducible() {
        let mut entries = plain_entries(9);
        entries[0].history = vec!["P2".to_string(), "P3".to_string()];
        entries[4].color_preference = 2.2;
        entries[5].color_preference = -1.1;
        let matrix = build_cost_matrix(&entries, 1, 1, &CostWeights::default()).unwrap();
        let a = minimize_triagonal(&matrix, 10, 42);
        let b = minimize_triagonal(&matrix, 10, 42);
        assert_eq!(a, b);
        assert_eq!(a.matrix, matrix.permuted(&a.order));
    }

    #[test]
    fn test_trio_location_prefers_cheapest() {
        let matrix = seed_gap_matrix(5, &CostWeights::default());
        // identity: trio at 1 costs trio(0,1,2) + pair(3,4); trio at 3 is symmetric
        let t = trio_location(&matrix, &[0, 1, 2, 3, 4]);
        assert_eq!(t, Some(1));
        assert_eq!(trio_location(&matrix, &[0, 1, 2, 3]), None);
    }

    #[test]
    fn test_tiny_inputs() {
        let result = minimize_triagonal(&CostMatrix::zeros(0), 10, 0);
        assert!(result.order.is_empty());
        let result = minimize_triagonal(&CostMatrix::zeros(1), 10, 0);
        assert_eq!(result.trio, None);
        assert!(result.pairing().pairs.is_empty());
    }
}

//! Configuration types for pairing rounds
//!
//! Level 4 - Utilities and configuration

/// Weights of the four pairing criteria
///
/// Every entry of the cost matrix is a sum of these values, so the scoring
/// policy can be inspected and tuned without touching the optimizer.
#[derive(Clone, Debug, PartialEq)]
pub struct CostWeights {
    /// Penalty per meeting in the last rounds (distance below `recent_window`)
    pub recent_opponent: u32,
    /// Exclusive upper bound of the recent distance range
    pub recent_window: u32,
    /// Penalty per meeting further back (distance below `older_window`)
    pub older_opponent: u32,
    /// Exclusive upper bound of the older distance range
    pub older_window: u32,
    /// Penalty by rank distance 0..=6
    pub seed_gap: [u32; 7],
    /// Penalty for rank distance 7 and beyond
    pub seed_gap_max: u32,
    /// Colour balance penalty, indexed `[bucket of i][bucket of j]`,
    /// buckets ordered strong black .. strong white
    pub color: [[u32; 5]; 5],
    /// First series: two promoted players against each other
    pub first_series_displaced_pair: u32,
    /// First series: promoted player against a regular member
    pub first_series_mixed: u32,
    /// Second series: two promoted players against each other
    pub second_series_displaced_pair: u32,
    /// Second series: promoted player against a regular member
    pub second_series_mixed: u32,
    /// Two regular members of the group
    pub settled_pair: u32,
    /// Pair that must never be scheduled (a player against their own copy)
    pub forbidden: u32,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            recent_opponent: 70,
            recent_window: 3,
            older_opponent: 30,
            older_window: 5,
            seed_gap: [0, 0, 10, 20, 30, 50, 80],
            seed_gap_max: 100,
            color: [
                [100, 75, 50, 25, 0],
                [75, 60, 35, 10, 25],
                [50, 25, 20, 35, 50],
                [25, 10, 35, 60, 75],
                [0, 25, 50, 75, 100],
            ],
            first_series_displaced_pair: 100,
            first_series_mixed: 0,
            second_series_displaced_pair: 0,
            second_series_mixed: 40,
            settled_pair: 20,
            forbidden: 1000,
        }
    }
}

/// When and how many players move up a group
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromotionPolicy {
    /// First round of a period in which players move up
    pub start_round: u32,
    /// Last round of a period; only decided leaders move up then
    pub last_round: u32,
    /// Candidates per group before the last round
    pub window_count: u32,
    /// Candidates per group in the last round
    pub final_count: u32,
    /// Points lead needed in the last round
    pub final_margin: i32,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            start_round: 4,
            last_round: 8,
            window_count: 4,
            final_count: 1,
            final_margin: 5,
        }
    }
}

/// Pairing algorithm used per group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PairingStrategy {
    /// Cost matrix plus tri-diagonal ordering search
    #[default]
    Optimizer,
    /// Recursive constraint search with progressive relaxation
    Backtracking,
}

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub weights: CostWeights,
    pub promotion: PromotionPolicy,
    pub strategy: PairingStrategy,
    /// Improvement iterations of the ordering search
    pub iterations: usize,
    /// Seed for the ordering search kicks
    pub seed: u64,
    /// Whether to pair groups in parallel
    pub parallel: bool,
    /// Fall back to the optimizer when backtracking finds nothing
    pub fallback: bool,
    /// Largest opponent-history ignore window tried while relaxing
    pub max_ignore_window: usize,
    /// Search node budget per backtracking attempt
    pub max_backtrack_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            promotion: PromotionPolicy::default(),
            strategy: PairingStrategy::Optimizer,
            iterations: 10,
            seed: 0x1adde7,
            parallel: true,
            fallback: true,
            max_ignore_window: 5,
            max_backtrack_steps: 100_000,
        }
    }
}

impl EngineConfig {
    /// Config using the backtracking solver
    pub fn backtracking() -> Self {
        Self {
            strategy: PairingStrategy::Backtracking,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: PairingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_weight_defaults() {
        let weights = CostWeights::default();
        assert_eq!(weights.recent_opponent, 70);
        assert_eq!(weights.older_opponent, 30);
        assert_eq!(weights.seed_gap[5], 50);
        // strong white vs strong black, strong white vs strong white, neutral vs neutral
        assert_eq!(weights.color[4][0], 0);
        assert_eq!(weights.color[4][4], 100);
        assert_eq!(weights.color[2][2], 20);
    }

    #[test]
    fn test_color_table_is_asymmetric() {
        let weights = CostWeights::default();
        assert_ne!(weights.color[1][2], weights.color[2][1]);
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.strategy, PairingStrategy::Optimizer);
        assert_eq!(config.iterations, 10);
        assert!(config.parallel);
        assert_eq!(config.max_ignore_window, 5);
    }

    #[test]
    fn test_engine_config_backtracking() {
        let config = EngineConfig::backtracking().with_parallel(false);
        assert_eq!(config.strategy, PairingStrategy::Backtracking);
        assert!(!config.parallel);
    }

    #[test]
    fn test_promotion_policy_defaults() {
        let policy = PromotionPolicy::default();
        assert_eq!(policy.start_round, 4);
        assert_eq!(policy.window_count, 4);
        assert_eq!(policy.final_margin, 5);
    }
}

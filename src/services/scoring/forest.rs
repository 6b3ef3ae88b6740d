//! Bagged regression trees.
//!
//! A small CART implementation sized for single-household data: tens to a
//! few hundred rows with a dozen features. Trees split on squared error,
//! every split considers all features, and each tree sees a bootstrap sample
//! drawn from a seeded generator so training is reproducible.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub seed: u64,
    /// Unlimited when `None`
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Per-feature zero-mean, unit-variance scaling fit on the training rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    /// Fits on rows of equal width; constant features get a scale of 1
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        let n = rows.len().max(1) as f64;

        let means: Vec<f64> = (0..width)
            .map(|j| rows.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();

        let scales = (0..width)
            .map(|j| {
                let variance = rows
                    .iter()
                    .map(|row| (row[j] - means[j]).powi(2))
                    .sum::<f64>()
                    / n;
                let std = variance.sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Self { means, scales }
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }

    /// Scales one row; `None` when its width differs from the fitted width
    pub fn transform(&self, row: &[f64]) -> Option<Vec<f64>> {
        if row.len() != self.width() {
            return None;
        }
        Some(
            row.iter()
                .zip(self.means.iter().zip(&self.scales))
                .map(|(value, (mean, scale))| (value - mean) / scale)
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree stored as a node arena; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    /// Grows a tree over the rows selected by `sample`
    fn fit(features: &[Vec<f64>], targets: &[f64], sample: Vec<usize>, params: &ForestParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(features, targets, sample, 0, params);
        tree
    }

    fn grow(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        sample: Vec<usize>,
        depth: usize,
        params: &ForestParams,
    ) -> usize {
        let slot = self.nodes.len();
        let value = mean(sample.iter().map(|&i| targets[i]));
        self.nodes.push(Node::Leaf { value });

        let depth_exhausted = params.max_depth.is_some_and(|max| depth >= max);
        if depth_exhausted || sample.len() < params.min_samples_split.max(2) {
            return slot;
        }

        let Some(split) = best_split(features, targets, &sample, params.min_samples_leaf.max(1)) else {
            return slot;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = sample
            .into_iter()
            .partition(|&i| features[i][split.feature] <= split.threshold);

        let left = self.grow(features, targets, left_rows, depth + 1, params);
        let right = self.grow(features, targets, right_rows, depth + 1, params);
        self.nodes[slot] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        slot
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().unwrap_or(f64::NAN);
                    index = if value <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Lowest squared-error split over every feature, if any reduces the error
fn best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    sample: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let n = sample.len();
    let total_sum: f64 = sample.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = sample.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;
    if parent_sse <= 1e-12 {
        return None;
    }

    let width = features[sample[0]].len();
    let mut best: Option<SplitCandidate> = None;
    let mut order = sample.to_vec();

    for feature in 0..width {
        order.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for position in 1..n {
            let moved = targets[order[position - 1]];
            left_sum += moved;
            left_sq += moved * moved;

            let below = features[order[position - 1]][feature];
            let above = features[order[position]][feature];
            if position < min_leaf || n - position < min_leaf || below >= above {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let left_n = position as f64;
            let right_n = (n - position) as f64;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: below + (above - below) / 2.0,
                    sse,
                });
            }
        }
    }

    best.filter(|split| split.sse < parent_sse)
}

/// Mean of many bootstrap-trained regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fits on `features` (one row per sample) against `targets`
    ///
    /// Returns `None` for empty or ragged input.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: ForestParams) -> Option<Self> {
        let n = features.len();
        if n == 0 || n != targets.len() {
            return None;
        }
        let width = features[0].len();
        if features.iter().any(|row| row.len() != width) {
            return None;
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_estimators.max(1))
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(features, targets, sample, &params)
            })
            .collect();

        Some(Self { params, trees })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        mean(self.trees.iter().map(|tree| tree.predict(row)))
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

// ============================================================
// Layer 5 — Decision Tree (CART)
// ============================================================
// One classification tree of the forest.
//
// Growing a node:
//   1. Count classes among the node's samples
//   2. Stop (leaf) if the node is pure, too small, or at max depth
//   3. Draw features in random order; for each, sort the node's
//      samples by that feature and sweep every boundary between
//      distinct values, scoring the weighted Gini impurity of the
//      two sides
//   4. Stop looking once `max_features` features were tried AND a
//      valid split was found; constant features never count as a
//      valid split, so a node whose drawn features are all
//      constant keeps drawing
//   5. Split at the midpoint between the two boundary values and
//      recurse into both halves
//
// Nodes live in a flat arena (Vec<Node>) addressed by index, so a
// fitted tree is a plain serde-serializable value.
//
// Leaves store the class distribution of their samples; the
// forest averages these.

use rand::{rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

/// Hyperparameters for growing a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// None grows until every leaf is pure
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    /// Features tried per node before settling on the best split
    pub max_features:      usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Split {
        feature:   usize,
        threshold: f64,
        left:      usize,
        right:     usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

/// Read-only state shared by every node while growing one tree.
struct Grower<'a> {
    rows:       &'a [Vec<f64>],
    labels:     &'a [usize],
    n_features: usize,
    n_classes:  usize,
    params:     TreeParams,
}

struct Candidate {
    feature:   usize,
    threshold: f64,
    impurity:  f64,
}

impl DecisionTree {
    /// Grow a tree over `sample_idx` (indices into `rows`/`labels`,
    /// repeats allowed for bootstrap samples).
    pub fn fit(
        rows:       &[Vec<f64>],
        labels:     &[usize],
        sample_idx: Vec<usize>,
        n_classes:  usize,
        params:     TreeParams,
        rng:        &mut StdRng,
    ) -> Self {
        let n_features = rows.first().map_or(0, Vec::len);
        let grower = Grower { rows, labels, n_features, n_classes, params };

        let mut tree = Self { nodes: Vec::new() };
        tree.grow(&grower, sample_idx, 0, rng);
        tree
    }

    /// Class distribution of the leaf `row` falls into.
    pub fn leaf_distribution(&self, row: &[f64]) -> &[f64] {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Split { feature, threshold, left, right } => {
                    at = if row[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match &nodes[at] {
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                Node::Leaf { .. } => 0,
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    /// Append the subtree for `idx` and return its root's index.
    fn grow(&mut self, g: &Grower<'_>, idx: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let counts = class_counts(g.labels, &idx, g.n_classes);

        // Push the leaf now; it becomes a split below if one is found
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution: normalise(&counts) });

        let pure          = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let too_small     = idx.len() < g.params.min_samples_split;
        let depth_reached = g.params.max_depth.is_some_and(|d| depth >= d);
        if pure || too_small || depth_reached {
            return node_id;
        }

        let Some(split) = best_split(g, &idx, &counts, rng) else {
            return node_id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = idx
            .into_iter()
            .partition(|&i| g.rows[i][split.feature] <= split.threshold);

        let left  = self.grow(g, left_idx,  depth + 1, rng);
        let right = self.grow(g, right_idx, depth + 1, rng);
        self.nodes[node_id] = Node::Split {
            feature:   split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }
}

fn best_split(g: &Grower<'_>, idx: &[usize], parent: &[usize], rng: &mut StdRng) -> Option<Candidate> {
    let mut features: Vec<usize> = (0..g.n_features).collect();
    features.shuffle(rng);

    let mut best: Option<Candidate> = None;
    for (tried, &feature) in features.iter().enumerate() {
        if tried >= g.params.max_features && best.is_some() {
            break;
        }
        if let Some(c) = best_split_on(g, idx, parent, feature) {
            if best.as_ref().map_or(true, |b| c.impurity < b.impurity) {
                best = Some(c);
            }
        }
    }
    best
}

/// Best threshold on one feature, or None when the feature is
/// constant over `idx`.
fn best_split_on(g: &Grower<'_>, idx: &[usize], parent: &[usize], feature: usize) -> Option<Candidate> {
    let mut sorted: Vec<(f64, usize)> = idx
        .iter()
        .map(|&i| (g.rows[i][feature], g.labels[i]))
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let n         = sorted.len() as f64;
    let mut left  = vec![0usize; g.n_classes];
    let mut right = parent.to_vec();
    let mut best: Option<Candidate> = None;

    for i in 0..sorted.len().saturating_sub(1) {
        let (value, label) = sorted[i];
        left[label]  += 1;
        right[label] -= 1;

        let next = sorted[i + 1].0;
        if next.total_cmp(&value).is_le() {
            continue;
        }

        let n_left   = (i + 1) as f64;
        let n_right  = n - n_left;
        let impurity = (n_left * gini(&left, n_left) + n_right * gini(&right, n_right)) / n;

        if best.as_ref().map_or(true, |b| impurity < b.impurity) {
            let mut threshold = value / 2.0 + next / 2.0;
            if threshold >= next {
                threshold = value;
            }
            best = Some(Candidate { feature, threshold, impurity });
        }
    }
    best
}

fn class_counts(labels: &[usize], idx: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in idx {
        counts[labels[i]] += 1;
    }
    counts
}

fn gini(counts: &[usize], n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

fn normalise(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    counts
        .iter()
        .map(|&c| if total == 0 { 0.0 } else { c as f64 / total as f64 })
        .collect()
}

//! Summary statistics over repeated draws.

use statrs::statistics::Statistics;

/// Mean and population standard deviation of a sample.
///
/// Both are NaN for an empty sample.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    (values.iter().mean(), values.iter().population_std_dev())
}

/// Ranks starting at 1, with tied values sharing their average rank.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j share ranks i+1..=j+1.
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

/// Spearman rank correlation of two equally long samples.
///
/// `None` when there are fewer than two points or either sample is constant.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let rx = average_ranks(x);
    let ry = average_ranks(y);
    let sx = rx.iter().population_std_dev();
    let sy = ry.iter().population_std_dev();
    if sx == 0.0 || sy == 0.0 || !sx.is_finite() || !sy.is_finite() {
        return None;
    }
    let cov = rx.iter().population_covariance(ry.iter());
    Some(cov / (sx * sy))
}

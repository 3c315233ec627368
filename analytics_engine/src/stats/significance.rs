//! Two-sample engagement comparison (Welch's t-test).

use super::distribution::two_sided_p_value;
use super::mean;
use chirp_models::{EngagementSample, SignificanceResult};

/// Fixed two-sided significance threshold.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Compare two users' favorites and reshares series with Welch's
/// unequal-variance t-test, run independently per metric.
///
/// Non-finite observations are omitted, not imputed. Series with fewer
/// than two usable observations, or a pair with no variance at all,
/// produce NaN statistics and p-values and a false significance flag.
pub fn compare(a: &EngagementSample, b: &EngagementSample) -> SignificanceResult {
    let (favorites_statistic, favorites_p_value) = welch_t(&a.favorites, &b.favorites);
    let (reshares_statistic, reshares_p_value) = welch_t(&a.reshares, &b.reshares);

    SignificanceResult {
        favorites_statistic,
        favorites_p_value,
        reshares_statistic,
        reshares_p_value,
        favorites_significant: favorites_p_value < SIGNIFICANCE_LEVEL,
        reshares_significant: reshares_p_value < SIGNIFICANCE_LEVEL,
    }
}

/// Welch's t statistic and two-sided p-value for two series.
fn welch_t(a: &[f64], b: &[f64]) -> (f64, f64) {
    let a: Vec<f64> = a.iter().copied().filter(|v| v.is_finite()).collect();
    let b: Vec<f64> = b.iter().copied().filter(|v| v.is_finite()).collect();

    if a.len() < 2 || b.len() < 2 {
        return (f64::NAN, f64::NAN);
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let mean_a = mean(&a);
    let mean_b = mean(&b);
    let se_a = sample_variance(&a, mean_a) / n_a;
    let se_b = sample_variance(&b, mean_b) / n_b;

    let denominator = (se_a + se_b).sqrt();
    if denominator == 0.0 {
        return (f64::NAN, f64::NAN);
    }

    let t = (mean_a - mean_b) / denominator;

    // Welch–Satterthwaite degrees of freedom
    let df = (se_a + se_b).powi(2)
        / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));

    (t, two_sided_p_value(t, df))
}

fn sample_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

//! Ordinary least-squares fitting and residual diagnostics.

use super::distribution::two_sided_p_value;
use super::{mean, round4};
use chirp_models::error::{AnalyticsError, Result};
use chirp_models::{RegressionResult, ResidualRow, ResidualSummary};

/// Fit y = slope * x + intercept by simple least squares.
///
/// Returns the correlation r, r^2 (rounded to 4 decimals for stable
/// report output), the two-sided p-value of the slope, and the slope
/// standard error. With zero degrees of freedom (n = 2) the p-value and
/// standard error are NaN rather than an error: the fit itself is still
/// well defined.
pub fn fit(x: &[f64], y: &[f64]) -> Result<RegressionResult> {
    check_series(x, y)?;

    let n = x.len() as f64;
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_xx == 0.0 {
        return Err(AnalyticsError::Input(
            "all x values are identical; the slope is undefined".to_string(),
        ));
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    let r = if ss_yy == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_xx * ss_yy).sqrt()).clamp(-1.0, 1.0)
    };

    let df = n - 2.0;
    let (p_value, std_error) = if df <= 0.0 {
        (f64::NAN, f64::NAN)
    } else {
        let unexplained = 1.0 - r * r;
        if unexplained <= f64::EPSILON {
            // perfect fit: the slope is exact
            (0.0, 0.0)
        } else {
            let t = r * (df / unexplained).sqrt();
            let std_error = ((ss_yy / ss_xx - slope * slope) / df).sqrt();
            (two_sided_p_value(t, df), std_error)
        }
    };

    let residuals = residuals(slope, intercept, x, y)?;

    Ok(RegressionResult {
        slope,
        intercept,
        r,
        r_squared: round4(r * r),
        p_value,
        std_error,
        residuals,
    })
}

/// Residual rows computed pointwise over the supplied x values.
pub fn residuals(slope: f64, intercept: f64, x: &[f64], y: &[f64]) -> Result<Vec<ResidualRow>> {
    check_series(x, y)?;

    Ok(x.iter()
        .zip(y.iter())
        .map(|(&xi, &actual)| {
            let fitted = slope * xi + intercept;
            ResidualRow {
                fitted,
                actual,
                residual: actual - fitted,
            }
        })
        .collect())
}

/// Mean residual plus the means of the strictly positive and strictly
/// negative residuals. A sign class with no members yields None.
pub fn summarize_residuals(rows: &[ResidualRow]) -> ResidualSummary {
    if rows.is_empty() {
        return ResidualSummary {
            mean_residual: f64::NAN,
            avg_overestimate: None,
            avg_underestimate: None,
        };
    }

    let positives: Vec<f64> = rows
        .iter()
        .map(|row| row.residual)
        .filter(|r| *r > 0.0)
        .collect();
    let negatives: Vec<f64> = rows
        .iter()
        .map(|row| row.residual)
        .filter(|r| *r < 0.0)
        .collect();

    let all: Vec<f64> = rows.iter().map(|row| row.residual).collect();

    ResidualSummary {
        mean_residual: mean(&all),
        avg_overestimate: if positives.is_empty() {
            None
        } else {
            Some(mean(&positives))
        },
        avg_underestimate: if negatives.is_empty() {
            None
        } else {
            Some(mean(&negatives))
        },
    }
}

fn check_series(x: &[f64], y: &[f64]) -> Result<()> {
    if x.is_empty() || y.is_empty() {
        return Err(AnalyticsError::Input(
            "regression input series must be non-empty".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(AnalyticsError::Input(format!(
            "regression input series differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_a_perfect_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();

        let result = fit(&x, &y).unwrap();
        assert!((result.slope - 2.0).abs() < 1.0e-12);
        assert!((result.intercept - 3.0).abs() < 1.0e-12);
        assert_eq!(result.r_squared, 1.0);
        assert_eq!(result.p_value, 0.0);
        assert_eq!(result.std_error, 0.0);
        for row in &result.residuals {
            assert!(row.residual.abs() < 1.0e-9);
        }
    }

    #[test]
    fn noisy_fit_has_plausible_diagnostics() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [2.9, 5.2, 6.8, 9.1, 11.2, 12.8];

        let result = fit(&x, &y).unwrap();
        assert!(result.slope > 1.5 && result.slope < 2.5);
        assert!(result.r > 0.99);
        assert!(result.p_value < 0.001);
        assert!(result.std_error > 0.0);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(fit(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn rejects_empty_series() {
        assert!(fit(&[], &[]).is_err());
    }

    #[test]
    fn rejects_constant_x() {
        assert!(fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn two_points_have_undefined_p_value() {
        let result = fit(&[1.0, 2.0], &[3.0, 5.0]).unwrap();
        assert!((result.slope - 2.0).abs() < 1.0e-12);
        assert!(result.p_value.is_nan());
        assert!(result.std_error.is_nan());
    }

    #[test]
    fn flat_y_has_zero_correlation() {
        let result = fit(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(result.slope, 0.0);
        assert_eq!(result.r, 0.0);
    }

    #[test]
    fn residuals_use_supplied_x_values() {
        // irregular spacing: fitted values must follow x, not an index
        let rows = residuals(2.0, 0.0, &[1.0, 10.0], &[3.0, 19.0]).unwrap();
        assert_eq!(rows[0].fitted, 2.0);
        assert_eq!(rows[0].residual, 1.0);
        assert_eq!(rows[1].fitted, 20.0);
        assert_eq!(rows[1].residual, -1.0);
    }

    #[test]
    fn residual_summary_splits_signs() {
        let rows = residuals(0.0, 0.0, &[1.0, 2.0, 3.0], &[2.0, -4.0, 0.0]).unwrap();
        let summary = summarize_residuals(&rows);
        assert_eq!(summary.avg_overestimate, Some(2.0));
        assert_eq!(summary.avg_underestimate, Some(-4.0));
        assert!((summary.mean_residual - (-2.0 / 3.0)).abs() < 1.0e-12);
    }

    #[test]
    fn one_sided_residuals_leave_the_other_mean_undefined() {
        let rows = residuals(0.0, 0.0, &[1.0, 2.0], &[1.0, 2.0]).unwrap();
        let summary = summarize_residuals(&rows);
        assert!(summary.avg_overestimate.is_some());
        assert_eq!(summary.avg_underestimate, None);
    }
}

//! Pearson correlation and its plain-English description.

use crate::error::{CoreError, CoreResult};
use crate::table::TypedTable;
use crate::value::Value;
use serde::Serialize;

/// One labelled interval of the coefficient range.
struct Band {
    lower: f64,
    lower_inclusive: bool,
    upper: f64,
    upper_inclusive: bool,
    label: &'static str,
}

impl Band {
    const fn new(
        lower: f64,
        lower_inclusive: bool,
        upper: f64,
        upper_inclusive: bool,
        label: &'static str,
    ) -> Self {
        Band {
            lower,
            lower_inclusive,
            upper,
            upper_inclusive,
            label,
        }
    }

    fn contains(&self, r: f64) -> bool {
        let above = if self.lower_inclusive { r >= self.lower } else { r > self.lower };
        let below = if self.upper_inclusive { r <= self.upper } else { r < self.upper };
        above && below
    }
}

// Evaluated in order; together the bands cover [-1, 1] without overlap.
const BANDS: [Band; 9] = [
    Band::new(-1.0, true, -1.0, true, "perfect negative correlation"),
    Band::new(-1.0, false, -0.8, true, "strong negative correlation"),
    Band::new(-0.8, false, -0.4, false, "moderate negative correlation"),
    Band::new(-0.4, true, 0.0, false, "weak negative correlation"),
    Band::new(0.0, true, 0.0, true, "no correlation"),
    Band::new(0.0, false, 0.4, true, "weak positive correlation"),
    Band::new(0.4, false, 0.8, false, "moderate positive correlation"),
    Band::new(0.8, true, 1.0, false, "strong positive correlation"),
    Band::new(1.0, true, 1.0, true, "perfect positive correlation"),
];

/// Describe a correlation coefficient, e.g. `0.6` → "moderate positive
/// correlation".
///
/// Values outside [-1, 1] and NaN are [`CoreError::InvalidArgument`].
pub fn describe_pearsons_r(r: f64) -> CoreResult<&'static str> {
    if !(-1.0..=1.0).contains(&r) {
        return Err(CoreError::InvalidArgument(format!(
            "correlation coefficient must be a number in [-1, 1], got {r}"
        )));
    }
    BANDS
        .iter()
        .find(|band| band.contains(r))
        .map(|band| band.label)
        .ok_or_else(|| CoreError::InvalidArgument(format!("no band contains {r}")))
}

/// [`describe_pearsons_r`] for a table cell; non-numeric values are
/// rejected.
pub fn describe_value(value: &Value) -> CoreResult<&'static str> {
    match value.as_f64() {
        Some(r) => describe_pearsons_r(r),
        None => Err(CoreError::InvalidArgument(format!(
            "correlation coefficient must be numeric, got {}",
            value.type_name()
        ))),
    }
}

/// Pearson's r over the pairs where both sides are present and finite.
///
/// `None` when fewer than two pairs remain, either side has zero variance,
/// or the sums overflow. Clamped to [-1, 1] against rounding drift.
#[must_use]
pub fn pearson_r(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Round half away from zero to `places` decimals.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A described correlation between two columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub x: String,
    pub y: String,
    /// Coefficient rounded to three decimals.
    pub r: f64,
    pub label: &'static str,
}

/// Correlate two numeric columns of `table`. `Ok(None)` when there is not
/// enough data for a coefficient.
pub fn correlate(table: &TypedTable, x: &str, y: &str) -> CoreResult<Option<CorrelationReport>> {
    let xs = table.column(x)?.to_f64()?;
    let ys = table.column(y)?.to_f64()?;
    let Some(r) = pearson_r(&xs, &ys) else {
        return Ok(None);
    };
    let r = round_to(r, 3);
    Ok(Some(CorrelationReport {
        x: x.to_string(),
        y: y.to_string(),
        r,
        label: describe_pearsons_r(r)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn test_describe_boundaries() {
        let cases = [
            (1.0, "perfect positive correlation"),
            (0.999, "strong positive correlation"),
            (0.8, "strong positive correlation"),
            (0.7999, "moderate positive correlation"),
            (0.6, "moderate positive correlation"),
            (0.4001, "moderate positive correlation"),
            (0.4, "weak positive correlation"),
            (0.3765, "weak positive correlation"),
            (0.0001, "weak positive correlation"),
            (0.0, "no correlation"),
            (-0.0, "no correlation"),
            (-0.0001, "weak negative correlation"),
            (-0.4, "weak negative correlation"),
            (-0.4001, "moderate negative correlation"),
            (-0.7999, "moderate negative correlation"),
            (-0.8, "strong negative correlation"),
            (-0.999, "strong negative correlation"),
            (-1.0, "perfect negative correlation"),
        ];
        for (r, expected) in cases {
            assert_eq!(describe_pearsons_r(r).unwrap(), expected, "r = {r}");
        }
    }

    #[test]
    fn test_describe_rejects_out_of_domain() {
        for r in [10.0, 1.0001, -1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                describe_pearsons_r(r),
                Err(CoreError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_describe_value() {
        assert_eq!(describe_value(&Value::Int(0)).unwrap(), "no correlation");
        assert_eq!(describe_value(&Value::Int(1)).unwrap(), "perfect positive correlation");
        assert!(matches!(
            describe_value(&Value::Null),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(describe_value(&Value::from("0.5")).is_err());
    }

    #[test]
    fn test_bands_cover_domain() {
        let mut r = -1.0;
        while r <= 1.0 {
            let hits = BANDS.iter().filter(|b| b.contains(r)).count();
            assert_eq!(hits, 1, "r = {r}");
            r += 0.001;
        }
    }

    #[test]
    fn test_pearson_r() {
        let xs = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let up = [Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
        let down = [Some(8.0), Some(6.0), Some(4.0), Some(2.0)];
        assert!((pearson_r(&xs, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson_r(&xs, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_r_skips_null_pairs() {
        let xs = [Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = [Some(1.0), Some(100.0), Some(2.0), None];
        assert!(pearson_r(&xs, &ys).is_none());

        let ys = [Some(1.0), Some(100.0), Some(2.0), Some(2.5)];
        let r = pearson_r(&xs, &ys).unwrap();
        assert!(r > 0.9);
    }

    #[test]
    fn test_pearson_r_zero_variance() {
        let xs = [Some(5.0), Some(5.0), Some(5.0)];
        let ys = [Some(1.0), Some(2.0), Some(3.0)];
        assert!(pearson_r(&xs, &ys).is_none());
    }

    #[test]
    fn test_pearson_r_non_finite() {
        let xs = [Some(1.0), Some(f64::NAN), Some(2.0), Some(3.0)];
        let ys = [Some(1.0), Some(5.0), Some(f64::INFINITY), Some(3.0)];
        assert!(pearson_r(&xs, &ys).is_none());

        let xs = [Some(1.0), Some(f64::NAN), Some(2.0), Some(3.0)];
        let ys = [Some(1.0), Some(5.0), Some(2.0), Some(3.0)];
        assert!((pearson_r(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        // Deviations this large overflow to inf / inf
        let huge = [Some(1e200), Some(-1e200), Some(0.0)];
        assert!(pearson_r(&huge, &huge).is_none());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.376_54, 3), 0.377);
        assert_eq!(round_to(-0.123_4, 3), -0.123);
    }

    #[test]
    fn test_correlate() {
        let table = TypedTable::new(vec![
            Column::float("Score", vec![Some(6.0), Some(7.0), Some(8.0), None]),
            Column::integer("Pages", vec![Some(200), Some(300), Some(400), Some(50)]),
        ])
        .unwrap();
        let report = correlate(&table, "Score", "Pages").unwrap().unwrap();
        assert_eq!(report.r, 1.0);
        assert_eq!(report.label, "perfect positive correlation");

        assert!(correlate(&table.take(&[]), "Score", "Pages").unwrap().is_none());
    }
}

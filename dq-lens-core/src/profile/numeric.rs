use serde::{Deserialize, Serialize};

/// every field is None when the column holds no non-null values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
}

/// why a non-empty column could not be summarized
#[derive(Debug, Clone, PartialEq)]
pub enum NumericError {
    NoFiniteValues { skipped: u64 },
    Overflow,
}

impl std::fmt::Display for NumericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericError::NoFiniteValues { skipped } => {
                write!(f, "{skipped} non-null values, none of them finite")
            }
            NumericError::Overflow => write!(f, "mean or std overflows f64"),
        }
    }
}

/// summarizes the finite values fed to it; NaN and ±inf are counted and skipped
pub struct NumericAccumulator {
    values: Vec<f64>,
    sum: f64,
    skipped: u64,
}

impl NumericAccumulator {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            values: Vec::with_capacity(n),
            sum: 0.0,
            skipped: 0,
        }
    }

    pub fn add(&mut self, v: f64) {
        if !v.is_finite() {
            self.skipped += 1;
            return;
        }
        self.sum += v;
        self.values.push(v);
    }

    /// all-null block only when nothing at all was added
    pub fn finish(mut self) -> Result<NumericStats, NumericError> {
        let n = self.values.len();
        if n == 0 {
            return match self.skipped {
                0 => Ok(NumericStats::default()),
                skipped => Err(NumericError::NoFiniteValues { skipped }),
            };
        }
        self.values.sort_by(f64::total_cmp);
        let mean = self.sum / n as f64;
        // n == 1 has no spread to measure; report 0.0 rather than dividing
        let std = if n > 1 {
            let ss: f64 = self.values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / n as f64).sqrt()
        } else {
            0.0
        };
        if !mean.is_finite() || !std.is_finite() {
            return Err(NumericError::Overflow);
        }
        Ok(NumericStats {
            min: self.values.first().copied(),
            max: self.values.last().copied(),
            mean: Some(mean),
            std: Some(std),
            p25: Some(nearest_rank(&self.values, 0.25)),
            p50: Some(nearest_rank(&self.values, 0.50)),
            p75: Some(nearest_rank(&self.values, 0.75)),
        })
    }
}

impl Default for NumericAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// `sorted` must be non-empty and ascending
fn nearest_rank(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_of(values: &[f64]) -> NumericStats {
        let mut acc = NumericAccumulator::new();
        values.iter().for_each(|v| acc.add(*v));
        acc.finish().unwrap()
    }

    #[test]
    fn empty_column_gives_all_null_block() {
        let s = stats_of(&[]);
        assert_eq!(s, NumericStats::default());
        let json = serde_json::to_value(&s).unwrap();
        for key in ["min", "max", "mean", "std", "p25", "p50", "p75"] {
            assert!(json[key].is_null(), "{key}");
        }
    }

    #[test]
    fn single_value_has_zero_std() {
        let s = stats_of(&[42.0]);
        assert_eq!(s.std, Some(0.0));
        assert_eq!(s.min, Some(42.0));
        assert_eq!(s.p25, Some(42.0));
        assert_eq!(s.p75, Some(42.0));
    }

    #[test]
    fn two_points() {
        let s = stats_of(&[20.0, 10.0]);
        assert_eq!(s.min, Some(10.0));
        assert_eq!(s.max, Some(20.0));
        assert_eq!(s.mean, Some(15.0));
        assert!((s.std.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_rank_picks_observed_values() {
        let s = stats_of(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        // idx = round(8 * q)
        assert_eq!(s.p25, Some(3.0));
        assert_eq!(s.p50, Some(5.0));
        assert_eq!(s.p75, Some(7.0));
    }

    #[test]
    fn quantiles_are_ordered() {
        let s = stats_of(&[5.0, -3.0, 8.5, 8.5, 0.0, 100.0, -40.0]);
        let (min, p25, p50, p75, max) = (
            s.min.unwrap(),
            s.p25.unwrap(),
            s.p50.unwrap(),
            s.p75.unwrap(),
            s.max.unwrap(),
        );
        assert!(min <= p25 && p25 <= p50 && p50 <= p75 && p75 <= max);
    }

    #[test]
    fn nan_is_skipped() {
        let s = stats_of(&[f64::NAN, 1.0]);
        assert_eq!(s.mean, Some(1.0));
        assert_eq!(s.std, Some(0.0));
    }

    #[test]
    fn infinities_are_skipped_like_nan() {
        let s = stats_of(&[f64::INFINITY, 1.0, f64::NEG_INFINITY]);
        for v in [s.min, s.max, s.mean, s.p25, s.p50, s.p75] {
            assert_eq!(v, Some(1.0));
        }
        assert_eq!(s.std, Some(0.0));
    }

    #[test]
    fn only_non_finite_values_is_an_error() {
        let mut acc = NumericAccumulator::new();
        acc.add(f64::NAN);
        acc.add(f64::NAN);
        assert_eq!(
            acc.finish().unwrap_err(),
            NumericError::NoFiniteValues { skipped: 2 }
        );
    }

    #[test]
    fn overflowing_mean_is_an_error() {
        let mut acc = NumericAccumulator::new();
        acc.add(f64::MAX);
        acc.add(f64::MAX);
        assert_eq!(acc.finish().unwrap_err(), NumericError::Overflow);
    }
}

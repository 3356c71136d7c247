use super::cardinality::DistinctCounter;
use super::frequency::{CategoricalStats, FrequencyCounter};
use super::numeric::{NumericAccumulator, NumericStats};
use super::temporal::{datetime_stats, DatetimeStats};
use super::value::SampleValue;
use crate::classify::{classify, DtypeClass};
use crate::sample::sample_values;
use arrow::array::{Array, AsArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use dq_lens_common::{DqLensError, ProfileConfig, Result};
use serde::Serialize;
use tracing::debug;

/// class-specific block; at most one per column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypedStats {
    #[serde(rename = "numeric_stats")]
    Numeric(NumericStats),
    #[serde(rename = "categorical_stats")]
    Categorical(CategoricalStats),
    #[serde(rename = "datetime_stats")]
    Datetime(DatetimeStats),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub class: DtypeClass,
    pub position: usize,
    pub dtype: String,
    pub non_null_count: u64,
    pub null_count: u64,
    pub completeness: f64,
    pub distinct_count: u64,
    pub uniqueness: f64,
    pub sample_values: Vec<SampleValue>,
    #[serde(flatten)]
    pub stats: Option<TypedStats>,
}

impl ColumnProfile {
    pub fn numeric_stats(&self) -> Option<&NumericStats> {
        match &self.stats {
            Some(TypedStats::Numeric(s)) => Some(s),
            _ => None,
        }
    }

    pub fn categorical_stats(&self) -> Option<&CategoricalStats> {
        match &self.stats {
            Some(TypedStats::Categorical(s)) => Some(s),
            _ => None,
        }
    }

    pub fn datetime_stats(&self) -> Option<&DatetimeStats> {
        match &self.stats {
            Some(TypedStats::Datetime(s)) => Some(s),
            _ => None,
        }
    }
}

/// profile one materialized column; reads nothing outside `array`
pub fn profile_column(
    name: &str,
    position: usize,
    array: &dyn Array,
    config: &ProfileConfig,
) -> Result<ColumnProfile> {
    let fail = |e: arrow::error::ArrowError| DqLensError::computation(name, e);
    let class = classify(array.data_type());
    let row_count = array.len() as u64;
    let formatter = ArrayFormatter::try_new(array, &FormatOptions::default()).map_err(fail)?;
    let nulls = array.logical_nulls();

    let mut distinct = DistinctCounter::new();
    let mut frequency = (class == DtypeClass::Categorical).then(FrequencyCounter::new);
    let mut non_null_count = 0u64;
    for row in 0..array.len() {
        if nulls.as_ref().is_some_and(|n| n.is_null(row)) {
            continue;
        }
        non_null_count += 1;
        let rendered = formatter.value(row).try_to_string().map_err(fail)?;
        if let Some(counter) = frequency.as_mut() {
            counter.add(&rendered);
        }
        distinct.add(rendered);
    }
    let null_count = row_count - non_null_count;
    let distinct_count = distinct.count();

    let stats = match class {
        DtypeClass::Numeric => {
            let block = numeric_stats(name, array, non_null_count)?;
            Some(TypedStats::Numeric(block))
        }
        DtypeClass::Datetime => {
            let block = datetime_stats(array, &formatter)
                .map_err(fail)?
                .ok_or_else(|| {
                    DqLensError::computation(name, format!("{} is not temporal", array.data_type()))
                })?;
            Some(TypedStats::Datetime(block))
        }
        DtypeClass::Categorical => {
            frequency.map(|counter| TypedStats::Categorical(counter.top_n(config.top_k)))
        }
        DtypeClass::Unclassified => None,
    };

    let sample_values = sample_values(array, &formatter).map_err(fail)?;

    debug!(
        column = name,
        class = ?class,
        non_null = non_null_count,
        distinct = distinct_count,
        "column profiled"
    );

    Ok(ColumnProfile {
        name: name.to_owned(),
        class,
        position,
        dtype: array.data_type().to_string(),
        non_null_count,
        null_count,
        completeness: ratio(non_null_count, row_count),
        distinct_count,
        uniqueness: ratio(distinct_count, non_null_count),
        sample_values,
        stats,
    })
}

/// widen to f64 without lossy fallbacks; a value that can't be represented is an error, not a null
fn numeric_stats(name: &str, array: &dyn Array, non_null_count: u64) -> Result<NumericStats> {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    let widened = cast_with_options(array, &DataType::Float64, &options)
        .map_err(|e| DqLensError::computation(name, e))?;
    let floats = widened
        .as_primitive_opt::<Float64Type>()
        .ok_or_else(|| DqLensError::computation(name, "cast did not produce Float64"))?;
    let mut acc = NumericAccumulator::with_capacity(non_null_count as usize);
    for v in floats.iter().flatten() {
        acc.add(v);
    }
    acc.finish().map_err(|e| DqLensError::computation(name, e))
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::frequency::FrequencyEntry;
    use arrow::array::{
        BooleanArray, Date32Array, Float64Array, Int32Array, Int64Array, ListArray, StringArray,
    };
    use arrow::datatypes::Int32Type;

    fn cfg() -> ProfileConfig {
        ProfileConfig::default()
    }

    #[test]
    fn numeric_with_null() {
        let a = Int64Array::from(vec![Some(10), Some(20), None]);
        let p = profile_column("n", 0, &a, &cfg()).unwrap();
        assert_eq!(p.non_null_count, 2);
        assert_eq!(p.null_count, 1);
        assert!((p.completeness - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(p.distinct_count, 2);
        assert_eq!(p.uniqueness, 1.0);
        let s = p.numeric_stats().unwrap();
        assert_eq!(s.min, Some(10.0));
        assert_eq!(s.max, Some(20.0));
        assert_eq!(s.mean, Some(15.0));
        assert!((s.std.unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(p.sample_values, vec![SampleValue::Int(10), SampleValue::Int(20)]);
        assert_eq!(p.dtype, "Int64");
    }

    #[test]
    fn empty_numeric_keeps_null_block() {
        let a = Float64Array::from(Vec::<f64>::new());
        let p = profile_column("f", 3, &a, &cfg()).unwrap();
        assert_eq!(p.position, 3);
        assert_eq!(p.completeness, 0.0);
        assert_eq!(p.uniqueness, 0.0);
        assert_eq!(p.numeric_stats(), Some(&NumericStats::default()));
        let json = serde_json::to_value(&p).unwrap();
        assert!(json["numeric_stats"]["mean"].is_null());
        assert!(json.get("categorical_stats").is_none());
    }

    #[test]
    fn all_null_numeric_column() {
        let a = Int32Array::from(vec![None::<i32>, None]);
        let p = profile_column("n", 0, &a, &cfg()).unwrap();
        assert_eq!(p.null_count, 2);
        assert_eq!(p.completeness, 0.0);
        assert_eq!(p.distinct_count, 0);
        assert_eq!(p.numeric_stats(), Some(&NumericStats::default()));
        assert!(p.sample_values.is_empty());
    }

    #[test]
    fn infinite_values_leave_finite_stats() {
        let a = Float64Array::from(vec![f64::INFINITY, 1.0, f64::NEG_INFINITY]);
        let p = profile_column("f", 0, &a, &cfg()).unwrap();
        assert_eq!(p.non_null_count, 3);
        assert_eq!(p.distinct_count, 3);
        let s = p.numeric_stats().unwrap();
        assert_eq!((s.min, s.max, s.mean, s.std), (Some(1.0), Some(1.0), Some(1.0), Some(0.0)));
        let json = serde_json::to_value(&p).unwrap();
        for key in ["min", "max", "mean", "std", "p25", "p50", "p75"] {
            assert!(json["numeric_stats"][key].is_number(), "{key}");
        }
    }

    #[test]
    fn all_nan_column_fails_instead_of_nulling() {
        let a = Float64Array::from(vec![f64::NAN, f64::NAN]);
        let err = profile_column("ratio", 0, &a, &cfg()).unwrap_err();
        assert_eq!(err.kind(), dq_lens_common::ErrorKind::ComputationFailure);
        assert!(err.to_string().contains("'ratio'"));
    }

    #[test]
    fn categorical_top_k() {
        let a = StringArray::from(vec![Some("a"), Some("a"), Some("b"), None, Some("c")]);
        let p = profile_column("s", 0, &a, &cfg().with_top_k(2)).unwrap();
        let top = &p.categorical_stats().unwrap().top_k;
        assert_eq!(
            top,
            &vec![
                FrequencyEntry { value: "a".into(), count: 2 },
                FrequencyEntry { value: "b".into(), count: 1 },
            ]
        );
        assert_eq!(p.distinct_count, 3);
        assert!(p.numeric_stats().is_none());
    }

    #[test]
    fn datetime_block() {
        let a = Date32Array::from(vec![Some(19725), Some(19723), None]);
        let p = profile_column("d", 0, &a, &cfg()).unwrap();
        let s = p.datetime_stats().unwrap();
        assert_eq!(s.min.as_deref(), Some("2024-01-01"));
        assert_eq!(s.max.as_deref(), Some("2024-01-03"));
        assert_eq!(p.sample_values[0], SampleValue::Text("2024-01-03".into()));
    }

    #[test]
    fn unclassified_has_no_block() {
        let a = BooleanArray::from(vec![Some(true), Some(false), Some(true), None]);
        let p = profile_column("b", 0, &a, &cfg()).unwrap();
        assert!(p.stats.is_none());
        assert_eq!(p.distinct_count, 2);
        assert_eq!(p.sample_values, vec![SampleValue::Bool(true), SampleValue::Bool(false)]);
        let json = serde_json::to_value(&p).unwrap();
        for key in ["numeric_stats", "categorical_stats", "datetime_stats"] {
            assert!(json.get(key).is_none(), "{key}");
        }
    }

    #[test]
    fn nested_values_sample_as_text() {
        let a = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
            Some(vec![Some(1), Some(2)]),
            None,
            Some(vec![Some(1), Some(2)]),
        ]);
        let p = profile_column("l", 0, &a, &cfg()).unwrap();
        assert_eq!(p.non_null_count, 2);
        assert_eq!(p.distinct_count, 1);
        assert_eq!(p.sample_values, vec![SampleValue::Text("[1, 2]".into())]);
    }
}

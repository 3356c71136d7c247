//! Flattening of a [`DatasetProfile`] into the rows a persistence layer stores.
//!
//! A dataset yields one [`DatasetRecord`], and every column yields one
//! [`ColumnRecord`] plus one [`ColumnProfileRecord`] whose `metric_payload`
//! carries the samples and whichever typed block the column has.

use crate::dataset::DatasetProfile;
use crate::profile::{CategoricalStats, DatetimeStats, NumericStats, SampleValue, TypedStats};
use dq_lens_common::Result;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub name: String,
    pub stored_path: String,
    pub row_count: u64,
    pub column_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    pub dtype: String,
    pub position: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricPayload {
    pub sample_values: Vec<SampleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<NumericStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical_stats: Option<CategoricalStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime_stats: Option<DatetimeStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfileRecord {
    pub column_name: String,
    pub completeness: f64,
    pub non_null_count: u64,
    pub null_count: u64,
    pub distinct_count: u64,
    pub uniqueness: f64,
    pub metric_payload: MetricPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecords {
    pub dataset: DatasetRecord,
    pub columns: Vec<ColumnRecord>,
    pub profiles: Vec<ColumnProfileRecord>,
}

pub fn flatten_profile(profile: &DatasetProfile) -> ProfileRecords {
    let dataset = DatasetRecord {
        name: profile.dataset_name.clone(),
        stored_path: profile.path.clone(),
        row_count: profile.row_count,
        column_count: profile.column_count,
    };
    let columns = profile
        .columns
        .iter()
        .map(|c| ColumnRecord {
            name: c.name.clone(),
            dtype: c.dtype.clone(),
            position: c.position,
        })
        .collect();
    let profiles = profile
        .columns
        .iter()
        .map(|c| {
            let mut payload = MetricPayload {
                sample_values: c.sample_values.clone(),
                ..MetricPayload::default()
            };
            match &c.stats {
                Some(TypedStats::Numeric(s)) => payload.numeric_stats = Some(s.clone()),
                Some(TypedStats::Categorical(s)) => payload.categorical_stats = Some(s.clone()),
                Some(TypedStats::Datetime(s)) => payload.datetime_stats = Some(s.clone()),
                None => {}
            }
            ColumnProfileRecord {
                column_name: c.name.clone(),
                completeness: c.completeness,
                non_null_count: c.non_null_count,
                null_count: c.null_count,
                distinct_count: c.distinct_count,
                uniqueness: c.uniqueness,
                metric_payload: payload,
            }
        })
        .collect();
    ProfileRecords {
        dataset,
        columns,
        profiles,
    }
}

/// receiver for a finished profile; implemented by whatever stores it
pub trait ProfileSink {
    fn store(&mut self, profile: &DatasetProfile) -> Result<()>;
}

#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Line<'a> {
    Dataset(&'a DatasetRecord),
    Column(&'a ColumnRecord),
    ColumnProfile(&'a ColumnProfileRecord),
}

/// appends one JSON object per record to a file
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileSink for JsonLinesSink {
    fn store(&mut self, profile: &DatasetProfile) -> Result<()> {
        let records = flatten_profile(profile);
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut w = BufWriter::new(file);
        let mut emit = |line: Line<'_>| -> Result<()> {
            serde_json::to_writer(&mut w, &line)?;
            w.write_all(b"\n")?;
            Ok(())
        };
        emit(Line::Dataset(&records.dataset))?;
        for col in &records.columns {
            emit(Line::Column(col))?;
        }
        for prof in &records.profiles {
            emit(Line::ColumnProfile(prof))?;
        }
        w.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::assemble_profile;
    use crate::loader::{LoadedDataset, SourceFormat};
    use arrow::array::{ArrayRef, BooleanArray, StringArray};
    use arrow::record_batch::RecordBatch;
    use dq_lens_common::ProfileConfig;
    use std::sync::Arc;

    fn profile() -> DatasetProfile {
        let table = RecordBatch::try_from_iter(vec![
            ("city", Arc::new(StringArray::from(vec!["x", "y", "x"])) as ArrayRef),
            ("flag", Arc::new(BooleanArray::from(vec![true, false, true])) as ArrayRef),
        ])
        .unwrap();
        let ds = LoadedDataset {
            name: "c.csv".into(),
            path: PathBuf::from("c.csv"),
            format: SourceFormat::Csv,
            table,
        };
        assemble_profile(&ds, &ProfileConfig::default()).unwrap()
    }

    #[test]
    fn flatten_keeps_one_block_per_payload() {
        let r = flatten_profile(&profile());
        assert_eq!(r.dataset.row_count, 3);
        assert_eq!(r.columns.len(), 2);
        assert_eq!(r.columns[1].position, 1);
        let city = &r.profiles[0].metric_payload;
        assert!(city.categorical_stats.is_some());
        assert!(city.numeric_stats.is_none() && city.datetime_stats.is_none());
        let flag = &r.profiles[1].metric_payload;
        let expected = MetricPayload {
            sample_values: vec![SampleValue::Bool(true), SampleValue::Bool(false)],
            ..MetricPayload::default()
        };
        assert_eq!(flag, &expected);
    }

    #[test]
    fn json_lines_sink_writes_tagged_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonLinesSink::new(dir.path().join("records.jsonl"));
        sink.store(&profile()).unwrap();
        let text = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0]["record"], "dataset");
        assert_eq!(lines[0]["name"], "c.csv");
        assert_eq!(lines[1]["record"], "column");
        assert_eq!(lines[3]["record"], "column_profile");
        assert_eq!(lines[3]["metric_payload"]["categorical_stats"]["top_k"][0]["value"], "x");
    }
}

//! Context handed to a natural-language insight generator.
//!
//! The generator itself lives outside this crate. It receives a profile
//! through [`InsightContext`], whose provided implementation lays each
//! column out as one compact JSON object: the base counts plus the samples
//! and whichever typed block the column carries.

use crate::dataset::DatasetProfile;
use crate::records::{flatten_profile, ColumnProfileRecord, MetricPayload};
use dq_lens_common::Result;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// renders a finished profile into prompt-ready text
pub trait InsightContext {
    fn render(&self, profile: &DatasetProfile) -> Result<String>;
}

#[derive(Serialize)]
struct ColumnContext<'a> {
    completeness: f64,
    non_null_count: u64,
    null_count: u64,
    distinct_count: u64,
    uniqueness: f64,
    #[serde(flatten)]
    payload: &'a MetricPayload,
}

impl<'a> From<&'a ColumnProfileRecord> for ColumnContext<'a> {
    fn from(r: &'a ColumnProfileRecord) -> Self {
        Self {
            completeness: r.completeness,
            non_null_count: r.non_null_count,
            null_count: r.null_count,
            distinct_count: r.distinct_count,
            uniqueness: r.uniqueness,
            payload: &r.metric_payload,
        }
    }
}

/// column name -> context, in profile order
struct ColumnMap<'a>(&'a [ColumnProfileRecord]);

impl Serialize for ColumnMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for record in self.0 {
            map.serialize_entry(&record.column_name, &ColumnContext::from(record))?;
        }
        map.end()
    }
}

/// dataset header lines followed by the per-column JSON
#[derive(Debug, Clone, Default)]
pub struct CompactContext {
    pub pretty: bool,
}

impl CompactContext {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl InsightContext for CompactContext {
    fn render(&self, profile: &DatasetProfile) -> Result<String> {
        let records = flatten_profile(profile);
        let columns = ColumnMap(&records.profiles);
        let body = if self.pretty {
            serde_json::to_string_pretty(&columns)?
        } else {
            serde_json::to_string(&columns)?
        };
        let dataset = &records.dataset;
        Ok(format!(
            "Dataset name: {}\nRow count: {}\nColumn count: {}\nColumn profiles:\n{body}\n",
            dataset.name, dataset.row_count, dataset.column_count
        ))
    }
}

use crate::loader::{load_dataset, LoadedDataset};
use crate::profile::{profile_column, ColumnProfile};
use dq_lens_common::{ProfileConfig, Result};
use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::Path;
use tracing::{info, instrument};

/// per-column quality report for one ingestion of one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub dataset_name: String,
    pub path: String,
    pub row_count: u64,
    pub column_count: u64,
    /// physical column order; serialized as a name-keyed map in that order
    #[serde(serialize_with = "columns_as_map")]
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        Ok(out?)
    }
}

fn columns_as_map<S: Serializer>(
    columns: &[ColumnProfile],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(columns.len()))?;
    for col in columns {
        map.serialize_entry(&col.name, col)?;
    }
    map.end()
}

/// load `path` under the row cap and profile every column
#[instrument(skip_all, fields(path = %path.display()))]
pub fn profile_dataset(path: &Path, config: &ProfileConfig) -> Result<DatasetProfile> {
    let dataset = load_dataset(path, config)?;
    let profile = assemble_profile(&dataset, config)?;
    info!(
        rows = profile.row_count,
        columns = profile.column_count,
        "dataset profiled"
    );
    Ok(profile)
}

/// columns are independent, so they are profiled in parallel and gathered back in order
pub fn assemble_profile(dataset: &LoadedDataset, config: &ProfileConfig) -> Result<DatasetProfile> {
    let schema = dataset.table.schema();
    let columns = dataset
        .table
        .columns()
        .par_iter()
        .enumerate()
        .map(|(position, array)| {
            profile_column(schema.field(position).name(), position, array.as_ref(), config)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DatasetProfile {
        dataset_name: dataset.name.clone(),
        path: dataset.path.display().to_string(),
        row_count: dataset.row_count() as u64,
        column_count: columns.len() as u64,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SourceFormat;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::record_batch::RecordBatch;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn loaded(table: RecordBatch) -> LoadedDataset {
        LoadedDataset {
            name: "t.parquet".into(),
            path: PathBuf::from("/data/t.parquet"),
            format: SourceFormat::Parquet,
            table,
        }
    }

    #[test]
    fn columns_keep_physical_order_in_json() {
        let table = RecordBatch::try_from_iter(vec![
            ("zeta", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
            ("alpha", Arc::new(StringArray::from(vec!["a", "b"])) as ArrayRef),
            ("mid", Arc::new(Int64Array::from(vec![3, 3])) as ArrayRef),
        ])
        .unwrap();
        let profile = assemble_profile(&loaded(table), &ProfileConfig::default()).unwrap();
        assert_eq!(profile.column_names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        let json = profile.to_json(false).unwrap();
        let z = json.find("\"zeta\"").unwrap();
        let a = json.find("\"alpha\"").unwrap();
        let m = json.find("\"mid\"").unwrap();
        assert!(z < a && a < m);
        for (i, col) in profile.columns.iter().enumerate() {
            assert_eq!(col.position, i);
        }
    }

    #[test]
    fn top_level_shape() {
        let table = RecordBatch::try_from_iter(vec![(
            "n",
            Arc::new(Int64Array::from(vec![5])) as ArrayRef,
        )])
        .unwrap();
        let profile = assemble_profile(&loaded(table), &ProfileConfig::default()).unwrap();
        let v = serde_json::to_value(&profile).unwrap();
        assert_eq!(v["dataset_name"], "t.parquet");
        assert_eq!(v["path"], "/data/t.parquet");
        assert_eq!(v["row_count"], 1);
        assert_eq!(v["column_count"], 1);
        assert_eq!(v["columns"]["n"]["position"], 0);
        assert_eq!(v["columns"]["n"]["numeric_stats"]["std"], 0.0);
    }
}

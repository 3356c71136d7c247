use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use dq_lens_common::{DqLensError, ProfileConfig, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Csv,
    Parquet,
}

impl SourceFormat {
    /// resolve the format from the file extension alone; nothing is read
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("parquet") | Some("pq") => Ok(SourceFormat::Parquet),
            Some(other) => Err(DqLensError::UnsupportedFormat(format!(
                "'.{other}' ({}); expected .csv, .parquet or .pq",
                path.display()
            ))),
            None => Err(DqLensError::UnsupportedFormat(format!(
                "no file extension on {}",
                path.display()
            ))),
        }
    }
}

/// row-bounded, fully materialized view of one source file
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub name: String,
    pub path: PathBuf,
    pub format: SourceFormat,
    pub table: RecordBatch,
}

impl LoadedDataset {
    pub fn row_count(&self) -> usize {
        self.table.num_rows()
    }

    pub fn column_count(&self) -> usize {
        self.table.num_columns()
    }
}

pub fn load_dataset(path: &Path, config: &ProfileConfig) -> Result<LoadedDataset> {
    let format = SourceFormat::from_path(path)?;
    config.validate()?;
    let table = match format {
        SourceFormat::Csv => read_csv(path, config)?,
        SourceFormat::Parquet => read_parquet(path, config)?,
    };
    check_unique_names(&table.schema())?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    debug!(
        path = %path.display(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "dataset materialized"
    );
    Ok(LoadedDataset {
        name,
        path: path.to_path_buf(),
        format,
        table,
    })
}

fn read_csv(path: &Path, config: &ProfileConfig) -> Result<RecordBatch> {
    let mut file = std::fs::File::open(path)?;
    let format = Format::default().with_header(true);
    // types come from the leading rows only
    let (schema, inferred_from) = format.infer_schema(&mut file, Some(config.infer_schema_rows))?;
    debug!(rows = inferred_from, "csv schema inferred");
    file.rewind()?;
    let schema: SchemaRef = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(config.batch_size)
        .build(file)?;
    collect_bounded(reader, schema, config.row_cap)
}

fn read_parquet(path: &Path, config: &ProfileConfig) -> Result<RecordBatch> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder
        .with_batch_size(config.batch_size)
        .with_limit(config.row_cap)
        .build()?;
    collect_bounded(reader, schema, config.row_cap)
}

/// pull batches until row_cap rows are held; the batch crossing the cap is sliced
fn collect_bounded<I>(mut batches: I, schema: SchemaRef, row_cap: usize) -> Result<RecordBatch>
where
    I: Iterator<Item = std::result::Result<RecordBatch, ArrowError>>,
{
    let mut kept = Vec::new();
    let mut remaining = row_cap;
    while remaining > 0 {
        let Some(batch) = batches.next() else { break };
        let batch = batch?;
        let take = batch.num_rows().min(remaining);
        remaining -= take;
        kept.push(if take < batch.num_rows() {
            batch.slice(0, take)
        } else {
            batch
        });
    }
    Ok(concat_batches(&schema, &kept)?)
}

fn check_unique_names(schema: &SchemaRef) -> Result<()> {
    let mut seen = HashSet::new();
    for field in schema.fields() {
        if !seen.insert(field.name().as_str()) {
            return Err(DqLensError::Read(format!(
                "duplicate column name '{}'",
                field.name()
            )));
        }
    }
    Ok(())
}

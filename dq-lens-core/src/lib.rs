pub mod classify;
pub mod dataset;
pub mod export;
pub mod insights;
pub mod loader;
pub mod profile;
pub mod records;
pub mod sample;

pub use classify::{classify, DtypeClass};
pub use dataset::{assemble_profile, profile_dataset, DatasetProfile};
pub use dq_lens_common::{DqLensError, ErrorKind, ProfileConfig, Result};
pub use export::{print_summary, summary_table, write_json, Summary};
pub use insights::{CompactContext, InsightContext};
pub use loader::{load_dataset, LoadedDataset, SourceFormat};
pub use profile::{
    CategoricalStats, ColumnProfile, DatetimeStats, FrequencyEntry, NumericStats, SampleValue,
    TypedStats,
};
pub use records::{
    flatten_profile, ColumnProfileRecord, ColumnRecord, DatasetRecord, JsonLinesSink,
    MetricPayload, ProfileRecords, ProfileSink,
};
pub use sample::{sample_values, Sampler, MAX_SAMPLES};

pub mod cardinality;
pub mod column;
pub mod frequency;
pub mod numeric;
pub mod temporal;
pub mod value;

pub use cardinality::DistinctCounter;
pub use column::{profile_column, ColumnProfile, TypedStats};
pub use frequency::{CategoricalStats, FrequencyCounter, FrequencyEntry};
pub use numeric::{NumericAccumulator, NumericError, NumericStats};
pub use temporal::DatetimeStats;
pub use value::SampleValue;

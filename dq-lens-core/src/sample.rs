use crate::profile::value::{sample_value_at, SampleValue};
use arrow::array::Array;
use arrow::error::ArrowError;
use arrow::util::display::ArrayFormatter;

pub const MAX_SAMPLES: usize = 5;

/// first `capacity` distinct non-null values of a column, in first-seen order
pub struct Sampler {
    capacity: usize,
    keys: Vec<String>,
    values: Vec<SampleValue>,
}

impl Sampler {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    /// offer a non-null cell; `rendered` is its canonical display form
    pub fn offer(&mut self, array: &dyn Array, row: usize, rendered: &str) {
        if self.is_full() || self.keys.iter().any(|k| k == rendered) {
            return;
        }
        self.keys.push(rendered.to_owned());
        self.values.push(sample_value_at(array, row, rendered));
    }

    pub fn finish(self) -> Vec<SampleValue> {
        self.values
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(MAX_SAMPLES)
    }
}

/// standalone pass over an array; stops scanning once full
pub fn sample_values(
    array: &dyn Array,
    formatter: &ArrayFormatter<'_>,
) -> Result<Vec<SampleValue>, ArrowError> {
    let nulls = array.logical_nulls();
    let mut sampler = Sampler::default();
    for row in 0..array.len() {
        if sampler.is_full() {
            break;
        }
        if nulls.as_ref().is_some_and(|n| n.is_null(row)) {
            continue;
        }
        let rendered = formatter.value(row).try_to_string()?;
        sampler.offer(array, row, &rendered);
    }
    Ok(sampler.finish())
}

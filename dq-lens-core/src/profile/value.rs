use arrow::array::{Array, AsArray};
use arrow::datatypes::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// a single observed cell, kept in its native JSON kind where one exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Bool(b) => write!(f, "{b}"),
            SampleValue::Int(i) => write!(f, "{i}"),
            SampleValue::UInt(u) => write!(f, "{u}"),
            SampleValue::Float(x) => write!(f, "{x}"),
            SampleValue::Text(s) => f.write_str(s),
        }
    }
}

/// read row `row` of `array`; `rendered` is the canonical display form used for
/// every type without a native JSON scalar (and for non-finite floats, which JSON can't carry)
pub fn sample_value_at(array: &dyn Array, row: usize, rendered: &str) -> SampleValue {
    let float = |v: f64| {
        if v.is_finite() {
            SampleValue::Float(v)
        } else {
            SampleValue::Text(rendered.to_owned())
        }
    };
    let value = match array.data_type() {
        DataType::Boolean => array.as_boolean_opt().map(|a| SampleValue::Bool(a.value(row))),
        DataType::Int8 => array.as_primitive_opt::<Int8Type>().map(|a| SampleValue::Int(a.value(row) as i64)),
        DataType::Int16 => array.as_primitive_opt::<Int16Type>().map(|a| SampleValue::Int(a.value(row) as i64)),
        DataType::Int32 => array.as_primitive_opt::<Int32Type>().map(|a| SampleValue::Int(a.value(row) as i64)),
        DataType::Int64 => array.as_primitive_opt::<Int64Type>().map(|a| SampleValue::Int(a.value(row))),
        DataType::UInt8 => array.as_primitive_opt::<UInt8Type>().map(|a| SampleValue::UInt(a.value(row) as u64)),
        DataType::UInt16 => array.as_primitive_opt::<UInt16Type>().map(|a| SampleValue::UInt(a.value(row) as u64)),
        DataType::UInt32 => array.as_primitive_opt::<UInt32Type>().map(|a| SampleValue::UInt(a.value(row) as u64)),
        DataType::UInt64 => array.as_primitive_opt::<UInt64Type>().map(|a| SampleValue::UInt(a.value(row))),
        DataType::Float16 => array
            .as_primitive_opt::<Float16Type>()
            .map(|a| float(a.value(row).to_f64())),
        DataType::Float32 => array
            .as_primitive_opt::<Float32Type>()
            .map(|a| float(a.value(row) as f64)),
        DataType::Float64 => array.as_primitive_opt::<Float64Type>().map(|a| float(a.value(row))),
        _ => None,
    };
    value.unwrap_or_else(|| SampleValue::Text(rendered.to_owned()))
}

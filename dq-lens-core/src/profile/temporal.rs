use arrow::array::{Array, AsArray, PrimitiveArray};
use arrow::datatypes::*;
use arrow::error::ArrowError;
use arrow::util::display::ArrayFormatter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatetimeStats {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// earliest and latest instant, rendered through `formatter`; None for a non-temporal array
pub fn datetime_stats(
    array: &dyn Array,
    formatter: &ArrayFormatter<'_>,
) -> Result<Option<DatetimeStats>, ArrowError> {
    let extremes = match array.data_type() {
        DataType::Date32 => array.as_primitive_opt::<Date32Type>().map(arg_extremes),
        DataType::Date64 => array.as_primitive_opt::<Date64Type>().map(arg_extremes),
        DataType::Timestamp(TimeUnit::Second, _) => array
            .as_primitive_opt::<TimestampSecondType>()
            .map(arg_extremes),
        DataType::Timestamp(TimeUnit::Millisecond, _) => array
            .as_primitive_opt::<TimestampMillisecondType>()
            .map(arg_extremes),
        DataType::Timestamp(TimeUnit::Microsecond, _) => array
            .as_primitive_opt::<TimestampMicrosecondType>()
            .map(arg_extremes),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => array
            .as_primitive_opt::<TimestampNanosecondType>()
            .map(arg_extremes),
        _ => None,
    };
    let Some(extremes) = extremes else {
        return Ok(None);
    };
    Ok(Some(match extremes {
        Some((lo, hi)) => DatetimeStats {
            min: Some(formatter.value(lo).try_to_string()?),
            max: Some(formatter.value(hi).try_to_string()?),
        },
        None => DatetimeStats::default(),
    }))
}

/// row indices of the first minimum and first maximum among non-null slots
fn arg_extremes<T: ArrowPrimitiveType>(array: &PrimitiveArray<T>) -> Option<(usize, usize)>
where
    T::Native: PartialOrd,
{
    let mut out: Option<(usize, T::Native, usize, T::Native)> = None;
    for (row, v) in array.iter().enumerate() {
        let Some(v) = v else { continue };
        out = Some(match out {
            None => (row, v, row, v),
            Some((lo, lo_v, hi, hi_v)) => {
                let (lo, lo_v) = if v < lo_v { (row, v) } else { (lo, lo_v) };
                let (hi, hi_v) = if v > hi_v { (row, v) } else { (hi, hi_v) };
                (lo, lo_v, hi, hi_v)
            }
        });
    }
    out.map(|(lo, _, hi, _)| (lo, hi))
}

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

/// statistics class a column is profiled under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtypeClass {
    Numeric,
    Datetime,
    Categorical,
    Unclassified,
}

impl DtypeClass {
    pub fn has_typed_block(self) -> bool {
        !matches!(self, DtypeClass::Unclassified)
    }
}

/// map a physical arrow type onto its statistics class; total over DataType
pub fn classify(data_type: &DataType) -> DtypeClass {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => DtypeClass::Numeric,
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => DtypeClass::Datetime,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => DtypeClass::Categorical,
        // dictionary-encoded text counts as categorical, other dictionaries do not
        DataType::Dictionary(_, value) => match value.as_ref() {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => DtypeClass::Categorical,
            _ => DtypeClass::Unclassified,
        },
        DataType::Null
        | DataType::Boolean
        | DataType::Time32(_)
        | DataType::Time64(_)
        | DataType::Duration(_)
        | DataType::Interval(_)
        | DataType::Binary
        | DataType::FixedSizeBinary(_)
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::List(_)
        | DataType::ListView(_)
        | DataType::FixedSizeList(_, _)
        | DataType::LargeList(_)
        | DataType::LargeListView(_)
        | DataType::Struct(_)
        | DataType::Union(_, _)
        | DataType::Map(_, _)
        | DataType::RunEndEncoded(_, _) => DtypeClass::Unclassified,
    }
}

use arrow::array::*;
use arrow::buffer::NullBuffer;
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type,
    Int64Type, Int8Type, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde::{Serialize, Serializer};
use std::fmt;

/// Hashable, equality-comparable form of one non-missing value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Boolean(bool),
    Int(i64),
    UInt(u64),
    Float(FloatKey),
    Utf8(String),
    Binary(Vec<u8>),
    /// temporal, decimal and interval values, keyed by their rendering
    Formatted(String),
}

/// f64 keyed by bit pattern: `-0.0` folds onto `0.0` and every NaN onto one NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloatKey(u64);

impl FloatKey {
    pub fn new(v: f64) -> Self {
        let v = if v.is_nan() {
            f64::NAN
        } else if v == 0.0 {
            0.0
        } else {
            v
        };
        Self(v.to_bits())
    }

    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl Serialize for FloatKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Value(Scalar),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::UInt(u) => write!(f, "{u}"),
            Scalar::Float(k) => write!(f, "{:?}", k.value()),
            Scalar::Utf8(s) => write!(f, "{s:?}"),
            Scalar::Binary(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Scalar::Formatted(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => v.fmt(f),
            Cell::Missing => f.write_str("<missing>"),
        }
    }
}

type ReadFn<'a> = Box<dyn Fn(usize) -> Scalar + 'a>;

/// Reads the cells of a column whose values can be frequency keys.
pub struct CellReader<'a> {
    len: usize,
    nulls: Option<NullBuffer>,
    read: ReadFn<'a>,
}

impl<'a> CellReader<'a> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cell(&self, row: usize) -> Cell {
        if self.nulls.as_ref().is_some_and(|n| n.is_null(row)) {
            Cell::Missing
        } else {
            Cell::Value((self.read)(row))
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.len).map(|row| self.cell(row))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnhashableColumn {
    pub data_type: DataType,
    pub reason: String,
}

/// Result of the per-column capability check.
pub enum Countability<'a> {
    Countable(CellReader<'a>),
    Uncountable(UnhashableColumn),
}

/// Decides whether a column's values can be used as frequency keys. Dictionary
/// columns must be decoded by the caller first.
pub fn classify(array: &dyn Array) -> Countability<'_> {
    let read = match array.data_type() {
        // never read: every cell of a Null column is missing
        DataType::Null => Some(Box::new(|_row: usize| Scalar::Formatted(String::new())) as ReadFn<'_>),
        DataType::Boolean => array
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Boolean(a.value(row))) as ReadFn<'_>),
        DataType::Int8 => signed::<Int8Type>(array),
        DataType::Int16 => signed::<Int16Type>(array),
        DataType::Int32 => signed::<Int32Type>(array),
        DataType::Int64 => signed::<Int64Type>(array),
        DataType::UInt8 => unsigned::<UInt8Type>(array),
        DataType::UInt16 => unsigned::<UInt16Type>(array),
        DataType::UInt32 => unsigned::<UInt32Type>(array),
        DataType::UInt64 => unsigned::<UInt64Type>(array),
        DataType::Float16 => float::<Float16Type>(array),
        DataType::Float32 => float::<Float32Type>(array),
        DataType::Float64 => float::<Float64Type>(array),
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Utf8(a.value(row).to_owned())) as ReadFn<'_>),
        DataType::LargeUtf8 => array
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Utf8(a.value(row).to_owned())) as ReadFn<'_>),
        DataType::Utf8View => array
            .as_any()
            .downcast_ref::<StringViewArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Utf8(a.value(row).to_owned())) as ReadFn<'_>),
        DataType::Binary => array
            .as_any()
            .downcast_ref::<BinaryArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Binary(a.value(row).to_vec())) as ReadFn<'_>),
        DataType::LargeBinary => array
            .as_any()
            .downcast_ref::<LargeBinaryArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Binary(a.value(row).to_vec())) as ReadFn<'_>),
        DataType::BinaryView => array
            .as_any()
            .downcast_ref::<BinaryViewArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Binary(a.value(row).to_vec())) as ReadFn<'_>),
        DataType::FixedSizeBinary(_) => array
            .as_any()
            .downcast_ref::<FixedSizeBinaryArray>()
            .map(|a| Box::new(move |row: usize| Scalar::Binary(a.value(row).to_vec())) as ReadFn<'_>),
        DataType::Date32
        | DataType::Date64
        | DataType::Time32(_)
        | DataType::Time64(_)
        | DataType::Timestamp(_, _)
        | DataType::Duration(_)
        | DataType::Interval(_)
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => formatted(array),
        _ => None,
    };
    match read {
        Some(read) => Countability::Countable(CellReader {
            len: array.len(),
            nulls: array.logical_nulls(),
            read,
        }),
        None => Countability::Uncountable(UnhashableColumn {
            data_type: array.data_type().clone(),
            reason: format!(
                "values of type {} cannot be used as frequency keys",
                array.data_type()
            ),
        }),
    }
}

/// Arrow logical nulls, so Null-typed and dictionary columns count correctly.
pub fn missing_count(array: &dyn Array) -> usize {
    array.logical_nulls().map(|n| n.null_count()).unwrap_or(0)
}

fn signed<T>(array: &dyn Array) -> Option<ReadFn<'_>>
where
    T: ArrowPrimitiveType,
    T::Native: Into<i64>,
{
    let a = array.as_any().downcast_ref::<PrimitiveArray<T>>()?;
    Some(Box::new(move |row: usize| Scalar::Int(a.value(row).into())))
}

fn unsigned<T>(array: &dyn Array) -> Option<ReadFn<'_>>
where
    T: ArrowPrimitiveType,
    T::Native: Into<u64>,
{
    let a = array.as_any().downcast_ref::<PrimitiveArray<T>>()?;
    Some(Box::new(move |row: usize| Scalar::UInt(a.value(row).into())))
}

fn float<T>(array: &dyn Array) -> Option<ReadFn<'_>>
where
    T: ArrowPrimitiveType,
    T::Native: Into<f64>,
{
    let a = array.as_any().downcast_ref::<PrimitiveArray<T>>()?;
    Some(Box::new(move |row: usize| Scalar::Float(FloatKey::new(a.value(row).into()))))
}

fn formatted(array: &dyn Array) -> Option<ReadFn<'_>> {
    let fmt = ArrayFormatter::try_new(array, &FormatOptions::default()).ok()?;
    Some(Box::new(move |row: usize| Scalar::Formatted(fmt.value(row).to_string())))
}

use super::cell::{classify, missing_count, Countability};
use super::frequency::{FrequencyCounter, MissingPolicy, ValueCount};
use arrow::array::{Array, ArrayRef};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Per-column profile. `value_counts` is always complete; truncation is a
/// rendering concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    #[serde(serialize_with = "serialize_data_type")]
    pub declared_type: DataType,
    pub total_rows: u64,
    pub non_null_count: u64,
    pub unique_count: u64,
    pub value_counts: Vec<ValueCount>,
    pub countable: bool, // false when the values could not be used as keys
}

fn serialize_data_type<S: Serializer>(dt: &DataType, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(dt)
}

impl ColumnProfile {
    pub fn missing_count(&self) -> u64 {
        self.total_rows - self.non_null_count
    }

    /// 0.0 for a zero-row column
    pub fn non_null_ratio(&self) -> f64 {
        if self.total_rows > 0 {
            self.non_null_count as f64 / self.total_rows as f64
        } else {
            0.0
        }
    }

    pub fn is_emptyish(&self) -> bool {
        self.unique_count == 0
    }

    pub fn top(&self, n: usize) -> &[ValueCount] {
        &self.value_counts[..n.min(self.value_counts.len())]
    }
}

pub fn profile_column(field: &Field, array: &ArrayRef, policy: MissingPolicy) -> ColumnProfile {
    let total_rows = array.len() as u64;
    let non_null_count = total_rows - missing_count(array.as_ref()) as u64;
    let value_counts = match decode_dictionary(array) {
        Ok(values) => match classify(values.as_ref()) {
            Countability::Countable(reader) => {
                let mut counter = FrequencyCounter::new(policy);
                counter.extend(reader.cells());
                Some(counter.finish())
            }
            Countability::Uncountable(u) => {
                warn!(column = %field.name(), "{}; reporting zero cardinality", u.reason);
                None
            }
        },
        Err(e) => {
            warn!(column = %field.name(), "could not decode dictionary values: {e}; reporting zero cardinality");
            None
        }
    };
    let countable = value_counts.is_some();
    let value_counts = value_counts.unwrap_or_default();
    debug!(
        column = %field.name(),
        rows = total_rows,
        non_null = non_null_count,
        unique = value_counts.len(),
        "profiled column"
    );
    ColumnProfile {
        name: field.name().clone(),
        declared_type: field.data_type().clone(),
        total_rows,
        non_null_count,
        unique_count: value_counts.len() as u64,
        value_counts,
        countable,
    }
}

/// dictionary columns are counted by value, not by key
fn decode_dictionary(array: &ArrayRef) -> Result<ArrayRef, arrow::error::ArrowError> {
    match array.data_type() {
        DataType::Dictionary(_, value_type) => cast(array, value_type),
        _ => Ok(array.clone()),
    }
}

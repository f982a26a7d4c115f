pub mod cell;
pub mod column;
pub mod frequency;
pub mod report;

pub use cell::{classify, Cell, CellReader, Countability, FloatKey, Scalar, UnhashableColumn};
pub use column::{profile_column, ColumnProfile};
pub use frequency::{FrequencyCounter, MissingPolicy, ValueCount};
pub use report::{profile, profile_dataset, profile_file, DatasetReport, ProfileOptions};

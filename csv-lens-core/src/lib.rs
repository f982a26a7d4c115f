pub mod dataset;
pub mod export;
pub mod profile;
pub mod render;

pub use csv_lens_common::{CsvLensError, Result};
pub use dataset::{Dataset, LoadOptions, SourceFormat, DEFAULT_NULL_MARKERS};
pub use export::{export_csv, export_json, to_json_string, write_csv};
pub use profile::{
    profile, profile_dataset, profile_file, Cell, ColumnProfile, DatasetReport, MissingPolicy,
    ProfileOptions, Scalar, ValueCount,
};
pub use render::{render_column, render_header, render_report, write_report};

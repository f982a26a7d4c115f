use super::column::{profile_column, ColumnProfile};
use super::frequency::MissingPolicy;
use crate::dataset::{Dataset, LoadOptions};
use csv_lens_common::{Config, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Explicit knobs for one profiling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileOptions {
    /// how many value counts the renderer lists; the profile itself keeps all of them
    pub max_values: usize,
    pub include_missing: bool,
    pub parallel: bool,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            max_values: 10,
            include_missing: true,
            parallel: true,
        }
    }
}

impl ProfileOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            max_values: cfg.display.max_values,
            include_missing: cfg.display.include_missing,
            parallel: cfg.profiling.parallel,
        }
    }

    pub fn missing_policy(&self) -> MissingPolicy {
        MissingPolicy::from_include(self.include_missing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub source: String,
    pub total_rows: u64,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
}

/// One profile per column, in the dataset's column order.
pub fn profile(dataset: &Dataset, opts: &ProfileOptions) -> Vec<ColumnProfile> {
    let policy = opts.missing_policy();
    let columns: Vec<_> = dataset.columns().collect();
    if opts.parallel {
        // indexed par_iter keeps input order on collect
        columns
            .par_iter()
            .map(|(field, array)| profile_column(field, array, policy))
            .collect()
    } else {
        columns
            .iter()
            .map(|(field, array)| profile_column(field, array, policy))
            .collect()
    }
}

pub fn profile_dataset(dataset: &Dataset, opts: &ProfileOptions) -> DatasetReport {
    DatasetReport {
        source: dataset.source().to_owned(),
        total_rows: dataset.num_rows() as u64,
        column_count: dataset.num_columns(),
        columns: profile(dataset, opts),
    }
}

/// Loads then profiles; a load failure aborts the run before any column is profiled.
pub fn profile_file(
    path: &Path,
    load: &LoadOptions,
    opts: &ProfileOptions,
    columns: Option<&[String]>,
) -> Result<DatasetReport> {
    let mut dataset = Dataset::load(path, load)?;
    if let Some(names) = columns {
        dataset = dataset.select(names)?;
    }
    Ok(profile_dataset(&dataset, opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, BooleanArray, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn sample() -> Dataset {
        let schema = Arc::new(Schema::new(vec![
            Field::new("letter", DataType::Utf8, true),
            Field::new("n", DataType::Int64, true),
            Field::new("flag", DataType::Boolean, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![Some("a"), Some("b"), None, Some("a")])),
            Arc::new(Int64Array::from(vec![Some(1), Some(1), Some(2), None])),
            Arc::new(BooleanArray::from(vec![None::<bool>; 4])),
        ];
        Dataset::from_batch("mem", RecordBatch::try_new(schema, columns).unwrap())
    }

    #[test]
    fn one_profile_per_column_in_order() {
        let report = profile_dataset(&sample(), &ProfileOptions::default());
        assert_eq!(report.column_count, 3);
        assert_eq!(report.total_rows, 4);
        let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["letter", "n", "flag"]);
        for c in &report.columns {
            assert_eq!(c.total_rows, 4);
            assert_eq!(c.non_null_count + c.missing_count(), c.total_rows);
            assert_eq!(c.value_counts.iter().map(|v| v.count).sum::<u64>(), c.total_rows);
            assert_eq!(c.unique_count as usize, c.value_counts.len());
        }
    }

    #[test]
    fn excluding_missing_sums_to_non_null() {
        let opts = ProfileOptions {
            include_missing: false,
            ..ProfileOptions::default()
        };
        let report = profile_dataset(&sample(), &opts);
        for c in &report.columns {
            assert_eq!(c.value_counts.iter().map(|v| v.count).sum::<u64>(), c.non_null_count);
        }
        assert_eq!(report.columns[2].unique_count, 0);
    }

    #[test]
    fn parallel_matches_sequential_and_is_repeatable() {
        let ds = sample();
        let par = profile(&ds, &ProfileOptions::default());
        let seq = profile(
            &ds,
            &ProfileOptions {
                parallel: false,
                ..ProfileOptions::default()
            },
        );
        assert_eq!(par, seq);
        let again = profile(&ds, &ProfileOptions::default());
        assert_eq!(
            serde_json::to_string(&par).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }

    #[test]
    fn empty_dataset_profiles_to_nothing() {
        let report = profile_dataset(&Dataset::empty("mem"), &ProfileOptions::default());
        assert!(report.columns.is_empty());
        assert_eq!(report.total_rows, 0);
    }

    #[test]
    fn options_follow_config() {
        let mut cfg = Config::default();
        cfg.display.max_values = 0;
        cfg.display.include_missing = false;
        cfg.profiling.parallel = false;
        let opts = ProfileOptions::from_config(&cfg);
        assert_eq!(opts.max_values, 0);
        assert_eq!(opts.missing_policy(), MissingPolicy::Exclude);
        assert!(!opts.parallel);
    }
}

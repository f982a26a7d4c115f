use arrow::array::ArrayRef;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use csv_lens_common::{CsvLensError, LoadingConfig, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use regex::Regex;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Markers read as missing, matching what pandas treats as NA by default.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited { delimiter: u8 },
    Parquet,
}

impl SourceFormat {
    /// picks the reader from the file extension; an explicit delimiter forces delimited text
    pub fn detect(path: &Path, delimiter: Option<u8>) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match (ext.as_deref(), delimiter) {
            (_, Some(d)) => Self::Delimited { delimiter: d },
            (Some("parquet") | Some("pq"), None) => Self::Parquet,
            (Some("tsv") | Some("tab"), None) => Self::Delimited { delimiter: b'\t' },
            _ => Self::Delimited { delimiter: b',' },
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub has_header: bool,
    pub null_markers: Vec<String>,
    pub infer_schema_rows: Option<usize>, // None scans every row
    pub batch_size: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect(),
            infer_schema_rows: None,
            batch_size: 8192,
        }
    }
}

impl LoadOptions {
    pub fn from_config(cfg: &LoadingConfig) -> Result<Self> {
        let delimiter = cfg.delimiter.map(delimiter_byte).transpose()?;
        let mut opts = Self {
            delimiter,
            has_header: cfg.has_header,
            infer_schema_rows: cfg.infer_schema_rows,
            ..Self::default()
        };
        if let Some(markers) = &cfg.null_markers {
            opts.null_markers = markers.clone();
        }
        Ok(opts)
    }

    /// one anchored alternation so inference and parsing agree on what is missing
    pub fn null_regex(&self) -> Result<Regex> {
        let alternatives: Vec<String> = self.null_markers.iter().map(|m| regex::escape(m)).collect();
        Regex::new(&format!("^(?:{})$", alternatives.join("|")))
            .map_err(|e| CsvLensError::Config(format!("invalid null markers: {e}")))
    }
}

pub fn delimiter_byte(c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CsvLensError::Config(format!("delimiter must be a single ASCII character, got {c:?}")))
    }
}

/// An in-memory table: every column has the same length.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    batch: RecordBatch,
}

impl Dataset {
    pub fn from_batch(source: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            source: source.into(),
            batch,
        }
    }

    pub fn empty(source: impl Into<String>) -> Self {
        Self::from_batch(source, RecordBatch::new_empty(Arc::new(Schema::empty())))
    }

    /// Loads a delimited or Parquet file. Every failure is wrapped as a load failure
    /// carrying the path.
    pub fn load(path: &Path, opts: &LoadOptions) -> Result<Self> {
        let format = SourceFormat::detect(path, opts.delimiter);
        let batch = match format {
            SourceFormat::Parquet => read_parquet(path, opts.batch_size),
            SourceFormat::Delimited { delimiter } => read_delimited(path, delimiter, opts),
        }
        .map_err(|e| CsvLensError::load(path, e))?;
        debug!(
            path = %path.display(),
            ?format,
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "loaded dataset"
        );
        Ok(Self::from_batch(path.display().to_string(), batch))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// (field, values) pairs in declared order
    pub fn columns(&self) -> impl Iterator<Item = (&Field, &ArrayRef)> + '_ {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.as_ref())
            .zip(self.batch.columns())
    }

    /// Keeps only the named columns, in the order given.
    pub fn select(&self, names: &[String]) -> Result<Self> {
        let schema = self.batch.schema_ref();
        let indices = names
            .iter()
            .map(|n| {
                schema
                    .index_of(n)
                    .map_err(|_| CsvLensError::UnknownColumn(n.clone()))
            })
            .collect::<Result<Vec<usize>>>()?;
        let batch = self.batch.project(&indices)?;
        Ok(Self::from_batch(self.source.clone(), batch))
    }
}

fn read_delimited(path: &Path, delimiter: u8, opts: &LoadOptions) -> Result<RecordBatch> {
    let mut file = std::fs::File::open(path)?;
    let format = Format::default()
        .with_header(opts.has_header)
        .with_delimiter(delimiter)
        .with_null_regex(opts.null_regex()?);
    let (schema, _records) = format.infer_schema(&mut file, opts.infer_schema_rows)?;
    file.rewind()?;
    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(opts.batch_size)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

fn read_parquet(path: &Path, batch_size: usize) -> Result<RecordBatch> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(CsvLensError::Parquet)?;
    let schema = builder.schema().clone();
    let reader = builder
        .with_batch_size(batch_size)
        .build()
        .map_err(CsvLensError::Parquet)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

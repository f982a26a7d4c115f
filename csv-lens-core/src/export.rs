use crate::profile::DatasetReport;
use csv_lens_common::{CsvLensError, Result};
use std::io::Write;
use std::path::Path;

pub fn to_json_string(report: &DatasetReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| CsvLensError::Other(e.to_string()))
}

pub fn export_json(output_path: &Path, report: &DatasetReport) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, report).map_err(|e| CsvLensError::Other(e.to_string()))?;
    writeln!(file)?;
    Ok(())
}

/// One summary row per column; the top value is the first entry of the value counts.
pub fn export_csv(output_path: &Path, report: &DatasetReport) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    write_csv(&mut file, report)?;
    Ok(())
}

pub fn write_csv<W: Write>(w: &mut W, report: &DatasetReport) -> std::io::Result<()> {
    writeln!(w, "column_name,dtype,total_rows,non_null,non_null_ratio,unique_count,top_value,top_count")?;
    for col in &report.columns {
        let top = col.value_counts.first();
        writeln!(
            w,
            "{},{},{},{},{:.4},{},{},{}",
            csv_escape(&col.name),
            csv_escape(&col.declared_type.to_string()),
            col.total_rows,
            col.non_null_count,
            col.non_null_ratio(),
            col.unique_count,
            top.map_or(String::new(), |t| csv_escape(&t.value.to_string())),
            top.map_or(String::new(), |t| t.count.to_string()),
        )?;
    }
    Ok(())
}

// wrap in quotes if the field contains a comma, quote, or newline
fn csv_escape(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') || raw.contains('\r') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

use crate::profile::{ColumnProfile, DatasetReport};
use std::fmt::Write as _;
use std::io::Write;

/// Text block for one column, ending with a blank line.
pub fn render_column(profile: &ColumnProfile, max_values: usize) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_column(&mut out, profile, max_values);
    out
}

fn write_column(out: &mut String, p: &ColumnProfile, max_values: usize) -> std::fmt::Result {
    writeln!(out, "Column: {}", p.name)?;
    writeln!(out, "  - dtype: {}", p.declared_type)?;
    writeln!(
        out,
        "  - non-null: {} ({:.2}%)",
        p.non_null_count,
        p.non_null_ratio() * 100.0
    )?;
    writeln!(out, "  - unique values: {}", p.unique_count)?;
    if p.is_emptyish() {
        writeln!(out, "  - NOTE: column contains no values")?;
    } else if p.unique_count <= max_values as u64 {
        for vc in &p.value_counts {
            writeln!(out, "    {}: {}", vc.value, vc.count)?;
        }
    } else {
        writeln!(out, "  - Top {max_values} values:")?;
        for vc in p.top(max_values) {
            writeln!(out, "    {}: {}", vc.value, vc.count)?;
        }
        let remaining = p.unique_count - max_values as u64;
        writeln!(out, "  - ...and {remaining} more unique values (not shown)")?;
    }
    writeln!(out)
}

pub fn render_header(report: &DatasetReport) -> String {
    format!(
        "File: {}\nRows: {}\nColumns: {}\n\n",
        report.source, report.total_rows, report.column_count
    )
}

pub fn render_report(report: &DatasetReport, max_values: usize) -> String {
    let mut out = render_header(report);
    for column in &report.columns {
        out.push_str(&render_column(column, max_values));
    }
    out
}

pub fn write_report<W: Write>(w: &mut W, report: &DatasetReport, max_values: usize) -> std::io::Result<()> {
    w.write_all(render_header(report).as_bytes())?;
    for column in &report.columns {
        w.write_all(render_column(column, max_values).as_bytes())?;
    }
    w.flush()
}

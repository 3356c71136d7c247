use crate::dataset::DatasetProfile;
use crate::profile::TypedStats;
use dq_lens_common::Result;
use std::fmt;
use std::io::Write;
use std::path::Path;

// --- headless summary output ---

/// fixed-width per-column table
pub struct Summary<'a>(pub &'a DatasetProfile);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.0;
        writeln!(f, "{:<16} {}", "Dataset:", profile.dataset_name)?;
        writeln!(f, "{:<16} {}", "Rows:", profile.row_count)?;
        writeln!(f, "{:<16} {}", "Columns:", profile.column_count)?;
        writeln!(
            f,
            "{:<24} {:<28} {:>10} {:>10} {:>10}  {}",
            "column", "dtype", "complete", "distinct", "unique", "highlight"
        )?;
        for col in &profile.columns {
            writeln!(
                f,
                "{:<24} {:<28} {:>9.2}% {:>10} {:>9.2}%  {}",
                truncate(&col.name, 24),
                truncate(&col.dtype, 28),
                col.completeness * 100.0,
                col.distinct_count,
                col.uniqueness * 100.0,
                highlight(col.stats.as_ref()),
            )?;
        }
        Ok(())
    }
}

pub fn summary_table(profile: &DatasetProfile) -> String {
    Summary(profile).to_string()
}

pub fn print_summary(profile: &DatasetProfile) {
    print!("{}", Summary(profile));
}

fn highlight(stats: Option<&TypedStats>) -> String {
    match stats {
        Some(TypedStats::Numeric(s)) => match (s.min, s.mean, s.max) {
            (Some(min), Some(mean), Some(max)) => format!("min={min} mean={mean:.3} max={max}"),
            _ => "no values".into(),
        },
        Some(TypedStats::Categorical(s)) => match s.top_k.first() {
            Some(top) => format!("top='{}' x{}", top.value, top.count),
            None => "no values".into(),
        },
        Some(TypedStats::Datetime(s)) => match (&s.min, &s.max) {
            (Some(min), Some(max)) => format!("{min} .. {max}"),
            _ => "no values".into(),
        },
        None => "-".into(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_owned()
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
        t.push('~');
        t
    }
}

// --- JSON export ---

pub fn write_json(output_path: &Path, profile: &DatasetProfile, pretty: bool) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    if pretty {
        serde_json::to_writer_pretty(&mut file, profile)?;
    } else {
        serde_json::to_writer(&mut file, profile)?;
    }
    writeln!(file)?;
    Ok(())
}

//! Flat per-hit table written between the parse and matrix stages.

use std::fs::{self, File, Permissions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{HitError, Result};
use crate::hit_record::HitRecord;

/// Columns the matrix stage cannot work without
pub const REQUIRED_COLUMNS: [&str; 2] = ["Query ID", "Target"];

/// Delimiter choice for written tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TableFormat {
    #[default]
    Tsv,
    Csv,
}

impl TableFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            TableFormat::Tsv => b'\t',
            TableFormat::Csv => b',',
        }
    }
}

/// Write `path` through a temporary file in the same directory so a failed
/// run never leaves a truncated table behind.
pub fn write_atomically<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().set_permissions(output_permissions(path, temp.as_file())?)?;
    temp.persist(path).map_err(|e| HitError::Io(e.error))?;
    Ok(())
}

/// Mode for a replaced output: the existing file's, else world-readable.
/// Temporary files are created owner-only.
fn output_permissions(path: &Path, temp: &File) -> Result<Permissions> {
    if let Ok(existing) = fs::metadata(path) {
        return Ok(existing.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = temp;
        Ok(Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        Ok(temp.metadata()?.permissions())
    }
}

/// Write accepted hits as a tab-delimited table with a header row
pub fn write_hit_table<P: AsRef<Path>>(path: P, records: &[HitRecord]) -> Result<()> {
    write_atomically(path, |out| {
        write_hit_records(out, records, TableFormat::Tsv)?;
        Ok(())
    })
}

/// Serialize hits to any writer
pub fn write_hit_records<W: Write>(
    out: W,
    records: &[HitRecord],
    format: TableFormat,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(out);

    if records.is_empty() {
        // serde only emits the header alongside the first row
        writer.write_record(HitRecord::COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a tab-delimited hit table.
///
/// Only `Query ID` and `Target` must be present; other columns default to
/// empty when missing.
pub fn read_hit_table<P: AsRef<Path>>(path: P) -> Result<Vec<HitRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(TableFormat::Tsv.delimiter())
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(HitError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    log::info!("Read {} hits from table", records.len());
    Ok(records)
}

impl HitRecord {
    /// Header row of the intermediate table, in column order
    pub const COLUMNS: [&'static str; 11] = [
        "Blastx evalue",
        "Query ID",
        "Protein Description",
        "Count",
        "Taxonomy",
        "Tax ID",
        "Rep ID",
        "Target",
        "Chromosome",
        "UGA-SECIS",
        "Free Energy",
    ];
}

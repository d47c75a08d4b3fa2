//! Query-by-target hit count matrix.

use std::collections::{BTreeSet, HashMap};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{HitError, Result};
use crate::hit_record::HitRecord;
use crate::hit_table::{write_atomically, TableFormat};
use crate::target_name::{display_name, CanonicalTargetSet};

/// Header of the row label column
pub const QUERY_COLUMN: &str = "Query ID";

/// Dense hit counts. Rows are query ids and columns are canonical target
/// names, both ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMatrix {
    queries: Vec<String>,
    targets: Vec<String>,
    counts: Vec<Vec<u64>>,
}

/// A built matrix plus what the build noticed along the way
#[derive(Debug, Clone, Default)]
pub struct MatrixBuild {
    pub matrix: HitMatrix,
    /// Hit targets that no scanned report file accounts for
    pub unmatched_targets: Vec<String>,
    /// Canonical targets that received no hits
    pub zero_hit_targets: Vec<String>,
    /// Records left out because the query id or target was empty
    pub untallied_records: usize,
}

impl HitMatrix {
    /// Count hits per (query id, target) over the canonical target universe.
    ///
    /// Targets seen in records but missing from `canonical` still get a column.
    pub fn build(records: &[HitRecord], canonical: &CanonicalTargetSet) -> MatrixBuild {
        let mut tally: HashMap<(&str, &str), u64> = HashMap::new();
        let mut queries: BTreeSet<&str> = BTreeSet::new();
        let mut hit_targets: BTreeSet<&str> = BTreeSet::new();
        let mut untallied_records = 0;

        for record in records {
            if record.query_id.is_empty() || record.target.is_empty() {
                untallied_records += 1;
                continue;
            }
            *tally
                .entry((record.query_id.as_str(), record.target.as_str()))
                .or_insert(0) += 1;
            queries.insert(&record.query_id);
            hit_targets.insert(&record.target);
        }

        let unmatched_targets: Vec<String> = hit_targets
            .iter()
            .filter(|target| !canonical.contains(target))
            .map(|target| target.to_string())
            .collect();
        let zero_hit_targets: Vec<String> = canonical
            .iter()
            .filter(|target| !hit_targets.contains(target))
            .map(str::to_string)
            .collect();

        let columns: BTreeSet<&str> = canonical.iter().chain(hit_targets.iter().copied()).collect();

        let counts: Vec<Vec<u64>> = queries
            .iter()
            .map(|query| {
                columns
                    .iter()
                    .map(|target| tally.get(&(*query, *target)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        let matrix = HitMatrix {
            queries: queries.into_iter().map(str::to_string).collect(),
            targets: columns.into_iter().map(str::to_string).collect(),
            counts,
        };

        MatrixBuild {
            matrix,
            unmatched_targets,
            zero_hit_targets,
            untallied_records,
        }
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Canonical target names, one per column
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Count for one cell, 0 for any pair outside the matrix
    pub fn get(&self, query: &str, target: &str) -> u64 {
        let row = self.queries.binary_search_by(|q| q.as_str().cmp(query));
        let col = self.targets.binary_search_by(|t| t.as_str().cmp(target));
        match (row, col) {
            (Ok(r), Ok(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn total_hits(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Labelled view with display names as column labels
    pub fn to_table(&self) -> MatrixTable {
        MatrixTable {
            row_labels: self.queries.clone(),
            column_labels: self
                .targets
                .iter()
                .map(|target| display_name(target).to_string())
                .collect(),
            counts: self.counts.clone(),
        }
    }

    /// Persist the matrix, replacing `path` only once fully written
    pub fn write<P: AsRef<Path>>(&self, path: P, format: TableFormat) -> Result<()> {
        let table = self.to_table();
        write_atomically(path, |out| table.write_to(out, format))
    }
}

/// A rendered matrix: what is written to and read back from disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl MatrixTable {
    pub fn write_to<W: Write>(&self, out: W, format: TableFormat) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(format.delimiter())
            .from_writer(out);

        let mut header = vec![QUERY_COLUMN.to_string()];
        header.extend(self.column_labels.iter().cloned());
        writer.write_record(&header)?;

        for (label, row) in self.row_labels.iter().zip(&self.counts) {
            let mut fields = Vec::with_capacity(row.len() + 1);
            fields.push(label.clone());
            fields.extend(row.iter().map(u64::to_string));
            writer.write_record(&fields)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_from<R: Read>(input: R, format: TableFormat) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter())
            .from_reader(input);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(HitError::MalformedMatrix("missing header row".to_string()));
        }
        let column_labels: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut table = MatrixTable {
            column_labels,
            ..Default::default()
        };
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let label = row.get(0).unwrap_or_default().to_string();
            let counts = row
                .iter()
                .skip(1)
                .map(|cell| {
                    cell.parse::<u64>().map_err(|_| {
                        HitError::MalformedMatrix(format!(
                            "row {} ({label}): '{cell}' is not a hit count",
                            line + 1
                        ))
                    })
                })
                .collect::<Result<Vec<u64>>>()?;
            table.row_labels.push(label);
            table.counts.push(counts);
        }
        Ok(table)
    }

    pub fn read<P: AsRef<Path>>(path: P, format: TableFormat) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_from(file, format)
    }
}

/// Headline numbers and top-N rankings of a matrix
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSummary {
    pub num_queries: usize,
    pub num_targets: usize,
    pub total_hits: u64,
    pub non_zero_entries: usize,
    pub density: f64,
    pub top_queries: Vec<(String, u64)>,
    pub top_targets: Vec<(String, u64)>,
}

impl MatrixSummary {
    /// Summarize `table`, keeping the `top_n` busiest rows and columns.
    /// Ties rank by label.
    pub fn from_table(table: &MatrixTable, top_n: usize) -> Self {
        let num_queries = table.row_labels.len();
        let num_targets = table.column_labels.len();

        let query_totals: Vec<(String, u64)> = table
            .row_labels
            .iter()
            .zip(&table.counts)
            .map(|(label, row)| (label.clone(), row.iter().sum()))
            .collect();

        let mut target_sums = vec![0u64; num_targets];
        let mut non_zero_entries = 0;
        for row in &table.counts {
            for (col, &count) in row.iter().enumerate() {
                target_sums[col] += count;
                if count > 0 {
                    non_zero_entries += 1;
                }
            }
        }
        let target_totals: Vec<(String, u64)> = table
            .column_labels
            .iter()
            .cloned()
            .zip(target_sums)
            .collect();

        let cells = num_queries * num_targets;
        let density = if cells > 0 {
            non_zero_entries as f64 / cells as f64
        } else {
            0.0
        };

        MatrixSummary {
            num_queries,
            num_targets,
            total_hits: query_totals.iter().map(|(_, total)| total).sum(),
            non_zero_entries,
            density,
            top_queries: top_by_total(query_totals, top_n),
            top_targets: top_by_total(target_totals, top_n),
        }
    }
}

fn top_by_total(mut totals: Vec<(String, u64)>, top_n: usize) -> Vec<(String, u64)> {
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals.truncate(top_n);
    totals
}

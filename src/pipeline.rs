//! Directory-level orchestration: scan, parse, tally.

use std::path::{Path, PathBuf};

use crate::error::{HitError, Result};
use crate::hit_matrix::{HitMatrix, MatrixBuild};
use crate::hit_record::{parse_pretty_file, HitRecord};
use crate::scanner::scan_pretty_files;
use crate::target_name::CanonicalTargetSet;

/// Options for collecting hits from a data folder
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Abort on the first unreadable file instead of skipping it
    pub strict: bool,
}

/// A report file that could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything collected from one data folder
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Scanned report files, sorted
    pub files: Vec<PathBuf>,
    /// Accepted hits in file order, then section order
    pub records: Vec<HitRecord>,
    pub skipped: Vec<SkippedFile>,
}

impl RunReport {
    /// Genome universe implied by the scanned file names, including files
    /// that were skipped
    pub fn canonical_targets(&self) -> CanonicalTargetSet {
        CanonicalTargetSet::from_paths(&self.files)
    }

    pub fn build_matrix(&self) -> MatrixBuild {
        build_matrix(&self.records, &self.canonical_targets())
    }
}

/// Scan `dir` and parse every `.pretty` file in it.
///
/// Fails when the folder is missing or holds no report files. Unreadable
/// files are recorded in [`RunReport::skipped`] unless `options.strict`.
pub fn collect_hits<P: AsRef<Path>>(dir: P, options: CollectOptions) -> Result<RunReport> {
    let scan = scan_pretty_files(dir)?;
    if scan.is_empty() {
        return Err(HitError::NoPrettyFiles(scan.dir));
    }

    let mut report = RunReport {
        files: scan.files,
        ..Default::default()
    };

    for path in &report.files {
        log::debug!("Processing {}...", path.display());
        match parse_pretty_file(path) {
            Ok(hits) => {
                log::debug!("  {} hits", hits.len());
                report.records.extend(hits);
            }
            Err(err) if !options.strict => {
                log::warn!("Skipping unreadable file: {err}");
                report.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    log::info!(
        "Parsed {} hits from {} files",
        report.records.len(),
        report.files.len() - report.skipped.len()
    );
    if !report.skipped.is_empty() {
        log::warn!("{} files could not be read:", report.skipped.len());
        for skipped in &report.skipped {
            log::warn!("  - {}", skipped.path.display());
        }
    }

    Ok(report)
}

/// Tally `records` against `canonical`, logging the consistency findings
pub fn build_matrix(records: &[HitRecord], canonical: &CanonicalTargetSet) -> MatrixBuild {
    log::info!("Generating hit matrix...");
    let build = HitMatrix::build(records, canonical);

    if !build.zero_hit_targets.is_empty() {
        log::info!("Targets with zero hits: {}", build.zero_hit_targets.len());
        for target in &build.zero_hit_targets {
            log::info!("  - {target}");
        }
    }
    if !build.unmatched_targets.is_empty() {
        log::warn!(
            "{} hit targets do not match any scanned report file name:",
            build.unmatched_targets.len()
        );
        for target in &build.unmatched_targets {
            log::warn!("  - {target}");
        }
    }
    if build.untallied_records > 0 {
        log::warn!(
            "{} hits without a query id or target were left out of the matrix",
            build.untallied_records
        );
    }

    build
}

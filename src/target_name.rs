//! Mapping between report file names and genome target names.
//!
//! Hit records name their genome by the FASTA path that was searched, while
//! the report files on disk are named after the genome with a varying pile of
//! `.output` suffixes. The forward mapping recovers the FASTA name from a
//! report file name so that genomes without hits still get a matrix column.

use std::collections::BTreeSet;
use std::path::Path;

/// Suffix given to every assembly FASTA in the search set
pub const MAIN_GENOME_SUFFIX: &str = ".mainGenome.fasta";

/// Report files whose genome FASTA does not follow the naming scheme
const EXACT_OVERRIDES: [(&str, &str); 2] = [
    ("Emilania_huxleyi.output.pretty", "Emihu1_scaffold.fa"),
    (
        "Calcidiscus_leptoporus_var_RCC1130.output.pretty",
        "Calcidiscus_leptoporus_var_RCC1130.mainGenome.fasta",
    ),
];

/// Suffix rewrites, most specific first: (suffix to strip, replacement)
const SUFFIX_RULES: [(&str, &str); 4] = [
    (".mainGenome.fasta.output.output.pretty", MAIN_GENOME_SUFFIX),
    (".mainGenome.output.output.pretty", MAIN_GENOME_SUFFIX),
    (".output.output.pretty", MAIN_GENOME_SUFFIX),
    (".output.pretty", MAIN_GENOME_SUFFIX),
];

/// Canonical target name for a report file basename
pub fn canonical_target(basename: &str) -> String {
    if let Some(&(_, target)) = EXACT_OVERRIDES.iter().find(|(name, _)| *name == basename) {
        return target.to_string();
    }

    for &(suffix, replacement) in SUFFIX_RULES.iter() {
        if let Some(stem) = basename.strip_suffix(suffix) {
            return format!("{stem}{replacement}");
        }
    }

    format!("{basename}{MAIN_GENOME_SUFFIX}")
}

/// Short column label for a canonical target name
pub fn display_name(target: &str) -> &str {
    target
        .strip_suffix(MAIN_GENOME_SUFFIX)
        .or_else(|| target.strip_suffix(".fa"))
        .unwrap_or(target)
}

/// Every genome the run searched, derived from the report file names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTargetSet {
    targets: BTreeSet<String>,
}

impl CanonicalTargetSet {
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Self {
        let targets = paths
            .iter()
            .filter_map(|path| path.as_ref().file_name())
            .map(|name| canonical_target(&name.to_string_lossy()))
            .collect();
        Self { targets }
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.contains(target)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }
}

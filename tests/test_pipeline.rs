/// End-to-end library tests: report folder -> hits -> matrix -> file
use anyhow::Result;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

use hitmatrix::hit_table::{read_hit_table, write_hit_table};
use hitmatrix::pipeline::{build_matrix, collect_hits, CollectOptions};
use hitmatrix::{MatrixTable, TableFormat};

use test_utils::{generate_random_corpus, hit_section, write_report};

#[test]
fn test_historical_file_names_reconcile_with_targets() -> Result<()> {
    let temp = TempDir::new()?;
    let dir = temp.path();

    write_report(
        dir,
        "Emilania_huxleyi.output.pretty",
        &[hit_section(
            "1e-40",
            "lcl|UniRef50_Q50KB1 Protein disulfide-isomerase-like protein EhSep2 n=18 Tax=Eukaryota TaxID=2759 RepID=SEP2_EMIHU",
            "/genomes/Emihu1_scaffold.fa",
        )],
    );
    write_report(
        dir,
        "Prymnesium_platychrysis_sp_CCMP1217.mainGenome.fasta.output.output.pretty",
        &[hit_section(
            "2e-11",
            "lcl|UniRef50_Q50KB1 Protein disulfide-isomerase-like protein EhSep2 n=18",
            "/genomes/Prymnesium_platychrysis_sp_CCMP1217.mainGenome.fasta",
        )],
    );
    write_report(
        dir,
        "Chrysochromulina_leadbeateri_var_UIO393.mainGenome.output.output.pretty",
        &[],
    );
    write_report(dir, "Calcidiscus_leptoporus_var_RCC1130.output.pretty", &[]);

    let report = collect_hits(dir, CollectOptions::default())?;
    let build = report.build_matrix();

    assert!(build.unmatched_targets.is_empty());
    assert_eq!(
        build.zero_hit_targets,
        vec![
            "Calcidiscus_leptoporus_var_RCC1130.mainGenome.fasta",
            "Chrysochromulina_leadbeateri_var_UIO393.mainGenome.fasta",
        ]
    );

    let table = build.matrix.to_table();
    assert_eq!(table.row_labels, vec!["lcl|UniRef50_Q50KB1"]);
    assert_eq!(
        table.column_labels,
        vec![
            "Calcidiscus_leptoporus_var_RCC1130",
            "Chrysochromulina_leadbeateri_var_UIO393",
            "Emihu1_scaffold",
            "Prymnesium_platychrysis_sp_CCMP1217",
        ]
    );
    assert_eq!(table.counts, vec![vec![0, 0, 1, 1]]);
    Ok(())
}

#[test]
fn test_random_corpus_counts_match() -> Result<()> {
    let temp = TempDir::new()?;
    let expected = generate_random_corpus(temp.path(), 12, 8, 15, 42);

    let report = collect_hits(temp.path(), CollectOptions::default())?;
    assert_eq!(report.records.len(), expected.len());

    let build = report.build_matrix();
    let mut tally: HashMap<(String, String), u64> = HashMap::new();
    for pair in &expected {
        *tally.entry(pair.clone()).or_insert(0) += 1;
    }

    let matrix = &build.matrix;
    for query in matrix.queries() {
        for target in matrix.targets() {
            let want = tally
                .get(&(query.clone(), target.clone()))
                .copied()
                .unwrap_or(0);
            assert_eq!(matrix.get(query, target), want, "{query} x {target}");
        }
    }
    assert_eq!(matrix.total_hits(), expected.len() as u64);
    assert_eq!(matrix.targets().len(), 12);
    Ok(())
}

#[test]
fn test_two_stage_pipeline_matches_direct_build() -> Result<()> {
    let temp = TempDir::new()?;
    let data = temp.path().join("data");
    fs::create_dir(&data)?;
    generate_random_corpus(&data, 5, 4, 6, 7);

    let report = collect_hits(&data, CollectOptions::default())?;
    let direct = report.build_matrix().matrix;

    let table_path = temp.path().join("parsed_results.tsv");
    write_hit_table(&table_path, &report.records)?;
    let reread = read_hit_table(&table_path)?;
    assert_eq!(reread, report.records);

    let staged = build_matrix(&reread, &report.canonical_targets()).matrix;
    assert_eq!(staged, direct);
    Ok(())
}

#[test]
fn test_matrix_file_round_trip() -> Result<()> {
    let temp = TempDir::new()?;
    let data = temp.path().join("data");
    fs::create_dir(&data)?;
    generate_random_corpus(&data, 6, 5, 10, 99);

    let matrix = collect_hits(&data, CollectOptions::default())?
        .build_matrix()
        .matrix;

    for format in [TableFormat::Tsv, TableFormat::Csv] {
        let path = temp.path().join(format!("hit_matrix.{format:?}"));
        matrix.write(&path, format)?;
        let reread = MatrixTable::read(&path, format)?;
        assert_eq!(reread, matrix.to_table());
    }
    Ok(())
}

#[test]
fn test_parsing_is_deterministic() -> Result<()> {
    let temp = TempDir::new()?;
    generate_random_corpus(temp.path(), 4, 3, 5, 3);

    let first = collect_hits(temp.path(), CollectOptions::default())?;
    let second = collect_hits(temp.path(), CollectOptions::default())?;
    assert_eq!(first.files, second.files);
    assert_eq!(first.records, second.records);
    Ok(())
}

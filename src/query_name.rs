//! Decomposition of the compound `Query name:` value.
//!
//! A UniRef-style query name carries the query identifier followed by a free
//! text protein description and a tail of `key=value` marker tokens:
//!
//! ```text
//! lcl|UniRef50_Q50KB1 Protein disulfide-isomerase-like protein EhSep2 n=18 Tax=Eukaryota TaxID=2759 RepID=SEP2_EMIHU
//! ```

/// Cluster member count marker
pub const COUNT_MARKER: &str = "n=";
/// Taxonomy name marker
pub const TAXONOMY_MARKER: &str = "Tax=";
/// NCBI taxonomy id marker
pub const TAX_ID_MARKER: &str = "TaxID=";
/// Representative member marker
pub const REP_ID_MARKER: &str = "RepID=";

/// The five subfields of a query name plus its identifier.
///
/// Marker fields hold the whole token, prefix included (`n=18`, not `18`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryName {
    pub query_id: String,
    pub description: Option<String>,
    pub count: Option<String>,
    pub taxonomy: Option<String>,
    pub tax_id: Option<String>,
    pub rep_id: Option<String>,
}

/// Positions of the last occurrence of each marker; 0 means absent since the
/// identifier always occupies the first token.
#[derive(Debug, Default)]
struct MarkerPositions {
    count: usize,
    taxonomy: usize,
    tax_id: usize,
    rep_id: usize,
}

impl MarkerPositions {
    fn locate(tokens: &[&str]) -> Self {
        let mut positions = Self::default();
        // later markers overwrite earlier ones
        for (i, token) in tokens.iter().enumerate().skip(1) {
            if token.starts_with(COUNT_MARKER) {
                positions.count = i;
            } else if token.starts_with(TAXONOMY_MARKER) {
                positions.taxonomy = i;
            } else if token.starts_with(TAX_ID_MARKER) {
                positions.tax_id = i;
            } else if token.starts_with(REP_ID_MARKER) {
                positions.rep_id = i;
            }
        }
        positions
    }
}

/// Split a query name into identifier, description and marker tokens.
///
/// Returns `None` for a blank value.
pub fn decompose_query_name(value: &str) -> Option<QueryName> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    let (&query_id, rest) = tokens.split_first()?;

    let positions = MarkerPositions::locate(&tokens);
    let pick = |pos: usize| (pos > 0).then(|| tokens[pos].to_string());

    let (description, count) = if positions.count > 0 {
        (join_tokens(&tokens[1..positions.count]), pick(positions.count))
    } else {
        (join_tokens(rest), None)
    };

    Some(QueryName {
        query_id: query_id.to_string(),
        description,
        count,
        taxonomy: pick(positions.taxonomy),
        tax_id: pick(positions.tax_id),
        rep_id: pick(positions.rep_id),
    })
}

fn join_tokens(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_uniref_name() {
        let name = decompose_query_name(
            "lcl|UniRef50_Q50KB1 Protein disulfide-isomerase-like protein EhSep2 n=18 Tax=Eukaryota TaxID=2759 RepID=SEP2_EMIHU",
        )
        .unwrap();
        assert_eq!(name.query_id, "lcl|UniRef50_Q50KB1");
        assert_eq!(
            name.description.as_deref(),
            Some("Protein disulfide-isomerase-like protein EhSep2")
        );
        assert_eq!(name.count.as_deref(), Some("n=18"));
        assert_eq!(name.taxonomy.as_deref(), Some("Tax=Eukaryota"));
        assert_eq!(name.tax_id.as_deref(), Some("TaxID=2759"));
        assert_eq!(name.rep_id.as_deref(), Some("RepID=SEP2_EMIHU"));
    }

    #[test]
    fn test_multi_word_description() {
        let name =
            decompose_query_name("Q1 desc A desc B n=18 Tax=Eukaryota TaxID=2759 RepID=SEP2_EMIHU")
                .unwrap();
        assert_eq!(
            name,
            QueryName {
                query_id: "Q1".into(),
                description: Some("desc A desc B".into()),
                count: Some("n=18".into()),
                taxonomy: Some("Tax=Eukaryota".into()),
                tax_id: Some("TaxID=2759".into()),
                rep_id: Some("RepID=SEP2_EMIHU".into()),
            }
        );
    }

    #[test]
    fn test_identifier_only() {
        let name = decompose_query_name("  Q7  ").unwrap();
        assert_eq!(name.query_id, "Q7");
        assert_eq!(name.description, None);
        assert_eq!(name.count, None);
    }

    #[test]
    fn test_blank_value() {
        assert_eq!(decompose_query_name(""), None);
        assert_eq!(decompose_query_name("   \t "), None);
    }

    #[test]
    fn test_without_count_marker_keeps_markers_in_description() {
        let name = decompose_query_name("Q2 Selenoprotein W Tax=Bacteria").unwrap();
        assert_eq!(
            name.description.as_deref(),
            Some("Selenoprotein W Tax=Bacteria")
        );
        assert_eq!(name.count, None);
        assert_eq!(name.taxonomy.as_deref(), Some("Tax=Bacteria"));
    }

    #[test]
    fn test_count_directly_after_identifier() {
        let name = decompose_query_name("Q3 n=4 TaxID=1").unwrap();
        assert_eq!(name.description, None);
        assert_eq!(name.count.as_deref(), Some("n=4"));
        assert_eq!(name.tax_id.as_deref(), Some("TaxID=1"));
    }

    #[test]
    fn test_marker_in_identifier_position_is_ignored() {
        let name = decompose_query_name("n=5 something").unwrap();
        assert_eq!(name.query_id, "n=5");
        assert_eq!(name.description.as_deref(), Some("something"));
        assert_eq!(name.count, None);
    }

    #[test]
    fn test_last_marker_wins() {
        // regression: repeated markers resolve to their final occurrence
        let name = decompose_query_name("Q4 alpha n=1 beta n=2 Tax=A Tax=B RepID=X RepID=Y").unwrap();
        assert_eq!(name.description.as_deref(), Some("alpha n=1 beta"));
        assert_eq!(name.count.as_deref(), Some("n=2"));
        assert_eq!(name.taxonomy.as_deref(), Some("Tax=B"));
        assert_eq!(name.rep_id.as_deref(), Some("RepID=Y"));
    }

    #[test]
    fn test_taxid_is_not_taxonomy() {
        let name = decompose_query_name("Q5 d n=1 TaxID=9606").unwrap();
        assert_eq!(name.taxonomy, None);
        assert_eq!(name.tax_id.as_deref(), Some("TaxID=9606"));
    }
}

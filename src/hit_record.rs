//! Field extraction from a single hit section.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{opt, recognize},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{HitError, Result};
use crate::query_name::decompose_query_name;
use crate::section::split_sections;

/// One accepted hit. Serde names are the column headers of the intermediate
/// table, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    #[serde(rename = "Blastx evalue", default)]
    pub evalue: String,
    #[serde(rename = "Query ID", default)]
    pub query_id: String,
    #[serde(rename = "Protein Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Count", default)]
    pub count: Option<String>,
    #[serde(rename = "Taxonomy", default)]
    pub taxonomy: Option<String>,
    #[serde(rename = "Tax ID", default)]
    pub tax_id: Option<String>,
    #[serde(rename = "Rep ID", default)]
    pub rep_id: Option<String>,
    #[serde(rename = "Target", default)]
    pub target: String,
    #[serde(rename = "Chromosome", default)]
    pub chromosome: Option<String>,
    #[serde(rename = "UGA-SECIS", default)]
    pub uga_secis: Option<String>,
    #[serde(rename = "Free Energy", default)]
    pub free_energy: Option<String>,
}

/// Fields seen so far while walking the lines of one section
#[derive(Debug, Default)]
struct SectionFields {
    evalue: Option<String>,
    query_id: Option<String>,
    description: Option<String>,
    count: Option<String>,
    taxonomy: Option<String>,
    tax_id: Option<String>,
    rep_id: Option<String>,
    target: Option<String>,
    chromosome: Option<String>,
    uga_secis: Option<String>,
    free_energy: Option<String>,
}

impl SectionFields {
    fn into_record(self) -> Option<HitRecord> {
        let evalue = self.evalue.filter(|v| !v.is_empty())?;
        let query_id = self.query_id.filter(|v| !v.is_empty())?;
        Some(HitRecord {
            evalue,
            query_id,
            description: self.description,
            count: self.count,
            taxonomy: self.taxonomy,
            tax_id: self.tax_id,
            rep_id: self.rep_id,
            target: self.target.unwrap_or_default(),
            chromosome: self.chromosome.filter(|v| !v.is_empty()),
            uga_secis: self.uga_secis,
            free_energy: self.free_energy,
        })
    }
}

type LineHandler = fn(&mut SectionFields, &str);

/// Line prefixes in priority order. At most one applies to a line.
const PREFIX_MATCHERS: [(&str, LineHandler); 4] = [
    ("Blastx evalue:", set_evalue),
    ("Query name:", set_query_name),
    ("Target:", set_target),
    ("Chromosome:", set_chromosome),
];

fn set_evalue(fields: &mut SectionFields, value: &str) {
    fields.evalue = Some(value.to_string());
}

fn set_query_name(fields: &mut SectionFields, value: &str) {
    // a blank name leaves earlier values in place
    let Some(name) = decompose_query_name(value) else {
        return;
    };
    fields.query_id = Some(name.query_id);
    fields.description = name.description;
    fields.count = name.count;
    fields.taxonomy = name.taxonomy;
    fields.tax_id = name.tax_id;
    fields.rep_id = name.rep_id;
}

fn set_target(fields: &mut SectionFields, value: &str) {
    // genome paths in the reports are always '/' separated
    let basename = value.rsplit('/').next().unwrap_or(value);
    fields.target = Some(basename.to_string());
}

fn set_chromosome(fields: &mut SectionFields, value: &str) {
    fields.chromosome = Some(value.to_string());
}

/// `UGA-SECIS:` followed by the distance in nucleotides
fn uga_secis_distance(input: &str) -> IResult<&str, &str> {
    preceded(pair(tag("UGA-SECIS:"), multispace0), digit1)(input)
}

/// `Free Energy = -12.30` as printed by the SECIS structure predictor
fn free_energy(input: &str) -> IResult<&str, &str> {
    preceded(
        tuple((tag("Free Energy"), delimited(multispace0, char('='), multispace0))),
        signed_decimal,
    )(input)
}

fn signed_decimal(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    ))(input)
}

/// Run `parser` at every occurrence of `anchor` in `line`, returning the
/// first successful capture.
fn find_capture<'a>(
    line: &'a str,
    anchor: &str,
    parser: fn(&'a str) -> IResult<&'a str, &'a str>,
) -> Option<&'a str> {
    line.match_indices(anchor)
        .find_map(|(start, _)| parser(&line[start..]).ok().map(|(_, value)| value))
}

fn apply_line(fields: &mut SectionFields, line: &str) {
    for &(prefix, handler) in PREFIX_MATCHERS.iter() {
        if line.starts_with(prefix) {
            let value = line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
            handler(fields, value);
            break;
        }
    }

    if let Some(distance) = find_capture(line, "UGA-SECIS:", uga_secis_distance) {
        fields.uga_secis = Some(distance.to_string());
    }
    if let Some(energy) = find_capture(line, "Free Energy", free_energy) {
        fields.free_energy = Some(energy.to_string());
    }
}

/// Parse one hit section.
///
/// Sections without an evalue or a query identifier are not hits and yield
/// `None`.
pub fn parse_hit_section(section: &str) -> Option<HitRecord> {
    let mut fields = SectionFields::default();
    for line in section.lines() {
        apply_line(&mut fields, line.trim());
    }
    fields.into_record()
}

/// Parse every hit section of a report's content, in file order
pub fn parse_pretty_content(content: &str) -> Vec<HitRecord> {
    split_sections(content)
        .into_iter()
        .filter_map(parse_hit_section)
        .collect()
}

/// Read and parse one `.pretty` file
pub fn parse_pretty_file<P: AsRef<Path>>(path: P) -> Result<Vec<HitRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| HitError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_pretty_content(&content))
}

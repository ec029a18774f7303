use std::fmt::Write as _;
use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{Cli, OutputFormat};
use crate::core::records::Orientation;
use crate::graph::index::SegmentIndex;
use crate::graph::relationship::{reconstruct_all, Reconstruction, Relationship};
use crate::parsing::gfa::read_file;

#[derive(Serialize)]
struct RelationshipReport<'a> {
    kind: &'static str,
    ids: [&'a str; 2],
    orientation: [Orientation; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
    cigar: &'a str,
    #[serde(flatten)]
    reconstruction: &'a Reconstruction,
}

impl<'a> RelationshipReport<'a> {
    fn new(relationship: &Relationship<'a>, reconstruction: &'a Reconstruction) -> Self {
        Self {
            kind: relationship.kind(),
            ids: relationship.ids(),
            orientation: relationship.orientation(),
            offset: relationship.offset(),
            cigar: relationship.cigar(),
            reconstruction,
        }
    }
}

/// Execute the alignment reconstruction for every relationship in the input
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, segment ids are
/// duplicated, or (without `--keep-going`) any relationship fails to
/// reconstruct. The error names the offending line or relationship.
pub fn run(args: &Cli) -> anyhow::Result<()> {
    let gfa = read_file(&args.input)
        .with_context(|| format!("Failed to read GFA file {}", args.input.display()))?;

    let index = SegmentIndex::build(&gfa.segments)
        .with_context(|| format!("Invalid segments in {}", args.input.display()))?;

    info!(
        segments = index.len(),
        links = gfa.links.len(),
        containments = gfa.containments.len(),
        mode = ?args.orientation_mode,
        "Loaded assembly graph"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if matches!(args.format, OutputFormat::Tsv) {
        writeln!(out, "{}", TSV_HEADER)?;
    }

    let width = usize::try_from(args.width).unwrap_or(usize::MAX);
    let mut collected = Vec::new();
    let mut skipped = 0usize;

    for (relationship, result) in reconstruct_all(&gfa, &index, args.orientation_mode) {
        let reconstruction = match result {
            Ok(reconstruction) => reconstruction,
            Err(e) if args.keep_going => {
                warn!(
                    relationship = %relationship.describe(),
                    error = %e,
                    "Skipping relationship"
                );
                skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to reconstruct {}", relationship.describe()))
            }
        };

        match args.format {
            OutputFormat::Text => {
                out.write_all(render_text(&relationship, &reconstruction, width).as_bytes())?;
            }
            OutputFormat::Tsv => writeln!(out, "{}", tsv_row(&relationship, &reconstruction))?,
            OutputFormat::Json => collected.push((relationship, reconstruction)),
        }
    }

    if matches!(args.format, OutputFormat::Json) {
        let reports: Vec<RelationshipReport<'_>> = collected
            .iter()
            .map(|(relationship, reconstruction)| {
                RelationshipReport::new(relationship, reconstruction)
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
    }

    if skipped > 0 {
        warn!(
            skipped,
            total = gfa.relationship_count(),
            "Some relationships could not be reconstructed"
        );
    }

    Ok(())
}

/// Banner, both rows wrapped at `width` columns, then the statistics line
fn render_text(relationship: &Relationship<'_>, reconstruction: &Reconstruction, width: usize) -> String {
    let alignment = &reconstruction.alignment;
    let stats = &alignment.stats;
    let mut text = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(text, "====== {} =======", relationship.describe());
    for (reference, query) in alignment.wrapped(width) {
        let _ = writeln!(text, "M0: {reference}");
        let _ = writeln!(text, "M1: {query}");
    }
    let _ = writeln!(
        text,
        "Matches: {} Mismatches: {} Gaps: {} Identity: {:.3}",
        stats.matches, stats.mismatches, stats.gaps, stats.identity
    );
    text.push('\n');
    text
}

const TSV_HEADER: &str = "kind\tid0\torient0\tid1\torient1\toffset\tcigar\tconsumed_reference\tconsumed_query\tanchor\tmatches\tmismatches\tgaps\tidentity";

fn tsv_row(relationship: &Relationship<'_>, reconstruction: &Reconstruction) -> String {
    let [id0, id1] = relationship.ids();
    let [o0, o1] = relationship.orientation();
    let offset = relationship
        .offset()
        .map_or_else(|| "*".to_string(), |offset| offset.to_string());
    let stats = &reconstruction.alignment.stats;

    format!(
        "{}\t{id0}\t{o0}\t{id1}\t{o1}\t{offset}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.4}",
        relationship.kind(),
        relationship.cigar(),
        reconstruction.consumption.reference,
        reconstruction.consumption.query,
        reconstruction.anchor,
        stats.matches,
        stats.mismatches,
        stats.gaps,
        stats.identity,
    )
}

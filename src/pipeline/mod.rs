use std::path::Path;

use thiserror::Error;

use crate::formats::rnk::write_rnk;
use crate::input::InputError;
use crate::input::annotation::Annotation;
use crate::input::deseq::{DeReadOptions, load_de_table};
use crate::kegg::KeggError;
use crate::model::StatPolicy;
use crate::report::RankStats;

pub mod batch;
pub mod stage1_gene_sets;
pub mod stage2_rank;
pub mod stage3_merge;
pub mod stage4_enrich;
pub mod tasks;

use stage2_rank::run_stage2;
use stage3_merge::run_stage3;
use stage4_enrich::EnrichError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Kegg(#[from] KeggError),
    #[error(transparent)]
    Enrichment(#[from] EnrichError),
    #[error("IO error writing {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "no differential expression row matched the annotation ({rows} rows, {annotated} annotated loci)"
    )]
    EmptyJoin { rows: usize, annotated: usize },
    #[error("invalid task manifest {path}: {message}")]
    Manifest { path: String, message: String },
    #[error("{failed} of {total} tasks failed")]
    TasksFailed { failed: usize, total: usize },
}

impl PipelineError {
    pub fn write(path: &Path, source: std::io::Error) -> Self {
        PipelineError::Write {
            path: path.display().to_string(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    pub read: DeReadOptions,
    pub policy: StatPolicy,
    pub keep_unmatched: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            read: DeReadOptions::default(),
            policy: StatPolicy::Auto,
            keep_unmatched: false,
        }
    }
}

/// Converts one differential expression table into an RNK file.
///
/// Nothing is written unless every step succeeds.
pub fn rank_de_table(
    input: &Path,
    output: &Path,
    annotation: &Annotation,
    options: &RankOptions,
) -> Result<RankStats, PipelineError> {
    tracing::info!(input = %input.display(), "reading differential expression table");
    let table = load_de_table(input, options.read)?;
    let stage2 = run_stage2(&table, options.policy)?;
    let stage3 = run_stage3(&stage2.stats, annotation, options.keep_unmatched)?;

    write_rnk(output, &stage3.ranked).map_err(|e| PipelineError::write(output, e))?;

    let stats = RankStats {
        input: input.display().to_string(),
        output: output.display().to_string(),
        de_rows: table.rows.len(),
        annotated_loci: annotation.len(),
        stat_source: stage2.source,
        derived_rows: stage2.derived,
        joined_rows: stage3.joined,
        unmatched_rows: stage3.unmatched,
        symbols: stage3.ranked.len(),
        top: stage3.ranked.first().map(|g| g.symbol.clone()),
        bottom: stage3.ranked.last().map(|g| g.symbol.clone()),
    };
    tracing::info!(
        output = %output.display(),
        symbols = stats.symbols,
        joined = stats.joined_rows,
        unmatched = stats.unmatched_rows,
        source = ?stats.stat_source,
        "ranked list written"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/rank.rs"]
mod tests;

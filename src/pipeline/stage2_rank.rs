use crate::input::InputError;
use crate::input::deseq::DeTable;
use crate::model::ranking::derive_stat;
use crate::model::{StatPolicy, StatSource};
use crate::pipeline::PipelineError;

#[derive(Debug, Clone, PartialEq)]
pub struct LocusStat {
    pub locus_tag: String,
    pub stat: f64,
}

#[derive(Debug)]
pub struct Stage2Output {
    pub stats: Vec<LocusStat>,
    pub source: StatSource,
    pub derived: usize,
}

/// Picks or derives the ranking statistic of every row.
pub fn run_stage2(table: &DeTable, policy: StatPolicy) -> Result<Stage2Output, PipelineError> {
    let stat_complete = table.columns.stat && table.rows.iter().all(|r| r.stat.is_some());
    let can_derive = table.columns.log2_fold_change && table.columns.pvalue;

    let use_precomputed = match policy {
        StatPolicy::Auto => stat_complete,
        StatPolicy::Fill => table.columns.stat,
        StatPolicy::Derive => false,
    };
    let needs_derivation = !use_precomputed || !stat_complete;
    if needs_derivation && !can_derive {
        return Err(InputError::Schema(
            "required columns not found: need a complete stat column or both log2FoldChange and pvalue"
                .to_string(),
        )
        .into());
    }

    let mut stats = Vec::with_capacity(table.rows.len());
    let mut derived = 0usize;
    for row in &table.rows {
        let stat = match row.stat {
            Some(value) if use_precomputed => value,
            _ => {
                derived += 1;
                derive_stat(row.log2_fold_change, row.pvalue)
            }
        };
        stats.push(LocusStat {
            locus_tag: row.locus_tag.clone(),
            stat,
        });
    }

    let source = if derived == 0 {
        StatSource::Precomputed
    } else if derived == stats.len() {
        StatSource::Derived
    } else {
        StatSource::Mixed
    };
    if derived > 0 {
        tracing::info!(rows = derived, "ranking statistic derived from log2FoldChange and pvalue");
    }

    Ok(Stage2Output {
        stats,
        source,
        derived,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_rank.rs"]
mod tests;

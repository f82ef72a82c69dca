use std::collections::BTreeMap;

use crate::input::annotation::Annotation;
use crate::model::RankedGene;
use crate::pipeline::PipelineError;
use crate::pipeline::stage2_rank::LocusStat;

#[derive(Debug)]
pub struct Stage3Output {
    pub ranked: Vec<RankedGene>,
    pub joined: usize,
    pub unmatched: usize,
}

pub fn run_stage3(
    stats: &[LocusStat],
    annotation: &Annotation,
    keep_unmatched: bool,
) -> Result<Stage3Output, PipelineError> {
    let (pairs, unmatched) = join_annotation(stats, annotation, keep_unmatched);
    if unmatched > 0 && !keep_unmatched {
        tracing::warn!(rows = unmatched, "loci without annotation dropped");
    }
    let joined = pairs.len();
    let ranked = aggregate_by_symbol(pairs);
    if ranked.is_empty() {
        return Err(PipelineError::EmptyJoin {
            rows: stats.len(),
            annotated: annotation.len(),
        });
    }
    Ok(Stage3Output {
        ranked,
        joined,
        unmatched,
    })
}

/// Maps locus tags to symbols. Unmatched loci are dropped, or kept under
/// their own tag when `keep_unmatched` is set.
pub fn join_annotation(
    stats: &[LocusStat],
    annotation: &Annotation,
    keep_unmatched: bool,
) -> (Vec<(String, f64)>, usize) {
    let mut pairs = Vec::with_capacity(stats.len());
    let mut unmatched = 0usize;
    for row in stats {
        match annotation.symbol(&row.locus_tag) {
            Some(symbol) => pairs.push((symbol.to_string(), row.stat)),
            None => {
                unmatched += 1;
                if keep_unmatched {
                    pairs.push((row.locus_tag.clone(), row.stat));
                }
            }
        }
    }
    (pairs, unmatched)
}

/// Averages scores per symbol and sorts descending. Non-finite scores are
/// left out of the mean; a symbol with none left is dropped. Groups start in
/// symbol order and the sort is stable, so ties stay alphabetical.
pub fn aggregate_by_symbol<I>(pairs: I) -> Vec<RankedGene>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (symbol, stat) in pairs {
        if !stat.is_finite() {
            continue;
        }
        let entry = groups.entry(symbol).or_insert((0.0, 0));
        entry.0 += stat;
        entry.1 += 1;
    }

    let mut ranked: Vec<RankedGene> = groups
        .into_iter()
        .map(|(symbol, (sum, n))| RankedGene::new(symbol, sum / n as f64))
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_merge.rs"]
mod tests;

use std::path::Path;

use crate::formats::gmt::{GmtWriteStats, write_gmt};
use crate::kegg::KeggSource;
use crate::kegg::parse::{attach_names, parse_gene_symbols, parse_pathway_links, parse_pathway_names};
use crate::model::{GeneSet, MIN_GENE_SET_MEMBERS};
use crate::pipeline::PipelineError;

#[derive(Debug)]
pub struct Stage1Output {
    pub sets: Vec<GeneSet>,
    pub genes_listed: usize,
    pub named_pathways: usize,
}

/// Downloads and joins the three KEGG listings into pathway gene sets.
pub fn build_gene_sets(
    source: &dyn KeggSource,
    organism: &str,
) -> Result<Stage1Output, PipelineError> {
    let genes = source.list_genes(organism)?;
    let symbols = parse_gene_symbols(&genes, organism);
    if let Some(first) = genes.lines().next() {
        tracing::debug!(row = first, "gene listing format");
    }
    tracing::info!(genes = symbols.len(), "gene symbols resolved");

    let links = source.link_pathways(organism)?;
    let mut sets = parse_pathway_links(&links, &symbols, organism);
    tracing::info!(pathways = sets.len(), "pathway memberships parsed");

    let listing = source.list_pathways(organism)?;
    let names = parse_pathway_names(&listing);
    let named_pathways = attach_names(&mut sets, &names);
    if named_pathways < sets.len() {
        tracing::warn!(
            unnamed = sets.len() - named_pathways,
            "some pathways have no listed name; using their ids"
        );
    }

    Ok(Stage1Output {
        sets,
        genes_listed: symbols.len(),
        named_pathways,
    })
}

pub fn run_stage1(
    source: &dyn KeggSource,
    organism: &str,
    out_path: &Path,
) -> Result<GmtWriteStats, PipelineError> {
    let stage1 = build_gene_sets(source, organism)?;
    tracing::info!(
        path = %out_path.display(),
        genes = stage1.genes_listed,
        named = stage1.named_pathways,
        "writing gene sets"
    );
    let stats = write_gmt(out_path, &stage1.sets, MIN_GENE_SET_MEMBERS)
        .map_err(|e| PipelineError::write(out_path, e))?;
    tracing::info!(
        written = stats.written,
        skipped = stats.skipped_small,
        min_members = MIN_GENE_SET_MEMBERS,
        "gene set file complete"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_gene_sets.rs"]
mod tests;

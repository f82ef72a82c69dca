mod formats;
mod input;
mod kegg;
mod layout;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::formats::gmt::{count_in_size_window, read_gmt};
use crate::formats::rnk::read_rnk;
use crate::input::annotation::load_annotation;
use crate::input::deseq::{DeLayout, DeReadOptions, Delimiter};
use crate::kegg::{DEFAULT_BASE_URL, HttpKegg};
use crate::layout::{ProjectLayout, default_gmt_name};
use crate::model::StatPolicy;
use crate::pipeline::batch::{BatchConfig, SUMMARY_FILE, run_batch};
use crate::pipeline::stage1_gene_sets::run_stage1;
use crate::pipeline::stage4_enrich::{
    DEFAULT_GSEAPY_PROGRAM, EnrichmentParams, GeneSetSource, GseapyCli, PrerankRequest, run_stage4,
};
use crate::pipeline::tasks::{builtin_tasks, load_manifest, with_folder_suffix};
use crate::pipeline::{PipelineError, RankOptions, rank_de_table};

/// Builds KEGG gene sets and DESeq2 ranked lists for preranked GSEA.
#[derive(Debug, Parser)]
#[command(name = "kira-prerank", version, about, long_about = None)]
struct Cli {
    /// Project root holding data/ and results/.
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download KEGG pathways and write a GMT gene set file.
    Gmt {
        /// KEGG organism code (eco = E. coli K-12, ppu = P. putida KT2440).
        #[arg(short, long, default_value = "eco")]
        organism: String,
        /// Output file under data/external_data [default: <organism>_kegg.gmt].
        #[arg(long)]
        out: Option<String>,
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },

    /// Convert a DESeq2 results table into an RNK ranked list.
    Rank {
        /// Table under data/raw_data.
        #[arg(short, long)]
        input: String,
        /// RNK file under data/processed_data.
        #[arg(short, long, default_value = "ranked_genes.rnk")]
        output: String,
        #[command(flatten)]
        rank: RankArgs,
    },

    /// Run preranked enrichment on an existing RNK file.
    Gsea {
        /// RNK file under data/processed_data.
        #[arg(short, long)]
        rnk: String,
        /// GMT file under data/external_data, or a gene set library name.
        #[arg(short, long)]
        gene_sets: String,
        /// Folder under results/.
        #[arg(long, default_value = "gsea_analysis")]
        out_folder: String,
        #[command(flatten)]
        enrich: EnrichArgs,
    },

    /// Rank and test every comparison task in turn.
    Pipeline {
        /// JSON task manifest; the built-in D7/D15 comparisons when omitted.
        #[arg(long)]
        tasks: Option<PathBuf>,
        /// GMT file under data/external_data, or a gene set library name.
        #[arg(short, long, default_value = "eco_kegg.gmt")]
        gene_sets: String,
        /// Appended to every results folder name.
        #[arg(long, default_value = "")]
        folder_suffix: String,
        #[command(flatten)]
        rank: RankArgs,
        #[command(flatten)]
        enrich: EnrichArgs,
    },
}

#[derive(Debug, Args)]
struct RankArgs {
    /// Gzip feature table under data/external_data.
    #[arg(long)]
    annotation: Option<String>,
    #[arg(long, value_enum, default_value_t = DeLayout::Auto)]
    layout: DeLayout,
    #[arg(long, value_enum, default_value_t = Delimiter::Auto)]
    delimiter: Delimiter,
    #[arg(long, value_enum, default_value_t = StatPolicy::Auto)]
    stat_policy: StatPolicy,
    /// Keep loci without annotation under their locus tag.
    #[arg(long)]
    keep_unmatched: bool,
}

impl RankArgs {
    fn options(&self) -> RankOptions {
        RankOptions {
            read: DeReadOptions {
                layout: self.layout,
                delimiter: self.delimiter,
            },
            policy: self.stat_policy,
            keep_unmatched: self.keep_unmatched,
        }
    }
}

#[derive(Debug, Args)]
struct EnrichArgs {
    #[command(flatten)]
    params: EnrichmentParams,
    /// GSEApy executable.
    #[arg(long, default_value = DEFAULT_GSEAPY_PROGRAM)]
    gseapy: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let layout = ProjectLayout::new(&cli.project_dir);
    tracing::debug!(root = %layout.root().display(), "project layout");

    match cli.command {
        Commands::Gmt {
            organism,
            out,
            base_url,
        } => {
            let out_name = out.unwrap_or_else(|| default_gmt_name(&organism));
            let out_path = layout.external_file(&out_name);
            let source = HttpKegg::new(&base_url)?;
            tracing::info!(%organism, "building KEGG gene sets");
            let stats = run_stage1(&source, &organism, &out_path)?;
            tracing::info!(
                pathways = stats.written,
                path = %out_path.display(),
                "gene set library ready"
            );
        }
        Commands::Rank {
            input,
            output,
            rank,
        } => {
            let annotation_path = layout.annotation(rank.annotation.as_deref());
            tracing::info!(path = %annotation_path.display(), "loading annotation");
            let annotation = load_annotation(&annotation_path)?;
            let input_path = layout.raw_file(&input);
            let output_path = layout.processed_file(&output);
            rank_de_table(&input_path, &output_path, &annotation, &rank.options())?;
        }
        Commands::Gsea {
            rnk,
            gene_sets,
            out_folder,
            enrich,
        } => {
            let rnk_path = layout.processed_file(&rnk);
            let ranked = read_rnk(&rnk_path)?;
            tracing::info!(genes = ranked.len(), path = %rnk_path.display(), "ranked list loaded");

            let source = GeneSetSource::parse(&gene_sets, &layout.external_data());
            if let GeneSetSource::File(path) = &source {
                let sets = read_gmt(path)?;
                tracing::info!(
                    sets = sets.len(),
                    testable = count_in_size_window(
                        &sets,
                        enrich.params.min_size,
                        enrich.params.max_size
                    ),
                    "gene sets loaded"
                );
            }

            let request = PrerankRequest {
                rnk: rnk_path,
                gene_sets: source,
                out_dir: layout.results_dir(&out_folder),
                params: enrich.params,
                verbose: cli.verbose,
            };
            run_stage4(&GseapyCli::new(enrich.gseapy), &request)?;
            tracing::info!(out = %request.out_dir.display(), "enrichment complete");
        }
        Commands::Pipeline {
            tasks,
            gene_sets,
            folder_suffix,
            rank,
            enrich,
        } => {
            let task_list = match tasks {
                Some(path) => load_manifest(&path)?,
                None => builtin_tasks(),
            };
            let task_list = with_folder_suffix(task_list, &folder_suffix);
            let config = BatchConfig {
                annotation: layout.annotation(rank.annotation.as_deref()),
                gene_sets: GeneSetSource::parse(&gene_sets, &layout.external_data()),
                params: enrich.params,
                rank: rank.options(),
                verbose: cli.verbose,
                layout,
            };
            let runner = GseapyCli::new(enrich.gseapy);
            let summary = run_batch(&config, &task_list, &runner)?;
            let failed = summary.failed();
            tracing::info!(
                tasks = summary.tasks.len(),
                failed,
                summary = %config.layout.results().join(SUMMARY_FILE).display(),
                "pipeline finished"
            );
            if failed > 0 {
                return Err(PipelineError::TasksFailed {
                    failed,
                    total: summary.tasks.len(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;

use std::path::PathBuf;

use crate::input::annotation::{Annotation, load_annotation};
use crate::layout::ProjectLayout;
use crate::pipeline::stage4_enrich::{
    EnrichError, EnrichmentParams, EnrichmentRunner, GeneSetSource, PrerankRequest, run_stage4,
};
use crate::pipeline::tasks::Task;
use crate::pipeline::{PipelineError, RankOptions, rank_de_table};
use crate::report::json::write_summary_json;
use crate::report::{PipelineSummary, TaskReport, TaskStatus};

pub const SUMMARY_FILE: &str = "pipeline_summary.json";

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub layout: ProjectLayout,
    pub annotation: PathBuf,
    pub gene_sets: GeneSetSource,
    pub params: EnrichmentParams,
    pub rank: RankOptions,
    pub verbose: bool,
}

/// Ranks and tests every task in order. A failing task is recorded and the
/// next one still runs; only a missing gene set file or annotation stops
/// the whole batch.
pub fn run_batch(
    config: &BatchConfig,
    tasks: &[Task],
    runner: &dyn EnrichmentRunner,
) -> Result<PipelineSummary, PipelineError> {
    if let GeneSetSource::File(path) = &config.gene_sets {
        if !path.exists() {
            return Err(EnrichError::MissingGeneSets(path.display().to_string()).into());
        }
    }

    tracing::info!(path = %config.annotation.display(), "loading annotation");
    let annotation = load_annotation(&config.annotation)?;
    tracing::info!(loci = annotation.len(), "annotation loaded");

    let mut reports = Vec::with_capacity(tasks.len());
    for task in tasks {
        tracing::info!(task = %task.name, "processing");
        let report = run_task(config, task, &annotation, runner);
        match report.status {
            TaskStatus::Completed => tracing::info!(
                task = %task.name,
                results = report.results_dir.as_deref().unwrap_or(""),
                "task complete"
            ),
            status => tracing::warn!(
                task = %task.name,
                ?status,
                error = report.error.as_deref().unwrap_or(""),
                "task failed"
            ),
        }
        reports.push(report);
    }

    let summary = PipelineSummary {
        tool: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        gene_sets: gene_set_label(&config.gene_sets),
        annotation: config.annotation.display().to_string(),
        params: config.params.clone(),
        tasks: reports,
    };
    let summary_path = config.layout.results().join(SUMMARY_FILE);
    write_summary_json(&summary_path, &summary)
        .map_err(|e| PipelineError::write(&summary_path, e))?;
    Ok(summary)
}

fn run_task(
    config: &BatchConfig,
    task: &Task,
    annotation: &Annotation,
    runner: &dyn EnrichmentRunner,
) -> TaskReport {
    let input = config.layout.raw_file(&task.input);
    let mut report = TaskReport {
        name: task.name.clone(),
        status: TaskStatus::Completed,
        rank: None,
        results_dir: None,
        error: None,
    };

    if !input.exists() {
        report.status = TaskStatus::MissingInput;
        report.error = Some(format!("input not found: {}", input.display()));
        return report;
    }

    let output = config.layout.processed_file(&task.output_rnk);
    match rank_de_table(&input, &output, annotation, &config.rank) {
        Ok(stats) => report.rank = Some(stats),
        Err(err) => {
            report.status = TaskStatus::RankFailed;
            report.error = Some(err.to_string());
            return report;
        }
    }

    let out_dir = config.layout.results_dir(&task.output_folder);
    let request = PrerankRequest {
        rnk: output,
        gene_sets: config.gene_sets.clone(),
        out_dir: out_dir.clone(),
        params: config.params.clone(),
        verbose: config.verbose,
    };
    match run_stage4(runner, &request) {
        Ok(()) => report.results_dir = Some(out_dir.display().to_string()),
        Err(err) => {
            report.status = TaskStatus::EnrichmentFailed;
            report.error = Some(err.to_string());
        }
    }
    report
}

fn gene_set_label(source: &GeneSetSource) -> String {
    match source {
        GeneSetSource::File(path) => path.display().to_string(),
        GeneSetSource::Library(name) => name.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/batch.rs"]
mod tests;

use serde::Serialize;

use crate::model::StatSource;
use crate::pipeline::stage4_enrich::EnrichmentParams;

pub mod json;

/// Counts gathered while converting one differential expression table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankStats {
    pub input: String,
    pub output: String,
    pub de_rows: usize,
    pub annotated_loci: usize,
    pub stat_source: StatSource,
    pub derived_rows: usize,
    pub joined_rows: usize,
    pub unmatched_rows: usize,
    pub symbols: usize,
    pub top: Option<String>,
    pub bottom: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    MissingInput,
    RankFailed,
    EnrichmentFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub name: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<RankStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub tool: String,
    pub version: String,
    pub gene_sets: String,
    pub annotation: String,
    pub params: EnrichmentParams,
    pub tasks: Vec<TaskReport>,
}

impl PipelineSummary {
    pub fn failed(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .count()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;

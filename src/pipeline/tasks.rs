use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// One comparison: a DESeq2 table ranked and tested on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// File under `data/raw_data`.
    pub input: String,
    /// File under `data/processed_data`.
    pub output_rnk: String,
    /// Folder under `results`.
    pub output_folder: String,
}

impl Task {
    pub fn new(name: &str, input: &str, output_rnk: &str, output_folder: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            output_rnk: output_rnk.to_string(),
            output_folder: output_folder.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskManifest {
    pub tasks: Vec<Task>,
}

/// The three time-course comparisons run by default.
pub fn builtin_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "Early adaptation (D7 vs D1)",
            "res_D7_vs_D1.tabular",
            "D7_vs_D1.rnk",
            "gsea_D7_vs_D1",
        ),
        Task::new(
            "Late phase (D15 vs D1)",
            "res_D15_vs_D1.tabular",
            "D15_vs_D1.rnk",
            "gsea_D15_vs_D1",
        ),
        Task::new(
            "Transition (D15 vs D7)",
            "res_D15_vs_D7.tabular",
            "D15_vs_D7.rnk",
            "gsea_D15_vs_D7",
        ),
    ]
}

pub fn load_manifest(path: &Path) -> Result<Vec<Task>, PipelineError> {
    let manifest_error = |message: String| PipelineError::Manifest {
        path: path.display().to_string(),
        message,
    };
    let text = std::fs::read_to_string(path).map_err(|e| manifest_error(e.to_string()))?;
    let manifest: TaskManifest =
        serde_json::from_str(&text).map_err(|e| manifest_error(e.to_string()))?;
    if manifest.tasks.is_empty() {
        return Err(manifest_error("no tasks listed".to_string()));
    }
    Ok(manifest.tasks)
}

/// Appends `suffix` to every results folder, e.g. `_PPU` for a second
/// organism's gene sets.
pub fn with_folder_suffix(tasks: Vec<Task>, suffix: &str) -> Vec<Task> {
    if suffix.is_empty() {
        return tasks;
    }
    tasks
        .into_iter()
        .map(|mut task| {
            task.output_folder.push_str(suffix);
            task
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/tasks.rs"]
mod tests;

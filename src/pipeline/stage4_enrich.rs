use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

pub const DEFAULT_GSEAPY_PROGRAM: &str = "gseapy";

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("enrichment routine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("gene set file not found: {0} (build it with the gmt command first)")]
    MissingGeneSets(String),
    #[error("could not create output folder {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fixed prerank configuration; the seed keeps permutations reproducible.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args, serde::Serialize)]
pub struct EnrichmentParams {
    /// Number of permutations.
    #[arg(long, default_value_t = 1000)]
    pub permutations: u32,
    /// Smallest gene set tested.
    #[arg(long, default_value_t = 5)]
    pub min_size: usize,
    /// Largest gene set tested.
    #[arg(long, default_value_t = 1000)]
    pub max_size: usize,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Worker threads handed to the enrichment routine.
    #[arg(long, default_value_t = 4)]
    pub threads: usize,
}

impl Default for EnrichmentParams {
    fn default() -> Self {
        Self {
            permutations: 1000,
            min_size: 5,
            max_size: 1000,
            seed: 42,
            threads: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneSetSource {
    /// A GMT file on disk.
    File(PathBuf),
    /// A library name the routine resolves on its own.
    Library(String),
}

impl GeneSetSource {
    /// Values that look like paths (a `.gmt` suffix or a separator) are
    /// files resolved against `base`; anything else is a library name.
    pub fn parse(value: &str, base: &Path) -> Self {
        let looks_like_path = value.ends_with(".gmt")
            || value.ends_with(".gmt.gz")
            || value.contains(std::path::MAIN_SEPARATOR)
            || value.contains('/');
        if looks_like_path {
            GeneSetSource::File(base.join(value))
        } else {
            GeneSetSource::Library(value.to_string())
        }
    }

    fn as_arg(&self) -> OsString {
        match self {
            GeneSetSource::File(path) => path.as_os_str().to_os_string(),
            GeneSetSource::Library(name) => OsString::from(name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrerankRequest {
    pub rnk: PathBuf,
    pub gene_sets: GeneSetSource,
    pub out_dir: PathBuf,
    pub params: EnrichmentParams,
    pub verbose: bool,
}

/// External preranked enrichment routine.
pub trait EnrichmentRunner {
    fn prerank(&self, request: &PrerankRequest) -> Result<(), EnrichError>;
}

/// Runs `gseapy prerank` as a child process.
#[derive(Debug, Clone)]
pub struct GseapyCli {
    pub program: PathBuf,
}

impl GseapyCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn command(&self, request: &PrerankRequest) -> Command {
        let params = &request.params;
        let mut cmd = Command::new(&self.program);
        cmd.arg("prerank")
            .arg("-r")
            .arg(&request.rnk)
            .arg("-g")
            .arg(request.gene_sets.as_arg())
            .arg("-o")
            .arg(&request.out_dir)
            .arg("-n")
            .arg(params.permutations.to_string())
            .arg("--min-size")
            .arg(params.min_size.to_string())
            .arg("--max-size")
            .arg(params.max_size.to_string())
            .arg("-s")
            .arg(params.seed.to_string())
            .arg("-p")
            .arg(params.threads.to_string());
        if request.verbose {
            cmd.arg("-v");
        }
        cmd
    }
}

impl EnrichmentRunner for GseapyCli {
    fn prerank(&self, request: &PrerankRequest) -> Result<(), EnrichError> {
        let mut cmd = self.command(request);
        tracing::debug!(command = ?cmd, "running enrichment");
        let output = cmd.output().map_err(|source| EnrichError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EnrichError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        tracing::debug!(
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "enrichment routine finished"
        );
        Ok(())
    }
}

/// Checks the gene set input, prepares the output folder and hands the
/// request to `runner`.
pub fn run_stage4(
    runner: &dyn EnrichmentRunner,
    request: &PrerankRequest,
) -> Result<(), EnrichError> {
    if let GeneSetSource::File(path) = &request.gene_sets {
        if !path.exists() {
            return Err(EnrichError::MissingGeneSets(path.display().to_string()));
        }
    }
    fs::create_dir_all(&request.out_dir).map_err(|source| EnrichError::OutputDir {
        path: request.out_dir.display().to_string(),
        source,
    })?;
    tracing::info!(
        rnk = %request.rnk.display(),
        out = %request.out_dir.display(),
        permutations = request.params.permutations,
        seed = request.params.seed,
        "running preranked enrichment"
    );
    runner.prerank(request)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_enrich.rs"]
mod tests;

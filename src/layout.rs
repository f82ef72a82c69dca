use std::path::{Path, PathBuf};

/// NCBI feature table shipped with the project under `data/external_data`.
pub const DEFAULT_ANNOTATION: &str = "GCF_026637775.1_ASM2663777v1_feature_table.txt.gz";

/// Fixed project directory tree. Relative file names are resolved inside
/// the matching directory; absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_data(&self) -> PathBuf {
        self.root.join("data").join("raw_data")
    }

    pub fn external_data(&self) -> PathBuf {
        self.root.join("data").join("external_data")
    }

    pub fn processed_data(&self) -> PathBuf {
        self.root.join("data").join("processed_data")
    }

    pub fn results(&self) -> PathBuf {
        self.root.join("results")
    }

    pub fn raw_file(&self, name: &str) -> PathBuf {
        self.raw_data().join(name)
    }

    pub fn external_file(&self, name: &str) -> PathBuf {
        self.external_data().join(name)
    }

    pub fn processed_file(&self, name: &str) -> PathBuf {
        self.processed_data().join(name)
    }

    pub fn results_dir(&self, task: &str) -> PathBuf {
        self.results().join(task)
    }

    pub fn annotation(&self, name: Option<&str>) -> PathBuf {
        self.external_file(name.unwrap_or(DEFAULT_ANNOTATION))
    }
}

/// Default GMT file name for a KEGG organism code.
pub fn default_gmt_name(organism: &str) -> String {
    format!("{organism}_kegg.gmt")
}

#[cfg(test)]
#[path = "../tests/src_inline/layout.rs"]
mod tests;

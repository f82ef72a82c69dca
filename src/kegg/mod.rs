//! Read-only access to the KEGG REST service.
//!
//! All three endpoints answer with newline-separated, tab-delimited text.
//! The [`KeggSource`] trait keeps the text-parsing side independent of the
//! transport.

use thiserror::Error;

pub mod parse;

pub const DEFAULT_BASE_URL: &str = "http://rest.kegg.jp";

#[derive(Debug, Error)]
pub enum KeggError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} returned an empty listing")]
    Empty { url: String },
}

/// Text listings needed to assemble organism pathway gene sets.
pub trait KeggSource {
    /// `/list/{organism}`: one gene per line.
    fn list_genes(&self, organism: &str) -> Result<String, KeggError>;

    /// `/link/pathway/{organism}`: `gene_id<TAB>pathway_id` pairs.
    fn link_pathways(&self, organism: &str) -> Result<String, KeggError>;

    /// `/list/pathway/{organism}`: `pathway_id<TAB>name` pairs.
    fn list_pathways(&self, organism: &str) -> Result<String, KeggError>;
}

pub struct HttpKegg {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpKegg {
    pub fn new(base_url: &str) -> Result<Self, KeggError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|source| KeggError::Http {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, path: &str) -> Result<String, KeggError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::info!(%url, "downloading");
        let response = self.client.get(&url).send().map_err(|source| KeggError::Http {
            url: url.clone(),
            source,
        })?;
        if !response.status().is_success() {
            return Err(KeggError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        let body = response.text().map_err(|source| KeggError::Http {
            url: url.clone(),
            source,
        })?;
        if body.trim().is_empty() {
            return Err(KeggError::Empty { url });
        }
        Ok(body)
    }
}

impl KeggSource for HttpKegg {
    fn list_genes(&self, organism: &str) -> Result<String, KeggError> {
        self.get(&format!("list/{organism}"))
    }

    fn link_pathways(&self, organism: &str) -> Result<String, KeggError> {
        self.get(&format!("link/pathway/{organism}"))
    }

    fn list_pathways(&self, organism: &str) -> Result<String, KeggError> {
        self.get(&format!("list/pathway/{organism}"))
    }
}

/// Added to p-values before the logarithm so that `p = 0` stays finite.
pub const PVALUE_EPSILON: f64 = 1e-300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatPolicy {
    /// Use the stat column when fully populated, otherwise derive every row.
    Auto,
    /// Use the stat column where present and derive the missing rows.
    Fill,
    /// Always derive from log2FoldChange and pvalue.
    Derive,
}

/// Where the ranking statistics of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSource {
    Precomputed,
    Derived,
    Mixed,
}

/// One ranked row keyed by gene symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGene {
    pub symbol: String,
    pub score: f64,
}

impl RankedGene {
    pub fn new(symbol: impl Into<String>, score: f64) -> Self {
        Self {
            symbol: symbol.into(),
            score,
        }
    }
}

/// `sign(log2fc) * -log10(pvalue + 1e-300)` with missing pvalue read as 1
/// and missing log2fc read as 0.
pub fn derive_stat(log2_fold_change: Option<f64>, pvalue: Option<f64>) -> f64 {
    let lfc = log2_fold_change.unwrap_or(0.0);
    let p = pvalue.unwrap_or(1.0);
    let value = sign(lfc) * -(p + PVALUE_EPSILON).log10();
    if value == 0.0 { 0.0 } else { value }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub mod gene_set;
pub mod ranking;

pub use gene_set::{GeneSet, MIN_GENE_SET_MEMBERS};
pub use ranking::{RankedGene, StatPolicy, StatSource};

#[cfg(test)]
#[path = "../../tests/src_inline/model/ranking.rs"]
mod tests;

/// Pathways with fewer member genes are not written to GMT files.
pub const MIN_GENE_SET_MEMBERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneSet {
    pub id: String,
    pub name: String,
    pub genes: Vec<String>,
}

impl GeneSet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            genes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }
}

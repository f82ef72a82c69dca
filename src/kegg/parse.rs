use std::collections::HashMap;

use crate::model::GeneSet;

/// Feature-type words that KEGG sometimes leaves where a gene name belongs.
pub const PLACEHOLDER_SYMBOLS: [&str; 4] = ["CDS", "tRNA", "rRNA", "Gene"];

const PATHWAY_PREFIX: &str = "path:";

/// `eco:b0001` -> `b0001` for organism `eco`.
pub fn strip_organism<'a>(gene_id: &'a str, organism: &str) -> &'a str {
    gene_id
        .strip_prefix(organism)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(gene_id)
}

/// Resolves the display symbol of one `/list/{organism}` row.
///
/// The description is the first field holding a `;` (else the last field),
/// and the symbol is the first comma-separated name before that `;`.
pub fn resolve_symbol(fields: &[&str], organism: &str) -> String {
    let gene_id = fields.first().map(|s| s.trim()).unwrap_or("");
    let fallback = strip_organism(gene_id, organism).to_string();

    let description = fields
        .iter()
        .find(|f| f.contains(';'))
        .copied()
        .or_else(|| if fields.len() > 1 { fields.last().copied() } else { None })
        .unwrap_or("");

    let head = description.split(';').next().unwrap_or("");
    let token = head.split(',').next().unwrap_or("").trim();

    let organism_prefix = format!("{organism}:");
    if token.is_empty()
        || token.chars().any(char::is_whitespace)
        || PLACEHOLDER_SYMBOLS.contains(&token)
        || token.starts_with(&organism_prefix)
    {
        return fallback;
    }
    token.to_string()
}

/// Gene identifier -> symbol for every row of a `/list/{organism}` listing.
pub fn parse_gene_symbols(text: &str, organism: &str) -> HashMap<String, String> {
    let mut symbols = HashMap::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let gene_id = fields[0].trim();
        if gene_id.is_empty() {
            continue;
        }
        let symbol = resolve_symbol(&fields, organism);
        symbols.insert(gene_id.to_string(), symbol);
    }
    symbols
}

/// Groups `/link/pathway/{organism}` pairs into gene sets, in first-seen
/// pathway order. Names are left equal to the pathway id.
pub fn parse_pathway_links(
    text: &str,
    symbols: &HashMap<String, String>,
    organism: &str,
) -> Vec<GeneSet> {
    let mut sets: Vec<GeneSet> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            continue;
        }
        let gene_id = fields[0].trim();
        let pathway_id = fields[1].trim();
        if gene_id.is_empty() || pathway_id.is_empty() {
            continue;
        }
        let symbol = symbols
            .get(gene_id)
            .cloned()
            .unwrap_or_else(|| strip_organism(gene_id, organism).to_string());

        let slot = *index.entry(pathway_id.to_string()).or_insert_with(|| {
            sets.push(GeneSet::new(pathway_id, pathway_id));
            sets.len() - 1
        });
        sets[slot].genes.push(symbol);
    }
    sets
}

/// Pathway id (without `path:`) -> human-readable name.
pub fn parse_pathway_names(text: &str) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for line in text.lines() {
        let mut fields = line.splitn(2, '\t');
        let (Some(id), Some(name)) = (fields.next(), fields.next()) else {
            if !line.trim().is_empty() {
                tracing::warn!(line, "pathway listing row has no name column; skipping");
            }
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        names.insert(pathway_key(id.trim()).to_string(), name.to_string());
    }
    names
}

pub fn pathway_key(pathway_id: &str) -> &str {
    pathway_id.strip_prefix(PATHWAY_PREFIX).unwrap_or(pathway_id)
}

/// Replaces set names with listed pathway names; unlisted sets keep their id.
pub fn attach_names(sets: &mut [GeneSet], names: &HashMap<String, String>) -> usize {
    let mut named = 0usize;
    for set in sets.iter_mut() {
        if let Some(name) = names.get(pathway_key(&set.id)) {
            set.name = name.clone();
            named += 1;
        } else {
            set.name = set.id.clone();
        }
    }
    named
}

#[cfg(test)]
#[path = "../../tests/src_inline/kegg/parse.rs"]
mod tests;

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::input::{InputError, is_missing, open_maybe_gz};

pub const LOCUS_TAG_COLUMN: &str = "locus_tag";
pub const SYMBOL_COLUMN: &str = "symbol";

/// Locus tag to gene symbol lookup built from a feature table.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    symbols: HashMap<String, String>,
    pub rows_read: usize,
    pub rows_without_symbol: usize,
    pub duplicate_locus_tags: usize,
}

impl Annotation {
    #[cfg(test)]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut annotation = Annotation::default();
        for (locus_tag, symbol) in pairs {
            annotation.rows_read += 1;
            annotation.insert(locus_tag.into(), symbol.into());
        }
        annotation
    }

    pub fn symbol(&self, locus_tag: &str) -> Option<&str> {
        self.symbols.get(locus_tag).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    fn insert(&mut self, locus_tag: String, symbol: String) {
        if self.symbols.contains_key(&locus_tag) {
            self.duplicate_locus_tags += 1;
            return;
        }
        self.symbols.insert(locus_tag, symbol);
    }
}

/// Reads the `locus_tag` and `symbol` columns of a tab-separated feature
/// table. Rows missing either value are dropped; the first row wins for a
/// repeated locus tag.
pub fn load_annotation(path: &Path) -> Result<Annotation, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse(format!(
            "annotation file is empty: {}",
            path.display()
        )));
    }
    let header: Vec<String> = buf
        .trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(|s| s.trim().to_string())
        .collect();
    let locus_col = column_index(&header, LOCUS_TAG_COLUMN)?;
    let symbol_col = column_index(&header, SYMBOL_COLUMN)?;

    let mut annotation = Annotation::default();
    let mut line_no = 1usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        annotation.rows_read += 1;
        let fields: Vec<&str> = line.split('\t').collect();
        let locus_tag = fields.get(locus_col).copied().unwrap_or("");
        let symbol = fields.get(symbol_col).copied().unwrap_or("");
        if is_missing(locus_tag) || is_missing(symbol) {
            annotation.rows_without_symbol += 1;
            continue;
        }
        annotation.insert(locus_tag.trim().to_string(), symbol.trim().to_string());
    }

    tracing::debug!(
        lines = line_no,
        rows = annotation.rows_read,
        without_symbol = annotation.rows_without_symbol,
        duplicates = annotation.duplicate_locus_tags,
        "annotation parsed"
    );

    Ok(annotation)
}

fn column_index(header: &[String], name: &str) -> Result<usize, InputError> {
    header.iter().position(|h| h == name).ok_or_else(|| {
        InputError::Schema(format!(
            "annotation table has no {} column (columns: {})",
            name,
            header.join(", ")
        ))
    })
}

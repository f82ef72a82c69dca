use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::input::{InputError, open_maybe_gz, parse_optional_f64};

/// Column order of headerless DESeq2 tables exported by Galaxy.
pub const POSITIONAL_COLUMNS: [&str; 7] = [
    "locus_tag",
    "baseMean",
    "log2FoldChange",
    "lfcSE",
    "stat",
    "pvalue",
    "padj",
];

const KNOWN_DATA_COLUMNS: [&str; 6] = [
    "baseMean",
    "log2FoldChange",
    "lfcSE",
    "stat",
    "pvalue",
    "padj",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeLayout {
    /// Detect from the first line.
    Auto,
    /// Header row; first column holds the locus tag.
    Named,
    /// Headerless seven-column table.
    Positional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Delimiter {
    Auto,
    Comma,
    Tab,
}

impl Delimiter {
    fn resolve(self, first_line: &str) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Auto => {
                if first_line.contains('\t') {
                    b'\t'
                } else {
                    b','
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeReadOptions {
    pub layout: DeLayout,
    pub delimiter: Delimiter,
}

impl Default for DeReadOptions {
    fn default() -> Self {
        Self {
            layout: DeLayout::Auto,
            delimiter: Delimiter::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeRow {
    pub locus_tag: String,
    pub base_mean: Option<f64>,
    pub log2_fold_change: Option<f64>,
    pub lfc_se: Option<f64>,
    pub stat: Option<f64>,
    pub pvalue: Option<f64>,
    pub padj: Option<f64>,
}

impl DeRow {
    pub fn new(locus_tag: &str) -> Self {
        Self {
            locus_tag: locus_tag.to_string(),
            base_mean: None,
            log2_fold_change: None,
            lfc_se: None,
            stat: None,
            pvalue: None,
            padj: None,
        }
    }
}

/// Which ranking inputs the table carries as columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeColumns {
    pub stat: bool,
    pub log2_fold_change: bool,
    pub pvalue: bool,
}

#[derive(Debug, Clone)]
pub struct DeTable {
    pub layout: DeLayout,
    pub columns: DeColumns,
    pub rows: Vec<DeRow>,
}

pub fn load_de_table(path: &Path, options: DeReadOptions) -> Result<DeTable, InputError> {
    let mut text = String::new();
    open_maybe_gz(path)?.read_to_string(&mut text)?;

    let Some(first) = text.lines().find(|l| !l.trim().is_empty()) else {
        return Err(InputError::Parse(format!(
            "differential expression table is empty: {}",
            path.display()
        )));
    };
    let delimiter = options.delimiter.resolve(first);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_no = record.position().map_or(0, |p| p.line() as usize);
        records.push((line_no, record));
    }
    let Some((_, header)) = records.first() else {
        return Err(InputError::Parse(format!(
            "differential expression table is empty: {}",
            path.display()
        )));
    };

    let layout = match options.layout {
        DeLayout::Auto => detect_layout(header),
        other => other,
    };
    let table = match layout {
        DeLayout::Positional => parse_positional(&records)?,
        _ => parse_named(&records)?,
    };
    tracing::debug!(
        rows = table.rows.len(),
        layout = ?table.layout,
        delimiter = %char::from(delimiter).escape_default(),
        "differential expression table parsed"
    );
    Ok(table)
}

/// Named when the first record mentions any DESeq2 result column.
pub fn detect_layout(first: &StringRecord) -> DeLayout {
    if first.iter().any(|f| KNOWN_DATA_COLUMNS.contains(&f)) {
        DeLayout::Named
    } else {
        DeLayout::Positional
    }
}

fn parse_positional(records: &[(usize, StringRecord)]) -> Result<DeTable, InputError> {
    let mut rows = Vec::with_capacity(records.len());
    for (line_no, fields) in records {
        if fields.len() > POSITIONAL_COLUMNS.len() {
            return Err(InputError::Schema(format!(
                "line {}: expected at most {} columns, found {}",
                line_no,
                POSITIONAL_COLUMNS.len(),
                fields.len()
            )));
        }
        let cell = |idx: usize| fields.get(idx).unwrap_or("");
        let mut row = DeRow::new(cell(0));
        row.base_mean = parse_optional_f64(cell(1), *line_no, "baseMean")?;
        row.log2_fold_change = parse_optional_f64(cell(2), *line_no, "log2FoldChange")?;
        row.lfc_se = parse_optional_f64(cell(3), *line_no, "lfcSE")?;
        row.stat = parse_optional_f64(cell(4), *line_no, "stat")?;
        row.pvalue = parse_optional_f64(cell(5), *line_no, "pvalue")?;
        row.padj = parse_optional_f64(cell(6), *line_no, "padj")?;
        rows.push(row);
    }
    Ok(DeTable {
        layout: DeLayout::Positional,
        columns: DeColumns {
            stat: true,
            log2_fold_change: true,
            pvalue: true,
        },
        rows,
    })
}

fn parse_named(records: &[(usize, StringRecord)]) -> Result<DeTable, InputError> {
    let Some(((_, header), data)) = records.split_first() else {
        return Err(InputError::Parse("differential expression table is empty".to_string()));
    };

    // R's write.table omits the row-name header, leaving one field fewer.
    let first_width = data.first().map_or(header.len(), |(_, r)| r.len());
    let data_columns: Vec<&str> = if first_width == header.len() + 1 {
        header.iter().collect()
    } else {
        header.iter().skip(1).collect()
    };
    let width = data_columns.len() + 1;

    let position = |name: &str| data_columns.iter().position(|&c| c == name).map(|i| i + 1);
    let base_mean = position("baseMean");
    let lfc = position("log2FoldChange");
    let lfc_se = position("lfcSE");
    let stat = position("stat");
    let pvalue = position("pvalue");
    let padj = position("padj");

    let mut rows = Vec::with_capacity(data.len());
    for (line_no, fields) in data {
        if fields.len() > width {
            return Err(InputError::Schema(format!(
                "line {}: expected at most {} columns, found {}",
                line_no,
                width,
                fields.len()
            )));
        }
        let cell = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).unwrap_or("");
        let mut row = DeRow::new(fields.get(0).unwrap_or(""));
        row.base_mean = parse_optional_f64(cell(base_mean), *line_no, "baseMean")?;
        row.log2_fold_change = parse_optional_f64(cell(lfc), *line_no, "log2FoldChange")?;
        row.lfc_se = parse_optional_f64(cell(lfc_se), *line_no, "lfcSE")?;
        row.stat = parse_optional_f64(cell(stat), *line_no, "stat")?;
        row.pvalue = parse_optional_f64(cell(pvalue), *line_no, "pvalue")?;
        row.padj = parse_optional_f64(cell(padj), *line_no, "padj")?;
        rows.push(row);
    }

    Ok(DeTable {
        layout: DeLayout::Named,
        columns: DeColumns {
            stat: stat.is_some(),
            log2_fold_change: lfc.is_some(),
            pvalue: pvalue.is_some(),
        },
        rows,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/deseq.rs"]
mod tests;

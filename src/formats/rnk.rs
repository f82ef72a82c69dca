use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::input::{InputError, open_maybe_gz};
use crate::model::RankedGene;

/// Shortest round-trip form, always with a decimal point or exponent.
pub fn format_score(score: f64) -> String {
    format!("{score:?}")
}

/// Writes a headerless `symbol<TAB>score` list.
///
/// Rows go to a temporary sibling that is renamed into place only once
/// complete.
pub fn write_rnk(path: &Path, genes: &[RankedGene]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_sibling(path);
    let result = write_rows(&tmp, genes);
    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)
}

fn write_rows(path: &Path, genes: &[RankedGene]) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for gene in genes {
        writeln!(w, "{}\t{}", gene.symbol, format_score(gene.score))?;
    }
    w.flush()
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

pub fn read_rnk(path: &Path) -> Result<Vec<RankedGene>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut genes = Vec::new();
    let mut line_no = 0usize;

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
        let Some((symbol, score)) = line.split_once('\t') else {
            return Err(InputError::Parse(format!(
                "rnk line {} is not symbol<TAB>score",
                line_no
            )));
        };
        let score = score.trim().parse::<f64>().map_err(|_| {
            InputError::Parse(format!("rnk line {} has non-numeric score", line_no))
        })?;
        genes.push(RankedGene::new(symbol.trim(), score));
    }

    if genes.is_empty() {
        return Err(InputError::Parse(format!(
            "rnk file is empty: {}",
            path.display()
        )));
    }
    Ok(genes)
}

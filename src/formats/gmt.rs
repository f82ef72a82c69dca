use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::input::{InputError, open_maybe_gz};
use crate::model::GeneSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GmtWriteStats {
    pub written: usize,
    pub skipped_small: usize,
}

pub fn format_gmt_line(set: &GeneSet) -> String {
    let mut line = String::with_capacity(set.name.len() + set.id.len() + set.genes.len() * 8);
    line.push_str(&set.name);
    line.push('\t');
    line.push_str(&set.id);
    for gene in &set.genes {
        line.push('\t');
        line.push_str(gene);
    }
    line.push('\n');
    line
}

/// Writes one pathway per line, skipping sets below `min_members`.
///
/// Lines are flushed one at a time, so an interrupted write leaves only
/// complete lines behind.
pub fn write_gmt(
    path: &Path,
    sets: &[GeneSet],
    min_members: usize,
) -> std::io::Result<GmtWriteStats> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);
    let mut stats = GmtWriteStats::default();
    for set in sets {
        if set.len() < min_members {
            stats.skipped_small += 1;
            continue;
        }
        w.write_all(format_gmt_line(set).as_bytes())?;
        w.flush()?;
        stats.written += 1;
    }
    w.flush()?;
    Ok(stats)
}

pub fn read_gmt(path: &Path) -> Result<Vec<GeneSet>, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut sets = Vec::new();
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
        let mut fields = line.split('\t');
        let name = fields.next().unwrap_or("");
        let Some(id) = fields.next() else {
            return Err(InputError::Parse(format!(
                "gmt line {} has no pathway id column",
                line_no
            )));
        };
        let mut set = GeneSet::new(id, name);
        set.genes = fields
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        sets.push(set);
    }

    Ok(sets)
}

/// Number of sets whose size falls inside `[min, max]`.
pub fn count_in_size_window(sets: &[GeneSet], min: usize, max: usize) -> usize {
    sets.iter()
        .filter(|s| s.len() >= min && s.len() <= max)
        .count()
}

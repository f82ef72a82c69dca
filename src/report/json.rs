use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::report::PipelineSummary;

pub fn render_summary_json(summary: &PipelineSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

pub fn write_summary_json(path: &Path, summary: &PipelineSummary) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = render_summary_json(summary)?;
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    w.flush()
}

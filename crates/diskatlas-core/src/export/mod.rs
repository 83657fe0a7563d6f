/// Report export: the scan result as pretty JSON, and its two tables
/// (largest files, extension histogram) as CSV.
///
/// All writers take any `io::Write`, so callers decide between files,
/// buffers and stdout.
use crate::analysis::ranked_extensions;
use crate::model::ScanResult;
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error while exporting: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Serialise the whole result, tree included.
pub fn write_json<W: Write>(result: &ScanResult, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// `size,path` rows, largest first.
pub fn write_top_files_csv<W: Write>(result: &ScanResult, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["size", "path"])?;
    for file in &result.top_files {
        let size = file.size.to_string();
        let path = file.path.to_string_lossy();
        wtr.write_record([size.as_str(), &*path])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `extension,bytes,count,share` rows, ordered as [`ranked_extensions`].
pub fn write_extensions_csv<W: Write>(result: &ScanResult, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["extension", "bytes", "count", "share"])?;
    for row in ranked_extensions(&result.ext_stats) {
        let record: [String; 4] = [
            row.ext,
            row.bytes.to_string(),
            row.count.to_string(),
            format!("{:.6}", row.share),
        ];
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

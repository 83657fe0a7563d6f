/// Extension histogram as a ranked table.
use crate::model::ExtStat;
use std::collections::HashMap;

/// One row of the extension table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionShare {
    pub ext: String,
    pub bytes: u64,
    pub count: u64,
    /// Fraction of all histogram bytes, in `0.0..=1.0`.
    pub share: f64,
}

/// Histogram rows by bytes descending; equal totals are ordered by name so
/// the table is stable between runs.
pub fn ranked_extensions(ext_stats: &HashMap<String, ExtStat>) -> Vec<ExtensionShare> {
    let total: u64 = ext_stats.values().map(|s| s.bytes).sum();
    let mut rows: Vec<ExtensionShare> = ext_stats
        .iter()
        .map(|(ext, stat)| ExtensionShare {
            ext: ext.clone(),
            bytes: stat.bytes,
            count: stat.count,
            share: if total > 0 {
                stat.bytes as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect();
    rows.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.ext.cmp(&b.ext)));
    rows
}

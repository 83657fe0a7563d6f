/// Command-line surface.
use clap::Parser;
use diskatlas_core::layout::Rect;
use diskatlas_core::scanner::options::{DEFAULT_GLOBAL_TOP_FILES, DEFAULT_TOP_FILES_PER_DIR};
use diskatlas_core::scanner::ScanOptions;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "diskatlas")]
#[command(about = "Scan directories and show where the space went", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directories to scan. Several roots are reported under one parent.
    #[arg(required = true)]
    pub roots: Vec<PathBuf>,

    /// Descend through symbolic links.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Largest files kept individually per directory.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP_FILES_PER_DIR)]
    pub per_dir: usize,

    /// Length of the global largest-files list.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_GLOBAL_TOP_FILES)]
    pub global_top: usize,

    /// Walk the roots concurrently.
    #[arg(long)]
    pub parallel: bool,

    /// Rows shown in each report table.
    #[arg(short = 'n', long, value_name = "N", default_value_t = 20)]
    pub top: usize,

    /// Print a squarified treemap of the focused directory for a WxH viewport.
    #[arg(long, value_name = "WxH", value_parser = parse_viewport)]
    pub treemap: Option<Rect>,

    /// Nest the treemap this many levels deep (1 = flat).
    #[arg(long, value_name = "LEVELS", default_value_t = 1)]
    pub depth: usize,

    /// Directory to report on instead of the scan root.
    #[arg(long, value_name = "PATH")]
    pub focus: Option<PathBuf>,

    /// Give up and discard the scan after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<u64>,

    /// Write the full result as JSON.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write `top_files.csv` and `extensions.csv` into this directory.
    #[arg(long, value_name = "DIR")]
    pub csv: Option<PathBuf>,

    /// Do not print progress while scanning.
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug-level logging (RUST_LOG takes precedence).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            follow_symlinks: self.follow_symlinks,
            top_files_per_dir: self.per_dir,
            global_top_files: self.global_top,
            parallel_roots: self.parallel,
            ..ScanOptions::default()
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit.map(Duration::from_secs)
    }
}

/// Parse `WxH` (or `W*H`) into a viewport anchored at the origin.
pub fn parse_viewport(s: &str) -> Result<Rect, String> {
    let (w, h) = s
        .split_once(['x', 'X', '*'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
        return Err(format!("viewport must be positive, got {w}x{h}"));
    }
    Ok(Rect::new(0.0, 0.0, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_parses_common_forms() {
        assert_eq!(parse_viewport("800x600"), Ok(Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert_eq!(parse_viewport("120X40"), Ok(Rect::new(0.0, 0.0, 120.0, 40.0)));
        assert_eq!(parse_viewport("1.5*2"), Ok(Rect::new(0.0, 0.0, 1.5, 2.0)));
    }

    #[test]
    fn viewport_rejects_garbage() {
        assert!(parse_viewport("800").is_err());
        assert!(parse_viewport("0x600").is_err());
        assert!(parse_viewport("axb").is_err());
        assert!(parse_viewport("-5x5").is_err());
    }

    #[test]
    fn flags_map_onto_scan_options() {
        let cli = Cli::parse_from([
            "diskatlas",
            "/tmp",
            "--per-dir",
            "5",
            "--global-top",
            "7",
            "--parallel",
            "--follow-symlinks",
        ]);
        let opts = cli.scan_options();
        assert_eq!(opts.top_files_per_dir, 5);
        assert_eq!(opts.global_top_files, 7);
        assert!(opts.parallel_roots);
        assert!(opts.follow_symlinks);
        assert_eq!(opts.progress_interval, ScanOptions::default().progress_interval);
    }

    #[test]
    fn defaults_follow_the_engine() {
        let cli = Cli::parse_from(["diskatlas", "a", "b"]);
        assert_eq!(cli.roots, [PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.scan_options(), ScanOptions::default());
        assert!(cli.treemap.is_none());
        assert_eq!(cli.time_limit(), None);
    }

    #[test]
    fn roots_are_required() {
        assert!(Cli::try_parse_from(["diskatlas"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

/// DiskAtlas CLI: terminal front-end.
///
/// This crate contains the command-line surface and the text reports.
/// Business logic lives in `diskatlas-core`; the binary only sets up
/// logging and calls [`run`].
pub mod cli;
pub mod report;
pub mod session;

pub use cli::Cli;
pub use session::{Phase, ScanSession};

use anyhow::{bail, Context};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// How often the progress channel is polled while scanning.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Scan the roots named on the command line and print the reports.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut session = ScanSession::new();
    session
        .start(cli.roots.clone(), cli.scan_options())
        .context("cannot start scan")?;

    let deadline = cli.time_limit().map(|limit| Instant::now() + limit);
    let mut stderr = io::stderr().lock();

    while session.is_scanning() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            session.cancel();
        }
        if session.process_scan_messages() && !cli.quiet && session.is_scanning() {
            write_progress(&mut stderr, &session)?;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    if !cli.quiet {
        writeln!(stderr)?;
    }
    drop(stderr);

    match session.phase {
        Phase::Done => {}
        Phase::Cancelled => {
            info!("Scan cancelled before completion, nothing to report");
            eprintln!("Scan cancelled; no results.");
            return Ok(());
        }
        Phase::Failed => bail!(
            "scan failed: {}",
            session.error.as_deref().unwrap_or("unknown error")
        ),
        Phase::Idle | Phase::Scanning => bail!("scan ended in an unexpected state"),
    }

    if let Some(focus) = &cli.focus {
        let absolute = std::path::absolute(focus).unwrap_or_else(|_| focus.clone());
        if !session.focus_on(&absolute) {
            bail!("{} is not a scanned directory", focus.display());
        }
    }

    let (Some(result), Some(node)) = (session.result.as_ref(), session.focused_node()) else {
        bail!("scan finished without a result");
    };

    let mut out = io::stdout().lock();
    report::write_summary(&mut out, result)?;
    report::write_children(&mut out, node, cli.top)?;
    report::write_extensions(&mut out, result, cli.top)?;
    report::write_categories(&mut out, result)?;
    report::write_top_files(&mut out, result, cli.top)?;
    if let Some(viewport) = cli.treemap {
        report::write_treemap(&mut out, node, viewport, cli.depth)?;
    }
    out.flush()?;

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        diskatlas_core::export::write_json(result, BufWriter::new(file))
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!(path = %path.display(), "Wrote JSON report");
    }
    if let Some(dir) = &cli.csv {
        write_csv_reports(result, dir)?;
    }

    Ok(())
}

fn write_progress<W: Write>(w: &mut W, session: &ScanSession) -> io::Result<()> {
    use diskatlas_core::model::size::{format_count, format_size};

    let percent = session
        .percent()
        .map(|p| format!("{p:>5.1}% "))
        .unwrap_or_default();
    write!(
        w,
        "\r{percent}{} files, {} dirs, {}  ",
        format_count(session.files),
        format_count(session.dirs),
        format_size(session.bytes_scanned),
    )?;
    w.flush()
}

fn write_csv_reports(result: &diskatlas_core::model::ScanResult, dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;

    let top = dir.join("top_files.csv");
    let file = File::create(&top).with_context(|| format!("cannot create {}", top.display()))?;
    diskatlas_core::export::write_top_files_csv(result, BufWriter::new(file))
        .with_context(|| format!("cannot write {}", top.display()))?;

    let ext = dir.join("extensions.csv");
    let file = File::create(&ext).with_context(|| format!("cannot create {}", ext.display()))?;
    diskatlas_core::export::write_extensions_csv(result, BufWriter::new(file))
        .with_context(|| format!("cannot write {}", ext.display()))?;

    info!(dir = %dir.display(), "Wrote CSV reports");
    Ok(())
}

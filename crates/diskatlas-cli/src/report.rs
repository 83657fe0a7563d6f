/// Plain-text report tables.
///
/// Every writer takes an `io::Write` so the same code prints to stdout and
/// renders into buffers in tests.
use diskatlas_core::analysis::{category_breakdown, largest_files, ranked_extensions};
use diskatlas_core::layout::{layout_nested, NestedLayout, Rect};
use diskatlas_core::model::size::{format_count, format_size};
use diskatlas_core::model::{Node, ScanResult};
use std::io::{self, Write};

/// Children listed for one directory, matching what a treemap view shows.
pub const VIEW_CHILD_LIMIT: usize = 450;

pub fn write_summary<W: Write>(w: &mut W, result: &ScanResult) -> io::Result<()> {
    writeln!(w, "Scanned   {}", display_roots(result))?;
    writeln!(
        w,
        "Total     {} in {} files, {} directories",
        format_size(result.bytes_scanned),
        format_count(result.files),
        format_count(result.dirs),
    )?;
    writeln!(
        w,
        "Finished  {} ({:.2} s)",
        result.finished_at.format("%Y-%m-%d %H:%M:%S"),
        result.elapsed_sec(),
    )
}

/// Largest children of `node`, with their share of `node`.
pub fn write_children<W: Write>(w: &mut W, node: &Node, limit: usize) -> io::Result<()> {
    writeln!(w, "\n{} ({})", node.path.display(), format_size(node.size))?;
    for child in node.top_children(limit.min(VIEW_CHILD_LIMIT)) {
        let marker = if child.is_dir { "/" } else { "" };
        writeln!(
            w,
            "  {:>12}  {:>5.1}%  {}{}",
            format_size(child.size),
            child.percent_of(node.size),
            child.name,
            marker,
        )?;
    }
    Ok(())
}

pub fn write_extensions<W: Write>(w: &mut W, result: &ScanResult, limit: usize) -> io::Result<()> {
    writeln!(w, "\nExtensions")?;
    for row in ranked_extensions(&result.ext_stats).into_iter().take(limit) {
        writeln!(
            w,
            "  {:<16} {:>12}  {:>10} files  {:>5.1}%",
            row.ext,
            format_size(row.bytes),
            format_count(row.count),
            row.share * 100.0,
        )?;
    }
    Ok(())
}

pub fn write_categories<W: Write>(w: &mut W, result: &ScanResult) -> io::Result<()> {
    writeln!(w, "\nCategories")?;
    for stats in category_breakdown(&result.ext_stats) {
        writeln!(
            w,
            "  {:<12} {:>12}  {:>10} files",
            stats.category.label(),
            format_size(stats.bytes),
            format_count(stats.count),
        )?;
    }
    Ok(())
}

pub fn write_top_files<W: Write>(w: &mut W, result: &ScanResult, limit: usize) -> io::Result<()> {
    writeln!(w, "\nLargest files")?;
    for file in largest_files(result, limit) {
        writeln!(w, "  {:>12}  {}", format_size(file.size), file.path.display())?;
    }
    Ok(())
}

/// One line per treemap tile: rectangle, size and name, indented by depth.
pub fn write_treemap<W: Write>(
    w: &mut W,
    node: &Node,
    viewport: Rect,
    depth: usize,
) -> io::Result<()> {
    let opts = NestedLayout {
        max_depth: depth.max(1),
        ..NestedLayout::default()
    };
    let tiles = layout_nested(node, viewport, &opts);
    writeln!(
        w,
        "\nTreemap {}x{} of {} ({} tiles)",
        viewport.w,
        viewport.h,
        node.name,
        tiles.len()
    )?;
    for tile in tiles {
        let r = tile.rect;
        writeln!(
            w,
            "  {:indent$}{:>8.1} {:>8.1} {:>8.1} {:>8.1}  {:>12}  {}",
            "",
            r.x,
            r.y,
            r.w,
            r.h,
            format_size(tile.node.size),
            tile.node.name,
            indent = tile.depth * 2,
        )?;
    }
    Ok(())
}

fn display_roots(result: &ScanResult) -> String {
    result
        .scanned_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskatlas_core::model::{ExtStat, TopFile};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn sample() -> ScanResult {
        let root = Node::directory(
            "r",
            PathBuf::from("/r"),
            vec![
                Node::directory(
                    "media",
                    PathBuf::from("/r/media"),
                    vec![Node::file("film.mkv", PathBuf::from("/r/media/film.mkv"), 3 * 1024 * 1024)],
                ),
                Node::file("notes.txt", PathBuf::from("/r/notes.txt"), 1024 * 1024),
                Node::file("empty", PathBuf::from("/r/empty"), 0),
            ],
        );
        let mut ext_stats = HashMap::new();
        ext_stats.insert("mkv".to_string(), ExtStat { bytes: 3 * 1024 * 1024, count: 1 });
        ext_stats.insert("txt".to_string(), ExtStat { bytes: 1024 * 1024, count: 1 });
        ScanResult {
            root,
            ext_stats,
            top_files: vec![
                TopFile { size: 3 * 1024 * 1024, path: PathBuf::from("/r/media/film.mkv") },
                TopFile { size: 1024 * 1024, path: PathBuf::from("/r/notes.txt") },
            ],
            scanned_paths: vec![PathBuf::from("/r")],
            files: 3,
            dirs: 1,
            bytes_scanned: 4 * 1024 * 1024,
            elapsed: Duration::from_millis(1500),
            finished_at: chrono::Local::now(),
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn summary_shows_totals() {
        let result = sample();
        let out = render(|w| write_summary(w, &result));
        assert!(out.contains("4.00 MB in 3 files, 1 directories"), "{out}");
        assert!(out.contains("(1.50 s)"), "{out}");
    }

    #[test]
    fn children_skip_empty_entries_and_mark_dirs() {
        let result = sample();
        let out = render(|w| write_children(w, &result.root, 10));
        assert!(out.contains("75.0%  media/"), "{out}");
        assert!(out.contains("25.0%  notes.txt"), "{out}");
        assert!(!out.contains("empty"), "{out}");
    }

    #[test]
    fn tables_are_ranked() {
        let result = sample();
        let ext = render(|w| write_extensions(w, &result, 10));
        assert!(ext.find("mkv").unwrap() < ext.find("txt").unwrap());

        let cats = render(|w| write_categories(w, &result));
        assert!(cats.find("Video").unwrap() < cats.find("Documents").unwrap());

        let top = render(|w| write_top_files(w, &result, 1));
        assert!(top.contains("film.mkv"));
        assert!(!top.contains("notes.txt"));
    }

    #[test]
    fn treemap_lists_one_line_per_tile() {
        let result = sample();
        let flat = render(|w| write_treemap(w, &result.root, Rect::new(0.0, 0.0, 400.0, 300.0), 1));
        assert!(flat.contains("(2 tiles)"), "{flat}");

        let nested = render(|w| write_treemap(w, &result.root, Rect::new(0.0, 0.0, 400.0, 300.0), 2));
        assert!(nested.contains("(3 tiles)"), "{nested}");
        assert!(nested.contains("film.mkv"));
    }
}

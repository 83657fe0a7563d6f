/// Nested treemap: squarify a node's children, then recurse into each
/// directory tile, leaving room for a header band and a padding frame.
use super::squarify::squarify;
use super::Rect;
use crate::model::Node;

/// Tunables for [`layout_nested`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NestedLayout {
    /// Levels below the laid-out node to descend into. 1 gives a flat layout.
    pub max_depth: usize,
    /// Height reserved at the top of a directory tile for its label.
    pub header: f64,
    /// Gap between a directory's edge and its children.
    pub padding: f64,
    /// Tiles smaller than this are dropped together with their subtree.
    pub min_area: f64,
}

impl Default for NestedLayout {
    fn default() -> Self {
        Self {
            max_depth: 6,
            header: 16.0,
            padding: 1.5,
            min_area: 24.0,
        }
    }
}

/// One rectangle of a nested layout.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    pub rect: Rect,
    pub node: &'a Node,
    /// 0 for the laid-out node's direct children.
    pub depth: usize,
}

/// Lay out `node`'s subtree inside `bounds`.
///
/// Every tile comes before the tiles nested inside it, so painting in order
/// draws parents underneath their children.
pub fn layout_nested<'a>(node: &'a Node, bounds: Rect, opts: &NestedLayout) -> Vec<Tile<'a>> {
    let mut tiles = Vec::new();
    if opts.max_depth > 0 {
        descend(node, bounds, 0, opts, &mut tiles);
    }
    tiles
}

fn descend<'a>(node: &'a Node, bounds: Rect, depth: usize, opts: &NestedLayout, tiles: &mut Vec<Tile<'a>>) {
    for (rect, child) in squarify(&node.children, bounds) {
        if rect.area() < opts.min_area {
            continue;
        }
        tiles.push(Tile {
            rect,
            node: child,
            depth,
        });

        if !child.is_dir || child.children.is_empty() || depth + 1 >= opts.max_depth {
            continue;
        }
        if let Some(inner) = rect.inset(opts.header, opts.padding) {
            descend(child, inner, depth + 1, opts, tiles);
        }
    }
}

/// Squarified treemap (Bruls, Huizing & van Wijk).
///
/// Children are taken largest first and packed into rows. A row is always
/// laid against the shorter side of the space still free, and grows for as
/// long as adding the next child does not make its worst aspect ratio
/// worse. Each finished row consumes its thickness from the free space.
use super::Rect;
use crate::model::Node;

/// Lay out `children` inside `bounds`.
///
/// Children with zero size are left out. The returned rectangles tile
/// `bounds` (up to floating-point rounding) with areas proportional to the
/// children's sizes, largest child first. An empty or zero-area input gives
/// an empty layout.
pub fn squarify(children: &[Node], bounds: Rect) -> Vec<(Rect, &Node)> {
    let mut nodes: Vec<&Node> = children.iter().filter(|n| n.size > 0).collect();
    if nodes.is_empty() || bounds.is_empty() {
        return Vec::new();
    }
    nodes.sort_by(|a, b| b.size.cmp(&a.size));

    let total: f64 = nodes.iter().map(|n| n.size as f64).sum();
    let scale = bounds.area() / total;
    let areas: Vec<f64> = nodes.iter().map(|n| n.size as f64 * scale).collect();

    let mut out = Vec::with_capacity(nodes.len());
    let mut free = bounds;
    let mut start = 0;

    while start < areas.len() {
        let side = free.w.min(free.h);
        // Sorted descending: the row's largest area is its first, the
        // smallest its last.
        let largest = areas[start];
        let mut sum = largest;
        let mut worst = worst_ratio(sum, largest, largest, side);
        let mut end = start + 1;

        while end < areas.len() {
            let candidate_sum = sum + areas[end];
            let candidate = worst_ratio(candidate_sum, largest, areas[end], side);
            if candidate > worst {
                break;
            }
            sum = candidate_sum;
            worst = candidate;
            end += 1;
        }

        free = place_row(&areas[start..end], &nodes[start..end], sum, free, &mut out);
        start = end;
    }

    out
}

/// Worst aspect ratio of a row with total area `sum`, extreme areas `max`
/// and `min`, laid against a side of length `side`.
fn worst_ratio(sum: f64, max: f64, min: f64, side: f64) -> f64 {
    let s2 = sum * sum;
    let w2 = side * side;
    f64::max((w2 * max) / s2, s2 / (w2 * min))
}

/// Lay one row against the shorter side of `free` and return what is left.
fn place_row<'a>(
    areas: &[f64],
    nodes: &[&'a Node],
    sum: f64,
    free: Rect,
    out: &mut Vec<(Rect, &'a Node)>,
) -> Rect {
    if free.w >= free.h {
        // Height is the short side: a column along the left edge.
        let thickness = if free.h > 0.0 { sum / free.h } else { 0.0 };
        let mut y = free.y;
        for (&area, &node) in areas.iter().zip(nodes) {
            let h = if thickness > 0.0 { area / thickness } else { 0.0 };
            out.push((Rect::new(free.x, y, thickness, h), node));
            y += h;
        }
        Rect::new(free.x + thickness, free.y, (free.w - thickness).max(0.0), free.h)
    } else {
        // Width is the short side: a row along the top edge.
        let thickness = if free.w > 0.0 { sum / free.w } else { 0.0 };
        let mut x = free.x;
        for (&area, &node) in areas.iter().zip(nodes) {
            let w = if thickness > 0.0 { area / thickness } else { 0.0 };
            out.push((Rect::new(x, free.y, w, thickness), node));
            x += w;
        }
        Rect::new(free.x, free.y + thickness, free.w, (free.h - thickness).max(0.0))
    }
}

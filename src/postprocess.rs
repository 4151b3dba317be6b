//! Merge, clip, and degenerate-filter passes (component C).
//!
//! Order is load-bearing: merge happens *before* the wall-with-holes clip,
//! so a merged custom can still be shattered by an aperture edge if one
//! genuinely crosses it, but is never shattered merely because its
//! unmerged constituents happened to straddle one differently.

use geo::{BoundingRect, LineString, Polygon};

use crate::config::{BlockWidths, DEGENERATE_MIN_MM, MERGE_TOLERANCE_MM};
use crate::geometry;
use crate::types::{CustomPiece, PlacedBlock, Row};
use crate::warnings::{Warning, WarningKind};

#[derive(Debug, Clone)]
enum Piece {
    Standard(PlacedBlock),
    Custom(CustomPiece),
}

impl Piece {
    fn x(&self) -> i64 {
        match self {
            Piece::Standard(b) => b.x,
            Piece::Custom(c) => c.x,
        }
    }
    fn width(&self) -> i64 {
        match self {
            Piece::Standard(b) => b.width,
            Piece::Custom(c) => c.width,
        }
    }
    fn right(&self) -> i64 {
        self.x() + self.width()
    }
    fn is_mergeable(&self, large_width: i64) -> bool {
        match self {
            Piece::Standard(b) => b.width < large_width,
            Piece::Custom(_) => true,
        }
    }
}

fn passes_size_floor(width: i64, height: i64) -> bool {
    (width as f64) > DEGENERATE_MIN_MM && (height as f64) > DEGENERATE_MIN_MM
}

/// Pass 1 / Pass 4: drop anything at or below the 1mm size floor.
fn degenerate_filter(row: &mut Row) {
    row.placed.retain(|b| passes_size_floor(b.width, b.height));
    row.customs.retain(|c| passes_size_floor(c.width, c.height));
}

/// Pass 2: merge maximal runs of consecutive mergeable pieces (customs, or
/// standards strictly smaller than `W_L`) whose combined width fits in one
/// `W_L` stock, within the adjacency tolerance.
fn merge_row(row: &Row, widths: &BlockWidths) -> Row {
    let mut items: Vec<Piece> = row
        .placed
        .iter()
        .cloned()
        .map(Piece::Standard)
        .chain(row.customs.iter().cloned().map(Piece::Custom))
        .collect();
    items.sort_by_key(Piece::x);

    let large = widths.large();
    let mut out = Row::new(row.y, row.height);
    let mut i = 0;
    while i < items.len() {
        if !items[i].is_mergeable(large) {
            push_piece(&mut out, items[i].clone());
            i += 1;
            continue;
        }
        let mut run_end = i;
        let mut run_width = items[i].width();
        while run_end + 1 < items.len() {
            let next = &items[run_end + 1];
            let gap = (next.x() - items[run_end].right()) as f64;
            if !next.is_mergeable(large) {
                break;
            }
            if gap > MERGE_TOLERANCE_MM {
                break;
            }
            if run_width + next.width() > large {
                break;
            }
            run_width += next.width();
            run_end += 1;
        }
        if run_end > i {
            let start_x = items[i].x();
            let merged = CustomPiece {
                x: start_x,
                y: row.y,
                width: run_width,
                height: row.height,
                geometry: rect_ring(start_x, row.y, run_width, row.height),
                source_block_width: large,
                waste: large - run_width,
            };
            out.customs.push(merged);
            i = run_end + 1;
        } else {
            push_piece(&mut out, items[i].clone());
            i += 1;
        }
    }
    out
}

fn push_piece(row: &mut Row, piece: Piece) {
    match piece {
        Piece::Standard(b) => row.placed.push(b),
        Piece::Custom(c) => row.customs.push(c),
    }
}

fn rect_ring(x: i64, y: i64, w: i64, h: i64) -> crate::types::RingPolygon {
    crate::types::RingPolygon::new(vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)])
}

fn rect_polygon(x: i64, y: i64, w: i64, h: i64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x as f64, y as f64),
            ((x + w) as f64, y as f64),
            ((x + w) as f64, (y + h) as f64),
            (x as f64, (y + h) as f64),
            (x as f64, y as f64),
        ]),
        vec![],
    )
}

/// Pass 3: clip every piece to the wall-with-holes and reclassify as
/// needed. `wall_with_holes` is `W*` (already carved by the valid
/// apertures).
fn clip_row(row: &Row, wall_with_holes: &Polygon<f64>, widths: &BlockWidths, warnings: &mut Vec<Warning>) -> Row {
    let mut out = Row::new(row.y, row.height);
    let wall_mp = geo::MultiPolygon::new(vec![wall_with_holes.clone()]);

    for b in &row.placed {
        let rect = rect_polygon(b.x, b.y, b.width, b.height);
        let original_area = geometry::polygon_area(&rect);
        let clipped = geometry::intersection(&geo::MultiPolygon::new(vec![rect]), &wall_mp);
        match clipped.0.len() {
            0 => {
                warnings.push(Warning::new(
                    WarningKind::DegenerateDropped,
                    format!("placed block at x={} y={} removed entirely by clip", b.x, b.y),
                ));
            }
            1 => {
                let (sanitized, hole_dropped) = geometry::sanitize(&clipped);
                if hole_dropped {
                    warnings.push(Warning::new(
                        WarningKind::HoleCountDropped,
                        "sanitize reduced hole count while clipping a placed block".to_string(),
                    ));
                }
                let Some(poly) = geometry::pick_largest(&sanitized) else {
                    warnings.push(Warning::new(
                        WarningKind::DegenerateDropped,
                        format!("placed block at x={} y={} sanitized to empty", b.x, b.y),
                    ));
                    continue;
                };
                let area = geometry::polygon_area(&poly);
                let bbox = poly.bounding_rect();
                let (bw, bh) = bbox
                    .map(|r| (r.width(), r.height()))
                    .unwrap_or((0.0, 0.0));
                if area >= 0.5 * original_area && bw <= b.width as f64 + 1e-6 && bh <= b.height as f64 + 1e-6 {
                    out.placed.push(*b);
                } else if let Some(custom) = crate::packers::custom_from_clip(&poly, row.y, row.height, widths) {
                    out.customs.push(custom);
                }
            }
            _ => {
                warnings.push(Warning::new(
                    WarningKind::MultiComponentCollapsed,
                    format!("clip of placed block at x={} y={} produced multiple components", b.x, b.y),
                ));
                for poly in &clipped.0 {
                    if let Some(custom) = crate::packers::custom_from_clip(poly, row.y, row.height, widths) {
                        out.customs.push(custom);
                    }
                }
            }
        }
    }

    for c in &row.customs {
        let rect = crate::geometry::ring_to_polygon(&c.geometry);
        let clipped = geometry::intersection(&geo::MultiPolygon::new(vec![rect]), &wall_mp);
        match clipped.0.len() {
            0 => {
                warnings.push(Warning::new(
                    WarningKind::DegenerateDropped,
                    format!("custom piece at x={} y={} removed entirely by clip", c.x, c.y),
                ));
            }
            1 => {
                let (sanitized, hole_dropped) = geometry::sanitize(&clipped);
                if hole_dropped {
                    warnings.push(Warning::new(
                        WarningKind::HoleCountDropped,
                        "sanitize reduced hole count while clipping a custom piece".to_string(),
                    ));
                }
                if let Some(poly) = geometry::pick_largest(&sanitized) {
                    if let Some(custom) = crate::packers::custom_from_clip(&poly, row.y, row.height, widths) {
                        out.customs.push(custom);
                    }
                }
            }
            _ => {
                for poly in &clipped.0 {
                    if let Some(custom) = crate::packers::custom_from_clip(poly, row.y, row.height, widths) {
                        out.customs.push(custom);
                    }
                }
            }
        }
    }

    out
}

/// Runs the four post-processing passes over every row and flattens the
/// result into the final `(placed, customs)` lists, in row-then-x order.
pub fn process(
    rows: &[Row],
    wall_with_holes: &Polygon<f64>,
    widths: &BlockWidths,
    warnings: &mut Vec<Warning>,
) -> (Vec<PlacedBlock>, Vec<CustomPiece>) {
    let mut placed = Vec::new();
    let mut customs = Vec::new();

    for row in rows {
        let mut row = row.clone();
        degenerate_filter(&mut row);
        let merged = merge_row(&row, widths);
        let mut clipped = clip_row(&merged, wall_with_holes, widths, warnings);
        degenerate_filter(&mut clipped);

        clipped.placed.sort_by_key(|b| b.x);
        clipped.customs.sort_by_key(|c| c.x);
        placed.extend(clipped.placed);
        customs.extend(clipped.customs);
    }

    (placed, customs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths() -> BlockWidths {
        BlockWidths::new(1239, 826, 413).unwrap()
    }

    #[test]
    fn merge_combines_small_runs_under_one_large_stock() {
        let mut row = Row::new(0, 495);
        row.placed.push(PlacedBlock::new(0, 0, 413, 495));
        row.placed.push(PlacedBlock::new(413, 0, 413, 495));
        let merged = merge_row(&row, &widths());
        assert_eq!(merged.customs.len(), 1);
        assert_eq!(merged.customs[0].width, 826);
        assert_eq!(merged.customs[0].source_block_width, 1239);
    }

    #[test]
    fn merge_leaves_large_blocks_untouched() {
        let mut row = Row::new(0, 495);
        row.placed.push(PlacedBlock::new(0, 0, 1239, 495));
        let merged = merge_row(&row, &widths());
        assert_eq!(merged.placed.len(), 1);
        assert!(merged.customs.is_empty());
    }

    #[test]
    fn merge_is_idempotent() {
        let mut row = Row::new(0, 495);
        row.placed.push(PlacedBlock::new(0, 0, 413, 495));
        row.placed.push(PlacedBlock::new(413, 0, 413, 495));
        let once = merge_row(&row, &widths());
        let twice = merge_row(&once, &widths());
        assert_eq!(once.customs.len(), twice.customs.len());
        assert_eq!(once.customs[0].width, twice.customs[0].width);
    }

    #[test]
    fn degenerate_pieces_are_dropped() {
        let mut row = Row::new(0, 495);
        row.placed.push(PlacedBlock::new(0, 0, 1, 495));
        row.placed.push(PlacedBlock::new(10, 0, 1239, 495));
        degenerate_filter(&mut row);
        assert_eq!(row.placed.len(), 1);
    }
}

//! Greedy, bidirectional row-sweep packer (component B).
//!
//! Used whenever no reinforcement constraint applies, and as the fallback
//! for strategy `small` when no reinforced candidate passes the coverage
//! gate for a row.

use geo::{BoundingRect, Polygon};

use crate::config::{BlockWidths, Direction};
use crate::geometry;
use crate::packers::{clip_rect_to_component, custom_from_clip};
use crate::types::{PlacedBlock, Row};

/// Fills one connected stripe component with a largest-first greedy sweep:
/// repeatedly places the widest standard block that still fits the
/// remaining span, leaving a single trailing custom for the residue.
pub fn pack_row_big(comp: &Polygon<f64>, widths: &BlockWidths, y: i64, height: i64, direction: Direction) -> Row {
    let mut row = Row::new(y, height);
    let bbox = match comp.bounding_rect() {
        Some(b) => b,
        None => return row,
    };
    let x_lo = bbox.min().x;
    let x_hi = bbox.max().x;
    let span = x_hi - x_lo;
    if span <= 0.0 {
        return row;
    }

    let catalogue = widths.descending();
    let mut remaining = span;
    // Cursor tracks the next placement's leading edge in traversal order;
    // `emit` always records pieces left-to-right in wall coordinates, then
    // the caller reverses RTL output for traversal-order emission.
    let mut cursor = 0.0_f64; // offset from the traversal-start edge
    let mut pieces: Vec<(f64, f64)> = Vec::new(); // (offset_from_start, width)

    loop {
        let chosen = catalogue.iter().copied().find(|&w| (w as f64) <= remaining + 1e-6);
        match chosen {
            Some(w) => {
                pieces.push((cursor, w as f64));
                cursor += w as f64;
                remaining -= w as f64;
            }
            None => break,
        }
    }
    if remaining > 1e-6 {
        pieces.push((cursor, remaining));
    }

    for (offset, w) in pieces {
        let (left, right) = match direction {
            Direction::Ltr => (x_lo + offset, x_lo + offset + w),
            Direction::Rtl => (x_hi - offset - w, x_hi - offset),
        };
        let is_standard_width = catalogue.contains(&(w.round() as i64));
        let clipped = clip_rect_to_component(comp, left, right, bbox.min().y, bbox.max().y);
        let Some(clipped) = clipped else { continue };
        let clipped_area = geometry::polygon_area(&clipped);
        let full_area = w * height as f64;

        if is_standard_width && clipped_area >= 0.5 * full_area {
            row.placed.push(PlacedBlock::new(left.round() as i64, y, w.round() as i64, height));
        } else if let Some(custom) = custom_from_clip(&clipped, y, height, widths) {
            row.customs.push(custom);
        }
    }

    if direction == Direction::Rtl {
        row.placed.sort_by_key(|b| std::cmp::Reverse(b.x));
        row.customs.sort_by_key(|c| std::cmp::Reverse(c.x));
    }
    row
}

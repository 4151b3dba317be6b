//! Per-row packing strategies (components B and S).

pub mod big;
pub mod small;

use geo::Polygon;

use crate::config::{BlockWidths, DEGENERATE_MIN_MM};
use crate::geometry;
use crate::types::{CustomPiece, Point, RingPolygon, Row};

/// Intersects an axis-aligned rectangle `[x0, x1] x [y0, y1]` with `comp`,
/// returning the largest-area resulting component (collapsing any
/// multi-component clip result, which is rare for well-formed wall
/// outlines but must never panic).
pub fn clip_rect_to_component(
    comp: &Polygon<f64>,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
) -> Option<Polygon<f64>> {
    let rect = geo::Polygon::new(
        geo::LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
        vec![],
    );
    let clipped = geometry::intersection(
        &geo::MultiPolygon::new(vec![comp.clone()]),
        &geo::MultiPolygon::new(vec![rect]),
    );
    geometry::pick_largest(&clipped)
}

/// Builds a [`CustomPiece`] from a clipped polygon, tagging it with the
/// smallest standard stock width that covers its bounding width.
pub fn custom_from_clip(poly: &Polygon<f64>, y: i64, height: i64, widths: &BlockWidths) -> Option<CustomPiece> {
    if geometry::polygon_area(poly) < geometry::AREA_EPS {
        return None;
    }
    let ring = geometry::polygon_to_ring(poly);
    let (min_x, max_x) = bounds_x(&ring);
    let width = max_x - min_x;
    if (width as f64) <= DEGENERATE_MIN_MM || (height as f64) <= DEGENERATE_MIN_MM {
        return None;
    }
    let source = widths.smallest_covering(width);
    Some(CustomPiece {
        x: min_x,
        y,
        width,
        height,
        geometry: ring,
        source_block_width: source,
        waste: source - width,
    })
}

fn bounds_x(ring: &RingPolygon) -> (i64, i64) {
    let xs: Vec<i64> = ring.vertices.iter().map(|p: &Point| p.0).collect();
    let min_x = xs.iter().copied().min().unwrap_or(0);
    let max_x = xs.iter().copied().max().unwrap_or(0);
    (min_x, max_x)
}

/// Deterministically appends `other`'s pieces after `into`'s, used when
/// concatenating per-component rows in traversal order.
pub fn append_row(into: &mut Row, mut other: Row) {
    into.placed.append(&mut other.placed);
    into.customs.append(&mut other.customs);
}

//! Polygon set-operations and the `sanitize` repair pass (component G).
//!
//! Geometry is carried as `geo::MultiPolygon<f64>` once it enters the
//! kernel; coordinates are millimetre-valued but not integer-snapped until
//! a piece is emitted at the `pack_wall` boundary.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::types::{Point, RingPolygon};

/// "Empty" threshold for polygon area, in mm^2.
pub const AREA_EPS: f64 = 0.01;

pub fn ring_to_polygon(ring: &RingPolygon) -> Polygon<f64> {
    let mut coords: Vec<Coord<f64>> = ring
        .vertices
        .iter()
        .map(|&(x, y)| Coord {
            x: x as f64,
            y: y as f64,
        })
        .collect();
    if coords.first() != coords.last() {
        coords.push(coords[0]);
    }
    Polygon::new(LineString::new(coords), vec![])
}

pub fn polygon_area(poly: &Polygon<f64>) -> f64 {
    use geo::Area;
    poly.unsigned_area()
}

pub fn multi_area(mp: &MultiPolygon<f64>) -> f64 {
    mp.0.iter().map(polygon_area).sum()
}

pub fn is_empty(mp: &MultiPolygon<f64>) -> bool {
    multi_area(mp) < AREA_EPS
}

/// Union of a set of polygons into a single (possibly multi-component,
/// possibly holed) region.
pub fn union(polygons: &[Polygon<f64>]) -> MultiPolygon<f64> {
    let mut acc = MultiPolygon::new(vec![]);
    for p in polygons {
        acc = acc.union(&MultiPolygon::new(vec![p.clone()]));
    }
    acc
}

pub fn union_multi(parts: &[MultiPolygon<f64>]) -> MultiPolygon<f64> {
    let mut acc = MultiPolygon::new(vec![]);
    for p in parts {
        acc = acc.union(p);
    }
    acc
}

pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.difference(b)
}

pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.intersection(b)
}

/// Returns the largest-area component of a (possibly multi-component)
/// region, or `None` if the region is empty.
pub fn pick_largest(mp: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    mp.0.iter()
        .filter(|p| polygon_area(p) >= AREA_EPS)
        .max_by(|a, b| {
            polygon_area(a)
                .partial_cmp(&polygon_area(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .cloned()
}

/// Repairs self-intersections and degenerate slivers. `geo` has no direct
/// `buffer(0)` primitive, so this substitutes a dedupe-and-reorient pass:
/// collinear/duplicate vertices are dropped and ring winding is normalized
/// (CCW exterior, CW holes). Returns the repaired geometry and whether any
/// interior ring was dropped in the process (the caller turns that into a
/// `hole-count-dropped` warning, never a hard failure).
pub fn sanitize(mp: &MultiPolygon<f64>) -> (MultiPolygon<f64>, bool) {
    let mut hole_dropped = false;
    let mut out = Vec::with_capacity(mp.0.len());
    for poly in &mp.0 {
        let ext = dedupe_collinear(poly.exterior());
        if ext.0.len() < 4 {
            continue;
        }
        let ext = force_orientation(ext, true);

        let mut holes = Vec::new();
        for interior in poly.interiors() {
            let cleaned = dedupe_collinear(interior);
            if cleaned.0.len() < 4 {
                hole_dropped = true;
                continue;
            }
            holes.push(force_orientation(cleaned, false));
        }
        out.push(Polygon::new(ext, holes));
    }
    (MultiPolygon::new(out), hole_dropped)
}

fn dedupe_collinear(ring: &LineString<f64>) -> LineString<f64> {
    let pts: Vec<Coord<f64>> = ring.0.clone();
    if pts.len() < 4 {
        return ring.clone();
    }
    let mut cleaned: Vec<Coord<f64>> = Vec::with_capacity(pts.len());
    for &c in &pts[..pts.len() - 1] {
        if cleaned.last().map(|l| approx_eq(*l, c)).unwrap_or(false) {
            continue;
        }
        cleaned.push(c);
    }
    if cleaned.len() >= 2 && approx_eq(cleaned[0], *cleaned.last().unwrap()) {
        cleaned.pop();
    }

    let mut result: Vec<Coord<f64>> = Vec::with_capacity(cleaned.len());
    let n = cleaned.len();
    for i in 0..n {
        let prev = cleaned[(i + n - 1) % n];
        let cur = cleaned[i];
        let next = cleaned[(i + 1) % n];
        if !is_collinear(prev, cur, next) {
            result.push(cur);
        }
    }
    if result.len() < 3 {
        result = cleaned;
    }
    if result.first() != result.last() {
        result.push(result[0]);
    }
    LineString::new(result)
}

fn approx_eq(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

fn is_collinear(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    cross.abs() < 1e-6
}

fn signed_area(ring: &LineString<f64>) -> f64 {
    let pts = &ring.0;
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n - 1 {
        sum += pts[i].x * pts[i + 1].y - pts[i + 1].x * pts[i].y;
    }
    sum / 2.0
}

fn force_orientation(ring: LineString<f64>, ccw: bool) -> LineString<f64> {
    let area = signed_area(&ring);
    let is_ccw = area > 0.0;
    if is_ccw == ccw {
        ring
    } else {
        let mut pts = ring.0;
        pts.reverse();
        LineString::new(pts)
    }
}

/// Rounds a `geo` ring to integer-millimetre vertices for emission.
pub fn polygon_to_ring(poly: &Polygon<f64>) -> RingPolygon {
    let verts: Vec<Point> = poly
        .exterior()
        .0
        .iter()
        .map(|c| (c.x.round() as i64, c.y.round() as i64))
        .collect();
    RingPolygon::new(verts)
}

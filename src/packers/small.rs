//! Backtracking combinatorial packer with reinforcement scoring
//! (component S). Used when a reinforcement profile is supplied.

use geo::{BoundingRect, Polygon};

use crate::config::{BlockWidths, Direction, ReinforcementConfig};
use crate::geometry;
use crate::packers::{clip_rect_to_component, custom_from_clip};
use crate::reinforcement;
use crate::types::{CustomPiece, PlacedBlock, Row};

/// One candidate row decomposition: an ordered sequence of standard
/// widths, plus an optional trailing custom width.
#[derive(Debug, Clone)]
struct Decomposition {
    widths: Vec<i64>,
    trailing_custom: Option<i64>,
}

/// Enumerates every decomposition of `remaining` mm into standard widths
/// (fixed descending order, depth-bounded backtracking) plus an optional
/// trailing custom. Generation order is fixed so that identical inputs
/// always yield identical candidate ordering.
fn enumerate(remaining: i64, catalogue: [i64; 3]) -> Vec<Decomposition> {
    let depth_limit = if catalogue[2] > 0 {
        ((remaining as f64) / (catalogue[2] as f64)).ceil() as usize + 1
    } else {
        1
    };
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    backtrack(remaining, catalogue, depth_limit, &mut prefix, &mut out);
    out
}

fn backtrack(
    remaining: i64,
    catalogue: [i64; 3],
    depth_left: usize,
    prefix: &mut Vec<i64>,
    out: &mut Vec<Decomposition>,
) {
    // "Stop here" is always a valid decomposition: exact fit if remaining
    // == 0, otherwise a trailing custom if remaining >= 1mm.
    if remaining == 0 {
        out.push(Decomposition {
            widths: prefix.clone(),
            trailing_custom: None,
        });
    } else if remaining >= 1 {
        out.push(Decomposition {
            widths: prefix.clone(),
            trailing_custom: Some(remaining),
        });
    }
    if depth_left == 0 {
        return;
    }
    for &w in &catalogue {
        if w <= remaining {
            prefix.push(w);
            backtrack(remaining - w, catalogue, depth_left - 1, prefix, out);
            prefix.pop();
        }
    }
}

fn materialize(
    decomp: &Decomposition,
    comp: &Polygon<f64>,
    x0: f64,
    x1: f64,
    y: i64,
    height: i64,
    direction: Direction,
    widths: &BlockWidths,
) -> Row {
    let mut row = Row::new(y, height);
    let mut offsets: Vec<(f64, f64, bool)> = Vec::new(); // (start_offset, width, is_standard)
    let mut cursor = 0.0;
    for &w in &decomp.widths {
        offsets.push((cursor, w as f64, true));
        cursor += w as f64;
    }
    if let Some(c) = decomp.trailing_custom {
        offsets.push((cursor, c as f64, false));
    }

    for (offset, w, is_standard) in offsets {
        let (left, right) = match direction {
            Direction::Ltr => (x0 + offset, x0 + offset + w),
            Direction::Rtl => (x1 - offset - w, x1 - offset),
        };
        let Some(clipped) = clip_rect_to_component(comp, left, right, y as f64, (y + height) as f64) else {
            continue;
        };
        let clipped_area = geometry::polygon_area(&clipped);
        let full_area = w * height as f64;
        if is_standard && clipped_area >= 0.5 * full_area {
            row.placed.push(PlacedBlock::new(left.round() as i64, y, w.round() as i64, height));
        } else if let Some(custom) = custom_from_clip(&clipped, y, height, widths) {
            row.customs.push(custom);
        }
    }
    if direction == Direction::Rtl {
        row.placed.sort_by_key(|b| std::cmp::Reverse(b.x));
        row.customs.sort_by_key(|c: &CustomPiece| std::cmp::Reverse(c.x));
    }
    row
}

fn score(row: &Row, lower: Option<&Row>) -> (f64, f64, usize, usize) {
    let stagger = reinforcement::stagger_score(lower, row);
    let pieces = reinforcement::piece_count(row).max(1);
    let customs = reinforcement::custom_count(row);
    let s = 40.0 * stagger
        + 30.0 * (1.0 - customs as f64 / pieces as f64)
        + 30.0 * (1.0 - (pieces.min(10)) as f64 / 10.0);
    (s, stagger, customs, pieces)
}

fn better(new: (f64, f64, usize, usize), best: (f64, f64, usize, usize)) -> bool {
    if (new.0 - best.0).abs() > 1e-9 {
        return new.0 > best.0;
    }
    if (new.1 - best.1).abs() > 1e-9 {
        return new.1 > best.1;
    }
    if new.2 != best.2 {
        return new.2 < best.2;
    }
    if new.3 != best.3 {
        return new.3 < best.3;
    }
    false
}

/// Selects the highest-scoring reinforced candidate for one connected
/// stripe component, or `None` if every candidate fails the coverage
/// gate (the orchestrator then falls back to [`crate::packers::big`]).
pub fn pack_row_small(
    comp: &Polygon<f64>,
    widths: &BlockWidths,
    reinforcement_cfg: &ReinforcementConfig,
    y: i64,
    height: i64,
    direction: Direction,
    lower_row: Option<&Row>,
) -> Option<Row> {
    let bbox = comp.bounding_rect()?;
    let x0 = bbox.min().x;
    let x1 = bbox.max().x;
    let span = x1 - x0;
    if span <= 0.0 {
        return None;
    }
    let span_mm = span.round() as i64;

    let decompositions = enumerate(span_mm, widths.descending());
    let mut best: Option<((f64, f64, usize, usize), Row)> = None;
    for decomp in &decompositions {
        let row = materialize(decomp, comp, x0, x1, y, height, direction, widths);
        if row.placed.is_empty() && row.customs.is_empty() {
            continue;
        }
        if !reinforcement::covers(lower_row, &row, reinforcement_cfg, widths) {
            continue;
        }
        let key = score(&row, lower_row);
        match &best {
            Some((best_key, _)) if !better(key, *best_key) => {}
            _ => best = Some((key, row)),
        }
    }
    best.map(|(_, row)| row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;

    fn rect(w: f64, h: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h), (0.0, 0.0)]),
            vec![],
        )
    }

    fn cfg() -> ReinforcementConfig {
        ReinforcementConfig {
            thickness: 58,
            spacing: 420,
            count_l: 3,
            count_m: 2,
            count_s: 1,
            height: 2970,
            height_from_ground: true,
        }
    }

    #[test]
    fn first_row_has_no_lower_row_and_always_finds_a_candidate() {
        let widths = BlockWidths::new(1239, 826, 413).unwrap();
        let comp = rect(2478.0, 495.0);
        let row = pack_row_small(&comp, &widths, &cfg(), 0, 495, Direction::Ltr, None).unwrap();
        assert_eq!(row.placed.len(), 2);
        assert!(row.customs.is_empty());
    }

    #[test]
    fn second_row_selection_satisfies_the_coverage_gate() {
        let widths = BlockWidths::new(1239, 826, 413).unwrap();
        let comp = rect(2478.0, 495.0);
        let lower = pack_row_small(&comp, &widths, &cfg(), 0, 495, Direction::Ltr, None).unwrap();
        let upper = pack_row_small(&comp, &widths, &cfg(), 495, 495, Direction::Ltr, Some(&lower)).unwrap();
        assert!(reinforcement::covers(Some(&lower), &upper, &cfg(), &widths));
    }

    #[test]
    fn enumeration_is_deterministic() {
        let a = enumerate(2478, [1239, 826, 413]);
        let b = enumerate(2478, [1239, 826, 413]);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.widths, y.widths);
            assert_eq!(x.trailing_custom, y.trailing_custom);
        }
    }
}

//! Reinforcement positions and cross-row coverage validation (component R).
//!
//! The structural contract is asymmetric by design: reinforcement
//! enumeration starts at the block's *right* edge. Do not silently
//! symmetrize this — mirroring the positions would place reinforcement
//! over a block-to-block joint instead of through solid material.

use crate::config::{BlockWidths, ReinforcementConfig, JOINT_TOLERANCE_MM};
use crate::types::{PlacedBlock, Row};

/// Reinforcement centre X-positions (local frame, from the block's left
/// edge) for a block of the given width, per the from-the-right rule:
/// `pos_k = width - t/2 - k*s` for `k = 0..n`, keeping only positions with
/// `pos_k - t/2 >= 0`.
pub fn positions(block_width: i64, t: i64, s: i64, n: u32) -> Vec<f64> {
    let w = block_width as f64;
    let half_t = t as f64 / 2.0;
    (0..n)
        .map(|k| w - half_t - (k as f64) * (s as f64))
        .filter(|&pos| pos - half_t >= -1e-9)
        .collect()
}

/// Global reinforcement centre positions for a placed block, given its
/// catalogue-width reinforcement count.
fn block_global_positions(block: &PlacedBlock, cfg: &ReinforcementConfig, widths: &BlockWidths) -> Vec<f64> {
    let n = cfg.count_for(widths, block.width);
    positions(block.width, cfg.thickness, cfg.spacing, n)
        .into_iter()
        .map(|p| block.x as f64 + p)
        .collect()
}

/// Every standard block's horizontal span in a row, as `(left, right)`.
fn spans(row: &Row) -> Vec<(f64, f64)> {
    row.placed
        .iter()
        .map(|b| (b.x as f64, b.right() as f64))
        .collect()
}

/// True iff `center` lies within `[left - tol, right + tol]` for some span.
fn covered_by_any(center: f64, spans: &[(f64, f64)], tol: f64) -> bool {
    spans
        .iter()
        .any(|&(l, r)| center >= l - tol && center <= r + tol)
}

/// Coverage is complete iff every reinforcement centre of every block in
/// `upper` is covered by some block in `lower`, within `± t/2`. A `None`
/// lower row (ground row) is vacuously complete.
pub fn covers(
    lower_row: Option<&Row>,
    upper_row: &Row,
    cfg: &ReinforcementConfig,
    widths: &BlockWidths,
) -> bool {
    let Some(lower) = lower_row else {
        return true;
    };
    let lower_spans = spans(lower);
    let tol = cfg.thickness as f64 / 2.0;
    upper_row.placed.iter().all(|block| {
        block_global_positions(block, cfg, widths)
            .iter()
            .all(|&c| covered_by_any(c, &lower_spans, tol))
    })
}

/// Vertical joint X-positions: the internal boundaries between consecutive
/// pieces (placed and custom) in a row, sorted.
pub fn joints(row: &Row) -> Vec<f64> {
    let mut edges: Vec<(f64, f64)> = row
        .placed
        .iter()
        .map(|b| (b.x as f64, b.right() as f64))
        .chain(row.customs.iter().map(|c| (c.x as f64, c.right() as f64)))
        .collect();
    edges.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    edges.windows(2).map(|w| w[0].1).collect()
}

/// Fraction of `upper`'s internal joints that do *not* coincide (within
/// [`JOINT_TOLERANCE_MM`]) with any joint in `lower`. 1.0 = perfect brick
/// pattern, 0.0 = fully aligned joints. A row with no internal joints
/// (zero or one piece) scores 1.0 — there is nothing to misalign.
pub fn stagger_score(lower_row: Option<&Row>, upper_row: &Row) -> f64 {
    let upper_joints = joints(upper_row);
    if upper_joints.is_empty() {
        return 1.0;
    }
    let lower_joints = lower_row.map(joints).unwrap_or_default();
    let unaligned = upper_joints
        .iter()
        .filter(|&&uj| {
            !lower_joints
                .iter()
                .any(|&lj| (uj - lj).abs() <= JOINT_TOLERANCE_MM)
        })
        .count();
    unaligned as f64 / upper_joints.len() as f64
}

/// Count of blocks + customs in a row, for the scoring formula's
/// `piece_count` term.
pub fn piece_count(row: &Row) -> usize {
    row.placed.len() + row.customs.len()
}

/// Count of custom pieces in a row, for the scoring formula's
/// `custom_count` term.
pub fn custom_count(row: &Row) -> usize {
    row.customs.len()
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn positions_are_from_the_right() {
        let pos = positions(1239, 58, 420, 3);
        assert_eq!(pos.len(), 3);
        assert!((pos[0] - (1239.0 - 29.0)).abs() < 1e-6);
        assert!((pos[1] - (1239.0 - 29.0 - 420.0)).abs() < 1e-6);
        assert!((pos[2] - (1239.0 - 29.0 - 840.0)).abs() < 1e-6);
    }

    #[test]
    fn positions_drop_entries_that_would_go_negative() {
        // width 413, t=58, s=420: second position is 413-29-420 < 0, dropped.
        let pos = positions(413, 58, 420, 3);
        assert_eq!(pos.len(), 1);
    }

    #[test]
    fn ground_row_coverage_is_vacuous() {
        let widths = BlockWidths::default();
        let upper = {
            let mut r = Row::new(0, 495);
            r.placed.push(PlacedBlock::new(0, 0, 1239, 495));
            r
        };
        assert!(covers(None, &upper, &cfg(), &widths));
    }

    #[test]
    fn coverage_fails_when_reinforcement_sits_over_a_gap() {
        let widths = BlockWidths::default();
        let lower = {
            let mut r = Row::new(0, 495);
            r.placed.push(PlacedBlock::new(0, 0, 413, 495));
            r
        };
        let upper = {
            let mut r = Row::new(495, 495);
            r.placed.push(PlacedBlock::new(0, 495, 1239, 495));
            r
        };
        assert!(!covers(Some(&lower), &upper, &cfg(), &widths));
    }

    #[test]
    fn stagger_is_zero_for_identical_aligned_rows() {
        let lower = {
            let mut r = Row::new(0, 495);
            r.placed.push(PlacedBlock::new(0, 0, 1239, 495));
            r.placed.push(PlacedBlock::new(1239, 0, 1239, 495));
            r
        };
        let upper = {
            let mut r = Row::new(495, 495);
            r.placed.push(PlacedBlock::new(0, 495, 1239, 495));
            r.placed.push(PlacedBlock::new(1239, 495, 1239, 495));
            r
        };
        assert_eq!(stagger_score(Some(&lower), &upper), 0.0);
    }
}

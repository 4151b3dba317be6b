//! `pack_wall`: the single entry point (component P).

use geo::{BoundingRect, MultiPolygon, Polygon};
use tracing::{debug, info, instrument};

use crate::config::{
    Direction, Strategy, WallConfig, APERTURE_MAX_FRACTION, APERTURE_MIN_AREA,
    ADAPTIVE_ROW_THRESHOLD_MM,
};
use crate::error::PackError;
use crate::geometry;
use crate::packers::big::pack_row_big;
use crate::packers::small::pack_row_small;
use crate::postprocess;
use crate::types::{PackResult, Row};
use crate::warnings::{Warning, WarningKind};

/// Computes the bill of materials for one wall. See crate docs for the
/// full input/output contract.
///
/// `cancel`, if provided, is checked once per main row (never mid-row) and
/// stops the main-row loop early if it returns `true`; partial results
/// collected so far are still passed through post-processing. The host is
/// expected to cancel at a row boundary, never mid-row.
#[instrument(skip(config, cancel), fields(strategy = ?config.strategy, direction = ?config.direction))]
pub fn pack_wall(config: &WallConfig, cancel: Option<&dyn Fn() -> bool>) -> Result<PackResult, PackError> {
    config.validate_shape()?;

    let mut warnings = Vec::new();

    let exterior_poly = geometry::ring_to_polygon(&config.exterior);
    let wall_area = geometry::polygon_area(&exterior_poly);

    // Invalid apertures (too small or too large) are discarded entirely:
    // they carve no hole in `w_star` and are not placement obstacles
    // either, so packing proceeds as if they were never drawn.
    let mut valid_apertures = Vec::new();
    for aperture in &config.apertures {
        let poly = geometry::ring_to_polygon(aperture);
        let area = geometry::polygon_area(&poly);
        if area < APERTURE_MIN_AREA {
            warnings.push(Warning::new(
                WarningKind::ApertureFiltered,
                format!("aperture area {area:.1}mm^2 is below the {APERTURE_MIN_AREA}mm^2 floor"),
            ));
        } else if area >= APERTURE_MAX_FRACTION * wall_area {
            warnings.push(Warning::new(
                WarningKind::ApertureOversized,
                format!(
                    "aperture area {area:.1}mm^2 is >= {:.0}% of wall area {wall_area:.1}mm^2",
                    APERTURE_MAX_FRACTION * 100.0
                ),
            ));
        } else {
            valid_apertures.push(poly);
        }
    }

    let valid_union = geometry::union(&valid_apertures);
    let w_star_raw = geometry::difference(&MultiPolygon::new(vec![exterior_poly]), &valid_union);
    let (w_star_sanitized, hole_dropped) = geometry::sanitize(&w_star_raw);
    if hole_dropped {
        warnings.push(Warning::new(
            WarningKind::HoleCountDropped,
            "sanitize reduced the working polygon's hole count".to_string(),
        ));
    }
    if w_star_sanitized.0.len() > 1 {
        warnings.push(Warning::new(
            WarningKind::MultiComponentCollapsed,
            format!(
                "working polygon had {} components after aperture subtraction; kept the largest",
                w_star_sanitized.0.len()
            ),
        ));
    }
    let w_star = geometry::pick_largest(&w_star_sanitized).ok_or(PackError::EmptyExterior)?;

    let bbox = w_star
        .bounding_rect()
        .ok_or(PackError::EmptyExterior)?;
    let ground = config.vertical.ground();
    let ceiling = config.vertical.ceiling();
    let y0 = bbox.min().y.round() as i64 + ground;
    let y1 = bbox.max().y.round() as i64 - ceiling;
    let h_avail = y1 - y0;
    if h_avail <= 0 {
        return Err(PackError::OffsetsExceedBand {
            ground,
            ceiling,
            available: bbox.max().y.round() as i64 - bbox.min().y.round() as i64,
        });
    }

    let n_rows = h_avail / config.height;
    let residue = h_avail - n_rows * config.height;
    info!(n_rows, residue, h_avail, "computed row schedule");

    let mut rows: Vec<Row> = Vec::new();
    let mut prev_row: Option<Row> = None;

    'rows: for k in 0..n_rows {
        if let Some(cancel_fn) = cancel {
            if cancel_fn() {
                debug!(row = k, "cancellation requested at row boundary");
                break 'rows;
            }
        }
        let y = y0 + k * config.height;
        let mut row = Row::new(y, config.height);

        let stripe = stripe_components(&w_star, y as f64, (y + config.height) as f64, config.direction);
        for comp in &stripe {
            let comp_row = match config.strategy {
                Strategy::Big => pack_row_big(comp, &config.widths, y, config.height, config.direction),
                Strategy::Small => {
                    let reinforcement_cfg = config
                        .reinforcement
                        .as_ref()
                        .expect("validated at config boundary");
                    match pack_row_small(
                        comp,
                        &config.widths,
                        reinforcement_cfg,
                        y,
                        config.height,
                        config.direction,
                        prev_row.as_ref(),
                    ) {
                        Some(r) => r,
                        None => {
                            warnings.push(Warning::new(
                                WarningKind::CoverageFallback,
                                format!("row at y={y} found no reinforced candidate; fell back to row-sweep"),
                            ));
                            pack_row_big(comp, &config.widths, y, config.height, config.direction)
                        }
                    }
                }
            };
            crate::packers::append_row(&mut row, comp_row);
        }

        prev_row = Some(row.clone());
        rows.push(row);
    }

    if residue >= ADAPTIVE_ROW_THRESHOLD_MM {
        let row_height = residue.min(config.height);
        let y = y0 + n_rows * config.height;
        let stripe = stripe_components(&w_star, y as f64, (y + row_height) as f64, config.direction);
        let collapsed = if stripe.len() > 1 {
            warnings.push(Warning::new(
                WarningKind::MultiComponentCollapsed,
                "adaptive top row stripe had multiple components; kept the largest".to_string(),
            ));
            geometry::pick_largest(&MultiPolygon::new(stripe))
        } else {
            stripe.into_iter().next()
        };
        if let Some(comp) = collapsed {
            let row = pack_row_big(&comp, &config.widths, y, row_height, config.direction);
            rows.push(row);
        }
    }

    let (placed, customs) = postprocess::process(&rows, &w_star, &config.widths, &mut warnings);

    Ok(PackResult {
        placed,
        customs,
        warnings,
    })
}

/// Horizontal-band stripe of `source`, split into connected components and
/// ordered for traversal per `direction`.
fn stripe_components(source: &Polygon<f64>, y0: f64, y1: f64, direction: Direction) -> Vec<Polygon<f64>> {
    let bbox = match source.bounding_rect() {
        Some(b) => b,
        None => return Vec::new(),
    };
    let x0 = bbox.min().x;
    let x1 = bbox.max().x;
    let band = Polygon::new(
        geo::LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
        vec![],
    );
    let stripe = geometry::intersection(&MultiPolygon::new(vec![source.clone()]), &MultiPolygon::new(vec![band]));
    let mut comps: Vec<Polygon<f64>> = stripe
        .0
        .into_iter()
        .filter(|p| geometry::polygon_area(p) >= geometry::AREA_EPS)
        .collect();
    comps.sort_by(|a, b| {
        let ax = a.bounding_rect().map(|r| r.min().x).unwrap_or(0.0);
        let bx = b.bounding_rect().map(|r| r.min().x).unwrap_or(0.0);
        ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
    });
    if direction == Direction::Rtl {
        comps.reverse();
    }
    comps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockWidths, VerticalConfig};
    use crate::types::RingPolygon;

    fn rect(w: i64, h: i64) -> RingPolygon {
        RingPolygon::new(vec![(0, 0), (w, 0), (w, h), (0, h)])
    }

    fn base(w: i64, h: i64) -> WallConfig {
        WallConfig {
            exterior: rect(w, h),
            apertures: vec![],
            widths: BlockWidths::default(),
            height: 495,
            strategy: Strategy::Big,
            reinforcement: None,
            direction: Direction::Ltr,
            vertical: VerticalConfig::default(),
        }
    }

    #[test]
    fn empty_exterior_is_a_config_error() {
        let config = base(0, 0);
        assert_eq!(pack_wall(&config, None).unwrap_err(), PackError::EmptyExterior);
    }

    #[test]
    fn non_positive_height_is_a_config_error() {
        let mut config = base(1000, 1000);
        config.height = 0;
        assert_eq!(pack_wall(&config, None).unwrap_err(), PackError::NonPositiveHeight(0));
    }

    #[test]
    fn small_strategy_without_reinforcement_is_a_config_error() {
        let mut config = base(1000, 1000);
        config.strategy = Strategy::Small;
        assert_eq!(pack_wall(&config, None).unwrap_err(), PackError::MissingReinforcement);
    }

    #[test]
    fn offsets_exceeding_the_band_is_a_config_error() {
        let mut config = base(1000, 1000);
        config.vertical.ground_offset = Some(600);
        config.vertical.ceiling_offset = Some(600);
        assert!(matches!(
            pack_wall(&config, None).unwrap_err(),
            PackError::OffsetsExceedBand { .. }
        ));
    }

    #[test]
    fn cancelling_immediately_yields_an_empty_but_successful_result() {
        let config = base(5000, 2970);
        let cancel = || true;
        let result = pack_wall(&config, Some(&cancel)).unwrap();
        assert!(result.placed.is_empty());
        assert!(result.customs.is_empty());
    }

    #[test]
    fn cancelling_after_two_rows_keeps_only_those_rows() {
        use std::cell::Cell;
        let config = base(5000, 2970);
        let rows_seen = Cell::new(0);
        let cancel = || {
            rows_seen.set(rows_seen.get() + 1);
            rows_seen.get() > 2
        };
        let result = pack_wall(&config, Some(&cancel)).unwrap();
        let max_y = result.placed.iter().map(|b| b.y).max().unwrap();
        assert!(max_y < 2 * config.height);
    }
}

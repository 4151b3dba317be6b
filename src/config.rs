//! The `pack_wall` input contract, expressed as serde-(de)serializable
//! configuration types.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PackError;
use crate::types::RingPolygon;

/// Three distinct positive standard widths, sorted descending
/// (`W_L >= W_M >= W_S`). Construction is the single point where the
/// "three distinct positives" configuration error is caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlockWidths {
    widths: [i64; 3],
}

impl<'de> Deserialize<'de> for BlockWidths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [a, b, c] = <[i64; 3]>::deserialize(deserializer)?;
        BlockWidths::new(a, b, c).map_err(serde::de::Error::custom)
    }
}

impl BlockWidths {
    pub fn new(a: i64, b: i64, c: i64) -> Result<Self, PackError> {
        if a <= 0 || b <= 0 || c <= 0 {
            return Err(PackError::InvalidWidths([a, b, c]));
        }
        let mut sorted = [a, b, c];
        sorted.sort_unstable_by(|x, y| y.cmp(x));
        if sorted[0] == sorted[1] || sorted[1] == sorted[2] {
            return Err(PackError::InvalidWidths([a, b, c]));
        }
        Ok(Self { widths: sorted })
    }

    pub fn large(&self) -> i64 {
        self.widths[0]
    }

    pub fn medium(&self) -> i64 {
        self.widths[1]
    }

    pub fn small(&self) -> i64 {
        self.widths[2]
    }

    /// Catalogue widths, descending.
    pub fn descending(&self) -> [i64; 3] {
        self.widths
    }

    /// Smallest standard width >= `w`, falling back to `large()` if `w`
    /// exceeds every standard width (should not occur after merge).
    pub fn smallest_covering(&self, w: i64) -> i64 {
        self.widths
            .iter()
            .rev()
            .copied()
            .find(|&std_w| std_w >= w)
            .unwrap_or_else(|| self.large())
    }
}

impl Default for BlockWidths {
    fn default() -> Self {
        Self::new(1239, 826, 413).expect("default widths are valid")
    }
}

/// Packing strategy: greedy row-sweep, or reinforced combinatorial search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Big,
    Small,
}

/// Row traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Vertical reinforcement geometry and row-to-row coverage requirement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementConfig {
    /// Reinforcement thickness (mm).
    pub thickness: i64,
    /// Spacing between successive reinforcement centres (mm).
    pub spacing: i64,
    pub count_l: u32,
    pub count_m: u32,
    pub count_s: u32,
    /// Reinforcement extrusion height (mm); informational, not used by the
    /// packing decision beyond being carried through to production data.
    pub height: i64,
    pub height_from_ground: bool,
}

impl ReinforcementConfig {
    pub fn count_for(&self, widths: &BlockWidths, width: i64) -> u32 {
        if width == widths.large() {
            self.count_l
        } else if width == widths.medium() {
            self.count_m
        } else {
            self.count_s
        }
    }
}

/// Ground/ceiling offsets applied to the vertical band before row
/// iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerticalConfig {
    pub ground_offset: Option<i64>,
    pub ceiling_offset: Option<i64>,
}

impl VerticalConfig {
    pub fn ground(&self) -> i64 {
        self.ground_offset.unwrap_or(0)
    }

    pub fn ceiling(&self) -> i64 {
        self.ceiling_offset.unwrap_or(0)
    }
}

/// Minimum aperture area (mm^2) to be treated as a valid hole.
pub const APERTURE_MIN_AREA: f64 = 1_000.0;
/// Maximum aperture area as a fraction of wall area (strict `<`).
pub const APERTURE_MAX_FRACTION: f64 = 0.8;
/// Adjacency tolerance used by the merge pass (mm).
pub const MERGE_TOLERANCE_MM: f64 = 5.0;
/// Minimum residue to justify an adaptive top row (mm).
pub const ADAPTIVE_ROW_THRESHOLD_MM: i64 = 150;
/// Below this width or height a piece is considered degenerate and dropped.
pub const DEGENERATE_MIN_MM: f64 = 1.0;
/// Tolerance used when deciding whether two vertical joints coincide (mm).
pub const JOINT_TOLERANCE_MM: f64 = 5.0;

/// The full `pack_wall` input contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallConfig {
    pub exterior: RingPolygon,
    #[serde(default)]
    pub apertures: Vec<RingPolygon>,
    pub widths: BlockWidths,
    pub height: i64,
    pub strategy: Strategy,
    #[serde(default)]
    pub reinforcement: Option<ReinforcementConfig>,
    pub direction: Direction,
    #[serde(default)]
    pub vertical: VerticalConfig,
}

impl WallConfig {
    pub fn validate_shape(&self) -> Result<(), PackError> {
        if self.height <= 0 {
            return Err(PackError::NonPositiveHeight(self.height));
        }
        if self.exterior.vertices.len() < 3 || self.exterior.area() < f64::EPSILON {
            return Err(PackError::EmptyExterior);
        }
        if self.strategy == Strategy::Small && self.reinforcement.is_none() {
            return Err(PackError::MissingReinforcement);
        }
        Ok(())
    }
}

//! Bill-of-materials packing engine for modular block walls.
//!
//! Given a wall outline, a set of apertures, a catalogue of three standard
//! block widths and one height, and a construction profile, [`pack_wall`]
//! produces an ordered placement of standard blocks, a list of custom cut
//! pieces covering the residue, and a list of structured warnings for any
//! recoverable geometric anomaly encountered along the way.
//!
//! # Example
//!
//! ```no_run
//! use wallpack::config::{BlockWidths, Direction, Strategy, WallConfig};
//! use wallpack::types::RingPolygon;
//!
//! let config = WallConfig {
//!     exterior: RingPolygon::new(vec![(0, 0), (5000, 0), (5000, 2970), (0, 2970)]),
//!     apertures: vec![],
//!     widths: BlockWidths::default(),
//!     height: 495,
//!     strategy: Strategy::Big,
//!     reinforcement: None,
//!     direction: Direction::Ltr,
//!     vertical: Default::default(),
//! };
//! let result = wallpack::pack_wall(&config, None).unwrap();
//! println!("{} standard blocks, {} customs", result.placed.len(), result.customs.len());
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod orchestrator;
pub mod packers;
pub mod postprocess;
pub mod reinforcement;
pub mod types;
pub mod warnings;

pub use config::WallConfig;
pub use error::PackError;
pub use orchestrator::pack_wall;
pub use types::PackResult;

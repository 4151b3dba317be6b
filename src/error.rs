//! Configuration errors: the only failures that cross the `pack_wall`
//! boundary as a hard `Err`. Geometric anomalies never raise — see
//! [`crate::warnings`].

use thiserror::Error;

/// Fatal configuration errors, detected before any geometry work begins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("block widths must be three distinct positive integers, got {0:?}")]
    InvalidWidths([i64; 3]),

    #[error("block height must be positive, got {0}")]
    NonPositiveHeight(i64),

    #[error("exterior polygon is empty or has zero area")]
    EmptyExterior,

    #[error(
        "ground_offset ({ground}) + ceiling_offset ({ceiling}) >= available band height ({available})"
    )]
    OffsetsExceedBand {
        ground: i64,
        ceiling: i64,
        available: i64,
    },

    #[error("strategy 'small' requires a reinforcement configuration")]
    MissingReinforcement,
}

/// Maze setup errors.
///
/// Raised before a session starts. Nothing that happens once a session
/// is running is an error; rejected moves and unmet door conditions are
/// ordinary outcomes (see `sim::session`).

use thiserror::Error;

use crate::domain::entity::DoorId;
use crate::domain::grid::TilePos;

/// A maze descriptor that cannot host a session.
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("maze grid is empty")]
    EmptyGrid,

    #[error("grid row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("grid is {found_w}x{found_h} but descriptor says {width}x{height}")]
    DimensionMismatch { width: usize, height: usize, found_w: usize, found_h: usize },

    #[error("unknown tile code {code} at ({x},{y})")]
    UnknownTileCode { x: usize, y: usize, code: u8 },

    #[error("tile size must be positive")]
    ZeroTileSize,

    #[error("no start position given and the grid has no start tile")]
    MissingStart,

    #[error("start {0} lies outside the grid")]
    StartOutOfBounds(TilePos),

    #[error("start {0} is a wall")]
    StartOnWall(TilePos),

    #[error("`{id}` at {pos} lies outside the grid")]
    EntityOutOfBounds { id: String, pos: TilePos },

    #[error("`{id}` at {pos} is placed on a wall")]
    EntityOnWall { id: String, pos: TilePos },

    #[error("duplicate id `{0}`")]
    DuplicateId(String),

    #[error("{door} door requires unknown `{id}`")]
    UnknownRequirement { door: DoorId, id: String },

    #[error("{door} door condition does not match the kind of `{id}`")]
    RequirementKindMismatch { door: DoorId, id: String },

    #[error("duplicate {0} door")]
    DuplicateDoor(DoorId),
}

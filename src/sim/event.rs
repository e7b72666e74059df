/// Events emitted when the player settles on a tile.
/// The presentation layer consumes these for messages and screen changes.

use crate::domain::entity::{DoorId, ItemKind, SwitchState};
use crate::domain::grid::TilePos;

/// What a closed door was still waiting for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Requirement {
    Item { id: String, name: String },
    SwitchOn { id: String, name: String },
    Badge { id: String, name: String },
}

impl Requirement {
    pub fn id(&self) -> &str {
        match self {
            Requirement::Item { id, .. }
            | Requirement::SwitchOn { id, .. }
            | Requirement::Badge { id, .. } => id,
        }
    }

    /// Display name of what is missing.
    pub fn name(&self) -> &str {
        match self {
            Requirement::Item { name, .. }
            | Requirement::SwitchOn { name, .. }
            | Requirement::Badge { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeEvent {
    ItemCollected { id: String, kind: ItemKind, pos: TilePos },
    SwitchToggled { id: String, state: SwitchState, pos: TilePos },
    /// Condition met on the active task's door. The session is complete.
    DoorOpened { door: DoorId },
    /// Condition met, but this is not the door the task asks for.
    WrongDoor { door: DoorId, target: DoorId },
    ConditionUnmet { door: DoorId, missing: Requirement },
}

/// MazeSession: one child, one maze, one task.
///
/// Owns all spatial state of a running maze and the rules that change it.
///
/// ## Lifecycle
///
///   1. `new` validates a `MazeDescriptor` and places the player on the
///      start tile. Malformed descriptors fail here with `SetupError`.
///   2. `request_move` accepts at most one pending move at a time.
///   3. `advance` is called once per frame with the frame delta. It
///      drives the session clock, glides the player toward the target and,
///      on arrival, runs collision evaluation for the settled tile.
///   4. A `DoorOpened` event completes the session; later requests are
///      ignored. The session is dropped when the maze ends.
///
/// ## Time
///
/// The session clock is the sum of all deltas given to `advance`. Switch
/// re-entry guards expire against this clock, never against wall time, so
/// a test drives the whole session deterministically.

use std::time::Duration;

use crate::config::MovementConfig;
use crate::domain::entity::{Door, DoorCondition, DoorId, Item, ItemKind, Switch};
use crate::domain::grid::{Grid, TilePos};
use crate::domain::inventory::Inventory;
use crate::domain::path;
use crate::domain::tile::Tile;
use crate::error::SetupError;
use super::event::{MazeEvent, Requirement};
use super::maze::MazeDescriptor;

/// Continuous player position in tile units.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn at(tile: TilePos) -> Self {
        Position { x: tile.x as f32, y: tile.y as f32 }
    }

    /// Nearest tile (used for drawing mid-move).
    pub fn nearest_tile(self) -> TilePos {
        TilePos::new(self.x.round() as i32, self.y.round() as i32)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionStatus {
    Active,
    Completed,
}

/// Why a move request was ignored.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rejection {
    Moving,
    Finished,
    OutOfBounds,
    Wall,
    PathBlocked,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveResponse {
    Accepted,
    Rejected(Rejection),
}

pub struct MazeSession {
    name: &'static str,
    grid: Grid,
    tile_size: u32,
    items: Vec<Item>,
    switches: Vec<Switch>,
    doors: Vec<Door>,
    inventory: Inventory,
    target_door: DoorId,
    movement: MovementConfig,

    position: Position,
    target: Option<TilePos>,
    settled: TilePos,

    clock: Duration,
    last_progress: Duration,
    status: SessionStatus,
}

// ══════════════════════════════════════════════════════════════
// Construction
// ══════════════════════════════════════════════════════════════

impl MazeSession {
    pub fn new(
        desc: MazeDescriptor,
        target_door: DoorId,
        movement: MovementConfig,
    ) -> Result<Self, SetupError> {
        if desc.tile_size == 0 {
            return Err(SetupError::ZeroTileSize);
        }

        let grid = Grid::from_codes(&desc.grid)?;
        if grid.width() != desc.width || grid.height() != desc.height {
            return Err(SetupError::DimensionMismatch {
                width: desc.width,
                height: desc.height,
                found_w: grid.width(),
                found_h: grid.height(),
            });
        }

        let start = match desc.start {
            Some(pos) => pos,
            None => grid.find(Tile::Start).ok_or(SetupError::MissingStart)?,
        };
        if !grid.in_bounds(start) {
            return Err(SetupError::StartOutOfBounds(start));
        }
        if grid.is_wall(start) {
            return Err(SetupError::StartOnWall(start));
        }

        // The target door may be absent; any satisfied door is then a wrong door.
        validate_entities(&grid, &desc)?;

        let mut items = desc.items;
        for item in &mut items {
            item.collected = false;
        }

        Ok(MazeSession {
            name: desc.name,
            grid,
            tile_size: desc.tile_size,
            items,
            switches: desc.switches,
            doors: desc.doors,
            inventory: Inventory::new(),
            target_door,
            movement,
            position: Position::at(start),
            target: None,
            settled: start,
            clock: Duration::ZERO,
            last_progress: Duration::ZERO,
            status: SessionStatus::Active,
        })
    }
}

fn validate_entities(grid: &Grid, desc: &MazeDescriptor) -> Result<(), SetupError> {
    let placed = desc.items.iter().map(|i| (i.id.as_str(), i.pos))
        .chain(desc.switches.iter().map(|s| (s.id.as_str(), s.pos)));

    let mut seen: Vec<&str> = vec![];
    for (id, pos) in placed {
        check_placement(grid, id, pos)?;
        if seen.contains(&id) {
            return Err(SetupError::DuplicateId(id.to_string()));
        }
        seen.push(id);
    }

    let mut doors_seen: Vec<DoorId> = vec![];
    for door in &desc.doors {
        check_placement(grid, &door.id.to_string(), door.pos)?;
        if doors_seen.contains(&door.id) {
            return Err(SetupError::DuplicateDoor(door.id));
        }
        doors_seen.push(door.id);

        let id = door.condition.target_id();
        let unknown = || SetupError::UnknownRequirement { door: door.id, id: id.to_string() };
        let mismatch = || SetupError::RequirementKindMismatch { door: door.id, id: id.to_string() };
        match &door.condition {
            DoorCondition::HasItem(_) | DoorCondition::HasBadge(_) => {
                let item = desc.items.iter().find(|i| i.id == id).ok_or_else(unknown)?;
                let wanted = if matches!(door.condition, DoorCondition::HasBadge(_)) {
                    ItemKind::Badge
                } else {
                    ItemKind::Item
                };
                if item.kind != wanted {
                    return Err(mismatch());
                }
            }
            DoorCondition::SwitchOn(_) => {
                if !desc.switches.iter().any(|s| s.id == id) {
                    return Err(if desc.items.iter().any(|i| i.id == id) { mismatch() } else { unknown() });
                }
            }
        }
    }
    Ok(())
}

fn check_placement(grid: &Grid, id: &str, pos: TilePos) -> Result<(), SetupError> {
    if !grid.in_bounds(pos) {
        return Err(SetupError::EntityOutOfBounds { id: id.to_string(), pos });
    }
    if grid.is_wall(pos) {
        return Err(SetupError::EntityOnWall { id: id.to_string(), pos });
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

impl MazeSession {
    /// Ask the player to glide to `tile`.
    ///
    /// Rejections leave the session untouched; the response only says why.
    pub fn request_move(&mut self, tile: TilePos) -> MoveResponse {
        let rejection = if self.status == SessionStatus::Completed {
            Some(Rejection::Finished)
        } else if self.target.is_some() {
            Some(Rejection::Moving)
        } else if !self.grid.in_bounds(tile) {
            Some(Rejection::OutOfBounds)
        } else if !self.grid.is_walkable(tile) {
            Some(Rejection::Wall)
        } else if path::has_wall_between(&self.grid, self.settled, tile) {
            Some(Rejection::PathBlocked)
        } else {
            None
        };

        if let Some(reason) = rejection {
            tracing::debug!(from = %self.settled, to = %tile, ?reason, "move rejected");
            return MoveResponse::Rejected(reason);
        }

        tracing::debug!(from = %self.settled, to = %tile, "moving");
        self.target = Some(tile);
        self.last_progress = self.clock;
        MoveResponse::Accepted
    }

    /// Advance the session by one frame.
    pub fn advance(&mut self, delta: Duration) -> Vec<MazeEvent> {
        self.clock += delta;
        let now = self.clock;
        for sw in &mut self.switches {
            sw.expire_guard(now);
        }

        let mut events = vec![];
        let Some(target) = self.target else {
            return events;
        };

        let dx = target.x as f32 - self.position.x;
        let dy = target.y as f32 - self.position.y;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance < self.movement.settle_epsilon {
            self.position = Position::at(target);
            self.target = None;
            self.settled = target;
            self.evaluate_collisions(target, &mut events);
        } else {
            let elapsed = (now - self.last_progress).as_secs_f32();
            let progress = (self.movement.speed_tiles_per_sec * elapsed / distance).min(1.0);
            self.position.x += dx * progress;
            self.position.y += dy * progress;
        }
        self.last_progress = now;

        events
    }
}

// ══════════════════════════════════════════════════════════════
// Collision evaluation (settle only)
// ══════════════════════════════════════════════════════════════

impl MazeSession {
    fn evaluate_collisions(&mut self, tile: TilePos, events: &mut Vec<MazeEvent>) {
        self.pick_up_items(tile, events);
        self.toggle_switches(tile, events);
        self.check_doors(tile, events);
    }

    fn pick_up_items(&mut self, tile: TilePos, events: &mut Vec<MazeEvent>) {
        for item in self.items.iter_mut().filter(|i| i.pos == tile && !i.collected) {
            item.collected = true;
            match item.kind {
                ItemKind::Badge => self.inventory.add_badge(&item.id),
                ItemKind::Item => self.inventory.add_item(&item.id),
            };
            tracing::info!(id = %item.id, "collected");
            events.push(MazeEvent::ItemCollected { id: item.id.clone(), kind: item.kind, pos: tile });
        }
    }

    fn toggle_switches(&mut self, tile: TilePos, events: &mut Vec<MazeEvent>) {
        let guard_until = self.clock + self.movement.switch_guard;
        for sw in self.switches.iter_mut().filter(|s| s.pos == tile && !s.is_guarded()) {
            sw.state = sw.state.toggled();
            sw.guard_until = Some(guard_until);
            self.inventory.set_switch(&sw.id, sw.state);
            tracing::info!(id = %sw.id, state = %sw.state, "switch toggled");
            events.push(MazeEvent::SwitchToggled { id: sw.id.clone(), state: sw.state, pos: tile });
        }
    }

    fn check_doors(&mut self, tile: TilePos, events: &mut Vec<MazeEvent>) {
        for door in self.doors.iter().filter(|d| d.pos == tile) {
            let event = if !self.inventory.satisfies(&door.condition) {
                MazeEvent::ConditionUnmet { door: door.id, missing: self.requirement(&door.condition) }
            } else if door.id == self.target_door {
                MazeEvent::DoorOpened { door: door.id }
            } else {
                MazeEvent::WrongDoor { door: door.id, target: self.target_door }
            };
            tracing::info!(door = %door.id, ?event, "door reached");
            if matches!(event, MazeEvent::DoorOpened { .. }) {
                self.status = SessionStatus::Completed;
            }
            events.push(event);
        }
    }

    fn requirement(&self, condition: &DoorCondition) -> Requirement {
        let id = condition.target_id();
        let item_name = || self.items.iter().find(|i| i.id == id).map_or(id, |i| i.name).to_string();
        match condition {
            DoorCondition::HasItem(_) => Requirement::Item { id: id.to_string(), name: item_name() },
            DoorCondition::HasBadge(_) => Requirement::Badge { id: id.to_string(), name: item_name() },
            DoorCondition::SwitchOn(_) => Requirement::SwitchOn {
                id: id.to_string(),
                name: self.switches.iter().find(|s| s.id == id).map_or(id, |s| s.name).to_string(),
            },
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Read-only views
// ══════════════════════════════════════════════════════════════

impl MazeSession {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_position(&self) -> Position {
        self.position
    }

    pub fn player_target(&self) -> Option<TilePos> {
        self.target
    }

    pub fn settled_tile(&self) -> TilePos {
        self.settled
    }

    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn target_door(&self) -> DoorId {
        self.target_door
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Tile under a point given in maze units (`tile_size` per tile).
    pub fn tile_at_point(&self, x: f32, y: f32) -> Option<TilePos> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let size = self.tile_size as f32;
        let tile = TilePos::new((x / size).floor() as i32, (y / size).floor() as i32);
        self.grid.in_bounds(tile).then_some(tile)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

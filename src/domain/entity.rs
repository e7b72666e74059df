/// Things placed on the maze: items, switches, doors.
/// Identity is a string for items and switches (it names what the child
/// sees), a closed enum for doors (tasks target doors by it).

use std::fmt;
use std::time::Duration;

use super::grid::TilePos;

// ── Items ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemKind {
    Item,
    Badge,
}

impl ItemKind {
    /// Badges are recognized by their identity.
    pub fn from_id(id: &str) -> ItemKind {
        if id.contains("badge") { ItemKind::Badge } else { ItemKind::Item }
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    pub id: String,
    pub pos: TilePos,
    pub icon: &'static str,
    pub name: &'static str,
    pub kind: ItemKind,
    pub collected: bool,
}

impl Item {
    pub fn new(id: &str, pos: TilePos, icon: &'static str, name: &'static str) -> Self {
        Item {
            id: id.to_string(),
            pos,
            icon,
            name,
            kind: ItemKind::from_id(id),
            collected: false,
        }
    }
}

// ── Switches ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SwitchState {
    On,
    #[default]
    Off,
}

impl SwitchState {
    pub fn toggled(self) -> SwitchState {
        match self {
            SwitchState::On => SwitchState::Off,
            SwitchState::Off => SwitchState::On,
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SwitchState::On => "ON",
            SwitchState::Off => "OFF",
        })
    }
}

#[derive(Clone, Debug)]
pub struct Switch {
    pub id: String,
    pub pos: TilePos,
    pub icon: &'static str,
    pub name: &'static str,
    pub state: SwitchState,
    /// Session-clock instant until which re-entry does not toggle.
    pub guard_until: Option<Duration>,
}

impl Switch {
    pub fn new(id: &str, pos: TilePos, icon: &'static str, name: &'static str) -> Self {
        Switch {
            id: id.to_string(),
            pos,
            icon,
            name,
            state: SwitchState::Off,
            guard_until: None,
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.guard_until.is_some()
    }

    /// Drop the guard once the clock has reached its expiry.
    pub fn expire_guard(&mut self, now: Duration) {
        if self.guard_until.is_some_and(|until| now >= until) {
            self.guard_until = None;
        }
    }
}

// ── Doors ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DoorId {
    Left,
    Middle,
    Right,
}

impl DoorId {
    pub const ALL: [DoorId; 3] = [DoorId::Left, DoorId::Middle, DoorId::Right];
}

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DoorId::Left => "left",
            DoorId::Middle => "middle",
            DoorId::Right => "right",
        })
    }
}

/// What must hold for a door to open.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DoorCondition {
    HasItem(String),
    SwitchOn(String),
    HasBadge(String),
}

impl DoorCondition {
    /// The id this condition refers to.
    pub fn target_id(&self) -> &str {
        match self {
            DoorCondition::HasItem(id)
            | DoorCondition::SwitchOn(id)
            | DoorCondition::HasBadge(id) => id,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Door {
    pub id: DoorId,
    pub pos: TilePos,
    pub condition: DoorCondition,
    pub icon: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_kind_from_identity() {
        assert_eq!(ItemKind::from_id("badge-star"), ItemKind::Badge);
        assert_eq!(ItemKind::from_id("key-red"), ItemKind::Item);
    }

    #[test]
    fn switch_state_alternates() {
        let s = SwitchState::Off;
        assert_eq!(s.toggled(), SwitchState::On);
        assert_eq!(s.toggled().toggled(), SwitchState::Off);
    }

    #[test]
    fn guard_expires_at_deadline() {
        let mut sw = Switch::new("switch-green", TilePos::new(0, 0), "🔘", "green switch");
        sw.guard_until = Some(Duration::from_millis(500));
        sw.expire_guard(Duration::from_millis(499));
        assert!(sw.is_guarded());
        sw.expire_guard(Duration::from_millis(500));
        assert!(!sw.is_guarded());
    }
}

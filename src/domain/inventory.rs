/// What the player has gathered during one maze session.

use std::collections::{BTreeMap, BTreeSet};

use super::entity::{DoorCondition, SwitchState};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    pub items: BTreeSet<String>,
    pub badges: BTreeSet<String>,
    pub switches: BTreeMap<String, SwitchState>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the item was not held before.
    pub fn add_item(&mut self, id: &str) -> bool {
        self.items.insert(id.to_string())
    }

    /// Returns true if the badge was not held before.
    pub fn add_badge(&mut self, id: &str) -> bool {
        self.badges.insert(id.to_string())
    }

    pub fn set_switch(&mut self, id: &str, state: SwitchState) {
        self.switches.insert(id.to_string(), state);
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.contains(id)
    }

    /// A switch never touched this session reads as OFF.
    pub fn switch_state(&self, id: &str) -> SwitchState {
        self.switches.get(id).copied().unwrap_or_default()
    }

    /// Does the inventory satisfy a door condition?
    pub fn satisfies(&self, condition: &DoorCondition) -> bool {
        match condition {
            DoorCondition::HasItem(id) => self.has_item(id),
            DoorCondition::SwitchOn(id) => self.switch_state(id) == SwitchState::On,
            DoorCondition::HasBadge(id) => self.has_badge(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut inv = Inventory::new();
        assert!(inv.add_item("key-red"));
        let after_first = inv.clone();
        assert!(!inv.add_item("key-red"));
        assert_eq!(inv, after_first);
    }

    #[test]
    fn conditions_dispatch_on_kind() {
        let mut inv = Inventory::new();
        let key = DoorCondition::HasItem("key-red".into());
        let switch = DoorCondition::SwitchOn("switch-green".into());
        let badge = DoorCondition::HasBadge("badge-star".into());
        assert!(!inv.satisfies(&key));
        assert!(!inv.satisfies(&switch));
        assert!(!inv.satisfies(&badge));

        inv.add_item("key-red");
        inv.set_switch("switch-green", SwitchState::On);
        inv.add_badge("badge-star");
        assert!(inv.satisfies(&key));
        assert!(inv.satisfies(&switch));
        assert!(inv.satisfies(&badge));

        inv.set_switch("switch-green", SwitchState::Off);
        assert!(!inv.satisfies(&switch));
    }

    #[test]
    fn item_does_not_count_as_badge() {
        let mut inv = Inventory::new();
        inv.add_item("badge-star");
        assert!(!inv.satisfies(&DoorCondition::HasBadge("badge-star".into())));
    }
}

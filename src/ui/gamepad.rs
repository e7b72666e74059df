/// Gamepad support through gilrs, behind the `gamepad` feature.
///
/// Each frame reads the first connected pad into a `Snapshot`. Buttons
/// fire on the frame they go down; the D-pad or left stick is a held
/// step, like a held arrow key.
///
/// Default buttons: A / Start confirm, B / Select go back, Y shows a hint.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, Gilrs};

use crate::config::GamepadConfig;
use super::input::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Snapshot {
    confirm: bool,
    cancel: bool,
    hint: bool,
    step: Option<(i32, i32)>,
}

#[cfg(feature = "gamepad")]
#[derive(Debug, PartialEq)]
struct Bindings {
    confirm: Vec<Button>,
    cancel: Vec<Button>,
    hint: Vec<Button>,
}

#[cfg(feature = "gamepad")]
impl Default for Bindings {
    fn default() -> Self {
        Bindings {
            confirm: vec![Button::South, Button::Start],
            cancel: vec![Button::East, Button::Select],
            hint: vec![Button::North],
        }
    }
}

#[cfg(feature = "gamepad")]
impl Bindings {
    /// Unknown names are skipped; a list with nothing usable keeps its default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        let parse = |names: &[String], fallback: Vec<Button>| {
            let buttons: Vec<Button> = names.iter().filter_map(|n| button_from_name(n)).collect();
            if buttons.is_empty() { fallback } else { buttons }
        };
        let defaults = Bindings::default();
        Bindings {
            confirm: parse(&cfg.confirm, defaults.confirm),
            cancel: parse(&cfg.cancel, defaults.cancel),
            hint: parse(&cfg.hint, defaults.hint),
        }
    }
}

/// Xbox-style letters or gilrs' compass names.
#[cfg(feature = "gamepad")]
fn button_from_name(name: &str) -> Option<Button> {
    let button = match name.to_ascii_uppercase().as_str() {
        "A" | "SOUTH" => Button::South,
        "B" | "EAST" => Button::East,
        "X" | "WEST" => Button::West,
        "Y" | "NORTH" => Button::North,
        "L1" | "LB" => Button::LeftTrigger,
        "R1" | "RB" => Button::RightTrigger,
        "L2" | "LT" => Button::LeftTrigger2,
        "R2" | "RT" => Button::RightTrigger2,
        "START" => Button::Start,
        "SELECT" | "BACK" => Button::Select,
        _ => return None,
    };
    Some(button)
}

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn direction(up: bool, down: bool, left: bool, right: bool) -> Option<(i32, i32)> {
    let dx = right as i32 - left as i32;
    let dy = down as i32 - up as i32;
    (dx != 0 || dy != 0).then_some((dx, dy))
}

/// Stick y grows upward, rows grow downward.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_step(x: f32, y: f32) -> Option<(i32, i32)> {
    direction(y > STICK_DEADZONE, y < -STICK_DEADZONE, x < -STICK_DEADZONE, x > STICK_DEADZONE)
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    #[cfg(feature = "gamepad")]
    bindings: Bindings,
    prev: Snapshot,
    now: Snapshot,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs = Gilrs::new()
            .map_err(|e| tracing::warn!("gamepad support unavailable: {e}"))
            .ok();
        #[cfg(feature = "gamepad")]
        let connected = gilrs.as_ref().is_some_and(|g| g.gamepads().next().is_some());
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            #[cfg(feature = "gamepad")]
            bindings: Bindings::default(),
            prev: Snapshot::default(),
            now: Snapshot::default(),
            connected,
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        #[cfg(feature = "gamepad")]
        {
            self.bindings = Bindings::from_config(cfg);
        }
        #[cfg(not(feature = "gamepad"))]
        let _ = cfg;
    }

    pub fn update(&mut self) {
        #[cfg(feature = "gamepad")]
        let now = self.sample();
        #[cfg(not(feature = "gamepad"))]
        let now = Snapshot::default();
        self.advance(now);
    }

    fn advance(&mut self, now: Snapshot) {
        self.prev = std::mem::replace(&mut self.now, now);
    }

    #[cfg(feature = "gamepad")]
    fn sample(&mut self) -> Snapshot {
        let Some(gilrs) = &mut self.gilrs else {
            return Snapshot::default();
        };
        // Pulling events is what refreshes gilrs' cached button state.
        while gilrs.next_event().is_some() {}

        let Some((_, pad)) = gilrs.gamepads().find(|(_, pad)| pad.is_connected()) else {
            self.connected = false;
            return Snapshot::default();
        };
        self.connected = true;

        let any = |buttons: &[Button]| buttons.iter().any(|&b| pad.is_pressed(b));
        let dpad = direction(
            pad.is_pressed(Button::DPadUp),
            pad.is_pressed(Button::DPadDown),
            pad.is_pressed(Button::DPadLeft),
            pad.is_pressed(Button::DPadRight),
        );
        Snapshot {
            confirm: any(&self.bindings.confirm),
            cancel: any(&self.bindings.cancel),
            hint: any(&self.bindings.hint),
            step: dpad.or_else(|| stick_step(pad.value(Axis::LeftStickX), pad.value(Axis::LeftStickY))),
        }
    }

    /// Buttons that went down this frame.
    pub fn commands(&self) -> Vec<Command> {
        let (now, prev) = (self.now, self.prev);
        [
            (now.confirm && !prev.confirm, Command::Confirm),
            (now.cancel && !prev.cancel, Command::Cancel),
            (now.hint && !prev.hint, Command::Hint),
        ]
        .into_iter()
        .filter_map(|(fired, command)| fired.then_some(command))
        .collect()
    }

    pub fn held_step(&self) -> Option<(i32, i32)> {
        self.now.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_combine_and_cancel() {
        assert_eq!(direction(false, false, false, false), None);
        assert_eq!(direction(false, false, false, true), Some((1, 0)));
        assert_eq!(direction(true, false, false, true), Some((1, -1)));
        assert_eq!(direction(true, false, true, true), Some((0, -1)));
    }

    #[test]
    fn stick_needs_to_leave_the_deadzone() {
        assert_eq!(stick_step(0.1, -0.2), None);
        assert_eq!(stick_step(0.9, 0.5), Some((1, -1)));
        assert_eq!(stick_step(-0.6, -0.6), Some((-1, 1)));
    }

    #[test]
    fn buttons_fire_once_per_press() {
        let mut pad = GamepadState::new();
        let held = Snapshot { confirm: true, step: Some((0, 1)), ..Snapshot::default() };
        pad.advance(held);
        assert_eq!(pad.commands(), vec![Command::Confirm]);
        assert_eq!(pad.held_step(), Some((0, 1)));
        pad.advance(held);
        assert!(pad.commands().is_empty());
        pad.advance(Snapshot { hint: true, ..Snapshot::default() });
        assert_eq!(pad.commands(), vec![Command::Hint]);
        assert_eq!(pad.held_step(), None);
    }

    #[cfg(feature = "gamepad")]
    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(button_from_name("a"), Some(Button::South));
        assert_eq!(button_from_name("north"), Some(Button::North));
        assert_eq!(button_from_name("Back"), Some(Button::Select));
        assert_eq!(button_from_name("Turbo"), None);
    }

    #[cfg(feature = "gamepad")]
    #[test]
    fn config_overrides_only_known_buttons() {
        let bindings = Bindings::from_config(&GamepadConfig {
            confirm: vec!["X".into()],
            cancel: vec!["Nope".into()],
            hint: vec![],
        });
        assert_eq!(bindings.confirm, vec![Button::West]);
        assert_eq!(bindings.cancel, Bindings::default().cancel);
        assert_eq!(bindings.hint, vec![Button::North]);
    }
}

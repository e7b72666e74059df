/// Terminal input, turned into game commands.
///
/// Each frame drains crossterm's queue into a list of `Command`s. Moving
/// is the one continuous action: a direction counts as held until no
/// Press/Repeat for it has arrived within `HOLD_TIMEOUT`, since most
/// terminals never report key releases.

use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// One tile in a compass direction, diagonals included.
    Step(i32, i32),
    /// Left button pressed or dragged over a terminal cell (column, row).
    Point(u16, u16),
    Confirm,
    Cancel,
    Hint,
    /// Pick a vehicle by its index in `Vehicle::ALL`.
    Vehicle(usize),
    Quit,
}

/// Arrows and WASD walk; Q/E/Z/C are the diagonals.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Command::Quit);
    }
    let command = match key.code {
        KeyCode::Left => Command::Step(-1, 0),
        KeyCode::Right => Command::Step(1, 0),
        KeyCode::Up => Command::Step(0, -1),
        KeyCode::Down => Command::Step(0, 1),
        KeyCode::Enter => Command::Confirm,
        KeyCode::Esc => Command::Cancel,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' => Command::Step(-1, 0),
            'd' => Command::Step(1, 0),
            'w' => Command::Step(0, -1),
            's' => Command::Step(0, 1),
            'q' => Command::Step(-1, -1),
            'e' => Command::Step(1, -1),
            'z' => Command::Step(-1, 1),
            'c' => Command::Step(1, 1),
            'h' => Command::Hint,
            ' ' => Command::Confirm,
            '1'..='9' => Command::Vehicle(c as usize - '1' as usize),
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}

pub fn command_for_mouse(mouse: MouseEvent) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            Some(Command::Point(mouse.column, mouse.row))
        }
        _ => None,
    }
}

pub struct InputState {
    commands: Vec<Command>,
    /// Last step seen and when.
    last_step: Option<((i32, i32), Instant)>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            commands: Vec::with_capacity(8),
            last_step: None,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.commands.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            let command = match event::read() {
                Ok(Event::Key(key)) => command_for_key(key),
                Ok(Event::Mouse(mouse)) => command_for_mouse(mouse),
                _ => None,
            };
            if let Some(command) = command {
                self.push(command, Instant::now());
            }
        }
    }

    fn push(&mut self, command: Command, at: Instant) {
        if let Command::Step(dx, dy) = command {
            self.last_step = Some(((dx, dy), at));
        }
        self.commands.push(command);
    }

    /// Commands that arrived this frame, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn held_step(&self) -> Option<(i32, i32)> {
        self.held_step_at(Instant::now())
    }

    fn held_step_at(&self, now: Instant) -> Option<(i32, i32)> {
        self.last_step
            .filter(|&(_, at)| now.duration_since(at) < HOLD_TIMEOUT)
            .map(|(step, _)| step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers, kind, state: KeyEventState::NONE }
    }

    fn press(code: KeyCode) -> Option<Command> {
        command_for_key(key(code, KeyModifiers::NONE, KeyEventKind::Press))
    }

    #[test]
    fn letters_and_arrows_walk_the_same_way() {
        assert_eq!(press(KeyCode::Left), press(KeyCode::Char('a')));
        assert_eq!(press(KeyCode::Down), press(KeyCode::Char('S')));
        assert_eq!(press(KeyCode::Char('e')), Some(Command::Step(1, -1)));
        assert_eq!(press(KeyCode::Char('Z')), Some(Command::Step(-1, 1)));
    }

    #[test]
    fn ctrl_c_quits_instead_of_stepping() {
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(command_for_key(ctrl_c), Some(Command::Quit));
        assert_eq!(press(KeyCode::Char('c')), Some(Command::Step(1, 1)));
    }

    #[test]
    fn releases_and_unbound_keys_are_dropped() {
        let release = key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(command_for_key(release), None);
        assert_eq!(press(KeyCode::Tab), None);
        assert_eq!(press(KeyCode::Char('2')), Some(Command::Vehicle(1)));
    }

    #[test]
    fn only_left_button_points() {
        let mouse = |kind| MouseEvent { kind, column: 7, row: 3, modifiers: KeyModifiers::NONE };
        assert_eq!(
            command_for_mouse(mouse(MouseEventKind::Drag(MouseButton::Left))),
            Some(Command::Point(7, 3))
        );
        assert_eq!(command_for_mouse(mouse(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(command_for_mouse(mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn step_stays_held_until_timeout() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.push(Command::Step(0, 1), t0);
        input.push(Command::Hint, t0);
        assert_eq!(input.commands(), &[Command::Step(0, 1), Command::Hint]);
        assert_eq!(input.held_step_at(t0 + HOLD_TIMEOUT / 2), Some((0, 1)));
        assert_eq!(input.held_step_at(t0 + HOLD_TIMEOUT), None);
    }
}

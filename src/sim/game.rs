/// Game: screen flow around one maze session at a time.
///
///   Start ──confirm──▶ Task ──confirm──▶ Playing ──door opened──▶ Success
///     ▲                  │                  │                        │
///     └──────cancel──────┴──────cancel──────┘         confirm: next Task
///
/// The game never touches the terminal. The loop in `main.rs` feeds it
/// input and frame deltas; the renderer reads it.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::domain::entity::{DoorId, ItemKind, SwitchState};
use crate::domain::grid::TilePos;
use crate::domain::task::{Task, TaskBook};
use crate::error::SetupError;
use super::event::{MazeEvent, Requirement};
use super::maze;
use super::session::{MazeSession, MoveResponse, SessionStatus};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Start,
    Task,
    Playing,
    Success,
}

/// What the child drives through the maze.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Vehicle {
    #[default]
    Car,
    Bus,
    Train,
    Plane,
}

impl Vehicle {
    pub const ALL: [Vehicle; 4] = [Vehicle::Car, Vehicle::Bus, Vehicle::Train, Vehicle::Plane];

    pub fn icon(self) -> &'static str {
        match self {
            Vehicle::Car => "🚗",
            Vehicle::Bus => "🚌",
            Vehicle::Train => "🚂",
            Vehicle::Plane => "✈️",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Vehicle::Car => "car",
            Vehicle::Bus => "bus",
            Vehicle::Train => "train",
            Vehicle::Plane => "plane",
        }
    }
}

pub const MOVE_PROMPT: &str = "Click a tile or use the arrow keys to move";
pub const WRONG_DOOR: &str = "Wrong door! Check again";

pub struct Game {
    pub phase: Phase,
    pub vehicle: Vehicle,
    pub tasks: TaskBook,
    pub task: Option<Task>,
    pub session: Option<MazeSession>,
    pub message: String,

    config: GameConfig,
    rng: StdRng,
    clock: Duration,
    /// Time spent on the current maze.
    played: Duration,
    auto_hint_done: bool,
    hint_until: Option<Duration>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Game {
            phase: Phase::Start,
            vehicle: Vehicle::default(),
            tasks: TaskBook::new(),
            task: None,
            session: None,
            message: String::new(),
            config,
            rng,
            clock: Duration::ZERO,
            played: Duration::ZERO,
            auto_hint_done: false,
            hint_until: None,
        }
    }

    // ── Screen flow ──

    pub fn select_vehicle(&mut self, vehicle: Vehicle) {
        if self.phase == Phase::Start {
            self.vehicle = vehicle;
        }
    }

    /// Enter / Space / confirm button.
    pub fn confirm(&mut self) {
        match self.phase {
            Phase::Start | Phase::Success => self.offer_next_task(),
            Phase::Task => {
                if let Err(e) = self.start_maze() {
                    tracing::error!("maze setup failed: {e}");
                    self.message = format!("This maze could not be built ({e})");
                }
            }
            Phase::Playing => {}
        }
    }

    /// Esc / cancel button. Returns true when the player asked to quit.
    pub fn cancel(&mut self) -> bool {
        if self.phase == Phase::Start {
            return true;
        }
        self.go_home();
        false
    }

    fn offer_next_task(&mut self) {
        let task = self.tasks.next().clone();
        tracing::info!(target_door = %task.target, "task offered");
        self.task = Some(task);
        self.session = None;
        self.message.clear();
        self.phase = Phase::Task;
    }

    fn start_maze(&mut self) -> Result<(), SetupError> {
        let Some(task) = &self.task else {
            return Ok(());
        };
        let desc = maze::for_task(task.target, self.config.tile_size, &mut self.rng);
        let session = MazeSession::new(desc, task.target, self.config.movement.clone())?;

        self.session = Some(session);
        self.played = Duration::ZERO;
        self.auto_hint_done = false;
        self.hint_until = None;
        self.message = MOVE_PROMPT.to_string();
        self.phase = Phase::Playing;
        Ok(())
    }

    fn go_home(&mut self) {
        tracing::info!("back to start screen");
        self.session = None;
        self.task = None;
        self.hint_until = None;
        self.message.clear();
        self.phase = Phase::Start;
    }

    // ── Play ──

    /// Ask for a move to `tile`. Ignored outside play.
    pub fn request_move(&mut self, tile: TilePos) -> Option<MoveResponse> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.session.as_mut().map(|s| s.request_move(tile))
    }

    /// Ask for a move one step away from where the player stands.
    /// Held keys call this every frame, so nothing is asked mid-glide.
    pub fn request_step(&mut self, dx: i32, dy: i32) -> Option<MoveResponse> {
        let session = self.session.as_ref()?;
        if session.is_moving() {
            return None;
        }
        let from = session.settled_tile();
        self.request_move(TilePos::new(from.x + dx, from.y + dy))
    }

    pub fn show_hint(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        if let Some(task) = &self.task {
            self.message = task.hint.to_string();
            self.hint_until = Some(self.clock + self.config.hints.display_for);
        }
    }

    /// True while the target door should be highlighted.
    pub fn hint_visible(&self) -> bool {
        self.hint_until.is_some()
    }

    /// One frame.
    pub fn tick(&mut self, delta: Duration) {
        self.clock += delta;
        if self.hint_until.is_some_and(|until| self.clock >= until) {
            self.hint_until = None;
        }
        if self.phase != Phase::Playing {
            return;
        }

        self.played += delta;
        if !self.auto_hint_done && self.played >= self.config.hints.auto_hint_after {
            self.auto_hint_done = true;
            self.show_hint();
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let events = session.advance(delta);
        let finished = session.status() == SessionStatus::Completed;
        let door = session.target_door();

        for event in &events {
            self.on_event(event);
        }
        if finished {
            self.finish(door);
        }
    }

    fn on_event(&mut self, event: &MazeEvent) {
        match event {
            MazeEvent::ItemCollected { id, kind, pos } => {
                tracing::debug!(%id, %pos, "pickup shown");
                let name = self.session.as_ref()
                    .and_then(|s| s.items().iter().find(|i| &i.id == id))
                    .map_or(id.as_str(), |i| i.name);
                self.message = match kind {
                    ItemKind::Badge => format!("You got the {name}! ✨"),
                    ItemKind::Item => format!("You got the {name}!"),
                };
            }
            MazeEvent::SwitchToggled { id, state, pos } => {
                tracing::debug!(%id, %pos, "switch shown");
                let name = self.session.as_ref()
                    .and_then(|s| s.switches().iter().find(|sw| &sw.id == id))
                    .map_or(id.as_str(), |sw| sw.name);
                self.message = format!("The {name} is {state}");
            }
            MazeEvent::WrongDoor { door, target } => {
                tracing::debug!(%door, %target, "wrong door shown");
                self.message = WRONG_DOOR.to_string();
            }
            MazeEvent::ConditionUnmet { door, missing } => {
                tracing::debug!(%door, missing = missing.id(), "unmet condition shown");
                self.message = missing_message(missing);
            }
            // handled once the frame's events are through
            MazeEvent::DoorOpened { .. } => {}
        }
    }

    fn finish(&mut self, door: DoorId) {
        self.tasks.complete(door);
        tracing::info!(%door, completed = self.tasks.completed_count(), "task complete");
        self.message = self.task.as_ref().map_or("Well done!", |t| t.success).to_string();
        self.session = None;
        self.hint_until = None;
        self.phase = Phase::Success;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

fn missing_message(missing: &Requirement) -> String {
    match missing {
        Requirement::Item { .. } | Requirement::Badge { .. } => {
            format!("You need the {}", missing.name())
        }
        Requirement::SwitchOn { .. } => format!("Turn the {} {}", missing.name(), SwitchState::On),
    }
}

/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::game::{Game, Phase, Vehicle};
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("Could not open log file: {e}");
    }

    let config = GameConfig::load();
    tracing::info!(?config, "starting");

    let mut game = Game::new(config);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut game, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!("game error: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Door Maze! Doors opened: {}", game.tasks.completed_count());
}

fn game_loop(game: &mut Game, renderer: &mut Renderer) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&game.config().gamepad);
    let frame = game.config().movement.frame;
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        let mut commands = kb.commands().to_vec();
        commands.extend(gp.commands());
        let held = kb.held_step().or_else(|| gp.held_step());
        if handle_input(game, renderer, &commands, held) {
            break;
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            game.tick(elapsed);
            last_tick = Instant::now();
        }

        renderer.render(game, gp.connected)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Returns true when the player asked to quit.
fn handle_input(
    game: &mut Game,
    renderer: &Renderer,
    commands: &[Command],
    held_step: Option<(i32, i32)>,
) -> bool {
    let mut pointed = false;
    for &command in commands {
        match command {
            Command::Quit => return true,
            Command::Cancel => {
                if game.cancel() {
                    return true;
                }
            }
            Command::Confirm => game.confirm(),
            Command::Vehicle(index) => {
                if let Some(&vehicle) = Vehicle::ALL.get(index) {
                    game.select_vehicle(vehicle);
                }
            }
            Command::Hint => game.show_hint(),
            Command::Point(col, row) => {
                pointed = true;
                let tile_size = game.config().tile_size;
                let tile = renderer.maze_point(col, row, tile_size)
                    .and_then(|(x, y)| game.session.as_ref()?.tile_at_point(x, y));
                if let Some(tile) = tile {
                    game.request_move(tile);
                }
            }
            // Steps act through `held_step` so a held key keeps walking.
            Command::Step(..) => {}
        }
    }

    if game.phase == Phase::Playing && !pointed {
        if let Some((dx, dy)) = held_step {
            game.request_step(dx, dy);
        }
    }
    false
}

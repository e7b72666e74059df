/// Maze descriptors and the built-in layouts.
///
/// A `MazeDescriptor` is plain data: the grid as raw codes plus the
/// things placed on it. `MazeSession::new` validates it.
///
/// ## Layouts
///
/// Five fixed 10×15 layouts. Each is a list of carved `(x, y)` floor
/// tiles on a field of wall, one start tile and a row of three goal
/// tiles, plus per-layout positions for the key, switch, badge and the
/// three doors. `for_task` picks one at random and places only what the
/// active task needs.

use rand::Rng;

use crate::domain::entity::{Door, DoorCondition, DoorId, Item, Switch};
use crate::domain::grid::TilePos;

pub const MAZE_WIDTH: usize = 10;
pub const MAZE_HEIGHT: usize = 15;

/// Everything a session needs to start.
#[derive(Clone, Debug)]
pub struct MazeDescriptor {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    pub tile_size: u32,
    /// Raw tile codes, `grid[y][x]`.
    pub grid: Vec<Vec<u8>>,
    /// `None` = use the grid's start-coded tile.
    pub start: Option<TilePos>,
    pub items: Vec<Item>,
    pub switches: Vec<Switch>,
    pub doors: Vec<Door>,
}

/// Where things go in one layout.
struct Placement {
    key: TilePos,
    switch: TilePos,
    badge: TilePos,
    door_left: TilePos,
    door_middle: TilePos,
    door_right: TilePos,
}

struct Layout {
    name: &'static str,
    floor: &'static [(i32, i32)],
    start: (i32, i32),
    goals: [(i32, i32); 3],
    placement: Placement,
}

const fn p(x: i32, y: i32) -> TilePos {
    TilePos::new(x, y)
}

pub const LAYOUT_COUNT: usize = 5;

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Build the maze for a task, picking a layout at random.
pub fn for_task<R: Rng>(target: DoorId, tile_size: u32, rng: &mut R) -> MazeDescriptor {
    let index = rng.gen_range(0..LAYOUT_COUNT);
    let maze = build(index, target, tile_size);
    tracing::info!(layout = index + 1, name = maze.name, %target, "selected maze layout");
    maze
}

/// Build layout `index` (wrapping) with the entities for `target`.
pub fn build(index: usize, target: DoorId, tile_size: u32) -> MazeDescriptor {
    let layout = layout(index % LAYOUT_COUNT);
    let at = &layout.placement;

    let mut items = vec![];
    let mut switches = vec![];
    let doors;

    match target {
        DoorId::Left => {
            items.push(Item::new("key-red", at.key, "🔑", "red key"));
            doors = vec![Door {
                id: DoorId::Left,
                pos: at.door_left,
                condition: DoorCondition::HasItem("key-red".into()),
                icon: "🔑",
            }];
        }
        DoorId::Middle => {
            switches.push(Switch::new("switch-green", at.switch, "🔘", "green switch"));
            doors = vec![Door {
                id: DoorId::Middle,
                pos: at.door_middle,
                condition: DoorCondition::SwitchOn("switch-green".into()),
                icon: "🔘",
            }];
        }
        DoorId::Right => {
            items.push(Item::new("badge-star", at.badge, "⭐", "star badge"));
            doors = vec![Door {
                id: DoorId::Right,
                pos: at.door_right,
                condition: DoorCondition::HasBadge("badge-star".into()),
                icon: "⭐",
            }];
        }
    }

    MazeDescriptor {
        name: layout.name,
        width: MAZE_WIDTH,
        height: MAZE_HEIGHT,
        tile_size,
        grid: carve(&layout),
        start: None,
        items,
        switches,
        doors,
    }
}

// ══════════════════════════════════════════════════════════════
// Grid carving
// ══════════════════════════════════════════════════════════════

fn carve(layout: &Layout) -> Vec<Vec<u8>> {
    let mut grid = vec![vec![0u8; MAZE_WIDTH]; MAZE_HEIGHT];
    let mut set = |(x, y): (i32, i32), code: u8| {
        if x >= 0 && y >= 0 && (x as usize) < MAZE_WIDTH && (y as usize) < MAZE_HEIGHT {
            grid[y as usize][x as usize] = code;
        }
    };
    for &cell in layout.floor {
        set(cell, 1);
    }
    set(layout.start, 2);
    for &goal in &layout.goals {
        set(goal, 3);
    }
    grid
}

// ══════════════════════════════════════════════════════════════
// Layout data
// ══════════════════════════════════════════════════════════════

fn layout(index: usize) -> Layout {
    match index {
        0 => Layout {
            name: "Straight Corridor",
            floor: &[
                // main corridor, two wide
                (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7), (1, 8), (1, 9), (1, 10), (1, 11), (1, 12),
                (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7), (2, 8), (2, 9), (2, 10), (2, 11), (2, 12),
                // key room
                (3, 4), (3, 5), (3, 6), (4, 4), (4, 5), (4, 6),
                // switch room
                (3, 9), (3, 10), (3, 11), (4, 9), (4, 10), (4, 11), (5, 9), (5, 10), (5, 11),
                // badge room
                (6, 7), (6, 8), (6, 9), (7, 7), (7, 8), (7, 9), (8, 7), (8, 8), (8, 9),
                // goal area
                (5, 12), (5, 13), (6, 12), (6, 13), (7, 12), (7, 13), (8, 12), (8, 13),
                // connectors
                (4, 7), (4, 8), (5, 7), (5, 8),
            ],
            start: (1, 1),
            goals: [(6, 13), (7, 13), (8, 13)],
            placement: Placement {
                key: p(3, 5),
                switch: p(5, 10),
                badge: p(7, 8),
                door_left: p(6, 13),
                door_middle: p(7, 13),
                door_right: p(8, 13),
            },
        },
        1 => Layout {
            name: "L-Shape",
            floor: &[
                (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7), (1, 8),
                (2, 1), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7), (2, 8),
                (3, 7), (3, 8), (4, 7), (4, 8), (5, 7), (5, 8), (6, 7), (6, 8), (7, 7), (7, 8),
                (4, 2), (4, 3), (4, 4), (5, 2), (5, 3), (5, 4),
                (7, 4), (7, 5), (7, 6), (8, 4), (8, 5), (8, 6),
                (3, 2), (3, 3), (3, 4), (3, 5), (3, 6),
                (6, 4), (6, 5), (6, 6),
                (5, 10), (5, 11), (5, 12), (6, 10), (6, 11), (6, 12), (7, 10), (7, 11), (7, 12),
                (3, 9), (3, 10), (3, 11), (3, 12), (3, 13), (4, 9), (4, 10), (4, 11), (4, 12), (4, 13),
            ],
            start: (1, 1),
            goals: [(3, 13), (4, 13), (5, 13)],
            placement: Placement {
                key: p(4, 3),
                switch: p(7, 5),
                badge: p(6, 11),
                door_left: p(3, 13),
                door_middle: p(4, 13),
                door_right: p(5, 13),
            },
        },
        2 => Layout {
            name: "Spiral",
            floor: &[
                (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (1, 7), (1, 8), (1, 9), (1, 10), (1, 11),
                (2, 1), (2, 11), (3, 1), (3, 11), (4, 1), (4, 11), (5, 1), (5, 11), (6, 1), (6, 11), (7, 1), (7, 11),
                (8, 1), (8, 2), (8, 3), (8, 4), (8, 5), (8, 6), (8, 7), (8, 8), (8, 9), (8, 10), (8, 11),
                (3, 3), (3, 4), (3, 5), (3, 6), (3, 7), (3, 8), (3, 9),
                (4, 3), (4, 9), (5, 3), (5, 9), (6, 3), (6, 4), (6, 5), (6, 6), (6, 7), (6, 8), (6, 9),
                (4, 5), (4, 6), (4, 7), (5, 5), (5, 6), (5, 7),
                (2, 13), (3, 13), (4, 13), (5, 13), (6, 13), (7, 13), (8, 13),
                (2, 12), (3, 12), (4, 12), (5, 12), (6, 12), (7, 12), (8, 12),
                // entrance from the outer ring into the spiral
                (2, 6),
            ],
            start: (1, 1),
            goals: [(4, 13), (5, 13), (6, 13)],
            placement: Placement {
                key: p(4, 6),
                switch: p(5, 6),
                badge: p(6, 7),
                door_left: p(4, 13),
                door_middle: p(5, 13),
                door_right: p(6, 13),
            },
        },
        3 => Layout {
            name: "Crossroads",
            floor: &[
                (4, 1), (4, 2), (4, 3), (4, 4), (4, 5), (4, 6), (4, 7), (4, 8), (4, 9), (4, 10), (4, 11), (4, 12),
                (5, 1), (5, 2), (5, 3), (5, 4), (5, 5), (5, 6), (5, 7), (5, 8), (5, 9), (5, 10), (5, 11), (5, 12),
                (1, 4), (1, 5), (2, 4), (2, 5), (3, 4), (3, 5), (6, 4), (6, 5), (7, 4), (7, 5), (8, 4), (8, 5),
                (1, 9), (1, 10), (2, 9), (2, 10), (3, 9), (3, 10), (6, 9), (6, 10), (7, 9), (7, 10), (8, 9), (8, 10),
                (1, 2), (1, 3), (2, 2), (2, 3),
                (7, 2), (7, 3), (8, 2), (8, 3),
                (1, 12), (2, 12), (3, 12),
                (6, 12), (6, 13), (7, 12), (7, 13), (8, 12), (8, 13),
            ],
            start: (1, 4),
            goals: [(6, 13), (7, 13), (8, 13)],
            placement: Placement {
                key: p(1, 3),
                switch: p(7, 3),
                badge: p(2, 12),
                door_left: p(6, 13),
                door_middle: p(7, 13),
                door_right: p(8, 13),
            },
        },
        _ => Layout {
            name: "Zigzag",
            floor: &[
                (1, 1), (1, 2), (2, 2), (3, 2), (4, 2), (4, 3), (4, 4), (3, 4), (2, 4), (1, 4), (1, 5), (1, 6),
                (2, 6), (3, 6), (4, 6), (5, 6), (6, 6), (6, 7), (6, 8), (5, 8), (4, 8), (3, 8), (2, 8), (2, 9),
                (2, 10), (3, 10), (4, 10), (5, 10), (6, 10), (7, 10), (8, 10), (8, 11), (8, 12), (7, 12), (6, 12),
                (2, 1), (2, 3), (2, 5), (2, 7), (3, 1), (3, 3), (3, 5), (3, 7), (3, 9), (3, 11),
                (4, 1), (4, 3), (4, 5), (4, 7), (4, 9), (4, 11), (5, 1), (5, 3), (5, 5), (5, 7), (5, 9), (5, 11),
                (6, 1), (6, 3), (6, 5), (6, 9), (6, 11), (7, 1), (7, 3), (7, 5), (7, 7), (7, 8), (7, 9), (7, 11),
                (6, 2), (6, 3), (6, 4), (7, 2), (7, 4),
                (1, 7), (1, 8), (1, 9), (1, 10), (1, 11), (5, 12), (5, 13), (6, 13), (7, 13),
            ],
            start: (1, 1),
            goals: [(5, 13), (6, 13), (7, 13)],
            placement: Placement {
                key: p(6, 3),
                switch: p(1, 8),
                badge: p(5, 13),
                door_left: p(5, 13),
                door_middle: p(6, 13),
                door_right: p(7, 13),
            },
        },
    }
}

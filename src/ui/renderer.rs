/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer reads `Game` and never changes it. The one thing it
/// knows that the game does not is where the maze landed on screen, so
/// pointer translation (`maze_point`) lives here.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{DoorId, SwitchState};
use crate::domain::grid::TilePos;
use crate::domain::tile::Tile;
use crate::sim::game::{Game, Phase, Vehicle};
use crate::sim::session::MazeSession;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (emoji with variation selectors)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this glyph occupies 2 terminal columns
    cont: bool,    // true = right half of a wide glyph (skip render)
}

impl Cell {
    /// Explicit background for every "empty" cell so the gap between rows
    /// matches the cell color.
    const BASE_BG: Color = Color::Rgb { r: 24, g: 28, b: 40 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 16],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    /// A two-column glyph. Longer strings are cut at a char boundary.
    fn from_str_wide(s: &str, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let mut len = 0;
        for ch in s.chars() {
            let n = ch.len_utf8();
            if len + n > cell.ch.len() {
                break;
            }
            ch.encode_utf8(&mut cell.ch[len..]);
            len += n;
        }
        cell.ch_len = len as u8;
        cell.bg = Self::norm_bg(bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (cx, ch) in (x..self.width).zip(s.chars()) {
            self.set(cx, y, Cell::from_char(ch, fg, bg));
        }
    }

    /// Place a two-column glyph at (x, y).
    fn put_wide(&mut self, x: usize, y: usize, glyph: &str, bg: Color) {
        if x + 1 < self.width {
            self.set(x, y, Cell::from_str_wide(glyph, bg));
            self.set(x + 1, y, Cell::WIDE_CONT);
        }
    }

    /// Fill a whole row with a background color.
    fn band(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

/// Each maze tile = 2 terminal columns.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MAP_COL: usize = 2;

// ── Palette ──

const WALL_FG: Color = Color::Rgb { r: 90, g: 110, b: 150 };
const WALL_BG: Color = Color::Rgb { r: 50, g: 62, b: 92 };
const FLOOR_BG: Color = Color::Rgb { r: 235, g: 228, b: 205 };
const START_BG: Color = Color::Rgb { r: 170, g: 220, b: 240 };
const GOAL_BG: Color = Color::Rgb { r: 170, g: 230, b: 160 };
const TARGET_BG: Color = Color::Rgb { r: 250, g: 210, b: 120 };
const HINT_BG: Color = Color::Rgb { r: 255, g: 150, b: 60 };
const HUD_BG: Color = Color::Rgb { r: 40, g: 60, b: 110 };
const MSG_BG: Color = Color::Rgb { r: 255, g: 230, b: 120 };
const TITLE: Color = Color::Rgb { r: 255, g: 200, b: 80 };
const HI: Color = Color::Rgb { r: 120, g: 240, b: 120 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Terminal cell → point in maze units (`tile_size` per tile), at the
    /// centre of the tile under the cell. `None` left of or above the maze.
    pub fn maze_point(&self, col: u16, row: u16, tile_size: u32) -> Option<(f32, f32)> {
        let col = (col as usize).checked_sub(MAP_COL)?;
        let row = (row as usize).checked_sub(MAP_ROW)?;
        let size = tile_size as f32;
        let tx = (col / CELL_W) as f32;
        let ty = row as f32;
        Some((tx * size + size / 2.0, ty * size + size / 2.0))
    }

    pub fn render(&mut self, game: &Game, gamepad_connected: bool) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change: clear for a clean transition
        if self.last_phase != Some(game.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(game.phase);
        }

        self.front.clear();
        match game.phase {
            Phase::Start => self.compose_start(game, gamepad_connected),
            Phase::Task => self.compose_task(game),
            Phase::Playing => self.compose_game(game),
            Phase::Success => self.compose_success(game),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Screens ──

    fn compose_start(&mut self, game: &Game, gamepad_connected: bool) {
        let title = [
            r"  ____                    __  __               ",
            r" |  _ \  ___   ___  _ __ |  \/  | __ _ _______ ",
            r" | | | |/ _ \ / _ \| '__|| |\/| |/ _` |_  / _ \",
            r" | |_| | (_) | (_) | |   | |  | | (_| |/ /  __/",
            r" |____/ \___/ \___/|_|   |_|  |_|\__,_/___\___|",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 1 + i, line, TITLE, Color::Reset);
        }
        self.front.put_str(6, 7, "Three doors. One is yours. Can you find it?", Color::White, Color::Reset);

        self.front.put_str(6, 9, "Pick your ride:", Color::White, Color::Reset);
        for (i, vehicle) in Vehicle::ALL.iter().enumerate() {
            let row = 10 + i;
            let selected = *vehicle == game.vehicle;
            let fg = if selected { HI } else { Color::Grey };
            let marker = if selected { "▸" } else { " " };
            self.front.put_str(6, row, &format!("{marker} {}", i + 1), fg, Color::Reset);
            self.front.put_wide(10, row, vehicle.icon(), Color::Reset);
            self.front.put_str(13, row, vehicle.name(), fg, Color::Reset);
        }

        let help = [
            "ENTER / SPACE  Start",
            "1-4            Pick a ride",
            "ESC            Quit",
        ];
        for (i, line) in help.iter().enumerate() {
            self.front.put_str(6, 15 + i, line, Color::DarkGrey, Color::Reset);
        }
        if gamepad_connected {
            self.front.put_str(6, 19, "Gamepad connected", Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_task(&mut self, game: &Game) {
        let Some(task) = &game.task else {
            return;
        };
        self.front.put_wide(6, 3, game.vehicle.icon(), Color::Reset);
        self.front.put_str(9, 3, "Your mission:", TITLE, Color::Reset);
        self.front.put_str(6, 5, task.text, Color::White, Color::Reset);

        // the three doors, target one marked
        for (i, door) in DoorId::ALL.iter().enumerate() {
            let col = 8 + i * 8;
            let target = *door == task.target;
            let bg = if target { TARGET_BG } else { Color::Reset };
            self.front.put_wide(col, 7, "🚪", bg);
            let fg = if target { HI } else { Color::DarkGrey };
            self.front.put_str(col - 1, 8, &door.to_string(), fg, Color::Reset);
        }

        let done = format!("Cleared: {}/{}", game.tasks.completed_count(), game.tasks.len());
        self.front.put_str(6, 10, &done, Color::DarkGrey, Color::Reset);
        if !game.message.is_empty() {
            self.compose_message(12, &game.message);
        }
        self.front.put_str(6, 14, "ENTER  Go!     ESC  Home", Color::DarkGrey, Color::Reset);
    }

    fn compose_success(&mut self, game: &Game) {
        let art = [
            "╔══════════════════════════════╗",
            "║   ★  THE DOOR IS OPEN!  ★    ║",
            "╚══════════════════════════════╝",
        ];
        for (i, line) in art.iter().enumerate() {
            self.front.put_str(4, 2 + i, line, TITLE, Color::Reset);
        }
        self.front.put_wide(6, 6, game.vehicle.icon(), Color::Reset);
        self.front.put_str(9, 6, &game.message, HI, Color::Reset);

        let done = format!("Cleared: {}/{}", game.tasks.completed_count(), game.tasks.len());
        self.front.put_str(6, 8, &done, Color::White, Color::Reset);
        self.front.put_str(6, 10, "ENTER  Next mission     ESC  Home", Color::DarkGrey, Color::Reset);
    }

    fn compose_game(&mut self, game: &Game) {
        let Some(session) = &game.session else {
            return;
        };

        // ── HUD row ──
        self.front.band(HUD_ROW, HUD_BG);
        let hud = format!(" {}  ·  open the {} door ", session.name(), session.target_door());
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // ── Maze ──
        let grid = session.grid();
        let player = session.player_position().nearest_tile();
        let pending = session.player_target();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let tile = TilePos::new(x as i32, y as i32);
                let col = MAP_COL + x * CELL_W;
                let row = MAP_ROW + y;
                if tile == player {
                    self.front.put_wide(col, row, game.vehicle.icon(), FLOOR_BG);
                } else {
                    self.compose_tile(game, session, tile, pending == Some(tile), col, row);
                }
            }
        }

        // ── Inventory ──
        let side = MAP_COL + grid.width() * CELL_W + 3;
        self.front.put_str(side, MAP_ROW, "Bag", TITLE, Color::Reset);
        let mut row = MAP_ROW + 1;
        for item in session.items().iter().filter(|i| i.collected) {
            self.front.put_wide(side, row, item.icon, Color::Reset);
            self.front.put_str(side + 3, row, item.name, Color::White, Color::Reset);
            row += 1;
        }
        for sw in session.switches() {
            let state = session.inventory().switch_state(&sw.id);
            self.front.put_wide(side, row, switch_icon(sw.icon, state), Color::Reset);
            self.front.put_str(side + 3, row, &format!("{} {state}", sw.name), Color::White, Color::Reset);
            row += 1;
        }
        if row == MAP_ROW + 1 {
            self.front.put_str(side, row, "(empty)", Color::DarkGrey, Color::Reset);
        }

        // ── Message bar ──
        let msg_row = MAP_ROW + grid.height() + 1;
        if !game.message.is_empty() {
            self.compose_message(msg_row, &game.message);
        }

        // ── Help bar ──
        let help = " Mouse/Arrows/WASD move  Q E Z C diagonal  H hint  ESC home";
        self.front.put_str(0, msg_row + 2, help, Color::DarkGrey, Color::Reset);
    }

    fn compose_tile(
        &mut self,
        game: &Game,
        session: &MazeSession,
        tile: TilePos,
        pending: bool,
        col: usize,
        row: usize,
    ) {
        let base = match session.grid().tile_at(tile) {
            Tile::Wall => {
                self.front.set(col, row, Cell::from_char('▓', WALL_FG, WALL_BG));
                self.front.set(col + 1, row, Cell::from_char('▓', WALL_FG, WALL_BG));
                return;
            }
            Tile::Floor => FLOOR_BG,
            Tile::Start => START_BG,
            Tile::Goal => GOAL_BG,
        };
        let bg = if pending { TARGET_BG } else { base };

        // a hinted door shows what opens it
        if let Some(door) = session.doors().iter().find(|d| d.pos == tile) {
            if door.id == session.target_door() && game.hint_visible() {
                self.front.put_wide(col, row, door.icon, HINT_BG);
            } else {
                self.front.put_wide(col, row, "🚪", bg);
            }
            return;
        }
        if let Some(item) = session.items().iter().find(|i| i.pos == tile && !i.collected) {
            self.front.put_wide(col, row, item.icon, bg);
            return;
        }
        if let Some(sw) = session.switches().iter().find(|s| s.pos == tile) {
            self.front.put_wide(col, row, switch_icon(sw.icon, sw.state), bg);
            return;
        }

        self.front.set(col, row, Cell::from_char(' ', Color::Black, bg));
        self.front.set(col + 1, row, Cell::from_char(' ', Color::Black, bg));
    }

    fn compose_message(&mut self, row: usize, text: &str) {
        self.front.band(row, MSG_BG);
        self.front.put_str(1, row, &format!(" {text} "), Color::Black, MSG_BG);
    }
}

fn switch_icon(off_icon: &'static str, state: SwitchState) -> &'static str {
    match state {
        SwitchState::On => "🟢",
        SwitchState::Off => off_icon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maze_point_lands_mid_tile() {
        let r = Renderer::new();
        // column 2..3 is tile x=0, row 2 is tile y=0
        assert_eq!(r.maze_point(2, 2, 32), Some((16.0, 16.0)));
        assert_eq!(r.maze_point(3, 2, 32), Some((16.0, 16.0)));
        assert_eq!(r.maze_point(6, 5, 32), Some((80.0, 112.0)));
        assert_eq!(r.maze_point(1, 5, 32), None);
        assert_eq!(r.maze_point(5, 0, 32), None);
    }

    #[test]
    fn wide_cells_keep_whole_chars() {
        let cell = Cell::from_str_wide("✈️", Color::Reset);
        assert_eq!(cell.as_str(), "✈️");
        assert!(cell.wide);
        let long = Cell::from_str_wide("🟢🟢🟢🟢🟢", Color::Reset);
        assert_eq!(long.as_str(), "🟢🟢🟢🟢");
    }
}

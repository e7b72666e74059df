/// Line-of-travel rules: can the player glide from one tile to another?
///
/// Pure functions over the grid. They say whether the straight path is
/// clear; whether the destination itself is walkable is checked by the
/// caller before asking.
///
/// ## Blocking Truth Table
///
/// ┌──────────────────────────────┬────────────────────────────────────┐
/// │ Shape of the move             │ Blocked when                        │
/// ├──────────────────────────────┼────────────────────────────────────┤
/// │ Same tile                     │ never                               │
/// │ Diagonal, adjacent            │ corner (x1,y2) OR corner (x2,y1)    │
/// │                               │ is a wall                           │
/// │ Orthogonal, adjacent          │ never                               │
/// │ Diagonal (45°), longer        │ per step: next tile, or either      │
/// │                               │ corner of that step, is a wall      │
/// │ Any other line                │ any Bresenham tile (start included) │
/// │                               │ is a wall                           │
/// └──────────────────────────────┴────────────────────────────────────┘
///
/// Out-of-bounds tiles count as walls throughout.

use super::grid::{Grid, TilePos};

/// Is the straight path from `from` to `to` blocked by a wall?
pub fn has_wall_between(grid: &Grid, from: TilePos, to: TilePos) -> bool {
    if from == to {
        return false;
    }

    let adx = (to.x - from.x).abs();
    let ady = (to.y - from.y).abs();

    if adx == 1 && ady == 1 {
        return corner_blocked(grid, from, to);
    }

    if (adx == 1 && ady == 0) || (adx == 0 && ady == 1) {
        return false;
    }

    if adx == ady {
        return diagonal_blocked(grid, from, to);
    }

    line_blocked(grid, from, to)
}

/// Corner-cutting check for one diagonal step.
#[inline]
fn corner_blocked(grid: &Grid, from: TilePos, to: TilePos) -> bool {
    grid.is_wall(TilePos::new(from.x, to.y)) || grid.is_wall(TilePos::new(to.x, from.y))
}

/// Walk an exact 45° diagonal one step at a time.
fn diagonal_blocked(grid: &Grid, from: TilePos, to: TilePos) -> bool {
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut cur = from;
    while cur != to {
        let next = TilePos::new(cur.x + sx, cur.y + sy);
        if grid.is_wall(next) || corner_blocked(grid, cur, next) {
            return true;
        }
        cur = next;
    }
    false
}

/// Bresenham rasterization from `from` to `to`, both ends inclusive.
pub fn line_tiles(from: TilePos, to: TilePos) -> Vec<TilePos> {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx - dy;

    let mut tiles = Vec::with_capacity((dx.max(dy) + 1) as usize);
    let (mut x, mut y) = (from.x, from.y);
    loop {
        tiles.push(TilePos::new(x, y));
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    tiles
}

fn line_blocked(grid: &Grid, from: TilePos, to: TilePos) -> bool {
    line_tiles(from, to).into_iter().any(|p| grid.is_wall(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> TilePos {
        TilePos::new(x, y)
    }

    // ── Adjacent ──

    #[test]
    fn same_tile_never_blocked() {
        let g = Grid::from_ascii(&["#"]);
        assert!(!has_wall_between(&g, p(0, 0), p(0, 0)));
    }

    #[test]
    fn orthogonal_step_never_blocked() {
        let g = Grid::from_ascii(&[
            "###",
            "#.#",
            "###",
        ]);
        assert!(!has_wall_between(&g, p(1, 1), p(1, 0)));
        assert!(!has_wall_between(&g, p(1, 1), p(2, 1)));
    }

    #[test]
    fn diagonal_step_with_open_corners() {
        let g = Grid::from_ascii(&[
            "..",
            "..",
        ]);
        assert!(!has_wall_between(&g, p(0, 0), p(1, 1)));
        assert!(!has_wall_between(&g, p(1, 0), p(0, 1)));
    }

    #[test]
    fn diagonal_step_blocked_by_either_corner() {
        let one = Grid::from_ascii(&[
            ".#",
            "..",
        ]);
        assert!(has_wall_between(&one, p(0, 0), p(1, 1)));
        assert!(has_wall_between(&one, p(1, 1), p(0, 0)));

        let other = Grid::from_ascii(&[
            "..",
            "#.",
        ]);
        assert!(has_wall_between(&other, p(0, 0), p(1, 1)));
    }

    #[test]
    fn every_diagonal_pair_follows_corner_rule() {
        let g = Grid::from_ascii(&[
            "..#.",
            ".#..",
            "....",
            "#...",
        ]);
        for y in 0..3 {
            for x in 0..3 {
                let a = p(x, y);
                let b = p(x + 1, y + 1);
                let corners_open = !g.is_wall(p(a.x, b.y)) && !g.is_wall(p(b.x, a.y));
                assert_eq!(has_wall_between(&g, a, b), !corners_open, "{a} -> {b}");
            }
        }
    }

    // ── Long diagonal ──

    #[test]
    fn long_diagonal_open() {
        let g = Grid::from_ascii(&[
            "....",
            "....",
            "....",
            "....",
        ]);
        assert!(!has_wall_between(&g, p(0, 0), p(3, 3)));
        assert!(!has_wall_between(&g, p(3, 0), p(0, 3)));
    }

    #[test]
    fn long_diagonal_blocked_by_corner_midway() {
        let g = Grid::from_ascii(&[
            "....",
            "..#.",
            "....",
            "....",
        ]);
        // step (1,1)->(2,2) has corner (2,1)
        assert!(has_wall_between(&g, p(0, 0), p(3, 3)));
    }

    #[test]
    fn long_diagonal_blocked_by_tile_on_path() {
        let g = Grid::from_ascii(&[
            "...",
            ".#.",
            "...",
        ]);
        assert!(has_wall_between(&g, p(0, 0), p(2, 2)));
    }

    // ── Bresenham ──

    #[test]
    fn line_tiles_includes_both_ends() {
        let tiles = line_tiles(p(1, 1), p(3, 5));
        assert_eq!(tiles.first(), Some(&p(1, 1)));
        assert_eq!(tiles.last(), Some(&p(3, 5)));
        assert_eq!(tiles, vec![p(1, 1), p(1, 2), p(2, 3), p(2, 4), p(3, 5)]);
    }

    #[test]
    fn straight_line_walks_every_tile() {
        assert_eq!(line_tiles(p(0, 0), p(3, 0)), vec![p(0, 0), p(1, 0), p(2, 0), p(3, 0)]);
    }

    #[test]
    fn long_straight_line_blocked_by_wall() {
        let g = Grid::from_ascii(&["..#.."]);
        assert!(has_wall_between(&g, p(0, 0), p(4, 0)));
        assert!(!has_wall_between(&g, p(3, 0), p(4, 0)));
    }

    #[test]
    fn skewed_line_open_and_blocked() {
        let open = Grid::from_ascii(&[
            "....",
            "....",
            "....",
        ]);
        assert!(!has_wall_between(&open, p(0, 0), p(3, 2)));

        let blocked = Grid::from_ascii(&[
            "....",
            ".#..",
            "....",
        ]);
        let hits = line_tiles(p(0, 0), p(3, 2));
        assert!(hits.contains(&p(1, 1)));
        assert!(has_wall_between(&blocked, p(0, 0), p(3, 2)));
    }
}

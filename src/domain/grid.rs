/// The maze grid: an immutable rectangle of tiles.
///
/// Coordinates are signed so path walks can step past the edge without
/// underflow; anything outside the rectangle reads as `Tile::Wall`.

use std::fmt;

use super::tile::Tile;
use crate::error::SetupError;

/// An integer tile coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        TilePos { x, y }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build a grid from raw tile codes (row-major, `rows[y][x]`).
    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Grid, SetupError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if height == 0 || width == 0 {
            return Err(SetupError::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SetupError::RaggedRow { row: y, expected: width, found: row.len() });
            }
            let mut line = Vec::with_capacity(width);
            for (x, &code) in row.iter().enumerate() {
                let tile = Tile::from_code(code)
                    .ok_or(SetupError::UnknownTileCode { x, y, code })?;
                line.push(tile);
            }
            tiles.push(line);
        }

        Ok(Grid { tiles, width, height })
    }

    /// Build a grid from text rows: `#` wall, `.` floor, `S` start, `G` goal.
    #[cfg(test)]
    pub fn from_ascii(rows: &[&str]) -> Grid {
        let codes: Vec<Vec<u8>> = rows.iter()
            .map(|row| row.chars().map(|c| match c {
                '#' => 0,
                'S' => 2,
                'G' => 3,
                _ => 1,
            }).collect())
            .collect();
        Grid::from_codes(&codes).expect("test grid must be rectangular")
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Tile at `pos`. Out of bounds = wall.
    #[inline]
    pub fn tile_at(&self, pos: TilePos) -> Tile {
        if self.in_bounds(pos) {
            self.tiles[pos.y as usize][pos.x as usize]
        } else {
            Tile::Wall
        }
    }

    #[inline]
    pub fn is_wall(&self, pos: TilePos) -> bool {
        self.tile_at(pos).is_wall()
    }

    #[inline]
    pub fn is_walkable(&self, pos: TilePos) -> bool {
        self.tile_at(pos).is_walkable()
    }

    /// First tile of the given kind in row-major order.
    pub fn find(&self, kind: Tile) -> Option<TilePos> {
        self.tiles.iter().enumerate().find_map(|(y, row)| {
            row.iter()
                .position(|&t| t == kind)
                .map(|x| TilePos::new(x as i32, y as i32))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_is_rejected() {
        assert_eq!(Grid::from_codes(&[]).unwrap_err(), SetupError::EmptyGrid);
        assert_eq!(Grid::from_codes(&[vec![]]).unwrap_err(), SetupError::EmptyGrid);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Grid::from_codes(&[vec![0, 1, 0], vec![0, 1]]).unwrap_err();
        assert_eq!(err, SetupError::RaggedRow { row: 1, expected: 3, found: 2 });
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = Grid::from_codes(&[vec![0, 7]]).unwrap_err();
        assert_eq!(err, SetupError::UnknownTileCode { x: 1, y: 0, code: 7 });
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let g = Grid::from_ascii(&["..", ".."]);
        assert!(g.is_walkable(TilePos::new(1, 1)));
        assert!(g.is_wall(TilePos::new(-1, 0)));
        assert!(g.is_wall(TilePos::new(0, 2)));
        assert!(g.is_wall(TilePos::new(2, 0)));
    }

    #[test]
    fn find_start_tile() {
        let g = Grid::from_ascii(&["###", "#S#", "###"]);
        assert_eq!(g.find(Tile::Start), Some(TilePos::new(1, 1)));
        assert_eq!(g.find(Tile::Goal), None);
    }
}

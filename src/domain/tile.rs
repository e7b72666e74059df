/// Tile codes of a maze grid and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,   // 0
    Floor,  // 1
    Start,  // 2
    Goal,   // 3 (door row)
}

impl Tile {
    /// Decode a raw grid code. Unknown codes are `None`.
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Wall),
            1 => Some(Tile::Floor),
            2 => Some(Tile::Start),
            3 => Some(Tile::Goal),
            _ => None,
        }
    }

    /// Can the player stand on this tile?
    pub fn is_walkable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wall_blocks() {
        assert!(!Tile::Wall.is_walkable());
        assert!(Tile::Floor.is_walkable());
        assert!(Tile::Start.is_walkable());
        assert!(Tile::Goal.is_walkable());
    }

    #[test]
    fn codes_decode() {
        assert_eq!(Tile::from_code(0), Some(Tile::Wall));
        assert_eq!(Tile::from_code(1), Some(Tile::Floor));
        assert_eq!(Tile::from_code(2), Some(Tile::Start));
        assert_eq!(Tile::from_code(3), Some(Tile::Goal));
        assert_eq!(Tile::from_code(4), None);
    }
}

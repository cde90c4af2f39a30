//! Seeded world map.
//!
//! The map is a rectangular grid of [`Terrain`] cells generated from the
//! session seed with [`StdRng`], so the same seed always yields the same
//! island. The outer ring is water; one house sits on an inner cell with
//! walkable land on all four sides.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use storymaker_types::{LocalizedText, Position};

use crate::config::{MIN_MAP_SIDE, MapConfig};
use crate::error::WorldError;

/// Percent chance of an inner cell being water.
const LAKE_CHANCE: u32 = 12;

/// Percent chance of an inner land cell being sand rather than grass.
const SAND_CHANCE: u32 = 40;

/// Kind of ground on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    /// Not walkable.
    Water,
    /// Beach.
    Sand,
    /// Meadow.
    Grass,
    /// The starter house.
    House,
}

impl Terrain {
    /// Cell label pushed on the `map` topic.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Water => "~",
            Self::Sand => ".",
            Self::Grass => "\"",
            Self::House => "#",
        }
    }

    /// Whether the actor can stand on the cell.
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Water)
    }
}

/// A cardinal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row 0.
    North,
    /// Towards the last row.
    South,
    /// Towards the last column.
    East,
    /// Towards column 0.
    West,
}

impl Direction {
    /// Every direction, in menu order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Session action id moving in this direction.
    pub const fn action_id(self) -> &'static str {
        match self {
            Self::North => "move_north",
            Self::South => "move_south",
            Self::East => "move_east",
            Self::West => "move_west",
        }
    }

    /// Look up a direction by its action id.
    pub fn from_action_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.action_id() == id)
    }

    /// Menu label.
    pub fn label(self) -> LocalizedText {
        match self {
            Self::North => LocalizedText::new("Go north", "Aller au nord"),
            Self::South => LocalizedText::new("Go south", "Aller au sud"),
            Self::East => LocalizedText::new("Go east", "Aller à l'est"),
            Self::West => LocalizedText::new("Go west", "Aller à l'ouest"),
        }
    }
}

/// The generated grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldMap {
    width: u32,
    height: u32,
    cells: Vec<Terrain>,
    house: Position,
}

impl WorldMap {
    /// Generate the map for a seed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidMap`] if either side is below the minimum.
    pub fn generate(seed: u64, config: &MapConfig) -> Result<Self, WorldError> {
        let (width, height) = (config.width, config.height);
        if width < MIN_MAP_SIDE || height < MIN_MAP_SIDE {
            return Err(WorldError::InvalidMap {
                reason: format!("{width}x{height} is smaller than {MIN_MAP_SIDE}x{MIN_MAP_SIDE}"),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut cells = Vec::with_capacity(usize::try_from(width.saturating_mul(height)).unwrap_or(0));
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x == width.saturating_sub(1) || y == height.saturating_sub(1);
                let terrain = if border || rng.random_range(0..100) < LAKE_CHANCE {
                    Terrain::Water
                } else if rng.random_range(0..100) < SAND_CHANCE {
                    Terrain::Sand
                } else {
                    Terrain::Grass
                };
                cells.push(terrain);
            }
        }

        // The house keeps one land cell between itself and the border water.
        let house = Position {
            x: rng.random_range(2..width.saturating_sub(2)),
            y: rng.random_range(2..height.saturating_sub(2)),
        };

        let mut map = Self {
            width,
            height,
            cells,
            house,
        };
        map.set(house, Terrain::House);
        for direction in Direction::ALL {
            if let Some(neighbour) = map.step(house, direction) {
                if map.terrain(neighbour) == Some(Terrain::Water) {
                    map.set(neighbour, Terrain::Grass);
                }
            }
        }
        Ok(map)
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell of the starter house, also the actor's starting position.
    pub const fn house(&self) -> Position {
        self.house
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x >= self.width || position.y >= self.height {
            return None;
        }
        let flat = position.y.checked_mul(self.width)?.checked_add(position.x)?;
        usize::try_from(flat).ok()
    }

    fn set(&mut self, position: Position, terrain: Terrain) {
        if let Some(cell) = self
            .index(position)
            .and_then(|index| self.cells.get_mut(index))
        {
            *cell = terrain;
        }
    }

    /// Terrain at a position, `None` off the map.
    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        self.index(position)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// The neighbouring position in a direction, `None` past the edge.
    pub fn step(&self, from: Position, direction: Direction) -> Option<Position> {
        let to = match direction {
            Direction::North => Position {
                x: from.x,
                y: from.y.checked_sub(1)?,
            },
            Direction::South => Position {
                x: from.x,
                y: from.y.checked_add(1)?,
            },
            Direction::East => Position {
                x: from.x.checked_add(1)?,
                y: from.y,
            },
            Direction::West => Position {
                x: from.x.checked_sub(1)?,
                y: from.y,
            },
        };
        self.index(to).map(|_| to)
    }

    /// Every walkable position, row by row.
    pub fn walkable(&self) -> Vec<Position> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Position { x, y }))
            .filter(|position| self.terrain(*position).is_some_and(Terrain::is_walkable))
            .collect()
    }

    /// Cell labels, row by row, as pushed on the `map` topic.
    pub fn labels(&self) -> Vec<Vec<String>> {
        self.cells
            .chunks(usize::try_from(self.width).unwrap_or(1).max(1))
            .map(|row| row.iter().map(|cell| cell.label().to_owned()).collect())
            .collect()
    }
}

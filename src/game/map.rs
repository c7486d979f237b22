use std::collections::HashSet;

use log::{error, warn};
use serde::{Deserialize, Serialize};

use super::{Board, GameError, GameRng, Position, Snake};

const CROSS_COUNT: usize = 6;
const MAX_CROSS_ATTEMPTS: usize = 1000;

/// A map as declared in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub name: String,
    #[serde(default)]
    pub obstacles: Vec<[i32; 2]>,
}

/// A named, immutable obstacle layout.
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    name: String,
    obstacles: HashSet<Position>,
}

impl GameMap {
    pub fn new(name: impl Into<String>, obstacles: impl IntoIterator<Item = Position>) -> Self {
        Self {
            name: name.into(),
            obstacles: obstacles.into_iter().collect(),
        }
    }

    pub fn empty_field() -> Self {
        Self::new("Empty Field", [])
    }

    /// Obstacles lining the inside of the wall ring.
    pub fn boxed_arena(board: &Board) -> Self {
        let (max_x, max_y) = (board.width() - 2, board.height() - 2);
        let horizontal = (1..=max_x).flat_map(|x| [Position::new(x, 1), Position::new(x, max_y)]);
        let vertical = (1..=max_y).flat_map(|y| [Position::new(1, y), Position::new(max_x, y)]);
        Self::new("Boxed Arena", horizontal.chain(vertical))
    }

    /// Up to six non-overlapping crosses, none of them touching the area the
    /// snake spawns in.
    pub fn crossing_field(board: &Board, spawn_length: usize, rng: &mut GameRng) -> Self {
        let center = board.center();
        let tail_y = center.y + spawn_length.max(1) as i32 - 1;
        let in_spawn_area = |p: &Position| {
            (p.x - center.x).abs() <= 3 && p.y >= center.y - 2 && p.y <= tail_y.max(center.y + 2)
        };

        let mut obstacles = HashSet::new();
        let (min_x, max_x) = (3, board.width() - 4);
        let (min_y, max_y) = (2, board.height() - 3);
        if min_x > max_x || min_y > max_y {
            return Self::new("Crossing Field", obstacles);
        }

        let mut placed = 0;
        let mut attempts = 0;
        while placed < CROSS_COUNT && attempts < MAX_CROSS_ATTEMPTS {
            attempts += 1;
            let cx = rng.gen_range(min_x..=max_x);
            let cy = rng.gen_range(min_y..=max_y);
            let cells = cross_cells(Position::new(cx, cy));

            if cells.iter().any(|p| in_spawn_area(p) || obstacles.contains(p)) {
                continue;
            }
            obstacles.extend(cells);
            placed += 1;
        }

        if placed < CROSS_COUNT {
            warn!(
                "Only {} of {} crosses fit on a {}x{} board",
                placed,
                CROSS_COUNT,
                board.width(),
                board.height()
            );
        }

        Self::new("Crossing Field", obstacles)
    }

    pub fn from_definition(definition: &MapDefinition) -> Self {
        Self::new(
            definition.name.clone(),
            definition.obstacles.iter().map(|[x, y]| Position::new(*x, *y)),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Check the map fits the board and leaves the spawning snake free.
    pub fn validate(&self, board: &Board, spawn: &Snake) -> Result<(), GameError> {
        if self.name.trim().is_empty() {
            return Err(GameError::InvalidMap {
                name: self.name.clone(),
                reason: "map name is empty".to_string(),
            });
        }

        if let Some(position) = self.obstacles.iter().find(|p| !board.is_interior(**p)) {
            return Err(GameError::ObstacleOutOfBounds {
                name: self.name.clone(),
                position: *position,
            });
        }

        if spawn.body().iter().any(|p| self.obstacles.contains(p)) {
            return Err(GameError::InvalidMap {
                name: self.name.clone(),
                reason: "obstacles cover the snake's spawn position".to_string(),
            });
        }

        Ok(())
    }
}

fn cross_cells(center: Position) -> [Position; 7] {
    [
        center,
        center.offset(-1, 0),
        center.offset(1, 0),
        center.offset(-2, 0),
        center.offset(2, 0),
        center.offset(0, -1),
        center.offset(0, 1),
    ]
}

/// Which map to play: a catalog entry or a uniformly random one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapChoice {
    Preset(usize),
    Random,
}

/// The maps offered in map selection for one board size.
#[derive(Debug, Clone)]
pub struct MapCatalog {
    maps: Vec<GameMap>,
}

impl MapCatalog {
    /// Built-in presets followed by the valid custom maps. Invalid custom
    /// maps are logged and left out.
    pub fn build(
        board: &Board,
        spawn_length: usize,
        custom: &[MapDefinition],
        rng: &mut GameRng,
    ) -> Result<Self, GameError> {
        let spawn = Snake::spawn(board, spawn_length);
        let presets = vec![
            GameMap::empty_field(),
            GameMap::boxed_arena(board),
            GameMap::crossing_field(board, spawn.len(), rng),
        ];

        for map in &presets {
            map.validate(board, &spawn)?;
        }

        let mut maps = presets;
        for definition in custom {
            let map = GameMap::from_definition(definition);
            match map.validate(board, &spawn) {
                Ok(()) => maps.push(map),
                Err(err) => error!("Skipping custom map: {}", err),
            }
        }

        Ok(Self { maps })
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.maps.iter().map(GameMap::name).collect()
    }

    pub fn get(&self, index: usize) -> Option<&GameMap> {
        self.maps.get(index)
    }

    pub fn select(&self, choice: MapChoice, rng: &mut GameRng) -> Option<GameMap> {
        match choice {
            MapChoice::Preset(index) => self.get(index).cloned(),
            MapChoice::Random => rng.choose(&self.maps).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_arena_lines_the_interior() {
        let board = Board::new(20, 10, false);
        let map = GameMap::boxed_arena(&board);

        assert!(map.is_obstacle(Position::new(1, 1)));
        assert!(map.is_obstacle(Position::new(18, 8)));
        assert!(map.is_obstacle(Position::new(7, 8)));
        assert!(!map.is_obstacle(Position::new(2, 2)));
        assert_eq!(map.obstacles().len(), 2 * 18 + 2 * 8 - 4);
        assert!(map.validate(&board, &Snake::spawn(&board, 2)).is_ok());
    }

    #[test]
    fn test_crossing_field_avoids_spawn_and_overlap() {
        let board = Board::new(60, 24, false);

        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let map = GameMap::crossing_field(&board, 4, &mut rng);

            // Six disjoint crosses of seven cells each
            assert_eq!(map.obstacles().len(), CROSS_COUNT * 7);
            assert!(map.obstacles().iter().all(|p| board.is_interior(*p)));

            let center = board.center();
            assert!(map
                .obstacles()
                .iter()
                .all(|p| !((p.x - center.x).abs() <= 3 && p.y >= center.y - 2 && p.y <= center.y + 3)));
            assert!(map.validate(&board, &Snake::spawn(&board, 4)).is_ok());
        }
    }

    #[test]
    fn test_crossing_field_on_tiny_board_gives_up() {
        let board = Board::new(12, 8, false);
        let mut rng = GameRng::new(3);
        let map = GameMap::crossing_field(&board, 2, &mut rng);

        assert!(map.obstacles().len() < CROSS_COUNT * 7);
        assert!(map.obstacles().iter().all(|p| board.is_interior(*p)));
    }

    #[test]
    fn test_out_of_bounds_obstacle_is_rejected() {
        let board = Board::new(20, 10, false);
        let map = GameMap::new("Broken", [Position::new(3, 3), Position::new(19, 3)]);

        match map.validate(&board, &Snake::spawn(&board, 2)) {
            Err(GameError::ObstacleOutOfBounds { name, position }) => {
                assert_eq!(name, "Broken");
                assert_eq!(position, Position::new(19, 3));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_catalog_skips_invalid_custom_maps() {
        let board = Board::new(30, 14, false);
        let mut rng = GameRng::new(9);
        let custom = vec![
            MapDefinition {
                name: "Pillars".to_string(),
                obstacles: vec![[4, 4], [25, 4]],
            },
            MapDefinition {
                name: "Outside".to_string(),
                obstacles: vec![[40, 4]],
            },
            MapDefinition {
                name: "On Spawn".to_string(),
                obstacles: vec![[15, 7]],
            },
        ];

        let catalog = MapCatalog::build(&board, 2, &custom, &mut rng).unwrap();

        assert_eq!(
            catalog.names(),
            vec!["Empty Field", "Boxed Arena", "Crossing Field", "Pillars"]
        );
    }

    #[test]
    fn test_select_preset_and_random() {
        let board = Board::new(30, 14, false);
        let mut rng = GameRng::new(5);
        let catalog = MapCatalog::build(&board, 2, &[], &mut rng).unwrap();

        let boxed = catalog.select(MapChoice::Preset(1), &mut rng).unwrap();
        assert_eq!(boxed.name(), "Boxed Arena");
        assert!(catalog.select(MapChoice::Preset(10), &mut rng).is_none());

        for _ in 0..10 {
            let map = catalog.select(MapChoice::Random, &mut rng).unwrap();
            assert!(catalog.names().contains(&map.name()));
        }
    }
}

//! Map sources: where the engine gets its starting grid and player start
//! positions. Terrain generation proper lives outside the engine; the
//! scatter source here only exists so self-play has something to chew on.

use hegemon_protocol::{Pos, StrategicResource, Terrain};

use crate::{
    map::{GameMap, Tile},
    rng::GameRng,
};

/// Radius scored around a start candidate.
const START_SCORE_RADIUS: i32 = 3;
/// Start positions never get closer than the city spacing rule.
const START_MIN_DISTANCE_FLOOR: i32 = 3;

pub trait MapSource {
    fn build_map(&mut self) -> GameMap;

    /// Best start position given the ones already handed out.
    fn best_start_location(&self, map: &GameMap, taken: &[Pos]) -> Option<Pos> {
        best_start_location(map, taken)
    }
}

/// Fertility of the area around a candidate start.
pub fn score_start_position(map: &GameMap, pos: Pos) -> i32 {
    map.window(pos, START_SCORE_RADIUS)
        .filter(|p| p.manhattan(pos) <= START_SCORE_RADIUS)
        .filter_map(|p| map.get(p))
        .map(|t| if t.terrain.is_settleable() { t.settle_score() } else { 0 })
        .sum()
}

/// Highest-scoring settleable tile far enough from every taken start. The
/// spacing requirement shrinks when the map is too crowded to honor it.
pub fn best_start_location(map: &GameMap, taken: &[Pos]) -> Option<Pos> {
    let mut candidates: Vec<(i32, Pos)> = map
        .iter()
        .filter(|(p, t)| t.terrain.is_settleable() && t.unit.is_none() && !taken.contains(p))
        .map(|(p, _)| (score_start_position(map, p), p))
        .collect();
    // Highest score first; row-major order among equals.
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    let mut spacing = ((map.width() + map.height()) as i32 / 4).max(START_MIN_DISTANCE_FLOOR);
    loop {
        let pick = candidates
            .iter()
            .find(|(_, p)| taken.iter().all(|t| t.manhattan(*p) >= spacing))
            .map(|(_, p)| *p);
        if pick.is_some() || spacing <= START_MIN_DISTANCE_FLOOR {
            return pick;
        }
        spacing -= 1;
    }
}

/// Hands out a fixed, pre-built grid.
#[derive(Clone, Debug)]
pub struct StaticMapSource {
    map: GameMap,
}

impl StaticMapSource {
    pub fn new(map: GameMap) -> Self {
        Self { map }
    }
}

impl MapSource for StaticMapSource {
    fn build_map(&mut self) -> GameMap {
        self.map.clone()
    }
}

/// Seeded random terrain with an ocean rim.
#[derive(Clone, Debug)]
pub struct ScatterMapSource {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

const LAND_WEIGHTS: [(Terrain, u32); 9] = [
    (Terrain::Grassland, 26),
    (Terrain::Plains, 26),
    (Terrain::Forest, 12),
    (Terrain::Hills, 10),
    (Terrain::Desert, 6),
    (Terrain::Tundra, 5),
    (Terrain::Jungle, 5),
    (Terrain::Mountains, 4),
    (Terrain::Ocean, 6),
];

const STRATEGICS: [StrategicResource; 5] = [
    StrategicResource::Horses,
    StrategicResource::Iron,
    StrategicResource::Coal,
    StrategicResource::Oil,
    StrategicResource::Niter,
];

fn pick_weighted(rng: &mut GameRng) -> Terrain {
    let total: u32 = LAND_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.next_u32() % total;
    for (terrain, weight) in LAND_WEIGHTS {
        if roll < weight {
            return terrain;
        }
        roll -= weight;
    }
    Terrain::Plains
}

impl ScatterMapSource {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
        }
    }
}

impl MapSource for ScatterMapSource {
    fn build_map(&mut self) -> GameMap {
        let mut rng = GameRng::seed_from_u64(self.seed);
        let (w, h) = (self.width as i32, self.height as i32);
        let mut tiles = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..h {
            for x in 0..w {
                let rim = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                let terrain = if rim { Terrain::Ocean } else { pick_weighted(&mut rng) };
                let mut tile = Tile::new(terrain);
                if terrain.is_settleable() {
                    if rng.gen_bool(0.1) {
                        tile = tile.with_river();
                    }
                    if rng.gen_bool(0.05) {
                        tile = tile.with_strategic(STRATEGICS[rng.gen_index(STRATEGICS.len())]);
                    }
                }
                tiles.push(tile);
            }
        }
        match GameMap::from_tiles(self.width, self.height, tiles) {
            Some(map) => map,
            None => GameMap::new(self.width, self.height, Terrain::Plains),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_is_deterministic_with_ocean_rim() {
        let a = ScatterMapSource::new(16, 12, 9).build_map();
        let b = ScatterMapSource::new(16, 12, 9).build_map();
        assert_eq!(a, b);
        assert_eq!(a.get(Pos::new(0, 5)).unwrap().terrain, Terrain::Ocean);
        assert_eq!(a.get(Pos::new(15, 11)).unwrap().terrain, Terrain::Ocean);
        assert_ne!(a, ScatterMapSource::new(16, 12, 10).build_map());
    }

    #[test]
    fn start_locations_are_spread_and_settleable() {
        let map = ScatterMapSource::new(24, 16, 4).build_map();
        let mut taken = Vec::new();
        for _ in 0..4 {
            let pos = best_start_location(&map, &taken).unwrap();
            assert!(map.get(pos).unwrap().terrain.is_settleable());
            for other in &taken {
                assert!(pos.manhattan(*other) >= START_MIN_DISTANCE_FLOOR);
            }
            taken.push(pos);
        }
    }

    #[test]
    fn fertile_corner_wins_on_uniform_map() {
        let mut map = GameMap::new(9, 9, Terrain::Tundra);
        map.get_mut(Pos::new(6, 6)).unwrap().terrain = Terrain::Grassland;
        *map.get_mut(Pos::new(6, 7)).unwrap() = Tile::new(Terrain::Plains).with_river();
        let source = StaticMapSource::new(map.clone());
        // (5, 5) is the only candidate with a full in-bounds window that
        // still reaches both good tiles.
        assert_eq!(source.best_start_location(&map, &[]), Some(Pos::new(5, 5)));
    }

    #[test]
    fn no_land_means_no_start() {
        let map = GameMap::new(5, 5, Terrain::Ocean);
        assert_eq!(best_start_location(&map, &[]), None);
    }
}

use hegemon_protocol::Terrain;

use crate::yields::Yields;

#[derive(Debug, Clone)]
pub struct TerrainDef {
    pub kind: Terrain,
    pub data_id: &'static str,
    pub yields: Yields,
    /// Half-points to enter; `None` when land units cannot enter at all.
    pub land_move_cost: Option<i32>,
    pub naval_passable: bool,
    pub defense_bonus_pct: i32,
    pub attack_bonus_pct: i32,
}

pub const RIVER_FOOD_BONUS: i32 = 1;
pub const RIVER_MOVE_PENALTY: i32 = 1;
pub const RIVER_DEFENSE_BONUS_PCT: i32 = 10;
pub const STRATEGIC_PRODUCTION_BONUS: i32 = 1;

pub static TERRAINS: [TerrainDef; 10] = [
    TerrainDef {
        kind: Terrain::Ocean,
        data_id: "ocean",
        yields: Yields::new(1, 0, 1, 0, 0),
        land_move_cost: None,
        naval_passable: true,
        defense_bonus_pct: 0,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Plains,
        data_id: "plains",
        yields: Yields::new(1, 1, 0, 0, 0),
        land_move_cost: Some(2),
        naval_passable: false,
        defense_bonus_pct: 0,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Grassland,
        data_id: "grassland",
        yields: Yields::new(2, 0, 0, 0, 0),
        land_move_cost: Some(2),
        naval_passable: false,
        defense_bonus_pct: 0,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Desert,
        data_id: "desert",
        yields: Yields::new(0, 0, 0, 0, 0),
        land_move_cost: Some(3),
        naval_passable: false,
        defense_bonus_pct: 0,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Tundra,
        data_id: "tundra",
        yields: Yields::new(1, 0, 0, 0, 0),
        land_move_cost: Some(3),
        naval_passable: false,
        defense_bonus_pct: 0,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Snow,
        data_id: "snow",
        yields: Yields::new(0, 0, 0, 0, 0),
        land_move_cost: Some(2),
        naval_passable: false,
        defense_bonus_pct: 0,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Forest,
        data_id: "forest",
        yields: Yields::new(1, 2, 0, 0, 0),
        land_move_cost: Some(4),
        naval_passable: false,
        defense_bonus_pct: 15,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Jungle,
        data_id: "jungle",
        yields: Yields::new(2, 0, 0, 0, 0),
        land_move_cost: Some(4),
        naval_passable: false,
        defense_bonus_pct: 15,
        attack_bonus_pct: 0,
    },
    TerrainDef {
        kind: Terrain::Hills,
        data_id: "hills",
        yields: Yields::new(0, 2, 0, 0, 0),
        land_move_cost: Some(4),
        naval_passable: false,
        defense_bonus_pct: 25,
        attack_bonus_pct: 25,
    },
    TerrainDef {
        kind: Terrain::Mountains,
        data_id: "mountains",
        yields: Yields::new(0, 1, 0, 0, 0),
        land_move_cost: None,
        naval_passable: false,
        defense_bonus_pct: 50,
        attack_bonus_pct: 0,
    },
];

#[inline]
pub fn terrain(kind: Terrain) -> &'static TerrainDef {
    &TERRAINS[kind as usize]
}

pub fn terrain_id(data_id: &str) -> Option<Terrain> {
    TERRAINS.iter().find(|t| t.data_id == data_id).map(|t| t.kind)
}

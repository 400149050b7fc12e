use serde::{Deserialize, Serialize};

use hegemon_protocol::{BuildingKind, PlayerId, Pos, Project};

use crate::{map::GameMap, yields::Yields};

/// Every city produces at least this much of each resource before tiles.
pub const CITY_BASE_YIELDS: Yields = Yields::new(1, 1, 1, 1, 1);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construction {
    pub project: Project,
    pub progress: i32,
    pub required: i32,
}

impl Construction {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.required
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub owner: PlayerId,
    pub pos: Pos,
    pub population: u32,
    pub is_capital: bool,
    /// Map tile indices owned by this city (sorted, stable).
    pub territory: Vec<u32>,
    /// Base production table: city base plus the yields of every territory tile.
    pub production: Yields,
    pub buildings: Vec<BuildingKind>,
    pub construction: Option<Construction>,
    pub founded_turn: u32,
}

impl City {
    pub fn new(name: String, pos: Pos, owner: PlayerId, founded_turn: u32) -> Self {
        Self {
            name,
            owner,
            pos,
            population: 1,
            is_capital: false,
            territory: Vec::new(),
            production: CITY_BASE_YIELDS,
            buildings: Vec::new(),
            construction: None,
            founded_turn,
        }
    }

    pub fn claims_tile_index(&self, tile_index: usize) -> bool {
        self.territory.binary_search(&(tile_index as u32)).is_ok()
    }

    pub fn claim_tile_index(&mut self, tile_index: usize) {
        let tile_index = tile_index as u32;
        if let Err(pos) = self.territory.binary_search(&tile_index) {
            self.territory.insert(pos, tile_index);
        }
    }

    pub fn release_tile_index(&mut self, tile_index: usize) -> bool {
        match self.territory.binary_search(&(tile_index as u32)) {
            Ok(pos) => {
                self.territory.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn has_building(&self, building: BuildingKind) -> bool {
        self.buildings.contains(&building)
    }

    /// Rebuild the production table from the current territory.
    pub fn recompute_production(&mut self, map: &GameMap) {
        let mut table = CITY_BASE_YIELDS;
        for &index in &self.territory {
            if let Some(tile) = map.tile_at_index(index as usize) {
                table += tile.yields();
            }
        }
        self.production = table;
    }
}

#![allow(dead_code)]

use hegemon_core::{
    city::City,
    player::Player,
    protocol::{CityId, Civilization, PlayerId, Pos, Terrain, UnitId, UnitKind},
    unit::Unit,
    EngineConfig, GameMap, WorldState,
};

pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        random_events: false,
        autosave_interval: 0,
        ..EngineConfig::default()
    }
}

/// Plains board with `players` human seats and nothing on it.
pub fn empty_world(width: u32, height: u32, players: u8) -> WorldState {
    let roster = (0..players)
        .map(|i| Player::new(PlayerId(i), format!("P{i}"), Civilization::Rome, false))
        .collect();
    WorldState::new(GameMap::new(width, height, Terrain::Plains), roster, 3, 20)
}

pub fn add_city(state: &mut WorldState, owner: u8, pos: Pos) -> CityId {
    let owner = PlayerId(owner);
    let mut city = City::new(format!("City {}-{}", pos.x, pos.y), pos, owner, 0);
    city.is_capital = state.city_count(owner) == 0;
    let id = state.cities.insert(city);
    state.map.get_mut(pos).unwrap().city = Some(id);
    let index = state.map.index_of(pos).unwrap();
    state.assign_tile(index, id);
    if let Some(p) = state.player_mut(owner) {
        p.cities_founded += 1;
    }
    id
}

pub fn add_unit(state: &mut WorldState, kind: UnitKind, owner: u8, pos: Pos) -> UnitId {
    state.place_unit(Unit::new(kind, PlayerId(owner), pos))
}

//! The authoritative world state and board-level helpers that keep tile
//! references consistent with the entity stores.

use serde::{Deserialize, Serialize};

use hegemon_protocol::{
    CityId, Era, NotificationLog, PlayerId, Pos, Severity, UnitId, VictoryOutcome,
};

use crate::{
    city::City,
    diplomacy::DiplomacyLedger,
    entities::EntityStore,
    map::GameMap,
    player::Player,
    progression::{GreatPeopleLedger, WonderRegistry, WorldEventTracker},
    rng::GameRng,
    unit::Unit,
};

pub const UNIT_VISION_RADIUS: i32 = 2;
pub const CITY_VISION_RADIUS: i32 = 2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Completed rounds; incremented when play wraps back to the first player.
    pub turn: u32,
    /// Era of the most advanced living player.
    pub era: Era,
    pub players: Vec<Player>,
    pub current_player: PlayerId,
    pub map: GameMap,
    pub units: EntityStore<Unit>,
    pub cities: EntityStore<City>,
    pub notifications: NotificationLog,
    pub wonders: WonderRegistry,
    pub world_events: WorldEventTracker,
    pub great_people: GreatPeopleLedger,
    pub diplomacy: DiplomacyLedger,
    pub rng: GameRng,
    pub outcome: Option<VictoryOutcome>,
}

impl WorldState {
    pub fn new(map: GameMap, players: Vec<Player>, seed: u64, notification_capacity: usize) -> Self {
        Self {
            turn: 0,
            era: Era::Antiquity,
            players,
            current_player: PlayerId(0),
            map,
            units: EntityStore::new(),
            cities: EntityStore::new(),
            notifications: NotificationLog::with_capacity(notification_capacity),
            wonders: WonderRegistry::new(),
            world_events: WorldEventTracker::new(),
            great_people: GreatPeopleLedger::new(),
            diplomacy: DiplomacyLedger::new(),
            rng: GameRng::seed_from_u64(seed),
            outcome: None,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    pub fn living_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifications.push(self.turn, severity, message);
    }

    pub fn cities_of(&self, player: PlayerId) -> impl Iterator<Item = (CityId, &City)> {
        self.cities
            .iter_ordered()
            .filter(move |(_, c)| c.owner == player)
    }

    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units
            .iter_ordered()
            .filter(move |(_, u)| u.owner == player)
    }

    pub fn city_count(&self, player: PlayerId) -> usize {
        self.cities_of(player).count()
    }

    pub fn capital_of(&self, player: PlayerId) -> Option<CityId> {
        self.cities_of(player)
            .find(|(_, c)| c.is_capital)
            .map(|(id, _)| id)
    }

    pub fn unit_at(&self, pos: Pos) -> Option<(UnitId, &Unit)> {
        let id = self.map.get(pos)?.unit?;
        self.units.get(id).map(|u| (id, u))
    }

    pub fn city_at(&self, pos: Pos) -> Option<(CityId, &City)> {
        let id = self.map.get(pos)?.city?;
        self.cities.get(id).map(|c| (id, c))
    }

    /// Nearest city of `player` within `radius` (Manhattan); ties go to the
    /// earliest city.
    pub fn nearest_city_within(&self, player: PlayerId, pos: Pos, radius: i32) -> Option<CityId> {
        self.cities_of(player)
            .map(|(id, c)| (c.pos.manhattan(pos), id))
            .filter(|(d, _)| *d <= radius)
            .min_by_key(|(d, _)| *d)
            .map(|(_, id)| id)
    }

    /// Manhattan distance to the closest city of anyone.
    pub fn distance_to_nearest_city(&self, pos: Pos) -> Option<i32> {
        self.cities
            .iter_ordered()
            .map(|(_, c)| c.pos.manhattan(pos))
            .min()
    }

    /// Store a unit and occupy its tile. The caller checks the tile is free.
    pub fn place_unit(&mut self, unit: Unit) -> UnitId {
        let pos = unit.pos;
        let id = self.units.insert(unit);
        if let Some(tile) = self.map.get_mut(pos) {
            tile.unit = Some(id);
        }
        id
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(id)?;
        if let Some(tile) = self.map.get_mut(unit.pos) {
            if tile.unit == Some(id) {
                tile.unit = None;
            }
        }
        Some(unit)
    }

    /// Move a unit's tile reference. The caller checks `to` is free.
    pub fn relocate_unit(&mut self, id: UnitId, to: Pos) -> bool {
        let Some(from) = self.units.get(id).map(|u| u.pos) else {
            return false;
        };
        if self.map.get(to).is_none() {
            return false;
        }
        if let Some(tile) = self.map.get_mut(from) {
            if tile.unit == Some(id) {
                tile.unit = None;
            }
        }
        if let Some(tile) = self.map.get_mut(to) {
            tile.unit = Some(id);
        }
        if let Some(unit) = self.units.get_mut(id) {
            unit.pos = to;
        }
        true
    }

    /// Give the tile at `index` to `city`, taking it from whichever city held
    /// it. Both production tables are rebuilt.
    pub fn assign_tile(&mut self, index: usize, city: CityId) -> Option<Option<PlayerId>> {
        let owner = self.cities.get(city)?.owner;
        let previous_owner = self.map.tile_at_index(index)?.owner;

        let previous_city = self
            .cities
            .iter_ordered()
            .find(|(id, c)| *id != city && c.claims_tile_index(index))
            .map(|(id, _)| id);
        if let Some(prev) = previous_city {
            if let Some(prev_city) = self.cities.get_mut(prev) {
                prev_city.release_tile_index(index);
                prev_city.recompute_production(&self.map);
            }
        }

        if let Some(tile) = self.map.tile_at_index_mut(index) {
            tile.owner = Some(owner);
            tile.clear_occupation();
        }
        if let Some(c) = self.cities.get_mut(city) {
            c.claim_tile_index(index);
            c.recompute_production(&self.map);
        }
        Some(previous_owner)
    }

    /// Recompute which tiles `player` currently sees.
    pub fn refresh_visibility(&mut self, player: PlayerId) {
        self.map.clear_visibility(player);
        let mut sources: Vec<(Pos, i32)> = self
            .units_of(player)
            .map(|(_, u)| (u.pos, UNIT_VISION_RADIUS))
            .collect();
        sources.extend(
            self.cities_of(player)
                .map(|(_, c)| (c.pos, CITY_VISION_RADIUS)),
        );
        for (pos, radius) in sources {
            self.map.reveal(pos, radius, player);
        }
    }

    /// Consistency checks over tiles, units and cities. Returns one message
    /// per violation; empty when the board is consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen_units = Vec::new();
        for (pos, tile) in self.map.iter() {
            if let Some(id) = tile.unit {
                match self.units.get(id) {
                    Some(u) if u.pos == pos => {}
                    Some(u) => out.push(format!("tile {pos} references unit at {}", u.pos)),
                    None => out.push(format!("tile {pos} references a missing unit")),
                }
                if seen_units.contains(&id) {
                    out.push(format!("unit {id:?} referenced by two tiles"));
                }
                seen_units.push(id);
            }
            if let Some(owner) = tile.owner {
                let index = self.map.index_of(pos).unwrap_or(usize::MAX);
                let held = self
                    .cities_of(owner)
                    .any(|(_, c)| c.claims_tile_index(index));
                if !held {
                    out.push(format!("tile {pos} owned by {owner:?} without a claiming city"));
                }
            }
        }
        for (id, unit) in self.units.iter_ordered() {
            if self.map.get(unit.pos).and_then(|t| t.unit) != Some(id) {
                out.push(format!("unit {id:?} not referenced by its tile {}", unit.pos));
            }
        }
        for (id, city) in self.cities.iter_ordered() {
            if city.population < 1 {
                out.push(format!("city {} has population 0", city.name));
            }
            let home = self.map.index_of(city.pos).unwrap_or(usize::MAX);
            if !city.claims_tile_index(home) {
                out.push(format!("city {} lost its founding tile", city.name));
            }
            if self.map.get(city.pos).and_then(|t| t.city) != Some(id) {
                out.push(format!("city {} not referenced by its tile", city.name));
            }
        }
        out
    }
}

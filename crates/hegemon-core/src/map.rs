use serde::{Deserialize, Serialize};

use hegemon_protocol::{CityId, PlayerId, Pos, StrategicResource, Terrain, UnitId};

use crate::{
    rules::{terrain, RIVER_FOOD_BONUS, STRATEGIC_PRODUCTION_BONUS},
    yields::Yields,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    #[serde(default)]
    pub river: bool,
    #[serde(default)]
    pub strategic: Option<StrategicResource>,
    pub owner: Option<PlayerId>,
    pub city: Option<CityId>,
    pub unit: Option<UnitId>,
    /// Capture progress accrued by the player in `occupier`.
    #[serde(default)]
    pub occupation_progress: i32,
    #[serde(default)]
    pub occupier: Option<PlayerId>,
    /// Per-player bit flags, see `PlayerId::bit`.
    #[serde(default)]
    pub explored: u32,
    #[serde(default)]
    pub visible: u32,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            river: false,
            strategic: None,
            owner: None,
            city: None,
            unit: None,
            occupation_progress: 0,
            occupier: None,
            explored: 0,
            visible: 0,
        }
    }

    pub fn with_river(mut self) -> Self {
        self.river = true;
        self
    }

    pub fn with_strategic(mut self, resource: StrategicResource) -> Self {
        self.strategic = Some(resource);
        self
    }

    /// Yield the tile contributes to a city that owns it.
    pub fn yields(&self) -> Yields {
        let mut out = terrain(self.terrain).yields;
        if self.river {
            out.food += RIVER_FOOD_BONUS;
        }
        if self.strategic.is_some() {
            out.production += STRATEGIC_PRODUCTION_BONUS;
        }
        out
    }

    /// Settlement and expansion score: food + 2 x production + 3 x river + 5 x strategic.
    pub fn settle_score(&self) -> i32 {
        let y = self.yields();
        y.food
            + 2 * y.production
            + if self.river { 3 } else { 0 }
            + if self.strategic.is_some() { 5 } else { 0 }
    }

    #[inline]
    pub fn is_explored_by(&self, player: PlayerId) -> bool {
        self.explored & player.bit() != 0
    }

    #[inline]
    pub fn is_visible_to(&self, player: PlayerId) -> bool {
        self.visible & player.bit() != 0
    }

    pub fn clear_occupation(&mut self) {
        self.occupation_progress = 0;
        self.occupier = None;
    }
}

/// Rectangular, non-wrapping tile grid stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl GameMap {
    pub fn new(width: u32, height: u32, default_terrain: Terrain) -> Self {
        let tiles = vec![Tile::new(default_terrain); (width as usize) * (height as usize)];
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Build a map from generated tiles. Returns `None` if the tile count does
    /// not match the dimensions.
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Option<Self> {
        if tiles.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    pub fn index_of(&self, pos: Pos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some((pos.y as usize) * (self.width as usize) + (pos.x as usize))
    }

    pub fn pos_at(&self, index: usize) -> Option<Pos> {
        if index >= self.tiles.len() {
            return None;
        }
        let x = (index % self.width as usize) as i32;
        let y = (index / self.width as usize) as i32;
        Some(Pos::new(x, y))
    }

    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        self.index_of(pos).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        self.index_of(pos).map(move |i| &mut self.tiles[i])
    }

    pub fn tile_at_index(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn tile_at_index_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    /// In-bounds 4-neighbors in N, E, S, W order.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        pos.neighbors().filter(move |p| self.contains(*p))
    }

    /// In-bounds positions of the square window around `center`, row-major.
    pub fn window(&self, center: Pos, radius: i32) -> impl Iterator<Item = Pos> + '_ {
        center.window(radius).filter(move |p| self.contains(*p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Tile)> {
        let width = self.width as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (Pos::new((i % width) as i32, (i / width) as i32), t))
    }

    /// Mark every in-bounds tile in the window as explored and visible.
    pub fn reveal(&mut self, center: Pos, radius: i32, player: PlayerId) -> usize {
        let bit = player.bit();
        let mut newly_explored = 0;
        for pos in center.window(radius) {
            if let Some(tile) = self.get_mut(pos) {
                if tile.explored & bit == 0 {
                    newly_explored += 1;
                }
                tile.explored |= bit;
                tile.visible |= bit;
            }
        }
        newly_explored
    }

    pub fn clear_visibility(&mut self, player: PlayerId) {
        let mask = !player.bit();
        for tile in &mut self.tiles {
            tile.visible &= mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_and_rejects_out_of_bounds() {
        let map = GameMap::new(5, 4, Terrain::Plains);
        let pos = Pos::new(3, 2);
        let index = map.index_of(pos).unwrap();
        assert_eq!(index, 13);
        assert_eq!(map.pos_at(index), Some(pos));
        assert_eq!(map.index_of(Pos::new(5, 0)), None);
        assert_eq!(map.index_of(Pos::new(0, -1)), None);
    }

    #[test]
    fn corner_has_two_neighbors() {
        let map = GameMap::new(3, 3, Terrain::Plains);
        assert_eq!(map.neighbors(Pos::new(0, 0)).count(), 2);
        assert_eq!(map.neighbors(Pos::new(1, 1)).count(), 4);
    }

    #[test]
    fn tile_yields_include_river_and_strategic_bonuses() {
        let tile = Tile::new(Terrain::Plains)
            .with_river()
            .with_strategic(StrategicResource::Iron);
        assert_eq!(tile.yields(), Yields::new(2, 2, 0, 0, 0));
        assert_eq!(tile.settle_score(), 2 + 4 + 3 + 5);
    }

    #[test]
    fn reveal_sets_bits_for_one_player_only() {
        let mut map = GameMap::new(6, 6, Terrain::Grassland);
        let newly = map.reveal(Pos::new(0, 0), 2, PlayerId(1));
        assert_eq!(newly, 9);
        let tile = map.get(Pos::new(2, 2)).unwrap();
        assert!(tile.is_explored_by(PlayerId(1)));
        assert!(!tile.is_explored_by(PlayerId(0)));

        map.clear_visibility(PlayerId(1));
        let tile = map.get(Pos::new(2, 2)).unwrap();
        assert!(tile.is_explored_by(PlayerId(1)));
        assert!(!tile.is_visible_to(PlayerId(1)));
    }
}

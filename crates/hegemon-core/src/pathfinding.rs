//! A* pathfinding and movement-range search over the 4-connected grid.
//!
//! Costs are in half-points (`MOVE_SCALE`). The cheapest passable step costs
//! two half-points, so `2 x Manhattan` is an admissible heuristic.

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use hegemon_protocol::{PlayerId, Pos, Stance};

use crate::{
    diplomacy::DiplomacyLedger,
    entities::EntityStore,
    map::GameMap,
    rules::{terrain, MOVE_SCALE, RIVER_MOVE_PENALTY},
    state::WorldState,
    unit::Unit,
};

/// Lowest cost of any passable step.
pub const MIN_STEP_COST: i32 = MOVE_SCALE;

#[derive(Debug)]
struct OpenNode {
    f: i32,
    g: i32,
    index: usize,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (i32, i32, usize, u64) {
        (self.f, self.g, self.index, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Movement rules for one unit against the current board.
pub struct MoveRules<'a> {
    map: &'a GameMap,
    units: &'a EntityStore<Unit>,
    diplomacy: Option<&'a DiplomacyLedger>,
    owner: PlayerId,
    naval: bool,
}

impl<'a> MoveRules<'a> {
    /// Rules against a bare board: every other player's units block.
    pub fn for_unit(map: &'a GameMap, units: &'a EntityStore<Unit>, unit: &Unit) -> Self {
        Self {
            map,
            units,
            diplomacy: None,
            owner: unit.owner,
            naval: unit.is_naval(),
        }
    }

    /// Rules against the live world: allied and friendly units can be passed.
    pub fn in_world(state: &'a WorldState, unit: &Unit) -> Self {
        Self {
            diplomacy: Some(&state.diplomacy),
            ..Self::for_unit(&state.map, &state.units, unit)
        }
    }

    fn may_pass(&self, other: PlayerId) -> bool {
        other == self.owner
            || self.diplomacy.is_some_and(|d| {
                matches!(d.stance(self.owner, other), Stance::Allied | Stance::Friendly)
            })
    }

    /// Terrain cost to enter `pos`, ignoring occupancy.
    pub fn terrain_cost(&self, pos: Pos) -> Option<i32> {
        let tile = self.map.get(pos)?;
        let def = terrain(tile.terrain);
        if self.naval {
            return def.naval_passable.then_some(MIN_STEP_COST);
        }
        let base = def.land_move_cost?;
        Some(if tile.river {
            base + RIVER_MOVE_PENALTY
        } else {
            base
        })
    }

    /// Cost to step into `pos`, or `None` when impassable. Foreign cities
    /// block, as do units of anyone not allied or friendly with the mover.
    pub fn step_cost(&self, pos: Pos) -> Option<i32> {
        let cost = self.terrain_cost(pos)?;
        let tile = self.map.get(pos)?;
        if let Some(unit_id) = tile.unit {
            match self.units.get(unit_id) {
                Some(other) if !self.may_pass(other.owner) => return None,
                _ => {}
            }
        }
        if tile.city.is_some() && tile.owner.is_some_and(|o| o != self.owner) {
            return None;
        }
        Some(cost)
    }

    /// Whether a move may end on `pos` (no other unit there).
    pub fn can_stop(&self, pos: Pos) -> bool {
        self.map.get(pos).is_some_and(|t| t.unit.is_none())
    }

    pub fn find_path(&self, start: Pos, goal: Pos) -> Vec<Pos> {
        if !self.can_stop(goal) {
            return Vec::new();
        }
        find_path_with(self.map, start, goal, |p| self.step_cost(p))
    }

    /// Path that ends beside `goal` when the goal tile itself cannot be
    /// entered (an occupied tile or a foreign city).
    pub fn path_toward(&self, start: Pos, goal: Pos) -> Vec<Pos> {
        if self.can_stop(goal) && self.step_cost(goal).is_some() {
            return self.find_path(start, goal);
        }
        let mut path = find_path_with(self.map, start, goal, |p| {
            if p == goal {
                Some(self.terrain_cost(p).unwrap_or(MIN_STEP_COST))
            } else {
                self.step_cost(p)
            }
        });
        path.pop();
        path
    }

    pub fn reachable(&self, start: Pos, budget: i32) -> Vec<Pos> {
        reachable_with(
            self.map,
            start,
            budget,
            |p| self.step_cost(p),
            |p| self.can_stop(p),
        )
    }

    /// Cheapest route to `goal` that fits in `budget`, with its cost. Uses
    /// the same search as [`MoveRules::reachable`], so every tile listed
    /// there has a route here.
    pub fn route_within(&self, start: Pos, goal: Pos, budget: i32) -> Option<(Vec<Pos>, i32)> {
        if !self.can_stop(goal) {
            return None;
        }
        let field = MoveField::search(self.map, start, budget, |p| self.step_cost(p))?;
        let goal_idx = self.map.index_of(goal)?;
        let cost = field.spent[goal_idx];
        if cost == i32::MAX || goal_idx == field.start {
            return None;
        }
        Some((reconstruct_path(self.map, &field.came_from, goal_idx), cost))
    }
}

fn reconstruct_path(map: &GameMap, came_from: &[Option<usize>], mut current: usize) -> Vec<Pos> {
    let mut out = Vec::new();
    while let Some(prev) = came_from[current] {
        if let Some(pos) = map.pos_at(current) {
            out.push(pos);
        }
        current = prev;
    }
    out.reverse();
    out
}

/// A* from `start` to `goal` with a caller-supplied step cost. Returns the
/// tiles to walk excluding `start`, or an empty path when unreachable.
pub fn find_path_with(
    map: &GameMap,
    start: Pos,
    goal: Pos,
    step_cost: impl Fn(Pos) -> Option<i32>,
) -> Vec<Pos> {
    let (Some(start_idx), Some(goal_idx)) = (map.index_of(start), map.index_of(goal)) else {
        return Vec::new();
    };
    if start_idx == goal_idx {
        return Vec::new();
    }

    let mut open = BinaryHeap::<OpenNode>::new();
    let mut tie: u64 = 0;
    let mut g_score = vec![i32::MAX; map.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; map.len()];

    g_score[start_idx] = 0;
    open.push(OpenNode {
        f: start.manhattan(goal) * MIN_STEP_COST,
        g: 0,
        index: start_idx,
        tie,
    });
    tie += 1;

    while let Some(node) = open.pop() {
        if node.index == goal_idx {
            return reconstruct_path(map, &came_from, goal_idx);
        }
        if node.g != g_score[node.index] {
            // Stale heap entry.
            continue;
        }
        let Some(pos) = map.pos_at(node.index) else {
            continue;
        };

        for n in map.neighbors(pos) {
            let Some(n_idx) = map.index_of(n) else {
                continue;
            };
            let Some(cost) = step_cost(n) else {
                continue;
            };
            let tentative_g = node.g.saturating_add(cost.max(1));
            if tentative_g >= g_score[n_idx] {
                continue;
            }
            came_from[n_idx] = Some(node.index);
            g_score[n_idx] = tentative_g;
            open.push(OpenNode {
                f: tentative_g.saturating_add(n.manhattan(goal) * MIN_STEP_COST),
                g: tentative_g,
                index: n_idx,
                tie,
            });
            tie += 1;
        }
    }

    Vec::new()
}

/// Movement costs from one start tile, limited by a budget.
struct MoveField {
    start: usize,
    spent: Vec<i32>,
    came_from: Vec<Option<usize>>,
}

impl MoveField {
    /// Dijkstra out of `start`. A step is allowed while any budget remains,
    /// so the last step may cost more than what is left.
    fn search(
        map: &GameMap,
        start: Pos,
        budget: i32,
        step_cost: impl Fn(Pos) -> Option<i32>,
    ) -> Option<Self> {
        let start_idx = map.index_of(start)?;
        let mut spent = vec![i32::MAX; map.len()];
        let mut came_from: Vec<Option<usize>> = vec![None; map.len()];
        spent[start_idx] = 0;

        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;
        open.push(OpenNode {
            f: 0,
            g: 0,
            index: start_idx,
            tie,
        });

        while let Some(node) = open.pop() {
            if node.g != spent[node.index] || node.g >= budget {
                continue;
            }
            let Some(pos) = map.pos_at(node.index) else {
                continue;
            };
            for n in map.neighbors(pos) {
                let Some(n_idx) = map.index_of(n) else {
                    continue;
                };
                let Some(cost) = step_cost(n) else {
                    continue;
                };
                let next = node.g.saturating_add(cost.max(1));
                if next >= spent[n_idx] {
                    continue;
                }
                spent[n_idx] = next;
                came_from[n_idx] = Some(node.index);
                tie += 1;
                open.push(OpenNode {
                    f: next,
                    g: next,
                    index: n_idx,
                    tie,
                });
            }
        }

        Some(Self {
            start: start_idx,
            spent,
            came_from,
        })
    }
}

/// Every tile a unit at `start` can end its move on with `budget`
/// half-points left. Sorted row-major; `start` excluded.
pub fn reachable_with(
    map: &GameMap,
    start: Pos,
    budget: i32,
    step_cost: impl Fn(Pos) -> Option<i32>,
    can_stop: impl Fn(Pos) -> bool,
) -> Vec<Pos> {
    let Some(field) = MoveField::search(map, start, budget, step_cost) else {
        return Vec::new();
    };
    field
        .spent
        .iter()
        .enumerate()
        .filter(|&(i, &s)| i != field.start && s != i32::MAX)
        .filter_map(|(i, _)| map.pos_at(i))
        .filter(|p| can_stop(*p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{city::City, player::Player};
    use hegemon_protocol::{Civilization, Terrain, UnitKind};

    fn two_player_world(width: u32, height: u32) -> WorldState {
        let players = vec![
            Player::new(PlayerId(0), "A", Civilization::Rome, false),
            Player::new(PlayerId(1), "B", Civilization::Egypt, false),
        ];
        WorldState::new(GameMap::new(width, height, Terrain::Plains), players, 5, 10)
    }

    fn plain_cost(map: &GameMap) -> impl Fn(Pos) -> Option<i32> + '_ {
        move |p| map.get(p).and(Some(MIN_STEP_COST))
    }

    #[test]
    fn open_grid_path_length_is_manhattan() {
        let map = GameMap::new(12, 9, Terrain::Plains);
        let a = Pos::new(1, 2);
        let b = Pos::new(10, 7);
        let path = find_path_with(&map, a, b, plain_cost(&map));
        assert_eq!(path.len() as i32, a.manhattan(b));
        assert_eq!(path.last(), Some(&b));
        assert!(!path.contains(&a));
    }

    #[test]
    fn path_routes_around_impassable_tiles() {
        let mut map = GameMap::new(5, 5, Terrain::Plains);
        for y in 0..4 {
            map.get_mut(Pos::new(2, y)).unwrap().terrain = Terrain::Mountains;
        }
        let units = EntityStore::new();
        let warrior = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(0, 0));
        let rules = MoveRules::for_unit(&map, &units, &warrior);
        let path = rules.find_path(Pos::new(0, 0), Pos::new(4, 0));
        assert_eq!(path.len(), 12);
        assert!(path.contains(&Pos::new(2, 4)));
    }

    #[test]
    fn unreachable_goal_yields_empty_path() {
        let mut map = GameMap::new(5, 5, Terrain::Plains);
        for y in 0..5 {
            map.get_mut(Pos::new(2, y)).unwrap().terrain = Terrain::Ocean;
        }
        let units = EntityStore::new();
        let warrior = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(0, 0));
        let rules = MoveRules::for_unit(&map, &units, &warrior);
        assert!(rules.find_path(Pos::new(0, 0), Pos::new(4, 4)).is_empty());
    }

    #[test]
    fn path_prefers_cheaper_terrain() {
        // Through the forest costs 4 + 2 + 2; around it over plains 2 + 2 + 2.
        let mut map = GameMap::new(3, 2, Terrain::Plains);
        map.get_mut(Pos::new(1, 0)).unwrap().terrain = Terrain::Forest;
        let units = EntityStore::new();
        let warrior = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(0, 0));
        let rules = MoveRules::for_unit(&map, &units, &warrior);
        let path = rules.find_path(Pos::new(0, 0), Pos::new(2, 1));
        assert_eq!(path, vec![Pos::new(0, 1), Pos::new(1, 1), Pos::new(2, 1)]);
    }

    #[test]
    fn enemy_units_block_but_friends_do_not() {
        let map_base = GameMap::new(3, 1, Terrain::Plains);
        let mut units = EntityStore::new();
        let mut map = map_base.clone();
        let friend = units.insert(Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(1, 0)));
        map.get_mut(Pos::new(1, 0)).unwrap().unit = Some(friend);
        let mover = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(0, 0));
        let rules = MoveRules::for_unit(&map, &units, &mover);
        assert_eq!(rules.find_path(Pos::new(0, 0), Pos::new(2, 0)).len(), 2);
        assert!(rules.find_path(Pos::new(0, 0), Pos::new(1, 0)).is_empty());

        let mut units = EntityStore::new();
        let mut map = map_base;
        let enemy = units.insert(Unit::new(UnitKind::Warrior, PlayerId(1), Pos::new(1, 0)));
        map.get_mut(Pos::new(1, 0)).unwrap().unit = Some(enemy);
        let rules = MoveRules::for_unit(&map, &units, &mover);
        assert!(rules.find_path(Pos::new(0, 0), Pos::new(2, 0)).is_empty());
    }

    #[test]
    fn reachable_respects_budget_and_river_penalty() {
        let mut map = GameMap::new(7, 1, Terrain::Plains);
        map.get_mut(Pos::new(4, 0)).unwrap().river = true;
        let units = EntityStore::new();
        let warrior = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(3, 0));
        let rules = MoveRules::for_unit(&map, &units, &warrior);
        // Budget 4: west 2 tiles (2 + 2); east river tile costs 3, then one more.
        let tiles = rules.reachable(Pos::new(3, 0), 4);
        assert_eq!(
            tiles,
            vec![Pos::new(1, 0), Pos::new(2, 0), Pos::new(4, 0), Pos::new(5, 0)]
        );
    }

    #[test]
    fn naval_units_stay_on_water() {
        let mut map = GameMap::new(4, 1, Terrain::Ocean);
        map.get_mut(Pos::new(3, 0)).unwrap().terrain = Terrain::Plains;
        let units = EntityStore::new();
        let galley = Unit::new(UnitKind::Galley, PlayerId(0), Pos::new(0, 0));
        let rules = MoveRules::for_unit(&map, &units, &galley);
        assert_eq!(rules.reachable(Pos::new(0, 0), 6), vec![Pos::new(1, 0), Pos::new(2, 0)]);
    }

    #[test]
    fn allied_units_can_be_passed_in_the_live_world() {
        let mut state = two_player_world(3, 1);
        state.place_unit(Unit::new(UnitKind::Warrior, PlayerId(1), Pos::new(1, 0)));
        let mover = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(0, 0));
        let (start, goal) = (Pos::new(0, 0), Pos::new(2, 0));
        assert!(MoveRules::in_world(&state, &mover).find_path(start, goal).is_empty());

        state.diplomacy.form_alliance(PlayerId(0), PlayerId(1)).unwrap();
        assert_eq!(MoveRules::in_world(&state, &mover).find_path(start, goal).len(), 2);
        // The bare-board rules know nothing of the alliance.
        let bare = MoveRules::for_unit(&state.map, &state.units, &mover);
        assert!(bare.find_path(start, goal).is_empty());
    }

    #[test]
    fn path_toward_stops_beside_an_occupied_goal() {
        let mut state = two_player_world(8, 8);
        let enemy = Pos::new(2, 6);
        state.place_unit(Unit::new(UnitKind::Warrior, PlayerId(1), enemy));
        let mover = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(2, 2));
        let rules = MoveRules::in_world(&state, &mover);
        assert!(rules.find_path(mover.pos, enemy).is_empty());
        let path = rules.path_toward(mover.pos, enemy);
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some(&Pos::new(2, 5)));
    }

    #[test]
    fn path_toward_stops_beside_a_foreign_city() {
        let mut state = two_player_world(8, 8);
        let site = Pos::new(6, 2);
        let city = state.cities.insert(City::new("Thebes".into(), site, PlayerId(1), 0));
        state.map.get_mut(site).unwrap().city = Some(city);
        let home = state.map.index_of(site).unwrap();
        state.assign_tile(home, city);

        let mover = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(2, 2));
        let rules = MoveRules::in_world(&state, &mover);
        assert!(rules.find_path(mover.pos, site).is_empty());
        let path = rules.path_toward(mover.pos, site);
        assert_eq!(path.last(), Some(&Pos::new(5, 2)));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn every_reachable_tile_has_a_route_within_budget() {
        let mut map = GameMap::new(6, 6, Terrain::Plains);
        map.get_mut(Pos::new(2, 1)).unwrap().terrain = Terrain::Hills;
        map.get_mut(Pos::new(1, 2)).unwrap().river = true;
        map.get_mut(Pos::new(3, 3)).unwrap().terrain = Terrain::Desert;
        let units = EntityStore::new();
        let warrior = Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(1, 1));
        let rules = MoveRules::for_unit(&map, &units, &warrior);
        let budget = 5;
        for tile in rules.reachable(warrior.pos, budget) {
            let (path, cost) = rules.route_within(warrior.pos, tile, budget).unwrap();
            assert_eq!(path.last(), Some(&tile));
            // Every step but the last starts with budget to spare.
            let mut spent = 0;
            for step in &path {
                assert!(spent < budget, "{tile} needs a step with nothing left");
                spent += rules.step_cost(*step).unwrap();
            }
            assert_eq!(spent, cost);
        }
        assert!(rules.route_within(warrior.pos, Pos::new(5, 5), budget).is_none());
    }
}

//! Heuristic opponent. Runs synchronously inside the engine when an AI seat
//! becomes active and acts only through the same checked requests a human
//! player uses. Rejected requests are logged and skipped.

use tracing::debug;

use hegemon_protocol::{CityId, Event, PlayerId, Pos, Project, Stance, Tech, TechBranch, UnitId, UnitKind};

use crate::{
    game::{DiplomaticAction, GameEngine, GameError},
    pathfinding::MoveRules,
    player::Player,
    rules::{all_techs, building, tech, unit, unlock_count, BUILDINGS},
    state::WorldState,
};

/// Settlers never pick a site this close to an existing city.
pub const SETTLE_CITY_CLEARANCE: i32 = 5;
pub const SETTLE_SEARCH_RADIUS: i32 = 10;
pub const THREAT_SEARCH_RADIUS: i32 = 5;
pub const EXPLORE_SEARCH_RADIUS: i32 = 8;
/// Recruit while units per city stay below this ratio.
pub const UNITS_PER_CITY_TARGET: f64 = 2.5;
pub const RECRUIT_PRODUCTION_FLOOR: i32 = 20;
/// Keep founding cities until the empire has this many.
pub const SETTLER_CITY_TARGET: usize = 3;

const MILITARY_PREFERENCE: [UnitKind; 3] = [UnitKind::Cavalry, UnitKind::Archer, UnitKind::Warrior];

fn branch_weight(branch: TechBranch) -> i32 {
    match branch {
        TechBranch::Economy => 5,
        TechBranch::Military => 4,
        TechBranch::Infrastructure => 3,
        TechBranch::Science | TechBranch::Culture => 2,
        TechBranch::Naval => 1,
    }
}

/// Research priority: branch preference dominates, cheaper and more
/// enabling techs break ties.
pub fn score_tech(t: Tech) -> i32 {
    let def = tech(t);
    branch_weight(def.branch) * 10 + 1000 / def.cost.max(1) + 2 * unlock_count(t) as i32
}

/// Highest-scoring tech `player` may start now. Ties keep catalogue order.
pub fn choose_research(player: &Player) -> Option<Tech> {
    let mut best: Option<(i32, Tech)> = None;
    for t in all_techs().filter(|t| player.can_research(*t)) {
        let score = score_tech(t);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, t));
        }
    }
    best.map(|(_, t)| t)
}

/// Whether a settler should found a city on `pos`.
pub fn is_good_city_site(state: &WorldState, pos: Pos) -> bool {
    let Some(tile) = state.map.get(pos) else {
        return false;
    };
    if !tile.terrain.is_settleable() || tile.city.is_some() {
        return false;
    }
    let y = tile.yields();
    let worthwhile = y.food >= 2 || y.production >= 2 || tile.strategic.is_some() || tile.river;
    let clear = state
        .distance_to_nearest_city(pos)
        .map_or(true, |d| d > SETTLE_CITY_CLEARANCE);
    worthwhile && clear
}

/// Best qualifying site around `center`, by settle score then distance.
pub fn best_city_site(state: &WorldState, center: Pos, radius: i32) -> Option<Pos> {
    state
        .map
        .window(center, radius)
        .filter(|p| is_good_city_site(state, *p))
        .filter_map(|p| state.map.get(p).map(|t| (t.settle_score(), -p.manhattan(center), p)))
        .max_by_key(|(score, near, _)| (*score, *near))
        .map(|(_, _, p)| p)
}

/// Exploration value of a tile for `player`.
fn explore_score(state: &WorldState, player: PlayerId, pos: Pos) -> i32 {
    let Some(tile) = state.map.get(pos) else {
        return 0;
    };
    let mut score = 0;
    if !tile.is_explored_by(player) {
        score += 3;
    }
    if tile.owner.is_none() {
        score += 1;
    }
    if tile.strategic.is_some() {
        score += 2;
    }
    score
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Unit(UnitId, Pos),
    City(CityId, Pos),
}

impl Target {
    fn pos(self) -> Pos {
        match self {
            Target::Unit(_, p) | Target::City(_, p) => p,
        }
    }
}

impl GameEngine {
    /// Play the current AI seat's turn: settle, research, recruit, build,
    /// then move and fight.
    pub(crate) fn run_ai_for_current_player(&mut self) -> Vec<Event> {
        let player = self.state.current_player;
        let mut events = Vec::new();
        self.ai_settle(player, &mut events);
        self.ai_research(player, &mut events);
        self.ai_recruit(player, &mut events);
        self.ai_build(player, &mut events);
        self.ai_move_and_fight(player, &mut events);
        debug!(?player, events = events.len(), "ai turn finished");
        events
    }

    fn ai_try(&self, events: &mut Vec<Event>, result: Result<Vec<Event>, GameError>) -> bool {
        match result {
            Ok(produced) => {
                events.extend(produced);
                true
            }
            Err(err) => {
                debug!(player = ?self.state.current_player, %err, "ai request rejected");
                false
            }
        }
    }

    fn ai_units(&self, player: PlayerId, settlers: bool) -> Vec<UnitId> {
        self.state
            .units_of(player)
            .filter(|(_, u)| u.is_settler() == settlers && u.can_act())
            .map(|(id, _)| id)
            .collect()
    }

    /// Move one step along the path to `goal`, landing on the first tile
    /// where the unit may stop. Occupied goals and foreign cities are
    /// approached from beside.
    fn ai_step_toward(&mut self, unit_id: UnitId, goal: Pos, events: &mut Vec<Event>) -> bool {
        let Some(unit) = self.state.units.get(unit_id) else {
            return false;
        };
        let step = {
            let rules = MoveRules::in_world(&self.state, unit);
            let path = rules.path_toward(unit.pos, goal);
            path.into_iter().find(|p| rules.can_stop(*p))
        };
        let Some(step) = step else {
            return false;
        };
        let result = self.try_move_unit(unit_id, step);
        self.ai_try(events, result)
    }

    fn ai_settle(&mut self, player: PlayerId, events: &mut Vec<Event>) {
        for settler in self.ai_units(player, true) {
            let Some(pos) = self.state.units.get(settler).map(|u| u.pos) else {
                continue;
            };
            if is_good_city_site(&self.state, pos) {
                let result = self.try_found_city(settler);
                if self.ai_try(events, result) {
                    debug!(?player, %pos, "ai founded city");
                    continue;
                }
            }
            match best_city_site(&self.state, pos, SETTLE_SEARCH_RADIUS) {
                Some(site) if site != pos => {
                    debug!(?player, from = %pos, %site, "ai settler heading to site");
                    self.ai_step_toward(settler, site, events);
                }
                _ => {
                    // Nowhere better in reach: settle where it stands if the rules allow.
                    if self.state.city_count(player) == 0 {
                        let result = self.try_found_city(settler);
                        self.ai_try(events, result);
                    }
                }
            }
        }
    }

    fn ai_research(&mut self, player: PlayerId, events: &mut Vec<Event>) {
        let Some(p) = self.state.player(player) else {
            return;
        };
        if p.research.is_some() {
            return;
        }
        if let Some(t) = choose_research(p) {
            debug!(?player, tech = ?t, score = score_tech(t), "ai picked research");
            let result = self.try_start_research(t);
            self.ai_try(events, result);
        }
    }

    fn ai_recruit(&mut self, player: PlayerId, events: &mut Vec<Event>) {
        let cities = self.state.city_count(player);
        if cities == 0 {
            return;
        }
        let units = self.state.units_of(player).count();
        if units as f64 / cities as f64 >= UNITS_PER_CITY_TARGET {
            return;
        }
        let Some(p) = self.state.player(player) else {
            return;
        };
        if p.pool.production < RECRUIT_PRODUCTION_FLOOR {
            return;
        }
        let mut order = Vec::with_capacity(4);
        if cities < SETTLER_CITY_TARGET {
            order.push(UnitKind::Settler);
        }
        order.extend(MILITARY_PREFERENCE);
        let candidates: Vec<UnitKind> = order
            .into_iter()
            .filter(|kind| {
                let def = unit(*kind);
                p.pool.production >= def.production_cost
                    && p.pool.gold >= def.gold_cost
                    && p.has_tech_opt(def.tech)
            })
            .collect();
        let Some(city) = self
            .state
            .cities_of(player)
            .max_by_key(|(_, c)| c.population)
            .map(|(id, _)| id)
        else {
            return;
        };

        for kind in candidates {
            let result = self.try_recruit_unit(city, kind);
            if self.ai_try(events, result) {
                debug!(?player, ?kind, "ai recruited");
                return;
            }
        }
    }

    /// Idle cities start the first building their owner can put up.
    fn ai_build(&mut self, player: PlayerId, events: &mut Vec<Event>) {
        let idle: Vec<CityId> = self
            .state
            .cities_of(player)
            .filter(|(_, c)| c.construction.is_none())
            .map(|(id, _)| id)
            .collect();
        for city_id in idle {
            let choice = {
                let (Some(p), Some(city)) = (self.state.player(player), self.state.cities.get(city_id)) else {
                    continue;
                };
                BUILDINGS
                    .iter()
                    .find(|b| p.has_tech_opt(b.tech) && !city.has_building(b.kind))
                    .map(|b| b.kind)
            };
            if let Some(kind) = choice {
                debug!(?player, building = building(kind).name, "ai queued building");
                let result = self.try_start_construction(city_id, Project::Building(kind));
                self.ai_try(events, result);
            }
        }
    }

    /// Nearest hostile unit or city within the threat radius. Allies and
    /// friends are left alone.
    fn ai_find_target(&self, player: PlayerId, from: Pos) -> Option<Target> {
        let hostile = |other: PlayerId| {
            other != player
                && !matches!(
                    self.state.diplomacy.stance(player, other),
                    Stance::Allied | Stance::Friendly
                )
        };
        let mut best: Option<(i32, Target)> = None;
        for pos in self.state.map.window(from, THREAT_SEARCH_RADIUS) {
            if pos == from {
                continue;
            }
            let Some(tile) = self.state.map.get(pos) else {
                continue;
            };
            let target = if let Some((id, u)) = tile.unit.and_then(|id| self.state.units.get(id).map(|u| (id, u))) {
                hostile(u.owner).then_some(Target::Unit(id, pos))
            } else if let Some((id, c)) = tile.city.and_then(|id| self.state.cities.get(id).map(|c| (id, c))) {
                hostile(c.owner).then_some(Target::City(id, pos))
            } else {
                None
            };
            let Some(target) = target else {
                continue;
            };
            let distance = from.manhattan(pos);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, target));
            }
        }
        best.map(|(_, t)| t)
    }

    fn ai_explore_goal(&self, player: PlayerId, from: Pos) -> Option<Pos> {
        self.state
            .map
            .window(from, EXPLORE_SEARCH_RADIUS)
            .filter(|p| *p != from)
            .filter(|p| self.state.map.get(*p).is_some_and(|t| t.terrain.is_settleable() && t.unit.is_none()))
            .map(|p| (explore_score(&self.state, player, p), -p.manhattan(from), p))
            .filter(|(score, _, _)| *score > 0)
            .max_by_key(|(score, near, _)| (*score, *near))
            .map(|(_, _, p)| p)
    }

    fn ai_explore(&mut self, player: PlayerId, unit_id: UnitId, from: Pos, events: &mut Vec<Event>) {
        if let Some(goal) = self.ai_explore_goal(player, from) {
            self.ai_step_toward(unit_id, goal, events);
        }
    }

    fn ai_move_and_fight(&mut self, player: PlayerId, events: &mut Vec<Event>) {
        for unit_id in self.ai_units(player, false) {
            if self.state.outcome.is_some() {
                return;
            }
            let Some(unit) = self.state.units.get(unit_id) else {
                continue;
            };
            if !unit.is_military() {
                let pos = unit.pos;
                self.ai_explore(player, unit_id, pos, events);
                continue;
            }
            let (pos, range) = (unit.pos, unit.class().attack_range());

            match self.ai_find_target(player, pos) {
                Some(Target::Unit(target, at)) if pos.manhattan(at) <= range => {
                    debug!(?player, attacker = ?unit_id, defender = ?target, "ai attacking");
                    let result = self.try_attack(unit_id, target);
                    self.ai_try(events, result);
                }
                Some(Target::City(city, at)) if pos.manhattan(at) == 1 => {
                    let owner = self.state.cities.get(city).map(|c| c.owner);
                    if let Some(owner) = owner {
                        if !self.state.diplomacy.is_at_war(player, owner) {
                            let result = self.try_diplomacy(owner, DiplomaticAction::DeclareWar);
                            self.ai_try(events, result);
                        }
                    }
                    let result = self.try_capture_city(unit_id, city);
                    if self.ai_try(events, result) {
                        debug!(?player, ?city, "ai captured city");
                    }
                }
                Some(target) => {
                    if !self.ai_step_toward(unit_id, target.pos(), events) {
                        self.ai_explore(player, unit_id, pos, events);
                    }
                }
                None => self.ai_explore(player, unit_id, pos, events),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EngineConfig, game::PlayerSpec, map::GameMap, mapsource::StaticMapSource, unit::Unit};
    use hegemon_protocol::{Civilization, Terrain};

    #[test]
    fn research_pick_is_the_top_scored_candidate() {
        let mut player = Player::new(PlayerId(0), "P", Civilization::Rome, true);
        let pick = choose_research(&player).unwrap();
        assert!(player.can_research(pick));
        for t in all_techs().filter(|t| player.can_research(*t)) {
            assert!(score_tech(t) <= score_tech(pick), "{t:?} outscores {pick:?}");
        }
        player.techs.extend(all_techs());
        assert_eq!(choose_research(&player), None);
    }

    #[test]
    fn branch_weight_orders_equal_cost_techs() {
        assert!(branch_weight(TechBranch::Economy) > branch_weight(TechBranch::Military));
        assert!(branch_weight(TechBranch::Military) > branch_weight(TechBranch::Infrastructure));
        assert_eq!(branch_weight(TechBranch::Science), branch_weight(TechBranch::Culture));
        assert!(branch_weight(TechBranch::Culture) > branch_weight(TechBranch::Naval));
    }

    #[test]
    fn city_sites_keep_their_distance() {
        let players = vec![Player::new(PlayerId(0), "P", Civilization::Rome, true)];
        let mut state = WorldState::new(GameMap::new(20, 20, Terrain::Grassland), players, 1, 10);
        assert!(is_good_city_site(&state, Pos::new(5, 5)));
        let city = state
            .cities
            .insert(crate::city::City::new("X".into(), Pos::new(5, 5), PlayerId(0), 0));
        state.map.get_mut(Pos::new(5, 5)).unwrap().city = Some(city);
        assert!(!is_good_city_site(&state, Pos::new(5, 5)));
        assert!(!is_good_city_site(&state, Pos::new(8, 7)));
        assert!(is_good_city_site(&state, Pos::new(8, 8)));
        // Tundra yields too little on its own.
        state.map.get_mut(Pos::new(15, 15)).unwrap().terrain = Terrain::Tundra;
        assert!(!is_good_city_site(&state, Pos::new(15, 15)));
    }

    #[test]
    fn best_site_prefers_rivers() {
        let players = vec![Player::new(PlayerId(0), "P", Civilization::Rome, true)];
        let mut state = WorldState::new(GameMap::new(20, 20, Terrain::Grassland), players, 1, 10);
        state.map.get_mut(Pos::new(12, 9)).unwrap().river = true;
        assert_eq!(best_city_site(&state, Pos::new(10, 10), 10), Some(Pos::new(12, 9)));
    }

    #[test]
    fn ai_seat_founds_capital_and_researches_on_its_turn() {
        let mut source = StaticMapSource::new(GameMap::new(24, 24, Terrain::Grassland));
        let engine = GameEngine::start(
            EngineConfig {
                random_events: false,
                ..EngineConfig::default()
            },
            &mut source,
            &[
                PlayerSpec::ai("Hal", Civilization::Greece),
                PlayerSpec::human("Ada", Civilization::Rome),
            ],
        )
        .unwrap();
        let state = engine.state();
        assert_eq!(state.city_count(PlayerId(0)), 1);
        assert!(state.players[0].research.is_some());
        assert!(state.units_of(PlayerId(0)).all(|(_, u)| !u.is_settler()));
        assert!(state.invariant_violations().is_empty());
    }

    #[test]
    fn ai_attacks_adjacent_hostile_unit() {
        let mut source = StaticMapSource::new(GameMap::new(24, 24, Terrain::Grassland));
        let mut engine = GameEngine::start(
            EngineConfig {
                random_events: false,
                ..EngineConfig::default()
            },
            &mut source,
            &[
                PlayerSpec::human("Ada", Civilization::Rome),
                PlayerSpec::ai("Hal", Civilization::Rome),
            ],
        )
        .unwrap();
        let ours: Vec<UnitId> = engine.state.units_of(PlayerId(1)).map(|(id, _)| id).collect();
        for id in ours {
            engine.state.remove_unit(id);
        }
        let attacker = engine
            .state
            .place_unit(Unit::new(UnitKind::Warrior, PlayerId(1), Pos::new(20, 20)));
        let victim = engine
            .state
            .place_unit(Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(20, 21)));

        let events = engine.end_turn().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::CombatResolved { attacker: a, defender: d, .. } if *a == attacker && *d == victim
        )));
        assert!(engine.state().diplomacy.is_at_war(PlayerId(0), PlayerId(1)));
    }

    /// Human seat 0 and AI seat 1 on open grassland with every starting
    /// unit cleared away.
    fn bare_board() -> GameEngine {
        let mut source = StaticMapSource::new(GameMap::new(24, 24, Terrain::Grassland));
        let mut engine = GameEngine::start(
            EngineConfig {
                random_events: false,
                ..EngineConfig::default()
            },
            &mut source,
            &[
                PlayerSpec::human("Ada", Civilization::Rome),
                PlayerSpec::ai("Hal", Civilization::Rome),
            ],
        )
        .unwrap();
        for id in engine.state.units.ids() {
            engine.state.remove_unit(id);
        }
        engine
    }

    #[test]
    fn ai_advances_on_a_distant_enemy_unit() {
        let mut engine = bare_board();
        let enemy = Pos::new(10, 14);
        let warrior = engine
            .state
            .place_unit(Unit::new(UnitKind::Warrior, PlayerId(1), Pos::new(10, 10)));
        engine
            .state
            .place_unit(Unit::new(UnitKind::Warrior, PlayerId(0), enemy));

        engine.end_turn().unwrap();
        let pos = engine.state().units.get(warrior).unwrap().pos;
        assert_eq!(pos.manhattan(enemy), 3, "warrior ended at {pos}");
        assert!(engine.state().invariant_violations().is_empty());
    }

    #[test]
    fn ai_advances_on_an_undefended_city() {
        let mut engine = bare_board();
        let site = Pos::new(10, 14);
        let city = engine
            .state
            .cities
            .insert(crate::city::City::new("Roma".into(), site, PlayerId(0), 0));
        engine.state.map.get_mut(site).unwrap().city = Some(city);
        let home = engine.state.map.index_of(site).unwrap();
        engine.state.assign_tile(home, city);
        let warrior = engine
            .state
            .place_unit(Unit::new(UnitKind::Warrior, PlayerId(1), Pos::new(10, 10)));

        engine.end_turn().unwrap();
        let pos = engine.state().units.get(warrior).unwrap().pos;
        assert_eq!(pos.manhattan(site), 3, "warrior ended at {pos}");
        assert_eq!(engine.state().cities.get(city).unwrap().owner, PlayerId(0));
    }

    #[test]
    fn ai_settler_steps_toward_the_best_site() {
        let mut engine = bare_board();
        let start = Pos::new(10, 10);
        let site = Pos::new(13, 10);
        engine.state.map.get_mut(start).unwrap().terrain = Terrain::Tundra;
        engine.state.map.get_mut(site).unwrap().river = true;
        let settler = engine
            .state
            .place_unit(Unit::new(UnitKind::Settler, PlayerId(1), start));

        engine.end_turn().unwrap();
        assert_eq!(engine.state().city_count(PlayerId(1)), 0);
        let pos = engine.state().units.get(settler).unwrap().pos;
        assert_eq!(pos, Pos::new(11, 10));
    }
}

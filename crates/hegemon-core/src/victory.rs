//! Score and victory conditions. Everything here is a pure read of the world.

use hegemon_protocol::{PlayerId, ScoreBreakdown, VictoryKind, VictoryOutcome};

use crate::{config::EngineConfig, state::WorldState};

pub fn calculate_player_score(state: &WorldState, player: PlayerId) -> ScoreBreakdown {
    let Some(p) = state.player(player) else {
        return ScoreBreakdown::default();
    };
    let cities = state.city_count(player) as i64;
    let population: i64 = state
        .cities_of(player)
        .map(|(_, c)| c.population as i64)
        .sum();
    let territory = state.map.iter().filter(|(_, t)| t.owner == Some(player)).count() as i64;
    let units = state.units_of(player).count() as i64;

    ScoreBreakdown {
        cities: 50 * cities,
        population: 10 * population,
        territory: 2 * territory,
        techs: 30 * p.techs.len() as i64,
        units: 15 * units,
        gold: p.pool.gold as i64 / 100,
        culture: p.pool.culture as i64 / 50,
        science: p.pool.science as i64 / 50,
        wonders: 100 * state.wonders.count_for(player) as i64,
        great_people: 75 * p.great_people_earned as i64,
    }
}

fn domination_winner(state: &WorldState, config: &EngineConfig) -> Option<PlayerId> {
    let total = state.cities.len();
    if total == 0 || total < config.victory.domination_min_cities {
        return None;
    }
    let needed = config.victory.domination_share * total as f64;
    state
        .living_players()
        .find(|p| state.city_count(p.id) as f64 >= needed)
        .map(|p| p.id)
}

/// First satisfied condition in priority order: domination, science,
/// culture, then time at the turn limit.
pub fn evaluate_victory(state: &WorldState, config: &EngineConfig) -> Option<VictoryOutcome> {
    let outcome = |winner: Option<PlayerId>, kind| VictoryOutcome {
        winner,
        kind,
        turn: state.turn,
    };

    if let Some(winner) = domination_winner(state, config) {
        return Some(outcome(Some(winner), VictoryKind::Domination));
    }
    if let Some(p) = state
        .living_players()
        .find(|p| p.techs.len() >= config.victory.science_techs)
    {
        return Some(outcome(Some(p.id), VictoryKind::Science));
    }
    if let Some(p) = state
        .living_players()
        .find(|p| p.pool.culture >= config.victory.culture)
    {
        return Some(outcome(Some(p.id), VictoryKind::Culture));
    }
    if state.turn >= config.turn_limit {
        // Ties keep the earliest player.
        let mut best: Option<(i64, PlayerId)> = None;
        for p in state.living_players() {
            let total = calculate_player_score(state, p.id).total();
            if best.map_or(true, |(score, _)| total > score) {
                best = Some((total, p.id));
            }
        }
        return Some(outcome(best.map(|(_, id)| id), VictoryKind::Time));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{city::City, map::GameMap, player::Player, unit::Unit};
    use hegemon_protocol::{Civilization, Pos, Tech, Terrain, UnitKind};

    fn world(players: u8) -> WorldState {
        let map = GameMap::new(20, 20, Terrain::Plains);
        let players = (0..players)
            .map(|i| Player::new(PlayerId(i), format!("P{i}"), Civilization::Rome, true))
            .collect();
        WorldState::new(map, players, 5, 10)
    }

    fn city(state: &mut WorldState, owner: u8, x: i32) {
        let pos = Pos::new(x, 0);
        let id = state.cities.insert(City::new(format!("C{x}"), pos, PlayerId(owner), 0));
        state.map.get_mut(pos).unwrap().city = Some(id);
        let index = state.map.index_of(pos).unwrap();
        state.assign_tile(index, id);
    }

    #[test]
    fn score_uses_weighted_components() {
        let mut state = world(1);
        city(&mut state, 0, 0);
        state.place_unit(Unit::new(UnitKind::Warrior, PlayerId(0), Pos::new(3, 3)));
        state.players[0].techs.insert(Tech::Pottery);
        state.players[0].pool.gold = 250;
        state.players[0].pool.culture = 120;
        let score = calculate_player_score(&state, PlayerId(0));
        assert_eq!(score.cities, 50);
        assert_eq!(score.population, 10);
        assert_eq!(score.territory, 2);
        assert_eq!(score.techs, 30);
        assert_eq!(score.units, 15);
        assert_eq!(score.gold, 2);
        assert_eq!(score.culture, 2);
        assert_eq!(score.total(), 50 + 10 + 2 + 30 + 15 + 2 + 2);
    }

    #[test]
    fn domination_needs_minimum_city_count() {
        let mut state = world(2);
        city(&mut state, 0, 0);
        city(&mut state, 0, 4);
        city(&mut state, 1, 8);
        let config = EngineConfig::default();
        assert_eq!(evaluate_victory(&state, &config), None);
        city(&mut state, 0, 12);
        let outcome = evaluate_victory(&state, &config).unwrap();
        assert_eq!(outcome.kind, VictoryKind::Domination);
        assert_eq!(outcome.winner, Some(PlayerId(0)));
    }

    #[test]
    fn domination_outranks_science() {
        let mut state = world(2);
        for x in [0, 4, 8] {
            city(&mut state, 1, x);
        }
        city(&mut state, 0, 12);
        let mut config = EngineConfig::default();
        config.victory.science_techs = 1;
        state.players[0].techs.insert(Tech::Pottery);
        let outcome = evaluate_victory(&state, &config).unwrap();
        assert_eq!(outcome.kind, VictoryKind::Domination);
        assert_eq!(outcome.winner, Some(PlayerId(1)));
    }

    #[test]
    fn culture_threshold_and_time_limit() {
        let mut state = world(2);
        let config = EngineConfig::default();
        state.players[1].pool.culture = 50_000;
        let outcome = evaluate_victory(&state, &config).unwrap();
        assert_eq!(outcome.kind, VictoryKind::Culture);
        assert_eq!(outcome.winner, Some(PlayerId(1)));

        state.players[1].pool.culture = 0;
        state.turn = 499;
        assert_eq!(evaluate_victory(&state, &config), None);
        state.turn = 500;
        let outcome = evaluate_victory(&state, &config).unwrap();
        assert_eq!(outcome.kind, VictoryKind::Time);
        // Equal scores: the first player keeps the lead.
        assert_eq!(outcome.winner, Some(PlayerId(0)));
    }
}

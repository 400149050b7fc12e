mod common;

use common::{add_city, add_unit, empty_world, quiet_config};
use hegemon_core::{
    city::CITY_BASE_YIELDS,
    protocol::{Event, PlayerId, Pos, Tech, Terrain, UnitKind},
    rules::{terrain, RIVER_FOOD_BONUS},
    GameEngine, GameError, Yields,
};

#[test]
fn thirty_cost_tech_lands_on_turn_sixty_without_science() {
    let mut state = empty_world(10, 10, 1);
    state.players[0].techs.insert(Tech::Pottery);
    add_unit(&mut state, UnitKind::Warrior, 0, Pos::new(4, 4));
    let mut engine = GameEngine::from_state(quiet_config(), state).unwrap();

    engine.start_research(Tech::Writing).unwrap();
    for _ in 0..59 {
        engine.end_turn().unwrap();
    }
    assert_eq!(engine.turn(), 59);
    assert!(!engine.state().players[0].has_tech(Tech::Writing));
    assert_eq!(engine.state().players[0].research.as_ref().unwrap().progress, 59);

    let events = engine.end_turn().unwrap();
    assert_eq!(engine.turn(), 60);
    assert!(events.contains(&Event::TechResearched {
        player: PlayerId(0),
        tech: Tech::Writing
    }));
    assert!(engine.state().players[0].research.is_none());
}

#[test]
fn cities_keep_three_tiles_apart() {
    let mut state = empty_world(16, 16, 2);
    add_city(&mut state, 0, Pos::new(5, 5));
    let near = add_unit(&mut state, UnitKind::Settler, 0, Pos::new(7, 5));
    let site = Pos::new(8, 5);
    state.map.get_mut(site).unwrap().river = true;
    let ok = add_unit(&mut state, UnitKind::Settler, 0, site);
    let mut engine = GameEngine::from_state(quiet_config(), state).unwrap();

    let err = engine.found_city(near).unwrap_err();
    assert!(matches!(err, GameError::TooCloseToCity { distance: 2, min: 3 }));
    assert!(engine.state().units.get(near).is_some());

    engine.found_city(ok).unwrap();
    assert_eq!(engine.state().city_count(PlayerId(0)), 2);
    assert!(engine.state().invariant_violations().is_empty());

    // River plains home tile plus its four plains neighbors.
    let (_, city) = engine.state().city_at(site).unwrap();
    assert_eq!(city.territory.len(), 5);
    let plains = terrain(Terrain::Plains).yields;
    let expected = CITY_BASE_YIELDS + plains.scaled(5) + Yields::new(RIVER_FOOD_BONUS, 0, 0, 0, 0);
    assert_eq!(city.production, expected);
}

#[test]
fn every_highlighted_tile_is_reached_in_one_move() {
    let build = || {
        let mut state = empty_world(9, 9, 1);
        state.map.get_mut(Pos::new(4, 3)).unwrap().terrain = Terrain::Hills;
        state.map.get_mut(Pos::new(3, 4)).unwrap().river = true;
        state.map.get_mut(Pos::new(5, 5)).unwrap().terrain = Terrain::Desert;
        state.map.get_mut(Pos::new(5, 3)).unwrap().terrain = Terrain::Forest;
        let unit = add_unit(&mut state, UnitKind::Cavalry, 0, Pos::new(4, 4));
        (GameEngine::from_state(quiet_config(), state).unwrap(), unit)
    };
    let (engine, unit) = build();
    let tiles = engine.reachable(unit);
    assert!(tiles.len() > 8);
    for tile in tiles {
        let (mut engine, unit) = build();
        let events = engine.move_unit(unit, tile).unwrap();
        assert!(matches!(&events[0], Event::UnitMoved { to, .. } if *to == tile));
        assert_eq!(engine.state().units.get(unit).unwrap().pos, tile);
    }
}

#[test]
fn cannot_found_on_foreign_land_or_water() {
    let mut state = empty_world(16, 16, 2);
    let theirs = add_city(&mut state, 1, Pos::new(10, 10));
    let border = state.map.index_of(Pos::new(11, 10)).unwrap();
    state.assign_tile(border, theirs);
    state.map.get_mut(Pos::new(2, 2)).unwrap().terrain = Terrain::Ocean;
    let wet = add_unit(&mut state, UnitKind::Settler, 0, Pos::new(2, 2));
    let trespasser = add_unit(&mut state, UnitKind::Settler, 0, Pos::new(11, 10));
    let mut engine = GameEngine::from_state(quiet_config(), state).unwrap();
    assert!(matches!(
        engine.found_city(wet),
        Err(GameError::UnsettleableTerrain { terrain: Terrain::Ocean })
    ));
    assert!(matches!(
        engine.found_city(trespasser),
        Err(GameError::ForeignTerritory)
    ));
    assert_eq!(engine.state().city_count(PlayerId(0)), 0);
}

#[test]
fn city_production_accrues_on_wraparound() {
    let mut state = empty_world(12, 12, 2);
    let city = add_city(&mut state, 0, Pos::new(4, 4));
    add_city(&mut state, 1, Pos::new(9, 9));
    let mut engine = GameEngine::from_state(quiet_config(), state).unwrap();
    let output = engine.city_output(city);
    assert!(output.production > 0);
    assert_eq!(engine.player_output(PlayerId(0)), output);

    engine.end_turn().unwrap();
    // Player 1's turn: the round has not wrapped yet.
    assert_eq!(engine.state().players[0].pool.production, 0);
    engine.end_turn().unwrap();
    assert_eq!(engine.state().players[0].pool.production, output.production);
}

#[test]
fn game_over_rejects_further_requests() {
    let mut state = empty_world(10, 10, 1);
    add_unit(&mut state, UnitKind::Warrior, 0, Pos::new(4, 4));
    let mut config = quiet_config();
    config.turn_limit = 2;
    let mut engine = GameEngine::from_state(config, state).unwrap();

    engine.end_turn().unwrap();
    let events = engine.end_turn().unwrap();
    assert!(events.iter().any(|e| matches!(e, Event::GameEnded { .. })));
    assert!(engine.is_over());
    assert!(matches!(engine.end_turn(), Err(GameError::GameOver)));
    assert!(matches!(
        engine.start_research(Tech::Pottery),
        Err(GameError::GameOver)
    ));
}

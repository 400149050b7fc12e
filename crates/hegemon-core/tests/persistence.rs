mod common;

use common::quiet_config;
use hegemon_core::{
    protocol::{Civilization, Event},
    EngineConfig, GameEngine, GameError, JsonFilePersistence, MemoryPersistence, Persistence,
    PlayerSpec, ScatterMapSource,
};

fn ai_game(config: EngineConfig) -> GameEngine {
    let mut source = ScatterMapSource::new(24, 18, config.seed);
    GameEngine::start(
        config,
        &mut source,
        &[
            PlayerSpec::ai("Hal", Civilization::Greece),
            PlayerSpec::ai("Ava", Civilization::China),
            PlayerSpec::human("Ada", Civilization::England),
        ],
    )
    .unwrap()
}

#[test]
fn json_saves_round_trip_through_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        autosave_interval: 3,
        ..quiet_config()
    };
    let mut engine = ai_game(config.clone())
        .with_persistence(Box::new(JsonFilePersistence::new(dir.path())));

    let mut autosaves = Vec::new();
    // The opening call only hands over to the human seat; each later one is a round.
    for _ in 0..8 {
        for event in engine.end_turn().unwrap() {
            if let Event::GameSaved { turn } = event {
                autosaves.push(turn);
            }
        }
    }
    assert_eq!(autosaves, vec![3, 6]);

    engine.save_now().unwrap();
    let store = JsonFilePersistence::new(dir.path());
    let turns: Vec<u32> = store.list().unwrap().into_iter().map(|(t, _)| t).collect();
    assert_eq!(turns, vec![3, 6, 7]);

    let resumed = GameEngine::load(config, Box::new(store)).unwrap();
    assert_eq!(resumed.state(), engine.state());
    assert_eq!(resumed.turn(), 7);
}

#[test]
fn memory_store_keeps_the_latest_state() {
    let mut engine = ai_game(quiet_config());
    engine.end_turn().unwrap();
    let mut store = MemoryPersistence::new();
    store.save(engine.state()).unwrap();
    assert_eq!(store.load().unwrap().as_ref(), Some(engine.state()));
}

#[test]
fn loading_without_saves_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameEngine::load(quiet_config(), Box::new(JsonFilePersistence::new(dir.path())))
        .err()
        .unwrap();
    assert!(matches!(err, GameError::NoSavedGame));
}

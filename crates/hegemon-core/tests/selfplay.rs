use hegemon_core::{
    protocol::{Civilization, Event},
    EngineConfig, GameEngine, PlayerSpec, ScatterMapSource,
};

fn all_ai(seed: u64, players: usize) -> GameEngine {
    let civs = [
        Civilization::Rome,
        Civilization::Egypt,
        Civilization::Greece,
        Civilization::China,
        Civilization::Mongolia,
        Civilization::England,
    ];
    let specs: Vec<PlayerSpec> = (0..players)
        .map(|i| PlayerSpec::ai(format!("AI {i}"), civs[i % civs.len()]))
        .collect();
    let config = EngineConfig::default().with_seed(seed);
    let mut source = ScatterMapSource::new(32, 24, seed);
    GameEngine::start(config, &mut source, &specs).unwrap()
}

#[test]
fn ai_games_stay_consistent_for_a_hundred_rounds() {
    for seed in [1, 2, 3] {
        let mut engine = all_ai(seed, 4);
        while !engine.is_over() && engine.turn() < 100 {
            engine.end_turn().unwrap();
            let violations = engine.state().invariant_violations();
            assert!(
                violations.is_empty(),
                "seed {seed}, turn {}: {violations:?}",
                engine.turn()
            );
            for p in &engine.state().players {
                let pool = p.pool;
                assert!(
                    pool.food >= 0 && pool.production >= 0 && pool.gold >= 0,
                    "negative pool for {}",
                    p.name
                );
            }
        }
        assert!(engine.state().cities.len() >= 1, "seed {seed}: nobody settled");
    }
}

#[test]
fn same_seed_same_game() {
    let mut a = all_ai(42, 3);
    let mut b = all_ai(42, 3);
    for _ in 0..40 {
        if a.is_over() {
            break;
        }
        let ea = a.end_turn().unwrap();
        let eb = b.end_turn().unwrap();
        assert_eq!(ea, eb);
    }
    assert_eq!(a.state(), b.state());
}

#[test]
fn every_end_turn_call_advances_at_least_one_round_for_ai_only_games() {
    let mut engine = all_ai(9, 2);
    let before = engine.turn();
    let events = engine.end_turn().unwrap();
    assert!(engine.turn() > before);
    assert!(events.iter().any(|e| matches!(e, Event::TurnStarted { .. })));
}

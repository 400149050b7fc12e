mod common;

use common::{empty_world, quiet_config};
use hegemon_core::{
    diplomacy::{DiplomacyError, ALLIANCE_TRUST_FLOOR, PEACE_TRUST, WAR_TRUST},
    protocol::{Event, PlayerId, Stance, TradeBundle, TradeDuration, TradeTerms, YieldType},
    GameEngine, GameError,
};

fn engine(players: u8) -> GameEngine {
    GameEngine::from_state(quiet_config(), empty_world(12, 12, players)).unwrap()
}

fn ongoing(gold: i32, food: i32, turns: u32) -> TradeTerms {
    TradeTerms {
        proposer_gives: TradeBundle::gold(gold),
        partner_gives: TradeBundle::default().with_resource(YieldType::Food, food),
        duration: TradeDuration::Ongoing { turns },
    }
}

#[test]
fn stance_machine_follows_the_rules() {
    let mut engine = engine(2);
    let them = PlayerId(1);

    engine.declare_war(them).unwrap();
    let ledger = &engine.state().diplomacy;
    assert!(ledger.is_at_war(PlayerId(0), them));
    assert!(ledger.is_at_war(them, PlayerId(0)));
    assert_eq!(ledger.trust(them, PlayerId(0)), WAR_TRUST);

    assert!(matches!(
        engine.declare_war(them),
        Err(GameError::Diplomacy(DiplomacyError::AlreadyAtWar))
    ));
    assert!(matches!(
        engine.form_alliance(them),
        Err(GameError::Diplomacy(DiplomacyError::AllianceAtWar))
    ));

    engine.make_peace(them).unwrap();
    assert_eq!(engine.state().diplomacy.relation(PlayerId(0), them).trust, PEACE_TRUST);

    engine.befriend(them).unwrap();
    assert_eq!(engine.state().diplomacy.stance(PlayerId(0), them), Stance::Friendly);

    let events = engine.form_alliance(them).unwrap();
    assert_eq!(
        events,
        vec![Event::StanceChanged {
            a: PlayerId(0),
            b: them,
            stance: Stance::Allied,
            trust: ALLIANCE_TRUST_FLOOR,
        }]
    );
    assert!(matches!(
        engine.declare_war(them),
        Err(GameError::Diplomacy(DiplomacyError::AlliedWar))
    ));
    engine.break_alliance(them).unwrap();
    assert_eq!(engine.state().diplomacy.stance(PlayerId(0), them), Stance::Neutral);
}

#[test]
fn cannot_negotiate_with_self_or_unknown_players() {
    let mut engine = engine(2);
    assert!(matches!(
        engine.declare_war(PlayerId(0)),
        Err(GameError::Diplomacy(DiplomacyError::SamePlayer))
    ));
    assert!(matches!(
        engine.befriend(PlayerId(7)),
        Err(GameError::UnknownPlayer(PlayerId(7)))
    ));
}

#[test]
fn ongoing_trade_runs_each_round_then_expires() {
    let mut state = empty_world(12, 12, 2);
    state.players[0].pool.gold = 100;
    state.players[1].pool.food = 100;
    let mut engine = GameEngine::from_state(quiet_config(), state).unwrap();
    engine.propose_trade(PlayerId(1), ongoing(10, 4, 2)).unwrap();
    assert_eq!(engine.state().diplomacy.trades().len(), 1);

    let mut expired = false;
    for _ in 0..4 {
        let events = engine.end_turn().unwrap();
        expired |= events.iter().any(|e| matches!(e, Event::TradeExpired { .. }));
    }
    assert!(expired);
    assert!(engine.state().diplomacy.trades().is_empty());
    assert_eq!(engine.state().players[0].pool.gold, 80);
    assert_eq!(engine.state().players[1].pool.gold, 20);
    assert_eq!(engine.state().players[1].pool.food, 92);
    // Two rounds of trading raise trust by one each.
    assert_eq!(engine.state().diplomacy.trust(PlayerId(0), PlayerId(1)), 2);
}

#[test]
fn war_tears_up_trades_and_blocks_new_ones() {
    let mut engine = engine(2);
    engine.propose_trade(PlayerId(1), ongoing(1, 1, 5)).unwrap();
    engine.declare_war(PlayerId(1)).unwrap();
    assert!(engine.state().diplomacy.trades().is_empty());
    assert!(matches!(
        engine.propose_trade(PlayerId(1), ongoing(1, 1, 5)),
        Err(GameError::Diplomacy(DiplomacyError::TradeAtWar))
    ));
}

#[test]
fn only_a_party_can_cancel_a_running_trade() {
    let mut engine = engine(3);
    engine.propose_trade(PlayerId(1), ongoing(2, 2, 10)).unwrap();
    let trade = engine.trades_of(PlayerId(0))[0].id;
    assert_eq!(engine.trades_of(PlayerId(1)).len(), 1);
    assert!(engine.trades_of(PlayerId(2)).is_empty());

    engine.end_turn().unwrap();
    engine.end_turn().unwrap();
    assert_eq!(engine.current_player(), PlayerId(2));
    assert!(matches!(
        engine.cancel_trade(trade),
        Err(GameError::Diplomacy(DiplomacyError::UnknownTrade))
    ));

    // Back to the round's first seat, the proposer.
    engine.end_turn().unwrap();
    let events = engine.cancel_trade(trade).unwrap();
    assert_eq!(
        events,
        vec![Event::TradeCancelled {
            trade,
            by: PlayerId(0)
        }]
    );
    assert!(engine.state().diplomacy.trades().is_empty());
    assert!(matches!(
        engine.cancel_trade(trade),
        Err(GameError::Diplomacy(DiplomacyError::UnknownTrade))
    ));
}

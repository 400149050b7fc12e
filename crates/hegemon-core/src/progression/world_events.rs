use serde::{Deserialize, Serialize};

use hegemon_protocol::{GreatPersonCategory, PlayerId, WorldEventKind, YieldType};

use crate::{rng::GameRng, yields::Yields};

/// Turns before the same event can hit the same player again.
pub const EVENT_COOLDOWN_TURNS: u32 = 20;

/// Player state an event's eligibility predicate may look at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventContext {
    pub cities: usize,
    pub population: u32,
    pub techs: usize,
    pub pool: Yields,
    pub researching: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventEffect {
    /// Add to (or, when negative, remove from) the player's pool.
    Pool(YieldType, i32),
    ResearchProgress(i32),
    /// Change the population of the player's largest city (floor 1).
    LargestCityPopulation(i32),
    GreatPersonPoints(GreatPersonCategory, i32),
}

pub struct WorldEventDef {
    pub kind: WorldEventKind,
    pub min_turn: u32,
    pub probability: f64,
    pub eligible: fn(&EventContext) -> bool,
    pub effect: EventEffect,
    pub message: &'static str,
}

fn has_city(ctx: &EventContext) -> bool {
    ctx.cities >= 1
}

fn has_several_cities(ctx: &EventContext) -> bool {
    ctx.cities >= 2
}

fn populous(ctx: &EventContext) -> bool {
    ctx.population >= 6
}

fn is_researching_scholar(ctx: &EventContext) -> bool {
    ctx.techs >= 5 && ctx.researching
}

fn has_culture_reserve(ctx: &EventContext) -> bool {
    ctx.pool.culture >= 100
}

fn has_gold_reserve(ctx: &EventContext) -> bool {
    ctx.pool.gold >= 100
}

pub static WORLD_EVENTS: [WorldEventDef; 9] = [
    WorldEventDef {
        kind: WorldEventKind::BountifulHarvest,
        min_turn: 5,
        probability: 0.04,
        eligible: has_city,
        effect: EventEffect::Pool(YieldType::Food, 20),
        message: "A bountiful harvest fills the granaries",
    },
    WorldEventDef {
        kind: WorldEventKind::GoldVein,
        min_turn: 10,
        probability: 0.03,
        eligible: has_city,
        effect: EventEffect::Pool(YieldType::Gold, 50),
        message: "Miners strike a rich vein of gold",
    },
    WorldEventDef {
        kind: WorldEventKind::Plague,
        min_turn: 30,
        probability: 0.02,
        eligible: populous,
        effect: EventEffect::LargestCityPopulation(-1),
        message: "Plague sweeps through the largest city",
    },
    WorldEventDef {
        kind: WorldEventKind::Earthquake,
        min_turn: 20,
        probability: 0.02,
        eligible: has_several_cities,
        effect: EventEffect::Pool(YieldType::Production, -30),
        message: "An earthquake destroys stored materials",
    },
    WorldEventDef {
        kind: WorldEventKind::ScientificBreakthrough,
        min_turn: 15,
        probability: 0.03,
        eligible: is_researching_scholar,
        effect: EventEffect::ResearchProgress(25),
        message: "Scholars announce a breakthrough",
    },
    WorldEventDef {
        kind: WorldEventKind::CulturalRenaissance,
        min_turn: 40,
        probability: 0.02,
        eligible: has_culture_reserve,
        effect: EventEffect::Pool(YieldType::Culture, 100),
        message: "A cultural renaissance begins",
    },
    WorldEventDef {
        kind: WorldEventKind::TradeBoom,
        min_turn: 25,
        probability: 0.03,
        eligible: has_gold_reserve,
        effect: EventEffect::Pool(YieldType::Gold, 75),
        message: "Merchants report a trade boom",
    },
    WorldEventDef {
        kind: WorldEventKind::Drought,
        min_turn: 15,
        probability: 0.02,
        eligible: has_city,
        effect: EventEffect::Pool(YieldType::Food, -25),
        message: "Drought withers the crops",
    },
    WorldEventDef {
        kind: WorldEventKind::Inspiration,
        min_turn: 10,
        probability: 0.03,
        eligible: has_city,
        effect: EventEffect::GreatPersonPoints(GreatPersonCategory::Artist, 25),
        message: "Artists find new inspiration",
    },
];

pub fn world_event(kind: WorldEventKind) -> &'static WorldEventDef {
    &WORLD_EVENTS[kind as usize]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEventRecord {
    pub turn: u32,
    pub player: PlayerId,
    pub kind: WorldEventKind,
}

/// History of triggered events, also used for per-(event, player) cooldowns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEventTracker {
    history: Vec<WorldEventRecord>,
}

impl WorldEventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[WorldEventRecord] {
        &self.history
    }

    pub fn last_triggered(&self, kind: WorldEventKind, player: PlayerId) -> Option<u32> {
        self.history
            .iter()
            .rev()
            .find(|r| r.kind == kind && r.player == player)
            .map(|r| r.turn)
    }

    pub fn on_cooldown(&self, kind: WorldEventKind, player: PlayerId, turn: u32) -> bool {
        self.last_triggered(kind, player)
            .is_some_and(|last| turn < last.saturating_add(EVENT_COOLDOWN_TURNS))
    }

    /// Roll every catalogue entry independently for one player. Gates are
    /// checked before the roll so the RNG stream only advances for live
    /// candidates.
    pub fn roll(
        &mut self,
        player: PlayerId,
        turn: u32,
        ctx: &EventContext,
        rng: &mut GameRng,
    ) -> Vec<WorldEventKind> {
        let mut fired = Vec::new();
        for def in WORLD_EVENTS.iter() {
            if turn < def.min_turn
                || self.on_cooldown(def.kind, player, turn)
                || !(def.eligible)(ctx)
            {
                continue;
            }
            if rng.gen_bool(def.probability) {
                self.history.push(WorldEventRecord {
                    turn,
                    player,
                    kind: def.kind,
                });
                fired.push(def.kind);
            }
        }
        fired
    }
}

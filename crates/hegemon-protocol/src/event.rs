use serde::{Deserialize, Serialize};

use crate::{
    CityId, Era, GreatPersonId, PlayerId, Pos, Project, Stance, Tech, TradeId, UnitId, UnitKind,
    VictoryKind, WonderKind, WorldEventKind,
};

/// All possible engine→collaborator events. Fully serializable.
///
/// Renderers subscribe to these for visual feedback; the engine never depends
/// on anyone listening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // Game flow
    TurnStarted {
        turn: u32,
        player: PlayerId,
    },
    TurnEnded {
        turn: u32,
        player: PlayerId,
    },
    GameSaved {
        turn: u32,
    },
    GameEnded {
        winner: Option<PlayerId>,
        kind: VictoryKind,
        turn: u32,
    },

    // Cities
    CityFounded {
        city: CityId,
        name: String,
        pos: Pos,
        owner: PlayerId,
    },
    CityGrew {
        city: CityId,
        population: u32,
    },
    BordersExpanded {
        city: CityId,
        tiles: Vec<Pos>,
    },
    TileCaptured {
        pos: Pos,
        from: Option<PlayerId>,
        to: PlayerId,
        city: CityId,
    },
    CityCaptured {
        city: CityId,
        from: PlayerId,
        to: PlayerId,
    },
    ConstructionStarted {
        city: CityId,
        project: Project,
    },
    ConstructionCompleted {
        city: CityId,
        project: Project,
    },
    ConstructionCancelled {
        city: CityId,
        project: Project,
        refund_gold: i32,
    },

    // Units
    UnitRecruited {
        unit: UnitId,
        kind: UnitKind,
        owner: PlayerId,
        pos: Pos,
    },
    UnitMoved {
        unit: UnitId,
        from: Pos,
        to: Pos,
        path: Vec<Pos>,
        /// Remaining movement, in half-points.
        moves_left: i32,
    },
    CombatResolved {
        attacker: UnitId,
        defender: UnitId,
        attacker_pos: Pos,
        defender_pos: Pos,
        attacker_damage: i32,
        defender_damage: i32,
    },
    UnitDestroyed {
        unit: UnitId,
        owner: PlayerId,
        pos: Pos,
    },

    // Research
    ResearchStarted {
        player: PlayerId,
        tech: Tech,
    },
    TechResearched {
        player: PlayerId,
        tech: Tech,
    },
    EraAdvanced {
        player: PlayerId,
        era: Era,
    },
    GlobalEraAdvanced {
        era: Era,
    },

    // Diplomacy
    StanceChanged {
        a: PlayerId,
        b: PlayerId,
        stance: Stance,
        trust: i32,
    },
    TradeSigned {
        trade: TradeId,
        proposer: PlayerId,
        partner: PlayerId,
    },
    TradeExecuted {
        trade: TradeId,
    },
    TradeExpired {
        trade: TradeId,
    },
    TradeCancelled {
        trade: TradeId,
        by: PlayerId,
    },

    // Progression
    WorldEventTriggered {
        player: PlayerId,
        kind: WorldEventKind,
    },
    GreatPersonBorn {
        player: PlayerId,
        person: GreatPersonId,
    },
    GreatPersonUsed {
        player: PlayerId,
        person: GreatPersonId,
    },
    WonderCompleted {
        wonder: WonderKind,
        player: PlayerId,
        city: CityId,
    },
}

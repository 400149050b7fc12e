//! Pairwise diplomatic stances, trust, and trade agreements.
//!
//! Relations are keyed by a normalized unordered pair so `(a, b)` and
//! `(b, a)` always address the same entry. The ledger only does
//! bookkeeping; resource transfers for trades are applied by the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hegemon_protocol::{PlayerId, Stance, TradeAgreement, TradeDuration, TradeId, TradeTerms};

pub const TRUST_MIN: i32 = -100;
pub const TRUST_MAX: i32 = 100;
pub const PEACE_TRUST: i32 = -50;
pub const WAR_TRUST: i32 = -100;
pub const ALLIANCE_TRUST_FLOOR: i32 = 50;
pub const FRIENDSHIP_TRUST_FLOOR: i32 = 20;
pub const BREAK_ALLIANCE_PENALTY: i32 = 30;
pub const TRADE_TRUST_PER_TURN: i32 = 1;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DiplomacyError {
    #[error("a player cannot negotiate with itself")]
    SamePlayer,
    #[error("already at war")]
    AlreadyAtWar,
    #[error("not at war")]
    NotAtWar,
    #[error("cannot declare war on an ally; break the alliance first")]
    AlliedWar,
    #[error("cannot ally while at war; make peace first")]
    AllianceAtWar,
    #[error("already allied")]
    AlreadyAllied,
    #[error("not allied")]
    NotAllied,
    #[error("relation must be neutral to befriend")]
    NotNeutral,
    #[error("trade offers nothing on either side")]
    EmptyTrade,
    #[error("ongoing trades must last at least one turn")]
    InvalidDuration,
    #[error("trade amounts must be non-negative")]
    NegativeAmount,
    #[error("cannot trade while at war")]
    TradeAtWar,
    #[error("unknown trade agreement")]
    UnknownTrade,
}

/// Unordered player pair; always stored as `(min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerPair(PlayerId, PlayerId);

impl PlayerPair {
    pub fn new(a: PlayerId, b: PlayerId) -> Result<Self, DiplomacyError> {
        if a == b {
            return Err(DiplomacyError::SamePlayer);
        }
        Ok(if a < b { Self(a, b) } else { Self(b, a) })
    }

    pub fn low(self) -> PlayerId {
        self.0
    }

    pub fn high(self) -> PlayerId {
        self.1
    }

    pub fn contains(self, player: PlayerId) -> bool {
        self.0 == player || self.1 == player
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub stance: Stance,
    pub trust: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct RelationEntry {
    pair: PlayerPair,
    relation: Relation,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomacyLedger {
    /// Sorted by pair.
    relations: Vec<RelationEntry>,
    trades: Vec<TradeAgreement>,
    next_trade_id: u32,
}

/// Result of one turn of trade processing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeTick {
    /// Agreements whose per-turn transfer should run this turn.
    pub executed: Vec<TradeAgreement>,
    /// Agreements removed after their final transfer.
    pub expired: Vec<TradeId>,
}

impl DiplomacyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relation between two distinct players; pairs never touched are neutral
    /// with zero trust.
    pub fn relation(&self, a: PlayerId, b: PlayerId) -> Relation {
        let Ok(pair) = PlayerPair::new(a, b) else {
            return Relation::default();
        };
        self.relations
            .binary_search_by_key(&pair, |e| e.pair)
            .map(|i| self.relations[i].relation)
            .unwrap_or_default()
    }

    pub fn stance(&self, a: PlayerId, b: PlayerId) -> Stance {
        self.relation(a, b).stance
    }

    pub fn trust(&self, a: PlayerId, b: PlayerId) -> i32 {
        self.relation(a, b).trust
    }

    pub fn is_at_war(&self, a: PlayerId, b: PlayerId) -> bool {
        a != b && self.stance(a, b) == Stance::War
    }

    pub fn are_allied(&self, a: PlayerId, b: PlayerId) -> bool {
        a != b && self.stance(a, b) == Stance::Allied
    }

    /// All recorded relations in pair order.
    pub fn relations(&self) -> impl Iterator<Item = (PlayerPair, Relation)> + '_ {
        self.relations.iter().map(|e| (e.pair, e.relation))
    }

    fn entry_mut(&mut self, pair: PlayerPair) -> &mut Relation {
        let index = match self.relations.binary_search_by_key(&pair, |e| e.pair) {
            Ok(i) => i,
            Err(i) => {
                self.relations.insert(
                    i,
                    RelationEntry {
                        pair,
                        relation: Relation::default(),
                    },
                );
                i
            }
        };
        &mut self.relations[index].relation
    }

    pub fn adjust_trust(&mut self, a: PlayerId, b: PlayerId, delta: i32) -> Result<i32, DiplomacyError> {
        let pair = PlayerPair::new(a, b)?;
        let rel = self.entry_mut(pair);
        rel.trust = rel.trust.saturating_add(delta).clamp(TRUST_MIN, TRUST_MAX);
        Ok(rel.trust)
    }

    /// Any non-war stance to war. Allies must break the alliance first.
    /// Trade agreements between the pair are torn up.
    pub fn declare_war(&mut self, a: PlayerId, b: PlayerId) -> Result<Relation, DiplomacyError> {
        let pair = PlayerPair::new(a, b)?;
        match self.relation(a, b).stance {
            Stance::War => return Err(DiplomacyError::AlreadyAtWar),
            Stance::Allied => return Err(DiplomacyError::AlliedWar),
            Stance::Neutral | Stance::Friendly => {}
        }
        self.trades
            .retain(|t| !(t.involves(pair.low()) && t.involves(pair.high())));
        let rel = self.entry_mut(pair);
        rel.stance = Stance::War;
        rel.trust = WAR_TRUST;
        Ok(*rel)
    }

    /// War to neutral; trust ends at the peace level.
    pub fn make_peace(&mut self, a: PlayerId, b: PlayerId) -> Result<Relation, DiplomacyError> {
        let pair = PlayerPair::new(a, b)?;
        if self.relation(a, b).stance != Stance::War {
            return Err(DiplomacyError::NotAtWar);
        }
        let rel = self.entry_mut(pair);
        rel.stance = Stance::Neutral;
        rel.trust = PEACE_TRUST;
        Ok(*rel)
    }

    pub fn form_alliance(&mut self, a: PlayerId, b: PlayerId) -> Result<Relation, DiplomacyError> {
        let pair = PlayerPair::new(a, b)?;
        match self.relation(a, b).stance {
            Stance::War => return Err(DiplomacyError::AllianceAtWar),
            Stance::Allied => return Err(DiplomacyError::AlreadyAllied),
            Stance::Neutral | Stance::Friendly => {}
        }
        let rel = self.entry_mut(pair);
        rel.stance = Stance::Allied;
        rel.trust = rel.trust.max(ALLIANCE_TRUST_FLOOR);
        Ok(*rel)
    }

    pub fn break_alliance(&mut self, a: PlayerId, b: PlayerId) -> Result<Relation, DiplomacyError> {
        let pair = PlayerPair::new(a, b)?;
        if self.relation(a, b).stance != Stance::Allied {
            return Err(DiplomacyError::NotAllied);
        }
        let rel = self.entry_mut(pair);
        rel.stance = Stance::Neutral;
        rel.trust = (rel.trust - BREAK_ALLIANCE_PENALTY).max(0);
        Ok(*rel)
    }

    pub fn befriend(&mut self, a: PlayerId, b: PlayerId) -> Result<Relation, DiplomacyError> {
        let pair = PlayerPair::new(a, b)?;
        if self.relation(a, b).stance != Stance::Neutral {
            return Err(DiplomacyError::NotNeutral);
        }
        let rel = self.entry_mut(pair);
        rel.stance = Stance::Friendly;
        rel.trust = rel.trust.max(FRIENDSHIP_TRUST_FLOOR);
        Ok(*rel)
    }

    pub fn validate_trade(
        &self,
        proposer: PlayerId,
        partner: PlayerId,
        terms: &TradeTerms,
    ) -> Result<(), DiplomacyError> {
        PlayerPair::new(proposer, partner)?;
        if self.is_at_war(proposer, partner) {
            return Err(DiplomacyError::TradeAtWar);
        }
        let negative = |b: &hegemon_protocol::TradeBundle| {
            b.gold < 0 || b.resources.iter().any(|r| r.amount < 0)
        };
        if negative(&terms.proposer_gives) || negative(&terms.partner_gives) {
            return Err(DiplomacyError::NegativeAmount);
        }
        if terms.proposer_gives.is_empty() && terms.partner_gives.is_empty() {
            return Err(DiplomacyError::EmptyTrade);
        }
        if let TradeDuration::Ongoing { turns: 0 } = terms.duration {
            return Err(DiplomacyError::InvalidDuration);
        }
        Ok(())
    }

    /// Record a validated agreement. One-time agreements are returned but not
    /// kept; the caller executes them immediately.
    pub fn sign_trade(
        &mut self,
        proposer: PlayerId,
        partner: PlayerId,
        terms: TradeTerms,
        turn: u32,
    ) -> Result<TradeAgreement, DiplomacyError> {
        self.validate_trade(proposer, partner, &terms)?;
        let id = TradeId(self.next_trade_id);
        self.next_trade_id = self.next_trade_id.wrapping_add(1);
        let remaining_turns = match terms.duration {
            TradeDuration::OneTime => 0,
            TradeDuration::Ongoing { turns } => turns,
        };
        let agreement = TradeAgreement {
            id,
            proposer,
            partner,
            terms,
            remaining_turns,
            signed_turn: turn,
        };
        if remaining_turns > 0 {
            self.trades.push(agreement.clone());
        }
        Ok(agreement)
    }

    pub fn cancel_trade(&mut self, id: TradeId) -> Result<TradeAgreement, DiplomacyError> {
        let index = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or(DiplomacyError::UnknownTrade)?;
        Ok(self.trades.remove(index))
    }

    pub fn trades(&self) -> &[TradeAgreement] {
        &self.trades
    }

    pub fn trades_for(&self, player: PlayerId) -> impl Iterator<Item = &TradeAgreement> {
        self.trades.iter().filter(move |t| t.involves(player))
    }

    /// Count down every ongoing agreement, raise trust for each one still
    /// running, and drop those whose counter reaches zero.
    pub fn tick_trades(&mut self) -> TradeTick {
        let mut tick = TradeTick::default();
        for trade in &mut self.trades {
            tick.executed.push(trade.clone());
            trade.remaining_turns = trade.remaining_turns.saturating_sub(1);
        }
        let mut kept = Vec::with_capacity(self.trades.len());
        for trade in std::mem::take(&mut self.trades) {
            if trade.remaining_turns == 0 {
                tick.expired.push(trade.id);
            } else {
                kept.push(trade);
            }
        }
        self.trades = kept;

        for trade in &tick.executed {
            // Pair validity was checked at signing.
            let _ = self.adjust_trust(trade.proposer, trade.partner, TRADE_TRUST_PER_TURN);
        }
        tick
    }

    /// Forget every relation and trade touching `player`.
    pub fn remove_player(&mut self, player: PlayerId) {
        self.relations.retain(|e| !e.pair.contains(player));
        self.trades.retain(|t| !t.involves(player));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hegemon_protocol::TradeBundle;

    const A: PlayerId = PlayerId(0);
    const B: PlayerId = PlayerId(1);

    fn ongoing(turns: u32) -> TradeTerms {
        TradeTerms {
            proposer_gives: TradeBundle::gold(5),
            partner_gives: TradeBundle::default(),
            duration: TradeDuration::Ongoing { turns },
        }
    }

    #[test]
    fn pair_is_unordered() {
        let mut ledger = DiplomacyLedger::new();
        ledger.befriend(B, A).unwrap();
        assert_eq!(ledger.stance(A, B), Stance::Friendly);
        assert_eq!(ledger.relations().count(), 1);
    }

    #[test]
    fn war_while_allied_is_rejected_and_leaves_relation() {
        let mut ledger = DiplomacyLedger::new();
        ledger.form_alliance(A, B).unwrap();
        let before = ledger.relation(A, B);
        assert_eq!(ledger.declare_war(A, B), Err(DiplomacyError::AlliedWar));
        assert_eq!(ledger.relation(A, B), before);
    }

    #[test]
    fn peace_yields_neutral_with_low_trust() {
        let mut ledger = DiplomacyLedger::new();
        ledger.declare_war(A, B).unwrap();
        assert_eq!(ledger.trust(A, B), -100);
        let rel = ledger.make_peace(B, A).unwrap();
        assert_eq!(rel.stance, Stance::Neutral);
        assert!(rel.trust <= -50);
    }

    #[test]
    fn alliance_requires_peace_first() {
        let mut ledger = DiplomacyLedger::new();
        ledger.declare_war(A, B).unwrap();
        assert_eq!(ledger.form_alliance(A, B), Err(DiplomacyError::AllianceAtWar));
        ledger.make_peace(A, B).unwrap();
        let rel = ledger.form_alliance(A, B).unwrap();
        assert_eq!(rel.trust, 50);
    }

    #[test]
    fn breaking_alliance_costs_trust_but_not_below_zero() {
        let mut ledger = DiplomacyLedger::new();
        ledger.form_alliance(A, B).unwrap();
        let rel = ledger.break_alliance(A, B).unwrap();
        assert_eq!(rel, Relation { stance: Stance::Neutral, trust: 20 });

        ledger.form_alliance(A, B).unwrap();
        ledger.adjust_trust(A, B, -40).unwrap();
        ledger.break_alliance(A, B).unwrap();
        assert_eq!(ledger.trust(A, B), 0);
    }

    #[test]
    fn trust_is_clamped() {
        let mut ledger = DiplomacyLedger::new();
        assert_eq!(ledger.adjust_trust(A, B, 500).unwrap(), 100);
        assert_eq!(ledger.adjust_trust(A, B, -500).unwrap(), -100);
        assert_eq!(ledger.adjust_trust(A, A, 1), Err(DiplomacyError::SamePlayer));
    }

    #[test]
    fn ongoing_trade_runs_for_its_duration_then_expires() {
        let mut ledger = DiplomacyLedger::new();
        let trade = ledger.sign_trade(A, B, ongoing(2), 1).unwrap();
        assert_eq!(ledger.trades().len(), 1);

        let first = ledger.tick_trades();
        assert_eq!(first.executed.len(), 1);
        assert!(first.expired.is_empty());

        let second = ledger.tick_trades();
        assert_eq!(second.executed.len(), 1);
        assert_eq!(second.expired, vec![trade.id]);
        assert!(ledger.trades().is_empty());
        assert_eq!(ledger.trust(A, B), 2);
    }

    #[test]
    fn trades_are_rejected_at_war_and_torn_up_by_war() {
        let mut ledger = DiplomacyLedger::new();
        ledger.sign_trade(A, B, ongoing(5), 1).unwrap();
        ledger.declare_war(A, B).unwrap();
        assert!(ledger.trades().is_empty());
        assert_eq!(
            ledger.sign_trade(A, B, ongoing(5), 2).unwrap_err(),
            DiplomacyError::TradeAtWar
        );
    }

    #[test]
    fn empty_or_zero_length_trades_are_rejected() {
        let ledger = DiplomacyLedger::new();
        let empty = TradeTerms {
            proposer_gives: TradeBundle::default(),
            partner_gives: TradeBundle::default(),
            duration: TradeDuration::OneTime,
        };
        assert_eq!(ledger.validate_trade(A, B, &empty), Err(DiplomacyError::EmptyTrade));
        assert_eq!(
            ledger.validate_trade(A, B, &ongoing(0)),
            Err(DiplomacyError::InvalidDuration)
        );
    }
}

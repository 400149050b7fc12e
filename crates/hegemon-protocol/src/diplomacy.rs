//! Diplomacy vocabulary: stances between player pairs and trade terms.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, TradeId, YieldType};

/// Relationship stance of an unordered player pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    War,
    #[default]
    Neutral,
    Friendly,
    Allied,
}

/// An amount of a single pooled yield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAmount {
    pub kind: YieldType,
    pub amount: i32,
}

/// What one side of a trade hands over (per turn for ongoing agreements).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeBundle {
    #[serde(default)]
    pub gold: i32,
    #[serde(default)]
    pub resources: Vec<ResourceAmount>,
}

impl TradeBundle {
    pub fn gold(amount: i32) -> Self {
        Self {
            gold: amount,
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, kind: YieldType, amount: i32) -> Self {
        self.resources.push(ResourceAmount { kind, amount });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.gold <= 0 && self.resources.iter().all(|r| r.amount <= 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeDuration {
    /// Executed once when the agreement is signed.
    OneTime,
    /// Executed at the start of every world turn for `turns` turns.
    Ongoing { turns: u32 },
}

/// Terms of a proposed agreement between `proposer` and `partner`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTerms {
    pub proposer_gives: TradeBundle,
    pub partner_gives: TradeBundle,
    pub duration: TradeDuration,
}

/// A signed agreement as stored by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAgreement {
    pub id: TradeId,
    pub proposer: PlayerId,
    pub partner: PlayerId,
    pub terms: TradeTerms,
    /// Turns left for ongoing agreements; zero for one-time trades.
    pub remaining_turns: u32,
    pub signed_turn: u32,
}

impl TradeAgreement {
    pub fn involves(&self, player: PlayerId) -> bool {
        self.proposer == player || self.partner == player
    }
}

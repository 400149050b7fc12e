//! Victory conditions and score breakdown.

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// The type of victory achieved, in evaluation priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryKind {
    /// Control a large share of every city in existence.
    Domination,
    /// Research enough technologies.
    Science,
    /// Accumulate enough culture.
    Culture,
    /// Highest score when the turn limit is reached.
    Time,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryOutcome {
    pub winner: Option<PlayerId>,
    pub kind: VictoryKind,
    pub turn: u32,
}

/// Components of a player's composite score.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 50 per city.
    pub cities: i64,
    /// 10 per population point.
    pub population: i64,
    /// 2 per territory tile.
    pub territory: i64,
    /// 30 per technology.
    pub techs: i64,
    /// 15 per unit.
    pub units: i64,
    /// 1 per 100 gold.
    pub gold: i64,
    /// 1 per 50 culture.
    pub culture: i64,
    /// 1 per 50 science.
    pub science: i64,
    /// 100 per wonder.
    pub wonders: i64,
    /// 75 per great person.
    pub great_people: i64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.cities
            + self.population
            + self.territory
            + self.techs
            + self.units
            + self.gold
            + self.culture
            + self.science
            + self.wonders
            + self.great_people
    }
}

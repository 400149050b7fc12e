use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use hegemon_protocol::{Civilization, Era, GreatPersonId, PlayerId, Tech};

use crate::{rules::tech, yields::Yields};

/// Era advancement needs this many researched techs of the current era.
pub const TECHS_PER_ERA_ADVANCE: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Research {
    pub tech: Tech,
    pub progress: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub civ: Civilization,
    pub is_ai: bool,
    #[serde(default = "default_alive")]
    pub alive: bool,
    /// Accumulated resources; every component is kept non-negative.
    pub pool: Yields,
    pub era: Era,
    pub techs: BTreeSet<Tech>,
    pub research: Option<Research>,
    #[serde(default)]
    pub cities_founded: u32,
    /// Born but not yet used.
    #[serde(default)]
    pub great_people: Vec<GreatPersonId>,
    #[serde(default)]
    pub great_people_earned: u32,
}

fn default_alive() -> bool {
    true
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, civ: Civilization, is_ai: bool) -> Self {
        Self {
            id,
            name: name.into(),
            civ,
            is_ai,
            alive: true,
            pool: Yields::ZERO,
            era: Era::Antiquity,
            techs: BTreeSet::new(),
            research: None,
            cities_founded: 0,
            great_people: Vec::new(),
            great_people_earned: 0,
        }
    }

    pub fn has_tech(&self, t: Tech) -> bool {
        self.techs.contains(&t)
    }

    pub fn has_tech_opt(&self, t: Option<Tech>) -> bool {
        t.map_or(true, |t| self.has_tech(t))
    }

    /// Prerequisites met and the tech's era already reached.
    pub fn can_research(&self, t: Tech) -> bool {
        let def = tech(t);
        !self.has_tech(t)
            && def.era <= self.era
            && def.prerequisites.iter().all(|p| self.has_tech(*p))
    }

    pub fn techs_in_era(&self, era: Era) -> usize {
        self.techs.iter().filter(|t| tech(**t).era == era).count()
    }

    /// Advance the era while enough techs of the current era are known.
    /// Returns every era entered.
    pub fn check_era_advance(&mut self) -> Vec<Era> {
        let mut entered = Vec::new();
        while self.techs_in_era(self.era) >= TECHS_PER_ERA_ADVANCE {
            let Some(next) = self.era.next() else {
                break;
            };
            self.era = next;
            entered.push(next);
        }
        entered
    }
}

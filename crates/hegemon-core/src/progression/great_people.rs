use serde::{Deserialize, Serialize};

use hegemon_protocol::{GreatPersonCategory, GreatPersonId, PlayerId};

use crate::{
    rng::GameRng,
    rules::{great_people_in, GREAT_PERSON_THRESHOLD},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PlayerPoints {
    player: PlayerId,
    points: [i32; 5],
}

/// Outcome of crossing the point threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GreatPersonDraw {
    Born(GreatPersonId),
    /// Threshold crossed but every person of the category is already taken.
    Exhausted,
}

/// Great-person points per (player, category) plus the set of persons
/// already earned by anyone. Each person can be earned once per game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreatPeopleLedger {
    points: Vec<PlayerPoints>,
    /// Sorted.
    earned: Vec<GreatPersonId>,
}

impl GreatPeopleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self, player: PlayerId, category: GreatPersonCategory) -> i32 {
        self.points
            .iter()
            .find(|p| p.player == player)
            .map(|p| p.points[category.index()])
            .unwrap_or(0)
    }

    pub fn is_earned(&self, person: GreatPersonId) -> bool {
        self.earned.binary_search(&person).is_ok()
    }

    fn slot_mut(&mut self, player: PlayerId) -> &mut [i32; 5] {
        let index = match self.points.iter().position(|p| p.player == player) {
            Some(i) => i,
            None => {
                self.points.push(PlayerPoints {
                    player,
                    points: [0; 5],
                });
                self.points.len() - 1
            }
        };
        &mut self.points[index].points
    }

    /// Add points; on reaching the threshold draw an unearned person of the
    /// category at random and reset the counter.
    pub fn add_points(
        &mut self,
        player: PlayerId,
        category: GreatPersonCategory,
        amount: i32,
        rng: &mut GameRng,
    ) -> Option<GreatPersonDraw> {
        if amount <= 0 {
            return None;
        }
        let slot = &mut self.slot_mut(player)[category.index()];
        *slot = slot.saturating_add(amount);
        if *slot < GREAT_PERSON_THRESHOLD {
            return None;
        }
        *slot = 0;

        let candidates: Vec<GreatPersonId> = great_people_in(category)
            .map(|p| p.id)
            .filter(|id| !self.is_earned(*id))
            .collect();
        if candidates.is_empty() {
            return Some(GreatPersonDraw::Exhausted);
        }
        let person = candidates[rng.gen_index(candidates.len())];
        if let Err(pos) = self.earned.binary_search(&person) {
            self.earned.insert(pos, person);
        }
        Some(GreatPersonDraw::Born(person))
    }
}

use std::ops::{Add, AddAssign};

use hegemon_protocol::YieldType;
use serde::{Deserialize, Serialize};

/// One amount per pooled resource. Used both for per-turn outputs and for a
/// player's accumulated pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yields {
    pub food: i32,
    pub production: i32,
    pub gold: i32,
    pub science: i32,
    pub culture: i32,
}

impl Add for Yields {
    type Output = Yields;

    fn add(self, other: Yields) -> Yields {
        Yields {
            food: self.food + other.food,
            production: self.production + other.production,
            gold: self.gold + other.gold,
            science: self.science + other.science,
            culture: self.culture + other.culture,
        }
    }
}

impl AddAssign for Yields {
    fn add_assign(&mut self, other: Yields) {
        *self = *self + other;
    }
}

impl Yields {
    pub const ZERO: Yields = Yields::new(0, 0, 0, 0, 0);

    pub const fn new(food: i32, production: i32, gold: i32, science: i32, culture: i32) -> Self {
        Self {
            food,
            production,
            gold,
            science,
            culture,
        }
    }

    pub fn get(&self, yield_type: YieldType) -> i32 {
        match yield_type {
            YieldType::Food => self.food,
            YieldType::Production => self.production,
            YieldType::Gold => self.gold,
            YieldType::Science => self.science,
            YieldType::Culture => self.culture,
        }
    }

    pub fn get_mut(&mut self, yield_type: YieldType) -> &mut i32 {
        match yield_type {
            YieldType::Food => &mut self.food,
            YieldType::Production => &mut self.production,
            YieldType::Gold => &mut self.gold,
            YieldType::Science => &mut self.science,
            YieldType::Culture => &mut self.culture,
        }
    }

    /// Single-resource yield.
    pub fn of(yield_type: YieldType, amount: i32) -> Self {
        let mut out = Yields::ZERO;
        *out.get_mut(yield_type) = amount;
        out
    }

    /// Floor of half of every component.
    pub fn half(&self) -> Yields {
        Yields {
            food: self.food.div_euclid(2),
            production: self.production.div_euclid(2),
            gold: self.gold.div_euclid(2),
            science: self.science.div_euclid(2),
            culture: self.culture.div_euclid(2),
        }
    }

    pub fn scaled(&self, factor: i32) -> Yields {
        Yields {
            food: self.food * factor,
            production: self.production * factor,
            gold: self.gold * factor,
            science: self.science * factor,
            culture: self.culture * factor,
        }
    }

    /// Add `delta` to one resource and clamp the result at zero. Returns the
    /// amount actually applied.
    pub fn adjust(&mut self, yield_type: YieldType, delta: i32) -> i32 {
        let slot = self.get_mut(yield_type);
        let before = *slot;
        *slot = before.saturating_add(delta).max(0);
        *slot - before
    }

    pub fn clamp_non_negative(&mut self) {
        for kind in YieldType::ALL {
            let slot = self.get_mut(kind);
            *slot = (*slot).max(0);
        }
    }
}

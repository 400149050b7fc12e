use serde::{Deserialize, Serialize};

use hegemon_protocol::{PlayerId, Pos, UnitKind};

use crate::rules::{unit, UnitClass, UnitDef, UNIT_MAX_HEALTH};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub owner: PlayerId,
    pub pos: Pos,
    pub health: i32,
    pub max_health: i32,
    /// Remaining movement in half-points.
    pub moves_left: i32,
    pub max_moves: i32,
    pub attack: i32,
    pub defense: i32,
    pub has_acted: bool,
}

impl Unit {
    pub fn new(kind: UnitKind, owner: PlayerId, pos: Pos) -> Self {
        let def = unit(kind);
        Self {
            kind,
            owner,
            pos,
            health: UNIT_MAX_HEALTH,
            max_health: UNIT_MAX_HEALTH,
            moves_left: def.move_budget(),
            max_moves: def.move_budget(),
            attack: def.attack,
            defense: def.defense,
            has_acted: false,
        }
    }

    #[inline]
    pub fn def(&self) -> &'static UnitDef {
        unit(self.kind)
    }

    pub fn class(&self) -> UnitClass {
        self.def().class
    }

    pub fn is_military(&self) -> bool {
        self.class().is_military()
    }

    pub fn is_naval(&self) -> bool {
        self.class() == UnitClass::Naval
    }

    pub fn is_settler(&self) -> bool {
        self.def().can_found_city()
    }

    /// Whether the unit may still move or fight this turn.
    pub fn can_act(&self) -> bool {
        self.moves_left > 0 && !self.has_acted
    }

    pub fn reset_for_turn(&mut self) {
        self.moves_left = self.max_moves;
        self.has_acted = false;
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.health - before
    }
}

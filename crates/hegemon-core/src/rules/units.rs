use hegemon_protocol::{Tech, UnitKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitClass {
    Civilian,
    Melee,
    Ranged,
    Mounted,
    Siege,
    Naval,
}

impl UnitClass {
    /// Maximum Manhattan distance this class can attack from.
    pub fn attack_range(self) -> i32 {
        match self {
            UnitClass::Ranged | UnitClass::Siege => 2,
            _ => 1,
        }
    }

    pub fn is_military(self) -> bool {
        self != UnitClass::Civilian
    }
}

#[derive(Debug, Clone)]
pub struct UnitDef {
    pub kind: UnitKind,
    pub data_id: &'static str,
    pub name: &'static str,
    pub class: UnitClass,
    pub attack: i32,
    pub defense: i32,
    /// Whole movement points per turn.
    pub moves: i32,
    pub production_cost: i32,
    pub gold_cost: i32,
    pub tech: Option<Tech>,
}

pub const UNIT_MAX_HEALTH: i32 = 100;

impl UnitDef {
    /// Movement budget in half-points.
    pub fn move_budget(&self) -> i32 {
        self.moves * super::MOVE_SCALE
    }

    pub fn can_found_city(&self) -> bool {
        self.kind == UnitKind::Settler
    }
}

pub static UNITS: [UnitDef; 19] = [
    UnitDef {
        kind: UnitKind::Settler,
        data_id: "settler",
        name: "Settler",
        class: UnitClass::Civilian,
        attack: 0,
        defense: 1,
        moves: 2,
        production_cost: 30,
        gold_cost: 10,
        tech: None,
    },
    UnitDef {
        kind: UnitKind::Scout,
        data_id: "scout",
        name: "Scout",
        class: UnitClass::Melee,
        attack: 3,
        defense: 2,
        moves: 3,
        production_cost: 15,
        gold_cost: 5,
        tech: None,
    },
    UnitDef {
        kind: UnitKind::Warrior,
        data_id: "warrior",
        name: "Warrior",
        class: UnitClass::Melee,
        attack: 8,
        defense: 6,
        moves: 2,
        production_cost: 20,
        gold_cost: 5,
        tech: None,
    },
    UnitDef {
        kind: UnitKind::Archer,
        data_id: "archer",
        name: "Archer",
        class: UnitClass::Ranged,
        attack: 7,
        defense: 5,
        moves: 2,
        production_cost: 25,
        gold_cost: 8,
        tech: Some(Tech::Archery),
    },
    UnitDef {
        kind: UnitKind::Spearman,
        data_id: "spearman",
        name: "Spearman",
        class: UnitClass::Melee,
        attack: 8,
        defense: 10,
        moves: 2,
        production_cost: 30,
        gold_cost: 10,
        tech: Some(Tech::BronzeWorking),
    },
    UnitDef {
        kind: UnitKind::Swordsman,
        data_id: "swordsman",
        name: "Swordsman",
        class: UnitClass::Melee,
        attack: 12,
        defense: 8,
        moves: 2,
        production_cost: 35,
        gold_cost: 12,
        tech: Some(Tech::IronWorking),
    },
    UnitDef {
        kind: UnitKind::Cavalry,
        data_id: "cavalry",
        name: "Cavalry",
        class: UnitClass::Mounted,
        attack: 12,
        defense: 7,
        moves: 4,
        production_cost: 40,
        gold_cost: 15,
        tech: Some(Tech::HorsebackRiding),
    },
    UnitDef {
        kind: UnitKind::Catapult,
        data_id: "catapult",
        name: "Catapult",
        class: UnitClass::Siege,
        attack: 14,
        defense: 4,
        moves: 1,
        production_cost: 40,
        gold_cost: 15,
        tech: Some(Tech::Mathematics),
    },
    UnitDef {
        kind: UnitKind::Galley,
        data_id: "galley",
        name: "Galley",
        class: UnitClass::Naval,
        attack: 6,
        defense: 6,
        moves: 3,
        production_cost: 35,
        gold_cost: 12,
        tech: Some(Tech::Sailing),
    },
    UnitDef {
        kind: UnitKind::Knight,
        data_id: "knight",
        name: "Knight",
        class: UnitClass::Mounted,
        attack: 18,
        defense: 12,
        moves: 4,
        production_cost: 60,
        gold_cost: 20,
        tech: Some(Tech::Chivalry),
    },
    UnitDef {
        kind: UnitKind::Crossbowman,
        data_id: "crossbowman",
        name: "Crossbowman",
        class: UnitClass::Ranged,
        attack: 15,
        defense: 10,
        moves: 2,
        production_cost: 50,
        gold_cost: 18,
        tech: Some(Tech::Machinery),
    },
    UnitDef {
        kind: UnitKind::Trebuchet,
        data_id: "trebuchet",
        name: "Trebuchet",
        class: UnitClass::Siege,
        attack: 22,
        defense: 6,
        moves: 1,
        production_cost: 60,
        gold_cost: 20,
        tech: Some(Tech::Engineering),
    },
    UnitDef {
        kind: UnitKind::Caravel,
        data_id: "caravel",
        name: "Caravel",
        class: UnitClass::Naval,
        attack: 12,
        defense: 10,
        moves: 4,
        production_cost: 55,
        gold_cost: 20,
        tech: Some(Tech::Navigation),
    },
    UnitDef {
        kind: UnitKind::Musketman,
        data_id: "musketman",
        name: "Musketman",
        class: UnitClass::Melee,
        attack: 20,
        defense: 22,
        moves: 2,
        production_cost: 70,
        gold_cost: 25,
        tech: Some(Tech::Gunpowder),
    },
    UnitDef {
        kind: UnitKind::Cannon,
        data_id: "cannon",
        name: "Cannon",
        class: UnitClass::Siege,
        attack: 30,
        defense: 10,
        moves: 1,
        production_cost: 80,
        gold_cost: 30,
        tech: Some(Tech::Metallurgy),
    },
    UnitDef {
        kind: UnitKind::Ironclad,
        data_id: "ironclad",
        name: "Ironclad",
        class: UnitClass::Naval,
        attack: 30,
        defense: 30,
        moves: 4,
        production_cost: 100,
        gold_cost: 35,
        tech: Some(Tech::Ironclads),
    },
    UnitDef {
        kind: UnitKind::Rifleman,
        data_id: "rifleman",
        name: "Rifleman",
        class: UnitClass::Melee,
        attack: 30,
        defense: 32,
        moves: 2,
        production_cost: 90,
        gold_cost: 30,
        tech: Some(Tech::Rifling),
    },
    UnitDef {
        kind: UnitKind::Artillery,
        data_id: "artillery",
        name: "Artillery",
        class: UnitClass::Siege,
        attack: 45,
        defense: 15,
        moves: 2,
        production_cost: 110,
        gold_cost: 40,
        tech: Some(Tech::Dynamite),
    },
    UnitDef {
        kind: UnitKind::Tank,
        data_id: "tank",
        name: "Tank",
        class: UnitClass::Mounted,
        attack: 60,
        defense: 45,
        moves: 5,
        production_cost: 150,
        gold_cost: 50,
        tech: Some(Tech::Combustion),
    },
];

#[inline]
pub fn unit(kind: UnitKind) -> &'static UnitDef {
    &UNITS[kind as usize]
}

pub fn unit_kind_id(data_id: &str) -> Option<UnitKind> {
    UNITS.iter().find(|u| u.data_id == data_id).map(|u| u.kind)
}

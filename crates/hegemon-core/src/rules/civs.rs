use hegemon_protocol::{Civilization, Tech, Terrain, UnitKind, YieldType};

/// Passive per-turn bonus. With a terrain the amount is granted per
/// territory tile of that terrain, otherwise once per city.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CivBonus {
    pub yield_type: YieldType,
    pub amount: i32,
    pub terrain: Option<Terrain>,
}

#[derive(Debug, Clone)]
pub struct CivDef {
    pub civ: Civilization,
    pub data_id: &'static str,
    pub name: &'static str,
    pub starting_units: &'static [UnitKind],
    /// Granted at game start without checking prerequisites.
    pub starting_techs: &'static [Tech],
    pub bonuses: &'static [CivBonus],
    pub city_names: &'static [&'static str],
}

impl CivDef {
    /// Name for the `nth` city this civilization founds (0-based). Cycles
    /// through the list with a numeric suffix once it runs out.
    pub fn city_name(&self, nth: usize) -> String {
        if self.city_names.is_empty() {
            return format!("{} {}", self.name, nth + 1);
        }
        let base = self.city_names[nth % self.city_names.len()];
        let round = nth / self.city_names.len();
        if round == 0 {
            base.to_string()
        } else {
            format!("{base} {}", round + 1)
        }
    }
}

pub static CIVILIZATIONS: [CivDef; 6] = [
    CivDef {
        civ: Civilization::Rome,
        data_id: "rome",
        name: "Rome",
        starting_units: &[UnitKind::Settler, UnitKind::Warrior, UnitKind::Warrior],
        starting_techs: &[Tech::BronzeWorking],
        bonuses: &[CivBonus {
            yield_type: YieldType::Production,
            amount: 1,
            terrain: None,
        }],
        city_names: &["Roma", "Antium", "Cumae", "Neapolis", "Ravenna", "Arretium"],
    },
    CivDef {
        civ: Civilization::Egypt,
        data_id: "egypt",
        name: "Egypt",
        starting_units: &[UnitKind::Settler, UnitKind::Warrior, UnitKind::Scout],
        starting_techs: &[Tech::Agriculture],
        bonuses: &[
            CivBonus {
                yield_type: YieldType::Food,
                amount: 1,
                terrain: Some(Terrain::Desert),
            },
            CivBonus {
                yield_type: YieldType::Culture,
                amount: 1,
                terrain: None,
            },
        ],
        city_names: &["Thebes", "Memphis", "Heliopolis", "Elephantine", "Giza", "Abydos"],
    },
    CivDef {
        civ: Civilization::Greece,
        data_id: "greece",
        name: "Greece",
        starting_units: &[UnitKind::Settler, UnitKind::Warrior, UnitKind::Scout],
        starting_techs: &[Tech::Mysticism],
        bonuses: &[CivBonus {
            yield_type: YieldType::Culture,
            amount: 2,
            terrain: None,
        }],
        city_names: &["Athens", "Sparta", "Corinth", "Argos", "Knossos", "Delphi"],
    },
    CivDef {
        civ: Civilization::China,
        data_id: "china",
        name: "China",
        starting_units: &[UnitKind::Settler, UnitKind::Warrior, UnitKind::Warrior],
        starting_techs: &[Tech::Writing],
        bonuses: &[CivBonus {
            yield_type: YieldType::Science,
            amount: 1,
            terrain: None,
        }],
        city_names: &["Beijing", "Shanghai", "Guangzhou", "Nanjing", "Xian", "Chengdu"],
    },
    CivDef {
        civ: Civilization::Mongolia,
        data_id: "mongolia",
        name: "Mongolia",
        starting_units: &[UnitKind::Settler, UnitKind::Cavalry],
        starting_techs: &[Tech::AnimalHusbandry, Tech::HorsebackRiding],
        bonuses: &[CivBonus {
            yield_type: YieldType::Gold,
            amount: 1,
            terrain: Some(Terrain::Grassland),
        }],
        city_names: &["Karakorum", "Beshbalik", "Turfan", "Hsia", "Old Sarai", "Almaliq"],
    },
    CivDef {
        civ: Civilization::England,
        data_id: "england",
        name: "England",
        starting_units: &[UnitKind::Settler, UnitKind::Warrior, UnitKind::Warrior],
        starting_techs: &[Tech::Sailing],
        bonuses: &[
            CivBonus {
                yield_type: YieldType::Gold,
                amount: 1,
                terrain: None,
            },
            CivBonus {
                yield_type: YieldType::Production,
                amount: 1,
                terrain: Some(Terrain::Forest),
            },
        ],
        city_names: &["London", "York", "Nottingham", "Hastings", "Canterbury", "Coventry"],
    },
];

#[inline]
pub fn civilization(civ: Civilization) -> &'static CivDef {
    &CIVILIZATIONS[civ as usize]
}

pub fn civilization_id(data_id: &str) -> Option<Civilization> {
    CIVILIZATIONS
        .iter()
        .find(|c| c.data_id == data_id)
        .map(|c| c.civ)
}

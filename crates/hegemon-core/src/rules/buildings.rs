use hegemon_protocol::{BuildingKind, GreatPersonCategory, Tech, WonderKind};

use crate::yields::Yields;

/// Great-person points a completed building or wonder adds to its owner each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GreatPersonPoints {
    pub category: GreatPersonCategory,
    pub points: i32,
}

#[derive(Debug, Clone)]
pub struct BuildingDef {
    pub kind: BuildingKind,
    pub data_id: &'static str,
    pub name: &'static str,
    pub tech: Option<Tech>,
    pub cost: i32,
    pub yields: Yields,
    pub great_person: Option<GreatPersonPoints>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WonderScope {
    /// Bonus applies to the host city only.
    City,
    /// Bonus applies to every city of the owner.
    Empire,
}

#[derive(Debug, Clone)]
pub struct WonderDef {
    pub kind: WonderKind,
    pub data_id: &'static str,
    pub name: &'static str,
    pub tech: Tech,
    pub cost: i32,
    pub scope: WonderScope,
    pub yields: Yields,
    pub great_person: Option<GreatPersonPoints>,
}

pub static BUILDINGS: [BuildingDef; 21] = [
    BuildingDef {
        kind: BuildingKind::Monument,
        data_id: "monument",
        name: "Monument",
        tech: None,
        cost: 30,
        yields: Yields::new(0, 0, 0, 0, 2),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Granary,
        data_id: "granary",
        name: "Granary",
        tech: Some(Tech::Pottery),
        cost: 40,
        yields: Yields::new(2, 0, 0, 0, 0),
        great_person: None,
    },
    BuildingDef {
        kind: BuildingKind::Temple,
        data_id: "temple",
        name: "Temple",
        tech: Some(Tech::Mysticism),
        cost: 40,
        yields: Yields::new(0, 0, 0, 0, 3),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 1,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Barracks,
        data_id: "barracks",
        name: "Barracks",
        tech: Some(Tech::BronzeWorking),
        cost: 40,
        yields: Yields::new(0, 1, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::General,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Library,
        data_id: "library",
        name: "Library",
        tech: Some(Tech::Writing),
        cost: 50,
        yields: Yields::new(0, 0, 0, 3, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Walls,
        data_id: "walls",
        name: "Walls",
        tech: Some(Tech::Masonry),
        cost: 50,
        yields: Yields::new(0, 1, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::General,
            points: 1,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Workshop,
        data_id: "workshop",
        name: "Workshop",
        tech: Some(Tech::Construction),
        cost: 60,
        yields: Yields::new(0, 2, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Engineer,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Market,
        data_id: "market",
        name: "Market",
        tech: Some(Tech::Currency),
        cost: 60,
        yields: Yields::new(0, 0, 3, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Merchant,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Harbor,
        data_id: "harbor",
        name: "Harbor",
        tech: Some(Tech::Sailing),
        cost: 60,
        yields: Yields::new(2, 0, 1, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Merchant,
            points: 1,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Aqueduct,
        data_id: "aqueduct",
        name: "Aqueduct",
        tech: Some(Tech::Engineering),
        cost: 80,
        yields: Yields::new(3, 0, 0, 0, 0),
        great_person: None,
    },
    BuildingDef {
        kind: BuildingKind::Amphitheater,
        data_id: "amphitheater",
        name: "Amphitheater",
        tech: Some(Tech::Construction),
        cost: 70,
        yields: Yields::new(0, 0, 0, 0, 3),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::University,
        data_id: "university",
        name: "University",
        tech: Some(Tech::Education),
        cost: 100,
        yields: Yields::new(0, 0, 0, 4, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 3,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Bank,
        data_id: "bank",
        name: "Bank",
        tech: Some(Tech::Banking),
        cost: 100,
        yields: Yields::new(0, 0, 4, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Merchant,
            points: 3,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Observatory,
        data_id: "observatory",
        name: "Observatory",
        tech: Some(Tech::Astronomy),
        cost: 90,
        yields: Yields::new(0, 0, 0, 3, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Forge,
        data_id: "forge",
        name: "Forge",
        tech: Some(Tech::IronWorking),
        cost: 70,
        yields: Yields::new(0, 2, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Engineer,
            points: 2,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Cathedral,
        data_id: "cathedral",
        name: "Cathedral",
        tech: Some(Tech::Theology),
        cost: 100,
        yields: Yields::new(0, 0, 0, 0, 4),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 3,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Factory,
        data_id: "factory",
        name: "Factory",
        tech: Some(Tech::Industrialization),
        cost: 150,
        yields: Yields::new(0, 5, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Engineer,
            points: 3,
        }),
    },
    BuildingDef {
        kind: BuildingKind::StockExchange,
        data_id: "stock_exchange",
        name: "Stock Exchange",
        tech: Some(Tech::Corporation),
        cost: 150,
        yields: Yields::new(0, 0, 6, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Merchant,
            points: 3,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Museum,
        data_id: "museum",
        name: "Museum",
        tech: Some(Tech::Archaeology),
        cost: 150,
        yields: Yields::new(0, 0, 0, 0, 6),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 4,
        }),
    },
    BuildingDef {
        kind: BuildingKind::Hospital,
        data_id: "hospital",
        name: "Hospital",
        tech: Some(Tech::Sanitation),
        cost: 140,
        yields: Yields::new(4, 0, 0, 0, 0),
        great_person: None,
    },
    BuildingDef {
        kind: BuildingKind::ResearchLab,
        data_id: "research_lab",
        name: "Research Lab",
        tech: Some(Tech::Computers),
        cost: 200,
        yields: Yields::new(0, 0, 0, 8, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 4,
        }),
    },
];

pub static WONDERS: [WonderDef; 16] = [
    WonderDef {
        kind: WonderKind::Pyramids,
        data_id: "pyramids",
        name: "Pyramids",
        tech: Tech::Masonry,
        cost: 150,
        scope: WonderScope::City,
        yields: Yields::new(0, 3, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Engineer,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::HangingGardens,
        data_id: "hanging_gardens",
        name: "Hanging Gardens",
        tech: Tech::Pottery,
        cost: 150,
        scope: WonderScope::Empire,
        yields: Yields::new(1, 0, 0, 0, 0),
        great_person: None,
    },
    WonderDef {
        kind: WonderKind::Colossus,
        data_id: "colossus",
        name: "Colossus",
        tech: Tech::BronzeWorking,
        cost: 140,
        scope: WonderScope::City,
        yields: Yields::new(0, 0, 4, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Merchant,
            points: 2,
        }),
    },
    WonderDef {
        kind: WonderKind::Oracle,
        data_id: "oracle",
        name: "Oracle",
        tech: Tech::Mysticism,
        cost: 140,
        scope: WonderScope::City,
        yields: Yields::new(0, 0, 0, 2, 2),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::GreatLibrary,
        data_id: "great_library",
        name: "Great Library",
        tech: Tech::Writing,
        cost: 180,
        scope: WonderScope::City,
        yields: Yields::new(0, 0, 0, 5, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::GreatWall,
        data_id: "great_wall",
        name: "Great Wall",
        tech: Tech::Construction,
        cost: 180,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 1, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::General,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::MachuPicchu,
        data_id: "machu_picchu",
        name: "Machu Picchu",
        tech: Tech::Currency,
        cost: 200,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 0, 1, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Merchant,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::NotreDame,
        data_id: "notre_dame",
        name: "Notre Dame",
        tech: Tech::Theology,
        cost: 260,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 0, 0, 0, 2),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::LeaningTower,
        data_id: "leaning_tower",
        name: "Leaning Tower",
        tech: Tech::Physics,
        cost: 260,
        scope: WonderScope::City,
        yields: Yields::new(0, 0, 0, 4, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 2,
        }),
    },
    WonderDef {
        kind: WonderKind::SistineChapel,
        data_id: "sistine_chapel",
        name: "Sistine Chapel",
        tech: Tech::Acoustics,
        cost: 280,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 0, 0, 0, 2),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 4,
        }),
    },
    WonderDef {
        kind: WonderKind::PorcelainTower,
        data_id: "porcelain_tower",
        name: "Porcelain Tower",
        tech: Tech::Architecture,
        cost: 280,
        scope: WonderScope::City,
        yields: Yields::new(0, 0, 3, 3, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 2,
        }),
    },
    WonderDef {
        kind: WonderKind::BigBen,
        data_id: "big_ben",
        name: "Big Ben",
        tech: Tech::Economics,
        cost: 300,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 0, 2, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Merchant,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::EiffelTower,
        data_id: "eiffel_tower",
        name: "Eiffel Tower",
        tech: Tech::Industrialization,
        cost: 360,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 0, 0, 0, 3),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 3,
        }),
    },
    WonderDef {
        kind: WonderKind::HooverDam,
        data_id: "hoover_dam",
        name: "Hoover Dam",
        tech: Tech::Electricity,
        cost: 400,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 3, 0, 0, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Engineer,
            points: 4,
        }),
    },
    WonderDef {
        kind: WonderKind::SydneyOperaHouse,
        data_id: "sydney_opera_house",
        name: "Sydney Opera House",
        tech: Tech::MassMedia,
        cost: 420,
        scope: WonderScope::City,
        yields: Yields::new(0, 0, 0, 0, 10),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Artist,
            points: 5,
        }),
    },
    WonderDef {
        kind: WonderKind::ApolloProgram,
        data_id: "apollo_program",
        name: "Apollo Program",
        tech: Tech::Rocketry,
        cost: 500,
        scope: WonderScope::Empire,
        yields: Yields::new(0, 0, 0, 4, 0),
        great_person: Some(GreatPersonPoints {
            category: GreatPersonCategory::Scientist,
            points: 5,
        }),
    },
];

#[inline]
pub fn building(kind: BuildingKind) -> &'static BuildingDef {
    &BUILDINGS[kind as usize]
}

pub fn building_id(data_id: &str) -> Option<BuildingKind> {
    BUILDINGS.iter().find(|b| b.data_id == data_id).map(|b| b.kind)
}

#[inline]
pub fn wonder(kind: WonderKind) -> &'static WonderDef {
    &WONDERS[kind as usize]
}

pub fn wonder_id(data_id: &str) -> Option<WonderKind> {
    WONDERS.iter().find(|w| w.data_id == data_id).map(|w| w.kind)
}

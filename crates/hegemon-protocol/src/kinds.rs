//! Closed catalogue enumerations.
//!
//! Each enum is paired with a static data table in `hegemon-core::rules`;
//! discriminants double as table indices, so variants are only ever appended.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Ocean,
    Plains,
    Grassland,
    Desert,
    Tundra,
    Snow,
    Forest,
    Jungle,
    Hills,
    Mountains,
}

impl Terrain {
    pub const ALL: [Terrain; 10] = [
        Terrain::Ocean,
        Terrain::Plains,
        Terrain::Grassland,
        Terrain::Desert,
        Terrain::Tundra,
        Terrain::Snow,
        Terrain::Forest,
        Terrain::Jungle,
        Terrain::Hills,
        Terrain::Mountains,
    ];

    /// Ocean and mountains never hold cities, territory claims or land units.
    #[inline]
    pub fn is_settleable(self) -> bool {
        !matches!(self, Terrain::Ocean | Terrain::Mountains)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategicResource {
    Horses,
    Iron,
    Coal,
    Oil,
    Niter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldType {
    Food,
    Production,
    Gold,
    Science,
    Culture,
}

impl YieldType {
    pub const ALL: [YieldType; 5] = [
        YieldType::Food,
        YieldType::Production,
        YieldType::Gold,
        YieldType::Science,
        YieldType::Culture,
    ];
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    #[default]
    Antiquity,
    Medieval,
    Modern,
}

impl Era {
    pub fn next(self) -> Option<Era> {
        match self {
            Era::Antiquity => Some(Era::Medieval),
            Era::Medieval => Some(Era::Modern),
            Era::Modern => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechBranch {
    Economy,
    Military,
    Infrastructure,
    Science,
    Culture,
    Naval,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tech {
    // Antiquity
    Agriculture,
    Pottery,
    AnimalHusbandry,
    Mining,
    Archery,
    Sailing,
    Writing,
    Masonry,
    BronzeWorking,
    TheWheel,
    HorsebackRiding,
    Calendar,
    Mysticism,
    IronWorking,
    Mathematics,
    Currency,
    Optics,
    Philosophy,
    Construction,
    Monarchy,
    // Medieval
    Feudalism,
    Chivalry,
    Engineering,
    Machinery,
    Guilds,
    Banking,
    Education,
    Astronomy,
    Theology,
    CivilService,
    Compass,
    Navigation,
    Physics,
    Steel,
    PrintingPress,
    Gunpowder,
    Economics,
    Architecture,
    Acoustics,
    Medicine,
    // Modern
    ScientificMethod,
    Metallurgy,
    Industrialization,
    SteamPower,
    Railroad,
    Electricity,
    Rifling,
    Dynamite,
    Corporation,
    Refining,
    Ironclads,
    Radio,
    Combustion,
    Flight,
    Electronics,
    Archaeology,
    Sanitation,
    MassMedia,
    Computers,
    Rocketry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Settler,
    Scout,
    Warrior,
    Archer,
    Spearman,
    Swordsman,
    Cavalry,
    Catapult,
    Galley,
    Knight,
    Crossbowman,
    Trebuchet,
    Caravel,
    Musketman,
    Cannon,
    Ironclad,
    Rifleman,
    Artillery,
    Tank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Monument,
    Granary,
    Temple,
    Barracks,
    Library,
    Walls,
    Workshop,
    Market,
    Harbor,
    Aqueduct,
    Amphitheater,
    University,
    Bank,
    Observatory,
    Forge,
    Cathedral,
    Factory,
    StockExchange,
    Museum,
    Hospital,
    ResearchLab,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WonderKind {
    Pyramids,
    HangingGardens,
    Colossus,
    Oracle,
    GreatLibrary,
    GreatWall,
    MachuPicchu,
    NotreDame,
    LeaningTower,
    SistineChapel,
    PorcelainTower,
    BigBen,
    EiffelTower,
    HooverDam,
    SydneyOperaHouse,
    ApolloProgram,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Civilization {
    Rome,
    Egypt,
    Greece,
    China,
    Mongolia,
    England,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreatPersonCategory {
    Scientist,
    Engineer,
    Merchant,
    Artist,
    General,
}

impl GreatPersonCategory {
    pub const ALL: [GreatPersonCategory; 5] = [
        GreatPersonCategory::Scientist,
        GreatPersonCategory::Engineer,
        GreatPersonCategory::Merchant,
        GreatPersonCategory::Artist,
        GreatPersonCategory::General,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldEventKind {
    BountifulHarvest,
    GoldVein,
    Plague,
    Earthquake,
    ScientificBreakthrough,
    CulturalRenaissance,
    TradeBoom,
    Drought,
    Inspiration,
}

/// Something a city can construct over several turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Project {
    Building(BuildingKind),
    Wonder(WonderKind),
}

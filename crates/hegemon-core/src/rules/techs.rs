use hegemon_protocol::{Era, Tech, TechBranch};

use super::{buildings::BUILDINGS, buildings::WONDERS, units::UNITS};

#[derive(Debug, Clone)]
pub struct TechDef {
    pub tech: Tech,
    pub data_id: &'static str,
    pub name: &'static str,
    pub era: Era,
    pub branch: TechBranch,
    /// Base cost; research needs `cost * RESEARCH_COST_MULTIPLIER` progress.
    pub cost: i32,
    pub prerequisites: &'static [Tech],
}

pub const RESEARCH_COST_MULTIPLIER: i32 = 2;

impl TechDef {
    pub fn required_progress(&self) -> i32 {
        (self.cost * RESEARCH_COST_MULTIPLIER).max(1)
    }
}

pub static TECHS: [TechDef; 60] = [
    // Antiquity
    TechDef {
        tech: Tech::Agriculture,
        data_id: "agriculture",
        name: "Agriculture",
        era: Era::Antiquity,
        branch: TechBranch::Economy,
        cost: 20,
        prerequisites: &[],
    },
    TechDef {
        tech: Tech::Pottery,
        data_id: "pottery",
        name: "Pottery",
        era: Era::Antiquity,
        branch: TechBranch::Infrastructure,
        cost: 25,
        prerequisites: &[Tech::Agriculture],
    },
    TechDef {
        tech: Tech::AnimalHusbandry,
        data_id: "animal_husbandry",
        name: "Animal Husbandry",
        era: Era::Antiquity,
        branch: TechBranch::Economy,
        cost: 25,
        prerequisites: &[Tech::Agriculture],
    },
    TechDef {
        tech: Tech::Mining,
        data_id: "mining",
        name: "Mining",
        era: Era::Antiquity,
        branch: TechBranch::Infrastructure,
        cost: 20,
        prerequisites: &[],
    },
    TechDef {
        tech: Tech::Archery,
        data_id: "archery",
        name: "Archery",
        era: Era::Antiquity,
        branch: TechBranch::Military,
        cost: 25,
        prerequisites: &[],
    },
    TechDef {
        tech: Tech::Sailing,
        data_id: "sailing",
        name: "Sailing",
        era: Era::Antiquity,
        branch: TechBranch::Naval,
        cost: 30,
        prerequisites: &[Tech::Pottery],
    },
    TechDef {
        tech: Tech::Writing,
        data_id: "writing",
        name: "Writing",
        era: Era::Antiquity,
        branch: TechBranch::Science,
        cost: 30,
        prerequisites: &[Tech::Pottery],
    },
    TechDef {
        tech: Tech::Masonry,
        data_id: "masonry",
        name: "Masonry",
        era: Era::Antiquity,
        branch: TechBranch::Infrastructure,
        cost: 30,
        prerequisites: &[Tech::Mining],
    },
    TechDef {
        tech: Tech::BronzeWorking,
        data_id: "bronze_working",
        name: "Bronze Working",
        era: Era::Antiquity,
        branch: TechBranch::Military,
        cost: 30,
        prerequisites: &[Tech::Mining],
    },
    TechDef {
        tech: Tech::TheWheel,
        data_id: "the_wheel",
        name: "The Wheel",
        era: Era::Antiquity,
        branch: TechBranch::Infrastructure,
        cost: 35,
        prerequisites: &[Tech::AnimalHusbandry],
    },
    TechDef {
        tech: Tech::HorsebackRiding,
        data_id: "horseback_riding",
        name: "Horseback Riding",
        era: Era::Antiquity,
        branch: TechBranch::Military,
        cost: 35,
        prerequisites: &[Tech::AnimalHusbandry],
    },
    TechDef {
        tech: Tech::Calendar,
        data_id: "calendar",
        name: "Calendar",
        era: Era::Antiquity,
        branch: TechBranch::Economy,
        cost: 35,
        prerequisites: &[Tech::Pottery],
    },
    TechDef {
        tech: Tech::Mysticism,
        data_id: "mysticism",
        name: "Mysticism",
        era: Era::Antiquity,
        branch: TechBranch::Culture,
        cost: 25,
        prerequisites: &[],
    },
    TechDef {
        tech: Tech::IronWorking,
        data_id: "iron_working",
        name: "Iron Working",
        era: Era::Antiquity,
        branch: TechBranch::Military,
        cost: 40,
        prerequisites: &[Tech::BronzeWorking],
    },
    TechDef {
        tech: Tech::Mathematics,
        data_id: "mathematics",
        name: "Mathematics",
        era: Era::Antiquity,
        branch: TechBranch::Science,
        cost: 45,
        prerequisites: &[Tech::Writing, Tech::TheWheel],
    },
    TechDef {
        tech: Tech::Currency,
        data_id: "currency",
        name: "Currency",
        era: Era::Antiquity,
        branch: TechBranch::Economy,
        cost: 40,
        prerequisites: &[Tech::BronzeWorking],
    },
    TechDef {
        tech: Tech::Optics,
        data_id: "optics",
        name: "Optics",
        era: Era::Antiquity,
        branch: TechBranch::Naval,
        cost: 40,
        prerequisites: &[Tech::Sailing],
    },
    TechDef {
        tech: Tech::Philosophy,
        data_id: "philosophy",
        name: "Philosophy",
        era: Era::Antiquity,
        branch: TechBranch::Culture,
        cost: 50,
        prerequisites: &[Tech::Mysticism, Tech::Writing],
    },
    TechDef {
        tech: Tech::Construction,
        data_id: "construction",
        name: "Construction",
        era: Era::Antiquity,
        branch: TechBranch::Infrastructure,
        cost: 50,
        prerequisites: &[Tech::Masonry, Tech::TheWheel],
    },
    TechDef {
        tech: Tech::Monarchy,
        data_id: "monarchy",
        name: "Monarchy",
        era: Era::Antiquity,
        branch: TechBranch::Culture,
        cost: 45,
        prerequisites: &[Tech::Mysticism],
    },
    // Medieval
    TechDef {
        tech: Tech::Feudalism,
        data_id: "feudalism",
        name: "Feudalism",
        era: Era::Medieval,
        branch: TechBranch::Military,
        cost: 60,
        prerequisites: &[Tech::Monarchy],
    },
    TechDef {
        tech: Tech::Chivalry,
        data_id: "chivalry",
        name: "Chivalry",
        era: Era::Medieval,
        branch: TechBranch::Military,
        cost: 75,
        prerequisites: &[Tech::Feudalism, Tech::HorsebackRiding],
    },
    TechDef {
        tech: Tech::Engineering,
        data_id: "engineering",
        name: "Engineering",
        era: Era::Medieval,
        branch: TechBranch::Infrastructure,
        cost: 65,
        prerequisites: &[Tech::Construction],
    },
    TechDef {
        tech: Tech::Machinery,
        data_id: "machinery",
        name: "Machinery",
        era: Era::Medieval,
        branch: TechBranch::Military,
        cost: 75,
        prerequisites: &[Tech::Engineering, Tech::IronWorking],
    },
    TechDef {
        tech: Tech::Guilds,
        data_id: "guilds",
        name: "Guilds",
        era: Era::Medieval,
        branch: TechBranch::Economy,
        cost: 65,
        prerequisites: &[Tech::Currency],
    },
    TechDef {
        tech: Tech::Banking,
        data_id: "banking",
        name: "Banking",
        era: Era::Medieval,
        branch: TechBranch::Economy,
        cost: 80,
        prerequisites: &[Tech::Guilds],
    },
    TechDef {
        tech: Tech::Education,
        data_id: "education",
        name: "Education",
        era: Era::Medieval,
        branch: TechBranch::Science,
        cost: 70,
        prerequisites: &[Tech::Philosophy],
    },
    TechDef {
        tech: Tech::Astronomy,
        data_id: "astronomy",
        name: "Astronomy",
        era: Era::Medieval,
        branch: TechBranch::Science,
        cost: 80,
        prerequisites: &[Tech::Mathematics, Tech::Optics],
    },
    TechDef {
        tech: Tech::Theology,
        data_id: "theology",
        name: "Theology",
        era: Era::Medieval,
        branch: TechBranch::Culture,
        cost: 70,
        prerequisites: &[Tech::Philosophy],
    },
    TechDef {
        tech: Tech::CivilService,
        data_id: "civil_service",
        name: "Civil Service",
        era: Era::Medieval,
        branch: TechBranch::Infrastructure,
        cost: 75,
        prerequisites: &[Tech::Monarchy, Tech::Philosophy],
    },
    TechDef {
        tech: Tech::Compass,
        data_id: "compass",
        name: "Compass",
        era: Era::Medieval,
        branch: TechBranch::Naval,
        cost: 65,
        prerequisites: &[Tech::Optics],
    },
    TechDef {
        tech: Tech::Navigation,
        data_id: "navigation",
        name: "Navigation",
        era: Era::Medieval,
        branch: TechBranch::Naval,
        cost: 90,
        prerequisites: &[Tech::Compass, Tech::Astronomy],
    },
    TechDef {
        tech: Tech::Physics,
        data_id: "physics",
        name: "Physics",
        era: Era::Medieval,
        branch: TechBranch::Science,
        cost: 90,
        prerequisites: &[Tech::Astronomy],
    },
    TechDef {
        tech: Tech::Steel,
        data_id: "steel",
        name: "Steel",
        era: Era::Medieval,
        branch: TechBranch::Military,
        cost: 90,
        prerequisites: &[Tech::Machinery],
    },
    TechDef {
        tech: Tech::PrintingPress,
        data_id: "printing_press",
        name: "Printing Press",
        era: Era::Medieval,
        branch: TechBranch::Culture,
        cost: 85,
        prerequisites: &[Tech::Theology, Tech::Education],
    },
    TechDef {
        tech: Tech::Gunpowder,
        data_id: "gunpowder",
        name: "Gunpowder",
        era: Era::Medieval,
        branch: TechBranch::Military,
        cost: 100,
        prerequisites: &[Tech::Steel, Tech::Physics],
    },
    TechDef {
        tech: Tech::Economics,
        data_id: "economics",
        name: "Economics",
        era: Era::Medieval,
        branch: TechBranch::Economy,
        cost: 95,
        prerequisites: &[Tech::Banking],
    },
    TechDef {
        tech: Tech::Architecture,
        data_id: "architecture",
        name: "Architecture",
        era: Era::Medieval,
        branch: TechBranch::Infrastructure,
        cost: 95,
        prerequisites: &[Tech::Engineering],
    },
    TechDef {
        tech: Tech::Acoustics,
        data_id: "acoustics",
        name: "Acoustics",
        era: Era::Medieval,
        branch: TechBranch::Culture,
        cost: 90,
        prerequisites: &[Tech::Theology],
    },
    TechDef {
        tech: Tech::Medicine,
        data_id: "medicine",
        name: "Medicine",
        era: Era::Medieval,
        branch: TechBranch::Science,
        cost: 100,
        prerequisites: &[Tech::Education],
    },
    // Modern
    TechDef {
        tech: Tech::ScientificMethod,
        data_id: "scientific_method",
        name: "Scientific Method",
        era: Era::Modern,
        branch: TechBranch::Science,
        cost: 130,
        prerequisites: &[Tech::Physics, Tech::Medicine],
    },
    TechDef {
        tech: Tech::Metallurgy,
        data_id: "metallurgy",
        name: "Metallurgy",
        era: Era::Modern,
        branch: TechBranch::Military,
        cost: 130,
        prerequisites: &[Tech::Gunpowder],
    },
    TechDef {
        tech: Tech::Industrialization,
        data_id: "industrialization",
        name: "Industrialization",
        era: Era::Modern,
        branch: TechBranch::Infrastructure,
        cost: 140,
        prerequisites: &[Tech::Economics, Tech::Steel],
    },
    TechDef {
        tech: Tech::SteamPower,
        data_id: "steam_power",
        name: "Steam Power",
        era: Era::Modern,
        branch: TechBranch::Infrastructure,
        cost: 150,
        prerequisites: &[Tech::Industrialization],
    },
    TechDef {
        tech: Tech::Railroad,
        data_id: "railroad",
        name: "Railroad",
        era: Era::Modern,
        branch: TechBranch::Infrastructure,
        cost: 165,
        prerequisites: &[Tech::SteamPower],
    },
    TechDef {
        tech: Tech::Electricity,
        data_id: "electricity",
        name: "Electricity",
        era: Era::Modern,
        branch: TechBranch::Science,
        cost: 160,
        prerequisites: &[Tech::ScientificMethod],
    },
    TechDef {
        tech: Tech::Rifling,
        data_id: "rifling",
        name: "Rifling",
        era: Era::Modern,
        branch: TechBranch::Military,
        cost: 150,
        prerequisites: &[Tech::Metallurgy],
    },
    TechDef {
        tech: Tech::Dynamite,
        data_id: "dynamite",
        name: "Dynamite",
        era: Era::Modern,
        branch: TechBranch::Military,
        cost: 170,
        prerequisites: &[Tech::Rifling, Tech::ScientificMethod],
    },
    TechDef {
        tech: Tech::Corporation,
        data_id: "corporation",
        name: "Corporation",
        era: Era::Modern,
        branch: TechBranch::Economy,
        cost: 165,
        prerequisites: &[Tech::Industrialization],
    },
    TechDef {
        tech: Tech::Refining,
        data_id: "refining",
        name: "Refining",
        era: Era::Modern,
        branch: TechBranch::Economy,
        cost: 180,
        prerequisites: &[Tech::Corporation],
    },
    TechDef {
        tech: Tech::Ironclads,
        data_id: "ironclads",
        name: "Ironclads",
        era: Era::Modern,
        branch: TechBranch::Naval,
        cost: 160,
        prerequisites: &[Tech::SteamPower, Tech::Navigation],
    },
    TechDef {
        tech: Tech::Radio,
        data_id: "radio",
        name: "Radio",
        era: Era::Modern,
        branch: TechBranch::Culture,
        cost: 180,
        prerequisites: &[Tech::Electricity],
    },
    TechDef {
        tech: Tech::Combustion,
        data_id: "combustion",
        name: "Combustion",
        era: Era::Modern,
        branch: TechBranch::Military,
        cost: 195,
        prerequisites: &[Tech::Refining, Tech::Dynamite],
    },
    TechDef {
        tech: Tech::Flight,
        data_id: "flight",
        name: "Flight",
        era: Era::Modern,
        branch: TechBranch::Military,
        cost: 210,
        prerequisites: &[Tech::Combustion],
    },
    TechDef {
        tech: Tech::Electronics,
        data_id: "electronics",
        name: "Electronics",
        era: Era::Modern,
        branch: TechBranch::Science,
        cost: 190,
        prerequisites: &[Tech::Electricity],
    },
    TechDef {
        tech: Tech::Archaeology,
        data_id: "archaeology",
        name: "Archaeology",
        era: Era::Modern,
        branch: TechBranch::Culture,
        cost: 150,
        prerequisites: &[Tech::PrintingPress, Tech::ScientificMethod],
    },
    TechDef {
        tech: Tech::Sanitation,
        data_id: "sanitation",
        name: "Sanitation",
        era: Era::Modern,
        branch: TechBranch::Infrastructure,
        cost: 175,
        prerequisites: &[Tech::Medicine, Tech::Railroad],
    },
    TechDef {
        tech: Tech::MassMedia,
        data_id: "mass_media",
        name: "Mass Media",
        era: Era::Modern,
        branch: TechBranch::Culture,
        cost: 200,
        prerequisites: &[Tech::Radio],
    },
    TechDef {
        tech: Tech::Computers,
        data_id: "computers",
        name: "Computers",
        era: Era::Modern,
        branch: TechBranch::Science,
        cost: 220,
        prerequisites: &[Tech::Electronics],
    },
    TechDef {
        tech: Tech::Rocketry,
        data_id: "rocketry",
        name: "Rocketry",
        era: Era::Modern,
        branch: TechBranch::Science,
        cost: 240,
        prerequisites: &[Tech::Computers, Tech::Flight],
    },
];

#[inline]
pub fn tech(tech: Tech) -> &'static TechDef {
    &TECHS[tech as usize]
}

pub fn tech_id(data_id: &str) -> Option<Tech> {
    TECHS.iter().find(|t| t.data_id == data_id).map(|t| t.tech)
}

pub fn all_techs() -> impl Iterator<Item = Tech> {
    TECHS.iter().map(|t| t.tech)
}

/// Number of units, buildings, wonders and follow-up technologies that
/// list `target` as a requirement.
pub fn unlock_count(target: Tech) -> usize {
    let units = UNITS.iter().filter(|u| u.tech == Some(target)).count();
    let buildings = BUILDINGS.iter().filter(|b| b.tech == Some(target)).count();
    let wonders = WONDERS.iter().filter(|w| w.tech == target).count();
    let techs = TECHS
        .iter()
        .filter(|t| t.prerequisites.contains(&target))
        .count();
    units + buildings + wonders + techs
}

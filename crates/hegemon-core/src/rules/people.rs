use hegemon_protocol::{GreatPersonCategory, GreatPersonId};

/// Points needed in one category before a great person is born.
pub const GREAT_PERSON_THRESHOLD: i32 = 100;

#[derive(Debug, Clone)]
pub struct GreatPersonDef {
    pub id: GreatPersonId,
    pub data_id: &'static str,
    pub name: &'static str,
    pub category: GreatPersonCategory,
    /// Magnitude of the one-time ability: research progress, construction
    /// progress, gold, culture or health restored, depending on category.
    pub power: i32,
}

pub static GREAT_PEOPLE: [GreatPersonDef; 20] = [
    GreatPersonDef {
        id: GreatPersonId(0),
        data_id: "archimedes",
        name: "Archimedes",
        category: GreatPersonCategory::Scientist,
        power: 120,
    },
    GreatPersonDef {
        id: GreatPersonId(1),
        data_id: "hypatia",
        name: "Hypatia",
        category: GreatPersonCategory::Scientist,
        power: 120,
    },
    GreatPersonDef {
        id: GreatPersonId(2),
        data_id: "galileo",
        name: "Galileo Galilei",
        category: GreatPersonCategory::Scientist,
        power: 120,
    },
    GreatPersonDef {
        id: GreatPersonId(3),
        data_id: "newton",
        name: "Isaac Newton",
        category: GreatPersonCategory::Scientist,
        power: 120,
    },
    GreatPersonDef {
        id: GreatPersonId(4),
        data_id: "imhotep",
        name: "Imhotep",
        category: GreatPersonCategory::Engineer,
        power: 150,
    },
    GreatPersonDef {
        id: GreatPersonId(5),
        data_id: "da_vinci",
        name: "Leonardo da Vinci",
        category: GreatPersonCategory::Engineer,
        power: 150,
    },
    GreatPersonDef {
        id: GreatPersonId(6),
        data_id: "brunel",
        name: "Isambard Brunel",
        category: GreatPersonCategory::Engineer,
        power: 150,
    },
    GreatPersonDef {
        id: GreatPersonId(7),
        data_id: "eiffel",
        name: "Gustave Eiffel",
        category: GreatPersonCategory::Engineer,
        power: 150,
    },
    GreatPersonDef {
        id: GreatPersonId(8),
        data_id: "marco_polo",
        name: "Marco Polo",
        category: GreatPersonCategory::Merchant,
        power: 200,
    },
    GreatPersonDef {
        id: GreatPersonId(9),
        data_id: "zheng_he",
        name: "Zheng He",
        category: GreatPersonCategory::Merchant,
        power: 200,
    },
    GreatPersonDef {
        id: GreatPersonId(10),
        data_id: "fugger",
        name: "Jakob Fugger",
        category: GreatPersonCategory::Merchant,
        power: 200,
    },
    GreatPersonDef {
        id: GreatPersonId(11),
        data_id: "adam_smith",
        name: "Adam Smith",
        category: GreatPersonCategory::Merchant,
        power: 200,
    },
    GreatPersonDef {
        id: GreatPersonId(12),
        data_id: "homer",
        name: "Homer",
        category: GreatPersonCategory::Artist,
        power: 300,
    },
    GreatPersonDef {
        id: GreatPersonId(13),
        data_id: "michelangelo",
        name: "Michelangelo",
        category: GreatPersonCategory::Artist,
        power: 300,
    },
    GreatPersonDef {
        id: GreatPersonId(14),
        data_id: "shakespeare",
        name: "William Shakespeare",
        category: GreatPersonCategory::Artist,
        power: 300,
    },
    GreatPersonDef {
        id: GreatPersonId(15),
        data_id: "beethoven",
        name: "Ludwig van Beethoven",
        category: GreatPersonCategory::Artist,
        power: 300,
    },
    GreatPersonDef {
        id: GreatPersonId(16),
        data_id: "sun_tzu",
        name: "Sun Tzu",
        category: GreatPersonCategory::General,
        power: 100,
    },
    GreatPersonDef {
        id: GreatPersonId(17),
        data_id: "hannibal",
        name: "Hannibal Barca",
        category: GreatPersonCategory::General,
        power: 100,
    },
    GreatPersonDef {
        id: GreatPersonId(18),
        data_id: "genghis_khan",
        name: "Genghis Khan",
        category: GreatPersonCategory::General,
        power: 100,
    },
    GreatPersonDef {
        id: GreatPersonId(19),
        data_id: "napoleon",
        name: "Napoleon Bonaparte",
        category: GreatPersonCategory::General,
        power: 100,
    },
];

pub fn great_person(id: GreatPersonId) -> Option<&'static GreatPersonDef> {
    GREAT_PEOPLE.get(id.0 as usize)
}

pub fn great_people_in(
    category: GreatPersonCategory,
) -> impl Iterator<Item = &'static GreatPersonDef> {
    GREAT_PEOPLE.iter().filter(move |p| p.category == category)
}

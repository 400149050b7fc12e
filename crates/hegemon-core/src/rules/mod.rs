//! Static rule tables.
//!
//! Every catalogue enum from `hegemon_protocol` maps to one `&'static` row
//! here; the enum discriminant is the row index. Unknown identifiers are
//! rejected when parsing data ids, never at lookup time.

mod buildings;
mod civs;
mod people;
mod techs;
mod terrain;
mod units;

pub use buildings::*;
pub use civs::*;
pub use people::*;
pub use techs::*;
pub use terrain::*;
pub use units::*;

/// Movement costs are tracked in half-points so fractional costs stay exact.
pub const MOVE_SCALE: i32 = 2;

#[cfg(test)]
mod tests {
    use super::*;
    use hegemon_protocol::{
        BuildingKind, Civilization, Era, GreatPersonCategory, Tech, Terrain, UnitKind, WonderKind,
    };

    #[test]
    fn tables_are_indexed_by_discriminant() {
        for (i, row) in TERRAINS.iter().enumerate() {
            assert_eq!(row.kind as usize, i, "terrain row {}", row.data_id);
        }
        for (i, row) in TECHS.iter().enumerate() {
            assert_eq!(row.tech as usize, i, "tech row {}", row.data_id);
        }
        for (i, row) in UNITS.iter().enumerate() {
            assert_eq!(row.kind as usize, i, "unit row {}", row.data_id);
        }
        for (i, row) in BUILDINGS.iter().enumerate() {
            assert_eq!(row.kind as usize, i, "building row {}", row.data_id);
        }
        for (i, row) in WONDERS.iter().enumerate() {
            assert_eq!(row.kind as usize, i, "wonder row {}", row.data_id);
        }
        for (i, row) in CIVILIZATIONS.iter().enumerate() {
            assert_eq!(row.civ as usize, i, "civ row {}", row.data_id);
        }
    }

    #[test]
    fn data_id_lookup_rejects_unknown_ids() {
        assert_eq!(terrain_id("plains"), Some(Terrain::Plains));
        assert_eq!(tech_id("bronze_working"), Some(Tech::BronzeWorking));
        assert_eq!(unit_kind_id("cavalry"), Some(UnitKind::Cavalry));
        assert_eq!(building_id("library"), Some(BuildingKind::Library));
        assert_eq!(wonder_id("great_library"), Some(WonderKind::GreatLibrary));
        assert_eq!(civilization_id("egypt"), Some(Civilization::Egypt));
        assert_eq!(tech_id("warp_drive"), None);
        assert_eq!(unit_kind_id(""), None);
    }

    #[test]
    fn prerequisites_never_come_from_a_later_era() {
        for row in TECHS.iter() {
            for prereq in row.prerequisites {
                assert!(tech(*prereq).era <= row.era, "{} -> {:?}", row.data_id, prereq);
                assert!((*prereq as usize) < (row.tech as usize), "{} ordering", row.data_id);
            }
        }
    }

    #[test]
    fn catalogue_has_sixty_technologies() {
        assert_eq!(TECHS.len(), 60);
        for era in [Era::Antiquity, Era::Medieval, Era::Modern] {
            assert_eq!(TECHS.iter().filter(|t| t.era == era).count(), 20);
        }
    }

    #[test]
    fn great_person_ids_match_rows() {
        for (i, row) in GREAT_PEOPLE.iter().enumerate() {
            assert_eq!(row.id.0 as usize, i);
        }
        assert_eq!(great_people_in(GreatPersonCategory::Artist).count(), 4);
    }

    #[test]
    fn unlock_count_includes_follow_up_techs() {
        // Writing unlocks the library, the great library and several techs.
        assert!(unlock_count(Tech::Writing) >= 4);
    }
}

use thiserror::Error;

use crate::{
    map::Tile,
    rules::{terrain, RIVER_DEFENSE_BONUS_PCT, UNIT_MAX_HEALTH},
    unit::Unit,
};

/// Damage pool for the defender's losses.
pub const ATTACK_DAMAGE_POOL: f64 = 50.0;
/// Damage pool for the counterattack.
pub const COUNTER_DAMAGE_POOL: f64 = 30.0;
pub const MIN_DAMAGE: i32 = 5;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("cannot attack your own unit")]
    SameOwner,
    #[error("target is {distance} tiles away, range is {range}")]
    OutOfRange { distance: i32, range: i32 },
    #[error("unit cannot attack")]
    NotACombatUnit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatOutcome {
    pub attacker_strength: f64,
    pub defender_strength: f64,
    pub attacker_damage: i32,
    pub defender_damage: i32,
    pub attacker_destroyed: bool,
    pub defender_destroyed: bool,
}

fn health_factor(unit: &Unit) -> f64 {
    unit.health.max(0) as f64 / UNIT_MAX_HEALTH as f64
}

/// Base attack scaled by the attacker's own tile and its health.
pub fn attack_strength(attacker: &Unit, attacker_tile: &Tile) -> f64 {
    let bonus = terrain(attacker_tile.terrain).attack_bonus_pct as f64 / 100.0;
    attacker.attack as f64 * (1.0 + bonus) * health_factor(attacker)
}

/// Base defense scaled by the defender's tile (terrain plus river) and health.
pub fn defense_strength(defender: &Unit, defender_tile: &Tile) -> f64 {
    let mut pct = terrain(defender_tile.terrain).defense_bonus_pct;
    if defender_tile.river {
        pct += RIVER_DEFENSE_BONUS_PCT;
    }
    defender.defense as f64 * (1.0 + pct as f64 / 100.0) * health_factor(defender)
}

/// Damage dealt to (defender, attacker) for the given effective strengths.
pub fn damage_split(attacker_strength: f64, defender_strength: f64) -> (i32, i32) {
    let total = attacker_strength + defender_strength;
    if total <= 0.0 {
        return (MIN_DAMAGE, MIN_DAMAGE);
    }
    let to_defender = (ATTACK_DAMAGE_POOL * attacker_strength / total).floor() as i32;
    let to_attacker = (COUNTER_DAMAGE_POOL * defender_strength / total).floor() as i32;
    (to_defender.max(MIN_DAMAGE), to_attacker.max(MIN_DAMAGE))
}

/// Legality of an engagement, independent of board state.
pub fn check_engagement(attacker: &Unit, defender: &Unit) -> Result<(), CombatError> {
    if attacker.owner == defender.owner {
        return Err(CombatError::SameOwner);
    }
    if !attacker.is_military() || attacker.attack <= 0 {
        return Err(CombatError::NotACombatUnit);
    }
    let distance = attacker.pos.manhattan(defender.pos);
    let range = attacker.class().attack_range();
    if distance < 1 || distance > range {
        return Err(CombatError::OutOfRange { distance, range });
    }
    Ok(())
}

/// Outcome of a fight without applying it.
pub fn predict_combat(
    attacker: &Unit,
    attacker_tile: &Tile,
    defender: &Unit,
    defender_tile: &Tile,
) -> CombatOutcome {
    let attacker_strength = attack_strength(attacker, attacker_tile);
    let defender_strength = defense_strength(defender, defender_tile);
    let (defender_damage, attacker_damage) = damage_split(attacker_strength, defender_strength);
    CombatOutcome {
        attacker_strength,
        defender_strength,
        attacker_damage,
        defender_damage,
        attacker_destroyed: attacker.health - attacker_damage <= 0,
        defender_destroyed: defender.health - defender_damage <= 0,
    }
}

/// Check legality, then apply damage to both participants.
pub fn resolve_combat(
    attacker: &mut Unit,
    attacker_tile: &Tile,
    defender: &mut Unit,
    defender_tile: &Tile,
) -> Result<CombatOutcome, CombatError> {
    check_engagement(attacker, defender)?;
    let outcome = predict_combat(attacker, attacker_tile, defender, defender_tile);
    attacker.health -= outcome.attacker_damage;
    defender.health -= outcome.defender_damage;
    Ok(outcome)
}

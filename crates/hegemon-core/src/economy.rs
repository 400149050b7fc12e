//! Per-player economic update: city output, construction, growth,
//! territory occupation, research and pool transfers.

use std::cmp::Reverse;

use tracing::{debug, info};

use hegemon_protocol::{
    CityId, Event, GreatPersonCategory, PlayerId, Project, Severity, TradeAgreement, TradeBundle,
    YieldType,
};

use crate::{
    progression::{EventEffect, GreatPersonDraw},
    rules::{building, civilization, great_person, tech, wonder, WonderScope},
    state::WorldState,
    yields::Yields,
};

/// Growth is checked on turns divisible by this.
pub const GROWTH_INTERVAL: u32 = 10;
pub const GROWTH_FOOD_THRESHOLD: i32 = 3;
/// Every multiple of this population claims one more tile.
pub const EXPANSION_POPULATION_STEP: u32 = 3;
pub const OCCUPATION_RATE: i32 = 2;
pub const OCCUPATION_THRESHOLD: i32 = 3;
pub const OCCUPATION_CITY_RADIUS: i32 = 5;

/// Total per-turn output of a city.
pub fn city_output(state: &WorldState, city_id: CityId) -> Yields {
    let Some(city) = state.cities.get(city_id) else {
        return Yields::ZERO;
    };
    let mut out = city.production;
    if city.is_capital {
        // Capital bonus applies to the production table only.
        out += city.production.half();
    }
    for b in &city.buildings {
        out += building(*b).yields;
    }
    for built in state.wonders.owned_by(city.owner) {
        let def = wonder(built.wonder);
        match def.scope {
            WonderScope::City if built.city == city_id => out += def.yields,
            WonderScope::City => {}
            WonderScope::Empire => out += def.yields,
        }
    }
    if let Some(player) = state.player(city.owner) {
        for bonus in civilization(player.civ).bonuses {
            let times = match bonus.terrain {
                Some(terrain) => city
                    .territory
                    .iter()
                    .filter_map(|&i| state.map.tile_at_index(i as usize))
                    .filter(|t| t.terrain == terrain)
                    .count() as i32,
                None => 1,
            };
            *out.get_mut(bonus.yield_type) += bonus.amount * times;
        }
    }
    out
}

pub fn player_output(state: &WorldState, player: PlayerId) -> Yields {
    let ids: Vec<CityId> = state.cities_of(player).map(|(id, _)| id).collect();
    ids.into_iter()
        .fold(Yields::ZERO, |acc, id| acc + city_output(state, id))
}

/// Great-person points a city adds each turn from its buildings and hosted wonders.
fn city_great_person_points(state: &WorldState, city_id: CityId) -> [i32; 5] {
    let mut points = [0; 5];
    let Some(city) = state.cities.get(city_id) else {
        return points;
    };
    let building_points = city.buildings.iter().filter_map(|b| building(*b).great_person);
    let wonder_points = state
        .wonders
        .owned_by(city.owner)
        .filter(|w| w.city == city_id)
        .filter_map(|w| wonder(w.wonder).great_person);
    for gp in building_points.chain(wonder_points) {
        points[gp.category.index()] += gp.points;
    }
    points
}

/// Collect city output into the pool or construction orders, complete
/// constructions, grow cities and accrue great-person points. Returns the
/// player's total output for the turn.
pub fn process_player_economy(
    state: &mut WorldState,
    player: PlayerId,
    events: &mut Vec<Event>,
) -> Yields {
    let city_ids: Vec<CityId> = state.cities_of(player).map(|(id, _)| id).collect();
    let mut total = Yields::ZERO;
    let mut gp_points = [0; 5];

    for city_id in city_ids {
        let output = city_output(state, city_id);
        total += output;
        for (slot, pts) in gp_points.iter_mut().zip(city_great_person_points(state, city_id)) {
            *slot += pts;
        }

        let mut to_pool = output;
        if let Some(city) = state.cities.get_mut(city_id) {
            if let Some(order) = city.construction.as_mut() {
                order.progress += output.production.max(0);
                to_pool.production = 0;
            }
        }
        if let Some(p) = state.player_mut(player) {
            for kind in YieldType::ALL {
                p.pool.adjust(kind, to_pool.get(kind));
            }
        }

        complete_construction_if_done(state, city_id, events);

        if state.turn % GROWTH_INTERVAL == 0 && output.food >= GROWTH_FOOD_THRESHOLD {
            grow_city(state, city_id, events);
        }
    }

    for category in GreatPersonCategory::ALL {
        let pts = gp_points[category.index()];
        add_great_person_points(state, player, category, pts, events);
    }

    if let Some(p) = state.player_mut(player) {
        p.pool.clamp_non_negative();
    }
    total
}

pub fn add_great_person_points(
    state: &mut WorldState,
    player: PlayerId,
    category: GreatPersonCategory,
    points: i32,
    events: &mut Vec<Event>,
) {
    if points <= 0 {
        return;
    }
    let draw = state
        .great_people
        .add_points(player, category, points, &mut state.rng);
    match draw {
        Some(GreatPersonDraw::Born(person)) => {
            if let Some(p) = state.player_mut(player) {
                p.great_people.push(person);
                p.great_people_earned += 1;
            }
            let name = great_person(person).map_or("A great person", |d| d.name);
            info!(?player, ?person, "great person born");
            state.notify(Severity::Success, format!("{name} has been born"));
            events.push(Event::GreatPersonBorn { player, person });
        }
        Some(GreatPersonDraw::Exhausted) => {
            debug!(?player, ?category, "great-person threshold reached with none left");
        }
        None => {}
    }
}

fn complete_construction_if_done(state: &mut WorldState, city_id: CityId, events: &mut Vec<Event>) {
    let Some(city) = state.cities.get_mut(city_id) else {
        return;
    };
    let done = city.construction.as_ref().is_some_and(|c| c.is_complete());
    if !done {
        return;
    }
    let Some(order) = city.construction.take() else {
        return;
    };
    let owner = city.owner;

    match order.project {
        Project::Building(kind) => {
            if !city.has_building(kind) {
                city.buildings.push(kind);
            }
            let name = city.name.clone();
            state.notify(
                Severity::Success,
                format!("{name} completed {}", building(kind).name),
            );
            events.push(Event::ConstructionCompleted {
                city: city_id,
                project: order.project,
            });
        }
        Project::Wonder(kind) => {
            let name = city.name.clone();
            match state.wonders.complete(kind, owner, city_id, state.turn) {
                Ok(()) => {
                    info!(wonder = ?kind, player = ?owner, "wonder completed");
                    state.notify(
                        Severity::Success,
                        format!("{name} completed {}", wonder(kind).name),
                    );
                    events.push(Event::ConstructionCompleted {
                        city: city_id,
                        project: order.project,
                    });
                    events.push(Event::WonderCompleted {
                        wonder: kind,
                        player: owner,
                        city: city_id,
                    });
                }
                Err(taken) => {
                    let refund = order.progress.max(0);
                    if let Some(p) = state.player_mut(owner) {
                        p.pool.adjust(YieldType::Gold, refund);
                    }
                    debug!(wonder = ?kind, winner = ?taken.owner, refund, "wonder lost");
                    state.notify(
                        Severity::Warning,
                        format!(
                            "{} was completed elsewhere; {name} recovers {refund} gold",
                            wonder(kind).name
                        ),
                    );
                    events.push(Event::ConstructionCancelled {
                        city: city_id,
                        project: order.project,
                        refund_gold: refund,
                    });
                }
            }
        }
    }
}

fn grow_city(state: &mut WorldState, city_id: CityId, events: &mut Vec<Event>) {
    let Some(city) = state.cities.get_mut(city_id) else {
        return;
    };
    city.population += 1;
    let population = city.population;
    events.push(Event::CityGrew {
        city: city_id,
        population,
    });
    if population % EXPANSION_POPULATION_STEP == 0 {
        if let Some(index) = best_expansion_tile(state, city_id) {
            state.assign_tile(index, city_id);
            if let Some(pos) = state.map.pos_at(index) {
                events.push(Event::BordersExpanded {
                    city: city_id,
                    tiles: vec![pos],
                });
            }
        }
    }
}

/// Best unowned, settleable tile 4-adjacent to the city's territory.
pub fn best_expansion_tile(state: &WorldState, city_id: CityId) -> Option<usize> {
    let city = state.cities.get(city_id)?;
    let mut best: Option<(i32, Reverse<usize>)> = None;
    for &owned in &city.territory {
        let Some(pos) = state.map.pos_at(owned as usize) else {
            continue;
        };
        for n in state.map.neighbors(pos) {
            let Some(index) = state.map.index_of(n) else {
                continue;
            };
            let Some(tile) = state.map.tile_at_index(index) else {
                continue;
            };
            if tile.owner.is_some() || tile.city.is_some() || !tile.terrain.is_settleable() {
                continue;
            }
            let key = (tile.settle_score(), Reverse(index));
            if best.map_or(true, |b| key > b) {
                best = Some(key);
            }
        }
    }
    best.map(|(_, Reverse(index))| index)
}

/// Military units standing on capturable tiles accrue occupation progress;
/// at the threshold the tile joins the unit owner's nearest city in range.
pub fn process_occupation(state: &mut WorldState, events: &mut Vec<Event>) {
    let mut occupied = Vec::new();
    let units: Vec<_> = state
        .units
        .iter_ordered()
        .filter(|(_, u)| !u.is_settler() && u.is_military())
        .map(|(_, u)| (u.owner, u.pos))
        .collect();

    for (owner, pos) in units {
        let Some(index) = state.map.index_of(pos) else {
            continue;
        };
        let eligible = state.map.tile_at_index(index).is_some_and(|t| {
            t.city.is_none()
                && t.terrain.is_settleable()
                && t.owner != Some(owner)
                && t.owner
                    .map_or(true, |o| state.diplomacy.is_at_war(o, owner))
        });
        if !eligible {
            continue;
        }
        occupied.push(index);

        let progress = match state.map.tile_at_index_mut(index) {
            Some(tile) => {
                if tile.occupier == Some(owner) {
                    tile.occupation_progress += OCCUPATION_RATE;
                } else {
                    tile.occupier = Some(owner);
                    tile.occupation_progress = OCCUPATION_RATE;
                }
                tile.occupation_progress
            }
            None => continue,
        };
        if progress < OCCUPATION_THRESHOLD {
            continue;
        }
        let Some(city) = state.nearest_city_within(owner, pos, OCCUPATION_CITY_RADIUS) else {
            continue;
        };
        if let Some(from) = state.assign_tile(index, city) {
            debug!(?pos, ?from, to = ?owner, "tile captured");
            events.push(Event::TileCaptured {
                pos,
                from,
                to: owner,
                city,
            });
        }
    }

    for index in 0..state.map.len() {
        if occupied.contains(&index) {
            continue;
        }
        if let Some(tile) = state.map.tile_at_index_mut(index) {
            if tile.occupation_progress != 0 || tile.occupier.is_some() {
                tile.clear_occupation();
            }
        }
    }
}

/// Research progress for one turn: half the science output, at least 1.
pub fn research_rate(science_output: i32) -> i32 {
    (science_output / 2).max(1)
}

pub fn process_research(
    state: &mut WorldState,
    player: PlayerId,
    science_output: i32,
    events: &mut Vec<Event>,
) {
    let Some(p) = state.player_mut(player) else {
        return;
    };
    let Some(research) = p.research.as_mut() else {
        return;
    };
    research.progress += research_rate(science_output);
    if research.progress < tech(research.tech).required_progress() {
        return;
    }
    let finished = research.tech;
    p.research = None;
    p.techs.insert(finished);
    let eras = p.check_era_advance();

    info!(?player, tech = ?finished, "technology researched");
    events.push(Event::TechResearched {
        player,
        tech: finished,
    });
    state.notify(
        Severity::Success,
        format!("Researched {}", tech(finished).name),
    );
    for era in eras {
        info!(?player, ?era, "player entered a new era");
        events.push(Event::EraAdvanced { player, era });
    }
}

/// Raise the global era to the most advanced living player's era.
pub fn update_global_era(state: &mut WorldState, events: &mut Vec<Event>) {
    let Some(max_era) = state.living_players().map(|p| p.era).max() else {
        return;
    };
    if max_era > state.era {
        state.era = max_era;
        info!(era = ?max_era, "global era advanced");
        events.push(Event::GlobalEraAdvanced { era: max_era });
    }
}

fn transfer_bundle(state: &mut WorldState, from: PlayerId, to: PlayerId, bundle: &TradeBundle) {
    let mut moves: Vec<(YieldType, i32)> = Vec::new();
    if bundle.gold > 0 {
        moves.push((YieldType::Gold, bundle.gold));
    }
    moves.extend(
        bundle
            .resources
            .iter()
            .filter(|r| r.amount > 0)
            .map(|r| (r.kind, r.amount)),
    );
    for (kind, amount) in moves {
        // Clamped to what the giver holds right now.
        let taken = match state.player_mut(from) {
            Some(giver) => -giver.pool.adjust(kind, -amount),
            None => 0,
        };
        if let Some(receiver) = state.player_mut(to) {
            receiver.pool.adjust(kind, taken);
        }
    }
}

/// Apply both sides of a trade to the players' pools.
pub fn execute_trade(state: &mut WorldState, trade: &TradeAgreement) {
    transfer_bundle(state, trade.proposer, trade.partner, &trade.terms.proposer_gives);
    transfer_bundle(state, trade.partner, trade.proposer, &trade.terms.partner_gives);
}

pub fn apply_event_effect(
    state: &mut WorldState,
    player: PlayerId,
    effect: EventEffect,
    events: &mut Vec<Event>,
) {
    match effect {
        EventEffect::Pool(kind, amount) => {
            if let Some(p) = state.player_mut(player) {
                p.pool.adjust(kind, amount);
            }
        }
        EventEffect::ResearchProgress(amount) => {
            if let Some(research) = state.player_mut(player).and_then(|p| p.research.as_mut()) {
                research.progress += amount;
            }
        }
        EventEffect::LargestCityPopulation(delta) => {
            let largest = state
                .cities_of(player)
                .max_by_key(|(id, c)| (c.population, Reverse(*id)))
                .map(|(id, _)| id);
            if let Some(city) = largest.and_then(|id| state.cities.get_mut(id)) {
                let next = city.population as i64 + delta as i64;
                city.population = next.max(1) as u32;
            }
        }
        EventEffect::GreatPersonPoints(category, points) => {
            add_great_person_points(state, player, category, points, events);
        }
    }
}

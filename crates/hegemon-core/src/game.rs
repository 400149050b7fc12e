//! The turn engine. Owns the authoritative [`WorldState`], validates and
//! applies player requests, and runs the world update when play wraps back to
//! the first player.

use thiserror::Error;
use tracing::{debug, info, warn};

use hegemon_protocol::{
    CityId, Civilization, Event, GreatPersonCategory, GreatPersonId, NotificationLog, PlayerId,
    Pos, Project, ScoreBreakdown, Severity, Stance, Tech, Terrain, TradeAgreement, TradeDuration,
    TradeId, TradeTerms, UnitId, UnitKind, VictoryOutcome,
};

use crate::{
    city::{City, Construction},
    combat::{self, CombatError, CombatOutcome},
    config::{ConfigError, EngineConfig},
    diplomacy::{DiplomacyError, Relation},
    economy,
    mapsource::MapSource,
    pathfinding::MoveRules,
    persistence::{Persistence, PersistenceError},
    player::{Player, Research},
    progression::{world_event, EventContext},
    rules::{building, civilization, great_person, unit, wonder, UnitClass},
    state::{WorldState, CITY_VISION_RADIUS, UNIT_VISION_RADIUS},
    unit::Unit,
    victory,
    yields::Yields,
};

/// Cities must be at least this far apart (Manhattan).
pub const MIN_CITY_DISTANCE: i32 = 3;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,
    #[error("a game needs at least one player")]
    NoPlayers,
    #[error("too many players: {count}")]
    TooManyPlayers { count: usize },
    #[error("no start location left for player {player:?}")]
    NoStartLocation { player: PlayerId },
    #[error("unknown player {0:?}")]
    UnknownPlayer(PlayerId),
    #[error("unknown unit")]
    UnknownUnit,
    #[error("unknown city")]
    UnknownCity,
    #[error("unit does not belong to current player")]
    NotYourUnit,
    #[error("city does not belong to current player")]
    NotYourCity,
    #[error("{pos} is off the map")]
    OutOfBounds { pos: Pos },
    #[error("unit has no moves left this turn")]
    NoMovesLeft,
    #[error("invalid movement path")]
    InvalidPath,
    #[error("no path to {to}")]
    Unreachable { to: Pos },
    #[error("unit cannot found a city")]
    CannotFoundCity,
    #[error("cannot found a city on {terrain:?}")]
    UnsettleableTerrain { terrain: Terrain },
    #[error("tile already has a city")]
    TileHasCity,
    #[error("tile belongs to another player")]
    ForeignTerritory,
    #[error("too close to another city ({distance} tiles, need {min})")]
    TooCloseToCity { distance: i32, min: i32 },
    #[error("already researching {current:?}")]
    AlreadyResearching { current: Tech },
    #[error("technology already researched")]
    TechAlreadyResearched,
    #[error("technology prerequisites not met")]
    TechPrerequisitesNotMet,
    #[error("requires {tech:?}")]
    MissingTechnology { tech: Tech },
    #[error("building already built in this city")]
    BuildingAlreadyBuilt,
    #[error("wonder already completed")]
    WonderAlreadyBuilt,
    #[error("city is already building something")]
    ConstructionInProgress,
    #[error("not enough production ({available}/{needed})")]
    NotEnoughProduction { needed: i32, available: i32 },
    #[error("not enough gold ({available}/{needed})")]
    NotEnoughGold { needed: i32, available: i32 },
    #[error("no free tile next to the city")]
    NoSpawnTile,
    #[error("cannot attack an ally")]
    AlliedTarget,
    #[error("target is not adjacent")]
    NotAdjacent,
    #[error("city is already yours")]
    AlreadyOwned,
    #[error("not at war with the city's owner")]
    NotAtWar,
    #[error("city is defended")]
    CityDefended,
    #[error("great person not available")]
    UnknownGreatPerson,
    #[error("nothing is being researched")]
    NotResearching,
    #[error("city has no construction order")]
    NoConstruction,
    #[error("engineers need a target city")]
    TargetCityRequired,
    #[error("no persistence configured")]
    NoPersistence,
    #[error("no saved game found")]
    NoSavedGame,
    #[error(transparent)]
    Combat(#[from] CombatError),
    #[error(transparent)]
    Diplomacy(#[from] DiplomacyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Receives every event the engine emits, after the request that produced it
/// has been fully applied.
pub trait EngineObserver {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> EngineObserver for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

#[derive(Clone, Debug)]
pub struct PlayerSpec {
    pub name: String,
    pub civ: Civilization,
    pub is_ai: bool,
}

impl PlayerSpec {
    pub fn human(name: impl Into<String>, civ: Civilization) -> Self {
        Self {
            name: name.into(),
            civ,
            is_ai: false,
        }
    }

    pub fn ai(name: impl Into<String>, civ: Civilization) -> Self {
        Self {
            name: name.into(),
            civ,
            is_ai: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum DiplomaticAction {
    DeclareWar,
    MakePeace,
    FormAlliance,
    BreakAlliance,
    Befriend,
}

pub struct GameEngine {
    pub(crate) config: EngineConfig,
    pub(crate) state: WorldState,
    observers: Vec<Box<dyn EngineObserver>>,
    persistence: Option<Box<dyn Persistence>>,
}

impl GameEngine {
    /// Build the world from `map_source`, place every player's starting units
    /// and techs, and open the first player's turn.
    pub fn start(
        config: EngineConfig,
        map_source: &mut dyn MapSource,
        players: &[PlayerSpec],
    ) -> Result<Self, GameError> {
        config.validate()?;
        if players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if players.len() > PlayerId::MAX_PLAYERS {
            return Err(GameError::TooManyPlayers {
                count: players.len(),
            });
        }

        let map = map_source.build_map();
        let roster = players
            .iter()
            .enumerate()
            .map(|(i, spec)| Player::new(PlayerId(i as u8), spec.name.clone(), spec.civ, spec.is_ai))
            .collect();
        let mut state = WorldState::new(map, roster, config.seed, config.notification_capacity);

        let mut taken = Vec::with_capacity(players.len());
        for (i, spec) in players.iter().enumerate() {
            let id = PlayerId(i as u8);
            let start = map_source
                .best_start_location(&state.map, &taken)
                .ok_or(GameError::NoStartLocation { player: id })?;
            taken.push(start);

            let civ = civilization(spec.civ);
            for &kind in civ.starting_units {
                let naval = unit(kind).class == UnitClass::Naval;
                if let Some(pos) = free_tile_near(&state, start, naval) {
                    state.place_unit(Unit::new(kind, id, pos));
                }
            }
            if let Some(p) = state.player_mut(id) {
                p.techs.extend(civ.starting_techs.iter().copied());
                p.check_era_advance();
            }
        }
        for i in 0..players.len() {
            state.refresh_visibility(PlayerId(i as u8));
        }
        info!(
            players = players.len(),
            width = state.map.width(),
            height = state.map.height(),
            "game started"
        );

        let mut engine = Self::from_parts(config, state);
        let mut events = Vec::new();
        engine.begin_player_turn(&mut events);
        debug!(events = events.len(), "opening turn");
        Ok(engine)
    }

    /// Resume from an existing world state, for example a loaded save.
    pub fn from_state(config: EngineConfig, state: WorldState) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self::from_parts(config, state))
    }

    /// Resume from the most recent save in `persistence`, which stays attached.
    pub fn load(
        config: EngineConfig,
        persistence: Box<dyn Persistence>,
    ) -> Result<Self, GameError> {
        let state = persistence.load()?.ok_or(GameError::NoSavedGame)?;
        let mut engine = Self::from_state(config, state)?;
        engine.persistence = Some(persistence);
        Ok(engine)
    }

    fn from_parts(config: EngineConfig, state: WorldState) -> Self {
        Self {
            config,
            state,
            observers: Vec::new(),
            persistence: None,
        }
    }

    pub fn with_persistence(mut self, persistence: Box<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Read-only view of the world.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn current_player(&self) -> PlayerId {
        self.state.current_player
    }

    pub fn outcome(&self) -> Option<&VictoryOutcome> {
        self.state.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.state.outcome.is_some()
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.state.notifications
    }

    pub fn score(&self, player: PlayerId) -> ScoreBreakdown {
        victory::calculate_player_score(&self.state, player)
    }

    pub fn city_output(&self, city: CityId) -> Yields {
        economy::city_output(&self.state, city)
    }

    /// Combined output of every city the player holds.
    pub fn player_output(&self, player: PlayerId) -> Yields {
        economy::player_output(&self.state, player)
    }

    /// Running agreements the player is party to.
    pub fn trades_of(&self, player: PlayerId) -> Vec<&TradeAgreement> {
        self.state.diplomacy.trades_for(player).collect()
    }

    /// Tiles the unit could end its move on this turn.
    pub fn reachable(&self, unit_id: UnitId) -> Vec<Pos> {
        let Some(unit) = self.state.units.get(unit_id) else {
            return Vec::new();
        };
        if !unit.can_act() {
            return Vec::new();
        }
        MoveRules::in_world(&self.state, unit).reachable(unit.pos, unit.moves_left)
    }

    /// Full path regardless of remaining moves; empty when unreachable.
    pub fn path(&self, unit_id: UnitId, to: Pos) -> Vec<Pos> {
        let Some(unit) = self.state.units.get(unit_id) else {
            return Vec::new();
        };
        MoveRules::in_world(&self.state, unit).find_path(unit.pos, to)
    }

    // ---------------------------------------------------------------------
    // Player requests
    // ---------------------------------------------------------------------

    pub fn found_city(&mut self, settler: UnitId) -> Result<Vec<Event>, GameError> {
        let result = self.try_found_city(settler);
        self.finish(result)
    }

    pub fn start_research(&mut self, tech: Tech) -> Result<Vec<Event>, GameError> {
        let result = self.try_start_research(tech);
        self.finish(result)
    }

    pub fn start_construction(
        &mut self,
        city: CityId,
        project: Project,
    ) -> Result<Vec<Event>, GameError> {
        let result = self.try_start_construction(city, project);
        self.finish(result)
    }

    pub fn recruit_unit(&mut self, city: CityId, kind: UnitKind) -> Result<Vec<Event>, GameError> {
        let result = self.try_recruit_unit(city, kind);
        self.finish(result)
    }

    pub fn move_unit(&mut self, unit: UnitId, to: Pos) -> Result<Vec<Event>, GameError> {
        let result = self.try_move_unit(unit, to);
        self.finish(result)
    }

    pub fn attack(&mut self, attacker: UnitId, target: UnitId) -> Result<Vec<Event>, GameError> {
        let result = self.try_attack(attacker, target);
        self.finish(result)
    }

    pub fn capture_city(&mut self, unit: UnitId, city: CityId) -> Result<Vec<Event>, GameError> {
        let result = self.try_capture_city(unit, city);
        self.finish(result)
    }

    pub fn declare_war(&mut self, target: PlayerId) -> Result<Vec<Event>, GameError> {
        let result = self.try_diplomacy(target, DiplomaticAction::DeclareWar);
        self.finish(result)
    }

    pub fn make_peace(&mut self, target: PlayerId) -> Result<Vec<Event>, GameError> {
        let result = self.try_diplomacy(target, DiplomaticAction::MakePeace);
        self.finish(result)
    }

    pub fn form_alliance(&mut self, target: PlayerId) -> Result<Vec<Event>, GameError> {
        let result = self.try_diplomacy(target, DiplomaticAction::FormAlliance);
        self.finish(result)
    }

    pub fn break_alliance(&mut self, target: PlayerId) -> Result<Vec<Event>, GameError> {
        let result = self.try_diplomacy(target, DiplomaticAction::BreakAlliance);
        self.finish(result)
    }

    pub fn befriend(&mut self, target: PlayerId) -> Result<Vec<Event>, GameError> {
        let result = self.try_diplomacy(target, DiplomaticAction::Befriend);
        self.finish(result)
    }

    /// Sign a trade with `partner` on the given terms. One-time trades are
    /// executed immediately; ongoing ones run during each world turn.
    pub fn propose_trade(
        &mut self,
        partner: PlayerId,
        terms: TradeTerms,
    ) -> Result<Vec<Event>, GameError> {
        let result = self.try_propose_trade(partner, terms);
        self.finish(result)
    }

    /// Tear up a running agreement the current player is party to.
    pub fn cancel_trade(&mut self, trade: TradeId) -> Result<Vec<Event>, GameError> {
        let result = self.try_cancel_trade(trade);
        self.finish(result)
    }

    /// Spend a great person. Engineers need `city` to name the construction
    /// they speed up; other categories ignore it.
    pub fn use_great_person(
        &mut self,
        person: GreatPersonId,
        city: Option<CityId>,
    ) -> Result<Vec<Event>, GameError> {
        let result = self.try_use_great_person(person, city);
        self.finish(result)
    }

    pub fn save_now(&mut self) -> Result<Vec<Event>, GameError> {
        let turn = self.state.turn;
        let result = match self.persistence.as_mut() {
            None => Err(GameError::NoPersistence),
            Some(store) => store
                .save(&self.state)
                .map(|()| vec![Event::GameSaved { turn }])
                .map_err(GameError::from),
        };
        self.finish(result)
    }

    /// End the current player's turn. Consecutive AI players then take their
    /// turns, up to `ai_turn_guard_per_player` rounds per call.
    pub fn end_turn(&mut self) -> Result<Vec<Event>, GameError> {
        if self.state.outcome.is_some() {
            return self.finish(Err(GameError::GameOver));
        }
        let mut events = self.end_turn_once();

        let max_ai_turns = self
            .state
            .players
            .len()
            .saturating_mul(self.config.ai_turn_guard_per_player)
            .max(1);
        let mut guard = 0usize;
        while self.state.outcome.is_none() && self.is_current_player_ai() && guard < max_ai_turns {
            events.extend(self.end_turn_once());
            guard += 1;
        }

        self.emit(&events);
        Ok(events)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn finish(&mut self, result: Result<Vec<Event>, GameError>) -> Result<Vec<Event>, GameError> {
        match &result {
            Ok(events) => self.emit(events),
            Err(err) => {
                debug!(player = ?self.state.current_player, %err, "request rejected");
                self.state.notify(Severity::Error, err.to_string());
            }
        }
        result
    }

    fn emit(&mut self, events: &[Event]) {
        for observer in &mut self.observers {
            for event in events {
                observer.on_event(event);
            }
        }
    }

    pub(crate) fn is_current_player_ai(&self) -> bool {
        self.state
            .player(self.state.current_player)
            .is_some_and(|p| p.is_ai)
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.state.outcome.is_some() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    fn current_unit(&self, id: UnitId) -> Result<&Unit, GameError> {
        let unit = self.state.units.get(id).ok_or(GameError::UnknownUnit)?;
        if unit.owner != self.state.current_player {
            return Err(GameError::NotYourUnit);
        }
        Ok(unit)
    }

    fn current_city(&self, id: CityId) -> Result<&City, GameError> {
        let city = self.state.cities.get(id).ok_or(GameError::UnknownCity)?;
        if city.owner != self.state.current_player {
            return Err(GameError::NotYourCity);
        }
        Ok(city)
    }

    fn living_player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.state
            .player(id)
            .filter(|p| p.alive)
            .ok_or(GameError::UnknownPlayer(id))
    }

    fn end_turn_once(&mut self) -> Vec<Event> {
        let mut events = vec![Event::TurnEnded {
            turn: self.state.turn,
            player: self.state.current_player,
        }];

        let count = self.state.players.len();
        let current = self.state.current_player.index();
        let next = (1..=count)
            .map(|step| (current + step) % count)
            .find(|&i| self.state.players.get(i).is_some_and(|p| p.alive))
            .unwrap_or(current);
        self.state.current_player = PlayerId(next as u8);

        if next <= current {
            self.process_world_turn(&mut events);
            if self.state.outcome.is_some() {
                return events;
            }
        }

        self.begin_player_turn(&mut events);
        events
    }

    /// Refresh the active player's units and vision, then let the AI play if
    /// the seat is AI-controlled.
    fn begin_player_turn(&mut self, events: &mut Vec<Event>) {
        let player = self.state.current_player;
        for (_, unit) in self.state.units.iter_ordered_mut() {
            if unit.owner == player {
                unit.reset_for_turn();
            }
        }
        self.state.refresh_visibility(player);
        events.push(Event::TurnStarted {
            turn: self.state.turn,
            player,
        });
        if self.is_current_player_ai() {
            events.extend(self.run_ai_for_current_player());
        }
    }

    fn process_world_turn(&mut self, events: &mut Vec<Event>) {
        self.state.turn += 1;
        let turn = self.state.turn;
        debug!(turn, "world turn");

        let living: Vec<PlayerId> = self.state.living_players().map(|p| p.id).collect();
        let mut science = Vec::with_capacity(living.len());
        for &player in &living {
            let output = economy::process_player_economy(&mut self.state, player, events);
            science.push((player, output.science));
        }
        economy::process_occupation(&mut self.state, events);
        for (player, output) in science {
            economy::process_research(&mut self.state, player, output, events);
        }
        economy::update_global_era(&mut self.state, events);

        if self.check_victory(events) {
            return;
        }

        self.process_trades(events);
        if self.config.random_events {
            self.process_world_events(&living, events);
        }

        let interval = self.config.autosave_interval;
        if interval > 0 && turn % interval == 0 {
            self.autosave(events);
        }
    }

    /// Evaluate victory once; ends the game when a condition holds.
    fn check_victory(&mut self, events: &mut Vec<Event>) -> bool {
        if self.state.outcome.is_some() {
            return true;
        }
        let Some(outcome) = victory::evaluate_victory(&self.state, &self.config) else {
            return false;
        };
        info!(winner = ?outcome.winner, kind = ?outcome.kind, turn = outcome.turn, "game over");
        let message = match outcome.winner.and_then(|w| self.state.player(w)) {
            Some(p) => format!("{} wins a {:?} victory", p.name, outcome.kind),
            None => format!("The game ends in a {:?} result", outcome.kind),
        };
        self.state.notify(Severity::Success, message);
        events.push(Event::GameEnded {
            winner: outcome.winner,
            kind: outcome.kind,
            turn: outcome.turn,
        });
        self.state.outcome = Some(outcome);
        true
    }

    fn process_trades(&mut self, events: &mut Vec<Event>) {
        let tick = self.state.diplomacy.tick_trades();
        for trade in &tick.executed {
            economy::execute_trade(&mut self.state, trade);
            events.push(Event::TradeExecuted { trade: trade.id });
        }
        for id in tick.expired {
            debug!(trade = ?id, "trade expired");
            events.push(Event::TradeExpired { trade: id });
        }
    }

    fn event_context(&self, player: PlayerId) -> EventContext {
        let (techs, pool, researching) = self
            .state
            .player(player)
            .map(|p| (p.techs.len(), p.pool, p.research.is_some()))
            .unwrap_or_default();
        EventContext {
            cities: self.state.city_count(player),
            population: self.state.cities_of(player).map(|(_, c)| c.population).sum(),
            techs,
            pool,
            researching,
        }
    }

    fn process_world_events(&mut self, living: &[PlayerId], events: &mut Vec<Event>) {
        let turn = self.state.turn;
        for &player in living {
            let ctx = self.event_context(player);
            let fired = self
                .state
                .world_events
                .roll(player, turn, &ctx, &mut self.state.rng);
            for kind in fired {
                let def = world_event(kind);
                economy::apply_event_effect(&mut self.state, player, def.effect, events);
                debug!(?player, ?kind, "world event");
                let name = self
                    .state
                    .player(player)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                self.state
                    .notify(Severity::Info, format!("{name}: {}", def.message));
                events.push(Event::WorldEventTriggered { player, kind });
            }
        }
    }

    fn autosave(&mut self, events: &mut Vec<Event>) {
        let turn = self.state.turn;
        let Some(store) = self.persistence.as_mut() else {
            return;
        };
        match store.save(&self.state) {
            Ok(()) => {
                info!(turn, "autosaved");
                events.push(Event::GameSaved { turn });
            }
            Err(err) => {
                warn!(turn, %err, "autosave failed");
                self.state
                    .notify(Severity::Warning, format!("Autosave failed: {err}"));
            }
        }
    }

    /// A player with neither cities nor units is out of the game.
    fn check_elimination(&mut self, player: PlayerId) {
        if self.state.city_count(player) > 0 || self.state.units_of(player).next().is_some() {
            return;
        }
        let Some(p) = self.state.player_mut(player) else {
            return;
        };
        if !p.alive {
            return;
        }
        p.alive = false;
        let name = p.name.clone();
        self.state.diplomacy.remove_player(player);
        info!(?player, "player eliminated");
        self.state
            .notify(Severity::Warning, format!("{name} has been eliminated"));
    }

    pub(crate) fn try_found_city(&mut self, settler: UnitId) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let unit = self.current_unit(settler)?;
        if !unit.is_settler() {
            return Err(GameError::CannotFoundCity);
        }
        let (pos, owner) = (unit.pos, unit.owner);
        let tile = self.state.map.get(pos).ok_or(GameError::OutOfBounds { pos })?;
        if !tile.terrain.is_settleable() {
            return Err(GameError::UnsettleableTerrain {
                terrain: tile.terrain,
            });
        }
        if tile.city.is_some() {
            return Err(GameError::TileHasCity);
        }
        if tile.owner.is_some_and(|o| o != owner) {
            return Err(GameError::ForeignTerritory);
        }
        let is_capital = self.state.city_count(owner) == 0;
        if !is_capital {
            if let Some(distance) = self.state.distance_to_nearest_city(pos) {
                if distance < MIN_CITY_DISTANCE {
                    return Err(GameError::TooCloseToCity {
                        distance,
                        min: MIN_CITY_DISTANCE,
                    });
                }
            }
        }
        let player = self.living_player(owner)?;
        let name = civilization(player.civ).city_name(player.cities_founded as usize);

        self.state.remove_unit(settler);
        let mut city = City::new(name.clone(), pos, owner, self.state.turn);
        city.is_capital = is_capital;
        let city_id = self.state.cities.insert(city);
        if let Some(tile) = self.state.map.get_mut(pos) {
            tile.city = Some(city_id);
        }
        if let Some(home) = self.state.map.index_of(pos) {
            self.state.assign_tile(home, city_id);
        }
        let neighbors: Vec<Pos> = self.state.map.neighbors(pos).collect();
        let mut claimed = Vec::new();
        for n in neighbors {
            let free = self.state.map.get(n).is_some_and(|t| {
                t.owner.is_none() && t.city.is_none() && t.terrain.is_settleable()
            });
            if !free {
                continue;
            }
            if let Some(index) = self.state.map.index_of(n) {
                self.state.assign_tile(index, city_id);
                claimed.push(n);
            }
        }
        if let Some(p) = self.state.player_mut(owner) {
            p.cities_founded += 1;
        }
        self.state.map.reveal(pos, CITY_VISION_RADIUS, owner);

        info!(?owner, %name, %pos, is_capital, "city founded");
        self.state
            .notify(Severity::Success, format!("Founded {name} at {pos}"));
        let mut events = vec![Event::CityFounded {
            city: city_id,
            name,
            pos,
            owner,
        }];
        if !claimed.is_empty() {
            events.push(Event::BordersExpanded {
                city: city_id,
                tiles: claimed,
            });
        }
        self.check_victory(&mut events);
        Ok(events)
    }

    pub(crate) fn try_start_research(&mut self, tech: Tech) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let player_id = self.state.current_player;
        let player = self.living_player(player_id)?;
        if let Some(current) = &player.research {
            return Err(GameError::AlreadyResearching {
                current: current.tech,
            });
        }
        if player.has_tech(tech) {
            return Err(GameError::TechAlreadyResearched);
        }
        if !player.can_research(tech) {
            return Err(GameError::TechPrerequisitesNotMet);
        }
        if let Some(p) = self.state.player_mut(player_id) {
            p.research = Some(Research { tech, progress: 0 });
        }
        debug!(player = ?player_id, ?tech, "research started");
        Ok(vec![Event::ResearchStarted {
            player: player_id,
            tech,
        }])
    }

    pub(crate) fn try_start_construction(
        &mut self,
        city_id: CityId,
        project: Project,
    ) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let city = self.current_city(city_id)?;
        if city.construction.is_some() {
            return Err(GameError::ConstructionInProgress);
        }
        let player = self.living_player(city.owner)?;
        let required = match project {
            Project::Building(kind) => {
                let def = building(kind);
                if let Some(tech) = def.tech.filter(|t| !player.has_tech(*t)) {
                    return Err(GameError::MissingTechnology { tech });
                }
                if city.has_building(kind) {
                    return Err(GameError::BuildingAlreadyBuilt);
                }
                def.cost
            }
            Project::Wonder(kind) => {
                let def = wonder(kind);
                if !player.has_tech(def.tech) {
                    return Err(GameError::MissingTechnology { tech: def.tech });
                }
                if self.state.wonders.is_built(kind) {
                    return Err(GameError::WonderAlreadyBuilt);
                }
                def.cost
            }
        };
        if let Some(city) = self.state.cities.get_mut(city_id) {
            city.construction = Some(Construction {
                project,
                progress: 0,
                required,
            });
        }
        debug!(city = ?city_id, ?project, required, "construction started");
        Ok(vec![Event::ConstructionStarted {
            city: city_id,
            project,
        }])
    }

    pub(crate) fn try_recruit_unit(
        &mut self,
        city_id: CityId,
        kind: UnitKind,
    ) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let city = self.current_city(city_id)?;
        let (owner, city_pos) = (city.owner, city.pos);
        let player = self.living_player(owner)?;
        let def = unit(kind);
        if let Some(tech) = def.tech.filter(|t| !player.has_tech(*t)) {
            return Err(GameError::MissingTechnology { tech });
        }
        if player.pool.production < def.production_cost {
            return Err(GameError::NotEnoughProduction {
                needed: def.production_cost,
                available: player.pool.production,
            });
        }
        if player.pool.gold < def.gold_cost {
            return Err(GameError::NotEnoughGold {
                needed: def.gold_cost,
                available: player.pool.gold,
            });
        }
        let spawn = spawn_tile(&self.state, city_pos, owner, def.class == UnitClass::Naval)
            .ok_or(GameError::NoSpawnTile)?;

        if let Some(p) = self.state.player_mut(owner) {
            p.pool.production -= def.production_cost;
            p.pool.gold -= def.gold_cost;
            p.pool.clamp_non_negative();
        }
        let unit_id = self.state.place_unit(Unit::new(kind, owner, spawn));
        self.state.map.reveal(spawn, UNIT_VISION_RADIUS, owner);
        debug!(?owner, ?kind, %spawn, "unit recruited");
        self.state
            .notify(Severity::Info, format!("Recruited {} at {spawn}", def.name));
        Ok(vec![Event::UnitRecruited {
            unit: unit_id,
            kind,
            owner,
            pos: spawn,
        }])
    }

    /// Walk toward `to` along the cheapest path, as far as the remaining
    /// moves allow. A step may be started with any positive budget left.
    pub(crate) fn try_move_unit(&mut self, unit_id: UnitId, to: Pos) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        if !self.state.map.contains(to) {
            return Err(GameError::OutOfBounds { pos: to });
        }
        let unit = self.current_unit(unit_id)?;
        if !unit.can_act() {
            return Err(GameError::NoMovesLeft);
        }
        let (from, owner, budget) = (unit.pos, unit.owner, unit.moves_left);
        if from == to {
            return Err(GameError::InvalidPath);
        }

        let (walked, spent) = {
            let rules = MoveRules::in_world(&self.state, unit);
            match rules.route_within(from, to, budget) {
                Some(route) => route,
                None => {
                    let path = rules.find_path(from, to);
                    if path.is_empty() {
                        return Err(GameError::Unreachable { to });
                    }
                    partial_walk(&rules, &path, budget)?
                }
            }
        };
        let Some(&dest) = walked.last() else {
            return Err(GameError::InvalidPath);
        };

        self.state.relocate_unit(unit_id, dest);
        let moves_left = match self.state.units.get_mut(unit_id) {
            Some(u) => {
                u.moves_left = (u.moves_left - spent).max(0);
                u.moves_left
            }
            None => 0,
        };
        self.state.map.reveal(dest, UNIT_VISION_RADIUS, owner);
        debug!(unit = ?unit_id, %from, to = %dest, moves_left, "unit moved");
        Ok(vec![Event::UnitMoved {
            unit: unit_id,
            from,
            to: dest,
            path: walked,
            moves_left,
        }])
    }

    pub(crate) fn try_attack(
        &mut self,
        attacker_id: UnitId,
        target_id: UnitId,
    ) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let attacker = self.current_unit(attacker_id)?.clone();
        if !attacker.can_act() {
            return Err(GameError::NoMovesLeft);
        }
        let defender = self
            .state
            .units
            .get(target_id)
            .ok_or(GameError::UnknownUnit)?
            .clone();
        combat::check_engagement(&attacker, &defender)?;
        let (me, them) = (attacker.owner, defender.owner);
        if self.state.diplomacy.are_allied(me, them) {
            return Err(GameError::AlliedTarget);
        }
        let attacker_tile = self
            .state
            .map
            .get(attacker.pos)
            .cloned()
            .ok_or(GameError::OutOfBounds { pos: attacker.pos })?;
        let defender_tile = self
            .state
            .map
            .get(defender.pos)
            .cloned()
            .ok_or(GameError::OutOfBounds { pos: defender.pos })?;

        let mut events = Vec::new();
        if !self.state.diplomacy.is_at_war(me, them) {
            let relation = self.state.diplomacy.declare_war(me, them)?;
            events.push(stance_event(me, them, relation));
            info!(attacker = ?me, defender = ?them, "attack declared war");
        }

        let (a, d) = self
            .state
            .units
            .get2_mut(attacker_id, target_id)
            .ok_or(GameError::UnknownUnit)?;
        let outcome: CombatOutcome = combat::resolve_combat(a, &attacker_tile, d, &defender_tile)?;
        a.has_acted = true;
        a.moves_left = 0;

        debug!(
            attacker = ?attacker_id,
            defender = ?target_id,
            attacker_damage = outcome.attacker_damage,
            defender_damage = outcome.defender_damage,
            "combat resolved"
        );
        events.push(Event::CombatResolved {
            attacker: attacker_id,
            defender: target_id,
            attacker_pos: attacker.pos,
            defender_pos: defender.pos,
            attacker_damage: outcome.attacker_damage,
            defender_damage: outcome.defender_damage,
        });
        self.state.notify(
            Severity::Info,
            format!(
                "{} hit {} for {} and took {}",
                attacker.def().name,
                defender.def().name,
                outcome.defender_damage,
                outcome.attacker_damage
            ),
        );

        if outcome.defender_destroyed {
            self.destroy_unit(target_id, &mut events);
        }
        if outcome.attacker_destroyed {
            self.destroy_unit(attacker_id, &mut events);
        }
        self.check_elimination(them);
        self.check_elimination(me);
        Ok(events)
    }

    fn destroy_unit(&mut self, id: UnitId, events: &mut Vec<Event>) {
        if let Some(unit) = self.state.remove_unit(id) {
            self.state.notify(
                Severity::Warning,
                format!("{} destroyed at {}", unit.def().name, unit.pos),
            );
            events.push(Event::UnitDestroyed {
                unit: id,
                owner: unit.owner,
                pos: unit.pos,
            });
        }
    }

    pub(crate) fn try_capture_city(
        &mut self,
        unit_id: UnitId,
        city_id: CityId,
    ) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let unit = self.current_unit(unit_id)?;
        if !unit.is_military() {
            return Err(CombatError::NotACombatUnit.into());
        }
        if !unit.can_act() {
            return Err(GameError::NoMovesLeft);
        }
        let (new_owner, from) = (unit.owner, unit.pos);
        let city = self.state.cities.get(city_id).ok_or(GameError::UnknownCity)?;
        let (old_owner, city_pos) = (city.owner, city.pos);
        if old_owner == new_owner {
            return Err(GameError::AlreadyOwned);
        }
        if from.manhattan(city_pos) != 1 {
            return Err(GameError::NotAdjacent);
        }
        if !self.state.diplomacy.is_at_war(new_owner, old_owner) {
            return Err(GameError::NotAtWar);
        }
        if self.state.map.get(city_pos).is_some_and(|t| t.unit.is_some()) {
            return Err(GameError::CityDefended);
        }

        let territory = city.territory.clone();
        let mut was_capital = false;
        let mut name = String::new();
        if let Some(c) = self.state.cities.get_mut(city_id) {
            c.owner = new_owner;
            c.population = c.population.saturating_sub(1).max(1);
            was_capital = c.is_capital;
            c.is_capital = false;
            c.construction = None;
            name = c.name.clone();
        }
        for index in territory {
            if let Some(tile) = self.state.map.tile_at_index_mut(index as usize) {
                tile.owner = Some(new_owner);
                tile.clear_occupation();
            }
        }
        self.state.wonders.transfer_city(city_id, new_owner);
        self.state.relocate_unit(unit_id, city_pos);
        if let Some(u) = self.state.units.get_mut(unit_id) {
            u.has_acted = true;
            u.moves_left = 0;
        }
        if was_capital {
            let successor = self.state.cities_of(old_owner).next().map(|(id, _)| id);
            if let Some(c) = successor.and_then(|id| self.state.cities.get_mut(id)) {
                c.is_capital = true;
            }
        }
        self.state.map.reveal(city_pos, CITY_VISION_RADIUS, new_owner);

        info!(city = %name, from = ?old_owner, to = ?new_owner, "city captured");
        self.state
            .notify(Severity::Warning, format!("{name} has been captured"));
        let mut events = vec![
            Event::UnitMoved {
                unit: unit_id,
                from,
                to: city_pos,
                path: vec![city_pos],
                moves_left: 0,
            },
            Event::CityCaptured {
                city: city_id,
                from: old_owner,
                to: new_owner,
            },
        ];
        self.check_elimination(old_owner);
        self.check_victory(&mut events);
        Ok(events)
    }

    pub(crate) fn try_diplomacy(
        &mut self,
        target: PlayerId,
        action: DiplomaticAction,
    ) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let me = self.state.current_player;
        self.living_player(target)?;
        let ledger = &mut self.state.diplomacy;
        let relation = match action {
            DiplomaticAction::DeclareWar => ledger.declare_war(me, target)?,
            DiplomaticAction::MakePeace => ledger.make_peace(me, target)?,
            DiplomaticAction::FormAlliance => ledger.form_alliance(me, target)?,
            DiplomaticAction::BreakAlliance => ledger.break_alliance(me, target)?,
            DiplomaticAction::Befriend => ledger.befriend(me, target)?,
        };
        info!(a = ?me, b = ?target, stance = ?relation.stance, trust = relation.trust, "stance changed");
        let names = (
            self.state.player(me).map(|p| p.name.clone()).unwrap_or_default(),
            self.state.player(target).map(|p| p.name.clone()).unwrap_or_default(),
        );
        let severity = if relation.stance == Stance::War {
            Severity::Warning
        } else {
            Severity::Info
        };
        self.state.notify(
            severity,
            format!("{} and {} are now {:?}", names.0, names.1, relation.stance),
        );
        Ok(vec![stance_event(me, target, relation)])
    }

    fn try_propose_trade(
        &mut self,
        partner: PlayerId,
        terms: TradeTerms,
    ) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let me = self.state.current_player;
        self.living_player(partner)?;
        let one_time = terms.duration == TradeDuration::OneTime;
        let agreement = self
            .state
            .diplomacy
            .sign_trade(me, partner, terms, self.state.turn)?;
        let mut events = vec![Event::TradeSigned {
            trade: agreement.id,
            proposer: me,
            partner,
        }];
        if one_time {
            economy::execute_trade(&mut self.state, &agreement);
            events.push(Event::TradeExecuted {
                trade: agreement.id,
            });
        }
        debug!(trade = ?agreement.id, proposer = ?me, ?partner, one_time, "trade signed");
        self.state.notify(Severity::Info, "Trade agreement signed");
        Ok(events)
    }

    fn try_cancel_trade(&mut self, trade: TradeId) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let me = self.state.current_player;
        let party = self.state.diplomacy.trades_for(me).any(|t| t.id == trade);
        if !party {
            return Err(DiplomacyError::UnknownTrade.into());
        }
        let agreement = self.state.diplomacy.cancel_trade(trade)?;
        debug!(trade = ?agreement.id, by = ?me, "trade cancelled");
        self.state.notify(Severity::Warning, "Trade agreement cancelled");
        Ok(vec![Event::TradeCancelled {
            trade: agreement.id,
            by: me,
        }])
    }

    fn try_use_great_person(
        &mut self,
        person: GreatPersonId,
        city: Option<CityId>,
    ) -> Result<Vec<Event>, GameError> {
        self.ensure_running()?;
        let me = self.state.current_player;
        let player = self.living_player(me)?;
        if !player.great_people.contains(&person) {
            return Err(GameError::UnknownGreatPerson);
        }
        let def = great_person(person).ok_or(GameError::UnknownGreatPerson)?;

        // Validate the target before touching anything.
        let engineer_city = match def.category {
            GreatPersonCategory::Scientist if player.research.is_none() => {
                return Err(GameError::NotResearching);
            }
            GreatPersonCategory::Engineer => {
                let city_id = city.ok_or(GameError::TargetCityRequired)?;
                if self.current_city(city_id)?.construction.is_none() {
                    return Err(GameError::NoConstruction);
                }
                Some(city_id)
            }
            _ => None,
        };

        match def.category {
            GreatPersonCategory::Scientist => {
                if let Some(r) = self.state.player_mut(me).and_then(|p| p.research.as_mut()) {
                    r.progress += def.power;
                }
            }
            GreatPersonCategory::Engineer => {
                let order = engineer_city
                    .and_then(|id| self.state.cities.get_mut(id))
                    .and_then(|c| c.construction.as_mut());
                if let Some(order) = order {
                    order.progress += def.power;
                }
            }
            GreatPersonCategory::Merchant => {
                if let Some(p) = self.state.player_mut(me) {
                    p.pool.gold += def.power;
                }
            }
            GreatPersonCategory::Artist => {
                if let Some(p) = self.state.player_mut(me) {
                    p.pool.culture += def.power;
                }
            }
            GreatPersonCategory::General => {
                for (_, u) in self.state.units.iter_ordered_mut() {
                    if u.owner == me {
                        u.heal(def.power);
                    }
                }
            }
        }
        if let Some(p) = self.state.player_mut(me) {
            p.great_people.retain(|g| *g != person);
        }
        info!(player = ?me, person = def.name, "great person used");
        self.state
            .notify(Severity::Success, format!("{} lends their talents", def.name));
        Ok(vec![Event::GreatPersonUsed { player: me, person }])
    }
}

/// Walk as far along `path` as `budget` allows, ending on the last tile
/// the unit may stop on. Friendly units can be passed but not shared.
fn partial_walk(rules: &MoveRules<'_>, path: &[Pos], budget: i32) -> Result<(Vec<Pos>, i32), GameError> {
    let mut spent = 0;
    let mut stop = None;
    for (i, step) in path.iter().enumerate() {
        if spent >= budget {
            break;
        }
        let Some(cost) = rules.step_cost(*step) else {
            break;
        };
        spent += cost;
        if rules.can_stop(*step) {
            stop = Some((i, spent));
        }
    }
    let Some((last, cost)) = stop else {
        return Err(GameError::NoMovesLeft);
    };
    Ok((path[..=last].to_vec(), cost))
}

fn stance_event(a: PlayerId, b: PlayerId, relation: Relation) -> Event {
    Event::StanceChanged {
        a,
        b,
        stance: relation.stance,
        trust: relation.trust,
    }
}

fn can_hold_unit(state: &WorldState, pos: Pos, naval: bool) -> bool {
    state.map.get(pos).is_some_and(|t| {
        let terrain_ok = if naval {
            t.terrain == Terrain::Ocean
        } else {
            t.terrain.is_settleable()
        };
        terrain_ok && t.unit.is_none() && t.city.is_none()
    })
}

/// Closest free tile to `center` (itself included) within two tiles.
fn free_tile_near(state: &WorldState, center: Pos, naval: bool) -> Option<Pos> {
    let mut candidates: Vec<Pos> = state.map.window(center, 2).collect();
    candidates.sort_by_key(|p| p.manhattan(center));
    candidates.into_iter().find(|p| can_hold_unit(state, *p, naval))
}

/// First free neighbor of a city in N, E, S, W order.
fn spawn_tile(state: &WorldState, city: Pos, owner: PlayerId, naval: bool) -> Option<Pos> {
    state.map.neighbors(city).find(|p| {
        can_hold_unit(state, *p, naval)
            && state
                .map
                .get(*p)
                .is_some_and(|t| t.owner.map_or(true, |o| o == owner))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{map::GameMap, mapsource::StaticMapSource, persistence::MemoryPersistence};
    use hegemon_protocol::{BuildingKind, TradeBundle, YieldType};
    use std::{cell::RefCell, rc::Rc};

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            random_events: false,
            ..EngineConfig::default()
        }
    }

    fn two_humans(width: u32, height: u32) -> GameEngine {
        let mut source = StaticMapSource::new(GameMap::new(width, height, Terrain::Plains));
        GameEngine::start(
            quiet_config(),
            &mut source,
            &[
                PlayerSpec::human("Ada", Civilization::Rome),
                PlayerSpec::human("Bo", Civilization::Egypt),
            ],
        )
        .unwrap()
    }

    fn first_unit(engine: &GameEngine, player: PlayerId, kind: UnitKind) -> UnitId {
        engine
            .state()
            .units_of(player)
            .find(|(_, u)| u.kind == kind)
            .map(|(id, _)| id)
            .unwrap()
    }

    #[test]
    fn start_places_civilization_units_and_techs() {
        let engine = two_humans(20, 20);
        let state = engine.state();
        assert_eq!(state.units_of(PlayerId(0)).count(), 3);
        assert!(state.players[0].has_tech(Tech::BronzeWorking));
        assert!(state.players[1].has_tech(Tech::Agriculture));
        assert!(state.invariant_violations().is_empty());
        assert_eq!(engine.current_player(), PlayerId(0));
        assert_eq!(engine.turn(), 0);
    }

    #[test]
    fn founding_consumes_settler_and_claims_neighbors() {
        let mut engine = two_humans(20, 20);
        let settler = first_unit(&engine, PlayerId(0), UnitKind::Settler);
        let pos = engine.state().units.get(settler).unwrap().pos;
        let events = engine.found_city(settler).unwrap();
        assert!(matches!(events[0], Event::CityFounded { pos: p, .. } if p == pos));
        let state = engine.state();
        assert!(state.units.get(settler).is_none());
        let (_, city) = state.city_at(pos).unwrap();
        assert!(city.is_capital);
        assert_eq!(city.name, "Roma");
        assert!(city.territory.len() >= 2);
        assert!(state.invariant_violations().is_empty());
    }

    #[test]
    fn rejected_requests_leave_a_notification() {
        let mut engine = two_humans(20, 20);
        let warrior = first_unit(&engine, PlayerId(0), UnitKind::Warrior);
        let err = engine.found_city(warrior).unwrap_err();
        assert!(matches!(err, GameError::CannotFoundCity));
        let latest = engine.notifications().latest().unwrap();
        assert_eq!(latest.severity, Severity::Error);
        assert_eq!(latest.message, "unit cannot found a city");
    }

    #[test]
    fn units_of_other_players_cannot_be_commanded() {
        let mut engine = two_humans(20, 20);
        let theirs = first_unit(&engine, PlayerId(1), UnitKind::Warrior);
        let err = engine.move_unit(theirs, Pos::new(0, 0)).unwrap_err();
        assert!(matches!(err, GameError::NotYourUnit));
    }

    #[test]
    fn research_rules_are_enforced() {
        let mut engine = two_humans(20, 20);
        assert!(matches!(
            engine.start_research(Tech::BronzeWorking),
            Err(GameError::TechAlreadyResearched)
        ));
        assert!(matches!(
            engine.start_research(Tech::Feudalism),
            Err(GameError::TechPrerequisitesNotMet)
        ));
        engine.start_research(Tech::Pottery).unwrap();
        assert!(matches!(
            engine.start_research(Tech::Mining),
            Err(GameError::AlreadyResearching { current: Tech::Pottery })
        ));
    }

    #[test]
    fn move_spends_half_points_and_reveals() {
        let mut engine = two_humans(20, 20);
        let warrior = first_unit(&engine, PlayerId(0), UnitKind::Warrior);
        let from = Pos::new(3, 12);
        engine.state.relocate_unit(warrior, from);
        let to = Pos::new(3, 17);
        let reachable = engine.reachable(warrior);
        assert!(!reachable.is_empty());
        let events = engine.move_unit(warrior, to).unwrap();
        let Event::UnitMoved { path, moves_left, .. } = &events[0] else {
            panic!("expected a move event");
        };
        // Two plains steps use the whole 4-half-point budget.
        assert_eq!(path.len(), 2);
        assert_eq!(*moves_left, 0);
        let unit = engine.state().units.get(warrior).unwrap();
        assert!(engine.state().map.get(unit.pos).unwrap().is_visible_to(PlayerId(0)));
        assert!(matches!(
            engine.move_unit(warrior, to),
            Err(GameError::NoMovesLeft)
        ));
        assert!(engine.state().invariant_violations().is_empty());
    }

    #[test]
    fn attack_declares_war_and_marks_attacker() {
        let mut engine = two_humans(20, 20);
        let mine = first_unit(&engine, PlayerId(0), UnitKind::Warrior);
        let theirs = first_unit(&engine, PlayerId(1), UnitKind::Warrior);
        let pos = engine.state().units.get(mine).unwrap().pos;
        let target = engine
            .state()
            .map
            .neighbors(pos)
            .find(|p| engine.state().map.get(*p).is_some_and(|t| t.unit.is_none()))
            .unwrap();
        engine.state.relocate_unit(theirs, target);

        let events = engine.attack(mine, theirs).unwrap();
        assert!(matches!(events[0], Event::StanceChanged { stance: Stance::War, .. }));
        assert!(matches!(events[1], Event::CombatResolved { .. }));
        assert!(engine.state().diplomacy.is_at_war(PlayerId(0), PlayerId(1)));
        let attacker = engine.state().units.get(mine).unwrap();
        assert!(attacker.has_acted);
        assert!(attacker.health < 100);
        assert!(matches!(engine.attack(mine, theirs), Err(GameError::NoMovesLeft)));
    }

    #[test]
    fn allies_cannot_be_attacked() {
        let mut engine = two_humans(20, 20);
        engine.form_alliance(PlayerId(1)).unwrap();
        let mine = first_unit(&engine, PlayerId(0), UnitKind::Warrior);
        let theirs = first_unit(&engine, PlayerId(1), UnitKind::Warrior);
        let pos = engine.state().units.get(mine).unwrap().pos;
        let target = engine
            .state()
            .map
            .neighbors(pos)
            .find(|p| engine.state().map.get(*p).is_some_and(|t| t.unit.is_none()))
            .unwrap();
        engine.state.relocate_unit(theirs, target);
        assert!(matches!(engine.attack(mine, theirs), Err(GameError::AlliedTarget)));
        assert!(engine.state().diplomacy.are_allied(PlayerId(0), PlayerId(1)));
    }

    #[test]
    fn construction_and_recruitment_checks() {
        let mut engine = two_humans(20, 20);
        let settler = first_unit(&engine, PlayerId(0), UnitKind::Settler);
        engine.found_city(settler).unwrap();
        let city = engine.state().cities_of(PlayerId(0)).next().unwrap().0;

        assert!(matches!(
            engine.start_construction(city, Project::Building(BuildingKind::Library)),
            Err(GameError::MissingTechnology { tech: Tech::Writing })
        ));
        engine
            .start_construction(city, Project::Building(BuildingKind::Monument))
            .unwrap();
        assert!(matches!(
            engine.start_construction(city, Project::Building(BuildingKind::Granary)),
            Err(GameError::ConstructionInProgress)
        ));

        assert!(matches!(
            engine.recruit_unit(city, UnitKind::Warrior),
            Err(GameError::NotEnoughProduction { needed: 20, .. })
        ));
        engine.state.players[0].pool = Yields::new(0, 25, 5, 0, 0);
        let events = engine.recruit_unit(city, UnitKind::Warrior).unwrap();
        assert!(matches!(events[0], Event::UnitRecruited { kind: UnitKind::Warrior, .. }));
        assert_eq!(engine.state().players[0].pool, Yields::new(0, 5, 0, 0, 0));
    }

    #[test]
    fn one_time_trade_executes_immediately() {
        let mut engine = two_humans(20, 20);
        engine.state.players[0].pool.gold = 40;
        engine.state.players[1].pool.food = 15;
        let events = engine
            .propose_trade(
                PlayerId(1),
                TradeTerms {
                    proposer_gives: TradeBundle::gold(30),
                    partner_gives: TradeBundle::default().with_resource(YieldType::Food, 10),
                    duration: TradeDuration::OneTime,
                },
            )
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(engine.state().players[0].pool.gold, 10);
        assert_eq!(engine.state().players[1].pool.gold, 30);
        assert_eq!(engine.state().players[0].pool.food, 10);
        assert!(engine.state().diplomacy.trades().is_empty());
    }

    #[test]
    fn end_turn_wraps_and_advances_the_world() {
        let mut engine = two_humans(20, 20);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.add_observer(Box::new(move |e: &Event| sink.borrow_mut().push(e.clone())));

        engine.end_turn().unwrap();
        assert_eq!(engine.current_player(), PlayerId(1));
        assert_eq!(engine.turn(), 0);
        engine.end_turn().unwrap();
        assert_eq!(engine.current_player(), PlayerId(0));
        assert_eq!(engine.turn(), 1);
        assert!(seen
            .borrow()
            .iter()
            .any(|e| matches!(e, Event::TurnStarted { turn: 1, player: PlayerId(0) })));
    }

    #[test]
    fn great_merchant_adds_gold_once() {
        let mut engine = two_humans(20, 20);
        let merchant = crate::rules::great_people_in(GreatPersonCategory::Merchant)
            .next()
            .unwrap();
        engine.state.players[0].great_people.push(merchant.id);
        engine.use_great_person(merchant.id, None).unwrap();
        assert_eq!(engine.state().players[0].pool.gold, merchant.power);
        assert!(matches!(
            engine.use_great_person(merchant.id, None),
            Err(GameError::UnknownGreatPerson)
        ));
    }

    #[test]
    fn save_now_uses_attached_persistence() {
        let mut engine = two_humans(12, 12);
        assert!(matches!(engine.save_now(), Err(GameError::NoPersistence)));
        let mut engine = engine.with_persistence(Box::new(MemoryPersistence::new()));
        let events = engine.save_now().unwrap();
        assert_eq!(events, vec![Event::GameSaved { turn: 0 }]);
    }
}

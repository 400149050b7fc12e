//! Hegemon Core - authoritative turn engine
//!
//! Owns the world grid, players, cities and units, and advances them one
//! player-turn at a time:
//! - economy, growth, territory occupation and research on each new round
//! - A* movement, deterministic combat, diplomacy and trade
//! - world events, great people and wonders
//! - victory evaluation and a heuristic AI for non-human seats
//!
//! Requests go through [`GameEngine`]; every accepted request returns the
//! [`Event`](hegemon_protocol::Event)s it produced.

mod ai;
pub mod city;
pub mod combat;
pub mod config;
pub mod diplomacy;
pub mod economy;
pub mod entities;
pub mod game;
pub mod map;
pub mod mapsource;
pub mod pathfinding;
pub mod persistence;
pub mod player;
pub mod progression;
pub mod rng;
pub mod rules;
pub mod state;
pub mod unit;
pub mod victory;
pub mod yields;

pub use ai::{best_city_site, choose_research, is_good_city_site, score_tech};
pub use config::{ConfigError, EngineConfig, VictoryConfig};
pub use game::{EngineObserver, GameEngine, GameError, PlayerSpec, MIN_CITY_DISTANCE};
pub use map::{GameMap, Tile};
pub use mapsource::{MapSource, ScatterMapSource, StaticMapSource};
pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence, PersistenceError};
pub use state::WorldState;
pub use yields::Yields;

pub use hegemon_protocol as protocol;

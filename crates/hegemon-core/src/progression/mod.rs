//! Bookkeeping that runs alongside the economy: random world events,
//! great-person points and the global wonder registry.

mod great_people;
mod wonders;
mod world_events;

pub use great_people::*;
pub use wonders::*;
pub use world_events::*;

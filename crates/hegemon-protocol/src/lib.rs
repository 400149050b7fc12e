//! Shared vocabulary for the Hegemon simulation engine.
//!
//! Everything here is plain, serializable data: identifiers, grid
//! coordinates, the closed catalogue enumerations, and the event stream the
//! engine emits to renderers, UI layers and persistence.

mod diplomacy;
mod event;
mod ids;
mod kinds;
mod notification;
mod pos;
mod victory;
pub mod wire;

pub use crate::diplomacy::*;
pub use crate::event::*;
pub use crate::ids::*;
pub use crate::kinds::*;
pub use crate::notification::*;
pub use crate::pos::*;
pub use crate::victory::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hegemon_protocol::{CityId, PlayerId, WonderKind};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{wonder:?} was already completed by player {owner:?}")]
pub struct WonderTaken {
    pub wonder: WonderKind,
    pub owner: PlayerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltWonder {
    pub wonder: WonderKind,
    pub owner: PlayerId,
    pub city: CityId,
    pub turn: u32,
}

/// Globally exclusive wonders: the first completion locks the wonder for
/// every other player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WonderRegistry {
    built: Vec<BuiltWonder>,
}

impl WonderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, wonder: WonderKind) -> Option<&BuiltWonder> {
        self.built.iter().find(|b| b.wonder == wonder)
    }

    pub fn is_built(&self, wonder: WonderKind) -> bool {
        self.get(wonder).is_some()
    }

    pub fn complete(
        &mut self,
        wonder: WonderKind,
        owner: PlayerId,
        city: CityId,
        turn: u32,
    ) -> Result<(), WonderTaken> {
        if let Some(existing) = self.get(wonder) {
            return Err(WonderTaken {
                wonder,
                owner: existing.owner,
            });
        }
        self.built.push(BuiltWonder {
            wonder,
            owner,
            city,
            turn,
        });
        Ok(())
    }

    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &BuiltWonder> {
        self.built.iter().filter(move |b| b.owner == player)
    }

    pub fn count_for(&self, player: PlayerId) -> usize {
        self.owned_by(player).count()
    }

    /// Wonders follow their host city when it changes hands.
    pub fn transfer_city(&mut self, city: CityId, new_owner: PlayerId) {
        for built in self.built.iter_mut().filter(|b| b.city == city) {
            built.owner = new_owner;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hegemon_protocol::EntityId;

    #[test]
    fn first_completion_locks_the_wonder() {
        let mut registry = WonderRegistry::new();
        let city = EntityId::new(0, 0);
        registry
            .complete(WonderKind::Pyramids, PlayerId(0), city, 12)
            .unwrap();
        let err = registry
            .complete(WonderKind::Pyramids, PlayerId(1), EntityId::new(1, 0), 13)
            .unwrap_err();
        assert_eq!(err.owner, PlayerId(0));
        assert_eq!(registry.count_for(PlayerId(0)), 1);
        assert_eq!(registry.count_for(PlayerId(1)), 0);
    }

    #[test]
    fn wonders_follow_captured_cities() {
        let mut registry = WonderRegistry::new();
        let city = EntityId::new(3, 1);
        registry
            .complete(WonderKind::Colossus, PlayerId(0), city, 5)
            .unwrap();
        registry.transfer_city(city, PlayerId(2));
        assert_eq!(registry.get(WonderKind::Colossus).map(|b| b.owner), Some(PlayerId(2)));
    }
}

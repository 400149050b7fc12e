use serde::{Deserialize, Serialize};

use hegemon_protocol::EntityId;

/// Slot-reusing storage for units and cities.
///
/// Ids carry the slot's generation at insertion time. Removing an entity
/// bumps the generation, so stale ids (a dead unit, a razed city) stop
/// resolving even after the slot is handed to someone new. Iteration is in
/// slot order, which keeps AI and world updates reproducible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityStore<T> {
    generations: Vec<u32>,
    values: Vec<Option<T>>,
    /// Vacant slots, reused last-freed first.
    vacant: Vec<u32>,
    live: usize,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            generations: Vec::new(),
            values: Vec::new(),
            vacant: Vec::new(),
            live: 0,
        }
    }
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        self.live += 1;
        match self.vacant.pop() {
            Some(index) => {
                self.values[index as usize] = Some(value);
                EntityId::new(index, self.generations[index as usize])
            }
            None => {
                let index = self.values.len() as u32;
                self.generations.push(0);
                self.values.push(Some(value));
                EntityId::new(index, 0)
            }
        }
    }

    #[inline]
    fn slot(&self, id: EntityId) -> Option<usize> {
        let index = id.index as usize;
        (self.generations.get(index) == Some(&id.generation)).then_some(index)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slot(id).and_then(|i| self.values[i].as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let index = self.slot(id)?;
        self.values[index].as_mut()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = self.slot(id)?;
        let value = self.values[index].take()?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.vacant.push(id.index);
        self.live -= 1;
        Some(value)
    }

    /// Two distinct live entities at once, in argument order.
    pub fn get2_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut T, &mut T)> {
        let (ia, ib) = (self.slot(a)?, self.slot(b)?);
        if ia == ib {
            return None;
        }
        let split = ia.max(ib);
        let (head, tail) = self.values.split_at_mut(split);
        let (low, high) = (head[ia.min(ib)].as_mut()?, tail[0].as_mut()?);
        Some(if ia < ib { (low, high) } else { (high, low) })
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn iter_ordered(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.generations
            .iter()
            .zip(&self.values)
            .enumerate()
            .filter_map(|(i, (generation, value))| {
                value.as_ref().map(|v| (EntityId::new(i as u32, *generation), v))
            })
    }

    pub fn iter_ordered_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.generations
            .iter()
            .zip(self.values.iter_mut())
            .enumerate()
            .filter_map(|(i, (generation, value))| {
                value.as_mut().map(|v| (EntityId::new(i as u32, *generation), v))
            })
    }

    /// Snapshot of live ids, for loops that mutate the store.
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter_ordered().map(|(id, _)| id).collect()
    }

    /// Ids of live entities matching `pred`, in slot order.
    pub fn ids_where(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<EntityId> {
        self.iter_ordered()
            .filter(|(_, v)| pred(v))
            .map(|(id, _)| id)
            .collect()
    }
}

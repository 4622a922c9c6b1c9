// Sparse per-component storage keyed by entity slot

use super::entity::Entity;

/// One optional component per entity slot.
///
/// Each occupied slot remembers the generation it was written for, so lookups
/// through a stale entity miss instead of returning a newer entity's data.
#[derive(Debug)]
pub struct Storage<T> {
    slots: Vec<Option<(u32, T)>>,
    len: usize,
}

impl<T> Storage<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Store `value` for `entity`. Hands the value back if the slot is taken.
    pub fn insert(&mut self, entity: Entity, value: T) -> Result<&mut T, T> {
        let slot = entity.index() as usize;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }

        match &mut self.slots[slot] {
            Some(_) => Err(value),
            empty => {
                self.len += 1;
                let (_, value) = empty.insert((entity.generation(), value));
                Ok(value)
            }
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        match self.slots.get(entity.index() as usize)? {
            Some((generation, value)) if *generation == entity.generation() => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match self.slots.get_mut(entity.index() as usize)? {
            Some((generation, value)) if *generation == entity.generation() => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Take the component out of its slot
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slots.get_mut(entity.index() as usize)?;
        if !matches!(slot, Some((generation, _)) if *generation == entity.generation()) {
            return None;
        }

        self.len -= 1;
        slot.take().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            entry
                .as_ref()
                .map(|(generation, value)| (Entity::new(slot as u32, *generation), value))
        })
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}

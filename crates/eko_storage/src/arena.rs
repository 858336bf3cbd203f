//! Generational arena for structure records.
//!
//! Slots are reused from a free list, and every slot carries a generation
//! counter so a key to a freed record never resolves to its successor.

use std::fmt;

/// Generational key into an [`Arena`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    /// Slot index.
    pub index: u32,
    /// Generation the slot had when this key was issued.
    pub generation: u32,
}

impl Key {
    /// Creates a key from its parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    /// Even generations are free, odd generations are occupied.
    generation: u32,
    value: Option<T>,
}

/// Slot storage with stale-key detection.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores a value and returns its key.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots are allocated.
    pub fn insert(&mut self, value: T) -> Key {
        self.len += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.value = Some(value);
            Key::new(index, slot.generation)
        } else {
            let index = u32::try_from(self.slots.len()).expect("arena slot index overflow");
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            Key::new(index, 1)
        }
    }

    /// Frees a slot, returning its value if the key was current.
    pub fn remove(&mut self, key: Key) -> Option<T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation || slot.generation % 2 == 0 {
            return None;
        }
        slot.generation += 1;
        self.free_list.push(key.index);
        self.len -= 1;
        slot.value.take()
    }

    /// True if the key resolves to an occupied slot.
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Resolves a key.
    #[must_use]
    pub fn get(&self, key: Key) -> Option<&T> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation == key.generation {
            slot.value.as_ref()
        } else {
            None
        }
    }

    /// Resolves a key mutably.
    pub fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation == key.generation {
            slot.value.as_mut()
        } else {
            None
        }
    }

    /// Frees every occupied slot. Outstanding keys become stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation += 1;
                #[allow(clippy::cast_possible_truncation)]
                self.free_list.push(index as u32);
            }
        }
        self.len = 0;
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            #[allow(clippy::cast_possible_truncation)]
            let key = Key::new(index as u32, slot.generation);
            slot.value.as_ref().map(|v| (key, v))
        })
    }
}

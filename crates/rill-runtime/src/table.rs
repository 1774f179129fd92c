//! Open-addressing hash table with interned-string keys.
//!
//! Linear probing, step 1, wrap-around; capacity grows 0 → 8 → doubling
//! when occupancy would pass 3/4. Keys are interned strings, so lookups
//! compare handles; the hashes live on the string objects, which is why
//! every operation takes the heap's object slice.
//!
//! Deletion leaves a tombstone so later probe chains stay connected.
//! `count` tracks live entries plus tombstones: a delete never decrements
//! it and an insert into a tombstone never increments it, so long
//! mutate-heavy probe chains still trigger growth. Growth re-inserts only
//! live entries and resets `count` to their number.

use crate::object::{Obj, ObjRef};
use crate::value::Value;

/// One probe slot.
#[derive(Debug, Default, Clone)]
enum Slot {
    /// Never occupied; terminates probe chains.
    #[default]
    Empty,
    /// Previously occupied; probe chains continue through it.
    Tombstone,
    /// A live key/value pair.
    Entry { key: ObjRef, value: Value },
}

/// Hash table mapping interned strings to values.
#[derive(Debug, Default)]
pub struct Table {
    slots: Vec<Slot>,
    /// Live entries plus tombstones (see module docs).
    count: usize,
}

/// The key's cached hash, read off the interned string object.
fn key_hash(objects: &[Obj], key: ObjRef) -> u32 {
    match &objects[key.0 as usize] {
        Obj::Str(s) => s.hash,
        other => unreachable!("table key {key:?} is not a string: {other:?}"),
    }
}

/// Index of the slot where `key` lives or would be inserted: the entry
/// holding `key`, else the first tombstone on the probe chain, else the
/// terminating empty slot.
fn find_slot(slots: &[Slot], objects: &[Obj], key: ObjRef) -> usize {
    let mut index = key_hash(objects, key) as usize % slots.len();
    let mut tombstone = None;
    loop {
        match &slots[index] {
            Slot::Empty => return tombstone.unwrap_or(index),
            Slot::Tombstone => {
                if tombstone.is_none() {
                    tombstone = Some(index);
                }
            }
            Slot::Entry { key: held, .. } => {
                if *held == key {
                    return index;
                }
            }
        }
        index = (index + 1) % slots.len();
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupancy as the grow check sees it: live entries plus tombstones.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts or updates. Returns true iff the key was not present.
    pub fn set(&mut self, objects: &[Obj], key: ObjRef, value: Value) -> bool {
        if self.count + 1 > self.slots.len() * 3 / 4 {
            self.grow(objects);
        }

        let index = find_slot(&self.slots, objects, key);
        let slot = &mut self.slots[index];
        let is_new = !matches!(slot, Slot::Entry { .. });
        // Occupying a tombstone reuses its contribution to `count`.
        if matches!(slot, Slot::Empty) {
            self.count += 1;
        }
        *slot = Slot::Entry { key, value };
        is_new
    }

    /// Looks up a key. Probing stops at the first empty slot; tombstones
    /// are walked through.
    pub fn get(&self, objects: &[Obj], key: ObjRef) -> Option<Value> {
        if self.count == 0 {
            return None;
        }
        match self.slots[find_slot(&self.slots, objects, key)] {
            Slot::Entry { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Removes a key, leaving a tombstone. Returns true iff it existed.
    pub fn delete(&mut self, objects: &[Obj], key: ObjRef) -> bool {
        if self.count == 0 {
            return false;
        }
        let index = find_slot(&self.slots, objects, key);
        match self.slots[index] {
            Slot::Entry { .. } => {
                self.slots[index] = Slot::Tombstone;
                true
            }
            _ => false,
        }
    }

    /// Copies every live entry into `dst`.
    pub fn add_all(&self, objects: &[Obj], dst: &mut Table) {
        for slot in &self.slots {
            if let Slot::Entry { key, value } = slot {
                dst.set(objects, *key, *value);
            }
        }
    }

    /// The interning lookup: finds a stored key with these exact bytes.
    ///
    /// The candidate string is not interned yet, so this is the one
    /// lookup that compares bytes (after the cheap hash and length
    /// checks) instead of handles.
    pub fn find_string(&self, objects: &[Obj], chars: &str, hash: u32) -> Option<ObjRef> {
        if self.count == 0 {
            return None;
        }
        let mut index = hash as usize % self.slots.len();
        loop {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Entry { key, .. } => {
                    let held = match &objects[key.0 as usize] {
                        Obj::Str(s) => s,
                        other => unreachable!("table key is not a string: {other:?}"),
                    };
                    if held.hash == hash && held.chars == chars {
                        return Some(*key);
                    }
                }
            }
            index = (index + 1) % self.slots.len();
        }
    }

    fn grow(&mut self, objects: &[Obj]) {
        let capacity = if self.slots.len() < 8 {
            8
        } else {
            self.slots.len() * 2
        };
        let old = std::mem::replace(&mut self.slots, vec![Slot::Empty; capacity]);

        // Tombstones are dropped here, so count restarts at live entries.
        self.count = 0;
        for slot in old {
            if let Slot::Entry { key, value } = slot {
                let index = find_slot(&self.slots, objects, key);
                self.slots[index] = Slot::Entry { key, value };
                self.count += 1;
            }
        }
    }
}

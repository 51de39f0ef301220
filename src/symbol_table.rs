//! Open‑addressing symbol table.
//!
//! All entries live directly in one slot array.  A key's home slot is
//! `|hash(key)| mod capacity`; collisions step linearly (+1, wrapping) until
//! an empty slot or the key is found.  Removal leaves a [`Slot::Tombstone`]
//! so probe chains running through the slot stay intact, and insertion
//! reuses the first tombstone on the key's chain.  After every insertion the
//! load factor is checked and the table doubles once it reaches
//! [`LOAD_FACTOR`].

use log::{debug, info};
use std::fmt;
use std::mem;

use crate::error::{ComputeError, Result};

/// Capacity of a table built with [`SymbolTable::default`].
pub const DEFAULT_CAPACITY: usize = 5;

/// Occupancy ratio at which an insertion triggers a doubling rehash.
pub const LOAD_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<V> {
    Empty,
    Tombstone,
    Occupied {
        key: String,
        value: V,
    },
}

/// Outcome of walking a key's probe chain.
enum Probe {
    /// Index of the occupied slot holding the key.
    Found(usize),

    /// Key absent; first tombstone or empty slot on the chain, if any.
    Vacant(Option<usize>),
}

/// 31‑multiplier polynomial hash over UTF‑16 code units with 32‑bit
/// wrapping arithmetic.  Stable across runs and platforms.
pub fn hash_key(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[derive(Debug, Clone)]
pub struct SymbolTable<V> {
    slots: Vec<Slot<V>>,
    size: usize,
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        SymbolTable::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<V> SymbolTable<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        info!("Creating symbol table with capacity {}", capacity);

        SymbolTable {
            slots: empty_slots(capacity),
            size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live (occupied) entries.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Physical slot array, tombstones and empties included.
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    fn home_slot(&self, key: &str) -> usize {
        hash_key(key).unsigned_abs() as usize % self.slots.len()
    }

    /// Walk the chain from the key's home slot, visiting each slot at most once.
    fn probe(&self, key: &str) -> Probe {
        let capacity: usize = self.slots.len();

        if capacity == 0 {
            return Probe::Vacant(None);
        }

        let mut index: usize = self.home_slot(key);
        let mut candidate: Option<usize> = None;

        for _ in 0..capacity {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(candidate.or(Some(index))),

                Slot::Tombstone => {
                    if candidate.is_none() {
                        candidate = Some(index);
                    }
                }

                Slot::Occupied { key: k, .. } if k == key => return Probe::Found(index),

                Slot::Occupied { .. } => {}
            }

            index = (index + 1) % capacity;
        }

        Probe::Vacant(candidate)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        match self.probe(key) {
            Probe::Found(index) => match &self.slots[index] {
                Slot::Occupied { value, .. } => Some(value),
                _ => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Insert or overwrite `key`.  Returns the previous value when the key
    /// was already present; that case never changes `size` or the slot.
    pub fn put<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        let key: String = key.into();

        match self.probe(&key) {
            Probe::Found(index) => match &mut self.slots[index] {
                Slot::Occupied { value: current, .. } => {
                    debug!("Overwriting '{}' in slot {}", key, index);
                    Some(mem::replace(current, value))
                }
                _ => unreachable!("probe reported a non-occupied slot as found"),
            },

            Probe::Vacant(Some(index)) => {
                debug!("Inserting '{}' into slot {}", key, index);

                self.slots[index] = Slot::Occupied { key, value };
                self.size += 1;

                let capacity: usize = self.slots.len();
                if self.size as f64 / capacity as f64 >= LOAD_FACTOR {
                    debug!(
                        "Load factor reached ({}/{}), growing",
                        self.size, capacity
                    );
                    self.rebuild(capacity * 2);
                }

                None
            }

            // Only a zero‑capacity table has nowhere to probe.
            Probe::Vacant(None) => {
                self.rebuild((self.slots.len() * 2).max(1));
                self.put(key, value)
            }
        }
    }

    /// Remove `key`, leaving a tombstone in its slot.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        match self.probe(key) {
            Probe::Found(index) => match mem::replace(&mut self.slots[index], Slot::Tombstone) {
                Slot::Occupied { value, .. } => {
                    self.size -= 1;
                    debug!("Removed '{}' from slot {}", key, index);
                    Some(value)
                }
                _ => unreachable!("probe reported a non-occupied slot as found"),
            },
            Probe::Vacant(_) => None,
        }
    }

    /// Move every live entry into a fresh array of `new_capacity` slots.
    ///
    /// Fails without touching the table when the entries would not fit.
    pub fn rehash(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity < self.size {
            debug!(
                "Rejecting rehash to {} with {} live entries",
                new_capacity, self.size
            );

            return Err(ComputeError::RehashCapacityTooSmall {
                requested: new_capacity,
                size: self.size,
            });
        }

        self.rebuild(new_capacity);

        Ok(())
    }

    /// Re‑insert through `put`, in old physical order; tombstones are dropped.
    fn rebuild(&mut self, new_capacity: usize) {
        info!(
            "Rehashing {} entries from capacity {} to {}",
            self.size,
            self.slots.len(),
            new_capacity
        );

        let old: Vec<Slot<V>> = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.size = 0;

        for slot in old {
            if let Slot::Occupied { key, value } = slot {
                self.put(key, value);
            }
        }
    }

    /// Live entries in physical slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key.as_str(), value)),
            _ => None,
        })
    }
}

impl<V: fmt::Display> SymbolTable<V> {
    /// Every slot on its own line: `[i]: key:value`, `[i]: Tombstone` or `[i]:`.
    pub fn debug_string(&self) -> String {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Slot::Empty => format!("[{}]:", i),
                Slot::Tombstone => format!("[{}]: Tombstone", i),
                Slot::Occupied { key, value } => format!("[{}]: {}:{}", i, key, value),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<V: fmt::Display> fmt::Display for SymbolTable<V> {
    /// One `key:value` per live entry, physical order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }

            write!(f, "{}:{}", key, value)?;
        }

        Ok(())
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

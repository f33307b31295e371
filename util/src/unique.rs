use std::hash::Hash;

use crate::{HashSet, Hasher};

/// Keeps track of values we've already encountered,
/// so that a sequence can be de-duplicated without reordering it.
pub struct Unique<T> {
    seen: HashSet<T>,
}

impl<T: Hash + Eq + Clone> Unique<T> {
    /// Create a new `Unique` with room for `cap` distinct values.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            seen: HashSet::with_capacity_and_hasher(cap, Hasher::default()),
        }
    }

    /// true the first time `val` is passed in, false on every later call.
    pub fn is_new(&mut self, val: &T) -> bool {
        if self.seen.contains(val) {
            false
        } else {
            self.seen.insert(val.clone());
            true
        }
    }
}

/// Remove repeated values, keeping the first occurrence of each in encounter order.
pub fn unique_everseen<T, I>(vals: I) -> Vec<T>
where
    T: Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let vals = vals.into_iter();
    let mut unique = Unique::with_capacity(vals.size_hint().0);
    vals.filter(|v| unique.is_new(v)).collect()
}

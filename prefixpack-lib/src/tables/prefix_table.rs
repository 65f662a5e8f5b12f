use crate::Result;
use ohno::bail;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Numeric lookup key: country calling code or number prefix digits.
pub type Prefix = u32;

/// An in-memory prefix table with unique keys, iterated in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable<V> {
    entries: BTreeMap<Prefix, V>,
}

/// Maps each prefix to a single label (regions, carriers, geocoding).
pub type LabelTable = PrefixTable<String>;

/// Maps each prefix to a list of timezone names.
pub type ZoneTable = PrefixTable<Vec<String>>;

impl<V> PrefixTable<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Add an entry, failing if `prefix` is already present.
    pub fn try_insert(&mut self, prefix: Prefix, value: V) -> Result<()> {
        match self.entries.entry(prefix) {
            Entry::Vacant(slot) => {
                let _ = slot.insert(value);
                Ok(())
            }
            Entry::Occupied(_) => bail!("repeated prefix {prefix}"),
        }
    }

    #[must_use]
    pub fn contains(&self, prefix: Prefix) -> bool {
        self.entries.contains_key(&prefix)
    }

    #[must_use]
    pub fn get(&self, prefix: Prefix) -> Option<&V> {
        self.entries.get(&prefix)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending prefix order.
    pub fn iter(&self) -> impl Iterator<Item = (Prefix, &V)> {
        self.entries.iter().map(|(&k, v)| (k, v))
    }
}

impl<V> Default for PrefixTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(Prefix, V)> for PrefixTable<V> {
    /// Collects entries, keeping the last value for a repeated prefix.
    ///
    /// Use [`PrefixTable::try_insert`] where repeats must be rejected.
    fn from_iter<I: IntoIterator<Item = (Prefix, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

use crate::Result;
use ohno::bail;
use rustc_hash::FxHashMap;

/// Largest number of distinct values a table can reference with a `u16` index.
pub const MAX_VALUES: usize = u16::MAX as usize;

/// Deduplicated, sorted value table for one prefix table.
///
/// Values are sorted bytewise before indices are assigned, so the same input
/// always produces the same blob and the same indices. Sorting also places
/// similar labels next to each other, which helps the compressor.
#[derive(Debug)]
pub struct Interner<'a> {
    values: Vec<&'a str>,
    indices: FxHashMap<&'a str, u16>,
}

impl<'a> Interner<'a> {
    /// Intern every value, in any order and with repeats.
    ///
    /// Fails when there are more than [`MAX_VALUES`] distinct values, or when a value
    /// contains the newline used to separate values in the blob.
    pub fn new(values: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut values: Vec<&'a str> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        if values.len() > MAX_VALUES {
            bail!(
                "too many distinct values to represent in a u16 index: {} (maximum {MAX_VALUES})",
                values.len()
            );
        }

        if let Some(bad) = values.iter().find(|v| v.contains('\n')) {
            bail!("value contains a newline and cannot be stored in the value blob: {bad:?}");
        }

        let mut indices = FxHashMap::with_capacity_and_hasher(values.len(), rustc_hash::FxBuildHasher);
        for (i, &value) in values.iter().enumerate() {
            #[expect(clippy::cast_possible_truncation, reason = "length checked against MAX_VALUES above")]
            let _ = indices.insert(value, i as u16);
        }

        Ok(Self { values, indices })
    }

    /// The distinct values, in index order.
    #[must_use]
    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of `value` in [`Self::values`].
    #[must_use]
    pub fn index_of(&self, value: &str) -> Option<u16> {
        self.indices.get(value).copied()
    }

    /// All values joined with `'\n'`, without a trailing separator.
    #[must_use]
    pub fn joined(&self) -> String {
        self.values.join("\n")
    }
}

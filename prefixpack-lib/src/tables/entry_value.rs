use super::{Interner, TableReader, TableWriter};
use crate::Result;
use ohno::{app_err, bail};

/// The value side of a prefix table entry, which selects the entry layout.
///
/// A single label is written as one `u16` index. A list of labels is written
/// as a `u8` count followed by one `u16` index per label, in list order.
pub trait EntryValue: Sized {
    /// Every string this value references, for interning.
    fn strings(&self) -> impl Iterator<Item = &str>;

    fn write_entry(&self, interner: &Interner<'_>, writer: &mut TableWriter) -> Result<()>;

    fn read_entry(reader: &mut TableReader<'_>, values: &[&str]) -> Result<Self>;
}

fn index_of(interner: &Interner<'_>, value: &str) -> Result<u16> {
    interner
        .index_of(value)
        .ok_or_else(|| app_err!("value {value:?} missing from the interned value table"))
}

fn value_at(values: &[&str], index: u16) -> Result<String> {
    values
        .get(usize::from(index))
        .map(|v| (*v).to_string())
        .ok_or_else(|| app_err!("value index {index} out of range ({} values)", values.len()))
}

impl EntryValue for String {
    fn strings(&self) -> impl Iterator<Item = &str> {
        core::iter::once(self.as_str())
    }

    fn write_entry(&self, interner: &Interner<'_>, writer: &mut TableWriter) -> Result<()> {
        writer.write_u16(index_of(interner, self)?);
        Ok(())
    }

    fn read_entry(reader: &mut TableReader<'_>, values: &[&str]) -> Result<Self> {
        value_at(values, reader.read_u16()?)
    }
}

impl EntryValue for Vec<String> {
    fn strings(&self) -> impl Iterator<Item = &str> {
        self.iter().map(String::as_str)
    }

    fn write_entry(&self, interner: &Interner<'_>, writer: &mut TableWriter) -> Result<()> {
        let Ok(count) = u8::try_from(self.len()) else {
            bail!("too many values for one prefix: {} (maximum {})", self.len(), u8::MAX);
        };

        writer.write_u8(count);
        for value in self {
            writer.write_u16(index_of(interner, value)?);
        }
        Ok(())
    }

    fn read_entry(reader: &mut TableReader<'_>, values: &[&str]) -> Result<Self> {
        let count = reader.read_u8()?;
        let mut result = Self::with_capacity(usize::from(count));
        for _ in 0..count {
            result.push(value_at(values, reader.read_u16()?)?);
        }
        Ok(result)
    }
}

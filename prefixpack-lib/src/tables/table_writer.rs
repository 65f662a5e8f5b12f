use super::{DeltaEncoder, EntryValue, Interner, Prefix, PrefixTable};
use crate::Result;
use ohno::bail;

const LOG_TARGET: &str = "    tables";

/// The uncompressed serialization of one prefix table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBuffer(Vec<u8>);

impl EncodedBuffer {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for EncodedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Builds a table buffer: value blob first, then the key/index entries.
///
/// The entry count precedes the entries, so a placeholder is written up front
/// and patched by [`TableWriter::finish`].
#[derive(Debug)]
pub struct TableWriter {
    buffer: Vec<u8>,
    keys: DeltaEncoder,
    count_offset: usize,
    entry_count: u32,
}

impl TableWriter {
    /// Start a buffer holding the interned value blob.
    pub fn new(interner: &Interner<'_>) -> Result<Self> {
        let blob = interner.joined();
        let Ok(blob_len) = u32::try_from(blob.len()) else {
            bail!("value blob of {} bytes does not fit a u32 length", blob.len());
        };

        let mut buffer = Vec::with_capacity(blob.len() + 8);
        buffer.extend_from_slice(&blob_len.to_le_bytes());
        buffer.extend_from_slice(blob.as_bytes());

        let count_offset = buffer.len();
        buffer.extend_from_slice(&[0u8; 4]);

        Ok(Self {
            buffer,
            keys: DeltaEncoder::new(),
            count_offset,
            entry_count: 0,
        })
    }

    #[must_use]
    pub const fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// Begin an entry by writing the key delta.
    pub fn write_key(&mut self, key: Prefix) {
        self.keys.push(u64::from(key), &mut self.buffer);
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn entry_done(&mut self) -> Result<()> {
        let Some(count) = self.entry_count.checked_add(1) else {
            bail!("too many entries for a u32 entry count");
        };
        self.entry_count = count;
        Ok(())
    }

    /// Patch the entry count and hand back the finished buffer.
    #[must_use]
    pub fn finish(mut self) -> EncodedBuffer {
        let count = self.entry_count.to_le_bytes();
        self.buffer[self.count_offset..self.count_offset + 4].copy_from_slice(&count);
        EncodedBuffer(self.buffer)
    }
}

/// Intern a table's values and serialize it.
pub fn serialize<V: EntryValue>(table: &PrefixTable<V>) -> Result<EncodedBuffer> {
    let interner = Interner::new(table.iter().flat_map(|(_, v)| v.strings()))?;
    let mut writer = TableWriter::new(&interner)?;

    for (key, value) in table.iter() {
        writer.write_key(key);
        value.write_entry(&interner, &mut writer)?;
        writer.entry_done()?;
    }

    log::debug!(
        target: LOG_TARGET,
        "Serialized {} entries with {} distinct values",
        writer.entry_count(),
        interner.len()
    );

    Ok(writer.finish())
}

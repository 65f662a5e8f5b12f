use super::{DeltaDecoder, EntryValue, Prefix, PrefixTable};
use crate::Result;
use ohno::{IntoAppError, app_err, bail};

/// Cursor over an encoded table buffer.
///
/// Every read is bounds-checked; a truncated or corrupt buffer produces an error.
#[derive(Debug)]
pub struct TableReader<'a> {
    data: &'a [u8],
    position: usize,
    keys: DeltaDecoder,
}

impl<'a> TableReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            keys: DeltaDecoder::new(),
        }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| app_err!("truncated table: need {len} bytes at offset {}, {} available", self.position, self.remaining()))?;

        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read the next key delta and return the absolute key.
    pub fn read_key(&mut self) -> Result<Prefix> {
        let key = self.keys.next_key(self.data, &mut self.position)?;
        Prefix::try_from(key).into_app_err_with(|| format!("prefix {key} does not fit in a u32"))
    }
}

/// Decode a buffer produced by [`super::serialize`].
///
/// Keys must be strictly ascending; a zero delta after the first entry is reported
/// as a repeated prefix.
pub fn decode<V: EntryValue>(data: &[u8]) -> Result<PrefixTable<V>> {
    let mut reader = TableReader::new(data);

    let blob_len = usize::try_from(reader.read_u32()?).into_app_err("value blob length does not fit in usize")?;
    let blob = core::str::from_utf8(reader.read_bytes(blob_len)?).into_app_err("value blob is not valid UTF-8")?;
    let values: Vec<&str> = blob.split('\n').collect();

    let count = reader.read_u32()?;
    let mut table = PrefixTable::new();
    for _ in 0..count {
        let key = reader.read_key()?;
        let value = V::read_entry(&mut reader, &values)?;
        table.try_insert(key, value)?;
    }

    if reader.remaining() != 0 {
        bail!(
            "{} trailing bytes at offset {} after {count} entries",
            reader.remaining(),
            reader.position()
        );
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{LabelTable, ZoneTable, serialize};

    fn zones(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_label_round_trip() {
        let mut table = LabelTable::new();
        table.try_insert(1, "North America".to_string()).unwrap();
        table.try_insert(44, "United Kingdom".to_string()).unwrap();
        table.try_insert(4_420, "London".to_string()).unwrap();
        table.try_insert(1_000_000, "United Kingdom".to_string()).unwrap();
        table.try_insert(1_000_001, String::new()).unwrap();

        let buffer = serialize(&table).unwrap();
        let decoded: LabelTable = decode(buffer.as_bytes()).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_zone_round_trip_preserves_order_within_key() {
        let mut table = ZoneTable::new();
        table.try_insert(1, zones(&["America/New_York", "America/Chicago", "America/Denver"])).unwrap();
        table.try_insert(44, zones(&["Europe/London"])).unwrap();
        table.try_insert(1_201, zones(&["America/New_York"])).unwrap();

        let buffer = serialize(&table).unwrap();
        let decoded: ZoneTable = decode(buffer.as_bytes()).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(decoded.get(1).unwrap()[0], "America/New_York");
    }

    #[test]
    fn test_empty_round_trip() {
        let buffer = serialize(&LabelTable::new()).unwrap();
        let decoded: LabelTable = decode(buffer.as_bytes()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_truncated_buffer() {
        let mut table = LabelTable::new();
        table.try_insert(1, "A".to_string()).unwrap();
        let buffer = serialize(&table).unwrap();

        let bytes = buffer.as_bytes();
        let result = decode::<String>(&bytes[..bytes.len() - 1]);
        assert!(result.unwrap_err().to_string().contains("truncated table"));
    }

    #[test]
    fn test_trailing_bytes() {
        let buffer = serialize(&LabelTable::new()).unwrap();
        let mut bytes = buffer.into_inner();
        bytes.push(0);

        let result = decode::<String>(&bytes);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("1 trailing bytes at offset 8 after 0 entries"), "{msg}");
    }

    #[test]
    fn test_invalid_utf8_blob() {
        let bytes = [1, 0, 0, 0, 0xFF, 0, 0, 0, 0];
        let result = decode::<String>(&bytes);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("not valid UTF-8"), "{msg}");
    }

    #[test]
    fn test_reader_tracks_position() {
        let bytes = [7, 1, 0, 2, 0, 0, 0];
        let mut reader = TableReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_u16().unwrap(), 1);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.read_u32().unwrap(), 2);
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_u8().unwrap_err().to_string().contains("truncated table"));
    }

    #[test]
    fn test_index_out_of_range() {
        // blob "A", one entry with key 1 pointing at index 5
        let bytes = [1, 0, 0, 0, b'A', 1, 0, 0, 0, 1, 5, 0];
        let result = decode::<String>(&bytes);
        assert!(result.unwrap_err().to_string().contains("value index 5 out of range"));
    }

    #[test]
    fn test_zero_delta_is_repeated_prefix() {
        // blob "A", two entries: key 3, then delta 0
        let bytes = [1, 0, 0, 0, b'A', 2, 0, 0, 0, 3, 0, 0, 0, 0, 0];
        let result = decode::<String>(&bytes);
        assert!(result.unwrap_err().to_string().contains("repeated prefix 3"));
    }
}

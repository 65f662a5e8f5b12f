//! Binary prefix table format.
//!
//! A prefix table maps numeric prefixes (country calling codes, number ranges)
//! to short string labels. Tables are built in memory from parsed records, then
//! serialized into a flat buffer that the runtime consumer decodes without
//! any additional metadata.
//!
//! # Encoding
//!
//! Three ideas keep the tables small:
//!
//! - Every distinct label is stored once. Labels are sorted, joined with
//!   newlines, and referenced by their `u16` position in that sorted list.
//! - Keys are sorted ascending and stored as the difference from the previous
//!   key, as an unsigned LEB128 varint. Clustered prefixes mostly fit in one byte.
//! - The whole buffer is later gzip-compressed (see [`crate::embed`]).
//!
//! # Binary Table Format
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ BLOB_LEN: u32 LE (4 bytes)                           │
//! │   - Length of the value blob in bytes                │
//! ├──────────────────────────────────────────────────────┤
//! │ BLOB: BLOB_LEN bytes                                 │
//! │   - Sorted distinct values joined with '\n'          │
//! │   - No trailing separator                            │
//! ├──────────────────────────────────────────────────────┤
//! │ ENTRY_COUNT: u32 LE (4 bytes)                        │
//! ├──────────────────────────────────────────────────────┤
//! │ Entries (variable length), ascending by key          │
//! │   - uvarint(key - previous_key), previous starts at 0│
//! │   - label tables: u16 LE value index                 │
//! │   - zone tables:  u8 count, then count x u16 LE      │
//! └──────────────────────────────────────────────────────┘
//! ```

mod delta_keys;
mod entry_value;
mod interner;
mod prefix_table;
mod table_reader;
mod table_writer;

pub use delta_keys::{DeltaDecoder, DeltaEncoder, decode_uvarint, encode_keys, encode_uvarint};
pub use entry_value::EntryValue;
pub use interner::{Interner, MAX_VALUES};
pub use prefix_table::{LabelTable, Prefix, PrefixTable, ZoneTable};
pub use table_reader::{TableReader, decode};
pub use table_writer::{EncodedBuffer, TableWriter, serialize};

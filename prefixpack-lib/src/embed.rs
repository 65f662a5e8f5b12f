//! Compression and generated-source rendering.
//!
//! This module knows nothing about tables: it turns bytes into a gzip-compressed,
//! base64-encoded string literal, and wraps such literals in a minimal source file
//! for the runtime consumer.

use crate::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use core::fmt::Write as _;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use ohno::IntoAppError;
use std::io::{Read, Write};

/// A generated source file declaring one constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSource {
    /// Name of the declared constant.
    pub name: String,

    /// Full text of the generated file.
    pub source: String,
}

/// Gzip-compress `data` and encode the result as standard padded base64.
pub fn encode_text(data: &[u8]) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).into_app_err("compressing embedded data")?;
    let compressed = encoder.finish().into_app_err("compressing embedded data")?;
    Ok(STANDARD.encode(compressed))
}

/// Inverse of [`encode_text`].
pub fn decode_text(text: &str) -> Result<Vec<u8>> {
    let compressed = STANDARD.decode(text).into_app_err("decoding base64 text")?;
    let mut data = Vec::new();
    let _ = GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut data)
        .into_app_err("decompressing embedded data")?;
    Ok(data)
}

/// Render a file declaring `variable` as the embedded form of `data`.
///
/// ```text
/// package <package>
///
/// var <variable> = "<base64>"
/// ```
pub fn generate_bin_file(package: &str, variable: &str, data: &[u8]) -> Result<EmbeddedSource> {
    let encoded = encode_text(data)?;

    let mut source = header(package);
    let _ = writeln!(source, "var {variable} = {}", quote(&encoded));

    Ok(EmbeddedSource {
        name: variable.to_string(),
        source,
    })
}

/// Render a file declaring `variable` as a map from key to the embedded form of each buffer.
///
/// Entries are emitted in iteration order.
pub fn generate_map_file<K, B>(package: &str, variable: &str, entries: impl IntoIterator<Item = (K, B)>) -> Result<EmbeddedSource>
where
    K: AsRef<str>,
    B: AsRef<[u8]>,
{
    let mut source = header(package);
    let _ = writeln!(source, "var {variable} = map[string]string {{");
    for (key, data) in entries {
        let encoded = encode_text(data.as_ref())?;
        let _ = writeln!(source, "\t{}: {},", quote(key.as_ref()), quote(&encoded));
    }
    source.push_str("}\n");

    Ok(EmbeddedSource {
        name: variable.to_string(),
        source,
    })
}

fn header(package: &str) -> String {
    format!("package {package}\n\n")
}

/// Double-quote `s` as a string literal, escaping quotes, backslashes, and control characters.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

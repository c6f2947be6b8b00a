//! Minimal protobuf access to ONNX `ModelProto.metadata_props`.
//!
//! The exporter needs exactly one thing from the ONNX container: the
//! repeated `StringStringEntryProto metadata_props = 14` field. Rather
//! than pulling in a protobuf stack for a single field, this module
//! speaks just enough of the wire format to stream over a serialized
//! `ModelProto`, and appends new entries by concatenation. Repeated
//! fields across concatenated messages merge, so the (potentially
//! multi-hundred-MB) graph payload is never rewritten.
//!
//! Appending to an already-patched artifact is permitted and produces
//! duplicate entries; the pipeline re-materializes the graph before each
//! patch, so duplicates only arise when the patch is driven by hand.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::error::GraphError;

/// `ModelProto.metadata_props` field number.
const METADATA_PROPS_FIELD: u64 = 14;
/// `StringStringEntryProto.key` / `.value` field numbers.
const KEY_FIELD: u64 = 1;
const VALUE_FIELD: u64 = 2;

const WIRE_VARINT: u8 = 0;
const WIRE_I64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_I32: u8 = 5;

/// Append string metadata entries to a serialized model, in place.
pub fn append_metadata(path: &Path, entries: &[(String, String)]) -> Result<(), GraphError> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(&encode_entries(entries))?;
    Ok(())
}

/// Read all metadata entries of a serialized model, in wire order.
/// Unknown fields, including the graph payload, are seeked past.
pub fn read_metadata(path: &Path) -> Result<Vec<(String, String)>, GraphError> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let mut entries = Vec::new();
    let mut pos = 0u64;

    while pos < len {
        let (tag, n) = read_varint(&mut reader)?;
        pos += n;

        match (tag & 7) as u8 {
            WIRE_VARINT => {
                let (_, n) = read_varint(&mut reader)?;
                pos += n;
            }
            WIRE_I64 => {
                reader.seek_relative(8)?;
                pos += 8;
            }
            WIRE_I32 => {
                reader.seek_relative(4)?;
                pos += 4;
            }
            WIRE_LEN => {
                let (payload_len, n) = read_varint(&mut reader)?;
                pos += n;
                let end = pos
                    .checked_add(payload_len)
                    .ok_or(GraphError::Malformed("field extends past end of file"))?;
                if end > len {
                    return Err(GraphError::Malformed("field extends past end of file"));
                }
                if tag >> 3 == METADATA_PROPS_FIELD {
                    let mut payload = vec![0u8; payload_len as usize];
                    reader.read_exact(&mut payload)?;
                    entries.push(decode_entry(&payload)?);
                } else {
                    reader.seek_relative(payload_len as i64)?;
                }
                pos += payload_len;
            }
            _ => return Err(GraphError::Malformed("unsupported wire type")),
        }
    }

    Ok(entries)
}

/// Encode entries as `metadata_props` wire records.
fn encode_entries(entries: &[(String, String)]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (key, value) in entries {
        let mut entry = Vec::new();
        put_len_field(&mut entry, KEY_FIELD, key.as_bytes());
        put_len_field(&mut entry, VALUE_FIELD, value.as_bytes());
        put_len_field(&mut buf, METADATA_PROPS_FIELD, &entry);
    }
    buf
}

/// Decode one `StringStringEntryProto` submessage.
fn decode_entry(mut payload: &[u8]) -> Result<(String, String), GraphError> {
    let mut key = String::new();
    let mut value = String::new();

    while !payload.is_empty() {
        let (tag, _) = read_varint(&mut payload)?;
        if (tag & 7) as u8 != WIRE_LEN {
            return Err(GraphError::Malformed("non-string field in metadata entry"));
        }
        let (field_len, _) = read_varint(&mut payload)?;
        let field_len = field_len as usize;
        if field_len > payload.len() {
            return Err(GraphError::Malformed("metadata entry field truncated"));
        }
        let text = std::str::from_utf8(&payload[..field_len])
            .map_err(|_| GraphError::Malformed("metadata entry is not UTF-8"))?;
        match tag >> 3 {
            KEY_FIELD => key = text.to_string(),
            VALUE_FIELD => value = text.to_string(),
            _ => {}
        }
        payload = &payload[field_len..];
    }

    Ok((key, value))
}

fn put_len_field(buf: &mut Vec<u8>, field: u64, bytes: &[u8]) {
    put_varint(buf, (field << 3) | u64::from(WIRE_LEN));
    put_varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn put_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Read one varint, returning the value and the number of bytes consumed.
fn read_varint(reader: &mut impl Read) -> Result<(u64, u64), GraphError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for i in 0..10u64 {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        if shift >= 64 {
            return Err(GraphError::Malformed("varint overflows 64 bits"));
        }
        value |= u64::from(byte[0] & 0x7f) << shift;
        if byte[0] & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    Err(GraphError::Malformed("varint longer than 10 bytes"))
}

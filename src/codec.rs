//! Decode and encode entry points
//!
//! Every model type decodes from raw JSON (bytes, text or an already parsed
//! [`Value`]) and encodes back to its exact wire shape. Decode failures carry
//! a JSON pointer to the field being read when the failure happened.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{WireError, WireResult};

/// Decode/encode contract, implemented for every serde model type.
pub trait Wire: Serialize + DeserializeOwned {
    fn decode(raw: &[u8]) -> WireResult<Self> {
        decode(raw)
    }

    fn decode_str(raw: &str) -> WireResult<Self> {
        decode_str(raw)
    }

    fn decode_value(value: Value) -> WireResult<Self> {
        decode_value(value)
    }

    fn encode(&self) -> WireResult<Vec<u8>> {
        encode(self)
    }

    fn encode_value(&self) -> WireResult<Value> {
        encode_value(self)
    }
}

impl<T: Serialize + DeserializeOwned> Wire for T {}

// ============================================================================
// Decode
// ============================================================================

pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> WireResult<T> {
    serde_json::from_slice(raw).map_err(|e| decode_error(raw, &e))
}

pub fn decode_str<T: DeserializeOwned>(raw: &str) -> WireResult<T> {
    decode(raw.as_bytes())
}

/// Decode from an already parsed value.
///
/// A value carries no positions, so on failure it is rendered once more and
/// re-read as text to locate the offending field.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> WireResult<T> {
    match <T as serde::Deserialize>::deserialize(&value) {
        Ok(decoded) => Ok(decoded),
        Err(err) => {
            let raw = serde_json::to_vec(&value).map_err(WireError::Encode)?;
            match serde_json::from_slice::<T>(&raw) {
                Err(located) => Err(decode_error(&raw, &located)),
                Ok(_) => Err(WireError::Decode {
                    path: String::new(),
                    message: err.to_string(),
                    line: 0,
                    column: 0,
                }),
            }
        }
    }
}

fn decode_error(raw: &[u8], err: &serde_json::Error) -> WireError {
    let (line, column) = (err.line(), err.column());
    let message = err.to_string();
    let suffix = format!(" at line {} column {}", line, column);
    let message = message
        .strip_suffix(suffix.as_str())
        .map(str::to_string)
        .unwrap_or(message);

    if err.is_syntax() || err.is_eof() {
        return WireError::Syntax {
            message,
            line,
            column,
        };
    }

    WireError::Decode {
        path: locate(raw, line, column),
        message,
        line,
        column,
    }
}

// ============================================================================
// Encode
// ============================================================================

pub fn encode<T: Serialize + ?Sized>(value: &T) -> WireResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(WireError::Encode)
}

pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> WireResult<Value> {
    serde_json::to_value(value).map_err(WireError::Encode)
}

/// Render a value as text, indented or compact.
pub fn render(value: &Value, pretty: bool) -> WireResult<String> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(WireError::Encode)
    } else {
        serde_json::to_string(value).map_err(WireError::Encode)
    }
}

// ============================================================================
// Field Location
// ============================================================================

enum Frame {
    Object { key: Option<String>, pending: Option<String> },
    Array { index: usize },
}

/// Byte offset of a 1-based (line, column) position reported by serde_json.
fn byte_offset(raw: &[u8], line: usize, column: usize) -> usize {
    if line == 0 {
        return raw.len();
    }
    let mut offset = 0;
    for (n, chunk) in raw.split(|b| *b == b'\n').enumerate() {
        if n + 1 == line {
            return (offset + column).min(raw.len());
        }
        offset += chunk.len() + 1;
    }
    raw.len()
}

/// JSON pointer of the innermost field open at the error position.
///
/// Best effort: the scan trusts the input to be well formed up to the
/// reported position, which serde_json guarantees for data errors.
fn locate(raw: &[u8], line: usize, column: usize) -> String {
    let end = byte_offset(raw, line, column);
    let mut stack: Vec<Frame> = Vec::new();
    let mut i = 0;

    while i < end {
        match raw[i] {
            b'"' => {
                let start = i + 1;
                i += 1;
                while i < raw.len() && raw[i] != b'"' {
                    if raw[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if let Some(Frame::Object { key: None, pending }) = stack.last_mut() {
                    let text = &raw[start..i.min(raw.len())];
                    *pending = Some(unescape(text));
                }
            }
            b':' => {
                if let Some(Frame::Object { key, pending }) = stack.last_mut() {
                    *key = pending.take();
                }
            }
            b',' => match stack.last_mut() {
                Some(Frame::Object { key, pending }) => {
                    *key = None;
                    *pending = None;
                }
                Some(Frame::Array { index }) => *index += 1,
                None => {}
            },
            b'{' => stack.push(Frame::Object {
                key: None,
                pending: None,
            }),
            b'[' => stack.push(Frame::Array { index: 0 }),
            b'}' | b']' => {
                // A container closed right at the error position is the one
                // that failed (e.g. a missing field).
                if i + 1 >= end {
                    if let Some(Frame::Object { key, .. }) = stack.last_mut() {
                        *key = None;
                    }
                } else {
                    stack.pop();
                }
            }
            _ => {}
        }
        i += 1;
    }

    let mut path = String::new();
    for frame in &stack {
        match frame {
            Frame::Object { key: Some(key), .. } => {
                path.push('/');
                path.push_str(&key.replace('~', "~0").replace('/', "~1"));
            }
            Frame::Object { key: None, .. } => {}
            Frame::Array { index } => {
                path.push('/');
                path.push_str(&index.to_string());
            }
        }
    }
    path
}

fn unescape(text: &[u8]) -> String {
    let quoted = [b"\"".as_slice(), text, b"\"".as_slice()].concat();
    serde_json::from_slice::<String>(&quoted)
        .unwrap_or_else(|_| String::from_utf8_lossy(text).into_owned())
}

// ============================================================================
// Canonical Comparison
// ============================================================================

/// JSON pointers of input values that did not survive a decode/encode cycle.
///
/// Reports keys and array elements missing from `canonical` (unknown fields)
/// and values that changed on the way (normalised numbers, an explicit
/// `"severity": 0`).
pub fn dropped_fields(input: &Value, canonical: &Value) -> Vec<String> {
    let mut dropped = Vec::new();
    collect_dropped(input, canonical, String::new(), &mut dropped);
    dropped
}

fn collect_dropped(input: &Value, canonical: &Value, path: String, out: &mut Vec<String>) {
    match (input, canonical) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, value) in a {
                let child = format!("{}/{}", path, key.replace('~', "~0").replace('/', "~1"));
                match b.get(key) {
                    Some(other) => collect_dropped(value, other, child, out),
                    None => out.push(child),
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for (i, x) in a.iter().enumerate() {
                let child = format!("{}/{}", path, i);
                match b.get(i) {
                    Some(y) => collect_dropped(x, y, child, out),
                    None => out.push(child),
                }
            }
        }
        _ => {
            if input != canonical {
                out.push(path);
            }
        }
    }
}

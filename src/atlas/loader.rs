//! Atlas loading from property list and JSON documents.

use super::Atlas;
use crate::error::{Result, UnpackError};
use plist::Value;
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;

/// Load an atlas from a file path.
///
/// Files ending in `.json` are read as JSON, everything else as a property
/// list (XML or binary).
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Atlas> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;

    let atlas = if is_json_path(path) {
        load_from_json(&data)?
    } else {
        load_from_bytes(&data)?
    };

    tracing::debug!("Loaded {} frames from {:?}", atlas.len(), path);
    Ok(atlas)
}

/// Load an atlas from property list bytes.
pub fn load_from_bytes(data: &[u8]) -> Result<Atlas> {
    Ok(plist::from_bytes(data)?)
}

/// Load an atlas from JSON bytes, as written by [`to_json`].
pub fn load_from_json(data: &[u8]) -> Result<Atlas> {
    Ok(serde_json::from_slice(data)?)
}

/// Load the untyped document tree of an atlas file.
///
/// Keys keep their document spelling and order, which the typed [`Atlas`]
/// normalizes away.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;

    if is_json_path(path) {
        Ok(serde_json::from_slice(&data)?)
    } else {
        Ok(Value::from_reader(Cursor::new(data))?)
    }
}

/// Build an atlas from an already loaded document tree.
pub fn from_document(document: &Value) -> Result<Atlas> {
    Ok(plist::from_value(document)?)
}

/// Scalar entries of the frame dictionary `name`, as written.
///
/// Arrays and nested dictionaries (such as `aliases`) are left out.
pub fn frame_fields<'a>(
    document: &'a Value,
    name: &str,
) -> Result<Vec<(&'a str, &'a Value)>> {
    let frame = document
        .as_dictionary()
        .and_then(|root| root.get("frames"))
        .and_then(Value::as_dictionary)
        .and_then(|frames| frames.get(name))
        .and_then(Value::as_dictionary)
        .ok_or_else(|| UnpackError::UnknownSprite(name.to_string()))?;

    Ok(frame
        .iter()
        .filter(|(_, value)| !matches!(value, Value::Array(_) | Value::Dictionary(_)))
        .map(|(key, value)| (key.as_str(), value))
        .collect())
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Serialize an atlas as JSON indented with four spaces.
pub fn to_json(atlas: &Atlas) -> Result<String> {
    to_json_pretty(atlas)
}

pub(crate) fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    value.serialize(&mut serializer)?;

    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Small XML reading helpers shared by the inner-document and key-file
//! readers.

use crate::types::{Error, Result};
use std::io::Read;
use uuid::Uuid;
use xml::attribute::OwnedAttribute;
use xml::common::Position;
use xml::reader::{self, EventReader};

/// Attempts to read binary (base64) data.
pub fn read_binary<R: Read>(reader: &mut EventReader<R>) -> Result<Vec<u8>> {
    match read_binary_opt(reader)? {
        Some(bytes) => Ok(bytes),
        None => Ok(Vec::new()),
    }
}

/// Attempts to read optional binary (base64) data.
pub fn read_binary_opt<R: Read>(reader: &mut EventReader<R>) -> Result<Option<Vec<u8>>> {
    match read_string_opt(reader)? {
        Some(string) => match base64::decode(&string) {
            Ok(bin) => Ok(Some(bin)),
            Err(err) => read_err(reader, format!("Base64 {}", err)),
        },
        None => Ok(None),
    }
}

/// Creates a new read error result, annotated with the reader's position.
pub fn read_err<S, R, X>(reader: &mut EventReader<R>, msg: S) -> Result<X>
where
    R: Read,
    S: Into<String>,
{
    let msg: String = msg.into();
    let pos = reader.position();
    Err(Error::MalformedXML(format!("{} {}", pos, msg)))
}

/// Attempts to read a string, returning an empty string for an empty
/// element.
pub fn read_string<R: Read>(reader: &mut EventReader<R>) -> Result<String> {
    match read_string_opt(reader)? {
        Some(string) => Ok(string),
        None => Ok(String::new()),
    }
}

/// Attempts to read an optional string.
pub fn read_string_opt<R: Read>(reader: &mut EventReader<R>) -> Result<Option<String>> {
    let event = reader.next()?;
    match event {
        reader::XmlEvent::Characters(val) => Ok(Some(val)),
        reader::XmlEvent::EndElement { .. } => Ok(None),
        _ => read_err(reader, "No characters found"),
    }
}

/// Attempts to read a UUID, base64-encoded over its 16 raw bytes in the
/// inner XML, returning its canonical hyphenated string form.
pub fn read_uuid_opt<R: Read>(reader: &mut EventReader<R>) -> Result<Option<String>> {
    match read_binary_opt(reader)? {
        Some(bytes) => match Uuid::from_slice(&bytes) {
            Ok(uuid) => Ok(Some(uuid.to_string())),
            Err(err) => read_err(reader, format!("UUID {}", err)),
        },
        None => Ok(None),
    }
}

/// Searches `attrs` for an attribute with exactly this `name`, returning
/// its value if found. Matching is case-sensitive, as required by the
/// `Protected` attribute.
pub fn search_attr_value(attrs: &[OwnedAttribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| attr.name.local_name == name)
        .map(|attr| attr.value.clone())
}

/// Returns true if `attrs` contains `Protected="True"` — an exact,
/// case-sensitive match on both the attribute name and its value.
pub fn is_protected(attrs: &[OwnedAttribute]) -> bool {
    search_attr_value(attrs, "Protected")
        .map(|value| value == "True")
        .unwrap_or(false)
}

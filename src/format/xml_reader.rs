// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The XML reader for the inner kdbx3 document.
//!
//! Builds a plain (non-arena) tree while walking the document; the
//! caller flattens it into the database's arenas afterwards. Keeping
//! the walk free of arena bookkeeping keeps the Salsa20 cursor's
//! document-order threading the only thing this module has to get
//! right.

use crate::crypto::salsa20::{self, Salsa20};
use crate::types::{Error, Result, StreamKey};
use std::io::Read;
use super::xml;
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

/// A group as read from the XML, before it is assigned an arena index.
#[derive(Clone, Debug, Default)]
pub struct RawGroup {
    pub uuid: String,
    pub name: String,
    pub notes: String,
    pub groups: Vec<RawGroup>,
    pub entries: Vec<RawEntry>,
}

/// An entry as read from the XML, before it is assigned an arena index.
#[derive(Clone, Debug, Default)]
pub struct RawEntry {
    pub uuid: String,
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
    pub icon: Option<i32>,
    pub tags: Vec<String>,
}

/// The result of parsing the inner document.
pub struct ParsedDocument {
    pub root: RawGroup,
    pub header_hash: Option<Vec<u8>>,
}

/// Parses the inner XML document rooted at `KeePassFile`, decrypting
/// protected field values with a Salsa20 cipher seeded from
/// `stream_key`.
pub fn read<R: Read>(reader: R, stream_key: &StreamKey) -> Result<ParsedDocument> {
    let mut cipher = salsa20::new_cipher(stream_key);
    let mut reader = EventReader::new(reader);
    let mut header_hash = None;
    let mut root = None;

    loop {
        match reader.next()? {
            XmlEvent::StartElement { name, .. } => match name.local_name.as_str() {
                "Meta" => header_hash = read_meta(&mut reader)?,
                "Root" => root = Some(read_root(&mut reader, &mut cipher)?),
                _ => {}
            },
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }

    match root {
        Some(root) => Ok(ParsedDocument { root, header_hash }),
        None => xml::read_err(&mut reader, "No Root/Group element found"),
    }
}

fn read_meta<R: Read>(reader: &mut EventReader<R>) -> Result<Option<Vec<u8>>> {
    let mut header_hash = None;
    loop {
        match reader.next()? {
            XmlEvent::StartElement { name, .. } => {
                if name.local_name == "HeaderHash" {
                    header_hash = xml::read_binary_opt(reader)?;
                }
            }
            XmlEvent::EndElement { name, .. } => {
                if name.local_name == "Meta" {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(header_hash)
}

fn read_root<R: Read>(reader: &mut EventReader<R>, cipher: &mut Salsa20) -> Result<RawGroup> {
    let mut root = None;
    loop {
        match reader.next()? {
            XmlEvent::StartElement { name, .. } => {
                if name.local_name == "Group" {
                    root = Some(read_group(reader, cipher)?);
                }
            }
            XmlEvent::EndElement { name, .. } => {
                if name.local_name == "Root" {
                    break;
                }
            }
            _ => {}
        }
    }
    match root {
        Some(root) => Ok(root),
        None => xml::read_err(reader, "No Group element found under Root"),
    }
}

fn read_group<R: Read>(reader: &mut EventReader<R>, cipher: &mut Salsa20) -> Result<RawGroup> {
    let mut group = RawGroup::default();
    loop {
        match reader.next()? {
            XmlEvent::StartElement { name, .. } => match name.local_name.as_str() {
                "Name" => group.name = xml::read_string(reader)?,
                "Notes" => group.notes = xml::read_string(reader)?,
                "UUID" => group.uuid = xml::read_uuid_opt(reader)?.unwrap_or_default(),
                "Group" => group.groups.push(read_group(reader, cipher)?),
                "Entry" => group.entries.push(read_entry(reader, cipher)?),
                _ => {}
            },
            XmlEvent::EndElement { name, .. } => {
                if name.local_name == "Group" {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(group)
}

fn read_entry<R: Read>(reader: &mut EventReader<R>, cipher: &mut Salsa20) -> Result<RawEntry> {
    let mut entry = RawEntry::default();
    loop {
        match reader.next()? {
            XmlEvent::StartElement { name, .. } => match name.local_name.as_str() {
                "UUID" => entry.uuid = xml::read_uuid_opt(reader)?.unwrap_or_default(),
                "String" => read_string_field(reader, cipher, &mut entry)?,
                "IconID" => {
                    entry.icon = xml::read_string_opt(reader)?.and_then(|s| s.parse().ok())
                }
                "Tags" => {
                    entry.tags = xml::read_string_opt(reader)?
                        .map(|s| {
                            s.split(',')
                                .map(|t| t.trim().to_string())
                                .filter(|t| !t.is_empty())
                                .collect()
                        })
                        .unwrap_or_default()
                }
                // History holds past snapshots of this entry. They are not
                // part of the tree this crate exposes, but their protected
                // strings still consume Salsa20 keystream in document
                // order, so each historical Entry is parsed and discarded.
                "History" => read_history(reader, cipher)?,
                _ => {}
            },
            XmlEvent::EndElement { name, .. } => {
                if name.local_name == "Entry" {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(entry)
}

fn read_history<R: Read>(reader: &mut EventReader<R>, cipher: &mut Salsa20) -> Result<()> {
    loop {
        match reader.next()? {
            XmlEvent::StartElement { name, .. } => {
                if name.local_name == "Entry" {
                    read_entry(reader, cipher)?;
                }
            }
            XmlEvent::EndElement { name, .. } => {
                if name.local_name == "History" {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn read_string_field<R: Read>(
    reader: &mut EventReader<R>,
    cipher: &mut Salsa20,
    entry: &mut RawEntry,
) -> Result<()> {
    let mut key = None;
    let mut value = String::new();
    loop {
        match reader.next()? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => match name.local_name.as_str() {
                "Key" => key = Some(xml::read_string(reader)?),
                "Value" => value = read_value(reader, cipher, &attributes)?,
                _ => {}
            },
            XmlEvent::EndElement { name, .. } => {
                if name.local_name == "String" {
                    break;
                }
            }
            _ => {}
        }
    }

    if let Some(key) = key {
        match key.as_str() {
            "Title" => entry.title = value,
            "UserName" => entry.username = value,
            "Password" => entry.password = value,
            "URL" => entry.url = value,
            "Notes" => entry.notes = value,
            _ => {}
        }
    }
    Ok(())
}

fn read_value<R: Read>(
    reader: &mut EventReader<R>,
    cipher: &mut Salsa20,
    attrs: &[OwnedAttribute],
) -> Result<String> {
    if xml::is_protected(attrs) {
        let ciphertext = xml::read_binary(reader)?;
        let plaintext = salsa20::decrypt(cipher, &ciphertext);
        String::from_utf8(plaintext)
            .map_err(|err| Error::MalformedXML(format!("protected value not UTF-8: {}", err)))
    } else {
        xml::read_string(reader)
    }
}

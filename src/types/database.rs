// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The decrypted database: an arena of groups and entries, built once
//! during `open` and read-only for the rest of its lifetime.

use crate::common;
use crate::compression::gzip;
use crate::crypto::sha256;
use crate::format::{block_stream, header, xml_reader};
use crate::format::xml_reader::{RawEntry, RawGroup};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use super::composite_key::CompositeKey;
use super::entry::{Entry, EntryNode};
use super::error::Error;
use super::export_format::ExportFormat;
use super::group::{Group, GroupNode, GroupRef};
use super::master_key::MasterKey;
use super::path;
use super::result::Result;
use super::stream_key::StreamKey;
use super::transformed_key::TransformedKey;

/// The decrypted, read-only database tree.
#[derive(Clone, Debug)]
pub struct Database {
    pub(crate) groups: Vec<GroupNode>,
    pub(crate) entries: Vec<EntryNode>,

    /// The inner XML document exactly as reassembled from the hashed
    /// block stream (after an optional gunzip), before this crate's
    /// Salsa20 pass over protected fields. `export` writes this out
    /// verbatim or gzip-compressed; protected `Value` elements in it
    /// remain Salsa20-ciphertext.
    inner_xml: Vec<u8>,
}

impl Database {
    /// Opens a kdbx3 database from `reader`, decrypting it with `key`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use kdbx3::{CompositeKey, Database};
    /// use std::fs::File;
    ///
    /// # fn open_example() -> kdbx3::Result<()> {
    /// let mut file = File::open("passwords.kdbx")?;
    /// let key = CompositeKey::from_password("password");
    /// let db = Database::open(&mut file, &key)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open<R: Read>(reader: &mut R, key: &CompositeKey) -> Result<Database> {
        let (hdr, raw_header) = header::read(reader)?;

        let transformed_key =
            TransformedKey::new(key, &hdr.transform_seed, &hdr.transform_rounds);
        let master_key = MasterKey::new(&hdr.master_seed, &transformed_key);

        let inner_xml = block_stream::read(
            reader,
            &master_key,
            &hdr.encryption_iv,
            &hdr.stream_start_bytes,
            hdr.compression,
        )?;

        let stream_key = StreamKey::new(&hdr.inner_stream_key);
        let parsed = xml_reader::read(inner_xml.as_slice(), &stream_key)?;

        if let Some(expected) = parsed.header_hash {
            let actual = sha256::hash(&[&raw_header]);
            if expected.as_slice() != &actual[..] {
                return Err(Error::CorruptPayload(String::from(
                    "header hash does not match decrypted <Meta><HeaderHash>",
                )));
            }
        }

        let mut db = Database {
            groups: Vec::new(),
            entries: Vec::new(),
            inner_xml,
        };
        db.flatten_root(parsed.root);
        Ok(db)
    }

    /// The root group of the tree (name `"/"`, no parent).
    pub fn root(&self) -> GroupRef {
        GroupRef::new(self, 0)
    }

    /// Writes the inner XML document to `target`, either verbatim
    /// (`ExportFormat::Xml`) or gzip-compressed (`ExportFormat::GZip`).
    /// Protected fields remain Salsa20-ciphertext in the export, exactly
    /// as reassembled from the block stream.
    ///
    /// Writes atomically: the document is written to a temporary sibling
    /// of `target`, fsynced, then renamed over `target`.
    pub fn export(&self, target: &Path, format: ExportFormat) -> Result<()> {
        let data = match format {
            ExportFormat::Xml => self.inner_xml.clone(),
            ExportFormat::GZip => gzip::encode(&self.inner_xml)?,
        };

        let tmp_path = sibling_tmp_path(target);
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, target)?;
        Ok(())
    }

    /// Synthesizes the root group (name `/`, regardless of what the XML's
    /// outer `Group` element was named) and recursively flattens the
    /// parsed tree into the arena.
    fn flatten_root(&mut self, root: RawGroup) {
        let index = self.groups.len();
        self.groups.push(GroupNode {
            group: Group {
                uuid: root.uuid,
                name: String::from(common::ROOT_GROUP_NAME),
                notes: root.notes,
            },
            parent: None,
            path: String::from("/"),
            groups: Vec::new(),
            entries: Vec::new(),
        });

        for entry in root.entries {
            self.push_raw_entry(entry, index);
        }
        for group in root.groups {
            self.flatten_group(group, index);
        }
    }

    fn flatten_group(&mut self, raw: RawGroup, parent: usize) -> usize {
        let parent_path = self.groups[parent].path.clone();
        let node_path = path::normalize_path(&format!("{}/{}", parent_path, raw.name));

        let index = self.groups.len();
        self.groups.push(GroupNode {
            group: Group {
                uuid: raw.uuid,
                name: raw.name,
                notes: raw.notes,
            },
            parent: Some(parent),
            path: node_path,
            groups: Vec::new(),
            entries: Vec::new(),
        });
        self.groups[parent].groups.push(index);

        for entry in raw.entries {
            self.push_raw_entry(entry, index);
        }
        for group in raw.groups {
            self.flatten_group(group, index);
        }
        index
    }

    fn push_raw_entry(&mut self, raw: RawEntry, parent: usize) -> usize {
        let index = self.entries.len();
        self.entries.push(EntryNode {
            entry: Entry {
                uuid: raw.uuid,
                title: raw.title,
                username: raw.username,
                password: raw.password,
                url: raw.url,
                notes: raw.notes,
                icon: raw.icon,
                tags: raw.tags,
            },
            parent,
        });
        self.groups[parent].entries.push(index);
        index
    }

    #[cfg(test)]
    pub(crate) fn new_empty() -> Database {
        let mut db = Database {
            groups: Vec::new(),
            entries: Vec::new(),
            inner_xml: Vec::new(),
        };
        db.groups.push(GroupNode {
            group: Group {
                uuid: String::from("root"),
                name: String::from(common::ROOT_GROUP_NAME),
                notes: String::new(),
            },
            parent: None,
            path: String::from("/"),
            groups: Vec::new(),
            entries: Vec::new(),
        });
        db
    }

    #[cfg(test)]
    pub(crate) fn root_index(&self) -> usize {
        0
    }

    #[cfg(test)]
    pub(crate) fn push_group(&mut self, group: Group, parent: usize, path: String) -> usize {
        let index = self.groups.len();
        self.groups.push(GroupNode {
            group,
            parent: Some(parent),
            path,
            groups: Vec::new(),
            entries: Vec::new(),
        });
        self.groups[parent].groups.push(index);
        index
    }

    #[cfg(test)]
    pub(crate) fn push_entry(&mut self, entry: Entry, parent: usize) -> usize {
        let index = self.entries.len();
        self.entries.push(EntryNode { entry, parent });
        self.groups[parent].entries.push(index);
        index
    }
}

fn sibling_tmp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Cursor;

    fn make_kdbx3(
        password: &str,
        compression: crate::types::Compression,
        inner_xml: &[u8],
    ) -> (Vec<u8>, CompositeKey) {
        use crate::crypto::{aes256, sha256};
        use crate::types::{
            CompositeKey, EncryptionIv, InnerStreamKey, MasterSeed, StreamStartBytes,
            TransformRounds, TransformSeed,
        };
        use byteorder::{LittleEndian, WriteBytesExt};

        let key = CompositeKey::from_password(password);
        let rounds = TransformRounds(2);
        let transform_seed = TransformSeed([1u8; 32]);
        let master_seed = MasterSeed([2u8; 32]);
        let encryption_iv = EncryptionIv([3u8; 16]);
        let stream_start = StreamStartBytes([7u8; 32]);
        let inner_stream_key = InnerStreamKey([9u8; 32]);

        let transformed = TransformedKey::new(&key, &transform_seed, &rounds);
        let master_key = MasterKey::new(&master_seed, &transformed);

        let body = match compression {
            crate::types::Compression::GZip => gzip::encode(inner_xml).unwrap(),
            crate::types::Compression::None => inner_xml.to_vec(),
        };

        let mut plaintext = Vec::new();
        plaintext.extend_from_slice(&stream_start.0);
        plaintext.write_u32::<LittleEndian>(0).unwrap();
        plaintext.extend_from_slice(&sha256::hash(&[&body]));
        plaintext.write_u32::<LittleEndian>(body.len() as u32).unwrap();
        plaintext.extend_from_slice(&body);
        plaintext.write_u32::<LittleEndian>(1).unwrap();
        plaintext.extend_from_slice(&[0u8; 32]);
        plaintext.write_u32::<LittleEndian>(0).unwrap();

        let ciphertext = aes256::encrypt(&master_key, &encryption_iv, &plaintext).unwrap();

        let mut file = Vec::new();
        file.extend_from_slice(&common::PRIMARY_SIGNATURE);
        file.extend_from_slice(&common::SECONDARY_SIGNATURE);
        file.write_u16::<LittleEndian>(1).unwrap();
        file.write_u16::<LittleEndian>(3).unwrap();

        let field = |buf: &mut Vec<u8>, id: u8, value: &[u8]| {
            buf.push(id);
            buf.write_u16::<LittleEndian>(value.len() as u16).unwrap();
            buf.extend_from_slice(value);
        };

        const AES_CIPHER_ID: [u8; 16] = [
            0x31, 0xc1, 0xf2, 0xe6, 0xbf, 0x71, 0x43, 0x50, 0xbe, 0x58, 0x05, 0x21, 0x6a, 0xfc,
            0x5a, 0xff,
        ];

        field(&mut file, 2, &AES_CIPHER_ID);
        let compression_flags: u32 = match compression {
            crate::types::Compression::None => 0,
            crate::types::Compression::GZip => 1,
        };
        field(&mut file, 3, &compression_flags.to_le_bytes());
        field(&mut file, 4, &master_seed.0);
        field(&mut file, 5, &transform_seed.0);
        field(&mut file, 6, &rounds.0.to_le_bytes());
        field(&mut file, 7, &encryption_iv.0);
        field(&mut file, 8, &inner_stream_key.0);
        field(&mut file, 9, &stream_start.0);
        field(&mut file, 10, &2u32.to_le_bytes());
        field(&mut file, 0, &[0u8; 4]);

        file.extend_from_slice(&ciphertext);
        (file, key)
    }

    fn sample_xml(password_plain: &str, inner_stream_key: &InnerStreamKeyHelper) -> String {
        let encrypted = inner_stream_key.encrypt(password_plain);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<KeePassFile>
  <Root>
    <Group>
      <Name>Root</Name>
      <Notes></Notes>
      <UUID>e3RoaXNpc2EzMmJ5dGVzIQ==</UUID>
      <Group>
        <Name>General</Name>
        <Notes></Notes>
        <UUID>e3RoaXNpc2EzMmJ5dGVzIQ==</UUID>
        <Entry>
          <UUID>e3RoaXNpc2EzMmJ5dGVzIQ==</UUID>
          <String>
            <Key>Title</Key>
            <Value>Sample</Value>
          </String>
          <String>
            <Key>UserName</Key>
            <Value>user</Value>
          </String>
          <String>
            <Key>Password</Key>
            <Value Protected="True">{}</Value>
          </String>
        </Entry>
      </Group>
    </Group>
  </Root>
</KeePassFile>"#,
            encrypted
        )
    }

    struct InnerStreamKeyHelper;

    impl InnerStreamKeyHelper {
        fn encrypt(&self, plaintext: &str) -> String {
            use crate::crypto::salsa20;
            use crate::types::InnerStreamKey;
            let stream_key = StreamKey::new(&InnerStreamKey([9u8; 32]));
            let mut cipher = salsa20::new_cipher(&stream_key);
            let ciphertext = salsa20::encrypt(&mut cipher, &plaintext.as_bytes().to_vec());
            base64::encode(ciphertext)
        }
    }

    #[test]
    fn test_open_with_correct_password_decrypts_tree() {
        let helper = InnerStreamKeyHelper;
        let xml = sample_xml("pw", &helper);
        let (file, key) = make_kdbx3("abcdefg", crate::types::Compression::GZip, xml.as_bytes());
        let mut reader = Cursor::new(file);
        let db = Database::open(&mut reader, &key).unwrap();
        let general = db.root().find_group("/General").unwrap();
        assert!(general.has_entry("Sample"));
        let entry = general
            .entries()
            .into_iter()
            .find(|e| e.title() == "Sample")
            .unwrap();
        assert_eq!(entry.password(), "pw");
        assert_eq!(entry.username(), "user");
    }

    #[test]
    fn test_open_with_wrong_password_fails_with_invalid_password() {
        let helper = InnerStreamKeyHelper;
        let xml = sample_xml("pw", &helper);
        let (file, _) = make_kdbx3("abcdefg", crate::types::Compression::GZip, xml.as_bytes());
        let wrong_key = CompositeKey::from_password("wrong");
        let mut reader = Cursor::new(file);
        match Database::open(&mut reader, &wrong_key) {
            Err(Error::InvalidPassword) => {}
            other => panic!("expected InvalidPassword, got {:?}", other),
        }
    }

    #[test]
    fn test_open_with_empty_protected_password_yields_empty_string() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<KeePassFile>
  <Root>
    <Group>
      <Name>Root</Name>
      <Notes></Notes>
      <UUID>e3RoaXNpc2EzMmJ5dGVzIQ==</UUID>
      <Entry>
        <UUID>e3RoaXNpc2EzMmJ5dGVzIQ==</UUID>
        <String>
          <Key>Password</Key>
          <Value Protected="True"></Value>
        </String>
      </Entry>
    </Group>
  </Root>
</KeePassFile>"#;
        let (file, key) = make_kdbx3("abcdefg", crate::types::Compression::None, xml.as_bytes());
        let mut reader = Cursor::new(file);
        let db = Database::open(&mut reader, &key).unwrap();
        let entry = &db.root().entries()[0];
        assert_eq!(entry.password(), "");
    }

    #[test]
    fn test_open_fails_with_bad_signature() {
        let mut file = vec![0u8; 64];
        file[0] = 0xff;
        let key = CompositeKey::from_password("abcdefg");
        let mut reader = Cursor::new(file);
        match Database::open(&mut reader, &key) {
            Err(Error::BadSignature) => {}
            other => panic!("expected BadSignature, got {:?}", other),
        }
    }

    #[test]
    fn test_export_then_reopen_yields_same_tree() {
        let helper = InnerStreamKeyHelper;
        let xml = sample_xml("pw", &helper);
        let (file, key) = make_kdbx3("abcdefg", crate::types::Compression::None, xml.as_bytes());
        let mut reader = Cursor::new(file);
        let db = Database::open(&mut reader, &key).unwrap();

        let dir = std::env::temp_dir().join(format!(
            "kdbx3-export-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let target = dir.join("export.xml");
        db.export(&target, ExportFormat::Xml).unwrap();

        let exported = std::fs::read(&target).unwrap();
        assert_eq!(exported, db.inner_xml);
        std::fs::remove_dir_all(&dir).ok();
    }
}

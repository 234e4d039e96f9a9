// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The header reader for kdbx3 databases.

use crate::common;
use crate::io::{ByteReader, TeeReader};
use crate::types::{
    Compression, EncryptionIv, Error, InnerStreamKey, MasterSeed, Result, StreamStartBytes,
    TransformRounds, TransformSeed, Version,
};
use std::io::Read;

/// The identifier of the AES-256 cipher.
const AES_CIPHER_ID: [u8; 16] = [
    0x31, 0xc1, 0xf2, 0xe6, 0xbf, 0x71, 0x43, 0x50, 0xbe, 0x58, 0x05, 0x21, 0x6a, 0xfc, 0x5a, 0xff,
];

/// The Salsa20 inner random stream identifier.
const SALSA20_STREAM_ID: u32 = 2;

const END_HID: u8 = 0;
const CIPHER_ID_HID: u8 = 2;
const COMPRESSION_HID: u8 = 3;
const MASTER_SEED_HID: u8 = 4;
const TRANSFORM_SEED_HID: u8 = 5;
const TRANSFORM_ROUNDS_HID: u8 = 6;
const ENCRYPTION_IV_HID: u8 = 7;
const INNER_STREAM_KEY_HID: u8 = 8;
const STREAM_START_BYTES_HID: u8 = 9;
const INNER_STREAM_ID_HID: u8 = 10;

/// The decoded kdbx3 header.
#[derive(Clone, Debug)]
pub struct Header {
    pub version: Version,
    pub compression: Compression,
    pub master_seed: MasterSeed,
    pub transform_seed: TransformSeed,
    pub transform_rounds: TransformRounds,
    pub encryption_iv: EncryptionIv,
    pub inner_stream_key: InnerStreamKey,
    pub stream_start_bytes: StreamStartBytes,
}

/// Reads the header from `reader`, returning the decoded header and the raw
/// header bytes (terminator inclusive) consumed while reading it.
///
/// The raw bytes are needed by the caller to verify an optional
/// `<Meta><HeaderHash>` element found later in the inner XML.
pub fn read<R: Read>(reader: &mut R) -> Result<(Header, Vec<u8>)> {
    let mut tee = TeeReader::new(reader);
    let header = {
        let mut byte_reader = ByteReader::new(&mut tee);
        read_header(&mut byte_reader)?
    };
    Ok((header, tee.logged().to_vec()))
}

fn read_header<R: Read>(reader: &mut ByteReader<R>) -> Result<Header> {
    read_signature(reader)?;
    let version = read_version(reader)?;

    let mut cipher_id_seen = false;
    let mut compression = None;
    let mut master_seed = None;
    let mut transform_seed = None;
    let mut transform_rounds = None;
    let mut encryption_iv = None;
    let mut inner_stream_key = None;
    let mut stream_start_bytes = None;
    let mut inner_stream_id_seen = false;

    loop {
        let field_id = reader.read_u8()?;
        let length = reader.read_u16_le()? as usize;
        let value = reader.read_vec(length)?;

        match field_id {
            END_HID => break,
            CIPHER_ID_HID => {
                if cipher_id_seen {
                    return Err(duplicate_field(field_id));
                }
                if value.as_slice() != &AES_CIPHER_ID[..] {
                    return Err(Error::UnsupportedCipher);
                }
                cipher_id_seen = true;
            }
            COMPRESSION_HID => {
                if compression.is_some() {
                    return Err(duplicate_field(field_id));
                }
                let flags = read_u32_le(&value)?;
                compression = Some(match flags {
                    0 => Compression::None,
                    _ => Compression::GZip,
                });
            }
            MASTER_SEED_HID => {
                if master_seed.is_some() {
                    return Err(duplicate_field(field_id));
                }
                master_seed = Some(MasterSeed(to_array32(&value)?));
            }
            TRANSFORM_SEED_HID => {
                if transform_seed.is_some() {
                    return Err(duplicate_field(field_id));
                }
                transform_seed = Some(TransformSeed(to_array32(&value)?));
            }
            TRANSFORM_ROUNDS_HID => {
                if transform_rounds.is_some() {
                    return Err(duplicate_field(field_id));
                }
                transform_rounds = Some(TransformRounds(read_u64_le(&value)?));
            }
            ENCRYPTION_IV_HID => {
                if encryption_iv.is_some() {
                    return Err(duplicate_field(field_id));
                }
                encryption_iv = Some(EncryptionIv(to_array16(&value)?));
            }
            INNER_STREAM_KEY_HID => {
                if inner_stream_key.is_some() {
                    return Err(duplicate_field(field_id));
                }
                inner_stream_key = Some(InnerStreamKey(to_array32(&value)?));
            }
            STREAM_START_BYTES_HID => {
                if stream_start_bytes.is_some() {
                    return Err(duplicate_field(field_id));
                }
                stream_start_bytes = Some(StreamStartBytes(to_array32(&value)?));
            }
            INNER_STREAM_ID_HID => {
                if inner_stream_id_seen {
                    return Err(duplicate_field(field_id));
                }
                let id = read_u32_le(&value)?;
                if id != SALSA20_STREAM_ID {
                    return Err(Error::UnsupportedInnerStream(id));
                }
                inner_stream_id_seen = true;
            }
            _ => {}
        }
    }

    if !cipher_id_seen {
        return Err(Error::MissingHeaderField(CIPHER_ID_HID));
    }
    if !inner_stream_id_seen {
        return Err(Error::MissingHeaderField(INNER_STREAM_ID_HID));
    }

    Ok(Header {
        version,
        compression: compression.ok_or(Error::MissingHeaderField(COMPRESSION_HID))?,
        master_seed: master_seed.ok_or(Error::MissingHeaderField(MASTER_SEED_HID))?,
        transform_seed: transform_seed.ok_or(Error::MissingHeaderField(TRANSFORM_SEED_HID))?,
        transform_rounds: transform_rounds
            .ok_or(Error::MissingHeaderField(TRANSFORM_ROUNDS_HID))?,
        encryption_iv: encryption_iv.ok_or(Error::MissingHeaderField(ENCRYPTION_IV_HID))?,
        inner_stream_key: inner_stream_key
            .ok_or(Error::MissingHeaderField(INNER_STREAM_KEY_HID))?,
        stream_start_bytes: stream_start_bytes
            .ok_or(Error::MissingHeaderField(STREAM_START_BYTES_HID))?,
    })
}

fn duplicate_field(field_id: u8) -> Error {
    Error::CorruptPayload(format!("duplicate header field {}", field_id))
}

fn read_signature<R: Read>(reader: &mut ByteReader<R>) -> Result<()> {
    let primary = reader.read_vec(4)?;
    let secondary = reader.read_vec(4)?;
    if primary.as_slice() != &common::PRIMARY_SIGNATURE[..]
        || secondary.as_slice() != &common::SECONDARY_SIGNATURE[..]
    {
        return Err(Error::BadSignature);
    }
    Ok(())
}

fn read_version<R: Read>(reader: &mut ByteReader<R>) -> Result<Version> {
    let minor = reader.read_u16_le()?;
    let major = reader.read_u16_le()?;
    if major != common::SUPPORTED_MAJOR_VERSION {
        return Err(Error::UnsupportedVersion(major));
    }
    Ok(Version { major, minor })
}

fn read_u32_le(value: &[u8]) -> Result<u32> {
    if value.len() != 4 {
        return Err(Error::TruncatedInput);
    }
    Ok(u32::from(value[0])
        | (u32::from(value[1]) << 8)
        | (u32::from(value[2]) << 16)
        | (u32::from(value[3]) << 24))
}

fn read_u64_le(value: &[u8]) -> Result<u64> {
    if value.len() != 8 {
        return Err(Error::TruncatedInput);
    }
    let mut array = [0u8; 8];
    array.copy_from_slice(value);
    Ok(u64::from_le_bytes(array))
}

fn to_array16(value: &[u8]) -> Result<[u8; 16]> {
    if value.len() != 16 {
        return Err(Error::TruncatedInput);
    }
    let mut array = [0u8; 16];
    array.copy_from_slice(value);
    Ok(array)
}

fn to_array32(value: &[u8]) -> Result<[u8; 32]> {
    if value.len() != 32 {
        return Err(Error::TruncatedInput);
    }
    let mut array = [0u8; 32];
    array.copy_from_slice(value);
    Ok(array)
}

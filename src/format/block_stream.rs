// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Decrypts the outer AES-256-CBC payload and reassembles the hashed
//! block stream into the inner XML document.

use crate::compression::gzip;
use crate::crypto::{aes256, sha256};
use crate::io::ByteReader;
use crate::rust_crypto::util::fixed_time_eq;
use crate::types::{Compression, EncryptionIv, Error, MasterKey, Result, StreamStartBytes};
use std::io::{Cursor, Read};

const FINAL_BLOCK_HASH: [u8; 32] = [0; 32];

/// Decrypts `ciphertext` with `master_key`/`encryption_iv`, validates
/// `stream_start_bytes`, reassembles the hashed block stream and,
/// when `compression` requests it, gunzips the result.
pub fn read<R: Read>(
    reader: &mut R,
    master_key: &MasterKey,
    encryption_iv: &EncryptionIv,
    stream_start_bytes: &StreamStartBytes,
    compression: Compression,
) -> Result<Vec<u8>> {
    let mut ciphertext = Vec::new();
    reader.read_to_end(&mut ciphertext)?;
    let plaintext = aes256::decrypt(master_key, encryption_iv, &ciphertext)?;

    if plaintext.len() < 32 {
        return Err(Error::InvalidPassword);
    }
    if !fixed_time_eq(&plaintext[..32], &stream_start_bytes.0) {
        return Err(Error::InvalidPassword);
    }

    let data = reassemble(&plaintext[32..])?;

    match compression {
        Compression::GZip => gzip::decode(&data)
            .map_err(|err| Error::CorruptPayload(format!("gunzip failed: {}", err))),
        Compression::None => Ok(data),
    }
}

fn reassemble(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = ByteReader::new(Cursor::new(data));
    let mut result = Vec::new();
    let mut expected_index = 0u32;

    loop {
        let index = reader.read_u32_le()?;
        if index != expected_index {
            return Err(Error::CorruptPayload(format!(
                "expected block index {}, found {}",
                expected_index, index
            )));
        }

        let mut hash = [0u8; 32];
        reader.read_exact(&mut hash)?;
        let size = reader.read_u32_le()? as usize;
        let block = reader.read_vec(size)?;

        if size == 0 {
            if hash == FINAL_BLOCK_HASH {
                break;
            }
            return Err(Error::CorruptPayload(String::from(
                "final block has a non-zero hash",
            )));
        }

        if sha256::hash(&[&block]) != hash {
            return Err(Error::CorruptPayload(format!(
                "block {} hash mismatch",
                index
            )));
        }

        result.extend_from_slice(&block);
        expected_index += 1;
    }

    Ok(result)
}

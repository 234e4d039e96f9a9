// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::key_file_type::KeyFileType;
use super::result::Result;
use crate::format::kf_reader;
use secstr::SecStr;
use std::io::Read;

/// The 32 bytes of key material recovered from a key file, and the
/// encoding they were recovered from.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyFile {
    /// The key data.
    pub key: SecStr,

    /// The encoding the key material was recovered from.
    pub file_type: KeyFileType,
}

impl KeyFile {
    /// Attempts to recover 32 bytes of key material from `reader`, trying
    /// each of four encodings in turn: a 32-byte binary file used
    /// verbatim, a 64-character hex file, an XML file with a
    /// `/KeyFile/Key/Data` element, or (failing all three) the SHA-256
    /// hash of the whole file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use kdbx3::Result;
    /// use kdbx3::KeyFile;
    /// use std::fs::File;
    ///
    /// # fn open_example() -> Result<()> {
    /// let mut file = File::open("passwords.key")?;
    /// let key = KeyFile::open(&mut file)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open<R: Read>(reader: &mut R) -> Result<KeyFile> {
        kf_reader::read(reader)
    }
}

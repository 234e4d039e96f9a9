// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Endian-aware sequential reads that fail loudly on truncation.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;
use crate::types::{Error, Result};

/// Wraps a plain `Read` and turns short reads into `TruncatedInput`
/// instead of silently returning a partial buffer.
pub struct ByteReader<R> {
    inner: R,
}

impl<R: Read> ByteReader<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> ByteReader<R> {
        ByteReader { inner: inner }
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        map_truncated(self.inner.read_u8())
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        map_truncated(self.inner.read_u16::<LittleEndian>())
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        map_truncated(self.inner.read_u32::<LittleEndian>())
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64> {
        map_truncated(self.inner.read_u64::<LittleEndian>())
    }

    /// Read exactly `buf.len()` bytes.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(ref e) if e.kind() == ::std::io::ErrorKind::UnexpectedEof => {
                Err(Error::TruncatedInput)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Read exactly `n` bytes into a freshly allocated vector.
    pub fn read_vec(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read every remaining byte.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.inner.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Borrow the wrapped reader.
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

fn map_truncated<T>(result: ::std::io::Result<T>) -> Result<T> {
    match result {
        Ok(val) => Ok(val),
        Err(ref e) if e.kind() == ::std::io::ErrorKind::UnexpectedEof => {
            Err(Error::TruncatedInput)
        }
        Err(e) => Err(Error::Io(e)),
    }
}

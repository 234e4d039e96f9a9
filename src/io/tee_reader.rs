// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A reader that remembers every byte it has handed out.

use std::io::{self, Read};

/// Wraps a reader and copies every byte it yields into an internal log.
///
/// Used by the header parser to retain the raw header bytes (terminator
/// included) for the optional `HeaderHash` check.
pub struct TeeReader<R> {
    inner: R,
    log: Vec<u8>,
}

impl<R: Read> TeeReader<R> {
    /// Wrap a reader, logging is on from the start.
    pub fn new(inner: R) -> TeeReader<R> {
        TeeReader {
            inner: inner,
            log: Vec::new(),
        }
    }

    /// The bytes read so far.
    pub fn logged(&self) -> &[u8] {
        &self.log
    }

    /// Consume the reader, returning the wrapped reader and the log.
    pub fn into_inner(self) -> (R, Vec<u8>) {
        (self.inner, self.log)
    }
}

impl<R: Read> Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.log.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_tee_reader_logs_every_byte_read() {
        let mut reader = TeeReader::new(Cursor::new(vec![1u8, 2, 3, 4]));
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.logged(), &[1, 2]);
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.logged(), &[1, 2, 3, 4]);
    }
}

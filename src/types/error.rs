// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::rust_crypto::symmetriccipher::SymmetricCipherError;
use std::error;
use std::fmt;
use std::io;
use xml::reader as xmlreader;

/// Error type for kdbx loading and exporting.
#[derive(Debug)]
pub enum Error {
    /// The first 8 bytes of the file do not match the kdbx signature.
    BadSignature,

    /// `version_major` is not 3.
    UnsupportedVersion(u16),

    /// A read ran past the end of the input.
    TruncatedInput,

    /// A required header field was absent at the header terminator.
    MissingHeaderField(u8),

    /// `cipher_id` does not identify AES-256.
    UnsupportedCipher,

    /// `inner_random_stream_id` is not 2 (Salsa20).
    UnsupportedInnerStream(u32),

    /// Neither a passphrase nor a key file was supplied.
    NoCredential,

    /// PKCS#7 unpadding failed, or `stream_start_bytes` did not match —
    /// almost always caused by the wrong passphrase or key file.
    InvalidPassword,

    /// A hashed block's hash or index did not match, or decompression
    /// of the concatenated block stream failed.
    CorruptPayload(String),

    /// The inner XML failed to parse, or a required element was missing.
    MalformedXML(String),

    /// The key file could not be interpreted by any of its supported
    /// encodings.
    InvalidKeyFile,

    /// An I/O error occurred reading the source or writing an export.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BadSignature => write!(f, "bad kdbx signature"),
            Error::UnsupportedVersion(val) => write!(f, "unsupported version: {}", val),
            Error::TruncatedInput => write!(f, "truncated input"),
            Error::MissingHeaderField(id) => write!(f, "missing header field: {}", id),
            Error::UnsupportedCipher => write!(f, "unsupported cipher (only AES-256 is supported)"),
            Error::UnsupportedInnerStream(val) => {
                write!(f, "unsupported inner random stream: {}", val)
            }
            Error::NoCredential => write!(f, "no passphrase or key file supplied"),
            Error::InvalidPassword => write!(f, "invalid password or key file"),
            Error::CorruptPayload(ref msg) => write!(f, "corrupt payload: {}", msg),
            Error::MalformedXML(ref msg) => write!(f, "malformed XML: {}", msg),
            Error::InvalidKeyFile => write!(f, "invalid key file"),
            Error::Io(ref err) => write!(f, "IO error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<xmlreader::Error> for Error {
    fn from(err: xmlreader::Error) -> Error {
        Error::MalformedXML(format!("{}", err))
    }
}

impl From<SymmetricCipherError> for Error {
    fn from(_: SymmetricCipherError) -> Error {
        // Both padding and length failures from a CBC decrypt are, in
        // practice, the wrong passphrase or key file — not a distinguishable
        // corruption of the ciphertext itself.
        Error::InvalidPassword
    }
}

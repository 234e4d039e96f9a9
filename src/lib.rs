// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Read-only loader for KeePass 2.x KDBX3.1 password databases.
//!
//! # Usage
//!
//! To use this crate, add the following to your Cargo.toml:
//!
//! ```toml
//! [dependencies]
//! kdbx3 = "0.1.0"
//! ```
//!
//! # Examples
//!
//! Open the KeePass database passwords.kdbx using the password "password" and
//! print its root group:
//!
//! ```rust,no_run
//! use kdbx3::{CompositeKey, Database};
//! use std::fs::File;
//!
//! fn main() {
//!     let mut file = File::open("passwords.kdbx").unwrap();
//!     let key = CompositeKey::from_password("password");
//!     let db = Database::open(&mut file, &key).unwrap();
//!     println!("{}", db.root().details(0, false));
//! }
//! ```
//!
//! Open the database using both the password "password" and the key file
//! passwords.key:
//!
//! ```rust,no_run
//! use kdbx3::{CompositeKey, Database, KeyFile};
//! use std::fs::File;
//!
//! fn main() {
//!     let mut file = File::open("passwords.key").unwrap();
//!     let key_file = KeyFile::open(&mut file).unwrap();
//!     let key = CompositeKey::from_both("password", key_file);
//!
//!     let mut file = File::open("passwords.kdbx").unwrap();
//!     let db = Database::open(&mut file, &key).unwrap();
//!     println!("{}", db.root().details(0, false));
//! }
//! ```
//!
//! # Not Implemented
//!
//! The following is deliberately out of scope:
//!
//! - Writing or mutating a database.
//! - KeePass 1 databases.
//! - KDBX4 (argon2, ChaCha20, inner binaries).

extern crate byteorder;
extern crate crypto as rust_crypto;
extern crate flate2;
extern crate secstr;
extern crate uuid;
extern crate xml;

pub use types::CompositeKey;
pub use types::Compression;
pub use types::Database;
pub use types::Entry;
pub use types::EntryRef;
pub use types::Error;
pub use types::ExportFormat;
pub use types::Group;
pub use types::GroupRef;
pub use types::KeyFile;
pub use types::KeyFileType;
pub use types::Result;
pub use types::Version;
pub use types::{absolute_path, normalize_path};

mod common;
mod compression;
mod crypto;
mod format;
mod io;
mod types;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

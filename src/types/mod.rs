// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub use self::composite_key::CompositeKey;
pub use self::compression::Compression;
pub use self::database::Database;
pub use self::encryption_iv::EncryptionIv;
pub use self::entry::{Entry, EntryRef};
pub use self::error::Error;
pub use self::export_format::ExportFormat;
pub use self::group::{Group, GroupRef};
pub use self::inner_stream_key::InnerStreamKey;
pub use self::key_file::KeyFile;
pub use self::key_file_type::KeyFileType;
pub use self::master_key::MasterKey;
pub use self::master_seed::MasterSeed;
pub use self::path::{absolute_path, normalize_path};
pub use self::result::Result;
pub use self::stream_key::StreamKey;
pub use self::stream_start_bytes::StreamStartBytes;
pub use self::transform_rounds::TransformRounds;
pub use self::transform_seed::TransformSeed;
pub use self::transformed_key::TransformedKey;
pub use self::version::Version;

mod composite_key;
mod compression;
mod database;
mod encryption_iv;
mod entry;
mod error;
mod export_format;
mod group;
mod inner_stream_key;
mod key_file;
mod key_file_type;
mod master_key;
mod master_seed;
mod path;
mod result;
mod stream_key;
mod stream_start_bytes;
mod transform_rounds;
mod transform_seed;
mod transformed_key;
mod version;

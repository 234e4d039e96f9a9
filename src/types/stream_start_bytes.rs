// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// The 32 bytes prefixed to the decrypted payload; compared against the
/// first 32 bytes of the decryption result to authenticate the key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StreamStartBytes(pub [u8; 32]);

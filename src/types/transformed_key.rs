// Copyright (c) 2016-2017 Martijn Rijkeboer <mrr@sru-systems.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::rust_crypto::aesni;

use crate::crypto::sha256;
use crate::rust_crypto::aes;
use crate::rust_crypto::aessafe;
use crate::rust_crypto::symmetriccipher::BlockEncryptor;
use crate::rust_crypto::util;
use secstr::SecStr;
use std::thread;
use super::composite_key::CompositeKey;
use super::transform_rounds::TransformRounds;
use super::transform_seed::TransformSeed;

/// Key used for generating the master key.
///
/// This data type uses secstr's `SecStr` to protect the key data. To
/// retrieve the protected data use the `unsecure` method.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformedKey(SecStr);

impl TransformedKey {
    /// Create a new transformed key by running AES-256-ECB self-encryption
    /// over the composite key `rounds` times.
    ///
    /// The two 16-byte halves of the composite key are independent of each
    /// other, so they are transformed on two worker threads.
    pub fn new(
        key: &CompositeKey,
        seed: &TransformSeed,
        rounds: &TransformRounds,
    ) -> TransformedKey {
        let composite = key.unsecure();
        let mut left = [0u8; 16];
        let mut right = [0u8; 16];
        left.copy_from_slice(&composite[0..16]);
        right.copy_from_slice(&composite[16..32]);

        let seed_bytes = &seed.0;
        let n = rounds.0;
        let (left, right) = thread::scope(|scope| {
            let left_handle = scope.spawn(move || transform_half(left, seed_bytes, n));
            let right_handle = scope.spawn(move || transform_half(right, seed_bytes, n));
            (
                left_handle.join().expect("transform thread panicked"),
                right_handle.join().expect("transform thread panicked"),
            )
        });

        let mut combined = [0u8; 32];
        combined[0..16].copy_from_slice(&left);
        combined[16..32].copy_from_slice(&right);

        TransformedKey::secure(sha256::hash(&[&combined]))
    }

    /// Gets the protected data from this transformed key.
    pub fn unsecure(&self) -> [u8; 32] {
        let unsecure = self.0.unsecure();
        let mut array = [0u8; 32];
        for (u, a) in unsecure.iter().zip(array.iter_mut()) {
            *a = *u;
        }
        array
    }

    fn secure(key: [u8; 32]) -> TransformedKey {
        TransformedKey(SecStr::new(key.to_vec()))
    }
}

fn transform_half(mut half: [u8; 16], seed: &[u8; 32], rounds: u64) -> [u8; 16] {
    let mut output = [0u8; 16];

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if util::supports_aesni() {
            let cipher = aesni::AesNiEncryptor::new(aes::KeySize::KeySize256, seed);
            for _ in 0..rounds {
                cipher.encrypt_block(&half, &mut output);
                half = output;
            }
            return half;
        }
    }

    let cipher = aessafe::AesSafe256Encryptor::new(seed);
    for _ in 0..rounds {
        cipher.encrypt_block(&half, &mut output);
        half = output;
    }
    half
}

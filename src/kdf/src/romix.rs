// Copyright The Kestrel Contributors
// SPDX-License-Identifier: BSD-3-Clause

// Based off of the original Go implementation
//
// Copyright 2012 The Go Authors. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::mem;

use tracing::trace;
use zeroize::Zeroizing;

use crate::params::Params;
use crate::salsa::salsa_xor;

// XORs the numbers in src into dst
fn block_xor(dst: &mut [u32], src: &[u32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// scryptBlockMix over 2 * r blocks of 16 words.
/// Even numbered results land in the first half of out and odd numbered
/// results in the second half.
#[rustfmt::skip]
pub(crate) fn block_mix(tmp: &mut [u32; 16], inn: &[u32], out: &mut [u32], r: usize) {
    tmp.copy_from_slice(&inn[(2*r-1)*16..2*r*16]);
    for i in (0..2*r).step_by(2) {
        salsa_xor(tmp, &inn[i*16..], &mut out[i*8..]);
        salsa_xor(tmp, &inn[i*16+16..], &mut out[i*8+r*16..]);
    }
}

// Integerify: the first 8 bytes of the last 64 byte block, little-endian
fn integer(b: &[u32], r: usize) -> u64 {
    let j = (2 * r - 1) * 16;
    u64::from(b[j]) | u64::from(b[j + 1]) << 32
}

/// Scratch memory for scryptROMix, sized for one set of parameters.
///
/// The lookup table and working pair are reused for every stretch block
/// mixed through the same context and wiped when it is dropped.
pub(crate) struct RoMix {
    r: usize,
    n: usize,
    v: Zeroizing<Vec<u32>>,
    x: Zeroizing<Vec<u32>>,
    y: Zeroizing<Vec<u32>>,
    tmp: Zeroizing<[u32; 16]>,
}

impl RoMix {
    pub(crate) fn new(params: &Params) -> RoMix {
        let r = params.r() as usize;
        let n = params.n() as usize;

        RoMix {
            r,
            n,
            v: Zeroizing::new(vec![0u32; params.table_size() / 4]),
            x: Zeroizing::new(vec![0u32; 32 * r]),
            y: Zeroizing::new(vec![0u32; 32 * r]),
            tmp: Zeroizing::new([0u32; 16]),
        }
    }

    /// Mix one stretch block of 128 * r bytes in place.
    pub(crate) fn mix(&mut self, b: &mut [u8]) {
        let RoMix {
            r,
            n,
            v,
            x,
            y,
            tmp,
        } = self;
        let (r, n) = (*r, *n);
        let words = 32 * r;
        debug_assert_eq!(b.len(), words * 4);

        let mut x: &mut [u32] = &mut x[..];
        let mut y: &mut [u32] = &mut y[..];

        for (w, c) in x.iter_mut().zip(b.chunks_exact(4)) {
            *w = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
        }

        for entry in v.chunks_exact_mut(words) {
            entry.copy_from_slice(x);
            block_mix(tmp, x, y, r);
            mem::swap(&mut x, &mut y);
        }

        // N is a power of 2, so masking is reduction mod N.
        let mask = n as u64 - 1;
        for _ in 0..n {
            let j = (integer(x, r) & mask) as usize;
            block_xor(x, &v[j * words..(j + 1) * words]);
            block_mix(tmp, x, y, r);
            mem::swap(&mut x, &mut y);
        }

        for (c, w) in b.chunks_exact_mut(4).zip(x.iter()) {
            c.copy_from_slice(&w.to_le_bytes());
        }
    }
}

/// Run scryptROMix over each stretch block of b in turn.
#[cfg(not(feature = "parallel"))]
pub(crate) fn mix_blocks(b: &mut [u8], params: &Params) {
    let mut romix = RoMix::new(params);
    for (i, block) in b.chunks_exact_mut(params.block_size()).enumerate() {
        trace!(block = i, "mixing stretch block");
        romix.mix(block);
    }
}

/// Run scryptROMix over the stretch blocks of b concurrently.
/// Every worker allocates its own lookup table.
#[cfg(feature = "parallel")]
pub(crate) fn mix_blocks(b: &mut [u8], params: &Params) {
    use rayon::prelude::*;

    b.par_chunks_exact_mut(params.block_size())
        .enumerate()
        .for_each_init(
            || RoMix::new(params),
            |romix, (i, block)| {
                trace!(block = i, "mixing stretch block");
                romix.mix(block);
            },
        );
}

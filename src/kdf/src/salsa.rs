// Copyright The Kestrel Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! The Salsa20/8 core function from RFC 7914 section 3.
//!
//! Four double rounds of the Salsa20 quarter-round network over sixteen
//! little-endian words, with the input added back in at the end.

/// Apply Salsa20/8 to a 64 byte block in place.
/// The block is read and written as sixteen little-endian u32 words.
pub fn salsa20_8_core(block: &mut [u8; 64]) {
    let mut words = [0u32; 16];
    for (w, b) in words.iter_mut().zip(block.chunks_exact(4)) {
        *w = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
    }

    salsa20_8(&mut words);

    for (b, w) in block.chunks_exact_mut(4).zip(words.iter()) {
        b.copy_from_slice(&w.to_le_bytes());
    }
}

#[rustfmt::skip]
pub(crate) fn salsa20_8(b: &mut [u32; 16]) {
    let [
        mut x0, mut x1, mut x2, mut x3,
        mut x4, mut x5, mut x6, mut x7,
        mut x8, mut x9, mut x10, mut x11,
        mut x12, mut x13, mut x14, mut x15,
    ] = *b;

    for _ in (0..8).step_by(2) {
        // Columns
        x4 ^= x0.wrapping_add(x12).rotate_left(7);
        x8 ^= x4.wrapping_add(x0).rotate_left(9);
        x12 ^= x8.wrapping_add(x4).rotate_left(13);
        x0 ^= x12.wrapping_add(x8).rotate_left(18);

        x9 ^= x5.wrapping_add(x1).rotate_left(7);
        x13 ^= x9.wrapping_add(x5).rotate_left(9);
        x1 ^= x13.wrapping_add(x9).rotate_left(13);
        x5 ^= x1.wrapping_add(x13).rotate_left(18);

        x14 ^= x10.wrapping_add(x6).rotate_left(7);
        x2 ^= x14.wrapping_add(x10).rotate_left(9);
        x6 ^= x2.wrapping_add(x14).rotate_left(13);
        x10 ^= x6.wrapping_add(x2).rotate_left(18);

        x3 ^= x15.wrapping_add(x11).rotate_left(7);
        x7 ^= x3.wrapping_add(x15).rotate_left(9);
        x11 ^= x7.wrapping_add(x3).rotate_left(13);
        x15 ^= x11.wrapping_add(x7).rotate_left(18);

        // Rows
        x1 ^= x0.wrapping_add(x3).rotate_left(7);
        x2 ^= x1.wrapping_add(x0).rotate_left(9);
        x3 ^= x2.wrapping_add(x1).rotate_left(13);
        x0 ^= x3.wrapping_add(x2).rotate_left(18);

        x6 ^= x5.wrapping_add(x4).rotate_left(7);
        x7 ^= x6.wrapping_add(x5).rotate_left(9);
        x4 ^= x7.wrapping_add(x6).rotate_left(13);
        x5 ^= x4.wrapping_add(x7).rotate_left(18);

        x11 ^= x10.wrapping_add(x9).rotate_left(7);
        x8 ^= x11.wrapping_add(x10).rotate_left(9);
        x9 ^= x8.wrapping_add(x11).rotate_left(13);
        x10 ^= x9.wrapping_add(x8).rotate_left(18);

        x12 ^= x15.wrapping_add(x14).rotate_left(7);
        x13 ^= x12.wrapping_add(x15).rotate_left(9);
        x14 ^= x13.wrapping_add(x12).rotate_left(13);
        x15 ^= x14.wrapping_add(x13).rotate_left(18);
    }

    b[0] = b[0].wrapping_add(x0);
    b[1] = b[1].wrapping_add(x1);
    b[2] = b[2].wrapping_add(x2);
    b[3] = b[3].wrapping_add(x3);
    b[4] = b[4].wrapping_add(x4);
    b[5] = b[5].wrapping_add(x5);
    b[6] = b[6].wrapping_add(x6);
    b[7] = b[7].wrapping_add(x7);
    b[8] = b[8].wrapping_add(x8);
    b[9] = b[9].wrapping_add(x9);
    b[10] = b[10].wrapping_add(x10);
    b[11] = b[11].wrapping_add(x11);
    b[12] = b[12].wrapping_add(x12);
    b[13] = b[13].wrapping_add(x13);
    b[14] = b[14].wrapping_add(x14);
    b[15] = b[15].wrapping_add(x15);
}

/// XOR the 16 words of inn into tmp, apply Salsa20/8 to tmp and copy
/// the result into the first 16 words of out.
/// tmp is left holding the result for the next call.
pub(crate) fn salsa_xor(tmp: &mut [u32; 16], inn: &[u32], out: &mut [u32]) {
    for (t, i) in tmp.iter_mut().zip(&inn[..16]) {
        *t ^= i;
    }

    salsa20_8(tmp);

    out[..16].copy_from_slice(&tmp[..]);
}

#[cfg(test)]
mod tests {
    use super::{salsa20_8, salsa20_8_core, salsa_xor};

    const RFC_INPUT: &str = "7e879a214f3ec9867ca940e641718f26baee555b8c61c1b50df846116dcd3b1dee24f319df9b3d8514121e4b5ac5aa3276021d2909c74829edebc68db8b8c25e";
    const RFC_OUTPUT: &str = "a41f859c6608cc993b81cacb020cef05044b2181a2fd337dfd7b1c6396682f29b4393168e3c9e6bcfe6bc5b7a06d96bae424cc102c91745c24ad673dc7618f81";

    fn block(hex_str: &str) -> [u8; 64] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_salsa20_8_rfc7914_vector() {
        // RFC 7914 Section 8
        let mut b = block(RFC_INPUT);
        salsa20_8_core(&mut b);
        assert_eq!(hex::encode(b), RFC_OUTPUT);
    }

    #[test]
    fn test_salsa20_8_not_idempotent() {
        let mut once = block(RFC_INPUT);
        salsa20_8_core(&mut once);
        let mut twice = once;
        salsa20_8_core(&mut twice);

        assert_ne!(once, twice);
        assert_eq!(
            hex::encode(twice),
            "ffd55f2110b8119ec9f7bfd6a859400f1b94febc214cf5de17004c2413ca0f9d749a42bdf7811ee80f243bd536bd16da3fd56903616f1b0e9ca6bb482319deb7"
        );
    }

    #[test]
    fn test_salsa20_8_zero_block() {
        // Every ARX step maps zero to zero.
        let mut b = [0u32; 16];
        salsa20_8(&mut b);
        assert_eq!(b, [0u32; 16]);
    }

    #[test]
    fn test_salsa_xor() {
        let input = block(RFC_INPUT);
        let mut words = [0u32; 16];
        for (w, c) in words.iter_mut().zip(input.chunks_exact(4)) {
            *w = u32::from_le_bytes(c.try_into().unwrap());
        }

        // XOR against an all zero accumulator is just the core function.
        let mut tmp = [0u32; 16];
        let mut out = [0u32; 20];
        salsa_xor(&mut tmp, &words, &mut out);

        let mut expected = words;
        salsa20_8(&mut expected);
        assert_eq!(tmp, expected);
        assert_eq!(&out[..16], &expected);
        assert_eq!(&out[16..], &[0u32; 4]);
    }
}

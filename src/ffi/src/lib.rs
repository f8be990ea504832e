// Copyright The Kestrel Contributors
// SPDX-License-Identifier: BSD-3-Clause

use libc::{c_int, c_uchar, c_uint, size_t};

use scrypt_kdf::derive_key;

/// Returned when the key was derived
pub const SCRYPT_OK: c_int = 0;
/// Returned when a parameter was rejected. Nothing is written.
pub const SCRYPT_INVALID: c_int = -1;

// A null pointer is only acceptable for an empty input.
unsafe fn input_slice<'a>(ptr: *const c_uchar, len: size_t) -> Option<&'a [u8]> {
    if len == 0 {
        Some(&[][..])
    } else if ptr.is_null() {
        None
    } else {
        Some(unsafe { std::slice::from_raw_parts(ptr, len) })
    }
}

/// Derives a secret key from a password and a salt using scrypt.
/// Recommended parameters are n = 32768, r = 8, p = 1
/// Parameter n must be a power of 2.
/// Returns SCRYPT_OK on success and SCRYPT_INVALID if the parameters are
/// out of range or a required pointer is null.
/// # Safety
/// The supplied lengths must be correct for their respective pointers.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn scrypt_derive_key(
    password: *const c_uchar,
    password_len: size_t,
    salt: *const c_uchar,
    salt_len: size_t,
    n: c_uint,
    r: c_uint,
    p: c_uint,
    derived_key: *mut c_uchar,
    dk_len: size_t,
) -> c_int {
    unsafe {
        let Some(kpass) = input_slice(password, password_len) else {
            return SCRYPT_INVALID;
        };

        let Some(ksalt) = input_slice(salt, salt_len) else {
            return SCRYPT_INVALID;
        };

        if derived_key.is_null() || dk_len == 0 {
            return SCRYPT_INVALID;
        }
        let kderived_key = std::slice::from_raw_parts_mut(derived_key, dk_len);

        match derive_key(kderived_key, kpass, ksalt, n, r, p) {
            Ok(()) => SCRYPT_OK,
            Err(_) => SCRYPT_INVALID,
        }
    }
}

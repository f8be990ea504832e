// Copyright The Kestrel Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! The scrypt password based key derivation function.
//!
//! An implementation of scrypt as specified in RFC 7914. A passphrase and
//! salt are stretched with PBKDF2-HMAC-SHA256, each resulting block is run
//! through the sequential memory-hard scryptROMix function, and the mixed
//! blocks are compressed with PBKDF2-HMAC-SHA256 once more into the
//! derived key.
//!
//! The goal of this library is not to serve as a general purpose
//! password hashing library. It performs exactly one derivation with the
//! parameters it is given and returns raw key bytes.
//!
//! ```
//! use scrypt_kdf::{scrypt, Params};
//!
//! let params = Params::new(1024, 8, 1).unwrap();
//! let mut key = [0u8; 32];
//! scrypt(b"hackme", b"yellowsubmarine.", &params, &mut key).unwrap();
//! ```

pub mod errors;
mod params;
mod romix;
mod salsa;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

pub use errors::ParamsError;
pub use params::{Params, RECOMMENDED_N, RECOMMENDED_P, RECOMMENDED_R};
pub use salsa::salsa20_8_core;

use params::MAX_PBKDF2_LEN;

/// Derives a secret key from a password and a salt using scrypt.
/// The derived key fills the whole output buffer, which must be between
/// 1 and (2^32 - 1) * 32 bytes long.
/// On error the output buffer is left untouched.
pub fn scrypt(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    output: &mut [u8],
) -> Result<(), ParamsError> {
    let dk_len = output.len();
    if dk_len == 0 || dk_len as u64 > MAX_PBKDF2_LEN {
        debug!(dk_len, "rejected scrypt output length");
        return Err(ParamsError::OutputLen(dk_len));
    }

    debug!(
        n = params.n(),
        r = params.r(),
        p = params.p(),
        dk_len,
        "deriving scrypt key"
    );

    let mut b = Zeroizing::new(vec![0u8; params.stretch_size()]);
    pbkdf2_hmac::<Sha256>(password, salt, 1, &mut b);

    romix::mix_blocks(&mut b, params);

    pbkdf2_hmac::<Sha256>(password, &b, 1, output);

    Ok(())
}

/// Derives a secret key from a passphrase and a salt using scrypt,
/// filling derived_key completely.
/// Recommended parameters are n = 32768, r = 8, p = 1
/// Parameter n must be a power of 2. See [`Params::new`] for the bounds
/// on n, r and p. All parameters are validated before any work is done.
pub fn derive_key(
    derived_key: &mut [u8],
    passphrase: &[u8],
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
) -> Result<(), ParamsError> {
    if derived_key.is_empty() {
        debug!("rejected empty scrypt output buffer");
        return Err(ParamsError::OutputLen(0));
    }

    let params = Params::new(n, r, p).map_err(|e| {
        debug!(error = %e, "rejected scrypt parameters");
        e
    })?;

    scrypt(passphrase, salt, &params, derived_key)
}

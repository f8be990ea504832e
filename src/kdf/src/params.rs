// Copyright The Kestrel Contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::errors::ParamsError;

/// Cost factor suitable for interactive logins.
pub const RECOMMENDED_N: u32 = 32768;
/// Block size factor suitable for interactive logins.
pub const RECOMMENDED_R: u32 = 8;
/// Parallelization factor suitable for interactive logins.
pub const RECOMMENDED_P: u32 = 1;

// The lookup table must stay addressable with a signed 32 bit offset.
const MAX_TABLE_SIZE: u64 = i32::MAX as u64;

// PBKDF2 produces at most 2^32 - 1 blocks of 32 bytes.
pub(crate) const MAX_PBKDF2_LEN: u64 = 0xffff_ffff * 32;

/// A validated set of scrypt parameters.
///
/// N is the CPU/memory cost factor, r the block size factor and p the
/// parallelization factor. A `Params` can only be built through
/// [`Params::new`], so every instance describes a derivation whose buffer
/// sizes are known to fit in memory arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    n: u32,
    r: u32,
    p: u32,
}

impl Params {
    /// Validate N, r and p.
    /// r must be at least 1. N must be a power of 2 and the lookup table
    /// of 128 * r * N bytes must not exceed 2^31 - 1 bytes.
    /// p must be between 1 and ((2^32 - 1) * 32) / (128 * r).
    pub fn new(n: u32, r: u32, p: u32) -> Result<Params, ParamsError> {
        if r < 1 {
            return Err(ParamsError::BlockSize(r));
        }

        let block_size = 128 * u64::from(r);

        // Never larger than 2^24, so the narrowing below is lossless.
        let max_n = MAX_TABLE_SIZE / block_size;
        if n < 1 || u64::from(n) > max_n || !n.is_power_of_two() {
            return Err(ParamsError::CostFactor {
                n,
                max: max_n as u32,
            });
        }

        let max_p = (MAX_PBKDF2_LEN / block_size).min(usize::MAX as u64 / block_size);
        if p < 1 || u64::from(p) > max_p {
            return Err(ParamsError::Parallelism { p, max: max_p });
        }

        Ok(Params { n, r, p })
    }

    /// The parameters used for interactive logins: N = 32768, r = 8, p = 1
    pub fn recommended() -> Params {
        Params {
            n: RECOMMENDED_N,
            r: RECOMMENDED_R,
            p: RECOMMENDED_P,
        }
    }

    /// CPU/memory cost factor N
    pub fn n(&self) -> u32 {
        self.n
    }

    /// log2(N)
    pub fn log_n(&self) -> u8 {
        // N is a power of 2 that fits in a u32, so this is at most 31.
        self.n.trailing_zeros() as u8
    }

    /// Block size factor r
    pub fn r(&self) -> u32 {
        self.r
    }

    /// Parallelization factor p
    pub fn p(&self) -> u32 {
        self.p
    }

    /// Size in bytes of one stretch block, 128 * r
    pub fn block_size(&self) -> usize {
        128 * self.r as usize
    }

    /// Size in bytes of the lookup table, 128 * r * N
    pub fn table_size(&self) -> usize {
        self.block_size() * self.n as usize
    }

    /// Size in bytes of the stretch buffer, 128 * r * p
    pub(crate) fn stretch_size(&self) -> usize {
        self.block_size() * self.p as usize
    }
}

impl Default for Params {
    fn default() -> Params {
        Params::recommended()
    }
}

#[cfg(test)]
mod tests {
    use super::{Params, RECOMMENDED_N, RECOMMENDED_P, RECOMMENDED_R};
    use crate::errors::ParamsError;

    #[test]
    fn test_valid_params() {
        let params = Params::new(16384, 8, 1).unwrap();
        assert_eq!(params.n(), 16384);
        assert_eq!(params.r(), 8);
        assert_eq!(params.p(), 1);
        assert_eq!(params.log_n(), 14);
        assert_eq!(params.block_size(), 1024);
        assert_eq!(params.table_size(), 16 * 1024 * 1024);
        assert_eq!(params.stretch_size(), 1024);

        let params = Params::new(1, 1, 1).unwrap();
        assert_eq!(params.log_n(), 0);
        assert_eq!(params.table_size(), 128);
    }

    #[test]
    fn test_recommended() {
        let params = Params::default();
        assert_eq!(params, Params::recommended());
        assert_eq!(
            params,
            Params::new(RECOMMENDED_N, RECOMMENDED_R, RECOMMENDED_P).unwrap()
        );
    }

    #[test]
    fn test_block_size_rejected() {
        assert_eq!(Params::new(16384, 0, 1), Err(ParamsError::BlockSize(0)));
    }

    #[test]
    fn test_cost_factor_rejected() {
        let max = 2097151;
        assert_eq!(
            Params::new(0, 8, 1),
            Err(ParamsError::CostFactor { n: 0, max })
        );
        assert_eq!(
            Params::new(3, 8, 1),
            Err(ParamsError::CostFactor { n: 3, max })
        );
        assert_eq!(
            Params::new(2097152, 8, 1),
            Err(ParamsError::CostFactor { n: 2097152, max })
        );
        assert!(Params::new(1048576, 8, 1).is_ok());
    }

    #[test]
    fn test_cost_factor_bound_follows_r() {
        // 128 * 1 * 2^24 = 2^31 is one byte too many.
        assert!(Params::new(1 << 23, 1, 1).is_ok());
        assert!(Params::new(1 << 24, 1, 1).is_err());

        // A single block can exceed the table limit on its own.
        assert_eq!(
            Params::new(1, 1 << 24, 1),
            Err(ParamsError::CostFactor { n: 1, max: 0 })
        );
    }

    #[test]
    fn test_parallelism_rejected() {
        assert!(matches!(
            Params::new(16384, 8, 0),
            Err(ParamsError::Parallelism { p: 0, .. })
        ));

        let err = Params::new(16384, 8, 134217728).unwrap_err();
        assert!(matches!(err, ParamsError::Parallelism { p: 134217728, .. }));

        if usize::BITS >= 64 {
            assert_eq!(
                err,
                ParamsError::Parallelism {
                    p: 134217728,
                    max: 134217727
                }
            );
            assert!(Params::new(16384, 8, 134217727).is_ok());
        }
    }

    #[test]
    fn test_error_display() {
        let err = Params::new(3, 8, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter N must be a power of 2 no larger than 2097151. Got 3."
        );

        let err = Params::new(16, 0, 1).unwrap_err();
        assert_eq!(err.to_string(), "Parameter r must be greater than 0. Got 0.");
    }
}

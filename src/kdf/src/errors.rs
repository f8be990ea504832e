// Copyright The Kestrel Contributors
// SPDX-License-Identifier: BSD-3-Clause

use std::error::Error;

/// Rejected scrypt parameters.
/// Each variant carries the offending value and, where it depends on the
/// other parameters, the largest value that would have been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsError {
    /// The derived key length was zero or above the PBKDF2 limit.
    OutputLen(usize),
    /// The block size factor r was zero.
    BlockSize(u32),
    /// The cost factor N was zero, not a power of two, or too large for r.
    CostFactor { n: u32, max: u32 },
    /// The parallelization factor p was zero or too large for r.
    Parallelism { p: u32, max: u64 },
}

impl std::fmt::Display for ParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParamsError::OutputLen(len) => write!(
                f,
                "Derived key length must be between 1 and (2^32 - 1) * 32 bytes. Got {}.",
                len
            ),
            ParamsError::BlockSize(r) => {
                write!(f, "Parameter r must be greater than 0. Got {}.", r)
            }
            ParamsError::CostFactor { n, max } => write!(
                f,
                "Parameter N must be a power of 2 no larger than {}. Got {}.",
                max, n
            ),
            ParamsError::Parallelism { p, max } => write!(
                f,
                "Parameter p must be between 1 and {}. Got {}.",
                max, p
            ),
        }
    }
}

impl Error for ParamsError {}

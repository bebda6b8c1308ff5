// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Injectable source of random bytes for salts and nonces.

use lockbox_core::LockboxError;
use ring::rand::{SecureRandom, SystemRandom};

/// Provider of uniformly random bytes.
///
/// Production code uses [`SystemRandomSource`]; tests may substitute a fixed
/// source to make salts reproducible.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), LockboxError>;
}

/// The operating system CSPRNG via `ring`.
#[derive(Debug, Clone)]
pub struct SystemRandomSource {
    rng: SystemRandom,
}

impl SystemRandomSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandomSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), LockboxError> {
        self.rng
            .fill(dest)
            .map_err(|_| LockboxError::Internal("failed to generate random bytes".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_source_fills_distinct_buffers() {
        let source = SystemRandomSource::new();
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        source.fill(&mut a).unwrap();
        source.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}

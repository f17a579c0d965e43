//! Byte buffers owned by background jobs.
//!
//! A buffer is allocated up front with a fallible reservation so that an
//! allocation the system cannot satisfy surfaces as
//! [`JobError::OutOfMemory`] instead of aborting the process.

use crate::error::JobError;
use rand::RngCore;

/// Staging block size for random fills. A multiple of 4 so that word-based
/// generators produce the same stream as one large fill.
const FILL_BLOCK: usize = 16 * 1024;

/// An owned, fixed-size sequence of random bytes.
///
/// # Examples
///
/// ```
/// use bytefreq::core::Buffer;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let buffer = Buffer::random(4096, &mut rng).unwrap();
/// assert_eq!(buffer.size(), 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    /// Allocates a buffer of `size` bytes and fills it from `rng`.
    ///
    /// Bytes are drawn into a small staging block and appended, so the
    /// buffer memory is written once instead of being zeroed first.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::OutOfMemory`] if the allocator refuses the
    /// reservation.
    pub fn random<R: RngCore + ?Sized>(size: usize, rng: &mut R) -> Result<Self, JobError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| JobError::OutOfMemory { requested: size })?;

        let mut block = [0u8; FILL_BLOCK];
        while bytes.len() < size {
            let n = FILL_BLOCK.min(size - bytes.len());
            rng.fill_bytes(&mut block[..n]);
            bytes.extend_from_slice(&block[..n]);
        }
        Ok(Self { bytes })
    }

    /// Returns the size of the buffer in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the buffer contents.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

//! Deterministic id-to-partition routing.
//!
//! The router is a pure function of the id, the partition count and a seed.
//! Writes, point reads and deletes all go through it, so a record is always
//! found in the partition that stored it.

use crate::error::{Error, Result};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Maps vector ids onto a fixed number of partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRouter {
    partitions: usize,
    seed: u64,
}

impl PartitionRouter {
    /// Creates a router over `partitions` partitions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPartitionAvailable`] if `partitions` is zero.
    pub fn new(partitions: usize) -> Result<Self> {
        Self::with_seed(partitions, 0)
    }

    /// Creates a router whose hash is salted with `seed`.
    ///
    /// Routers with different seeds distribute the same ids independently,
    /// which keeps nested routing layers from lining up.
    pub fn with_seed(partitions: usize, seed: u64) -> Result<Self> {
        if partitions == 0 {
            return Err(Error::NoPartitionAvailable);
        }
        Ok(Self { partitions, seed })
    }

    #[inline]
    pub fn partitions(&self) -> usize {
        self.partitions
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the partition index for `id`, always in `0..partitions`.
    ///
    /// # Example
    ///
    /// ```
    /// use savitar_core::PartitionRouter;
    ///
    /// let router = PartitionRouter::new(4).unwrap();
    /// let p = router.route("vec1");
    /// assert!(p < 4);
    /// assert_eq!(p, router.route("vec1"));
    /// ```
    #[inline]
    pub fn route(&self, id: &str) -> usize {
        (self.hash(id) % self.partitions as u64) as usize
    }

    /// Seeded 64-bit FNV-1a over the seed bytes followed by the id bytes,
    /// finished with a murmur3 avalanche so the low bits are usable for
    /// small moduli.
    fn hash(&self, id: &str) -> u64 {
        let hash = self
            .seed
            .to_le_bytes()
            .iter()
            .chain(id.as_bytes())
            .fold(FNV_OFFSET_BASIS, |hash, &byte| {
                (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
            });
        fmix64(hash)
    }
}

#[inline]
fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

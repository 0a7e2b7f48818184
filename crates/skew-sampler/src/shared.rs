use crate::error::Result;
use crate::sampler::ZipfianSampler;
use parking_lot::RwLock;
use rand::Rng;

/// Thread-safe wrapper around a [`ZipfianSampler`].
///
/// Draws and pmf queries take a read lock, so any number of threads sample in
/// parallel. [`grow`](Self::grow) takes the write lock and is serialized
/// against every reader. Each caller brings its own random source; nothing
/// random lives behind the lock.
pub struct SharedSampler {
    inner: RwLock<ZipfianSampler>,
}

impl SharedSampler {
    pub fn new(sampler: ZipfianSampler) -> Self {
        Self {
            inner: RwLock::new(sampler),
        }
    }

    pub fn next<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.inner.read().next(rng)
    }

    pub fn grow(&self, new_items: u64) -> Result<()> {
        self.inner.write().grow(new_items)
    }

    pub fn item_count(&self) -> u64 {
        self.inner.read().item_count()
    }

    pub fn probability(&self, item: u64) -> Result<f64> {
        self.inner.read().probability(item)
    }

    pub fn cumulative_distribution_items(&self, cdf_probability: f64) -> Result<u64> {
        self.inner.read().cumulative_distribution_items(cdf_probability)
    }

    /// Copy of the current sampler state.
    pub fn snapshot(&self) -> ZipfianSampler {
        self.inner.read().clone()
    }
}

impl From<ZipfianSampler> for SharedSampler {
    fn from(sampler: ZipfianSampler) -> Self {
        Self::new(sampler)
    }
}

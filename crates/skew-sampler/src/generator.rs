use crate::error::{Error, Result};
use crate::sampler::ZipfianSampler;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A Zipfian sampler paired with its own random source.
///
/// Yields entity identifiers: each draw is a rank offset by `base`, so rank 0
/// (the hottest item) maps to identifier `base`.
pub struct ZipfianGenerator<R = StdRng> {
    sampler: ZipfianSampler,
    rng: R,
    base: u64,
}

impl ZipfianGenerator<StdRng> {
    /// Generator over `item_count` items whose stream is fully determined by
    /// `seed`.
    pub fn seeded(item_count: u64, skew: f64, seed: u64) -> Result<Self> {
        let sampler = ZipfianSampler::with_skew(item_count, skew)?;
        Ok(Self::with_rng(sampler, StdRng::seed_from_u64(seed)))
    }
}

impl<R: Rng> ZipfianGenerator<R> {
    pub fn with_rng(sampler: ZipfianSampler, rng: R) -> Self {
        Self {
            sampler,
            rng,
            base: 0,
        }
    }

    /// Offset added to every rank by [`next_id`](Self::next_id).
    ///
    /// Fails if the largest identifier, `base + item_count - 1`, does not fit
    /// in a `u64`.
    pub fn with_base(mut self, base: u64) -> Result<Self> {
        check_id_range(base, self.sampler.item_count())?;
        self.base = base;
        Ok(self)
    }

    pub fn sampler(&self) -> &ZipfianSampler {
        &self.sampler
    }

    pub fn skew(&self) -> f64 {
        self.sampler.skew()
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// Draw the next rank in `[0, item_count)`.
    pub fn next_rank(&mut self) -> u64 {
        self.sampler.next(&mut self.rng)
    }

    /// Draw the next identifier in `[base, base + item_count)`.
    pub fn next_id(&mut self) -> u64 {
        // with_base and grow keep base + item_count - 1 within u64.
        self.base + self.next_rank()
    }

    /// Extend the underlying domain; see [`ZipfianSampler::grow`].
    ///
    /// Fails without growing if the new identifiers would overflow `u64`.
    pub fn grow(&mut self, new_items: u64) -> Result<()> {
        let item_count = self
            .sampler
            .item_count()
            .checked_add(new_items)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "growing {} items by {new_items} overflows",
                    self.sampler.item_count()
                ))
            })?;
        check_id_range(self.base, item_count)?;
        self.sampler.grow(new_items)
    }
}

fn check_id_range(base: u64, item_count: u64) -> Result<()> {
    match base.checked_add(item_count - 1) {
        Some(_) => Ok(()),
        None => Err(Error::InvalidParameter(format!(
            "base {base} leaves no room for {item_count} identifiers"
        ))),
    }
}

impl<R: Rng> Iterator for ZipfianGenerator<R> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_id())
    }
}

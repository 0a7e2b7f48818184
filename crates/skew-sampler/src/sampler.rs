use crate::error::{Error, Result};
use crate::zeta;
use rand::distributions::Distribution;
use rand::Rng;

/// Skew used by YCSB's zipfian request distribution.
pub const DEFAULT_SKEW: f64 = 0.99;

/// Zipfian sampler over ranks `[0, item_count)`.
///
/// Rank 0 is the most frequent item and the probability of rank `k` is
/// proportional to `1 / (k + 1)^skew`. Draws use the closed-form inverse from
/// Gray et al., "Quickly Generating Billion-Record Synthetic Databases", so a
/// draw is O(1) once the normalization constant `zeta_n` is known.
///
/// `zeta_n` is computed once at construction (O(n)) and then maintained
/// incrementally by [`grow`](Self::grow). Draws and queries take `&self`;
/// growth takes `&mut self`. Wrap the sampler in a
/// [`SharedSampler`](crate::SharedSampler) to grow it while other threads draw.
#[derive(Clone, Debug)]
pub struct ZipfianSampler {
    item_count: u64,
    skew: f64,
    zeta_n: f64,

    // Derived from the fields above, refreshed on growth.
    zeta_2: f64,
    alpha: f64,
    eta: f64,
    second_rank_threshold: f64,
}

impl ZipfianSampler {
    /// Create a sampler over `item_count` items with [`DEFAULT_SKEW`].
    pub fn new(item_count: u64) -> Result<Self> {
        Self::with_skew(item_count, DEFAULT_SKEW)
    }

    /// Create a sampler over `item_count` items with the given skew.
    ///
    /// Fails if `item_count` is zero, or if `skew` is not a finite value
    /// greater than zero. `skew == 1.0` is rejected because the inverse used
    /// by [`next`](Self::next) divides by `1 - skew`.
    pub fn with_skew(item_count: u64, skew: f64) -> Result<Self> {
        if item_count == 0 {
            return Err(Error::InvalidParameter(
                "item_count must be at least 1".to_string(),
            ));
        }
        if !skew.is_finite() || skew <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "skew must be a finite value > 0, got {skew}"
            )));
        }
        if skew == 1.0 {
            return Err(Error::InvalidParameter(
                "skew must not be 1.0".to_string(),
            ));
        }

        let zeta_n = zeta::zeta(item_count, skew);
        let zeta_2 = zeta::zeta(2, skew);
        let mut sampler = Self {
            item_count,
            skew,
            zeta_n,
            zeta_2,
            alpha: 1.0 / (1.0 - skew),
            eta: 0.0,
            second_rank_threshold: 1.0 + 0.5f64.powf(skew),
        };
        sampler.eta = sampler.compute_eta();

        tracing::debug!(item_count, skew, zeta_n, "zipfian sampler created");
        Ok(sampler)
    }

    fn compute_eta(&self) -> f64 {
        (1.0 - (2.0 / self.item_count as f64).powf(1.0 - self.skew))
            / (1.0 - self.zeta_2 / self.zeta_n)
    }

    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    /// The normalization constant `Σ_{i=1}^{n} i^-skew` for the current domain.
    pub fn zeta_n(&self) -> f64 {
        self.zeta_n
    }

    /// Draw one rank in `[0, item_count)` using a uniform value from `rng`.
    pub fn next<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.sample_uniform(rng.gen::<f64>())
    }

    /// Map a uniform value `u` in `[0, 1)` to a rank.
    ///
    /// The first two ranks are resolved exactly against `zeta_n`; every other
    /// rank comes from `floor(n * (eta*u - eta + 1)^alpha)`. The result is
    /// saturated to `item_count - 1`, which only matters when rounding pushes
    /// `u` values next to 1.0 onto the domain boundary.
    pub fn sample_uniform(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 {
            return 0;
        }
        if uz < self.second_rank_threshold {
            return 1;
        }

        let rank = (self.item_count as f64 * (self.eta * u - self.eta + 1.0).powf(self.alpha))
            as u64;
        rank.min(self.item_count - 1)
    }

    /// Extend the domain by `new_items` ranks.
    ///
    /// `zeta_n` is updated by summing only the new terms. Fails only if the new
    /// item count overflows `u64`.
    pub fn grow(&mut self, new_items: u64) -> Result<()> {
        if new_items == 0 {
            return Ok(());
        }
        let item_count = self.item_count.checked_add(new_items).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "growing {} items by {new_items} overflows",
                self.item_count
            ))
        })?;

        self.zeta_n = zeta::extend(self.zeta_n, self.item_count, new_items, self.skew);
        self.item_count = item_count;
        self.eta = self.compute_eta();

        tracing::debug!(
            item_count = self.item_count,
            new_items,
            zeta_n = self.zeta_n,
            "zipfian sampler grown"
        );
        Ok(())
    }

    /// Probability mass of `item`, where rank 0 is the most likely item.
    pub fn probability(&self, item: u64) -> Result<f64> {
        if item >= self.item_count {
            return Err(Error::OutOfRange {
                item,
                item_count: self.item_count,
            });
        }
        Ok(self.mass(item))
    }

    #[inline]
    fn mass(&self, item: u64) -> f64 {
        (1.0 / self.zeta_n) * (1.0 / ((item + 1) as f64).powf(self.skew))
    }

    /// Smallest `k` such that ranks `0..k` together carry at least
    /// `cdf_probability` of the mass.
    ///
    /// Linear in the number of ranks scanned. Returns `item_count` when
    /// rounding keeps the running sum just below the threshold.
    pub fn cumulative_distribution_items(&self, cdf_probability: f64) -> Result<u64> {
        if !(0.0..=1.0).contains(&cdf_probability) {
            return Err(Error::InvalidParameter(format!(
                "cdf probability must be within [0, 1], got {cdf_probability}"
            )));
        }

        let mut sum = 0.0;
        for item in 0..self.item_count {
            sum += self.mass(item);
            if sum >= cdf_probability {
                return Ok(item + 1);
            }
        }
        Ok(self.item_count)
    }
}

impl Distribution<u64> for ZipfianSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.next(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn relative_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance * a.abs().max(b.abs())
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            ZipfianSampler::new(0),
            Err(Error::InvalidParameter(_))
        ));
        for skew in [0.0, -0.5, 1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    ZipfianSampler::with_skew(10, skew),
                    Err(Error::InvalidParameter(_))
                ),
                "skew {skew} should be rejected"
            );
        }
    }

    #[test]
    fn default_skew_is_ycsb_constant() {
        let sampler = ZipfianSampler::new(10).unwrap();
        assert_eq!(sampler.skew(), 0.99);
        assert_eq!(sampler.item_count(), 10);
        assert_eq!(sampler.zeta_n(), zeta::zeta(10, 0.99));
    }

    #[test]
    fn probabilities_sum_to_one() {
        for (items, skew) in [(1, 0.99), (10, 0.99), (1000, 0.5), (5000, 1.5), (100, 0.01)] {
            let sampler = ZipfianSampler::with_skew(items, skew).unwrap();
            let total: f64 = (0..items).map(|i| sampler.probability(i).unwrap()).sum();
            assert!(
                relative_eq(total, 1.0, 1e-9),
                "items={items} skew={skew} total={total}"
            );
        }
    }

    #[test]
    fn ten_items_strictly_decreasing() {
        let sampler = ZipfianSampler::new(10).unwrap();
        let probs: Vec<f64> = (0..10).map(|i| sampler.probability(i).unwrap()).collect();
        for pair in probs.windows(2) {
            assert!(pair[0] > pair[1], "{probs:?}");
        }
        assert!(relative_eq(probs.iter().sum(), 1.0, 1e-9));
    }

    #[test]
    fn probability_out_of_range() {
        let sampler = ZipfianSampler::new(10).unwrap();
        assert_eq!(
            sampler.probability(10),
            Err(Error::OutOfRange {
                item: 10,
                item_count: 10
            })
        );
        assert!(sampler.probability(9).is_ok());
    }

    #[test]
    fn first_two_ranks_are_exact() {
        let sampler = ZipfianSampler::new(1000).unwrap();
        let zeta_n = sampler.zeta_n();

        assert_eq!(sampler.sample_uniform(0.0), 0);
        // uz just below 1.0
        assert_eq!(sampler.sample_uniform(0.999 / zeta_n), 0);
        // uz just above 1.0
        assert_eq!(sampler.sample_uniform(1.001 / zeta_n), 1);
        let threshold = 1.0 + 0.5f64.powf(0.99);
        assert_eq!(sampler.sample_uniform((threshold - 0.001) / zeta_n), 1);
        assert!(sampler.sample_uniform((threshold + 0.001) / zeta_n) >= 2);
    }

    #[test]
    fn boundary_draws_stay_in_domain() {
        let below_one = 1.0 - f64::EPSILON / 2.0;
        for (items, skew) in [(1, 0.99), (2, 0.99), (3, 0.5), (1000, 0.99), (1 << 20, 1.2)] {
            let sampler = ZipfianSampler::with_skew(items, skew).unwrap();
            for u in [0.0, f64::MIN_POSITIVE, 0.5, 0.999_999, below_one] {
                let rank = sampler.sample_uniform(u);
                assert!(rank < items, "items={items} skew={skew} u={u} rank={rank}");
            }
        }
    }

    #[test]
    fn single_item_always_zero() {
        let sampler = ZipfianSampler::new(1).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1000).all(|_| sampler.next(&mut rng) == 0));
    }

    #[test]
    fn draws_stay_in_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        for (items, skew) in [(2, 0.99), (17, 0.2), (100, 0.99), (10_000, 1.3)] {
            let sampler = ZipfianSampler::with_skew(items, skew).unwrap();
            for _ in 0..100_000 {
                assert!(sampler.next(&mut rng) < items);
            }
        }
    }

    #[test]
    fn draws_favor_low_ranks() {
        let sampler = ZipfianSampler::new(100).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut counts = [0u64; 100];
        for _ in 0..200_000 {
            counts[rng.sample(&sampler) as usize] += 1;
        }
        assert!(counts[0] > counts[1]);
        assert!(counts[1] > counts[10]);
        assert!(counts[10] > counts[99]);

        let observed = counts[0] as f64 / 200_000.0;
        let expected = sampler.probability(0).unwrap();
        assert!((observed - expected).abs() < 0.01, "{observed} vs {expected}");
    }

    #[test]
    fn cumulative_distribution_bounds() {
        for items in [1, 2, 10, 1000] {
            let sampler = ZipfianSampler::new(items).unwrap();
            assert_eq!(sampler.cumulative_distribution_items(1.0).unwrap(), items);
            assert!(sampler.cumulative_distribution_items(0.0).unwrap() <= 1);
        }
    }

    #[test]
    fn cumulative_distribution_matches_pmf() {
        let sampler = ZipfianSampler::new(10).unwrap();
        let first = sampler.probability(0).unwrap();
        let second = sampler.probability(1).unwrap();

        assert_eq!(sampler.cumulative_distribution_items(first).unwrap(), 1);
        assert_eq!(sampler.cumulative_distribution_items(first + 1e-9).unwrap(), 2);
        assert_eq!(
            sampler.cumulative_distribution_items(first + second).unwrap(),
            2
        );
        assert_eq!(sampler.cumulative_distribution_items(0.5).unwrap(), 2);
        assert_eq!(sampler.cumulative_distribution_items(0.6).unwrap(), 3);
        assert_eq!(sampler.cumulative_distribution_items(0.95).unwrap(), 9);
    }

    #[test]
    fn cumulative_distribution_rejects_bad_probability() {
        let sampler = ZipfianSampler::new(10).unwrap();
        for p in [-0.1, 1.1, f64::NAN] {
            assert!(matches!(
                sampler.cumulative_distribution_items(p),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn grow_matches_fresh_sampler() {
        let mut grown = ZipfianSampler::new(5).unwrap();
        grown.grow(5).unwrap();
        let fresh = ZipfianSampler::new(10).unwrap();

        assert_eq!(grown.item_count(), 10);
        assert!(relative_eq(grown.zeta_n(), fresh.zeta_n(), 1e-12));
        assert!(relative_eq(
            grown.probability(9).unwrap(),
            fresh.probability(9).unwrap(),
            1e-12
        ));
    }

    #[test]
    fn repeated_growth_matches_fresh_sampler() {
        let mut grown = ZipfianSampler::with_skew(1, 0.8).unwrap();
        for step in [1, 3, 10, 0, 250, 4000] {
            grown.grow(step).unwrap();
        }
        let fresh = ZipfianSampler::with_skew(4265, 0.8).unwrap();
        assert_eq!(grown.item_count(), fresh.item_count());
        assert!(relative_eq(grown.zeta_n(), fresh.zeta_n(), 1e-12));

        // Same constants, same draws.
        for u in [0.1, 0.37, 0.5, 0.9, 0.999] {
            assert_eq!(grown.sample_uniform(u), fresh.sample_uniform(u));
        }
    }

    #[test]
    fn grow_reaches_new_ranks() {
        let mut sampler = ZipfianSampler::new(2).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..10_000).all(|_| sampler.next(&mut rng) < 2));

        sampler.grow(98).unwrap();
        let max = (0..100_000).map(|_| sampler.next(&mut rng)).max().unwrap();
        assert!(max >= 2 && max < 100, "max={max}");
    }

    #[test]
    fn grow_overflow_rejected() {
        let mut sampler = ZipfianSampler::new(2).unwrap();
        assert!(matches!(
            sampler.grow(u64::MAX),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(sampler.item_count(), 2);
    }
}

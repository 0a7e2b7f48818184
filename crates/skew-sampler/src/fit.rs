//! Goodness-of-fit checks for sampled rank streams.
//!
//! The check mirrors the usual way Zipfian generators are validated: bucket the
//! draws, sort bucket counts descending into an empirical rank/frequency curve,
//! and compare it with the theoretical pmf using a two-sample
//! Kolmogorov–Smirnov test.

use crate::error::{Error, Result};
use ahash::AHashMap;

/// Outcome of a two-sample Kolmogorov–Smirnov test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KsTest {
    /// Largest distance between the two empirical CDFs.
    pub statistic: f64,
    /// Probability of a distance at least this large when both samples come
    /// from the same distribution.
    pub p_value: f64,
}

impl KsTest {
    /// Whether the null hypothesis (same distribution) is rejected at the
    /// given significance level.
    pub fn rejects(&self, significance: f64) -> bool {
        self.p_value < significance
    }
}

/// Per-rank draw counts over a domain of `item_count` ranks.
pub fn bucket_counts(samples: &[u64], item_count: u64) -> Result<Vec<u64>> {
    let len = usize::try_from(item_count)
        .map_err(|_| Error::InvalidParameter(format!("domain of {item_count} items too large")))?;
    let mut buckets = vec![0u64; len];
    for &item in samples {
        let slot = buckets
            .get_mut(item as usize)
            .filter(|_| item < item_count)
            .ok_or(Error::OutOfRange { item, item_count })?;
        *slot += 1;
    }
    Ok(buckets)
}

/// Draw counts of every distinct value, most frequent first.
///
/// Values that were never drawn do not appear, so the curve can be shorter
/// than the domain.
pub fn rank_frequencies(samples: &[u64]) -> Vec<u64> {
    let mut counts: AHashMap<u64, u64> = AHashMap::new();
    for &item in samples {
        *counts.entry(item).or_insert(0) += 1;
    }
    let mut frequencies: Vec<u64> = counts.values().copied().collect();
    frequencies.sort_unstable_by(|a, b| b.cmp(a));
    frequencies
}

/// Theoretical probability of ranks `1..=item_count` under a Zipf law with
/// exponent `skew`.
///
/// Unlike the sampler this accepts `skew == 1.0` and `skew == 0.0` (uniform).
pub fn zipf_expected_frequencies(item_count: u64, skew: f64) -> Result<Vec<f64>> {
    if item_count == 0 {
        return Err(Error::InvalidParameter(
            "item_count must be at least 1".to_string(),
        ));
    }
    if !skew.is_finite() || skew < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "skew must be a finite value >= 0, got {skew}"
        )));
    }

    let weights: Vec<f64> = (1..=item_count)
        .map(|rank| 1.0 / (rank as f64).powf(skew))
        .collect();
    let harmonic: f64 = weights.iter().sum();
    Ok(weights.into_iter().map(|w| w / harmonic).collect())
}

/// Samples larger than this use the limiting distribution for the p-value.
const MAX_EXACT_SAMPLE: usize = 10_000;

/// Two-sample Kolmogorov–Smirnov test.
///
/// When neither sample exceeds [`MAX_EXACT_SAMPLE`] values the p-value is
/// exact: the share of lattice paths from `(0, 0)` to `(n1, n2)` that reach
/// the observed distance, as scipy's `ks_2samp` computes by default. Larger
/// samples use the Kolmogorov limiting distribution with Stephens' correction.
/// Ties are not corrected for, and exact p-values below about `1e-15` round
/// to zero.
pub fn ks_2samp(a: &[f64], b: &[f64]) -> Result<KsTest> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::EmptySample);
    }
    if a.iter().chain(b).any(|v| v.is_nan()) {
        return Err(Error::InvalidParameter("sample contains NaN".to_string()));
    }

    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut statistic: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        // Step past every tie at x in both samples before comparing CDFs.
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        statistic = statistic.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    let p_value = if a.len().max(b.len()) <= MAX_EXACT_SAMPLE {
        exact_p_value(statistic, a.len(), b.len())
    } else {
        let en = (n1 * n2 / (n1 + n2)).sqrt();
        kolmogorov_survival((en + 0.12 + 0.11 / en) * statistic)
    };
    Ok(KsTest { statistic, p_value })
}

/// `P(D >= statistic)` for sample sizes `m` and `n` by counting lattice paths.
///
/// `u[j]` holds the paths to `(i, j)` that stay strictly inside the band,
/// divided by `C(i + n, i)` so the values stay within `[0, 1]`.
fn exact_p_value(statistic: f64, m: usize, n: usize) -> f64 {
    let (m, n) = if m > n { (n, m) } else { (m, n) };
    let (md, nd) = (m as f64, n as f64);
    // Snap to just below the lattice value of the statistic so that paths
    // reaching it count as outside.
    let q = (0.5 + (statistic * md * nd - 1e-7).floor()) / (md * nd);

    let mut u: Vec<f64> = (0..=n)
        .map(|j| if j as f64 / nd > q { 0.0 } else { 1.0 })
        .collect();
    for i in 1..=m {
        let w = i as f64 / (i + n) as f64;
        u[0] = if i as f64 / md > q { 0.0 } else { w * u[0] };
        for j in 1..=n {
            u[j] = if (i as f64 / md - j as f64 / nd).abs() > q {
                0.0
            } else {
                w * u[j] + u[j - 1]
            };
        }
    }
    (1.0 - u[n]).clamp(0.0, 1.0)
}

/// `Q(λ) = 2 Σ_{k≥1} (-1)^(k-1) exp(-2 k² λ²)`.
fn kolmogorov_survival(lambda: f64) -> f64 {
    const TERM_EPS: f64 = 1e-3;
    const SUM_EPS: f64 = 1e-8;

    let a2 = -2.0 * lambda * lambda;
    let mut sign = 2.0;
    let mut sum = 0.0;
    let mut previous: f64 = 0.0;
    for k in 1..=100 {
        let k = k as f64;
        let term = sign * (a2 * k * k).exp();
        sum += term;
        if term.abs() <= TERM_EPS * previous || term.abs() <= SUM_EPS * sum {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        previous = term.abs();
    }
    // Only small λ fail to converge, and there Q(λ) is 1.
    1.0
}

fn normalize(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Test whether `samples` follow a Zipf law with exponent `skew` over
/// `item_count` ranks.
///
/// The observed rank/frequency curve and the expected pmf are both normalized
/// to sum to 1 and compared with [`ks_2samp`].
pub fn test_zipfian(samples: &[u64], skew: f64, item_count: u64) -> Result<KsTest> {
    if samples.is_empty() {
        return Err(Error::EmptySample);
    }
    let observed = normalize(&rank_frequencies(samples));
    let expected = zipf_expected_frequencies(item_count, skew)?;
    ks_2samp(&observed, &expected)
}
